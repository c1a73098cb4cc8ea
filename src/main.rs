//! Listings is a microservice for classified ads.
//! This crate is for running the service from `listings_lib`. See `listings_lib` for details.

extern crate listings_lib;

fn main() {
    let config = listings_lib::config::Config::new().expect("Can't load app config!");

    // Prepare logger
    listings_lib::logging::init(&config.log);

    // Prepare sentry integration
    let _sentry = listings_lib::sentry_integration::init(config.sentry.as_ref());

    listings_lib::start_server(config, &None, || ());
}
