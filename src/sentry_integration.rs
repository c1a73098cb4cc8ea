use sentry;
use sentry::integrations::panic::register_panic_handler;
use sentry::internals::ClientInitGuard;
use sentry::Dsn;

use config::Sentry;

/// Starts reporting panics and server errors when a dsn is configured.
/// Reporting stops when the returned guard is dropped.
pub fn init(sentry_config: Option<&Sentry>) -> Option<ClientInitGuard> {
    let sentry_config = sentry_config?;
    let dsn = match sentry_config.dsn.parse::<Dsn>() {
        Ok(dsn) => dsn,
        Err(e) => {
            error!("Sentry dsn {} is invalid: {}", sentry_config.dsn, e);
            return None;
        }
    };

    info!("initialization support with sentry");
    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        ..Default::default()
    });
    register_panic_handler();
    Some(guard)
}
