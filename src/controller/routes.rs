use http::router::RouteParser;
use models::PostId;

/// List of all routes with params for the app
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Healthcheck,
    Posts,
    Post(PostId),
    PostPhotos(PostId),
    Categories,
    Category(String),
    Search,
}

pub fn create_route_parser() -> RouteParser<Route> {
    let mut router = RouteParser::default();

    // Healthcheck
    router.add_route(r"^/healthcheck/?$", || Route::Healthcheck);

    // Posts Routes
    router.add_route(r"^/api/posts/?$", || Route::Posts);

    // Posts/:id route
    router.add_route_with_params(r"^/api/posts/(\d+)/?$", |params| {
        params
            .get(0)
            .and_then(|string_id| string_id.parse::<PostId>().ok())
            .map(Route::Post)
    });

    // Posts/:id/photos route
    router.add_route_with_params(r"^/api/posts/(\d+)/photos/?$", |params| {
        params
            .get(0)
            .and_then(|string_id| string_id.parse::<PostId>().ok())
            .map(Route::PostPhotos)
    });

    // Categories Routes
    router.add_route(r"^/api/categories/?$", || Route::Categories);

    // Categories/:code route
    router.add_route_with_params(r"^/api/categories/([^/]+)/?$", |params| {
        params.get(0).map(|code| Route::Category(code.to_string()))
    });

    // Search route
    router.add_route(r"^/api/search/?$", || Route::Search);

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_optional() {
        let router = create_route_parser();
        assert_eq!(router.test("/healthcheck"), Some(Route::Healthcheck));
        assert_eq!(router.test("/api/posts/"), Some(Route::Posts));
        assert_eq!(router.test("/api/posts"), Some(Route::Posts));
        assert_eq!(router.test("/api/posts/12"), Some(Route::Post(12)));
        assert_eq!(router.test("/api/posts/12/photos/"), Some(Route::PostPhotos(12)));
        assert_eq!(router.test("/api/categories/"), Some(Route::Categories));
        assert_eq!(router.test("/api/categories/CAR/"), Some(Route::Category("CAR".to_string())));
        assert_eq!(router.test("/api/search"), Some(Route::Search));
    }

    #[test]
    fn unknown_paths_do_not_match() {
        let router = create_route_parser();
        assert_eq!(router.test("/posts/"), None);
        assert_eq!(router.test("/api/posts/abc"), None);
        assert_eq!(router.test("/api/categories/CAR/attributes"), None);
    }
}
