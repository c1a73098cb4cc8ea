//! `Controller` is a top layer that handles all http-related
//! stuff like reading bodies, parsing params, forming a response.
//! Basically it provides inputs to `Service` layer and converts outputs
//! of `Service` layer to http responses

pub mod context;
pub mod routes;
pub mod utils;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use futures::future;
use futures::Future;
use hyper::server::Request;
use hyper::{Get, Post};
use r2d2::ManageConnection;
use serde::Serialize;
use serde_json::{self, Value};

use self::context::{DynamicContext, StaticContext};
use self::routes::Route;
use self::utils::{authenticate, multipart_boundary, parse_body, parse_multipart, read_body, IMAGE_FIELD};
use errors::Error;
use http::{Controller, ControllerFuture, JsonResponse};
use models::*;
use repos::repo_factory::ReposFactory;
use services::categories::CategoriesService;
use services::posts::PostsService;
use services::search::SearchService;
use services::Service;

/// Controller handles route parsing and calling `Service` layer
pub struct ControllerImpl<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    pub static_context: StaticContext<T, M, F>,
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > ControllerImpl<T, M, F>
{
    /// Create a new controller based on services
    pub fn new(static_context: StaticContext<T, M, F>) -> Self {
        Self { static_context }
    }
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > Controller for ControllerImpl<T, M, F>
{
    /// Handle a request and get future response
    fn call(&self, req: Request) -> ControllerFuture {
        let method = req.method().clone();
        let path = req.path().to_string();
        let params = QueryParams::parse(req.query().unwrap_or_default());
        let headers = req.headers().clone();
        let config = self.static_context.config.clone();
        let fields = FieldSelector::from_query(&params);

        let user_id = match authenticate(&headers, &config.jwt.secret) {
            Ok(user_id) => user_id,
            Err(e) => return Box::new(future::err(e)),
        };
        let service = Service::new(self.static_context.clone(), DynamicContext::new(user_id));
        let page = PageRequest::new(
            config.page_limit(params.parse_value(LIMIT_PARAM)),
            params.parse_value(OFFSET_PARAM).unwrap_or(0),
        );

        match (&method, self.static_context.route_parser.test(&path)) {
            // GET /healthcheck
            (&Get, Some(Route::Healthcheck)) => Box::new(future::ok(JsonResponse::ok(json!("Ok")))),

            // POST /api/posts
            (&Post, Some(Route::Posts)) => {
                if let Err(e) = service.current_user() {
                    return Box::new(future::err(e));
                }
                Box::new(
                    parse_body::<NewPostPayload>(req.body())
                        .and_then(move |payload| service.create_post(payload))
                        .and_then(move |post| serialize(&fields, &post).map(JsonResponse::created)),
                )
            }

            // GET /api/posts
            (&Get, Some(Route::Posts)) => {
                if let Err(e) = service.current_user() {
                    return Box::new(future::err(e));
                }
                Box::new(service.list_own_posts(page).and_then(move |(posts, count)| {
                    serialize_page(&fields, Page::new(posts, count, page, &path, &params)).map(JsonResponse::ok)
                }))
            }

            // GET /api/posts/<post_id>
            (&Get, Some(Route::Post(post_id))) => Box::new(
                service
                    .get_post(post_id)
                    .and_then(move |post| serialize(&fields, &post).map(JsonResponse::ok)),
            ),

            // POST /api/posts/<post_id>/photos
            (&Post, Some(Route::PostPhotos(post_id))) => {
                let boundary = match multipart_boundary(&headers) {
                    Ok(boundary) => boundary,
                    Err(e) => return Box::new(future::err(e)),
                };
                Box::new(
                    read_body(req.body())
                        .and_then(move |bytes| parse_multipart(bytes, &boundary, IMAGE_FIELD))
                        .and_then(move |files| service.add_photos(post_id, files))
                        .and_then(|photos| serialize_all(&FieldSelector::default(), &photos).map(JsonResponse::ok)),
                )
            }

            // GET /api/categories
            (&Get, Some(Route::Categories)) => Box::new(
                service
                    .list_categories()
                    .and_then(move |categories| serialize_all(&fields, &categories).map(JsonResponse::ok)),
            ),

            // GET /api/categories/<code>
            (&Get, Some(Route::Category(code))) => Box::new(
                service
                    .get_category(code)
                    .and_then(move |category| serialize(&fields, &category).map(JsonResponse::ok)),
            ),

            // GET /api/search
            (&Get, Some(Route::Search)) => Box::new(service.search(path.clone(), params.clone(), page).and_then(move |results| {
                results
                    .try_map(|post| serialize(&fields, &post))
                    .and_then(|results| to_json(&results))
                    .map(JsonResponse::ok)
            })),

            // Fallback
            (method, _) => {
                let e: FailureError = format_err!("Request to non existing endpoint {} {}", method, path)
                    .context(Error::NotFound)
                    .into();
                Box::new(future::err(e))
            }
        }
    }
}

fn to_json<T: Serialize>(item: &T) -> Result<Value, FailureError> {
    serde_json::to_value(item).map_err(|e| FailureError::from(e).context("Serializing response failed").into())
}

/// Serializes `item` keeping only the selected fields
fn serialize<T: Serialize>(fields: &FieldSelector, item: &T) -> Result<Value, FailureError> {
    fields
        .apply(item)
        .map_err(|e| FailureError::from(e).context("Serializing response failed").into())
}

fn serialize_all<T: Serialize>(fields: &FieldSelector, items: &[T]) -> Result<Value, FailureError> {
    items
        .iter()
        .map(|item| serialize(fields, item))
        .collect::<Result<Vec<Value>, FailureError>>()
        .map(Value::Array)
}

/// Serializes a page, fields restrict the items of `results`
fn serialize_page<T: Serialize>(fields: &FieldSelector, page: Page<T>) -> Result<Value, FailureError> {
    page.try_map(|item| serialize(fields, &item)).and_then(|page| to_json(&page))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use hyper::header::{Authorization, Bearer};
    use hyper::{Method, StatusCode, Uri};
    use jsonwebtoken::{encode, Header};
    use tokio_core::reactor::Core;

    use super::utils::Claims;
    use super::*;
    use http::error_response;
    use repos::repo_factory::tests::*;

    fn controller() -> ControllerImpl<MockConnection, MockConnectionManager, ReposFactoryMock> {
        ControllerImpl::new(create_service(None).static_context)
    }

    fn request(method: Method, uri: &str) -> Request {
        Request::new(method, Uri::from_str(uri).unwrap())
    }

    fn authorized(mut req: Request, user_id: UserId) -> Request {
        let token = encode(&Header::default(), &Claims { user_id, exp: 4_102_444_800 }, b"change-me").unwrap();
        req.headers_mut().set(Authorization(Bearer { token }));
        req
    }

    /// Runs the request and renders errors the way `Application` does
    fn run(req: Request) -> JsonResponse {
        let mut core = Core::new().unwrap();
        match core.run(controller().call(req)) {
            Ok(response) => response,
            Err(e) => error_response(&e),
        }
    }

    #[test]
    fn healthcheck() {
        let response = run(request(Method::Get, "/healthcheck"));
        assert_eq!(response, JsonResponse::ok(json!("Ok")));
    }

    #[test]
    fn unknown_route_is_not_found() {
        assert_eq!(run(request(Method::Get, "/api/unknown/")).status, StatusCode::NotFound);
        assert_eq!(run(request(Method::Put, "/api/posts/1")).status, StatusCode::NotFound);
    }

    #[test]
    fn own_posts_require_authentication() {
        assert_eq!(run(request(Method::Get, "/api/posts/")).status, StatusCode::Unauthorized);
        assert_eq!(run(request(Method::Post, "/api/posts/")).status, StatusCode::Unauthorized);
    }

    #[test]
    fn own_posts_are_paginated() {
        let response = run(authorized(request(Method::Get, "/api/posts/?limit=2"), MOCK_USER_ID));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.body["count"], json!(3));
        assert_eq!(response.body["next"], json!("/api/posts/?limit=2&offset=2"));
        assert_eq!(response.body["results"].as_array().map(|r| r.len()), Some(2));
    }

    #[test]
    fn create_post_returns_created() {
        let mut req = authorized(request(Method::Post, "/api/posts/"), MOCK_USER_ID);
        req.set_body(r#"{"title": "Red coupe", "detail": "Fast", "category": "CAR", "attributes": [{"data": {"color": "red"}}]}"#);
        let response = run(req);
        assert_eq!(response.status, StatusCode::Created);
        assert_eq!(response.body["poster"], json!(MOCK_USER_ID));
        assert_eq!(response.body["attributes"], json!([{"data": {"color": "red"}}]));
        assert_eq!(response.body["photos"], json!([]));
    }

    #[test]
    fn malformed_body_is_unprocessable() {
        let mut req = authorized(request(Method::Post, "/api/posts/"), MOCK_USER_ID);
        req.set_body("{not json");
        assert_eq!(run(req).status, StatusCode::UnprocessableEntity);
    }

    #[test]
    fn fields_restrict_post() {
        let response = run(request(Method::Get, "/api/posts/1?fields=title&fields=id"));
        assert_eq!(response.body, json!({"id": 1, "title": "Red sedan"}));
    }

    #[test]
    fn categories_carry_inherited_attributes() {
        let response = run(request(Method::Get, "/api/categories/SUV/?fields=short_name&fields=attributes"));
        assert_eq!(response.body["short_name"], json!("SUV"));
        assert_eq!(response.body["attributes"].as_array().map(|a| a.len()), Some(4));
        assert!(response.body.get("name").is_none());

        let response = run(request(Method::Get, "/api/categories/?fields=name"));
        assert_eq!(response.body[0], json!({"name": "Bikes"}));
    }

    #[test]
    fn search_projects_results_and_keeps_counts() {
        let response = run(request(Method::Get, "/api/search/?cat=CAR&min_mileage=1000&color=red&fields=id"));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.body["count"], json!(2));
        assert_eq!(response.body["results"], json!([{"id": 3}, {"id": 1}]));
        assert_eq!(response.body["category_counts"]["CAR"]["count"], json!(2));
        assert_eq!(response.body["category_counts"]["CAR"]["category"], json!({"short_name": "CAR", "name": "Cars"}));
    }

    #[test]
    fn huge_offset_yields_an_empty_last_page() {
        let response = run(request(Method::Get, "/api/search/?offset=9223372036854775807"));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.body["count"], json!(5));
        assert_eq!(response.body["results"], json!([]));
        assert_eq!(response.body["next"], json!(null));

        let response = run(authorized(request(Method::Get, "/api/posts/?offset=9223372036854775807"), MOCK_USER_ID));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.body["next"], json!(null));
    }

    #[test]
    fn search_in_unknown_category_is_not_found() {
        assert_eq!(run(request(Method::Get, "/api/search/?cat=XXX")).status, StatusCode::NotFound);
    }

    #[test]
    fn photos_need_multipart() {
        let mut req = request(Method::Post, "/api/posts/1/photos/");
        req.set_body("{}");
        assert_eq!(run(req).status, StatusCode::UnprocessableEntity);
    }

    #[test]
    fn photos_are_uploaded() {
        let mut req = request(Method::Post, "/api/posts/1/photos/");
        req.headers_mut().set_raw("Content-Type", "multipart/form-data; boundary=XYZ");
        req.set_body(
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"side.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n\
             abc\r\n\
             --XYZ--\r\n",
        );
        let response = run(req);
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(
            response.body,
            json!([{"image": "https://s3.us-west-2.amazonaws.com/listings-media/post_1/side.jpg"}])
        );
    }
}
