//! Hyper `Service` that drives a `Controller` and turns its results into
//! JSON responses
use std::sync::Arc;

use futures::future;
use futures::Future;
use hyper;
use hyper::header::{AccessControlAllowOrigin, ContentLength, ContentType};
use hyper::server::{Request, Response, Service};
use sentry::integrations::failure::capture_error;
use serde_json;

use super::{error_response, Controller, JsonResponse};

pub struct Application<C: Controller> {
    controller: C,
    allowed_origins: Arc<Vec<String>>,
}

impl<C: Controller> Application<C> {
    pub fn new(controller: C, allowed_origins: Arc<Vec<String>>) -> Self {
        Self {
            controller,
            allowed_origins,
        }
    }

    /// Origin of the request when it may read the response
    fn allowed_origin(&self, req: &Request) -> Option<String> {
        req.headers()
            .get_raw("Origin")
            .and_then(|raw| raw.one())
            .and_then(|bytes| ::std::str::from_utf8(bytes).ok())
            .filter(|origin| self.allowed_origins.iter().any(|allowed| allowed == origin))
            .map(|origin| origin.to_string())
    }
}

impl<C: Controller> Service for Application<C> {
    type Request = Request;
    type Response = Response;
    type Error = hyper::Error;
    type Future = Box<Future<Item = Response, Error = hyper::Error>>;

    fn call(&self, req: Request) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_string();
        let origin = self.allowed_origin(&req);
        debug!("Received request {} {}", method, path);

        Box::new(self.controller.call(req).then(move |result| {
            let response = match result {
                Ok(response) => {
                    info!("{} {} -> {}", method, path, response.status);
                    response
                }
                Err(err) => {
                    let response = error_response(&err);
                    let chain = err.iter_chain().map(|fail| fail.to_string()).collect::<Vec<_>>().join(" | ");
                    if response.status.is_server_error() {
                        error!("{} {} -> {}: {}", method, path, response.status, chain);
                        capture_error(&err);
                    } else {
                        info!("{} {} -> {}: {}", method, path, response.status, chain);
                    }
                    response
                }
            };
            future::ok(render(response, origin))
        }))
    }
}

fn render(response: JsonResponse, origin: Option<String>) -> Response {
    let body = serde_json::to_string(&response.body).unwrap_or_else(|_| "null".to_string());
    let mut res = Response::new()
        .with_status(response.status)
        .with_header(ContentType::json())
        .with_header(ContentLength(body.len() as u64));
    if let Some(origin) = origin {
        res.headers_mut().set(AccessControlAllowOrigin::Value(origin));
    }
    res.with_body(body)
}
