//! Http plumbing shared by the controller: route parsing, the hyper
//! `Service` wrapping a controller and error to response mapping.

pub mod application;
pub mod router;

use failure::{Context, Error as FailureError};
use futures::Future;
use hyper::server::Request;
use hyper::StatusCode;
use serde_json::Value;

use errors::Error;

/// Controller output, serialized by `Application`
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl JsonResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: StatusCode::Ok, body }
    }

    pub fn created(body: Value) -> Self {
        Self {
            status: StatusCode::Created,
            body,
        }
    }
}

pub type ControllerFuture = Box<Future<Item = JsonResponse, Error = FailureError>>;

pub trait Controller {
    fn call(&self, request: Request) -> ControllerFuture;
}

/// First error kind attached anywhere in the causal chain of `err`
pub fn error_kind(err: &FailureError) -> Option<Error> {
    err.iter_chain()
        .filter_map(|fail| {
            fail.downcast_ref::<Error>()
                .cloned()
                .or_else(|| fail.downcast_ref::<Context<Error>>().map(|ctx| ctx.get_context().clone()))
        })
        .next()
}

/// Status and body for a failed request, unknown errors become 500
pub fn error_response(err: &FailureError) -> JsonResponse {
    let (status, description, payload) = match error_kind(err) {
        Some(kind) => (kind.code(), kind.to_string(), kind.payload()),
        None => (StatusCode::InternalServerError, "Internal server error".to_string(), None),
    };
    JsonResponse {
        status,
        body: json!({
            "code": status.as_u16(),
            "description": description,
            "payload": payload,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn kind_is_found_deep_in_the_chain() {
        let err: FailureError = format_err!("Post 7 not found").context(Error::NotFound).into();
        let err: FailureError = err.context("PostsService, get_post error occurred.").into();
        assert_eq!(error_response(&err).status, StatusCode::NotFound);
        assert_eq!(error_response(&err).body["code"], json!(404));
    }

    #[test]
    fn plain_kind_is_mapped_too() {
        let err: FailureError = Error::Unauthorized.into();
        assert_eq!(error_response(&err).status, StatusCode::Unauthorized);
    }

    #[test]
    fn validation_payload_is_exposed() {
        let mut errors = ValidationErrors::new();
        errors.add("category", ValidationError::new("does_not_exist"));
        let err: FailureError = format_err!("invalid").context(Error::Validate(errors)).into();
        let response = error_response(&err);
        assert_eq!(response.status, StatusCode::BadRequest);
        assert!(response.body["payload"]["category"].is_array());
    }

    #[test]
    fn unknown_errors_are_internal() {
        let err = format_err!("boom");
        let response = error_response(&err);
        assert_eq!(response.status, StatusCode::InternalServerError);
        assert_eq!(response.body["payload"], Value::Null);
    }
}
