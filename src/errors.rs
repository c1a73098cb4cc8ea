use hyper::StatusCode;
use serde_json;
use validator::ValidationErrors;

/// Error kinds that can be attached as context anywhere in a `failure::Error` chain.
/// The http layer looks for the first one of them to decide on the response code.
#[derive(Debug, Clone, Fail)]
pub enum Error {
    #[fail(display = "Not found")]
    NotFound,
    #[fail(display = "Parse error")]
    Parse,
    #[fail(display = "Validation error")]
    Validate(ValidationErrors),
    #[fail(display = "Unauthorized")]
    Unauthorized,
    #[fail(display = "Category tree contains a cycle")]
    CategoryCycle,
    #[fail(display = "R2D2 connection error")]
    Connection,
    #[fail(display = "Object storage error")]
    Storage,
}

impl Error {
    pub fn code(&self) -> StatusCode {
        match *self {
            Error::NotFound => StatusCode::NotFound,
            Error::Parse => StatusCode::UnprocessableEntity,
            Error::Validate(_) => StatusCode::BadRequest,
            Error::Unauthorized => StatusCode::Unauthorized,
            Error::CategoryCycle | Error::Connection | Error::Storage => StatusCode::InternalServerError,
        }
    }

    /// Field errors for the response body, only validation errors carry them
    pub fn payload(&self) -> Option<serde_json::Value> {
        match *self {
            Error::Validate(ref errors) => serde_json::to_value(errors).ok(),
            _ => None,
        }
    }
}
