use rusoto_s3::PutObjectError;

/// Failure to store a photo
#[derive(Debug, Fail)]
pub enum S3Error {
    #[fail(display = "Photo storage refused credentials: {}", _0)]
    Credentials(String),
    #[fail(display = "Photo storage is unreachable: {}", _0)]
    Unreachable(String),
    #[fail(display = "Photo storage rejected the upload: {}", _0)]
    Rejected(String),
    #[fail(display = "Photo storage failed: {}", _0)]
    Unknown(String),
}

impl From<PutObjectError> for S3Error {
    fn from(e: PutObjectError) -> Self {
        match e {
            PutObjectError::HttpDispatch(err) => S3Error::Unreachable(err.to_string()),
            PutObjectError::Credentials(err) => S3Error::Credentials(err.to_string()),
            PutObjectError::Validation(message) => S3Error::Rejected(message),
            PutObjectError::Unknown(response) => S3Error::Unknown(format!("{:?}", response)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_rejections() {
        let err = S3Error::from(PutObjectError::Validation("Bucket name is empty".to_string()));
        assert_eq!(err.to_string(), "Photo storage rejected the upload: Bucket name is empty");
    }
}
