use futures::future::{ok, FutureResult};
use rusoto_core::credential::{AwsCredentials, CredentialsError};
use rusoto_core::ProvideAwsCredentials;

use config;

/// Fixed key pair from the `s3` config section
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn from_config(config: &config::S3) -> Self {
        Self {
            key: config.key.clone(),
            secret: config.secret.clone(),
        }
    }
}

impl ProvideAwsCredentials for Credentials {
    type Future = FutureResult<AwsCredentials, CredentialsError>;

    fn credentials(&self) -> Self::Future {
        ok(AwsCredentials::new(self.key.clone(), self.secret.clone(), None, None))
    }
}
