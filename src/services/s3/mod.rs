//! Photo storage. Post photos live as public objects under `post_<id>/`
//! in one bucket, and posts keep their public URLs.

pub mod client;
pub mod credentials;
pub mod error;

use std::sync::Arc;

use failure::Error as FailureError;
use futures::future::Future;
use rusoto_core::request::HttpClient;
use rusoto_core::Region;
use rusoto_s3::S3Client as CrateS3Client;

use self::client::S3Client;
use self::error::S3Error;
use config;
use models::{image_key, PostId, UploadedFile};

#[derive(Clone)]
pub struct S3 {
    inner: Arc<S3Client>,
    region: Region,
    bucket: String,
}

impl S3 {
    /// Create s3 service
    ///
    /// * `bucket` - AWS s3 bucket name
    /// * `client` - client that implements S3Client trait
    pub fn new<B>(region: Region, bucket: B, client: Box<S3Client>) -> Self
    where
        B: ToString,
    {
        Self {
            inner: client.into(),
            region,
            bucket: bucket.to_string(),
        }
    }

    /// Create s3 service backed by rusoto from the `s3` config section
    pub fn from_config(config: &config::S3) -> Result<Self, FailureError> {
        let region = config
            .region
            .parse::<Region>()
            .map_err(|e| format_err!("Invalid S3 region {}: {}", config.region, e))?;
        let credentials = credentials::Credentials::from_config(config);
        let client = HttpClient::new().map_err(|e| format_err!("Failed to create S3 http client: {}", e))?;
        Ok(Self::new(
            region.clone(),
            &config.bucket,
            Box::new(CrateS3Client::new_with(client, credentials, region)),
        ))
    }

    /// Public URL of the object stored under `key`
    pub fn public_url(&self, key: &str) -> String {
        format!("https://s3.{}.amazonaws.com/{}/{}", self.region.name(), self.bucket, key)
    }

    /// Uploads a photo of `post_id`, resolving to its public URL
    pub fn upload_image(&self, post_id: PostId, file: UploadedFile) -> Box<Future<Item = String, Error = S3Error>> {
        let key = image_key(post_id, &file.filename);
        let url = self.public_url(&key);
        info!("Uploading {} bytes to {}", file.bytes.len(), url);

        Box::new(self.inner.put_photo(self.bucket.clone(), key, file).map(move |_| url))
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::{Arc, Mutex};

    use futures::future;
    use tokio_core::reactor::Core;

    use super::*;

    /// Keeps uploaded keys in memory
    #[derive(Clone, Default)]
    pub struct S3ClientMock {
        pub uploads: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl S3Client for S3ClientMock {
        fn put_photo(&self, bucket: String, key: String, _photo: UploadedFile) -> Box<Future<Item = (), Error = S3Error>> {
            if let Ok(mut uploads) = self.uploads.lock() {
                uploads.push((bucket, key));
            }
            Box::new(future::ok(()))
        }
    }

    pub fn create_mock_s3(client: S3ClientMock) -> S3 {
        S3::new(Region::UsWest2, "listings-media", Box::new(client))
    }

    #[test]
    fn unknown_region_is_rejected() {
        let mut s3_config = config::Config::with_env("test").unwrap().s3;
        s3_config.region = "moon-1".to_string();
        assert!(S3::from_config(&s3_config).is_err());
    }

    #[test]
    fn upload_resolves_to_public_url() {
        let client = S3ClientMock::default();
        let s3 = create_mock_s3(client.clone());
        let file = UploadedFile {
            filename: "front.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![1, 2, 3],
        };

        let mut core = Core::new().unwrap();
        let url = core.run(s3.upload_image(7, file)).unwrap();

        assert_eq!(url, "https://s3.us-west-2.amazonaws.com/listings-media/post_7/front.jpg");
        assert_eq!(
            *client.uploads.lock().unwrap(),
            vec![("listings-media".to_string(), "post_7/front.jpg".to_string())]
        );
    }
}
