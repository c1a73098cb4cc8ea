//! Object storage seam used by photo uploads

use futures::prelude::*;
use rusoto_s3::{PutObjectRequest, S3Client as CrateS3Client, StreamingBody, S3};

use super::error::S3Error;
use models::UploadedFile;

pub trait S3Client: Send + Sync + 'static {
    /// Stores `photo` under `key`, readable by anyone holding its URL
    fn put_photo(&self, bucket: String, key: String, photo: UploadedFile) -> Box<Future<Item = (), Error = S3Error>>;
}

impl S3Client for CrateS3Client {
    fn put_photo(&self, bucket: String, key: String, photo: UploadedFile) -> Box<Future<Item = (), Error = S3Error>> {
        let request = PutObjectRequest {
            acl: Some("public-read".to_string()),
            content_length: Some(photo.bytes.len() as i64),
            content_type: photo.content_type,
            body: Some(StreamingBody::from(photo.bytes)),
            bucket,
            key,
            ..Default::default()
        };

        Box::new(self.put_object(request).map(|_| ()).map_err(S3Error::from))
    }
}
