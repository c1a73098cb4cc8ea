//! Photos attached to posts
use models::{Post, PostId};
use schema::post_images;

#[derive(Debug, Serialize, Deserialize, Associations, Queryable, Identifiable, Clone, PartialEq)]
#[belongs_to(Post)]
#[table_name = "post_images"]
pub struct PostImage {
    pub id: i32,
    pub post_id: PostId,
    /// Public URL of the stored object
    pub image: String,
}

#[derive(Serialize, Deserialize, Insertable, Clone, Debug)]
#[table_name = "post_images"]
pub struct NewPostImage {
    pub post_id: PostId,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PostPhoto {
    pub image: String,
}

impl From<PostImage> for PostPhoto {
    fn from(img: PostImage) -> Self {
        Self { image: img.image }
    }
}

/// File received in a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Object key for an uploaded photo, namespaced by post
pub fn image_key(post_id: PostId, filename: &str) -> String {
    format!("post_{}/{}", post_id, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_post() {
        assert_eq!(image_key(42, "front.jpg"), "post_42/front.jpg");
    }
}
