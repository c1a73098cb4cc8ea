//! Module containing post model for query, insert
use chrono::{DateTime, Utc};
use validator::Validate;

use models::{CategoryCode, PostAttributeData, PostPhoto};
use schema::posts;

pub type PostId = i32;
pub type UserId = i32;

/// Post as stored in PG
#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, Clone, PartialEq)]
#[table_name = "posts"]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub detail: String,
    pub poster_id: UserId,
    pub category_id: CategoryCode,
    pub create_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Row for inserting posts, `create_date` is set by the database
#[derive(Serialize, Deserialize, Insertable, Clone, Debug)]
#[table_name = "posts"]
pub struct NewPost {
    pub title: String,
    pub detail: String,
    pub poster_id: UserId,
    pub category_id: CategoryCode,
    pub is_active: bool,
}

/// Request body for creating a post, the poster is always the caller
#[derive(Serialize, Deserialize, Clone, Debug, Validate)]
pub struct NewPostPayload {
    #[validate(length(min = "1", max = "400"))]
    pub title: String,
    pub detail: String,
    pub category: CategoryCode,
    #[serde(default)]
    pub is_active: bool,
    pub attributes: Option<Vec<PostAttributeData>>,
}

impl NewPostPayload {
    pub fn into_new_post(self, poster_id: UserId) -> (NewPost, Vec<PostAttributeData>) {
        let new_post = NewPost {
            title: self.title,
            detail: self.detail,
            poster_id,
            category_id: self.category,
            is_active: self.is_active,
        };
        (new_post, self.attributes.unwrap_or_default())
    }
}

/// Post with nested attributes and photos, the shape every post endpoint returns
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostWithRelations {
    pub id: PostId,
    pub attributes: Vec<PostAttributeData>,
    pub photos: Vec<PostPhoto>,
    pub title: String,
    pub detail: String,
    pub create_date: DateTime<Utc>,
    pub is_active: bool,
    pub poster: UserId,
    pub category: CategoryCode,
}

impl PostWithRelations {
    pub fn new(post: Post, attributes: Vec<PostAttributeData>, photos: Vec<PostPhoto>) -> Self {
        Self {
            id: post.id,
            attributes,
            photos,
            title: post.title,
            detail: post.detail,
            create_date: post.create_date,
            is_active: post.is_active,
            poster: post.poster_id,
            category: post.category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn payload_defaults_and_conversion() {
        let payload: NewPostPayload = serde_json::from_value(json!({
            "title": "Red sedan",
            "detail": "Low mileage",
            "category": "CAR",
            "attributes": [{"data": {"color": "red"}}]
        })).unwrap();
        assert!(!payload.is_active);
        assert!(payload.validate().is_ok());

        let (new_post, attributes) = payload.into_new_post(7);
        assert_eq!(new_post.poster_id, 7);
        assert_eq!(new_post.category_id, "CAR");
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].data, json!({"color": "red"}));
    }

    #[test]
    fn empty_title_is_rejected() {
        let payload = NewPostPayload {
            title: String::new(),
            detail: String::new(),
            category: "CAR".to_string(),
            is_active: false,
            attributes: None,
        };
        assert!(payload.validate().is_err());
    }
}
