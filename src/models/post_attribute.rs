//! Free-form attribute documents attached to posts
use serde_json;

use models::{Post, PostId};
use schema::post_attributes;

#[derive(Debug, Serialize, Deserialize, Associations, Queryable, Identifiable, Clone, PartialEq)]
#[belongs_to(Post)]
#[table_name = "post_attributes"]
pub struct PostAttribute {
    pub id: i32,
    pub post_id: PostId,
    pub data: serde_json::Value,
}

#[derive(Serialize, Deserialize, Insertable, Clone, Debug)]
#[table_name = "post_attributes"]
pub struct NewPostAttribute {
    pub post_id: PostId,
    pub data: serde_json::Value,
}

/// Attribute document as it appears nested under a post
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PostAttributeData {
    pub data: serde_json::Value,
}

impl From<PostAttribute> for PostAttributeData {
    fn from(attr: PostAttribute) -> Self {
        Self { data: attr.data }
    }
}
