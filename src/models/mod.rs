//! Models contains all structures that are used in different
//! modules of the app

pub mod attribute_schema;
pub mod category;
pub mod category_attribute;
pub mod category_tree;
pub mod fields;
pub mod pagination;
pub mod post;
pub mod post_attribute;
pub mod post_image;
pub mod query_params;
pub mod search;

pub use self::attribute_schema::*;
pub use self::category::*;
pub use self::category_attribute::*;
pub use self::category_tree::*;
pub use self::fields::*;
pub use self::pagination::*;
pub use self::post::*;
pub use self::post_attribute::*;
pub use self::post_image::*;
pub use self::query_params::*;
pub use self::search::*;
