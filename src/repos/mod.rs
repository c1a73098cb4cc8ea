//! Repos is a module responsible for interacting with postgres db

pub mod categories;
pub mod category_attributes;
pub mod post_attributes;
pub mod post_images;
pub mod posts;
pub mod repo_factory;
pub mod types;

pub use self::categories::*;
pub use self::category_attributes::*;
pub use self::post_attributes::*;
pub use self::post_images::*;
pub use self::posts::*;
pub use self::repo_factory::*;
pub use self::types::*;
