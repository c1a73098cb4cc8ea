//! Listing taxonomy categories
use models::CategoryAttribute;
use schema::categories;

/// Category code, the primary key of a category
pub type CategoryCode = String;

/// Category as stored in PG
#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, Identifiable, Clone, PartialEq)]
#[table_name = "categories"]
#[primary_key(short_name)]
pub struct Category {
    pub short_name: CategoryCode,
    pub name: String,
    pub parent_category: Option<CategoryCode>,
}

/// Category with its inherited attribute schema, own attributes first
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategoryWithAttributes {
    pub short_name: CategoryCode,
    pub name: String,
    pub parent_category: Option<CategoryCode>,
    pub attributes: Vec<CategoryAttribute>,
}

impl CategoryWithAttributes {
    pub fn new(category: Category, attributes: Vec<CategoryAttribute>) -> Self {
        Self {
            short_name: category.short_name,
            name: category.name,
            parent_category: category.parent_category,
            attributes,
        }
    }
}

/// Short category representation used in facet counts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CategoryShort {
    pub short_name: CategoryCode,
    pub name: String,
}

impl<'a> From<&'a Category> for CategoryShort {
    fn from(cat: &'a Category) -> Self {
        Self {
            short_name: cat.short_name.clone(),
            name: cat.name.clone(),
        }
    }
}
