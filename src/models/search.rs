//! Search filters over posts.
//!
//! A `SearchFilter` is a plain value describing which posts match. Repos
//! compile it into SQL whenever they evaluate it, so the same filter serves
//! the count, the page and the facet scan of one request.
use std::collections::BTreeMap;

use serde_json;

use models::{CategoryCode, CategoryShort, Page, PostWithRelations, QueryParams};

/// Free text search terms
pub const TEXT_PARAM: &str = "text";
/// Category whose subtree is searched
pub const CATEGORY_PARAM: &str = "cat";
/// Categories excluded from results
pub const EXCLUDED_CATEGORIES_PARAM: &str = "ex_cats";

/// Value of an attribute as read from a request, typed by the attribute schema
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl AttributeValue {
    /// Integer when `raw` parses as one, the raw string otherwise
    pub fn coerce_number(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(AttributeValue::Number)
            .unwrap_or_else(|_| AttributeValue::Text(raw.to_string()))
    }

    /// JSON representation compared against attribute documents
    pub fn to_json(&self) -> serde_json::Value {
        match *self {
            AttributeValue::Number(n) => json!(n),
            AttributeValue::Text(ref s) => json!(s),
            AttributeValue::List(ref values) => json!(values),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// attribute >= value
    Min,
    /// attribute <= value
    Max,
}

/// Predicate over the value stored at `key` in a post attribute document
#[derive(Debug, Clone, PartialEq)]
pub enum AttributePredicate {
    Equals { key: String, value: AttributeValue },
    /// Matches when the stored value equals one of `values`, an empty set matches everything
    OneOf { key: String, values: Vec<AttributeValue> },
    Range { key: String, bound: RangeBound, value: AttributeValue },
}

impl AttributePredicate {
    pub fn key(&self) -> &str {
        match *self {
            AttributePredicate::Equals { ref key, .. }
            | AttributePredicate::OneOf { ref key, .. }
            | AttributePredicate::Range { ref key, .. } => key,
        }
    }
}

/// Composite filter over posts, every present part must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Full text terms matched against title and detail
    pub text: Option<String>,
    /// Posts must belong to one of these categories
    pub categories: Option<Vec<CategoryCode>>,
    /// Posts must not belong to any of these categories
    pub excluded_categories: Vec<CategoryCode>,
    pub attributes: Vec<AttributePredicate>,
    /// Restrict to posts of one user
    pub poster_id: Option<i32>,
}

/// Reserved search parameters split off the raw query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub text: Option<String>,
    pub category: Option<CategoryCode>,
    pub excluded_categories: Option<Vec<CategoryCode>>,
    /// Everything that was not reserved, resolved against the attribute schema
    pub attributes: QueryParams,
}

impl SearchParams {
    /// Removes the reserved parameters from `params`. Text values are joined with
    /// single spaces, an empty first text value disables text search.
    pub fn extract(mut params: QueryParams) -> Self {
        let category = params.remove(CATEGORY_PARAM).and_then(|values| values.into_iter().next());
        let excluded_categories = params.remove(EXCLUDED_CATEGORIES_PARAM);
        let text = params.remove(TEXT_PARAM).and_then(|values| {
            let non_empty = values.first().map(|first| !first.is_empty()).unwrap_or(false);
            if non_empty {
                Some(values.join(" "))
            } else {
                None
            }
        });

        Self {
            text,
            category,
            excluded_categories,
            attributes: params,
        }
    }
}

/// Facet entry for one category
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: CategoryShort,
    pub count: u64,
}

/// Paginated search results with per-category counts
#[derive(Debug, Serialize, Clone)]
pub struct SearchResults<T = PostWithRelations> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub category_counts: BTreeMap<CategoryCode, CategoryCount>,
}

impl<T> SearchResults<T> {
    /// Converts every result, keeping counts and links
    pub fn try_map<U, E, F>(self, f: F) -> Result<SearchResults<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(SearchResults {
            page: self.page.try_map(f)?,
            category_counts: self.category_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_splits_reserved_params() {
        let params = QueryParams::parse("cat=CAR&cat=BIK&ex_cats=SUV&ex_cats=HOM&text=red&text=sedan&color=red");
        let search = SearchParams::extract(params);
        assert_eq!(search.category, Some("CAR".to_string()));
        assert_eq!(search.excluded_categories, Some(vec!["SUV".to_string(), "HOM".to_string()]));
        assert_eq!(search.text, Some("red sedan".to_string()));
        assert_eq!(search.attributes.names(), vec!["color"]);
    }

    #[test]
    fn empty_text_disables_text_search() {
        let search = SearchParams::extract(QueryParams::parse("text=&text=sedan"));
        assert_eq!(search.text, None);
        assert!(!search.attributes.contains("text"));
    }

    #[test]
    fn numbers_are_coerced_when_possible() {
        assert_eq!(AttributeValue::coerce_number("1000"), AttributeValue::Number(1000));
        assert_eq!(AttributeValue::coerce_number("2018-01-01"), AttributeValue::Text("2018-01-01".to_string()));
        assert_eq!(AttributeValue::List(vec!["a".to_string()]).to_json(), json!(["a"]));
    }
}
