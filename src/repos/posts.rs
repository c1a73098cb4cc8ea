//! Posts repo. Search filters are compiled into boxed diesel expressions on
//! every call, so one `SearchFilter` can back a count, a page and a facet scan.
use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::sql_types::{Array, Bool, Jsonb, Text};
use diesel::Connection;
use failure::Error as FailureError;
use serde_json::Value;

use super::types::RepoResult;
use models::{AttributePredicate, CategoryCode, NewPost, PageRequest, Post, PostId, RangeBound, SearchFilter};
use schema::posts::dsl::*;

type BoxedExpr = Box<BoxableExpression<posts, Pg, SqlType = Bool>>;

const ATTRIBUTE_EXISTS: &str =
    "EXISTS (SELECT 1 FROM post_attributes WHERE post_attributes.post_id = posts.id AND (post_attributes.data -> ";

pub trait PostsRepo {
    /// Creates new post
    fn create(&self, payload: NewPost) -> RepoResult<Post>;

    /// Find specific post by id
    fn find(&self, post_id: PostId) -> RepoResult<Option<Post>>;

    /// Page of posts matching `filter`, newest first
    fn search(&self, filter: &SearchFilter, page: PageRequest) -> RepoResult<Vec<Post>>;

    /// Number of posts matching `filter`
    fn count(&self, filter: &SearchFilter) -> RepoResult<i64>;

    /// Category code of every post matching `filter`
    fn matched_categories(&self, filter: &SearchFilter) -> RepoResult<Vec<CategoryCode>>;
}

/// Posts repository, responsible for handling posts
pub struct PostsRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
}

impl<'a, T> PostsRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    pub fn new(db_conn: &'a T) -> Self {
        Self { db_conn }
    }
}

impl<'a, T> PostsRepo for PostsRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    fn create(&self, payload: NewPost) -> RepoResult<Post> {
        debug!("Create post {:?}.", payload);
        diesel::insert_into(posts)
            .values(&payload)
            .get_result::<Post>(self.db_conn)
            .map_err(|e| {
                FailureError::from(e)
                    .context(format!("Create new post {:?} error occurred", payload))
                    .into()
            })
    }

    fn find(&self, post_id: PostId) -> RepoResult<Option<Post>> {
        posts
            .find(post_id)
            .get_result(self.db_conn)
            .optional()
            .map_err(|e| FailureError::from(e).context(format!("Find post {} error occurred", post_id)).into())
    }

    fn search(&self, filter: &SearchFilter, page: PageRequest) -> RepoResult<Vec<Post>> {
        debug!("Search posts by {:?}, {:?}", filter, page);
        posts
            .filter(filter_expression(filter))
            .order((create_date.desc(), id.desc()))
            .limit(page.limit)
            .offset(page.offset)
            .get_results(self.db_conn)
            .map_err(|e| {
                FailureError::from(e)
                    .context(format!("Search posts by {:?} error occurred", filter))
                    .into()
            })
    }

    fn count(&self, filter: &SearchFilter) -> RepoResult<i64> {
        posts
            .filter(filter_expression(filter))
            .count()
            .get_result(self.db_conn)
            .map_err(|e| {
                FailureError::from(e)
                    .context(format!("Count posts by {:?} error occurred", filter))
                    .into()
            })
    }

    fn matched_categories(&self, filter: &SearchFilter) -> RepoResult<Vec<CategoryCode>> {
        posts
            .filter(filter_expression(filter))
            .select(category_id)
            .get_results(self.db_conn)
            .map_err(|e| {
                FailureError::from(e)
                    .context(format!("Collect categories of posts by {:?} error occurred", filter))
                    .into()
            })
    }
}

/// Conjunction of every part of `filter`, an empty filter matches all posts
pub fn filter_expression(filter: &SearchFilter) -> BoxedExpr {
    let mut query: BoxedExpr = Box::new(id.eq(id));

    if let Some(ref terms) = filter.text {
        query = Box::new(query.and(full_text_expression(terms)));
    }

    if let Some(ref codes) = filter.categories {
        query = Box::new(query.and(category_id.eq_any(codes.clone())));
    }

    if !filter.excluded_categories.is_empty() {
        query = Box::new(query.and(category_id.ne_all(filter.excluded_categories.clone())));
    }

    if let Some(poster) = filter.poster_id {
        query = Box::new(query.and(poster_id.eq(poster)));
    }

    for predicate in &filter.attributes {
        query = Box::new(query.and(attribute_expression(predicate)));
    }

    query
}

fn full_text_expression(terms: &str) -> BoxedExpr {
    Box::new(
        sql::<Bool>("to_tsvector('english', posts.title || ' ' || posts.detail) @@ plainto_tsquery('english', ")
            .bind::<Text, _>(terms.to_string())
            .sql(")"),
    )
}

/// Holds when some attribute document of the post satisfies `predicate`
fn attribute_expression(predicate: &AttributePredicate) -> BoxedExpr {
    match *predicate {
        AttributePredicate::Equals { ref key, ref value } => compare_expression(key, "=", value.to_json()),
        AttributePredicate::Range { ref key, bound, ref value } => {
            let operator = match bound {
                RangeBound::Min => ">=",
                RangeBound::Max => "<=",
            };
            compare_expression(key, operator, value.to_json())
        }
        AttributePredicate::OneOf { ref key, ref values } => {
            if values.is_empty() {
                return Box::new(sql::<Bool>("TRUE"));
            }
            let values: Vec<Value> = values.iter().map(|value| value.to_json()).collect();
            Box::new(
                sql::<Bool>(ATTRIBUTE_EXISTS)
                    .bind::<Text, _>(key.clone())
                    .sql(") = ANY(")
                    .bind::<Array<Jsonb>, _>(values)
                    .sql("))"),
            )
        }
    }
}

fn compare_expression(key: &str, operator: &str, value: Value) -> BoxedExpr {
    Box::new(
        sql::<Bool>(ATTRIBUTE_EXISTS)
            .bind::<Text, _>(key.to_string())
            .sql(&format!(") {} ", operator))
            .bind::<Jsonb, _>(value)
            .sql(")"),
    )
}
