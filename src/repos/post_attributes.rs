use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use super::types::RepoResult;
use models::{NewPostAttribute, PostAttribute, PostId};
use schema::post_attributes::dsl::*;

pub trait PostAttributesRepo {
    /// Stores attribute documents of a post
    fn create_many(&self, payload: Vec<NewPostAttribute>) -> RepoResult<Vec<PostAttribute>>;

    /// Attribute documents of the given posts, ordered by id
    fn find_by_posts(&self, post_ids: Vec<PostId>) -> RepoResult<Vec<PostAttribute>>;
}

/// Post attributes repository
pub struct PostAttributesRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
}

impl<'a, T> PostAttributesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    pub fn new(db_conn: &'a T) -> Self {
        Self { db_conn }
    }
}

impl<'a, T> PostAttributesRepo for PostAttributesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    fn create_many(&self, payload: Vec<NewPostAttribute>) -> RepoResult<Vec<PostAttribute>> {
        if payload.is_empty() {
            return Ok(vec![]);
        }
        debug!("Create post attributes {:?}.", payload);
        diesel::insert_into(post_attributes)
            .values(&payload)
            .get_results(self.db_conn)
            .map_err(|e| {
                FailureError::from(e)
                    .context(format!("Create post attributes {:?} error occurred", payload))
                    .into()
            })
    }

    fn find_by_posts(&self, post_ids: Vec<PostId>) -> RepoResult<Vec<PostAttribute>> {
        post_attributes
            .filter(post_id.eq_any(post_ids))
            .order(id)
            .get_results(self.db_conn)
            .map_err(|e| FailureError::from(e).context("Find post attributes error occurred").into())
    }
}
