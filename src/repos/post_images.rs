use diesel;
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use super::types::RepoResult;
use models::{NewPostImage, PostId, PostImage};
use schema::post_images::dsl::*;

pub trait PostImagesRepo {
    /// Stores image references of a post
    fn create_many(&self, payload: Vec<NewPostImage>) -> RepoResult<Vec<PostImage>>;

    /// Images of the given posts, ordered by id
    fn find_by_posts(&self, post_ids: Vec<PostId>) -> RepoResult<Vec<PostImage>>;
}

/// Post images repository
pub struct PostImagesRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
}

impl<'a, T> PostImagesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    pub fn new(db_conn: &'a T) -> Self {
        Self { db_conn }
    }
}

impl<'a, T> PostImagesRepo for PostImagesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    fn create_many(&self, payload: Vec<NewPostImage>) -> RepoResult<Vec<PostImage>> {
        if payload.is_empty() {
            return Ok(vec![]);
        }
        debug!("Create post images {:?}.", payload);
        diesel::insert_into(post_images)
            .values(&payload)
            .get_results(self.db_conn)
            .map_err(|e| {
                FailureError::from(e)
                    .context(format!("Create post images {:?} error occurred", payload))
                    .into()
            })
    }

    fn find_by_posts(&self, post_ids: Vec<PostId>) -> RepoResult<Vec<PostImage>> {
        post_images
            .filter(post_id.eq_any(post_ids))
            .order(id)
            .get_results(self.db_conn)
            .map_err(|e| FailureError::from(e).context("Find post images error occurred").into())
    }
}
