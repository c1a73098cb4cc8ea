//! Categories repo, read access to the category table
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use super::types::RepoResult;
use models::Category;
use schema::categories::dsl::*;

pub trait CategoriesRepo {
    /// Returns every category ordered by name
    fn list(&self) -> RepoResult<Vec<Category>>;

    /// Find specific category by code
    fn find(&self, code: &str) -> RepoResult<Option<Category>>;
}

/// Categories repository, responsible for handling categories
pub struct CategoriesRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
}

impl<'a, T> CategoriesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    pub fn new(db_conn: &'a T) -> Self {
        Self { db_conn }
    }
}

impl<'a, T> CategoriesRepo for CategoriesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    fn list(&self) -> RepoResult<Vec<Category>> {
        debug!("List all categories");
        categories
            .order((name, short_name))
            .get_results(self.db_conn)
            .map_err(|e| FailureError::from(e).context("List categories error occurred").into())
    }

    fn find(&self, code: &str) -> RepoResult<Option<Category>> {
        debug!("Find category {}", code);
        categories
            .find(code)
            .get_result(self.db_conn)
            .optional()
            .map_err(|e| FailureError::from(e).context(format!("Find category {} error occurred", code)).into())
    }
}
