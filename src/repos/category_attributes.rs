use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_dsl::RunQueryDsl;
use diesel::Connection;
use failure::Error as FailureError;

use super::types::RepoResult;
use models::CategoryAttribute;
use schema::category_attributes::dsl::*;

pub trait CategoryAttributesRepo {
    /// Every declared attribute, ordered by id
    fn list(&self) -> RepoResult<Vec<CategoryAttribute>>;
}

/// Category attributes repository
pub struct CategoryAttributesRepoImpl<'a, T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> {
    pub db_conn: &'a T,
}

impl<'a, T> CategoryAttributesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    pub fn new(db_conn: &'a T) -> Self {
        Self { db_conn }
    }
}

impl<'a, T> CategoryAttributesRepo for CategoryAttributesRepoImpl<'a, T>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
{
    fn list(&self) -> RepoResult<Vec<CategoryAttribute>> {
        debug!("List all category attributes");
        category_attributes
            .order(id)
            .get_results(self.db_conn)
            .map_err(|e| FailureError::from(e).context("List category attributes error occurred").into())
    }
}
