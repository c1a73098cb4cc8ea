//! Services is a core layer for the app business logic like
//! validation, tree resolution and storage.

pub mod categories;
pub mod posts;
pub mod s3;
pub mod search;
pub mod types;

pub use self::categories::*;
pub use self::posts::*;
pub use self::search::*;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use futures::Future;
use r2d2::{ManageConnection, PooledConnection};

use controller::context::{DynamicContext, StaticContext};
use errors::Error;
use models::UserId;
use repos::ReposFactory;

use self::types::ServiceFuture;

/// Service
pub struct Service<
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
> {
    pub static_context: StaticContext<T, M, F>,
    pub dynamic_context: DynamicContext,
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > Service<T, M, F>
{
    /// Create a new service
    pub fn new(static_context: StaticContext<T, M, F>, dynamic_context: DynamicContext) -> Self {
        Self {
            static_context,
            dynamic_context,
        }
    }

    /// Runs `f` with a pooled connection on the cpu pool
    pub fn spawn_on_pool<R, Func>(&self, f: Func) -> ServiceFuture<R>
    where
        Func: FnOnce(PooledConnection<M>) -> Result<R, FailureError> + Send + 'static,
        R: Send + 'static,
    {
        let db_pool = self.static_context.db_pool.clone();
        let cpu_pool = self.static_context.cpu_pool.clone();
        Box::new(
            cpu_pool.spawn_fn(move || {
                db_pool
                    .get()
                    .map_err(|e| FailureError::from(e).context(Error::Connection).into())
                    .and_then(f)
            }),
        )
    }

    /// Id of the authenticated caller, the request is rejected without one
    pub fn current_user(&self) -> Result<UserId, FailureError> {
        self.dynamic_context
            .user_id
            .ok_or_else(|| format_err!("Authentication credentials were not provided").context(Error::Unauthorized).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repos::repo_factory::tests::*;

    #[test]
    fn anonymous_caller_is_unauthorized() {
        let service = create_service(None);
        let err = service.current_user().unwrap_err();
        assert!(err.iter_chain().any(|fail| fail.to_string() == Error::Unauthorized.to_string()));
    }

    #[test]
    fn authenticated_caller_is_known() {
        let service = create_service(Some(MOCK_USER_ID));
        assert_eq!(service.current_user().unwrap(), MOCK_USER_ID);
    }
}
