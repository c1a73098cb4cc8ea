//! Contexts shared by controller and services
use std::marker::PhantomData;
use std::sync::Arc;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use futures_cpupool::CpuPool;
use r2d2::{ManageConnection, Pool};

use super::routes::Route;
use config::Config;
use http::router::RouteParser;
use models::UserId;
use repos::repo_factory::ReposFactory;
use services::s3::S3;

/// Static context for all app
pub struct StaticContext<T, M, F>
where
    T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
    M: ManageConnection<Connection = T>,
    F: ReposFactory<T>,
{
    pub db_pool: Pool<M>,
    pub cpu_pool: CpuPool,
    pub config: Arc<Config>,
    pub route_parser: Arc<RouteParser<Route>>,
    pub repo_factory: F,
    pub s3: Arc<S3>,
    connection: PhantomData<fn() -> T>,
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > StaticContext<T, M, F>
{
    /// Create a new static context
    pub fn new(db_pool: Pool<M>, cpu_pool: CpuPool, config: Arc<Config>, repo_factory: F, s3: Arc<S3>) -> Self {
        let route_parser = Arc::new(super::routes::create_route_parser());
        Self {
            db_pool,
            cpu_pool,
            config,
            route_parser,
            repo_factory,
            s3,
            connection: PhantomData,
        }
    }
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > Clone for StaticContext<T, M, F>
{
    fn clone(&self) -> Self {
        Self {
            db_pool: self.db_pool.clone(),
            cpu_pool: self.cpu_pool.clone(),
            config: self.config.clone(),
            route_parser: self.route_parser.clone(),
            repo_factory: self.repo_factory.clone(),
            s3: self.s3.clone(),
            connection: PhantomData,
        }
    }
}

/// Dynamic context for each request
#[derive(Clone, Debug, Default)]
pub struct DynamicContext {
    pub user_id: Option<UserId>,
}

impl DynamicContext {
    /// Create a new dynamic context for each request
    pub fn new(user_id: Option<UserId>) -> Self {
        Self { user_id }
    }
}
