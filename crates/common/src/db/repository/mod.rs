//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling and transaction support. Reads go to the
//! replica when one is configured; writes and transactions always use the
//! primary.

mod applications;
mod companies;
mod dashboard;
mod jobs;
mod profiles;
mod users;

pub use applications::{ApplicantRow, ApplicationWithJob};
pub use jobs::JobFilters;

use crate::db::DbPool;
use crate::errors::Result;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr, IntoColumnRef, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
};

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Generic writes
    // ========================================================================

    /// Insert a fully populated row
    pub async fn insert<A>(&self, model: A) -> Result<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        model.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Persist the `Set` columns of an existing row
    pub async fn update<A>(&self, model: A) -> Result<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        model.update(self.write_conn()).await.map_err(Into::into)
    }
}

/// `column ILIKE '%needle%'` with LIKE wildcards in the needle escaped
fn contains_ci<C: IntoColumnRef>(column: C, needle: &str) -> SimpleExpr {
    let escaped = needle
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::col(column).ilike(format!("%{}%", escaped))
}
