//! SQLite persistence layer for the blog generation backend.
//!
//! Provides the connection pool, migrations, models, and free-function
//! query modules per entity.

pub mod analytics;
pub mod engagement;
pub mod error;
pub mod job;
pub mod models;
pub mod persona;
pub mod post;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

pub use error::{DatabaseError, Result};
pub use models::{
    Engagement, EngagementAction, Job, JobStatus, Persona, Post, PostStatus, SourceCitation,
};

const DEFAULT_POOL_SIZE: u32 = 20;

/// Database handle wrapping a SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database at the given URL, creating the file if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, DEFAULT_POOL_SIZE).await
    }

    /// Connect with an explicit pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!(url = %url, "connected to database");

        Ok(Self { pool })
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect in-memory db");
    db.migrate().await.expect("run migrations");
    db
}
