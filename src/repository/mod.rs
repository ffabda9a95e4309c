//! Data-access layer. Every method takes a `&SqlitePool` (cloned cheaply,
//! sqlx pools are `Arc`-backed internally) and a [`CancellationToken`] so a
//! dropped client connection can abort an in-flight query instead of
//! running it to completion for nobody.

pub mod issues;
pub mod labels;
pub mod users;

use sqlx::SqlitePool;

#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
