//! Shared fixtures for integration tests.

#![allow(dead_code)]

use bookstore::db::{DbPool, establish_connection_pool};
use bookstore::repository::DieselRepository;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temp file for the duration of a test.
pub struct TestDb {
    _file: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let file = NamedTempFile::new().expect("create temp database file");
        let url = file.path().to_str().expect("utf-8 temp path").to_string();
        let pool = establish_connection_pool(&url).expect("open SQLite pool");
        pool.get()
            .expect("checkout connection")
            .run_pending_migrations(MIGRATIONS)
            .expect("apply migrations");
        Self { _file: file, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}
