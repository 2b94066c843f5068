//! Repository module
//!
//! CRUD operations per collection over the embedded SurrealDB.
//!
//! ID convention: the full stack uses "table:id" strings. Parse with
//! `str::parse::<RecordId>()`; reference fields are stored as strings
//! and compared against bound strings.

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod settlement;
pub mod user;
pub mod wholesale;

pub use cart::{CartRepository, DecreaseResult};
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use product::ProductRepository;
pub use settlement::{SettlementRepository, SettlementSummary};
pub use user::UserRepository;
pub use wholesale::WholesaleRepository;

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => shared::AppError::NotFound(msg),
            RepoError::Duplicate(msg) => shared::AppError::Conflict(msg),
            RepoError::Validation(msg) => shared::AppError::Validation(msg),
            RepoError::Database(msg) => shared::AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Row shape for `SELECT count() ... GROUP ALL`
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub count: u64,
}

/// Clamp pagination inputs: page is 1-based, limit within 1..=100
pub(crate) fn clamp_page(page: u32, limit: u32) -> (u32, u32) {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    (page, limit)
}
