//! Wholesale offer repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Wholesale;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const WHOLESALE_TABLE: &str = "wholesale";

#[derive(Clone)]
pub struct WholesaleRepository {
    base: BaseRepository,
}

impl WholesaleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Wholesale>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid wholesale id: {id}")))?;
        let offer: Option<Wholesale> = self.base.db().select(record_id).await?;
        Ok(offer)
    }

    pub async fn create(&self, offer: Wholesale) -> RepoResult<Wholesale> {
        let created: Option<Wholesale> = self
            .base
            .db()
            .create(WHOLESALE_TABLE)
            .content(offer)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create wholesale offer".to_string()))
    }
}
