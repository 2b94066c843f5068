//! User repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::User;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid user id: {id}")))?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    pub async fn create(&self, user: User) -> RepoResult<User> {
        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_connect_account(&self, account_id: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE connect_account_id = $account")
            .bind(("account", account_id.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Persist the capability flags reported by the account webhook.
    /// `onboarding_completed` is derived, never set directly.
    pub async fn update_connect_capabilities(
        &self,
        account_id: &str,
        charges_enabled: bool,
        payouts_enabled: bool,
    ) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(
                r#"
                UPDATE user SET
                    charges_enabled = $charges,
                    payouts_enabled = $payouts,
                    onboarding_completed = $charges AND $payouts
                WHERE connect_account_id = $account
                RETURN AFTER
                "#,
            )
            .bind(("charges", charges_enabled))
            .bind(("payouts", payouts_enabled))
            .bind(("account", account_id.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }
}
