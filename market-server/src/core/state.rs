//! Server state
//!
//! [`ServerState`] holds shared references to every service a handler
//! needs: configuration, the embedded database, the payment gateway,
//! the JWT service and runtime counters. `Clone` is shallow (Arc).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::payments::{PaymentProvider, StripeGateway};

/// Runtime counters exposed on the health endpoint
///
/// `unmatched_webhook_events` counts checkout confirmations that
/// referenced no known payment intent. The webhook contract still
/// answers 200 for those, so this counter is the only signal of a
/// reconciliation gap.
#[derive(Debug, Default)]
pub struct Metrics {
    unmatched_webhook_events: AtomicU64,
    processed_webhook_events: AtomicU64,
}

impl Metrics {
    pub fn record_unmatched_webhook(&self) -> u64 {
        self.unmatched_webhook_events.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_processed_webhook(&self) {
        self.processed_webhook_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unmatched_webhook_events(&self) -> u64 {
        self.unmatched_webhook_events.load(Ordering::Relaxed)
    }

    pub fn processed_webhook_events(&self) -> u64 {
        self.processed_webhook_events.load(Ordering::Relaxed)
    }
}

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// External payment processor client
    pub payments: Arc<dyn PaymentProvider>,
    /// JWT validation service
    pub jwt: Arc<JwtService>,
    /// Runtime counters
    pub metrics: Arc<Metrics>,
}

impl ServerState {
    /// Initialize state: open the database, apply schema, wire services
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db_service = DbService::new(&config.data_dir).await?;

        let payments: Arc<dyn PaymentProvider> =
            Arc::new(StripeGateway::new(config.payment_secret_key.clone()));
        let jwt = Arc::new(JwtService::new(&config.jwt_secret));

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            payments,
            jwt,
            metrics: Arc::new(Metrics::default()),
        })
    }

    /// Build state around existing services (tests inject a Mem database
    /// and a mock payment provider here)
    pub fn with_services(
        config: Config,
        db: Surreal<Db>,
        payments: Arc<dyn PaymentProvider>,
    ) -> Self {
        let jwt = Arc::new(JwtService::new(&config.jwt_secret));
        Self {
            config,
            db,
            payments,
            jwt,
            metrics: Arc::new(Metrics::default()),
        }
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
