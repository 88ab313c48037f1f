use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    CaregiverProfile, PaymentRecord, PaymentStatus, Sector, ServiceRecord, UserRecord, UserRole,
};

/// Errors that can occur when reading from a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Caregiver lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct CaregiverQuery {
    /// `None` reads every sector
    pub sector: Option<Sector>,
    pub active_only: bool,
}

impl CaregiverQuery {
    pub fn active_in(sector: Sector) -> Self {
        Self {
            sector: Some(sector),
            active_only: true,
        }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

/// Creation-time window shared by the timestamped queries.
///
/// `created_after` is inclusive and `created_before` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreatedRange {
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl CreatedRange {
    pub fn before(at: DateTime<Utc>) -> Self {
        Self {
            created_after: None,
            created_before: Some(at),
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            created_after: Some(start),
            created_before: Some(end),
        }
    }

    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.created_after.map_or(true, |start| at >= start)
            && self.created_before.map_or(true, |end| at < end)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub range: CreatedRange,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentQuery {
    pub status: Option<PaymentStatus>,
    pub range: CreatedRange,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceQuery {
    pub range: CreatedRange,
}

/// Read-only query surface the matching engine and the analytics aggregator
/// consume.
///
/// Implementations must report failures as [`StoreError`] and never answer a
/// failed query with an empty list.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_caregivers(&self, query: &CaregiverQuery) -> Result<Vec<CaregiverProfile>, StoreError>;

    async fn find_users(&self, query: &UserQuery) -> Result<Vec<UserRecord>, StoreError>;

    async fn find_payments(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>, StoreError>;

    async fn find_services(&self, query: &ServiceQuery) -> Result<Vec<ServiceRecord>, StoreError>;

    async fn count_active_conversations(&self) -> Result<u64, StoreError>;

    /// Cheap liveness probe used by the health endpoint
    async fn health_check(&self) -> Result<bool, StoreError>;
}
