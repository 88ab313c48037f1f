use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::models::{
    CaregiverProfile, ConversationRecord, PaymentRecord, ServiceRecord, UserRecord,
};
use crate::services::store::{
    CaregiverQuery, PaymentQuery, RecordStore, ServiceQuery, StoreError, UserQuery,
};

/// Snapshot of every collection, as loaded from a seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub caregivers: Vec<CaregiverProfile>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub conversations: Vec<ConversationRecord>,
}

impl SeedData {
    /// Reject amounts the PostgreSQL schema would refuse
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(p) = self.payments.iter().find(|p| p.amount_cents < 0) {
            return Err(StoreError::InvalidRecord(format!(
                "payment {} has negative amount {}",
                p.payment_id, p.amount_cents
            )));
        }
        if let Some(s) = self.services.iter().find(|s| s.amount_cents.is_some_and(|a| a < 0)) {
            return Err(StoreError::InvalidRecord(format!(
                "service {} has a negative amount",
                s.service_id
            )));
        }
        Ok(())
    }
}

/// In-process record store
///
/// Backs the test suites and the demo mode of the server. Availability can be
/// switched off to exercise the store-failure paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<SeedData>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            data: RwLock::new(seed),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Load a JSON seed file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("cannot read {}: {}", path.display(), e)))?;
        let seed: SeedData = serde_json::from_str(&raw)
            .map_err(|e| StoreError::InvalidRecord(format!("{}: {}", path.display(), e)))?;
        seed.validate()?;

        tracing::info!(
            "Loaded seed data from {} ({} caregivers, {} users, {} payments, {} services, {} conversations)",
            path.display(),
            seed.caregivers.len(),
            seed.users.len(),
            seed.payments.len(),
            seed.services.len(),
            seed.conversations.len()
        );

        Ok(Self::from_seed(seed))
    }

    /// Simulate an outage: every query fails until availability is restored
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Mutate the stored collections
    pub async fn update<F: FnOnce(&mut SeedData)>(&self, f: F) {
        let mut data = self.data.write().await;
        f(&mut data);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find_caregivers(&self, query: &CaregiverQuery) -> Result<Vec<CaregiverProfile>, StoreError> {
        self.ensure_available()?;
        let data = self.data.read().await;
        Ok(data
            .caregivers
            .iter()
            .filter(|c| query.sector.map_or(true, |s| c.sector == s))
            .filter(|c| !query.active_only || c.is_active)
            .cloned()
            .collect())
    }

    async fn find_users(&self, query: &UserQuery) -> Result<Vec<UserRecord>, StoreError> {
        self.ensure_available()?;
        let data = self.data.read().await;
        Ok(data
            .users
            .iter()
            .filter(|u| query.role.map_or(true, |r| u.role == r))
            .filter(|u| query.range.contains(u.created_at))
            .cloned()
            .collect())
    }

    async fn find_payments(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>, StoreError> {
        self.ensure_available()?;
        let data = self.data.read().await;
        Ok(data
            .payments
            .iter()
            .filter(|p| query.status.map_or(true, |s| p.status == s))
            .filter(|p| query.range.contains(p.created_at))
            .cloned()
            .collect())
    }

    async fn find_services(&self, query: &ServiceQuery) -> Result<Vec<ServiceRecord>, StoreError> {
        self.ensure_available()?;
        let data = self.data.read().await;
        Ok(data
            .services
            .iter()
            .filter(|s| query.range.contains(s.created_at))
            .cloned()
            .collect())
    }

    async fn count_active_conversations(&self) -> Result<u64, StoreError> {
        self.ensure_available()?;
        let data = self.data.read().await;
        Ok(data
            .conversations
            .iter()
            .filter(|c| c.status.is_active())
            .count() as u64)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }
}
