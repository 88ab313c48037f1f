//! Aidant Core - caregiver matching and marketplace analytics
//!
//! This library provides the two computations behind the caregiver
//! marketplace: the matching engine that selects and ranks caregivers for a
//! client's search, and the analytics aggregator that produces the
//! administrator statistics document.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Aggregator, AnalyticsConfig, CoreError, MatchResult, Matcher, StatisticsSnapshot};
pub use crate::models::{CaregiverProfile, SearchCaregiversRequest, SearchRequest};
pub use crate::services::{InMemoryStore, PostgresStore, RecordStore, StoreError};
