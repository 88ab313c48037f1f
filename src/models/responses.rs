use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{MatchResult, RankedCaregiver, SectorStats, SeriesPoint, StatisticsSnapshot};
use crate::models::requests::{SearchCriteria, SearchRequest};

/// Round a rate to one decimal for display
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Response for the caregiver search endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub request_id: String,
    pub results: Vec<RankedCaregiver>,
    pub count: usize,
    pub total_candidates: usize,
    pub criteria: SearchCriteria,
}

impl SearchResponse {
    pub fn new(request_id: String, criteria: SearchRequest, result: MatchResult) -> Self {
        Self {
            success: true,
            request_id,
            count: result.count,
            total_candidates: result.total_candidates,
            results: result.matches,
            criteria: criteria.into(),
        }
    }

    /// Successful response with no caregiver
    pub fn empty(request_id: String, criteria: SearchCriteria) -> Self {
        Self {
            success: true,
            request_id,
            results: Vec::new(),
            count: 0,
            total_candidates: 0,
            criteria,
        }
    }
}

/// One month of a rendered time series
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    /// `YYYY-MM`
    pub period: String,
    /// Display label, e.g. `Fév 2025`
    pub label: String,
    pub value: i64,
}

impl From<&SeriesPoint> for MonthlyEntry {
    fn from(point: &SeriesPoint) -> Self {
        Self {
            period: point.period.to_string(),
            label: point.period.label(),
            value: point.value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorEntry {
    pub sector: String,
    pub label: String,
    pub caregivers: u64,
    pub completed_services: u64,
    pub revenue_cents: i64,
}

impl From<&SectorStats> for SectorEntry {
    fn from(stats: &SectorStats) -> Self {
        Self {
            sector: stats.sector.as_str().to_string(),
            label: stats.sector.label().to_string(),
            caregivers: stats.caregivers,
            completed_services: stats.completed_services,
            revenue_cents: stats.revenue_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_caregivers: u64,
    pub total_clients: u64,
    pub verified_caregivers: u64,
    pub pending_caregivers: u64,
    pub suspended_accounts: u64,
    pub new_users_this_month: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatistics {
    pub total: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub cancelled: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStatistics {
    pub currency: String,
    pub total_cents: i64,
    pub commission_cents: i64,
    pub average_basket_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStatistics {
    pub satisfaction_rate: f64,
    pub average_rating: f64,
    pub rated_caregivers: u64,
    pub total_reviews: u64,
    pub active_conversations: u64,
}

/// Response for the administrator statistics endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub success: bool,
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub users: UserStatistics,
    pub services: ServiceStatistics,
    pub revenue: RevenueStatistics,
    pub quality: QualityStatistics,
    pub popular_sectors: Vec<SectorEntry>,
    pub revenue_by_month: Vec<MonthlyEntry>,
    pub services_by_month: Vec<MonthlyEntry>,
}

impl From<StatisticsSnapshot> for StatisticsResponse {
    fn from(snapshot: StatisticsSnapshot) -> Self {
        Self {
            success: true,
            generated_at: snapshot.generated_at,
            timezone: snapshot.timezone,
            users: UserStatistics {
                total_caregivers: snapshot.total_caregivers,
                total_clients: snapshot.total_clients,
                verified_caregivers: snapshot.verified_caregivers,
                pending_caregivers: snapshot.pending_caregivers,
                suspended_accounts: snapshot.suspended_accounts,
                new_users_this_month: snapshot.new_users_this_month,
            },
            services: ServiceStatistics {
                total: snapshot.total_services,
                completed: snapshot.completed_services,
                in_progress: snapshot.in_progress_services,
                cancelled: snapshot.cancelled_services,
                conversion_rate: round1(snapshot.conversion_rate),
            },
            revenue: RevenueStatistics {
                currency: snapshot.currency,
                total_cents: snapshot.total_revenue_cents,
                commission_cents: snapshot.commission_cents,
                average_basket_cents: snapshot.average_basket_cents,
            },
            quality: QualityStatistics {
                satisfaction_rate: round1(snapshot.satisfaction_rate),
                average_rating: round1(snapshot.average_rating),
                rated_caregivers: snapshot.rated_caregivers,
                total_reviews: snapshot.total_reviews,
                active_conversations: snapshot.active_conversations,
            },
            popular_sectors: snapshot.popular_sectors.iter().map(SectorEntry::from).collect(),
            revenue_by_month: snapshot.revenue_by_month.iter().map(MonthlyEntry::from).collect(),
            services_by_month: snapshot.services_by_month.iter().map(MonthlyEntry::from).collect(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
