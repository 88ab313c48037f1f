use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::core::calendar::{bucket_by_month, trailing_window, MonthKey, SeriesPoint, WINDOW_MONTHS};
use crate::core::error::CoreError;
use crate::models::{
    CaregiverProfile, PaymentRecord, PaymentStatus, Sector, ServiceRecord, UserRecord, UserRole,
};
use crate::services::{
    CaregiverQuery, CreatedRange, PaymentQuery, RecordStore, ServiceQuery, StoreError, UserQuery,
};

/// Aggregator settings
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Authoritative zone for calendar-month boundaries
    pub timezone: Tz,
    /// Reporting currency; payments in other currencies are left out of revenue
    pub currency: String,
    /// Platform commission in basis points of revenue
    pub commission_bps: u32,
    /// Number of sectors kept in the popularity ranking
    pub top_sectors: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Paris,
            currency: "eur".to_string(),
            commission_bps: 4000,
            top_sectors: 5,
        }
    }
}

/// Activity of one care sector
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorStats {
    pub sector: Sector,
    pub caregivers: u64,
    pub completed_services: u64,
    pub revenue_cents: i64,
}

/// Point-in-time business metrics
///
/// Always fully populated: [`Aggregator::compute`] either returns every field
/// or fails. Rates are kept at full precision; rounding happens when the
/// snapshot is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub currency: String,

    pub total_caregivers: u64,
    pub total_clients: u64,
    pub verified_caregivers: u64,
    pub pending_caregivers: u64,
    pub suspended_accounts: u64,
    pub new_users_this_month: u64,

    pub total_services: u64,
    pub completed_services: u64,
    pub in_progress_services: u64,
    pub cancelled_services: u64,
    /// Completed services as a percentage of all services
    pub conversion_rate: f64,

    pub total_revenue_cents: i64,
    pub commission_cents: i64,
    pub average_basket_cents: i64,

    /// Mean of the non-null caregiver ratings, 0 when nobody is rated
    pub satisfaction_rate: f64,
    /// Review-weighted mean rating, 0 when there are no reviews
    pub average_rating: f64,
    pub rated_caregivers: u64,
    pub total_reviews: u64,
    pub active_conversations: u64,

    pub popular_sectors: Vec<SectorStats>,
    pub revenue_by_month: Vec<SeriesPoint>,
    pub services_by_month: Vec<SeriesPoint>,
}

/// Raised when a snapshot would be assembled with a missing or malformed part
#[derive(Debug, Error)]
#[error("inconsistent statistics snapshot: {0}")]
pub(crate) struct InconsistentSnapshot(String);

impl From<InconsistentSnapshot> for CoreError {
    fn from(err: InconsistentSnapshot) -> Self {
        CoreError::StoreUnavailable(StoreError::Unavailable(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct UserBreakdown {
    caregivers: u64,
    clients: u64,
    verified_caregivers: u64,
    pending_caregivers: u64,
    suspended: u64,
    new_this_month: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct ServiceBreakdown {
    total: u64,
    completed: u64,
    in_progress: u64,
    cancelled: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct RevenueFigures {
    total_cents: i64,
    commission_cents: i64,
    average_basket_cents: i64,
}

#[derive(Debug, Clone, Copy, Default)]
struct QualityFigures {
    satisfaction_rate: f64,
    average_rating: f64,
    rated_caregivers: u64,
    total_reviews: u64,
}

/// Parts computed independently and checked before assembly
#[derive(Debug, Default)]
struct SnapshotParts {
    users: Option<UserBreakdown>,
    services: Option<ServiceBreakdown>,
    revenue: Option<RevenueFigures>,
    quality: Option<QualityFigures>,
    active_conversations: Option<u64>,
    popular_sectors: Option<Vec<SectorStats>>,
    revenue_by_month: Option<Vec<SeriesPoint>>,
    services_by_month: Option<Vec<SeriesPoint>>,
}

fn require<T>(part: Option<T>, name: &str) -> Result<T, InconsistentSnapshot> {
    part.ok_or_else(|| InconsistentSnapshot(format!("missing {}", name)))
}

impl SnapshotParts {
    fn assemble(self, now: DateTime<Utc>, config: &AnalyticsConfig) -> Result<StatisticsSnapshot, InconsistentSnapshot> {
        let users = require(self.users, "user breakdown")?;
        let services = require(self.services, "service breakdown")?;
        let revenue = require(self.revenue, "revenue figures")?;
        let quality = require(self.quality, "quality figures")?;
        let active_conversations = require(self.active_conversations, "active conversations")?;
        let popular_sectors = require(self.popular_sectors, "popular sectors")?;
        let revenue_by_month = require(self.revenue_by_month, "revenue series")?;
        let services_by_month = require(self.services_by_month, "service series")?;

        if revenue_by_month.len() > WINDOW_MONTHS as usize
            || revenue_by_month.len() != services_by_month.len()
        {
            return Err(InconsistentSnapshot(format!(
                "series lengths {} and {}",
                revenue_by_month.len(),
                services_by_month.len()
            )));
        }
        if !(0.0..=5.0).contains(&quality.satisfaction_rate) {
            return Err(InconsistentSnapshot(format!(
                "satisfaction rate {} out of range",
                quality.satisfaction_rate
            )));
        }

        let conversion_rate = if services.total > 0 {
            services.completed as f64 / services.total as f64 * 100.0
        } else {
            0.0
        };

        Ok(StatisticsSnapshot {
            generated_at: now,
            timezone: config.timezone.name().to_string(),
            currency: config.currency.to_lowercase(),
            total_caregivers: users.caregivers,
            total_clients: users.clients,
            verified_caregivers: users.verified_caregivers,
            pending_caregivers: users.pending_caregivers,
            suspended_accounts: users.suspended,
            new_users_this_month: users.new_this_month,
            total_services: services.total,
            completed_services: services.completed,
            in_progress_services: services.in_progress,
            cancelled_services: services.cancelled,
            conversion_rate,
            total_revenue_cents: revenue.total_cents,
            commission_cents: revenue.commission_cents,
            average_basket_cents: revenue.average_basket_cents,
            satisfaction_rate: quality.satisfaction_rate,
            average_rating: quality.average_rating,
            rated_caregivers: quality.rated_caregivers,
            total_reviews: quality.total_reviews,
            active_conversations,
            popular_sectors,
            revenue_by_month,
            services_by_month,
        })
    }
}

/// Analytics aggregator - computes the statistics snapshot
///
/// Every collection is read once, concurrently, and all metrics are derived
/// from that single read so the figures agree with each other.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn RecordStore>,
    config: AnalyticsConfig,
}

impl Aggregator {
    pub fn new(store: Arc<dyn RecordStore>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Compute the statistics snapshot as of `now`
    ///
    /// Timestamped collections are bounded to records created before `now`.
    /// Payments are read in every status: only succeeded ones count as
    /// revenue, but any payment dates the marketplace. Any store failure
    /// fails the whole computation.
    pub async fn compute(&self, now: DateTime<Utc>) -> Result<StatisticsSnapshot, CoreError> {
        let range = CreatedRange::before(now);
        let caregiver_query = CaregiverQuery::all();
        let user_query = UserQuery { role: None, range };
        let payment_query = PaymentQuery { status: None, range };
        let service_query = ServiceQuery { range };

        let (caregivers, users, payments, services, active_conversations) = tokio::try_join!(
            self.store.find_caregivers(&caregiver_query),
            self.store.find_users(&user_query),
            self.store.find_payments(&payment_query),
            self.store.find_services(&service_query),
            self.store.count_active_conversations(),
        )?;

        tracing::debug!(
            "Computing statistics from {} caregivers, {} users, {} payments, {} services",
            caregivers.len(),
            users.len(),
            payments.len(),
            services.len()
        );

        let snapshot = self.summarize(now, &caregivers, &users, &payments, &services, active_conversations)?;

        tracing::info!(
            "Statistics computed: {} caregivers, {} clients, revenue {} {}, {} new users this month",
            snapshot.total_caregivers,
            snapshot.total_clients,
            snapshot.total_revenue_cents,
            snapshot.currency,
            snapshot.new_users_this_month
        );

        Ok(snapshot)
    }

    /// Derive the snapshot from already fetched records
    pub(crate) fn summarize(
        &self,
        now: DateTime<Utc>,
        caregivers: &[CaregiverProfile],
        users: &[UserRecord],
        payments: &[PaymentRecord],
        services: &[ServiceRecord],
        active_conversations: u64,
    ) -> Result<StatisticsSnapshot, InconsistentSnapshot> {
        let tz = &self.config.timezone;
        let current_month = MonthKey::of(now, tz);

        let revenue_payments: Vec<&PaymentRecord> = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Succeeded)
            .filter(|p| p.currency.eq_ignore_ascii_case(&self.config.currency))
            .collect();
        let foreign = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Succeeded)
            .count()
            - revenue_payments.len();
        if foreign > 0 {
            tracing::debug!("Skipped {} succeeded payments outside {} revenue", foreign, self.config.currency);
        }

        let inception = users
            .iter()
            .map(|u| u.created_at)
            .chain(payments.iter().map(|p| p.created_at))
            .min();
        let window = trailing_window(now, tz, inception);

        let mut parts = SnapshotParts::default();
        parts.users = Some(user_breakdown(users, current_month, tz));

        let service_breakdown = service_breakdown(services);
        parts.revenue = Some(revenue_figures(&revenue_payments, service_breakdown.completed, self.config.commission_bps));
        parts.services = Some(service_breakdown);
        parts.quality = Some(quality_figures(caregivers));
        parts.active_conversations = Some(active_conversations);
        parts.popular_sectors = Some(popular_sectors(caregivers, services, self.config.top_sectors));
        parts.revenue_by_month = Some(bucket_by_month(
            &window,
            tz,
            revenue_payments.iter().map(|p| (p.created_at, p.amount_cents.max(0))),
        ));
        parts.services_by_month = Some(bucket_by_month(
            &window,
            tz,
            services.iter().map(|s| (s.created_at, 1)),
        ));

        parts.assemble(now, &self.config)
    }
}

fn user_breakdown(users: &[UserRecord], current_month: MonthKey, tz: &Tz) -> UserBreakdown {
    let mut breakdown = UserBreakdown::default();

    for user in users.iter().filter(|u| !u.is_deleted) {
        match user.role {
            UserRole::Caregiver => {
                breakdown.caregivers += 1;
                if user.is_verified {
                    breakdown.verified_caregivers += 1;
                } else {
                    breakdown.pending_caregivers += 1;
                }
            }
            UserRole::Client => breakdown.clients += 1,
        }
        if user.is_suspended {
            breakdown.suspended += 1;
        }
        if MonthKey::of(user.created_at, tz) == current_month {
            breakdown.new_this_month += 1;
        }
    }

    breakdown
}

fn service_breakdown(services: &[ServiceRecord]) -> ServiceBreakdown {
    ServiceBreakdown {
        total: services.len() as u64,
        completed: services.iter().filter(|s| s.status.is_completed()).count() as u64,
        in_progress: services.iter().filter(|s| s.status.is_in_progress()).count() as u64,
        cancelled: services.iter().filter(|s| s.status.is_cancelled()).count() as u64,
    }
}

/// Integer division rounded half away from zero, for non-negative operands
fn div_round(numerator: i128, denominator: i128) -> i64 {
    if denominator == 0 {
        return 0;
    }
    ((2 * numerator + denominator) / (2 * denominator)) as i64
}

fn revenue_figures(payments: &[&PaymentRecord], completed_services: u64, commission_bps: u32) -> RevenueFigures {
    let total_cents: i64 = payments.iter().map(|p| p.amount_cents.max(0)).sum();

    RevenueFigures {
        total_cents,
        commission_cents: div_round(total_cents as i128 * commission_bps as i128, 10_000),
        average_basket_cents: div_round(total_cents as i128, completed_services as i128),
    }
}

fn quality_figures(caregivers: &[CaregiverProfile]) -> QualityFigures {
    let rated: Vec<(f64, u32)> = caregivers
        .iter()
        .filter_map(|c| c.rating().map(|r| (r, c.total_reviews)))
        .collect();

    let satisfaction_rate = if rated.is_empty() {
        0.0
    } else {
        rated.iter().map(|(r, _)| r).sum::<f64>() / rated.len() as f64
    };

    let weighted_reviews: u64 = rated.iter().map(|(_, n)| *n as u64).sum();
    let average_rating = if weighted_reviews == 0 {
        0.0
    } else {
        rated.iter().map(|(r, n)| r * *n as f64).sum::<f64>() / weighted_reviews as f64
    };

    QualityFigures {
        satisfaction_rate: satisfaction_rate.clamp(0.0, 5.0),
        average_rating: average_rating.clamp(0.0, 5.0),
        rated_caregivers: rated.len() as u64,
        total_reviews: caregivers.iter().map(|c| c.total_reviews as u64).sum(),
    }
}

fn popular_sectors(caregivers: &[CaregiverProfile], services: &[ServiceRecord], top: usize) -> Vec<SectorStats> {
    let mut by_sector: BTreeMap<Sector, SectorStats> = BTreeMap::new();
    let entry = |map: &mut BTreeMap<Sector, SectorStats>, sector: Sector| {
        map.entry(sector).or_insert(SectorStats {
            sector,
            caregivers: 0,
            completed_services: 0,
            revenue_cents: 0,
        });
    };

    for caregiver in caregivers.iter().filter(|c| c.is_active) {
        entry(&mut by_sector, caregiver.sector);
        if let Some(stats) = by_sector.get_mut(&caregiver.sector) {
            stats.caregivers += 1;
        }
    }

    for service in services.iter().filter(|s| s.status.is_completed()) {
        let Some(sector) = service.sector else { continue };
        entry(&mut by_sector, sector);
        if let Some(stats) = by_sector.get_mut(&sector) {
            stats.completed_services += 1;
            stats.revenue_cents += service.amount_cents.unwrap_or(0).max(0);
        }
    }

    let mut ranked: Vec<SectorStats> = by_sector.into_values().collect();
    ranked.sort_by(|a, b| {
        b.revenue_cents
            .cmp(&a.revenue_cents)
            .then_with(|| b.caregivers.cmp(&a.caregivers))
            .then_with(|| a.sector.cmp(&b.sector))
    });
    ranked.truncate(top);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, ServiceStatus};
    use crate::services::InMemoryStore;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn caregiver(id: &str, sector: Sector, rating: Option<f64>, reviews: u32) -> CaregiverProfile {
        CaregiverProfile {
            caregiver_id: id.to_string(),
            display_name: id.to_string(),
            sector,
            availability: BTreeSet::new(),
            gender: Gender::Female,
            average_rating: rating,
            total_reviews: reviews,
            hourly_rate_cents: 2200,
            is_active: true,
            registered_at: at(2024, 1, 1),
        }
    }

    fn service(id: &str, sector: Option<Sector>, amount: Option<i64>, status: ServiceStatus, created: DateTime<Utc>) -> ServiceRecord {
        ServiceRecord {
            service_id: id.to_string(),
            sector,
            amount_cents: amount,
            status,
            created_at: created,
        }
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(Arc::new(InMemoryStore::new()), AnalyticsConfig::default())
    }

    #[test]
    fn test_satisfaction_defaults_to_zero_without_ratings() {
        let quality = quality_figures(&[caregiver("a", Sector::Errands, None, 0)]);
        assert_eq!(quality.satisfaction_rate, 0.0);
        assert_eq!(quality.average_rating, 0.0);
        assert_eq!(quality.rated_caregivers, 0);
    }

    #[test]
    fn test_satisfaction_is_plain_mean_and_average_is_review_weighted() {
        let quality = quality_figures(&[
            caregiver("a", Sector::Errands, Some(5.0), 1),
            caregiver("b", Sector::Errands, Some(3.0), 3),
            caregiver("c", Sector::Errands, None, 0),
        ]);
        assert_eq!(quality.satisfaction_rate, 4.0);
        assert_eq!(quality.average_rating, 3.5);
        assert_eq!(quality.rated_caregivers, 2);
        assert_eq!(quality.total_reviews, 4);
    }

    #[test]
    fn test_revenue_figures_use_integer_cents() {
        let payments: Vec<PaymentRecord> = [1999, 1001, 3333]
            .iter()
            .enumerate()
            .map(|(i, amount)| PaymentRecord {
                payment_id: i.to_string(),
                amount_cents: *amount,
                currency: "eur".into(),
                status: PaymentStatus::Succeeded,
                service_id: None,
                client_id: None,
                created_at: at(2025, 1, 1),
            })
            .collect();
        let refs: Vec<&PaymentRecord> = payments.iter().collect();

        let figures = revenue_figures(&refs, 3, 4000);
        assert_eq!(figures.total_cents, 6333);
        assert_eq!(figures.commission_cents, 2533);
        assert_eq!(figures.average_basket_cents, 2111);

        let nothing_completed = revenue_figures(&refs, 0, 4000);
        assert_eq!(nothing_completed.average_basket_cents, 0);
    }

    #[test]
    fn test_popular_sectors_ranked_by_revenue() {
        let caregivers = vec![
            caregiver("a", Sector::Childcare, None, 0),
            caregiver("b", Sector::Childcare, None, 0),
            caregiver("c", Sector::Gardening, None, 0),
        ];
        let services = vec![
            service("s1", Some(Sector::Gardening), Some(8800), ServiceStatus::Completed, at(2025, 1, 1)),
            service("s2", Some(Sector::Childcare), Some(2200), ServiceStatus::Rated, at(2025, 1, 1)),
            service("s3", Some(Sector::Childcare), Some(99_999), ServiceStatus::Cancelled, at(2025, 1, 1)),
            service("s4", None, Some(5000), ServiceStatus::Completed, at(2025, 1, 1)),
        ];

        let ranked = popular_sectors(&caregivers, &services, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].sector, Sector::Gardening);
        assert_eq!(ranked[0].revenue_cents, 8800);
        assert_eq!(ranked[1].sector, Sector::Childcare);
        assert_eq!(ranked[1].caregivers, 2);
        assert_eq!(ranked[1].completed_services, 1);

        assert_eq!(popular_sectors(&caregivers, &services, 1).len(), 1);
    }

    #[test]
    fn test_deleted_users_excluded_from_counts() {
        let users = vec![
            UserRecord { user_id: "c1".into(), role: UserRole::Client, is_verified: false, is_suspended: true, is_deleted: false, created_at: at(2025, 3, 2) },
            UserRecord { user_id: "c2".into(), role: UserRole::Client, is_verified: false, is_suspended: false, is_deleted: true, created_at: at(2025, 3, 3) },
            UserRecord { user_id: "a1".into(), role: UserRole::Caregiver, is_verified: true, is_suspended: false, is_deleted: false, created_at: at(2025, 1, 3) },
            UserRecord { user_id: "a2".into(), role: UserRole::Caregiver, is_verified: false, is_suspended: false, is_deleted: false, created_at: at(2025, 3, 9) },
        ];
        let tz = chrono_tz::Europe::Paris;
        let breakdown = user_breakdown(&users, MonthKey::of(at(2025, 3, 20), &tz), &tz);

        assert_eq!(breakdown.clients, 1);
        assert_eq!(breakdown.caregivers, 2);
        assert_eq!(breakdown.verified_caregivers, 1);
        assert_eq!(breakdown.pending_caregivers, 1);
        assert_eq!(breakdown.suspended, 1);
        assert_eq!(breakdown.new_this_month, 2);
    }

    #[test]
    fn test_conversion_rate_and_empty_snapshot() {
        let now = at(2025, 5, 15);
        let services = vec![
            service("s1", None, None, ServiceStatus::Completed, at(2025, 5, 1)),
            service("s2", None, None, ServiceStatus::InProgress, at(2025, 5, 2)),
            service("s3", None, None, ServiceStatus::Cancelled, at(2025, 5, 3)),
            service("s4", None, None, ServiceStatus::Pending, at(2025, 5, 4)),
        ];
        let snapshot = aggregator().summarize(now, &[], &[], &[], &services, 0).unwrap();
        assert_eq!(snapshot.conversion_rate, 25.0);
        assert_eq!(snapshot.in_progress_services, 1);
        assert_eq!(snapshot.cancelled_services, 1);
        assert_eq!(snapshot.services_by_month.last().map(|p| p.value), Some(4));

        let empty = aggregator().summarize(now, &[], &[], &[], &[], 0).unwrap();
        assert_eq!(empty.conversion_rate, 0.0);
        assert_eq!(empty.satisfaction_rate, 0.0);
        assert_eq!(empty.revenue_by_month.len(), WINDOW_MONTHS as usize);
        assert!(empty.revenue_by_month.iter().all(|p| p.value == 0));
        assert_eq!(empty.timezone, "Europe/Paris");
    }

    #[test]
    fn test_other_currencies_left_out_of_revenue() {
        let now = at(2025, 5, 15);
        let payment = |id: &str, currency: &str, amount: i64| PaymentRecord {
            payment_id: id.into(),
            amount_cents: amount,
            currency: currency.into(),
            status: PaymentStatus::Succeeded,
            service_id: None,
            client_id: None,
            created_at: at(2025, 5, 2),
        };
        let payments = vec![payment("p1", "EUR", 1000), payment("p2", "usd", 5000)];

        let snapshot = aggregator().summarize(now, &[], &[], &payments, &[], 0).unwrap();
        assert_eq!(snapshot.total_revenue_cents, 1000);
        assert_eq!(snapshot.revenue_by_month.iter().map(|p| p.value).sum::<i64>(), 1000);
    }

    #[test]
    fn test_revenue_series_sums_to_total_with_negative_amount() {
        let now = at(2025, 5, 15);
        let payment = |id: &str, amount: i64| PaymentRecord {
            payment_id: id.into(),
            amount_cents: amount,
            currency: "eur".into(),
            status: PaymentStatus::Succeeded,
            service_id: None,
            client_id: None,
            created_at: at(2025, 5, 2),
        };
        let payments = vec![payment("p1", 3000), payment("p2", -1200)];

        let snapshot = aggregator().summarize(now, &[], &[], &payments, &[], 0).unwrap();
        assert_eq!(snapshot.total_revenue_cents, 3000);
        assert_eq!(
            snapshot.revenue_by_month.iter().map(|p| p.value).sum::<i64>(),
            snapshot.total_revenue_cents
        );
    }

    #[tokio::test]
    async fn test_failed_payment_dates_the_marketplace() {
        let payment = |id: &str, status: PaymentStatus, created: DateTime<Utc>| PaymentRecord {
            payment_id: id.into(),
            amount_cents: 2200,
            currency: "eur".into(),
            status,
            service_id: None,
            client_id: None,
            created_at: created,
        };
        let store = InMemoryStore::from_seed(crate::services::SeedData {
            users: vec![UserRecord {
                user_id: "u1".into(),
                role: UserRole::Client,
                is_verified: false,
                is_suspended: false,
                is_deleted: false,
                created_at: at(2025, 4, 1),
            }],
            payments: vec![
                payment("declined", PaymentStatus::Failed, at(2025, 2, 3)),
                payment("paid", PaymentStatus::Succeeded, at(2025, 6, 3)),
            ],
            ..Default::default()
        });
        let aggregator = Aggregator::new(Arc::new(store), AnalyticsConfig::default());

        let snapshot = aggregator.compute(at(2025, 6, 10)).await.unwrap();
        assert_eq!(snapshot.revenue_by_month.len(), 5);
        assert_eq!(snapshot.revenue_by_month[0].period, MonthKey::new(2025, 2).unwrap());
        assert_eq!(snapshot.revenue_by_month[0].value, 0);
        assert_eq!(snapshot.total_revenue_cents, 2200);
    }

    #[test]
    fn test_missing_part_is_inconsistent() {
        let parts = SnapshotParts::default();
        let err = parts.assemble(at(2025, 1, 1), &AnalyticsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("missing"));

        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::StoreUnavailable(_)));
    }
}
