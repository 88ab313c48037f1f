use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

use crate::models::{
    AvailabilitySlot, CaregiverProfile, PaymentRecord, ServiceRecord, UserRecord,
};
use crate::services::store::{
    CaregiverQuery, CreatedRange, PaymentQuery, RecordStore, ServiceQuery, StoreError, UserQuery,
};

/// PostgreSQL-backed record store
///
/// Enumerations are stored as their text slugs and parsed on the way out; a
/// row that does not decode fails the whole query with
/// [`StoreError::InvalidRecord`].
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run the embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL record store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Append `created_at` bounds to a query that already has a WHERE clause
fn push_range(builder: &mut QueryBuilder<'_, Postgres>, range: &CreatedRange) {
    if let Some(start) = range.created_after {
        builder.push(" AND created_at >= ").push_bind(start);
    }
    if let Some(end) = range.created_before {
        builder.push(" AND created_at < ").push_bind(end);
    }
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|e: T::Err| StoreError::InvalidRecord(format!("{}: {}", column, e)))
}

fn parse_optional_column<T>(row: &PgRow, column: &str) -> Result<Option<T>, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| {
        value
            .parse()
            .map_err(|e: T::Err| StoreError::InvalidRecord(format!("{}: {}", column, e)))
    })
    .transpose()
}

fn caregiver_from_row(row: &PgRow) -> Result<CaregiverProfile, StoreError> {
    let availability: Json<Vec<AvailabilitySlot>> = row.try_get("availability")?;
    let total_reviews: i32 = row.try_get("total_reviews")?;

    Ok(CaregiverProfile {
        caregiver_id: row.try_get("caregiver_id")?,
        display_name: row.try_get("display_name")?,
        sector: parse_column(row, "sector")?,
        availability: availability.0.into_iter().collect::<BTreeSet<_>>(),
        gender: parse_column(row, "gender")?,
        average_rating: row.try_get("average_rating")?,
        total_reviews: total_reviews.max(0) as u32,
        hourly_rate_cents: row.try_get("hourly_rate_cents")?,
        is_active: row.try_get("is_active")?,
        registered_at: row.try_get("registered_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    Ok(UserRecord {
        user_id: row.try_get("user_id")?,
        role: parse_column(row, "role")?,
        is_verified: row.try_get("is_verified")?,
        is_suspended: row.try_get("is_suspended")?,
        is_deleted: row.try_get("is_deleted")?,
        created_at: row.try_get("created_at")?,
    })
}

fn payment_from_row(row: &PgRow) -> Result<PaymentRecord, StoreError> {
    Ok(PaymentRecord {
        payment_id: row.try_get("payment_id")?,
        amount_cents: row.try_get("amount_cents")?,
        currency: row.try_get("currency")?,
        status: parse_column(row, "status")?,
        service_id: row.try_get("service_id")?,
        client_id: row.try_get("client_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn service_from_row(row: &PgRow) -> Result<ServiceRecord, StoreError> {
    Ok(ServiceRecord {
        service_id: row.try_get("service_id")?,
        sector: parse_optional_column(row, "sector")?,
        amount_cents: row.try_get("amount_cents")?,
        status: parse_column(row, "status")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn find_caregivers(&self, query: &CaregiverQuery) -> Result<Vec<CaregiverProfile>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT caregiver_id, display_name, sector, gender, availability, average_rating,
                   total_reviews, hourly_rate_cents, is_active, registered_at
            FROM caregivers
            WHERE TRUE
            "#,
        );
        if let Some(sector) = query.sector {
            builder.push(" AND lower(sector) = ").push_bind(sector.as_str());
        }
        if query.active_only {
            builder.push(" AND is_active");
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        let caregivers = rows
            .iter()
            .map(caregiver_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} caregivers ({:?})", caregivers.len(), query);

        Ok(caregivers)
    }

    async fn find_users(&self, query: &UserQuery) -> Result<Vec<UserRecord>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT user_id, role, is_verified, is_suspended, is_deleted, created_at
            FROM users
            WHERE TRUE
            "#,
        );
        if let Some(role) = query.role {
            builder.push(" AND role = ").push_bind(role.as_str());
        }
        push_range(&mut builder, &query.range);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn find_payments(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT payment_id, amount_cents, currency, status, service_id, client_id, created_at
            FROM payments
            WHERE TRUE
            "#,
        );
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        push_range(&mut builder, &query.range);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(payment_from_row).collect()
    }

    async fn find_services(&self, query: &ServiceQuery) -> Result<Vec<ServiceRecord>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT service_id, sector, amount_cents, status, created_at
            FROM services
            WHERE TRUE
            "#,
        );
        push_range(&mut builder, &query.range);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(service_from_row).collect()
    }

    async fn count_active_conversations(&self) -> Result<u64, StoreError> {
        let query = r#"
            SELECT COUNT(*) AS active
            FROM conversations
            WHERE status = 'open'
        "#;

        let row = sqlx::query(query).fetch_one(&self.pool).await?;
        let active: i64 = row.try_get("active")?;

        Ok(active.max(0) as u64)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
