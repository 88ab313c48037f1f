use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::models::{StatisticsQuery, StatisticsResponse};
use crate::routes::{error_response, with_timeout, AppState};

/// Configure the administrator statistics route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/statistics", web::get().to(get_statistics));
}

/// Marketplace statistics endpoint
///
/// GET /api/v1/admin/statistics?at={RFC3339}
///
/// The snapshot is recomputed on every call. `at` pins the point in time,
/// which defaults to now.
async fn get_statistics(
    state: web::Data<AppState>,
    query: web::Query<StatisticsQuery>,
) -> HttpResponse {
    let now = query.at.unwrap_or_else(Utc::now);

    match with_timeout(state.request_timeout, state.aggregator.compute(now)).await {
        Ok(snapshot) => HttpResponse::Ok().json(StatisticsResponse::from(snapshot)),
        Err(e) => {
            tracing::error!("Statistics computation failed: {}", e);
            error_response(&e)
        }
    }
}
