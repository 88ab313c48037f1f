use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::models::{SearchCaregiversRequest, SearchPlan, SearchResponse};
use crate::routes::{error_response, with_timeout, AppState};

/// Configure the caregiver search route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/services/search", web::post().to(search_caregivers));
}

/// Caregiver search endpoint
///
/// POST /api/v1/services/search
///
/// Request body:
/// ```json
/// {
///   "sector": "home_assistance",
///   "day": "monday",
///   "timeSlot": "morning",
///   "maritalStatus": "widowed",
///   "caregiverPreference": "indifferent"
/// }
/// ```
///
/// French labels (`"Aide à domicile"`, `"lundi"`, `"matin"`, ...) are accepted
/// as well. No match is a 200 with an empty `results` list, and so is a
/// sector label that names no category.
async fn search_caregivers(
    state: web::Data<AppState>,
    body: web::Json<SearchCaregiversRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();

    let request = match body.plan() {
        Ok(SearchPlan::Run(request)) => request,
        Ok(SearchPlan::UnknownSector(criteria)) => {
            tracing::info!("Search {} returned no caregivers: unknown sector {:?}", request_id, criteria.sector);
            return HttpResponse::Ok().json(SearchResponse::empty(request_id, criteria));
        }
        Err(e) => {
            tracing::info!("Rejected search {}: {}", request_id, e);
            return error_response(&e);
        }
    };

    match with_timeout(state.request_timeout, state.matcher.search(&request)).await {
        Ok(result) => {
            tracing::info!(
                "Search {} returned {} caregivers for {} / {} {}",
                request_id,
                result.count,
                request.sector,
                request.day,
                request.time_slot
            );
            HttpResponse::Ok().json(SearchResponse::new(request_id, request, result))
        }
        Err(e) => {
            tracing::error!("Search {} failed: {}", request_id, e);
            error_response(&e)
        }
    }
}
