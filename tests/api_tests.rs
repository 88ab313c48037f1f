// HTTP surface tests for Aidant Core

use actix_web::{http::StatusCode, test, web, App};
use aidant_core::core::{Aggregator, AnalyticsConfig};
use aidant_core::models::{
    AvailabilitySlot, CaregiverProfile, Day, Gender, PaymentRecord, PaymentStatus, Sector,
    TimeSlot, UserRecord, UserRole,
};
use aidant_core::routes::{
    configure_routes, handle_json_payload_error, handle_query_payload_error, AppState,
};
use aidant_core::services::{InMemoryStore, SeedData};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn seeded_store() -> Arc<InMemoryStore> {
    let registered = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
    let caregiver = |id: &str, rating: Option<f64>, gender: Gender| CaregiverProfile {
        caregiver_id: id.to_string(),
        display_name: id.to_string(),
        sector: Sector::HomeAssistance,
        availability: [AvailabilitySlot::new(Day::Monday, TimeSlot::Morning)].into_iter().collect(),
        gender,
        average_rating: rating,
        total_reviews: 3,
        hourly_rate_cents: 2200,
        is_active: true,
        registered_at: registered,
    };

    Arc::new(InMemoryStore::from_seed(SeedData {
        caregivers: vec![
            caregiver("sophie", Some(4.26), Gender::Female),
            caregiver("karim", Some(3.9), Gender::Male),
        ],
        users: vec![UserRecord {
            user_id: "client-1".to_string(),
            role: UserRole::Client,
            is_verified: true,
            is_suspended: false,
            is_deleted: false,
            created_at: registered,
        }],
        payments: vec![PaymentRecord {
            payment_id: "pay-1".to_string(),
            amount_cents: 4400,
            currency: "eur".to_string(),
            status: PaymentStatus::Succeeded,
            service_id: None,
            client_id: Some("client-1".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
        }],
        ..Default::default()
    }))
}

fn app_state(store: Arc<InMemoryStore>) -> AppState {
    AppState::new(
        store.clone(),
        Aggregator::new(store, AnalyticsConfig::default()),
        Duration::from_secs(5),
        "memory",
    )
}

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($store)))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_search_returns_ranked_caregivers() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::post()
        .uri("/api/v1/services/search")
        .set_json(json!({
            "secteur": "Aide à domicile",
            "jour": "Lundi",
            "horaires": "matin",
            "preferenceAidant": "Indifférent"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["results"][0]["caregiver"]["caregiverId"], json!("sophie"));
    assert_eq!(body["criteria"]["sector"], json!("home_assistance"));
}

#[actix_web::test]
async fn test_search_without_match_is_ok_and_empty() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::post()
        .uri("/api/v1/services/search")
        .set_json(json!({
            "sector": "gardening",
            "day": "sunday",
            "timeSlot": "evening",
            "caregiverPreference": "indifferent"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], json!(0));
    assert_eq!(body["results"], json!([]));
}

#[actix_web::test]
async fn test_search_with_unknown_enum_is_bad_request() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::post()
        .uri("/api/v1/services/search")
        .set_json(json!({
            "sector": "home_assistance",
            "day": "monday",
            "timeSlot": "midnight",
            "caregiverPreference": "indifferent"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("validation_failed"));
    assert_eq!(body["status_code"], json!(400));
}

#[actix_web::test]
async fn test_search_with_unknown_sector_is_ok_and_empty() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::post()
        .uri("/api/v1/services/search")
        .set_json(json!({
            "sector": "Astrology",
            "day": "monday",
            "timeSlot": "morning"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(0));
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["criteria"]["sector"], json!("Astrology"));
    assert_eq!(body["criteria"]["day"], json!("monday"));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::post()
        .uri("/api/v1/services/search")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"sector\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("invalid_json"));
}

#[actix_web::test]
async fn test_unavailable_store_is_service_unavailable() {
    let store = seeded_store();
    store.set_available(false);
    let app = init_app!(store);

    let search = test::TestRequest::post()
        .uri("/api/v1/services/search")
        .set_json(json!({
            "sector": "home_assistance",
            "day": "monday",
            "timeSlot": "morning"
        }))
        .to_request();
    let resp = test::call_service(&app, search).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("store_unavailable"));

    let stats = test::TestRequest::get().uri("/api/v1/admin/statistics").to_request();
    let resp = test::call_service(&app, stats).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, health).await;
    assert_eq!(body["status"], json!("degraded"));
}

#[actix_web::test]
async fn test_statistics_at_point_in_time() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/statistics?at=2025-06-20T12:00:00Z")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["timezone"], json!("Europe/Paris"));
    assert_eq!(body["revenue"]["totalCents"], json!(4400));
    assert_eq!(body["revenue"]["commissionCents"], json!(1760));
    assert_eq!(body["users"]["totalClients"], json!(1));
    // (4.26 + 3.9) / 2 = 4.08
    assert_eq!(body["quality"]["satisfactionRate"], json!(4.1));

    let months = body["revenueByMonth"].as_array().unwrap();
    assert_eq!(months.len(), 6);
    assert_eq!(months[5]["period"], json!("2025-06"));
    assert_eq!(months[5]["label"], json!("Jun 2025"));
    assert_eq!(months[5]["value"], json!(4400));
}

#[actix_web::test]
async fn test_statistics_rejects_bad_timestamp() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/statistics?at=yesterday")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_reports_store() {
    let app = init_app!(seeded_store());

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["store"], json!("memory"));
}
