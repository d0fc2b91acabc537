use actix_web::{web, HttpResponse, Result as ActixResult};
use leadzen_core::filter::{CategorySelector, FilterPredicate};
use leadzen_core::phone::{extract_phone_from_caller_id, match_phone_to_leads};
use leadzen_core::store::{EntityListStore, ListOrder};
use shared_types::{
    CallLog, CallLogsResponse, CreateCallLogRequest, ErrorResponse, Lead, ListCallLogsRequest,
    PhoneMatchRequest,
};
use std::sync::Arc;

use super::{load_store, page};
use crate::config::StoreConfig;
use crate::database::{call_logs as call_logs_db, leads as leads_db, Database};
use crate::sources::DbSource;

pub async fn list_call_logs(
    db: web::Data<Arc<Database>>,
    store_config: web::Data<StoreConfig>,
    query: web::Query<ListCallLogsRequest>,
) -> ActixResult<HttpResponse> {
    let ListCallLogsRequest {
        search,
        direction,
        lead_id,
        limit,
        offset,
    } = query.into_inner();

    let source = DbSource::for_lead(db.async_connection.clone(), lead_id);
    let mut store: EntityListStore<CallLog> = EntityListStore::new()
        .with_order(ListOrder::MostRecentFirst)
        .with_load_timeout(store_config.load_timeout());

    load_store(&mut store, &source, &store_config).await?;

    store.set_predicate(FilterPredicate::new(
        search.unwrap_or_default(),
        CategorySelector::from(direction),
    ));

    Ok(HttpResponse::Ok().json(CallLogsResponse {
        call_logs: store
            .view_page(page(&store_config, limit, offset))
            .to_vec(),
        summary: store.summary(),
    }))
}

pub async fn create_call_log(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateCallLogRequest>,
) -> ActixResult<HttpResponse> {
    if !request.phone_number.chars().any(|c| c.is_ascii_digit()) {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "Phone number must contain digits".to_string(),
        }));
    }

    let call = call_logs_db::insert_call_log(db.async_connection.clone(), &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    if let Some(lead_id) = call.lead_id {
        if let Err(e) =
            leads_db::touch_last_contacted(db.async_connection.clone(), lead_id, call.started_at)
                .await
        {
            tracing::warn!("Failed to update last contact for lead {}: {}", lead_id, e);
        }
    }

    Ok(HttpResponse::Created().json(call))
}

/// Resolves an incoming number (or raw caller id) to known leads
pub async fn match_phone(
    db: web::Data<Arc<Database>>,
    store_config: web::Data<StoreConfig>,
    query: web::Query<PhoneMatchRequest>,
) -> ActixResult<HttpResponse> {
    let PhoneMatchRequest { phone } = query.into_inner();
    let phone = if phone.contains('<') {
        extract_phone_from_caller_id(&phone)
    } else {
        phone
    };

    let source = DbSource::new(db.async_connection.clone());
    let mut store: EntityListStore<Lead> =
        EntityListStore::new().with_load_timeout(store_config.load_timeout());
    load_store(&mut store, &source, &store_config).await?;

    Ok(HttpResponse::Ok().json(match_phone_to_leads(&phone, store.items())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{seed, testing::temp_database};
    use actix_web::{test, App};

    macro_rules! app {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .app_data(web::Data::new(StoreConfig::default()))
                    .route("/api/calls", web::get().to(list_call_logs))
                    .route("/api/calls", web::post().to(create_call_log))
                    .route("/api/calls/match", web::get().to(match_phone)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_history_is_recent_first_with_summary() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get().uri("/api/calls").to_request();
        let body: CallLogsResponse = test::call_and_read_body_json(&app, req).await;

        let started: Vec<i64> = body.call_logs.iter().map(|c| c.started_at).collect();
        let mut sorted = started.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(started, sorted);
        assert_eq!(body.summary.total_calls, 5);
        // Seeded outcomes: two meetings, two callbacks, one missed
        assert_eq!(body.summary.successful_calls, 2);
    }

    #[actix_web::test]
    async fn test_history_filters_by_direction() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get()
            .uri("/api/calls?direction=missed")
            .to_request();
        let body: CallLogsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.call_logs.len(), 1);
        assert_eq!(body.summary.total_duration, 0);
    }

    #[actix_web::test]
    async fn test_match_incoming_caller_id() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get()
            .uri("/api/calls/match?phone=9820033333")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["confidence"], "exact");
        assert_eq!(body["normalized_number"], "+919820033333");
        assert_eq!(body["best_match"]["name"], "Priya Nair");
    }

    #[actix_web::test]
    async fn test_create_rejects_number_without_digits() {
        let (_dir, db) = temp_database();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/api/calls")
            .set_json(serde_json::json!({
                "phone_number": "unknown",
                "direction": "inbound",
                "status": "ended",
                "started_at": 1_700_000_000,
                "duration": 30
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Phone number must contain digits");
    }

    #[actix_web::test]
    async fn test_history_for_one_lead() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get()
            .uri("/api/calls?lead_id=2")
            .to_request();
        let body: CallLogsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.call_logs.len(), 1);
        assert_eq!(body.call_logs[0].lead_id, Some(2));
        assert_eq!(body.summary.total_calls, 1);
    }

    #[actix_web::test]
    async fn test_summary_covers_every_call_past_the_page() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get()
            .uri("/api/calls?limit=2")
            .to_request();
        let body: CallLogsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.call_logs.len(), 2);
        assert_eq!(body.summary.total_calls, 5);
    }
}
