use actix_web::{web, HttpResponse, Result as ActixResult};
use leadzen_core::filter::{CategorySelector, FilterPredicate};
use leadzen_core::store::EntityListStore;
use leadzen_core::t9::{t9_filter, DEFAULT_SUGGESTION_LIMIT};
use leadzen_core::validation::{validate_lead, validate_lead_update};
use shared_types::{
    CreateLeadRequest, Lead, LeadsResponse, ListLeadsRequest, T9SearchRequest, UpdateLeadRequest,
};
use std::sync::Arc;

use super::{load_store, page};
use crate::config::StoreConfig;
use crate::database::leads as leads_db;
use crate::database::Database;
use crate::sources::DbSource;

pub async fn list_leads(
    db: web::Data<Arc<Database>>,
    store_config: web::Data<StoreConfig>,
    query: web::Query<ListLeadsRequest>,
) -> ActixResult<HttpResponse> {
    let ListLeadsRequest {
        search,
        status,
        limit,
        offset,
    } = query.into_inner();

    let source = DbSource::new(db.async_connection.clone());
    let mut store: EntityListStore<Lead> =
        EntityListStore::new().with_load_timeout(store_config.load_timeout());
    load_store(&mut store, &source, &store_config).await?;

    store.set_predicate(FilterPredicate::new(
        search.unwrap_or_default(),
        CategorySelector::from(status),
    ));
    let leads = store.view_page(page(&store_config, limit, offset)).to_vec();

    Ok(HttpResponse::Ok().json(LeadsResponse {
        leads,
        total_count: store.view().len(),
    }))
}

pub async fn get_lead(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let lead_id = path.into_inner();

    let lead = leads_db::get_lead(db.async_connection.clone(), lead_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
        .ok_or_else(|| actix_web::error::ErrorNotFound(format!("Lead {} not found", lead_id)))?;

    Ok(HttpResponse::Ok().json(lead))
}

pub async fn create_lead(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateLeadRequest>,
) -> ActixResult<HttpResponse> {
    let errors = validate_lead(&request);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "fields": errors,
        })));
    }

    let lead = leads_db::insert_lead(db.async_connection.clone(), &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    tracing::info!("Created lead {} ({})", lead.id, lead.name);
    Ok(HttpResponse::Created().json(lead))
}

pub async fn update_lead(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateLeadRequest>,
) -> ActixResult<HttpResponse> {
    let lead_id = path.into_inner();

    let errors = validate_lead_update(&request);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "fields": errors,
        })));
    }

    let lead = leads_db::update_lead(db.async_connection.clone(), lead_id, &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
        .ok_or_else(|| actix_web::error::ErrorNotFound(format!("Lead {} not found", lead_id)))?;

    tracing::info!("Updated lead {} ({})", lead.id, lead.status.as_str());
    Ok(HttpResponse::Ok().json(lead))
}

/// Removes the lead and its notes; its calls stay in the history unlinked
pub async fn delete_lead(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let lead_id = path.into_inner();

    let deleted = leads_db::delete_lead(db.async_connection.clone(), lead_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;
    if !deleted {
        return Err(actix_web::error::ErrorNotFound(format!(
            "Lead {} not found",
            lead_id
        )));
    }

    tracing::info!("Deleted lead {}", lead_id);
    Ok(HttpResponse::NoContent().finish())
}

/// Dialer suggestions for the digits typed so far
pub async fn t9_search(
    db: web::Data<Arc<Database>>,
    store_config: web::Data<StoreConfig>,
    query: web::Query<T9SearchRequest>,
) -> ActixResult<HttpResponse> {
    let T9SearchRequest { digits, limit } = query.into_inner();

    let source = DbSource::new(db.async_connection.clone());
    let mut store: EntityListStore<Lead> =
        EntityListStore::new().with_load_timeout(store_config.load_timeout());
    load_store(&mut store, &source, &store_config).await?;

    let leads = t9_filter(
        store.view(),
        &digits,
        limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT),
    );
    let total_count = leads.len();

    Ok(HttpResponse::Ok().json(LeadsResponse { leads, total_count }))
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
                    .route("/api/leads", web::get().to(list_leads))
                    .route("/api/leads", web::post().to(create_lead))
                    .route("/api/leads/t9", web::get().to(t9_search))
                    .route("/api/leads/{id}", web::get().to(get_lead))
                    .route("/api/leads/{id}", web::put().to(update_lead))
                    .route("/api/leads/{id}", web::delete().to(delete_lead)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_list_filters_by_search_and_status() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get()
            .uri("/api/leads?search=INFOSYS")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["leads"][0]["name"], "Rohit Verma");

        let req = test::TestRequest::get()
            .uri("/api/leads?status=qualified")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["leads"][0]["status"], "qualified");
    }

    #[actix_web::test]
    async fn test_get_missing_lead_is_404() {
        let (_dir, db) = temp_database();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get().uri("/api/leads/77").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_rejects_invalid_lead() {
        let (_dir, db) = temp_database();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/api/leads")
            .set_json(serde_json::json!({ "name": "X", "phone": "123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["fields"]["name"].is_string());
        assert!(body["fields"]["phone"].is_string());
    }

    #[actix_web::test]
    async fn test_t9_search() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        // 7749 = "priy"
        let req = test::TestRequest::get()
            .uri("/api/leads/t9?digits=7749")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["leads"][0]["name"], "Priya Nair");
    }

    #[actix_web::test]
    async fn test_total_count_covers_every_match() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::get()
            .uri("/api/leads?limit=2&offset=0")
            .to_request();
        let body: LeadsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.leads.len(), 2);
        assert_eq!(body.total_count, 5);

        // Newest first, so the first seeded lead sits past the first page
        let req = test::TestRequest::get()
            .uri("/api/leads?search=tata&limit=2")
            .to_request();
        let body: LeadsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total_count, 1);
        assert_eq!(body.leads[0].name, "Ananya Sharma");
    }

    #[actix_web::test]
    async fn test_created_tags_are_deduped() {
        let (_dir, db) = temp_database();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/api/leads")
            .set_json(serde_json::json!({
                "name": "Arjun Das",
                "phone": "9876543210",
                "tags": ["vip", "vip", "hot"]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/leads").to_request();
        let body: LeadsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.leads[0].tags, vec!["vip".to_string(), "hot".to_string()]);
    }

    #[actix_web::test]
    async fn test_update_moves_status_and_delete_removes() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::put()
            .uri("/api/leads/1")
            .set_json(serde_json::json!({ "status": "proposal" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "proposal");
        assert_eq!(body["name"], "Ananya Sharma");

        let req = test::TestRequest::put()
            .uri("/api/leads/1")
            .set_json(serde_json::json!({ "name": "X" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let req = test::TestRequest::delete().uri("/api/leads/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete().uri("/api/leads/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let req = test::TestRequest::put()
            .uri("/api/leads/1")
            .set_json(serde_json::json!({ "status": "new" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
