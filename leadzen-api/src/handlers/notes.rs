use actix_web::{web, HttpResponse, Result as ActixResult};
use leadzen_core::filter::{CategorySelector, FilterPredicate};
use leadzen_core::store::{EntityListStore, ListOrder};
use leadzen_core::validation::{validate_note, validate_note_content};
use shared_types::{
    CreateNoteRequest, ErrorResponse, ListNotesRequest, Note, NotesResponse, UpdateNoteRequest,
};
use std::sync::Arc;

use super::load_store;
use crate::config::StoreConfig;
use crate::database::{leads as leads_db, notes as notes_db, Database};
use crate::sources::DbSource;

async fn require_lead(db: &Database, lead_id: i64) -> ActixResult<()> {
    leads_db::get_lead(db.async_connection.clone(), lead_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
        .map(|_| ())
        .ok_or_else(|| actix_web::error::ErrorNotFound(format!("Lead {} not found", lead_id)))
}

/// A lead's notes, newest first
pub async fn list_notes(
    db: web::Data<Arc<Database>>,
    store_config: web::Data<StoreConfig>,
    path: web::Path<i64>,
    query: web::Query<ListNotesRequest>,
) -> ActixResult<HttpResponse> {
    let lead_id = path.into_inner();
    let ListNotesRequest { search, tag } = query.into_inner();
    require_lead(&db, lead_id).await?;

    let source = DbSource::for_lead(db.async_connection.clone(), Some(lead_id));
    let mut store: EntityListStore<Note> = EntityListStore::new()
        .with_order(ListOrder::MostRecentFirst)
        .with_load_timeout(store_config.load_timeout());
    load_store(&mut store, &source, &store_config).await?;

    store.set_predicate(FilterPredicate::new(
        search.unwrap_or_default(),
        CategorySelector::from(tag),
    ));
    let notes = store.view().to_vec();
    let total_count = notes.len();

    Ok(HttpResponse::Ok().json(NotesResponse { notes, total_count }))
}

pub async fn create_note(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<CreateNoteRequest>,
) -> ActixResult<HttpResponse> {
    let lead_id = path.into_inner();

    let errors = validate_note(&request);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "fields": errors,
        })));
    }
    require_lead(&db, lead_id).await?;

    let note = notes_db::insert_note(db.async_connection.clone(), lead_id, &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    tracing::info!("Added {} note {} to lead {}", note.tag.as_str(), note.id, lead_id);
    Ok(HttpResponse::Created().json(note))
}

pub async fn update_note(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateNoteRequest>,
) -> ActixResult<HttpResponse> {
    let note_id = path.into_inner();

    if let Some(content) = request.content.as_deref() {
        if let Err(error) = validate_note_content(content) {
            return Ok(HttpResponse::BadRequest().json(ErrorResponse { error }));
        }
    }

    let note = notes_db::update_note(db.async_connection.clone(), note_id, &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
        .ok_or_else(|| actix_web::error::ErrorNotFound(format!("Note {} not found", note_id)))?;

    Ok(HttpResponse::Ok().json(note))
}

pub async fn delete_note(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let note_id = path.into_inner();

    let deleted = notes_db::delete_note(db.async_connection.clone(), note_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;
    if !deleted {
        return Err(actix_web::error::ErrorNotFound(format!(
            "Note {} not found",
            note_id
        )));
    }

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{seed, testing::temp_database};
    use actix_web::{test, App};
    use shared_types::NoteTag;

    macro_rules! app {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .app_data(web::Data::new(StoreConfig::default()))
                    .route("/api/leads/{id}/notes", web::get().to(list_notes))
                    .route("/api/leads/{id}/notes", web::post().to(create_note))
                    .route("/api/notes/{id}", web::put().to(update_note))
                    .route("/api/notes/{id}", web::delete().to(delete_note)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_notes_filter_by_search_and_tag() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        for (content, tag) in [
            ("Wants a demo next week", "follow-up"),
            ("Asked about annual pricing", "general"),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/leads/1/notes")
                .set_json(serde_json::json!({ "content": content, "tag": tag }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/leads/1/notes?tag=follow-up")
            .to_request();
        let body: NotesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total_count, 1);
        assert_eq!(body.notes[0].tag, NoteTag::FollowUp);

        let req = test::TestRequest::get()
            .uri("/api/leads/1/notes?search=PRICING")
            .to_request();
        let body: NotesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total_count, 1);
        assert_eq!(body.notes[0].content, "Asked about annual pricing");

        let req = test::TestRequest::get()
            .uri("/api/leads/2/notes")
            .to_request();
        let body: NotesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total_count, 0);
    }

    #[actix_web::test]
    async fn test_create_rejects_blank_note_and_unknown_lead() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/api/leads/1/notes")
            .set_json(serde_json::json!({ "content": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["fields"]["content"].is_string());

        let req = test::TestRequest::post()
            .uri("/api/leads/99/notes")
            .set_json(serde_json::json!({ "content": "Hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/leads/99/notes")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_edit_then_delete_note() {
        let (_dir, db) = temp_database();
        seed::seed_demo_data(db.async_connection.clone()).await.unwrap();
        let db = Arc::new(db);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/api/leads/3/notes")
            .set_json(serde_json::json!({ "content": "Call back Monday" }))
            .to_request();
        let created: Note = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.tag, NoteTag::General);

        let req = test::TestRequest::put()
            .uri(&format!("/api/notes/{}", created.id))
            .set_json(serde_json::json!({ "content": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&format!("/api/notes/{}", created.id))
            .set_json(serde_json::json!({ "content": "Call back Tuesday" }))
            .to_request();
        let updated: Note = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.content, "Call back Tuesday");
        assert_eq!(updated.tag, NoteTag::General);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/notes/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/notes/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
