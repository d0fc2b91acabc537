use actix_web::{web, HttpResponse, Result as ActixResult};
use leadzen_core::filter::{CategorySelector, FilterPredicate};
use leadzen_core::store::EntityListStore;
use shared_types::{
    Contact, ContactsResponse, CreateContactRequest, FavoriteToggledResponse, ListContactsRequest,
};
use std::sync::Arc;

use super::{load_store, page};
use crate::config::StoreConfig;
use crate::database::contacts as contacts_db;
use crate::database::Database;
use crate::sources::DbSource;

pub async fn list_contacts(
    db: web::Data<Arc<Database>>,
    store_config: web::Data<StoreConfig>,
    query: web::Query<ListContactsRequest>,
) -> ActixResult<HttpResponse> {
    let ListContactsRequest {
        search,
        category,
        limit,
        offset,
    } = query.into_inner();

    let source = DbSource::new(db.async_connection.clone());
    let mut store: EntityListStore<Contact> =
        EntityListStore::new().with_load_timeout(store_config.load_timeout());

    load_store(&mut store, &source, &store_config).await?;

    store.set_predicate(FilterPredicate::new(
        search.unwrap_or_default(),
        CategorySelector::from(category),
    ));
    let contacts = store.view_page(page(&store_config, limit, offset)).to_vec();

    Ok(HttpResponse::Ok().json(ContactsResponse {
        contacts,
        total_count: store.view().len(),
    }))
}

pub async fn get_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();

    let contact = contacts_db::get_contact(db.async_connection.clone(), contact_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
        .ok_or_else(|| {
            actix_web::error::ErrorNotFound(format!("Contact {} not found", contact_id))
        })?;

    Ok(HttpResponse::Ok().json(contact))
}

pub async fn create_contact(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateContactRequest>,
) -> ActixResult<HttpResponse> {
    if request.first_name.trim().is_empty() {
        return Err(actix_web::error::ErrorBadRequest("First name is required"));
    }

    let contact = contacts_db::insert_contact(db.async_connection.clone(), &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Created().json(contact))
}

/// Flips the favourite flag in one statement so concurrent toggles never lose a flip
pub async fn toggle_favorite(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();

    let contact = contacts_db::toggle_favorite(db.async_connection.clone(), contact_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
        .ok_or_else(|| {
            actix_web::error::ErrorNotFound(format!("Contact {} not found", contact_id))
        })?;

    let message = if contact.is_favorite {
        format!("{} added to favorites", contact.full_name())
    } else {
        format!("{} removed from favorites", contact.full_name())
    };

    Ok(HttpResponse::Ok().json(FavoriteToggledResponse { contact, message }))
}
