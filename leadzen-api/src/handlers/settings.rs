use crate::config::ApiConfig;
use actix_web::{web, HttpResponse, Result};
use leadzen_core::permissions::catalog;
use shared_types::{PermissionPolicy, SettingsResponse};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsAppState {
    pub config: Arc<ApiConfig>,
    pub config_path: PathBuf,
}

fn permission_policy(config: &ApiConfig) -> PermissionPolicy {
    let permissions = config.permissions();
    PermissionPolicy {
        required: catalog::required_permissions(),
        optional: catalog::optional_permissions(),
        special: catalog::SPECIAL.iter().copied().map(Into::into).collect(),
        freshness_window_secs: permissions.freshness_window_secs,
        check_timeout_secs: permissions.check_timeout_secs,
        request_timeout_secs: permissions.request_timeout_secs,
    }
}

pub async fn get_settings(data: web::Data<SettingsAppState>) -> Result<HttpResponse> {
    let store = data.config.store();

    Ok(HttpResponse::Ok().json(SettingsResponse {
        config_file_path: data.config_path.to_string_lossy().to_string(),
        page_size: store.page_size,
        load_timeout_secs: store.load_timeout_secs,
        permissions: permission_policy(&data.config),
    }))
}

pub async fn get_permission_policy(data: web::Data<SettingsAppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(permission_policy(&data.config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_policy_lists_catalog_sets() {
        let state = SettingsAppState {
            config: Arc::new(ApiConfig::default()),
            config_path: PathBuf::from("/tmp/leadzen/api.toml"),
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/api/permissions", web::get().to(get_permission_policy)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/permissions").to_request();
        let policy: PermissionPolicy = test::call_and_read_body_json(&app, req).await;

        assert_eq!(policy.required.len(), 3);
        assert_eq!(
            policy.special,
            vec![shared_types::PermissionId::from(catalog::SYSTEM_ALERT_WINDOW)]
        );
        assert_eq!(policy.freshness_window_secs, 5);
    }
}
