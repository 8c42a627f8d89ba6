// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, rbac::RequireSuperAdmin, tenancy::TenantContext},
    models::settings::{MasjidSettings, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Perfil da mesquita", body = MasjidSettings)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    // `masjids` não tem RLS: o tenant_guard já validou o acesso
    let settings = app_state
        .masjid_service
        .get_settings(tenant.masjid_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settings)))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Perfil atualizado", body = MasjidSettings),
        (status = 403, description = "Apenas o super_admin")
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireSuperAdmin,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .masjid_service
        .update_settings(tenant.masjid_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}
