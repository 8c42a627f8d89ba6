// src/handlers/platform.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, rbac::RequirePlatformAdmin},
    models::masjid::{Masjid, UpdateMasjidStatusPayload, UpdateSubscriptionPayload},
};

// GET /api/platform/masjids
#[utoipa::path(
    get,
    path = "/api/platform/masjids",
    tag = "Platform",
    responses(
        (status = 200, description = "Todas as mesquitas da plataforma", body = Vec<Masjid>),
        (status = 403, description = "Apenas o dono da plataforma")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_masjids(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePlatformAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let masjids = app_state
        .masjid_service
        .list_masjids()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(masjids))
}

// PUT /api/platform/masjids/{id}/status
#[utoipa::path(
    put,
    path = "/api/platform/masjids/{id}/status",
    tag = "Platform",
    request_body = UpdateMasjidStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Masjid),
        (status = 404, description = "Mesquita não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da mesquita")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePlatformAdmin,
    Path(masjid_id): Path<Uuid>,
    Json(payload): Json<UpdateMasjidStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let masjid = app_state
        .masjid_service
        .set_status(masjid_id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(masjid))
}

// PUT /api/platform/masjids/{id}/subscription
#[utoipa::path(
    put,
    path = "/api/platform/masjids/{id}/subscription",
    tag = "Platform",
    request_body = UpdateSubscriptionPayload,
    responses(
        (status = 200, description = "Assinatura alterada", body = Masjid),
        (status = 404, description = "Mesquita não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da mesquita")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_subscription(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePlatformAdmin,
    Path(masjid_id): Path<Uuid>,
    Json(payload): Json<UpdateSubscriptionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let masjid = app_state
        .masjid_service
        .set_subscription(masjid_id, payload.subscription_status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(masjid))
}
