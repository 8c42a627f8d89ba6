// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, db_utils::begin_rls_transaction},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::dashboard::HomeSummary,
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cards da tela inicial", body = HomeSummary)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let summary = app_state
        .dashboard_service
        .get_summary(&mut *tx, tenant.masjid_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
