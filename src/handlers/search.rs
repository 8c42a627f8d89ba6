// src/handlers/search.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, db_utils::begin_rls_transaction},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermMembers, RequirePermission},
        tenancy::TenantContext,
    },
    models::search::{SearchParams, SearchResponse},
};

// GET /api/search?q=...
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    responses(
        (status = 200, description = "Classificação da busca e resultados", body = SearchResponse)
    ),
    params(
        SearchParams,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn search(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .search_service
        .search(&mut *tx, tenant.masjid_id, &params.q)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}
