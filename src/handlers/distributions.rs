// src/handlers/distributions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        db_utils::begin_rls_transaction,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermMembers, RequirePermission},
        tenancy::TenantContext,
    },
    models::distribution::{
        CreateDistributionPayload, DistributionQuery, DistributionRow, ServiceDistribution,
    },
};

// GET /api/distributions
#[utoipa::path(
    get,
    path = "/api/distributions",
    tag = "Distributions",
    responses(
        (status = 200, description = "Entregas de serviços às famílias", body = Vec<DistributionRow>)
    ),
    params(
        DistributionQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_distributions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Query(query): Query<DistributionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let rows = app_state
        .distribution_service
        .list(&mut *tx, tenant.masjid_id, query.family_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(rows))
}

// POST /api/distributions
#[utoipa::path(
    post,
    path = "/api/distributions",
    tag = "Distributions",
    request_body = CreateDistributionPayload,
    responses(
        (status = 201, description = "Entrega registrada", body = ServiceDistribution),
        (status = 400, description = "Família ausente ou QR inválido"),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_distribution(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Json(payload): Json<CreateDistributionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("familyId", e);
        AppError::ValidationError(errors).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let distribution = app_state
        .distribution_service
        .create(&mut *tx, tenant.masjid_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(distribution)))
}

// DELETE /api/distributions/{id}
#[utoipa::path(
    delete,
    path = "/api/distributions/{id}",
    tag = "Distributions",
    responses(
        (status = 204, description = "Entrega removida"),
        (status = 404, description = "Entrega não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da entrega"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_distribution(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path(distribution_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .distribution_service
        .delete(&mut *tx, tenant.masjid_id, distribution_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
