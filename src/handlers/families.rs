// src/handlers/families.rs

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
    models::{
        family::{Family, FamilyDetail, FamilyPayload, ScanQuery},
        member::{Member, MemberPayload},
        report::FilterQuery,
    },
};

// =============================================================================
//  FAMÍLIAS
// =============================================================================

// GET /api/families
#[utoipa::path(
    get,
    path = "/api/families",
    tag = "Families",
    responses(
        (status = 200, description = "Famílias da mesquita", body = Vec<Family>)
    ),
    params(
        FilterQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_families(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Query(filter): Query<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let families = app_state
        .family_service
        .list(&mut *tx, tenant.masjid_id, filter.q.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(families))
}

// POST /api/families
#[utoipa::path(
    post,
    path = "/api/families",
    tag = "Families",
    request_body = FamilyPayload,
    responses(
        (status = 201, description = "Família cadastrada", body = Family),
        (status = 409, description = "Código de família já usado")
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_family(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Json(payload): Json<FamilyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let family = app_state
        .family_service
        .create(&mut *tx, tenant.masjid_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(family)))
}

// GET /api/families/scan?payload=...
#[utoipa::path(
    get,
    path = "/api/families/scan",
    tag = "Families",
    responses(
        (status = 200, description = "Família do QR lido", body = Family),
        (status = 400, description = "QR inválido"),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ScanQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn scan_family(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Query(query): Query<ScanQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let family = app_state
        .family_service
        .scan(&mut *tx, tenant.masjid_id, &query.payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(family))
}

// GET /api/families/{id}
#[utoipa::path(
    get,
    path = "/api/families/{id}",
    tag = "Families",
    responses(
        (status = 200, description = "Família com membros, pagamentos e saldo", body = FamilyDetail),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_family(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path(family_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .family_service
        .detail(&mut *tx, tenant.masjid_id, family_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// PUT /api/families/{id}
#[utoipa::path(
    put,
    path = "/api/families/{id}",
    tag = "Families",
    request_body = FamilyPayload,
    responses(
        (status = 200, description = "Família atualizada", body = Family),
        (status = 404, description = "Família não encontrada"),
        (status = 409, description = "Código de família já usado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_family(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path(family_id): Path<Uuid>,
    Json(payload): Json<FamilyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let family = app_state
        .family_service
        .update(&mut *tx, tenant.masjid_id, family_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(family))
}

// DELETE /api/families/{id}
#[utoipa::path(
    delete,
    path = "/api/families/{id}",
    tag = "Families",
    responses(
        (status = 204, description = "Família removida (com membros e presenças)"),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_family(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path(family_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .family_service
        .delete(&mut *tx, tenant.masjid_id, family_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  MEMBROS
// =============================================================================

// POST /api/families/{id}/members
#[utoipa::path(
    post,
    path = "/api/families/{id}/members",
    tag = "Families",
    request_body = MemberPayload,
    responses(
        (status = 201, description = "Membro adicionado", body = Member),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_member(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path(family_id): Path<Uuid>,
    Json(payload): Json<MemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .family_service
        .add_member(&mut *tx, tenant.masjid_id, family_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(member)))
}

// PUT /api/families/{id}/members/{member_id}
#[utoipa::path(
    put,
    path = "/api/families/{id}/members/{member_id}",
    tag = "Families",
    request_body = MemberPayload,
    responses(
        (status = 200, description = "Membro atualizado", body = Member),
        (status = 404, description = "Membro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("member_id" = Uuid, Path, description = "ID do membro"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path((family_id, member_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .family_service
        .update_member(&mut *tx, tenant.masjid_id, family_id, member_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// DELETE /api/families/{id}/members/{member_id}
#[utoipa::path(
    delete,
    path = "/api/families/{id}/members/{member_id}",
    tag = "Families",
    responses(
        (status = 204, description = "Membro removido"),
        (status = 404, description = "Membro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("member_id" = Uuid, Path, description = "ID do membro"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_member(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path((family_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .family_service
        .delete_member(&mut *tx, tenant.masjid_id, family_id, member_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
