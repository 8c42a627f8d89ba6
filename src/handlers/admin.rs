// src/handlers/admin.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser, i18n::Locale, rbac::RequireSuperAdmin, tenancy::TenantContext,
    },
    models::roles::{AdminOverview, InvitePayload, RoleInvitation, TogglePermissionPayload, UserRole},
};

// =============================================================================
//  TELA DE ADMIN (super_admin da mesquita)
// =============================================================================

// GET /api/admin
#[utoipa::path(
    get,
    path = "/api/admin",
    tag = "Admin",
    responses(
        (status = 200, description = "Usuários e convites da mesquita", body = AdminOverview),
        (status = 403, description = "Apenas o super_admin")
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireSuperAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let overview = app_state
        .roles_service
        .overview(tenant.masjid_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(overview))
}

// POST /api/admin/invitations
#[utoipa::path(
    post,
    path = "/api/admin/invitations",
    tag = "Admin",
    request_body = InvitePayload,
    responses(
        (status = 201, description = "Convite criado", body = RoleInvitation),
        (status = 400, description = "E-mail inválido ou papel não convidável")
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn invite_user(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireSuperAdmin,
    Json(payload): Json<InvitePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let invitation = app_state
        .roles_service
        .invite(tenant.masjid_id, &payload.email, payload.role)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(invitation)))
}

// DELETE /api/admin/invitations/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/invitations/{id}",
    tag = "Admin",
    responses(
        (status = 200, description = "Convite revogado", body = RoleInvitation),
        (status = 404, description = "Convite não encontrado ou já respondido")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do convite"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn revoke_invitation(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireSuperAdmin,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let invitation = app_state
        .roles_service
        .revoke(tenant.masjid_id, invitation_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invitation))
}

// DELETE /api/admin/roles/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/roles/{id}",
    tag = "Admin",
    responses(
        (status = 204, description = "Usuário removido da mesquita"),
        (status = 403, description = "O super_admin não pode ser removido"),
        (status = 404, description = "Vínculo não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do vínculo (user_roles)"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_user(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireSuperAdmin,
    Path(role_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .roles_service
        .remove(tenant.masjid_id, role_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/admin/roles/{id}/permissions
#[utoipa::path(
    post,
    path = "/api/admin/roles/{id}/permissions",
    tag = "Admin",
    request_body = TogglePermissionPayload,
    responses(
        (status = 200, description = "Permissão invertida", body = UserRole),
        (status = 404, description = "Vínculo não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do vínculo (user_roles)"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_permission(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireSuperAdmin,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<TogglePermissionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let role = app_state
        .roles_service
        .toggle_permission(tenant.masjid_id, role_id, payload.area)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(role))
}

// =============================================================================
//  CONVITES (lado de quem foi convidado)
// =============================================================================

// POST /api/invitations/{id}/accept
#[utoipa::path(
    post,
    path = "/api/invitations/{id}/accept",
    tag = "Admin",
    responses(
        (status = 200, description = "Convite aceito, acesso concedido", body = UserRole),
        (status = 403, description = "O convite é para outro e-mail"),
        (status = 404, description = "Convite não encontrado ou já respondido")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do convite")
    ),
    security(("api_jwt" = []))
)]
pub async fn accept_invitation(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let role = app_state
        .roles_service
        .accept_invitation(&user, invitation_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(role))
}
