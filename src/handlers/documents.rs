// src/handlers/documents.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, db_utils::begin_rls_transaction, qr},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermAccounts, PermEvents, PermMembers, RequirePermission},
        tenancy::TenantContext,
    },
    models::report::ReportQuery,
};

// Headers para o navegador baixar o PDF
fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
    ];
    (headers, bytes).into_response()
}

// =============================================================================
//  FAMÍLIAS
// =============================================================================

// GET /api/families/report.pdf
#[utoipa::path(
    get,
    path = "/api/families/report.pdf",
    tag = "Documents",
    responses(
        (status = 200, description = "Relatório de famílias"),
        (status = 400, description = "Coluna desconhecida")
    ),
    params(
        ReportQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn families_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .families_report(&mut *tx, tenant.masjid_id, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(pdf_bytes, "families.pdf"))
}

// GET /api/families/{id}/card
#[utoipa::path(
    get,
    path = "/api/families/{id}/card",
    tag = "Documents",
    responses(
        (status = 200, description = "Cartão da família com QR Code"),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn family_card(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path(family_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .family_card(&mut *tx, tenant.masjid_id, family_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(pdf_bytes, &format!("family_{}.pdf", family_id)))
}

// GET /api/families/{id}/qr
#[utoipa::path(
    get,
    path = "/api/families/{id}/qr",
    tag = "Documents",
    responses(
        (status = 200, description = "QR Code da família"),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da família"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn family_qr(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMembers>,
    Path(family_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Só gera o código de famílias desta mesquita
    let family = app_state
        .family_service
        .find(&mut *tx, tenant.masjid_id, family_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let png = qr::render_png(&qr::encode_family(family.id))
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

// =============================================================================
//  CAIXA E EVENTOS
// =============================================================================

// GET /api/accounts/report.pdf
#[utoipa::path(
    get,
    path = "/api/accounts/report.pdf",
    tag = "Documents",
    responses(
        (status = 200, description = "Relatório do caixa"),
        (status = 400, description = "Coluna desconhecida")
    ),
    params(
        ReportQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn accounts_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAccounts>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .transactions_report(&mut *tx, tenant.masjid_id, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(pdf_bytes, "accounts.pdf"))
}

// GET /api/events/report.pdf
#[utoipa::path(
    get,
    path = "/api/events/report.pdf",
    tag = "Documents",
    responses(
        (status = 200, description = "Relatório de eventos"),
        (status = 400, description = "Coluna desconhecida")
    ),
    params(
        ReportQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn events_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .events_report(&mut *tx, tenant.masjid_id, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(pdf_bytes, "events.pdf"))
}

// GET /api/events/{id}/report.pdf
#[utoipa::path(
    get,
    path = "/api/events/{id}/report.pdf",
    tag = "Documents",
    responses(
        (status = 200, description = "Lista de presença do evento"),
        (status = 400, description = "Coluna desconhecida"),
        (status = 404, description = "Evento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ReportQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn attendance_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .attendance_report(&mut *tx, tenant.masjid_id, event_id, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(pdf_bytes, &format!("event_{}_attendance.pdf", event_id)))
}
