// src/handlers/events.rs

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
        rbac::{PermEvents, RequirePermission},
        tenancy::TenantContext,
    },
    models::{
        event::{
            AttendanceView, CreateEventPayload, Event, EventDetail, EventSummary, ScanOutcome,
            ScanPayload, SetAttendancePayload,
        },
        report::FilterQuery,
    },
};

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses(
        (status = 200, description = "Eventos com contadores de presença", body = Vec<EventSummary>)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let events = app_state
        .event_service
        .list(&mut *tx, tenant.masjid_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(events))
}

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Evento criado, presença aberta para todas as famílias", body = Event)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let event = app_state
        .event_service
        .create(&mut *tx, tenant.masjid_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(event)))
}

// GET /api/events/{id}
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    responses(
        (status = 200, description = "Evento com a lista de presença", body = EventDetail),
        (status = 404, description = "Evento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        FilterQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_event(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
    Path(event_id): Path<Uuid>,
    Query(filter): Query<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .event_service
        .detail(&mut *tx, tenant.masjid_id, event_id, filter.q.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// DELETE /api/events/{id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    responses(
        (status = 204, description = "Evento removido com as presenças"),
        (status = 404, description = "Evento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .event_service
        .delete(&mut *tx, tenant.masjid_id, event_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/events/{id}/scan
#[utoipa::path(
    post,
    path = "/api/events/{id}/scan",
    tag = "Events",
    request_body = ScanPayload,
    responses(
        (status = 200, description = "Entrega registrada (ou já registrada antes)", body = ScanOutcome),
        (status = 400, description = "QR inválido"),
        (status = 404, description = "Família sem presença neste evento")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn scan_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<ScanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let outcome = app_state
        .event_service
        .scan(&mut *tx, tenant.masjid_id, event_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outcome))
}

// PUT /api/events/{id}/attendance/{attendance_id}
#[utoipa::path(
    put,
    path = "/api/events/{id}/attendance/{attendance_id}",
    tag = "Events",
    request_body = SetAttendancePayload,
    responses(
        (status = 200, description = "Presença marcada ou desmarcada", body = AttendanceView),
        (status = 404, description = "Presença não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("attendance_id" = Uuid, Path, description = "ID da linha de presença"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermEvents>,
    Path((event_id, attendance_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetAttendancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let row = app_state
        .event_service
        .set_attendance(&mut *tx, tenant.masjid_id, event_id, attendance_id, payload.received)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(row))
}
