// src/handlers/staff.rs

use axum::{
    extract::{Path, State},
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
        rbac::{PermAccounts, RequirePermission},
        tenancy::TenantContext,
    },
    models::staff::{
        BoardMember, BoardMemberPayload, BoardRoster, CreatePaymentPayload, Employee,
        EmployeeDetail, EmployeePayload, EmployeePayment,
    },
};

// =============================================================================
//  ÁREA 1: FUNCIONÁRIOS
// =============================================================================

// GET /api/staff/employees
#[utoipa::path(
    get,
    path = "/api/staff/employees",
    tag = "Staff",
    responses(
        (status = 200, description = "Funcionários (lista vazia se a tabela ainda não existe)", body = Vec<Employee>)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let employees = app_state
        .staff_service
        .list_employees(&mut *tx, tenant.masjid_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(employees))
}

// POST /api/staff/employees
#[utoipa::path(
    post,
    path = "/api/staff/employees",
    tag = "Staff",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Funcionário cadastrado", body = Employee)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .staff_service
        .create_employee(&mut *tx, tenant.masjid_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(employee)))
}

// GET /api/staff/employees/{id}
#[utoipa::path(
    get,
    path = "/api/staff/employees/{id}",
    tag = "Staff",
    responses(
        (status = 200, description = "Funcionário com histórico de pagamentos", body = EmployeeDetail),
        (status = 404, description = "Funcionário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .staff_service
        .employee_detail(&mut *tx, tenant.masjid_id, employee_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// PUT /api/staff/employees/{id}
#[utoipa::path(
    put,
    path = "/api/staff/employees/{id}",
    tag = "Staff",
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Funcionário atualizado", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(employee_id): Path<Uuid>,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .staff_service
        .update_employee(&mut *tx, tenant.masjid_id, employee_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(employee))
}

// DELETE /api/staff/employees/{id}
#[utoipa::path(
    delete,
    path = "/api/staff/employees/{id}",
    tag = "Staff",
    responses(
        (status = 204, description = "Funcionário removido"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .staff_service
        .delete_employee(&mut *tx, tenant.masjid_id, employee_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/staff/employees/{id}/payments
#[utoipa::path(
    post,
    path = "/api/staff/employees/{id}/payments",
    tag = "Staff",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Salário pago e lançado como despesa", body = EmployeePayment),
        (status = 403, description = "Sem permissão de caixa"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_salary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAccounts>,
    Path(employee_id): Path<Uuid>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let payment = app_state
        .staff_service
        .pay_salary(&mut *tx, tenant.masjid_id, employee_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// =============================================================================
//  ÁREA 2: DIRETORIA
// =============================================================================

// GET /api/staff/board
#[utoipa::path(
    get,
    path = "/api/staff/board",
    tag = "Staff",
    responses(
        (status = 200, description = "Diretoria agrupada por cargo", body = BoardRoster)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_board(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let roster = app_state
        .staff_service
        .board_roster(&mut *tx, tenant.masjid_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(roster))
}

// POST /api/staff/board
#[utoipa::path(
    post,
    path = "/api/staff/board",
    tag = "Staff",
    request_body = BoardMemberPayload,
    responses(
        (status = 201, description = "Membro da diretoria cadastrado", body = BoardMember)
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_board_member(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<BoardMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .staff_service
        .create_board_member(&mut *tx, tenant.masjid_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(member)))
}

// PUT /api/staff/board/{id}
#[utoipa::path(
    put,
    path = "/api/staff/board/{id}",
    tag = "Staff",
    request_body = BoardMemberPayload,
    responses(
        (status = 200, description = "Membro da diretoria atualizado", body = BoardMember),
        (status = 404, description = "Membro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do membro da diretoria"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_board_member(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<BoardMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .staff_service
        .update_board_member(&mut *tx, tenant.masjid_id, member_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// DELETE /api/staff/board/{id}
#[utoipa::path(
    delete,
    path = "/api/staff/board/{id}",
    tag = "Staff",
    responses(
        (status = 204, description = "Membro da diretoria removido"),
        (status = 404, description = "Membro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do membro da diretoria"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_board_member(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .staff_service
        .delete_board_member(&mut *tx, tenant.masjid_id, member_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
