// src/handlers/accounts.rs

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
        rbac::{PermAccounts, RequirePermission},
        tenancy::TenantContext,
    },
    models::{
        finance::{CreateTransactionPayload, FinancialSummary, Transaction, TransactionList},
        report::FilterQuery,
    },
};

// GET /api/accounts/transactions
#[utoipa::path(
    get,
    path = "/api/accounts/transactions",
    tag = "Accounts",
    responses(
        (status = 200, description = "Lançamentos e resumo do caixa", body = TransactionList)
    ),
    params(
        FilterQuery,
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAccounts>,
    Query(filter): Query<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let list = app_state
        .finance_service
        .list(&mut *tx, tenant.masjid_id, filter.q.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(list))
}

// POST /api/accounts/transactions
#[utoipa::path(
    post,
    path = "/api/accounts/transactions",
    tag = "Accounts",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, description = "Lançamento registrado", body = Transaction),
        (status = 400, description = "Dados inválidos ou QR inválido"),
        (status = 404, description = "Família não encontrada")
    ),
    params(
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAccounts>,
    Json(payload): Json<CreateTransactionPayload>,
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

    let transaction = app_state
        .finance_service
        .create(&mut *tx, tenant.masjid_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// DELETE /api/accounts/transactions/{id}
#[utoipa::path(
    delete,
    path = "/api/accounts/transactions/{id}",
    tag = "Accounts",
    responses(
        (status = 204, description = "Lançamento removido"),
        (status = 404, description = "Lançamento não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do lançamento"),
        ("x-masjid-id" = Option<Uuid>, Header, description = "ID da mesquita (padrão: a da conta)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAccounts>,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .finance_service
        .delete(&mut *tx, tenant.masjid_id, transaction_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/accounts/summary
#[utoipa::path(
    get,
    path = "/api/accounts/summary",
    tag = "Accounts",
    responses(
        (status = 200, description = "Entradas, saídas e saldo", body = FinancialSummary)
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
    _guard: RequirePermission<PermAccounts>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let summary = app_state
        .finance_service
        .summary(&mut *tx, tenant.masjid_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
