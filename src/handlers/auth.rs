// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{AuthResponse, LoginUserPayload, MasjidMembership, RegisterUserPayload, User},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta e mesquita criadas", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .register_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Conta autenticada", body = User),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// GET /api/users/me/masjids
#[utoipa::path(
    get,
    path = "/api/users/me/masjids",
    tag = "Users",
    responses(
        (status = 200, description = "Mesquitas acessíveis pela conta", body = Vec<MasjidMembership>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_masjids(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let masjids = app_state
        .roles_service
        .my_masjids(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(masjids))
}
