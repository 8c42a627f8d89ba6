// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
};

/// Lê o Bearer token e devolve a conta dona dele.
pub(crate) async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    app_state.auth_service.validate_token(bearer.token()).await
}

// O guard das rotas que só precisam de login (sem mesquita)
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
