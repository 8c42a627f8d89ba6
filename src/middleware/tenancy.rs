// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{authenticate, AuthenticatedUser},
        i18n::Locale,
    },
    models::{auth::User, roles::Membership},
};

// O nome do nosso cabeçalho HTTP customizado
pub const MASJID_ID_HEADER: &str = "x-masjid-id";

/// A mesquita da requisição e o vínculo da conta com ela.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub masjid_id: Uuid,
    pub membership: Membership,
}

/// Sem cabeçalho, a mesquita é a do próprio usuário (o id dela é o id da conta).
fn requested_masjid(headers: &HeaderMap, user_id: Uuid) -> Result<Uuid, AppError> {
    match headers.get(MASJID_ID_HEADER) {
        None => Ok(user_id),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or(AppError::MasjidAccessDenied),
    }
}

async fn resolve_tenant(
    app_state: &AppState,
    headers: &HeaderMap,
) -> Result<(User, TenantContext), AppError> {
    let user = authenticate(app_state, headers).await?;
    let masjid_id = requested_masjid(headers, user.id)?;
    let membership = app_state.masjid_service.resolve_membership(&user, masjid_id).await?;
    Ok((user, TenantContext { masjid_id, membership }))
}

// Guard das rotas da mesquita: autentica, resolve a mesquita e o papel
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (user, tenant) = resolve_tenant(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::debug!(masjid_id = %tenant.masjid_id, user_id = %user.id, "tenant resolvido");

    request.extensions_mut().insert(AuthenticatedUser(user));
    request.extensions_mut().insert(tenant);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or(AppError::MasjidAccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_header_selects_own_masjid() {
        let user_id = Uuid::new_v4();
        assert_eq!(requested_masjid(&HeaderMap::new(), user_id).unwrap(), user_id);
    }

    #[test]
    fn header_selects_another_masjid() {
        let other = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(MASJID_ID_HEADER, HeaderValue::from_str(&other.to_string()).unwrap());
        assert_eq!(requested_masjid(&headers, Uuid::new_v4()).unwrap(), other);
    }

    #[test]
    fn malformed_header_is_denied() {
        let mut headers = HeaderMap::new();
        headers.insert(MASJID_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(
            requested_masjid(&headers, Uuid::new_v4()),
            Err(AppError::MasjidAccessDenied)
        ));
    }
}
