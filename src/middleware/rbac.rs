// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::roles::PermissionArea,
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn area() -> PermissionArea;
}

/// Entrada do catálogo servido em GET /api/permissions
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PermissionInfo {
    pub slug: &'static str,
    pub description: &'static str,
}

inventory::collect!(PermissionInfo);

pub fn permission_catalogue() -> Vec<PermissionInfo> {
    let mut all: Vec<PermissionInfo> = inventory::iter::<PermissionInfo>.into_iter().copied().collect();
    all.sort_by_key(|p| p.slug);
    all
}

// Rejeição já traduzida com o idioma da requisição
async fn reject<S>(parts: &mut Parts, state: &S, err: AppError) -> ApiError
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    let app_state = AppState::from_ref(state);
    let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
    err.to_api_error(&locale, &app_state.i18n_store)
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let allowed = parts
            .extensions
            .get::<TenantContext>()
            .map(|tenant| tenant.membership.can(T::area()));

        match allowed {
            Some(true) => Ok(RequirePermission(PhantomData)),
            Some(false) => Err(reject(parts, state, AppError::PermissionDenied(T::area().slug())).await),
            None => Err(reject(parts, state, AppError::MasjidAccessDenied).await),
        }
    }
}

/// Só o super_admin da mesquita (tela de Admin).
pub struct RequireSuperAdmin;

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let is_admin = parts
            .extensions
            .get::<TenantContext>()
            .map(|tenant| tenant.membership.is_super_admin());

        match is_admin {
            Some(true) => Ok(RequireSuperAdmin),
            Some(false) => Err(reject(parts, state, AppError::SuperAdminOnly).await),
            None => Err(reject(parts, state, AppError::MasjidAccessDenied).await),
        }
    }
}

/// Só o dono da plataforma (e-mail em SUPERADMIN_EMAIL).
pub struct RequirePlatformAdmin;

impl<S> FromRequestParts<S> for RequirePlatformAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let allowed = parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|user| app_state.config.is_platform_admin(&user.0.email));

        match allowed {
            Some(true) => Ok(RequirePlatformAdmin),
            Some(false) => Err(reject(parts, state, AppError::PlatformAdminOnly).await),
            None => Err(reject(parts, state, AppError::InvalidToken).await),
        }
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermAccounts;
impl PermissionDef for PermAccounts {
    fn area() -> PermissionArea { PermissionArea::Accounts }
}
inventory::submit! {
    PermissionInfo { slug: "accounts", description: "Caixa: lançamentos, resumo e relatório" }
}

pub struct PermEvents;
impl PermissionDef for PermEvents {
    fn area() -> PermissionArea { PermissionArea::Events }
}
inventory::submit! {
    PermissionInfo { slug: "events", description: "Eventos, leitura de QR e presença" }
}

pub struct PermMembers;
impl PermissionDef for PermMembers {
    fn area() -> PermissionArea { PermissionArea::Members }
}
inventory::submit! {
    PermissionInfo { slug: "members", description: "Famílias, membros, busca e distribuições" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_lists_every_area() {
        let slugs: Vec<&str> = permission_catalogue().iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["accounts", "events", "members"]);
    }

    #[test]
    fn catalogue_slugs_match_the_areas() {
        assert_eq!(PermAccounts::area().slug(), "accounts");
        assert_eq!(PermEvents::area().slug(), "events");
        assert_eq!(PermMembers::area().slug(), "members");
    }
}
