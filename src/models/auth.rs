// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

use crate::models::roles::RoleKind;

// Representa uma conta vinda do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "admin@mjm.lk")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Registro: cria a conta do administrador e o perfil da mesquita
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "admin@mjm.lk")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mubeen Jummah Masjid")]
    pub masjid_name: String,

    #[schema(example = "Serving the community since 1952")]
    pub tagline: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID da conta
    pub exp: usize,
    pub iat: usize,
}

/// Uma mesquita que a conta pode acessar (própria ou como staff).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MasjidMembership {
    pub masjid_id: Uuid,
    #[schema(example = "Mubeen Jummah Masjid")]
    pub name: String,
    pub role: RoleKind,
}
