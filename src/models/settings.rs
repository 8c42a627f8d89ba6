// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Identidade visual da mesquita (nome, slogan e logo).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MasjidSettings {
    #[schema(ignore)] // O contexto (Header) já define a mesquita
    pub masjid_id: Uuid,

    #[schema(example = "Mubeen Jummah Masjid")]
    pub name: String,

    #[schema(example = "Serving the community since 1952")]
    pub tagline: Option<String>,

    // Pode ser uma URL ou um data URL em base64 (o app antigo fazia assim)
    #[schema(example = "https://cdn.mjm.lk/logo.png")]
    pub logo_url: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mubeen Jummah Masjid")]
    pub name: String,

    pub tagline: Option<String>,

    #[validate(length(max = 2000000, message = "logo_too_large"))]
    pub logo_url: Option<String>,
}
