// src/models/masjid.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "masjid_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MasjidStatus {
    Pending,
    Approved,
    Deactivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Paid,
    Expired,
}

// ---
// Masjid (o "Tenant")
// ---
// O id é o mesmo da conta do administrador que a registrou.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Masjid {
    pub id: Uuid,
    #[schema(example = "Mubeen Jummah Masjid")]
    pub name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub admin_email: Option<String>,
    pub status: MasjidStatus,
    pub subscription_status: Option<SubscriptionStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMasjidStatusPayload {
    pub status: MasjidStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionPayload {
    pub subscription_status: Option<SubscriptionStatus>,
}
