// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::finance::FinancialSummary;

// Os cards da tela inicial
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
    pub family_count: i64,
    pub member_count: i64,
    pub event_count: i64,
    pub finance: FinancialSummary,
}
