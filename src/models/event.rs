// src/models/event.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    #[schema(ignore)]
    pub masjid_id: Uuid,
    #[schema(example = "Ramadan Ration 2026")]
    pub name: String,
    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Linha da listagem de eventos, com os contadores de presença.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub total_families: i64,
    pub received_count: i64,
}

// O status em texto não é gravado: é derivado de `received`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    Pending,
    Received,
}

impl From<bool> for AttendanceStatus {
    fn from(received: bool) -> Self {
        if received { AttendanceStatus::Received } else { AttendanceStatus::Pending }
    }
}

impl AttendanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "Pending",
            AttendanceStatus::Received => "Received",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendance {
    pub id: Uuid,
    pub event_id: Uuid,
    pub family_id: Uuid,
    #[schema(example = "FAM-001")]
    pub family_code: String,
    pub head_name: String,
    pub received: bool,
    pub received_at: Option<DateTime<Utc>>,
}

impl EventAttendance {
    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::from(self.received)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    #[serde(flatten)]
    pub attendance: EventAttendance,
    pub status: AttendanceStatus,
}

impl From<EventAttendance> for AttendanceView {
    fn from(attendance: EventAttendance) -> Self {
        let status = attendance.status();
        Self { attendance, status }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub received_count: usize,
    pub pending_count: usize,
    pub attendance: Vec<AttendanceView>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ramadan Ration 2026")]
    pub name: String,

    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanPayload {
    #[schema(example = "smart-masjeedh:family:550e8400-e29b-41d4-a716-446655440000")]
    pub payload: String,

    /// Grava também um lançamento de valor zero no caixa, como registro
    #[serde(default)]
    pub log_transaction: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub family_id: Uuid,
    pub family_code: String,
    pub head_name: String,
    /// A família já estava marcada antes desta leitura
    pub already_received: bool,
    pub logged_transaction_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAttendancePayload {
    pub received: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_derived_from_the_flag() {
        assert_eq!(AttendanceStatus::from(true), AttendanceStatus::Received);
        assert_eq!(AttendanceStatus::from(false), AttendanceStatus::Pending);
    }

    #[test]
    fn view_serializes_legacy_status_field() {
        let row = EventAttendance {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            family_code: "FAM-002".into(),
            head_name: "Ibrahim".into(),
            received: true,
            received_at: Some(Utc::now()),
        };
        let json = serde_json::to_value(AttendanceView::from(row)).unwrap();
        assert_eq!(json["status"], "Received");
        assert_eq!(json["received"], true);
        assert_eq!(json["familyCode"], "FAM-002");
    }
}
