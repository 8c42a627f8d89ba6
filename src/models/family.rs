// src/models/family.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{
    finance::{validate_not_negative, Transaction},
    member::Member,
};

// ---
// Família (o "domicílio")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: Uuid,

    #[schema(ignore)]
    pub masjid_id: Uuid,

    #[schema(example = "FAM-001")]
    pub family_code: String,

    #[schema(example = "Abdul Rahman")]
    pub head_name: String,

    pub address: Option<String>,
    pub phone: Option<String>,

    /// Valor mensal esperado da contribuição
    #[schema(example = "500.00")]
    pub subscription_amount: Decimal,

    pub is_widow_head: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "FAM-001")]
    pub family_code: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Abdul Rahman")]
    pub head_name: String,

    pub address: Option<String>,
    pub phone: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub subscription_amount: Decimal,

    #[serde(default)]
    pub is_widow_head: bool,
}

/// Saldo da contribuição: uma subtração, esperado menos pago.
/// Negativo significa pagamento adiantado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionBalance {
    pub expected: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

impl SubscriptionBalance {
    pub fn new(expected: Decimal, paid: Decimal) -> Self {
        Self { expected, paid, outstanding: expected - paid }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDetail {
    #[serde(flatten)]
    pub family: Family,
    #[schema(example = "smart-masjeedh:family:550e8400-e29b-41d4-a716-446655440000")]
    pub qr_payload: String,
    pub members: Vec<Member>,
    pub payments: Vec<Transaction>,
    pub subscription: SubscriptionBalance,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScanQuery {
    pub payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outstanding_is_expected_minus_paid() {
        let balance = SubscriptionBalance::new(Decimal::new(50000, 2), Decimal::new(35000, 2));
        assert_eq!(balance.outstanding, Decimal::new(15000, 2));
    }

    #[test]
    fn overpayment_turns_negative() {
        let balance = SubscriptionBalance::new(Decimal::from(500), Decimal::from(750));
        assert_eq!(balance.outstanding, Decimal::from(-250));
    }

    #[test]
    fn payload_rejects_negative_subscription() {
        let payload = FamilyPayload {
            family_code: "FAM-001".into(),
            head_name: "Abdul Rahman".into(),
            address: None,
            phone: None,
            subscription_amount: Decimal::from(-1),
            is_widow_head: false,
        };
        assert!(payload.validate().is_err());
    }
}
