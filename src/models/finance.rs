// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    /// Contribuição de uma família. Conta como entrada.
    Subscription,
}

impl TransactionKind {
    pub fn counts_as_income(self) -> bool {
        matches!(self, TransactionKind::Income | TransactionKind::Subscription)
    }
}

// ---
// Validação Customizada
// ---
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("must_not_be_negative".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("must_be_positive".into());
        return Err(err);
    }
    Ok(())
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,

    #[schema(ignore)]
    pub masjid_id: Uuid,

    #[schema(example = "1500.00")]
    pub amount: Decimal,

    #[schema(example = "Friday Donation")]
    pub description: String,

    #[schema(example = "Charity")]
    pub category: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    #[schema(value_type = String, format = Date, example = "2026-02-25")]
    pub date: NaiveDate,

    // Vínculos
    pub family_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "1500.00")]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "required"))]
    pub description: String,

    #[validate(length(min = 1, message = "required"))]
    pub category: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Sem data, vale o dia de hoje
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,

    pub family_id: Option<Uuid>,

    /// Alternativa ao familyId: o conteúdo lido do QR Code da família
    #[schema(example = "smart-masjeedh:family:550e8400-e29b-41d4-a716-446655440000")]
    pub family_qr: Option<String>,
}

impl CreateTransactionPayload {
    /// Regra: contribuição sem família não faz sentido.
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.kind == TransactionKind::Subscription
            && self.family_id.is_none()
            && self.family_qr.is_none()
        {
            return Err(ValidationError::new("FamilyRequiredForSubscription"));
        }
        Ok(())
    }
}

/// Linha pronta para inserir (montada pelos serviços de caixa, eventos e salários).
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub family_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
}

// Os cards do topo da tela de contas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Parte de `total_income` que veio de contribuições
    pub total_subscription: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionList {
    pub summary: FinancialSummary,
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(kind: TransactionKind, family_id: Option<Uuid>) -> CreateTransactionPayload {
        CreateTransactionPayload {
            amount: Decimal::from(100),
            description: "Monthly".into(),
            category: "Subscription".into(),
            kind,
            date: None,
            family_id,
            family_qr: None,
        }
    }

    #[test]
    fn subscription_needs_a_family() {
        assert!(payload(TransactionKind::Subscription, None).validate_consistency().is_err());
        assert!(payload(TransactionKind::Subscription, Some(Uuid::new_v4()))
            .validate_consistency()
            .is_ok());
        assert!(payload(TransactionKind::Income, None).validate_consistency().is_ok());
    }

    #[test]
    fn kind_uses_snake_case_on_the_wire() {
        let kind: TransactionKind = serde_json::from_str("\"subscription\"").unwrap();
        assert_eq!(kind, TransactionKind::Subscription);
        assert!(kind.counts_as_income());
        assert!(!TransactionKind::Expense.counts_as_income());
    }

    #[test]
    fn zero_is_not_negative() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::from(-5)).is_err());
        assert!(validate_positive(&Decimal::ZERO).is_err());
    }
}
