// src/models/staff.rs

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::finance::validate_positive;

// =============================================================================
//  FUNCIONÁRIOS (imam, muazzin...)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[schema(ignore)]
    pub masjid_id: Uuid,
    #[schema(example = "Abdullah")]
    pub name: String,
    #[schema(example = "Imam")]
    pub role: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(length(min = 1, message = "required"))]
    pub role: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayment {
    pub id: Uuid,
    #[schema(ignore)]
    pub masjid_id: Uuid,
    pub employee_id: Uuid,
    #[schema(example = "25000.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub notes: Option<String>,
    /// Lançamento de despesa gerado junto com o pagamento
    pub transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "25000.00")]
    pub amount: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub payments: Vec<EmployeePayment>,
    pub total_paid: Decimal,
}

// =============================================================================
//  DIRETORIA
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    pub id: Uuid,
    #[schema(ignore)]
    pub masjid_id: Uuid,
    #[schema(example = "Abdul Rahman")]
    pub full_name: String,
    #[schema(example = "President")]
    pub designation: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardMemberPayload {
    #[validate(length(min = 1, message = "required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "required"))]
    pub designation: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoardRank {
    President,
    Vice,
    Secretary,
    Treasurer,
    Member,
}

static RANK_PATTERNS: LazyLock<Vec<(BoardRank, Regex)>> = LazyLock::new(|| {
    // "vice" vem antes de "president" para "Vice President" cair em Vice
    [
        (BoardRank::Vice, r"(?i)vice|உப"),
        (BoardRank::President, r"(?i)president|தலைவர்"),
        (BoardRank::Secretary, r"(?i)secretary|செயலாளர்"),
        (BoardRank::Treasurer, r"(?i)treasurer|பொருளாளர்"),
    ]
    .into_iter()
    .map(|(rank, pattern)| (rank, Regex::new(pattern).expect("padrão de cargo inválido")))
    .collect()
});

impl BoardRank {
    pub fn from_designation(designation: &str) -> Self {
        let designation = designation.trim();
        RANK_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(designation))
            .map(|(rank, _)| *rank)
            .unwrap_or(BoardRank::Member)
    }
}

/// A diretoria agrupada por cargo, na ordem em que a tela mostra.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardRoster {
    pub president: Vec<BoardMember>,
    pub vice: Vec<BoardMember>,
    pub secretary: Vec<BoardMember>,
    pub treasurer: Vec<BoardMember>,
    pub member: Vec<BoardMember>,
}

impl BoardRoster {
    pub fn group(members: Vec<BoardMember>) -> Self {
        let mut roster = BoardRoster::default();
        for m in members {
            let bucket = match BoardRank::from_designation(&m.designation) {
                BoardRank::President => &mut roster.president,
                BoardRank::Vice => &mut roster.vice,
                BoardRank::Secretary => &mut roster.secretary,
                BoardRank::Treasurer => &mut roster.treasurer,
                BoardRank::Member => &mut roster.member,
            };
            bucket.push(m);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(name: &str, designation: &str) -> BoardMember {
        BoardMember {
            id: Uuid::new_v4(),
            masjid_id: Uuid::nil(),
            full_name: name.into(),
            designation: designation.into(),
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn english_designations() {
        assert_eq!(BoardRank::from_designation("President"), BoardRank::President);
        assert_eq!(BoardRank::from_designation("  SECRETARY "), BoardRank::Secretary);
        assert_eq!(BoardRank::from_designation("Treasurer"), BoardRank::Treasurer);
        assert_eq!(BoardRank::from_designation("Trustee"), BoardRank::Member);
    }

    #[test]
    fn every_rank_pattern_compiles() {
        assert_eq!(RANK_PATTERNS.len(), 4);
    }

    #[test]
    fn vice_president_is_vice() {
        assert_eq!(BoardRank::from_designation("Vice President"), BoardRank::Vice);
    }

    #[test]
    fn tamil_designations() {
        assert_eq!(BoardRank::from_designation("தலைவர்"), BoardRank::President);
        assert_eq!(BoardRank::from_designation("உப தலைவர்"), BoardRank::Vice);
        assert_eq!(BoardRank::from_designation("செயலாளர்"), BoardRank::Secretary);
        assert_eq!(BoardRank::from_designation("பொருளாளர்"), BoardRank::Treasurer);
    }

    #[test]
    fn roster_groups_by_rank() {
        let roster = BoardRoster::group(vec![
            board("A", "President"),
            board("B", "Vice President"),
            board("C", "Member"),
            board("D", "Committee"),
        ]);
        assert_eq!(roster.president.len(), 1);
        assert_eq!(roster.vice.len(), 1);
        assert_eq!(roster.member.len(), 2);
        assert!(roster.secretary.is_empty());
    }
}
