// src/models/member.rs

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,

    #[schema(ignore)]
    pub masjid_id: Uuid,

    pub family_id: Uuid,

    #[schema(example = "Mohamed Saleem")]
    pub full_name: String,

    #[schema(example = "Son")]
    pub relationship: Option<String>,

    /// Calculada no cadastro a partir da data de nascimento; não é recalculada depois.
    #[schema(example = 24)]
    pub age: Option<i32>,

    #[schema(value_type = Option<String>, format = Date, example = "2001-03-14")]
    pub dob: Option<NaiveDate>,

    #[schema(example = "Male")]
    pub gender: Option<String>,

    pub nic: Option<String>,
    pub phone: Option<String>,

    #[schema(example = "Single")]
    pub civil_status: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mohamed Saleem")]
    pub full_name: String,

    pub relationship: Option<String>,

    #[validate(range(min = 0, max = 150, message = "invalid_age"))]
    pub age: Option<i32>,

    #[validate(custom(function = "validate_dob"))]
    #[schema(value_type = Option<String>, format = Date, example = "2001-03-14")]
    pub dob: Option<NaiveDate>,

    pub gender: Option<String>,
    pub nic: Option<String>,
    pub phone: Option<String>,
    pub civil_status: Option<String>,
}

fn validate_dob(dob: &NaiveDate) -> Result<(), ValidationError> {
    check_dob(*dob, Utc::now().date_naive())
}

/// Nascimento no futuro viraria idade negativa.
pub fn check_dob(dob: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if dob > today {
        let mut err = ValidationError::new("invalid_dob");
        err.message = Some("invalid_dob".into());
        return Err(err);
    }
    Ok(())
}

impl MemberPayload {
    /// Com data de nascimento, a idade é derivada dela; sem, vale a idade informada.
    pub fn resolved_age(&self, today: NaiveDate) -> Option<i32> {
        match self.dob {
            Some(dob) => Some(age_on(dob, today)),
            None => self.age,
        }
    }
}

/// Diferença de anos do calendário, menos um se o aniversário ainda não chegou.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn birthday_already_passed() {
        assert_eq!(age_on(d(1990, 1, 15), d(2026, 2, 25)), 36);
    }

    #[test]
    fn birthday_not_yet_reached() {
        assert_eq!(age_on(d(1990, 5, 10), d(2026, 2, 25)), 35);
        assert_eq!(age_on(d(1990, 2, 26), d(2026, 2, 25)), 35);
    }

    #[test]
    fn birthday_is_today() {
        assert_eq!(age_on(d(2000, 2, 25), d(2026, 2, 25)), 26);
    }

    #[test]
    fn leap_day_birthdays() {
        assert_eq!(age_on(d(2000, 2, 29), d(2026, 2, 28)), 25);
        assert_eq!(age_on(d(2000, 2, 29), d(2026, 3, 1)), 26);
    }

    #[test]
    fn dob_overrides_typed_age() {
        let payload = MemberPayload {
            full_name: "Ayesha".into(),
            relationship: Some("Daughter".into()),
            age: Some(99),
            dob: Some(d(2010, 6, 1)),
            gender: Some("Female".into()),
            nic: None,
            phone: None,
            civil_status: None,
        };
        assert_eq!(payload.resolved_age(d(2026, 2, 25)), Some(15));
    }

    #[test]
    fn rejects_impossible_ages() {
        let payload = MemberPayload {
            full_name: "Ayesha".into(),
            relationship: None,
            age: Some(-3),
            dob: None,
            gender: None,
            nic: None,
            phone: None,
            civil_status: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn rejects_birth_dates_in_the_future() {
        assert!(check_dob(d(2030, 1, 1), d(2026, 2, 25)).is_err());
        assert!(check_dob(d(2026, 2, 26), d(2026, 2, 25)).is_err());
        assert!(check_dob(d(2026, 2, 25), d(2026, 2, 25)).is_ok());

        let payload = MemberPayload {
            full_name: "Ayesha".into(),
            relationship: None,
            age: None,
            dob: Some(d(2999, 1, 1)),
            gender: None,
            nic: None,
            phone: None,
            civil_status: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("dob"));
    }
}
