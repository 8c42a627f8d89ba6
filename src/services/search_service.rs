// src/services/search_service.rs

use std::sync::LazyLock;

use regex::Regex;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FamilyRepository,
    models::search::{FamilyQuery, Gender, SearchResponse},
};

static WIDOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)widow|விதவை").expect("padrão WIDOW inválido"));

// 20-30, 20 – 30, 20 to 30, 20 முதல் 30, 20-30வயது
static AGE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3})\s*(?:-|–|—|to|முதல்)\s*(\d{1,3})(?:\b|\s*(?:வயது|yrs?|years?))")
        .expect("padrão AGE_RANGE inválido")
});

static SINGLE_AGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}$").expect("padrão SINGLE_AGE inválido"));

const MALE_WORDS: &[&str] = &["male", "males", "man", "men", "boy", "boys", "ஆண்", "ஆண்கள்"];
const FEMALE_WORDS: &[&str] = &["female", "females", "woman", "women", "girl", "girls", "பெண்", "பெண்கள்"];
const AGE_FILLERS: &[&str] = &["age", "aged", "years", "year", "yrs", "yr", "old", "வயது"];

fn tokens(input: &str) -> impl Iterator<Item = String> + '_ {
    input
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ':' | ';'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn gender_of(token: &str) -> Option<Gender> {
    if MALE_WORDS.contains(&token) {
        Some(Gender::Male)
    } else if FEMALE_WORDS.contains(&token) {
        Some(Gender::Female)
    } else {
        None
    }
}

/// Classifica o texto da busca. Na dúvida, vira busca textual.
pub fn parse_query(input: &str) -> FamilyQuery {
    let trimmed = input.trim();
    let text = || FamilyQuery::Text { query: trimmed.to_string() };

    // 1. Viúva ganha de qualquer outro termo
    if WIDOW.is_match(trimmed) {
        return FamilyQuery::Widow;
    }

    let gender = tokens(trimmed).find_map(|t| gender_of(&t));

    // 2. Faixa explícita ganha de idade solta
    if let Some(caps) = AGE_RANGE.captures(trimmed) {
        let bounds = (
            caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok()),
            caps.get(2).and_then(|m| m.as_str().parse::<i32>().ok()),
        );
        if let (Some(a), Some(b)) = bounds {
            return FamilyQuery::AgeRange { min: a.min(b), max: a.max(b), gender };
        }
    }

    // 3. Um único número, tirando gênero e palavras de preenchimento
    let rest: Vec<String> = tokens(trimmed)
        .filter(|t| gender_of(t).is_none() && !AGE_FILLERS.contains(&t.as_str()))
        .collect();

    if let [only] = rest.as_slice() {
        if SINGLE_AGE.is_match(only) {
            if let Ok(age) = only.parse::<i32>() {
                return FamilyQuery::Age { age, gender };
            }
        }
    }

    text()
}

#[derive(Clone)]
pub struct SearchService {
    family_repo: FamilyRepository,
}

impl SearchService {
    pub fn new(family_repo: FamilyRepository) -> Self {
        Self { family_repo }
    }

    pub async fn search(&self, conn: &mut PgConnection, masjid_id: Uuid, q: &str) -> Result<SearchResponse, AppError> {
        let query = parse_query(q);
        tracing::debug!(?query, "Busca classificada");

        let (families, members) = match &query {
            FamilyQuery::Widow => (self.family_repo.list_widow_families(conn, masjid_id).await?, Vec::new()),
            FamilyQuery::AgeRange { min, max, gender } => {
                let hits = self
                    .family_repo
                    .search_members_by_age(conn, masjid_id, *min, *max, gender.map(Gender::as_stored))
                    .await?;
                (Vec::new(), hits)
            }
            FamilyQuery::Age { age, gender } => {
                let hits = self
                    .family_repo
                    .search_members_by_age(conn, masjid_id, *age, *age, gender.map(Gender::as_stored))
                    .await?;
                (Vec::new(), hits)
            }
            FamilyQuery::Text { query } if query.is_empty() => {
                (self.family_repo.list_families(conn, masjid_id, None).await?, Vec::new())
            }
            FamilyQuery::Text { query } => (self.family_repo.search_text(conn, masjid_id, query).await?, Vec::new()),
        };

        Ok(SearchResponse { query, families, members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widow_wins_over_everything() {
        assert_eq!(parse_query("widow"), FamilyQuery::Widow);
        assert_eq!(parse_query("Widows 20-30 female"), FamilyQuery::Widow);
        assert_eq!(parse_query("விதவை குடும்பங்கள்"), FamilyQuery::Widow);
    }

    #[test]
    fn range_forms() {
        let expected = FamilyQuery::AgeRange { min: 20, max: 30, gender: None };
        assert_eq!(parse_query("20-30"), expected);
        assert_eq!(parse_query("20 – 30"), expected);
        assert_eq!(parse_query("20 to 30"), expected);
        assert_eq!(parse_query("20 முதல் 30"), expected);
    }

    #[test]
    fn range_glued_to_a_filler_word() {
        let expected = FamilyQuery::AgeRange { min: 20, max: 30, gender: None };
        assert_eq!(parse_query("20-30வயது"), expected);
        assert_eq!(parse_query("20-30yrs"), expected);
        assert_eq!(
            parse_query("பெண்கள் 20 முதல் 30வயது"),
            FamilyQuery::AgeRange { min: 20, max: 30, gender: Some(Gender::Female) }
        );
    }

    #[test]
    fn codes_with_dashes_stay_text() {
        assert_eq!(parse_query("A12-3"), FamilyQuery::Text { query: "A12-3".into() });
    }

    #[test]
    fn range_bounds_are_normalised() {
        assert_eq!(parse_query("60-18"), FamilyQuery::AgeRange { min: 18, max: 60, gender: None });
    }

    #[test]
    fn range_beats_single_age() {
        assert_eq!(
            parse_query("age 25 males 10-15"),
            FamilyQuery::AgeRange { min: 10, max: 15, gender: Some(Gender::Male) }
        );
    }

    #[test]
    fn single_age_with_fillers_and_gender() {
        assert_eq!(parse_query("40"), FamilyQuery::Age { age: 40, gender: None });
        assert_eq!(
            parse_query("female 40 years old"),
            FamilyQuery::Age { age: 40, gender: Some(Gender::Female) }
        );
        assert_eq!(parse_query("age: 7 boys"), FamilyQuery::Age { age: 7, gender: Some(Gender::Male) });
        assert_eq!(parse_query("பெண் 30 வயது"), FamilyQuery::Age { age: 30, gender: Some(Gender::Female) });
    }

    #[test]
    fn female_is_not_read_as_male() {
        assert_eq!(parse_query("females 12"), FamilyQuery::Age { age: 12, gender: Some(Gender::Female) });
    }

    #[test]
    fn everything_else_is_text() {
        assert_eq!(parse_query("  FAM-012 "), FamilyQuery::Text { query: "FAM-012".into() });
        assert_eq!(parse_query("ahmed 30"), FamilyQuery::Text { query: "ahmed 30".into() });
        assert_eq!(parse_query("1234"), FamilyQuery::Text { query: "1234".into() });
        assert_eq!(parse_query("males"), FamilyQuery::Text { query: "males".into() });
        assert_eq!(parse_query(""), FamilyQuery::Text { query: String::new() });
    }
}
