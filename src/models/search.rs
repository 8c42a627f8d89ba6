// src/models/search.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};

use crate::models::family::Family;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Valor gravado em `members.gender`, comparado sem diferenciar maiúsculas.
    pub fn as_stored(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// A classificação do texto digitado na busca de famílias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FamilyQuery {
    Widow,
    AgeRange { min: i32, max: i32, gender: Option<Gender> },
    Age { age: i32, gender: Option<Gender> },
    Text { query: String },
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

// Membro encontrado pelos filtros de idade, com a família dele
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberHit {
    pub member_id: Uuid,
    pub full_name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub family_id: Uuid,
    pub family_code: String,
    pub head_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: FamilyQuery,
    pub families: Vec<Family>,
    pub members: Vec<MemberHit>,
}
