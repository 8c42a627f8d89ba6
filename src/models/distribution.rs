// src/models/distribution.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Um serviço ou ajuda entregue a uma família numa data.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDistribution {
    pub id: Uuid,
    #[schema(ignore)]
    pub masjid_id: Uuid,
    pub family_id: Uuid,
    #[schema(example = "Zakat Rice")]
    pub service_name: String,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Linha da listagem, já com os dados da família
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRow {
    pub id: Uuid,
    pub family_id: Uuid,
    pub family_code: String,
    pub head_name: String,
    pub service_name: String,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDistributionPayload {
    pub family_id: Option<Uuid>,
    /// Alternativa ao familyId: o conteúdo lido do QR Code
    pub family_qr: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Zakat Rice")]
    pub service_name: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CreateDistributionPayload {
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.family_id.is_none() && self.family_qr.is_none() {
            return Err(ValidationError::new("FamilyRequired"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DistributionQuery {
    pub family_id: Option<Uuid>,
}
