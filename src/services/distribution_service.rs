// src/services/distribution_service.rs

use chrono::Utc;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::{error::AppError, qr},
    db::{DistributionRepository, FamilyRepository},
    models::distribution::{CreateDistributionPayload, DistributionRow, ServiceDistribution},
};

#[derive(Clone)]
pub struct DistributionService {
    repo: DistributionRepository,
    family_repo: FamilyRepository,
}

impl DistributionService {
    pub fn new(repo: DistributionRepository, family_repo: FamilyRepository) -> Self {
        Self { repo, family_repo }
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        family_id: Option<Uuid>,
    ) -> Result<Vec<DistributionRow>, AppError> {
        self.repo.list(conn, masjid_id, family_id).await
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        payload: &CreateDistributionPayload,
    ) -> Result<ServiceDistribution, AppError> {
        let family_id = match (payload.family_id, payload.family_qr.as_deref()) {
            (Some(id), _) => id,
            (None, Some(raw)) => qr::decode_family(raw)?,
            (None, None) => return Err(AppError::NotFound("family")),
        };

        let family = self.family_repo.find_family(&mut *conn, masjid_id, family_id).await?;
        let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());

        self.repo
            .create(
                &mut *conn,
                masjid_id,
                family.id,
                &payload.service_name,
                date,
                payload.notes.as_deref(),
            )
            .await
    }

    pub async fn delete(&self, conn: &mut PgConnection, masjid_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(conn, masjid_id, id).await
    }
}
