// src/services/dashboard_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DashboardRepository, FinanceRepository},
    models::dashboard::HomeSummary,
    services::finance_service::summarize,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    finance_repo: FinanceRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, finance_repo: FinanceRepository) -> Self {
        Self { repo, finance_repo }
    }

    pub async fn get_summary(&self, conn: &mut PgConnection, masjid_id: Uuid) -> Result<HomeSummary, AppError> {
        let counts = self.repo.get_counts(&mut *conn, masjid_id).await?;
        let transactions = self.finance_repo.list_transactions(&mut *conn, masjid_id, None).await?;

        Ok(HomeSummary {
            family_count: counts.family_count,
            member_count: counts.member_count,
            event_count: counts.event_count,
            finance: summarize(&transactions),
        })
    }
}
