// src/services/family_service.rs

use chrono::Utc;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::{error::AppError, qr},
    db::{FamilyRepository, FinanceRepository},
    models::{
        family::{Family, FamilyDetail, FamilyPayload, SubscriptionBalance},
        member::{Member, MemberPayload},
    },
    services::finance_service::total_paid,
};

#[derive(Clone)]
pub struct FamilyService {
    repo: FamilyRepository,
    finance_repo: FinanceRepository,
}

impl FamilyService {
    pub fn new(repo: FamilyRepository, finance_repo: FinanceRepository) -> Self {
        Self { repo, finance_repo }
    }

    // =========================================================================
    //  FAMÍLIAS
    // =========================================================================

    pub async fn list(&self, conn: &mut PgConnection, masjid_id: Uuid, q: Option<&str>) -> Result<Vec<Family>, AppError> {
        self.repo.list_families(conn, masjid_id, q).await
    }

    pub async fn create(&self, conn: &mut PgConnection, masjid_id: Uuid, payload: &FamilyPayload) -> Result<Family, AppError> {
        let family = self.repo.create_family(conn, masjid_id, payload).await?;
        tracing::info!(masjid_id = %masjid_id, family_id = %family.id, "Família cadastrada");
        Ok(family)
    }

    pub async fn update(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        family_id: Uuid,
        payload: &FamilyPayload,
    ) -> Result<Family, AppError> {
        self.repo.update_family(conn, masjid_id, family_id, payload).await
    }

    pub async fn delete(&self, conn: &mut PgConnection, masjid_id: Uuid, family_id: Uuid) -> Result<(), AppError> {
        self.repo.delete_family(conn, masjid_id, family_id).await
    }

    /// Família com membros, pagamentos e o saldo da contribuição.
    pub async fn detail(&self, conn: &mut PgConnection, masjid_id: Uuid, family_id: Uuid) -> Result<FamilyDetail, AppError> {
        let family = self.repo.find_family(&mut *conn, masjid_id, family_id).await?;
        let members = self.repo.list_members(&mut *conn, masjid_id, family_id).await?;
        let payments = self
            .finance_repo
            .list_family_payments(&mut *conn, masjid_id, family_id)
            .await?;

        let subscription = SubscriptionBalance::new(family.subscription_amount, total_paid(&payments));

        Ok(FamilyDetail {
            qr_payload: qr::encode_family(family.id),
            family,
            members,
            payments,
            subscription,
        })
    }

    /// Leitura do QR na tela de scan: decodifica e devolve a família.
    pub async fn scan(&self, conn: &mut PgConnection, masjid_id: Uuid, payload: &str) -> Result<Family, AppError> {
        let family_id = qr::decode_family(payload)?;
        self.repo.find_family(conn, masjid_id, family_id).await
    }

    pub async fn find(&self, conn: &mut PgConnection, masjid_id: Uuid, family_id: Uuid) -> Result<Family, AppError> {
        self.repo.find_family(conn, masjid_id, family_id).await
    }

    // =========================================================================
    //  MEMBROS
    // =========================================================================

    pub async fn add_member(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        family_id: Uuid,
        payload: &MemberPayload,
    ) -> Result<Member, AppError> {
        // A família precisa existir nesta mesquita (senão a FK vira erro 500)
        self.repo.find_family(&mut *conn, masjid_id, family_id).await?;

        let age = payload.resolved_age(Utc::now().date_naive());
        self.repo.create_member(&mut *conn, masjid_id, family_id, payload, age).await
    }

    pub async fn update_member(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        family_id: Uuid,
        member_id: Uuid,
        payload: &MemberPayload,
    ) -> Result<Member, AppError> {
        let age = payload.resolved_age(Utc::now().date_naive());
        self.repo
            .update_member(conn, masjid_id, family_id, member_id, payload, age)
            .await
    }

    pub async fn delete_member(
        &self,
        conn: &mut PgConnection,
        masjid_id: Uuid,
        family_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), AppError> {
        self.repo.delete_member(conn, masjid_id, family_id, member_id).await
    }
}
