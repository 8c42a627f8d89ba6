// src/services/masjid_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MasjidRepository, RolesRepository},
    models::{
        auth::User,
        masjid::{Masjid, MasjidStatus, SubscriptionStatus},
        roles::Membership,
        settings::{MasjidSettings, UpdateSettingsRequest},
    },
};

#[derive(Clone)]
pub struct MasjidService {
    masjid_repo: MasjidRepository,
    roles_repo: RolesRepository,
}

impl MasjidService {
    pub fn new(masjid_repo: MasjidRepository, roles_repo: RolesRepository) -> Self {
        Self { masjid_repo, roles_repo }
    }

    /// Decide se a conta entra na mesquita e com qual papel.
    /// O dono sem linha em user_roles ganha o super_admin na hora.
    pub async fn resolve_membership(&self, user: &User, masjid_id: Uuid) -> Result<Membership, AppError> {
        let is_owner = user.id == masjid_id;

        // 1. A mesquita existe?
        let masjid = self
            .masjid_repo
            .find_by_id(masjid_id)
            .await?
            .ok_or(AppError::MasjidAccessDenied)?;

        // 2. A conta tem vínculo?
        let role = match self.roles_repo.find_role(masjid_id, user.id).await? {
            Some(role) => role,
            None if is_owner => {
                tracing::info!(masjid_id = %masjid_id, "Criando papel super_admin do dono");
                self.roles_repo.ensure_owner_role(masjid_id, &user.email).await?
            }
            None => return Err(AppError::MasjidAccessDenied),
        };

        // 3. Mesquita desativada pela plataforma
        if masjid.status == MasjidStatus::Deactivated {
            return Err(AppError::MasjidDeactivated);
        }

        Ok(Membership {
            role: role.role,
            permissions: role.permissions.0,
            is_owner,
        })
    }

    // =========================================================================
    //  CONFIGURAÇÕES
    // =========================================================================

    pub async fn get_settings(&self, masjid_id: Uuid) -> Result<MasjidSettings, AppError> {
        self.masjid_repo.get_settings(masjid_id).await
    }

    pub async fn update_settings(
        &self,
        masjid_id: Uuid,
        req: &UpdateSettingsRequest,
    ) -> Result<MasjidSettings, AppError> {
        self.masjid_repo.update_settings(masjid_id, req).await
    }

    // =========================================================================
    //  PLATAFORMA (Super Admin)
    // =========================================================================

    pub async fn list_masjids(&self) -> Result<Vec<Masjid>, AppError> {
        self.masjid_repo.list_all().await
    }

    pub async fn set_status(&self, masjid_id: Uuid, status: MasjidStatus) -> Result<Masjid, AppError> {
        let masjid = self.masjid_repo.update_status(masjid_id, status).await?;
        tracing::info!(masjid_id = %masjid_id, status = ?status, "Status da mesquita alterado");
        Ok(masjid)
    }

    pub async fn set_subscription(
        &self,
        masjid_id: Uuid,
        subscription_status: Option<SubscriptionStatus>,
    ) -> Result<Masjid, AppError> {
        self.masjid_repo.update_subscription(masjid_id, subscription_status).await
    }
}
