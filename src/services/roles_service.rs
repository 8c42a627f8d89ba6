// src/services/roles_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RolesRepository, UserRepository},
    models::{
        auth::{MasjidMembership, User},
        roles::{
            AdminOverview, InvitationStatus, PermissionArea, RoleInvitation, RoleKind, UserRole,
        },
    },
};

#[derive(Clone)]
pub struct RolesService {
    roles_repo: RolesRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl RolesService {
    pub fn new(roles_repo: RolesRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self { roles_repo, user_repo, pool }
    }

    // --- Tela de Admin ---

    pub async fn overview(&self, masjid_id: Uuid) -> Result<AdminOverview, AppError> {
        let roles = self.roles_repo.list_roles(masjid_id).await?;
        let invitations = self.roles_repo.list_invitations(masjid_id).await?;
        Ok(AdminOverview { roles, invitations })
    }

    pub async fn invite(&self, masjid_id: Uuid, email: &str, role: RoleKind) -> Result<RoleInvitation, AppError> {
        // O payload já barra super_admin; aqui é a segunda trava
        if role == RoleKind::SuperAdmin {
            return Err(AppError::SuperAdminOnly);
        }
        let invitation = self.roles_repo.create_invitation(masjid_id, email, role).await?;
        tracing::info!(masjid_id = %masjid_id, invitation_id = %invitation.id, "Convite criado");
        Ok(invitation)
    }

    pub async fn revoke(&self, masjid_id: Uuid, invitation_id: Uuid) -> Result<RoleInvitation, AppError> {
        self.roles_repo
            .set_invitation_status(&self.pool, masjid_id, invitation_id, InvitationStatus::Revoked)
            .await
    }

    /// Remove o acesso de uma conta. O super_admin não sai por aqui.
    pub async fn remove(&self, masjid_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        let target = self.roles_repo.find_role_by_id(masjid_id, role_id).await?;
        if target.role == RoleKind::SuperAdmin {
            return Err(AppError::CannotRemoveSuperAdmin);
        }
        self.roles_repo.delete_role(masjid_id, role_id).await
    }

    pub async fn toggle_permission(
        &self,
        masjid_id: Uuid,
        role_id: Uuid,
        area: PermissionArea,
    ) -> Result<UserRole, AppError> {
        let target = self.roles_repo.find_role_by_id(masjid_id, role_id).await?;
        let permissions = target.permissions.0.toggled(area);
        self.roles_repo.update_permissions(masjid_id, role_id, permissions).await
    }

    // --- Conta convidada ---

    /// Aceita o convite: papel criado e convite marcado na mesma transação.
    pub async fn accept_invitation(&self, user: &User, invitation_id: Uuid) -> Result<UserRole, AppError> {
        let mut tx = self.pool.begin().await?;

        let invitation = self.roles_repo.find_invitation(&mut *tx, invitation_id).await?;

        if !invitation.email.eq_ignore_ascii_case(user.email.trim()) {
            return Err(AppError::InvitationMismatch);
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::NotFound("invitation"));
        }

        let role = self
            .roles_repo
            .upsert_role(&mut *tx, invitation.masjid_id, user.id, &user.email, invitation.role)
            .await?;

        self.roles_repo
            .set_invitation_status(&mut *tx, invitation.masjid_id, invitation.id, InvitationStatus::Accepted)
            .await?;

        tx.commit().await?;

        tracing::info!(masjid_id = %invitation.masjid_id, user_id = %user.id, "Convite aceito");
        Ok(role)
    }

    pub async fn my_masjids(&self, user_id: Uuid) -> Result<Vec<MasjidMembership>, AppError> {
        self.user_repo.list_memberships(user_id).await
    }
}
