// src/db/roles_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::roles::{InvitationStatus, RoleInvitation, RoleKind, RolePermissions, UserRole},
};

const ROLE_COLUMNS: &str = "id, masjid_id, user_id, email, role, permissions, created_at";
const INVITATION_COLUMNS: &str = "id, masjid_id, email, role, status, created_at";

#[derive(Clone)]
pub struct RolesRepository {
    pool: PgPool,
}

impl RolesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PAPÉIS (user_roles)
    // =========================================================================

    pub async fn find_role(&self, masjid_id: Uuid, user_id: Uuid) -> Result<Option<UserRole>, AppError> {
        let sql = format!(
            "SELECT {} FROM user_roles WHERE masjid_id = $1 AND user_id = $2",
            ROLE_COLUMNS
        );
        let role = sqlx::query_as::<_, UserRole>(&sql)
            .bind(masjid_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    /// Insere ou atualiza o papel. Um super_admin existente nunca é rebaixado.
    pub async fn upsert_role<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        user_id: Uuid,
        email: &str,
        role: RoleKind,
    ) -> Result<UserRole, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO user_roles (masjid_id, user_id, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (masjid_id, user_id) DO UPDATE
            SET email = EXCLUDED.email,
                role = CASE WHEN user_roles.role = 'super_admin' THEN user_roles.role ELSE EXCLUDED.role END
            RETURNING {}
            "#,
            ROLE_COLUMNS
        );
        let role = sqlx::query_as::<_, UserRole>(&sql)
            .bind(masjid_id)
            .bind(user_id)
            .bind(email)
            .bind(role)
            .fetch_one(executor)
            .await?;
        Ok(role)
    }

    /// O dono da mesquita (mesmo id) sempre tem o papel super_admin.
    pub async fn ensure_owner_role(&self, masjid_id: Uuid, email: &str) -> Result<UserRole, AppError> {
        self.upsert_role(&self.pool, masjid_id, masjid_id, email, RoleKind::SuperAdmin)
            .await
    }

    pub async fn list_roles(&self, masjid_id: Uuid) -> Result<Vec<UserRole>, AppError> {
        let sql = format!(
            "SELECT {} FROM user_roles WHERE masjid_id = $1 ORDER BY created_at ASC",
            ROLE_COLUMNS
        );
        let roles = sqlx::query_as::<_, UserRole>(&sql)
            .bind(masjid_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    pub async fn find_role_by_id(&self, masjid_id: Uuid, role_id: Uuid) -> Result<UserRole, AppError> {
        let sql = format!(
            "SELECT {} FROM user_roles WHERE masjid_id = $1 AND id = $2",
            ROLE_COLUMNS
        );
        sqlx::query_as::<_, UserRole>(&sql)
            .bind(masjid_id)
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("user_role"))
    }

    pub async fn delete_role(&self, masjid_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user_roles WHERE masjid_id = $1 AND id = $2")
            .bind(masjid_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("user_role"));
        }
        Ok(())
    }

    pub async fn update_permissions(
        &self,
        masjid_id: Uuid,
        role_id: Uuid,
        permissions: RolePermissions,
    ) -> Result<UserRole, AppError> {
        let sql = format!(
            "UPDATE user_roles SET permissions = $3 WHERE masjid_id = $1 AND id = $2 RETURNING {}",
            ROLE_COLUMNS
        );
        sqlx::query_as::<_, UserRole>(&sql)
            .bind(masjid_id)
            .bind(role_id)
            .bind(Json(permissions))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("user_role"))
    }

    // =========================================================================
    //  CONVITES (role_invitations)
    // =========================================================================

    pub async fn create_invitation(
        &self,
        masjid_id: Uuid,
        email: &str,
        role: RoleKind,
    ) -> Result<RoleInvitation, AppError> {
        let sql = format!(
            "INSERT INTO role_invitations (masjid_id, email, role) VALUES ($1, $2, $3) RETURNING {}",
            INVITATION_COLUMNS
        );
        let invitation = sqlx::query_as::<_, RoleInvitation>(&sql)
            .bind(masjid_id)
            .bind(email.trim().to_lowercase())
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(invitation)
    }

    pub async fn list_invitations(&self, masjid_id: Uuid) -> Result<Vec<RoleInvitation>, AppError> {
        let sql = format!(
            "SELECT {} FROM role_invitations WHERE masjid_id = $1 ORDER BY created_at DESC",
            INVITATION_COLUMNS
        );
        let invitations = sqlx::query_as::<_, RoleInvitation>(&sql)
            .bind(masjid_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(invitations)
    }

    pub async fn find_invitation<'e, E>(
        &self,
        executor: E,
        invitation_id: Uuid,
    ) -> Result<RoleInvitation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM role_invitations WHERE id = $1 FOR UPDATE",
            INVITATION_COLUMNS
        );
        sqlx::query_as::<_, RoleInvitation>(&sql)
            .bind(invitation_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("invitation"))
    }

    /// Só convites pendentes mudam de status.
    pub async fn set_invitation_status<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        invitation_id: Uuid,
        status: InvitationStatus,
    ) -> Result<RoleInvitation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE role_invitations SET status = $3
            WHERE masjid_id = $1 AND id = $2 AND status = 'pending'
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        );
        sqlx::query_as::<_, RoleInvitation>(&sql)
            .bind(masjid_id)
            .bind(invitation_id)
            .bind(status)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("invitation"))
    }
}
