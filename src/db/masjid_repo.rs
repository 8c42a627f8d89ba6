// src/db/masjid_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        masjid::{Masjid, MasjidStatus, SubscriptionStatus},
        settings::{MasjidSettings, UpdateSettingsRequest},
    },
};

const MASJID_COLUMNS: &str =
    "id, name, tagline, logo_url, admin_email, status, subscription_status, created_at, updated_at";

#[derive(Clone)]
pub struct MasjidRepository {
    pool: PgPool,
}

impl MasjidRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria o perfil da mesquita com o mesmo id da conta do administrador.
    pub async fn create_masjid<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        name: &str,
        tagline: Option<&str>,
        admin_email: &str,
    ) -> Result<Masjid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO masjids (id, name, tagline, admin_email) VALUES ($1, $2, $3, $4) RETURNING {}",
            MASJID_COLUMNS
        );
        let masjid = sqlx::query_as::<_, Masjid>(&sql)
            .bind(owner_id)
            .bind(name)
            .bind(tagline)
            .bind(admin_email)
            .fetch_one(executor)
            .await?;
        Ok(masjid)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Masjid>, AppError> {
        let sql = format!("SELECT {} FROM masjids WHERE id = $1", MASJID_COLUMNS);
        let masjid = sqlx::query_as::<_, Masjid>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(masjid)
    }

    pub async fn list_all(&self) -> Result<Vec<Masjid>, AppError> {
        let sql = format!("SELECT {} FROM masjids ORDER BY created_at DESC", MASJID_COLUMNS);
        let masjids = sqlx::query_as::<_, Masjid>(&sql).fetch_all(&self.pool).await?;
        Ok(masjids)
    }

    pub async fn update_status(&self, id: Uuid, status: MasjidStatus) -> Result<Masjid, AppError> {
        let sql = format!(
            "UPDATE masjids SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            MASJID_COLUMNS
        );
        sqlx::query_as::<_, Masjid>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("masjid"))
    }

    pub async fn update_subscription(
        &self,
        id: Uuid,
        subscription_status: Option<SubscriptionStatus>,
    ) -> Result<Masjid, AppError> {
        let sql = format!(
            "UPDATE masjids SET subscription_status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            MASJID_COLUMNS
        );
        sqlx::query_as::<_, Masjid>(&sql)
            .bind(id)
            .bind(subscription_status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("masjid"))
    }

    // =========================================================================
    //  CONFIGURAÇÕES (nome, slogan, logo)
    // =========================================================================

    pub async fn get_settings(&self, masjid_id: Uuid) -> Result<MasjidSettings, AppError> {
        sqlx::query_as::<_, MasjidSettings>(
            r#"
            SELECT id AS masjid_id, name, tagline, logo_url, updated_at
            FROM masjids
            WHERE id = $1
            "#,
        )
        .bind(masjid_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("masjid"))
    }

    pub async fn update_settings(
        &self,
        masjid_id: Uuid,
        req: &UpdateSettingsRequest,
    ) -> Result<MasjidSettings, AppError> {
        sqlx::query_as::<_, MasjidSettings>(
            r#"
            UPDATE masjids
            SET name = $2, tagline = $3, logo_url = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id AS masjid_id, name, tagline, logo_url, updated_at
            "#,
        )
        .bind(masjid_id)
        .bind(req.name.trim())
        .bind(req.tagline.as_deref())
        .bind(req.logo_url.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("masjid"))
    }
}
