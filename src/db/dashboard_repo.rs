// src/db/dashboard_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

/// Os três contadores da tela inicial.
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct HomeCounts {
    pub family_count: i64,
    pub member_count: i64,
    pub event_count: i64,
}

// Só executa SQL no executor recebido (conexão RLS da requisição)
#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // Uma consulta só: os três números saem do mesmo snapshot
    pub async fn get_counts<'e, E>(&self, executor: E, masjid_id: Uuid) -> Result<HomeCounts, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let counts = sqlx::query_as::<_, HomeCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM families WHERE masjid_id = $1) AS family_count,
                (SELECT COUNT(*) FROM members WHERE masjid_id = $1) AS member_count,
                (SELECT COUNT(*) FROM events WHERE masjid_id = $1) AS event_count
            "#,
        )
        .bind(masjid_id)
        .fetch_one(executor)
        .await?;
        Ok(counts)
    }
}
