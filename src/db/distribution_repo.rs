// src/db/distribution_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::distribution::{DistributionRow, ServiceDistribution},
};

// Só executa SQL no executor recebido (conexão RLS da requisição)
#[derive(Clone, Default)]
pub struct DistributionRepository;

impl DistributionRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Option<Uuid>,
    ) -> Result<Vec<DistributionRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, DistributionRow>(
            r#"
            SELECT d.id, d.family_id, f.family_code, f.head_name, d.service_name, d.date, d.notes
            FROM service_distributions d
            INNER JOIN families f ON f.id = d.family_id
            WHERE d.masjid_id = $1
              AND ($2::uuid IS NULL OR d.family_id = $2)
            ORDER BY d.date DESC, d.created_at DESC
            "#,
        )
        .bind(masjid_id)
        .bind(family_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
        service_name: &str,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<ServiceDistribution, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ServiceDistribution>(
            r#"
            INSERT INTO service_distributions (masjid_id, family_id, service_name, date, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, masjid_id, family_id, service_name, date, notes, created_at
            "#,
        )
        .bind(masjid_id)
        .bind(family_id)
        .bind(service_name.trim())
        .bind(date)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn delete<'e, E>(&self, executor: E, masjid_id: Uuid, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM service_distributions WHERE masjid_id = $1 AND id = $2")
            .bind(masjid_id)
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("distribution"));
        }
        Ok(())
    }
}
