// src/db/finance_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{NewTransaction, Transaction},
};

const TRANSACTION_COLUMNS: &str =
    "id, masjid_id, amount, description, category, kind, date, family_id, employee_id, created_at";

// Só executa SQL no executor recebido (conexão RLS da requisição)
#[derive(Clone, Default)]
pub struct FinanceRepository;

impl FinanceRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  LANÇAMENTOS (Caixa)
    // =========================================================================

    /// Mais recentes primeiro. `q` filtra por descrição ou categoria.
    pub async fn list_transactions<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        q: Option<&str>,
    ) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {} FROM transactions
            WHERE masjid_id = $1
              AND ($2::text IS NULL OR description ILIKE $2 OR category ILIKE $2)
            ORDER BY date DESC, created_at DESC
            "#,
            TRANSACTION_COLUMNS
        );
        let pattern = q
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let rows = sqlx::query_as::<_, Transaction>(&sql)
            .bind(masjid_id)
            .bind(pattern)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn create_transaction<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO transactions
                (masjid_id, amount, description, category, kind, date, family_id, employee_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        );
        let tx = sqlx::query_as::<_, Transaction>(&sql)
            .bind(masjid_id)
            .bind(new.amount)
            .bind(&new.description)
            .bind(&new.category)
            .bind(new.kind)
            .bind(new.date)
            .bind(new.family_id)
            .bind(new.employee_id)
            .fetch_one(executor)
            .await?;
        Ok(tx)
    }

    pub async fn delete_transaction<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM transactions WHERE masjid_id = $1 AND id = $2")
            .bind(masjid_id)
            .bind(transaction_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("transaction"));
        }
        Ok(())
    }

    /// Contribuições e entradas vinculadas à família.
    pub async fn list_family_payments<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
    ) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {} FROM transactions
            WHERE masjid_id = $1 AND family_id = $2 AND kind IN ('subscription', 'income')
            ORDER BY date DESC, created_at DESC
            "#,
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Transaction>(&sql)
            .bind(masjid_id)
            .bind(family_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}
