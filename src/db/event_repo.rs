// src/db/event_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::event::{Event, EventAttendance, EventSummary},
};

const EVENT_COLUMNS: &str = "id, masjid_id, name, date, created_at";

// Só executa SQL no executor recebido (conexão RLS da requisição)
#[derive(Clone, Default)]
pub struct EventRepository;

impl EventRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  EVENTOS
    // =========================================================================

    pub async fn list_events<'e, E>(&self, executor: E, masjid_id: Uuid) -> Result<Vec<EventSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, EventSummary>(
            r#"
            SELECT e.id, e.name, e.date,
                   COUNT(a.id) AS total_families,
                   COUNT(a.id) FILTER (WHERE a.received) AS received_count
            FROM events e
            LEFT JOIN event_attendance a ON a.event_id = e.id
            WHERE e.masjid_id = $1
            GROUP BY e.id
            ORDER BY e.date DESC, e.created_at DESC
            "#,
        )
        .bind(masjid_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn create_event<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        name: &str,
        date: NaiveDate,
    ) -> Result<Event, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO events (masjid_id, name, date) VALUES ($1, $2, $3) RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(masjid_id)
            .bind(name.trim())
            .bind(date)
            .fetch_one(executor)
            .await?;
        Ok(event)
    }

    /// Uma linha de presença pendente para cada família cadastrada.
    pub async fn seed_attendance<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        event_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO event_attendance (masjid_id, event_id, family_id)
            SELECT $1, $2, f.id FROM families f WHERE f.masjid_id = $1
            ON CONFLICT (event_id, family_id) DO NOTHING
            "#,
        )
        .bind(masjid_id)
        .bind(event_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_event<'e, E>(&self, executor: E, masjid_id: Uuid, event_id: Uuid) -> Result<Event, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM events WHERE masjid_id = $1 AND id = $2", EVENT_COLUMNS);
        sqlx::query_as::<_, Event>(&sql)
            .bind(masjid_id)
            .bind(event_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("event"))
    }

    pub async fn delete_event<'e, E>(&self, executor: E, masjid_id: Uuid, event_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM events WHERE masjid_id = $1 AND id = $2")
            .bind(masjid_id)
            .bind(event_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("event"));
        }
        Ok(())
    }

    // =========================================================================
    //  PRESENÇA
    // =========================================================================

    pub async fn list_attendance<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        event_id: Uuid,
        q: Option<&str>,
    ) -> Result<Vec<EventAttendance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pattern = q
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let rows = sqlx::query_as::<_, EventAttendance>(
            r#"
            SELECT a.id, a.event_id, a.family_id, f.family_code, f.head_name, a.received, a.received_at
            FROM event_attendance a
            INNER JOIN families f ON f.id = a.family_id
            WHERE a.masjid_id = $1 AND a.event_id = $2
              AND ($3::text IS NULL OR f.family_code ILIKE $3 OR f.head_name ILIKE $3)
            ORDER BY f.family_code ASC
            "#,
        )
        .bind(masjid_id)
        .bind(event_id)
        .bind(pattern)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Trava a linha para a leitura do QR não correr contra outra leitura.
    pub async fn lock_attendance<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        event_id: Uuid,
        family_id: Uuid,
    ) -> Result<Option<EventAttendance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, EventAttendance>(
            r#"
            SELECT a.id, a.event_id, a.family_id, f.family_code, f.head_name, a.received, a.received_at
            FROM event_attendance a
            INNER JOIN families f ON f.id = a.family_id
            WHERE a.masjid_id = $1 AND a.event_id = $2 AND a.family_id = $3
            FOR UPDATE OF a
            "#,
        )
        .bind(masjid_id)
        .bind(event_id)
        .bind(family_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Marca ou desmarca uma linha. `received_at` acompanha o flag.
    pub async fn set_received<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        event_id: Uuid,
        attendance_id: Uuid,
        received: bool,
    ) -> Result<EventAttendance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EventAttendance>(
            r#"
            WITH updated AS (
                UPDATE event_attendance
                SET received = $4,
                    received_at = CASE WHEN $4 THEN COALESCE(received_at, NOW()) ELSE NULL END
                WHERE masjid_id = $1 AND event_id = $2 AND id = $3
                RETURNING id, event_id, family_id, received, received_at
            )
            SELECT u.id, u.event_id, u.family_id, f.family_code, f.head_name, u.received, u.received_at
            FROM updated u
            INNER JOIN families f ON f.id = u.family_id
            "#,
        )
        .bind(masjid_id)
        .bind(event_id)
        .bind(attendance_id)
        .bind(received)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("attendance"))
    }
}
