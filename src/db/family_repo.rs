// src/db/family_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::{
        family::{Family, FamilyPayload},
        member::{Member, MemberPayload},
        search::MemberHit,
    },
};

const FAMILY_COLUMNS: &str = "id, masjid_id, family_code, head_name, address, phone, \
     subscription_amount, is_widow_head, created_at, updated_at";
const MEMBER_COLUMNS: &str = "id, masjid_id, family_id, full_name, relationship, age, dob, \
     gender, nic, phone, civil_status, created_at";

fn like_pattern(q: &str) -> String {
    format!("%{}%", q.trim())
}

// Só executa SQL no executor recebido (conexão RLS da requisição)
#[derive(Clone, Default)]
pub struct FamilyRepository;

impl FamilyRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  FAMÍLIAS
    // =========================================================================

    pub async fn list_families<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        q: Option<&str>,
    ) -> Result<Vec<Family>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {} FROM families
            WHERE masjid_id = $1
              AND ($2::text IS NULL OR family_code ILIKE $2 OR head_name ILIKE $2)
            ORDER BY family_code ASC
            "#,
            FAMILY_COLUMNS
        );
        let families = sqlx::query_as::<_, Family>(&sql)
            .bind(masjid_id)
            .bind(q.filter(|s| !s.trim().is_empty()).map(like_pattern))
            .fetch_all(executor)
            .await?;
        Ok(families)
    }

    pub async fn create_family<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        payload: &FamilyPayload,
    ) -> Result<Family, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO families
                (masjid_id, family_code, head_name, address, phone, subscription_amount, is_widow_head)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FAMILY_COLUMNS
        );
        sqlx::query_as::<_, Family>(&sql)
            .bind(masjid_id)
            .bind(payload.family_code.trim())
            .bind(payload.head_name.trim())
            .bind(payload.address.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.subscription_amount)
            .bind(payload.is_widow_head)
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, "family_code"))
    }

    pub async fn find_family<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
    ) -> Result<Family, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM families WHERE masjid_id = $1 AND id = $2",
            FAMILY_COLUMNS
        );
        sqlx::query_as::<_, Family>(&sql)
            .bind(masjid_id)
            .bind(family_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("family"))
    }

    pub async fn update_family<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
        payload: &FamilyPayload,
    ) -> Result<Family, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE families
            SET family_code = $3, head_name = $4, address = $5, phone = $6,
                subscription_amount = $7, is_widow_head = $8, updated_at = NOW()
            WHERE masjid_id = $1 AND id = $2
            RETURNING {}
            "#,
            FAMILY_COLUMNS
        );
        sqlx::query_as::<_, Family>(&sql)
            .bind(masjid_id)
            .bind(family_id)
            .bind(payload.family_code.trim())
            .bind(payload.head_name.trim())
            .bind(payload.address.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.subscription_amount)
            .bind(payload.is_widow_head)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_unique_violation(e, "family_code"))?
            .ok_or(AppError::NotFound("family"))
    }

    pub async fn delete_family<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM families WHERE masjid_id = $1 AND id = $2")
            .bind(masjid_id)
            .bind(family_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("family"));
        }
        Ok(())
    }

    // =========================================================================
    //  MEMBROS
    // =========================================================================

    pub async fn list_members<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
    ) -> Result<Vec<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM members WHERE masjid_id = $1 AND family_id = $2 ORDER BY created_at ASC",
            MEMBER_COLUMNS
        );
        let members = sqlx::query_as::<_, Member>(&sql)
            .bind(masjid_id)
            .bind(family_id)
            .fetch_all(executor)
            .await?;
        Ok(members)
    }

    pub async fn create_member<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
        payload: &MemberPayload,
        age: Option<i32>,
    ) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO members
                (masjid_id, family_id, full_name, relationship, age, dob, gender, nic, phone, civil_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        );
        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(masjid_id)
            .bind(family_id)
            .bind(payload.full_name.trim())
            .bind(payload.relationship.as_deref())
            .bind(age)
            .bind(payload.dob)
            .bind(payload.gender.as_deref())
            .bind(payload.nic.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.civil_status.as_deref())
            .fetch_one(executor)
            .await?;
        Ok(member)
    }

    pub async fn update_member<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
        member_id: Uuid,
        payload: &MemberPayload,
        age: Option<i32>,
    ) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE members
            SET full_name = $4, relationship = $5, age = $6, dob = $7, gender = $8,
                nic = $9, phone = $10, civil_status = $11
            WHERE masjid_id = $1 AND family_id = $2 AND id = $3
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        );
        sqlx::query_as::<_, Member>(&sql)
            .bind(masjid_id)
            .bind(family_id)
            .bind(member_id)
            .bind(payload.full_name.trim())
            .bind(payload.relationship.as_deref())
            .bind(age)
            .bind(payload.dob)
            .bind(payload.gender.as_deref())
            .bind(payload.nic.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.civil_status.as_deref())
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("member"))
    }

    pub async fn delete_member<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        family_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM members WHERE masjid_id = $1 AND family_id = $2 AND id = $3")
                .bind(masjid_id)
                .bind(family_id)
                .bind(member_id)
                .execute(executor)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("member"));
        }
        Ok(())
    }

    // =========================================================================
    //  BUSCA
    // =========================================================================

    /// Código, chefe da família ou nome de qualquer membro.
    pub async fn search_text<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        q: &str,
    ) -> Result<Vec<Family>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {} FROM families f
            WHERE f.masjid_id = $1
              AND (
                f.family_code ILIKE $2
                OR f.head_name ILIKE $2
                OR EXISTS (
                    SELECT 1 FROM members m
                    WHERE m.family_id = f.id AND m.full_name ILIKE $2
                )
              )
            ORDER BY f.family_code ASC
            "#,
            FAMILY_COLUMNS
        );
        let families = sqlx::query_as::<_, Family>(&sql)
            .bind(masjid_id)
            .bind(like_pattern(q))
            .fetch_all(executor)
            .await?;
        Ok(families)
    }

    pub async fn list_widow_families<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
    ) -> Result<Vec<Family>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM families WHERE masjid_id = $1 AND is_widow_head ORDER BY family_code ASC",
            FAMILY_COLUMNS
        );
        let families = sqlx::query_as::<_, Family>(&sql)
            .bind(masjid_id)
            .fetch_all(executor)
            .await?;
        Ok(families)
    }

    /// Membros com idade em [min, max]; o gênero, se vier, é comparado sem maiúsculas.
    pub async fn search_members_by_age<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        min: i32,
        max: i32,
        gender: Option<&str>,
    ) -> Result<Vec<MemberHit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hits = sqlx::query_as::<_, MemberHit>(
            r#"
            SELECT m.id AS member_id, m.full_name, m.age, m.gender,
                   f.id AS family_id, f.family_code, f.head_name
            FROM members m
            INNER JOIN families f ON f.id = m.family_id
            WHERE m.masjid_id = $1
              AND m.age BETWEEN $2 AND $3
              AND ($4::text IS NULL OR LOWER(m.gender) = LOWER($4))
            ORDER BY m.age ASC, m.full_name ASC
            "#,
        )
        .bind(masjid_id)
        .bind(min)
        .bind(max)
        .bind(gender)
        .fetch_all(executor)
        .await?;
        Ok(hits)
    }
}
