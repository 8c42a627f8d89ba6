// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::{MasjidMembership, User}};

// O repositório de contas, responsável pelas interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca sem diferenciar maiúsculas (o índice único é em LOWER(email))
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria a conta. E-mail duplicado vira EmailAlreadyExists.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email.trim())
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Todas as mesquitas que a conta acessa: a própria (dona) e as que tem papel.
    pub async fn list_memberships(&self, user_id: Uuid) -> Result<Vec<MasjidMembership>, AppError> {
        let rows = sqlx::query_as::<_, MasjidMembership>(
            r#"
            SELECT m.id AS masjid_id, m.name, ur.role
            FROM user_roles ur
            INNER JOIN masjids m ON m.id = ur.masjid_id
            WHERE ur.user_id = $1
            UNION
            SELECT m.id AS masjid_id, m.name, 'super_admin'::role_kind AS role
            FROM masjids m
            WHERE m.id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM user_roles ur WHERE ur.masjid_id = m.id AND ur.user_id = $1
              )
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
