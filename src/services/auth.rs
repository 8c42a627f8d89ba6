// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MasjidRepository, UserRepository},
    models::auth::{Claims, RegisterUserPayload, User},
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    masjid_repo: MasjidRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        masjid_repo: MasjidRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, masjid_repo, jwt_secret, pool }
    }

    /// Cria a conta do administrador e o perfil da mesquita numa transação só.
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<String, AppError> {
        // 1. Hashing (fora da transação, não toca no banco)
        let password_clone = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 2. Cria a conta
        let new_user = self
            .user_repo
            .create_user(&mut *tx, &payload.email, &hashed_password)
            .await?;

        // 3. Cria a mesquita com o mesmo id (se falhar, a conta é desfeita)
        let masjid = self
            .masjid_repo
            .create_masjid(
                &mut *tx,
                new_user.id,
                payload.masjid_name.trim(),
                payload.tagline.as_deref(),
                &new_user.email,
            )
            .await?;

        // 4. O dono já nasce super_admin
        sqlx::query(
            "INSERT INTO user_roles (masjid_id, user_id, email, role) VALUES ($1, $1, $2, 'super_admin')",
        )
        .bind(new_user.id)
        .bind(&new_user.email)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(masjid_id = %masjid.id, "🕌 Mesquita registrada: {}", masjid.name);

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        // Conta apagada depois de emitir o token: o token deixa de valer
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/masjeedh_test")
            .unwrap();
        AuthService::new(
            UserRepository::new(pool.clone()),
            MasjidRepository::new(pool.clone()),
            secret.to_string(),
            pool,
        )
    }

    #[tokio::test]
    async fn token_round_trip_keeps_the_subject() {
        let auth = service("segredo");
        let user_id = Uuid::new_v4();
        let token = auth.create_token(user_id).unwrap();

        let claims = auth.decode_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, (TOKEN_TTL_DAYS * 24 * 3600) as usize);
    }

    #[tokio::test]
    async fn token_from_another_secret_is_rejected() {
        let token = service("um").create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(service("outro").decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        assert!(matches!(service("segredo").decode_token("abc.def"), Err(AppError::InvalidToken)));
    }
}
