// src/common/error.rs

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// SQLSTATE do Postgres para "relation does not exist"
const UNDEFINED_TABLE: &str = "42P01";

static DEFAULT_STORE: LazyLock<I18nStore> = LazyLock::new(I18nStore::default);

// Nosso tipo de erro interno, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Registro não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Sem acesso à mesquita")]
    MasjidAccessDenied,

    #[error("Mesquita desativada")]
    MasjidDeactivated,

    #[error("Permissão '{0}' negada")]
    PermissionDenied(&'static str),

    #[error("Apenas o Super Admin da mesquita")]
    SuperAdminOnly,

    #[error("Apenas o Super Admin da plataforma")]
    PlatformAdminOnly,

    #[error("O Super Admin não pode ser removido")]
    CannotRemoveSuperAdmin,

    #[error("Convite não pertence a este usuário")]
    InvitationMismatch,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("QR Code inválido: {0}")]
    InvalidQrPayload(String),

    #[error("Coluna desconhecida: {0}")]
    InvalidColumn(String),

    #[error("Tabela ausente: {0}")]
    MissingRelation(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[source] sqlx::Error),

    // `anyhow::Error` captura o contexto de erros inesperados.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.code().as_deref() == Some(UNDEFINED_TABLE) {
                return AppError::MissingRelation(db_err.message().to_string());
            }
        }
        AppError::DatabaseError(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidQrPayload(_)
            | AppError::InvalidColumn(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::MasjidAccessDenied
            | AppError::MasjidDeactivated
            | AppError::PermissionDenied(_)
            | AppError::SuperAdminOnly
            | AppError::PlatformAdminOnly
            | AppError::CannotRemoveSuperAdmin
            | AppError::InvitationMismatch => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists | AppError::UniqueConstraintViolation(_) => {
                StatusCode::CONFLICT
            }
            AppError::MissingRelation(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no `I18nStore`.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_failed",
            AppError::EmailAlreadyExists => "email_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::NotFound(_) => "not_found",
            AppError::MasjidAccessDenied => "masjid_access_denied",
            AppError::MasjidDeactivated => "masjid_deactivated",
            AppError::PermissionDenied(_) => "permission_denied",
            AppError::SuperAdminOnly => "super_admin_only",
            AppError::PlatformAdminOnly => "platform_admin_only",
            AppError::CannotRemoveSuperAdmin => "cannot_remove_super_admin",
            AppError::InvitationMismatch => "invitation_mismatch",
            AppError::UniqueConstraintViolation(_) => "already_exists",
            AppError::InvalidQrPayload(_) => "invalid_qr",
            AppError::InvalidColumn(_) => "invalid_column",
            AppError::MissingRelation(_) => "missing_table",
            _ => "internal_error",
        }
    }

    /// Converte o erro interno no erro público, já traduzido para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let mut params: Vec<(&str, String)> = Vec::new();
        let mut details = None;

        match &self {
            AppError::ValidationError(errors) => {
                let mut fields = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    fields.insert(field.to_string(), messages);
                }
                details = Some(json!(fields));
            }
            AppError::NotFound(entity) => params.push(("entity", entity.to_string())),
            AppError::PermissionDenied(slug) => params.push(("perm", slug.to_string())),
            AppError::UniqueConstraintViolation(what)
            | AppError::InvalidQrPayload(what)
            | AppError::InvalidColumn(what)
            | AppError::MissingRelation(what) => details = Some(json!({ "reason": what })),
            _ => {}
        }

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O cliente recebe a mensagem genérica; o detalhe fica no log.
            tracing::error!("Erro Interno do Servidor: {}", self);
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!("Tabela ausente, rode as migrações: {}", self);
        }

        let error = store.translate_with(&locale.0, self.message_key(), &params);
        ApiError { status, error, details }
    }
}

// Sem Locale disponível (ex.: middleware), respondemos em inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &DEFAULT_STORE).into_response()
    }
}

// ---
// O erro público (o que vai no corpo da resposta)
// ---
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    #[test]
    fn maps_variants_to_http_status() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("family").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::PermissionDenied("accounts").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::EmailAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidQrPayload("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingRelation("members".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Payload { name: String::new() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors)
            .to_api_error(&Locale::default(), &I18nStore::default());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "required");
    }

    #[test]
    fn messages_follow_the_locale() {
        let store = I18nStore::default();
        let en = AppError::PermissionDenied("events").to_api_error(&Locale("en".into()), &store);
        let ta = AppError::PermissionDenied("events").to_api_error(&Locale("ta".into()), &store);

        assert!(en.error.contains("events"));
        assert!(ta.error.contains("events"));
        assert_ne!(en.error, ta.error);
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let api = AppError::InternalServerError(anyhow::anyhow!("connection refused"))
            .to_api_error(&Locale::default(), &I18nStore::default());
        assert!(!api.error.contains("connection refused"));
        assert!(api.details.is_none());
    }
}
