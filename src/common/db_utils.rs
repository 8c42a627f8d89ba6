use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::tenancy::TenantContext;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação e define as variáveis RLS (`app.masjid_id` e `app.user_id`).
/// `set_config(..., true)` só vale dentro da transação, por isso o handler
/// precisa fazer `commit()` no final.
pub(crate) async fn begin_rls_transaction(
    app_state: &AppState,
    tenant_ctx: &TenantContext,
    user: &AuthenticatedUser,
) -> Result<Transaction<'static, Postgres>, AppError> {
    // O operador '?' converte automaticamente sqlx::Error -> AppError
    let mut tx = app_state.db_pool.begin().await?;

    sqlx::query("SELECT set_config('app.masjid_id', $1, true)")
        .bind(tenant_ctx.masjid_id.to_string())
        .execute(&mut *tx)
        .await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user.0.id.to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// Converte violação de chave única em um erro de conflito legível.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(what.to_string());
        }
    }
    e.into()
}
