// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        DashboardRepository, DistributionRepository, EventRepository, FamilyRepository,
        FinanceRepository, MasjidRepository, RolesRepository, StaffRepository, UserRepository,
    },
    services::{
        auth::AuthService, dashboard_service::DashboardService,
        distribution_service::DistributionService, document_service::DocumentService,
        event_service::EventService, family_service::FamilyService,
        finance_service::FinanceService, masjid_service::MasjidService,
        roles_service::RolesService, search_service::SearchService, staff_service::StaffService,
    },
};

/// Configuração lida do ambiente (.env).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// E-mail do Super Admin da plataforma. Sem ele, as rotas /api/platform ficam fechadas.
    pub superadmin_email: Option<String>,
    pub bind_addr: String,
    pub fonts_dir: String,
    pub font_family: String,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let superadmin_email = env::var("SUPERADMIN_EMAIL")
            .ok()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", raw))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            superadmin_email,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            fonts_dir: env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()),
            font_family: env::var("FONT_FAMILY").unwrap_or_else(|_| "Roboto".to_string()),
            db_max_connections,
        })
    }

    /// Comparação sem diferenciar maiúsculas, como no painel antigo.
    pub fn is_platform_admin(&self, email: &str) -> bool {
        self.superadmin_email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub masjid_service: MasjidService,
    pub roles_service: RolesService,
    pub family_service: FamilyService,
    pub finance_service: FinanceService,
    pub event_service: EventService,
    pub staff_service: StaffService,
    pub distribution_service: DistributionService,
    pub search_service: SearchService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Config::from_env()?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(config, db_pool))
    }

    /// Monta o gráfico de dependências a partir de uma pool já criada.
    pub fn with_pool(config: Config, db_pool: PgPool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let masjid_repo = MasjidRepository::new(db_pool.clone());
        let roles_repo = RolesRepository::new(db_pool.clone());
        let family_repo = FamilyRepository::new();
        let finance_repo = FinanceRepository::new();
        let event_repo = EventRepository::new();
        let staff_repo = StaffRepository::new();
        let distribution_repo = DistributionRepository::new();
        let dashboard_repo = DashboardRepository::new();

        let auth_service = AuthService::new(
            user_repo.clone(),
            masjid_repo.clone(),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let masjid_service = MasjidService::new(masjid_repo.clone(), roles_repo.clone());
        let roles_service = RolesService::new(roles_repo, user_repo, db_pool.clone());
        let finance_service = FinanceService::new(finance_repo.clone(), family_repo.clone());
        let family_service = FamilyService::new(family_repo.clone(), finance_repo.clone());
        let event_service =
            EventService::new(event_repo.clone(), family_repo.clone(), finance_repo.clone());
        let staff_service = StaffService::new(staff_repo, finance_repo.clone());
        let distribution_service =
            DistributionService::new(distribution_repo, family_repo.clone());
        let search_service = SearchService::new(family_repo.clone());
        let dashboard_service = DashboardService::new(dashboard_repo, finance_repo.clone());
        let document_service = DocumentService::new(
            family_repo,
            finance_repo,
            event_repo,
            masjid_repo,
            config.fonts_dir.clone(),
            config.font_family.clone(),
        );

        Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::default()),
            auth_service,
            masjid_service,
            roles_service,
            family_service,
            finance_service,
            event_service,
            staff_service,
            distribution_service,
            search_service,
            dashboard_service,
            document_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(admin: Option<&str>) -> Config {
        Config {
            database_url: "postgres://localhost/masjeedh".into(),
            jwt_secret: "secret".into(),
            superadmin_email: admin.map(str::to_string),
            bind_addr: "127.0.0.1:0".into(),
            fonts_dir: "./fonts".into(),
            font_family: "Roboto".into(),
            db_max_connections: 1,
        }
    }

    #[test]
    fn platform_admin_check_ignores_case() {
        let cfg = config(Some("Owner@Platform.org"));
        assert!(cfg.is_platform_admin("owner@platform.org"));
        assert!(cfg.is_platform_admin(" OWNER@PLATFORM.ORG "));
        assert!(!cfg.is_platform_admin("someone@else.org"));
    }

    #[test]
    fn platform_admin_is_closed_when_unset() {
        assert!(!config(None).is_platform_admin("owner@platform.org"));
    }

    #[tokio::test]
    async fn state_builds_without_touching_the_database() {
        let cfg = config(Some("owner@platform.org"));
        let pool = PgPoolOptions::new().connect_lazy(&cfg.database_url).unwrap();
        let state = AppState::with_pool(cfg, pool);
        assert!(state.config.is_platform_admin("OWNER@platform.org"));
    }
}
