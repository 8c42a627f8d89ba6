// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, tenancy::tenant_guard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new().await?;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let bind_addr = app_state.config.bind_addr.clone();
    let app = app(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn app(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Só login, sem mesquita
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/masjids", get(handlers::auth::get_my_masjids));

    let invitation_routes = Router::new()
        .route("/{id}/accept", post(handlers::admin::accept_invitation));

    let platform_routes = Router::new()
        .route("/masjids", get(handlers::platform::list_masjids))
        .route("/masjids/{id}/status", put(handlers::platform::update_status))
        .route("/masjids/{id}/subscription", put(handlers::platform::update_subscription));

    // Rotas da mesquita (auth + tenancy)
    let settings_routes = Router::new().route(
        "/",
        get(handlers::settings::get_settings).put(handlers::settings::update_settings),
    );

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary));

    let family_routes = Router::new()
        .route(
            "/",
            get(handlers::families::list_families).post(handlers::families::create_family),
        )
        .route("/scan", get(handlers::families::scan_family))
        .route("/report.pdf", get(handlers::documents::families_report))
        .route(
            "/{id}",
            get(handlers::families::get_family)
                .put(handlers::families::update_family)
                .delete(handlers::families::delete_family),
        )
        .route("/{id}/card", get(handlers::documents::family_card))
        .route("/{id}/qr", get(handlers::documents::family_qr))
        .route("/{id}/members", post(handlers::families::add_member))
        .route(
            "/{id}/members/{member_id}",
            put(handlers::families::update_member).delete(handlers::families::delete_member),
        );

    let account_book_routes = Router::new()
        .route(
            "/transactions",
            get(handlers::accounts::list_transactions).post(handlers::accounts::create_transaction),
        )
        .route(
            "/transactions/{id}",
            axum::routing::delete(handlers::accounts::delete_transaction),
        )
        .route("/summary", get(handlers::accounts::get_summary))
        .route("/report.pdf", get(handlers::documents::accounts_report));

    let event_routes = Router::new()
        .route(
            "/",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route("/report.pdf", get(handlers::documents::events_report))
        .route(
            "/{id}",
            get(handlers::events::get_event).delete(handlers::events::delete_event),
        )
        .route("/{id}/scan", post(handlers::events::scan_attendance))
        .route("/{id}/report.pdf", get(handlers::documents::attendance_report))
        .route(
            "/{id}/attendance/{attendance_id}",
            put(handlers::events::set_attendance),
        );

    let admin_routes = Router::new()
        .route("/", get(handlers::admin::get_overview))
        .route("/invitations", post(handlers::admin::invite_user))
        .route(
            "/invitations/{id}",
            axum::routing::delete(handlers::admin::revoke_invitation),
        )
        .route("/roles/{id}", axum::routing::delete(handlers::admin::remove_user))
        .route("/roles/{id}/permissions", post(handlers::admin::toggle_permission));

    let staff_routes = Router::new()
        .route(
            "/employees",
            get(handlers::staff::list_employees).post(handlers::staff::create_employee),
        )
        .route(
            "/employees/{id}",
            get(handlers::staff::get_employee)
                .put(handlers::staff::update_employee)
                .delete(handlers::staff::delete_employee),
        )
        .route("/employees/{id}/payments", post(handlers::staff::pay_salary))
        .route(
            "/board",
            get(handlers::staff::list_board).post(handlers::staff::create_board_member),
        )
        .route(
            "/board/{id}",
            put(handlers::staff::update_board_member)
                .delete(handlers::staff::delete_board_member),
        );

    let distribution_routes = Router::new()
        .route(
            "/",
            get(handlers::distributions::list_distributions)
                .post(handlers::distributions::create_distribution),
        )
        .route(
            "/{id}",
            axum::routing::delete(handlers::distributions::delete_distribution),
        );

    let search_routes = Router::new().route("/", get(handlers::search::search));

    let auth_state = app_state.clone();
    let login_only = move |router: Router<AppState>| {
        router.layer(axum_middleware::from_fn_with_state(auth_state.clone(), auth_guard))
    };
    let tenant_state = app_state.clone();
    let masjid_scoped = move |router: Router<AppState>| {
        router.layer(axum_middleware::from_fn_with_state(tenant_state.clone(), tenant_guard))
    };

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/permissions", get(handlers::rbac::list_permissions))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", login_only(user_routes))
        .nest("/api/invitations", login_only(invitation_routes))
        .nest("/api/platform", login_only(platform_routes))
        .nest("/api/settings", masjid_scoped(settings_routes))
        .nest("/api/dashboard", masjid_scoped(dashboard_routes))
        .nest("/api/families", masjid_scoped(family_routes))
        .nest("/api/accounts", masjid_scoped(account_book_routes))
        .nest("/api/events", masjid_scoped(event_routes))
        .nest("/api/admin", masjid_scoped(admin_routes))
        .nest("/api/staff", masjid_scoped(staff_routes))
        .nest("/api/distributions", masjid_scoped(distribution_routes))
        .nest("/api/search", masjid_scoped(search_routes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::Config;

    // Pool preguiçosa: nenhuma destas rotas chega ao banco
    fn test_app() -> Router {
        let config = Config {
            database_url: "postgres://localhost/masjeedh_test".into(),
            jwt_secret: "test-secret".into(),
            superadmin_email: None,
            bind_addr: "127.0.0.1:0".into(),
            fonts_dir: "./fonts".into(),
            font_family: "Roboto".into(),
            db_max_connections: 1,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        app(AppState::with_pool(config, pool))
    }

    async fn send(request: Request<Body>) -> (StatusCode, String) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_check_answers_ok() {
        let (status, body) = send(Request::get("/api/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn masjid_routes_require_a_token() {
        let (status, _) = send(Request::get("/api/families").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn account_routes_require_a_token() {
        let (status, _) = send(Request::get("/api/users/me").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let request = Request::get("/api/dashboard/summary")
            .header(header::AUTHORIZATION, "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn permission_catalogue_is_public() {
        let (status, body) =
            send(Request::get("/api/permissions").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("accounts"));
    }
}
