// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::middleware;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_my_masjids,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Families ---
        handlers::families::list_families,
        handlers::families::create_family,
        handlers::families::scan_family,
        handlers::families::get_family,
        handlers::families::update_family,
        handlers::families::delete_family,
        handlers::families::add_member,
        handlers::families::update_member,
        handlers::families::delete_member,

        // --- Accounts ---
        handlers::accounts::list_transactions,
        handlers::accounts::create_transaction,
        handlers::accounts::delete_transaction,
        handlers::accounts::get_summary,

        // --- Events ---
        handlers::events::list_events,
        handlers::events::create_event,
        handlers::events::get_event,
        handlers::events::delete_event,
        handlers::events::scan_attendance,
        handlers::events::set_attendance,

        // --- Admin ---
        handlers::admin::get_overview,
        handlers::admin::invite_user,
        handlers::admin::revoke_invitation,
        handlers::admin::remove_user,
        handlers::admin::toggle_permission,
        handlers::admin::accept_invitation,
        handlers::rbac::list_permissions,

        // --- Staff ---
        handlers::staff::list_employees,
        handlers::staff::create_employee,
        handlers::staff::get_employee,
        handlers::staff::update_employee,
        handlers::staff::delete_employee,
        handlers::staff::pay_salary,
        handlers::staff::list_board,
        handlers::staff::create_board_member,
        handlers::staff::update_board_member,
        handlers::staff::delete_board_member,

        // --- Distributions ---
        handlers::distributions::list_distributions,
        handlers::distributions::create_distribution,
        handlers::distributions::delete_distribution,

        // --- Search ---
        handlers::search::search,

        // --- Documents ---
        handlers::documents::families_report,
        handlers::documents::family_card,
        handlers::documents::family_qr,
        handlers::documents::accounts_report,
        handlers::documents::events_report,
        handlers::documents::attendance_report,

        // --- Platform ---
        handlers::platform::list_masjids,
        handlers::platform::update_status,
        handlers::platform::update_subscription,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::MasjidMembership,

            // --- Masjid / Settings ---
            models::masjid::MasjidStatus,
            models::masjid::SubscriptionStatus,
            models::masjid::Masjid,
            models::masjid::UpdateMasjidStatusPayload,
            models::masjid::UpdateSubscriptionPayload,
            models::settings::MasjidSettings,
            models::settings::UpdateSettingsRequest,

            // --- Dashboard ---
            models::dashboard::HomeSummary,

            // --- Families ---
            models::family::Family,
            models::family::FamilyPayload,
            models::family::SubscriptionBalance,
            models::family::FamilyDetail,
            models::member::Member,
            models::member::MemberPayload,

            // --- Finance ---
            models::finance::TransactionKind,
            models::finance::Transaction,
            models::finance::CreateTransactionPayload,
            models::finance::FinancialSummary,
            models::finance::TransactionList,

            // --- Events ---
            models::event::Event,
            models::event::EventSummary,
            models::event::AttendanceStatus,
            models::event::EventAttendance,
            models::event::AttendanceView,
            models::event::EventDetail,
            models::event::CreateEventPayload,
            models::event::ScanPayload,
            models::event::ScanOutcome,
            models::event::SetAttendancePayload,

            // --- Roles ---
            models::roles::RoleKind,
            models::roles::InvitationStatus,
            models::roles::PermissionArea,
            models::roles::RolePermissions,
            models::roles::UserRole,
            models::roles::RoleInvitation,
            models::roles::InvitePayload,
            models::roles::TogglePermissionPayload,
            models::roles::AdminOverview,
            middleware::rbac::PermissionInfo,

            // --- Staff ---
            models::staff::Employee,
            models::staff::EmployeePayload,
            models::staff::EmployeePayment,
            models::staff::CreatePaymentPayload,
            models::staff::EmployeeDetail,
            models::staff::BoardMember,
            models::staff::BoardMemberPayload,
            models::staff::BoardRank,
            models::staff::BoardRoster,

            // --- Distributions ---
            models::distribution::ServiceDistribution,
            models::distribution::DistributionRow,
            models::distribution::CreateDistributionPayload,

            // --- Search ---
            models::search::Gender,
            models::search::FamilyQuery,
            models::search::MemberHit,
            models::search::SearchResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registro e login"),
        (name = "Users", description = "Conta autenticada e suas mesquitas"),
        (name = "Settings", description = "Perfil da mesquita"),
        (name = "Dashboard", description = "Cards da tela inicial"),
        (name = "Families", description = "Famílias e membros"),
        (name = "Accounts", description = "Caixa: entradas, saídas e contribuições"),
        (name = "Events", description = "Eventos e presença por QR"),
        (name = "Admin", description = "Usuários, convites e permissões da mesquita"),
        (name = "Staff", description = "Funcionários, salários e diretoria"),
        (name = "Distributions", description = "Entregas de serviços às famílias"),
        (name = "Search", description = "Busca em linguagem natural"),
        (name = "Documents", description = "Relatórios em PDF e QR Codes"),
        (name = "Platform", description = "Administração da plataforma")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_declares_bearer_scheme_and_tenant_routes() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("api_jwt"));
        assert!(doc.paths.paths.contains_key("/api/events/{id}/scan"));
        assert!(doc.paths.paths.contains_key("/api/families/report.pdf"));
    }
}
