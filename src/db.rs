pub mod user_repo;
pub use user_repo::UserRepository;
pub mod masjid_repo;
pub use masjid_repo::MasjidRepository;
pub mod roles_repo;
pub use roles_repo::RolesRepository;
pub mod family_repo;
pub use family_repo::FamilyRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod staff_repo;
pub use staff_repo::StaffRepository;
pub mod distribution_repo;
pub use distribution_repo::DistributionRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
