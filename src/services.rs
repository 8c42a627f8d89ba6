pub mod auth;
pub mod dashboard_service;
pub mod distribution_service;
pub mod document_service;
pub mod event_service;
pub mod family_service;
pub mod finance_service;
pub mod masjid_service;
pub mod roles_service;
pub mod search_service;
pub mod staff_service;
