pub mod accounts;
pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod distributions;
pub mod documents;
pub mod events;
pub mod families;
pub mod platform;
pub mod rbac;
pub mod search;
pub mod settings;
pub mod staff;
