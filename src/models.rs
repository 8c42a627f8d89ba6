pub mod auth;
pub mod dashboard;
pub mod distribution;
pub mod event;
pub mod family;
pub mod finance;
pub mod masjid;
pub mod member;
pub mod report;
pub mod roles;
pub mod search;
pub mod settings;
pub mod staff;
