pub mod auth;
pub mod lifecycle;
pub mod reports;
pub mod teams;
