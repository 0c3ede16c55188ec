pub mod auth;
pub mod dao;
pub mod notify;
pub mod pricing;

pub use auth::AuthService;
pub use dao::*;
pub use notify::NotificationService;
