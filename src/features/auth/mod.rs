mod error;
mod validator;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod policy;
pub mod routes;
pub mod services;
pub mod store;

pub use error::AuthError;
pub use model::AuthenticatedUser;
pub use services::{AuthService, TokenService};
pub use store::{MemoryUserStore, PgUserStore, UserStore};
pub use validator::JwtValidator;
