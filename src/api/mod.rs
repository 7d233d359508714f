pub mod auth;
pub mod exports;
pub mod health;
pub mod routes;

pub use routes::{create_router, AppState};
