// Risk Dashboard Library

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod observability;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use errors::{AppError, Result};
