pub mod cookies;
pub mod sso;

pub use sso::{Session, SsoClaims, SsoVerifier};
