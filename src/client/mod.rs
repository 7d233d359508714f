pub mod api_client;
pub mod cookies;

pub use api_client::{ApiClient, ClientError};
pub use cookies::{extract_cookie, CookieSource, NoCookies, SharedCookies, StaticCookies};
