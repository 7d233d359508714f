// Session cookies issued by the SSO hand-off

use crate::auth::sso::Session;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Http-only cookie carrying the merchant identifier
pub const MERCHANT_ID_COOKIE: &str = "merchantId";

/// Script-readable cookie carrying the bearer token for API calls
pub const API_TOKEN_COOKIE: &str = "apiToken";

/// Cookie with the merchant identifier. Session scoped: no max-age.
pub fn merchant_id_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    Cookie::build((MERCHANT_ID_COOKIE, session.merchant_id.clone()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Cookie with the raw SSO token, readable by page scripts so they can send
/// it back as a bearer credential.
pub fn api_token_cookie(session: &Session, max_age_days: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((API_TOKEN_COOKIE, session.api_token.clone()))
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(max_age_days))
        .build()
}
