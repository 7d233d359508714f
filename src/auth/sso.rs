// SSO token verification for the dashboard hand-off

use crate::errors::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

// ============================================================================
// SSO Claims
// ============================================================================

/// Claims carried by the token the merchant platform issues when it sends a
/// merchant to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsoClaims {
    /// Merchant the session belongs to
    pub merchant_id: String,
    /// Shop the merchant came from
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub shop_domain: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiration time (Unix timestamp); tokens without one do not expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl SsoClaims {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| exp <= Utc::now().timestamp())
            .unwrap_or(false)
    }

    /// Get expiration as DateTime
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

// ============================================================================
// Session
// ============================================================================

/// A browser session established by the hand-off. The cookies are the whole
/// session; nothing is stored server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub merchant_id: String,
    pub api_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from verified claims and the raw token they came from
    pub fn from_verified(claims: &SsoClaims, token: &str, max_age_days: i64) -> Self {
        Self {
            merchant_id: claims.merchant_id.clone(),
            api_token: token.to_string(),
            expires_at: Utc::now() + Duration::days(max_age_days),
        }
    }
}

/// Any HMAC variant signed with the shared secret is accepted
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

// ============================================================================
// SSO Verifier
// ============================================================================

/// Verifies HMAC-signed SSO tokens against the shared dashboard secret
pub struct SsoVerifier {
    decoding_key: DecodingKey,
    #[cfg(test)]
    encoding_key: jsonwebtoken::EncodingKey,
}

impl SsoVerifier {
    /// Create a verifier for the given secret.
    ///
    /// A blank secret is a configuration error: the hand-off must fail closed
    /// rather than accept tokens signed with an empty key.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.trim().is_empty() {
            return Err(AppError::SsoNotConfigured);
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            #[cfg(test)]
            encoding_key: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Validate signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> Result<SsoClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        let token_data = decode::<SsoClaims>(token, &self.decoding_key, &validation)?;
        let claims = token_data.claims;

        if claims.is_expired() {
            return Err(AppError::TokenExpired);
        }

        if claims.merchant_id.trim().is_empty() {
            return Err(AppError::TokenValidation(
                "Token carries an empty merchantId".to_string(),
            ));
        }

        Ok(claims)
    }

    #[cfg(test)]
    pub(crate) fn sign(&self, claims: &SsoClaims) -> String {
        self.sign_with(Algorithm::HS256, claims)
    }

    #[cfg(test)]
    pub(crate) fn sign_with(&self, algorithm: Algorithm, claims: &SsoClaims) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(algorithm),
            claims,
            &self.encoding_key,
        )
        .expect("test token encodes")
    }
}

#[cfg(test)]
pub(crate) fn test_claims(merchant_id: &str, ttl_seconds: i64) -> SsoClaims {
    let now = Utc::now().timestamp();
    SsoClaims {
        merchant_id: merchant_id.to_string(),
        shop_id: Some("shop-1".to_string()),
        shop_domain: Some("acme.myshopify.com".to_string()),
        platform: Some("shopify".to_string()),
        iat: Some(now),
        exp: Some(now + ttl_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "dashboard-test-secret";

    #[test]
    fn test_valid_token_round_trip() {
        let verifier = SsoVerifier::new(SECRET).unwrap();
        let token = verifier.sign(&test_claims("merchant-42", 600));

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.merchant_id, "merchant-42");
        assert_eq!(claims.shop_id.as_deref(), Some("shop-1"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = SsoVerifier::new(SECRET).unwrap();
        let token = verifier.sign(&test_claims("merchant-42", -120));

        assert!(matches!(verifier.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_token_without_exp_accepted() {
        let verifier = SsoVerifier::new(SECRET).unwrap();
        let mut claims = test_claims("merchant-42", 600);
        claims.exp = None;
        let token = verifier.sign(&claims);

        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.merchant_id, "merchant-42");
        assert!(verified.expires_at().is_none());
        assert!(!verified.is_expired());
    }

    #[test]
    fn test_other_hmac_algorithms_accepted() {
        let verifier = SsoVerifier::new(SECRET).unwrap();
        for algorithm in [Algorithm::HS384, Algorithm::HS512] {
            let token = verifier.sign_with(algorithm, &test_claims("merchant-42", 600));
            assert_eq!(verifier.verify(&token).unwrap().merchant_id, "merchant-42");
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = SsoVerifier::new("some-other-secret").unwrap();
        let verifier = SsoVerifier::new(SECRET).unwrap();
        let token = issuer.sign(&test_claims("merchant-42", 600));

        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::TokenValidation(_))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let verifier = SsoVerifier::new(SECRET).unwrap();
        assert!(verifier.verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_blank_secret_fails_closed() {
        assert!(matches!(
            SsoVerifier::new("  "),
            Err(AppError::SsoNotConfigured)
        ));
    }

    #[test]
    fn test_session_keeps_token_verbatim() {
        let claims = test_claims("merchant-42", 600);
        let session = Session::from_verified(&claims, "raw.token.value", 30);

        assert_eq!(session.merchant_id, "merchant-42");
        assert_eq!(session.api_token, "raw.token.value");
        assert!(session.expires_at > Utc::now() + Duration::days(29));
    }
}
