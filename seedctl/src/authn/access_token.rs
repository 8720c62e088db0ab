//! Access token inspection

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims the client cares about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Expiration timestamp
    pub exp: i64,

    #[serde(default)]
    pub iat: Option<i64>,
}

/// Decoded view of an access token.
///
/// The signature is NOT checked; the backend does that. Tokens that are not
/// JWTs are treated as opaque and never report an expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    claims: Option<AccessTokenClaims>,
}

impl AccessToken {
    pub fn inspect(raw: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<AccessTokenClaims>(raw, &DecodingKey::from_secret(b""), &validation)
            .map(|data| data.claims)
            .ok();

        Self { claims }
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.sub.as_str())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .as_ref()
            .and_then(|c| DateTime::from_timestamp(c.exp, 0))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_within(0)
    }

    /// Whether the token expires within `seconds`. Opaque tokens never do.
    pub fn expires_within(&self, seconds: i64) -> bool {
        match &self.claims {
            Some(claims) => claims.exp < Utc::now().timestamp() + seconds,
            None => false,
        }
    }
}
