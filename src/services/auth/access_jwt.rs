use std::collections::HashSet;
use std::{error::Error as StdError, fmt};

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::api::v1::extractors::AuthCtx;

// HMAC family only. Anything else declared in the token header is refused
// before signature verification.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

// access token の検証 + claim の厳格チェックで返すエラー。
// 呼び出し側はログに出すだけで、HTTP レスポンスには載せない。
#[derive(Debug)]
pub enum AccessTokenError {
    Jwt(jsonwebtoken::errors::Error),
    MissingClaim(&'static str),
    Expired { exp: i64, now: i64 },
}

impl fmt::Display for AccessTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::MissingClaim(name) => write!(f, "missing or empty '{}' claim", name),
            Self::Expired { exp, now } => write!(f, "token expired (exp={}, now={})", exp, now),
        }
    }
}

impl StdError for AccessTokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessTokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Access token (JWT) claims as issued by the identity provider.
///
/// Every field is optional at the serde level so that a missing claim turns
/// into `MissingClaim` instead of an opaque deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// HMAC access-token verifier.
///
/// - Built once at startup; the secret is immutable for the process lifetime.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("algorithms", &self.validation.algorithms)
            .field("aud", &self.validation.aud)
            .finish()
    }
}

impl AuthService {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        // `exp` は任意。verify_at で明示的な時刻と比較する（厳密に後、leeway なし）
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        match audience {
            Some(aud) => {
                validation.set_audience(&[aud]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify against the current wall-clock time.
    ///
    /// This is the entry-point for middleware.
    pub fn verify(&self, token: &str) -> Result<AuthCtx, AccessTokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify signature + algorithm, then apply the claim rules at `now`
    /// (seconds since the epoch):
    /// - `sub` and `role` present and not blank
    /// - `exp`, when present, strictly greater than `now`
    pub fn verify_at(&self, token: &str, now: i64) -> Result<AuthCtx, AccessTokenError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        let subject = non_blank(claims.sub).ok_or(AccessTokenError::MissingClaim("sub"))?;
        let role = non_blank(claims.role).ok_or(AccessTokenError::MissingClaim("role"))?;

        if let Some(exp) = claims.exp
            && exp <= now
        {
            return Err(AccessTokenError::Expired { exp, now });
        }

        Ok(AuthCtx {
            email: non_blank(claims.email),
            expires_at: claims.exp,
            issued_at: claims.iat,
            ..AuthCtx::new(subject, role)
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
