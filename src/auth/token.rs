use crate::error::{AppError, UNAUTHORIZED_MESSAGE};
use crate::models::{require_email, Document};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a token.
///
/// `payload` is the object the caller submitted at mint time, verbatim.
/// Callers may place any field there; nothing beyond `email` is checked.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    #[serde(flatten)]
    pub payload: Document,
}

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.payload.get("email").and_then(Value::as_str)
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Mints and verifies HS256 bearer tokens with a single shared secret.
///
/// The server keeps no session state: a token is valid as long as its
/// signature checks out and its expiry has not passed.
pub struct TokenService {
    keys: Option<Keys>,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    /// Creates a service signing with `secret`. A missing secret is tolerated
    /// here and reported per request: issuing fails with 500, verifying with 401.
    pub fn new(secret: Option<&str>) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: Option<&str>, ttl: Duration) -> Self {
        let keys = secret.map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });
        // Only signature and `exp` are checked; `aud`, `iss`, `sub` and `nbf`
        // are ordinary caller claims.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            keys,
            ttl,
            validation,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Signs `payload` as-is, adding `exp` and, unless supplied, `iat`.
    ///
    /// Returns `BadRequest("invalid email")` when the payload has no non-empty
    /// `email` string, and `InternalServerError` when signing is impossible.
    pub fn issue(&self, mut payload: Document) -> Result<String, AppError> {
        require_email(&Value::Object(payload.clone()))?;

        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AppError::InternalServerError("ACCESS_SEC_TOKEN not set".into()))?;

        if payload.contains_key("exp") {
            return Err(AppError::InternalServerError(
                "payload already carries an exp claim".into(),
            ));
        }

        let now = Utc::now();
        let iat = match payload.remove("iat") {
            Some(value) => value
                .as_i64()
                .or_else(|| value.as_f64().map(|secs| secs.trunc() as i64))
                .ok_or_else(|| AppError::InternalServerError("iat claim must be a number".into()))?,
            None => now.timestamp(),
        };
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::InternalServerError("token expiry overflow".into()))?
            .timestamp();

        let claims = Claims { exp, iat, payload };
        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry and returns the decoded claims.
    ///
    /// Every failure is the same `Unauthorized`; the cause is only logged.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let keys = self.keys.as_ref().ok_or_else(|| {
            log::error!("token verification attempted without ACCESS_SEC_TOKEN");
            AppError::Unauthorized(UNAUTHORIZED_MESSAGE.into())
        })?;
        let data = decode::<Claims>(token, &keys.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

/// Body of a successful `POST /jwt`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}
