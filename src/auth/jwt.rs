//! JWT Token Service
//!
//! Builds and signs compact HS256 tokens from a fixed claim set, and pairs two
//! independently keyed signers into an access/refresh token generator.
//!
//! Tokens are assembled by hand rather than through `jsonwebtoken::encode` so the
//! header and claim bytes are fixed: `{"alg":"HS256","typ":"JWT"}` and
//! `{"iat":..,"user_id":..,"username":..}` in that key order. The HMAC itself and
//! verification go through `jsonwebtoken`.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation, crypto, decode};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::auth::models::LoginTokens;
use crate::services::traits::TokenGenerator;

/// Largest integer an `f64` holds exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Source of the `iat` timestamp, in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall clock with whole-second resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp() as f64
    }
}

/// Errors raised while signing or verifying a token
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to serialize token claims: {0}")]
    Claims(#[from] serde_json::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: TokenHeader = TokenHeader {
    alg: "HS256",
    typ: "JWT",
};

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issued-at, seconds since epoch
    #[serde(serialize_with = "serialize_timestamp")]
    pub iat: f64,
    pub user_id: i64,
    pub username: String,
}

/// Writes integral timestamps as JSON integers (`42`, not `42.0`) and refuses
/// values JSON cannot represent.
fn serialize_timestamp<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !value.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "timestamp {value} is not a finite number"
        )));
    }
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Signs tokens with a single secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Tokens carry no exp/aud; only the signature is checked.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding_key,
            decoding_key,
            validation,
            clock,
        }
    }

    /// Produce a signed token for the user, stamped with the current clock value.
    pub fn sign(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        let claims = Claims {
            iat: self.clock.now(),
            user_id,
            username: username.to_string(),
        };
        self.sign_claims(&claims)
    }

    fn sign_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&HEADER)?);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let message = format!("{header}.{payload}");

        let signature = crypto::sign(message.as_bytes(), &self.encoding_key, Algorithm::HS256)
            .map_err(TokenError::Signing)?;

        Ok(format!("{message}.{signature}"))
    }

    /// Check the signature against this signer's secret and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

/// Access and refresh signing secrets
#[derive(Clone)]
pub struct Secrets {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Issues access/refresh token pairs from two independently keyed signers
#[derive(Debug, Clone)]
pub struct JwtService {
    access_signer: TokenSigner,
    refresh_signer: TokenSigner,
}

impl JwtService {
    /// Both signers share `clock`, so a pair always carries the same `iat`.
    pub fn new(secrets: &Secrets, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_signer: TokenSigner::new(&secrets.access, clock.clone()),
            refresh_signer: TokenSigner::new(&secrets.refresh, clock),
        }
    }

    pub fn with_system_clock(secrets: &Secrets) -> Self {
        Self::new(secrets, Arc::new(SystemClock))
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.access_signer.verify(token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.refresh_signer.verify(token)
    }
}

impl TokenGenerator for JwtService {
    fn generate_tokens(&self, user_id: i64, username: &str) -> Result<LoginTokens, TokenError> {
        let access_token = self.access_signer.sign(user_id, username)?;
        let refresh_token = self.refresh_signer.sign(user_id, username)?;

        Ok(LoginTokens {
            access_token,
            refresh_token,
        })
    }
}
