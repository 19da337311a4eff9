use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::auth::jwks::JwksCache;

/// ID token claims issued by the identity provider.
///
/// `sub` is the provider's stable user id and is stored as `users.auth_uid`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub aud: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl Claims {
    pub fn auth_uid(&self) -> &str {
        &self.sub
    }

    pub fn user_email(&self) -> Option<String> {
        self.email.clone()
    }

    pub fn display_name(&self) -> Option<String> {
        self.name.clone()
    }

    pub fn photo_url(&self) -> Option<String> {
        self.picture.clone()
    }
}

/// Verifies bearer tokens. Which variant is built depends on `AuthConfig`.
pub enum TokenVerifier {
    Jwks(JwksCache),
    SharedSecret(String),
}

impl TokenVerifier {
    pub async fn verify(&self, token: &str) -> Result<Claims, String> {
        match self {
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await.map(|td| td.claims),
            TokenVerifier::SharedSecret(secret) => validate_token(token, secret),
        }
    }
}

/// Validate an HS256 token signed with a shared secret and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|td| td.claims)
    .map_err(|e| format!("Token validation failed: {e}"))
}
