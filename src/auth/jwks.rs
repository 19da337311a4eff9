use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use tracing::debug;

use super::jwt::Claims;

#[derive(Clone)]
struct JwksKeyData {
    n: String,
    e: String,
    algorithm: Algorithm,
}

/// RSA signing keys published by the identity provider, cached by `kid`.
#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, JwksKeyData>>,
    jwks_url: String,
    issuer: Option<String>,
    audience: Option<String>,
    client: reqwest::Client,
}

impl JwksCache {
    pub fn new(jwks_url: &str, issuer: Option<String>, audience: Option<String>) -> Self {
        let client = reqwest::Client::new();
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(std::time::Duration::from_secs(3600))
                .max_capacity(16)
                .build(),
        );

        Self {
            cache,
            jwks_url: jwks_url.to_string(),
            issuer,
            audience,
            client,
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn get_key_data(&self, kid: &str) -> Result<JwksKeyData, String> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let keys = jwks["keys"].as_array().ok_or("No keys in JWKS")?;

        // Cache every key in the set, not only the requested kid.
        let mut found = None;
        for key in keys {
            let (Some(key_kid), Some(n), Some(e)) =
                (key["kid"].as_str(), key["n"].as_str(), key["e"].as_str())
            else {
                continue;
            };

            let algorithm = match key["alg"].as_str().unwrap_or("RS256") {
                "RS384" => Algorithm::RS384,
                "RS512" => Algorithm::RS512,
                _ => Algorithm::RS256,
            };

            let data = JwksKeyData {
                n: n.to_string(),
                e: e.to_string(),
                algorithm,
            };
            self.cache.insert(key_kid.to_string(), data.clone()).await;
            if key_kid == kid {
                found = Some(data);
            }
        }

        found.ok_or(format!("Key with kid={kid} not found in JWKS"))
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key_data = self.get_key_data(&kid).await?;

        let decoding_key = DecodingKey::from_rsa_components(&key_data.n, &key_data.e)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(key_data.algorithm);
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = &self.issuer {
            validation.set_issuer(&[iss]);
        }

        decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}
