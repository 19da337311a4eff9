use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;

/// JSON-over-Redis read-through cache for the public service catalog.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        value
            .map(|v| {
                serde_json::from_str(&v).map_err(|e| {
                    RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })
            })
            .transpose()
    }

    /// Set a value with a TTL.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        redis::cmd("SET")
            .arg(key)
            .arg(serialized)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut self.connection.clone())
            .await
    }

    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Delete every key matching a glob pattern.
    pub async fn delete_pattern(&self, pattern: &str) -> redis::RedisResult<()> {
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut self.connection.clone())
            .await?;

        if !keys.is_empty() {
            let _: () = redis::cmd("DEL")
                .arg(&keys)
                .query_async(&mut self.connection.clone())
                .await?;
        }

        Ok(())
    }

    /// Drop a service entry and every cached listing after a catalog write.
    pub async fn invalidate_service(&self, id: &str) {
        if let Err(e) = self.delete(&keys::service(id)).await {
            tracing::warn!("Cache invalidation failed for service {id}: {e}");
        }
        if let Err(e) = self.delete_pattern(keys::SERVICE_LIST_PATTERN).await {
            tracing::warn!("Cache invalidation failed for service listings: {e}");
        }
    }
}

/// Cache key generators
pub mod keys {
    pub const SERVICE_LIST_PATTERN: &str = "services:list:*";

    /// Key for a filtered service listing.
    pub fn service_list(filters: &str) -> String {
        format!("services:list:{filters}")
    }

    pub fn service(id: &str) -> String {
        format!("service:{id}")
    }
}

/// Wrapper type for Actix-web app data
pub type CacheData = Arc<RedisCache>;
