//! Environment-driven configuration.
//!
//! Everything is read once at startup; `.env` is loaded by `main` before
//! [`AppConfig::from_env`] runs.

use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
    pub redis_url: Option<String>,
    pub auth: AuthConfig,
    pub workflow: WorkflowConfig,
    pub cache: CacheConfig,
}

/// How bearer tokens are verified.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// RS256 tokens checked against the identity provider's published key set.
    Jwks {
        jwks_url: String,
        issuer: Option<String>,
        audience: Option<String>,
    },
    /// HS256 tokens signed with a shared secret (local development and tests).
    SharedSecret { secret: String },
}

/// Policy knobs for the booking and job assignment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Active assignments an employee may hold before being marked unavailable.
    pub max_active_jobs_per_employee: u64,
    /// Bounded retries for booking number and employee code generation.
    pub identifier_attempts: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_active_jobs_per_employee: 1,
            identifier_attempts: 5,
        }
    }
}

/// Cache TTLs for the public service catalog.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub service_list_ttl: Duration,
    pub service_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            service_list_ttl: Duration::from_secs(300), // 5 minutes
            service_ttl: Duration::from_secs(600),      // 10 minutes
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let port = parsed("PORT", 8080u16)?;

        let cors_origins = optional("CORS_ORIGIN")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let auth = match (optional("AUTH_JWKS_URL"), optional("AUTH_JWT_SECRET")) {
            (Some(jwks_url), _) => AuthConfig::Jwks {
                jwks_url,
                issuer: optional("AUTH_ISSUER"),
                audience: optional("AUTH_AUDIENCE"),
            },
            (None, Some(secret)) => AuthConfig::SharedSecret { secret },
            (None, None) => return Err(ConfigError::Missing("AUTH_JWKS_URL or AUTH_JWT_SECRET")),
        };

        let workflow = WorkflowConfig::from_env()?;

        let defaults = CacheConfig::default();
        let cache = CacheConfig {
            service_list_ttl: Duration::from_secs(parsed(
                "CACHE_TTL_SERVICES",
                defaults.service_list_ttl.as_secs(),
            )?),
            service_ttl: Duration::from_secs(parsed(
                "CACHE_TTL_SERVICE_DETAIL",
                defaults.service_ttl.as_secs(),
            )?),
        };

        Ok(Self {
            database_url,
            port,
            cors_origins,
            redis_url: optional("REDIS_URL"),
            auth,
            workflow,
            cache,
        })
    }
}

impl WorkflowConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            max_active_jobs_per_employee: parsed(
                "EMPLOYEE_MAX_ACTIVE_JOBS",
                defaults.max_active_jobs_per_employee,
            )?,
            identifier_attempts: parsed("BOOKING_NUMBER_ATTEMPTS", defaults.identifier_attempts)?,
        };

        if config.max_active_jobs_per_employee == 0 {
            return Err(ConfigError::Invalid {
                name: "EMPLOYEE_MAX_ACTIVE_JOBS",
                value: "0".to_string(),
            });
        }
        if config.identifier_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "BOOKING_NUMBER_ATTEMPTS",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
