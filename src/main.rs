use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use gleamy_backend::auth::jwks::JwksCache;
use gleamy_backend::auth::jwt::TokenVerifier;
use gleamy_backend::cache::RedisCache;
use gleamy_backend::config::{AppConfig, AuthConfig};
use gleamy_backend::create_pool;
use gleamy_backend::handlers;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    Migrator::up(&db, None).await.map_err(std::io::Error::other)?;
    let db_data = web::Data::new(db);

    // The catalog cache is optional; without REDIS_URL every read hits the database.
    let redis_data = match &config.redis_url {
        Some(redis_url) => match RedisCache::new(redis_url).await {
            Ok(cache) => {
                tracing::info!("Connected to Redis");
                Some(web::Data::new(Arc::new(cache)))
            }
            Err(e) => {
                tracing::warn!("Redis unavailable, catalog cache disabled: {e}");
                None
            }
        },
        None => None,
    };

    let verifier = match &config.auth {
        AuthConfig::Jwks {
            jwks_url,
            issuer,
            audience,
        } => TokenVerifier::Jwks(JwksCache::new(jwks_url, issuer.clone(), audience.clone())),
        AuthConfig::SharedSecret { secret } => TokenVerifier::SharedSecret(secret.clone()),
    };
    let verifier_data = web::Data::new(Arc::new(verifier));

    let workflow_data = web::Data::new(config.workflow);
    let cache_ttl_data = web::Data::new(config.cache);
    let cors_origins = config.cors_origins.clone();

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        max_active_jobs = config.workflow.max_active_jobs_per_employee,
        "Server running at http://{bind_addr}"
    );

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);
        if cors_origins.is_empty() {
            cors = cors.allow_any_origin();
        } else {
            for origin in &cors_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        let mut app = App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(verifier_data.clone())
            .app_data(workflow_data.clone())
            .app_data(cache_ttl_data.clone());
        if let Some(redis_data) = &redis_data {
            app = app.app_data(redis_data.clone());
        }

        app.route("/health", web::get().to(handlers::health))
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
