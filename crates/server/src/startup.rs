use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, LogFormat, MAX_TOKEN_TTL_HOURS};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Initialize logging from the `[log]` section; `RUST_LOG` still wins.
pub fn init_logging(cfg: &AppConfig) {
    common::utils::logging::init_logging_with(cfg.log.level.as_deref(), cfg.log.format == LogFormat::Json);
}

pub fn auth_config(cfg: &AppConfig) -> Result<service::auth::AuthConfig, StartupError> {
    let hours = cfg.auth.token_ttl_hours;
    let ttl = i64::try_from(hours)
        .ok()
        .filter(|h| (1..=MAX_TOKEN_TTL_HOURS as i64).contains(h))
        .and_then(chrono::Duration::try_hours)
        .ok_or_else(|| StartupError::InvalidConfig(format!("auth.token_ttl_hours out of range: {hours}")))?;
    let mut auth = service::auth::AuthConfig::new(cfg.auth.jwt_secret.clone());
    auth.token_ttl = ttl;
    auth.allow_admin_registration = cfg.auth.allow_admin_registration;
    Ok(auth)
}

/// Connect, migrate and optionally seed the database.
pub async fn prepare_database(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    common::env::ensure_env(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;
    info!(event = "migrations_applied", "database schema up to date");
    if cfg.database.seed && service::seed::seed_if_empty(&db).await? {
        info!(event = "seeded", admin = service::seed::ADMIN_EMAIL, "demo data inserted");
    }
    Ok(db)
}

pub fn build_app(db: DatabaseConnection, cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = ServerState::new(db, auth_config(cfg)?);
    Ok(routes::build_router(state, build_cors()))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(event = "shutdown_signal", "shutting down");
}

/// Load and validate configuration, then serve until a shutdown signal arrives.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    init_logging(&cfg);
    run_with(cfg).await
}

/// Serve with an already validated configuration.
pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    let db = prepare_database(&cfg).await?;
    let app = build_app(db, &cfg)?;

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    info!(%addr, event = "listening", "starting server crate");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hours: u64) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.auth.jwt_secret = "k".into();
        cfg.auth.token_ttl_hours = hours;
        cfg
    }

    #[test]
    fn auth_config_carries_lifetime() {
        let auth = auth_config(&config(48)).unwrap();
        assert_eq!(auth.token_ttl, chrono::Duration::hours(48));
        assert!(!auth.allow_admin_registration);
    }

    #[test]
    fn auth_config_refuses_out_of_range_lifetime() {
        for hours in [0, MAX_TOKEN_TTL_HOURS + 1, 1_000_000_000_000, u64::MAX] {
            assert!(matches!(auth_config(&config(hours)), Err(StartupError::InvalidConfig(_))), "{hours}");
        }
    }
}
