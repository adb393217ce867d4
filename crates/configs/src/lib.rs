use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// SQLite connection settings. The pool is pinned to a single connection.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Populate demo rows when the user table is empty.
    #[serde(default)]
    pub seed: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            seed: false,
        }
    }
}

fn default_database_url() -> String { "sqlite://data/booking.db?mode=rwc".into() }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 300 }
fn default_acquire_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
    /// Whether `/auth/register` accepts `role = "admin"`.
    #[serde(default)]
    pub allow_admin_registration: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl_hours(), allow_admin_registration: false }
    }
}

fn default_token_ttl_hours() -> u64 { 24 }

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::path::Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Environment variables override values read from the file.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|k| std::env::var(k).ok());
    }

    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = get("JWT_SECRET").filter(|v| !v.trim().is_empty()) {
            self.auth.jwt_secret = secret;
        }
        if let Some(host) = get("SERVER_HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = get("SERVER_PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        if !self.url.to_lowercase().starts_with("sqlite:") {
            return Err(anyhow!("database.url must start with sqlite:"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(anyhow!("auth.token_ttl_hours must be within 1..={MAX_TOKEN_TTL_HOURS}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg = load_from_str("[auth]\njwt_secret = \"s3cret\"\n").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.auth.token_ttl_hours, 24);
        assert!(!cfg.auth.allow_admin_registration);
        assert!(cfg.database.url.starts_with("sqlite:"));
        assert_eq!(cfg.log.format, LogFormat::Compact);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = load_from_str("[server]\nhost = \"0.0.0.0\"\nport = 9000\n").unwrap();
        cfg.apply_env_from(|k| match k {
            "JWT_SECRET" => Some("from-env".into()),
            "SERVER_PORT" => Some("9100".into()),
            "DATABASE_URL" => Some("sqlite::memory:".into()),
            _ => None,
        });
        assert_eq!(cfg.auth.jwt_secret, "from-env");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.url, "sqlite::memory:");
        cfg.normalize_and_validate().unwrap();
    }

    #[test]
    fn rejects_missing_secret_and_foreign_database() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_and_validate().is_err());

        cfg.auth.jwt_secret = "x".into();
        cfg.database.url = "postgres://localhost/db".into();
        assert!(cfg.normalize_and_validate().is_err());

        cfg.database.url = "sqlite::memory:".into();
        cfg.auth.token_ttl_hours = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn token_lifetime_is_bounded() {
        let mut cfg = AppConfig::default();
        cfg.auth.jwt_secret = "k".into();
        cfg.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS;
        cfg.normalize_and_validate().unwrap();

        cfg.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS + 1;
        assert!(cfg.normalize_and_validate().is_err());

        cfg.auth.token_ttl_hours = 1_000_000_000_000;
        let err = cfg.normalize_and_validate().unwrap_err();
        assert!(err.to_string().contains("token_ttl_hours"));
    }

    #[test]
    fn zero_workers_fall_back() {
        let mut cfg = load_from_str(
            "[server]\nhost = \"\"\nport = 1\nworker_threads = 0\n[auth]\njwt_secret = \"k\"\n[log]\nformat = \"json\"\n",
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.log.format, LogFormat::Json);
    }
}
