//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Extract the on-disk path from a SQLite DSN, if it names a file.
///
/// Returns `None` for in-memory databases.
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" || path.starts_with("file::memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Ensure the parent directory of a file-backed SQLite database exists.
pub async fn ensure_env(database_url: &str) -> anyhow::Result<()> {
    let Some(file) = sqlite_file_path(database_url) else {
        debug!(%database_url, "in-memory database; nothing to prepare");
        return Ok(());
    };
    let parent = file.parent().unwrap_or_else(|| Path::new(""));
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "database directory missing; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_dsn_has_no_file() {
        assert!(sqlite_file_path("sqlite::memory:").is_none());
        assert!(sqlite_file_path("postgres://x").is_none());
    }

    #[test]
    fn file_dsn_strips_query() {
        let p = sqlite_file_path("sqlite://data/booking.db?mode=rwc").unwrap();
        assert_eq!(p, PathBuf::from("data/booking.db"));
    }

    #[tokio::test]
    async fn creates_missing_parent() {
        let dir = std::env::temp_dir().join(format!("booking-env-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/app.db?mode=rwc", dir.display());
        ensure_env(&url).await.unwrap();
        assert!(dir.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
