#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use models::user::{self, Role};
use sea_orm::DatabaseConnection;

/// Fresh in-memory database with every migration applied.
///
/// Each call gets its own database, so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Insert a user with a placeholder hash; name is derived from the email.
pub async fn make_user(db: &DatabaseConnection, email: &str, role: Role) -> Result<user::Model, anyhow::Error> {
    let name = email.split('@').next().unwrap_or("user");
    Ok(user::create(db, name, email, "$argon2id$placeholder", role).await?)
}
