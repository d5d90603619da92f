//! Seeds the initial admin account. Idempotent: an existing account with
//! the configured username is left alone.

use anyhow::Context;
use auth_adapters::ArgonPasswordHasher;
use chrono::Utc;
use configs::AppConfig;
use domains::{PasswordHasher, Role, User, UserRepo};
use secrecy::ExposeSecret;
use storage_adapters::PgStore;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AppConfig::load().context("loading configuration")?;
    let store = PgStore::connect(config.database.url.expose_secret(), 1)
        .await
        .context("connecting to postgres")?;
    store.migrate().await.context("running migrations")?;

    let username = std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD must be set")?;

    if store.find_by_username(&username).await?.is_some() {
        tracing::info!(%username, "admin account already present, nothing to do");
        return Ok(());
    }

    let now = Utc::now();
    let admin = User {
        id: Uuid::now_v7(),
        username: username.clone(),
        email,
        password_hash: ArgonPasswordHasher::new().hash(&password)?,
        role: Role::Admin,
        bio: None,
        avatar: None,
        created_at: now,
        updated_at: now,
    };
    UserRepo::insert(&store, admin).await?;
    tracing::info!(%username, "admin account created");
    Ok(())
}
