//! # Inkpress server binary
//!
//! Assembles the application: configuration, tracing, the Postgres store,
//! the auth collaborators, the service layer, and the axum router.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::AppState;
use auth_adapters::{ArgonPasswordHasher, JwtTokens};
use configs::AppConfig;
use domains::{AuthTokens, BlogRepo, CommentRepo, PasswordHasher, ReportRepo, UserRepo};
use secrecy::ExposeSecret;
use services::{
    BlogService, CascadeEngine, CommentService, DashboardService, ReportService, UserService,
};
use storage_adapters::PgStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config);

    // Storage
    let store = Arc::new(
        PgStore::connect(config.database.url.expose_secret(), config.database.max_connections)
            .await
            .context("connecting to postgres")?,
    );
    store.migrate().await.context("running migrations")?;

    let users: Arc<dyn UserRepo> = store.clone();
    let blogs: Arc<dyn BlogRepo> = store.clone();
    let comments: Arc<dyn CommentRepo> = store.clone();
    let reports: Arc<dyn ReportRepo> = store.clone();

    // Auth collaborators
    let hasher: Arc<dyn PasswordHasher> = Arc::new(ArgonPasswordHasher::new());
    let tokens: Arc<dyn AuthTokens> = Arc::new(JwtTokens::new(
        config.auth.jwt_secret.expose_secret().as_bytes(),
        config.auth.token_ttl_minutes,
    ));

    // Service layer
    let cascade =
        CascadeEngine::new(users.clone(), blogs.clone(), comments.clone(), reports.clone());
    let state = AppState {
        users: UserService::new(users.clone(), hasher, tokens, cascade.clone()),
        blogs: BlogService::new(blogs.clone(), cascade.clone()),
        comments: CommentService::new(comments.clone(), blogs.clone(), cascade.clone()),
        reports: ReportService::new(reports.clone(), blogs.clone(), comments.clone(), users.clone()),
        dashboard: DashboardService::new(users.clone(), blogs, comments.clone(), reports),
        user_repo: users,
        comment_repo: comments,
    };

    let app = api_adapters::router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "inkpress listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
