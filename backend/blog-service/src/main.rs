use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use blog_service::db::{create_pool, run_migrations, PgBlogRepository};
use blog_service::{auth, configure, AppState, Config};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_healthcheck(port: u16) -> anyhow::Result<()> {
    let url = format!("http://127.0.0.1:{port}/health");
    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .context("healthcheck request failed")?;

    if resp.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("healthcheck HTTP status: {}", resp.status())
    }
}

/// Print a bearer token for an existing user id, signed with the configured secret.
fn issue_token(config: &Config, mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let user_id: i64 = args
        .next()
        .context("usage: blog-service issue-token <user-id> <username>")?
        .parse()
        .context("user id must be an integer")?;
    let username = args
        .next()
        .context("usage: blog-service issue-token <user-id> <username>")?;

    auth::initialize_jwt_secret(&config.auth.jwt_secret)?;
    let token = auth::generate_token(user_id, &username, config.auth.token_ttl_secs)?;
    println!("{token}");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Blog Service
///
/// Serves the blog's pages and forms over HTTP on `BLOG_SERVICE_PORT`
/// (default 8000), backed by PostgreSQL at `DATABASE_URL`.
///
/// `blog-service healthcheck` probes the local `/health` endpoint and exits
/// non-zero on failure, for container health checks. `blog-service
/// issue-token <user-id> <username>` prints a token for local testing.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to load configuration")?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("healthcheck") => return run_healthcheck(config.app.port).await,
        Some("issue-token") => return issue_token(&config, args),
        _ => {}
    }

    init_tracing();

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);
    tracing::debug!(?config, "configuration loaded");

    auth::initialize_jwt_secret(&config.auth.jwt_secret)
        .context("Failed to initialize JWT secret")?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let state = AppState::new(Arc::new(PgBlogRepository::new(pool)));
    let origins = config.allowed_origins();
    let bind_address = config.bind_address();

    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .disable_signals()
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping server");
        handle.stop(true).await;
    });

    server.await.context("HTTP server error")?;
    tracing::info!("blog-service stopped");
    Ok(())
}
