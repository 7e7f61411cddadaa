use std::net::SocketAddr;
use std::sync::Arc;

use beatstore_cloud::media::{CloudinaryStorage, MediaStorage, NoopMediaStorage};
use beatstore_cloud::payments::{DisabledGateway, PaymentGateway, StripeClient};
use beatstore_db::store::{MemoryStore, PgStore, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beatstore_api::bootstrap::ensure_admin_account;
use beatstore_api::config::ServerConfig;
use beatstore_api::error::expose_internal_detail;
use beatstore_api::router::build_app_router;
use beatstore_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = ?config.environment,
        "Loaded server configuration"
    );
    expose_internal_detail(config.environment.is_development());

    // --- Storage ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let store = connect_store(&database_url).await;

    // --- Admin bootstrap ---
    ensure_admin_account(store.as_ref(), &config.admin)
        .await
        .expect("Failed to reconcile the administrator account");
    if config.admin.password_login {
        tracing::warn!("ADMIN_PASSWORD_LOGIN is enabled; the admin fallback password is accepted at login");
    }

    // --- External services ---
    let payments: Arc<dyn PaymentGateway> = match &config.stripe {
        Some(stripe) => {
            tracing::info!(api_base = %stripe.api_base, "Stripe checkout enabled");
            Arc::new(StripeClient::new(stripe.clone()))
        }
        None => {
            tracing::warn!("STRIPE_SECRET_KEY not set, checkout is disabled");
            Arc::new(DisabledGateway)
        }
    };

    let media: Arc<dyn MediaStorage> = match &config.cloudinary {
        Some(cloudinary) => {
            tracing::info!(cloud_name = %cloudinary.cloud_name, "Cloudinary media cleanup enabled");
            Arc::new(CloudinaryStorage::new(cloudinary.clone()))
        }
        None => {
            tracing::info!("Cloudinary not configured, media assets are never deleted");
            Arc::new(NoopMediaStorage)
        }
    };

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        payments,
        media,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Human-readable logs by default, one JSON object per line with
/// `LOG_FORMAT=json`. Filtered by `RUST_LOG`.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (json_layer, text_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beatstore_api=debug,tower_http=debug".into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Postgres (pool, health check, migrations) or, for `memory://`, a
/// process-local store.
async fn connect_store(database_url: &str) -> Arc<dyn Store> {
    if beatstore_db::is_memory_url(database_url) {
        tracing::warn!("Using the in-memory store; data is lost on shutdown");
        return Arc::new(MemoryStore::new());
    }

    let pool = beatstore_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");

    beatstore_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    beatstore_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    Arc::new(PgStore::new(pool))
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix) to start graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
