use chrono::Duration;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use wisata_server::auth::encode_token;
use wisata_server::config::{Config, StoreKind};
use wisata_server::notify::{LogMailer, Mailer, WebhookMailer};
use wisata_server::routes::create_routes;
use wisata_server::state::AppState;
use wisata_server::store::{BookingStore, MemoryStore, PgStore, Seed};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wisata_server=debug")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let store: Arc<dyn BookingStore> = match config.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            let store = MemoryStore::new();
            if let Some(path) = &config.seed_file {
                let seed = Seed::from_path(path).await.expect("Failed to load seed file");
                for user in store.load_seed(seed).await {
                    let token = encode_token(&config.jwt_secret, user.id, Duration::hours(24))
                        .expect("Failed to sign token for seeded user");
                    tracing::info!(
                        user_id = %user.id,
                        username = %user.username,
                        is_admin = user.is_admin,
                        %token,
                        "Seeded user"
                    );
                }
            } else {
                tracing::warn!("SEED_FILE not set, the in-memory store starts empty");
            }
            Arc::new(store)
        }
        StoreKind::Postgres => {
            let store = PgStore::connect(&config.database_url, config.database_max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Successfully connected to database");

            store.migrate().await.expect("Failed to run migrations");
            tracing::info!("Migrations run successfully");
            if config.seed_file.is_some() {
                tracing::warn!("SEED_FILE is only used with STORE=memory, ignoring it");
            }
            Arc::new(store)
        }
    };

    let mailer: Arc<dyn Mailer> = match &config.mail_webhook_url {
        Some(url) => Arc::new(
            WebhookMailer::new(url.clone(), config.mail_from.clone())
                .expect("Failed to build mail client"),
        ),
        None => {
            tracing::info!("MAIL_WEBHOOK_URL not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let addr = config.bind_addr;
    let app = create_routes(AppState::new(config, store, mailer));

    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
