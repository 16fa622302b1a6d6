use axum::{extract::Request, ServiceExt};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_backend::{config::Config, create_app, store::TodoStore, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before logging, so RUST_LOG can come from .env as well.
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();


    let state = AppState {
        store: TodoStore::seeded(),
    };
    let app = create_app(state);
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server running on http://{addr}");
    info!("API available at http://{addr}/api/todos");
    info!("Health check at http://{addr}/health");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
