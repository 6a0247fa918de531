//! Student records server.
//!
//! Run from repo root: `cargo run -p student-server`
//! Set `STORAGE_BACKEND=memory` to run without PostgreSQL.

use std::sync::Arc;
use student_records::{
    app, apply_migrations, connect_pool, ensure_database_exists, load_from_env, AppState, InMemoryStudentRepository,
    PgStudentRepository, StorageBackend, StudentRepository,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("student_records=info,tower_http=info")),
        )
        .init();

    let repo: Arc<dyn StudentRepository> = match config.storage {
        StorageBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = connect_pool(&config).await?;
            apply_migrations(&pool, &config.schema).await?;
            Arc::new(PgStudentRepository::new(pool, config.schema.clone()))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on exit");
            Arc::new(InMemoryStudentRepository::new())
        }
    };

    let state = AppState::new(repo).with_max_page_size(config.max_page_size);
    let router = app(state, config.max_body_bytes);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
