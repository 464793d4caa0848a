use axum::http::{
    Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use quickrent::core::{AppState, Config, db};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quickrent=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    config.print_info();

    let pool = db::connect_pool(
        &config.database_url,
        config.max_connections,
        config.connection_lifetime_secs,
    )
    .await?;
    db::run_migrations(&pool).await?;

    let state = Arc::new(AppState::from_config(pool, &config));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    let app = quickrent::create_router(state).layer(cors);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
