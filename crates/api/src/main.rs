use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripdesk_api::{build_router, state::AppState};
use tripdesk_config::Settings;
use tripdesk_db::{connect, indexes::ensure_indexes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "tripdesk_api=debug,tripdesk_services=debug,tripdesk_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    info!(
        "Starting Tripdesk API on {}:{}",
        settings.app.host, settings.app.port
    );

    let db = connect(&settings).await?;
    ensure_indexes(&db).await?;

    let app_state = AppState::new(db, settings.clone());
    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
