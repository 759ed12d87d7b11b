use caseview_server::{AppState, Cli, Config, build_router};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("caseview=info".parse()?),
        )
        .init();
    info!("caseview v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from(Cli::parse());
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
