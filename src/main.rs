use minerush::{app, config::AppConfig, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("minerush=debug,axum=info,tower_http=info");

    let state = AppState::init(AppConfig::from_env()?).await?;
    app::serve(state).await
}
