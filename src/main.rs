use movie_catalog::{app, config::AppConfig, error, seed, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "movie_catalog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    error::expose_internal_errors(config.is_development());

    let app_state = AppState::init(config).await?;

    // Demo data is best-effort; nothing here stops the server from starting.
    if app_state.config.seed.enabled {
        match seed::SeedConfig::from_settings(&app_state.config.seed) {
            Ok(seed_config) => {
                seed::run_once(app_state.movies.as_ref(), &seed_config).await;
            }
            Err(e) => tracing::warn!(error = %e, "movie seeding skipped"),
        }
    }

    let config = app_state.config.clone();
    let router = app::build_app(app_state);
    app::serve(router, &config).await
}
