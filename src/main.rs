use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tripai::ai::{AiPlanner, QwenClient};
use tripai::api::AppState;
use tripai::auth::{Principal, StaticTokenResolver};
use tripai::config::TripAiConfig;
use tripai::plans::PlanService;
use tripai::storage::MemoryStore;
use tripai::web;

#[tokio::main]
async fn main() -> Result<()> {
    let config = TripAiConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    tracing::info!("Starting TripAI backend v{}", tripai::VERSION);
    if config.ai.api_key.is_none() {
        tracing::warn!("No AI API key configured, all itineraries will use the fallback template");
    }

    // Explicit constructor wiring, no ambient registry
    let generator = Arc::new(QwenClient::new(config.ai.clone())?);
    let planner = Arc::new(AiPlanner::new(generator, config.defaults.clone()));

    let store = Arc::new(MemoryStore::new());
    let plans = Arc::new(PlanService::new(store.clone(), store, planner.clone()));

    // Development resolver: a single token from the environment.
    // Real deployments plug an identity provider into the same trait.
    let mut auth = StaticTokenResolver::new();
    if let Ok(token) = std::env::var("TRIPAI_DEV_TOKEN") {
        auth = auth.with_token(
            token,
            Principal {
                user_id: 1,
                username: "dev".to_string(),
            },
        );
    }

    let state = AppState {
        planner,
        plans,
        auth: Arc::new(auth),
    };

    web::run(state, config.server.port).await
}
