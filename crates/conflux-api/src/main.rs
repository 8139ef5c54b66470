use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use conflux_api::{config::Config, routes, state::AppState};
use conflux_llm::{InferenceClient, WorkersAiClient};
use conflux_retrieval::{HttpRetrievalClient, RetrievalClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Conflux API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize inference client
    tracing::info!("Initializing inference client for {}", config.llm.model);
    let mut workers = WorkersAiClient::new(
        config.llm.account_id.clone(),
        config.workers_ai_token.clone(),
    )?;
    if let Some(gateway_id) = &config.llm.gateway_id {
        tracing::info!("Routing inference through AI Gateway {}", gateway_id);
        workers = workers.with_gateway(gateway_id.clone());
    }
    let inference: Arc<dyn InferenceClient> = Arc::new(workers);

    // Initialize retrieval client when an endpoint is configured
    let retrieval: Option<Arc<dyn RetrievalClient>> = match &config.retrieval.endpoint {
        Some(endpoint) => {
            tracing::info!("Retrieval enabled against {}", endpoint);
            let client = match &config.retrieval_api_key {
                Some(api_key) => {
                    HttpRetrievalClient::with_api_key(endpoint.clone(), api_key.clone())?
                }
                None => HttpRetrievalClient::new(endpoint.clone())?,
            };
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("Retrieval not configured, augmentation disabled");
            None
        }
    };

    let assets = ServeDir::new(&config.server.assets_dir);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::new(config, inference, retrieval));

    // Build router
    let app = routes::build_router(state, assets);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
