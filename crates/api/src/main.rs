//! HTTP API for the AI blog generation backend.
//!
//! Wires configuration, the database, the configured LLM provider, and the
//! generation orchestrator into an axum server.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use anthropic_provider::AnthropicProvider;
use database::{persona, Database};
use gemini_provider::GeminiProvider;
use generation::{CircuitBreaker, GenerationSettings, Orchestrator};
use provider_core::Provider;
use tracing::info;

use crate::config::{Config, ProviderKind};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting blog API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    persona::ensure_default_personas(db.pool()).await?;

    // Build the configured provider
    let provider: Arc<dyn Provider> = match config.provider {
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_env()?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::from_env()?),
    };
    info!(provider = provider.name(), "LLM provider configured");

    // Build the orchestrator
    let settings = GenerationSettings::from_env();
    let breaker = Arc::new(CircuitBreaker::new(
        settings.circuit_failure_threshold,
        settings.circuit_cool_off,
    ));
    let orchestrator = Arc::new(Orchestrator::new(
        db.clone(),
        provider,
        breaker,
        settings,
    ));

    // Build application state and router
    let state = AppState::new(db, orchestrator);
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Blog API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
