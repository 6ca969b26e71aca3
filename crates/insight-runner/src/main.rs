use anyhow::Result;
use insight_orchestrator::{CycleOutcome, Orchestrator, OrchestratorConfig};
use llm_client::{AnthropicBackend, BackendConfig, GenerativeBackend};
use market_data::{LiveQuoteProvider, MarketDataConfig, QuoteProvider, StaticQuoteProvider};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct CycleReport {
    outcome: String,
    snapshot: serde_json::Value,
    news: serde_json::Value,
    events: serde_json::Value,
    insights: serde_json::Value,
    alerts: serde_json::Value,
}

fn quote_provider(config: &MarketDataConfig) -> Result<Arc<dyn QuoteProvider>> {
    let mode = std::env::var("QUOTE_PROVIDER").unwrap_or_else(|_| "live".to_string());
    Ok(match mode.as_str() {
        "static" => Arc::new(StaticQuoteProvider::new()),
        _ => Arc::new(LiveQuoteProvider::new(config)?),
    })
}

fn generative_backend() -> Result<Option<Arc<dyn GenerativeBackend>>> {
    match BackendConfig::from_env() {
        Some(config) => {
            info!(model = %config.model, "generative backend configured");
            Ok(Some(Arc::new(AnthropicBackend::new(config)?)))
        }
        None => {
            info!("no generative backend configured, fallback synthesis only");
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let market_config = MarketDataConfig::default();
    let provider = quote_provider(&market_config)?;
    let backend = generative_backend()?;

    let orchestrator = Orchestrator::new(provider, backend, OrchestratorConfig::default())?
        .with_market_config(market_config);

    let outcome = orchestrator.run_cycle().await;
    let outcome_label = match &outcome {
        CycleOutcome::Completed(_) => "completed",
        CycleOutcome::SkippedOverlap => "skipped",
        CycleOutcome::Aborted(_) => "aborted",
    };

    let report = CycleReport {
        outcome: outcome_label.to_string(),
        snapshot: json!(orchestrator.market_snapshot().await),
        news: json!(orchestrator.list_news(30).await),
        events: json!(orchestrator.list_events(Some(10)).await),
        insights: json!(orchestrator.list_insights(Some(1)).await),
        alerts: json!(orchestrator.list_alerts(Some(10)).await),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
