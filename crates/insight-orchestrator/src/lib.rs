pub mod alerts;
pub mod config;
pub mod confidence;
pub mod events;
pub mod fallback;
pub mod orchestrator;
pub mod parser;
pub mod prompts;

pub use config::OrchestratorConfig;
pub use confidence::adjust_confidence;
pub use orchestrator::{CycleOutcome, CycleStats, Orchestrator};
pub use prompts::TEMPLATE_VERSION;
