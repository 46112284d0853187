//! Blog generation orchestration core.
//!
//! Turns a `(topic, persona, speed, context)` request into a persisted,
//! parsed blog post: prompt construction, provider calls with retry and
//! circuit breaking, lenient response parsing, and job-state tracking.

pub mod circuit;
pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod retry;
pub mod settings;
pub mod worker;

pub use circuit::CircuitBreaker;
pub use error::{GenerationError, Result};
pub use orchestrator::Orchestrator;
pub use parser::{ContentStructure, ParsedResponse, Source};
pub use prompts::Speed;
pub use settings::GenerationSettings;
