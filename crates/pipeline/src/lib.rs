//! Querygate orchestration: natural-language question in, validated bounded
//! read-only SQL out.
//!
//! - **Generation seam**: injected [`SqlGenerator`] and response parsing
//!   (`generator`).
//! - **Fallback catalog**: fixed templates when generation is unavailable
//!   (`fallback`).
//! - **Orchestrator**: generation, validation, cost, caching (`orchestrator`).
pub mod fallback;
pub mod generator;
pub mod orchestrator;

pub use fallback::{fallback_answer, FallbackAnswer};
pub use generator::{parse_generator_response, GeneratedSql, GenerationError, SqlGenerator};
pub use orchestrator::{QueryPipeline, ValidatedAnswer};
