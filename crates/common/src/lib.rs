//! Common utilities, types, and configuration shared across Querygate crates.
//!
//! - **Configuration**: Strongly typed application configuration (`config`).
//! - **Telemetry**: Tracing/observability setup (`telemetry`).
//! - **Models**: Request and answer types shared between pipeline and callers (`models`).
pub mod config;
pub mod models;
pub mod telemetry;
