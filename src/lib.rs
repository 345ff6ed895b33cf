// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod collaborator;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod sentiment;
pub mod summary;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::collaborator::{Classifier, Fetcher};
pub use crate::config::HarnessConfig;
pub use crate::error::CollaboratorError;
pub use crate::summary::{success_rate, Summary, TestCaseOutcome};
