//! Runs episode runners in parallel and gathers their transitions.
mod base;
mod config;
mod outcome;
pub use base::ParallelCollector;
pub use config::ParallelCollectorConfig;
pub use outcome::{Collection, WorkerOutcome};
