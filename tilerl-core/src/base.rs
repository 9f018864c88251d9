//! Core types and traits.
mod action;
mod env;
mod model;
mod transition;
pub use action::Action;
pub use env::{Env, EnvGuard, Step};
pub use model::{FitSummary, Model};
pub use transition::Transition;

/// Observation of an environment, a flattened fixed-length vector.
pub type Obs = Vec<f32>;
