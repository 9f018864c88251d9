//! Epsilon-greedy action selection and exploration state.
mod epsilon_greedy;
mod state;
pub use epsilon_greedy::{greedy_action, select_action};
pub use state::{ExplorationConfig, TrainingState};
