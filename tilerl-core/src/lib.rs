#![warn(missing_docs)]
//! Experience collection and Q-learning training loop.
//!
//! The crate is organized around two external collaborators, an environment
//! implementing [`Env`] and an action-value model implementing [`Model`].
//! Everything else is the loop that connects them:
//!
//! * [`ReplayBuffer`] stores [`Transition`]s with FIFO eviction.
//! * [`select_action`] is the epsilon-greedy policy over model outputs.
//! * [`EpisodeRunner`] plays one episode on one environment.
//! * [`ParallelCollector`] runs a fixed set of episode runners per round.
//! * [`Trainer`] drives rounds: collect, train on a sampled batch, decay
//!   exploration.
pub mod error;
pub mod record;

mod base;
pub use base::{Action, Env, EnvGuard, FitSummary, Model, Obs, Step, Transition};

mod replay_buffer;
pub use replay_buffer::{ReplayBuffer, ReplayBufferConfig, TransitionBatch};

mod policy;
pub use policy::{greedy_action, select_action, ExplorationConfig, TrainingState};

mod runner;
pub use runner::{Episode, EpisodeError, EpisodeRunner};

mod collector;
pub use collector::{Collection, ParallelCollector, ParallelCollectorConfig, WorkerOutcome};

mod trainer;
pub use trainer::{compute_targets, TrainStats, Trainer, TrainerConfig, TrainerPhase};

#[cfg(test)]
pub(crate) mod test_utils;
