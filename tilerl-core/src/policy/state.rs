use crate::error::TilerlError;
use serde::{Deserialize, Serialize};

/// Configuration of epsilon-greedy exploration.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ExplorationConfig {
    /// Initial epsilon.
    pub epsilon: f64,

    /// Multiplicative decay applied once per round.
    pub epsilon_decay: f64,

    /// Lower bound of epsilon.
    pub epsilon_min: f64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            epsilon_decay: 0.995,
            epsilon_min: 0.01,
        }
    }
}

impl ExplorationConfig {
    /// Sets the initial epsilon.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Sets the decay factor.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
        self
    }

    /// Sets the lower bound of epsilon.
    pub fn epsilon_min(mut self, v: f64) -> Self {
        self.epsilon_min = v;
        self
    }

    /// Checks `0 <= epsilon_min <= epsilon <= 1` and `0 < epsilon_decay <= 1`.
    pub fn validate(&self) -> Result<(), TilerlError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.epsilon) || !in_unit(self.epsilon_min) {
            return Err(TilerlError::InvalidConfig(format!(
                "epsilon ({}) and epsilon_min ({}) must be in [0, 1]",
                self.epsilon, self.epsilon_min
            )));
        }
        if self.epsilon_min > self.epsilon {
            return Err(TilerlError::InvalidConfig(format!(
                "epsilon_min ({}) exceeds epsilon ({})",
                self.epsilon_min, self.epsilon
            )));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(TilerlError::InvalidConfig(format!(
                "epsilon_decay ({}) must be in (0, 1]",
                self.epsilon_decay
            )));
        }
        Ok(())
    }
}

/// Exploration state of a training run.
///
/// Passed explicitly to the collector and trainer; read by the policy and
/// mutated only by [`TrainingState::decay`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingState {
    epsilon: f64,
    epsilon_decay: f64,
    epsilon_min: f64,
    round: usize,
}

impl TrainingState {
    /// Creates the state of round 0.
    pub fn new(config: &ExplorationConfig) -> Result<Self, TilerlError> {
        config.validate()?;
        Ok(Self {
            epsilon: config.epsilon,
            epsilon_decay: config.epsilon_decay,
            epsilon_min: config.epsilon_min,
            round: 0,
        })
    }

    /// Current epsilon.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Index of the current round.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Applies `epsilon = max(epsilon_min, epsilon * epsilon_decay)` and
    /// returns the new value.
    pub fn decay(&mut self) -> f64 {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        self.epsilon
    }

    /// Moves to the next round.
    pub fn next_round(&mut self) {
        self.round += 1;
    }
}
