use crate::error::TilerlError;
use serde::{Deserialize, Serialize};

/// Configuration of [`ParallelCollector`](super::ParallelCollector).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParallelCollectorConfig {
    /// Number of workers, each playing one episode per round.
    ///
    /// The default value is 8.
    pub n_workers: usize,

    /// Base seed of environments and action sampling in workers.
    pub seed: u64,
}

impl Default for ParallelCollectorConfig {
    fn default() -> Self {
        Self {
            n_workers: 8,
            seed: 42,
        }
    }
}

impl ParallelCollectorConfig {
    /// Sets the number of workers.
    pub fn n_workers(mut self, v: usize) -> Self {
        self.n_workers = v;
        self
    }

    /// Sets the base seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), TilerlError> {
        if self.n_workers == 0 {
            return Err(TilerlError::InvalidConfig(
                "n_workers must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
