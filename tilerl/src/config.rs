//! Configuration of a training run.
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tilerl_2048_env::{Game2048Config, N_CELLS};
use tilerl_candle_agent::QNetworkConfig;
use tilerl_core::{
    error::TilerlError, ExplorationConfig, ParallelCollectorConfig, ReplayBufferConfig,
    TrainerConfig,
};

/// Configuration of every component of a training run.
///
/// Missing sections in a YAML file take their default values.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct TrainConfig {
    /// The game.
    pub env: Game2048Config,

    /// The Q-network and its optimizer.
    pub model: QNetworkConfig,

    /// The replay buffer.
    pub replay_buffer: ReplayBufferConfig,

    /// Epsilon-greedy exploration.
    pub exploration: ExplorationConfig,

    /// Parallel workers.
    pub collector: ParallelCollectorConfig,

    /// The training loop.
    pub trainer: TrainerConfig,
}

impl TrainConfig {
    /// Checks the configuration as a whole before anything is built.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.model.q_config.in_dim() == N_CELLS,
            "in_dim of the model must be {} for a 2048 board, got {}",
            N_CELLS,
            self.model.q_config.in_dim()
        );
        self.replay_buffer.validate()?;
        self.exploration.validate()?;
        self.collector.validate()?;
        self.trainer.validate()?;

        // Training needs more transitions than a batch.
        if self.replay_buffer.capacity <= self.trainer.batch_size {
            return Err(TilerlError::InvalidConfig(format!(
                "replay buffer capacity ({}) must exceed batch_size ({})",
                self.replay_buffer.capacity, self.trainer.batch_size
            ))
            .into());
        }
        Ok(())
    }

    /// Constructs [`TrainConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TrainConfig;
    use anyhow::Result;
    use std::path::Path;
    use tempdir::TempDir;
    use tilerl_candle_agent::{mlp::MlpConfig, QNetworkConfig};
    use tilerl_core::{error::TilerlError, ReplayBufferConfig, TrainerConfig};

    #[test]
    fn test_bundled_config_matches_defaults() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/train_2048.yaml");
        let config = TrainConfig::load(path)?;
        let mut expected = TrainConfig::default();
        expected.trainer = expected.trainer.model_dir("model/2048").save_interval(100);
        assert_eq!(config, expected);
        config.validate()
    }

    #[test]
    fn test_partial_yaml_uses_defaults() -> Result<()> {
        let config: TrainConfig = serde_yaml::from_str("collector:\n  n_workers: 2\n  seed: 1\n")?;
        assert_eq!(config.collector.n_workers, 2);
        assert_eq!(config.trainer, TrainConfig::default().trainer);
        Ok(())
    }

    #[test]
    fn test_serde_train_config() -> Result<()> {
        let dir = TempDir::new("train_config")?;
        let path = dir.path().join("config.yaml");
        let config = TrainConfig::default();
        config.save(&path)?;
        assert_eq!(TrainConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_wrong_in_dim_is_rejected() {
        let config = TrainConfig {
            model: QNetworkConfig::default().q_config(MlpConfig::new(8, vec![16], 4)),
            ..TrainConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_capacity_not_above_batch_size_is_rejected() {
        for capacity in [32, 64] {
            let config = TrainConfig {
                replay_buffer: ReplayBufferConfig::default().capacity(capacity),
                trainer: TrainerConfig::default().batch_size(64),
                ..TrainConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(matches!(
                err.downcast_ref::<TilerlError>(),
                Some(TilerlError::InvalidConfig(_))
            ));
        }

        let config = TrainConfig {
            replay_buffer: ReplayBufferConfig::default().capacity(65),
            trainer: TrainerConfig::default().batch_size(64),
            ..TrainConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
