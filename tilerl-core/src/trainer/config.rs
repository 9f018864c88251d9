//! Configuration of [`Trainer`](super::Trainer).
use crate::error::TilerlError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of rounds.
    pub episodes: usize,

    /// The number of transitions sampled for each model update.
    pub batch_size: usize,

    /// Discount factor of bootstrapped targets.
    pub gamma: f32,

    /// Where to save the model parameters.
    pub model_dir: Option<String>,

    /// Interval of saving model parameters in rounds.
    ///
    /// If `None`, only the final model is saved.
    pub save_interval: Option<usize>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            batch_size: 64,
            gamma: 0.99,
            model_dir: None,
            save_interval: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of rounds.
    pub fn episodes(mut self, v: usize) -> Self {
        self.episodes = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the directory the model is saved in.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Sets the interval of saving in rounds.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = Some(v);
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), TilerlError> {
        if self.batch_size == 0 {
            return Err(TilerlError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(TilerlError::InvalidConfig(format!(
                "gamma ({}) must be in (0, 1)",
                self.gamma
            )));
        }
        if self.save_interval == Some(0) {
            return Err(TilerlError::InvalidConfig(
                "save_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .episodes(10)
            .batch_size(32)
            .gamma(0.9)
            .model_dir("some/directory")
            .save_interval(5);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_invalid_trainer_config() {
        assert!(TrainerConfig::default().batch_size(0).validate().is_err());
        assert!(TrainerConfig::default().gamma(1.0).validate().is_err());
        assert!(TrainerConfig::default().gamma(0.0).validate().is_err());
        assert!(TrainerConfig::default().save_interval(0).validate().is_err());
        assert!(TrainerConfig::default().validate().is_ok());
    }
}
