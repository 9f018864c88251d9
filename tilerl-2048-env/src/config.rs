//! Configuration of [`Game2048`](super::Game2048).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Reward returned by each step.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum RewardMode {
    /// The game score accumulated since reset.
    Score,

    /// Points gained by merges in the step.
    ScoreDelta,
}

/// Encoding of tiles in observations.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ObsEncoding {
    /// Tile values as they are, 0 for empty cells.
    Raw,

    /// `log2` of tile values, 0 for empty cells.
    Log2,
}

impl ObsEncoding {
    pub(crate) fn encode(&self, tile: u32) -> f32 {
        match self {
            Self::Raw => tile as f32,
            Self::Log2 if tile == 0 => 0.0,
            Self::Log2 => (tile as f32).log2(),
        }
    }
}

/// Configuration of [`Game2048`](super::Game2048).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Game2048Config {
    /// Number of consecutive steps without a board change that ends an episode.
    ///
    /// The default value is 5.
    pub stall_limit: usize,

    /// Reward of each step.
    pub reward_mode: RewardMode,

    /// Encoding of observations.
    pub obs_encoding: ObsEncoding,
}

impl Default for Game2048Config {
    fn default() -> Self {
        Self {
            stall_limit: 5,
            reward_mode: RewardMode::Score,
            obs_encoding: ObsEncoding::Raw,
        }
    }
}

impl Game2048Config {
    /// Sets the stall limit.
    pub fn stall_limit(mut self, v: usize) -> Self {
        self.stall_limit = v;
        self
    }

    /// Sets the reward mode.
    pub fn reward_mode(mut self, v: RewardMode) -> Self {
        self.reward_mode = v;
        self
    }

    /// Sets the observation encoding.
    pub fn obs_encoding(mut self, v: ObsEncoding) -> Self {
        self.obs_encoding = v;
        self
    }

    /// Constructs [`Game2048Config`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`Game2048Config`].
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
    fn test_log2_encoding() {
        assert_eq!(ObsEncoding::Log2.encode(0), 0.0);
        assert_eq!(ObsEncoding::Log2.encode(2), 1.0);
        assert_eq!(ObsEncoding::Log2.encode(2048), 11.0);
        assert_eq!(ObsEncoding::Raw.encode(2048), 2048.0);
    }

    #[test]
    fn test_default_config() {
        let config = Game2048Config::default();
        assert_eq!(config.stall_limit, 5);
        assert_eq!(config.reward_mode, RewardMode::Score);
        assert_eq!(config.obs_encoding, ObsEncoding::Raw);
    }

    #[test]
    fn test_serde_config() -> Result<()> {
        let config = Game2048Config::default()
            .stall_limit(3)
            .reward_mode(RewardMode::ScoreDelta)
            .obs_encoding(ObsEncoding::Log2);
        let dir = TempDir::new("game2048_config")?;
        let path = dir.path().join("game2048.yaml");
        config.save(&path)?;
        assert_eq!(Game2048Config::load(&path)?, config);
        Ok(())
    }
}
