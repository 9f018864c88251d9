//! Train a Q-network on 2048 and play with it.
mod config;
use anyhow::{Context, Result};
use candle_core::Device;
use log::info;
use std::{fs, path::Path};
use tilerl_2048_env::Game2048;
use tilerl_candle_agent::QNetwork;
use tilerl_core::{
    greedy_action, record::LogRecorder, Env, EnvGuard, Model, ParallelCollector, ReplayBuffer,
    TrainStats, Trainer, TrainingState,
};
pub use config::TrainConfig;

/// Result of a greedy episode played by [`play`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayResult {
    /// Final score.
    pub score: u32,

    /// Largest tile at the end of the episode.
    pub max_tile: u32,

    /// Number of moves.
    pub steps: usize,
}

/// Trains a Q-network from scratch.
///
/// If a model directory is configured, the configuration is saved there as
/// `config.yaml` before the first round.
pub fn train(config: &TrainConfig, device: Device) -> Result<TrainStats> {
    config.validate()?;

    if let Some(model_dir) = &config.trainer.model_dir {
        fs::create_dir_all(model_dir)?;
        config.save(Path::new(model_dir).join("config.yaml"))?;
    }

    let mut model = QNetwork::build(config.model.clone(), device)?;
    let collector = ParallelCollector::<Game2048>::build(&config.collector, config.env.clone())?;
    let mut buffer = ReplayBuffer::build(&config.replay_buffer)?;
    let mut state = TrainingState::new(&config.exploration)?;
    let mut trainer = Trainer::build(config.trainer.clone())?;
    let mut recorder = LogRecorder::new();

    trainer.train(&mut model, &collector, &mut buffer, &mut state, &mut recorder)
}

/// Plays greedy episodes with a trained model.
///
/// `model_dir` is a directory written by [`Model::save`]. Episodes use seeds
/// `seed`, `seed + 1`, ... and stop early after `max_steps` moves if given.
pub fn play(
    config: &TrainConfig,
    model_dir: &Path,
    n_episodes: usize,
    seed: i64,
    max_steps: Option<usize>,
    device: Device,
) -> Result<Vec<PlayResult>> {
    let mut model = QNetwork::build(config.model.clone(), device)?;
    model
        .load(model_dir)
        .with_context(|| format!("Failed to load the model from {:?}", model_dir))?;

    (0..n_episodes)
        .map(|i| play_episode(&model, config, seed + i as i64, max_steps))
        .collect()
}

fn play_episode(
    model: &QNetwork,
    config: &TrainConfig,
    seed: i64,
    max_steps: Option<usize>,
) -> Result<PlayResult> {
    let mut env = EnvGuard::new(Game2048::build(&config.env, seed)?);
    let mut obs = env.reset()?;
    let mut steps = 0;

    while max_steps.map_or(true, |n| steps < n) {
        info!("Current board:\n{}", env.board());
        let scores = model.predict_one(&obs)?;
        let action = greedy_action(&scores)?;
        info!("Best move: {} (scores = {:?})", action, scores);

        let step = env.step(action)?;
        steps += 1;
        obs = step.obs;
        if step.is_done {
            break;
        }
    }

    let result = PlayResult {
        score: env.score(),
        max_tile: env.board().max_tile(),
        steps,
    };
    env.close()?;
    info!(
        "Game {} over: score = {}, max tile = {}, moves = {}",
        seed, result.score, result.max_tile, result.steps
    );
    Ok(result)
}
