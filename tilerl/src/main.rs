use anyhow::Result;
use candle_core::Device;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tilerl::{play, train, TrainConfig};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a Q-network with parallel workers
    Train {
        /// YAML configuration; defaults are used if not given
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides the directory the model is saved in
        #[arg(long)]
        model_dir: Option<String>,

        /// Overrides the number of rounds
        #[arg(long)]
        episodes: Option<usize>,
    },

    /// Play greedy episodes with a trained model
    Play {
        /// YAML configuration used for training
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory of the saved model, e.g. `model/2048/final`
        #[arg(long)]
        model_dir: PathBuf,

        /// Number of episodes
        #[arg(short, long, default_value_t = 1)]
        n_episodes: usize,

        /// Seed of the first episode
        #[arg(long, default_value_t = 0)]
        seed: i64,

        /// Maximum number of moves per episode
        #[arg(long)]
        max_steps: Option<usize>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<TrainConfig> {
    match path {
        Some(path) => TrainConfig::load(path),
        None => Ok(TrainConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let device = Device::cuda_if_available(0)?;

    match args.command {
        Command::Train {
            config,
            model_dir,
            episodes,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(model_dir) = model_dir {
                config.trainer = config.trainer.model_dir(model_dir);
            }
            if let Some(episodes) = episodes {
                config.trainer = config.trainer.episodes(episodes);
            }
            train(&config, device)?;
        }
        Command::Play {
            config,
            model_dir,
            n_episodes,
            seed,
            max_steps,
        } => {
            let config = load_config(config.as_ref())?;
            let results = play(&config, &model_dir, n_episodes, seed, max_steps, device)?;
            let best = results.iter().map(|r| r.score).max().unwrap_or(0);
            log::info!("Best score over {} episodes: {}", results.len(), best);
        }
    }

    Ok(())
}
