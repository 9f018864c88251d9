use anyhow::Result;
use candle_core::Device;
use tempdir::TempDir;
use test_log::test;
use tilerl::{play, train, TrainConfig};
use tilerl_2048_env::{Game2048Config, ObsEncoding, RewardMode};
use tilerl_candle_agent::{mlp::MlpConfig, QNetworkConfig};
use tilerl_core::{ParallelCollectorConfig, ReplayBufferConfig, TrainerConfig};

fn config(model_dir: &str) -> TrainConfig {
    TrainConfig {
        env: Game2048Config::default()
            .stall_limit(5)
            .reward_mode(RewardMode::ScoreDelta)
            .obs_encoding(ObsEncoding::Log2),
        model: QNetworkConfig::default().q_config(MlpConfig::new(16, vec![32], 4)),
        collector: ParallelCollectorConfig::default().n_workers(2).seed(0),
        trainer: TrainerConfig::default()
            .episodes(3)
            .batch_size(16)
            .model_dir(model_dir)
            .save_interval(2),
        ..TrainConfig::default()
    }
}

#[test]
fn test_train_and_play_2048() -> Result<()> {
    let tmp_dir = TempDir::new("train_2048")?;
    let model_dir = match tmp_dir.as_ref().to_str() {
        Some(s) => s,
        None => panic!("Failed to get string of temporary directory"),
    };
    let config = config(model_dir);

    let stats = train(&config, Device::Cpu)?;
    assert_eq!(stats.rounds, 3);
    assert_eq!(stats.failed_workers, 0);
    assert!(stats.transitions > 0);
    assert!(stats.trained_rounds >= 1);
    assert!(stats.final_epsilon < 1.0);

    let dir = tmp_dir.path();
    assert!(dir.join("config.yaml").exists());
    assert!(dir.join("2").join("qnet.safetensors").exists());
    assert!(dir.join("final").join("qnet.safetensors").exists());
    assert_eq!(TrainConfig::load(dir.join("config.yaml"))?, config);

    let results = play(&config, &dir.join("final"), 2, 0, Some(50), Device::Cpu)?;
    assert_eq!(results.len(), 2);
    for result in results.iter() {
        assert!(result.steps >= 1 && result.steps <= 50);
        assert!(result.max_tile >= 2);
    }
    Ok(())
}

#[test]
fn test_train_rejects_buffer_not_larger_than_batch() -> Result<()> {
    let tmp_dir = TempDir::new("train_2048_small_buffer")?;
    let model_dir = match tmp_dir.as_ref().to_str() {
        Some(s) => s,
        None => panic!("Failed to get string of temporary directory"),
    };
    let config = TrainConfig {
        replay_buffer: ReplayBufferConfig::default().capacity(16),
        ..config(model_dir)
    };

    assert!(train(&config, Device::Cpu).is_err());
    assert!(!tmp_dir.path().join("config.yaml").exists());
    assert!(!tmp_dir.path().join("final").exists());
    Ok(())
}
