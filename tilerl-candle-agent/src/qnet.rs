use crate::{
    mlp::{Mlp, MlpConfig},
    opt::{Optimizer, OptimizerConfig},
};
use anyhow::{ensure, Result};
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::Path,
};
use tilerl_core::{Action, FitSummary, Model, Obs};

const PARAMS_FILE: &str = "qnet.safetensors";

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`QNetwork`].
pub struct QNetworkConfig {
    /// Configuration of the MLP mapping an observation to action values.
    pub q_config: MlpConfig,

    /// Configuration of the optimizer.
    pub opt_config: OptimizerConfig,
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self {
            q_config: MlpConfig::new(16, vec![128, 64], Action::COUNT),
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl QNetworkConfig {
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: MlpConfig) -> Self {
        self.q_config = v;
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`QNetworkConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QNetworkConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// An MLP action-value function trained with the mean squared error.
///
/// Parameters are stored in `qnet.safetensors` inside the directory given
/// to [`Model::save`] and [`Model::load`].
pub struct QNetwork {
    device: Device,
    varmap: VarMap,
    in_dim: usize,
    out_dim: usize,
    q: Mlp,
    opt: Optimizer,
}

impl QNetwork {
    /// Constructs [`QNetwork`] with randomly initialized parameters.
    pub fn build(config: QNetworkConfig, device: Device) -> Result<Self> {
        let q_config = config.q_config;
        ensure!(
            q_config.out_dim() == Action::COUNT,
            "out_dim of the Q-network must be {}, got {}",
            Action::COUNT,
            q_config.out_dim()
        );

        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Mlp::build(vb.pp("qnet"), &q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;
        info!(
            "Q-network {:?}, learning rate = {}",
            q_config.units(),
            opt.learning_rate()
        );

        Ok(Self {
            device,
            varmap,
            in_dim: q_config.in_dim(),
            out_dim: q_config.out_dim(),
            q,
            opt,
        })
    }

    fn to_tensor(&self, rows: &[Vec<f32>], dim: usize) -> Result<Tensor> {
        if let Some(row) = rows.iter().find(|row| row.len() != dim) {
            anyhow::bail!("Expected rows of length {}, got {}", dim, row.len());
        }
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        Ok(Tensor::from_vec(data, (rows.len(), dim), &self.device)?)
    }
}

impl Model for QNetwork {
    fn predict(&self, states: &[Obs]) -> Result<Vec<Vec<f32>>> {
        if states.is_empty() {
            return Ok(vec![]);
        }
        let xs = self.to_tensor(states, self.in_dim)?;
        let qs = self.q.forward(&xs)?.detach();
        Ok(qs.to_vec2::<f32>()?)
    }

    fn fit(&mut self, states: &[Obs], targets: &[Vec<f32>]) -> Result<FitSummary> {
        ensure!(
            !states.is_empty() && states.len() == targets.len(),
            "fit needs equal, non-zero numbers of states and targets, got {} and {}",
            states.len(),
            targets.len()
        );
        let xs = self.to_tensor(states, self.in_dim)?;
        let ys = self.to_tensor(targets, self.out_dim)?;

        let preds = self.q.forward(&xs)?;
        let loss = mse(&preds, &ys)?;
        self.opt.backward_step(&loss)?;

        Ok(FitSummary {
            loss: loss.to_scalar::<f32>()?,
        })
    }

    fn save(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        let path = path.join(PARAMS_FILE);
        self.varmap.save(&path)?;
        info!("Save Q-network to {:?}", path);
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let path = path.join(PARAMS_FILE);
        self.varmap.load(&path)?;
        info!("Load Q-network from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{QNetwork, QNetworkConfig};
    use crate::{mlp::MlpConfig, opt::OptimizerConfig};
    use anyhow::Result;
    use candle_core::Device;
    use tempdir::TempDir;
    use tilerl_core::Model;

    fn qnet() -> Result<QNetwork> {
        let config = QNetworkConfig::default()
            .q_config(MlpConfig::new(3, vec![16], 4))
            .opt_config(OptimizerConfig::default().with_lr(0.01));
        QNetwork::build(config, Device::Cpu)
    }

    #[test]
    fn test_predict_shape() -> Result<()> {
        let qnet = qnet()?;
        let qs = qnet.predict(&[vec![0., 1., 2.], vec![3., 4., 5.]])?;
        assert_eq!(qs.len(), 2);
        assert!(qs.iter().all(|q| q.len() == 4));
        let q0 = qnet.predict_one(&[0., 1., 2.])?;
        assert!(q0.iter().zip(qs[0].iter()).all(|(a, b)| (a - b).abs() < 1e-5));
        assert!(qnet.predict(&[])?.is_empty());
        assert!(qnet.predict(&[vec![0.; 2]]).is_err());
        Ok(())
    }

    #[test]
    fn test_fit_reduces_loss() -> Result<()> {
        let mut qnet = qnet()?;
        let states = vec![vec![1., 0., 0.], vec![0., 1., 0.], vec![0., 0., 1.]];
        let targets = vec![vec![1., 0., 0., 0.], vec![0., 1., 0., 0.], vec![0., 0., 1., 1.]];

        let first = qnet.fit(&states, &targets)?.loss;
        let mut last = first;
        for _ in 0..200 {
            last = qnet.fit(&states, &targets)?.loss;
        }
        assert!(last < first, "loss {} -> {}", first, last);
        assert!(qnet.fit(&states, &targets[..2]).is_err());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("qnet")?;
        let path = dir.path().join("model");
        let obs = vec![vec![0.5, -1., 2.]];

        let qnet = qnet()?;
        qnet.save(&path)?;
        assert!(path.join("qnet.safetensors").exists());

        let mut qnet_ = self::qnet()?;
        qnet_.load(&path)?;
        assert_eq!(qnet.predict(&obs)?, qnet_.predict(&obs)?);
        Ok(())
    }

    #[test]
    fn test_wrong_out_dim_is_rejected() {
        let config = QNetworkConfig::default().q_config(MlpConfig::new(16, vec![8], 3));
        assert!(QNetwork::build(config, Device::Cpu).is_err());
    }

    #[test]
    fn test_serde_config() -> Result<()> {
        let dir = TempDir::new("qnet_config")?;
        let path = dir.path().join("qnet.yaml");
        let config = QNetworkConfig::default();
        config.save(&path)?;
        assert_eq!(QNetworkConfig::load(&path)?, config);
        Ok(())
    }
}
