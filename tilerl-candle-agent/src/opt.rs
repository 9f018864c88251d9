//! Optimizers of the Q-network.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer.
///
/// Moment decay rates and epsilon take the defaults of the underlying
/// optimizers; only the step size and weight decay are exposed.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam without weight decay.
    Adam {
        /// Learning rate.
        lr: f64,
    },

    /// Adam with decoupled weight decay.
    AdamW {
        /// Learning rate.
        lr: f64,

        /// Weight decay coefficient.
        #[serde(default = "default_weight_decay")]
        weight_decay: f64,
    },
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 0.001 }
    }
}

impl OptimizerConfig {
    /// Returns the learning rate.
    pub fn lr(&self) -> f64 {
        match self {
            Self::Adam { lr } | Self::AdamW { lr, .. } => *lr,
        }
    }

    /// Overrides the learning rate, keeping the kind of optimizer.
    pub fn with_lr(self, lr: f64) -> Self {
        match self {
            Self::Adam { .. } => Self::Adam { lr },
            Self::AdamW { weight_decay, .. } => Self::AdamW { lr, weight_decay },
        }
    }

    /// Constructs the optimizer over the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        let opt = match *self {
            Self::Adam { lr } => {
                let params = ParamsAdam {
                    lr,
                    ..ParamsAdam::default()
                };
                Optimizer::Adam(Adam::new(vars, params)?)
            }
            Self::AdamW { lr, weight_decay } => {
                let params = ParamsAdamW {
                    lr,
                    weight_decay,
                    ..ParamsAdamW::default()
                };
                Optimizer::AdamW(AdamW::new(vars, params)?)
            }
        };
        Ok(opt)
    }
}

/// An optimizer built from [`OptimizerConfig`].
pub enum Optimizer {
    /// See [`OptimizerConfig::Adam`].
    Adam(Adam),

    /// See [`OptimizerConfig::AdamW`].
    AdamW(AdamW),
}

impl Optimizer {
    /// Computes gradients of `loss` and updates the variables once.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::Adam(opt) => opt.backward_step(loss)?,
            Self::AdamW(opt) => opt.backward_step(loss)?,
        }
        Ok(())
    }

    /// Current learning rate.
    pub fn learning_rate(&self) -> f64 {
        match self {
            Self::Adam(opt) => opt.learning_rate(),
            Self::AdamW(opt) => opt.learning_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OptimizerConfig;
    use anyhow::Result;
    use candle_core::{DType, Device, Var};

    #[test]
    fn test_with_lr_keeps_kind() {
        let config = OptimizerConfig::default().with_lr(0.01);
        assert_eq!(config, OptimizerConfig::Adam { lr: 0.01 });

        let config = OptimizerConfig::AdamW {
            lr: 0.1,
            weight_decay: 0.5,
        }
        .with_lr(0.2);
        assert_eq!(
            config,
            OptimizerConfig::AdamW {
                lr: 0.2,
                weight_decay: 0.5
            }
        );
        assert_eq!(config.lr(), 0.2);
    }

    #[test]
    fn test_weight_decay_default_from_yaml() -> Result<()> {
        let config: OptimizerConfig = serde_yaml::from_str("AdamW:\n  lr: 0.002\n")?;
        assert_eq!(
            config,
            OptimizerConfig::AdamW {
                lr: 0.002,
                weight_decay: 0.01
            }
        );
        Ok(())
    }

    #[test]
    fn test_build_sets_learning_rate() -> Result<()> {
        let var = Var::zeros(3, DType::F32, &Device::Cpu)?;
        for config in [
            OptimizerConfig::Adam { lr: 0.003 },
            OptimizerConfig::AdamW {
                lr: 0.003,
                weight_decay: 0.0,
            },
        ] {
            let opt = config.build(vec![var.clone()])?;
            assert!((opt.learning_rate() - 0.003).abs() < 1e-12);
        }
        Ok(())
    }
}
