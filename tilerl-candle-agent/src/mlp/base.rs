use super::MlpConfig;
use anyhow::Result;
use candle_core::{Module, Tensor};
use candle_nn::{linear, Linear, VarBuilder};

/// Multilayer perceptron with ReLU activation function.
///
/// The output layer is linear.
pub struct Mlp {
    layers: Vec<Linear>,
}

impl Mlp {
    /// Builds the layers under the `mlp` prefix of `vs`.
    pub fn build(vs: VarBuilder, config: &MlpConfig) -> Result<Self> {
        let vs = vs.pp("mlp");
        let layers = config
            .dims()
            .windows(2)
            .enumerate()
            .map(|(i, w)| linear(w[0], w[1], vs.pp(format!("ln{}", i))))
            .collect::<candle_core::Result<Vec<_>>>()?;
        Ok(Self { layers })
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let n_layers = self.layers.len();
        let mut xs = xs.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            xs = layer.forward(&xs)?;
            if i + 1 < n_layers {
                xs = xs.relu()?;
            }
        }
        Ok(xs)
    }
}

#[cfg(test)]
mod tests {
    use super::{Mlp, MlpConfig};
    use anyhow::Result;
    use candle_core::{DType, Device, Module, Tensor};
    use candle_nn::{VarBuilder, VarMap};

    #[test]
    fn test_output_shape_and_params() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let mlp = Mlp::build(vb, &MlpConfig::new(16, vec![128, 64], 4))?;

        let xs = Tensor::zeros((3, 16), DType::F32, &Device::Cpu)?;
        assert_eq!(mlp.forward(&xs)?.dims(), &[3, 4]);

        // Weight and bias of three layers.
        assert_eq!(varmap.all_vars().len(), 6);
        Ok(())
    }
}
