use super::config::{CnnConfig, CONV_LAYERS, HIDDEN_DIM};
use crate::model::SubModel1;
use anyhow::Result;
use candle_core::{DType::F32, Device, Tensor};
use candle_nn::{
    conv::Conv2dConfig,
    conv2d_no_bias, linear,
    sequential::{seq, Sequential},
    Module, VarBuilder,
};

#[allow(clippy::upper_case_acronyms)]
/// Convolutional neural network with the architecture of the DQN paper.
///
/// Takes `u8` frames of shape `[batch, height, width, channels]` and
/// outputs one value per action.
pub struct Cnn {
    device: Device,
    seq: Sequential,
}

impl Cnn {
    fn stride(s: usize) -> Conv2dConfig {
        Conv2dConfig {
            stride: s,
            ..Default::default()
        }
    }

    fn create_net(vb: &VarBuilder, config: &CnnConfig) -> Result<Sequential> {
        let in_channels = config.in_shape[2];
        let flatten_dim = config.flatten_dim()?;
        let [(c1, k1, s1), (c2, k2, s2), (c3, k3, s3)] = CONV_LAYERS;
        let seq = seq()
            .add_fn(|xs| {
                xs.to_dtype(F32)?
                    .permute((0, 3, 1, 2))?
                    .contiguous()?
                    .affine(1.0 / 255.0, 0.0)
            })
            .add(conv2d_no_bias(in_channels, c1, k1, Self::stride(s1), vb.pp("c1"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d_no_bias(c1, c2, k2, Self::stride(s2), vb.pp("c2"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d_no_bias(c2, c3, k3, Self::stride(s3), vb.pp("c3"))?)
            .add_fn(|xs| xs.relu()?.flatten_from(1))
            .add(linear(flatten_dim, HIDDEN_DIM, vb.pp("l1"))?)
            .add_fn(|xs| xs.relu())
            .add(linear(HIDDEN_DIM, config.out_dim as _, vb.pp("l2"))?);

        Ok(seq)
    }
}

impl SubModel1 for Cnn {
    type Config = CnnConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Self::Input) -> Result<Tensor> {
        Ok(self.seq.forward(&x.to_device(&self.device)?)?)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vb.device().clone();
        let seq = Self::create_net(&vb, &config)?;
        Ok(Self { device, seq })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    #[test]
    fn test_forward_shape() -> Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let cnn = Cnn::build(vb, CnnConfig::new([40, 48, 3], 4))?;

        let x = Tensor::zeros((2, 40, 48, 3), DType::U8, &device)?;
        let q = cnn.forward(&x)?;
        assert_eq!(q.dims(), &[2, 4]);
        assert_eq!(varmap.all_vars().len(), 7);
        Ok(())
    }
}
