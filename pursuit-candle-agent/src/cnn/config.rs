use crate::util::{InShape, OutDim};
use anyhow::Result;
use pursuit_core::error::PursuitError;
use serde::{Deserialize, Serialize};

/// Output channels, kernel size and stride of each convolutional layer.
pub(super) const CONV_LAYERS: [(usize, usize, usize); 3] = [(32, 8, 4), (64, 4, 2), (64, 3, 1)];

/// Width of the hidden dense layer.
pub(super) const HIDDEN_DIM: usize = 512;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Cnn`](super::Cnn).
pub struct CnnConfig {
    /// Shape of a frame, `[height, width, channels]`.
    pub(super) in_shape: [usize; 3],
    pub(super) out_dim: i64,
}

impl CnnConfig {
    /// Constructs the configuration of a network on frames of `in_shape`
    /// with `out_dim` outputs.
    pub fn new(in_shape: [usize; 3], out_dim: i64) -> Self {
        Self { in_shape, out_dim }
    }

    /// Returns `[channels, height, width]` after the last convolution.
    ///
    /// Convolutions are unpadded, so frames smaller than the receptive
    /// field are rejected.
    pub fn conv_out_shape(&self) -> Result<[usize; 3]> {
        let [mut h, mut w, _] = self.in_shape;
        for (_, kernel, stride) in CONV_LAYERS.iter() {
            if h < *kernel || w < *kernel {
                return Err(PursuitError::ShapeMismatch(format!(
                    "frame {:?} is too small for the convolutional layers",
                    self.in_shape
                ))
                .into());
            }
            h = (h - kernel) / stride + 1;
            w = (w - kernel) / stride + 1;
        }
        Ok([CONV_LAYERS[2].0, h, w])
    }

    /// Returns the input dimension of the dense layers.
    pub fn flatten_dim(&self) -> Result<usize> {
        let [c, h, w] = self.conv_out_shape()?;
        Ok(c * h * w)
    }
}

impl OutDim for CnnConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, v: i64) {
        self.out_dim = v;
    }
}

impl InShape for CnnConfig {
    fn get_in_shape(&self) -> Vec<usize> {
        self.in_shape.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv_out_shape() -> Result<()> {
        assert_eq!(CnnConfig::new([440, 640, 3], 4).conv_out_shape()?, [64, 51, 76]);
        assert_eq!(CnnConfig::new([40, 48, 3], 4).conv_out_shape()?, [64, 1, 2]);
        assert_eq!(CnnConfig::new([40, 48, 3], 4).flatten_dim()?, 128);
        Ok(())
    }

    #[test]
    fn test_too_small() {
        let err = CnnConfig::new([20, 20, 3], 4).conv_out_shape().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PursuitError>(),
            Some(PursuitError::ShapeMismatch(_))
        ));
    }
}
