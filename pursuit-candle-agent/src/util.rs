//! Utilities.
use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarMap;
use log::trace;
use pursuit_core::{error::PursuitError, PixelObs};
use serde::{Deserialize, Serialize};

/// Critic loss type.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum CriticLoss {
    /// Mean squared error.
    Mse,

    /// Smooth L1 loss.
    SmoothL1,
}

impl Default for CriticLoss {
    fn default() -> Self {
        Self::Mse
    }
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Interface for the shape of a single input, without the batch dimension.
pub trait InShape {
    /// Returns the input shape.
    fn get_in_shape(&self) -> Vec<usize>;
}

/// Overwrites the variables of `dest` with those of `src`.
///
/// Variables are identified by their names.
pub fn hard_update(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = dest
        .data()
        .lock()
        .map_err(|e| anyhow!("failed to lock varmap: {}", e))?;
    let src = src
        .data()
        .lock()
        .map_err(|e| anyhow!("failed to lock varmap: {}", e))?;

    for (k, v_dest) in dest.iter() {
        trace!("Copy {}", k);
        let v_src = src.get(k).ok_or_else(|| {
            PursuitError::ShapeMismatch(format!("variable {} is not in the source", k))
        })?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor> {
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(DType::F32)?;
    let m2 = m1.affine(-1.0, 1.0)?;
    let quadratic = (m1 * d.powf(2.0)?.affine(0.5, 0.0)?)?;
    let linear = (m2 * d.affine(1.0, -0.5)?)?;
    Ok((quadratic + linear)?.mean_all()?)
}

/// Stacks frames into a `u8` tensor of shape `[n, height, width, channels]`.
pub fn frames_to_tensor<O: PixelObs>(frames: &[O], device: &Device) -> Result<Tensor> {
    let shape = frames
        .first()
        .ok_or_else(|| PursuitError::ShapeMismatch("no frame to stack".into()))?
        .shape();
    let mut data = Vec::with_capacity(frames.len() * shape.iter().product::<usize>());
    for frame in frames.iter() {
        if frame.shape() != shape {
            return Err(PursuitError::ShapeMismatch(format!(
                "frames of shapes {:?} and {:?} in a batch",
                shape,
                frame.shape()
            ))
            .into());
        }
        data.extend_from_slice(frame.pixels());
    }
    let [h, w, c] = shape;
    Ok(Tensor::from_vec(data, (frames.len(), h, w, c), device)?)
}

/// Returns the index of the first maximum.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Bootstrapped targets `r + gamma * max_a Q'(s', a)`, or `r` on terminal transitions.
pub fn td_targets(
    reward: &[f32],
    is_terminated: &[bool],
    next_q_max: &[f32],
    gamma: f64,
) -> Vec<f32> {
    reward
        .iter()
        .zip(is_terminated.iter())
        .zip(next_q_max.iter())
        .map(|((r, t), q)| match t {
            true => *r,
            false => *r + gamma as f32 * *q,
        })
        .collect()
}

/// Overwrites the taken action's entry of each row with its target and
/// returns the rows concatenated.
///
/// Entries of the other actions keep their predicted values, so they do not
/// contribute to the loss.
pub fn overwrite_taken(pred: Vec<Vec<f32>>, act: &[usize], targets: &[f32]) -> Result<Vec<f32>> {
    let mut out = Vec::with_capacity(pred.iter().map(|row| row.len()).sum());
    for ((mut row, a), y) in pred.into_iter().zip(act.iter()).zip(targets.iter()) {
        match row.get_mut(*a) {
            Some(v) => *v = *y,
            None => return Err(PursuitError::InvalidAction(*a).into()),
        }
        out.extend(row);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_nn::Init;

    #[derive(Clone, Debug)]
    struct Frame(Vec<u8>, [usize; 3]);

    impl pursuit_core::Obs for Frame {}

    impl PixelObs for Frame {
        fn shape(&self) -> [usize; 3] {
            self.1
        }

        fn pixels(&self) -> &[u8] {
            &self.0
        }
    }

    fn varmap_with(t: &Tensor) -> Result<VarMap> {
        let vm = VarMap::new();
        vm.get((3,), "var1", Init::Const(0.0), DType::F32, &Device::Cpu)?;
        vm.data().lock().unwrap().get("var1").unwrap().set(t)?;
        Ok(vm)
    }

    #[test]
    fn test_hard_update() -> Result<()> {
        let t_src = Tensor::from_slice(&[1.0f32, 2.0, 3.0], (3,), &Device::Cpu)?;
        let t_dest = Tensor::from_slice(&[4.0f32, 5.0, 6.0], (3,), &Device::Cpu)?;
        let vm_src = varmap_with(&t_src)?;
        let vm_dest = varmap_with(&t_dest)?;

        hard_update(&vm_dest, &vm_src)?;
        let copied = vm_dest.data().lock().unwrap()["var1"].as_tensor().to_vec1::<f32>()?;
        assert_eq!(copied, vec![1.0, 2.0, 3.0]);

        // the copy does not share storage with the source
        vm_src.data().lock().unwrap()["var1"].set(&t_dest)?;
        let copied = vm_dest.data().lock().unwrap()["var1"].as_tensor().to_vec1::<f32>()?;
        assert_eq!(copied, vec![1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_smooth_l1_loss() -> Result<()> {
        let x = Tensor::from_slice(&[0.0f32, 0.0], (2,), &Device::Cpu)?;
        let y = Tensor::from_slice(&[0.5f32, 3.0], (2,), &Device::Cpu)?;
        let loss = smooth_l1_loss(&x, &y)?.to_scalar::<f32>()?;
        // (0.5 * 0.25 + 2.5) / 2
        assert!((loss - 1.3125).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_frames_to_tensor() -> Result<()> {
        let frames = vec![
            Frame(vec![0; 12], [2, 2, 3]),
            Frame(vec![255; 12], [2, 2, 3]),
        ];
        let t = frames_to_tensor(&frames, &Device::Cpu)?;
        assert_eq!(t.dims(), &[2, 2, 2, 3]);
        assert_eq!(t.dtype(), DType::U8);
        assert_eq!(t.flatten_all()?.to_vec1::<u8>()?[12], 255);

        let mixed = vec![Frame(vec![0; 12], [2, 2, 3]), Frame(vec![0; 3], [1, 1, 3])];
        assert!(frames_to_tensor(&mixed, &Device::Cpu).is_err());
        assert!(frames_to_tensor::<Frame>(&[], &Device::Cpu).is_err());
        Ok(())
    }

    #[test]
    fn test_argmax_first_max() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, -1.0]), 1);
        assert_eq!(argmax(&[2.0, 2.0]), 0);
        assert_eq!(argmax(&[-3.0, -2.0, -1.0]), 2);
    }

    #[test]
    fn test_td_targets() {
        let targets = td_targets(&[1.0, -100.0, 10.0], &[false, true, false], &[2.0, 5.0, 0.0], 0.5);
        assert_eq!(targets, vec![2.0, -100.0, 10.0]);
    }

    #[test]
    fn test_overwrite_taken() -> Result<()> {
        let pred = vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]];
        let out = overwrite_taken(pred.clone(), &[2, 0], &[-1.0, -2.0])?;
        assert_eq!(out, vec![1.0, 2.0, -1.0, 4.0, -2.0, 6.0, 7.0, 8.0]);

        let err = overwrite_taken(pred, &[4, 0], &[0.0, 0.0]).unwrap_err();
        assert_eq!(err.downcast_ref::<PursuitError>(), Some(&PursuitError::InvalidAction(4)));
        Ok(())
    }
}
