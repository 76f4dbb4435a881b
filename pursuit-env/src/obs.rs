//! Observation of [`PursuitEnv`](crate::PursuitEnv).
use image::RgbImage;
use pursuit_core::{Obs, PixelObs};
use std::sync::Arc;

/// An RGB frame of `height x width x 3` pixels.
///
/// Pixels are shared, so cloning an observation into the replay buffer
/// does not copy the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitObs {
    height: usize,
    width: usize,
    frame: Arc<Vec<u8>>,
}

impl From<RgbImage> for PursuitObs {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            height: height as usize,
            width: width as usize,
            frame: Arc::new(img.into_raw()),
        }
    }
}

impl Obs for PursuitObs {}

impl PixelObs for PursuitObs {
    fn shape(&self) -> [usize; 3] {
        [self.height, self.width, 3]
    }

    fn pixels(&self) -> &[u8] {
        &self.frame
    }
}
