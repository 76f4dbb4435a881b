//! Simple generic replay buffer.
use super::{SimpleReplayBufferConfig, Transition, TransitionBatch};
use crate::{error::PursuitError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use log::trace;
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::collections::VecDeque;

/// A simple generic replay buffer.
///
/// Holds at most `capacity` transitions. When full, pushing a transition
/// evicts the oldest one.
pub struct SimpleReplayBuffer<O, A> {
    capacity: usize,
    buf: VecDeque<Transition<O, A>>,
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A> {
    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an iterator over stored transitions, from the oldest to the latest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<O, A>> {
        self.buf.iter()
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A> {
    type Item = Transition<O, A>;

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        while self.buf.len() >= self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(tr);
        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = TransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        Self {
            capacity: config.capacity,
            buf: VecDeque::with_capacity(config.capacity.min(1 << 16)),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Samples `size` distinct transitions uniformly at random.
    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        let available = self.buf.len();
        if size > available {
            return Err(PursuitError::InsufficientData {
                requested: size,
                available,
            }
            .into());
        }
        trace!("Sample {} of {} transitions", size, available);

        let mut batch = TransitionBatch::with_capacity(size);
        for ix in index::sample(&mut self.rng, available, size).into_iter() {
            batch.push(self.buf[ix].clone());
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(i: usize) -> Transition<usize, usize> {
        Transition {
            obs: i,
            act: i % 4,
            reward: i as f32,
            next_obs: i + 1,
            is_terminated: false,
        }
    }

    fn buffer(capacity: usize) -> SimpleReplayBuffer<usize, usize> {
        let config = SimpleReplayBufferConfig::default().capacity(capacity);
        SimpleReplayBuffer::build(&config)
    }

    #[test]
    fn test_fifo_eviction() -> Result<()> {
        let mut buffer = buffer(5);
        for i in 0..8 {
            buffer.push(transition(i))?;
            assert!(buffer.len() <= 5);
        }

        assert_eq!(buffer.len(), 5);
        let kept = buffer.iter().map(|tr| tr.obs).collect::<Vec<_>>();
        assert_eq!(kept, vec![3, 4, 5, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_batch_insufficient_data() -> Result<()> {
        let mut buffer = buffer(10);
        for i in 0..3 {
            buffer.push(transition(i))?;
        }

        let err = buffer.batch(4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PursuitError>(),
            Some(&PursuitError::InsufficientData {
                requested: 4,
                available: 3
            })
        );
        Ok(())
    }

    #[test]
    fn test_batch_distinct_and_kept() -> Result<()> {
        let mut buffer = buffer(10);
        for i in 0..6 {
            buffer.push(transition(i))?;
        }

        let batch = buffer.batch(6)?;
        let mut obs = batch.obs.clone();
        obs.sort();
        assert_eq!(obs, vec![0, 1, 2, 3, 4, 5]);
        for (o, r) in batch.obs.iter().zip(batch.reward.iter()) {
            assert_eq!(*o as f32, *r);
        }

        // sampling does not consume transitions
        assert_eq!(buffer.len(), 6);
        Ok(())
    }

    #[test]
    fn test_batch_reproducible_with_seed() -> Result<()> {
        let mut b1 = buffer(100);
        let mut b2 = buffer(100);
        for i in 0..50 {
            b1.push(transition(i))?;
            b2.push(transition(i))?;
        }

        assert_eq!(b1.batch(8)?.obs, b2.batch(8)?.obs);
        Ok(())
    }
}
