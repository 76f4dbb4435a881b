//! Default implementation of the [`Evaluator`] trait.
//!
//! This module provides a simple evaluator that runs a fixed number of episodes
//! and calculates the average return across all episodes.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// A default implementation of the [`Evaluator`] trait.
///
/// Episode `i` starts with [`Env::reset_with_index`]`(i)`, so that evaluation
/// runs are reproducible. Episodes are cut after `max_steps` steps, since an
/// episode of a poorly trained policy may never terminate.
///
/// # Examples
///
/// ```ignore
/// let config = PursuitEnvConfig::default();
/// let mut evaluator = DefaultEvaluator::new(&config, 42, 10)?;
///
/// agent.eval();
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("Average return: {}", record.get_scalar("episode_return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The maximum number of steps in an episode.
    max_steps: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    /// Evaluates a policy by running multiple episodes and calculating the average return.
    ///
    /// The returned record has `episode_return` and `episode_steps`, both averaged
    /// over episodes.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let mut r_total = 0f32;
        let mut steps_total = 0usize;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let mut r_episode = 0f32;

            for _ in 0..self.max_steps {
                let act = policy.sample(&prev_obs)?;
                let (step, _) = self.env.step(&act)?;
                r_episode += step.reward;
                steps_total += 1;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }

            info!("Evaluation episode {}: return {}", ix, r_episode);
            r_total += r_episode;
        }

        let n = self.n_episodes.max(1) as f32;
        Ok(Record::from_slice(&[
            ("episode_return", RecordValue::Scalar(r_total / n)),
            ("episode_steps", RecordValue::Scalar(steps_total as f32 / n)),
        ]))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            max_steps: 1000,
            env: E::build(config, seed)?,
        })
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyAgent, DummyEnv, DummyEnvConfig};

    #[test]
    fn test_average_return() -> Result<()> {
        let config = DummyEnvConfig { episode_len: 5 };
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&config, 0, 3)?;
        let record = evaluator.evaluate(&mut DummyAgent::default())?;
        assert_eq!(record.get_scalar("episode_return")?, 5.0);
        assert_eq!(record.get_scalar("episode_steps")?, 5.0);

        let mut evaluator = evaluator.max_steps(2);
        let record = evaluator.evaluate(&mut DummyAgent::default())?;
        assert_eq!(record.get_scalar("episode_return")?, 2.0);
        Ok(())
    }
}
