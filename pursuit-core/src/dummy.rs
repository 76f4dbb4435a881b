//! This module is used for tests.
//!
//! [`DummyEnv`] emits a reward of `1.0` per step and terminates after a fixed
//! number of steps. [`DummyAgent`] always takes action `0` and counts the calls
//! made by the training loop.
use crate::{
    error::PursuitError,
    record::{Record, RecordValue},
    Act, Agent, DiscreteAct, Env, Obs, Policy, ReplayBufferBase, Step,
};
use anyhow::Result;
use std::{fs, path::Path};

/// Dummy observation, the number of steps taken in the episode.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyObs(pub usize);

impl Obs for DummyObs {}

/// Dummy action.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyAct(pub usize);

impl Act for DummyAct {}

impl DiscreteAct for DummyAct {
    fn from_index(ix: usize) -> Self {
        Self(ix)
    }

    fn index(&self) -> usize {
        self.0
    }
}

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug)]
pub struct DummyEnvConfig {
    /// The number of steps in an episode.
    pub episode_len: usize,
}

/// Dummy environment.
pub struct DummyEnv {
    episode_len: usize,
    t: usize,
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = DummyObs;
    type Act = DummyAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            episode_len: config.episode_len,
            t: 0,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        if a.0 >= 4 {
            return Err(PursuitError::InvalidAction(a.0).into());
        }
        self.t += 1;
        let is_terminated = self.t >= self.episode_len;
        let record = match is_terminated {
            true => Record::from_slice(&[("outcome", RecordValue::String("done".into()))]),
            false => Record::empty(),
        };
        let step = Step::new(DummyObs(self.t), a.clone(), 1.0, is_terminated, ());
        Ok((step, record))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        Ok(DummyObs(0))
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }

    fn obs_shape(&self) -> Vec<usize> {
        vec![1]
    }

    fn n_actions(&self) -> usize {
        4
    }
}

/// Dummy agent.
pub struct DummyAgent {
    /// The number of actions the agent assumes.
    pub n_actions: usize,
    /// Training mode.
    pub train: bool,
    /// The number of optimization steps.
    pub n_opts: usize,
    /// The number of target synchronizations.
    pub n_syncs: usize,
    /// The number of completed episodes.
    pub n_episode_ends: usize,
}

impl Default for DummyAgent {
    fn default() -> Self {
        Self {
            n_actions: 4,
            train: false,
            n_opts: 0,
            n_syncs: 0,
            n_episode_ends: 0,
        }
    }
}

impl DummyAgent {
    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }
}

impl Policy<DummyEnv> for DummyAgent {
    fn sample(&mut self, _obs: &DummyObs) -> Result<DummyAct> {
        Ok(DummyAct(0))
    }
}

impl<R: ReplayBufferBase> Agent<DummyEnv, R> for DummyAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, _batch: R::Batch) -> Result<Record> {
        self.n_opts += 1;
        Ok(Record::from_scalar("loss", 0.5))
    }

    fn sync_target(&mut self) -> Result<()> {
        self.n_syncs += 1;
        Ok(())
    }

    fn end_episode(&mut self) -> Record {
        self.n_episode_ends += 1;
        Record::from_scalar("epsilon", 1.0)
    }

    fn check_spaces(&self, _obs_shape: &[usize], n_actions: usize) -> Result<()> {
        if n_actions != self.n_actions {
            return Err(PursuitError::ShapeMismatch(format!(
                "agent has {} actions, environment has {}",
                self.n_actions, n_actions
            ))
            .into());
        }
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(path.join("params.txt"), self.n_opts.to_string())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.n_opts = fs::read_to_string(path.join("params.txt"))?.trim().parse()?;
        Ok(())
    }
}
