//! DQN agent implemented with candle.
use super::{config::DqnConfig, explorer::EpsilonGreedy, model::DqnModel};
use crate::{
    model::SubModel1,
    util::{
        argmax, frames_to_tensor, hard_update, overwrite_taken, smooth_l1_loss, td_targets,
        CriticLoss, InShape, OutDim,
    },
};
use anyhow::Result;
use candle_core::{shape::D, Device, Tensor};
use candle_nn::loss::mse;
use log::debug;
use pursuit_core::{
    error::PursuitError,
    record::{Record, RecordValue},
    Agent, DiscreteAct, Env, PixelObs, Policy, ReplayBufferBase, TransitionBatch,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, marker::PhantomData, path::Path};

#[allow(clippy::upper_case_acronyms)]
/// DQN agent implemented with candle.
///
/// The target network starts as a copy of the online network and is only
/// changed by [`Agent::sync_target`].
pub struct Dqn<E, Q, R>
where
    E: Env,
    E::Obs: PixelObs,
    E::Act: DiscreteAct,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
{
    pub(in crate::dqn) qnet: DqnModel<Q>,
    pub(in crate::dqn) qnet_tgt: DqnModel<Q>,
    pub(in crate::dqn) train: bool,
    pub(in crate::dqn) phantom: PhantomData<(E, R)>,
    pub(in crate::dqn) discount_factor: f64,
    pub(in crate::dqn) explorer: EpsilonGreedy,
    pub(in crate::dqn) eps: f64,
    pub(in crate::dqn) device: Device,
    pub(in crate::dqn) n_opts: usize,
    pub(in crate::dqn) critic_loss: CriticLoss,
    rng: SmallRng,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    E::Obs: PixelObs,
    E::Act: DiscreteAct,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
{
    /// Constructs DQN agent.
    pub fn build(config: DqnConfig<Q>) -> Result<Self> {
        let device = config.device.to_candle()?;
        let qnet = DqnModel::build(config.model_config, device.clone())?;
        let qnet_tgt = qnet.frozen_copy()?;

        Ok(Dqn {
            qnet,
            qnet_tgt,
            train: false,
            phantom: PhantomData,
            discount_factor: config.discount_factor,
            eps: config.explorer.eps_start,
            explorer: config.explorer,
            device,
            n_opts: 0,
            critic_loss: config.critic_loss,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.eps
    }

    /// The number of optimization steps so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Action values of the online network for an observation.
    pub fn q_values(&self, obs: &E::Obs) -> Result<Vec<f32>> {
        Self::values(&self.qnet, obs, &self.device)
    }

    /// Action values of the target network for an observation.
    pub fn target_q_values(&self, obs: &E::Obs) -> Result<Vec<f32>> {
        Self::values(&self.qnet_tgt, obs, &self.device)
    }

    fn values(model: &DqnModel<Q>, obs: &E::Obs, device: &Device) -> Result<Vec<f32>> {
        let x = frames_to_tensor(std::slice::from_ref(obs), device)?;
        Ok(model.forward(&x)?.squeeze(0)?.to_vec1::<f32>()?)
    }

    fn update_critic(&mut self, batch: TransitionBatch<E::Obs, E::Act>) -> Result<f32> {
        if batch.is_empty() {
            return Err(PursuitError::InsufficientData {
                requested: 1,
                available: 0,
            }
            .into());
        }
        let obs = frames_to_tensor(&batch.obs, &self.device)?;
        let next_obs = frames_to_tensor(&batch.next_obs, &self.device)?;
        let act = batch.act.iter().map(|a| a.index()).collect::<Vec<_>>();

        let next_q_max: Vec<f32> = self
            .qnet_tgt
            .forward(&next_obs)?
            .max(D::Minus1)?
            .to_vec1()?;
        let targets = td_targets(
            &batch.reward,
            &batch.is_terminated,
            &next_q_max,
            self.discount_factor,
        );

        let pred = self.qnet.forward(&obs)?;
        let (n, n_actions) = pred.dims2()?;
        let tgt = overwrite_taken(pred.to_vec2::<f32>()?, &act, &targets)?;
        let tgt = Tensor::from_vec(tgt, (n, n_actions), &self.device)?;

        let loss = match self.critic_loss {
            CriticLoss::Mse => mse(&pred, &tgt)?,
            CriticLoss::SmoothL1 => smooth_l1_loss(&pred, &tgt)?,
        };

        self.qnet.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    E::Obs: PixelObs,
    E::Act: DiscreteAct,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
{
    /// In training mode, takes a random action with probability epsilon.
    /// Otherwise takes the first action with the highest value.
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        if self.train && self.explorer.is_random(self.eps, &mut self.rng) {
            let n_actions = self.qnet.out_dim() as usize;
            return Ok(E::Act::from_index(self.rng.gen_range(0..n_actions)));
        }
        let q = self.q_values(obs)?;
        Ok(E::Act::from_index(argmax(&q)))
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    E::Obs: PixelObs,
    E::Act: DiscreteAct,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, batch: R::Batch) -> Result<Record> {
        let loss = self.update_critic(batch)?;
        self.n_opts += 1;
        debug!("opt {}: loss = {}", self.n_opts, loss);
        Ok(Record::from_scalar("loss", loss))
    }

    fn sync_target(&mut self) -> Result<()> {
        hard_update(self.qnet_tgt.get_varmap(), self.qnet.get_varmap())
    }

    fn end_episode(&mut self) -> Record {
        self.eps = self.explorer.next_eps(self.eps);
        Record::from_slice(&[("epsilon", RecordValue::Scalar(self.eps as f32))])
    }

    fn check_spaces(&self, obs_shape: &[usize], n_actions: usize) -> Result<()> {
        let in_shape = self.qnet.in_shape();
        if in_shape.as_slice() != obs_shape {
            return Err(PursuitError::ShapeMismatch(format!(
                "the model takes observations of shape {:?}, the environment gives {:?}",
                in_shape, obs_shape
            ))
            .into());
        }
        if self.qnet.out_dim() != n_actions as i64 {
            return Err(PursuitError::ShapeMismatch(format!(
                "the model outputs {} action values, the environment has {} actions",
                self.qnet.out_dim(),
                n_actions
            ))
            .into());
        }
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(path.join("qnet.safetensors"))?;
        self.qnet_tgt.save(path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path.join("qnet.safetensors"))?;
        self.qnet_tgt.load(path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }
}
