//! Configuration of DQN agent.
use super::{explorer::EpsilonGreedy, DqnModelConfig};
use crate::{
    model::SubModel1,
    util::{CriticLoss, InShape, OutDim},
    Device,
};
use anyhow::Result;
use candle_core::Tensor;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};

#[allow(clippy::upper_case_acronyms)]
/// Constructs [`Dqn`](super::Dqn).
#[derive(Deserialize, Serialize)]
pub struct DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    pub(super) model_config: DqnModelConfig<Q::Config>,
    pub(super) discount_factor: f64,
    pub(super) explorer: EpsilonGreedy,
    #[serde(default)]
    pub(super) critic_loss: CriticLoss,
    #[serde(default)]
    pub(super) device: Device,
    pub(super) seed: u64,
    #[serde(skip)]
    phantom: PhantomData<Q>,
}

impl<Q> Clone for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            model_config: self.model_config.clone(),
            discount_factor: self.discount_factor,
            explorer: self.explorer.clone(),
            critic_loss: self.critic_loss.clone(),
            device: self.device,
            seed: self.seed,
            phantom: PhantomData,
        }
    }
}

impl<Q> PartialEq for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.model_config == other.model_config
            && self.discount_factor == other.discount_factor
            && self.explorer == other.explorer
            && self.critic_loss == other.critic_loss
            && self.device == other.device
            && self.seed == other.seed
    }
}

impl<Q> std::fmt::Debug for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DqnConfig")
            .field("model_config", &self.model_config)
            .field("discount_factor", &self.discount_factor)
            .field("explorer", &self.explorer)
            .field("critic_loss", &self.critic_loss)
            .field("device", &self.device)
            .field("seed", &self.seed)
            .finish()
    }
}

impl<Q> Default for DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    /// Constructs DQN builder with default parameters.
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            discount_factor: 0.99,
            explorer: EpsilonGreedy::default(),
            critic_loss: CriticLoss::Mse,
            device: Device::Cpu,
            seed: 42,
            phantom: PhantomData,
        }
    }
}

impl<Q> DqnConfig<Q>
where
    Q: SubModel1<Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + InShape + std::fmt::Debug + PartialEq + Clone,
{
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: DqnModelConfig<Q::Config>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the output dimention of the dqn model of the DQN agent.
    pub fn out_dim(mut self, out_dim: i64) -> Self {
        let model_config = self.model_config.clone();
        self.model_config = model_config.out_dim(out_dim);
        self
    }

    /// Critic loss.
    pub fn critic_loss(mut self, v: CriticLoss) -> Self {
        self.critic_loss = v;
        self
    }

    /// Device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Seed of the random number generator for exploration.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configuration of the model.
    pub fn get_model_config(&self) -> &DqnModelConfig<Q::Config> {
        &self.model_config
    }

    /// Returns the explorer.
    pub fn get_explorer(&self) -> &EpsilonGreedy {
        &self.explorer
    }

    /// Loads [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of DQN agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`DqnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of DQN agent into {}", path_.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnn::{Cnn, CnnConfig};
    use tempdir::TempDir;

    #[test]
    fn test_serde_dqn_config() -> Result<()> {
        let model_config =
            DqnModelConfig::default().q_config(CnnConfig::new([40, 48, 3], 4));
        let config = DqnConfig::<Cnn>::default()
            .model_config(model_config)
            .discount_factor(0.9)
            .critic_loss(CriticLoss::SmoothL1)
            .explorer(EpsilonGreedy::new().eps_final(0.05));

        let dir = TempDir::new("dqn_config")?;
        let path = dir.path().join("dqn_config.yaml");
        config.save(&path)?;
        let config_ = DqnConfig::<Cnn>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
