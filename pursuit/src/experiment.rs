//! Training and evaluation runs.
use crate::{DqnAgent, ExperimentConfig, ReplayBuffer};
use anyhow::Result;
use log::info;
use pursuit_core::{
    record::{Record, Recorder},
    Agent, DefaultEvaluator, Env as _, Evaluator as _, ReplayBufferBase, Trainer,
};
use pursuit_env::PursuitEnv;
use std::{fs, path::Path};

/// Name of the directory of the parameters saved after training.
pub const FINAL_CHECKPOINT: &str = "final";

/// Name of the configuration file written in the model directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Loads the configuration a model in `model_dir` was trained with.
///
/// Falls back to the default configuration when `model_dir` has no
/// configuration file. The returned configuration points at `model_dir`.
pub fn load_trained_config(model_dir: &Path) -> Result<ExperimentConfig> {
    let path = model_dir.join(CONFIG_FILE);
    let mut config = match path.exists() {
        true => {
            info!("Loading the configuration from {:?}", path);
            ExperimentConfig::load(&path)?
        }
        false => ExperimentConfig::default(),
    };
    config.trainer_config = config
        .trainer_config
        .model_dir(model_dir.to_string_lossy().into_owned());
    Ok(config)
}

/// Constructs the agent, loading parameters from `checkpoint` if given.
pub fn build_agent(config: &ExperimentConfig, checkpoint: Option<&Path>) -> Result<DqnAgent> {
    let mut agent = DqnAgent::build(config.agent_config.clone())?;
    if let Some(path) = checkpoint {
        agent.load_params(path)?;
    }
    Ok(agent)
}

/// Trains an agent and returns it.
///
/// With `model_dir` set in the trainer configuration, the configuration is
/// written to `model_dir/config.yaml` before training, checkpoints go to
/// `model_dir/episode_<n>` and the trained parameters to `model_dir/final`.
pub fn train(config: &ExperimentConfig, recorder: &mut dyn Recorder) -> Result<DqnAgent> {
    config.validate()?;
    let mut env = PursuitEnv::build(&config.env_config, config.seed)?;
    let mut agent = build_agent(config, None)?;
    let mut buffer = ReplayBuffer::build(&config.replay_buffer_config);

    let model_dir = config.trainer_config.model_dir.as_ref().map(Path::new);
    if let Some(model_dir) = model_dir {
        fs::create_dir_all(model_dir)?;
        config.save(model_dir.join(CONFIG_FILE))?;
        info!("Saved the configuration in {:?}", model_dir);
    }

    let mut trainer = Trainer::build(config.trainer_config.clone())?;
    trainer.train(&mut env, &mut agent, &mut buffer, recorder)?;

    if let Some(model_dir) = model_dir {
        agent.save_params(&model_dir.join(FINAL_CHECKPOINT))?;
    }
    Ok(agent)
}

/// Runs `n_episodes` greedy episodes of at most `max_steps` steps.
///
/// The returned record holds the mean `episode_return` and `episode_steps`.
pub fn evaluate(
    config: &ExperimentConfig,
    agent: &mut DqnAgent,
    n_episodes: usize,
    max_steps: usize,
) -> Result<Record> {
    config.env_config.validate()?;
    agent.check_spaces(
        &config.env_config.obs_shape(),
        config.env_config.n_actions(),
    )?;
    agent.eval();

    let mut evaluator =
        DefaultEvaluator::<PursuitEnv>::new(&config.env_config, config.seed, n_episodes)?
            .max_steps(max_steps);
    let record = evaluator.evaluate(agent)?;
    info!("Evaluation: {}", record.to_line());
    Ok(record)
}
