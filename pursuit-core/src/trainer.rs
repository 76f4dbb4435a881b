//! Train [`Agent`].
mod config;
use crate::{
    record::{Record, RecordValue, Recorder},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, Transition,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the episodic training loop.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`], an environment implementing [`Env`],
///    a replay buffer and a recorder implementing [`Recorder`].
/// 1. Check that the agent matches the observation shape and the number of actions
///    of the environment.
/// 2. For `episode` in `1..=num_episodes`:
///     1. Reset [`Env`].
///     2. Take an action with the agent (exploration is up to the agent), do an
///        environment step and push the transition into the replay buffer.
///     3. If the replay buffer holds at least `min_replay_size` transitions,
///        sample a batch of `batch_size` and do an optimization step.
///     4. Back to 2.2 until the episode terminates (or `max_episode_steps` is reached).
///     5. If `episode % target_sync_interval == 0`, synchronize the target model.
///     6. If `episode % save_interval == 0`, the agent's model parameters are saved
///        in directory `(model_dir)/episode_(episode)`.
///     7. Notify the agent of the end of the episode and write the episode record.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[Transition]
///     C -->|ExperienceBufferBase::Item|D[ReplayBufferBase]
///     D -->|ReplayBufferBase::Batch|A
/// ```
///
/// A truncated episode (cut by `max_episode_steps`) keeps its last transition
/// non-terminal, so that its value is still bootstrapped.
pub struct Trainer {
    config: TrainerConfig,

    /// The number of completed episodes.
    episodes: usize,

    /// The number of environment steps.
    env_steps: usize,

    /// The number of optimization steps.
    opt_steps: usize,
}

/// Counters of a single episode.
#[derive(Default)]
struct EpisodeStats {
    steps: usize,
    episode_return: f32,
    loss_sum: f32,
    n_opts: usize,
    env_record: Option<Record>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            episodes: 0,
            env_steps: 0,
            opt_steps: 0,
        })
    }

    /// Returns the number of completed episodes.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Returns the number of environment steps.
    pub fn env_steps(&self) -> usize {
        self.env_steps
    }

    /// Returns the number of optimization steps.
    pub fn opt_steps(&self) -> usize {
        self.opt_steps
    }

    fn save_model<E, R, A>(agent: &A, model_dir: PathBuf)
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
    {
        match agent.save_params(&model_dir) {
            Ok(()) => info!("Saved the model in {:?}.", &model_dir),
            Err(e) => warn!("Failed to save model in {:?}: {}", &model_dir, e),
        }
    }

    /// Runs an episode until it terminates or is truncated.
    fn run_episode<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
    ) -> Result<EpisodeStats>
    where
        E: Env,
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = Transition<E::Obs, E::Act>> + ReplayBufferBase,
    {
        let mut stats = EpisodeStats::default();
        let mut obs = env.reset()?;

        loop {
            let act = agent.sample(&obs)?;
            let (step, env_record) = env.step(&act)?;
            stats.steps += 1;
            self.env_steps += 1;
            stats.episode_return += step.reward;

            let is_terminated = step.is_terminated;
            let next_obs = step.obs.clone();
            buffer.push(Transition::from_step(obs, step))?;

            if buffer.len() >= self.config.min_replay_size {
                let batch = buffer.batch(self.config.batch_size)?;
                let record = agent.opt(batch)?;
                self.opt_steps += 1;
                if let Ok(loss) = record.get_scalar("loss") {
                    stats.loss_sum += loss;
                    stats.n_opts += 1;
                }
            }
            obs = next_obs;

            if is_terminated {
                stats.env_record = Some(env_record);
                break;
            }
            if self.config.max_episode_steps == Some(stats.steps) {
                debug!("Episode {} truncated at {} steps", self.episodes + 1, stats.steps);
                break;
            }
        }

        Ok(stats)
    }

    /// Train the agent.
    pub fn train<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn Recorder,
    ) -> Result<()>
    where
        E: Env,
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = Transition<E::Obs, E::Act>> + ReplayBufferBase,
    {
        agent.check_spaces(&env.obs_shape(), env.n_actions())?;
        agent.train();
        info!(
            "Start training: {} episodes, batch size {}, warmup {} transitions",
            self.config.num_episodes, self.config.batch_size, self.config.min_replay_size
        );

        for _ in 0..self.config.num_episodes {
            let stats = self.run_episode(env, agent, buffer)?;
            self.episodes += 1;
            let episode = self.episodes;

            if episode % self.config.target_sync_interval == 0 {
                agent.sync_target()?;
                debug!("Synchronized the target model after episode {}", episode);
            }

            if self.config.save_interval > 0 && episode % self.config.save_interval == 0 {
                if let Some(model_dir) = &self.config.model_dir {
                    let path = Path::new(model_dir).join(format!("episode_{}", episode));
                    Self::save_model::<E, R, A>(agent, path);
                }
            }

            let mut record = agent.end_episode();
            record.insert("episode", RecordValue::Scalar(episode as f32));
            record.insert("return", RecordValue::Scalar(stats.episode_return));
            record.insert("steps", RecordValue::Scalar(stats.steps as f32));
            record.insert("buffer_len", RecordValue::Scalar(buffer.len() as f32));
            record.insert("time", RecordValue::DateTime(Local::now()));
            if stats.n_opts > 0 {
                let loss = stats.loss_sum / stats.n_opts as f32;
                record.insert("loss", RecordValue::Scalar(loss));
            }
            if let Some(env_record) = stats.env_record {
                record.merge_inplace(env_record);
            }

            if episode % self.config.log_interval == 0 {
                recorder.write(record);
            }
        }

        recorder.flush();
        info!(
            "Finished training: {} episodes, {} environment steps, {} optimization steps",
            self.episodes, self.env_steps, self.opt_steps
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{DummyAct, DummyAgent, DummyEnv, DummyEnvConfig, DummyObs},
        record::{BufferedRecorder, NullRecorder},
        SimpleReplayBuffer, SimpleReplayBufferConfig,
    };
    use tempdir::TempDir;

    type Buffer = SimpleReplayBuffer<DummyObs, DummyAct>;

    fn setup(episode_len: usize) -> Result<(DummyEnv, DummyAgent, Buffer)> {
        let env = DummyEnv::build(&DummyEnvConfig { episode_len }, 0)?;
        let agent = DummyAgent::default();
        let buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(100));
        Ok((env, agent, buffer))
    }

    #[test]
    fn test_sync_and_episode_end_counts() -> Result<()> {
        let (mut env, mut agent, mut buffer) = setup(3)?;
        let config = TrainerConfig::default()
            .num_episodes(25)
            .batch_size(2)
            .min_replay_size(4)
            .target_sync_interval(10)
            .save_interval(0);
        let mut trainer = Trainer::build(config)?;
        let mut recorder = BufferedRecorder::new();
        trainer.train(&mut env, &mut agent, &mut buffer, &mut recorder)?;

        assert_eq!(agent.n_syncs, 2);
        assert_eq!(agent.n_episode_ends, 25);
        assert_eq!(trainer.env_steps(), 75);
        // optimization starts at the 4th transition
        assert_eq!(trainer.opt_steps(), 72);
        assert_eq!(agent.n_opts, 72);
        assert_eq!(buffer.len(), 75);
        assert_eq!(recorder.len(), 25);

        let last = recorder.iter().last().unwrap();
        assert_eq!(last.get_scalar("episode")?, 25.0);
        assert_eq!(last.get_scalar("return")?, 3.0);
        assert_eq!(last.get_string("outcome")?, "done");
        Ok(())
    }

    #[test]
    fn test_save_interval() -> Result<()> {
        let (mut env, mut agent, mut buffer) = setup(2)?;
        let dir = TempDir::new("trainer")?;
        let config = TrainerConfig::default()
            .num_episodes(7)
            .batch_size(1)
            .min_replay_size(1)
            .save_interval(3)
            .model_dir(dir.path().to_string_lossy());
        let mut trainer = Trainer::build(config)?;
        trainer.train(&mut env, &mut agent, &mut buffer, &mut NullRecorder {})?;

        assert!(dir.path().join("episode_3").join("params.txt").exists());
        assert!(dir.path().join("episode_6").join("params.txt").exists());
        assert!(!dir.path().join("episode_7").exists());
        Ok(())
    }

    #[test]
    fn test_truncation_keeps_transition_non_terminal() -> Result<()> {
        let (mut env, mut agent, mut buffer) = setup(10)?;
        let config = TrainerConfig::default()
            .num_episodes(2)
            .batch_size(1)
            .min_replay_size(100)
            .max_episode_steps(Some(4));
        let mut trainer = Trainer::build(config)?;
        trainer.train(&mut env, &mut agent, &mut buffer, &mut NullRecorder {})?;

        assert_eq!(trainer.env_steps(), 8);
        assert!(buffer.iter().all(|tr| !tr.is_terminated));
        Ok(())
    }

    #[test]
    fn test_rejects_mismatched_agent() -> Result<()> {
        let (mut env, _, mut buffer) = setup(2)?;
        let mut agent = DummyAgent::default().n_actions(3);
        let mut trainer = Trainer::build(TrainerConfig::default().num_episodes(1))?;
        let res = trainer.train(&mut env, &mut agent, &mut buffer, &mut BufferedRecorder::new());

        assert!(res.is_err());
        assert_eq!(trainer.env_steps(), 0);
        Ok(())
    }
}
