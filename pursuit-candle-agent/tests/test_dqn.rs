use anyhow::Result;
use pursuit_candle_agent::{
    cnn::{Cnn, CnnConfig},
    dqn::{Dqn, DqnConfig, DqnModelConfig, EpsilonGreedy},
};
use pursuit_core::{
    error::PursuitError, Agent, Env, ExperienceBufferBase, Policy, ReplayBufferBase,
    SimpleReplayBuffer, SimpleReplayBufferConfig, Transition, TransitionBatch,
};
use pursuit_env::{PursuitAct, PursuitEnv, PursuitEnvConfig, PursuitObs};
use tempdir::TempDir;

type Buffer = SimpleReplayBuffer<PursuitObs, PursuitAct>;
type DqnAgent = Dqn<PursuitEnv, Cnn, Buffer>;

fn env() -> Result<PursuitEnv> {
    let config = PursuitEnvConfig::default().tile_size(8).grid_size(5, 6);
    PursuitEnv::build(&config, 42)
}

fn build_agent() -> Result<DqnAgent> {
    let model_config = DqnModelConfig::default().q_config(CnnConfig::new([40, 48, 3], 4));
    DqnAgent::build(DqnConfig::<Cnn>::default().model_config(model_config))
}

fn collect(env: &mut PursuitEnv, n: usize) -> Result<Buffer> {
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default());
    let mut obs = env.reset()?;
    for i in 0..n {
        let (step, _) = env.step(&PursuitAct::new(i % 4))?;
        let next_obs = step.obs.clone();
        let done = step.is_done();
        buffer.push(Transition::from_step(obs, step))?;
        obs = match done {
            true => env.reset()?,
            false => next_obs,
        };
    }
    Ok(buffer)
}

#[test]
fn test_greedy_sample_is_deterministic() -> Result<()> {
    let mut env = env()?;
    let mut agent = build_agent()?;
    let obs = env.reset()?;

    agent.eval();
    let a1 = agent.sample(&obs)?;
    let a2 = agent.sample(&obs)?;
    assert_eq!(a1, a2);
    assert!(a1.act < 4);

    let q = agent.q_values(&obs)?;
    assert_eq!(q.len(), 4);
    assert_eq!(q, agent.target_q_values(&obs)?);
    Ok(())
}

#[test]
fn test_train_mode_explores() -> Result<()> {
    let mut env = env()?;
    let mut agent = build_agent()?;
    let obs = env.reset()?;

    agent.train();
    assert_eq!(agent.epsilon(), 1.0);
    let acts = (0..50)
        .map(|_| agent.sample(&obs).map(|a| a.act))
        .collect::<Result<Vec<_>>>()?;
    assert!(acts.iter().all(|a| *a < 4));
    assert!(acts.iter().any(|a| *a != acts[0]));
    Ok(())
}

#[test]
fn test_opt_then_sync_target() -> Result<()> {
    let mut env = env()?;
    let mut agent = build_agent()?;
    let mut buffer = collect(&mut env, 16)?;
    let obs = env.reset()?;

    for _ in 0..5 {
        let record = agent.opt(buffer.batch(4)?)?;
        assert!(record.get_scalar("loss")?.is_finite());
    }
    assert_eq!(agent.n_opts(), 5);
    assert_ne!(agent.q_values(&obs)?, agent.target_q_values(&obs)?);

    agent.sync_target()?;
    assert_eq!(agent.q_values(&obs)?, agent.target_q_values(&obs)?);
    Ok(())
}

/// Mean squared error of one update where only the taken action is fitted.
fn expected_loss(agent: &DqnAgent, tr: &Transition<PursuitObs, PursuitAct>) -> Result<f32> {
    let pred = agent.q_values(&tr.obs)?;
    let target = match tr.is_terminated {
        true => tr.reward,
        false => {
            let next_max = agent
                .target_q_values(&tr.next_obs)?
                .into_iter()
                .fold(f32::NEG_INFINITY, f32::max);
            tr.reward + 0.99 * next_max
        }
    };
    let err = pred[tr.act.act] - target;
    Ok(err * err / pred.len() as f32)
}

#[test]
fn test_opt_bootstraps_from_target() -> Result<()> {
    let mut env = env()?;
    let mut agent = build_agent()?;
    let mut buffer = collect(&mut env, 16)?;
    for _ in 0..5 {
        agent.opt(buffer.batch(4)?)?;
    }

    let obs = env.reset()?;
    let (step, _) = env.step(&PursuitAct::new(3))?;
    let next_obs = step.obs.clone();
    assert_ne!(agent.q_values(&next_obs)?, agent.target_q_values(&next_obs)?);

    for is_terminated in [false, true].iter() {
        let tr = Transition {
            obs: obs.clone(),
            act: PursuitAct::new(1),
            reward: 10.0,
            next_obs: next_obs.clone(),
            is_terminated: *is_terminated,
        };
        let expected = expected_loss(&agent, &tr)?;
        let mut batch = TransitionBatch::with_capacity(1);
        batch.push(tr);

        let loss = agent.opt(batch)?.get_scalar("loss")?;
        assert!(
            (loss - expected).abs() <= 1e-4 * expected.max(1.0),
            "terminal = {}: loss {} != {}",
            is_terminated,
            loss,
            expected
        );
    }
    Ok(())
}

#[test]
fn test_end_episode_decays_epsilon() -> Result<()> {
    let model_config = DqnModelConfig::default().q_config(CnnConfig::new([40, 48, 3], 4));
    let config = DqnConfig::<Cnn>::default()
        .model_config(model_config)
        .explorer(EpsilonGreedy::new().decay(0.5).eps_final(0.2));
    let mut agent: DqnAgent = Dqn::build(config)?;

    let record = agent.end_episode();
    assert_eq!(record.get_scalar("epsilon")?, 0.5);
    agent.end_episode();
    assert_eq!(agent.epsilon(), 0.25);
    agent.end_episode();
    assert_eq!(agent.epsilon(), 0.2);
    Ok(())
}

#[test]
fn test_check_spaces() -> Result<()> {
    let env = env()?;
    let agent = build_agent()?;
    agent.check_spaces(&env.obs_shape(), env.n_actions())?;

    let err = agent.check_spaces(&[44, 48, 3], 4).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PursuitError>(),
        Some(PursuitError::ShapeMismatch(_))
    ));
    assert!(agent.check_spaces(&[40, 48, 3], 5).is_err());
    Ok(())
}

#[test]
fn test_save_load_params() -> Result<()> {
    let mut env = env()?;
    let mut agent = build_agent()?;
    let mut buffer = collect(&mut env, 8)?;
    agent.opt(buffer.batch(4)?)?;

    let dir = TempDir::new("dqn")?;
    agent.save_params(dir.path())?;
    assert!(dir.path().join("qnet.safetensors").exists());
    assert!(dir.path().join("qnet_tgt.safetensors").exists());

    let obs = env.reset()?;
    let mut agent_ = build_agent()?;
    agent_.load_params(dir.path())?;
    assert_eq!(agent.q_values(&obs)?, agent_.q_values(&obs)?);
    assert_eq!(agent.target_q_values(&obs)?, agent_.target_q_values(&obs)?);
    Ok(())
}
