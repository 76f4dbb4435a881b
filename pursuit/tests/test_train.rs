use anyhow::Result;
use pursuit::{
    build_agent, evaluate, load_trained_config, train, ExperimentConfig, CONFIG_FILE,
    FINAL_CHECKPOINT,
};
use pursuit_core::record::BufferedRecorder;
use pursuit_env::PursuitEnvConfig;
use tempdir::TempDir;

fn small_config(model_dir: &str) -> ExperimentConfig {
    let mut config = ExperimentConfig::default()
        .env_config(PursuitEnvConfig::default().tile_size(8).grid_size(5, 6))
        .seed(7);
    config.replay_buffer_config = config.replay_buffer_config.capacity(100);
    config.trainer_config = config
        .trainer_config
        .num_episodes(3)
        .batch_size(4)
        .min_replay_size(8)
        .target_sync_interval(1)
        .save_interval(2)
        .max_episode_steps(Some(20))
        .model_dir(model_dir);
    config
}

#[test]
fn test_train_and_evaluate() -> Result<()> {
    let dir = TempDir::new("pursuit")?;
    let model_dir = dir.path().join("model");
    let config = small_config(&model_dir.to_string_lossy());

    let mut recorder = BufferedRecorder::new();
    let mut agent = train(&config, &mut recorder)?;

    let records = recorder.iter().collect::<Vec<_>>();
    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.get_scalar("episode")?, (i + 1) as f32);
        let steps = record.get_scalar("steps")?;
        assert!(steps >= 1.0 && steps <= 20.0);
        let eps = 0.995f32.powi(i as i32 + 1);
        assert!((record.get_scalar("epsilon")? - eps).abs() < 1e-6);
    }

    assert!(model_dir.join("config.yaml").exists());
    assert!(model_dir.join("episode_2").join("qnet.safetensors").exists());
    assert!(!model_dir.join("episode_3").exists());
    assert!(model_dir.join(FINAL_CHECKPOINT).join("qnet.safetensors").exists());
    assert_eq!(ExperimentConfig::load(model_dir.join("config.yaml"))?, config);

    let record = evaluate(&config, &mut agent, 2, 10)?;
    assert!(record.get_scalar("episode_steps")? <= 10.0);

    // a fresh agent with the saved parameters acts like the trained one
    let checkpoint = model_dir.join(FINAL_CHECKPOINT);
    let mut agent_ = build_agent(&config, Some(&checkpoint))?;
    let record_ = evaluate(&config, &mut agent_, 2, 10)?;
    assert_eq!(
        record.get_scalar("episode_return")?,
        record_.get_scalar("episode_return")?
    );

    // evaluation without an explicit configuration uses the saved one
    let saved = load_trained_config(&model_dir)?;
    assert_eq!(saved, config);
    let mut agent_ = build_agent(&saved, Some(&checkpoint))?;
    let record_ = evaluate(&saved, &mut agent_, 2, 10)?;
    assert_eq!(
        record.get_scalar("episode_return")?,
        record_.get_scalar("episode_return")?
    );
    Ok(())
}

#[test]
fn test_invalid_config_fails_before_training() -> Result<()> {
    let dir = TempDir::new("pursuit")?;
    let model_dir = dir.path().join("model");
    let mut config = small_config(&model_dir.to_string_lossy());
    config.trainer_config = config.trainer_config.min_replay_size(2);

    let mut recorder = BufferedRecorder::new();
    assert!(train(&config, &mut recorder).is_err());
    assert_eq!(recorder.len(), 0);
    assert!(!model_dir.exists());
    Ok(())
}

#[test]
fn test_config_yaml_roundtrip() -> Result<()> {
    let dir = TempDir::new("pursuit")?;
    let path = dir.path().join("config.yaml");
    let config = small_config("model");
    config.save(&path)?;
    assert_eq!(ExperimentConfig::load(&path)?, config);
    Ok(())
}

#[test]
fn test_trained_config_falls_back_to_default() -> Result<()> {
    let dir = TempDir::new("pursuit")?;
    assert!(!dir.path().join(CONFIG_FILE).exists());

    let config = load_trained_config(dir.path())?;
    let expected = ExperimentConfig::default();
    assert_eq!(config.env_config, expected.env_config);
    assert_eq!(config.agent_config, expected.agent_config);
    assert_eq!(
        config.trainer_config.model_dir.as_deref(),
        Some(dir.path().to_string_lossy().as_ref())
    );
    Ok(())
}
