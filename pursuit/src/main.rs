use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use pursuit::{build_agent, evaluate, load_trained_config, train, ExperimentConfig};
use pursuit_core::{error::PursuitError, record::LogRecorder};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Mode {
    /// Train an agent
    Train,

    /// Evaluate a trained agent
    Eval,

    /// Show the configuration and exit
    ShowConfig,
}

/// Train or evaluate a DQN agent on the pursuit-evasion game
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// What to do
    #[arg(long, value_enum, default_value_t = Mode::Train)]
    mode: Mode,

    /// YAML file of the experiment configuration; evaluation defaults to
    /// the one saved in the model directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of the configuration and checkpoints
    #[arg(long)]
    model_dir: Option<String>,

    /// Seed of the environment, the replay buffer and the agent
    #[arg(long)]
    seed: Option<i64>,

    /// The number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Checkpoint under the model directory used for evaluation
    #[arg(long, default_value = "final")]
    checkpoint: String,

    /// The number of evaluation episodes
    #[arg(long, default_value_t = 5)]
    eval_episodes: usize,

    /// The maximum number of steps in an evaluation episode
    #[arg(long, default_value_t = 1000)]
    eval_max_steps: usize,
}

fn load_config(args: &Args) -> Result<ExperimentConfig> {
    let mut config = match (&args.config, &args.model_dir) {
        (Some(path), _) => ExperimentConfig::load(path)?,
        (None, Some(model_dir)) if args.mode == Mode::Eval => {
            load_trained_config(Path::new(model_dir))?
        }
        (None, _) => ExperimentConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(n) = args.episodes {
        config.trainer_config = config.trainer_config.num_episodes(n);
    }
    if let Some(model_dir) = &args.model_dir {
        config.trainer_config = config.trainer_config.model_dir(model_dir.as_str());
    }
    Ok(config)
}

fn show_config(config: &ExperimentConfig) -> Result<()> {
    println!("Device: {:?}", candle_core::Device::cuda_if_available(0)?);
    println!("{}", serde_yaml::to_string(config)?);
    Ok(())
}

fn eval(args: &Args, config: &ExperimentConfig) -> Result<()> {
    let model_dir = config.trainer_config.model_dir.as_ref().ok_or_else(|| {
        PursuitError::InvalidConfig("--model-dir is required for evaluation".into())
    })?;
    let checkpoint = Path::new(model_dir).join(&args.checkpoint);
    let mut agent = build_agent(config, Some(&checkpoint))?;
    let record = evaluate(config, &mut agent, args.eval_episodes, args.eval_max_steps)?;
    info!(
        "Mean return over {} episodes: {}",
        args.eval_episodes,
        record.get_scalar("episode_return")?
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    match args.mode {
        Mode::Train => {
            let mut recorder = LogRecorder::default();
            train(&config, &mut recorder)?;
        }
        Mode::Eval => eval(&args, &config)?,
        Mode::ShowConfig => show_config(&config)?,
    }

    Ok(())
}
