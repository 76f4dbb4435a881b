use anyhow::Result;
use pursuit_core::{error::PursuitError, Env};
use pursuit_env::{
    Direction, EpisodeState, Grid, Layout, Position, PursuitAct, PursuitEnv, PursuitEnvConfig,
};

fn open_maze() -> Result<Grid> {
    let mut lines = vec!["################"];
    lines.extend(std::iter::repeat("#..............#").take(9));
    lines.push("################");
    Grid::parse(&lines, 40)
}

fn greedy_env() -> Result<PursuitEnv> {
    let config = PursuitEnvConfig::default().random_move_probability(0.0);
    PursuitEnv::build(&config, 0)
}

#[test]
fn test_walk_into_pursuer() -> Result<()> {
    let mut env = greedy_env()?;
    env.reset_to(Layout {
        grid: open_maze()?,
        player: Position::new(40, 40),
        pursuer: Position::new(160, 40),
        collectibles: vec![Position::new(80, 40), Position::new(580, 380)],
    })?;

    let right = PursuitAct::from(Direction::Right);
    let mut rewards = vec![];
    loop {
        let (step, record) = env.step(&right)?;
        rewards.push(step.reward);
        if step.is_done() {
            assert_eq!(record.get_string("outcome")?, "caught");
            assert_eq!(record.get_scalar("score")?, 1.0);
            break;
        }
        assert!(rewards.len() < 10, "the pursuer never caught the player");
    }

    // the collectible at x = 80 is reached at x = 70, the pursuer at x = 100
    assert_eq!(rewards, vec![-1.0, -1.0, 10.0, -1.0, -1.0, -100.0]);

    let episode = env.episode().unwrap();
    assert_eq!(episode.state(), EpisodeState::Terminated);
    assert_eq!(episode.player(), Position::new(100, 40));
    assert_eq!(episode.pursuer(), Position::new(100, 40));
    assert_eq!(episode.collectibles().len(), 1);
    assert_eq!(episode.episode_return(), -94.0);

    let err = env.step(&right).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<PursuitError>(),
        Some(PursuitError::InvalidState(_))
    ));
    Ok(())
}

#[test]
fn test_collect_last_item() -> Result<()> {
    let mut env = greedy_env()?;
    env.reset_to(Layout {
        grid: open_maze()?,
        player: Position::new(40, 40),
        pursuer: Position::new(560, 360),
        collectibles: vec![Position::new(60, 40)],
    })?;

    let (step, record) = env.step(&PursuitAct::from(Direction::Right))?;
    assert_eq!(step.reward, 100.0);
    assert!(step.is_done());
    assert_eq!(record.get_string("outcome")?, "cleared");
    assert!(env.episode().unwrap().collectibles().is_empty());

    // a new episode can be started after termination
    env.reset()?;
    assert_eq!(env.episode().unwrap().state(), EpisodeState::Ready);
    Ok(())
}
