//! The pursuit-evasion environment.
mod config;
mod layout;
use crate::{CollectibleSet, Direction, Grid, Position, Pursuer, PursuitAct, PursuitObs, Renderer};
use anyhow::Result;
pub use config::{PursuitEnvConfig, RewardConfig};
pub use layout::Layout;
use log::trace;
use pursuit_core::{
    error::PursuitError,
    record::{Record, RecordValue},
    DiscreteAct, Env, Step,
};
use rand::{rngs::StdRng, SeedableRng};

/// Lifecycle of an episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeState {
    /// Reset, no step taken yet.
    Ready,

    /// At least one step taken.
    Running,

    /// Caught or cleared; only [`Env::reset`] is allowed.
    Terminated,
}

/// State of the current episode.
#[derive(Clone, Debug)]
pub struct Episode {
    grid: Grid,
    player: Position,
    pursuer: Pursuer,
    collectibles: CollectibleSet,
    state: EpisodeState,
    episode_return: f32,
    score: usize,
    steps: usize,
}

impl Episode {
    fn new(layout: Layout, config: &PursuitEnvConfig) -> Self {
        Self {
            pursuer: Pursuer::new(
                layout.pursuer,
                config.step_size,
                config.random_move_probability,
            ),
            grid: layout.grid,
            player: layout.player,
            collectibles: CollectibleSet::from_positions(layout.collectibles),
            state: EpisodeState::Ready,
            episode_return: 0.0,
            score: 0,
            steps: 0,
        }
    }

    /// The maze.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Position of the player.
    pub fn player(&self) -> Position {
        self.player
    }

    /// Position of the pursuer.
    pub fn pursuer(&self) -> Position {
        self.pursuer.position()
    }

    /// Remaining collectibles.
    pub fn collectibles(&self) -> &CollectibleSet {
        &self.collectibles
    }

    /// Lifecycle state.
    pub fn state(&self) -> EpisodeState {
        self.state
    }

    /// Sum of rewards so far.
    pub fn episode_return(&self) -> f32 {
        self.episode_return
    }

    /// The number of collected items.
    pub fn score(&self) -> usize {
        self.score
    }

    /// The number of steps taken.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

/// The pursuit-evasion environment.
///
/// Randomness of maze generation, spawns and the pursuer is drawn from a single
/// generator seeded at [`Env::build`], so a fixed seed reproduces whole episodes
/// for a fixed action sequence.
pub struct PursuitEnv {
    config: PursuitEnvConfig,
    seed: i64,
    rng: StdRng,
    renderer: Renderer,
    episode: Option<Episode>,
}

impl PursuitEnv {
    /// Returns the current episode, `None` before the first reset.
    pub fn episode(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PursuitEnvConfig {
        &self.config
    }

    /// Starts an episode from an explicit layout.
    ///
    /// The grid must match the configured size and tile size.
    pub fn reset_to(&mut self, layout: Layout) -> Result<PursuitObs> {
        let grid = &layout.grid;
        if grid.rows() != self.config.rows
            || grid.cols() != self.config.cols
            || grid.tile_size() != self.config.tile_size
        {
            return Err(PursuitError::ShapeMismatch(format!(
                "layout grid is {}x{} with tile {}, expected {}x{} with tile {}",
                grid.rows(),
                grid.cols(),
                grid.tile_size(),
                self.config.rows,
                self.config.cols,
                self.config.tile_size
            ))
            .into());
        }
        layout.validate()?;
        self.start(layout)
    }

    fn start(&mut self, layout: Layout) -> Result<PursuitObs> {
        trace!(
            "Start episode: player {:?}, pursuer {:?}, {} collectibles",
            layout.player,
            layout.pursuer,
            layout.collectibles.len()
        );
        let episode = Episode::new(layout, &self.config);
        let obs = self.observe(&episode);
        self.episode = Some(episode);
        Ok(obs)
    }

    fn observe(&self, episode: &Episode) -> PursuitObs {
        self.renderer
            .render(
                &episode.grid,
                &episode.player,
                &episode.pursuer.position(),
                &episode.collectibles,
            )
            .into()
    }

    /// Applies the game rules for one step and returns the reward and the
    /// record of a finished episode.
    fn advance(&mut self, dir: Direction) -> Result<(f32, bool, Record)> {
        let config = &self.config;
        let episode = self.episode.as_mut().ok_or_else(|| {
            PursuitError::InvalidState("step() called before reset()".into())
        })?;
        if episode.state == EpisodeState::Terminated {
            return Err(PursuitError::InvalidState(
                "step() called on a terminated episode; call reset()".into(),
            )
            .into());
        }
        episode.state = EpisodeState::Running;

        let (dx, dy) = dir.delta(config.step_size);
        let dest = episode.player.offset(dx, dy);
        if !episode.grid.is_blocked(dest) {
            episode.player = dest;
        }

        let branch = episode
            .pursuer
            .advance(&episode.grid, &episode.player, &mut self.rng);
        trace!("Pursuer moved to {:?} ({:?})", episode.pursuer.position(), branch);

        let radius = config.collision_radius;
        let mut reward = config.reward.step;
        let mut outcome = None;
        if episode.player.is_near(&episode.pursuer.position(), radius) {
            reward = config.reward.caught;
            outcome = Some("caught");
        } else if episode
            .collectibles
            .collect_near(&episode.player, radius)
            .is_some()
        {
            episode.score += 1;
            reward = config.reward.collect;
            if episode.collectibles.is_empty() {
                reward = config.reward.clear;
                outcome = Some("cleared");
            }
        }

        episode.steps += 1;
        episode.episode_return += reward;

        let mut record = Record::empty();
        if let Some(outcome) = outcome {
            episode.state = EpisodeState::Terminated;
            record.insert("outcome", RecordValue::String(outcome.to_string()));
            record.insert("score", RecordValue::Scalar(episode.score as f32));
        }

        Ok((reward, outcome.is_some(), record))
    }
}

impl Env for PursuitEnv {
    type Config = PursuitEnvConfig;
    type Obs = PursuitObs;
    type Act = PursuitAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            seed,
            rng: StdRng::seed_from_u64(seed as u64),
            renderer: Renderer::new(
                config.collision_radius,
                config.pursuer_radius,
                config.collectible_radius,
            ),
            episode: None,
        })
    }

    /// Order of rules in a step: the player moves unless blocked, the pursuer
    /// advances, then being caught is checked before collecting.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let dir = a
            .direction()
            .ok_or(PursuitError::InvalidAction(a.index()))?;
        let (reward, is_terminated, record) = self.advance(dir)?;
        let obs = match &self.episode {
            Some(episode) => self.observe(episode),
            None => return Err(PursuitError::InvalidState("no episode".into()).into()),
        };

        Ok((Step::new(obs, *a, reward, is_terminated, ()), record))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let grid = Grid::generate(
            self.config.rows,
            self.config.cols,
            self.config.tile_size,
            self.config.open_probability,
            &mut self.rng,
        );
        let layout = Layout::random(grid, &mut self.rng)?;
        self.start(layout)
    }

    /// Reseeds the generator with `seed + ix`, then resets.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = StdRng::seed_from_u64((self.seed as u64).wrapping_add(ix as u64));
        self.reset()
    }

    fn obs_shape(&self) -> Vec<usize> {
        self.config.obs_shape().to_vec()
    }

    fn n_actions(&self) -> usize {
        self.config.n_actions()
    }
}
