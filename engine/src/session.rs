use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{EngineError, Result},
    grid::{Grid, Position},
    history::{History, Snapshot},
    moves::{self, Direction},
    spawn::{spawn_tile, SpawnedTile, TileDistribution},
};

/// Where the best score lives between processes. Loaded once when attached to
/// a session and stored every time the session raises it.
pub trait BestScoreSink {
    fn load(&mut self) -> u64;
    fn store(&mut self, best: u64);
}

/// Keeps nothing; every process starts from a best score of 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl BestScoreSink for NullSink {
    fn load(&mut self) -> u64 {
        0
    }

    fn store(&mut self, _best: u64) {}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    GameOver,
}

/// A state change the caller should announce.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Won,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub grid: Grid,
    pub score: u64,
    pub best_score: u64,
    pub history_len: usize,
    pub state: GameState,
    pub keep_playing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub moved: bool,
    pub spawned: Option<SpawnedTile>,
    pub merged: Vec<Position>,
    pub grid: Grid,
    pub score: u64,
    pub score_delta: u64,
    pub best_score: u64,
    pub state: GameState,
    pub transition: Option<Transition>,
}

/// One game in progress plus everything that outlives a single game: the
/// best score, the random source and the configuration.
pub struct Session<R = StdRng> {
    config: Config,
    tiles: TileDistribution,
    grid: Grid,
    score: u64,
    best_score: u64,
    won: bool,
    game_over: bool,
    keep_playing: bool,
    history: History,
    rng: R,
    sink: Box<dyn BestScoreSink>,
}

impl Session<StdRng> {
    pub fn with_seed(config: Config, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: Config) -> Result<Self> {
        Self::new(config, StdRng::from_os_rng())
    }
}

impl<R: Rng> Session<R> {
    /// Start a fresh game with two spawned tiles.
    pub fn new(config: Config, rng: R) -> Result<Self> {
        let mut s = Self::empty(config, rng)?;
        s.new_game();
        Ok(s)
    }

    /// Resume from a known board with a score of 0 and no history.
    pub fn from_grid(config: Config, grid: Grid, rng: R) -> Result<Self> {
        if grid.size() != config.size {
            return Err(EngineError::InvalidGrid(format!(
                "grid is {}x{}, configured size is {}",
                grid.size(),
                grid.size(),
                config.size
            )));
        }
        let mut s = Self::empty(config, rng)?;
        s.grid = grid;
        Ok(s)
    }

    fn empty(config: Config, rng: R) -> Result<Self> {
        config.validate()?;
        let tiles = TileDistribution::new(config.four_probability)?;
        Ok(Session {
            grid: Grid::new(config.size),
            history: History::new(config.history_limit),
            config,
            tiles,
            score: 0,
            best_score: 0,
            won: false,
            game_over: false,
            keep_playing: false,
            rng,
            sink: Box::new(NullSink),
        })
    }

    /// Attach a best-score store, taking its saved value if it beats ours.
    pub fn with_sink(mut self, mut sink: impl BestScoreSink + 'static) -> Self {
        self.best_score = self.best_score.max(sink.load());
        self.sink = Box::new(sink);
        self
    }

    pub fn new_game(&mut self) -> SessionView {
        self.grid = Grid::new(self.config.size);
        self.score = 0;
        self.history.clear();
        self.won = false;
        self.game_over = false;
        self.keep_playing = false;

        spawn_tile(&mut self.grid, &self.tiles, &mut self.rng);
        spawn_tile(&mut self.grid, &self.tiles, &mut self.rng);
        info!("new {0}x{0} game", self.config.size);

        self.view()
    }

    pub fn make_move(&mut self, direction: Direction) -> MoveResult {
        if self.game_over && !self.keep_playing {
            debug!("ignoring {direction}, game is over");
            return self.unmoved();
        }

        let outcome = moves::resolve(&self.grid, direction);
        if !outcome.moved {
            debug!("{direction} changes nothing");
            return self.unmoved();
        }

        let previous = Snapshot {
            grid: std::mem::replace(&mut self.grid, outcome.grid),
            score: self.score,
        };
        self.history.push(previous);
        self.score += outcome.score_delta;

        let spawned = spawn_tile(&mut self.grid, &self.tiles, &mut self.rng);
        self.raise_best();

        let mut transition = None;
        if self.grid.contains(self.config.win_tile) && !self.won && !self.keep_playing {
            self.won = true;
            transition = Some(Transition::Won);
            info!("reached {} with score {}", self.config.win_tile, self.score);
        } else if self.grid.is_full() && !self.grid.has_adjacent_equal() {
            self.game_over = true;
            transition = Some(Transition::GameOver);
            info!("game over with score {}", self.score);
        }

        debug!(
            "{direction}: +{} -> {}, {} merges",
            outcome.score_delta,
            self.score,
            outcome.merged.len()
        );

        MoveResult {
            moved: true,
            spawned,
            merged: outcome.merged,
            grid: self.grid.clone(),
            score: self.score,
            score_delta: outcome.score_delta,
            best_score: self.best_score,
            state: self.state(),
            transition,
        }
    }

    /// Step back one committed move. Undo always leaves the game playable
    /// again but never takes back a win.
    pub fn undo(&mut self) -> SessionView {
        if let Some(prev) = self.history.pop() {
            self.grid = prev.grid;
            self.score = prev.score;
            self.game_over = false;
            debug!("undo, {} snapshots left", self.history.len());
        }
        self.view()
    }

    pub fn continue_game(&mut self) -> Result<()> {
        if self.state() != GameState::Won {
            return Err(EngineError::NotWon);
        }
        self.keep_playing = true;
        Ok(())
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        moves::can_move(&self.grid, direction)
    }

    fn raise_best(&mut self) {
        if self.score > self.best_score {
            self.best_score = self.score;
            self.sink.store(self.best_score);
        }
    }

    fn unmoved(&self) -> MoveResult {
        MoveResult {
            moved: false,
            spawned: None,
            merged: Vec::new(),
            grid: self.grid.clone(),
            score: self.score,
            score_delta: 0,
            best_score: self.best_score,
            state: self.state(),
            transition: None,
        }
    }
}

impl<R> Session<R> {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn keep_playing(&self) -> bool {
        self.keep_playing
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> GameState {
        if self.game_over {
            GameState::GameOver
        } else if self.won && !self.keep_playing {
            GameState::Won
        } else {
            GameState::Playing
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            grid: self.grid.clone(),
            score: self.score,
            best_score: self.best_score,
            history_len: self.history.len(),
            state: self.state(),
            keep_playing: self.keep_playing,
        }
    }
}
