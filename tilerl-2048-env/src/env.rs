use crate::{Board, Game2048Config, RewardMode};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};
use tilerl_core::{error::TilerlError, Action, Env, Obs, Step};

/// A 2048 game session.
pub struct Game2048 {
    config: Game2048Config,
    seed: i64,
    rng: StdRng,
    board: Board,
    score: u32,
    n_stalls: usize,
    closed: bool,
}

impl Game2048 {
    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Score accumulated since the last reset.
    pub fn score(&self) -> u32 {
        self.score
    }

    fn obs(&self) -> Obs {
        self.board
            .cells()
            .iter()
            .map(|&v| self.config.obs_encoding.encode(v))
            .collect()
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(TilerlError::EnvClosed.into());
        }
        Ok(())
    }
}

impl Env for Game2048 {
    type Config = Game2048Config;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            seed,
            rng: StdRng::seed_from_u64(seed as u64),
            board: Board::default(),
            score: 0,
            n_stalls: 0,
            closed: false,
        })
    }

    fn reset(&mut self) -> Result<Obs> {
        self.check_open()?;
        self.board = Board::default();
        self.score = 0;
        self.n_stalls = 0;
        self.board.spawn(&mut self.rng);
        self.board.spawn(&mut self.rng);
        Ok(self.obs())
    }

    fn step(&mut self, act: Action) -> Result<Step> {
        self.check_open()?;
        let points = match self.board.shift(act) {
            Some(points) => {
                self.score += points;
                self.n_stalls = 0;
                self.board.spawn(&mut self.rng);
                points
            }
            None => {
                self.n_stalls += 1;
                0
            }
        };
        trace!("Game {}: {}, score = {}\n{}", self.seed, act, self.score, self.board);

        let reward = match self.config.reward_mode {
            RewardMode::Score => self.score as f32,
            RewardMode::ScoreDelta => points as f32,
        };
        let is_done = !self.board.has_legal_move() || self.n_stalls >= self.config.stall_limit;
        Ok(Step::new(self.obs(), reward, is_done))
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            debug!(
                "Game {} closed, score = {}, max tile = {}",
                self.seed,
                self.score,
                self.board.max_tile()
            );
        }
        Ok(())
    }
}
