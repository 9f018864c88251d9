//! The 2048 sliding-tile game as a tilerl [`Env`](tilerl_core::Env).
//!
//! The game runs in-process on a 4x4 [`Board`]. After every move that changes
//! the board a new tile is spawned: a 2 with probability 0.9, otherwise a 4.
//! An episode ends when no move can change the board, or when the agent
//! keeps choosing moves that leave the board unchanged for
//! [`Game2048Config::stall_limit`] consecutive steps.
mod board;
mod config;
mod env;
pub use board::{Board, N_CELLS, SIZE};
pub use config::{Game2048Config, ObsEncoding, RewardMode};
pub use env::Game2048;
