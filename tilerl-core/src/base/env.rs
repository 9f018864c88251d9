//! Environment.
use super::{Action, Obs};
use anyhow::Result;
use log::warn;
use std::ops::{Deref, DerefMut};

/// Outcome of an environment step, `(o_t+1, r_t, is_done_t)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Observation after the action.
    pub obs: Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode is terminated.
    pub is_done: bool,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(obs: Obs, reward: f32, is_done: bool) -> Self {
        Self {
            obs,
            reward,
            is_done,
        }
    }
}

/// Represents an environment, typically a game session.
///
/// An instance is owned by a single episode runner and is never shared
/// between threads. Termination is signalled by [`Step::is_done`]; episode
/// length is bounded only by the environment itself.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns the initial observation.
    fn reset(&mut self) -> Result<Obs>;

    /// Performs an environment step.
    fn step(&mut self, act: Action) -> Result<Step>;

    /// Releases resources held by the environment.
    ///
    /// Must be safe to call more than once.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Owns an [`Env`] and closes it when dropped.
///
/// Use [`EnvGuard::close`] on the success path to observe close errors;
/// on early return the guard closes the environment and only logs errors.
pub struct EnvGuard<E: Env> {
    env: E,
    closed: bool,
}

impl<E: Env> EnvGuard<E> {
    /// Takes ownership of the environment.
    pub fn new(env: E) -> Self {
        Self { env, closed: false }
    }

    /// Closes the environment. Subsequent calls are no-ops.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.env.close()
    }

    /// Returns `true` if the environment has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<E: Env> Deref for EnvGuard<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.env
    }
}

impl<E: Env> DerefMut for EnvGuard<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.env
    }
}

impl<E: Env> Drop for EnvGuard<E> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close environment: {:#}", e);
        }
    }
}
