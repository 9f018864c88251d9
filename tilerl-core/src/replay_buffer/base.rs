use super::{ReplayBufferConfig, TransitionBatch};
use crate::{error::TilerlError, Transition};
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::collections::{vec_deque, VecDeque};

/// A replay buffer of fixed capacity.
///
/// Transitions are evicted in insertion order once the buffer is full.
/// Sampling is uniform without replacement.
pub struct ReplayBuffer {
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Stored transitions, oldest first.
    transitions: VecDeque<Transition>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl ReplayBuffer {
    /// Creates an empty replay buffer.
    pub fn build(config: &ReplayBufferConfig) -> Result<Self, TilerlError> {
        config.validate()?;
        Ok(Self {
            capacity: config.capacity,
            transitions: VecDeque::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Appends a transition, evicting the oldest one if the buffer is full.
    pub fn add(&mut self, tr: Transition) {
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(tr);
    }

    /// Samples `batch_size` distinct transitions uniformly at random.
    ///
    /// Fails without touching the buffer if `batch_size > self.len()`.
    pub fn sample(&mut self, batch_size: usize) -> Result<TransitionBatch, TilerlError> {
        let available = self.transitions.len();
        if batch_size > available {
            return Err(TilerlError::InsufficientData {
                requested: batch_size,
                available,
            });
        }

        let ixs = index::sample(&mut self.rng, available, batch_size);
        let mut batch = TransitionBatch::with_capacity(batch_size);
        for ix in ixs.iter() {
            batch.push(ix, &self.transitions[ix]);
        }
        Ok(batch)
    }

    /// Returns the current number of transitions in the buffer.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if the buffer holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over stored transitions, oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, Transition> {
        self.transitions.iter()
    }
}
