use crate::{Action, Obs, Transition};

/// A batch of transitions sampled from a [`ReplayBuffer`](super::ReplayBuffer).
///
/// All fields have the same length; the `i`-th element of each field comes
/// from the same transition.
#[derive(Clone, Debug, Default)]
pub struct TransitionBatch {
    /// Observations `o_t`.
    pub states: Vec<Obs>,

    /// Actions `a_t`.
    pub actions: Vec<Action>,

    /// Rewards `r_t`.
    pub rewards: Vec<f32>,

    /// Next observations `o_t+1`.
    pub next_states: Vec<Obs>,

    /// Termination flags `is_done_t`.
    pub is_done: Vec<bool>,

    /// Indices in the buffer from which the transitions were taken.
    pub ixs: Vec<usize>,
}

impl TransitionBatch {
    pub(super) fn with_capacity(n: usize) -> Self {
        Self {
            states: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            next_states: Vec::with_capacity(n),
            is_done: Vec::with_capacity(n),
            ixs: Vec::with_capacity(n),
        }
    }

    pub(super) fn push(&mut self, ix: usize, tr: &Transition) {
        self.states.push(tr.state().to_vec());
        self.actions.push(tr.action());
        self.rewards.push(tr.reward());
        self.next_states.push(tr.next_state().to_vec());
        self.is_done.push(tr.is_done());
        self.ixs.push(ix);
    }

    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.ixs.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.ixs.is_empty()
    }
}
