use super::{Action, Obs};

/// A transition `(o_t, a_t, r_t, o_t+1, is_done_t)`.
///
/// Fields are read-only once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    state: Obs,
    action: Action,
    reward: f32,
    next_state: Obs,
    is_done: bool,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(state: Obs, action: Action, reward: f32, next_state: Obs, is_done: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            is_done,
        }
    }

    /// Returns `o_t`.
    pub fn state(&self) -> &[f32] {
        &self.state
    }

    /// Returns `a_t`.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns `r_t`.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// Returns `o_t+1`.
    pub fn next_state(&self) -> &[f32] {
        &self.next_state
    }

    /// Returns `is_done_t`.
    pub fn is_done(&self) -> bool {
        self.is_done
    }
}
