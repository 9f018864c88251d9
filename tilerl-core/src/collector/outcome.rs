use crate::Transition;

/// Result of one worker in a collection round.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerOutcome {
    /// Worker id.
    pub worker: usize,

    /// Sum of rewards of the episode, 0 if the worker failed.
    pub total_reward: f32,

    /// Number of steps of the episode, 0 if the worker failed.
    pub steps: usize,

    /// Error message if the worker failed.
    pub error: Option<String>,
}

impl WorkerOutcome {
    /// Returns `true` if the worker finished its episode.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Transitions gathered in a round, with per-worker outcomes.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    /// Transitions of successful workers, grouped by worker in id order.
    pub transitions: Vec<Transition>,

    /// One outcome per worker, in id order.
    pub outcomes: Vec<WorkerOutcome>,
}

impl Collection {
    /// Number of workers that failed.
    pub fn n_failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Returns `true` if every worker failed.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.n_failed() == self.outcomes.len()
    }

    /// Number of collected transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if no transition was collected.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
