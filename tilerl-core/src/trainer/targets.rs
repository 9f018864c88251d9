use crate::{error::TilerlError, Action, Model, TransitionBatch};
use anyhow::{ensure, Result};

/// Computes one-step bootstrapped targets for a batch.
///
/// The target of the `i`-th transition is the current score vector of its
/// state with the entry of the taken action replaced by
/// `r + gamma * max_a Q(s', a)`, or by `r` alone if the episode ended there.
pub fn compute_targets<M>(model: &M, batch: &TransitionBatch, gamma: f32) -> Result<Vec<Vec<f32>>>
where
    M: Model + ?Sized,
{
    let q = model.predict(&batch.states)?;
    let q_next = model.predict(&batch.next_states)?;
    ensure!(
        q.len() == batch.len() && q_next.len() == batch.len(),
        "Model returned {} and {} score vectors for a batch of {}",
        q.len(),
        q_next.len(),
        batch.len()
    );

    q.into_iter()
        .zip(q_next.iter())
        .enumerate()
        .map(|(i, (mut target, next))| -> Result<Vec<f32>> {
            for scores in [&target, next] {
                if scores.len() != Action::COUNT {
                    return Err(TilerlError::ModelOutput {
                        expected: Action::COUNT,
                        got: scores.len(),
                    }
                    .into());
                }
            }
            let future = if batch.is_done[i] {
                0.0
            } else {
                gamma * next.iter().copied().fold(f32::NEG_INFINITY, f32::max)
            };
            target[batch.actions[i].index()] = batch.rewards[i] + future;
            Ok(target)
        })
        .collect()
}
