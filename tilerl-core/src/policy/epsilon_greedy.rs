use crate::{error::TilerlError, Action, Model};
use anyhow::Result;
use rand::Rng;

/// Returns the action with the highest score.
///
/// Ties go to the lowest index. Fails if `scores` does not hold exactly one
/// score per action.
pub fn greedy_action(scores: &[f32]) -> Result<Action, TilerlError> {
    if scores.len() != Action::COUNT {
        return Err(TilerlError::ModelOutput {
            expected: Action::COUNT,
            got: scores.len(),
        });
    }

    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    Ok(Action::ALL[best])
}

/// Takes an action with the epsilon-greedy rule.
///
/// With probability `epsilon` a uniformly random action is returned and the
/// model is not queried. Otherwise the greedy action on the model's scores
/// for `state` is returned.
pub fn select_action<M, R>(model: &M, state: &[f32], epsilon: f64, rng: &mut R) -> Result<Action>
where
    M: Model + ?Sized,
    R: Rng,
{
    if rng.gen::<f64>() < epsilon {
        return Ok(Action::ALL[rng.gen_range(0..Action::COUNT)]);
    }

    let scores = model.predict_one(state)?;
    Ok(greedy_action(&scores)?)
}

#[cfg(test)]
mod tests {
    use super::{greedy_action, select_action};
    use crate::{error::TilerlError, test_utils::FnModel, test_utils::right_model, Action};
    use anyhow::Result;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_greedy_first_argmax() -> Result<()> {
        assert_eq!(greedy_action(&[1., 3., 3., 2.])?, Action::Down);
        assert_eq!(greedy_action(&[7., 7., 7., 7.])?, Action::Up);
        assert_eq!(greedy_action(&[-1., -2., 0., 0.])?, Action::Left);
        Ok(())
    }

    #[test]
    fn test_greedy_rejects_wrong_length() {
        assert!(matches!(
            greedy_action(&[1., 2.]),
            Err(TilerlError::ModelOutput {
                expected: 4,
                got: 2
            })
        ));
    }

    #[test]
    fn test_zero_epsilon_exploits() -> Result<()> {
        let model = right_model();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(select_action(&model, &[0.], 0.0, &mut rng)?, Action::Right);
        }
        Ok(())
    }

    #[test]
    fn test_full_epsilon_explores_without_model() -> Result<()> {
        // Any query of this model would fail.
        let model = FnModel::new(|_: &[f32]| vec![]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(select_action(&model, &[0.], 1.0, &mut rng)?);
        }
        assert_eq!(seen.len(), Action::COUNT);
        Ok(())
    }

    #[test]
    fn test_bad_model_output_is_error() {
        let model = FnModel::new(|_: &[f32]| vec![1.]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(select_action(&model, &[0.], 0.0, &mut rng).is_err());
    }
}
