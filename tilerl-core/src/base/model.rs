//! Action-value model.
use super::Obs;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Information returned by [`Model::fit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitSummary {
    /// Training loss of the update.
    pub loss: f32,
}

/// A model mapping an observation to one score per action.
///
/// `predict` takes `&self` and is called concurrently from collector
/// threads; `fit` takes `&mut self` and therefore never overlaps with them.
pub trait Model {
    /// Returns per-action scores for each of the given observations.
    fn predict(&self, states: &[Obs]) -> Result<Vec<Vec<f32>>>;

    /// Returns per-action scores for a single observation.
    fn predict_one(&self, state: &[f32]) -> Result<Vec<f32>> {
        self.predict(&[state.to_vec()])?
            .pop()
            .ok_or_else(|| anyhow!("Model returned no scores"))
    }

    /// Performs one update towards the given targets.
    fn fit(&mut self, states: &[Obs], targets: &[Vec<f32>]) -> Result<FitSummary>;

    /// Saves the parameters of the model in the given directory.
    fn save(&self, path: &Path) -> Result<()>;

    /// Loads the parameters of the model from the given directory.
    fn load(&mut self, path: &Path) -> Result<()>;
}
