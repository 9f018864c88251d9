use super::{Collection, ParallelCollectorConfig, WorkerOutcome};
use crate::{error::TilerlError, Env, Episode, EpisodeError, EpisodeRunner, Model};
use anyhow::{anyhow, Result};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::{any::Any, thread};

type WorkerResult = thread::Result<Result<Episode, EpisodeError>>;

/// Runs a fixed set of [`EpisodeRunner`]s concurrently, one episode each.
///
/// Every worker builds its own [`Env`] from the shared configuration and
/// reads the model through a shared reference. [`ParallelCollector::collect`]
/// returns only after all workers have joined, so the model cannot be
/// updated while any worker still reads it.
pub struct ParallelCollector<E: Env> {
    /// Configuration of the environments built in workers.
    env_config: E::Config,

    /// Number of workers per round.
    n_workers: usize,

    /// Base seed.
    seed: u64,
}

impl<E> ParallelCollector<E>
where
    E: Env,
    E::Config: Sync,
{
    /// Builds a [`ParallelCollector`].
    pub fn build(
        config: &ParallelCollectorConfig,
        env_config: E::Config,
    ) -> Result<Self, TilerlError> {
        config.validate()?;
        Ok(Self {
            env_config,
            n_workers: config.n_workers,
            seed: config.seed,
        })
    }

    /// Number of workers per round.
    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    /// Seed of the environment and the action sampler of a worker in a round.
    fn worker_seed(&self, round: usize, id: usize) -> u64 {
        self.seed
            .wrapping_add((round as u64).wrapping_mul(self.n_workers as u64))
            .wrapping_add(id as u64)
    }

    /// Plays one episode in each worker and gathers the transitions.
    ///
    /// Failed workers, whether by an environment error or a panic, are
    /// reported in [`Collection::outcomes`] and contribute no transitions.
    /// A model error in any worker is returned as an error after all workers
    /// have joined.
    pub fn collect<M>(&self, model: &M, epsilon: f64, round: usize) -> Result<Collection>
    where
        M: Model + Sync + ?Sized,
    {
        let results: Vec<WorkerResult> = thread::scope(|s| {
            let handles = (0..self.n_workers)
                .map(|id| {
                    let seed = self.worker_seed(round, id);
                    let env_config = &self.env_config;
                    thread::Builder::new()
                        .name(format!("worker-{}", id))
                        .spawn_scoped(s, move || -> Result<Episode, EpisodeError> {
                            let mut rng = StdRng::seed_from_u64(seed);
                            let env = E::build(env_config, seed as i64)
                                .map_err(EpisodeError::Env)?;
                            EpisodeRunner::new(id).run(env, model, epsilon, &mut rng)
                        })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| match handle {
                    Ok(handle) => handle.join(),
                    Err(e) => Ok(Err(EpisodeError::Env(anyhow!("failed to spawn worker: {}", e)))),
                })
                .collect()
        });

        let mut collection = Collection::default();
        let mut model_error = None;

        for (id, result) in results.into_iter().enumerate() {
            let result = result.unwrap_or_else(|payload| {
                Err(EpisodeError::Env(anyhow!(
                    "worker panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

            match result {
                Ok(episode) => {
                    collection.outcomes.push(WorkerOutcome {
                        worker: id,
                        total_reward: episode.total_reward,
                        steps: episode.steps,
                        error: None,
                    });
                    collection.transitions.extend(episode.transitions);
                }
                Err(e) => {
                    warn!("Worker {} failed in round {}: {}", id, round, e);
                    collection.outcomes.push(WorkerOutcome {
                        worker: id,
                        total_reward: 0.,
                        steps: 0,
                        error: Some(e.to_string()),
                    });
                    if let EpisodeError::Model(e) = e {
                        model_error.get_or_insert(e);
                    }
                }
            }
        }

        if let Some(e) = model_error {
            return Err(e.context(format!("Model failed during collection in round {}", round)));
        }

        info!(
            "Round {}: collected {} transitions from {}/{} workers",
            round,
            collection.len(),
            self.n_workers - collection.n_failed(),
            self.n_workers
        );
        Ok(collection)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
