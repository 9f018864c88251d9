//! Runs a single episode on an environment.
use crate::{select_action, Env, EnvGuard, Model, Step, Transition};
use log::{debug, info};
use rand::Rng;
use thiserror::Error;

/// Transitions of one finished episode.
#[derive(Clone, Debug, Default)]
pub struct Episode {
    /// Transitions in the order they were generated.
    pub transitions: Vec<Transition>,

    /// Sum of rewards over the episode.
    pub total_reward: f32,

    /// Number of environment steps.
    pub steps: usize,
}

/// Failure of an episode, split by the collaborator that caused it.
#[derive(Error, Debug)]
pub enum EpisodeError {
    /// The environment failed to build, reset, step or close.
    #[error("environment error: {0:#}")]
    Env(anyhow::Error),

    /// The model failed to score an observation.
    #[error("model error: {0:#}")]
    Model(anyhow::Error),
}

/// Drives one environment through a full episode.
#[derive(Clone, Copy, Debug)]
pub struct EpisodeRunner {
    id: usize,
}

impl EpisodeRunner {
    /// Creates a runner with the given worker id, used in logs.
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    /// Returns the worker id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Plays an episode from reset to termination.
    ///
    /// The environment is consumed and closed on every path. The episode has
    /// no step limit; termination is up to the environment. On error the
    /// transitions collected so far are discarded.
    pub fn run<E, M, R>(
        &self,
        env: E,
        model: &M,
        epsilon: f64,
        rng: &mut R,
    ) -> Result<Episode, EpisodeError>
    where
        E: Env,
        M: Model + ?Sized,
        R: Rng,
    {
        let mut env = EnvGuard::new(env);
        let episode = self.play(&mut env, model, epsilon, rng)?;
        env.close().map_err(EpisodeError::Env)?;

        info!(
            "Worker {}: episode complete, total reward = {}, steps = {}",
            self.id, episode.total_reward, episode.steps
        );
        Ok(episode)
    }

    fn play<E, M, R>(
        &self,
        env: &mut EnvGuard<E>,
        model: &M,
        epsilon: f64,
        rng: &mut R,
    ) -> Result<Episode, EpisodeError>
    where
        E: Env,
        M: Model + ?Sized,
        R: Rng,
    {
        let mut state = env.reset().map_err(EpisodeError::Env)?;
        let mut episode = Episode::default();

        loop {
            let action =
                select_action(model, &state, epsilon, rng).map_err(EpisodeError::Model)?;
            let Step {
                obs,
                reward,
                is_done,
            } = env.step(action).map_err(EpisodeError::Env)?;
            debug!(
                "Worker {}: step {}, action = {}, reward = {}",
                self.id, episode.steps, action, reward
            );

            episode.total_reward += reward;
            episode.steps += 1;
            episode
                .transitions
                .push(Transition::new(state, action, reward, obs.clone(), is_done));

            if is_done {
                break;
            }
            state = obs;
        }

        Ok(episode)
    }
}
