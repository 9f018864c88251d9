//! Environments and models used in tests.
use crate::{Action, Env, FitSummary, Model, Obs, Step};
use anyhow::{bail, Result};
use std::{
    fs,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// Counts calls of [`Env::close`] across environments built from one config.
#[derive(Clone, Debug, Default)]
pub struct CloseCounter(Arc<AtomicUsize>);

impl CloseCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn incr(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Debug)]
pub struct MockEnvConfig {
    pub episode_len: usize,
    pub failing_seeds: Vec<i64>,
    pub panicking_seeds: Vec<i64>,
    pub fail_at_step: Option<usize>,
    closes: CloseCounter,
}

impl MockEnvConfig {
    pub fn new(episode_len: usize) -> Self {
        Self {
            episode_len,
            failing_seeds: vec![],
            panicking_seeds: vec![],
            fail_at_step: None,
            closes: CloseCounter::default(),
        }
    }

    pub fn failing_seeds(mut self, v: Vec<i64>) -> Self {
        self.failing_seeds = v;
        self
    }

    pub fn panicking_seeds(mut self, v: Vec<i64>) -> Self {
        self.panicking_seeds = v;
        self
    }

    pub fn fail_at_step(mut self, v: usize) -> Self {
        self.fail_at_step = Some(v);
        self
    }

    pub fn close_counter(&self) -> CloseCounter {
        self.closes.clone()
    }
}

/// Observation is `[seed, t]`, reward is 1 per step, episode ends after
/// `episode_len` steps.
pub struct MockEnv {
    config: MockEnvConfig,
    seed: i64,
    t: usize,
}

impl MockEnv {
    pub fn close_counter(&self) -> CloseCounter {
        self.config.closes.clone()
    }

    fn obs(&self) -> Obs {
        vec![self.seed as f32, self.t as f32]
    }
}

impl Env for MockEnv {
    type Config = MockEnvConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            seed,
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<Obs> {
        if self.config.failing_seeds.contains(&self.seed) {
            bail!("mock env {} failed on reset", self.seed);
        }
        if self.config.panicking_seeds.contains(&self.seed) {
            panic!("mock env {} panicked on reset", self.seed);
        }
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, _act: Action) -> Result<Step> {
        if self.config.fail_at_step == Some(self.t) {
            bail!("mock env {} failed at step {}", self.seed, self.t);
        }
        self.t += 1;
        let is_done = self.t >= self.config.episode_len;
        Ok(Step::new(self.obs(), 1.0, is_done))
    }

    fn close(&mut self) -> Result<()> {
        self.config.closes.incr();
        Ok(())
    }
}

/// A model whose scores are given by a function of the observation.
pub struct FnModel<F>
where
    F: Fn(&[f32]) -> Vec<f32> + Sync,
{
    f: F,
    pub n_fits: usize,
    pub last_targets: Vec<Vec<f32>>,
    pub fail_fit: bool,
}

impl<F> FnModel<F>
where
    F: Fn(&[f32]) -> Vec<f32> + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            n_fits: 0,
            last_targets: vec![],
            fail_fit: false,
        }
    }
}

impl<F> Model for FnModel<F>
where
    F: Fn(&[f32]) -> Vec<f32> + Sync,
{
    fn predict(&self, states: &[Obs]) -> Result<Vec<Vec<f32>>> {
        Ok(states.iter().map(|s| (self.f)(s)).collect())
    }

    fn fit(&mut self, _states: &[Obs], targets: &[Vec<f32>]) -> Result<FitSummary> {
        if self.fail_fit {
            bail!("fit failed");
        }
        self.n_fits += 1;
        self.last_targets = targets.to_vec();
        Ok(FitSummary { loss: 0.5 })
    }

    fn save(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(path.join("model.txt"), format!("{}", self.n_fits))?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.n_fits = fs::read_to_string(path.join("model.txt"))?.parse()?;
        Ok(())
    }
}

/// Scores `[0, 0, 0, 1]`, so the greedy action is always [`Action::Right`].
pub fn right_model() -> FnModel<fn(&[f32]) -> Vec<f32>> {
    fn f(_: &[f32]) -> Vec<f32> {
        vec![0., 0., 0., 1.]
    }
    FnModel::new(f as fn(&[f32]) -> Vec<f32>)
}
