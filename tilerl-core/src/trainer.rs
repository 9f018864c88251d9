//! Train a [`Model`] with experience from parallel workers.
mod config;
mod targets;
use crate::{
    error::TilerlError,
    record::{Record, RecordValue, Recorder},
    Env, Model, ParallelCollector, ReplayBuffer, TrainingState,
};
use anyhow::{Context, Result};
use chrono::Local;
pub use config::TrainerConfig;
use log::{info, warn};
use std::path::{Path, PathBuf};
pub use targets::compute_targets;

/// Phase of the training loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainerPhase {
    /// Workers are playing episodes.
    Collecting,

    /// The model is being updated on a sampled batch.
    Training,

    /// Exploration is being decayed.
    Decaying,

    /// All rounds have finished.
    Done,
}

/// Summary of a call of [`Trainer::train`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainStats {
    /// Number of rounds run.
    pub rounds: usize,

    /// Number of rounds with a model update.
    pub trained_rounds: usize,

    /// Number of failed workers over all rounds.
    pub failed_workers: usize,

    /// Number of transitions added to the replay buffer.
    pub transitions: usize,

    /// Epsilon after the last round.
    pub final_epsilon: f64,
}

/// Manages the training loop.
///
/// # Training loop
///
/// Each round goes through the following phases:
///
/// 1. [`TrainerPhase::Collecting`]: every worker of the [`ParallelCollector`]
///    plays one episode with the current epsilon, and the transitions of the
///    successful workers are added to the [`ReplayBuffer`].
/// 2. [`TrainerPhase::Training`]: if the buffer holds more than `batch_size`
///    transitions, a batch is sampled, targets are computed with
///    [`compute_targets`] and the model is updated once with [`Model::fit`].
///    A round in which every worker failed skips this phase.
/// 3. [`TrainerPhase::Decaying`]: epsilon is decayed once, whether or not the
///    model was updated.
///
/// Each round writes a [`Record`] to the given [`Recorder`]. Every
/// `save_interval` rounds the model is saved in `(model_dir)/(round)`, and
/// after the last round in `(model_dir)/final`.
pub struct Trainer {
    /// The number of rounds.
    episodes: usize,

    /// Batch size of model updates.
    batch_size: usize,

    /// Discount factor.
    gamma: f32,

    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Interval of saving in rounds.
    save_interval: Option<usize>,

    phase: TrainerPhase,
    stats: TrainStats,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self, TilerlError> {
        config.validate()?;
        Ok(Self {
            episodes: config.episodes,
            batch_size: config.batch_size,
            gamma: config.gamma,
            model_dir: config.model_dir,
            save_interval: config.save_interval,
            phase: TrainerPhase::Collecting,
            stats: TrainStats::default(),
        })
    }

    /// Current phase of the training loop.
    pub fn phase(&self) -> TrainerPhase {
        self.phase
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> &TrainStats {
        &self.stats
    }

    fn save_model<M: Model + ?Sized>(model: &M, path: &Path) -> Result<()> {
        model
            .save(path)
            .with_context(|| format!("Failed to save the model in {:?}", path))?;
        info!("Saved the model in {:?}", path);
        Ok(())
    }

    fn checkpoint_path(&self, round: usize) -> Option<PathBuf> {
        let model_dir = self.model_dir.as_ref()?;
        let interval = self.save_interval?;
        ((round + 1) % interval == 0)
            .then(|| Path::new(model_dir).join(format!("{}", round + 1)))
    }

    /// Runs one round: collect, possibly train, decay.
    ///
    /// Returns the record of the round. Errors of the model, during either
    /// collection or training, are returned; failures of individual workers
    /// are not.
    pub fn train_round<E, M>(
        &mut self,
        model: &mut M,
        collector: &ParallelCollector<E>,
        buffer: &mut ReplayBuffer,
        state: &mut TrainingState,
    ) -> Result<Record>
    where
        E: Env,
        E::Config: Sync,
        M: Model + Sync + ?Sized,
    {
        let round = state.round();
        let epsilon = state.epsilon();
        let mut record = Record::from_scalar("round", round as f32);
        record.insert("timestamp", RecordValue::DateTime(Local::now()));
        record.insert("epsilon", RecordValue::Scalar(epsilon as f32));

        // Collecting
        self.phase = TrainerPhase::Collecting;
        let collection = collector.collect(&*model, epsilon, round)?;
        for outcome in collection.outcomes.iter() {
            let key = |name: &str| format!("worker_{}_{}", outcome.worker, name);
            let status = match outcome.error {
                None => "ok",
                Some(_) => "failed",
            };
            record.insert(key("reward"), RecordValue::Scalar(outcome.total_reward));
            record.insert(key("steps"), RecordValue::Scalar(outcome.steps as f32));
            record.insert(key("status"), RecordValue::String(status.to_string()));
        }
        if collection.all_failed() {
            warn!(
                "Round {}: {}, training is skipped",
                round,
                TilerlError::AllWorkersFailed(collection.outcomes.len())
            );
        }
        self.stats.failed_workers += collection.n_failed();
        self.stats.transitions += collection.len();
        record.insert("n_transitions", RecordValue::Scalar(collection.len() as f32));

        let all_failed = collection.all_failed();
        for tr in collection.transitions {
            buffer.add(tr);
        }
        record.insert("buffer_len", RecordValue::Scalar(buffer.len() as f32));

        // Training
        if !all_failed && buffer.len() > self.batch_size {
            self.phase = TrainerPhase::Training;
            let batch = buffer.sample(self.batch_size)?;
            let targets = compute_targets(&*model, &batch, self.gamma)?;
            let summary = model.fit(&batch.states, &targets)?;

            let n = targets.iter().map(|t| t.len()).sum::<usize>().max(1);
            let mean_q = targets.iter().flatten().sum::<f32>() / n as f32;
            info!(
                "Round {} - loss: {:.4}, mean target Q: {:.4}",
                round, summary.loss, mean_q
            );
            record.insert("loss", RecordValue::Scalar(summary.loss));
            record.insert("mean_q", RecordValue::Scalar(mean_q));
            self.stats.trained_rounds += 1;
        }

        // Decaying
        self.phase = TrainerPhase::Decaying;
        state.decay();
        state.next_round();
        self.stats.rounds += 1;
        self.stats.final_epsilon = state.epsilon();

        Ok(record)
    }

    /// Runs rounds until `state` reaches the configured number of rounds.
    pub fn train<E, M, R>(
        &mut self,
        model: &mut M,
        collector: &ParallelCollector<E>,
        buffer: &mut ReplayBuffer,
        state: &mut TrainingState,
        recorder: &mut R,
    ) -> Result<TrainStats>
    where
        E: Env,
        E::Config: Sync,
        M: Model + Sync + ?Sized,
        R: Recorder + ?Sized,
    {
        self.stats = TrainStats {
            final_epsilon: state.epsilon(),
            ..TrainStats::default()
        };
        info!("Starts training for {} rounds", self.episodes);

        while state.round() < self.episodes {
            let round = state.round();
            let record = self.train_round(model, collector, buffer, state)?;
            recorder.write(record);

            if let Some(path) = self.checkpoint_path(round) {
                if let Err(e) = Self::save_model(&*model, &path) {
                    warn!("{:#}", e);
                }
            }
        }

        self.phase = TrainerPhase::Done;
        if let Some(model_dir) = &self.model_dir {
            Self::save_model(&*model, &Path::new(model_dir).join("final"))?;
        }
        info!(
            "Training complete: {} rounds, {} with a model update, final epsilon {:.4}",
            self.stats.rounds, self.stats.trained_rounds, self.stats.final_epsilon
        );
        Ok(self.stats.clone())
    }
}
