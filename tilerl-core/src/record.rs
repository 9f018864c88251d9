//! Per-round metrics of a training run.
//!
//! The [`Trainer`](crate::Trainer) builds one [`Record`] per round and hands
//! it to a [`Recorder`]. A record is a flat map from string keys to
//! [`RecordValue`]s:
//!
//! ```rust
//! use tilerl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("round", 0.0);
//! record.insert("epsilon", RecordValue::Scalar(1.0));
//! record.insert("worker_0_status", RecordValue::String("ok".to_string()));
//! assert_eq!(record.get_scalar("epsilon").unwrap(), 1.0);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use recorder::Recorder;
