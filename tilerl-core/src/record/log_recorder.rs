use super::{Record, RecordValue, Recorder};
use log::info;

/// Emits each record as a single `info` log line of sorted `key=value` pairs.
#[derive(Debug, Default)]
pub struct LogRecorder {}

impl LogRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats a record as sorted `key=value` pairs.
    pub fn format(record: &Record) -> String {
        let mut pairs: Vec<(&String, &RecordValue)> = record.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", Self::format(&record));
    }
}
