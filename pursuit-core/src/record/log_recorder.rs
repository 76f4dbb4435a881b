use super::{Record, Recorder};
use log::info;

/// A recorder writing each record as a single `info` log line.
pub struct LogRecorder {
    prefix: String,
}

impl LogRecorder {
    /// Constructs the recorder. `prefix` is put at the head of every line.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LogRecorder {
    fn default() -> Self {
        Self::new("train")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        if !record.is_empty() {
            info!("[{}] {}", self.prefix, record.to_line());
        }
    }
}
