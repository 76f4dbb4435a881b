//! Types and traits for recording training metrics.
//!
//! # Core Components
//!
//! * [`Record`] - A container for key-value pairs of various data types
//! * [`RecordValue`] - An enum of the types of values that can be stored
//! * [`Recorder`] - A trait defining the output destination of records
//! * [`BufferedRecorder`] - A recorder that keeps records in memory
//! * [`LogRecorder`] - A recorder that writes records through the `log` facade
//! * [`NullRecorder`] - A recorder that discards all records
//!
//! # Basic Usage
//!
//! ```rust
//! use pursuit_core::record::{Record, RecordValue};
//!
//! let episode = 1;
//! let episode_return = -37f32;
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(episode as f32));
//! record.insert("return", RecordValue::Scalar(episode_return));
//! record.insert("outcome", RecordValue::String("caught".to_string()));
//! ```
//!
//! The [`Trainer`](crate::Trainer) writes one record per completed episode.
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
