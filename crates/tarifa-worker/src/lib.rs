//! Background comparison worker for Tarifa.
//!
//! The diff engine is synchronous. [`ComparisonWorker`] runs it on tokio's
//! blocking pool so callers can await a typed result, bounded by a timeout.
//! Only the most recent request matters: submitting a new one supersedes
//! whatever is still in flight.
//!
//! # Key Types
//!
//! - [`ComparisonWorker`] -- submits requests and tracks generations
//! - [`ComparisonRequest`] / [`ComparisonReply`] -- serializable messages
//! - [`WorkerConfig`] -- timeout settings
//! - [`WorkerError`] -- timeout, superseded, crashed or diff failure

pub mod config;
pub mod error;
pub mod message;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use message::{ComparisonReply, ComparisonRequest};
pub use worker::ComparisonWorker;
