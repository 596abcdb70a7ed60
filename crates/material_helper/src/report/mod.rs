//! Conversion reporting
//!
//! The converter never logs into global state directly; it writes to a
//! [`LogSink`] handed in by the caller.

pub mod log_sink;

pub use log_sink::{BoundedLog, LogSink, NullLog};
