//! Shared utilities for the agora governance core.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
