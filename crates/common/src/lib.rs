//! Shared utilities for inscriber binaries.

pub mod logging;
