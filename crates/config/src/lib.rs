//! Configuration types for the inscriber service.

pub mod btcio;
pub mod config;

pub use btcio::{InscriberNetwork, UnknownNetworkError, WriterConfig};
pub use config::{Config, LoggingConfig, RpcConfig};
