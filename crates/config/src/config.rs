use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::btcio::WriterConfig;

/// Default value for `port` in [`RpcConfig`].
const DEFAULT_RPC_PORT: u16 = 8547;

/// Default value for `host` in [`RpcConfig`].
const DEFAULT_RPC_HOST: &str = "127.0.0.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Addr that the rpc server will listen to.
    #[serde(default = "default_rpc_host")]
    pub host: String,

    /// Port that the rpc server will listen to.
    #[serde(default = "default_rpc_port")]
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: default_rpc_host(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

fn default_rpc_host() -> String {
    DEFAULT_RPC_HOST.to_owned()
}

fn default_rpc_port() -> u16 {
    DEFAULT_RPC_PORT
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Service label to append to the service name (e.g., "prod", "dev").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_label: Option<String>,

    /// Directory path for file-based logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Prefix for log file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_prefix: Option<String>,

    /// Use JSON format for logs instead of compact format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,

    pub writer: WriterConfig,

    /// Logging configuration (optional section in TOML).
    #[serde(default)]
    pub logging: LoggingConfig,
}
