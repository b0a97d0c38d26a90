use std::{fmt, str::FromStr};

use bitcoin::Network;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on the fee rate a reveal request may ask for, in sat/vB.
const DEFAULT_MAX_FEE_RATE: u64 = 1_000;

/// Default number of commits that may wait for a reveal at the same time.
const DEFAULT_MAX_PENDING_SESSIONS: usize = 1_024;

/// Bitcoin networks the inscriber can build transactions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InscriberNetwork {
    Mainnet,
    Testnet,
    Signet,
    Regtest,
}

impl InscriberNetwork {
    /// Maps to the network type used by the `bitcoin` crate.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            Self::Mainnet => Network::Bitcoin,
            Self::Testnet => Network::Testnet,
            Self::Signet => Network::Signet,
            Self::Regtest => Network::Regtest,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Signet => "signet",
            Self::Regtest => "regtest",
        }
    }
}

impl From<InscriberNetwork> for Network {
    fn from(value: InscriberNetwork) -> Self {
        value.to_bitcoin_network()
    }
}

impl fmt::Display for InscriberNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown network: '{0}'")]
pub struct UnknownNetworkError(pub String);

impl FromStr for InscriberNetwork {
    type Err = UnknownNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "signet" => Ok(Self::Signet),
            "regtest" => Ok(Self::Regtest),
            _ => Err(UnknownNetworkError(s.to_owned())),
        }
    }
}

/// Configuration for the commit/reveal writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Network commit addresses are encoded for and reveal destinations must belong to.
    pub network: InscriberNetwork,

    /// Highest fee rate, in sat/vB, a reveal is allowed to pay.
    #[serde(default = "default_max_fee_rate")]
    pub max_fee_rate: u64,

    /// Most commits allowed to wait for a reveal at once. Further commits are rejected until a
    /// pending one is revealed or abandoned.
    #[serde(default = "default_max_pending_sessions")]
    pub max_pending_sessions: usize,
}

impl WriterConfig {
    pub fn new(network: InscriberNetwork) -> Self {
        Self {
            network,
            max_fee_rate: DEFAULT_MAX_FEE_RATE,
            max_pending_sessions: DEFAULT_MAX_PENDING_SESSIONS,
        }
    }
}

fn default_max_fee_rate() -> u64 {
    DEFAULT_MAX_FEE_RATE
}

fn default_max_pending_sessions() -> usize {
    DEFAULT_MAX_PENDING_SESSIONS
}
