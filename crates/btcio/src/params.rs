//! Parameters for the commit/reveal writer.
//!
//! This module provides [`WriterParams`] which contains the subset of the service
//! configuration the writer needs.

use bitcoin::Network;
use inscriber_config::WriterConfig;

#[derive(Debug, Clone, Copy)]
pub struct WriterParams {
    /// Network commit addresses are encoded for.
    network: Network,

    /// Highest fee rate, in sat/vB, a reveal may pay.
    max_fee_rate: u64,

    /// Most sessions allowed to be pending at once.
    max_pending_sessions: usize,
}

impl WriterParams {
    /// Creates a new [`WriterParams`] with the given values.
    pub fn new(network: Network, max_fee_rate: u64, max_pending_sessions: usize) -> Self {
        Self {
            network,
            max_fee_rate,
            max_pending_sessions,
        }
    }

    /// Returns the bitcoin network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the fee rate cap in sat/vB.
    pub fn max_fee_rate(&self) -> u64 {
        self.max_fee_rate
    }

    /// Returns the pending session cap.
    pub fn max_pending_sessions(&self) -> usize {
        self.max_pending_sessions
    }
}

impl From<&WriterConfig> for WriterParams {
    fn from(config: &WriterConfig) -> Self {
        Self::new(
            config.network.to_bitcoin_network(),
            config.max_fee_rate,
            config.max_pending_sessions,
        )
    }
}
