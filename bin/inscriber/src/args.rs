//! CLI argument parsing.

use std::path::PathBuf;

use argh::FromArgs;
use inscriber_config::InscriberNetwork;

#[derive(Clone, Debug, FromArgs)]
#[argh(description = "Taproot commit/reveal inscriber")]
pub(crate) struct Args {
    // Config non-overriding args
    #[argh(option, short = 'c', description = "path to configuration")]
    pub config: PathBuf,

    // Config overriding args
    /// Rpc host that the server will listen to.
    #[argh(option, description = "rpc host")]
    pub rpc_host: Option<String>,

    /// Rpc port that the server will listen to.
    #[argh(option, description = "rpc port")]
    pub rpc_port: Option<u16>,

    /// Network the commit and reveal transactions are built for.
    #[argh(
        option,
        description = "bitcoin network (mainnet, testnet, signet, regtest)"
    )]
    pub network: Option<InscriberNetwork>,

    /// Other generic overrides to the config toml.
    /// Will be used, for example, as `-o writer.max_fee_rate=50 -o logging.json_format=true`
    #[argh(option, short = 'o', description = "generic config overrides")]
    pub overrides: Vec<String>,
}

impl Args {
    /// Get strings of overrides gathered from user and internal attributes.
    pub(crate) fn get_all_overrides(&self) -> Vec<String> {
        let mut overrides = self.overrides.clone();
        overrides.extend(self.get_internal_overrides());
        overrides
    }

    /// Overrides passed directly as args attributes.
    fn get_internal_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();
        if let Some(rpc_host) = &self.rpc_host {
            overrides.push(format!("rpc.host={rpc_host}"));
        }
        if let Some(rpc_port) = &self.rpc_port {
            overrides.push(format!("rpc.port={rpc_port}"));
        }
        if let Some(network) = &self.network {
            overrides.push(format!("writer.network={network}"));
        }
        overrides
    }
}
