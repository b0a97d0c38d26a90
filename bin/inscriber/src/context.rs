//! Configuration loading and service state initialization.

use std::{fs, path::Path, sync::Arc};

use inscriber_btcio::{WriterParams, writer::SessionTable};
use inscriber_config::Config;
use tracing::info;

use crate::{
    args::Args,
    config::{apply_override, parse_override},
    errors::{ConfigError, InitError},
};

/// Reads the config file named in `args` and applies every override on top of it.
pub(crate) fn load_config(args: &Args) -> Result<Config, InitError> {
    let mut config_toml = load_config_from_path(&args.config)?;

    let overrides = args
        .get_all_overrides()
        .iter()
        .map(|o| parse_override(o))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let table = config_toml
        .as_table_mut()
        .ok_or_else(|| ConfigError::TraverseNonTableAt("<root>".to_string()))?;

    for (path, val) in overrides {
        apply_override(&path, val, table)?;
    }

    let config = config_toml
        .try_into::<Config>()
        .map_err(InitError::TomlParse)?;

    validate_config(config)
}

fn validate_config(config: Config) -> Result<Config, InitError> {
    if config.writer.max_fee_rate == 0 {
        return Err(InitError::InvalidConfig(
            "writer.max_fee_rate must be positive".to_string(),
        ));
    }
    if config.writer.max_pending_sessions == 0 {
        return Err(InitError::InvalidConfig(
            "writer.max_pending_sessions must be positive".to_string(),
        ));
    }
    Ok(config)
}

fn load_config_from_path(path: &Path) -> Result<toml::Value, InitError> {
    let config_str = fs::read_to_string(path)?;
    toml::from_str(&config_str).map_err(InitError::TomlParse)
}

/// Creates the table holding pending commit sessions.
pub(crate) fn init_session_table(config: &Config) -> Arc<SessionTable> {
    let params = WriterParams::from(&config.writer);
    info!(
        network = %params.network(),
        max_fee_rate = params.max_fee_rate(),
        max_pending_sessions = params.max_pending_sessions(),
        "initialized session table"
    );
    Arc::new(SessionTable::new(params))
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::PathBuf};

    use bitcoin::Network;
    use inscriber_config::InscriberNetwork;
    use tempfile::NamedTempFile;

    use super::*;

    const CONFIG: &str = r#"
        [writer]
        network = "regtest"
        max_fee_rate = 100

        [logging]
        json_format = false
    "#;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(config: PathBuf) -> Args {
        Args {
            config,
            rpc_host: None,
            rpc_port: None,
            network: None,
            overrides: Vec::new(),
        }
    }

    #[test]
    fn test_load_config() {
        let file = write_config(CONFIG);
        let config = load_config(&args(file.path().to_path_buf())).unwrap();

        assert_eq!(config.writer.network, InscriberNetwork::Regtest);
        assert_eq!(config.writer.max_fee_rate, 100);
        assert_eq!(config.rpc.port, 8547);
        assert_eq!(config.logging.json_format, Some(false));
    }

    #[test]
    fn test_load_config_with_overrides() {
        let file = write_config(CONFIG);
        let mut args = args(file.path().to_path_buf());
        args.rpc_host = Some("0.0.0.0".to_string());
        args.rpc_port = Some(9000);
        args.network = Some(InscriberNetwork::Signet);
        args.overrides = vec![
            "writer.max_fee_rate=25".to_string(),
            "writer.max_pending_sessions=8".to_string(),
        ];

        let config = load_config(&args).unwrap();
        assert_eq!(config.rpc.host, "0.0.0.0");
        assert_eq!(config.rpc.port, 9000);
        assert_eq!(config.writer.network, InscriberNetwork::Signet);
        assert_eq!(config.writer.max_fee_rate, 25);
        assert_eq!(config.writer.max_pending_sessions, 8);

        let table = init_session_table(&config);
        assert_eq!(table.params().network(), Network::Signet);
        assert_eq!(table.params().max_pending_sessions(), 8);
        assert_eq!(table.pending(), 0);
    }

    #[test]
    fn test_zero_max_fee_rate_rejected() {
        let file = write_config(CONFIG);
        let mut args = args(file.path().to_path_buf());
        args.overrides = vec!["writer.max_fee_rate=0".to_string()];

        assert!(matches!(
            load_config(&args),
            Err(InitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_max_pending_sessions_rejected() {
        let file = write_config(CONFIG);
        let mut args = args(file.path().to_path_buf());
        args.overrides = vec!["writer.max_pending_sessions=0".to_string()];

        assert!(matches!(
            load_config(&args),
            Err(InitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(&args(PathBuf::from("/nonexistent/inscriber.toml"))).unwrap_err();
        assert!(matches!(err, InitError::Io(_)));
    }
}
