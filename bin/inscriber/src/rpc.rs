//! Inscriber RPC server implementation.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bitcoin::{Amount, OutPoint};
use inscriber_btcio::{
    Payload,
    writer::{RevealParams, SessionError, SessionTable},
};
use inscriber_config::RpcConfig;
use inscriber_rpc_api::InscriberApiServer;
use inscriber_rpc_types::{
    AbandonRequest, CommitRequest, CommitResponse, RevealRequest, RevealResponse,
};
use jsonrpsee::{
    core::RpcResult,
    server::{ServerBuilder, ServerHandle},
    types::{
        ErrorObjectOwned,
        error::{INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE},
    },
};
use tracing::{error, info, warn};

/// Serves commit, reveal and abandon requests against a shared [`SessionTable`].
pub(crate) struct InscriberRpcServer {
    sessions: Arc<SessionTable>,
}

impl InscriberRpcServer {
    /// Creates a new [`InscriberRpcServer`].
    pub(crate) fn new(sessions: Arc<SessionTable>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl InscriberApiServer for InscriberRpcServer {
    async fn commit(&self, request: CommitRequest) -> RpcResult<CommitResponse> {
        let CommitRequest { session_id, memo } = request;

        let payload = Payload::new(memo).map_err(|e| session_error(e.into()))?;
        let address = self
            .sessions
            .commit(session_id.clone(), payload)
            .map_err(session_error)?;

        Ok(CommitResponse {
            session_id,
            address: address.to_string(),
        })
    }

    async fn reveal(&self, request: RevealRequest) -> RpcResult<RevealResponse> {
        let params = RevealParams {
            destination: request.to,
            commit_outpoint: OutPoint::new(request.txn, request.idx),
            commit_amount: Amount::from_sat(request.amount),
            fee_rate: request.fee_rate,
        };

        let reveal = self
            .sessions
            .reveal(&request.session_id, &params)
            .map_err(session_error)?;

        Ok(RevealResponse {
            raw_hex: reveal.raw_hex(),
            txid: reveal.txid(),
            fee: reveal.fee().to_sat(),
            value: reveal.value().to_sat(),
        })
    }

    async fn abandon(&self, request: AbandonRequest) -> RpcResult<bool> {
        Ok(self.sessions.abandon(&request.session_id))
    }
}

/// Maps session errors to RPC errors, blaming the caller where the request was at fault.
fn session_error(err: SessionError) -> ErrorObjectOwned {
    if err.is_usage_error() {
        warn!(%err, "rejected request");
        invalid_params_error(err.to_string())
    } else {
        error!(%err, "failed to build transaction");
        internal_error(err.to_string())
    }
}

/// Creates an RPC error for internal failures.
fn internal_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(INTERNAL_ERROR_CODE, msg.into(), None::<()>)
}

/// Creates an RPC error for invalid parameters.
fn invalid_params_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(INVALID_PARAMS_CODE, msg.into(), None::<()>)
}

/// Binds the RPC server and starts serving the inscriber methods.
pub(crate) async fn start_rpc(
    config: &RpcConfig,
    sessions: Arc<SessionTable>,
) -> Result<ServerHandle> {
    let module = InscriberRpcServer::new(sessions).into_rpc();

    let addr = format!("{}:{}", config.host, config.port);
    let rpc_server = ServerBuilder::new()
        .build(&addr)
        .await
        .map_err(|e| anyhow!("Failed to build RPC server on {addr}: {e}"))?;

    info!(%addr, "started RPC server");
    Ok(rpc_server.start(module))
}
