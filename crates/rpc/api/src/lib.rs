//! Inscriber RPC API definitions.

use inscriber_rpc_types::{
    AbandonRequest, CommitRequest, CommitResponse, RevealRequest, RevealResponse,
};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// Commit/reveal methods served by the inscriber.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "inscriber"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "inscriber"))]
pub trait InscriberApi {
    /// Starts a session for a memo and returns the taproot address to fund.
    ///
    /// Fails if the memo is 80 bytes or shorter, or if the session id already has a pending
    /// commit.
    #[method(name = "commit")]
    async fn commit(&self, request: CommitRequest) -> RpcResult<CommitResponse>;

    /// Builds the signed reveal transaction for a funded commit.
    ///
    /// The session is consumed on success. The caller is responsible for broadcasting the
    /// returned transaction.
    #[method(name = "reveal")]
    async fn reveal(&self, request: RevealRequest) -> RpcResult<RevealResponse>;

    /// Drops a pending session. Returns whether one existed.
    #[method(name = "abandon")]
    async fn abandon(&self, request: AbandonRequest) -> RpcResult<bool>;
}
