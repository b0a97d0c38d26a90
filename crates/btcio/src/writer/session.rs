use std::{collections::HashMap, fmt};

use bitcoin::Address;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::*;

use super::{
    commit::CommitSession,
    errors::CommitRevealError,
    reveal::{assemble_reveal, RevealParams, RevealTx},
};
use crate::{params::WriterParams, payload::Payload};

/// Caller-chosen identifier correlating a commit with its reveal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no pending commit for session '{0}'")]
    NoPendingSession(SessionId),

    /// A commit for this id is still waiting to be revealed or abandoned.
    #[error("session '{0}' already has a pending commit")]
    SessionPending(SessionId),

    /// The table already holds as many pending commits as allowed.
    #[error("too many pending sessions, at most {max} allowed")]
    TooManySessions { max: usize },

    #[error("fee rate of {fee_rate} sat/vB exceeds the maximum of {max} sat/vB")]
    FeeRateTooHigh { fee_rate: u64, max: u64 },

    #[error("{0}")]
    CommitReveal(#[from] CommitRevealError),
}

impl SessionError {
    /// Whether the error was caused by the request rather than by transaction construction.
    pub fn is_usage_error(&self) -> bool {
        match self {
            Self::NoPendingSession(_)
            | Self::SessionPending(_)
            | Self::TooManySessions { .. }
            | Self::FeeRateTooHigh { .. } => true,
            Self::CommitReveal(e) => matches!(
                e,
                CommitRevealError::PayloadTooShort { .. }
                    | CommitRevealError::PayloadTooLong { .. }
                    | CommitRevealError::RevealTooHeavy { .. }
                    | CommitRevealError::FeeExceedsAmount { .. }
                    | CommitRevealError::DustOutput { .. }
                    | CommitRevealError::FeeOverflow { .. }
                    | CommitRevealError::ZeroFeeRate
                    | CommitRevealError::Address(_)
            ),
        }
    }
}

/// Pending commit sessions keyed by [`SessionId`].
///
/// Each id moves from idle to pending on [`commit`](Self::commit) and back to idle on a
/// successful [`reveal`](Self::reveal) or on [`abandon`](Self::abandon). Distinct ids never
/// interfere with each other.
#[derive(Debug)]
pub struct SessionTable {
    params: WriterParams,
    sessions: Mutex<HashMap<SessionId, CommitSession>>,
}

impl SessionTable {
    pub fn new(params: WriterParams) -> Self {
        Self {
            params,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn params(&self) -> &WriterParams {
        &self.params
    }

    /// Starts a session for `payload` and returns the address the caller has to fund.
    ///
    /// Fails once [`WriterParams::max_pending_sessions`] commits are waiting for a reveal.
    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    pub fn commit(&self, id: SessionId, payload: Payload) -> Result<Address, SessionError> {
        self.check_commit_allowed(&self.sessions.lock(), &id)?;

        let session = CommitSession::new(&payload, self.params.network())?;
        let address = session.commit_address().clone();

        // Concurrent commits may have taken the id or the last slot meanwhile.
        let mut sessions = self.sessions.lock();
        self.check_commit_allowed(&sessions, &id)?;
        sessions.insert(id, session);
        info!(%address, pending = sessions.len(), "commit address derived");
        Ok(address)
    }

    fn check_commit_allowed(
        &self,
        sessions: &HashMap<SessionId, CommitSession>,
        id: &SessionId,
    ) -> Result<(), SessionError> {
        if sessions.contains_key(id) {
            return Err(SessionError::SessionPending(id.clone()));
        }
        let max = self.params.max_pending_sessions();
        if sessions.len() >= max {
            return Err(SessionError::TooManySessions { max });
        }
        Ok(())
    }

    /// Builds the signed reveal for the pending session `id`.
    ///
    /// The session is consumed only if the reveal succeeds. On failure it stays pending so the
    /// caller can retry with corrected parameters.
    #[instrument(skip(self, params), fields(fee_rate = params.fee_rate))]
    pub fn reveal(&self, id: &SessionId, params: &RevealParams) -> Result<RevealTx, SessionError> {
        let max = self.params.max_fee_rate();
        if params.fee_rate > max {
            return Err(SessionError::FeeRateTooHigh {
                fee_rate: params.fee_rate,
                max,
            });
        }

        let session = self
            .sessions
            .lock()
            .remove(id)
            .ok_or_else(|| SessionError::NoPendingSession(id.clone()))?;

        match assemble_reveal(&session, params) {
            Ok(reveal) => {
                info!(
                    txid = %reveal.txid(),
                    fee = reveal.fee().to_sat(),
                    value = reveal.value().to_sat(),
                    "reveal transaction built"
                );
                Ok(reveal)
            }
            Err(err) => {
                warn!(%err, "reveal failed, keeping session");
                // A commit that raced in for the same id wins over the failed one.
                self.sessions.lock().entry(id.clone()).or_insert(session);
                Err(err.into())
            }
        }
    }

    /// Drops the pending session `id`. Returns whether there was one.
    #[instrument(skip(self))]
    pub fn abandon(&self, id: &SessionId) -> bool {
        let removed = self.sessions.lock().remove(id).is_some();
        if removed {
            info!("session abandoned");
        }
        removed
    }

    pub fn is_pending(&self, id: &SessionId) -> bool {
        self.sessions.lock().contains_key(id)
    }

    /// Number of sessions awaiting a reveal.
    pub fn pending(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use bitcoin::{Amount, Network};

    use super::*;
    use crate::writer::test_utils::{p2tr_destination, test_outpoint, test_payload};

    fn table() -> SessionTable {
        SessionTable::new(WriterParams::new(Network::Regtest, 100, 16))
    }

    fn params(amount: u64, fee_rate: u64) -> RevealParams {
        RevealParams {
            destination: p2tr_destination(42).as_unchecked().clone(),
            commit_outpoint: test_outpoint(),
            commit_amount: Amount::from_sat(amount),
            fee_rate,
        }
    }

    #[test]
    fn test_reveal_before_commit() {
        let table = table();
        let err = table.reveal(&"a".into(), &params(10_000, 1)).unwrap_err();
        assert!(matches!(err, SessionError::NoPendingSession(id) if id.as_str() == "a"));
    }

    #[test]
    fn test_commit_then_reveal() {
        let table = table();
        let id = SessionId::from("a");

        let address = table.commit(id.clone(), test_payload(104)).unwrap();
        assert!(table.is_pending(&id));
        assert!(address.to_string().starts_with("bcrt1p"));

        let reveal = table.reveal(&id, &params(10_000, 1)).unwrap();
        assert_eq!(reveal.fee() + reveal.value(), Amount::from_sat(10_000));
        assert!(!table.is_pending(&id));
        assert_eq!(table.pending(), 0);
    }

    #[test]
    fn test_double_reveal() {
        let table = table();
        let id = SessionId::from("a");
        table.commit(id.clone(), test_payload(104)).unwrap();
        table.reveal(&id, &params(10_000, 1)).unwrap();

        let err = table.reveal(&id, &params(10_000, 1)).unwrap_err();
        assert!(matches!(err, SessionError::NoPendingSession(_)));
    }

    #[test]
    fn test_commit_over_pending() {
        let table = table();
        let id = SessionId::from("a");
        let first = table.commit(id.clone(), test_payload(104)).unwrap();

        let err = table.commit(id.clone(), test_payload(200)).unwrap_err();
        assert!(matches!(err, SessionError::SessionPending(_)));
        assert!(err.is_usage_error());

        // The pending session is untouched.
        assert_eq!(table.pending(), 1);

        assert!(table.abandon(&id));
        assert!(!table.abandon(&id));

        let second = table.commit(id, test_payload(104)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_failed_reveal_keeps_session() {
        let table = table();
        let id = SessionId::from("a");
        table.commit(id.clone(), test_payload(104)).unwrap();

        let err = table.reveal(&id, &params(1_000, 10)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::CommitReveal(CommitRevealError::FeeExceedsAmount { .. })
        ));
        assert!(err.is_usage_error());
        assert!(table.is_pending(&id));

        table.reveal(&id, &params(1_000, 1)).unwrap();
        assert!(!table.is_pending(&id));
    }

    #[test]
    fn test_fee_rate_cap() {
        let table = table();
        let id = SessionId::from("a");
        table.commit(id.clone(), test_payload(104)).unwrap();

        let err = table.reveal(&id, &params(1_000_000, 101)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::FeeRateTooHigh {
                fee_rate: 101,
                max: 100
            }
        ));
        assert!(table.is_pending(&id));
    }

    #[test]
    fn test_pending_session_cap() {
        let table = SessionTable::new(WriterParams::new(Network::Regtest, 100, 2));
        table.commit("a".into(), test_payload(104)).unwrap();
        table.commit("b".into(), test_payload(104)).unwrap();

        let err = table.commit("c".into(), test_payload(104)).unwrap_err();
        assert!(matches!(err, SessionError::TooManySessions { max: 2 }));
        assert!(err.is_usage_error());
        assert!(!table.is_pending(&"c".into()));
        assert_eq!(table.pending(), 2);

        // Revealing or abandoning frees a slot.
        table.reveal(&"a".into(), &params(10_000, 1)).unwrap();
        table.commit("c".into(), test_payload(104)).unwrap();
        assert!(table.abandon(&"b".into()));
        table.commit("d".into(), test_payload(104)).unwrap();
        assert_eq!(table.pending(), 2);
    }

    #[test]
    fn test_oversized_memo_rejected_before_commit() {
        let err: SessionError = Payload::new(vec![7u8; 500_000]).unwrap_err().into();
        assert!(matches!(
            err,
            SessionError::CommitReveal(CommitRevealError::PayloadTooLong { .. })
        ));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_short_payload_is_usage_error() {
        let err: SessionError = Payload::new(vec![0; 80]).unwrap_err().into();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_distinct_ids_do_not_interfere() {
        let table = Arc::new(table());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let table = table.clone();
                thread::spawn(move || {
                    let id = SessionId::new(format!("session-{i}"));
                    table.commit(id.clone(), test_payload(81 + i * 60)).unwrap();
                    table.reveal(&id, &params(50_000, 2)).unwrap()
                })
            })
            .collect();

        let mut txids: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().txid())
            .collect();
        txids.sort();
        txids.dedup();
        assert_eq!(txids.len(), 8);
        assert_eq!(table.pending(), 0);
    }
}
