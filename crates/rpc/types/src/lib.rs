//! Request and response types for the inscriber RPC.

use bitcoin::{address::NetworkUnchecked, Address, Txid};
pub use inscriber_btcio::writer::SessionId;
use serde::{Deserialize, Serialize};

/// Parameters of `inscriber_commit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub session_id: SessionId,

    /// Hex encoded memo, `destination (20 bytes) ‖ message`.
    #[serde(with = "hex")]
    pub memo: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub session_id: SessionId,

    /// Taproot address to fund before calling `inscriber_reveal`.
    pub address: String,
}

/// Parameters of `inscriber_reveal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealRequest {
    pub session_id: SessionId,

    /// Funding transaction id.
    pub txn: Txid,

    /// Output index of the commit output in `txn`.
    pub idx: u32,

    /// Value of the commit output in satoshis.
    pub amount: u64,

    /// Fee rate in sat/vB.
    pub fee_rate: u64,

    /// Destination address for the revealed funds.
    pub to: Address<NetworkUnchecked>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    /// Consensus-encoded signed reveal transaction.
    pub raw_hex: String,

    pub txid: Txid,

    /// Fee paid in satoshis.
    pub fee: u64,

    /// Value paid to the destination in satoshis.
    pub value: u64,
}

/// Parameters of `inscriber_abandon`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonRequest {
    pub session_id: SessionId,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_commit_request_wire_format() {
        let request: CommitRequest = serde_json::from_value(json!({
            "sessionId": "abc",
            "memo": "00ff10",
        }))
        .unwrap();
        assert_eq!(request.session_id, SessionId::from("abc"));
        assert_eq!(request.memo, vec![0x00, 0xff, 0x10]);

        let bad = serde_json::from_value::<CommitRequest>(json!({
            "sessionId": "abc",
            "memo": "not hex",
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_reveal_request_wire_format() {
        let request: RevealRequest = serde_json::from_value(json!({
            "sessionId": "abc",
            "txn": "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16",
            "idx": 1,
            "amount": 1000,
            "feeRate": 10,
            "to": "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
        }))
        .unwrap();

        assert_eq!(request.idx, 1);
        assert_eq!(request.amount, 1000);
        assert_eq!(request.fee_rate, 10);
        assert_eq!(
            request.txn.to_string(),
            "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16"
        );
    }

    #[test]
    fn test_reveal_response_wire_format() {
        let response = RevealResponse {
            raw_hex: "02000000".to_string(),
            txid: "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16"
                .parse()
                .unwrap(),
            fee: 156,
            value: 844,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["rawHex"], "02000000");
        assert_eq!(value["fee"], 156);
        assert_eq!(value["value"], 844);
        assert_eq!(
            value["txid"],
            "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16"
        );
    }
}
