use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Row identifier shared by the server record and the `data-id` attribute.
///
/// The server may send ids as JSON strings or numbers; both are kept in their
/// textual form so they compare equal to the attribute value read from the DOM.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for TransactionId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = TransactionId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a transaction id string or integer")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(TransactionId::new(value))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(TransactionId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(TransactionId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(TransactionId(value.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Call status shown on a row's badge.
///
/// The server owns the vocabulary; unknown labels are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallAction {
    Connecting,
    Resolved,
    NotAnswered,
    Disconnected,
    MarkAsFraud,
    Other(String),
}

impl CallAction {
    pub fn parse(label: &str) -> Self {
        match label {
            "Connecting" => Self::Connecting,
            "Resolved" => Self::Resolved,
            "Not Answered" => Self::NotAnswered,
            "Disconnected" => Self::Disconnected,
            "Mark As Fraud" => Self::MarkAsFraud,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Connecting => "Connecting",
            Self::Resolved => "Resolved",
            Self::NotAnswered => "Not Answered",
            Self::Disconnected => "Disconnected",
            Self::MarkAsFraud => "Mark As Fraud",
            Self::Other(label) => label,
        }
    }

    /// A call already in flight or already settled must not be placed again.
    pub fn blocks_call(&self) -> bool {
        matches!(self, Self::Connecting | Self::Resolved)
    }
}

impl Default for CallAction {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for CallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for CallAction {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<CallAction> for String {
    fn from(value: CallAction) -> Self {
        match value {
            CallAction::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// Client-side mirror of a server transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub action: CallAction,
    /// Remaining server fields (client name, merchant, amount, ...), untouched.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        client_phone: impl Into<String>,
        action: CallAction,
    ) -> Self {
        Self {
            id: id.into(),
            client_phone: client_phone.into(),
            action,
            details: Map::new(),
        }
    }
}

/// Ordered result of `GET /transactions`.
pub type TransactionSnapshot = Vec<Transaction>;

/// Linear lookup by id; the collection is small and fetched whole every time.
pub fn find_transaction<'a>(
    snapshot: &'a [Transaction],
    id: &TransactionId,
) -> Option<&'a Transaction> {
    snapshot.iter().find(|transaction| &transaction.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneUpdateRequest {
    pub client_phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetActionRequest {
    pub action: CallAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_decode_to_the_same_text() {
        let snapshot: TransactionSnapshot = serde_json::from_value(json!([
            { "id": 42, "client_phone": "+15550100", "action": "New" },
            { "id": "txn_7", "client_phone": "+15550111", "action": "Resolved" }
        ]))
        .expect("snapshot decodes");

        assert_eq!(snapshot[0].id, TransactionId::from("42"));
        assert_eq!(snapshot[1].id.as_str(), "txn_7");
        assert_eq!(snapshot[1].action, CallAction::Resolved);
    }

    #[test]
    fn unknown_fields_are_kept_as_details() {
        let transaction: Transaction = serde_json::from_value(json!({
            "id": "1",
            "client_phone": "+15550100",
            "action": "Mark As Fraud",
            "merchant_name": "Corner Shop",
            "amount": 12.5
        }))
        .expect("transaction decodes");

        assert_eq!(transaction.action, CallAction::MarkAsFraud);
        assert_eq!(transaction.details.get("merchant_name"), Some(&json!("Corner Shop")));
        assert_eq!(transaction.details.get("amount"), Some(&json!(12.5)));
    }

    #[test]
    fn missing_phone_and_action_default_to_empty() {
        let transaction: Transaction =
            serde_json::from_value(json!({ "id": "9" })).expect("transaction decodes");
        assert_eq!(transaction.client_phone, "");
        assert_eq!(transaction.action.label(), "");
        assert!(!transaction.action.blocks_call());
    }

    #[test]
    fn only_connecting_and_resolved_block_calls() {
        for label in ["Connecting", "Resolved"] {
            assert!(CallAction::parse(label).blocks_call(), "{label} should block");
        }
        for label in ["New", "Not Answered", "Disconnected", "Mark As Fraud", "resolved", ""] {
            assert!(!CallAction::parse(label).blocks_call(), "{label} should not block");
        }
    }

    #[test]
    fn action_labels_survive_serialization() {
        let encoded = serde_json::to_value(SetActionRequest {
            action: CallAction::NotAnswered,
        })
        .expect("encode");
        assert_eq!(encoded, json!({ "action": "Not Answered" }));

        let custom = CallAction::from("Escalated".to_string());
        assert_eq!(String::from(custom.clone()), "Escalated");
        assert_eq!(custom.to_string(), "Escalated");
    }

    #[test]
    fn find_transaction_matches_by_text_id() {
        let snapshot = vec![
            Transaction::new("1", "+1", CallAction::parse("New")),
            Transaction::new(2_u64, "+2", CallAction::Resolved),
        ];
        assert_eq!(
            find_transaction(&snapshot, &TransactionId::from("2")).map(|t| t.client_phone.as_str()),
            Some("+2")
        );
        assert!(find_transaction(&snapshot, &TransactionId::from("3")).is_none());
    }
}
