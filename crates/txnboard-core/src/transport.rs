use async_trait::async_trait;

use crate::error::SyncError;
use crate::transaction::{CallAction, TransactionId, TransactionSnapshot};

/// HTTP surface of the board server.
///
/// Mutations report an error for transport failures and non-success statuses;
/// callers log those and carry on, the next poll shows the outcome.
#[async_trait(?Send)]
pub trait TransactionTransport {
    /// `GET /transactions`
    async fn fetch_transactions(&self) -> Result<TransactionSnapshot, SyncError>;

    /// `POST /update_phone/{id}` with `{"client_phone": ...}`
    async fn update_phone(&self, id: &TransactionId, client_phone: &str) -> Result<(), SyncError>;

    /// `POST /call/{id}` with `{}`
    async fn start_call(&self, id: &TransactionId) -> Result<(), SyncError>;

    /// `POST /set_action/{id}` with `{"action": ...}`
    async fn set_action(&self, id: &TransactionId, action: &CallAction) -> Result<(), SyncError>;
}
