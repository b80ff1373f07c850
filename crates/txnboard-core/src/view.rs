use crate::error::SyncError;
use crate::transaction::{CallAction, TransactionId};

/// The rendered transaction table.
///
/// Rows are addressed by their `data-id` for reconciliation and by position
/// for search filtering, which runs over every row in the table body.
pub trait TableView {
    fn badge_action(&self, id: &TransactionId) -> Result<CallAction, SyncError>;

    fn phone_has_focus(&self, id: &TransactionId) -> Result<bool, SyncError>;

    fn set_phone_value(&self, id: &TransactionId, value: &str) -> Result<(), SyncError>;

    /// Writes the badge text and its action attribute together.
    fn set_badge_action(&self, id: &TransactionId, action: &CallAction) -> Result<(), SyncError>;

    fn row_texts(&self) -> Vec<String>;

    /// Shows or hides body rows by position, in the order `row_texts` returned
    /// them. Every row is attempted; the first failure is reported.
    fn apply_visibility(&self, visibility: &[bool]) -> Result<(), SyncError>;
}
