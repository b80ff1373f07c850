//! Platform-independent core of the transaction call board.
//!
//! The browser shell supplies a [`TableView`] over the rendered table and a
//! [`TransactionTransport`] over the board server; [`TableSync`] wires operator
//! input and periodic polling between them.

pub mod config;
pub mod error;
pub mod filter;
pub mod sync;
pub mod transaction;
pub mod transport;
pub mod view;

pub use config::{DEFAULT_POLL_INTERVAL_MS, DomSelectors, SyncConfig, normalize_base_url};
pub use error::{ConfigError, SyncError};
pub use filter::SearchQuery;
pub use sync::{CallOutcome, PollReport, RowSync, SnapshotTicket, SyncDiagnostics, TableSync};
pub use transaction::{
    CallAction, PhoneUpdateRequest, SetActionRequest, Transaction, TransactionId,
    TransactionSnapshot, find_transaction,
};
pub use transport::TransactionTransport;
pub use view::TableView;
