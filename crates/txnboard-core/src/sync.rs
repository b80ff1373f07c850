//! Table controller: turns operator input into requests and folds server
//! snapshots back into the rendered rows.
//!
//! Every fetch takes a sequence number when it is issued. Responses apply in
//! completion order, but a row only accepts a snapshot newer than the last one
//! it accepted, so a slow response cannot roll a row back.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde::Serialize;

use crate::error::SyncError;
use crate::filter::SearchQuery;
use crate::transaction::{CallAction, Transaction, TransactionId, find_transaction};
use crate::transport::TransactionTransport;
use crate::view::TableView;

/// Issue order of a `/transactions` fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotTicket(u64);

impl SnapshotTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// What reconciling one row did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSync {
    /// Phone and badge written.
    Applied,
    /// Badge written; the phone input had focus and was left alone.
    FocusGuarded,
    /// The snapshot has no record with this id.
    NotInSnapshot,
    /// A newer snapshot already reached this row.
    Stale,
    /// The server knows the id but the page has no row for it.
    NotRendered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollReport {
    pub applied: usize,
    pub focus_guarded: usize,
    pub stale: usize,
    pub not_rendered: usize,
    pub failed: usize,
}

impl PollReport {
    fn record(&mut self, outcome: RowSync) {
        match outcome {
            RowSync::Applied => self.applied += 1,
            RowSync::FocusGuarded => self.focus_guarded += 1,
            RowSync::Stale => self.stale += 1,
            RowSync::NotRendered => self.not_rendered += 1,
            RowSync::NotInSnapshot => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The badge showed a status that must not be called again.
    Skipped { action: CallAction },
    /// `/call/{id}` was sent and the row refreshed.
    Requested { refresh: RowSync },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncDiagnostics {
    pub polls_started: u64,
    pub polls_applied: u64,
    pub refreshes_started: u64,
    pub fetch_failures: u64,
    pub rows_updated: u64,
    pub focus_guarded: u64,
    pub stale_rows_dropped: u64,
    pub calls_requested: u64,
    pub calls_skipped: u64,
    pub phone_updates_sent: u64,
    pub actions_set: u64,
    pub mutation_failures: u64,
    pub last_error: Option<String>,
}

pub struct TableSync<V, T> {
    view: V,
    transport: T,
    next_sequence: Cell<u64>,
    row_sequences: RefCell<HashMap<TransactionId, u64>>,
    diagnostics: RefCell<SyncDiagnostics>,
}

impl<V, T> TableSync<V, T>
where
    V: TableView,
    T: TransactionTransport,
{
    pub fn new(view: V, transport: T) -> Self {
        Self {
            view,
            transport,
            next_sequence: Cell::new(1),
            row_sequences: RefCell::new(HashMap::new()),
            diagnostics: RefCell::new(SyncDiagnostics::default()),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn diagnostics(&self) -> SyncDiagnostics {
        self.diagnostics.borrow().clone()
    }

    /// Committed edit of a phone input.
    pub async fn on_phone_change(&self, id: &TransactionId, value: &str) -> Result<(), SyncError> {
        self.with_diagnostics(|d| d.phone_updates_sent += 1);
        self.transport
            .update_phone(id, value)
            .await
            .inspect_err(|error| self.record_mutation_failure("update_phone", id, error))
    }

    /// Click on a status badge. Reads the badge's current action and either
    /// skips or places a call and refreshes that row.
    pub async fn on_badge_click(&self, id: &TransactionId) -> Result<CallOutcome, SyncError> {
        let action = self
            .view
            .badge_action(id)
            .inspect_err(|error| self.record_row_failure("badge lookup", id, error))?;
        if action.blocks_call() {
            tracing::debug!(id = %id, action = %action, "call skipped for badge status");
            self.with_diagnostics(|d| d.calls_skipped += 1);
            return Ok(CallOutcome::Skipped { action });
        }

        self.with_diagnostics(|d| d.calls_requested += 1);
        if let Err(error) = self.transport.start_call(id).await {
            self.record_mutation_failure("call", id, &error);
        }

        let refresh = self.refresh_row(id).await?;
        Ok(CallOutcome::Requested { refresh })
    }

    /// Overwrites the row's action on the server, then refreshes the row.
    pub async fn mark_action(
        &self,
        id: &TransactionId,
        action: &CallAction,
    ) -> Result<RowSync, SyncError> {
        self.with_diagnostics(|d| d.actions_set += 1);
        if let Err(error) = self.transport.set_action(id, action).await {
            self.record_mutation_failure("set_action", id, &error);
        }
        self.refresh_row(id).await
    }

    /// Shows rows whose rendered text contains the query, hides the rest.
    /// Returns how many rows stayed visible.
    pub fn on_search_input(&self, raw_query: &str) -> usize {
        let query = SearchQuery::new(raw_query);
        let texts = self.view.row_texts();
        let visibility = query.visibility(texts.iter().map(String::as_str));
        if let Err(error) = self.view.apply_visibility(&visibility) {
            tracing::warn!(error = %error, query = query.as_str(), "failed to filter rows");
            self.record_error(&error);
        }
        visibility.iter().filter(|visible| **visible).count()
    }

    pub async fn refresh_row(&self, id: &TransactionId) -> Result<RowSync, SyncError> {
        self.with_diagnostics(|d| d.refreshes_started += 1);
        let ticket = self.begin_snapshot();
        let snapshot = self.fetch_snapshot().await?;
        self.reconcile_row(ticket, &snapshot, id)
            .inspect_err(|error| self.record_row_failure("refresh", id, error))
    }

    pub async fn poll(&self) -> Result<PollReport, SyncError> {
        self.with_diagnostics(|d| d.polls_started += 1);
        let ticket = self.begin_snapshot();
        let snapshot = self.fetch_snapshot().await?;
        Ok(self.apply_snapshot(ticket, &snapshot))
    }

    /// Reserves the next sequence number; call before issuing the fetch.
    pub fn begin_snapshot(&self) -> SnapshotTicket {
        let sequence = self.next_sequence.get();
        self.next_sequence.set(sequence.saturating_add(1));
        SnapshotTicket(sequence)
    }

    /// Reconciles every record of a fetched snapshot.
    pub fn apply_snapshot(&self, ticket: SnapshotTicket, snapshot: &[Transaction]) -> PollReport {
        let mut report = PollReport::default();
        for record in snapshot {
            match self.reconcile_row(ticket, snapshot, &record.id) {
                Ok(outcome) => report.record(outcome),
                Err(error) => {
                    tracing::warn!(error = %error, id = %record.id, "row reconciliation failed");
                    self.record_error(&error);
                    report.failed += 1;
                }
            }
        }
        self.with_diagnostics(|d| d.polls_applied += 1);
        report
    }

    pub fn reconcile_row(
        &self,
        ticket: SnapshotTicket,
        snapshot: &[Transaction],
        id: &TransactionId,
    ) -> Result<RowSync, SyncError> {
        let Some(record) = find_transaction(snapshot, id) else {
            return Ok(RowSync::NotInSnapshot);
        };

        if !self.claim_row(ticket, id) {
            tracing::debug!(
                id = %id,
                sequence = ticket.sequence(),
                "dropping stale snapshot for row"
            );
            self.with_diagnostics(|d| d.stale_rows_dropped += 1);
            return Ok(RowSync::Stale);
        }

        match self.write_row(record) {
            Ok(outcome) => {
                self.with_diagnostics(|d| match outcome {
                    RowSync::FocusGuarded => {
                        d.rows_updated += 1;
                        d.focus_guarded += 1;
                    }
                    _ => d.rows_updated += 1,
                });
                Ok(outcome)
            }
            Err(SyncError::MissingRow { .. }) => Ok(RowSync::NotRendered),
            Err(error) => Err(error),
        }
    }

    fn write_row(&self, record: &Transaction) -> Result<RowSync, SyncError> {
        let focused = self.view.phone_has_focus(&record.id)?;
        if !focused {
            self.view.set_phone_value(&record.id, &record.client_phone)?;
        }
        self.view.set_badge_action(&record.id, &record.action)?;
        Ok(if focused {
            RowSync::FocusGuarded
        } else {
            RowSync::Applied
        })
    }

    fn claim_row(&self, ticket: SnapshotTicket, id: &TransactionId) -> bool {
        let mut sequences = self.row_sequences.borrow_mut();
        match sequences.get(id) {
            Some(&applied) if applied >= ticket.sequence() => false,
            _ => {
                sequences.insert(id.clone(), ticket.sequence());
                true
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Vec<Transaction>, SyncError> {
        self.transport.fetch_transactions().await.inspect_err(|error| {
            tracing::warn!(error = %error, "failed to fetch transactions");
            self.with_diagnostics(|d| d.fetch_failures += 1);
            self.record_error(error);
        })
    }

    fn record_mutation_failure(&self, operation: &str, id: &TransactionId, error: &SyncError) {
        tracing::warn!(error = %error, id = %id, operation, "mutation request failed");
        self.with_diagnostics(|d| d.mutation_failures += 1);
        self.record_error(error);
    }

    fn record_row_failure(&self, operation: &str, id: &TransactionId, error: &SyncError) {
        tracing::warn!(error = %error, id = %id, operation, "row update failed");
        self.record_error(error);
    }

    fn record_error(&self, error: &SyncError) {
        self.with_diagnostics(|d| d.last_error = Some(error.to_string()));
    }

    fn with_diagnostics(&self, update: impl FnOnce(&mut SyncDiagnostics)) {
        update(&mut self.diagnostics.borrow_mut());
    }
}
