#[cfg(any(target_arch = "wasm32", test))]
mod page_overrides;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use async_trait::async_trait;
    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use serde::Serialize;
    use txnboard_core::{
        CallAction, DomSelectors, PhoneUpdateRequest, SetActionRequest, SyncConfig,
        SyncDiagnostics, SyncError, TableSync, TableView, TransactionId, TransactionSnapshot,
        TransactionTransport,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

    use crate::page_overrides::{base_url_override, log_level_override, poll_interval_override};
    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod logging;
    mod network;

    use dom::*;
    use lifecycle::*;
    use logging::*;
    use network::*;

    type BoardSync = TableSync<WebTable, FetchTransport>;

    thread_local! {
        static BOARD: RefCell<Option<Rc<BoardSync>>> = const { RefCell::new(None) };
        static DIAGNOSTICS: RefCell<BootDiagnostics> = RefCell::new(BootDiagnostics::default());
        static PHONE_CHANGE_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static BADGE_CLICK_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static SEARCH_INPUT_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[derive(Debug, Clone, Default, Serialize)]
    struct BootDiagnostics {
        phase: String,
        detail: String,
        last_error: Option<String>,
        phone_inputs_bound: usize,
        badges_bound: usize,
        poll_interval_ms: u64,
    }

    #[derive(Debug, Serialize)]
    struct DiagnosticsReport {
        boot: BootDiagnostics,
        sync: Option<SyncDiagnostics>,
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        install_console_logging();
        set_boot_phase("booting", "binding transaction table");
        if let Err(error) = boot() {
            tracing::error!(error = %error, "board startup failed");
            set_boot_error(&error.to_string());
        }
    }

    fn boot() -> Result<(), SyncError> {
        let config = resolve_config()?;
        let document = current_document()?;

        let table = WebTable::new(document.clone(), config.selectors.clone());
        let transport = FetchTransport::new(config.clone());
        let board = Rc::new(TableSync::new(table, transport));
        BOARD.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&board)));

        attach(&board, &document, &config.selectors)?;
        start_poll_loop(Rc::clone(&board), config.poll_interval);

        let interval_ms = u64::try_from(config.poll_interval.as_millis()).unwrap_or(u64::MAX);
        DIAGNOSTICS.with(|state| state.borrow_mut().poll_interval_ms = interval_ms);
        set_boot_phase("ready", &format!("polling every {interval_ms}ms"));
        Ok(())
    }

    fn current_board() -> Option<Rc<BoardSync>> {
        BOARD.with(|slot| slot.borrow().clone())
    }

    #[wasm_bindgen]
    pub fn sync_diagnostics_json() -> String {
        let report = DiagnosticsReport {
            boot: DIAGNOSTICS.with(|state| state.borrow().clone()),
            sync: current_board().map(|board| board.diagnostics()),
        };
        serde_json::to_string(&report).unwrap_or_else(|_| {
            "{\"boot\":{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}}"
                .to_string()
        })
    }

    /// Runs one poll now instead of waiting for the next tick.
    #[wasm_bindgen]
    pub fn refresh_now() {
        let Some(board) = current_board() else {
            return;
        };
        spawn_local(async move {
            let _ = board.poll().await;
        });
    }

    /// Overwrites a row's action on the server and refreshes that row.
    #[wasm_bindgen]
    pub fn set_transaction_action(id: String, action: String) {
        let Some(board) = current_board() else {
            return;
        };
        let id = TransactionId::from(id);
        let action = CallAction::from(action);
        spawn_local(async move {
            let _ = board.mark_action(&id, &action).await;
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::sync_diagnostics_json;

#[cfg(not(target_arch = "wasm32"))]
pub fn sync_diagnostics_json() -> String {
    "{\"boot\":{\"phase\":\"native\",\"detail\":\"board diagnostics only available on wasm\"}}"
        .to_string()
}
