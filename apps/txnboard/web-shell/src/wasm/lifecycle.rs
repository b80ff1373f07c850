use super::*;

pub(super) fn set_boot_phase(phase: &str, detail: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = phase.to_string();
        state.detail = detail.to_string();
        if phase != "error" {
            state.last_error = None;
        }
    });
    web_sys::console::log_1(&JsValue::from_str(&format!("txnboard: {phase} ({detail})")));
}

pub(super) fn set_boot_error(message: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = "error".to_string();
        state.detail = "startup failed".to_string();
        state.last_error = Some(message.to_string());
    });
    web_sys::console::error_1(&JsValue::from_str(&format!("txnboard: startup failed: {message}")));
}

pub(super) fn read_global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

pub(super) fn resolve_config() -> Result<SyncConfig, SyncError> {
    let base_url =
        base_url_override(read_global(BASE_URL_GLOBAL).and_then(|value| value.as_string()));
    let poll_interval_ms =
        poll_interval_override(read_global(POLL_MS_GLOBAL).and_then(|value| value.as_f64()));
    let config = SyncConfig::from_overrides(base_url.as_deref(), poll_interval_ms)?;
    Ok(config)
}

/// Fires a poll every `interval` for the life of the page. Each poll runs as
/// its own task, so a slow response never delays the next tick.
pub(super) fn start_poll_loop(board: Rc<BoardSync>, interval: Duration) {
    spawn_local(async move {
        loop {
            sleep(interval).await;
            let board = Rc::clone(&board);
            spawn_local(async move {
                // Failures are logged and recorded by the board.
                if let Ok(report) = board.poll().await {
                    tracing::debug!(
                        applied = report.applied,
                        focus_guarded = report.focus_guarded,
                        stale = report.stale,
                        "poll applied"
                    );
                }
            });
        }
    });
}
