use super::*;

pub(super) fn set_shell_phase(phase: &str, detail: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = phase.to_string();
        state.detail = detail.to_string();
        if phase != "error" {
            state.last_error = None;
        }
    });
    update_status_dom(phase, detail, false);
}

pub(super) fn set_shell_error(message: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = "error".to_string();
        state.detail = "startup failed".to_string();
        state.last_error = Some(message.to_string());
    });
    log_console_error(message);
    update_status_dom("error", message, true);
}

/// Records a failure that does not stop the shell.
pub(super) fn record_error(message: &str) {
    DIAGNOSTICS.with(|state| {
        state.borrow_mut().last_error = Some(message.to_string());
    });
    log_console_error(message);
}

pub(super) fn update_status_dom(phase: &str, detail: &str, is_error: bool) {
    let Some(status) = element_by_id::<HtmlElement>(SHELL_STATUS_ID) else {
        return;
    };
    let label = if is_error { "Console error" } else { "Console" };
    status.set_inner_text(&format!("{label}: {phase} ({detail})"));
    let color = if is_error { "#f87171" } else { "#64748b" };
    if status.style().set_property("color", color).is_err() {
        record_error(&format!("failed to set color on #{SHELL_STATUS_ID}"));
    }
}

pub(super) fn record_route_transition(location: &Location, outcome: &RouteOutcome) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.route_transitions = state.route_transitions.saturating_add(1);
        state.route_path = format!("{}{}", location.pathname, location.hash);
        if let RouteOutcome::Render(view) = outcome {
            state.active_view = Some(view.template_id().to_string());
        }
    });
}

pub(super) fn record_validation_request() {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.validation_requests = state.validation_requests.saturating_add(1);
    });
}

pub(super) fn record_stale_validation_response() {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.stale_validation_responses = state.stale_validation_responses.saturating_add(1);
    });
}

pub(super) fn current_location() -> Location {
    let Some(window) = web_sys::window() else {
        return Location::new("/", "");
    };
    let location = window.location();
    let pathname = location
        .pathname()
        .ok()
        .filter(|pathname| !pathname.trim().is_empty())
        .unwrap_or_else(|| "/".to_string());
    let hash = location.hash().unwrap_or_default();
    Location::new(pathname, hash)
}

pub(super) fn read_config_global() -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).ok()?;
    let raw = value.as_string()?;
    if raw.trim().is_empty() { None } else { Some(raw) }
}

pub(super) fn log_console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

pub(super) fn log_console_warning(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
