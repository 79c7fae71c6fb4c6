use super::*;

pub(super) fn element_by_id<T: JsCast>(id: &str) -> Option<T> {
    let window = web_sys::window()?;
    let document = window.document()?;
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Replaces the contents of the app root with the markup of `template_id`.
/// Works with both `<template>` elements and plain hidden containers.
pub(super) fn render_template(template_id: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;
    let root = document
        .get_element_by_id(APP_ROOT_ID)
        .ok_or_else(|| format!("missing #{APP_ROOT_ID} root element"))?;
    let template = document
        .get_element_by_id(template_id)
        .ok_or_else(|| format!("missing template #{template_id}"))?;
    root.set_inner_html(&template.inner_html());
    Ok(())
}

pub(super) fn read_input_value(id: &str) -> Option<String> {
    element_by_id::<HtmlInputElement>(id).map(|input| input.value())
}

pub(super) fn read_form_values(ids: &[&str]) -> FormValues {
    ids.iter()
        .filter_map(|id| read_input_value(id).map(|value| ((*id).to_string(), value)))
        .collect()
}

pub(super) fn set_text(id: &str, text: &str) {
    if let Some(element) = element_by_id::<HtmlElement>(id) {
        element.set_inner_text(text);
    }
}

pub(super) fn set_inner_html(id: &str, html: &str) {
    if let Some(element) = element_by_id::<web_sys::Element>(id) {
        element.set_inner_html(html);
    }
}

pub(super) fn set_visible(id: &str, visible: bool) {
    if let Some(element) = element_by_id::<HtmlElement>(id) {
        let display = if visible { "block" } else { "none" };
        if element.style().set_property("display", display).is_err() {
            record_error(&format!("failed to set display={display} on #{id}"));
        }
    }
}

/// Shows `message` in an error slot, or hides the slot when `None`.
pub(super) fn set_error_slot(id: &str, message: Option<&str>) {
    match message {
        Some(message) => {
            set_text(id, message);
            set_visible(id, true);
        }
        None => set_visible(id, false),
    }
}

pub(super) fn set_button_enabled(id: &str, enabled: bool) {
    if let Some(button) = element_by_id::<HtmlButtonElement>(id) {
        button.set_disabled(!enabled);
    }
}

pub(super) fn render_field_indicator(field: &str, indicator: &FieldIndicator) {
    set_error_slot(
        &format!("{field}{FIELD_ERROR_SUFFIX}"),
        indicator.error.as_deref(),
    );
    set_visible(
        &format!("{field}{FIELD_SUCCESS_SUFFIX}"),
        indicator.success_visible,
    );
}

/// Attaches `handler` for `event` on element `id`. The closure lives until the
/// next view swap.
pub(super) fn bind_view_event(
    id: &str,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), String> {
    let element = element_by_id::<web_sys::EventTarget>(id)
        .ok_or_else(|| format!("missing #{id} element"))?;
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
    element
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|_| format!("failed to bind {event} on #{id}"))?;
    VIEW_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
    Ok(())
}

pub(super) fn release_view_handlers() {
    let handlers = VIEW_HANDLERS.with(|handlers| std::mem::take(&mut *handlers.borrow_mut()));
    drop(handlers);
}
