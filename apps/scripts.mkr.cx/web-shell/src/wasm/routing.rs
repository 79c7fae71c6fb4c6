use super::*;

/// The browser side of routing: `show` mounts a view, navigation goes through
/// `window.location` / `history`.
pub(super) struct BrowserHost;

impl ViewHost for BrowserHost {
    fn show(&mut self, view: View) {
        cancel_validation_timers();
        release_view_handlers();
        with_app_state(|state| state.enter_view(view));

        if let Err(error) = render_template(view.template_id()) {
            record_error(&format!("failed to render {}: {error}", view.template_id()));
            return;
        }
        if let Err(error) = init_view(view) {
            record_error(&format!("failed to initialize {}: {error}", view.template_id()));
        }
    }
}

impl Navigator for BrowserHost {
    fn soft_navigate(&mut self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = current_location();

        // Hash changes on the login page would keep the physical path at the
        // boundary, so move to the SPA root first without reloading.
        if location.is_login_boundary() {
            let Ok(history) = window.history() else {
                return;
            };
            let target = format!("/#{path}");
            if history
                .replace_state_with_url(&JsValue::NULL, "", Some(&target))
                .is_err()
            {
                record_error(&format!("failed to leave login page for {target}"));
                return;
            }
            schedule_route_handling();
            return;
        }

        if location.hash_path() == path {
            // Same fragment: no hashchange event will fire.
            schedule_route_handling();
            return;
        }
        if window.location().set_hash(path).is_err() {
            record_error(&format!("failed to navigate to #{path}"));
        }
    }

    fn hard_navigate(&mut self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if window.location().set_href(path).is_err() {
            record_error(&format!("failed to load {path}"));
        }
    }
}

pub(super) fn follow_navigation(navigation: Navigation) {
    Router::follow(&navigation, &mut BrowserHost);
}

/// Resolves the current location against the session and applies the result.
pub(super) fn handle_current_route() {
    let location = current_location();
    LAST_ROUTED_LOCATION.with(|last| *last.borrow_mut() = Some(location.clone()));
    let Some(outcome) = with_app_state(|state| state.resolve_route(&location)) else {
        return;
    };
    record_route_transition(&location, &outcome);
    Router::apply(&outcome, &mut BrowserHost);
}

/// Browsers fire both `popstate` and `hashchange` for one fragment change;
/// only the first of the pair is routed.
pub(super) fn handle_location_change() {
    let location = current_location();
    let already_routed =
        LAST_ROUTED_LOCATION.with(|last| last.borrow().as_ref() == Some(&location));
    if already_routed {
        return;
    }
    handle_current_route();
}

/// Defers route handling to a fresh task so it never runs inside the event
/// handler of the view it is about to replace.
pub(super) fn schedule_route_handling() {
    spawn_local(async {
        handle_current_route();
    });
}

pub(super) fn install_browser_navigation_handlers() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;

    ROUTE_HASHCHANGE_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return Ok(());
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            handle_location_change();
        }));
        window
            .add_event_listener_with_callback("hashchange", callback.as_ref().unchecked_ref())
            .map_err(|_| "failed to install hashchange handler".to_string())?;
        *slot.borrow_mut() = Some(callback);
        Ok(())
    })?;

    ROUTE_POPSTATE_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return Ok(());
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            handle_location_change();
        }));
        window
            .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
            .map_err(|_| "failed to install popstate handler".to_string())?;
        *slot.borrow_mut() = Some(callback);
        Ok(())
    })
}
