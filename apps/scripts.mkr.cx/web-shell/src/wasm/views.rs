use super::*;

pub(super) fn init_view(view: View) -> Result<(), String> {
    match view {
        View::Login => init_login_view(),
        View::AppsList => init_apps_list_view(),
        View::CreateApp => init_create_app_view(),
    }
}

fn init_login_view() -> Result<(), String> {
    set_error_slot(LOGIN_ERROR_ID, None);
    bind_view_event(LOGIN_FORM_ID, "submit", |event| {
        event.prevent_default();
        let credentials = Credentials::new(
            read_input_value(LOGIN_USERNAME_ID).unwrap_or_default(),
            read_input_value(LOGIN_PASSWORD_ID).unwrap_or_default(),
        );
        spawn_local(login_flow(credentials));
    })
}

async fn login_flow(credentials: Credentials) {
    let Some(api) = api_client() else {
        return;
    };

    set_button_enabled(LOGIN_SUBMIT_ID, false);
    let response = request_login(&credentials, &api).await;
    set_button_enabled(LOGIN_SUBMIT_ID, true);

    let Some(result) = with_app_state(|state| state.session.complete_login(response)) else {
        return;
    };
    match result {
        Ok(navigation) => {
            set_error_slot(LOGIN_ERROR_ID, None);
            follow_navigation(navigation);
        }
        Err(error) => {
            record_error(&error.to_string());
            set_error_slot(LOGIN_ERROR_ID, Some(&login_error_message(&error)));
        }
    }
}

fn login_error_message(error: &AuthError) -> String {
    match error {
        AuthError::EmptyUsername | AuthError::EmptyPassword => error.to_string(),
        AuthError::Rejected { .. } | AuthError::MissingToken => {
            "Invalid username or password.".to_string()
        }
        AuthError::Network(_) => "Could not reach the server. Try again.".to_string(),
        AuthError::Decode(_) | AuthError::Storage(_) => "Sign-in failed. Try again.".to_string(),
    }
}

fn init_apps_list_view() -> Result<(), String> {
    set_error_slot(APPS_LIST_ERROR_ID, None);
    bind_view_event(NEW_APP_BUTTON_ID, "click", |_event| {
        follow_navigation(Router::navigate(CREATE_PATH));
    })?;
    // The logout control is optional in the listing template.
    if element_by_id::<web_sys::Element>(LOGOUT_BUTTON_ID).is_some() {
        bind_view_event(LOGOUT_BUTTON_ID, "click", |_event| logout_flow())?;
    }
    spawn_local(load_apps());
    Ok(())
}

async fn load_apps() {
    let Some((api, token)) = with_app_state(|state| {
        (
            ScriptsApi::new(GlooTransport, state.config.clone()),
            state.session.token(),
        )
    }) else {
        return;
    };
    let Some(token) = token else {
        logout_flow();
        return;
    };

    match api.list_apps(&token).await {
        Ok(apps) => {
            set_inner_html(
                APPS_LIST_ID,
                &render_apps_list(&apps, &api.config().app_domain),
            );
        }
        Err(error) if error.is_unauthorized() => {
            record_error("session rejected by listApps; signing out");
            logout_flow();
        }
        Err(error) => {
            record_error(&format!("failed to load apps: {error}"));
            set_error_slot(APPS_LIST_ERROR_ID, Some(&apps_error_message(&error)));
        }
    }
}

fn apps_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Transport(_) => "Could not reach the server.".to_string(),
        ApiError::Status { message, .. } => message.clone(),
        ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
    }
}

fn init_create_app_view() -> Result<(), String> {
    set_error_slot(DEPLOY_ERROR_ID, None);
    set_button_enabled(DEPLOY_SUBMIT_ID, false);

    let fields: Vec<String> = with_app_state(|state| {
        state
            .validation
            .as_ref()
            .map(|validation| {
                validation
                    .fields()
                    .iter()
                    .map(|field| field.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    })
    .unwrap_or_default();

    for field in fields {
        let input_field = field.clone();
        bind_view_event(&field, "input", move |_event| {
            on_field_input(&input_field);
        })?;
    }

    bind_view_event(DEPLOY_FORM_ID, "submit", |event| {
        event.prevent_default();
        spawn_local(submit_flow(read_form_values(&DEPLOY_FORM_INPUT_IDS)));
    })
}

fn on_field_input(field: &str) {
    let value = read_input_value(field).unwrap_or_default();
    let Some(scheduled) = with_app_state(|state| {
        state
            .validation_mut()
            .and_then(|validation| validation.input_changed(field, &value))
    })
    .flatten() else {
        return;
    };

    set_button_enabled(DEPLOY_SUBMIT_ID, scheduled.submit_enabled);
    if let Some(cancelled) = scheduled.cancelled {
        cancel_validation_timer(cancelled);
    }
    schedule_validation_timer(scheduled.field, scheduled.timer, scheduled.delay);
}

fn schedule_validation_timer(field: String, timer: TimerId, delay: std::time::Duration) {
    let (abort_handle, registration) = AbortHandle::new_pair();
    VALIDATION_TIMERS.with(|timers| {
        timers.borrow_mut().insert(timer, abort_handle);
    });
    spawn_local(async move {
        if Abortable::new(sleep(delay), registration).await.is_ok() {
            VALIDATION_TIMERS.with(|timers| {
                timers.borrow_mut().remove(&timer);
            });
            validate_field(field, timer).await;
        }
    });
}

fn cancel_validation_timer(timer: TimerId) {
    if let Some(handle) = VALIDATION_TIMERS.with(|timers| timers.borrow_mut().remove(&timer)) {
        handle.abort();
    }
}

pub(super) fn cancel_validation_timers() {
    let handles = VALIDATION_TIMERS.with(|timers| std::mem::take(&mut *timers.borrow_mut()));
    for handle in handles.into_values() {
        handle.abort();
    }
    with_app_state(|state| {
        if let Some(validation) = state.validation_mut() {
            validation.cancel_timers();
        }
    });
}

async fn validate_field(field: String, timer: TimerId) {
    let Some(request) = with_app_state(|state| {
        state
            .validation_mut()
            .and_then(|validation| validation.timer_elapsed(&field, timer))
    })
    .flatten() else {
        return;
    };
    let Some(api) = api_client() else {
        return;
    };

    record_validation_request();
    let outcome = run_check(&api, &request).await;

    let change = with_app_state(|state| {
        state
            .validation_mut()
            .and_then(|validation| validation.apply_response(&request, outcome))
    })
    .flatten();
    match change {
        Some(change) => {
            render_field_indicator(&change.field, &change.indicator);
            set_button_enabled(DEPLOY_SUBMIT_ID, change.submit_enabled);
        }
        None => record_stale_validation_response(),
    }
}

async fn submit_flow(form: FormValues) {
    let Some(prepared) = with_app_state(|state| state.prepare_deploy(&form)) else {
        return;
    };
    let prepared = match prepared {
        Ok(prepared) => prepared,
        Err(error) => {
            set_error_slot(DEPLOY_ERROR_ID, Some(&error.user_message()));
            return;
        }
    };
    let Some(api) = api_client() else {
        return;
    };

    set_error_slot(DEPLOY_ERROR_ID, None);
    set_button_enabled(DEPLOY_SUBMIT_ID, false);
    match send_deploy(&api, &prepared).await {
        Ok(navigation) => follow_navigation(navigation),
        Err(error) => {
            record_error(&error.to_string());
            set_error_slot(DEPLOY_ERROR_ID, Some(&error.user_message()));
            let gate = with_app_state(|state| state.submit_enabled()).unwrap_or(false);
            set_button_enabled(DEPLOY_SUBMIT_ID, gate);
        }
    }
}
