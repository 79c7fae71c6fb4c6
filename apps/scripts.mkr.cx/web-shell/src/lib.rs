#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod apps_list;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use futures_util::future::{AbortHandle, Abortable};
    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use scripts_client_core::route::CREATE_PATH;
    use scripts_client_core::{
        ApiError, AppState, AuthError, ClientConfig, Credentials, FieldIndicator, FormValues,
        HttpMethod, HttpRequest, HttpResponse, HttpTransport, Location, Navigation, Navigator,
        RouteOutcome, Router, ScriptsApi, SessionStorage, StorageError, TimerId, TransportError,
        View, ViewHost, request_login, run_check, send_deploy,
    };
    use serde::Serialize;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlButtonElement, HtmlElement, HtmlInputElement};

    use crate::apps_list::render_apps_list;
    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod network;
    mod routing;
    mod storage;
    mod views;

    use dom::*;
    use lifecycle::*;
    use network::*;
    use routing::*;
    use storage::*;
    use views::*;

    thread_local! {
        static APP_STATE: RefCell<Option<AppState<BrowserSessionStorage>>> = const { RefCell::new(None) };
        static DIAGNOSTICS: RefCell<ShellDiagnostics> = RefCell::new(ShellDiagnostics::default());
        static VALIDATION_TIMERS: RefCell<HashMap<TimerId, AbortHandle>> = RefCell::new(HashMap::new());
        static VIEW_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static LAST_ROUTED_LOCATION: RefCell<Option<Location>> = const { RefCell::new(None) };
        static ROUTE_HASHCHANGE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static ROUTE_POPSTATE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[derive(Debug, Clone, Serialize)]
    struct ShellDiagnostics {
        phase: String,
        detail: String,
        route_path: String,
        active_view: Option<String>,
        route_transitions: u64,
        validation_requests: u64,
        stale_validation_responses: u64,
        last_error: Option<String>,
    }

    impl Default for ShellDiagnostics {
        fn default() -> Self {
            Self {
                phase: "idle".to_string(),
                detail: "console shell not started".to_string(),
                route_path: "/".to_string(),
                active_view: None,
                route_transitions: 0,
                validation_requests: 0,
                stale_validation_responses: 0,
                last_error: None,
            }
        }
    }

    #[derive(Debug, Clone, Serialize)]
    struct AppStateSnapshot {
        authenticated: bool,
        router_state: Option<scripts_client_core::RouterState>,
        active_view: Option<View>,
        validations: Option<std::collections::BTreeMap<String, bool>>,
        submit_enabled: Option<bool>,
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        set_shell_phase("booting", "initializing console shell");
        if let Err(error) = boot() {
            set_shell_error(&error);
        }
    }

    #[wasm_bindgen]
    pub fn shell_diagnostics_json() -> String {
        DIAGNOSTICS.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            })
        })
    }

    #[wasm_bindgen]
    pub fn app_state_json() -> String {
        let snapshot = with_app_state(|state| AppStateSnapshot {
            authenticated: state.session.is_authenticated(),
            router_state: state.router.state().cloned(),
            active_view: state.active_view,
            validations: state.validation.as_ref().map(|v| v.state().clone()),
            submit_enabled: state.validation.as_ref().map(|_| state.submit_enabled()),
        });
        snapshot
            .and_then(|snapshot| serde_json::to_string(&snapshot).ok())
            .unwrap_or_else(|| "{}".to_string())
    }

    #[wasm_bindgen]
    pub fn navigate(path: String) {
        follow_navigation(Router::navigate(&path));
    }

    #[wasm_bindgen]
    pub fn logout() {
        logout_flow();
    }

    fn boot() -> Result<(), String> {
        let config = load_client_config();
        APP_STATE.with(|state| {
            *state.borrow_mut() = Some(AppState::new(config, BrowserSessionStorage));
        });

        install_browser_navigation_handlers()?;
        set_shell_phase("ready", "routing active");
        handle_current_route();
        Ok(())
    }

    /// Runs `f` against the app state. Never hold the borrow across an await.
    fn with_app_state<T>(f: impl FnOnce(&mut AppState<BrowserSessionStorage>) -> T) -> Option<T> {
        APP_STATE.with(|state| state.borrow_mut().as_mut().map(f))
    }

    fn api_client() -> Option<ScriptsApi<GlooTransport>> {
        with_app_state(|state| ScriptsApi::new(GlooTransport, state.config.clone()))
    }

    fn load_client_config() -> ClientConfig {
        let Some(raw) = read_config_global() else {
            return ClientConfig::default();
        };
        match ClientConfig::from_json(&raw) {
            Ok(config) => config,
            Err(error) => {
                log_console_warning(&format!("ignoring {CONFIG_GLOBAL}: {error}"));
                ClientConfig::default()
            }
        }
    }

    fn logout_flow() {
        if let Some(navigation) = with_app_state(|state| state.session.logout()) {
            follow_navigation(navigation);
        }
    }
}
