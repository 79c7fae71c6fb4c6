use crate::auth::{SessionStorage, SessionStore};
use crate::config::ClientConfig;
use crate::deploy::{FormValues, PreparedDeploy, SubmissionError};
use crate::route::{Location, View};
use crate::router::{RouteOutcome, Router};
use crate::validation::{TrackedField, ValidationController};

/// Application state handed to the shell's event handlers. Created once at
/// boot; nothing in the core reaches for a global.
pub struct AppState<S> {
    pub config: ClientConfig,
    pub session: SessionStore<S>,
    pub router: Router,
    /// Present only while the create view is mounted.
    pub validation: Option<ValidationController>,
    pub active_view: Option<View>,
    /// Create-view mounts so far; each mount tags its validation requests.
    create_mounts: u64,
}

impl<S: SessionStorage> AppState<S> {
    pub fn new(config: ClientConfig, storage: S) -> Self {
        Self {
            config,
            session: SessionStore::new(storage),
            router: Router::new(),
            validation: None,
            active_view: None,
            create_mounts: 0,
        }
    }

    pub fn resolve_route(&mut self, location: &Location) -> RouteOutcome {
        self.router.resolve(location, &mut self.session)
    }

    /// Records the view being mounted. Entering the create view starts a
    /// fresh validation controller; leaving it drops the old one.
    pub fn enter_view(&mut self, view: View) {
        self.active_view = Some(view);
        self.validation = match view {
            View::CreateApp => {
                self.create_mounts = self.create_mounts.saturating_add(1);
                Some(
                    ValidationController::for_deploy_form(&self.config)
                        .with_mount(self.create_mounts),
                )
            }
            View::Login | View::AppsList => None,
        };
    }

    pub fn validation_mut(&mut self) -> Option<&mut ValidationController> {
        self.validation.as_mut()
    }

    pub fn submit_enabled(&self) -> bool {
        self.validation
            .as_ref()
            .is_some_and(ValidationController::submit_gate)
    }

    /// Gate check and token lookup for the mounted create form.
    pub fn prepare_deploy(&self, form: &FormValues) -> Result<PreparedDeploy, SubmissionError> {
        match self.validation.as_ref() {
            Some(validation) => validation.prepare_deploy(form, &self.session),
            None => Err(SubmissionError::GateClosed {
                pending: TrackedField::deploy_form_fields()
                    .into_iter()
                    .map(|field| field.name)
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStorage;
    use crate::validation::ValidationOutcome;

    #[test]
    fn create_view_gets_a_fresh_controller_each_time() {
        let mut state = AppState::new(
            ClientConfig::default(),
            MemorySessionStorage::with_token("tok"),
        );

        state.enter_view(View::CreateApp);
        let scheduled = state
            .validation_mut()
            .and_then(|validation| validation.input_changed("projectName", "api"))
            .expect("tracked field");

        state.enter_view(View::AppsList);
        assert!(state.validation.is_none());

        state.enter_view(View::CreateApp);
        let validation = state.validation_mut().expect("controller");
        assert_eq!(validation.timer_elapsed("projectName", scheduled.timer), None);
        assert!(!validation.submit_gate());
    }

    #[test]
    fn late_response_from_previous_create_mount_is_discarded() {
        let mut state = AppState::new(
            ClientConfig::default(),
            MemorySessionStorage::with_token("tok"),
        );

        state.enter_view(View::CreateApp);
        let validation = state.validation_mut().expect("controller");
        let timer = validation
            .input_changed("subdomain", "taken")
            .expect("tracked")
            .timer;
        let old = validation
            .timer_elapsed("subdomain", timer)
            .expect("request");

        state.enter_view(View::AppsList);
        state.enter_view(View::CreateApp);
        let validation = state.validation_mut().expect("controller");
        let timer = validation
            .input_changed("subdomain", "taken")
            .expect("tracked")
            .timer;
        let new = validation
            .timer_elapsed("subdomain", timer)
            .expect("request");
        assert_eq!(old.seq, new.seq);
        assert_ne!(old.mount, new.mount);

        validation
            .apply_response(
                &new,
                ValidationOutcome::Rejected {
                    message: Some("already taken".to_string()),
                },
            )
            .expect("current response applies");
        assert_eq!(validation.apply_response(&old, ValidationOutcome::Valid), None);

        assert!(!validation.is_valid("subdomain"));
        assert!(!state.submit_enabled());
    }

    #[test]
    fn prepare_deploy_without_create_view_is_gated() {
        let state = AppState::new(
            ClientConfig::default(),
            MemorySessionStorage::with_token("tok"),
        );
        assert!(matches!(
            state.prepare_deploy(&FormValues::new()),
            Err(SubmissionError::GateClosed { .. })
        ));
    }

    #[test]
    fn resolve_route_uses_owned_session() {
        let mut state = AppState::new(ClientConfig::default(), MemorySessionStorage::default());
        let outcome = state.resolve_route(&Location::new("/", "#/create"));
        assert!(matches!(outcome, RouteOutcome::Redirect(_)));
        assert_eq!(state.session.pending_return_path().as_deref(), Some("/create"));
    }
}
