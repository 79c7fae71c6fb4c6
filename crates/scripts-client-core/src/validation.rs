//! Per-field remote validation and the submit gate of the create form.
//!
//! Flow for one field: `input_changed` restarts the debounce timer, the host
//! fires it back through `timer_elapsed` which issues a numbered
//! [`ValidationRequest`], and the response comes back through
//! `apply_response`. Only the latest request for a field may change state.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::Serialize;

use crate::api::{
    ApiError, FieldCheck, HttpTransport, ScriptsApi, TransportError, validate_api_path,
};
use crate::auth::{SessionStorage, SessionStore};
use crate::config::ClientConfig;
use crate::debounce::{Debouncer, TimerId};
use crate::deploy::{
    CONTAINER_IMAGE_FIELD, DeployPayload, FormValues, PROJECT_NAME_FIELD, PreparedDeploy,
    SUBDOMAIN_FIELD, SubmissionError,
};
use crate::route::APPS_PATH;
use crate::router::{Navigation, Router};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedField {
    pub name: String,
    /// Last path segment of `/api/validate/{endpoint}`.
    pub endpoint: String,
}

impl TrackedField {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn deploy_form_fields() -> Vec<Self> {
        vec![
            Self::new(PROJECT_NAME_FIELD, "projectName"),
            Self::new(SUBDOMAIN_FIELD, "domain"),
            Self::new(CONTAINER_IMAGE_FIELD, "image"),
        ]
    }
}

/// Timer the host must start (and the one it should drop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledValidation {
    pub field: String,
    pub timer: TimerId,
    pub cancelled: Option<TimerId>,
    pub delay: Duration,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub field: String,
    /// Mount of the controller that issued the request.
    pub mount: u64,
    pub seq: u64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Rejected { message: Option<String> },
    TransportFailed,
}

impl From<Result<FieldCheck, TransportError>> for ValidationOutcome {
    fn from(result: Result<FieldCheck, TransportError>) -> Self {
        match result {
            Ok(FieldCheck::Accepted) => Self::Valid,
            Ok(FieldCheck::Rejected { message }) => Self::Rejected { message },
            Err(_) => Self::TransportFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FieldIndicator {
    pub error: Option<String>,
    pub success_visible: bool,
}

/// Result of an applied (non-stale) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateChange {
    pub field: String,
    pub indicator: FieldIndicator,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct FieldSequence {
    issued: u64,
    /// Requests numbered at or below this were issued for a value that has
    /// since been edited.
    superseded_through: u64,
}

pub struct ValidationController {
    mount: u64,
    fields: Vec<TrackedField>,
    state: BTreeMap<String, bool>,
    sequences: HashMap<String, FieldSequence>,
    indicators: BTreeMap<String, FieldIndicator>,
    debouncer: Debouncer<String, String>,
}

impl ValidationController {
    pub fn new(fields: Vec<TrackedField>, debounce_window: Duration) -> Self {
        let state = fields
            .iter()
            .map(|field| (field.name.clone(), false))
            .collect();
        Self {
            mount: 0,
            fields,
            state,
            sequences: HashMap::new(),
            indicators: BTreeMap::new(),
            debouncer: Debouncer::new(debounce_window),
        }
    }

    pub fn for_deploy_form(config: &ClientConfig) -> Self {
        Self::new(TrackedField::deploy_form_fields(), config.debounce_window)
    }

    /// Tags the controller with a view mount id. Responses to requests issued
    /// under another mount never apply, even if their sequence numbers match.
    #[must_use]
    pub fn with_mount(mut self, mount: u64) -> Self {
        self.mount = mount;
        self
    }

    pub fn mount(&self) -> u64 {
        self.mount
    }

    pub fn fields(&self) -> &[TrackedField] {
        &self.fields
    }

    pub fn is_tracked(&self, field: &str) -> bool {
        self.tracked(field).is_some()
    }

    pub fn state(&self) -> &BTreeMap<String, bool> {
        &self.state
    }

    pub fn is_valid(&self, field: &str) -> bool {
        self.state.get(field).copied().unwrap_or(false)
    }

    pub fn indicator(&self, field: &str) -> FieldIndicator {
        self.indicators.get(field).cloned().unwrap_or_default()
    }

    pub fn submit_gate(&self) -> bool {
        self.fields.iter().all(|field| self.is_valid(&field.name))
    }

    pub fn pending_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| !self.is_valid(&field.name))
            .map(|field| field.name.clone())
            .collect()
    }

    /// Records an edit. The field counts as invalid until a check of the new
    /// value comes back valid. Untracked fields are ignored.
    pub fn input_changed(&mut self, field: &str, value: &str) -> Option<ScheduledValidation> {
        let name = self.tracked(field)?.name.clone();

        self.state.insert(name.clone(), false);
        let sequence = self.sequences.entry(name.clone()).or_default();
        sequence.superseded_through = sequence.issued;

        let restart = self.debouncer.restart(name.clone(), value.to_string());
        tracing::debug!(field = %name, timer = restart.scheduled.get(), "validation debounce restarted");
        Some(ScheduledValidation {
            field: name,
            timer: restart.scheduled,
            cancelled: restart.cancelled,
            delay: restart.delay,
            submit_enabled: self.submit_gate(),
        })
    }

    /// Called when a debounce timer fires. Returns the request to send if the
    /// timer is still current.
    pub fn timer_elapsed(&mut self, field: &str, timer: TimerId) -> Option<ValidationRequest> {
        let endpoint = self.tracked(field)?.endpoint.clone();
        let value = self.debouncer.elapse(&field.to_string(), timer)?;

        let sequence = self.sequences.entry(field.to_string()).or_default();
        sequence.issued = sequence.issued.saturating_add(1);
        let seq = sequence.issued;

        tracing::debug!(field, mount = self.mount, seq, "issuing field validation");
        Some(ValidationRequest {
            field: field.to_string(),
            mount: self.mount,
            seq,
            path: validate_api_path(&endpoint, field, &value),
        })
    }

    pub fn is_current(&self, request: &ValidationRequest) -> bool {
        if request.mount != self.mount {
            return false;
        }
        self.sequences
            .get(&request.field)
            .is_some_and(|sequence| {
                request.seq == sequence.issued && request.seq > sequence.superseded_through
            })
    }

    /// Applies a response unless a newer request (or edit) superseded it.
    pub fn apply_response(
        &mut self,
        request: &ValidationRequest,
        outcome: ValidationOutcome,
    ) -> Option<GateChange> {
        if !self.is_current(request) {
            tracing::debug!(field = %request.field, seq = request.seq, "discarding stale validation response");
            return None;
        }

        let field = request.field.clone();
        let (valid, indicator) = match outcome {
            ValidationOutcome::Valid => (
                true,
                FieldIndicator {
                    error: None,
                    success_visible: true,
                },
            ),
            ValidationOutcome::Rejected { message } => (
                false,
                FieldIndicator {
                    error: Some(message.unwrap_or_else(|| format!("Invalid {field}"))),
                    success_visible: false,
                },
            ),
            ValidationOutcome::TransportFailed => (
                false,
                FieldIndicator {
                    error: Some(format!("Error validating {field}")),
                    success_visible: false,
                },
            ),
        };

        self.state.insert(field.clone(), valid);
        self.indicators.insert(field.clone(), indicator.clone());
        Some(GateChange {
            field,
            indicator,
            submit_enabled: self.submit_gate(),
        })
    }

    /// Drops all scheduled timers, e.g. when the create view is torn down.
    pub fn cancel_timers(&mut self) -> Vec<TimerId> {
        self.debouncer.cancel_all()
    }

    pub fn prepare_submission(&self, form: &FormValues) -> Result<DeployPayload, SubmissionError> {
        let payload = DeployPayload::from_form(form);
        if !self.submit_gate() {
            return Err(SubmissionError::GateClosed {
                pending: self.pending_fields(),
            });
        }
        Ok(payload)
    }

    /// Synchronous half of a deploy: gate check, payload and bearer token.
    /// Nothing is sent when this fails.
    pub fn prepare_deploy<S: SessionStorage>(
        &self,
        form: &FormValues,
        session: &SessionStore<S>,
    ) -> Result<PreparedDeploy, SubmissionError> {
        let payload = self.prepare_submission(form)?;
        let token = session.token().ok_or(SubmissionError::Unauthenticated)?;
        Ok(PreparedDeploy { payload, token })
    }

    fn tracked(&self, field: &str) -> Option<&TrackedField> {
        self.fields.iter().find(|tracked| tracked.name == field)
    }
}

/// Sends one validation request and classifies the result.
pub async fn run_check<T: HttpTransport>(
    api: &ScriptsApi<T>,
    request: &ValidationRequest,
) -> ValidationOutcome {
    api.check_field(&request.path).await.into()
}

/// Posts a prepared deploy; success navigates to the listing.
pub async fn send_deploy<T: HttpTransport>(
    api: &ScriptsApi<T>,
    prepared: &PreparedDeploy,
) -> Result<Navigation, SubmissionError> {
    finish_submission(api.deploy(&prepared.token, &prepared.payload).await)
}

pub fn finish_submission(result: Result<(), ApiError>) -> Result<Navigation, SubmissionError> {
    match result {
        Ok(()) => {
            tracing::info!("deploy accepted");
            Ok(Router::navigate(APPS_PATH))
        }
        Err(error) => {
            tracing::warn!(%error, "deploy failed");
            Err(error.into())
        }
    }
}
