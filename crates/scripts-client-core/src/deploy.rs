use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

pub const PROJECT_NAME_FIELD: &str = "projectName";
pub const SUBDOMAIN_FIELD: &str = "subdomain";
pub const CONTAINER_IMAGE_FIELD: &str = "containerImage";
pub const LOCAL_PORT_FIELD: &str = "localPort";

/// Every input of the create form, tracked or not, by element id.
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployPayload {
    pub project_name: String,
    pub subdomain: String,
    pub container_image: String,
    pub local_port: String,
}

impl DeployPayload {
    pub fn from_form(form: &FormValues) -> Self {
        let value = |field: &str| form.get(field).cloned().unwrap_or_default();
        Self {
            project_name: value(PROJECT_NAME_FIELD),
            subdomain: value(SUBDOMAIN_FIELD),
            container_image: value(CONTAINER_IMAGE_FIELD),
            local_port: value(LOCAL_PORT_FIELD),
        }
    }
}

/// A deploy that passed the gate, with the bearer token to send it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDeploy {
    pub payload: DeployPayload,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub project_name: String,
    pub subdomain: String,
    pub container_image: String,
}

impl AppRecord {
    pub fn public_url(&self, app_domain: &str) -> String {
        format!("https://{}.{app_domain}", self.subdomain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("form is not ready to submit; waiting on: {}", pending.join(", "))]
    GateClosed { pending: Vec<String> },
    #[error("not signed in")]
    Unauthenticated,
    #[error("deploy rejected: {message} (status={status})")]
    Rejected { status: u16, message: String },
    #[error("deploy request failed: {0}")]
    Network(String),
    #[error("failed to encode deploy request: {0}")]
    Encode(String),
}

impl SubmissionError {
    /// Text for the form-level error slot.
    pub fn user_message(&self) -> String {
        match self {
            Self::GateClosed { .. } => "Fix the highlighted fields before deploying.".to_string(),
            Self::Unauthenticated => "Your session has ended. Sign in again.".to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Network(_) => "Could not reach the server. Try again.".to_string(),
            Self::Encode(_) => "Could not prepare the deploy request.".to_string(),
        }
    }
}

impl From<ApiError> for SubmissionError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Transport(error) => Self::Network(error.0),
            ApiError::Status { status, message } => Self::Rejected { status, message },
            ApiError::Decode(message) => Self::Encode(message),
        }
    }
}
