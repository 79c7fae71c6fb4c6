use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::deploy::{AppRecord, DeployPayload};

pub const LOGIN_API_PATH: &str = "/api/login";
pub const LIST_APPS_API_PATH: &str = "/api/listApps";
pub const VALIDATE_API_PREFIX: &str = "/api/validate";
pub const DEPLOY_API_PATH: &str = "/api/deploy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer_token: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// The request never produced a response (offline, DNS, CORS, aborted).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("network error: {0}")]
pub struct TransportError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{message} (status={status})")]
    Status { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Generic HTTP seam. The browser shell implements it with `gloo-net`;
/// tests script it.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone, Serialize)]
struct LoginRequestBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginResponseBody {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Server verdict for one field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Accepted,
    Rejected { message: Option<String> },
}

/// Typed client for the console's four endpoints.
pub struct ScriptsApi<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: HttpTransport> ScriptsApi<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the token, or `None` when the server answered 2xx without one.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<String>, ApiError> {
        let body = serde_json::to_value(LoginRequestBody { username, password })
            .map_err(|error| ApiError::Decode(error.to_string()))?;
        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: self.config.api_url(LOGIN_API_PATH),
                bearer_token: None,
                body: Some(body),
            })
            .await?;
        let decoded: LoginResponseBody = decode_json_response(&response)?;
        Ok(decoded
            .token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty()))
    }

    pub async fn list_apps(&self, token: &str) -> Result<Vec<AppRecord>, ApiError> {
        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: self.config.api_url(LIST_APPS_API_PATH),
                bearer_token: Some(token.to_string()),
                body: None,
            })
            .await?;
        decode_json_response(&response)
    }

    /// `path` is the relative path built by the validation controller.
    pub async fn check_field(&self, path: &str) -> Result<FieldCheck, TransportError> {
        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: self.config.api_url(path),
                bearer_token: None,
                body: None,
            })
            .await?;
        if response.is_success() {
            return Ok(FieldCheck::Accepted);
        }
        let message = serde_json::from_str::<ApiErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.error)
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty());
        Ok(FieldCheck::Rejected { message })
    }

    pub async fn deploy(&self, token: &str, payload: &DeployPayload) -> Result<(), ApiError> {
        let body =
            serde_json::to_value(payload).map_err(|error| ApiError::Decode(error.to_string()))?;
        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: self.config.api_url(DEPLOY_API_PATH),
                bearer_token: Some(token.to_string()),
                body: Some(body),
            })
            .await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(status_error(&response))
        }
    }
}

pub fn validate_api_path(endpoint: &str, field: &str, value: &str) -> String {
    format!(
        "{VALIDATE_API_PREFIX}/{endpoint}?{field}={}",
        urlencoding::encode(value)
    )
}

fn decode_json_response<D: DeserializeOwned>(response: &HttpResponse) -> Result<D, ApiError> {
    if !response.is_success() {
        return Err(status_error(response));
    }
    serde_json::from_str(&response.body).map_err(|error| ApiError::Decode(error.to_string()))
}

fn status_error(response: &HttpResponse) -> ApiError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(&response.body).ok();
    let message = parsed
        .and_then(|body| body.error.or(body.message))
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("request failed with status {}", response.status));
    ApiError::Status {
        status: response.status,
        message,
    }
}
