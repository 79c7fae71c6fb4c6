//! Client core for the scripts deploy console.
//!
//! Everything here is platform-agnostic: browser storage, HTTP, timers and
//! rendering are reached through the traits in [`auth`], [`api`] and
//! [`router`], so the same state machines run in the WASM shell and in tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod debounce;
pub mod deploy;
pub mod route;
pub mod router;
pub mod state;
pub mod validation;

pub use api::{
    ApiError, FieldCheck, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ScriptsApi,
    TransportError,
};
pub use auth::{
    AuthError, Credentials, MemorySessionStorage, SessionStorage, SessionStore, StorageError,
    request_login,
};
pub use config::{ClientConfig, ConfigError};
pub use debounce::{Debouncer, Restart, TimerId};
pub use deploy::{AppRecord, DeployPayload, FormValues, PreparedDeploy, SubmissionError};
pub use route::{LOGIN_PATH, Location, Route, View};
pub use router::{Navigation, Navigator, RouteOutcome, Router, RouterState, ViewHost};
pub use state::AppState;
pub use validation::{
    FieldIndicator, GateChange, ScheduledValidation, TrackedField, ValidationController,
    ValidationOutcome, ValidationRequest, finish_submission, run_check, send_deploy,
};
