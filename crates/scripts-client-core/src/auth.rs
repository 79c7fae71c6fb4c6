use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{ApiError, HttpTransport, ScriptsApi};
use crate::route::ROOT_PATH;
use crate::router::{Navigation, Router};

pub const TOKEN_STORAGE_KEY: &str = "token";
pub const RETURN_URL_STORAGE_KEY: &str = "returnUrl";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session storage error: {0}")]
pub struct StorageError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("login rejected: {message} (status={status})")]
    Rejected { status: u16, message: String },
    #[error("login response did not include a token")]
    MissingToken,
    #[error("login request failed: {0}")]
    Network(String),
    #[error("failed to decode login response: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Transport(error) => Self::Network(error.0),
            ApiError::Status { status, message } => Self::Rejected { status, message },
            ApiError::Decode(message) => Self::Decode(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Trims the username; the password is sent as typed.
    pub fn normalized(&self) -> Result<Self, AuthError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Two slots: a durable session token and a browsing-session scoped return
/// path. In the browser these are `localStorage` and `sessionStorage`.
pub trait SessionStorage {
    fn load_token(&self) -> Option<String>;
    fn persist_token(&self, token: &str) -> Result<(), StorageError>;
    fn clear_token(&self) -> Result<(), StorageError>;
    fn load_return_path(&self) -> Option<String>;
    fn persist_return_path(&self, path: &str) -> Result<(), StorageError>;
    fn clear_return_path(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemorySlots {
    token: Option<String>,
    return_path: Option<String>,
}

/// In-process storage. Clones share the same slots, which lets a test keep a
/// handle to inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    slots: Rc<RefCell<MemorySlots>>,
}

impl MemorySessionStorage {
    pub fn with_token(token: &str) -> Self {
        let storage = Self::default();
        storage.slots.borrow_mut().token = Some(token.to_string());
        storage
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load_token(&self) -> Option<String> {
        self.slots.borrow().token.clone()
    }

    fn persist_token(&self, token: &str) -> Result<(), StorageError> {
        self.slots.borrow_mut().token = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        self.slots.borrow_mut().token = None;
        Ok(())
    }

    fn load_return_path(&self) -> Option<String> {
        self.slots.borrow().return_path.clone()
    }

    fn persist_return_path(&self, path: &str) -> Result<(), StorageError> {
        self.slots.borrow_mut().return_path = Some(path.to_string());
        Ok(())
    }

    fn clear_return_path(&self) -> Result<(), StorageError> {
        self.slots.borrow_mut().return_path = None;
        Ok(())
    }
}

/// Owns the session token and the pending return path.
pub struct SessionStore<S> {
    storage: S,
    authenticated: bool,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        let authenticated = non_empty(storage.load_token()).is_some();
        Self {
            storage,
            authenticated,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads durable storage, so a token cleared by another tab is noticed.
    pub fn is_authenticated(&self) -> bool {
        non_empty(self.storage.load_token()).is_some()
    }

    /// Last status recorded by `login`/`logout` (or at construction).
    pub fn marked_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn token(&self) -> Option<String> {
        non_empty(self.storage.load_token())
    }

    pub fn set_pending_return_path(&mut self, path: &str) -> Result<(), StorageError> {
        let path = if path.is_empty() { ROOT_PATH } else { path };
        self.storage.persist_return_path(path)
    }

    pub fn pending_return_path(&self) -> Option<String> {
        non_empty(self.storage.load_return_path())
    }

    /// Reads and clears the pending return path, defaulting to `/`.
    pub fn take_pending_return_path(&mut self) -> String {
        let path = non_empty(self.storage.load_return_path());
        if let Err(error) = self.storage.clear_return_path() {
            tracing::warn!(%error, "failed to clear pending return path");
        }
        path.unwrap_or_else(|| ROOT_PATH.to_string())
    }

    /// Applies the outcome of [`request_login`]. Hosts that keep the store
    /// behind a `RefCell` await the request first and only borrow the store
    /// for this step.
    pub fn complete_login(
        &mut self,
        response: Result<Option<String>, AuthError>,
    ) -> Result<Navigation, AuthError> {
        let token = match response {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::info!("login response carried no token");
                return Err(AuthError::MissingToken);
            }
            Err(error) => {
                tracing::info!(%error, "login failed");
                return Err(error);
            }
        };

        self.storage.persist_token(&token)?;
        self.authenticated = true;
        let destination = self.take_pending_return_path();
        tracing::info!(destination = %destination, "login succeeded");
        Ok(Router::navigate(&destination))
    }

    pub fn logout(&mut self) -> Navigation {
        if let Err(error) = self.storage.clear_token() {
            tracing::warn!(%error, "failed to clear session token");
        }
        self.authenticated = false;
        tracing::info!("logged out");
        Navigation::Hard(crate::route::LOGIN_PATH.to_string())
    }
}

/// Network half of a login. Blank credentials are rejected before anything is
/// sent.
pub async fn request_login<T: HttpTransport>(
    credentials: &Credentials,
    api: &ScriptsApi<T>,
) -> Result<Option<String>, AuthError> {
    let credentials = credentials.normalized()?;
    let token = api
        .login(&credentials.username, &credentials.password)
        .await?;
    Ok(token)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TransportError;

    #[test]
    fn credentials_trim_username_and_require_both_fields() {
        let normalized = Credentials::new("  admin ", "s3cret")
            .normalized()
            .expect("valid credentials");
        assert_eq!(normalized.username, "admin");
        assert_eq!(
            Credentials::new("   ", "x").normalized(),
            Err(AuthError::EmptyUsername)
        );
        assert_eq!(
            Credentials::new("admin", "").normalized(),
            Err(AuthError::EmptyPassword)
        );
    }

    #[test]
    fn authenticated_iff_token_present() {
        let storage = MemorySessionStorage::default();
        let session = SessionStore::new(storage.clone());
        assert!(!session.is_authenticated());

        storage.persist_token("tok").expect("persist");
        assert!(session.is_authenticated());

        storage.persist_token("   ").expect("persist");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn take_pending_return_path_reads_once() {
        let mut session = SessionStore::new(MemorySessionStorage::default());
        session.set_pending_return_path("/create").expect("persist");
        assert_eq!(session.take_pending_return_path(), "/create");
        assert_eq!(session.take_pending_return_path(), "/");
        assert_eq!(session.pending_return_path(), None);
    }

    #[test]
    fn new_pending_path_overwrites_previous() {
        let mut session = SessionStore::new(MemorySessionStorage::default());
        session.set_pending_return_path("/apps").expect("persist");
        session.set_pending_return_path("/create").expect("persist");
        assert_eq!(session.take_pending_return_path(), "/create");
    }

    #[test]
    fn empty_pending_path_is_stored_as_root() {
        let mut session = SessionStore::new(MemorySessionStorage::default());
        session.set_pending_return_path("").expect("persist");
        assert_eq!(session.pending_return_path().as_deref(), Some("/"));
    }

    #[test]
    fn complete_login_persists_token_and_replays_pending_path() {
        let storage = MemorySessionStorage::default();
        let mut session = SessionStore::new(storage.clone());
        session.set_pending_return_path("/apps").expect("persist");

        let navigation = session
            .complete_login(Ok(Some("tok-1".to_string())))
            .expect("login succeeds");

        assert_eq!(navigation, Navigation::Soft("/apps".to_string()));
        assert_eq!(storage.load_token().as_deref(), Some("tok-1"));
        assert_eq!(storage.load_return_path(), None);
        assert!(session.marked_authenticated());
    }

    #[test]
    fn failed_login_leaves_pending_path_untouched() {
        let storage = MemorySessionStorage::default();
        let mut session = SessionStore::new(storage.clone());
        session.set_pending_return_path("/create").expect("persist");

        let missing = session.complete_login(Ok(None));
        assert_eq!(missing, Err(AuthError::MissingToken));

        let network = session.complete_login(Err(AuthError::from(ApiError::Transport(
            TransportError("offline".to_string()),
        ))));
        assert_eq!(network, Err(AuthError::Network("offline".to_string())));

        let rejected = session.complete_login(Err(AuthError::from(ApiError::Status {
            status: 401,
            message: "bad credentials".to_string(),
        })));
        assert_eq!(
            rejected,
            Err(AuthError::Rejected {
                status: 401,
                message: "bad credentials".to_string()
            })
        );

        assert!(!session.is_authenticated());
        assert_eq!(storage.load_return_path().as_deref(), Some("/create"));
    }

    #[test]
    fn logout_clears_token_and_hard_navigates_to_login() {
        let storage = MemorySessionStorage::with_token("tok");
        let mut session = SessionStore::new(storage.clone());
        assert!(session.marked_authenticated());

        let navigation = session.logout();

        assert_eq!(navigation, Navigation::Hard("/login".to_string()));
        assert!(!session.is_authenticated());
        assert!(!session.marked_authenticated());
        assert_eq!(storage.load_token(), None);
    }
}
