use serde::Serialize;

use crate::auth::{SessionStorage, SessionStore};
use crate::route::{LOGIN_PATH, Location, ROOT_PATH, Route, View};

/// A navigation request. `Soft` changes the hash and is observed by the
/// running shell; `Hard` reloads the page at a physical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum Navigation {
    Soft(String),
    Hard(String),
}

impl Navigation {
    pub fn path(&self) -> &str {
        match self {
            Self::Soft(path) | Self::Hard(path) => path,
        }
    }
}

/// Swaps the visible content for a view and runs that view's init.
pub trait ViewHost {
    fn show(&mut self, view: View);
}

pub trait Navigator {
    /// Sets the hash fragment; the shell re-enters [`Router::handle_route`]
    /// through its location-change listener.
    fn soft_navigate(&mut self, path: &str);
    /// Full page load; in-memory state is gone afterwards.
    fn hard_navigate(&mut self, path: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "route")]
pub enum RouterState {
    AtLoginBoundary,
    AtProtectedRoute(Route),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "target")]
pub enum RouteOutcome {
    Render(View),
    Redirect(Navigation),
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    state: Option<RouterState>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&RouterState> {
        self.state.as_ref()
    }

    pub fn navigate(path: &str) -> Navigation {
        if path == LOGIN_PATH {
            Navigation::Hard(LOGIN_PATH.to_string())
        } else {
            Navigation::Soft(path.to_string())
        }
    }

    /// Decides what the current location should do and performs the session
    /// side effects of that decision (return-path replay or capture). The
    /// outcome still has to be applied to a host; see [`Self::apply`].
    pub fn resolve<S: SessionStorage>(
        &mut self,
        location: &Location,
        session: &mut SessionStore<S>,
    ) -> RouteOutcome {
        if location.is_login_boundary() {
            self.state = Some(RouterState::AtLoginBoundary);
            if session.is_authenticated() {
                let destination = session.take_pending_return_path();
                tracing::debug!(destination = %destination, "already authenticated at login boundary");
                return RouteOutcome::Redirect(Self::navigate(&destination));
            }
            return RouteOutcome::Render(View::Login);
        }

        let hash_path = location.hash_path();
        let route = Route::from_hash_path(&hash_path);
        self.state = Some(RouterState::AtProtectedRoute(route.clone()));

        if !session.is_authenticated() {
            // Must land in storage before the hard navigation drops this page.
            if let Err(error) = session.set_pending_return_path(&hash_path) {
                tracing::warn!(%error, path = %hash_path, "failed to persist return path");
            }
            tracing::debug!(path = %hash_path, "unauthenticated visit, redirecting to login");
            return RouteOutcome::Redirect(Navigation::Hard(LOGIN_PATH.to_string()));
        }

        match route.view() {
            Some(view) => RouteOutcome::Render(view),
            None => {
                tracing::debug!(path = %hash_path, "unknown route, falling back to root");
                RouteOutcome::Redirect(Self::navigate(ROOT_PATH))
            }
        }
    }

    pub fn apply<H: ViewHost + Navigator>(outcome: &RouteOutcome, host: &mut H) {
        match outcome {
            RouteOutcome::Render(view) => host.show(*view),
            RouteOutcome::Redirect(navigation) => Self::follow(navigation, host),
        }
    }

    pub fn follow<N: Navigator>(navigation: &Navigation, navigator: &mut N) {
        match navigation {
            Navigation::Soft(path) => navigator.soft_navigate(path),
            Navigation::Hard(path) => navigator.hard_navigate(path),
        }
    }

    /// Runs on initial load and on every hash/history change.
    pub fn handle_route<S: SessionStorage, H: ViewHost + Navigator>(
        &mut self,
        location: &Location,
        session: &mut SessionStore<S>,
        host: &mut H,
    ) -> RouteOutcome {
        let outcome = self.resolve(location, session);
        Self::apply(&outcome, host);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStorage;

    #[derive(Debug, Default)]
    struct RecordingHost {
        shown: Vec<View>,
        soft: Vec<String>,
        hard: Vec<String>,
    }

    impl ViewHost for RecordingHost {
        fn show(&mut self, view: View) {
            self.shown.push(view);
        }
    }

    impl Navigator for RecordingHost {
        fn soft_navigate(&mut self, path: &str) {
            self.soft.push(path.to_string());
        }

        fn hard_navigate(&mut self, path: &str) {
            self.hard.push(path.to_string());
        }
    }

    fn authenticated() -> SessionStore<MemorySessionStorage> {
        SessionStore::new(MemorySessionStorage::with_token("tok"))
    }

    #[test]
    fn navigate_to_login_is_hard() {
        assert_eq!(
            Router::navigate("/login"),
            Navigation::Hard("/login".to_string())
        );
        assert_eq!(
            Router::navigate("/create"),
            Navigation::Soft("/create".to_string())
        );
    }

    #[test]
    fn unauthenticated_visit_captures_path_then_hard_redirects() {
        let storage = MemorySessionStorage::default();
        let mut session = SessionStore::new(storage.clone());
        let mut host = RecordingHost::default();

        let outcome =
            Router::new().handle_route(&Location::new("/", "#/apps"), &mut session, &mut host);

        assert_eq!(
            outcome,
            RouteOutcome::Redirect(Navigation::Hard("/login".to_string()))
        );
        assert_eq!(storage.load_return_path().as_deref(), Some("/apps"));
        assert_eq!(host.hard, vec!["/login".to_string()]);
        assert!(host.shown.is_empty());
    }

    #[test]
    fn unauthenticated_visit_with_empty_hash_captures_root() {
        let storage = MemorySessionStorage::default();
        let mut session = SessionStore::new(storage.clone());

        let outcome = Router::new().resolve(&Location::new("/", ""), &mut session);

        assert_eq!(
            outcome,
            RouteOutcome::Redirect(Navigation::Hard("/login".to_string()))
        );
        assert_eq!(storage.load_return_path().as_deref(), Some("/"));
    }

    #[test]
    fn login_boundary_shows_login_when_unauthenticated() {
        let mut session = SessionStore::new(MemorySessionStorage::default());
        let mut router = Router::new();
        let mut host = RecordingHost::default();

        router.handle_route(&Location::new("/login", ""), &mut session, &mut host);

        assert_eq!(host.shown, vec![View::Login]);
        assert_eq!(router.state(), Some(&RouterState::AtLoginBoundary));
    }

    #[test]
    fn login_boundary_replays_pending_path_once_when_authenticated() {
        let mut session = authenticated();
        session.set_pending_return_path("/create").expect("persist");
        let mut router = Router::new();
        let mut host = RecordingHost::default();

        router.handle_route(&Location::new("/login", ""), &mut session, &mut host);
        router.handle_route(&Location::new("/login", ""), &mut session, &mut host);

        assert_eq!(host.soft, vec!["/create".to_string(), "/".to_string()]);
        assert!(host.shown.is_empty());
        assert_eq!(session.pending_return_path(), None);
    }

    #[test]
    fn authenticated_routes_render_their_views() {
        let mut session = authenticated();
        let mut router = Router::new();
        let mut host = RecordingHost::default();

        for hash in ["", "#/", "#/apps", "#/create"] {
            router.handle_route(&Location::new("/", hash), &mut session, &mut host);
        }

        assert_eq!(
            host.shown,
            vec![View::AppsList, View::AppsList, View::AppsList, View::CreateApp]
        );
        assert_eq!(
            router.state(),
            Some(&RouterState::AtProtectedRoute(Route::Create))
        );
    }

    #[test]
    fn unknown_route_soft_redirects_to_root_and_settles() {
        let mut session = authenticated();
        let mut router = Router::new();
        let mut host = RecordingHost::default();

        router.handle_route(&Location::new("/", "#/nope"), &mut session, &mut host);
        assert_eq!(host.soft, vec!["/".to_string()]);
        assert!(host.shown.is_empty());

        let outcome = router.handle_route(&Location::new("/", "#/"), &mut session, &mut host);
        assert_eq!(outcome, RouteOutcome::Render(View::AppsList));
    }

    #[test]
    fn repeated_handling_is_idempotent() {
        let mut session = authenticated();
        let mut router = Router::new();
        let location = Location::new("/", "#/create");

        let first = router.resolve(&location, &mut session);
        let second = router.resolve(&location, &mut session);

        assert_eq!(first, second);
        assert_eq!(session.pending_return_path(), None);
    }
}
