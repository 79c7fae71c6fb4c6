use serde::{Deserialize, Serialize};

/// Physical path of the login page. It sits outside hash routing.
pub const LOGIN_PATH: &str = "/login";
pub const ROOT_PATH: &str = "/";
pub const APPS_PATH: &str = "/apps";
pub const CREATE_PATH: &str = "/create";

/// The parts of the browser location the router looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    /// Raw fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            hash: hash.into(),
        }
    }

    pub fn is_login_boundary(&self) -> bool {
        self.pathname.trim_end_matches('/') == LOGIN_PATH
    }

    /// Hash fragment without `#`, defaulting to `/` when empty.
    pub fn hash_path(&self) -> String {
        let path = self.hash.strip_prefix('#').unwrap_or(&self.hash);
        if path.is_empty() {
            ROOT_PATH.to_string()
        } else {
            path.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum Route {
    Root,
    AppsList,
    Create,
    LoginBoundary,
    Unknown(String),
}

impl Route {
    pub fn from_hash_path(path: &str) -> Self {
        match path {
            "" | ROOT_PATH => Self::Root,
            APPS_PATH => Self::AppsList,
            CREATE_PATH => Self::Create,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn resolve(location: &Location) -> Self {
        if location.is_login_boundary() {
            return Self::LoginBoundary;
        }
        Self::from_hash_path(&location.hash_path())
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Root => ROOT_PATH.to_string(),
            Self::AppsList => APPS_PATH.to_string(),
            Self::Create => CREATE_PATH.to_string(),
            Self::LoginBoundary => LOGIN_PATH.to_string(),
            Self::Unknown(path) => path.clone(),
        }
    }

    /// View rendered for this route once the session check has passed.
    /// `Unknown` has none; it is redirected instead.
    pub fn view(&self) -> Option<View> {
        match self {
            Self::Root | Self::AppsList => Some(View::AppsList),
            Self::Create => Some(View::CreateApp),
            Self::LoginBoundary => Some(View::Login),
            Self::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    AppsList,
    CreateApp,
}

impl View {
    pub fn template_id(self) -> &'static str {
        match self {
            Self::Login => "login-view",
            Self::AppsList => "apps-list-view",
            Self::CreateApp => "create-app-view",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_hash_mapping() {
        assert_eq!(Route::from_hash_path(""), Route::Root);
        assert_eq!(Route::from_hash_path("/"), Route::Root);
        assert_eq!(Route::from_hash_path("/apps"), Route::AppsList);
        assert_eq!(Route::from_hash_path("/create"), Route::Create);
        assert_eq!(
            Route::from_hash_path("/apps/42"),
            Route::Unknown("/apps/42".to_string())
        );
    }

    #[test]
    fn empty_hash_defaults_to_root_path() {
        assert_eq!(Location::new("/", "").hash_path(), "/");
        assert_eq!(Location::new("/", "#").hash_path(), "/");
        assert_eq!(Location::new("/", "#/create").hash_path(), "/create");
    }

    #[test]
    fn login_boundary_is_resolved_from_physical_path() {
        assert_eq!(
            Route::resolve(&Location::new("/login", "#/apps")),
            Route::LoginBoundary
        );
        assert_eq!(
            Route::resolve(&Location::new("/login/", "")),
            Route::LoginBoundary
        );
        assert_eq!(
            Route::resolve(&Location::new("/", "#/apps")),
            Route::AppsList
        );
    }

    #[test]
    fn root_and_listing_share_a_view() {
        assert_eq!(Route::Root.view(), Some(View::AppsList));
        assert_eq!(Route::AppsList.view(), Some(View::AppsList));
        assert_eq!(Route::Create.view(), Some(View::CreateApp));
        assert_eq!(Route::Unknown("/nope".to_string()).view(), None);
        assert_eq!(View::CreateApp.template_id(), "create-app-view");
    }
}
