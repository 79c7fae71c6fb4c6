pub(crate) const APP_ROOT_ID: &str = "app";
pub(crate) const SHELL_STATUS_ID: &str = "scripts-console-status";
pub(crate) const CONFIG_GLOBAL: &str = "__SCRIPTS_CONFIG__";

pub(crate) const LOGIN_FORM_ID: &str = "loginForm";
pub(crate) const LOGIN_USERNAME_ID: &str = "username";
pub(crate) const LOGIN_PASSWORD_ID: &str = "password";
pub(crate) const LOGIN_ERROR_ID: &str = "loginError";
pub(crate) const LOGIN_SUBMIT_ID: &str = "loginBtn";

pub(crate) const APPS_LIST_ID: &str = "appsList";
pub(crate) const APPS_LIST_ERROR_ID: &str = "appsListError";
pub(crate) const NEW_APP_BUTTON_ID: &str = "newAppBtn";
pub(crate) const LOGOUT_BUTTON_ID: &str = "logoutBtn";

pub(crate) const DEPLOY_FORM_ID: &str = "deployForm";
pub(crate) const DEPLOY_SUBMIT_ID: &str = "submitBtn";
pub(crate) const DEPLOY_ERROR_ID: &str = "deployError";
pub(crate) const DEPLOY_FORM_INPUT_IDS: [&str; 4] =
    ["projectName", "subdomain", "containerImage", "localPort"];

pub(crate) const FIELD_ERROR_SUFFIX: &str = "Error";
pub(crate) const FIELD_SUCCESS_SUFFIX: &str = "Success";
