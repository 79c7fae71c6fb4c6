use super::*;

use scripts_client_core::auth::{RETURN_URL_STORAGE_KEY, TOKEN_STORAGE_KEY};

/// `localStorage` holds the token across restarts; `sessionStorage` holds
/// the return path for the current tab only.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct BrowserSessionStorage;

#[derive(Debug, Clone, Copy)]
enum StorageArea {
    Local,
    Session,
}

fn storage_area(area: StorageArea) -> Result<web_sys::Storage, StorageError> {
    let window =
        web_sys::window().ok_or_else(|| StorageError("window is unavailable".to_string()))?;
    let storage = match area {
        StorageArea::Local => window.local_storage(),
        StorageArea::Session => window.session_storage(),
    };
    storage
        .map_err(|_| StorageError(format!("failed to access {area:?} storage")))?
        .ok_or_else(|| StorageError(format!("{area:?} storage is unavailable")))
}

fn read_item(area: StorageArea, key: &str) -> Option<String> {
    storage_area(area).ok()?.get_item(key).ok()?
}

fn write_item(area: StorageArea, key: &str, value: &str) -> Result<(), StorageError> {
    storage_area(area)?
        .set_item(key, value)
        .map_err(|_| StorageError(format!("failed to persist {key}")))
}

fn remove_item(area: StorageArea, key: &str) -> Result<(), StorageError> {
    storage_area(area)?
        .remove_item(key)
        .map_err(|_| StorageError(format!("failed to remove {key}")))
}

impl SessionStorage for BrowserSessionStorage {
    fn load_token(&self) -> Option<String> {
        read_item(StorageArea::Local, TOKEN_STORAGE_KEY)
    }

    fn persist_token(&self, token: &str) -> Result<(), StorageError> {
        write_item(StorageArea::Local, TOKEN_STORAGE_KEY, token)
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        remove_item(StorageArea::Local, TOKEN_STORAGE_KEY)
    }

    fn load_return_path(&self) -> Option<String> {
        read_item(StorageArea::Session, RETURN_URL_STORAGE_KEY)
    }

    fn persist_return_path(&self, path: &str) -> Result<(), StorageError> {
        write_item(StorageArea::Session, RETURN_URL_STORAGE_KEY, path)
    }

    fn clear_return_path(&self) -> Result<(), StorageError> {
        remove_item(StorageArea::Session, RETURN_URL_STORAGE_KEY)
    }
}
