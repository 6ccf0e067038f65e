use warsim_panel::intro::FlagStore;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(super) fn local_storage_get_string(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

pub(super) fn local_storage_set_string(key: &str, value: &str) {
    if let Some(s) = local_storage() {
        if s.set_item(key, value).is_err() {
            tracing::warn!(key, "localStorage write rejected");
        }
    }
}

/// `localStorage`-backed flags. Reads as unset when storage is unavailable.
pub(super) struct BrowserFlags;

impl FlagStore for BrowserFlags {
    fn get(&self, key: &str) -> Option<String> {
        local_storage_get_string(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        local_storage_set_string(key, value);
    }
}
