use gloo_console::error;
use gloo_utils::window;
use web_sys::Storage;
use workout_tracker_lib::store::KeyValueStore;

/// Browser local storage behind the session's key-value interface. When the
/// browser refuses access, reads come back empty and writes are dropped.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = window().local_storage().ok().flatten();
        if storage.is_none() {
            error!("Local storage is not available; workouts will not persist");
        }

        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                error!(format!("Failed to persist {key}"));
            }
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}
