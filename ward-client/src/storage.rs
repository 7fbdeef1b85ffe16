use std::collections::HashMap;
use std::sync::RwLock;

pub const DOCTOR_TOKEN_KEY: &str = "doctortoken";
pub const ADMIN_TOKEN_KEY: &str = "admintoken";

/// Browser-style key/value storage for tokens.
#[derive(Debug, Default)]
pub struct LocalStorage {
    items: RwLock<HashMap<String, String>>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut items) = self.items.write() {
            items.insert(key.to_string(), value.into());
        }
    }

    pub fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.write() {
            items.remove(key);
        }
    }
}
