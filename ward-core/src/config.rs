//! # Ward Configuration
//!
//! A minimal string key/value store, set at startup and read through
//! immutable snapshots afterwards.
//!
//! ```rust
//! use ward_core::WardConfig;
//! let mut config = WardConfig::new();
//!
//! config.set("http.port", "3000");
//! config.set("hospitals", "H1,H2");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_u16("http.port"), Some(3000));
//! assert_eq!(snapshot.get_list("hospitals"), vec!["H1", "H2"]);
//! ```
//!
//! ## Environment overrides
//! `load_env_config` maps `WARD__AUTH__JWT__SECRET=x` onto `auth.jwt.secret = x`.

use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct WardConfig {
    values: HashMap<String, String>,
}

impl WardConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set only if the key is not already present.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn snapshot(&self) -> WardConfigSnapshot {
        WardConfigSnapshot::new(self.values.clone())
    }
}

/// Read `{prefix}A__B=v` environment variables into `a.b = v`.
pub fn load_env_config(config: &mut WardConfig, prefix: &str) {
    load_config_from(config, prefix, std::env::vars());
}

pub fn load_config_from<I>(config: &mut WardConfig, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let normalized = stripped.to_lowercase().replace("__", ".");
            config.set(normalized, value);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WardConfigSnapshot {
    map: HashMap<String, String>,
}

impl WardConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.trim().parse::<u16>().ok())
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse::<u32>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }

    /// Human-readable durations such as `15m` or `1d`.
    pub fn get_duration(&self, key: &str) -> Option<Duration> {
        self.get(key)
            .and_then(|v| humantime::parse_duration(v.trim()).ok())
    }

    /// Comma-separated values, trimmed, empties dropped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_are_normalized_to_dotted_keys() {
        let mut config = WardConfig::new();
        load_config_from(
            &mut config,
            "WARD__",
            vec![
                ("WARD__AUTH__JWT__SECRET".to_string(), "s3cret".to_string()),
                ("WARD__HOSPITALS".to_string(), "H1, H2,".to_string()),
                ("OTHER".to_string(), "ignored".to_string()),
            ],
        );

        let snap = config.snapshot();
        assert_eq!(snap.get("auth.jwt.secret"), Some("s3cret"));
        assert_eq!(snap.get_list("hospitals"), vec!["H1", "H2"]);
        assert!(!config.has("other"));
    }

    #[test]
    fn defaults_do_not_override() {
        let mut config = WardConfig::new();
        config.set("http.port", "8080");
        config.set_default("http.port", "3000");
        config.set_default("http.host", "127.0.0.1");

        let snap = config.snapshot();
        assert_eq!(snap.get_u16("http.port"), Some(8080));
        assert_eq!(snap.get("http.host"), Some("127.0.0.1"));
    }

    #[test]
    fn durations_parse_humantime() {
        let mut config = WardConfig::new();
        config.set("auth.jwt.expires_in", "1d");
        config.set("bad", "soon");
        let snap = config.snapshot();
        assert_eq!(snap.get_duration("auth.jwt.expires_in"), Some(Duration::from_secs(86_400)));
        assert_eq!(snap.get_duration("bad"), None);
    }
}
