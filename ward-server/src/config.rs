//! Server configuration: environment overrides on top of defaults.

use tracing::warn;
use ward_core::{load_env_config, Hospital, WardConfig, WardConfigSnapshot};

/// Environment prefix: `WARD__HTTP__PORT=8080` sets `http.port`.
pub const ENV_PREFIX: &str = "WARD__";

const DEV_SECRET: &str = "dev-secret";

/// Configuration from the process environment (after `.env` is loaded).
pub fn from_env() -> WardConfig {
    let mut config = WardConfig::new();
    load_env_config(&mut config, ENV_PREFIX);
    config
}

/// Fill in every key the server reads that is not already set.
pub fn apply_defaults(config: &mut WardConfig) {
    if !config.has("auth.jwt.secret") {
        warn!("auth.jwt.secret is not set; using the development secret");
    }

    config.set_default("http.host", "127.0.0.1");
    config.set_default("http.port", "3000");
    config.set_default("auth.jwt.secret", DEV_SECRET);
    config.set_default("auth.jwt.issuer", "ward");
    config.set_default("auth.jwt.audience", "ward-api");
    config.set_default("auth.jwt.expires_in", "1d");
    config.set_default("auth.bcrypt.cost", "10");
}

fn hospital_key(config: &WardConfigSnapshot, code: &str, field: &str) -> Option<String> {
    // Env overrides arrive lowercased.
    config
        .get_string(&format!("hospitals.{code}.{field}"))
        .or_else(|| config.get_string(&format!("hospitals.{}.{field}", code.to_ascii_lowercase())))
}

/// Hospitals listed under `hospitals`, with optional `.name` and `.url`.
pub fn hospitals(config: &WardConfigSnapshot) -> Vec<Hospital> {
    let codes = config.get_list("hospitals");
    if codes.is_empty() {
        warn!("no hospitals configured; every tenant-scoped request will be rejected");
    }

    codes
        .iter()
        .map(|code| {
            let name = hospital_key(config, code, "name").unwrap_or_else(|| code.clone());
            let url = hospital_key(config, code, "url").unwrap_or_else(|| format!("memory://{code}"));
            Hospital::new(code.clone(), name, url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::config::load_config_from;

    #[test]
    fn hospitals_read_names_and_urls() {
        let mut config = WardConfig::new();
        config.set("hospitals", "H1, H2");
        config.set("hospitals.H1.name", "City Hospital");
        load_config_from(
            &mut config,
            ENV_PREFIX,
            vec![("WARD__HOSPITALS__H2__URL".to_string(), "postgres://h2".to_string())],
        );

        let list = hospitals(&config.snapshot());
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "City Hospital");
        assert_eq!(list[0].database_url, "memory://H1");
        assert_eq!(list[1].name, "H2");
        assert_eq!(list[1].database_url, "postgres://h2");
    }

    #[test]
    fn defaults_fill_gaps_only() {
        let mut config = WardConfig::new();
        config.set("http.port", "8080");
        apply_defaults(&mut config);

        let snap = config.snapshot();
        assert_eq!(snap.get_u16("http.port"), Some(8080));
        assert_eq!(snap.get("auth.jwt.expires_in"), Some("1d"));
        assert_eq!(snap.get_u32("auth.bcrypt.cost"), Some(10));
    }
}
