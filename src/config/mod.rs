//! Configuration module

use serde::Deserialize;

/// Cloud account and transport configuration.
///
/// Loaded from an optional `config/default.*` file overlaid with `TPLINK_*`
/// environment variables (`TPLINK_USER`, `TPLINK_PWD`, ...). `VERBOSE=1` is
/// honored without the prefix for compatibility with existing tooling.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudConfig {
    /// Account user name (TPLINK_USER).
    pub user: String,
    /// Account password (TPLINK_PWD).
    pub pwd: String,
    /// Vendor cloud endpoint for login and device listing.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Relax TLS verification for the vendor's legacy servers.
    #[serde(default = "default_allow_legacy_tls")]
    pub allow_legacy_tls: bool,
    /// Whole-request timeout for every outbound call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log full request/response bodies at debug level.
    #[serde(default)]
    pub verbose: bool,
}

fn default_base_url() -> String {
    "https://wap.tplinkcloud.com".to_string()
}

fn default_allow_legacy_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

impl CloudConfig {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("TPLINK").try_parsing(true))
            .build()?;

        let mut cfg: CloudConfig = settings.try_deserialize()?;

        if std::env::var("VERBOSE").map(|v| v == "1").unwrap_or(false) {
            cfg.verbose = true;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_apply_when_only_credentials_given() {
        let cfg: CloudConfig = serde_json::from_value(json!({
            "user": "user@example.com",
            "pwd": "secret",
        }))
        .unwrap();

        assert_eq!(cfg.base_url, "https://wap.tplinkcloud.com");
        assert!(cfg.allow_legacy_tls);
        assert_eq!(cfg.timeout_secs, 10);
        assert!(!cfg.verbose);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg: CloudConfig = serde_json::from_value(json!({
            "user": "user@example.com",
            "pwd": "secret",
            "base_url": "http://localhost:8080",
            "allow_legacy_tls": false,
            "timeout_secs": 3,
        }))
        .unwrap();

        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert!(!cfg.allow_legacy_tls);
        assert_eq!(cfg.timeout_secs, 3);
    }
}
