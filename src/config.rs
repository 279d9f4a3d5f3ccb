use chrono::NaiveDate;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Process-wide configuration, loaded on first access.
///
/// Precedence: built-in defaults < `config.toml` < `SCHOOLDESK_*` env vars.
/// Nested keys use `__`, e.g. `SCHOOLDESK_BASIC__API_KEY`.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub school: SchoolConfig,
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("SCHOOLDESK_").split("__"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Shared key every dashboard request must present.
    pub api_key: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite://schooldesk.sqlite".to_string(),
            loglevel: "info".to_string(),
            api_key: "changeme".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolConfig {
    pub name: String,
    pub bootstrap_admin_name: String,
    pub bootstrap_admin_email: String,
    pub default_session: SessionSeed,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            name: "Default School".to_string(),
            bootstrap_admin_name: "Super Admin".to_string(),
            bootstrap_admin_email: "admin@school.local".to_string(),
            default_session: SessionSeed::default(),
        }
    }
}

/// Academic session created by the backfill when none exists yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSeed {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for SessionSeed {
    fn default() -> Self {
        Self {
            name: "2025-2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap_or_default(),
        }
    }
}
