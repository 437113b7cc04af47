use crate::core::{DetailSchema, FieldRule, MIN_QUERY_LEN};
use crate::services::DEFAULT_SEARCH_LIMIT;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_roster_url")]
    pub roster_url: String,
    #[serde(default = "default_detail_base_url")]
    pub detail_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            roster_url: default_roster_url(),
            detail_base_url: default_detail_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_roster_url() -> String { "https://api.octagon-api.com/fighters".to_string() }
fn default_detail_base_url() -> String { "http://ufcstats.com/fighter-details".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_user_agent() -> String { concat!("fighter-lookup/", env!("CARGO_PKG_VERSION")).to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheSettings {
    /// Roster TTL; values past what chrono can represent mean "never expire"
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: default_ttl_secs() }
    }
}

fn default_ttl_secs() -> u64 { 24 * 60 * 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            max_results: default_max_results(),
        }
    }
}

fn default_min_query_len() -> usize { MIN_QUERY_LEN }
fn default_max_results() -> usize { DEFAULT_SEARCH_LIMIT }

/// Detail page layout; omit to use the built-in ufcstats schema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionSettings {
    pub detail_schema: Option<Vec<FieldRule>>,
}

impl ExtractionSettings {
    pub fn schema(&self) -> DetailSchema {
        match &self.detail_schema {
            Some(fields) if !fields.is_empty() => DetailSchema::new(fields.clone()),
            _ => DetailSchema::ufcstats(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables prefixed with FIGHTER_, e.g.
    ///    FIGHTER_CACHE__TTL_SECS -> cache.ttl_secs
    /// 5. Shorthand variables UPSTREAM_BASE_URL (alias ROSTER_URL), DETAIL_BASE_URL
    ///    and CACHE_TTL_SECS
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_source())
            .build()?;

        let settings = apply_shorthand(settings, |var| std::env::var(var).ok())?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("FIGHTER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Short, unprefixed variables operators tend to set by hand; later entries win
const SHORTHAND_VARS: [(&str, &str); 4] = [
    ("UPSTREAM_BASE_URL", "upstream.roster_url"),
    ("ROSTER_URL", "upstream.roster_url"),
    ("DETAIL_BASE_URL", "upstream.detail_base_url"),
    ("CACHE_TTL_SECS", "cache.ttl_secs"),
];

fn apply_shorthand<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in SHORTHAND_VARS {
        if let Some(value) = lookup(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::fields;
    use config::FileFormat;

    #[test]
    fn test_defaults_without_sources() {
        let settings: Settings = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.cache.ttl_secs, 86_400);
        assert_eq!(settings.cache.ttl(), chrono::Duration::hours(24));
        assert_eq!(settings.search.min_query_len, 2);
        assert_eq!(settings.upstream.timeout(), Duration::from_secs(10));
        assert_eq!(settings.extraction.schema(), DetailSchema::ufcstats());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    fn with_shorthand(vars: &[(&str, &str)]) -> Settings {
        let lookup = |name: &str| {
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| value.to_string())
        };
        apply_shorthand(Config::builder().build().unwrap(), lookup)
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_upstream_base_url_shorthand() {
        let settings = with_shorthand(&[("UPSTREAM_BASE_URL", "http://roster.test/api")]);
        assert_eq!(settings.upstream.roster_url, "http://roster.test/api");
        assert_eq!(settings.upstream.detail_base_url, default_detail_base_url());
    }

    #[test]
    fn test_roster_url_alias_wins_over_base_url() {
        let settings = with_shorthand(&[
            ("UPSTREAM_BASE_URL", "http://base.test"),
            ("ROSTER_URL", "http://roster.test/fighters"),
            ("DETAIL_BASE_URL", "http://detail.test"),
            ("CACHE_TTL_SECS", "120"),
        ]);
        assert_eq!(settings.upstream.roster_url, "http://roster.test/fighters");
        assert_eq!(settings.upstream.detail_base_url, "http://detail.test");
        assert_eq!(settings.cache.ttl(), chrono::Duration::seconds(120));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        for ttl_secs in [100_000_000_000_000_000, u64::MAX, i64::MAX as u64] {
            let cache = CacheSettings { ttl_secs };
            assert_eq!(cache.ttl(), chrono::Duration::MAX, "ttl_secs {}", ttl_secs);
        }

        let settings = with_shorthand(&[("CACHE_TTL_SECS", "100000000000000000")]);
        assert_eq!(settings.cache.ttl(), chrono::Duration::MAX);
    }

    #[test]
    fn test_schema_override_from_toml() {
        let toml = r#"
            [upstream]
            roster_url = "http://roster.test/fighters"

            [cache]
            ttl_secs = 60

            [[extraction.detail_schema]]
            field = "reach"
            locator = { kind = "labeled", item = "dd", label = "Reach" }

            [[extraction.detail_schema]]
            field = "wins"
            kind = "number"
            locator = { kind = "text", selector = ".wins" }
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.upstream.roster_url, "http://roster.test/fighters");
        assert_eq!(settings.cache.ttl(), chrono::Duration::seconds(60));

        let schema = settings.extraction.schema();
        assert_eq!(schema.fields.len(), 2);
        assert!(schema.rule(fields::REACH).is_some());
        assert!(schema.rule(fields::HEIGHT).is_none());
    }
}
