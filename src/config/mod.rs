/// Application configuration module
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub items_per_page: u32,
    pub upstream: UpstreamConfig,
}

/// Base URLs and per-endpoint timeouts of the third-party APIs
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub solar_system_url: String,
    pub wiki_api_url: String,
    pub wiki_rest_url: String,
    pub commons_api_url: String,
    pub horizons_url: String,
    pub timeouts: Timeouts,
}

#[derive(Clone, Debug)]
pub struct Timeouts {
    pub list: Duration,
    pub detail: Duration,
    pub image: Duration,
    pub gallery: Duration,
    pub horizons: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(10),
            detail: Duration::from_secs(15),
            image: Duration::from_secs(10),
            gallery: Duration::from_secs(5),
            horizons: Duration::from_secs(8),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            solar_system_url: "https://api.le-systeme-solaire.net/rest".to_string(),
            wiki_api_url: "https://es.wikipedia.org/w/api.php".to_string(),
            wiki_rest_url: "https://es.wikipedia.org/api/rest_v1".to_string(),
            commons_api_url: "https://commons.wikimedia.org/w/api.php".to_string(),
            horizons_url: "https://ssd-api.jpl.nasa.gov/horizons.api".to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = UpstreamConfig::default();
        let upstream = UpstreamConfig {
            solar_system_url: env_string("SOLAR_SYSTEM_API_URL", &defaults.solar_system_url),
            wiki_api_url: env_string("WIKI_API_URL", &defaults.wiki_api_url),
            wiki_rest_url: env_string("WIKI_REST_URL", &defaults.wiki_rest_url),
            commons_api_url: env_string("COMMONS_API_URL", &defaults.commons_api_url),
            horizons_url: env_string("HORIZONS_API_URL", &defaults.horizons_url),
            timeouts: Timeouts {
                list: env_secs("LIST_TIMEOUT_SECONDS", 10),
                detail: env_secs("DETAIL_TIMEOUT_SECONDS", 15),
                image: env_secs("IMAGE_TIMEOUT_SECONDS", 10),
                gallery: env_secs("GALLERY_TIMEOUT_SECONDS", 5),
                horizons: env_secs("HORIZONS_TIMEOUT_SECONDS", 8),
            },
        };

        let items_per_page = env_u64("ITEMS_PER_PAGE", 5);
        if items_per_page == 0 {
            anyhow::bail!("ITEMS_PER_PAGE must be at least 1");
        }

        Ok(Self {
            bind_addr: env_string("BIND_ADDR", "0.0.0.0:3000"),
            items_per_page: u32::try_from(items_per_page)?,
            upstream,
        })
    }
}

#[cfg(test)]
impl AppConfig {
    /// Every upstream pointed at a closed local port
    pub(crate) fn offline() -> Self {
        let unreachable = "http://127.0.0.1:9".to_string();
        Self {
            bind_addr: "127.0.0.1:0".into(),
            items_per_page: 5,
            upstream: UpstreamConfig {
                solar_system_url: unreachable.clone(),
                wiki_api_url: unreachable.clone(),
                wiki_rest_url: unreachable.clone(),
                commons_api_url: unreachable.clone(),
                horizons_url: unreachable,
                ..UpstreamConfig::default()
            },
        }
    }
}

/// How a store treats responses that resolve out of issue order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Whatever resolves last is written, even if it was issued earlier
    #[default]
    LastResolvedWins,
    /// Responses older than the newest applied one are dropped
    LatestIssuedWins,
}

impl FromStr for ResponsePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last-resolved" => Ok(ResponsePolicy::LastResolvedWins),
            "latest-issued" => Ok(ResponsePolicy::LatestIssuedWins),
            other => anyhow::bail!("unknown response policy: {other}"),
        }
    }
}

/// Client-side store and URL sync settings
#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub api_base_url: String,
    pub debounce: Duration,
    pub items_per_page: u32,
    pub response_policy: ResponsePolicy,
    pub storage_path: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000".to_string(),
            debounce: Duration::from_millis(300),
            items_per_page: 5,
            response_policy: ResponsePolicy::default(),
            storage_path: None,
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl SyncConfig {
    /// Load client settings from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable numbers keep their defaults
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let number = |key: &str, default: u64| {
            var(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        let response_policy = match var("RESPONSE_POLICY") {
            Some(raw) => raw.parse()?,
            None => defaults.response_policy,
        };

        Ok(Self {
            api_base_url: var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            debounce: Duration::from_millis(number("DEBOUNCE_MS", 300)),
            items_per_page: u32::try_from(number("ITEMS_PER_PAGE", 5))?.max(1),
            response_policy,
            storage_path: var("STORAGE_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            request_timeout: Duration::from_secs(number("DETAIL_TIMEOUT_SECONDS", 15)),
        })
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_secs(key: &str, default: u64) -> Duration {
    Duration::from_secs(env_u64(key, default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_response_policy_parse() {
        assert_eq!(
            "latest-issued".parse::<ResponsePolicy>().unwrap(),
            ResponsePolicy::LatestIssuedWins
        );
        assert_eq!(
            "last-resolved".parse::<ResponsePolicy>().unwrap(),
            ResponsePolicy::LastResolvedWins
        );
        assert!("first-wins".parse::<ResponsePolicy>().is_err());
    }

    #[test]
    fn test_sync_defaults() {
        let cfg = SyncConfig::default();
        assert_eq!(cfg.debounce, Duration::from_millis(300));
        assert_eq!(cfg.items_per_page, 5);
        assert_eq!(cfg.response_policy, ResponsePolicy::LastResolvedWins);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_sync_config_reads_variables() {
        let cfg = SyncConfig::from_vars(vars(&[
            ("RESPONSE_POLICY", "latest-issued"),
            ("DEBOUNCE_MS", "120"),
            ("STORAGE_PATH", "/var/lib/planets/state.json"),
            ("ITEMS_PER_PAGE", "3"),
            ("API_BASE_URL", "http://planets.internal:8080"),
            ("DETAIL_TIMEOUT_SECONDS", "4"),
        ]))
        .unwrap();

        assert_eq!(cfg.response_policy, ResponsePolicy::LatestIssuedWins);
        assert_eq!(cfg.debounce, Duration::from_millis(120));
        assert_eq!(
            cfg.storage_path,
            Some(PathBuf::from("/var/lib/planets/state.json"))
        );
        assert_eq!(cfg.items_per_page, 3);
        assert_eq!(cfg.api_base_url, "http://planets.internal:8080");
        assert_eq!(cfg.request_timeout, Duration::from_secs(4));
    }

    #[test]
    fn test_sync_config_defaults_when_unset_or_garbage() {
        let cfg = SyncConfig::from_vars(vars(&[
            ("DEBOUNCE_MS", "soon"),
            ("ITEMS_PER_PAGE", "0"),
            ("STORAGE_PATH", ""),
        ]))
        .unwrap();

        assert_eq!(cfg.debounce, Duration::from_millis(300));
        assert_eq!(cfg.items_per_page, 1);
        assert_eq!(cfg.storage_path, None);
        assert_eq!(cfg.response_policy, ResponsePolicy::LastResolvedWins);
    }

    #[test]
    fn test_sync_config_rejects_unknown_policy() {
        let lookup = vars(&[("RESPONSE_POLICY", "first-wins")]);
        let err = SyncConfig::from_vars(lookup).unwrap_err();
        assert!(err.to_string().contains("first-wins"));
    }

    #[test]
    fn test_env_u64_falls_back_on_garbage() {
        assert_eq!(env_u64("PLANET_EXPLORER_SURELY_UNSET_KEY", 42), 42);
    }
}
