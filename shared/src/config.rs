use std::path::PathBuf;
use std::time::Duration;

use dotenv::dotenv;
use thiserror::Error;

use crate::i18n::Locale;
use crate::placement::SphereSampling;

pub const DEFAULT_FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";
pub const DEFAULT_PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
/// NASA's shared, heavily rate-limited key.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub feed_url: String,
    pub request_timeout: Duration,
    pub reports_dir: PathBuf,
    pub open_browser: bool,
    pub sphere_sampling: SphereSampling,
    pub locale: Locale,
    pub plotly_js_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            reports_dir: PathBuf::from("./neo_reports"),
            open_browser: true,
            sphere_sampling: SphereSampling::default(),
            locale: Locale::default(),
            plotly_js_url: DEFAULT_PLOTLY_JS_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Builds a config from an arbitrary variable source; unset variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let request_timeout = match lookup("NEO_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        var: "NEO_HTTP_TIMEOUT_SECS",
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: "NEO_HTTP_TIMEOUT_SECS",
                        value: raw,
                        reason: "timeout must be at least one second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let open_browser = match lookup("NEO_OPEN_BROWSER") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "NEO_OPEN_BROWSER",
                value: raw.clone(),
                reason: "expected true/false".to_string(),
            })?,
            None => defaults.open_browser,
        };

        let sphere_sampling = match lookup("NEO_SPHERE_SAMPLING") {
            Some(raw) => SphereSampling::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "NEO_SPHERE_SAMPLING",
                value: raw.clone(),
                reason: "expected uniform_angles or uniform_surface".to_string(),
            })?,
            None => defaults.sphere_sampling,
        };

        let locale = match lookup("NEO_LOCALE") {
            Some(raw) => Locale::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "NEO_LOCALE",
                value: raw.clone(),
                reason: "expected en or de".to_string(),
            })?,
            None => defaults.locale,
        };

        Ok(Config {
            api_key: lookup("NASA_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(defaults.api_key),
            feed_url: lookup("NEO_FEED_URL").unwrap_or(defaults.feed_url),
            request_timeout,
            reports_dir: lookup("NEO_REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.reports_dir),
            open_browser,
            sphere_sampling,
            locale,
            plotly_js_url: lookup("NEO_PLOTLY_JS_URL").unwrap_or(defaults.plotly_js_url),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_key, DEMO_API_KEY);
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.open_browser);
        assert_eq!(config.sphere_sampling, SphereSampling::UniformAngles);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("NASA_API_KEY", "abc123"),
            ("NEO_HTTP_TIMEOUT_SECS", "12"),
            ("NEO_OPEN_BROWSER", "false"),
            ("NEO_SPHERE_SAMPLING", "uniform_surface"),
            ("NEO_LOCALE", "DE"),
            ("NEO_REPORTS_DIR", "/tmp/neo"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert!(!config.open_browser);
        assert_eq!(config.sphere_sampling, SphereSampling::UniformSurface);
        assert_eq!(config.locale, Locale::De);
        assert_eq!(config.reports_dir, PathBuf::from("/tmp/neo"));
    }

    #[test]
    fn test_blank_api_key_falls_back_to_demo() {
        let config = Config::from_lookup(lookup_from(&[("NASA_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key, DEMO_API_KEY);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (var, value) in [
            ("NEO_HTTP_TIMEOUT_SECS", "soon"),
            ("NEO_HTTP_TIMEOUT_SECS", "0"),
            ("NEO_OPEN_BROWSER", "maybe"),
            ("NEO_SPHERE_SAMPLING", "fibonacci"),
            ("NEO_LOCALE", "vi"),
        ] {
            let err = Config::from_lookup(lookup_from(&[(var, value)])).unwrap_err();
            let ConfigError::Invalid { var: reported, .. } = err;
            assert_eq!(reported, var);
        }
    }
}
