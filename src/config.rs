use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PREFETCH_INITIAL_DELAY_MS: u64 = 1500;
const DEFAULT_PREFETCH_STEP_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchPolicy {
    pub initial_delay: Duration,
    pub step: Duration,
}

impl PrefetchPolicy {
    /// Delay before prefetching the outline entry at `index`. Index 0 is fetched on startup.
    pub fn delay_for(&self, index: usize) -> Option<Duration> {
        if index == 0 {
            return None;
        }
        let steps = u32::try_from(index - 1).unwrap_or(u32::MAX);
        Some(
            self.initial_delay
                .saturating_add(self.step.saturating_mul(steps)),
        )
    }
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(DEFAULT_PREFETCH_INITIAL_DELAY_MS),
            step: Duration::from_millis(DEFAULT_PREFETCH_STEP_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub prefetch: PrefetchPolicy,
    /// Font with Hangul coverage; system locations are searched when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            prefetch: PrefetchPolicy::default(),
            font_path: None,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case.
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let number = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match non_empty(name) {
                Some(value) => value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber { name, value }),
                None => Ok(default),
            }
        };

        Ok(Self {
            api_key: non_empty("API_KEY"),
            model: non_empty("REPORT_MODEL").unwrap_or(defaults.model),
            api_base: non_empty("REPORT_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            request_timeout: Duration::from_secs(number(
                "REPORT_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            prefetch: PrefetchPolicy {
                initial_delay: Duration::from_millis(number(
                    "REPORT_PREFETCH_INITIAL_DELAY_MS",
                    DEFAULT_PREFETCH_INITIAL_DELAY_MS,
                )?),
                step: Duration::from_millis(number(
                    "REPORT_PREFETCH_STEP_MS",
                    DEFAULT_PREFETCH_STEP_MS,
                )?),
            },
            font_path: non_empty("REPORT_FONT_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).expect("empty environment is valid");
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.prefetch, PrefetchPolicy::default());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[("API_KEY", "   ")])).expect("valid");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn overrides_are_read_and_trailing_slash_trimmed() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "secret"),
            ("REPORT_MODEL", "gemini-test"),
            ("REPORT_API_BASE", "http://localhost:9000/v1/"),
            ("REPORT_PREFETCH_STEP_MS", "250"),
            ("REPORT_FONT_PATH", "/opt/fonts/NanumGothic.ttf"),
        ]))
        .expect("valid overrides");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "gemini-test");
        assert_eq!(config.api_base, "http://localhost:9000/v1");
        assert_eq!(config.prefetch.step, Duration::from_millis(250));
        assert_eq!(
            config.font_path,
            Some(PathBuf::from("/opt/fonts/NanumGothic.ttf"))
        );
    }

    #[test]
    fn malformed_number_is_rejected() {
        let error = Config::from_lookup(lookup(&[("REPORT_REQUEST_TIMEOUT_SECS", "soon")]))
            .expect_err("non-numeric timeout should fail");
        assert!(error.to_string().contains("REPORT_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn prefetch_delays_are_staggered() {
        let policy = PrefetchPolicy {
            initial_delay: Duration::from_millis(1000),
            step: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(0), None);
        assert_eq!(policy.delay_for(1), Some(Duration::from_millis(1000)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_millis(1500)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_millis(2500)));
    }
}
