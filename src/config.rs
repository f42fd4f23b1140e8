use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::hn_client::DEFAULT_BASE_URL;
use crate::service::PartialFailurePolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub story_cache_ttl: Duration,
    pub request_timeout: Duration,
    // None leaves item fetches unbounded
    pub max_concurrency: Option<usize>,
    pub partial_failure: PartialFailurePolicy,
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            story_cache_ttl: Duration::from_secs(5 * 60),
            request_timeout: Duration::from_secs(30),
            max_concurrency: None,
            partial_failure: PartialFailurePolicy::AbortOnError,
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("HN_BASE_URL").unwrap_or(defaults.base_url);

        let story_cache_ttl = match get("HN_STORY_CACHE_MINUTES") {
            Some(raw) => Duration::from_secs(parse::<u64>("HN_STORY_CACHE_MINUTES", &raw)? * 60),
            None => defaults.story_cache_ttl,
        };

        let request_timeout = match get("HN_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse::<u64>("HN_REQUEST_TIMEOUT_SECS", &raw)?),
            None => defaults.request_timeout,
        };

        let max_concurrency = match get("HN_MAX_CONCURRENCY") {
            Some(raw) => {
                let permits = parse::<usize>("HN_MAX_CONCURRENCY", &raw)?;
                if permits == 0 {
                    bail!("HN_MAX_CONCURRENCY must be at least 1");
                }
                Some(permits)
            }
            None => defaults.max_concurrency,
        };

        let partial_failure = match get("HN_PARTIAL_FAILURE") {
            Some(raw) => raw
                .parse::<PartialFailurePolicy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid HN_PARTIAL_FAILURE")?,
            None => defaults.partial_failure,
        };

        let bind_addr = get("HN_BIND_ADDR").unwrap_or(defaults.bind_addr);

        Ok(Self {
            base_url,
            story_cache_ttl,
            request_timeout,
            max_concurrency,
            partial_failure,
            bind_addr,
        })
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Invalid value for {key}: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("HN_BASE_URL", "http://localhost:9000/v0"),
            ("HN_STORY_CACHE_MINUTES", "2"),
            ("HN_REQUEST_TIMEOUT_SECS", "7"),
            ("HN_MAX_CONCURRENCY", "8"),
            ("HN_PARTIAL_FAILURE", "skip"),
            ("HN_BIND_ADDR", "127.0.0.1:3000"),
        ])
        .unwrap();

        assert_eq!(s.base_url, "http://localhost:9000/v0");
        assert_eq!(s.story_cache_ttl, Duration::from_secs(120));
        assert_eq!(s.request_timeout, Duration::from_secs(7));
        assert_eq!(s.max_concurrency, Some(8));
        assert_eq!(s.partial_failure, PartialFailurePolicy::SkipFailed);
        assert_eq!(s.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("HN_BASE_URL", "  "), ("HN_MAX_CONCURRENCY", "")]).unwrap();
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.max_concurrency, None);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = settings(&[("HN_STORY_CACHE_MINUTES", "five")]).unwrap_err();
        assert!(err.to_string().contains("HN_STORY_CACHE_MINUTES"));

        assert!(settings(&[("HN_MAX_CONCURRENCY", "0")]).is_err());
        assert!(settings(&[("HN_PARTIAL_FAILURE", "sometimes")]).is_err());
    }
}
