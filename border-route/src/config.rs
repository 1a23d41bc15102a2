//! Server configuration from environment variables.
//!
//! | Variable                   | Default                          |
//! |----------------------------|----------------------------------|
//! | `BIND_ADDR`                | `127.0.0.1:3000`                 |
//! | `COUNTRIES_BASE_URL`       | `https://restcountries.com/v3.1` |
//! | `COUNTRIES_TIMEOUT_SECS`   | `30`                             |
//! | `COUNTRIES_MAX_CONCURRENT` | `8`                              |
//! | `COUNTRY_NAME_LANGUAGE`    | unset (common English names)     |
//! | `COUNTRIES_MOCK_FILE`      | unset (use the REST API)         |
//! | `ROUTE_MAX_DEPTH`          | `10`                             |
//! | `ROUTE_POLICY`             | `first` (or `all`)               |
//! | `ROUTE_DEADLINE_SECS`      | unset (no deadline)              |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::countries::RestCountriesConfig;
use crate::planner::{RoutePolicy, SearchConfig};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {name}: {reason}")]
pub struct ConfigError {
    name: &'static str,
    value: String,
    reason: String,
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub countries: RestCountriesConfig,
    pub search: SearchConfig,

    /// Serve countries from this JSON file instead of the REST API
    pub mock_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Empty values count as unset
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = match var("BIND_ADDR") {
            Some(value) => parse("BIND_ADDR", value)?,
            None => parse("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())?,
        };

        let mut countries = RestCountriesConfig::new();
        if let Some(url) = var("COUNTRIES_BASE_URL") {
            countries = countries.with_base_url(url);
        }
        if let Some(value) = var("COUNTRIES_TIMEOUT_SECS") {
            countries = countries.with_timeout(parse("COUNTRIES_TIMEOUT_SECS", value)?);
        }
        if let Some(value) = var("COUNTRIES_MAX_CONCURRENT") {
            let n: usize = parse("COUNTRIES_MAX_CONCURRENT", value.clone())?;
            if n == 0 {
                return Err(ConfigError {
                    name: "COUNTRIES_MAX_CONCURRENT",
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
            countries = countries.with_max_concurrent(n);
        }
        if let Some(language) = var("COUNTRY_NAME_LANGUAGE") {
            countries = countries.with_name_language(language.trim().to_ascii_lowercase());
        }

        let mut search = SearchConfig::default();
        if let Some(value) = var("ROUTE_MAX_DEPTH") {
            search = search.with_max_depth(parse("ROUTE_MAX_DEPTH", value)?);
        }
        if let Some(value) = var("ROUTE_POLICY") {
            search = search.with_policy(parse::<RoutePolicy>("ROUTE_POLICY", value)?);
        }
        if let Some(value) = var("ROUTE_DEADLINE_SECS") {
            let secs: f64 = parse("ROUTE_DEADLINE_SECS", value.clone())?;
            let deadline = Duration::try_from_secs_f64(secs).map_err(|e| ConfigError {
                name: "ROUTE_DEADLINE_SECS",
                value,
                reason: e.to_string(),
            })?;
            search = search.with_deadline(deadline);
        }

        Ok(Self {
            bind_addr,
            countries,
            search,
            mock_file: var("COUNTRIES_MOCK_FILE").map(PathBuf::from),
        })
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError {
        name,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.countries.base_url, "https://restcountries.com/v3.1");
        assert_eq!(config.countries.name_language, None);
        assert_eq!(config.search.max_depth, 10);
        assert_eq!(config.search.policy, RoutePolicy::FirstFound);
        assert_eq!(config.search.deadline, None);
        assert_eq!(config.mock_file, None);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("COUNTRIES_BASE_URL", "http://localhost:9000/v3.1"),
            ("COUNTRIES_TIMEOUT_SECS", "5"),
            ("COUNTRIES_MAX_CONCURRENT", "2"),
            ("COUNTRY_NAME_LANGUAGE", "RUS"),
            ("ROUTE_MAX_DEPTH", "4"),
            ("ROUTE_POLICY", "all"),
            ("ROUTE_DEADLINE_SECS", "1.5"),
            ("COUNTRIES_MOCK_FILE", "/tmp/countries.json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.countries.base_url, "http://localhost:9000/v3.1");
        assert_eq!(config.countries.timeout_secs, 5);
        assert_eq!(config.countries.max_concurrent, 2);
        assert_eq!(config.countries.name_language.as_deref(), Some("rus"));
        assert_eq!(config.search.max_depth, 4);
        assert_eq!(config.search.policy, RoutePolicy::CollectAll);
        assert_eq!(config.search.deadline, Some(Duration::from_millis(1500)));
        assert_eq!(config.mock_file, Some(PathBuf::from("/tmp/countries.json")));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config(&[("ROUTE_MAX_DEPTH", ""), ("COUNTRIES_MOCK_FILE", "  ")]).unwrap();
        assert_eq!(config.search.max_depth, 10);
        assert_eq!(config.mock_file, None);
    }

    #[test]
    fn invalid_values() {
        let err = config(&[("ROUTE_MAX_DEPTH", "ten")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid value \"ten\" for ROUTE_MAX_DEPTH"));

        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("ROUTE_POLICY", "fastest")]).is_err());
        assert!(config(&[("ROUTE_DEADLINE_SECS", "-1")]).is_err());
        assert!(config(&[("COUNTRIES_MAX_CONCURRENT", "0")]).is_err());
    }
}
