//! REST Countries HTTP client.
//!
//! Provides async methods for querying the restcountries.com v3.1 API.
//! Handles field selection, status mapping, and conversion to domain types.

use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{Country, CountryCode};

use super::convert::{convert_countries, convert_country};
use super::error::CountryError;
use super::source::CountrySource;
use super::types::{CountryDto, CountryPayload};

/// Default base URL for the REST Countries API.
const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Fields every request asks for; the planner cannot work without them.
const REQUIRED_FIELDS: [&str; 4] = ["cca3", "name", "borders", "latlng"];

/// Configuration for the REST Countries client.
#[derive(Debug, Clone)]
pub struct RestCountriesConfig {
    /// Base URL for the API (defaults to production restcountries.com)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Optional fields to request on top of the required ones
    pub extra_fields: Vec<String>,
    /// Translation language for display names (ISO 639-3, e.g. `rus`)
    pub name_language: Option<String>,
}

impl RestCountriesConfig {
    /// Create a config pointing at the public API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            extra_fields: Vec::new(),
            name_language: None,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Request an additional field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.extra_fields.push(field.into());
        self
    }

    /// Use translated display names.
    pub fn with_name_language(mut self, language: impl Into<String>) -> Self {
        self.name_language = Some(language.into());
        self
    }

    /// The `fields` query value: required fields first, then `translations`
    /// when a display language is set, then extras, without duplicates.
    pub fn fields(&self) -> String {
        let mut fields: Vec<&str> = REQUIRED_FIELDS.to_vec();
        if self.name_language.is_some() {
            fields.push("translations");
        }
        for extra in &self.extra_fields {
            if !fields.contains(&extra.as_str()) {
                fields.push(extra);
            }
        }
        fields.join(",")
    }
}

impl Default for RestCountriesConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// REST Countries API client.
///
/// Uses a semaphore to limit concurrent requests so a wide search frontier
/// does not flood the API.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    http: reqwest::Client,
    base_url: String,
    fields: String,
    name_language: Option<String>,
    semaphore: Arc<Semaphore>,
}

impl RestCountriesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RestCountriesConfig) -> Result<Self, CountryError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fields: config.fields(),
            name_language: config.name_language,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the record(s) for one code.
    pub async fn get_by_code(&self, code: CountryCode) -> Result<Vec<Country>, CountryError> {
        let url = format!("{}/alpha/{}", self.base_url, code.as_str());
        let body = self.get_body(&url, Some(code)).await?;

        let payload: CountryPayload =
            serde_json::from_str(&body).map_err(|e| CountryError::InvalidResponse {
                message: format!("{e} (body: {})", body.chars().take(500).collect::<String>()),
            })?;

        let countries = convert_countries(&payload.into_vec(), self.name_language.as_deref())?;
        debug!(code = %code, records = countries.len(), "fetched country");
        Ok(countries)
    }

    /// Fetch every country.
    ///
    /// Records that fail validation are skipped rather than failing the
    /// whole list.
    pub async fn get_all(&self) -> Result<Vec<Country>, CountryError> {
        let url = format!("{}/all", self.base_url);
        let body = self.get_body(&url, None).await?;

        let dtos: Vec<CountryDto> =
            serde_json::from_str(&body).map_err(|e| CountryError::InvalidResponse {
                message: e.to_string(),
            })?;

        let total = dtos.len();
        let countries: Vec<Country> = dtos
            .iter()
            .filter_map(
                |dto| match convert_country(dto, self.name_language.as_deref()) {
                    Ok(country) => Some(country),
                    Err(e) => {
                        warn!(error = %e, "skipping invalid country record");
                        None
                    }
                },
            )
            .collect();

        debug!(total, valid = countries.len(), "fetched all countries");
        Ok(countries)
    }

    /// Issue a GET with the field selection and map the status.
    async fn get_body(&self, url: &str, code: Option<CountryCode>) -> Result<String, CountryError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| CountryError::Unexpected {
                message: "request semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .get(url)
            .query(&[("fields", self.fields.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CountryError::NotFound {
                code: code.map(|c| c.to_string()).unwrap_or_default(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::BAD_REQUEST => CountryError::BadRequest { message },
                s if s.is_server_error() => CountryError::Unavailable {
                    status: s.as_u16(),
                    message,
                },
                s => CountryError::Api {
                    status: s.as_u16(),
                    message,
                },
            });
        }

        Ok(response.text().await?)
    }
}

impl CountrySource for RestCountriesClient {
    async fn fetch_by_code(&self, code: CountryCode) -> Result<Vec<Country>, CountryError> {
        self.get_by_code(code).await
    }

    async fn fetch_all(&self) -> Result<Vec<Country>, CountryError> {
        self.get_all().await
    }
}
