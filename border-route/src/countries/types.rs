//! REST Countries (v3.1) response DTOs.
//!
//! These types map directly to the JSON the remote source returns. Only the
//! fields the planner needs are modelled; everything else is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A country record as returned by `/alpha/{code}` and `/all`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountryDto {
    /// ISO 3166-1 alpha-3 code.
    pub cca3: String,

    pub name: NameDto,

    /// Alpha-3 codes of land neighbours; empty for islands. `None` when the
    /// key is absent, which conversion rejects.
    #[serde(default)]
    pub borders: Option<Vec<String>>,

    /// `[latitude, longitude]` in degrees.
    pub latlng: Vec<f64>,

    /// Name translations keyed by ISO 639-3 language code (e.g. `rus`).
    /// Only present when requested through the `fields` parameter.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub translations: HashMap<String, TranslationDto>,
}

/// Country name block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NameDto {
    pub common: String,
    pub official: Option<String>,
}

/// A single translation of the country name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationDto {
    pub common: String,
    pub official: Option<String>,
}

/// By-code lookups answer with one record, or with a list when the code
/// matches several records (alternate-code lookups).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountryPayload {
    Many(Vec<CountryDto>),
    One(CountryDto),
}

impl CountryPayload {
    pub fn into_vec(self) -> Vec<CountryDto> {
        match self {
            CountryPayload::Many(list) => list,
            CountryPayload::One(dto) => vec![dto],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLAND: &str = r#"{
        "name": {"common": "Poland", "official": "Republic of Poland", "nativeName": {}},
        "cca3": "POL",
        "borders": ["BLR", "CZE", "DEU", "LTU", "RUS", "SVK", "UKR"],
        "latlng": [52.0, 20.0],
        "translations": {"rus": {"official": "Республика Польша", "common": "Польша"}}
    }"#;

    #[test]
    fn parses_single_record() {
        let payload: CountryPayload = serde_json::from_str(POLAND).unwrap();
        let list = payload.into_vec();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].cca3, "POL");
        assert_eq!(list[0].name.common, "Poland");
        assert_eq!(list[0].borders.as_ref().map(Vec::len), Some(7));
        assert_eq!(list[0].translations["rus"].common, "Польша");
    }

    #[test]
    fn parses_list() {
        let json = format!("[{POLAND}, {POLAND}]");
        let payload: CountryPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload.into_vec().len(), 2);
    }

    #[test]
    fn empty_and_missing_borders_are_distinct() {
        let json = r#"{"name": {"common": "Iceland"}, "cca3": "ISL", "latlng": [65.0, -18.0], "borders": []}"#;
        let dto: CountryDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.borders, Some(vec![]));
        assert!(dto.translations.is_empty());

        let json = r#"{"name": {"common": "Iceland"}, "cca3": "ISL", "latlng": [65.0, -18.0]}"#;
        let dto: CountryDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.borders, None);
    }

    #[test]
    fn missing_latlng_is_rejected() {
        let json = r#"{"name": {"common": "Nowhere"}, "cca3": "NOW", "borders": []}"#;
        assert!(serde_json::from_str::<CountryPayload>(json).is_err());
    }
}
