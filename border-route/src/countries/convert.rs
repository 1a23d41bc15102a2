//! Conversion from wire DTOs to validated domain types.

use crate::domain::{Coordinates, Country, CountryCode, InvalidCoordinates, InvalidCountryCode};

use super::types::CountryDto;

/// A DTO that does not describe a usable country node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("record has invalid cca3: {0}")]
    Code(#[from] InvalidCountryCode),

    #[error("country {code} has an empty name")]
    EmptyName { code: CountryCode },

    #[error("country {code} has no borders list")]
    MissingBorders { code: CountryCode },

    #[error("country {code}: latlng must have exactly 2 elements, got {len}")]
    LatLngLength { code: CountryCode, len: usize },

    #[error("country {code}: {source}")]
    Coordinates {
        code: CountryCode,
        source: InvalidCoordinates,
    },

    #[error("country {code} lists an invalid border: {source}")]
    Border {
        code: CountryCode,
        source: InvalidCountryCode,
    },
}

/// Convert one record.
///
/// The display name is the translation for `language` when one is given and
/// present in the record, otherwise the common English name.
pub fn convert_country(dto: &CountryDto, language: Option<&str>) -> Result<Country, ConversionError> {
    let code = CountryCode::parse(&dto.cca3)?;

    let name = language
        .and_then(|lang| dto.translations.get(lang))
        .map(|t| t.common.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| dto.name.common.trim());
    if name.is_empty() {
        return Err(ConversionError::EmptyName { code });
    }

    let &[lat, lon] = dto.latlng.as_slice() else {
        return Err(ConversionError::LatLngLength {
            code,
            len: dto.latlng.len(),
        });
    };
    let coordinates =
        Coordinates::new(lat, lon).map_err(|source| ConversionError::Coordinates { code, source })?;

    let Some(borders) = &dto.borders else {
        return Err(ConversionError::MissingBorders { code });
    };
    let borders = borders
        .iter()
        .map(|b| CountryCode::parse(b))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ConversionError::Border { code, source })?;

    Ok(Country::new(code, name, coordinates, borders))
}

/// Convert every record, failing on the first invalid one.
pub fn convert_countries(
    dtos: &[CountryDto],
    language: Option<&str>,
) -> Result<Vec<Country>, ConversionError> {
    dtos.iter().map(|dto| convert_country(dto, language)).collect()
}
