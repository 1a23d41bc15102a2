//! Country nodes of the border graph.

use super::CountryCode;

/// Error returned when a coordinate pair is out of range or not finite.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoordinates {
    /// Latitude or longitude is NaN or infinite
    #[error("coordinates must be finite numbers, got ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },

    /// Latitude outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    /// Longitude outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinates> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinates::NonFinite { lat, lon });
        }
        if lat.abs() > 90.0 {
            return Err(InvalidCoordinates::Latitude(lat));
        }
        if lon.abs() > 180.0 {
            return Err(InvalidCoordinates::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other`, in whole meters.
    pub fn distance_to(&self, other: &Coordinates) -> u64 {
        crate::geo::great_circle_meters(self.lat, self.lon, other.lat, other.lon)
    }
}

/// A country as seen by the route search: a node with its border list.
///
/// Immutable once fetched. `borders` keeps the order the remote source
/// reported; an empty list means the country has no land borders.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub code: CountryCode,

    /// Display name used in routes.
    pub name: String,

    pub coordinates: Coordinates,

    /// Codes of neighbouring countries.
    pub borders: Vec<CountryCode>,
}

impl Country {
    pub fn new(
        code: CountryCode,
        name: impl Into<String>,
        coordinates: Coordinates,
        borders: Vec<CountryCode>,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            coordinates,
            borders,
        }
    }

    /// Whether this country has at least one land border.
    pub fn has_borders(&self) -> bool {
        !self.borders.is_empty()
    }

    /// Whether this country borders `code` directly.
    pub fn borders_on(&self, code: &CountryCode) -> bool {
        self.borders.contains(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    #[test]
    fn coordinates_accept_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert_eq!(
            Coordinates::new(90.5, 0.0),
            Err(InvalidCoordinates::Latitude(90.5))
        );
        assert_eq!(
            Coordinates::new(0.0, -180.1),
            Err(InvalidCoordinates::Longitude(-180.1))
        );
    }

    #[test]
    fn coordinates_reject_non_finite() {
        assert!(matches!(
            Coordinates::new(f64::NAN, 0.0),
            Err(InvalidCoordinates::NonFinite { .. })
        ));
        assert!(matches!(
            Coordinates::new(0.0, f64::INFINITY),
            Err(InvalidCoordinates::NonFinite { .. })
        ));
    }

    #[test]
    fn border_queries() {
        let deu = Country::new(
            code("DEU"),
            "Germany",
            Coordinates::new(51.0, 9.0).unwrap(),
            vec![code("AUT"), code("FRA")],
        );
        assert!(deu.has_borders());
        assert!(deu.borders_on(&code("FRA")));
        assert!(!deu.borders_on(&code("ESP")));

        let isl = Country::new(
            code("ISL"),
            "Iceland",
            Coordinates::new(65.0, -18.0).unwrap(),
            vec![],
        );
        assert!(!isl.has_borders());
    }

    #[test]
    fn distance_is_symmetric() {
        let berlin = Coordinates::new(52.52, 13.405).unwrap();
        let paris = Coordinates::new(48.8566, 2.3522).unwrap();
        assert_eq!(berlin.distance_to(&paris), paris.distance_to(&berlin));
        assert_eq!(berlin.distance_to(&berlin), 0);
    }
}
