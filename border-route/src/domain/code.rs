//! Country code types.

use std::fmt;

/// Error returned when parsing an invalid country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid country code {input:?}: {reason}")]
pub struct InvalidCountryCode {
    input: String,
    reason: &'static str,
}

impl InvalidCountryCode {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A valid 3-letter country code (ISO 3166-1 alpha-3 style, e.g. `DEU`).
///
/// Codes are always 3 uppercase ASCII letters. Any `CountryCode` value is
/// valid by construction, so it can be used directly as a graph node key.
///
/// # Examples
///
/// ```
/// use border_route::domain::CountryCode;
///
/// let deu = CountryCode::parse("DEU").unwrap();
/// assert_eq!(deu.as_str(), "DEU");
///
/// // Lowercase is rejected by `parse`, accepted by `parse_normalized`
/// assert!(CountryCode::parse("deu").is_err());
/// assert_eq!(CountryCode::parse_normalized(" deu ").unwrap(), deu);
///
/// // Wrong length is rejected
/// assert!(CountryCode::parse("DE").is_err());
/// assert!(CountryCode::parse("DEUT").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 3]);

impl CountryCode {
    /// Parse a country code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidCountryCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidCountryCode {
                input: s.to_string(),
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidCountryCode {
                input: s.to_string(),
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(CountryCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are
    /// uppercased before validation.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCountryCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CountryCode {
    type Err = InvalidCountryCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for CountryCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(CountryCode::parse("DEU").is_ok());
        assert!(CountryCode::parse("FRA").is_ok());
        assert!(CountryCode::parse("UNK").is_ok());
        assert!(CountryCode::parse("AAA").is_ok());
        assert!(CountryCode::parse("ZZZ").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(CountryCode::parse("deu").is_err());
        assert!(CountryCode::parse("Deu").is_err());
        assert!(CountryCode::parse("DEu").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(CountryCode::parse("").is_err());
        assert!(CountryCode::parse("D").is_err());
        assert!(CountryCode::parse("DE").is_err());
        assert!(CountryCode::parse("DEUT").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(CountryCode::parse("D1U").is_err());
        assert!(CountryCode::parse("D-U").is_err());
        assert!(CountryCode::parse("D U").is_err());
        assert!(CountryCode::parse("DÖU").is_err());
    }

    #[test]
    fn normalized_parse_trims_and_uppercases() {
        let code = CountryCode::parse_normalized("  fra\n").unwrap();
        assert_eq!(code.as_str(), "FRA");
        assert!(CountryCode::parse_normalized("fr").is_err());
    }

    #[test]
    fn error_names_input() {
        let err = CountryCode::parse("xx").unwrap_err();
        assert_eq!(err.input(), "xx");
        assert_eq!(
            err.to_string(),
            "invalid country code \"xx\": must be exactly 3 characters"
        );
    }

    #[test]
    fn display_and_debug() {
        let code = CountryCode::parse("POL").unwrap();
        assert_eq!(format!("{code}"), "POL");
        assert_eq!(format!("{code:?}"), "CountryCode(POL)");
    }

    #[test]
    fn serializes_as_string() {
        let code = CountryCode::parse("ESP").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"ESP\"");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z]{3}") {
            let code = CountryCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase input is rejected strictly but accepted when normalized
        #[test]
        fn lowercase_normalizes(s in "[a-z]{3}") {
            prop_assert!(CountryCode::parse(&s).is_err());
            let code = CountryCode::parse_normalized(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.to_ascii_uppercase());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,2}|[A-Z]{4,10}") {
            prop_assert!(CountryCode::parse(&s).is_err());
        }
    }
}
