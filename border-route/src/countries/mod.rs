//! Country data sources.
//!
//! The planner discovers the border graph lazily: a country's neighbour list
//! is only known once that country has been fetched. This module provides
//! the fetch side of that, behind the [`CountrySource`] trait:
//!
//! - [`RestCountriesClient`] talks to the restcountries.com v3.1 API
//! - [`MockCountrySource`] serves fixed data for tests and offline runs
//!
//! Sources never cache; see [`crate::repository`] for that.

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{RestCountriesClient, RestCountriesConfig};
pub use convert::{ConversionError, convert_countries, convert_country};
pub use error::CountryError;
pub use mock::MockCountrySource;
pub use source::CountrySource;
pub use types::{CountryDto, CountryPayload, NameDto, TranslationDto};
