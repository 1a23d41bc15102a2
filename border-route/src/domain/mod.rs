//! Domain types for the border-graph route finder.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them (the repository cache, the planner) can trust their validity.

mod code;
mod country;

pub use code::{CountryCode, InvalidCountryCode};
pub use country::{Coordinates, Country, InvalidCoordinates};
