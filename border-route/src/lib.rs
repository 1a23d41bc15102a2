//! Land route finder over the country border graph.
//!
//! Answers "which countries do I cross to travel from A to B by land?".
//! Country records are fetched lazily from the REST Countries API (or a
//! local JSON file) as the search reaches them, cached for the lifetime of
//! the process, and explored level by level with the neighbours closest to
//! the destination tried first.

pub mod config;
pub mod countries;
pub mod domain;
pub mod error;
pub mod geo;
pub mod planner;
pub mod repository;
pub mod web;
