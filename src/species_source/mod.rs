//! External species source
//!
//! This module provides:
//! - Response types for the paginated named-resource collection
//! - The [`HttpAdapter`] capability the seeding pipeline depends on
//! - A reqwest implementation of that capability

pub mod client;
pub mod types;

pub use client::{fetch_json, FetchError, HttpAdapter, ReqwestAdapter};
pub use types::{ordinal_from_url, NamedResource, SpeciesPage};
