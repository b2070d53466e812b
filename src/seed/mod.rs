//! Catalog seeding from the external species source

pub mod service;

pub use service::{transform, SeedService};
