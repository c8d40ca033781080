//! Database seeding functionality
//!
//! This module provides functionality to seed the database with the default
//! lookup rows (property, electricity, payment and lease types).

pub mod lookups;

pub use lookups::{SeedReport, seed_lookups};
