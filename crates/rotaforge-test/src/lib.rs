//! Shared test fixtures for RotaForge crates.
//!
//! - [`catalog`] - small ability catalogs with known optimal rotations
//! - [`resource`] - meter rule variants used by the scenario tests
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! rotaforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use rotaforge_test::catalog::{single_basic, competing_pair};
//! use rotaforge_test::resource::ultimate_exactly;
//! ```

pub mod catalog;
pub mod resource;

pub use catalog::{competing_pair, melee_like, single_basic, threshold_only, ultimate_only};
pub use resource::{no_buff, short_buff, ultimate_exactly};
