#![deny(missing_docs)]

//! # apir-core: Foundational Types for API Regions
//!
//! Primitives shared by the region model, the configuration schema engine
//! and the analysers. No internal crate dependencies and no I/O; only
//! `serde`, `serde_json`, `thiserror` and `chrono` from the ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Explicit orders.** [`Mode`] carries a documented level instead of
//!    relying on declaration order, and [`Mode::merge`] is a pure function.
//!
//! 2. **Parse, don't validate.** [`Version`], [`VersionRange`] and
//!    [`ArtifactId`] are only constructible from well-formed input.
//!
//! 3. **[`ApirError`] hierarchy.** Structured errors with `thiserror`; no
//!    `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod mode;
pub mod temporal;
pub mod version;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ApirError, ValidationError};
pub use identity::ArtifactId;
pub use mode::{Mode, Region};
pub use temporal::{days_after, format_date, parse_date, today};
pub use version::{Version, VersionRange};
