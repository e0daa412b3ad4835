//! # apir-region: Region Model
//!
//! Named regions form single-parent chains; each holds a set of package
//! exports, the artifacts that contributed it, and passthrough properties.
//!
//! - [`region`]: the [`ApiRegions`] arena, ancestor walks, visible exports.
//! - [`export`]: [`ApiExport`] and its [`Deprecation`] metadata.
//! - [`merge`]: folding a contributor's regions into an aggregate.
//! - [`json`]: the persisted JSON form.

pub mod error;
pub mod export;
pub mod json;
pub mod merge;
pub mod region;

pub use error::{RegionError, RegionResult};
pub use export::{ApiExport, Deprecation, DeprecationInfo, DeprecationMode};
pub use region::{ApiRegion, ApiRegions, GLOBAL_REGION};
