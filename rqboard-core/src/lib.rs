//! RQBOARD Core - Dashboard Data Types
//!
//! Pure data structures shared by the record parser and the matrix builder.
//! This crate contains the outcome model, the category metadata registry,
//! cell descriptors, configuration, and error types. Classification logic
//! lives in `rqboard-matrix`; parsing lives in `rqboard-records`.

pub mod config;
pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod registry;
pub mod tags;

pub use config::*;
pub use entities::*;
pub use enums::*;
pub use error::*;
pub use identity::*;
pub use registry::*;
pub use tags::*;

/// Sentinel written into a result `file` when the category has not produced
/// its log yet.
pub const NOT_READY_SENTINEL: &str = "not-ready";

/// Literal token that marks a successful check in a result blob.
pub const PASSED_TOKEN: &str = "passed";

/// Secondary label given to categories that arrive without one.
pub const DEFAULT_SECONDARY_LABEL: &str = "See Log";

/// Evidence location given to categories that arrive without one.
pub const DEFAULT_EVIDENCE_LOCATION: &str = "unknown.log";
