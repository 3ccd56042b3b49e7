//! RQBOARD Records - Result Blob Parser & Result-List Decoding
//!
//! Turns the raw inputs of the dashboard into typed values:
//!
//! ```text
//! Result blob (KEY;VALUE[,LABEL[,SECONDARY[,LOCATION]]] lines)
//!     ↓
//! Record Parser ──▶ MetadataRegistry (insert-if-absent)
//!     ↓
//! OutcomeMap
//!
//! Comparison / result-list JSON
//!     ↓
//! Decoder (file paths → FileRef)
//!     ↓
//! Comparison { ResultsByCategory, IB checks, merged PRs }
//! ```

pub mod comparison;
pub mod record;
pub mod results;

pub use comparison::*;
pub use record::*;
pub use results::*;
