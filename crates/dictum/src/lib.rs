//! dictum — database-agnostic document modeling and validation.
//!
//! ## Crate layout
//! - `core`: the engine — values, schemas, documents, containers, and
//!   the validation and serialization passes.
//! - `base`: the builtin field library and syntax patterns.
//!
//! Declare typed fields on a schema, construct documents from untrusted
//! mappings, track changes, and project visibility-scoped dictionaries.

pub use dictum_core as core;

pub mod base;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// the builtin field constructors plus the core vocabulary
///

pub mod prelude {
    pub use crate::base::{
        field::{
            boolean, datetime, email, embedded, float, integer, ip_address, list, object_id,
            string, url,
        },
        pattern,
    };
    pub use dictum_core::prelude::*;
}
