//! Core engine for dictum: field descriptors, schema registry, document
//! instances, notifying containers, and the validation and serialization
//! engines.
//!
//! No I/O: everything here manipulates in-memory structured data and
//! hands plain mappings to the caller to persist or transmit.

pub mod document;
pub mod error;
pub mod field;
pub mod filter;
pub mod list;
pub mod schema;
pub mod serialize;
pub mod types;
pub mod validate;
pub mod value;

///
/// Prelude
/// The domain vocabulary needed to declare and use models.
///

pub mod prelude {
    pub use crate::{
        document::Document,
        error::{Error, ErrorKind},
        field::{FieldDef, FieldKind, Pattern},
        filter::{Filter, rename_field},
        list::List,
        schema::{Schema, SchemaBuilder, SchemaRef},
        serialize::Visibility,
        types::{Id, Timestamp},
        value::{Map, Value},
    };
}
