//! Builtin design-time helpers: the field constructor library and the
//! hand-rolled syntax patterns wired into it.

pub mod field;
pub mod pattern;
