//! Validation engine: strict and partial passes over declared fields.
//!
//! Data-shape failures come back as booleans; only lookups of names that
//! are neither fields nor properties raise.

use crate::{document::Document, error::Error};

impl Document {
    /// Strict validation: an unset required field fails. A cached
    /// success short-circuits; the cache is cleared by any mutation in
    /// the subtree and set again only here.
    #[must_use]
    pub fn validate(&self) -> bool {
        if self.is_known_valid() {
            return true;
        }

        let names = self.schema().field_names();
        let ok = matches!(
            self.check_fields(names.iter().map(String::as_str), true),
            Ok(true)
        );
        if ok {
            self.mark_valid();
        }
        ok
    }

    /// Partial validation: unset fields are acceptable, required or not;
    /// only present values are checked. Never reads or writes the cache.
    #[must_use]
    pub fn validate_partial(&self) -> bool {
        let names = self.schema().field_names();
        matches!(
            self.check_fields(names.iter().map(String::as_str), false),
            Ok(true)
        )
    }

    /// Validate a caller-chosen set of names. Property names are
    /// skipped; names that are neither raise a lookup error, distinct
    /// from an `Ok(false)` validation failure.
    pub fn validate_fields<'a, I>(&self, names: I, stop_on_required: bool) -> Result<bool, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.check_fields(names, stop_on_required)
    }

    pub(crate) fn check_fields<'a, I>(
        &self,
        names: I,
        stop_on_required: bool,
    ) -> Result<bool, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let schema = self.schema();

        for name in names {
            let Some(field) = schema.field(name) else {
                if schema.property(name).is_some() {
                    continue;
                }
                return Err(Error::lookup(format!(
                    "'{name}' is neither a field nor a property on schema '{}'",
                    schema.name()
                )));
            };

            // materializes the default, if any; an unset list field with
            // no default counts as absent here, not as an empty container
            let value = if let Some(stored) = self.stored(name) {
                Some(stored)
            } else if field.default().is_some() {
                self.materialize(field)
            } else {
                None
            };
            let Some(value) = value else {
                if stop_on_required && field.required() {
                    return Ok(false);
                }
                continue;
            };

            if let Some(choices) = field.choices()
                && !choices.contains(&value)
            {
                return Ok(false);
            }

            if !field.validate(&value) {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
