//! Builtin field constructors.
//!
//! Each returns an unnamed `FieldDef`; knobs (`required`, `default_value`,
//! `choices`, `alias`, length bounds, `pattern`) chain on top, and the
//! schema builder assigns the canonical name.

use crate::{
    base::pattern,
    core::{
        field::{FieldDef, FieldKind},
        schema::SchemaRef,
    },
};

/// A boolean slot.
#[must_use]
pub const fn boolean() -> FieldDef {
    FieldDef::new(FieldKind::Bool)
}

/// An integer slot (floats and booleans are rejected).
#[must_use]
pub const fn integer() -> FieldDef {
    FieldDef::new(FieldKind::Int)
}

/// A float slot; integers are accepted.
#[must_use]
pub const fn float() -> FieldDef {
    FieldDef::new(FieldKind::Float)
}

/// A text slot; combine with length bounds and a pattern as needed.
#[must_use]
pub const fn string() -> FieldDef {
    FieldDef::new(FieldKind::Text)
}

/// A text slot pre-configured with the builtin URL syntax pattern.
#[must_use]
pub const fn url() -> FieldDef {
    string().pattern(pattern::URL)
}

/// A text slot pre-configured with the builtin email syntax pattern.
#[must_use]
pub const fn email() -> FieldDef {
    string().pattern(pattern::EMAIL)
}

/// A text slot holding an IPv4 or IPv6 address literal.
#[must_use]
pub const fn ip_address() -> FieldDef {
    FieldDef::new(FieldKind::Ip)
}

/// A timestamp slot.
#[must_use]
pub const fn datetime() -> FieldDef {
    FieldDef::new(FieldKind::Timestamp)
}

/// An opaque identifier slot.
#[must_use]
pub const fn object_id() -> FieldDef {
    FieldDef::new(FieldKind::Id)
}

/// A list slot wrapping an element field; length bounds chained on the
/// list bound the element count.
#[must_use]
pub fn list(element: FieldDef) -> FieldDef {
    FieldDef::list(element)
}

/// An embedded-document slot bound to a nested schema.
#[must_use]
pub fn embedded(schema: &SchemaRef) -> FieldDef {
    FieldDef::embedded(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{document::Document, schema::Schema};

    #[test]
    fn url_field_accepts_urls_only() {
        let schema = Schema::build("user")
            .field("blog_url", url().max_length(64))
            .finish()
            .unwrap();
        let user = Document::new(&schema);

        user.set("blog_url", "http://www.yahoo.com/truc?par=23&machin=23")
            .unwrap();
        assert!(user.validate());

        user.set("blog_url", "bob").unwrap();
        assert!(!user.validate());

        // max_length trips before the pattern matters
        user.set(
            "blog_url",
            "http://www.yahoo.com/truc?par=23&machin=23&param=1234567890aabcdef",
        )
        .unwrap();
        assert!(!user.validate());
    }

    #[test]
    fn email_field_accepts_addresses_only() {
        let schema = Schema::build("user")
            .field("email", email().max_length(32))
            .finish()
            .unwrap();
        let user = Document::new(&schema);

        user.set("email", "bob@sponge.com").unwrap();
        assert!(user.validate());

        user.set("email", "sponge.com").unwrap();
        assert!(!user.validate());

        user.set("email", "123456789012345678901234567890@spong.com")
            .unwrap();
        assert!(!user.validate());
    }
}
