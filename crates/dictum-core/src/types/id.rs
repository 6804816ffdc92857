use derive_more::{Deref, DerefMut, Display, FromStr};
use serde::{Deserialize, Serialize, Serializer, de::Deserializer};
use ulid::Ulid as WrappedUlid;

///
/// Id
/// Opaque document identifier backed by a ULID.
///
/// Stores may supply their own identifiers; this is the builtin one.
/// Serialized as its canonical 26-character string form.
///

#[derive(
    Clone, Copy, Debug, Default, Deref, DerefMut, Display, Eq, FromStr, Hash, Ord, PartialEq,
    PartialOrd,
)]
#[repr(transparent)]
pub struct Id(WrappedUlid);

impl Id {
    #[must_use]
    pub fn generate() -> Self {
        Self(WrappedUlid::new())
    }

    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(WrappedUlid::from_parts(timestamp_ms, random))
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<WrappedUlid> for Id {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let id = Id::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 26);
        assert_eq!(text.parse::<Id>().unwrap(), id);
    }

    #[test]
    fn nil_is_nil() {
        assert!(Id::nil().is_nil());
        assert!(!Id::generate().is_nil());
    }
}
