//! Domain types for the quote cache with strong typing.
//!
//! Provides type-safe wrappers for the cache subsystem. The Newtype
//! pattern prevents mixing cache row IDs with other integers.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a cached quote row.
///
/// Assigned by the local store on insertion and stable until the next
/// full cache replacement.
///
/// # Examples
///
/// ```rust
/// use quotarr::domain::QuoteId;
///
/// let id = QuoteId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QuoteId(i32);

impl QuoteId {
    /// Creates a new `QuoteId` from a raw i32 value.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `id` is negative. Production code should
    /// validate before construction.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "QuoteId should be non-negative");
        Self(id)
    }

    /// Returns the underlying i32 value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<QuoteId> for i32 {
    fn from(id: QuoteId) -> Self {
        id.0
    }
}

impl From<i32> for QuoteId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for QuoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for QuoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_id_conversions() {
        let id = QuoteId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(QuoteId::from(42), id);
    }

    #[test]
    fn quote_id_equality() {
        let id1 = QuoteId::new(1);
        let id2 = QuoteId::new(1);
        let id3 = QuoteId::new(2);
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn quote_id_serialization() {
        let id = QuoteId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: QuoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }
}
