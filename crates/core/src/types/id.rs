//! Newtype IDs for type-safe entity references.
//!
//! The backend issues 64-bit numeric identifiers for every entity. Wrapping
//! them keeps a `BookId` from being passed where a `PackId` is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `Display`, `FromStr`, `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use bookshelf_core::define_id;
/// define_id!(ShelfId);
/// define_id!(ReviewId);
///
/// let shelf = ShelfId::new(1);
/// let review = ReviewId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = review;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(BookId);
define_id!(AuthorId);
define_id!(PackId);
define_id!(TagId);
define_id!(OrderId);
define_id!(CategoryId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_number() {
        let id = BookId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let parsed: BookId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_from_str_trims() {
        let id: PackId = " 7 ".parse().unwrap();
        assert_eq!(id.as_i64(), 7);
        assert!("seven".parse::<PackId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(TagId::new(3).to_string(), "3");
    }
}
