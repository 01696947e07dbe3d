//! Newtype IDs for type-safe entity references.
//!
//! The backend issues opaque identifiers. Some deployments return them as
//! JSON strings and others as integers, so every ID deserializes from either
//! and is kept as a string.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` with `#[serde(transparent)]`
/// - `Deserialize` from a JSON string or integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
///
/// # Example
///
/// ```rust
/// # use onboarding_core::define_id;
/// define_id!(InvoiceId);
/// define_id!(TerminalId);
///
/// let invoice = InvoiceId::new("inv_1");
/// let terminal = TerminalId::new("inv_1");
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = terminal;
/// # let _ = (invoice, terminal);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_string_or_int(deserializer).map(Self)
            }
        }
    };
}

define_id!(MerchantId);
define_id!(StoreId);

/// Deserialize a JSON string or integer into a `String`.
///
/// Used by [`define_id!`]; not part of the stable API.
///
/// # Errors
///
/// Returns the deserializer's error for any other JSON type.
#[doc(hidden)]
pub fn deserialize_string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrInt;

    impl Visitor<'_> for StringOrInt {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrInt)
}
