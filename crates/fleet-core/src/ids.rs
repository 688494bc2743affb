//! Strongly typed identifier wrappers.
//!
//! Trucks, nodes and routes are named by short human-readable strings
//! (`"T1"`, `"FUEL_A"`, `"R_SW_HWY"`) that travel unchanged through decision
//! payloads and state exports.  Each gets its own newtype so a node id can
//! never be passed where a route id is expected.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed id wrapper around an owned `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id! {
    /// Unique truck identifier, immutable for the lifetime of a run.
    pub struct TruckId;
}

string_id! {
    /// Identifier of a named point in the world graph.
    pub struct NodeId;
}

string_id! {
    /// Globally unique identifier of a catalog route.
    pub struct RouteId;
}
