//! ASCII case-insensitive identifiers.
//!
//! Block and option names compare without regard to ASCII case everywhere:
//! in templates, in raw option lookups and in the mapper. [`CiKey`] is the
//! single key type used for all of those maps so the comparison rule lives
//! in one place.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A name that hashes and compares ignoring ASCII case, keeping its
/// original spelling for display and writing.
#[derive(Clone, Default)]
pub struct CiKey(String);

impl CiKey {
    /// Create a key from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as originally spelled.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a plain string ignoring ASCII case.
    #[inline]
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Consume the key, returning the original spelling.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl PartialEq for CiKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CiKey {}

impl PartialEq<str> for CiKey {
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl PartialEq<&str> for CiKey {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

impl Hash for CiKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xFF);
    }
}

impl Ord for CiKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

impl PartialOrd for CiKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for CiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiKey({:?})", self.0)
    }
}

impl fmt::Display for CiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CiKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CiKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CiKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self)
    }
}
