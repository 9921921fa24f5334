//! Identity types for COMPASS entities

use crate::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Internal database identifier assigned by the backing store.
pub type EntityId = i64;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Staff identifier of an employee.
///
/// Stable across re-imports and distinct from the internal [`EntityId`].
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(try_from = "String", into = "String")]
pub struct Sid(String);

impl Sid {
    /// Build a staff identifier, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "sid".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Sid {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Sid::new(value)
    }
}

impl TryFrom<&str> for Sid {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Sid::new(value)
    }
}

impl From<Sid> for String {
    fn from(sid: Sid) -> Self {
        sid.0
    }
}

impl FromStr for Sid {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sid::new(s)
    }
}

impl AsRef<str> for Sid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<Sid, _>` be queried with a plain `&str`.
impl Borrow<str> for Sid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sid_trims_whitespace() {
        let sid = Sid::new("  E0042 ").unwrap();
        assert_eq!(sid.as_str(), "E0042");
    }

    #[test]
    fn test_sid_rejects_blank() {
        assert!(Sid::new("").is_err());
        assert!(Sid::new("   ").is_err());
    }

    #[test]
    fn test_sid_serde_roundtrip_is_plain_string() {
        let sid = Sid::new("E7").unwrap();
        let json = serde_json::to_string(&sid).unwrap();
        assert_eq!(json, "\"E7\"");
        let back: Sid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sid);
    }

    #[test]
    fn test_sid_deserialize_blank_fails() {
        assert!(serde_json::from_str::<Sid>("\"  \"").is_err());
    }

    #[test]
    fn test_sid_map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Sid::new("A").unwrap(), 1);
        assert_eq!(map.get("A"), Some(&1));
    }
}
