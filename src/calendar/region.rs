use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("region name '{0}' is empty")]
pub struct InvalidRegionError(pub String);

/// Region identifier, always stored trimmed, lowercase and non-empty.
///
/// Every boundary that accepts a region name (catalog keys, persisted
/// selections, CLI arguments) goes through `Region::parse`, so lookups never
/// depend on the caller's casing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Region(String);

impl Region {
    pub fn parse(name: &str) -> Result<Region, InvalidRegionError> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(InvalidRegionError(name.to_owned()));
        }
        Ok(Region(normalized))
    }

    /// Built-in names only; `name` must already be a valid region.
    pub(crate) fn from_static(name: &'static str) -> Region {
        debug_assert!(!name.trim().is_empty());
        Region(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Region {
    type Err = InvalidRegionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Region::parse(name)
    }
}

impl TryFrom<&str> for Region {
    type Error = InvalidRegionError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Region::parse(name)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Region::parse(&name).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidRegionError, Region};

    #[test]
    fn region_names_are_lowercased_and_trimmed() {
        assert_eq!(Region::parse("  Berlin ").unwrap().as_str(), "berlin");
        assert_eq!(
            Region::try_from("BAVARIA").unwrap(),
            "bavaria".parse::<Region>().unwrap()
        );
    }

    #[test]
    fn blank_region_names_are_rejected() {
        assert_eq!(Region::parse(""), Err(InvalidRegionError(String::new())));
        assert_eq!(Region::parse("   "), Err(InvalidRegionError("   ".to_owned())));
        assert!(serde_json::from_str::<Region>("\" \"").is_err());
    }

    #[test]
    fn region_deserializes_to_canonical_form() {
        let region: Region = serde_json::from_str("\"Hamburg\"").unwrap();
        assert_eq!(region.as_str(), "hamburg");
        assert_eq!(serde_json::to_string(&region).unwrap(), "\"hamburg\"");
    }
}
