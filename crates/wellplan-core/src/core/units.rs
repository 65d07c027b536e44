use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace prefix every resource identifier carries.
pub const RESOURCE_ID_PREFIX: &str = "rs";

/// A liquid volume, stored in microliters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Volume(f64);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VolumeParseError {
    #[error("Invalid volume magnitude '{0}'")]
    InvalidNumber(String),
    #[error("Unknown volume unit '{0}'")]
    UnknownUnit(String),
}

impl Volume {
    pub fn microliters(value: f64) -> Self {
        Self(value)
    }

    pub fn as_microliters(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Volume {
    fn from(microliters: f64) -> Self {
        Self(microliters)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:microliter", self.0)
    }
}

fn unit_factor(unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "" | "ul" | "µl" | "μl" | "microliter" | "microliters" => Some(1.0),
        "ml" | "milliliter" | "milliliters" => Some(1_000.0),
        "nl" | "nanoliter" | "nanoliters" => Some(0.001),
        "l" | "liter" | "liters" => Some(1_000_000.0),
        _ => None,
    }
}

impl FromStr for Volume {
    type Err = VolumeParseError;

    /// Parses `"5:microliter"`, `"0.5 mL"`, `"5uL"` or a bare number of microliters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (magnitude, unit) = match s.split_once(':') {
            Some((magnitude, unit)) => (magnitude.trim(), unit.trim()),
            None => {
                let split = s
                    .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
                    .unwrap_or(s.len());
                (s[..split].trim(), s[split..].trim())
            }
        };
        let value: f64 = magnitude
            .parse()
            .map_err(|_| VolumeParseError::InvalidNumber(magnitude.to_string()))?;
        let factor =
            unit_factor(unit).ok_or_else(|| VolumeParseError::UnknownUnit(unit.to_string()))?;
        Ok(Self(value * factor))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVolume {
    Number(f64),
    Integer(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawVolume::deserialize(deserializer)? {
            RawVolume::Number(value) => Ok(Self(value)),
            RawVolume::Integer(value) => Ok(Self(value as f64)),
            RawVolume::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// An identifier for a catalog resource that can be provisioned (e.g. `rs17gmh5wafm5p`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Resource id '{0}' must start with '{RESOURCE_ID_PREFIX}' followed by alphanumeric characters")]
pub struct ResourceIdError(pub String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s
            .strip_prefix(RESOURCE_ID_PREFIX)
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ResourceIdError(s.to_string()))
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_colon_notation() {
        assert_eq!("5:microliter".parse::<Volume>().unwrap(), Volume::microliters(5.0));
        assert_eq!("0.5:milliliter".parse::<Volume>().unwrap(), Volume::microliters(500.0));
    }

    #[test]
    fn parse_accepts_suffix_notation_and_bare_numbers() {
        assert_eq!("5uL".parse::<Volume>().unwrap(), Volume::microliters(5.0));
        assert_eq!("2 µL".parse::<Volume>().unwrap(), Volume::microliters(2.0));
        assert_eq!("1.5 mL".parse::<Volume>().unwrap(), Volume::microliters(1500.0));
        assert_eq!("12".parse::<Volume>().unwrap(), Volume::microliters(12.0));
    }

    #[test]
    fn parse_rejects_unknown_units_and_garbage() {
        assert_eq!(
            "5:gallon".parse::<Volume>(),
            Err(VolumeParseError::UnknownUnit("gallon".to_string()))
        );
        assert!(matches!(
            "str".parse::<Volume>(),
            Err(VolumeParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn deserialize_accepts_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Holder {
            a: Volume,
            b: Volume,
            c: Volume,
        }
        let holder: Holder = toml::from_str("a = 4\nb = 2.5\nc = \"1:milliliter\"").unwrap();
        assert_eq!(holder.a.as_microliters(), 4.0);
        assert_eq!(holder.b.as_microliters(), 2.5);
        assert_eq!(holder.c.as_microliters(), 1000.0);
    }

    #[test]
    fn resource_id_requires_namespace_prefix() {
        assert!("rs17gmh5wafm5p".parse::<ResourceId>().is_ok());
        assert!("rs123".parse::<ResourceId>().is_ok());
        assert!("234".parse::<ResourceId>().is_err());
        assert!("rs".parse::<ResourceId>().is_err());
        assert!("rs-12".parse::<ResourceId>().is_err());
        assert!("xrs12".parse::<ResourceId>().is_err());
    }
}
