//! How a plane unites with same-net pads and vias.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error raised when parsing a [`ConnectStyle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectStyleError {
    /// The thermal variant exists in saved files for forward compatibility
    /// but no release implements it yet. It must not silently degrade to
    /// solid connects.
    #[error("thermal connect style is reserved but not supported by this release")]
    ThermalNotSupported,
    #[error("unknown connect style: {0:?}")]
    Unknown(String),
}

/// The manner in which a plane connects to same-net pads and vias.
///
/// `Thermal` is reserved in the data model (saved boards may carry it) but
/// parsing it is an error in the current release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectStyle {
    /// Same-net pads and vias merge into the plane without any cut-out.
    #[default]
    Solid,
    /// Same-net pads and vias are treated like foreign objects and cut out
    /// with full clearance.
    None,
    /// Thermal spokes; reserved, not implemented.
    Thermal,
}

impl ConnectStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConnectStyle::Solid => "solid",
            ConnectStyle::None => "none",
            ConnectStyle::Thermal => "thermal",
        }
    }
}

impl fmt::Display for ConnectStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectStyle {
    type Err = ConnectStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(ConnectStyle::Solid),
            "none" => Ok(ConnectStyle::None),
            "thermal" => Err(ConnectStyleError::ThermalNotSupported),
            other => Err(ConnectStyleError::Unknown(other.into())),
        }
    }
}

impl Serialize for ConnectStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConnectStyle {
    /// Accepts all three variants, including the reserved thermal one, so
    /// saved boards round-trip; rejecting thermal planes is the board-file
    /// loader's job, which can name the offending plane.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "solid" => Ok(ConnectStyle::Solid),
            "none" => Ok(ConnectStyle::None),
            "thermal" => Ok(ConnectStyle::Thermal),
            other => Err(D::Error::custom(ConnectStyleError::Unknown(other.into()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_styles() {
        assert_eq!("solid".parse::<ConnectStyle>(), Ok(ConnectStyle::Solid));
        assert_eq!("none".parse::<ConnectStyle>(), Ok(ConnectStyle::None));
    }

    #[test]
    fn thermal_is_a_parse_error() {
        assert_eq!(
            "thermal".parse::<ConnectStyle>(),
            Err(ConnectStyleError::ThermalNotSupported)
        );
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert_eq!(
            "starburst".parse::<ConnectStyle>(),
            Err(ConnectStyleError::Unknown("starburst".into()))
        );
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&ConnectStyle::None).unwrap();
        assert_eq!(json, "\"none\"");
        assert_eq!(
            serde_json::from_str::<ConnectStyle>(&json).unwrap(),
            ConnectStyle::None
        );
        // thermal round-trips through serde even though from_str rejects it
        let thermal = serde_json::to_string(&ConnectStyle::Thermal).unwrap();
        assert_eq!(thermal, "\"thermal\"");
        assert_eq!(
            serde_json::from_str::<ConnectStyle>(&thermal).unwrap(),
            ConnectStyle::Thermal
        );
    }
}
