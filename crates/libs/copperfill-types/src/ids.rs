//! Identifier newtypes for board entities.
//!
//! Net signals and planes carry stable Uuid-backed identifiers; layers are
//! identified by their canonical name. Identifier equality is the identity
//! the whole board model compares by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A canonical copper/document layer name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerName(String);

impl LayerName {
    /// The distinguished layer holding the board's physical outline.
    pub const BOARD_OUTLINES: &'static str = "board_outlines";

    pub fn new(name: impl Into<String>) -> Self {
        LayerName(name.into())
    }

    pub fn board_outlines() -> Self {
        LayerName(Self::BOARD_OUTLINES.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_board_outlines(&self) -> bool {
        self.0 == Self::BOARD_OUTLINES
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id! {
    /// Identifier of a net signal.
    NetId
}

uuid_id! {
    /// Identifier of a plane; also the tie breaker of the plane ordering.
    PlaneId
}
