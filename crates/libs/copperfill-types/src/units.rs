//! Length and angle newtypes.
//!
//! All board coordinates and distances are exact integer nanometres; all
//! angles are integer microdegrees. Positive angles are counter-clockwise.

use std::fmt;
use std::ops::{Div, Mul};

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

const NM_PER_MM: f64 = 1_000_000.0;
const UDEG_PER_DEG: f64 = 1_000_000.0;

/// A length in integer nanometres.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Neg,
    Sum,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Length(i64);

impl Length {
    pub const ZERO: Length = Length(0);

    /// Constructs a length from nanometres.
    pub const fn nm(nm: i64) -> Self {
        Length(nm)
    }

    /// Constructs a length from millimetres, rounded to the nearest nanometre.
    pub fn mm(mm: f64) -> Self {
        Length((mm * NM_PER_MM).round() as i64)
    }

    pub const fn to_nm(self) -> i64 {
        self.0
    }

    pub fn to_mm(self) -> f64 {
        self.0 as f64 / NM_PER_MM
    }

    pub const fn abs(self) -> Self {
        Length(self.0.abs())
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Mul<i64> for Length {
    type Output = Length;

    fn mul(self, rhs: i64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<i64> for Length {
    type Output = Length;

    fn div(self, rhs: i64) -> Length {
        Length(self.0 / rhs)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}nm", self.0)
    }
}

/// An angle in integer microdegrees. Positive is counter-clockwise.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Neg,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Angle(i64);

impl Angle {
    pub const ZERO: Angle = Angle(0);

    /// Constructs an angle from microdegrees.
    pub const fn udeg(udeg: i64) -> Self {
        Angle(udeg)
    }

    /// Constructs an angle from degrees, rounded to the nearest microdegree.
    pub fn deg(deg: f64) -> Self {
        Angle((deg * UDEG_PER_DEG).round() as i64)
    }

    /// Constructs an angle from radians.
    pub fn rad(rad: f64) -> Self {
        Angle::deg(rad.to_degrees())
    }

    pub const fn to_udeg(self) -> i64 {
        self.0
    }

    pub fn to_deg(self) -> f64 {
        self.0 as f64 / UDEG_PER_DEG
    }

    pub fn to_rad(self) -> f64 {
        self.to_deg().to_radians()
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn abs(self) -> Self {
        Angle(self.0.abs())
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.to_deg())
    }
}
