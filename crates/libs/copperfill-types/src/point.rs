use derive_more::{Add, AddAssign, Sub, SubAssign};
use serde::{Deserialize, Serialize};

use crate::units::{Angle, Length};

/// A position on the board, in integer nanometres.
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
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Serialize,
    Deserialize,
)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    pub const ORIGIN: Point = Point {
        x: Length::ZERO,
        y: Length::ZERO,
    };

    pub const fn new(x: Length, y: Length) -> Self {
        Point { x, y }
    }

    /// Shorthand constructor taking raw nanometre coordinates.
    pub const fn nm(x: i64, y: i64) -> Self {
        Point {
            x: Length::nm(x),
            y: Length::nm(y),
        }
    }

    pub fn translated(self, by: Point) -> Self {
        self + by
    }

    /// Rotates the point counter-clockwise around the origin.
    ///
    /// Trigonometry happens in f64; the result is rounded back to the
    /// nanometre grid.
    pub fn rotated(self, angle: Angle) -> Self {
        if angle.is_zero() {
            return self;
        }
        let rad = angle.to_rad();
        let (sin, cos) = rad.sin_cos();
        let x = self.x.to_nm() as f64;
        let y = self.y.to_nm() as f64;
        Point::nm(
            (x * cos - y * sin).round() as i64,
            (x * sin + y * cos).round() as i64,
        )
    }

    /// Rotates the point counter-clockwise around `center`.
    pub fn rotated_around(self, center: Point, angle: Angle) -> Self {
        (self - center).rotated(angle) + center
    }
}

/// One vertex of a [`Path`](crate::Path).
///
/// `angle` is the arc bulge of the edge leaving this vertex towards the next
/// one: zero means a straight edge, a positive value a counter-clockwise
/// circular arc subtending that angle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Point,
    #[serde(default)]
    pub angle: Angle,
}

impl Vertex {
    /// A vertex starting a straight edge.
    pub const fn new(pos: Point) -> Self {
        Vertex {
            pos,
            angle: Angle::ZERO,
        }
    }

    /// A vertex starting an arc edge with the given bulge.
    pub const fn arc(pos: Point, angle: Angle) -> Self {
        Vertex { pos, angle }
    }
}
