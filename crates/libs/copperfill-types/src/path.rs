//! Vertex paths with optional circular-arc edges.
//!
//! A [`Path`] is the outline primitive of the board model: an ordered list
//! of [`Vertex`] entries, open or closed. An edge whose start vertex carries
//! a non-zero bulge angle is a circular arc; [`Path::flat_arc`] converts
//! such an edge into straight segments with a bounded deviation from the
//! true arc.

use delegate::delegate;
use serde::{Deserialize, Serialize};

use crate::point::{Point, Vertex};
use crate::units::{Angle, Length};

/// An ordered sequence of vertices, open or closed.
///
/// If closed, the last edge implicitly joins the last vertex back to the
/// first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    vertices: Vec<Vertex>,
    closed: bool,
}

impl Path {
    /// Creates a new, empty, open path.
    pub const fn new() -> Self {
        Path {
            vertices: Vec::new(),
            closed: false,
        }
    }

    /// Creates a path from raw parts.
    pub fn from_vertices(vertices: Vec<Vertex>, closed: bool) -> Self {
        Path { vertices, closed }
    }

    /// An open two-vertex straight line.
    pub fn line(from: Point, to: Point) -> Self {
        Path {
            vertices: vec![Vertex::new(from), Vertex::new(to)],
            closed: false,
        }
    }

    delegate! {
        to self.vertices {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn open(&mut self) {
        self.closed = false;
    }

    /// Reverses the traversal direction.
    ///
    /// Bulge angles move to the new start vertex of their edge and flip
    /// sign, so the reversed path describes the same point set.
    pub fn reverse(&mut self) {
        let n = self.vertices.len();
        if n < 2 {
            return;
        }
        let old = std::mem::take(&mut self.vertices);
        let edges = if self.closed { n } else { n - 1 };
        self.vertices = (0..n)
            .map(|i| {
                let pos = old[n - 1 - i].pos;
                // edge i of the reversed path retraces old edge (n - 2 - i)
                let angle = if i < edges {
                    -old[(2 * n - 2 - i) % n].angle
                } else {
                    Angle::ZERO
                };
                Vertex { pos, angle }
            })
            .collect();
    }

    pub fn translated(&self, by: Point) -> Self {
        Path {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex {
                    pos: v.pos + by,
                    angle: v.angle,
                })
                .collect(),
            closed: self.closed,
        }
    }

    /// Rotates all vertices counter-clockwise around the origin. Bulge
    /// angles are rotation invariant.
    pub fn rotated(&self, angle: Angle) -> Self {
        Path {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex {
                    pos: v.pos.rotated(angle),
                    angle: v.angle,
                })
                .collect(),
            closed: self.closed,
        }
    }

    /// A circle of the given diameter, centered at the origin, built from
    /// two 180° arc edges.
    pub fn circle(diameter: Length) -> Self {
        let r = diameter / 2;
        Path {
            vertices: vec![
                Vertex::arc(Point::new(r, Length::ZERO), Angle::deg(180.0)),
                Vertex::arc(Point::new(-r, Length::ZERO), Angle::deg(180.0)),
            ],
            closed: true,
        }
    }

    /// An axis-aligned rectangle centered at the origin, counter-clockwise.
    pub fn centered_rect(width: Length, height: Length) -> Self {
        let hw = width / 2;
        let hh = height / 2;
        Path {
            vertices: vec![
                Vertex::new(Point::new(-hw, -hh)),
                Vertex::new(Point::new(hw, -hh)),
                Vertex::new(Point::new(hw, hh)),
                Vertex::new(Point::new(-hw, hh)),
            ],
            closed: true,
        }
    }

    /// A stadium shape centered at the origin: a rectangle with semicircle
    /// caps on the two short sides.
    pub fn obround(width: Length, height: Length) -> Self {
        if width == height {
            return Path::circle(width);
        }
        let half_turn = Angle::deg(180.0);
        if width > height {
            let r = height / 2;
            let dx = (width - height) / 2;
            Path {
                vertices: vec![
                    Vertex::new(Point::new(-dx, -r)),
                    Vertex::arc(Point::new(dx, -r), half_turn),
                    Vertex::new(Point::new(dx, r)),
                    Vertex::arc(Point::new(-dx, r), half_turn),
                ],
                closed: true,
            }
        } else {
            let r = width / 2;
            let dy = (height - width) / 2;
            Path {
                vertices: vec![
                    Vertex::new(Point::new(r, -dy)),
                    Vertex::arc(Point::new(r, dy), half_turn),
                    Vertex::new(Point::new(-r, dy)),
                    Vertex::arc(Point::new(-r, -dy), half_turn),
                ],
                closed: true,
            }
        }
    }

    /// The outline of a straight trace segment: a stadium running from `p1`
    /// to `p2` with the given total width.
    pub fn obround_between(p1: Point, p2: Point, width: Length) -> Self {
        if p1 == p2 {
            return Path::circle(width).translated(p1);
        }
        let dx = (p2.x - p1.x).to_nm() as f64;
        let dy = (p2.y - p1.y).to_nm() as f64;
        let length = Length::nm(dx.hypot(dy).round() as i64);
        let mid = Point::nm(
            (p1.x.to_nm() + p2.x.to_nm()) / 2,
            (p1.y.to_nm() + p2.y.to_nm()) / 2,
        );
        Path::obround(length + width, width)
            .rotated(Angle::rad(dy.atan2(dx)))
            .translated(mid)
    }

    /// A regular-cornered octagon centered at the origin.
    pub fn octagon(width: Length, height: Length) -> Self {
        let hw = width / 2;
        let hh = height / 2;
        let cut = Length::nm(
            (width.min(height).to_nm() as f64 / 2.0 * (2.0 - std::f64::consts::SQRT_2)).round()
                as i64,
        );
        Path {
            vertices: vec![
                Vertex::new(Point::new(hw, -hh + cut)),
                Vertex::new(Point::new(hw, hh - cut)),
                Vertex::new(Point::new(hw - cut, hh)),
                Vertex::new(Point::new(-hw + cut, hh)),
                Vertex::new(Point::new(-hw, hh - cut)),
                Vertex::new(Point::new(-hw, -hh + cut)),
                Vertex::new(Point::new(-hw + cut, -hh)),
                Vertex::new(Point::new(hw - cut, -hh)),
            ],
            closed: true,
        }
    }

    /// Flattens the circular arc from `p1` to `p2` subtending `angle` into
    /// an open polyline.
    ///
    /// The segment count is chosen so that no point of the true arc lies
    /// farther than `tolerance` from the returned polyline. The start and
    /// end points are emitted exactly.
    pub fn flat_arc(p1: Point, p2: Point, angle: Angle, tolerance: Length) -> Self {
        if angle.is_zero() || p1 == p2 {
            return Path::line(p1, p2);
        }
        let x1 = p1.x.to_nm() as f64;
        let y1 = p1.y.to_nm() as f64;
        let x2 = p2.x.to_nm() as f64;
        let y2 = p2.y.to_nm() as f64;
        let dx = x2 - x1;
        let dy = y2 - y1;
        let chord = dx.hypot(dy);

        let sweep = angle.to_rad();
        let half = sweep / 2.0;
        // center = chord midpoint shifted along the left normal of p1->p2
        let shift = (chord / 2.0) / half.tan();
        let cx = (x1 + x2) / 2.0 - (dy / chord) * shift;
        let cy = (y1 + y2) / 2.0 + (dx / chord) * shift;
        let radius = ((chord / 2.0) / half.sin()).abs();

        let tol = tolerance.to_nm().max(1) as f64;
        let segments = if tol >= radius {
            1
        } else {
            ((sweep.abs() / (2.0 * (1.0 - tol / radius).acos())).ceil() as usize).max(1)
        };

        let start = (y1 - cy).atan2(x1 - cx);
        let mut path = Path::new();
        path.add_vertex(Vertex::new(p1));
        for i in 1..segments {
            let a = start + sweep * (i as f64) / (segments as f64);
            path.add_vertex(Vertex::new(Point::nm(
                (cx + radius * a.cos()).round() as i64,
                (cy + radius * a.sin()).round() as i64,
            )));
        }
        path.add_vertex(Vertex::new(p2));
        path
    }
}
