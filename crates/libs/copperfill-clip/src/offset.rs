//! Polygon offsetting with square, round and miter joins.

use std::f64::consts::PI;

use crate::clipper::Clipper;
use crate::error::Result;
use crate::types::{orientation, CInt, ClipType, IntPoint, JoinType, Path, Paths, PolyFillType,
    PolyType};

const DEFAULT_ARC_TOLERANCE: f64 = 0.25;
const TOLERANCE: f64 = 1.0e-20;

/// Offsets closed polygons by a signed distance.
///
/// Positive deltas inflate, negative deltas erode. `JoinType::Round` keeps
/// every point of the ideal round join within `arc_tolerance` of the emitted
/// polyline. Input paths may use either global winding; the set is
/// normalized from the path holding the extreme vertex, so holes keep their
/// relative orientation and offset towards the correct side. The raw
/// per-path offsets are cleaned up with a positive-fill union, which also
/// removes contours that erosion collapsed entirely.
#[derive(Debug)]
pub struct ClipperOffset {
    polys: Vec<(Path, JoinType)>,
    miter_limit: f64,
    arc_tolerance: f64,
}

impl ClipperOffset {
    pub fn new(miter_limit: f64, arc_tolerance: f64) -> Self {
        Self {
            polys: Vec::new(),
            miter_limit: miter_limit.max(2.0),
            arc_tolerance,
        }
    }

    /// Adds one closed polygon to be offset.
    pub fn add_path(&mut self, path: &Path, join_type: JoinType) {
        let mut pts = path.clone();
        while pts.len() > 1 && pts.last() == pts.first() {
            pts.pop();
        }
        pts.dedup();
        if pts.len() < 3 {
            return;
        }
        self.polys.push((pts, join_type));
    }

    pub fn add_paths(&mut self, paths: &Paths, join_type: JoinType) {
        for path in paths {
            self.add_path(path, join_type);
        }
    }

    pub fn clear(&mut self) {
        self.polys.clear();
    }

    /// Offsets all added paths by `delta`.
    pub fn execute(&self, delta: f64) -> Result<Paths> {
        if self.polys.is_empty() {
            return Ok(Paths::new());
        }
        let mut src = self.polys.clone();
        self.fix_orientations(&mut src);

        let raw: Paths = if delta.abs() < TOLERANCE {
            src.iter().map(|(p, _)| p.clone()).collect()
        } else {
            src.iter()
                .map(|(p, jt)| self.offset_path(p, *jt, delta))
                .collect()
        };

        let mut clipper = Clipper::new();
        clipper.add_paths(&raw, PolyType::Subject);
        clipper.execute(ClipType::Union, PolyFillType::Positive, PolyFillType::Positive)
    }

    /// Makes the path holding the extreme vertex counter-clockwise,
    /// reversing the whole set together when needed.
    fn fix_orientations(&self, src: &mut [(Path, JoinType)]) {
        let mut kp = 0usize;
        let mut extreme = src[0].0[0];
        for (pi, (path, _)) in src.iter().enumerate() {
            for &pt in path {
                if pt.y > extreme.y || (pt.y == extreme.y && pt.x < extreme.x) {
                    extreme = pt;
                    kp = pi;
                }
            }
        }
        if !orientation(&src[kp].0) {
            for (path, _) in src.iter_mut() {
                path.reverse();
            }
        }
    }

    fn offset_path(&self, path: &Path, join_type: JoinType, delta: f64) -> Path {
        let cnt = path.len();
        let abs_delta = delta.abs();

        let miter_lim = if self.miter_limit > 2.0 {
            2.0 / (self.miter_limit * self.miter_limit)
        } else {
            0.5
        };
        let tol = if self.arc_tolerance <= 0.0 {
            DEFAULT_ARC_TOLERANCE
        } else {
            self.arc_tolerance.min(abs_delta * DEFAULT_ARC_TOLERANCE)
        };
        let mut steps = PI / (1.0 - tol / abs_delta).acos();
        if steps > abs_delta * PI {
            steps = abs_delta * PI;
        }
        let steps_per_rad = steps / (2.0 * PI);

        let normals: Vec<(f64, f64)> = (0..cnt)
            .map(|j| unit_normal(path[j], path[(j + 1) % cnt]))
            .collect();

        let mut dest = Path::new();
        let mut k = cnt - 1;
        for j in 0..cnt {
            offset_point(
                &mut dest,
                path[j],
                &normals,
                j,
                k,
                delta,
                join_type,
                miter_lim,
                steps_per_rad,
            );
            k = j;
        }
        dest
    }
}

/// Right-hand unit normal of the edge a→b.
fn unit_normal(a: IntPoint, b: IntPoint) -> (f64, f64) {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    if dx == 0.0 && dy == 0.0 {
        return (0.0, 0.0);
    }
    let f = 1.0 / dx.hypot(dy);
    (dy * f, -dx * f)
}

fn add_point(dest: &mut Path, x: f64, y: f64) {
    dest.push(IntPoint::new(x.round() as CInt, y.round() as CInt));
}

#[allow(clippy::too_many_arguments)]
fn offset_point(
    dest: &mut Path,
    p: IntPoint,
    normals: &[(f64, f64)],
    j: usize,
    k: usize,
    delta: f64,
    join_type: JoinType,
    miter_lim: f64,
    steps_per_rad: f64,
) {
    let nk = normals[k];
    let nj = normals[j];
    let mut sin_a = nk.0 * nj.1 - nj.0 * nk.1;
    let cos_a = nk.0 * nj.0 + nk.1 * nj.1;
    let px = p.x as f64;
    let py = p.y as f64;

    if (sin_a * delta).abs() < 1.0 {
        if cos_a > 0.0 {
            // nearly straight; one point is enough
            add_point(dest, px + nj.0 * delta, py + nj.1 * delta);
            return;
        }
    } else if sin_a > 1.0 {
        sin_a = 1.0;
    } else if sin_a < -1.0 {
        sin_a = -1.0;
    }

    if sin_a * delta < 0.0 {
        // reflex vertex: emit both edge ends plus the vertex itself; the
        // final union removes the resulting pocket
        add_point(dest, px + nk.0 * delta, py + nk.1 * delta);
        dest.push(p);
        add_point(dest, px + nj.0 * delta, py + nj.1 * delta);
    } else {
        match join_type {
            JoinType::Miter => {
                let r = 1.0 + cos_a;
                if r >= miter_lim {
                    let q = delta / r;
                    add_point(dest, px + (nk.0 + nj.0) * q, py + (nk.1 + nj.1) * q);
                } else {
                    do_square(dest, px, py, nk, nj, sin_a, cos_a, delta);
                }
            }
            JoinType::Square => do_square(dest, px, py, nk, nj, sin_a, cos_a, delta),
            JoinType::Round => do_round(dest, px, py, nk, nj, sin_a, cos_a, delta, steps_per_rad),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn do_square(
    dest: &mut Path,
    px: f64,
    py: f64,
    nk: (f64, f64),
    nj: (f64, f64),
    sin_a: f64,
    cos_a: f64,
    delta: f64,
) {
    let dx = (sin_a.atan2(cos_a) / 4.0).tan();
    add_point(
        dest,
        px + delta * (nk.0 - nk.1 * dx),
        py + delta * (nk.1 + nk.0 * dx),
    );
    add_point(
        dest,
        px + delta * (nj.0 + nj.1 * dx),
        py + delta * (nj.1 - nj.0 * dx),
    );
}

#[allow(clippy::too_many_arguments)]
fn do_round(
    dest: &mut Path,
    px: f64,
    py: f64,
    nk: (f64, f64),
    nj: (f64, f64),
    sin_a: f64,
    cos_a: f64,
    delta: f64,
    steps_per_rad: f64,
) {
    let a = sin_a.atan2(cos_a);
    let steps = ((steps_per_rad * a.abs()).round() as i64).max(1);
    let (sin_step, cos_step) = (a / steps as f64).sin_cos();
    let (mut x, mut y) = nk;
    for _ in 0..steps {
        add_point(dest, px + x * delta, py + y * delta);
        let x2 = x * cos_step - y * sin_step;
        y = x * sin_step + y * cos_step;
        x = x2;
    }
    add_point(dest, px + nj.0 * delta, py + nj.1 * delta);
}
