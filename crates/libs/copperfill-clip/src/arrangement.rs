//! Exact planar subdivision of the input polygon soup.
//!
//! Every boolean operation runs on the same substrate: all input edges are
//! split at their mutual intersections, merged into canonical edges that
//! carry per-side winding deltas, and assembled into a rotational system.
//! Faces are traced with the face-on-left rule and receive exact winding
//! number pairs (subject, clip) via one ray cast per connected component
//! plus breadth-first propagation across edges.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::collections::BTreeMap;

use crate::types::{CInt, IntPoint, PolyType};

/// Cross product of (a - o) and (b - o), exact.
pub(crate) fn cross3(o: IntPoint, a: IntPoint, b: IntPoint) -> i128 {
    (a.x - o.x) as i128 * (b.y - o.y) as i128 - (b.x - o.x) as i128 * (a.y - o.y) as i128
}

/// Rounded signed division, half away from zero.
fn round_div(n: i128, d: i128) -> i128 {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    if n >= 0 {
        (n + d / 2) / d
    } else {
        -((-n + d / 2) / d)
    }
}

/// Half-plane index of a direction: 0 for angles in [0°, 180°), 1 otherwise.
fn half(d: (i64, i64)) -> u8 {
    if d.1 > 0 || (d.1 == 0 && d.0 > 0) {
        0
    } else {
        1
    }
}

/// Exact counter-clockwise ordering of two directions from a common origin.
pub(crate) fn angle_cmp(d1: (i64, i64), d2: (i64, i64)) -> Ordering {
    half(d1).cmp(&half(d2)).then_with(|| {
        let cr = d1.0 as i128 * d2.1 as i128 - d2.0 as i128 * d1.1 as i128;
        if cr > 0 {
            Ordering::Less
        } else if cr < 0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// A canonical undirected edge. `u < v` lexicographically; `ds`/`dc` are the
/// net number of subject/clip traversals in the u→v direction.
pub(crate) struct Edge {
    pub u: u32,
    pub v: u32,
    pub ds: i64,
    pub dc: i64,
}

/// The planar subdivision. Half-edge `2e` runs u→v of edge `e`, half-edge
/// `2e + 1` runs v→u; the twin of `h` is `h ^ 1`. Each half-edge belongs to
/// the face on its left.
pub(crate) struct Arrangement {
    pub verts: Vec<IntPoint>,
    pub edges: Vec<Edge>,
    /// Outgoing half-edges per vertex, sorted counter-clockwise.
    pub rotation: Vec<Vec<u32>>,
    /// Face (loop) id per half-edge.
    pub loop_of: Vec<u32>,
    /// Half-edges of each loop, in traversal order.
    pub loop_halves: Vec<Vec<u32>>,
    /// Exact (subject, clip) winding number pair per loop.
    pub winding: Vec<(i64, i64)>,
    /// The loop bounding the unbounded face, if any edges exist.
    pub unbounded_loop: u32,
}

impl Arrangement {
    pub fn origin(&self, h: u32) -> u32 {
        let e = &self.edges[(h >> 1) as usize];
        if h & 1 == 0 {
            e.u
        } else {
            e.v
        }
    }

    pub fn dir(&self, h: u32) -> (i64, i64) {
        let o = self.verts[self.origin(h) as usize];
        let t = self.verts[self.origin(h ^ 1) as usize];
        (t.x - o.x, t.y - o.y)
    }
}

struct Seg {
    a: IntPoint,
    b: IntPoint,
    subject: bool,
    splits: Vec<IntPoint>,
}

/// Returns true when `p` lies strictly inside the segment a-b.
fn on_segment(p: IntPoint, a: IntPoint, b: IntPoint) -> bool {
    p != a
        && p != b
        && cross3(a, b, p) == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

fn collect_segments(inputs: &[(Vec<IntPoint>, PolyType)]) -> Vec<Seg> {
    let mut segs = Vec::new();
    for (path, side) in inputs {
        let mut pts = path.clone();
        pts.dedup();
        while pts.len() > 1 && pts.last() == pts.first() {
            pts.pop();
        }
        if pts.len() < 3 {
            continue;
        }
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            if a != b {
                segs.push(Seg {
                    a,
                    b,
                    subject: *side == PolyType::Subject,
                    splits: Vec::new(),
                });
            }
        }
    }
    segs
}

fn split_segments(segs: &mut [Seg]) {
    for i in 0..segs.len() {
        for j in (i + 1)..segs.len() {
            let (a, b) = (segs[i].a, segs[i].b);
            let (c, d) = (segs[j].a, segs[j].b);
            if a.x.max(b.x) < c.x.min(d.x)
                || c.x.max(d.x) < a.x.min(b.x)
                || a.y.max(b.y) < c.y.min(d.y)
                || c.y.max(d.y) < a.y.min(b.y)
            {
                continue;
            }
            let o1 = cross3(a, b, c);
            let o2 = cross3(a, b, d);
            let o3 = cross3(c, d, a);
            let o4 = cross3(c, d, b);
            if o1 != 0
                && o2 != 0
                && o3 != 0
                && o4 != 0
                && (o1 > 0) != (o2 > 0)
                && (o3 > 0) != (o4 > 0)
            {
                // proper crossing; the intersection is rounded once onto
                // the integer grid
                let den = o3 - o4;
                let px = a.x as i128 + round_div(o3 * (b.x - a.x) as i128, den);
                let py = a.y as i128 + round_div(o3 * (b.y - a.y) as i128, den);
                let p = IntPoint::new(px as CInt, py as CInt);
                if p != a && p != b {
                    segs[i].splits.push(p);
                }
                if p != c && p != d {
                    segs[j].splits.push(p);
                }
            } else {
                // endpoint touching or collinear overlap
                if on_segment(c, a, b) {
                    segs[i].splits.push(c);
                }
                if on_segment(d, a, b) {
                    segs[i].splits.push(d);
                }
                if on_segment(a, c, d) {
                    segs[j].splits.push(a);
                }
                if on_segment(b, c, d) {
                    segs[j].splits.push(b);
                }
            }
        }
    }
}

/// Builds the arrangement of all input contours.
pub(crate) fn build(inputs: &[(Vec<IntPoint>, PolyType)]) -> Arrangement {
    let mut segs = collect_segments(inputs);
    split_segments(&mut segs);

    // canonical edges with accumulated winding deltas
    let mut acc: BTreeMap<(IntPoint, IntPoint), (i64, i64)> = BTreeMap::new();
    for seg in &mut segs {
        let mut pts = Vec::with_capacity(seg.splits.len() + 2);
        pts.push(seg.a);
        pts.append(&mut seg.splits);
        pts.push(seg.b);
        let dx = (seg.b.x - seg.a.x) as i128;
        let dy = (seg.b.y - seg.a.y) as i128;
        pts.sort_by_key(|p| (p.x - seg.a.x) as i128 * dx + (p.y - seg.a.y) as i128 * dy);
        pts.dedup();
        for w in pts.windows(2) {
            let (p, q) = (w[0], w[1]);
            let (key, sign) = if p < q { ((p, q), 1) } else { ((q, p), -1) };
            let entry = acc.entry(key).or_insert((0, 0));
            if seg.subject {
                entry.0 += sign;
            } else {
                entry.1 += sign;
            }
        }
    }

    let mut vert_ids: BTreeMap<IntPoint, u32> = BTreeMap::new();
    let mut verts: Vec<IntPoint> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    for (&(p, q), &(ds, dc)) in &acc {
        if ds == 0 && dc == 0 {
            continue;
        }
        let mut vid = |pt: IntPoint, verts: &mut Vec<IntPoint>| -> u32 {
            *vert_ids.entry(pt).or_insert_with(|| {
                verts.push(pt);
                (verts.len() - 1) as u32
            })
        };
        let u = vid(p, &mut verts);
        let v = vid(q, &mut verts);
        edges.push(Edge { u, v, ds, dc });
    }

    // rotational system
    let mut rotation: Vec<Vec<u32>> = vec![Vec::new(); verts.len()];
    for (e, edge) in edges.iter().enumerate() {
        rotation[edge.u as usize].push((2 * e) as u32);
        rotation[edge.v as usize].push((2 * e + 1) as u32);
    }
    let mut arr = Arrangement {
        verts,
        edges,
        rotation,
        loop_of: Vec::new(),
        loop_halves: Vec::new(),
        winding: Vec::new(),
        unbounded_loop: 0,
    };
    for v in 0..arr.verts.len() {
        let mut list = std::mem::take(&mut arr.rotation[v]);
        list.sort_by(|&h1, &h2| angle_cmp(arr.dir(h1), arr.dir(h2)));
        arr.rotation[v] = list;
    }
    let mut rot_pos = vec![0u32; arr.edges.len() * 2];
    for list in &arr.rotation {
        for (idx, &h) in list.iter().enumerate() {
            rot_pos[h as usize] = idx as u32;
        }
    }

    // face tracing, face on the left of each half-edge
    let nh = arr.edges.len() * 2;
    arr.loop_of = vec![u32::MAX; nh];
    for h0 in 0..nh as u32 {
        if arr.loop_of[h0 as usize] != u32::MAX {
            continue;
        }
        let id = arr.loop_halves.len() as u32;
        let mut halves = Vec::new();
        let mut h = h0;
        loop {
            arr.loop_of[h as usize] = id;
            halves.push(h);
            let t = h ^ 1;
            let vtx = arr.origin(t) as usize;
            let list = &arr.rotation[vtx];
            let pos = rot_pos[t as usize] as usize;
            h = list[(pos + list.len() - 1) % list.len()];
            if h == h0 {
                break;
            }
        }
        arr.loop_halves.push(halves);
    }

    assign_windings(&mut arr);
    arr
}

/// Union-find with path halving.
fn find(uf: &mut [u32], mut x: u32) -> u32 {
    while uf[x as usize] != x {
        uf[x as usize] = uf[uf[x as usize] as usize];
        x = uf[x as usize];
    }
    x
}

fn assign_windings(arr: &mut Arrangement) {
    let nloops = arr.loop_halves.len();
    arr.winding = vec![(0, 0); nloops];
    if arr.edges.is_empty() {
        return;
    }

    // connected components over vertices
    let mut uf: Vec<u32> = (0..arr.verts.len() as u32).collect();
    for e in &arr.edges {
        let (ru, rv) = (find(&mut uf, e.u), find(&mut uf, e.v));
        if ru != rv {
            uf[ru as usize] = rv;
        }
    }

    // lowest vertex per component, by (y, x)
    let mut comp_min: BTreeMap<u32, u32> = BTreeMap::new();
    for v in 0..arr.verts.len() as u32 {
        let root = find(&mut uf, v);
        let entry = comp_min.entry(root).or_insert(v);
        let (pv, pe) = (arr.verts[v as usize], arr.verts[*entry as usize]);
        if (pv.y, pv.x) < (pe.y, pe.x) {
            *entry = v;
        }
    }

    let mut assigned = vec![false; nloops];
    let mut queue: VecDeque<u32> = VecDeque::new();
    for (&root, &vmin) in &comp_min {
        // the face below the component's lowest vertex is bounded by the
        // outgoing half-edge of largest angle (all edges here point up)
        let h0 = *arr.rotation[vmin as usize].last().expect("vertex without edges");
        let l0 = arr.loop_of[h0 as usize];
        let p = arr.verts[vmin as usize];

        // seed winding: cast a ray straight down, counting only edges of
        // other components (nothing of this component lies below vmin)
        let mut ws = 0i64;
        let mut wc = 0i64;
        for e in &arr.edges {
            if find(&mut uf, e.u) == root {
                continue;
            }
            let u = arr.verts[e.u as usize];
            let v = arr.verts[e.v as usize];
            // canonical edges are ordered by (x, y), so non-vertical edges
            // always run left to right
            if !(u.x <= p.x && p.x < v.x) {
                continue;
            }
            let den = (v.x - u.x) as i128;
            let num = (u.y - p.y) as i128 * den + (p.x - u.x) as i128 * (v.y - u.y) as i128;
            if num < 0 {
                ws += e.ds;
                wc += e.dc;
            }
        }
        if assigned[l0 as usize] {
            continue;
        }
        arr.winding[l0 as usize] = (ws, wc);
        assigned[l0 as usize] = true;
        queue.push_back(l0);

        // propagate across edges: crossing u→v from left to right subtracts
        // the edge's deltas
        while let Some(l) = queue.pop_front() {
            let (ws, wc) = arr.winding[l as usize];
            for idx in 0..arr.loop_halves[l as usize].len() {
                let h = arr.loop_halves[l as usize][idx];
                let e = &arr.edges[(h >> 1) as usize];
                let nb = arr.loop_of[(h ^ 1) as usize];
                if assigned[nb as usize] {
                    continue;
                }
                arr.winding[nb as usize] = if h & 1 == 0 {
                    (ws - e.ds, wc - e.dc)
                } else {
                    (ws + e.ds, wc + e.dc)
                };
                assigned[nb as usize] = true;
                queue.push_back(nb);
            }
        }
    }

    // the unbounded face is the one below the globally lowest vertex
    let mut global_min = 0u32;
    for v in 1..arr.verts.len() as u32 {
        let (pv, pm) = (arr.verts[v as usize], arr.verts[global_min as usize]);
        if (pv.y, pv.x) < (pm.y, pm.x) {
            global_min = v;
        }
    }
    let h = *arr.rotation[global_min as usize].last().expect("vertex without edges");
    arr.unbounded_loop = arr.loop_of[h as usize];
}
