//! Boolean operations over closed integer paths.

use std::collections::BTreeMap;

use crate::arrangement::{self, angle_cmp, cross3, Arrangement};
use crate::error::{ClipError, Result};
use crate::poly::{PolyNode, PolyTree};
use crate::types::{signed_area_x2, ClipType, Path, Paths, PolyFillType, PolyType, HI_RANGE};

/// Two-input boolean clipping engine.
///
/// Add closed paths tagged as subject or clip, then execute one operation.
/// Subject and clip sides are classified with independent fill rules. Input
/// winding may be arbitrary as long as it is meaningful under the chosen
/// fill rule; output contours always carry the result region on their left,
/// so outer contours are counter-clockwise (positive) and holes clockwise.
#[derive(Debug, Default)]
pub struct Clipper {
    inputs: Vec<(Path, PolyType)>,
}

impl Clipper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one closed path.
    pub fn add_path(&mut self, path: &Path, poly_type: PolyType) {
        self.inputs.push((path.clone(), poly_type));
    }

    /// Adds a set of closed paths.
    pub fn add_paths(&mut self, paths: &Paths, poly_type: PolyType) {
        for path in paths {
            self.add_path(path, poly_type);
        }
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }

    /// Runs the operation and returns the result as a flat contour list.
    pub fn execute(
        &self,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Result<Paths> {
        let sol = self.solve(clip_type, subj_fill, clip_fill)?;
        Ok(sol
            .contours
            .into_iter()
            .map(|c| c.points)
            .filter(|p| !p.is_empty())
            .collect())
    }

    /// Runs the operation and returns the result as a polygon tree:
    /// root children are outer contours, their children holes, and hole
    /// children the outer contours of islands nested inside that hole.
    pub fn execute_tree(
        &self,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Result<PolyTree> {
        let sol = self.solve(clip_type, subj_fill, clip_fill)?;
        let mut tree = PolyTree::new();
        if sol.contours.is_empty() {
            return Ok(tree);
        }
        let arr = &sol.arr;

        // group faces into connected regions across non-border edges
        let nloops = arr.loop_halves.len();
        let mut uf: Vec<u32> = (0..nloops as u32).collect();
        fn find(uf: &mut [u32], mut x: u32) -> u32 {
            while uf[x as usize] != x {
                uf[x as usize] = uf[uf[x as usize] as usize];
                x = uf[x as usize];
            }
            x
        }
        for e in 0..arr.edges.len() {
            let h = (2 * e) as u32;
            if !sol.border_half[h as usize] && !sol.border_half[h as usize + 1] {
                let (a, b) = (
                    find(&mut uf, arr.loop_of[h as usize]),
                    find(&mut uf, arr.loop_of[h as usize + 1]),
                );
                if a != b {
                    uf[a as usize] = b;
                }
            }
        }
        let unbounded = find(&mut uf, arr.unbounded_loop);

        // regions of each contour: (left = the result region it bounds,
        // right = the excluded region beyond it)
        let regions: Vec<(u32, u32)> = sol
            .contours
            .iter()
            .map(|c| (find(&mut uf, c.left_loop), find(&mut uf, c.right_loop)))
            .collect();

        let mut holes_by_region: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        let mut outers_by_surround: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        let mut roots: Vec<usize> = Vec::new();
        for (ci, c) in sol.contours.iter().enumerate() {
            if c.points.is_empty() {
                continue;
            }
            if c.area2 >= 0 {
                if regions[ci].1 == unbounded {
                    roots.push(ci);
                } else {
                    outers_by_surround.entry(regions[ci].1).or_default().push(ci);
                }
            } else {
                holes_by_region.entry(regions[ci].0).or_default().push(ci);
            }
        }

        let mut used = vec![false; sol.contours.len()];
        for ci in roots {
            tree.childs.push(build_outer_node(
                ci,
                &sol.contours,
                &regions,
                &holes_by_region,
                &outers_by_surround,
                &mut used,
            ));
        }
        // fallback for contours a degenerate pinch left unattached
        for ci in 0..sol.contours.len() {
            if !used[ci] && !sol.contours[ci].points.is_empty() && sol.contours[ci].area2 >= 0 {
                tree.childs.push(build_outer_node(
                    ci,
                    &sol.contours,
                    &regions,
                    &holes_by_region,
                    &outers_by_surround,
                    &mut used,
                ));
            }
        }
        Ok(tree)
    }

    fn solve(
        &self,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Result<Solution> {
        for (path, _) in &self.inputs {
            for p in path {
                if p.x.abs() >= HI_RANGE || p.y.abs() >= HI_RANGE {
                    return Err(ClipError::CoordinateOutOfRange);
                }
            }
        }
        let arr = arrangement::build(&self.inputs);
        let nh = arr.edges.len() * 2;
        if nh == 0 {
            return Ok(Solution {
                arr,
                border_half: Vec::new(),
                contours: Vec::new(),
            });
        }

        let in_result: Vec<bool> = arr
            .winding
            .iter()
            .map(|&(ws, wc)| {
                let ins = subj_fill.filled(ws);
                let inc = clip_fill.filled(wc);
                match clip_type {
                    ClipType::Intersection => ins && inc,
                    ClipType::Union => ins || inc,
                    ClipType::Difference => ins && !inc,
                    ClipType::Xor => ins != inc,
                }
            })
            .collect();

        // a half-edge is a border when its left face is in the result and
        // its twin's is not
        let mut border_half = vec![false; nh];
        for e in 0..arr.edges.len() {
            let l = arr.loop_of[2 * e] as usize;
            let r = arr.loop_of[2 * e + 1] as usize;
            if in_result[l] != in_result[r] {
                border_half[if in_result[l] { 2 * e } else { 2 * e + 1 }] = true;
            }
        }

        // outgoing border half-edges per vertex, counter-clockwise
        let border_out: Vec<Vec<u32>> = arr
            .rotation
            .iter()
            .map(|list| {
                list.iter()
                    .copied()
                    .filter(|&h| border_half[h as usize])
                    .collect()
            })
            .collect();

        // stitch border half-edges into closed contours, result on the left
        let mut visited = vec![false; nh];
        let mut contours = Vec::new();
        for h0 in 0..nh as u32 {
            if !border_half[h0 as usize] || visited[h0 as usize] {
                continue;
            }
            let mut pts: Path = Vec::new();
            let mut h = h0;
            loop {
                visited[h as usize] = true;
                pts.push(arr.verts[arr.origin(h) as usize]);
                let t = h ^ 1;
                let vtx = arr.origin(t) as usize;
                let list = &border_out[vtx];
                let tdir = arr.dir(t);
                let mut k = 0;
                while k < list.len()
                    && angle_cmp(arr.dir(list[k]), tdir) == std::cmp::Ordering::Less
                {
                    k += 1;
                }
                h = list[(k + list.len() - 1) % list.len()];
                if h == h0 {
                    break;
                }
            }
            let cleaned = clean_contour(pts);
            contours.push(Contour {
                area2: signed_area_x2(&cleaned),
                points: cleaned,
                left_loop: arr.loop_of[h0 as usize],
                right_loop: arr.loop_of[(h0 ^ 1) as usize],
            });
        }

        Ok(Solution {
            arr,
            border_half,
            contours,
        })
    }
}

struct Contour {
    points: Path,
    area2: i128,
    left_loop: u32,
    right_loop: u32,
}

struct Solution {
    arr: Arrangement,
    border_half: Vec<bool>,
    contours: Vec<Contour>,
}

fn build_outer_node(
    ci: usize,
    contours: &[Contour],
    regions: &[(u32, u32)],
    holes_by_region: &BTreeMap<u32, Vec<usize>>,
    outers_by_surround: &BTreeMap<u32, Vec<usize>>,
    used: &mut Vec<bool>,
) -> PolyNode {
    used[ci] = true;
    let mut node = PolyNode {
        contour: contours[ci].points.clone(),
        childs: Vec::new(),
        is_hole: false,
    };
    if let Some(holes) = holes_by_region.get(&regions[ci].0) {
        for &hi in holes {
            if used[hi] {
                continue;
            }
            used[hi] = true;
            let mut hole = PolyNode {
                contour: contours[hi].points.clone(),
                childs: Vec::new(),
                is_hole: true,
            };
            if let Some(kids) = outers_by_surround.get(&regions[hi].1) {
                for &oi in kids {
                    if !used[oi] {
                        hole.childs.push(build_outer_node(
                            oi,
                            contours,
                            regions,
                            holes_by_region,
                            outers_by_surround,
                            used,
                        ));
                    }
                }
            }
            node.childs.push(hole);
        }
    }
    node
}

/// Removes duplicate and collinear vertices; contours collapsing below
/// three vertices become empty.
fn clean_contour(mut pts: Path) -> Path {
    let mut changed = true;
    while changed && pts.len() >= 3 {
        changed = false;
        let n = pts.len();
        let mut keep: Path = Vec::with_capacity(n);
        for i in 0..n {
            let prev = pts[(i + n - 1) % n];
            let cur = pts[i];
            let next = pts[(i + 1) % n];
            if cur == prev || cross3(prev, cur, next) == 0 {
                changed = true;
            } else {
                keep.push(cur);
            }
        }
        pts = keep;
    }
    if pts.len() < 3 {
        Vec::new()
    } else {
        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{area, orientation, IntPoint};

    fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> Path {
        vec![
            IntPoint::new(x0, y0),
            IntPoint::new(x1, y0),
            IntPoint::new(x1, y1),
            IntPoint::new(x0, y1),
        ]
    }

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(|p| area(p)).sum()
    }

    #[test]
    fn union_of_overlapping_squares() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(5, 5, 15, 15), PolyType::Clip);
        let result = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(signed_area_x2(&result[0]), 2 * 175);
        assert!(orientation(&result[0]));
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(5, 5, 15, 15), PolyType::Clip);
        let result = c
            .execute(
                ClipType::Intersection,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(signed_area_x2(&result[0]), 2 * 25);
        for p in &result[0] {
            assert!(p.x >= 5 && p.x <= 10 && p.y >= 5 && p.y <= 10);
        }
    }

    #[test]
    fn intersection_of_disjoint_squares_is_empty() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(20, 20, 30, 30), PolyType::Clip);
        let result = c
            .execute(
                ClipType::Intersection,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn difference_cuts_a_hole() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(2, 2, 8, 8), PolyType::Clip);
        let tree = c
            .execute_tree(
                ClipType::Difference,
                PolyFillType::EvenOdd,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(tree.childs.len(), 1);
        let outer = &tree.childs[0];
        assert!(!outer.is_hole);
        assert_eq!(signed_area_x2(&outer.contour), 2 * 100);
        assert_eq!(outer.childs.len(), 1);
        let hole = &outer.childs[0];
        assert!(hole.is_hole);
        assert_eq!(signed_area_x2(&hole.contour), -2 * 36);
    }

    #[test]
    fn difference_partial_overlap() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(5, 5, 15, 15), PolyType::Clip);
        let result = c
            .execute(
                ClipType::Difference,
                PolyFillType::EvenOdd,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(signed_area_x2(&result[0]), 2 * 75);
    }

    #[test]
    fn xor_of_nested_squares_is_a_ring() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(2, 2, 8, 8), PolyType::Subject);
        let tree = c
            .execute_tree(ClipType::Xor, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
            .unwrap();
        assert_eq!(tree.childs.len(), 1);
        assert_eq!(tree.childs[0].childs.len(), 1);
        assert!(tree.childs[0].childs[0].is_hole);
        // ring area = 100 - 36
        let flat = c
            .execute(ClipType::Xor, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
            .unwrap();
        assert_eq!(total_area(&flat), 64.0);
    }

    #[test]
    fn tree_nests_islands_inside_holes() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 20, 20), PolyType::Subject);
        c.add_path(&rect(5, 5, 15, 15), PolyType::Subject);
        c.add_path(&rect(8, 8, 12, 12), PolyType::Subject);
        let tree = c
            .execute_tree(ClipType::Xor, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
            .unwrap();
        assert_eq!(tree.total(), 3);
        let outer = &tree.childs[0];
        assert_eq!(signed_area_x2(&outer.contour), 2 * 400);
        let hole = &outer.childs[0];
        assert!(hole.is_hole);
        assert_eq!(hole.childs.len(), 1);
        let island = &hole.childs[0];
        assert!(!island.is_hole);
        assert_eq!(signed_area_x2(&island.contour), 2 * 16);
    }

    #[test]
    fn union_of_disjoint_squares_keeps_both() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(20, 0, 30, 10), PolyType::Subject);
        let result = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(total_area(&result), 200.0);
    }

    #[test]
    fn even_odd_subject_self_overlap() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(5, 5, 15, 15), PolyType::Subject);
        // even-odd: the doubly covered lens is excluded
        let eo = c
            .execute(ClipType::Union, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
            .unwrap();
        assert_eq!(total_area(&eo), 150.0);
        // non-zero: the whole union is filled
        let nz = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(total_area(&nz), 175.0);
    }

    #[test]
    fn clockwise_input_normalizes_under_nonzero() {
        let mut cw = rect(0, 0, 10, 10);
        cw.reverse();
        let mut c = Clipper::new();
        c.add_path(&cw, PolyType::Subject);
        let result = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(result.len(), 1);
        assert!(orientation(&result[0]));
        assert_eq!(signed_area_x2(&result[0]), 2 * 100);
    }

    #[test]
    fn shared_edge_union_merges() {
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, 10, 10), PolyType::Subject);
        c.add_path(&rect(10, 0, 20, 10), PolyType::Subject);
        let result = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(signed_area_x2(&result[0]), 2 * 200);
        // the shared edge disappears entirely
        assert_eq!(result[0].len(), 4);
    }

    #[test]
    fn coordinate_range_is_enforced() {
        let huge = HI_RANGE;
        let mut c = Clipper::new();
        c.add_path(&rect(0, 0, huge, huge), PolyType::Subject);
        assert_eq!(
            c.execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero),
            Err(ClipError::CoordinateOutOfRange)
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        let c = Clipper::new();
        let result = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert!(result.is_empty());
    }
}
