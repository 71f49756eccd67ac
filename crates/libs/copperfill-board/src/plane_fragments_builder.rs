//! Computes the copper fragments of one plane.
//!
//! The builder is a pure function of the board snapshot: it reads the
//! target plane, the board outline, the cached fragments of rival planes,
//! and every device and net segment, and produces the plane's final copper
//! as a list of simple closed paths. Holes are encoded as zero-width
//! cut-ins so each fragment stays a single path, which is what fabrication
//! output needs.
//!
//! The pipeline is: seed the plane outline, clip to the eroded board
//! outline, subtract all obstacles (recording same-net contact areas on the
//! way), enforce the minimum width with a shrink/grow pass, flatten the
//! polygon tree into cut-in paths, and finally drop orphaned islands.

use log::{error, warn};

use copperfill_clip as clip;
use copperfill_clip::{
    CInt, ClipType, Clipper, ClipperOffset, IntPoint, JoinType, PolyFillType, PolyNode, PolyType,
};
use copperfill_types::{ConnectStyle, Length, Path, Point, Vertex};

use crate::board::Board;
use crate::device::{Device, FootprintPad};
use crate::net_segment::{NetSegment, Via};
use crate::plane::Plane;

/// Maximum deviation of flattened arcs and offset joins from the ideal
/// curve, in nanometres.
const ARC_TOLERANCE: Length = Length::nm(5000);

const OFFSET_MITER_LIMIT: f64 = 2.0;

/// Builds the fragments of a single plane from a board snapshot.
///
/// The builder itself holds nothing but two scratch path sets; calling
/// [`build_fragments`](Self::build_fragments) twice on an unchanged board
/// yields the same result.
pub struct BoardPlaneFragmentsBuilder<'a> {
    board: &'a Board,
    plane: &'a Plane,
    result: clip::Paths,
    connected_net_signal_areas: clip::Paths,
}

impl<'a> BoardPlaneFragmentsBuilder<'a> {
    pub fn new(board: &'a Board, plane: &'a Plane) -> Self {
        Self {
            board,
            plane,
            result: clip::Paths::new(),
            connected_net_signal_areas: clip::Paths::new(),
        }
    }

    /// Runs the whole pipeline and returns the plane's copper fragments.
    pub fn build_fragments(&mut self) -> Vec<Path> {
        self.result.clear();
        self.connected_net_signal_areas.clear();
        self.add_plane_outline();
        if !self.clip_to_board_outline() {
            return Vec::new();
        }
        self.subtract_other_objects();
        self.ensure_minimum_width();
        self.flatten_result();
        if !self.plane.keep_orphans {
            self.remove_orphans();
        }
        from_clip_paths(&self.result)
    }

    fn add_plane_outline(&mut self) {
        self.result.push(to_clip_path(&self.plane.outline));
    }

    /// Clips the working set to the board outline eroded by the minimum
    /// clearance. Returns false when no board area is left; the plane is
    /// unresolvable then and yields no copper.
    fn clip_to_board_outline(&mut self) -> bool {
        let mut board_area_clipper = Clipper::new();
        for polygon in self.board.polygons() {
            if polygon.layer.is_board_outlines() {
                board_area_clipper.add_path(&to_clip_path(&polygon.path), PolyType::Subject);
            }
        }
        let board_area = self.run(
            &board_area_clipper,
            ClipType::Xor,
            PolyFillType::EvenOdd,
            PolyFillType::EvenOdd,
        );
        let board_area = self.offset_paths(&board_area, -self.plane.min_clearance);
        if board_area.is_empty() {
            self.result.clear();
            return false;
        }
        let mut clipper = Clipper::new();
        clipper.add_paths(&self.result, PolyType::Subject);
        clipper.add_paths(&board_area, PolyType::Clip);
        self.result = self.run(
            &clipper,
            ClipType::Intersection,
            PolyFillType::NonZero,
            PolyFillType::NonZero,
        );
        true
    }

    /// Assembles every obstacle into one clip group and subtracts it in a
    /// single difference. Same-net contact outlines are recorded for the
    /// orphan pass while walking the board.
    fn subtract_other_objects(&mut self) {
        let mut clipper = Clipper::new();
        clipper.add_paths(&self.result, PolyType::Subject);

        // rival planes: same layer, different net, not yielding to us
        for other in self.board.planes() {
            if other.id == self.plane.id {
                continue;
            }
            if other < self.plane {
                continue; // lower fill order yields its area to us
            }
            if other.layer != self.plane.layer {
                continue;
            }
            if other.net == self.plane.net {
                continue;
            }
            let fragments: clip::Paths = other.fragments.iter().map(to_clip_path).collect();
            let mut expanded = self.offset_paths(&fragments, self.plane.min_clearance);
            // the clip group mixes these with clockwise outlines; keep the
            // winding sign uniform so overlapping obstacles accumulate
            clip::reverse_paths(&mut expanded);
            clipper.add_paths(&expanded, PolyType::Clip);
        }

        // holes and pads of all devices
        for device in self.board.devices() {
            for hole in device.holes() {
                let position = device.map_to_scene(hole.position);
                let diameter = hole.diameter + self.plane.min_clearance * 2;
                clipper.add_path(
                    &to_clip_path(&Path::circle(diameter).translated(position)),
                    PolyType::Clip,
                );
            }
            for pad in device.pads() {
                if !pad.is_on_layer(&self.plane.layer) {
                    continue;
                }
                if pad.net == Some(self.plane.net) {
                    self.connected_net_signal_areas
                        .push(to_clip_path(&pad.scene_outline(device, Length::ZERO)));
                }
                if let Some(cut_out) = self.create_pad_cut_out(device, pad) {
                    clipper.add_path(&cut_out, PolyType::Clip);
                }
            }
        }

        // vias and net lines of all net segments
        for segment in self.board.net_segments() {
            for via in segment.vias() {
                if segment.net == self.plane.net {
                    self.connected_net_signal_areas
                        .push(to_clip_path(&via.scene_outline(Length::ZERO)));
                }
                if let Some(cut_out) = self.create_via_cut_out(segment, via) {
                    clipper.add_path(&cut_out, PolyType::Clip);
                }
            }
            for net_line in segment.net_lines() {
                if net_line.layer != self.plane.layer {
                    continue;
                }
                if segment.net == self.plane.net {
                    self.connected_net_signal_areas
                        .push(to_clip_path(&net_line.scene_outline(Length::ZERO)));
                } else {
                    clipper.add_path(
                        &to_clip_path(&net_line.scene_outline(self.plane.min_clearance)),
                        PolyType::Clip,
                    );
                }
            }
        }

        self.result = self.run(
            &clipper,
            ClipType::Difference,
            PolyFillType::EvenOdd,
            PolyFillType::NonZero,
        );
    }

    /// Shrink then grow by half the minimum width; strands narrower than
    /// the minimum vanish in the first offset and do not come back.
    fn ensure_minimum_width(&mut self) {
        let half = self.plane.min_width / 2;
        let shrunk = self.offset_paths(&self.result, -half);
        self.result = self.offset_paths(&shrunk, half);
    }

    /// Resolves the working set into a polygon tree and re-emits it as
    /// simple paths with holes encoded as cut-ins.
    fn flatten_result(&mut self) {
        let mut clipper = Clipper::new();
        clipper.add_paths(&self.result, PolyType::Subject);
        let tree = match clipper.execute_tree(
            ClipType::Xor,
            PolyFillType::EvenOdd,
            PolyFillType::EvenOdd,
        ) {
            Ok(tree) => tree,
            Err(e) => {
                error!("plane {}: flattening failed: {e}", self.plane.id);
                return;
            }
        };
        self.result = flatten_tree(&tree.childs);
    }

    /// Drops every fragment that touches no recorded same-net contact area.
    fn remove_orphans(&mut self) {
        let areas = &self.connected_net_signal_areas;
        let plane_id = self.plane.id;
        self.result.retain(|path| {
            let mut clipper = Clipper::new();
            clipper.add_paths(areas, PolyType::Subject);
            clipper.add_path(path, PolyType::Clip);
            match clipper.execute(
                ClipType::Intersection,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            ) {
                Ok(intersections) => !intersections.is_empty(),
                Err(e) => {
                    error!("plane {plane_id}: orphan check failed: {e}");
                    true
                }
            }
        });
    }

    fn create_pad_cut_out(&self, device: &Device, pad: &FootprintPad) -> Option<clip::Path> {
        let different_net = pad.net != Some(self.plane.net);
        if (self.plane.connect_style == ConnectStyle::None) || different_net {
            Some(to_clip_path(
                &pad.scene_outline(device, self.plane.min_clearance),
            ))
        } else {
            None
        }
    }

    fn create_via_cut_out(&self, segment: &NetSegment, via: &Via) -> Option<clip::Path> {
        let different_net = segment.net != self.plane.net;
        if (self.plane.connect_style == ConnectStyle::None) || different_net {
            Some(to_clip_path(&via.scene_outline(self.plane.min_clearance)))
        } else {
            None
        }
    }

    fn run(
        &self,
        clipper: &Clipper,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> clip::Paths {
        match clipper.execute(clip_type, subj_fill, clip_fill) {
            Ok(paths) => paths,
            Err(e) => {
                error!("plane {}: clipping failed: {e}", self.plane.id);
                clip::Paths::new()
            }
        }
    }

    fn offset_paths(&self, paths: &clip::Paths, delta: Length) -> clip::Paths {
        let mut offset = ClipperOffset::new(OFFSET_MITER_LIMIT, ARC_TOLERANCE.to_nm() as f64);
        offset.add_paths(paths, JoinType::Round);
        match offset.execute(delta.to_nm() as f64) {
            Ok(paths) => paths,
            Err(e) => {
                error!("plane {}: offsetting failed: {e}", self.plane.id);
                clip::Paths::new()
            }
        }
    }
}

fn flatten_tree(nodes: &[PolyNode]) -> clip::Paths {
    let mut paths = clip::Paths::new();
    for outline in nodes {
        let mut holes = clip::Paths::new();
        for hole in &outline.childs {
            holes.push(hole.contour.clone());
            // islands inside this hole become fragments of their own
            paths.extend(flatten_tree(&hole.childs));
        }
        paths.push(convert_holes_to_cut_ins(&outline.contour, holes));
    }
    paths
}

/// Merges the holes of an outline into a single closed path by cutting a
/// zero-width corridor from each hole to the outline.
fn convert_holes_to_cut_ins(outline: &clip::Path, holes: clip::Paths) -> clip::Path {
    let mut path = outline.clone();
    for hole in prepare_holes(holes) {
        add_cut_in_to_path(&mut path, &hole);
    }
    path
}

fn prepare_holes(holes: clip::Paths) -> clip::Paths {
    let mut prepared = clip::Paths::new();
    for hole in holes {
        if hole.len() > 2 {
            prepared.push(rotate_cut_in_hole(hole));
        } else {
            warn!("detected invalid hole in plane, ignoring it");
        }
    }
    // sort by the y coordinate of the connection point so no two cut-ins
    // overlap in the resulting plane; the sort is stable, ties keep their
    // insertion order
    prepared.sort_by_key(|hole| hole[0].y);
    prepared
}

/// Rotates the hole so it starts at its connection vertex.
fn rotate_cut_in_hole(mut hole: clip::Path) -> clip::Path {
    if hole.len() > 1 && hole.last() == hole.first() {
        hole.pop();
    }
    let index = hole_connection_point_index(&hole);
    hole.rotate_left(index);
    hole
}

/// The first vertex of minimum y; the corridor starts here.
fn hole_connection_point_index(hole: &clip::Path) -> usize {
    let mut index = 0;
    for i in 1..hole.len() {
        if hole[i].y < hole[index].y {
            index = i;
        }
    }
    index
}

fn add_cut_in_to_path(outline: &mut clip::Path, hole: &clip::Path) {
    match insert_connection_point_to_path(outline, hole[0]) {
        Some(index) => {
            outline.splice(index..index, hole.iter().copied());
        }
        None => {
            error!("failed to calculate the connection point of a plane cut-in");
            error!("the plane may be invalid (including any fabrication output)");
        }
    }
}

/// Splices the corridor seam into the outline and returns the index where
/// the hole vertices belong, or None when no outline edge crosses the
/// seam's vertical line below the connection point.
fn insert_connection_point_to_path(path: &mut clip::Path, p: IntPoint) -> Option<usize> {
    let mut nearest_index: Option<usize> = None;
    let mut nearest_point = IntPoint::new(0, 0);
    for i in 0..path.len() {
        let a = path[i];
        let b = path[(i + 1) % path.len()];
        if let Some(y) = calc_intersection_pos(a, b, p.x) {
            if y <= p.y && (nearest_index.is_none() || p.y - y < p.y - nearest_point.y) {
                nearest_index = Some(i);
                nearest_point = IntPoint::new(p.x, y);
            }
        }
    }
    let i = nearest_index?;
    path.insert(i + 1, nearest_point);
    path.insert(i + 1, p);
    path.insert(i + 1, nearest_point);
    Some(i + 2)
}

/// Where the edge p1→p2 crosses the vertical line at `x`, if it does.
///
/// One comparison is strict and one non-strict so an edge ending exactly on
/// the line is counted on one side only; making both alike would double-cut
/// holes aligned to outline vertices.
fn calc_intersection_pos(p1: IntPoint, p2: IntPoint, x: CInt) -> Option<CInt> {
    if ((p1.x <= x) && (p2.x > x)) || ((p1.x >= x) && (p2.x < x)) {
        let y = p1.y as f64
            + ((x - p1.x) as f64 * (p2.y - p1.y) as f64 / (p2.x - p1.x) as f64);
        Some((y.round() as CInt).clamp(p1.y.min(p2.y), p1.y.max(p2.y)))
    } else {
        None
    }
}

////////////////////////////////////////////////////////////////////////////////
// Conversions between the board's vertex paths and clipping paths
////////////////////////////////////////////////////////////////////////////////

/// Converts a vertex path to a flat clipping path, flattening arc edges and
/// normalizing the orientation to clockwise.
pub(crate) fn to_clip_path(path: &Path) -> clip::Path {
    let mut p = clip::Path::new();
    let vertices = path.vertices();
    let n = vertices.len();
    if n == 0 {
        return p;
    }
    p.push(to_clip_point(vertices[0].pos));
    let edges = if path.is_closed() { n } else { n - 1 };
    for i in 0..edges {
        let from = vertices[i];
        let to = vertices[(i + 1) % n];
        if from.angle.is_zero() {
            p.push(to_clip_point(to.pos));
        } else {
            let arc = Path::flat_arc(from.pos, to.pos, from.angle, ARC_TOLERANCE);
            // the arc's first vertex duplicates the previous edge's end
            for vertex in &arc.vertices()[1..] {
                p.push(to_clip_point(vertex.pos));
            }
        }
    }
    while p.len() > 1 && p.last() == p.first() {
        p.pop();
    }
    // all paths handed to the clipping engine share clockwise orientation
    if clip::orientation(&p) {
        clip::reverse_path(&mut p);
    }
    p
}

fn from_clip_paths(paths: &clip::Paths) -> Vec<Path> {
    paths.iter().map(from_clip_path).collect()
}

fn from_clip_path(path: &clip::Path) -> Path {
    let mut p = Path::new();
    for point in path {
        p.add_vertex(Vertex::new(from_clip_point(*point)));
    }
    p.close();
    p
}

fn to_clip_point(point: Point) -> IntPoint {
    IntPoint::new(point.x.to_nm(), point.y.to_nm())
}

fn from_clip_point(point: IntPoint) -> Point {
    Point::nm(point.x, point.y)
}
