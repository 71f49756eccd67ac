//! Board snapshot model and the plane fragments builder.
//!
//! The model is a plain read-mostly data structure: polygons, planes,
//! devices with their footprint holes and pads, and net segments with vias
//! and net lines. The one interesting mutation is
//! [`Board::rebuild_planes`], which recomputes every plane's copper
//! fragments through [`BoardPlaneFragmentsBuilder`].

pub mod board;
pub mod device;
pub mod net_segment;
pub mod plane;
pub mod plane_fragments_builder;

pub use board::{Board, BoardFileError, BoardPolygon};
pub use device::{Device, FootprintPad, Hole, PadShape};
pub use net_segment::{NetLine, NetSegment, Via, ViaShape};
pub use plane::Plane;
pub use plane_fragments_builder::BoardPlaneFragmentsBuilder;
