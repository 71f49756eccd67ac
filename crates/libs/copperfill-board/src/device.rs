use serde::{Deserialize, Serialize};

use copperfill_types::{Angle, LayerName, Length, NetId, Path, Point};

/// A drilled hole of a footprint, in footprint coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub position: Point,
    pub diameter: Length,
}

/// The copper shape of a pad, sized by width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadShape {
    /// Obround; a circle when width equals height.
    Round { width: Length, height: Length },
    Rect { width: Length, height: Length },
    Octagon { width: Length, height: Length },
}

impl PadShape {
    /// The pad outline around the pad origin, grown by `clearance` on every
    /// side.
    pub fn outline(&self, clearance: Length) -> Path {
        let grow = clearance * 2;
        match *self {
            PadShape::Round { width, height } => Path::obround(width + grow, height + grow),
            PadShape::Rect { width, height } => Path::centered_rect(width + grow, height + grow),
            PadShape::Octagon { width, height } => Path::octagon(width + grow, height + grow),
        }
    }
}

/// A pad of a footprint, in footprint coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintPad {
    pub position: Point,
    pub rotation: Angle,
    pub shape: PadShape,
    /// Copper layers the pad exists on.
    pub layers: Vec<LayerName>,
    /// The connected net signal; pads may be unconnected.
    pub net: Option<NetId>,
}

impl FootprintPad {
    pub fn is_on_layer(&self, layer: &LayerName) -> bool {
        self.layers.contains(layer)
    }

    /// The pad outline in board coordinates, grown by `clearance`.
    pub fn scene_outline(&self, device: &Device, clearance: Length) -> Path {
        self.shape
            .outline(clearance)
            .rotated(device.rotation + self.rotation)
            .translated(device.map_to_scene(self.position))
    }
}

/// A placed component instance: a footprint at a board position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub position: Point,
    pub rotation: Angle,
    #[serde(default)]
    pub holes: Vec<Hole>,
    #[serde(default)]
    pub pads: Vec<FootprintPad>,
}

impl Device {
    /// Maps a footprint-local point into board coordinates.
    pub fn map_to_scene(&self, point: Point) -> Point {
        point.rotated(self.rotation) + self.position
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn pads(&self) -> &[FootprintPad] {
        &self.pads
    }
}
