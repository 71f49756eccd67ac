use serde::{Deserialize, Serialize};

use copperfill_types::{LayerName, Length, NetId, Path, Point};

/// Copper shape of a via's annular ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViaShape {
    Round,
    Square,
    Octagon,
}

/// A plated through-hole via. Vias span all copper layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub position: Point,
    pub shape: ViaShape,
    /// Outer diameter of the annular ring.
    pub size: Length,
    pub drill_diameter: Length,
}

impl Via {
    /// The via outline in board coordinates, grown by `clearance`.
    pub fn scene_outline(&self, clearance: Length) -> Path {
        let size = self.size + clearance * 2;
        let outline = match self.shape {
            ViaShape::Round => Path::circle(size),
            ViaShape::Square => Path::centered_rect(size, size),
            ViaShape::Octagon => Path::octagon(size, size),
        };
        outline.translated(self.position)
    }
}

/// A straight trace segment on one copper layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetLine {
    pub layer: LayerName,
    pub start: Point,
    pub end: Point,
    pub width: Length,
}

impl NetLine {
    /// The trace outline in board coordinates, grown by `clearance`.
    pub fn scene_outline(&self, clearance: Length) -> Path {
        Path::obround_between(self.start, self.end, self.width + clearance * 2)
    }
}

/// All vias and net lines belonging to one net signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetSegment {
    pub net: NetId,
    #[serde(default)]
    pub vias: Vec<Via>,
    #[serde(default)]
    pub net_lines: Vec<NetLine>,
}

impl NetSegment {
    pub fn vias(&self) -> &[Via] {
        &self.vias
    }

    pub fn net_lines(&self) -> &[NetLine] {
        &self.net_lines
    }
}
