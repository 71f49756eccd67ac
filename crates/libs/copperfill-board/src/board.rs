use serde::{Deserialize, Serialize};
use thiserror::Error;

use copperfill_types::{ConnectStyle, ConnectStyleError, LayerName, Path, PlaneId};

use crate::device::Device;
use crate::net_segment::NetSegment;
use crate::plane::Plane;
use crate::plane_fragments_builder::BoardPlaneFragmentsBuilder;

/// Errors raised while loading a board snapshot.
#[derive(Debug, Error)]
pub enum BoardFileError {
    #[error("failed to parse board file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The thermal connect style round-trips through serialization but is
    /// rejected at load time.
    #[error("plane {plane} uses an unsupported connect style: {source}")]
    UnsupportedConnectStyle {
        plane: PlaneId,
        source: ConnectStyleError,
    },
}

/// A polygon drawn on the board, e.g. the physical outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPolygon {
    pub layer: LayerName,
    pub path: Path,
}

/// A complete snapshot of one board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub polygons: Vec<BoardPolygon>,
    #[serde(default)]
    pub planes: Vec<Plane>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub net_segments: Vec<NetSegment>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a board snapshot from JSON and validates it.
    pub fn from_json(text: &str) -> Result<Board, BoardFileError> {
        let board: Board = serde_json::from_str(text)?;
        board.validate()?;
        Ok(board)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), BoardFileError> {
        for plane in &self.planes {
            if plane.connect_style == ConnectStyle::Thermal {
                return Err(BoardFileError::UnsupportedConnectStyle {
                    plane: plane.id,
                    source: ConnectStyleError::ThermalNotSupported,
                });
            }
        }
        Ok(())
    }

    pub fn polygons(&self) -> &[BoardPolygon] {
        &self.polygons
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn net_segments(&self) -> &[NetSegment] {
        &self.net_segments
    }

    pub fn plane(&self, id: PlaneId) -> Option<&Plane> {
        self.planes.iter().find(|p| p.id == id)
    }

    pub fn plane_mut(&mut self, id: PlaneId) -> Option<&mut Plane> {
        self.planes.iter_mut().find(|p| p.id == id)
    }

    /// Rebuilds the fragments of every plane.
    ///
    /// Planes are processed from the greatest fill order key downwards, so
    /// when a lower-priority plane subtracts the cached fragments of its
    /// higher-priority rivals those caches are already up to date. The
    /// order is total (priority, then id), which makes the result
    /// independent of the order planes are stored in.
    pub fn rebuild_planes(&mut self) {
        let mut order: Vec<(i32, PlaneId)> =
            self.planes.iter().map(|p| (p.priority, p.id)).collect();
        order.sort();
        for &(_, id) in order.iter().rev() {
            let fragments = match self.plane(id) {
                Some(plane) => BoardPlaneFragmentsBuilder::new(self, plane).build_fragments(),
                None => continue,
            };
            if let Some(plane) = self.plane_mut(id) {
                plane.fragments = fragments;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copperfill_types::{Length, NetId, Point, Vertex};
    use uuid::Uuid;

    fn square_path(size: i64) -> Path {
        let mut path = Path::new();
        path.add_vertex(Vertex::new(Point::nm(0, 0)));
        path.add_vertex(Vertex::new(Point::nm(size, 0)));
        path.add_vertex(Vertex::new(Point::nm(size, size)));
        path.add_vertex(Vertex::new(Point::nm(0, size)));
        path.close();
        path
    }

    fn board_with_connect_style(style: ConnectStyle) -> Board {
        let mut board = Board::new();
        board.polygons.push(BoardPolygon {
            layer: LayerName::board_outlines(),
            path: square_path(1_000_000),
        });
        board.planes.push(Plane::new(
            PlaneId::from_uuid(Uuid::from_u128(7)),
            LayerName::new("top_copper"),
            NetId::from_uuid(Uuid::from_u128(1)),
            square_path(1_000_000),
            0,
            Length::nm(1000),
            Length::nm(1000),
            true,
            style,
        ));
        board
    }

    #[test]
    fn json_round_trip() {
        let board = board_with_connect_style(ConnectStyle::Solid);
        let json = board.to_json().unwrap();
        let back = Board::from_json(&json).unwrap();
        assert_eq!(back.planes.len(), 1);
        assert_eq!(back.planes[0].outline, board.planes[0].outline);
        assert_eq!(back.polygons, board.polygons);
    }

    #[test]
    fn thermal_plane_is_rejected_by_name() {
        let board = board_with_connect_style(ConnectStyle::Thermal);
        let json = board.to_json().unwrap();
        let err = Board::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported connect style"));
        match err {
            BoardFileError::UnsupportedConnectStyle { plane, .. } => {
                assert_eq!(plane, PlaneId::from_uuid(Uuid::from_u128(7)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
