use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use copperfill_types::{ConnectStyle, LayerName, Length, NetId, Path, PlaneId};

/// A copper plane: a priority-ranked filled region on one layer, assigned
/// to one net signal.
///
/// `fragments` is the output cache of the fragments builder; it is not part
/// of the serialized form and starts out empty after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plane {
    pub id: PlaneId,
    pub layer: LayerName,
    pub net: NetId,
    /// The user-drawn outline seeding the fill.
    pub outline: Path,
    /// Higher priorities win contested area against lower ones.
    pub priority: i32,
    /// Smallest copper strand allowed to survive.
    pub min_width: Length,
    /// Separation from foreign copper and from the board edge.
    pub min_clearance: Length,
    /// Keep copper islands that connect to nothing of this net.
    pub keep_orphans: bool,
    pub connect_style: ConnectStyle,
    #[serde(skip)]
    pub fragments: Vec<Path>,
}

impl Plane {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PlaneId,
        layer: LayerName,
        net: NetId,
        outline: Path,
        priority: i32,
        min_width: Length,
        min_clearance: Length,
        keep_orphans: bool,
        connect_style: ConnectStyle,
    ) -> Self {
        Plane {
            id,
            layer,
            net,
            outline,
            priority,
            min_width,
            min_clearance,
            keep_orphans,
            connect_style,
            fragments: Vec::new(),
        }
    }
}

// Ordering and equality follow the fill order key (priority, then id): a
// "smaller" plane yields its area to a "greater" one. Id collisions across
// planes are a host error.
impl PartialEq for Plane {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.id == other.id
    }
}

impl Eq for Plane {}

impl PartialOrd for Plane {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Plane {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copperfill_types::{Point, Vertex};
    use uuid::Uuid;

    fn plane(priority: i32, id: u128) -> Plane {
        let mut outline = Path::new();
        outline.add_vertex(Vertex::new(Point::nm(0, 0)));
        outline.add_vertex(Vertex::new(Point::nm(1000, 0)));
        outline.add_vertex(Vertex::new(Point::nm(1000, 1000)));
        outline.close();
        Plane::new(
            PlaneId::from_uuid(Uuid::from_u128(id)),
            LayerName::new("top_copper"),
            NetId::from_uuid(Uuid::from_u128(99)),
            outline,
            priority,
            Length::nm(200_000),
            Length::nm(500_000),
            false,
            ConnectStyle::Solid,
        )
    }

    #[test]
    fn planes_order_by_priority_then_id() {
        assert!(plane(0, 1) < plane(1, 1));
        assert!(plane(1, 1) < plane(1, 2));
        assert!(plane(2, 1) > plane(1, 2));
    }

    #[test]
    fn fragments_are_not_serialized() {
        let mut p = plane(0, 1);
        p.fragments.push(p.outline.clone());
        let json = serde_json::to_string(&p).unwrap();
        let back: Plane = serde_json::from_str(&json).unwrap();
        assert!(back.fragments.is_empty());
        assert_eq!(back.outline, p.outline);
    }
}
