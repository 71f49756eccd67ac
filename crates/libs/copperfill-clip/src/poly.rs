use crate::types::Path;

/// One contour of a clipping result, with its nested children.
///
/// Children of a non-hole node are its holes; children of a hole node are
/// the outer contours of islands lying inside that hole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolyNode {
    /// The node's contour.
    pub contour: Path,
    /// Child nodes, alternating hole / non-hole with each level.
    pub childs: Vec<PolyNode>,
    /// Whether this contour is a hole of its parent.
    pub is_hole: bool,
}

impl PolyNode {
    pub fn child_count(&self) -> usize {
        self.childs.len()
    }

    pub fn contour(&self) -> &Path {
        &self.contour
    }
}

/// Hierarchical result of a clipping operation.
///
/// The root's children are the outermost (non-hole) contours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolyTree {
    pub childs: Vec<PolyNode>,
}

impl PolyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of nodes in the tree.
    pub fn total(&self) -> usize {
        fn count(nodes: &[PolyNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.childs)).sum()
        }
        count(&self.childs)
    }
}
