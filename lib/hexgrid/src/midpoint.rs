use glam::DVec2;
use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

use crate::node::NodeId;

/// The centre of the edge between two linked nodes.
///
/// Built on demand by `GameMap::midpoint`, never stored in the grid. Its
/// neighbors are the two nodes it joins plus up to two nodes linked to both
/// of them, nearest first, so a line can enter or leave the edge through a
/// real cell.
///
/// The position is the plain mean of the two node centres and does not
/// account for wrapping, so a midpoint across a wrap seam lands mid-map.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NodeMidpoint {
    a: NodeId,
    b: NodeId,
    position: DVec2,
    neighbors: ArrayVec<[NodeId; 4]>,
}

impl NodeMidpoint {
    pub(crate) fn new(a: NodeId, b: NodeId, position: DVec2, bridges: ArrayVec<[NodeId; 2]>) -> Self {
        let mut neighbors = ArrayVec::new();
        neighbors.push(a);
        neighbors.push(b);
        neighbors.extend(bridges);
        Self { a, b, position, neighbors }
    }

    pub fn a(&self) -> NodeId { self.a }
    pub fn b(&self) -> NodeId { self.b }
    pub fn x(&self) -> f64 { self.position.x }
    pub fn y(&self) -> f64 { self.position.y }
    pub fn position(&self) -> DVec2 { self.position }

    /// `a`, `b`, then the bridging nodes.
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    pub fn bridges(&self) -> &[NodeId] {
        &self.neighbors[2..]
    }

    pub fn joins(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }
}

/// Midpoints are the same edge regardless of which end came first.
impl PartialEq for NodeMidpoint {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for NodeMidpoint {}
