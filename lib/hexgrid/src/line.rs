// Hex-line tracing between nodes, edge midpoints, or raw world points.
//
// The core walk repeatedly steps to the neighbor in the 12-way direction of
// the target, so lines follow far slots too and may skip the cells between.
// Wider lines are an overlay on top of the centre walk.

use derive_more::IntoIterator;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{
    direction::{hex_direction, Direction},
    map::GameMap,
    midpoint::NodeMidpoint,
    node::NodeId,
};

/// Endpoints closer than this (per axis, wrapped) are the same point.
const COINCIDENT_EPSILON: f64 = 1e-6;

/// A resolved element of a hex line.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HexPoint {
    Node(NodeId),
    Midpoint(NodeMidpoint),
}

impl HexPoint {
    pub fn position(&self, map: &GameMap) -> DVec2 {
        match self {
            HexPoint::Node(id) => map[*id].position(),
            HexPoint::Midpoint(mid) => mid.position(),
        }
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            HexPoint::Node(id) => Some(*id),
            HexPoint::Midpoint(_) => None,
        }
    }
}

/// Input to a line query; raw points are snapped with
/// `world_to_node_or_midpoint`.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    Node(NodeId),
    Midpoint(NodeMidpoint),
    Point(DVec2),
}

impl From<NodeId> for Endpoint {
    fn from(id: NodeId) -> Self { Endpoint::Node(id) }
}

impl From<NodeMidpoint> for Endpoint {
    fn from(mid: NodeMidpoint) -> Self { Endpoint::Midpoint(mid) }
}

impl From<DVec2> for Endpoint {
    fn from(point: DVec2) -> Self { Endpoint::Point(point) }
}

impl From<HexPoint> for Endpoint {
    fn from(point: HexPoint) -> Self {
        match point {
            HexPoint::Node(id) => Endpoint::Node(id),
            HexPoint::Midpoint(mid) => Endpoint::Midpoint(mid),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineWidth {
    /// The traced cells only.
    #[default]
    Center,
    /// Plus one cell to the side of travel.
    Double,
    /// Plus every adjacent cell of every traced cell.
    Brush,
}

impl From<u8> for LineWidth {
    fn from(width: u8) -> Self {
        match width {
            2 => LineWidth::Double,
            3 => LineWidth::Brush,
            _ => LineWidth::Center,
        }
    }
}

/// Ordered, duplicate-free collection of line elements.
#[derive(Clone, Debug, Default, IntoIterator)]
pub struct HexLine {
    #[into_iterator(owned, ref)]
    points: Vec<HexPoint>,
}

impl HexLine {
    pub fn insert(&mut self, point: HexPoint) -> bool {
        if self.points.contains(&point) { return false }
        self.points.push(point);
        true
    }

    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn contains(&self, point: &HexPoint) -> bool {
        self.points.contains(point)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.points.iter().any(|p| p.node() == Some(id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HexPoint> {
        self.points.iter()
    }

    /// Real nodes in line order, midpoints skipped.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.points.iter().filter_map(HexPoint::node)
    }

    pub fn first(&self) -> Option<&HexPoint> { self.points.first() }
    pub fn last(&self) -> Option<&HexPoint> { self.points.last() }
}

impl GameMap {
    /// 12-way direction of a world-space vector.
    pub fn hex_direction(&self, dx: f64, dy: f64) -> Direction {
        hex_direction(dx, dy)
    }

    pub fn resolve_endpoint(&self, endpoint: Endpoint) -> Option<HexPoint> {
        match endpoint {
            Endpoint::Node(id) => self.node(id).map(|_| HexPoint::Node(id)),
            Endpoint::Midpoint(mid) => {
                // must describe a real edge of this map, bridges included
                self.node(mid.a())?.direction_to(mid.b())?;
                if mid.neighbors().iter().any(|&n| self.node(n).is_none()) { return None }
                Some(HexPoint::Midpoint(mid))
            }
            Endpoint::Point(p) => self.world_to_node_or_midpoint(p.x, p.y),
        }
    }

    /// Cells along the way from `a` to `b`, widened per `width`. Empty when
    /// either endpoint cannot be resolved.
    pub fn hex_line(&self, a: impl Into<Endpoint>, b: impl Into<Endpoint>, width: LineWidth) -> HexLine {
        let Some((mut line, from, to)) = self.trace(a.into(), b.into()) else { return HexLine::default() };

        let centre: Vec<NodeId> = line.nodes().collect();
        match width {
            LineWidth::Center => {}
            LineWidth::Double => {
                let delta = self.shortest_delta(from, to);
                let travel = hex_direction(delta.x, delta.y);
                let side = if travel.is_far() { travel.rotate(3) } else { travel.rotate(2) };
                for id in centre {
                    if let Some(n) = self[id].neighbor(side) { line.insert(HexPoint::Node(n)); }
                }
            }
            LineWidth::Brush => {
                for id in centre {
                    for dir in Direction::adjacent() {
                        if let Some(n) = self[id].neighbor(dir) { line.insert(HexPoint::Node(n)); }
                    }
                }
            }
        }
        line
    }

    /// The centre line only.
    pub fn single_hex_line(&self, a: impl Into<Endpoint>, b: impl Into<Endpoint>) -> HexLine {
        self.trace(a.into(), b.into()).map(|(line, _, _)| line).unwrap_or_default()
    }

    fn trace(&self, a: Endpoint, b: Endpoint) -> Option<(HexLine, DVec2, DVec2)> {
        let a = self.resolve_endpoint(a)?;
        let b = self.resolve_endpoint(b)?;
        let (from, to) = (a.position(self), b.position(self));

        let mut line = HexLine::default();
        let delta = self.shortest_delta(from, to);
        if delta.x.abs() < COINCIDENT_EPSILON && delta.y.abs() < COINCIDENT_EPSILON {
            line.insert(a);
            return Some((line, from, to));
        }

        // midpoints hand over to whichever of their cells faces the other end
        let start = match &a {
            HexPoint::Node(id) => *id,
            HexPoint::Midpoint(mid) => self.nearest_of(mid.neighbors(), to)?,
        };
        let end = match &b {
            HexPoint::Node(id) => *id,
            HexPoint::Midpoint(mid) => self.nearest_of(mid.neighbors(), from)?,
        };

        if let HexPoint::Midpoint(_) = a { line.insert(a); }
        for id in self.hex_line_nodes(start, end) {
            line.insert(HexPoint::Node(id));
        }
        if let HexPoint::Midpoint(_) = b { line.insert(b); }
        Some((line, from, to))
    }

    fn nearest_of(&self, candidates: &[NodeId], point: DVec2) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for &id in candidates {
            let dist = self.distance_squared(self[id].position(), point);
            if best.is_none_or(|(_, d)| dist < d) { best = Some((id, dist)); }
        }
        best.map(|(id, _)| id)
    }

    /// Node-to-node walk, inclusive of both ends when the end is reached.
    /// Bounded by `2 * (width + height)` steps.
    fn hex_line_nodes(&self, start: NodeId, end: NodeId) -> Vec<NodeId> {
        let target = self[end].position();
        let budget = ((self.width + self.height) * 2).max(0) as usize;

        let mut nodes = vec![start];
        let mut current = start;
        for _ in 0..budget {
            if current == end { break }
            let delta = self.shortest_delta(self[current].position(), target);
            let Some(next) = self[current].neighbor(hex_direction(delta.x, delta.y)) else { break };
            current = next;
            nodes.push(current);
        }
        if current != end {
            log::debug!("hex line {start:?} -> {end:?} stopped at {current:?}");
        }
        nodes
    }
}
