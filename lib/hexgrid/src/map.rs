//! # GameMap: Toroidal Hex Grid
//!
//! Owns every `MapNode` of a `width × height` grid plus the off-grid ring at
//! index -1, links each node to its 12 neighbor slots, and answers spatial
//! queries against the node graph.
//!
//! ## Layout
//!
//! Cells are addressed by `(xindex, yindex)`. World positions follow
//!
//! ```text
//! x = xindex * 0.866
//! y = yindex + (0.5 if xindex is even)
//! ```
//!
//! so columns are staggered by half a row. Either axis may wrap, turning the
//! world into a torus; all distance and direction logic then goes through
//! the shortest-delta helpers in `wrap.rs`.
//!
//! Nodes live in one dense `Vec`, row-major over the padded index range, and
//! refer to each other by `NodeId`.
//!
//! ## Example
//!
//! ```rust
//! use hexgrid::{GameMap, MapOptions};
//!
//! let map = GameMap::new(4, 4, MapOptions { wrap_x: true, wrap_y: true });
//! let origin = map.world_to_node(0., 0.).unwrap();
//! assert_eq!((map[origin].xindex(), map[origin].yindex()), (0, 0));
//! ```

use std::ops::{Index, IndexMut};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

use crate::{
    direction::{hex_direction, round_half_up, Direction},
    line::HexPoint,
    midpoint::NodeMidpoint,
    node::{MapNode, NodeId},
};

/// Horizontal distance between column centres.
pub const HEX_WIDTH: f64 = 0.866;
/// Vertical distance between row centres.
pub const HEX_HEIGHT: f64 = 1.;

/// Largest accepted width or height; larger requests are clamped.
pub const MAX_DIMENSION: u32 = i16::MAX as u32;

/// 3×3 neighborhood searched by `world_to_node`, centre first so it wins ties.
const SEARCH_OFFSETS: [(i32, i32); 9] = [
    (0, 0),
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MapOptions {
    pub wrap_x: bool,
    pub wrap_y: bool,
}

#[derive(Clone, Debug)]
pub struct GameMap {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) wrap_x: bool,
    pub(crate) wrap_y: bool,
    pub(crate) world_width: f64,
    pub(crate) world_height: f64,
    nodes: Vec<MapNode>,
}

impl GameMap {
    pub fn new(width: u32, height: u32, options: MapOptions) -> Self {
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            log::warn!("map size {width}x{height} exceeds {MAX_DIMENSION}; clamping");
        }
        let width = width.min(MAX_DIMENSION) as i32;
        let height = height.min(MAX_DIMENSION) as i32;
        if options.wrap_x && width % 2 != 0 {
            log::warn!("map width {width} is odd; wrapping columns will not stitch cleanly");
        }

        let mut nodes = Vec::with_capacity((width as usize + 1) * (height as usize + 1));
        for yindex in -1..height {
            for xindex in -1..width {
                let mut node = MapNode::new(xindex, yindex);
                node.blocked = node.is_sentinel();
                nodes.push(node);
            }
        }

        let mut map = Self {
            width,
            height,
            wrap_x: options.wrap_x,
            wrap_y: options.wrap_y,
            world_width: width as f64 * HEX_WIDTH,
            world_height: height as f64 * HEX_HEIGHT,
            nodes,
        };
        map.set_neighbors();
        log::debug!("built {}x{} map ({} nodes, wrap {:?})", width, height, map.nodes.len(), options);
        map
    }

    /// Second construction pass: resolves every offset, wrapping on the axes
    /// that wrap, into a neighbor slot.
    fn set_neighbors(&mut self) {
        for i in 0..self.nodes.len() {
            let (x, y) = (self.nodes[i].xindex(), self.nodes[i].yindex());
            let mut slots = [None; Direction::COUNT];
            for dir in Direction::all() {
                let (dx, dy) = dir.offset(x);
                let (rx, ry) = (x + dx, y + dy);
                let nx = if self.wrap_x { self.wrap_index_x(rx) } else { rx };
                let ny = if self.wrap_y { self.wrap_index_y(ry) } else { ry };
                let Some(id) = self.node_at(nx, ny) else { continue };
                if (nx, ny) == (rx, ry) {
                    let delta = self.nodes[id.index()].position() - self.nodes[i].position();
                    debug_assert_eq!(hex_direction(delta.x, delta.y), dir,
                        "offset table disagrees with geometry at ({x}, {y})");
                }
                slots[dir.index()] = Some(id);
            }
            self.nodes[i].neighbors = slots;
        }
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }
    pub fn wrap_x(&self) -> bool { self.wrap_x }
    pub fn wrap_y(&self) -> bool { self.wrap_y }
    pub fn world_width(&self) -> f64 { self.world_width }
    pub fn world_height(&self) -> f64 { self.world_height }
    pub fn hex_width(&self) -> f64 { HEX_WIDTH }
    pub fn hex_height(&self) -> f64 { HEX_HEIGHT }

    // ===== LOOKUP =====

    pub fn node(&self, id: NodeId) -> Option<&MapNode> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MapNode> {
        self.nodes.get_mut(id.index())
    }

    /// Raw lookup over the padded range `-1..width` × `-1..height`.
    pub fn node_at(&self, xindex: i32, yindex: i32) -> Option<NodeId> {
        if xindex < -1 || xindex >= self.width || yindex < -1 || yindex >= self.height {
            return None;
        }
        Some(NodeId(((yindex + 1) * (self.width + 1) + xindex + 1) as u32))
    }

    /// Lookup that first wraps the index on every wrapping axis.
    pub fn wrapped_node_at(&self, xindex: i32, yindex: i32) -> Option<NodeId> {
        let x = if self.wrap_x { self.wrap_index_x(xindex) } else { xindex };
        let y = if self.wrap_y { self.wrap_index_y(yindex) } else { yindex };
        self.node_at(x, y)
    }

    /// Like `wrapped_node_at` but never returns a sentinel.
    pub fn grid_node_at(&self, xindex: i32, yindex: i32) -> Option<NodeId> {
        let id = self.wrapped_node_at(xindex, yindex)?;
        if self[id].is_sentinel() { None } else { Some(id) }
    }

    /// In-grid nodes, row by row.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MapNode)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter_map(move |(x, y)| self.node_at(x, y))
            .map(move |id| (id, &self[id]))
    }

    pub fn neighbor(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        self.node(id)?.neighbor(dir)
    }

    /// Midpoint of the edge between two linked nodes.
    pub fn midpoint(&self, a: NodeId, b: NodeId) -> Option<NodeMidpoint> {
        self.node(a)?.direction_to(b)?;
        let position = (self[a].position() + self[b].position()) / 2.;

        let mut common: Vec<(f64, NodeId)> = Vec::new();
        for &slot in self[a].neighbors() {
            let Some(n) = slot else { continue };
            if n == a || n == b || common.iter().any(|&(_, c)| c == n) { continue }
            if !self[b].neighbors().contains(&Some(n)) { continue }
            common.push((self.distance_squared(position, self[n].position()), n));
        }
        common.sort_by(|l, r| l.0.total_cmp(&r.0).then(l.1.cmp(&r.1)));

        let mut bridges = ArrayVec::new();
        bridges.extend(common.into_iter().take(2).map(|(_, n)| n));
        Some(NodeMidpoint::new(a, b, position, bridges))
    }

    // ===== WORLD RESOLUTION =====

    /// In-grid node whose centre is nearest to a world point, after
    /// wrapping. Sentinels are never returned.
    pub fn world_to_node(&self, world_x: f64, world_y: f64) -> Option<NodeId> {
        if !world_x.is_finite() || !world_y.is_finite() { return None }
        let point = self.wrap_world_point(DVec2::new(world_x, world_y));

        let ax = round_half_up(point.x / HEX_WIDTH) as i32;
        let shift = if ax.rem_euclid(2) == 0 { 0.5 } else { 0. };
        let ay = round_half_up(point.y - shift) as i32;

        let mut best: Option<(NodeId, f64)> = None;
        for (ox, oy) in SEARCH_OFFSETS {
            let Some(id) = self.grid_node_at(ax + ox, ay + oy) else { continue };
            let dist = self.distance_squared(point, self[id].position());
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((id, dist));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Snaps a world point to the nearest node or to the midpoint of one of
    /// that node's adjacent edges, whichever is closer.
    pub fn world_to_node_or_midpoint(&self, world_x: f64, world_y: f64) -> Option<HexPoint> {
        let id = self.world_to_node(world_x, world_y)?;
        let point = self.wrap_world_point(DVec2::new(world_x, world_y));
        let node_dist = self.distance_squared(point, self[id].position());

        let mut seen: Vec<NodeMidpoint> = Vec::new();
        let mut best: Option<(NodeMidpoint, f64)> = None;
        for dir in Direction::adjacent() {
            let Some(n) = self[id].neighbor(dir) else { continue };
            if self[n].is_sentinel() { continue }
            let Some(mid) = self.midpoint(id, n) else { continue };
            if seen.contains(&mid) { continue }
            let dist = self.distance_squared(point, mid.position());
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((mid.clone(), dist));
            }
            seen.push(mid);
        }

        match best {
            Some((mid, dist)) if dist < node_dist => Some(HexPoint::Midpoint(mid)),
            _ => Some(HexPoint::Node(id)),
        }
    }

    // ===== GROUND TEXTURES =====

    pub fn ground_texture_id(&self, xindex: i32, yindex: i32) -> i32 {
        self.grid_node_at(xindex, yindex).map_or(0, |id| self[id].ground_texture_id)
    }

    pub fn set_ground_texture_id(&mut self, xindex: i32, yindex: i32, id: i32) -> bool {
        let Some(node) = self.grid_node_at(xindex, yindex) else { return false };
        self[node].ground_texture_id = id;
        true
    }
}

impl Index<NodeId> for GameMap {
    type Output = MapNode;
    fn index(&self, id: NodeId) -> &MapNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for GameMap {
    fn index_mut(&mut self, id: NodeId) -> &mut MapNode {
        &mut self.nodes[id.index()]
    }
}
