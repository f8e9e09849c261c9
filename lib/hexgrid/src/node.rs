use std::collections::{HashMap, HashSet};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Dense index of a node inside its `GameMap`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a game object owned elsewhere.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ObjectId(pub u64);

/// Handle of a wall segment sitting on the edge between two nodes.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct BlockerId(pub u64);

/// A game object indexed by a node.
///
/// `blocks_tile` follows the default-blocking rule: an object with no opinion
/// (`None`) blocks the tile, only `Some(false)` lets others through.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Occupant {
    pub id: ObjectId,
    pub blocks_tile: Option<bool>,
}

impl Occupant {
    pub fn new(id: ObjectId) -> Self {
        Self { id, blocks_tile: None }
    }

    pub fn passable(id: ObjectId) -> Self {
        Self { id, blocks_tile: Some(false) }
    }

    pub fn blocks(&self) -> bool {
        self.blocks_tile != Some(false)
    }
}

/// One cell of the grid.
#[derive(Clone, Debug)]
pub struct MapNode {
    xindex: i32,
    yindex: i32,
    position: DVec2,
    pub(crate) neighbors: [Option<NodeId>; Direction::COUNT],
    pub blocked_neighbors: HashMap<Direction, HashSet<BlockerId>>,
    objects: Vec<Occupant>,
    blocked_by_objects: usize,
    pub blocked: bool,
    pub ground_texture_id: i32,
}

impl MapNode {
    pub(crate) fn new(xindex: i32, yindex: i32) -> Self {
        Self {
            xindex,
            yindex,
            position: world_position(xindex, yindex),
            neighbors: [None; Direction::COUNT],
            blocked_neighbors: HashMap::new(),
            objects: Vec::new(),
            blocked_by_objects: 0,
            blocked: false,
            ground_texture_id: 0,
        }
    }

    pub fn xindex(&self) -> i32 { self.xindex }
    pub fn yindex(&self) -> i32 { self.yindex }
    pub fn x(&self) -> f64 { self.position.x }
    pub fn y(&self) -> f64 { self.position.y }
    pub fn position(&self) -> DVec2 { self.position }

    /// True for the off-grid ring at index -1.
    pub fn is_sentinel(&self) -> bool {
        self.xindex < 0 || self.yindex < 0
    }

    pub fn neighbor(&self, dir: Direction) -> Option<NodeId> {
        self.neighbors[dir.index()]
    }

    pub fn neighbors(&self) -> &[Option<NodeId>; Direction::COUNT] {
        &self.neighbors
    }

    /// First slot holding `other`.
    pub fn direction_to(&self, other: NodeId) -> Option<Direction> {
        Direction::all().find(|&dir| self.neighbor(dir) == Some(other))
    }

    // ===== OCCUPANCY =====

    pub fn objects(&self) -> &[Occupant] {
        &self.objects
    }

    pub fn add_object(&mut self, obj: Occupant) {
        self.objects.push(obj);
        self.recount_blocking_objects();
    }

    /// Removes the first occupant with this id. Returns whether one was found.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        let Some(idx) = self.objects.iter().position(|o| o.id == id) else { return false };
        self.objects.remove(idx);
        self.recount_blocking_objects();
        true
    }

    pub fn recount_blocking_objects(&mut self) {
        self.blocked_by_objects = self.objects.iter().filter(|o| o.blocks()).count();
    }

    pub fn blocked_by_objects(&self) -> usize {
        self.blocked_by_objects
    }

    pub fn has_objects(&self) -> bool {
        !self.objects.is_empty()
    }

    pub fn has_blocking_object(&self) -> bool {
        self.blocked_by_objects > 0
    }

    /// Neither flagged nor occupied by anything that blocks.
    pub fn is_passable(&self) -> bool {
        !self.blocked && !self.has_blocking_object()
    }

    // ===== EDGE BLOCKING =====

    pub fn block_edge(&mut self, dir: Direction, blocker: BlockerId) {
        self.blocked_neighbors.entry(dir).or_default().insert(blocker);
    }

    pub fn unblock_edge(&mut self, dir: Direction, blocker: BlockerId) -> bool {
        let Some(set) = self.blocked_neighbors.get_mut(&dir) else { return false };
        let removed = set.remove(&blocker);
        if set.is_empty() { self.blocked_neighbors.remove(&dir); }
        removed
    }

    pub fn is_edge_blocked(&self, dir: Direction) -> bool {
        self.blocked_neighbors.get(&dir).is_some_and(|set| !set.is_empty())
    }
}

/// World position of a grid index: columns 0.866 apart, even columns half a
/// row lower.
pub fn world_position(xindex: i32, yindex: i32) -> DVec2 {
    let shift = if xindex.rem_euclid(2) == 0 { 0.5 } else { 0. };
    DVec2::new(xindex as f64 * crate::map::HEX_WIDTH, yindex as f64 + shift)
}
