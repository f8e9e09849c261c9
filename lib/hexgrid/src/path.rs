// Greedy path walker.
//
// Not a shortest-path search. Each step scores every usable neighbor by how
// well a move in its direction lines up with the remaining (wrapped) vector
// to the destination, then commits to the best one with no backtracking. The
// walk stops early, returning what it has, when no neighbor is usable or
// when the best neighbor was already visited. Creature behaviours rely on
// exactly this getting-stuck behaviour, including the scan order (slot 0
// first, first minimum wins).

use std::collections::HashSet;

use crate::{
    direction::Direction,
    map::GameMap,
    node::NodeId,
};

impl GameMap {
    /// Walks from `start` toward `destination`.
    ///
    /// Returns the visited nodes after `start`, ending at `destination` on
    /// success. A partial path means the walk got stuck; `None` means not even
    /// one step could be taken.
    pub fn find_path(&self, start: NodeId, destination: NodeId) -> Option<Vec<NodeId>> {
        let target = self.node(destination)?.position();
        self.node(start)?;

        let mut visited = HashSet::from([start]);
        let mut path = Vec::new();
        let mut current = start;

        loop {
            let here = &self[current];
            let remaining = self.shortest_delta(here.position(), target);

            let mut best: Option<(NodeId, f64)> = None;
            for dir in Direction::all() {
                let Some(candidate) = here.neighbor(dir) else { continue };
                if here.is_edge_blocked(dir) { continue }
                if !self[candidate].is_passable() { continue }
                if dir.is_far() && self.far_move_clipped(current, dir) { continue }

                if candidate == destination {
                    path.push(candidate);
                    log::trace!("path {start:?} -> {destination:?} arrived in {} steps", path.len());
                    return Some(path);
                }

                let step = self.shortest_delta(here.position(), self[candidate].position()) * dir.distance_factor();
                let score = (remaining - step).length_squared();
                if best.is_none_or(|(_, s)| score < s) {
                    best = Some((candidate, score));
                }
            }

            let Some((next, _)) = best else {
                log::trace!("path {start:?} -> {destination:?} stuck at {current:?} after {} steps", path.len());
                break;
            };
            if !visited.insert(next) {
                log::trace!("path {start:?} -> {destination:?} looped back to {next:?} after {} steps", path.len());
                break;
            }
            path.push(next);
            current = next;
        }

        if path.is_empty() { None } else { Some(path) }
    }

    /// A far move squeezes between its two flanking cells; either one holding
    /// a blocking object closes the gap.
    fn far_move_clipped(&self, from: NodeId, dir: Direction) -> bool {
        let (left, right) = dir.flanks();
        [left, right].into_iter()
            .filter_map(|flank| self[from].neighbor(flank))
            .any(|flank| self[flank].has_blocking_object())
    }
}

#[cfg(test)]
mod tests {
    use pathfinding::prelude::bfs;

    use super::*;
    use crate::{
        map::MapOptions,
        node::{BlockerId, ObjectId, Occupant},
    };

    fn flat(width: u32, height: u32) -> GameMap {
        GameMap::new(width, height, MapOptions::default())
    }

    fn at(map: &GameMap, x: i32, y: i32) -> NodeId {
        map.node_at(x, y).expect("node in range")
    }

    /// Fewest 12-way moves between two cells, ignoring blocking.
    fn fewest_steps(map: &GameMap, from: NodeId, to: NodeId) -> usize {
        let route = bfs(&from, |&n| map[n].neighbors().iter().flatten().copied().collect::<Vec<_>>(), |&n| n == to)
            .expect("grid is connected");
        route.len() - 1
    }

    fn assert_adjacent_chain(map: &GameMap, start: NodeId, path: &[NodeId]) {
        let mut prev = start;
        for &step in path {
            assert!(map[prev].direction_to(step).is_some(), "{prev:?} -> {step:?} is not a single move");
            prev = step;
        }
    }

    // ===== SUCCESS TESTS =====

    #[test]
    fn test_path_reaches_destination() {
        let map = flat(10, 10);
        let (start, dest) = (at(&map, 0, 0), at(&map, 5, 5));
        let path = map.find_path(start, dest).expect("open grid should yield a path");
        assert_eq!(path.last(), Some(&dest));
        assert!(!path.contains(&start), "Start is not part of the path");
        assert_adjacent_chain(&map, start, &path);
    }

    #[test]
    fn test_path_exact_route() {
        let map = flat(10, 10);
        let path = map.find_path(at(&map, 0, 0), at(&map, 5, 5)).unwrap();
        let expected: Vec<NodeId> = [(1, 2), (2, 2), (3, 3), (4, 4), (5, 5)]
            .into_iter().map(|(x, y)| at(&map, x, y)).collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn test_path_to_neighbor_is_one_step() {
        let map = flat(10, 10);
        let (start, dest) = (at(&map, 4, 4), at(&map, 4, 5));
        assert_eq!(map.find_path(start, dest), Some(vec![dest]));
    }

    #[test]
    fn test_every_pair_reachable_on_open_grid() {
        for map in [flat(10, 10), GameMap::new(8, 8, MapOptions { wrap_x: true, wrap_y: true })] {
            let ids: Vec<NodeId> = map.nodes().map(|(id, _)| id).collect();
            for &start in &ids {
                for &dest in &ids {
                    if start == dest { continue }
                    let path = map.find_path(start, dest)
                        .unwrap_or_else(|| panic!("{start:?} -> {dest:?} made no progress"));
                    assert_eq!(path.last(), Some(&dest), "{start:?} -> {dest:?} stopped short");
                    assert!(path.len() <= 2 * fewest_steps(&map, start, dest) + 2,
                        "{start:?} -> {dest:?} took {} steps", path.len());
                }
            }
        }
    }

    #[test]
    fn test_path_uses_wrap() {
        let map = GameMap::new(8, 8, MapOptions { wrap_x: true, wrap_y: true });
        let (start, dest) = (at(&map, 0, 0), at(&map, 7, 7));
        assert_eq!(map.find_path(start, dest), Some(vec![dest]), "Far up-left across both seams is one step");
    }

    #[test]
    fn test_same_node_walks_a_round_trip() {
        // far slots score just under adjacent ones, so the walk leaves by
        // slot 0 and comes straight back
        let map = flat(10, 10);
        let n = at(&map, 4, 4);
        assert_eq!(map.find_path(n, n), Some(vec![at(&map, 2, 4), n]),
            "A walk to the start still takes steps before arriving");
    }

    #[test]
    fn test_same_node_boxed_in_is_none() {
        let mut map = flat(10, 10);
        let n = at(&map, 4, 4);
        for dir in Direction::all() {
            map[n].block_edge(dir, BlockerId(1));
        }
        assert_eq!(map.find_path(n, n), None);
    }

    // ===== BLOCKING TESTS =====

    #[test]
    fn test_fully_walled_start_is_none() {
        let mut map = flat(10, 10);
        let start = at(&map, 4, 4);
        for dir in Direction::all() {
            let n = map[start].neighbor(dir).unwrap();
            map[start].block_edge(dir, BlockerId(dir.index() as u64));
            map[n].blocked = true;
        }
        assert_eq!(map.find_path(start, at(&map, 0, 0)), None);
        assert_eq!(map.find_path(start, at(&map, 9, 9)), None);
    }

    #[test]
    fn test_edge_block_alone_stops_movement() {
        let mut map = flat(10, 10);
        let start = at(&map, 4, 4);
        for dir in Direction::all() {
            map[start].block_edge(dir, BlockerId(1));
        }
        assert_eq!(map.find_path(start, at(&map, 4, 5)), None);
    }

    #[test]
    fn test_blocked_destination_is_never_entered() {
        let mut map = flat(10, 10);
        let dest = at(&map, 4, 5);
        map[dest].blocked = true;
        let path = map.find_path(at(&map, 4, 2), dest);
        assert!(path.is_none_or(|p| !p.contains(&dest)));
    }

    #[test]
    fn test_routes_around_edge_wall() {
        let mut map = flat(10, 10);
        let start = at(&map, 4, 4);
        let dest = at(&map, 4, 5);
        map[start].block_edge(Direction::DOWN, BlockerId(9));
        let path = map.find_path(start, dest).expect("wall leaves other moves open");
        assert_ne!(path.first(), Some(&dest), "Blocked edge must not be crossed directly");
        assert_adjacent_chain(&map, start, &path);
    }

    #[test]
    fn test_blocking_object_closes_far_move() {
        let mut map = flat(10, 10);
        let start = at(&map, 4, 4);
        let far_right = map[start].neighbor(Direction::RIGHT).unwrap();
        assert_eq!(map.find_path(start, far_right), Some(vec![far_right]));

        let flank = map[start].neighbor(Direction::UP_RIGHT).unwrap();
        map[flank].add_object(Occupant::new(ObjectId(1)));
        let path = map.find_path(start, far_right).expect("still reachable the long way");
        assert!(path.len() > 1, "Far move past a blocking flank must not be taken");
        assert!(!path.contains(&flank));
    }

    #[test]
    fn test_passable_object_leaves_far_move_open() {
        let mut map = flat(10, 10);
        let start = at(&map, 4, 4);
        let far_right = map[start].neighbor(Direction::RIGHT).unwrap();
        let flank = map[start].neighbor(Direction::DOWN_RIGHT).unwrap();
        map[flank].add_object(Occupant::passable(ObjectId(1)));
        assert_eq!(map.find_path(start, far_right), Some(vec![far_right]));
    }

    #[test]
    fn test_flagged_flank_does_not_close_far_move() {
        // only blocking objects clip far moves; the blocked flag does not
        let mut map = flat(10, 10);
        let start = at(&map, 4, 4);
        let far_right = map[start].neighbor(Direction::RIGHT).unwrap();
        let flank = map[start].neighbor(Direction::UP_RIGHT).unwrap();
        map[flank].blocked = true;
        assert_eq!(map.find_path(start, far_right), Some(vec![far_right]));
    }

    #[test]
    fn test_dead_end_returns_partial_path() {
        // a wall of blocked cells across column 5 with no gap
        let mut map = flat(10, 10);
        for y in -1..10 {
            let id = at(&map, 5, y);
            map[id].blocked = true;
        }
        for y in 0..10 {
            let id = at(&map, 4, y);
            map[id].add_object(Occupant::new(ObjectId(y as u64)));
        }
        let start = at(&map, 2, 4);
        let dest = at(&map, 8, 4);
        let path = map.find_path(start, dest).expect("some progress before the wall");
        assert_ne!(path.last(), Some(&dest));
        assert!(path.iter().all(|&n| map[n].xindex() < 4), "Walk should stall before the wall");
    }
}
