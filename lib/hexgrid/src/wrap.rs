// Wrap math for the torus. Every distance or direction computed anywhere on
// the map goes through `shortest_delta_*`; raw subtraction is wrong near a
// seam.

use glam::DVec2;

use crate::map::GameMap;

/// `value mod size` into `[0, size)`. A non-positive size leaves the value
/// alone.
pub fn normalize_index(value: i32, size: i32) -> i32 {
    if size <= 0 { return value }
    value.rem_euclid(size)
}

fn floor_mod(value: f64, size: f64) -> f64 {
    let wrapped = value.rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative inputs
    if wrapped >= size { 0. } else { wrapped }
}

fn shortest_delta(from: f64, to: f64, size: f64, wrap: bool) -> f64 {
    let raw = to - from;
    if !wrap || size <= 0. { return raw }
    let half = size / 2.;
    ((raw + half) % size + size) % size - half
}

impl GameMap {
    pub fn wrap_index_x(&self, value: i32) -> i32 {
        normalize_index(value, self.width)
    }

    pub fn wrap_index_y(&self, value: i32) -> i32 {
        normalize_index(value, self.height)
    }

    pub fn wrap_world_x(&self, value: f64) -> f64 {
        if !self.wrap_x || self.world_width <= 0. || !value.is_finite() { return value }
        floor_mod(value, self.world_width)
    }

    pub fn wrap_world_y(&self, value: f64) -> f64 {
        if !self.wrap_y || self.world_height <= 0. || !value.is_finite() { return value }
        floor_mod(value, self.world_height)
    }

    pub fn wrap_world_point(&self, point: DVec2) -> DVec2 {
        if !point.is_finite() { return point }
        DVec2::new(self.wrap_world_x(point.x), self.wrap_world_y(point.y))
    }

    /// Minimal signed displacement from `from_x` to `to_x`, the short way
    /// around when the axis wraps.
    pub fn shortest_delta_x(&self, from_x: f64, to_x: f64) -> f64 {
        shortest_delta(from_x, to_x, self.world_width, self.wrap_x)
    }

    pub fn shortest_delta_y(&self, from_y: f64, to_y: f64) -> f64 {
        shortest_delta(from_y, to_y, self.world_height, self.wrap_y)
    }

    pub fn shortest_delta(&self, from: DVec2, to: DVec2) -> DVec2 {
        DVec2::new(self.shortest_delta_x(from.x, to.x), self.shortest_delta_y(from.y, to.y))
    }

    pub fn distance_squared(&self, from: DVec2, to: DVec2) -> f64 {
        self.shortest_delta(from, to).length_squared()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::map::MapOptions;

    fn torus() -> GameMap {
        GameMap::new(10, 8, MapOptions { wrap_x: true, wrap_y: true })
    }

    fn flat() -> GameMap {
        GameMap::new(10, 8, MapOptions::default())
    }

    // ===== INDEX TESTS =====

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(-1, 4), 3);
        assert_eq!(normalize_index(4, 4), 0);
        assert_eq!(normalize_index(9, 4), 1);
        assert_eq!(normalize_index(-9, 4), 3);
    }

    #[test]
    fn test_normalize_index_degenerate_size() {
        assert_eq!(normalize_index(-3, 0), -3);
        assert_eq!(normalize_index(7, -2), 7);
    }

    #[test]
    fn test_wrap_index_uses_map_size() {
        let map = torus();
        assert_eq!(map.wrap_index_x(-1), 9);
        assert_eq!(map.wrap_index_y(-1), 7);
    }

    // ===== WORLD WRAP TESTS =====

    #[test]
    fn test_wrap_world_disabled_passes_through() {
        let map = flat();
        assert_eq!(map.wrap_world_x(-3.), -3.);
        assert_eq!(map.wrap_world_y(100.), 100.);
    }

    #[test]
    fn test_wrap_world_non_finite_passes_through() {
        let map = torus();
        assert!(map.wrap_world_x(f64::NAN).is_nan());
        assert_eq!(map.wrap_world_y(f64::INFINITY), f64::INFINITY);
        let point = DVec2::new(f64::NAN, 1.);
        assert!(map.wrap_world_point(point).x.is_nan());
        assert_eq!(map.wrap_world_point(point).y, 1., "Non-finite point passes through whole");
    }

    #[test]
    fn test_wrap_world_tiny_negative() {
        let map = torus();
        let wrapped = map.wrap_world_x(-1e-17);
        assert!(wrapped >= 0. && wrapped < map.world_width());
    }

    #[test]
    fn test_wrap_world_is_idempotent() {
        let map = torus();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x: f64 = rng.random_range(-100.0..100.0);
            let once = map.wrap_world_x(x);
            assert!(once >= 0. && once < map.world_width(), "{x} wrapped to {once}");
            assert_eq!(map.wrap_world_x(once), once, "Wrapping {x} twice should not move it");

            let y: f64 = rng.random_range(-100.0..100.0);
            let once = map.wrap_world_y(y);
            assert!(once >= 0. && once < map.world_height());
            assert_eq!(map.wrap_world_y(once), once);
        }
    }

    // ===== SHORTEST DELTA TESTS =====

    #[test]
    fn test_shortest_delta_unwrapped_is_plain_difference() {
        let map = flat();
        assert_eq!(map.shortest_delta_x(1., 8.), 7.);
        assert_eq!(map.shortest_delta_y(7., 0.5), -6.5);
    }

    #[test]
    fn test_shortest_delta_goes_the_short_way() {
        let map = torus();
        // world width 8.66: 0.5 -> 8.0 is 7.5 the long way, -1.16 the short way
        assert!((map.shortest_delta_x(0.5, 8.) + 1.16).abs() < 1e-9);
        assert!((map.shortest_delta_y(7.5, 0.5) - 1.).abs() < 1e-9);
    }

    #[test]
    fn test_shortest_delta_half_interval() {
        let map = torus();
        let half = map.world_height() / 2.;
        assert_eq!(map.shortest_delta_y(0., half), -half, "Exactly half way resolves to the negative side");
    }

    #[test]
    fn test_shortest_delta_symmetry_and_bound() {
        let map = torus();
        let mut rng = StdRng::seed_from_u64(11);
        let half = map.world_width() / 2.;
        for _ in 0..1000 {
            let a: f64 = rng.random_range(-50.0..50.0);
            let b: f64 = rng.random_range(-50.0..50.0);
            let ab = map.shortest_delta_x(a, b);
            let ba = map.shortest_delta_x(b, a);
            assert!(ab.abs() <= half + 1e-9, "|delta({a}, {b})| = {ab} exceeds half the world");
            if ab.abs() < half - 1e-9 {
                assert!((ab + ba).abs() < 1e-9, "delta({a}, {b}) = {ab} but delta({b}, {a}) = {ba}");
            }
        }
    }

    #[test]
    fn test_distance_squared_across_seam() {
        let map = torus();
        let a = DVec2::new(0.1, 0.1);
        let b = DVec2::new(map.world_width() - 0.1, map.world_height() - 0.1);
        assert!((map.distance_squared(a, b) - 0.08).abs() < 1e-9);
    }
}
