use std::time::Duration;

use bevy::prelude::*;
use hexgrid::{GameMap, MapOptions};
use serde::Deserialize;

/// The session's map. Derefs to `GameMap`, so systems call map operations
/// straight through `Res<WorldMap>`.
#[derive(Deref, DerefMut, Resource)]
pub struct WorldMap(pub GameMap);

#[derive(Clone, Debug, Deserialize, Resource)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub wrap_x: bool,
    pub wrap_y: bool,
    pub ready_delay_ms: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { width: 64, height: 64, wrap_x: true, wrap_y: true, ready_delay_ms: 100 }
    }
}

impl MapConfig {
    pub fn options(&self) -> MapOptions {
        MapOptions { wrap_x: self.wrap_x, wrap_y: self.wrap_y }
    }

    pub fn ready_delay(&self) -> Duration {
        Duration::from_millis(self.ready_delay_ms)
    }
}

/// Counts down from map construction to the ready notification.
#[derive(Deref, DerefMut, Resource)]
pub struct ReadyTimer(pub Timer);

/// Present once the map has been announced ready.
#[derive(Default, Resource)]
pub struct MapReady;
