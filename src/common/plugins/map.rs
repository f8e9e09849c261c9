// common/plugins/map.rs:
// MapPlugin owns the session's hex map
// - builds the WorldMap resource from MapConfig at startup
// - announces readiness once, a short delay after construction, by inserting MapReady

use bevy::prelude::*;
use hexgrid::GameMap;

use crate::common::resources::map::*;

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapConfig>()
            .add_systems(Startup, setup)
            .add_systems(Update, announce.run_if(not(resource_exists::<MapReady>)));
    }
}

pub fn setup(mut commands: Commands, config: Res<MapConfig>) {
    let map = GameMap::new(config.width, config.height, config.options());
    log::info!("built {}x{} map (wrap x: {}, y: {})", map.width(), map.height(), map.wrap_x(), map.wrap_y());
    commands.insert_resource(WorldMap(map));
    commands.insert_resource(ReadyTimer(Timer::new(config.ready_delay(), TimerMode::Once)));
}

pub fn announce(
    mut commands: Commands,
    time: Res<Time>,
    timer: Option<ResMut<ReadyTimer>>,
) {
    let Some(mut timer) = timer else { return };
    if timer.tick(time.delta()).just_finished() {
        log::info!("map ready");
        commands.insert_resource(MapReady);
        commands.remove_resource::<ReadyTimer>();
    }
}
