mod common;

use std::{
    error::Error,
    thread,
    time::{Duration, Instant},
};

use bevy::prelude::*;
use clap::{ArgAction, Parser, Subcommand};
use hexgrid::{decode_ground_tiles, encode_ground_tiles, GameMap, GroundTiles, HexPoint, LineWidth, NodeId};

use common::{
    plugins::map::MapPlugin,
    resources::map::*,
};

/// Builds a hex map and answers spatial queries against it
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 64)]
    width: u32,

    #[arg(long, default_value_t = 64)]
    height: u32,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    wrap_x: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    wrap_y: bool,

    /// Delay between construction and the ready notification
    #[arg(long, default_value_t = 100)]
    ready_delay_ms: u64,

    /// Mark a cell blocked before querying (repeatable)
    #[arg(long = "block", value_name = "X,Y", value_parser = parse_cell)]
    blocks: Vec<(i32, i32)>,

    /// Paint every cell with this ground texture id
    #[arg(long)]
    fill: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Greedy walk between two cells
    Path {
        #[arg(value_parser = parse_cell)]
        from: (i32, i32),
        #[arg(value_parser = parse_cell)]
        to: (i32, i32),
    },
    /// Cells crossed by a line between two cells
    Line {
        #[arg(value_parser = parse_cell)]
        from: (i32, i32),
        #[arg(value_parser = parse_cell)]
        to: (i32, i32),
        /// 0 centre only, 2 double, 3 brush
        #[arg(long, default_value_t = 0)]
        width: u8,
    },
    /// Nearest cell or midpoint to a world position
    Locate {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Print the ground texture encoding, optionally after applying one
    Tiles {
        #[arg(long)]
        decode: Option<String>,
    },
}

fn parse_cell(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok((x, y))
}

fn build_map(config: MapConfig) -> Result<GameMap, Box<dyn Error>> {
    let deadline = Instant::now() + config.ready_delay() + Duration::from_secs(5);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(MapPlugin);
    app.finish();
    app.cleanup();

    while !app.world().contains_resource::<MapReady>() {
        if Instant::now() > deadline {
            return Err("map never became ready".into());
        }
        app.update();
        thread::sleep(Duration::from_millis(5));
    }

    let WorldMap(map) = app.world_mut().remove_resource::<WorldMap>()
        .ok_or("map resource missing after ready")?;
    Ok(map)
}

fn cell(map: &GameMap, (x, y): (i32, i32)) -> Result<NodeId, Box<dyn Error>> {
    map.grid_node_at(x, y).ok_or_else(|| format!("no cell at {x},{y}").into())
}

fn describe(map: &GameMap, point: &HexPoint) -> String {
    match point {
        HexPoint::Node(id) => format!("{},{}", map[*id].xindex(), map[*id].yindex()),
        HexPoint::Midpoint(mid) => format!("mid {},{}|{},{} @ ({:.3}, {:.3})",
            map[mid.a()].xindex(), map[mid.a()].yindex(),
            map[mid.b()].xindex(), map[mid.b()].yindex(),
            mid.x(), mid.y()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = MapConfig {
        width: args.width,
        height: args.height,
        wrap_x: args.wrap_x,
        wrap_y: args.wrap_y,
        ready_delay_ms: args.ready_delay_ms,
    };
    let mut map = build_map(config)?;

    for &(x, y) in &args.blocks {
        let id = cell(&map, (x, y))?;
        map[id].blocked = true;
        log::debug!("blocked {x},{y}");
    }
    if let Some(texture) = args.fill {
        for y in 0..map.height() {
            for x in 0..map.width() {
                map.set_ground_texture_id(x, y, texture);
            }
        }
    }

    match args.command {
        Command::Path { from, to } => {
            match map.find_path(cell(&map, from)?, cell(&map, to)?) {
                Some(path) => {
                    for &step in &path {
                        println!("{}", describe(&map, &HexPoint::Node(step)));
                    }
                    if path.last() != Some(&cell(&map, to)?) {
                        log::warn!("walk stalled after {} steps", path.len());
                    }
                }
                None => println!("no path"),
            }
        }
        Command::Line { from, to, width } => {
            let line = map.hex_line(cell(&map, from)?, cell(&map, to)?, LineWidth::from(width));
            for point in &line {
                println!("{}", describe(&map, point));
            }
        }
        Command::Locate { x, y } => {
            match map.world_to_node_or_midpoint(x, y) {
                Some(point) => println!("{}", describe(&map, &point)),
                None => println!("nothing at ({x}, {y})"),
            }
        }
        Command::Tiles { decode } => {
            if let Some(tiles) = decode {
                let saved = GroundTiles { width: map.width(), height: map.height(), tiles };
                decode_ground_tiles(&mut map, &saved)?;
            }
            let saved = encode_ground_tiles(&map);
            println!("{}x{} {}", saved.width, saved.height, saved.tiles);
        }
    }

    Ok(())
}
