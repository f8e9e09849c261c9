use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::GameMap;

const RADIX: u32 = 36;

/// Persisted ground-texture layout: one base-36 digit per cell, row-major by
/// y then x.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GroundTiles {
    pub width: i32,
    pub height: i32,
    pub tiles: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum GroundTilesError {
    #[error("saved tiles are {saved_width}x{saved_height} but the map is {width}x{height}")]
    SizeMismatch { saved_width: i32, saved_height: i32, width: i32, height: i32 },
    #[error("expected {expected} tile digits, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("invalid tile digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },
}

pub fn encode_ground_tiles(map: &GameMap) -> GroundTiles {
    let tiles = map.nodes()
        .map(|(_, node)| {
            let id = node.ground_texture_id.clamp(0, RADIX as i32 - 1) as u32;
            char::from_digit(id, RADIX).unwrap_or('0')
        })
        .collect();
    GroundTiles { width: map.width(), height: map.height(), tiles }
}

/// Applies saved texture ids to `map`. Nothing is written unless the whole
/// string validates.
pub fn decode_ground_tiles(map: &mut GameMap, saved: &GroundTiles) -> Result<(), GroundTilesError> {
    if saved.width != map.width() || saved.height != map.height() {
        return Err(GroundTilesError::SizeMismatch {
            saved_width: saved.width,
            saved_height: saved.height,
            width: map.width(),
            height: map.height(),
        });
    }

    let expected = (map.width().max(0) * map.height().max(0)) as usize;
    let found = saved.tiles.chars().count();
    if found != expected {
        return Err(GroundTilesError::LengthMismatch { expected, found });
    }

    let ids = saved.tiles.chars().enumerate()
        .map(|(position, digit)| digit.to_digit(RADIX)
            .map(|id| id as i32)
            .ok_or(GroundTilesError::InvalidDigit { digit, position }))
        .collect::<Result<Vec<_>, _>>()?;

    let cells: Vec<_> = map.nodes().map(|(id, _)| id).collect();
    for (id, texture) in cells.into_iter().zip(ids) {
        map[id].ground_texture_id = texture;
    }
    Ok(())
}
