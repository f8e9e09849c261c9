mod direction;
mod ground;
mod line;
mod map;
mod midpoint;
mod node;
mod path;
mod wrap;

pub use direction::{hex_direction, offsets, Direction, EVEN_OFFSETS, FAR_DISTANCE_FACTOR, ODD_OFFSETS};
pub use ground::{decode_ground_tiles, encode_ground_tiles, GroundTiles, GroundTilesError};
pub use line::{Endpoint, HexLine, HexPoint, LineWidth};
pub use map::{GameMap, MapOptions, HEX_HEIGHT, HEX_WIDTH, MAX_DIMENSION};
pub use midpoint::NodeMidpoint;
pub use node::{world_position, BlockerId, MapNode, NodeId, ObjectId, Occupant};
pub use wrap::normalize_index;
