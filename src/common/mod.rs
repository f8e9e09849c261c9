pub mod plugins;
pub mod resources;
