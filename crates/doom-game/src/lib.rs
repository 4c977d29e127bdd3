#![allow(clippy::needless_range_loop, clippy::too_many_arguments, clippy::manual_range_contains,
         clippy::collapsible_if, clippy::collapsible_else_if, clippy::comparison_chain)]
// Play simulation: things, level geometry, specials, players and the game loop.

pub mod actions;
pub mod blockmap;
pub mod ceilings;
pub mod demo;
pub mod doors;
pub mod enemy;
pub mod error;
pub mod floors;
pub mod game;
pub mod info;
pub mod inter;
pub mod level;
pub mod lights;
pub mod local;
pub mod map;
pub mod maputl;
pub mod mobj;
pub mod plats;
pub mod player;
pub mod pspr;
pub mod saveg;
pub mod setup;
pub mod sight;
pub mod spec;
pub mod switches;
pub mod telept;
pub mod tick;
pub mod user;
pub mod world;

#[cfg(test)]
mod testutil;

pub use error::{DemoError, GameError, LevelError, SaveError};
pub use game::{Game, GameState};
pub use level::Level;
pub use setup::load_level;
pub use world::{GameOptions, MobjId, World};
