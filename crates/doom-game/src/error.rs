// error.rs - Error types for level loading, demos and saved games

use doom_common::{ResourceError, WadError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Wad(#[from] WadError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("map {0} not found")]
    MapNotFound(String),
    #[error("{map}: expected lump {expected} after the map marker")]
    MissingLump { map: String, expected: &'static str },
    #[error("{map}: {lump} entry {index} refers to missing {what} {target}")]
    BadReference {
        map: String,
        lump: &'static str,
        index: usize,
        what: &'static str,
        target: usize,
    },
    #[error("{map}: {lump} {reason}")]
    BadLump {
        map: String,
        lump: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Wad(#[from] WadError),
    #[error("demo is too short ({0} bytes)")]
    Truncated(usize),
    #[error("demo is from a different game version ({0})")]
    BadVersion(u8),
    #[error("demo header is invalid: {0}")]
    BadHeader(String),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("saved game is from a different version")]
    BadVersion,
    #[error("no level to save")]
    NotInLevel,
    #[error("saved game is truncated")]
    Truncated,
    #[error("saved game is for {saved}, not the loaded level {loaded}")]
    WrongLevel { saved: String, loaded: String },
    #[error("saved game has a bad {what} ({value})")]
    BadValue { what: &'static str, value: i64 },
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Anything that can stop the game loop.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Demo(#[from] DemoError),
    #[error(transparent)]
    Save(#[from] SaveError),
}
