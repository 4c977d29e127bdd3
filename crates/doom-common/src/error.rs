// error.rs - Error types for WAD and resource loading

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WadError {
    #[error("couldn't read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{file} is too short to be a WAD ({len} bytes)")]
    Truncated { file: String, len: usize },
    #[error("{file} doesn't have IWAD or PWAD id")]
    BadMagic { file: String },
    #[error("{file}: lump directory at {offset} with {count} entries runs past end of file")]
    BadDirectory { file: String, offset: usize, count: usize },
    #[error("{file}: lump {name} ({offset}+{size}) runs past end of file")]
    BadLump {
        file: String,
        name: String,
        offset: usize,
        size: usize,
    },
    #[error("lump {0} not found")]
    LumpNotFound(String),
    #[error("marker {0} not found")]
    MarkerNotFound(String),
    #[error("lump number {0} out of range")]
    LumpOutOfRange(usize),
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Wad(#[from] WadError),
    #[error("lump {lump}: {reason}")]
    BadLump { lump: String, reason: String },
    #[error("patch {0} is malformed")]
    BadPatch(String),
    #[error("texture {texture}: {reason}")]
    BadTexture { texture: String, reason: String },
    #[error("sprite {sprite} frame {frame}: {reason}")]
    BadSprite {
        sprite: String,
        frame: char,
        reason: String,
    },
}
