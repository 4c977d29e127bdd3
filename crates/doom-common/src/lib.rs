#![allow(clippy::needless_range_loop, clippy::too_many_arguments, clippy::manual_range_contains,
         clippy::collapsible_if, clippy::collapsible_else_if, clippy::comparison_chain)]
// Shared engine code: math, tables, WAD container and graphics resources.

pub mod bbox;
pub mod doomdef;
pub mod error;
pub mod fixed;
pub mod gfx;
pub mod random;
pub mod resources;
pub mod tables;
pub mod ticcmd;
pub mod wad;
pub mod wad_writer;
pub mod wadfiles;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{ResourceError, WadError};
pub use fixed::{fixed_div, fixed_mul, Fixed, FRACBITS, FRACUNIT};
pub use tables::Angle;
pub use wad::Wad;
