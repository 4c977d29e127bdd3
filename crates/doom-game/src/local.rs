// local.rs - Play simulation constants

use doom_common::fixed::{Fixed, FRACBITS, FRACUNIT};

pub const FLOATSPEED: Fixed = FRACUNIT * 4;

pub const MAXHEALTH: i32 = 100;
pub const VIEWHEIGHT: Fixed = 41 * FRACUNIT;

// mapblocks are used to check movement against lines and things
pub const MAPBLOCKUNITS: i32 = 128;
pub const MAPBLOCKSIZE: Fixed = MAPBLOCKUNITS * FRACUNIT;
pub const MAPBLOCKSHIFT: i32 = FRACBITS + 7;
pub const MAPBMASK: i32 = MAPBLOCKSIZE - 1;
pub const MAPBTOFRAC: i32 = MAPBLOCKSHIFT - FRACBITS;

/// Player radius for movement checking.
pub const PLAYERRADIUS: Fixed = 16 * FRACUNIT;

/// Largest radius of any thing. Thing centres are linked into one
/// block, so checks look this far around.
pub const MAXRADIUS: Fixed = 32 * FRACUNIT;

pub const GRAVITY: Fixed = FRACUNIT;
pub const MAXMOVE: Fixed = 30 * FRACUNIT;

pub const USERANGE: Fixed = 64 * FRACUNIT;
pub const MELEERANGE: Fixed = 64 * FRACUNIT;
pub const MISSILERANGE: Fixed = 32 * 64 * FRACUNIT;

/// Follow a player exclusively for 3 seconds.
pub const BASETHRESHOLD: i32 = 100;

/// Spawn z meaning "on the floor".
pub const ONFLOORZ: Fixed = i32::MIN;
/// Spawn z meaning "hanging from the ceiling".
pub const ONCEILINGZ: Fixed = i32::MAX;

/// Capacity of the deathmatch item respawn queue.
pub const ITEMQUESIZE: usize = 128;

pub const STOPSPEED: Fixed = 0x1000;
pub const FRICTION: Fixed = 0xe800;
