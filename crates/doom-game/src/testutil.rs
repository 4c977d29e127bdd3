// testutil.rs - Worlds built on the in-memory test IWAD

use std::sync::Arc;

use doom_common::resources::Resources;
use doom_common::testkit::{self, PLAYER_START};
use doom_common::wadfiles::MapThing;

use crate::info::SPRNAMES;
use crate::mobj::spawn_player;
use crate::player::PlayerState;
use crate::setup::load_level;
use crate::world::{GameOptions, World};

pub fn test_resources() -> Arc<Resources> {
    let wad = testkit::wad();
    Arc::new(Resources::load(&wad, &SPRNAMES).expect("test resources load"))
}

/// E1M1 of the test IWAD with nothing spawned.
pub fn test_world() -> World {
    let wad = testkit::wad();
    let res = test_resources();
    let level = load_level(&wad, &res, "E1M1").expect("test map loads");
    World::new(level, res, GameOptions::default())
}

/// `test_world` with player 1 standing on the start spot, facing east.
pub fn test_world_with_player() -> World {
    let mut w = test_world();
    w.playeringame[0] = true;
    w.players[0].playerstate = PlayerState::Reborn;
    let start = MapThing {
        x: PLAYER_START.0,
        y: PLAYER_START.1,
        angle: 0,
        kind: 1,
        options: 7,
    };
    spawn_player(&mut w, &start);
    w
}
