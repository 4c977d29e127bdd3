// testutil.rs - Worlds and views built on the in-memory test IWAD

use std::sync::Arc;

use doom_common::fixed::{Fixed, FRACBITS};
use doom_common::resources::Resources;
use doom_common::tables::Angle;
use doom_common::testkit;
use doom_game::info::SPRNAMES;
use doom_game::local::VIEWHEIGHT;
use doom_game::player::PlayerState;
use doom_game::setup::{load_level, setup_level};
use doom_game::{GameOptions, World};

use crate::video::Framebuffer;
use crate::view::Renderer;

/// No test texture, flat or sprite lights to this, so any pixel left
/// with it was not drawn.
pub const UNDRAWN: u8 = 255;

/// E1M1 of the test IWAD with its things spawned and player 1 looking
/// east from the start spot.
pub fn test_world_with_player() -> World {
    let wad = testkit::wad();
    let res = Arc::new(Resources::load(&wad, &SPRNAMES).expect("test resources load"));
    let level = load_level(&wad, &res, "E1M1").expect("test map loads");
    let mut w = World::new(level, res, GameOptions::default());
    w.playeringame[0] = true;
    w.players[0].playerstate = PlayerState::Reborn;
    setup_level(&mut w);

    let mo = w.players[0].mo.expect("player spawned");
    w.players[0].viewz = w.mobjs[mo].z + VIEWHEIGHT;
    w
}

/// Renders player 1's view into a framebuffer cleared to `UNDRAWN`.
pub fn render_test_view(w: &World) -> (Renderer, Framebuffer) {
    let mut r = Renderer::new();
    let mut fb = Framebuffer::new();
    fb.fill(UNDRAWN);
    r.render_player_view(w, 0, &mut fb);
    (r, fb)
}

/// Moves player 1 to map position (`x`, `y`) facing `angle` and renders.
pub fn render_from(w: &mut World, x: i32, y: i32, angle: Angle) -> (Renderer, Framebuffer) {
    let (x, y): (Fixed, Fixed) = (x << FRACBITS, y << FRACBITS);
    let ss = w.level.point_in_subsector(x, y);
    let floor = w.level.sectors[w.level.subsectors[ss].sector].floorheight;

    let id = w.players[0].mo.expect("player spawned");
    let mo = &mut w.mobjs[id];
    mo.x = x;
    mo.y = y;
    mo.z = floor;
    mo.angle = angle;
    mo.subsector = ss;
    w.players[0].viewz = floor + VIEWHEIGHT;

    render_test_view(w)
}
