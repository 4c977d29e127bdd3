// tick.rs - Thinker, Ticker.

/*
Copyright (C) 1993-1996 Id Software, Inc.

This program is free software; you can redistribute it and/or
modify it under the terms of the GNU General Public License
as published by the Free Software Foundation; either version 2
of the License, or (at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.

See the GNU General Public License for more details.
*/

use doom_common::doomdef::MAXPLAYERS;

use crate::mobj::{mobj_thinker, respawn_specials};
use crate::spec::update_specials;
use crate::user::player_think;
use crate::world::{Thinker, World};

/// Runs every thinker once, in creation order. Thinkers added while
/// running get their first think in the same pass.
pub fn run_thinkers(w: &mut World) {
    let mut i = 0;
    while i < w.thinkers.len() {
        let Some((id, current)) = w.thinkers.slot(i) else {
            i += 1;
            continue;
        };

        if let Some(&Thinker::Mobj(mo)) = current {
            mobj_thinker(w, mo);
            i += 1;
            continue;
        }

        if let Some(mut t) = w.thinkers.take(i) {
            match &mut t {
                Thinker::Mobj(_) => {}
                Thinker::Door(d) => d.think(w, id),
                Thinker::Floor(f) => f.think(w, id),
                Thinker::Plat(p) => p.think(w, id),
                Thinker::Ceiling(c) => c.think(w, id),
                Thinker::Flash(f) => f.think(w),
                Thinker::Strobe(s) => s.think(w),
                Thinker::Glow(g) => g.think(w),
                Thinker::Flicker(f) => f.think(w),
            }
            w.thinkers.put_back(i, t);
        }
        i += 1;
    }
}

impl World {
    /// Advances the level one tic. Players' commands must already be in
    /// `players[].cmd`.
    pub fn ticker(&mut self) {
        for pnum in 0..MAXPLAYERS {
            if self.playeringame[pnum] {
                player_think(self, pnum);
            }
        }

        run_thinkers(self);
        update_specials(self);
        respawn_specials(self);

        // for par times
        self.leveltime += 1;
        self.thinkers.compact();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doors::{ev_do_door, DoorKind};
    use crate::info::MobjType;
    use crate::lights::spawn_glowing_light;
    use crate::local::ONFLOORZ;
    use crate::mobj::{remove_mobj, spawn_mobj};
    use crate::testutil::{test_world, test_world_with_player};
    use doom_common::fixed::FRACUNIT;

    #[test]
    fn test_ticker_advances_time() {
        let mut w = test_world_with_player();
        w.ticker();
        w.ticker();
        assert_eq!(w.leveltime, 2);
    }

    #[test]
    fn test_removed_thinkers_are_compacted() {
        let mut w = test_world();
        let imp = spawn_mobj(&mut w, 384 * FRACUNIT, 256 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        spawn_glowing_light(&mut w, 0);
        assert_eq!(w.thinkers.len(), 2);
        remove_mobj(&mut w, imp);
        assert_eq!(w.thinkers.len(), 2);
        w.ticker();
        assert_eq!(w.thinkers.len(), 1);
    }

    #[test]
    fn test_mover_keeps_running_until_done() {
        let mut w = test_world();
        w.level.sectors[1].ceilingheight = 0;
        assert!(ev_do_door(&mut w, 1, DoorKind::Open));
        let door = w.level.sectors[1].specialdata.unwrap();
        w.ticker();
        assert!(w.thinkers.get(door).is_some());
        assert!(w.level.sectors[1].ceilingheight > 0);
    }
}
