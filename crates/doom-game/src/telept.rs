// telept.rs - Teleportation.

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

use doom_common::tables::{fine_index, finecosine, finesine};

use crate::info::{MobjFlags, MobjType, SfxId};
use crate::map::teleport_move;
use crate::mobj::spawn_mobj;
use crate::world::{MobjId, Thinker, World};

/// Teleport destination in a sector tagged like the line, if any.
fn find_destination(w: &World, tag: i32) -> Option<MobjId> {
    for sec in 0..w.level.sectors.len() {
        if w.level.sectors[sec].tag != tag {
            continue;
        }
        for (_, t) in w.thinkers.iter() {
            // not a mobj
            let Thinker::Mobj(id) = *t else {
                continue;
            };
            let Some(m) = w.mobjs.get(id) else {
                continue;
            };
            // not a teleportman
            if m.kind != MobjType::MT_TELEPORTMAN {
                continue;
            }
            // wrong sector
            if w.level.subsectors[m.subsector].sector != sec {
                continue;
            }
            return Some(id);
        }
    }
    None
}

pub fn ev_teleport(w: &mut World, line: usize, side: usize, thing: MobjId) -> bool {
    let Some(mo) = w.mobjs.get(thing) else {
        return false;
    };

    // don't teleport missiles
    if mo.flags.contains(MobjFlags::MISSILE) {
        return false;
    }

    // Don't teleport if hit back of line,
    //  so you can get out of teleporter.
    if side == 1 {
        return false;
    }

    let tag = w.level.lines[line].tag;
    let Some(dest) = find_destination(w, tag) else {
        return false;
    };

    let (oldx, oldy, oldz) = (mo.x, mo.y, mo.z);
    let (mx, my, mangle) = {
        let m = &w.mobjs[dest];
        (m.x, m.y, m.angle)
    };

    if !teleport_move(w, thing, mx, my) {
        return false;
    }

    let mo = &mut w.mobjs[thing];
    mo.z = mo.floorz;
    let z = mo.z;
    let player = mo.player;
    if let Some(p) = player {
        w.players[p].viewz = z + w.players[p].viewheight;
    }

    // spawn teleport fog at source and destination
    let fog = spawn_mobj(w, oldx, oldy, oldz, MobjType::MT_TFOG);
    w.mobj_sound(fog, SfxId::telept);
    let an = fine_index(mangle);
    let fog = spawn_mobj(
        w,
        mx + 20 * finecosine(an),
        my + 20 * finesine(an),
        z,
        MobjType::MT_TFOG,
    );

    // emit sound, where?
    w.mobj_sound(fog, SfxId::telept);

    let mo = &mut w.mobjs[thing];
    // don't move for a bit
    if player.is_some() {
        mo.reactiontime = 18;
    }
    mo.angle = mangle;
    mo.momx = 0;
    mo.momy = 0;
    mo.momz = 0;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::ONFLOORZ;
    use crate::testutil::test_world_with_player;
    use doom_common::fixed::FRACUNIT;
    use doom_common::tables::ANG90;
    use doom_common::testkit::DIVIDER_LINE;

    #[test]
    fn test_teleport_to_tagged_sector() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        let dest = spawn_mobj(&mut w, 448 * FRACUNIT, 64 * FRACUNIT, ONFLOORZ, MobjType::MT_TELEPORTMAN);
        w.mobjs[dest].angle = ANG90;
        w.level.lines[DIVIDER_LINE].tag = 1;
        w.mobjs[mo].momx = 5 * FRACUNIT;

        assert!(ev_teleport(&mut w, DIVIDER_LINE, 0, mo));
        let m = &w.mobjs[mo];
        assert_eq!((m.x, m.y), (448 * FRACUNIT, 64 * FRACUNIT));
        assert_eq!(m.angle, ANG90);
        assert_eq!(m.momx, 0);
        assert_eq!(m.reactiontime, 18);
        assert_eq!(w.mobjs.iter().filter(|m| m.kind == MobjType::MT_TFOG).count(), 2);
    }

    #[test]
    fn test_back_side_does_not_teleport() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        spawn_mobj(&mut w, 448 * FRACUNIT, 64 * FRACUNIT, ONFLOORZ, MobjType::MT_TELEPORTMAN);
        w.level.lines[DIVIDER_LINE].tag = 1;
        assert!(!ev_teleport(&mut w, DIVIDER_LINE, 1, mo));
    }

    #[test]
    fn test_no_destination() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.level.lines[DIVIDER_LINE].tag = 1;
        assert!(!ev_teleport(&mut w, DIVIDER_LINE, 0, mo));
    }
}
