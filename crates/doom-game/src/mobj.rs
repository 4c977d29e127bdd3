// mobj.rs - Moving objects: spawning, state changes and movement

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

use log::{debug, warn};

use doom_common::doomdef::{Skill, MAXPLAYERS, NUMCARDS};
use doom_common::fixed::{fixed_mul, Fixed, FRACBITS, FRACUNIT};
use doom_common::tables::{finecosine, finesine, fine_index, point_to_angle, Angle, ANG45};
use doom_common::wadfiles::{MapThing, MTF_AMBUSH, MTF_NOTSINGLE};

use crate::actions::call_mobj_action;
use crate::info::{MobjFlags, MobjType, SfxId, SpriteNum, StateNum, MF_TRANSSHIFT};
use crate::local::*;
use crate::map::{aim_line_attack, check_position, slide_move, try_move};
use crate::maputl::{aprox_distance, set_thing_position, unset_thing_position};
use crate::player::{Cheats, PlayerState};
use crate::world::{MobjId, Thinker, ThinkerId, World};

/// Direction a monster is walking in, 0-7 as multiples of 45 degrees.
pub const DI_NODIR: i32 = 8;

#[derive(Debug, Clone)]
pub struct Mobj {
    pub id: MobjId,
    pub thinker: ThinkerId,

    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    /// Orientation.
    pub angle: Angle,
    /// Used to find patch to draw.
    pub sprite: SpriteNum,
    /// Might be ORed with FF_FULLBRIGHT.
    pub frame: i32,

    pub subsector: usize,
    /// Blockmap cell the thing is linked into, if any.
    pub blockindex: Option<usize>,

    /// The closest interval over all contacted sectors.
    pub floorz: Fixed,
    pub ceilingz: Fixed,

    /// For movement checking.
    pub radius: Fixed,
    pub height: Fixed,

    pub momx: Fixed,
    pub momy: Fixed,
    pub momz: Fixed,

    /// If == validcount, already checked.
    pub validcount: i32,

    pub kind: MobjType,
    /// State tic counter.
    pub tics: i32,
    pub state: StateNum,
    pub flags: MobjFlags,
    pub health: i32,

    /// Movement direction, movement generation (zig-zagging).
    pub movedir: i32,
    /// When 0, select a new dir.
    pub movecount: i32,

    /// Thing being chased/attacked (or None), also the originator for
    /// missiles.
    pub target: Option<MobjId>,

    /// Reaction time: if non 0, don't attack yet. Used by player to freeze
    /// a bit after teleporting.
    pub reactiontime: i32,

    /// If >0, the target will be chased no matter what (even if shot).
    pub threshold: i32,

    /// Index of the player driving this thing.
    pub player: Option<usize>,

    /// Player number last looked for.
    pub lastlook: usize,

    /// For nightmare respawn.
    pub spawnpoint: MapThing,

    /// Thing being chased/attacked for tracers.
    pub tracer: Option<MobjId>,
}

impl Mobj {
    /// A thing of `kind` at the origin, not yet linked into the world.
    pub fn new_unlinked(id: MobjId, thinker: ThinkerId, kind: MobjType) -> Mobj {
        let info = kind.info();
        let st = info.spawnstate.info();
        Mobj {
            id,
            thinker,
            x: 0,
            y: 0,
            z: 0,
            angle: 0,
            sprite: st.sprite,
            frame: st.frame,
            subsector: 0,
            blockindex: None,
            floorz: 0,
            ceilingz: 0,
            radius: info.radius,
            height: info.height,
            momx: 0,
            momy: 0,
            momz: 0,
            validcount: 0,
            kind,
            tics: st.tics,
            state: info.spawnstate,
            flags: info.flags,
            health: info.spawnhealth,
            movedir: 0,
            movecount: 0,
            target: None,
            reactiontime: info.reactiontime,
            threshold: 0,
            player: None,
            lastlook: 0,
            spawnpoint: MapThing::default(),
            tracer: None,
        }
    }
}

// ============================================================
// State changes
// ============================================================

/// Enters `state`, running its action, and keeps going through states
/// with zero tics. Returns false if the thing was removed.
pub fn set_mobj_state(w: &mut World, id: MobjId, mut state: StateNum) -> bool {
    loop {
        if state == StateNum::S_NULL {
            if let Some(mo) = w.mobjs.get_mut(id) {
                mo.state = StateNum::S_NULL;
            }
            remove_mobj(w, id);
            return false;
        }

        let st = state.info();
        let tics = state.tics(w.fast_monsters());
        let Some(mo) = w.mobjs.get_mut(id) else {
            return false;
        };
        mo.state = state;
        mo.tics = tics;
        mo.sprite = st.sprite;
        mo.frame = st.frame;

        // Modified handling.
        // Call action functions when the state is set
        call_mobj_action(w, id, st.action);
        let Some(mo) = w.mobjs.get(id) else {
            return false;
        };

        state = st.next;
        if mo.tics != 0 {
            return true;
        }
    }
}

pub fn explode_missile(w: &mut World, id: MobjId) {
    let Some(mo) = w.mobjs.get_mut(id) else {
        return;
    };
    mo.momx = 0;
    mo.momy = 0;
    mo.momz = 0;
    let info = mo.kind.info();

    if !set_mobj_state(w, id, info.deathstate) {
        return;
    }

    let r = w.p_random() & 3;
    let mo = &mut w.mobjs[id];
    mo.tics = (mo.tics - r).max(1);
    mo.flags.remove(MobjFlags::MISSILE);

    w.mobj_sound(id, info.deathsound);
}

// ============================================================
// Movement
// ============================================================

fn xy_movement(w: &mut World, id: MobjId) {
    let mo = &mut w.mobjs[id];
    if mo.momx == 0 && mo.momy == 0 {
        if mo.flags.contains(MobjFlags::SKULLFLY) {
            // the skull slammed into something
            mo.flags.remove(MobjFlags::SKULLFLY);
            mo.momx = 0;
            mo.momy = 0;
            mo.momz = 0;
            let spawn = mo.kind.info().spawnstate;
            set_mobj_state(w, id, spawn);
        }
        return;
    }

    mo.momx = mo.momx.clamp(-MAXMOVE, MAXMOVE);
    mo.momy = mo.momy.clamp(-MAXMOVE, MAXMOVE);

    let mut xmove = mo.momx;
    let mut ymove = mo.momy;

    loop {
        let mo = &w.mobjs[id];
        let (ptryx, ptryy);
        if xmove > MAXMOVE / 2 || ymove > MAXMOVE / 2 {
            ptryx = mo.x + xmove / 2;
            ptryy = mo.y + ymove / 2;
            xmove >>= 1;
            ymove >>= 1;
        } else {
            ptryx = mo.x + xmove;
            ptryy = mo.y + ymove;
            xmove = 0;
            ymove = 0;
        }

        let result = try_move(w, id, ptryx, ptryy);
        if !w.mobjs.contains(id) {
            return;
        }
        if !result.ok {
            let mo = &w.mobjs[id];
            if mo.player.is_some() {
                // try to slide along it
                slide_move(w, id);
            } else if mo.flags.contains(MobjFlags::MISSILE) {
                // explode a missile
                let sky_hit = result
                    .ceilingline
                    .and_then(|l| w.level.lines[l].backsector)
                    .is_some_and(|back| w.level.sectors[back].ceilingpic == w.skyflatnum);
                if sky_hit {
                    // Hack to prevent missiles exploding
                    // against the sky.
                    remove_mobj(w, id);
                    return;
                }
                explode_missile(w, id);
            } else {
                let mo = &mut w.mobjs[id];
                mo.momx = 0;
                mo.momy = 0;
            }
        }
        if !w.mobjs.contains(id) {
            return;
        }
        if xmove == 0 && ymove == 0 {
            break;
        }
    }

    // slow down
    let mo = &w.mobjs[id];
    let player = mo.player;
    if let Some(p) = player {
        if w.players[p].cheats.contains(Cheats::NOMOMENTUM) {
            // debug option for no sliding at all
            let mo = &mut w.mobjs[id];
            mo.momx = 0;
            mo.momy = 0;
            return;
        }
    }

    if mo.flags.intersects(MobjFlags::MISSILE | MobjFlags::SKULLFLY) {
        return; // no friction for missiles ever
    }

    if mo.z > mo.floorz {
        return; // no friction when airborne
    }

    if mo.flags.contains(MobjFlags::CORPSE) {
        // do not stop sliding
        //  if halfway off a step with some momentum
        let moving = mo.momx > FRACUNIT / 4
            || mo.momx < -FRACUNIT / 4
            || mo.momy > FRACUNIT / 4
            || mo.momy < -FRACUNIT / 4;
        let sector = w.level.subsectors[mo.subsector].sector;
        if moving && mo.floorz != w.level.sectors[sector].floorheight {
            return;
        }
    }

    let idle = player.map_or(true, |p| {
        let cmd = &w.players[p].cmd;
        cmd.forwardmove == 0 && cmd.sidemove == 0
    });

    let mo = &mut w.mobjs[id];
    if mo.momx > -STOPSPEED && mo.momx < STOPSPEED && mo.momy > -STOPSPEED && mo.momy < STOPSPEED && idle {
        // if in a walking frame, stop moving
        let running = (StateNum::S_PLAY_RUN1 as usize..=StateNum::S_PLAY_RUN4 as usize)
            .contains(&(mo.state as usize));
        mo.momx = 0;
        mo.momy = 0;
        if player.is_some() && running {
            set_mobj_state(w, id, StateNum::S_PLAY);
        }
    } else {
        mo.momx = fixed_mul(mo.momx, FRICTION);
        mo.momy = fixed_mul(mo.momy, FRICTION);
    }
}

fn z_movement(w: &mut World, id: MobjId) {
    let mo = &w.mobjs[id];

    // check for smooth step up
    if let Some(p) = mo.player {
        if mo.z < mo.floorz {
            let step = mo.floorz - mo.z;
            let pl = &mut w.players[p];
            pl.viewheight -= step;
            pl.deltaviewheight = (VIEWHEIGHT - pl.viewheight) >> 3;
        }
    }

    let target_pos = w
        .mobjs
        .get(id)
        .and_then(|m| m.target)
        .and_then(|t| w.mobjs.get(t))
        .map(|t| (t.x, t.y, t.z));

    let mo = &mut w.mobjs[id];

    // adjust height
    mo.z += mo.momz;

    if mo.flags.contains(MobjFlags::FLOAT) {
        if let Some((tx, ty, tz)) = target_pos {
            // float down towards target if too close
            if !mo.flags.intersects(MobjFlags::SKULLFLY | MobjFlags::INFLOAT) {
                let dist = aprox_distance(mo.x - tx, mo.y - ty);
                let delta = (tz + (mo.height >> 1)) - mo.z;

                if delta < 0 && dist < -(delta * 3) {
                    mo.z -= FLOATSPEED;
                } else if delta > 0 && dist < delta * 3 {
                    mo.z += FLOATSPEED;
                }
            }
        }
    }

    // clip movement
    if mo.z <= mo.floorz {
        // hit the floor
        if mo.flags.contains(MobjFlags::SKULLFLY) {
            // the skull slammed into something
            mo.momz = -mo.momz;
        }

        let mut oof = false;
        if mo.momz < 0 {
            if let Some(p) = mo.player {
                if mo.momz < -GRAVITY * 8 {
                    // Squat down.
                    // Decrease viewheight for a moment
                    // after hitting the ground (hard),
                    // and utter appropriate sound.
                    w.players[p].deltaviewheight = mo.momz >> 3;
                    oof = true;
                }
            }
            mo.momz = 0;
        }
        mo.z = mo.floorz;

        let explode = mo.flags.contains(MobjFlags::MISSILE) && !mo.flags.contains(MobjFlags::NOCLIP);
        if oof {
            w.mobj_sound(id, SfxId::oof);
        }
        if explode {
            explode_missile(w, id);
            return;
        }
    } else if !mo.flags.contains(MobjFlags::NOGRAVITY) {
        if mo.momz == 0 {
            mo.momz = -GRAVITY * 2;
        } else {
            mo.momz -= GRAVITY;
        }
    }

    let mo = &mut w.mobjs[id];
    if mo.z + mo.height > mo.ceilingz {
        // hit the ceiling
        if mo.momz > 0 {
            mo.momz = 0;
        }
        mo.z = mo.ceilingz - mo.height;

        if mo.flags.contains(MobjFlags::SKULLFLY) {
            // the skull slammed into something
            mo.momz = -mo.momz;
        }

        if mo.flags.contains(MobjFlags::MISSILE) && !mo.flags.contains(MobjFlags::NOCLIP) {
            explode_missile(w, id);
        }
    }
}

fn nightmare_respawn(w: &mut World, id: MobjId) {
    let mo = &w.mobjs[id];
    let spawnpoint = mo.spawnpoint;
    let kind = mo.kind;
    let (oldx, oldy) = (mo.x, mo.y);
    let x = (spawnpoint.x as Fixed) << FRACBITS;
    let y = (spawnpoint.y as Fixed) << FRACBITS;

    // somthing is occupying it's position?
    if !check_position(w, id, x, y).ok {
        return; // no respwan
    }

    // spawn a teleport fog at old spot
    // because of removal of the body?
    let z = w.level.sectors[w.level.sector_at(oldx, oldy)].floorheight;
    let fog = spawn_mobj(w, oldx, oldy, z, MobjType::MT_TFOG);
    // initiate teleport sound
    w.mobj_sound(fog, SfxId::telept);

    // spawn a teleport fog at the new spot
    let z = w.level.sectors[w.level.sector_at(x, y)].floorheight;
    let fog = spawn_mobj(w, x, y, z, MobjType::MT_TFOG);
    w.mobj_sound(fog, SfxId::telept);

    // spawn it
    let z = if kind.info().flags.contains(MobjFlags::SPAWNCEILING) {
        ONCEILINGZ
    } else {
        ONFLOORZ
    };

    // inherit attributes from deceased one
    let new = spawn_mobj(w, x, y, z, kind);
    let mo = &mut w.mobjs[new];
    mo.spawnpoint = spawnpoint;
    mo.angle = map_angle(&spawnpoint);
    if spawnpoint.options & MTF_AMBUSH != 0 {
        mo.flags.insert(MobjFlags::AMBUSH);
    }
    mo.reactiontime = 18;

    // remove the old monster,
    remove_mobj(w, id);
}

pub fn mobj_thinker(w: &mut World, id: MobjId) {
    let mo = &w.mobjs[id];

    // momentum movement
    if mo.momx != 0 || mo.momy != 0 || mo.flags.contains(MobjFlags::SKULLFLY) {
        xy_movement(w, id);
        if !w.mobjs.contains(id) {
            return; // mobj was removed
        }
    }

    let mo = &w.mobjs[id];
    if mo.z != mo.floorz || mo.momz != 0 {
        z_movement(w, id);
        if !w.mobjs.contains(id) {
            return; // mobj was removed
        }
    }

    // cycle through states,
    // calling action functions at transitions
    let mo = &mut w.mobjs[id];
    if mo.tics != -1 {
        mo.tics -= 1;

        // you can cycle through multiple states in a tic
        if mo.tics == 0 {
            let next = mo.state.info().next;
            set_mobj_state(w, id, next);
        }
    } else {
        // check for nightmare respawn
        if !mo.flags.contains(MobjFlags::COUNTKILL) {
            return;
        }
        if !w.options.respawnmonsters {
            return;
        }

        mo.movecount += 1;
        if mo.movecount < 12 * 35 {
            return;
        }
        if w.leveltime & 31 != 0 {
            return;
        }
        if w.p_random() > 4 {
            return;
        }

        nightmare_respawn(w, id);
    }
}

// ============================================================
// Spawning and removal
// ============================================================

pub fn spawn_mobj(w: &mut World, x: Fixed, y: Fixed, z: Fixed, kind: MobjType) -> MobjId {
    let info = kind.info();
    let lastlook = (w.p_random() as usize) % MAXPLAYERS;
    let nightmare = w.options.skill == Skill::Nightmare;

    let id = w.mobjs.insert(|id| {
        let mut mo = Mobj::new_unlinked(id, ThinkerId(0), kind);
        mo.x = x;
        mo.y = y;
        if nightmare {
            mo.reactiontime = 0;
        }
        mo.lastlook = lastlook;
        mo
    });

    // set subsector and/or block links
    set_thing_position(w, id);

    let sector = w.sector_of(id);
    let (floor, ceiling) = {
        let s = &w.level.sectors[sector];
        (s.floorheight, s.ceilingheight)
    };
    let thinker = w.add_thinker(Thinker::Mobj(id));

    let mo = &mut w.mobjs[id];
    mo.thinker = thinker;
    mo.floorz = floor;
    mo.ceilingz = ceiling;
    mo.z = if z == ONFLOORZ {
        floor
    } else if z == ONCEILINGZ {
        ceiling - info.height
    } else {
        z
    };

    id
}

pub fn remove_mobj(w: &mut World, id: MobjId) {
    let Some(mo) = w.mobjs.get(id) else {
        return;
    };

    if mo.flags.contains(MobjFlags::SPECIAL)
        && !mo.flags.contains(MobjFlags::DROPPED)
        && mo.kind != MobjType::MT_INV
        && mo.kind != MobjType::MT_INS
    {
        if w.itemrespawnque.len() >= ITEMQUESIZE - 1 {
            // lose one off the end
            w.itemrespawnque.pop_front();
        }
        w.itemrespawnque.push_back((mo.spawnpoint, w.leveltime));
    }

    let thinker = mo.thinker;

    // unlink from sector and block lists
    unset_thing_position(w, id);

    // free block
    w.remove_thinker(thinker);
    w.mobjs.remove(id);
}

/// Brings back deathmatch 2 items after thirty seconds.
pub fn respawn_specials(w: &mut World) {
    // only respawn items in deathmatch
    if w.options.deathmatch != 2 {
        return;
    }

    // nothing left to respawn?
    let Some(&(mthing, time)) = w.itemrespawnque.front() else {
        return;
    };

    // wait at least 30 seconds
    if w.leveltime - time < 30 * 35 {
        return;
    }

    let x = (mthing.x as Fixed) << FRACBITS;
    let y = (mthing.y as Fixed) << FRACBITS;

    // spawn a teleport fog at the new spot
    let z = w.level.sectors[w.level.sector_at(x, y)].floorheight;
    let fog = spawn_mobj(w, x, y, z, MobjType::MT_IFOG);
    w.mobj_sound(fog, SfxId::itmbk);

    // find which type to spawn
    if let Some(kind) = MobjType::from_doomednum(mthing.kind as i32) {
        // spawn it
        let z = if kind.info().flags.contains(MobjFlags::SPAWNCEILING) {
            ONCEILINGZ
        } else {
            ONFLOORZ
        };
        let mo = spawn_mobj(w, x, y, z, kind);
        let mo = &mut w.mobjs[mo];
        mo.spawnpoint = mthing;
        mo.angle = map_angle(&mthing);
    }

    // pull it from the que
    w.itemrespawnque.pop_front();
}

#[inline]
fn map_angle(mthing: &MapThing) -> Angle {
    ANG45.wrapping_mul((mthing.angle as i32 / 45) as u32)
}

/// Called when a player is spawned on the level.
/// Most of the player structure stays unchanged
///  between levels.
pub fn spawn_player(w: &mut World, mthing: &MapThing) {
    let pnum = (mthing.kind - 1) as usize;

    // not playing?
    if pnum >= MAXPLAYERS || !w.playeringame[pnum] {
        return;
    }

    if w.players[pnum].playerstate == PlayerState::Reborn {
        w.players[pnum].reborn();
    }

    let x = (mthing.x as Fixed) << FRACBITS;
    let y = (mthing.y as Fixed) << FRACBITS;
    let id = spawn_mobj(w, x, y, ONFLOORZ, MobjType::MT_PLAYER);

    let health = w.players[pnum].health;
    let mo = &mut w.mobjs[id];
    // set color translations for player sprites
    if pnum > 0 {
        mo.flags |= MobjFlags::from_bits_retain((pnum as u32) << MF_TRANSSHIFT);
    }
    mo.angle = map_angle(mthing);
    mo.player = Some(pnum);
    mo.health = health;

    let deathmatch = w.options.deathmatch != 0;
    let p = &mut w.players[pnum];
    p.mo = Some(id);
    p.playerstate = PlayerState::Live;
    p.refire = 0;
    p.message = None;
    p.damagecount = 0;
    p.bonuscount = 0;
    p.extralight = 0;
    p.fixedcolormap = 0;
    p.viewheight = VIEWHEIGHT;

    // setup gun psprite
    crate::pspr::setup_psprites(w, pnum);

    // give all cards in death match mode
    if deathmatch {
        w.players[pnum].cards = [true; NUMCARDS];
    }
}

/// Spawns the thing described by a map thing record, honoring skill,
/// deathmatch and option bits.
pub fn spawn_map_thing(w: &mut World, mthing: &MapThing) {
    // count deathmatch start positions
    if mthing.kind == 11 {
        if w.deathmatchstarts.len() < 10 {
            w.deathmatchstarts.push(*mthing);
        }
        return;
    }

    // check for players specially
    if (1..=MAXPLAYERS as i16).contains(&mthing.kind) {
        // save spots for respawning in network games
        w.playerstarts[(mthing.kind - 1) as usize] = Some(*mthing);
        if w.options.deathmatch == 0 {
            spawn_player(w, mthing);
        }
        return;
    }

    // check for apropriate skill level
    if !w.options.netgame && (mthing.options & MTF_NOTSINGLE) != 0 {
        return;
    }

    let bit = match w.options.skill {
        Skill::Baby => 1,
        Skill::Nightmare => 4,
        s => 1 << (s as i16 - 1),
    };
    if mthing.options & bit == 0 {
        return;
    }

    // find which type to spawn
    let Some(kind) = MobjType::from_doomednum(mthing.kind as i32) else {
        warn!(
            "unknown type {} at ({}, {}), skipped",
            mthing.kind, mthing.x, mthing.y
        );
        return;
    };
    let info = kind.info();

    // don't spawn keycards and players in deathmatch
    if w.options.deathmatch != 0 && info.flags.contains(MobjFlags::NOTDMATCH) {
        return;
    }

    // don't spawn any monsters if -nomonsters
    if w.options.nomonsters && (kind == MobjType::MT_SKULL || info.flags.contains(MobjFlags::COUNTKILL)) {
        return;
    }

    // spawn it
    let x = (mthing.x as Fixed) << FRACBITS;
    let y = (mthing.y as Fixed) << FRACBITS;
    let z = if info.flags.contains(MobjFlags::SPAWNCEILING) {
        ONCEILINGZ
    } else {
        ONFLOORZ
    };

    let id = spawn_mobj(w, x, y, z, kind);
    w.mobjs[id].spawnpoint = *mthing;
    let tics = w.mobjs[id].tics;
    if tics > 0 {
        let r = w.p_random();
        w.mobjs[id].tics = 1 + (r % tics);
    }
    if info.flags.contains(MobjFlags::COUNTKILL) {
        w.totalkills += 1;
    }
    if info.flags.contains(MobjFlags::COUNTITEM) {
        w.totalitems += 1;
    }

    let mo = &mut w.mobjs[id];
    mo.angle = map_angle(mthing);
    if mthing.options & MTF_AMBUSH != 0 {
        mo.flags.insert(MobjFlags::AMBUSH);
    }
    debug!("spawned {:?} at ({}, {})", kind, mthing.x, mthing.y);
}

// ============================================================
// Game specific spawn functions
// ============================================================

pub fn spawn_puff(w: &mut World, x: Fixed, y: Fixed, z: Fixed, attackrange: Fixed) {
    let z = z + (w.p_subrandom() << 10);

    let th = spawn_mobj(w, x, y, z, MobjType::MT_PUFF);
    let r = w.p_random() & 3;
    let mo = &mut w.mobjs[th];
    mo.momz = FRACUNIT;
    mo.tics = (mo.tics - r).max(1);

    // don't make punches spark on the wall
    if attackrange == MELEERANGE {
        set_mobj_state(w, th, StateNum::S_PUFF3);
    }
}

pub fn spawn_blood(w: &mut World, x: Fixed, y: Fixed, z: Fixed, damage: i32) {
    let z = z + (w.p_subrandom() << 10);
    let th = spawn_mobj(w, x, y, z, MobjType::MT_BLOOD);
    let r = w.p_random() & 3;
    let mo = &mut w.mobjs[th];
    mo.momz = FRACUNIT * 2;
    mo.tics = (mo.tics - r).max(1);

    if (9..=12).contains(&damage) {
        set_mobj_state(w, th, StateNum::S_BLOOD2);
    } else if damage < 9 {
        set_mobj_state(w, th, StateNum::S_BLOOD3);
    }
}

/// Moves the missile forward a bit and possibly explodes it right there.
pub fn check_missile_spawn(w: &mut World, th: MobjId) {
    let r = w.p_random() & 3;
    let mo = &mut w.mobjs[th];
    mo.tics = (mo.tics - r).max(1);

    // move a little forward so an angle can
    // be computed if it immediately explodes
    mo.x += mo.momx >> 1;
    mo.y += mo.momy >> 1;
    mo.z += mo.momz >> 1;
    let (x, y) = (mo.x, mo.y);

    if !try_move(w, th, x, y).ok && w.mobjs.contains(th) {
        explode_missile(w, th);
    }
}

pub fn spawn_missile(w: &mut World, source: MobjId, dest: MobjId, kind: MobjType) -> Option<MobjId> {
    let src = w.mobjs.get(source)?;
    let (sx, sy, sz) = (src.x, src.y, src.z);
    let dst = w.mobjs.get(dest)?;
    let (dx, dy, dz, shadow) = (dst.x, dst.y, dst.z, dst.flags.contains(MobjFlags::SHADOW));

    let th = spawn_mobj(w, sx, sy, sz + 4 * 8 * FRACUNIT, kind);
    let info = kind.info();
    let speed = kind.speed(w.fast_monsters());
    w.mobj_sound(th, info.seesound);

    // where it came from
    w.mobjs[th].target = Some(source);
    let mut an = point_to_angle(dx - sx, dy - sy);

    // fuzzy player
    if shadow {
        an = an.wrapping_add((w.p_subrandom() << 20) as Angle);
    }

    let mut dist = aprox_distance(dx - sx, dy - sy) / speed;
    if dist < 1 {
        dist = 1;
    }

    let mo = &mut w.mobjs[th];
    mo.angle = an;
    let fine = fine_index(an);
    mo.momx = fixed_mul(speed, finecosine(fine));
    mo.momy = fixed_mul(speed, finesine(fine));
    mo.momz = (dz - sz) / dist;

    check_missile_spawn(w, th);
    Some(th)
}

/// Tries to aim at a nearby monster.
pub fn spawn_player_missile(w: &mut World, source: MobjId, kind: MobjType) {
    // see which target is to be aimed at
    let mut an = w.mobjs[source].angle;
    let (mut slope, mut target) = aim_line_attack(w, source, an, 16 * 64 * FRACUNIT);

    if target.is_none() {
        an = an.wrapping_add(1 << 26);
        (slope, target) = aim_line_attack(w, source, an, 16 * 64 * FRACUNIT);

        if target.is_none() {
            an = an.wrapping_sub(2 << 26);
            (slope, target) = aim_line_attack(w, source, an, 16 * 64 * FRACUNIT);
        }

        if target.is_none() {
            an = w.mobjs[source].angle;
            slope = 0;
        }
    }

    let src = &w.mobjs[source];
    let (x, y, z) = (src.x, src.y, src.z + 4 * 8 * FRACUNIT);

    let th = spawn_mobj(w, x, y, z, kind);
    let info = kind.info();
    w.mobj_sound(th, info.seesound);

    let mo = &mut w.mobjs[th];
    mo.target = Some(source);
    mo.angle = an;
    let fine = fine_index(an);
    mo.momx = fixed_mul(info.speed, finecosine(fine));
    mo.momy = fixed_mul(info.speed, finesine(fine));
    mo.momz = fixed_mul(info.speed, slope);

    check_missile_spawn(w, th);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_world;

    #[test]
    fn test_spawn_on_floor_and_ceiling() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        assert_eq!(w.mobjs[id].z, 0);
        assert_eq!(w.mobjs[id].floorz, 0);
        assert_eq!(w.mobjs[id].ceilingz, 128 * FRACUNIT);

        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONCEILINGZ, MobjType::MT_MISC0);
        let mo = &w.mobjs[id];
        assert_eq!(mo.z, 128 * FRACUNIT - mo.height);
    }

    #[test]
    fn test_spawn_links_sector_and_block() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let sec = w.sector_of(id);
        assert_eq!(sec, 0);
        assert!(w.level.sectors[0].things.contains(&id));
        let block = w.mobjs[id].blockindex.unwrap();
        assert!(w.level.blockmap.links[block].contains(&id));

        remove_mobj(&mut w, id);
        assert!(!w.mobjs.contains(id));
        assert!(!w.level.sectors[0].things.contains(&id));
        assert!(!w.level.blockmap.links[block].contains(&id));
    }

    #[test]
    fn test_state_null_removes() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, 0, MobjType::MT_PUFF);
        assert!(!set_mobj_state(&mut w, id, StateNum::S_NULL));
        assert!(!w.mobjs.contains(id));
    }

    #[test]
    fn test_puff_runs_out() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, 0, MobjType::MT_PUFF);
        for _ in 0..40 {
            if !w.mobjs.contains(id) {
                break;
            }
            mobj_thinker(&mut w, id);
        }
        assert!(!w.mobjs.contains(id));
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, 64 * FRACUNIT, MobjType::MT_TROOP);
        mobj_thinker(&mut w, id);
        assert_eq!(w.mobjs[id].momz, -GRAVITY * 2);
        for _ in 0..20 {
            mobj_thinker(&mut w, id);
        }
        assert_eq!(w.mobjs[id].z, 0);
        assert_eq!(w.mobjs[id].momz, 0);
    }

    #[test]
    fn test_friction_slows() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_BARREL);
        w.mobjs[id].momx = 4 * FRACUNIT;
        mobj_thinker(&mut w, id);
        let mo = &w.mobjs[id];
        assert_eq!(mo.x, 104 * FRACUNIT);
        assert_eq!(mo.momx, fixed_mul(4 * FRACUNIT, FRICTION));
    }

    #[test]
    fn test_wall_stops_thing() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 30 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_BARREL);
        w.mobjs[id].momx = -25 * FRACUNIT;
        mobj_thinker(&mut w, id);
        let mo = &w.mobjs[id];
        assert_eq!(mo.x, 30 * FRACUNIT);
        assert_eq!(mo.momx, 0);
    }

    #[test]
    fn test_item_goes_to_respawn_queue() {
        let mut w = test_world();
        w.options.deathmatch = 2;
        let thing = MapThing { x: 64, y: 64, angle: 0, kind: 2007, options: 7 };
        spawn_map_thing(&mut w, &thing);
        let clip = w.mobjs.iter().find(|m| m.kind == MobjType::MT_CLIP).map(|m| m.id).unwrap();
        remove_mobj(&mut w, clip);
        assert_eq!(w.itemrespawnque.len(), 1);

        w.leveltime = 30 * 35;
        respawn_specials(&mut w);
        assert!(w.itemrespawnque.is_empty());
        assert!(w.mobjs.iter().any(|m| m.kind == MobjType::MT_CLIP));
        assert!(w.mobjs.iter().any(|m| m.kind == MobjType::MT_IFOG));
    }

    #[test]
    fn test_corpse_respawns_at_its_spawn_point() {
        use crate::inter::kill_mobj;
        use doom_common::testkit::IMP_START;

        let mut w = test_world();
        w.options.skill = Skill::Nightmare;
        w.options.respawnmonsters = true;
        let thing = MapThing { x: IMP_START.0, y: IMP_START.1, angle: 90, kind: 3001, options: 7 };
        spawn_map_thing(&mut w, &thing);
        let imp = w.mobjs.iter().find(|m| m.kind == MobjType::MT_TROOP).map(|m| m.id).unwrap();

        w.mobjs[imp].health = 0;
        kill_mobj(&mut w, None, imp);
        // the body slid away from where the imp was placed
        unset_thing_position(&mut w, imp);
        w.mobjs[imp].x = 320 * FRACUNIT;
        w.mobjs[imp].y = 128 * FRACUNIT;
        set_thing_position(&mut w, imp);

        while w.mobjs[imp].tics != -1 {
            mobj_thinker(&mut w, imp);
            w.leveltime += 1;
        }
        assert!(!w.mobjs[imp].flags.contains(MobjFlags::SOLID));
        w.mobjs[imp].movecount = 0;

        let mut waited = 0;
        while w.mobjs.contains(imp) && waited < 12 * 35 + 2 * 256 * 32 {
            mobj_thinker(&mut w, imp);
            w.leveltime += 1;
            waited += 1;
        }
        assert!(!w.mobjs.contains(imp), "corpse never respawned");
        assert!(waited >= 12 * 35);

        let new = w.mobjs.iter().find(|m| m.kind == MobjType::MT_TROOP).unwrap();
        assert_eq!((new.x, new.y), ((IMP_START.0 as Fixed) << FRACBITS, (IMP_START.1 as Fixed) << FRACBITS));
        assert_eq!(new.health, MobjType::MT_TROOP.info().spawnhealth);
        assert_eq!(new.angle, ANG45 * 2);
        assert_eq!(new.reactiontime, 18);
        assert_eq!(new.spawnpoint, thing);
        let fogs = w.mobjs.iter().filter(|m| m.kind == MobjType::MT_TFOG).count();
        assert_eq!(fogs, 2);
    }

    #[test]
    fn test_corpse_stays_down_without_respawn() {
        use crate::inter::kill_mobj;

        let mut w = test_world();
        let thing = MapThing { x: 384, y: 256, angle: 0, kind: 3001, options: 7 };
        spawn_map_thing(&mut w, &thing);
        let imp = w.mobjs.iter().find(|m| m.kind == MobjType::MT_TROOP).map(|m| m.id).unwrap();
        w.mobjs[imp].health = 0;
        kill_mobj(&mut w, None, imp);

        for _ in 0..12 * 35 + 64 * 32 {
            mobj_thinker(&mut w, imp);
            w.leveltime += 1;
        }
        assert!(w.mobjs.contains(imp));
        assert_eq!(w.mobjs[imp].tics, -1);
    }

    #[test]
    fn test_skill_bits_filter_things() {
        let mut w = test_world();
        w.options.skill = Skill::Hard;
        let easy_only = MapThing { x: 64, y: 64, angle: 90, kind: 3001, options: 1 };
        spawn_map_thing(&mut w, &easy_only);
        assert_eq!(w.totalkills, 0);

        let hard = MapThing { options: 4, ..easy_only };
        spawn_map_thing(&mut w, &hard);
        assert_eq!(w.totalkills, 1);
        let imp = w.mobjs.iter().find(|m| m.kind == MobjType::MT_TROOP).unwrap();
        assert_eq!(imp.angle, ANG45 * 2);
    }

    #[test]
    fn test_unknown_thing_is_skipped() {
        let mut w = test_world();
        let before = w.mobjs.len();
        spawn_map_thing(&mut w, &MapThing { x: 64, y: 64, angle: 0, kind: 64, options: 7 });
        assert_eq!(w.mobjs.len(), before);
    }

    #[test]
    fn test_deathmatch_starts_capped() {
        let mut w = test_world();
        let start = MapThing { x: 64, y: 64, angle: 0, kind: 11, options: 7 };
        for _ in 0..12 {
            spawn_map_thing(&mut w, &start);
        }
        assert_eq!(w.deathmatchstarts.len(), 10);
    }
}
