// enemy.rs - Enemy thinking, AI. Action functions for monsters.

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

use log::info;

use doom_common::doomdef::{GameMode, Skill, MAXPLAYERS};
use doom_common::fixed::{fixed_mul, Fixed, FRACUNIT};
use doom_common::tables::{finecosine, finesine, fine_index, point_to_angle, ANG270, ANG90};
use doom_common::wadfiles::LineFlags;

use crate::doors::{ev_do_door, DoorKind};
use crate::floors::{ev_do_floor, FloorKind};
use crate::info::{MobjFlags, MobjType, SfxId, StateNum};
use crate::inter::damage_mobj;
use crate::local::*;
use crate::map::{aim_line_attack, line_attack, radius_attack, try_move};
use crate::maputl::{aprox_distance, line_opening};
use crate::mobj::{set_mobj_state, spawn_missile, DI_NODIR};
use crate::sight::check_sight;
use crate::switches::use_special_line;
use crate::world::{MobjId, SoundOrigin, World};

pub const DI_EAST: i32 = 0;
pub const DI_NORTHEAST: i32 = 1;
pub const DI_NORTH: i32 = 2;
pub const DI_NORTHWEST: i32 = 3;
pub const DI_WEST: i32 = 4;
pub const DI_SOUTHWEST: i32 = 5;
pub const DI_SOUTH: i32 = 6;
pub const DI_SOUTHEAST: i32 = 7;

const DIAGS: [i32; 4] = [DI_NORTHWEST, DI_NORTHEAST, DI_SOUTHWEST, DI_SOUTHEAST];

const XSPEED: [Fixed; 8] = [FRACUNIT, 47000, 0, -47000, -FRACUNIT, -47000, 0, 47000];
const YSPEED: [Fixed; 8] = [0, 47000, FRACUNIT, 47000, 0, -47000, -FRACUNIT, -47000];

const SKULLSPEED: Fixed = 20 * FRACUNIT;

fn opposite(dir: i32) -> i32 {
    if dir == DI_NODIR {
        DI_NODIR
    } else {
        (dir + 4) & 7
    }
}

// ============================================================
// ENEMY THINKING
// Enemies are allways spawned
// with targetplayer = -1, threshold = 0
// Most monsters are spawned unaware of all players,
// but some can be made preaware
// ============================================================

/// Called by noise_alert.
/// Recursively traverse adjacent sectors,
/// sound blocking lines cut off traversal.
fn recursive_sound(w: &mut World, sec: usize, soundblocks: i32, soundtarget: MobjId) {
    let validcount = w.validcount;
    let s = &mut w.level.sectors[sec];

    // wake up all monsters in this sector
    if s.validcount == validcount && s.soundtraversed <= soundblocks + 1 {
        return; // already flooded
    }

    s.validcount = validcount;
    s.soundtraversed = soundblocks + 1;
    s.soundtarget = Some(soundtarget);

    let lines = s.lines.clone();
    for check in lines {
        let line = &w.level.lines[check];
        if !line.is_two_sided() {
            continue;
        }

        if line_opening(&w.level, check).range <= 0 {
            continue; // closed door
        }

        let (Some(front), Some(back)) = (w.level.side_sector(check, 0), w.level.side_sector(check, 1)) else {
            continue;
        };
        let other = if front == sec { back } else { front };

        if line.flags.contains(LineFlags::SOUNDBLOCK) {
            if soundblocks == 0 {
                recursive_sound(w, other, 1, soundtarget);
            }
        } else {
            recursive_sound(w, other, soundblocks, soundtarget);
        }
    }
}

/// If a monster yells at a player,
/// it will alert other monsters to the player.
pub fn noise_alert(w: &mut World, target: MobjId, emitter: MobjId) {
    let Some(mo) = w.mobjs.get(emitter) else {
        return;
    };
    let sector = w.level.subsectors[mo.subsector].sector;
    w.next_validcount();
    recursive_sound(w, sector, 0, target);
}

pub fn check_melee_range(w: &mut World, actor: MobjId) -> bool {
    let mo = &w.mobjs[actor];
    let Some(target) = mo.target else {
        return false;
    };
    let Some(pl) = w.mobjs.get(target) else {
        return false;
    };

    let dist = aprox_distance(pl.x - mo.x, pl.y - mo.y);

    if dist >= MELEERANGE - 20 * FRACUNIT + pl.kind.info().radius {
        return false;
    }

    check_sight(w, actor, target)
}

pub fn check_missile_range(w: &mut World, actor: MobjId) -> bool {
    let Some(target) = w.mobjs[actor].target.filter(|&t| w.mobjs.contains(t)) else {
        return false;
    };

    if !check_sight(w, actor, target) {
        return false;
    }

    let mo = &mut w.mobjs[actor];
    if mo.flags.contains(MobjFlags::JUSTHIT) {
        // the target just hit the enemy,
        // so fight back!
        mo.flags.remove(MobjFlags::JUSTHIT);
        return true;
    }

    if mo.reactiontime != 0 {
        return false; // do not attack yet
    }

    let mo = &w.mobjs[actor];
    let tg = &w.mobjs[target];
    let mut dist = aprox_distance(mo.x - tg.x, mo.y - tg.y) - 64 * FRACUNIT;

    if mo.kind.info().meleestate == StateNum::S_NULL {
        dist -= 128 * FRACUNIT; // no melee attack, so fire more
    }

    dist >>= 16;

    if matches!(mo.kind, MobjType::MT_CYBORG | MobjType::MT_SPIDER | MobjType::MT_SKULL) {
        dist >>= 1;
    }

    dist = dist.min(200);

    if mo.kind == MobjType::MT_CYBORG && dist > 160 {
        dist = 160;
    }

    w.p_random() >= dist
}

/// Move in the current direction,
/// returns false if the move is blocked.
pub fn do_move(w: &mut World, actor: MobjId) -> bool {
    let mo = &w.mobjs[actor];
    if mo.movedir == DI_NODIR {
        return false;
    }

    let Some(dir) = usize::try_from(mo.movedir).ok().filter(|&d| d < 8) else {
        return false;
    };

    let speed = mo.kind.info().speed;
    let tryx = mo.x + speed * XSPEED[dir];
    let tryy = mo.y + speed * YSPEED[dir];

    let result = try_move(w, actor, tryx, tryy);

    let Some(mo) = w.mobjs.get_mut(actor) else {
        return false;
    };

    if !result.ok {
        // open any specials
        if mo.flags.contains(MobjFlags::FLOAT) && result.floatok {
            // must adjust height
            if mo.z < result.floorz {
                mo.z += FLOATSPEED;
            } else {
                mo.z -= FLOATSPEED;
            }

            mo.flags.insert(MobjFlags::INFLOAT);
            return true;
        }

        if result.spechit.is_empty() {
            return false;
        }

        mo.movedir = DI_NODIR;
        let mut good = false;
        for &ld in result.spechit.iter().rev() {
            // if the special is not a door
            // that can be opened,
            // return false
            if use_special_line(w, actor, ld, 0) {
                good = true;
            }
        }
        return good;
    }

    mo.flags.remove(MobjFlags::INFLOAT);

    if !mo.flags.contains(MobjFlags::FLOAT) {
        mo.z = mo.floorz;
    }
    true
}

/// Attempts to move actor on
/// in its current (ob->moveangle) direction.
/// If blocked by either a wall or an actor
/// returns FALSE
/// If move is either clear or blocked only by a door,
/// returns TRUE and sets...
/// If a door is in the way,
/// an OpenDoor call is made to start it opening.
fn try_walk(w: &mut World, actor: MobjId) -> bool {
    if !do_move(w, actor) {
        return false;
    }

    let r = w.p_random() & 15;
    if let Some(mo) = w.mobjs.get_mut(actor) {
        mo.movecount = r;
    }
    true
}

fn set_dir_and_walk(w: &mut World, actor: MobjId, dir: i32) -> bool {
    w.mobjs[actor].movedir = dir;
    try_walk(w, actor)
}

pub fn new_chase_dir(w: &mut World, actor: MobjId) {
    let mo = &w.mobjs[actor];
    let Some(target) = mo.target.and_then(|t| w.mobjs.get(t)) else {
        return;
    };

    let olddir = mo.movedir;
    let turnaround = opposite(olddir);

    let deltax = target.x - mo.x;
    let deltay = target.y - mo.y;

    let mut d = [0, 0, 0];
    d[1] = if deltax > 10 * FRACUNIT {
        DI_EAST
    } else if deltax < -10 * FRACUNIT {
        DI_WEST
    } else {
        DI_NODIR
    };

    d[2] = if deltay < -10 * FRACUNIT {
        DI_SOUTH
    } else if deltay > 10 * FRACUNIT {
        DI_NORTH
    } else {
        DI_NODIR
    };

    // try direct route
    if d[1] != DI_NODIR && d[2] != DI_NODIR {
        let dir = DIAGS[(((deltay < 0) as usize) << 1) + (deltax > 0) as usize];
        w.mobjs[actor].movedir = dir;
        if dir != turnaround && try_walk(w, actor) {
            return;
        }
    }

    // try other directions
    if w.p_random() > 200 || deltay.abs() > deltax.abs() {
        d.swap(1, 2);
    }

    if d[1] == turnaround {
        d[1] = DI_NODIR;
    }
    if d[2] == turnaround {
        d[2] = DI_NODIR;
    }

    if d[1] != DI_NODIR && set_dir_and_walk(w, actor, d[1]) {
        // either moved forward or attacked
        return;
    }

    if d[2] != DI_NODIR && set_dir_and_walk(w, actor, d[2]) {
        return;
    }

    // there is no direct path to the player,
    // so pick another direction.
    if olddir != DI_NODIR && set_dir_and_walk(w, actor, olddir) {
        return;
    }

    // randomly determine direction of search
    if w.p_random() & 1 != 0 {
        for tdir in DI_EAST..=DI_SOUTHEAST {
            if tdir != turnaround && set_dir_and_walk(w, actor, tdir) {
                return;
            }
        }
    } else {
        for tdir in (DI_EAST..=DI_SOUTHEAST).rev() {
            if tdir != turnaround && set_dir_and_walk(w, actor, tdir) {
                return;
            }
        }
    }

    if turnaround != DI_NODIR && set_dir_and_walk(w, actor, turnaround) {
        return;
    }

    if let Some(mo) = w.mobjs.get_mut(actor) {
        mo.movedir = DI_NODIR; // can not move
    }
}

/// If allaround is false, only look 180 degrees in front.
/// Returns true if a player is targeted.
pub fn look_for_players(w: &mut World, actor: MobjId, allaround: bool) -> bool {
    if !w.playeringame.iter().any(|&p| p) {
        return false;
    }

    let mut c = 0;
    let stop = w.mobjs[actor].lastlook.wrapping_sub(1) & 3;

    loop {
        let lastlook = w.mobjs[actor].lastlook;
        if w.playeringame[lastlook] {
            // done looking
            c += 1;
            if c == 3 || lastlook == stop {
                return false;
            }

            let player = &w.players[lastlook];
            if player.health > 0 {
                if let Some(pmo) = player.mo.filter(|&m| w.mobjs.contains(m)) {
                    if check_sight(w, actor, pmo) && (allaround || in_front_or_close(w, actor, pmo)) {
                        w.mobjs[actor].target = Some(pmo);
                        return true;
                    }
                }
            }
        }
        let mo = &mut w.mobjs[actor];
        mo.lastlook = (mo.lastlook + 1) & (MAXPLAYERS - 1);
    }
}

/// Players behind a monster are only noticed when they come close.
fn in_front_or_close(w: &World, actor: MobjId, pmo: MobjId) -> bool {
    let mo = &w.mobjs[actor];
    let pl = &w.mobjs[pmo];
    let an = point_to_angle(pl.x - mo.x, pl.y - mo.y).wrapping_sub(mo.angle);

    if an > ANG90 && an < ANG270 {
        let dist = aprox_distance(pl.x - mo.x, pl.y - mo.y);
        // if real close, react anyway
        if dist > MELEERANGE {
            return false; // behind back
        }
    }
    true
}

// ============================================================
// ACTION ROUTINES
// ============================================================

/// Stay in state until a player is sighted.
pub fn a_look(w: &mut World, actor: MobjId) {
    let sector = w.sector_of(actor);
    let mo = &mut w.mobjs[actor];
    mo.threshold = 0; // any shot will wake up

    let ambush = mo.flags.contains(MobjFlags::AMBUSH);
    let heard = w.level.sectors[sector]
        .soundtarget
        .filter(|&t| w.mobjs.get(t).is_some_and(|m| m.flags.contains(MobjFlags::SHOOTABLE)));

    let mut seen = false;
    if let Some(targ) = heard {
        w.mobjs[actor].target = Some(targ);
        seen = !ambush || check_sight(w, actor, targ);
    }

    if !seen && !look_for_players(w, actor, false) {
        return;
    }

    // go into chase state
    let kind = w.mobjs[actor].kind;
    let info = kind.info();
    if info.seesound != SfxId::None {
        let sound = match info.seesound {
            SfxId::posit1 | SfxId::posit2 | SfxId::posit3 => {
                [SfxId::posit1, SfxId::posit2, SfxId::posit3][(w.p_random() % 3) as usize]
            }
            SfxId::bgsit1 | SfxId::bgsit2 => [SfxId::bgsit1, SfxId::bgsit2][(w.p_random() % 2) as usize],
            s => s,
        };

        if kind == MobjType::MT_SPIDER || kind == MobjType::MT_CYBORG {
            // full volume
            w.start_sound(SoundOrigin::Global, sound);
        } else {
            w.mobj_sound(actor, sound);
        }
    }

    set_mobj_state(w, actor, info.seestate);
}

/// Actor has a melee attack,
/// so it tries to close as fast as possible
pub fn a_chase(w: &mut World, actor: MobjId) {
    let mo = &w.mobjs[actor];
    let target_alive = mo.target.and_then(|t| w.mobjs.get(t)).map(|t| t.health > 0);
    let target_shootable = mo
        .target
        .and_then(|t| w.mobjs.get(t))
        .is_some_and(|t| t.flags.contains(MobjFlags::SHOOTABLE));

    let mo = &mut w.mobjs[actor];
    if mo.reactiontime != 0 {
        mo.reactiontime -= 1;
    }

    // modify target threshold
    if mo.threshold != 0 {
        if target_alive != Some(true) {
            mo.threshold = 0;
        } else {
            mo.threshold -= 1;
        }
    }

    // turn towards movement direction if not there yet
    if mo.movedir < 8 {
        mo.angle &= 7 << 29;
        let delta = mo.angle.wrapping_sub((mo.movedir as u32) << 29) as i32;

        if delta > 0 {
            mo.angle = mo.angle.wrapping_sub(ANG90 / 2);
        } else if delta < 0 {
            mo.angle = mo.angle.wrapping_add(ANG90 / 2);
        }
    }

    let info = mo.kind.info();
    if !target_shootable {
        // look for a new target
        if look_for_players(w, actor, true) {
            return; // got a new target
        }

        set_mobj_state(w, actor, info.spawnstate);
        return;
    }

    // do not attack twice in a row
    let mo = &mut w.mobjs[actor];
    if mo.flags.contains(MobjFlags::JUSTATTACKED) {
        mo.flags.remove(MobjFlags::JUSTATTACKED);
        if w.options.skill != Skill::Nightmare && !w.options.fastparm {
            new_chase_dir(w, actor);
        }
        return;
    }

    // check for melee attack
    if info.meleestate != StateNum::S_NULL && check_melee_range(w, actor) {
        w.mobj_sound(actor, info.attacksound);
        set_mobj_state(w, actor, info.meleestate);
        return;
    }

    // check for missile attack
    if info.missilestate != StateNum::S_NULL {
        let movecount = w.mobjs[actor].movecount;
        let wait = w.options.skill < Skill::Nightmare && !w.options.fastparm && movecount != 0;
        if !wait && check_missile_range(w, actor) {
            set_mobj_state(w, actor, info.missilestate);
            if let Some(mo) = w.mobjs.get_mut(actor) {
                mo.flags.insert(MobjFlags::JUSTATTACKED);
            }
            return;
        }
    }

    // possibly choose another target
    let mo = &w.mobjs[actor];
    if w.options.netgame && mo.threshold == 0 {
        if let Some(target) = mo.target {
            if !check_sight(w, actor, target) && look_for_players(w, actor, true) {
                return; // got a new target
            }
        }
    }

    // chase towards player
    let mo = &mut w.mobjs[actor];
    mo.movecount -= 1;
    if mo.movecount < 0 || !do_move(w, actor) {
        new_chase_dir(w, actor);
    }

    // make active sound
    if info.activesound != SfxId::None && w.p_random() < 3 {
        w.mobj_sound(actor, info.activesound);
    }
}

pub fn a_face_target(w: &mut World, actor: MobjId) {
    let mo = &w.mobjs[actor];
    let Some(target) = mo.target.and_then(|t| w.mobjs.get(t)) else {
        return;
    };

    let angle = point_to_angle(target.x - mo.x, target.y - mo.y);
    let shadow = target.flags.contains(MobjFlags::SHADOW);

    let fuzz = if shadow { w.p_subrandom() << 21 } else { 0 };

    let mo = &mut w.mobjs[actor];
    mo.flags.remove(MobjFlags::AMBUSH);
    mo.angle = angle.wrapping_add(fuzz as u32);
}

fn has_target(w: &World, actor: MobjId) -> Option<MobjId> {
    w.mobjs[actor].target.filter(|&t| w.mobjs.contains(t))
}

pub fn a_pos_attack(w: &mut World, actor: MobjId) {
    if has_target(w, actor).is_none() {
        return;
    }

    a_face_target(w, actor);
    let angle = w.mobjs[actor].angle;
    let (slope, _) = aim_line_attack(w, actor, angle, MISSILERANGE);

    w.mobj_sound(actor, SfxId::pistol);
    let angle = angle.wrapping_add((w.p_subrandom() << 20) as u32);
    let damage = ((w.p_random() % 5) + 1) * 3;
    line_attack(w, actor, angle, MISSILERANGE, slope, damage);
}

pub fn a_spos_attack(w: &mut World, actor: MobjId) {
    if has_target(w, actor).is_none() {
        return;
    }

    w.mobj_sound(actor, SfxId::shotgn);
    a_face_target(w, actor);
    let bangle = w.mobjs[actor].angle;
    let (slope, _) = aim_line_attack(w, actor, bangle, MISSILERANGE);

    for _ in 0..3 {
        let angle = bangle.wrapping_add((w.p_subrandom() << 20) as u32);
        let damage = ((w.p_random() % 5) + 1) * 3;
        line_attack(w, actor, angle, MISSILERANGE, slope, damage);
        if !w.mobjs.contains(actor) {
            return;
        }
    }
}

pub fn a_spid_refire(w: &mut World, actor: MobjId) {
    // keep firing unless target got out of sight
    a_face_target(w, actor);

    if w.p_random() < 10 {
        return;
    }

    let lost = match has_target(w, actor) {
        None => true,
        Some(t) => w.mobjs[t].health <= 0 || !check_sight(w, actor, t),
    };
    if lost {
        let seestate = w.mobjs[actor].kind.info().seestate;
        set_mobj_state(w, actor, seestate);
    }
}

pub fn a_troop_attack(w: &mut World, actor: MobjId) {
    let Some(target) = has_target(w, actor) else {
        return;
    };

    a_face_target(w, actor);
    if check_melee_range(w, actor) {
        w.mobj_sound(actor, SfxId::claw);
        let damage = (w.p_random() % 8 + 1) * 3;
        damage_mobj(w, target, Some(actor), Some(actor), damage);
        return;
    }

    // launch a missile
    spawn_missile(w, actor, target, MobjType::MT_TROOPSHOT);
}

pub fn a_sarg_attack(w: &mut World, actor: MobjId) {
    let Some(target) = has_target(w, actor) else {
        return;
    };

    a_face_target(w, actor);
    if check_melee_range(w, actor) {
        let damage = ((w.p_random() % 10) + 1) * 4;
        damage_mobj(w, target, Some(actor), Some(actor), damage);
    }
}

pub fn a_head_attack(w: &mut World, actor: MobjId) {
    let Some(target) = has_target(w, actor) else {
        return;
    };

    a_face_target(w, actor);
    if check_melee_range(w, actor) {
        let damage = (w.p_random() % 6 + 1) * 10;
        damage_mobj(w, target, Some(actor), Some(actor), damage);
        return;
    }

    // launch a missile
    spawn_missile(w, actor, target, MobjType::MT_HEADSHOT);
}

pub fn a_cyber_attack(w: &mut World, actor: MobjId) {
    let Some(target) = has_target(w, actor) else {
        return;
    };

    a_face_target(w, actor);
    spawn_missile(w, actor, target, MobjType::MT_ROCKET);
}

pub fn a_bruis_attack(w: &mut World, actor: MobjId) {
    let Some(target) = has_target(w, actor) else {
        return;
    };

    if check_melee_range(w, actor) {
        w.mobj_sound(actor, SfxId::claw);
        let damage = (w.p_random() % 8 + 1) * 10;
        damage_mobj(w, target, Some(actor), Some(actor), damage);
        return;
    }

    // launch a missile
    spawn_missile(w, actor, target, MobjType::MT_BRUISERSHOT);
}

/// Fly at the player like a missile.
pub fn a_skull_attack(w: &mut World, actor: MobjId) {
    let Some(dest) = has_target(w, actor) else {
        return;
    };

    w.mobjs[actor].flags.insert(MobjFlags::SKULLFLY);
    let attacksound = w.mobjs[actor].kind.info().attacksound;
    w.mobj_sound(actor, attacksound);
    a_face_target(w, actor);

    let (dx, dy, dz, dh) = {
        let d = &w.mobjs[dest];
        (d.x, d.y, d.z, d.height)
    };
    let mo = &mut w.mobjs[actor];
    let an = fine_index(mo.angle);
    mo.momx = fixed_mul(SKULLSPEED, finecosine(an));
    mo.momy = fixed_mul(SKULLSPEED, finesine(an));
    let dist = (aprox_distance(dx - mo.x, dy - mo.y) / SKULLSPEED).max(1);
    mo.momz = (dz + (dh >> 1) - mo.z) / dist;
}

pub fn a_scream(w: &mut World, actor: MobjId) {
    let kind = w.mobjs[actor].kind;
    let sound = match kind.info().deathsound {
        SfxId::None => return,
        SfxId::podth1 | SfxId::podth2 | SfxId::podth3 => {
            [SfxId::podth1, SfxId::podth2, SfxId::podth3][(w.p_random() % 3) as usize]
        }
        SfxId::bgdth1 | SfxId::bgdth2 => [SfxId::bgdth1, SfxId::bgdth2][(w.p_random() % 2) as usize],
        s => s,
    };

    // Check for bosses.
    if kind == MobjType::MT_SPIDER || kind == MobjType::MT_CYBORG {
        // full volume
        w.start_sound(SoundOrigin::Global, sound);
    } else {
        w.mobj_sound(actor, sound);
    }
}

pub fn a_xscream(w: &mut World, actor: MobjId) {
    w.mobj_sound(actor, SfxId::slop);
}

pub fn a_pain(w: &mut World, actor: MobjId) {
    let painsound = w.mobjs[actor].kind.info().painsound;
    w.mobj_sound(actor, painsound);
}

pub fn a_fall(w: &mut World, actor: MobjId) {
    // actor is on ground, it can be walked over
    w.mobjs[actor].flags.remove(MobjFlags::SOLID);
}

pub fn a_explode(w: &mut World, thingy: MobjId) {
    let source = w.mobjs[thingy].target;
    radius_attack(w, thingy, source, 128);
}

/// Possibly trigger special effects
/// if on first boss level
pub fn a_boss_death(w: &mut World, mo: MobjId) {
    let kind = w.mobjs[mo].kind;
    let (episode, map) = (w.options.episode, w.options.map);

    // no Doom II bosses
    if w.options.gamemode == GameMode::Commercial {
        return;
    }

    let boss_map = match episode {
        1 => map == 8 && kind == MobjType::MT_BRUISER,
        2 => map == 8 && kind == MobjType::MT_CYBORG,
        3 => map == 8 && kind == MobjType::MT_SPIDER,
        4 => match map {
            6 => kind == MobjType::MT_CYBORG,
            8 => kind == MobjType::MT_SPIDER,
            _ => false,
        },
        _ => map == 8,
    };
    if !boss_map {
        return;
    }

    // make sure there is a player alive for victory
    let alive = (0..MAXPLAYERS).any(|i| w.playeringame[i] && w.players[i].health > 0);
    if !alive {
        return; // no one left alive, so do not end game
    }

    // scan the remaining thinkers to see
    // if all bosses are dead
    if w.mobjs.iter().any(|m| m.id != mo && m.kind == kind && m.health > 0) {
        // other boss not dead
        return;
    }

    // victory!
    info!("boss {:?} dead on E{}M{}", kind, episode, map);
    match (episode, map) {
        (1, _) | (4, 8) => {
            ev_do_floor(w, 666, None, FloorKind::LowerFloorToLowest);
        }
        (4, 6) => {
            ev_do_door(w, 666, DoorKind::BlazeOpen);
        }
        _ => w.exit_level(),
    }
}

pub fn a_hoof(w: &mut World, mo: MobjId) {
    w.mobj_sound(mo, SfxId::hoof);
    a_chase(w, mo);
}

pub fn a_metal(w: &mut World, mo: MobjId) {
    w.mobj_sound(mo, SfxId::metal);
    a_chase(w, mo);
}

pub fn a_player_scream(w: &mut World, mo: MobjId) {
    // Default death sound.
    let mut sound = SfxId::pldeth;

    if w.options.gamemode == GameMode::Commercial && w.mobjs[mo].health < -50 {
        // IF THE PLAYER DIES
        // LESS THAN -50% WITHOUT GIBBING
        sound = SfxId::pdiehi;
    }

    w.mobj_sound(mo, sound);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mobj::spawn_mobj;
    use crate::testutil::{test_world, test_world_with_player};
    use doom_common::tables::ANG180;
    use doom_common::testkit::{IMP_START, PLAYER_START};

    fn spawn_imp(w: &mut World) -> MobjId {
        spawn_mobj(
            w,
            IMP_START.0 as i32 * FRACUNIT,
            IMP_START.1 as i32 * FRACUNIT,
            ONFLOORZ,
            MobjType::MT_TROOP,
        )
    }

    #[test]
    fn test_noise_alert_floods_open_sectors() {
        let mut w = test_world_with_player();
        let pmo = w.players[0].mo.unwrap();
        noise_alert(&mut w, pmo, pmo);
        assert_eq!(w.level.sectors[0].soundtarget, Some(pmo));
        assert_eq!(w.level.sectors[1].soundtarget, Some(pmo));
    }

    #[test]
    fn test_look_sees_player_in_front() {
        let mut w = test_world_with_player();
        let imp = spawn_imp(&mut w);
        // imp faces west, towards the player
        w.mobjs[imp].angle = ANG180;
        w.mobjs[imp].lastlook = 0;
        a_look(&mut w, imp);
        let pmo = w.players[0].mo;
        assert_eq!(w.mobjs[imp].target, pmo);
        assert_eq!(w.mobjs[imp].state, StateNum::S_TROO_RUN1);
    }

    #[test]
    fn test_look_ignores_player_behind() {
        let mut w = test_world_with_player();
        let imp = spawn_imp(&mut w);
        w.mobjs[imp].angle = 0;
        w.mobjs[imp].lastlook = 0;
        a_look(&mut w, imp);
        assert_eq!(w.mobjs[imp].target, None);
        assert_eq!(w.mobjs[imp].state, StateNum::S_TROO_STND);
    }

    #[test]
    fn test_chase_without_target_returns_to_spawn() {
        let mut w = test_world();
        let imp = spawn_imp(&mut w);
        set_mobj_state(&mut w, imp, StateNum::S_TROO_RUN1);
        a_chase(&mut w, imp);
        assert_eq!(w.mobjs[imp].state, StateNum::S_TROO_STND);
    }

    #[test]
    fn test_chase_dir_heads_for_target() {
        let mut w = test_world_with_player();
        let imp = spawn_imp(&mut w);
        w.mobjs[imp].target = w.players[0].mo;
        w.mobjs[imp].movedir = DI_NODIR;
        let x = w.mobjs[imp].x;
        new_chase_dir(&mut w, imp);
        assert_eq!(w.mobjs[imp].movedir, DI_WEST);
        assert!(w.mobjs[imp].x < x);
    }

    #[test]
    fn test_melee_range() {
        let mut w = test_world_with_player();
        let pmo = w.players[0].mo.unwrap();
        let near = spawn_mobj(
            &mut w,
            (PLAYER_START.0 as i32 + 50) * FRACUNIT,
            PLAYER_START.1 as i32 * FRACUNIT,
            ONFLOORZ,
            MobjType::MT_SERGEANT,
        );
        w.mobjs[near].target = Some(pmo);
        assert!(check_melee_range(&mut w, near));

        let imp = spawn_imp(&mut w);
        w.mobjs[imp].target = Some(pmo);
        assert!(!check_melee_range(&mut w, imp));
    }

    #[test]
    fn test_skull_attack_launches() {
        let mut w = test_world_with_player();
        let skull = spawn_mobj(
            &mut w,
            IMP_START.0 as i32 * FRACUNIT,
            IMP_START.1 as i32 * FRACUNIT,
            ONFLOORZ,
            MobjType::MT_SKULL,
        );
        w.mobjs[skull].target = w.players[0].mo;
        a_skull_attack(&mut w, skull);
        let mo = &w.mobjs[skull];
        assert!(mo.flags.contains(MobjFlags::SKULLFLY));
        assert!(mo.momx < 0);
        assert_eq!(mo.angle, ANG180);
    }

    #[test]
    fn test_troop_attack_spawns_fireball() {
        let mut w = test_world_with_player();
        let imp = spawn_imp(&mut w);
        w.mobjs[imp].target = w.players[0].mo;
        a_troop_attack(&mut w, imp);
        assert!(w.mobjs.iter().any(|m| m.kind == MobjType::MT_TROOPSHOT));
    }

    #[test]
    fn test_boss_death_lowers_tagged_floor() {
        let mut w = test_world_with_player();
        w.options.map = 8;
        w.level.sectors[1].tag = 666;
        w.level.sectors[1].floorheight = 64 * FRACUNIT;
        let baron = spawn_mobj(&mut w, IMP_START.0 as i32 * FRACUNIT, 100 * FRACUNIT, 64 * FRACUNIT, MobjType::MT_BRUISER);
        w.mobjs[baron].health = 0;
        a_boss_death(&mut w, baron);
        assert!(w.level.sectors[1].specialdata.is_some());
        assert!(w.exit.is_none());
    }

    #[test]
    fn test_fall_clears_solid() {
        let mut w = test_world();
        let imp = spawn_imp(&mut w);
        a_fall(&mut w, imp);
        assert!(!w.mobjs[imp].flags.contains(MobjFlags::SOLID));
    }
}
