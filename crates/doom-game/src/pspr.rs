// pspr.rs - Weapon sprite animation, weapon objects. Action functions for weapons.

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

use doom_common::doomdef::{AmmoType, GameMode, PowerType, WeaponType, NUMWEAPONS};
use doom_common::fixed::{fixed_mul, Fixed, FRACUNIT};
use doom_common::tables::{finecosine, finesine, point_to_angle, Angle, ANG180, ANG90, FINEANGLES, FINEMASK};
use doom_common::ticcmd::BT_ATTACK;

use crate::enemy::noise_alert;
use crate::info::{MobjFlags, MobjType, SfxId, StateNum};
use crate::inter::damage_mobj;
use crate::local::{MELEERANGE, MISSILERANGE};
use crate::map::{aim_line_attack, line_attack};
use crate::mobj::{set_mobj_state, spawn_mobj, spawn_player_missile};
use crate::player::{PlayerState, NUMPSPRITES, PS_FLASH, PS_WEAPON};
use crate::world::{MobjId, World};

pub const LOWERSPEED: Fixed = FRACUNIT * 6;
pub const RAISESPEED: Fixed = FRACUNIT * 6;

pub const WEAPONBOTTOM: Fixed = 128 * FRACUNIT;
pub const WEAPONTOP: Fixed = 32 * FRACUNIT;

pub const BFGCELLS: i32 = 40;

/// Weapon info: sprite frames, ammunition use.
#[derive(Debug, Clone, Copy)]
pub struct WeaponInfo {
    pub ammo: AmmoType,
    pub upstate: StateNum,
    pub downstate: StateNum,
    pub readystate: StateNum,
    pub atkstate: StateNum,
    pub flashstate: StateNum,
}

macro_rules! weapon {
    ($ammo:ident, $up:ident, $down:ident, $ready:ident, $atk:ident, $flash:ident) => {
        WeaponInfo {
            ammo: AmmoType::$ammo,
            upstate: StateNum::$up,
            downstate: StateNum::$down,
            readystate: StateNum::$ready,
            atkstate: StateNum::$atk,
            flashstate: StateNum::$flash,
        }
    };
}

/// Indexed by `WeaponType`.
pub static WEAPONINFO: [WeaponInfo; NUMWEAPONS] = [
    // fist
    weapon!(NoAmmo, S_PUNCHUP, S_PUNCHDOWN, S_PUNCH, S_PUNCH1, S_NULL),
    // pistol
    weapon!(Clip, S_PISTOLUP, S_PISTOLDOWN, S_PISTOL, S_PISTOL1, S_PISTOLFLASH),
    // shotgun
    weapon!(Shell, S_SGUNUP, S_SGUNDOWN, S_SGUN, S_SGUN1, S_SGUNFLASH1),
    // chaingun
    weapon!(Clip, S_CHAINUP, S_CHAINDOWN, S_CHAIN, S_CHAIN1, S_CHAINFLASH1),
    // missile launcher
    weapon!(Missile, S_MISSILEUP, S_MISSILEDOWN, S_MISSILE, S_MISSILE1, S_MISSILEFLASH1),
    // plasma rifle
    weapon!(Cell, S_PLASMAUP, S_PLASMADOWN, S_PLASMA, S_PLASMA1, S_PLASMAFLASH1),
    // bfg 9000
    weapon!(Cell, S_BFGUP, S_BFGDOWN, S_BFG, S_BFG1, S_BFGFLASH1),
    // chainsaw
    weapon!(NoAmmo, S_SAWUP, S_SAWDOWN, S_SAW, S_SAW1, S_NULL),
];

#[inline]
fn weapon_info(w: &World, pnum: usize) -> &'static WeaponInfo {
    &WEAPONINFO[w.players[pnum].readyweapon as usize]
}

/// State `offset` entries after `base` in the state table.
fn state_after(base: StateNum, offset: usize) -> StateNum {
    StateNum::from_index(base as usize + offset).unwrap_or(base)
}

pub fn set_psprite(w: &mut World, pnum: usize, position: usize, stnum: StateNum) {
    let mut stnum = stnum;
    loop {
        if stnum == StateNum::S_NULL {
            // object removed itself
            w.players[pnum].psprites[position].state = None;
            break;
        }

        let st = stnum.info();
        let psp = &mut w.players[pnum].psprites[position];
        psp.state = Some(stnum);
        psp.tics = st.tics; // could be 0

        // Call action routine.
        // Modified handling.
        if st.action != crate::info::Action::None {
            crate::actions::call_psprite_action(w, pnum, position, st.action);
        }

        let psp = &w.players[pnum].psprites[position];
        let Some(state) = psp.state else {
            break;
        };
        if psp.tics != 0 {
            break;
        }
        stnum = state.info().next;
    }
}

/// Starts bringing the pending weapon up
/// from the bottom of the screen.
/// Uses player
pub fn bring_up_weapon(w: &mut World, pnum: usize) {
    let p = &mut w.players[pnum];
    let pending = p.pendingweapon.unwrap_or(p.readyweapon);

    if pending == WeaponType::Chainsaw {
        if let Some(mo) = p.mo {
            w.mobj_sound(mo, SfxId::sawup);
        }
    }

    let newstate = WEAPONINFO[pending as usize].upstate;

    let p = &mut w.players[pnum];
    p.pendingweapon = None;
    p.psprites[PS_WEAPON].sy = WEAPONBOTTOM;

    set_psprite(w, pnum, PS_WEAPON, newstate);
}

/// Returns true if there is enough ammo to shoot.
/// If not, selects the next weapon to use.
pub fn check_ammo(w: &mut World, pnum: usize) -> bool {
    let shareware = w.options.gamemode == GameMode::Shareware;
    let p = &mut w.players[pnum];
    let ammo = WEAPONINFO[p.readyweapon as usize].ammo;

    // Minimal amount for one shot varies.
    let count = if p.readyweapon == WeaponType::Bfg { BFGCELLS } else { 1 };

    // Some do not need ammunition anyway.
    // Return if current ammunition sufficient.
    match ammo.index() {
        None => return true,
        Some(a) if p.ammo[a] >= count => return true,
        _ => {}
    }

    // Out of ammo, pick a weapon to change to.
    // Preferences are set here.
    let owned = |wp: WeaponType| p.weaponowned[wp as usize];
    let has = |a: AmmoType| p.ammo[a as usize];
    let pending = if owned(WeaponType::Plasma) && has(AmmoType::Cell) != 0 && !shareware {
        WeaponType::Plasma
    } else if owned(WeaponType::Chaingun) && has(AmmoType::Clip) != 0 {
        WeaponType::Chaingun
    } else if owned(WeaponType::Shotgun) && has(AmmoType::Shell) != 0 {
        WeaponType::Shotgun
    } else if has(AmmoType::Clip) != 0 {
        WeaponType::Pistol
    } else if owned(WeaponType::Chainsaw) {
        WeaponType::Chainsaw
    } else if owned(WeaponType::Missile) && has(AmmoType::Missile) != 0 {
        WeaponType::Missile
    } else if owned(WeaponType::Bfg) && has(AmmoType::Cell) > 40 && !shareware {
        WeaponType::Bfg
    } else {
        // If everything fails.
        WeaponType::Fist
    };
    p.pendingweapon = Some(pending);

    // Now set appropriate weapon overlay.
    let downstate = weapon_info(w, pnum).downstate;
    set_psprite(w, pnum, PS_WEAPON, downstate);

    false
}

pub fn fire_weapon(w: &mut World, pnum: usize) {
    if !check_ammo(w, pnum) {
        return;
    }

    let Some(mo) = w.players[pnum].mo else {
        return;
    };
    set_mobj_state(w, mo, StateNum::S_PLAY_ATK1);
    let newstate = weapon_info(w, pnum).atkstate;
    set_psprite(w, pnum, PS_WEAPON, newstate);
    noise_alert(w, mo, mo);
}

/// Player died, so put the weapon away.
pub fn drop_weapon(w: &mut World, pnum: usize) {
    let downstate = weapon_info(w, pnum).downstate;
    set_psprite(w, pnum, PS_WEAPON, downstate);
}

/// The player can fire the weapon
/// or change to another weapon at this time.
/// Follows after getting weapon up,
/// or after previous attack/fire sequence.
pub fn a_weapon_ready(w: &mut World, pnum: usize, psp: usize) {
    let Some(mo) = w.players[pnum].mo else {
        return;
    };

    // get out of attack state
    let state = w.mobjs[mo].state;
    if state == StateNum::S_PLAY_ATK1 || state == StateNum::S_PLAY_ATK2 {
        set_mobj_state(w, mo, StateNum::S_PLAY);
    }

    let p = &w.players[pnum];
    if p.readyweapon == WeaponType::Chainsaw && p.psprites[psp].state == Some(StateNum::S_SAW) {
        w.mobj_sound(mo, SfxId::sawidl);
    }

    // check for change
    //  if player is dead, put the weapon away
    let p = &w.players[pnum];
    if p.pendingweapon.is_some() || p.health == 0 {
        // change weapon
        //  (pending weapon should allready be validated)
        let newstate = weapon_info(w, pnum).downstate;
        set_psprite(w, pnum, PS_WEAPON, newstate);
        return;
    }

    // check for fire
    //  the missile launcher and bfg do not auto fire
    let p = &mut w.players[pnum];
    if p.cmd.buttons & BT_ATTACK != 0 {
        if !p.attackdown || (p.readyweapon != WeaponType::Missile && p.readyweapon != WeaponType::Bfg) {
            p.attackdown = true;
            fire_weapon(w, pnum);
            return;
        }
    } else {
        p.attackdown = false;
    }

    // bob the weapon based on movement speed
    let leveltime = w.leveltime;
    let p = &mut w.players[pnum];
    let mut angle = (128 * leveltime) as usize & FINEMASK;
    p.psprites[psp].sx = FRACUNIT + fixed_mul(p.bob, finecosine(angle));
    angle &= FINEANGLES / 2 - 1;
    p.psprites[psp].sy = WEAPONTOP + fixed_mul(p.bob, finesine(angle));
}

/// The player can re-fire the weapon
/// without lowering it entirely.
pub fn a_refire(w: &mut World, pnum: usize, _psp: usize) {
    // check for fire
    //  (if a weaponchange is pending, let it go through instead)
    let p = &mut w.players[pnum];
    if p.cmd.buttons & BT_ATTACK != 0 && p.pendingweapon.is_none() && p.health != 0 {
        p.refire += 1;
        fire_weapon(w, pnum);
    } else {
        p.refire = 0;
        check_ammo(w, pnum);
    }
}

/// Lowers current weapon,
///  and changes weapon at bottom.
pub fn a_lower(w: &mut World, pnum: usize, psp: usize) {
    let p = &mut w.players[pnum];
    p.psprites[psp].sy += LOWERSPEED;

    // Is already down.
    if p.psprites[psp].sy < WEAPONBOTTOM {
        return;
    }

    // Player is dead.
    if p.playerstate == PlayerState::Dead {
        p.psprites[psp].sy = WEAPONBOTTOM;

        // don't bring weapon back up
        return;
    }

    // The old weapon has been lowered off the screen,
    // so change the weapon and start raising it
    if p.health == 0 {
        // Player is dead, so keep the weapon off screen.
        set_psprite(w, pnum, PS_WEAPON, StateNum::S_NULL);
        return;
    }

    if let Some(pending) = p.pendingweapon {
        p.readyweapon = pending;
    }

    bring_up_weapon(w, pnum);
}

pub fn a_raise(w: &mut World, pnum: usize, psp: usize) {
    let p = &mut w.players[pnum];
    p.psprites[psp].sy -= RAISESPEED;

    if p.psprites[psp].sy > WEAPONTOP {
        return;
    }

    p.psprites[psp].sy = WEAPONTOP;

    // The weapon has been raised all the way,
    //  so change to the ready state.
    let newstate = weapon_info(w, pnum).readystate;
    set_psprite(w, pnum, PS_WEAPON, newstate);
}

pub fn a_gun_flash(w: &mut World, pnum: usize, _psp: usize) {
    if let Some(mo) = w.players[pnum].mo {
        set_mobj_state(w, mo, StateNum::S_PLAY_ATK2);
    }
    let flash = weapon_info(w, pnum).flashstate;
    set_psprite(w, pnum, PS_FLASH, flash);
}

// ============================================================
// WEAPON ATTACKS
// ============================================================

fn turn_to_face(w: &mut World, mo: MobjId, target: MobjId) {
    let Some(t) = w.mobjs.get(target).map(|t| (t.x, t.y)) else {
        return;
    };
    let m = &mut w.mobjs[mo];
    m.angle = point_to_angle(t.0 - m.x, t.1 - m.y);
}

pub fn a_punch(w: &mut World, pnum: usize, _psp: usize) {
    let Some(mo) = w.players[pnum].mo else {
        return;
    };

    let mut damage = (w.p_random() % 10 + 1) << 1;

    if w.players[pnum].powers[PowerType::Strength as usize] != 0 {
        damage *= 10;
    }

    let angle = w.mobjs[mo].angle.wrapping_add((w.p_subrandom() << 18) as Angle);
    let (slope, linetarget) = aim_line_attack(w, mo, angle, MELEERANGE);
    line_attack(w, mo, angle, MELEERANGE, slope, damage);

    // turn to face target
    if let Some(target) = linetarget {
        w.mobj_sound(mo, SfxId::punch);
        turn_to_face(w, mo, target);
    }
}

pub fn a_saw(w: &mut World, pnum: usize, _psp: usize) {
    let Some(mo) = w.players[pnum].mo else {
        return;
    };

    let damage = 2 * (w.p_random() % 10 + 1);
    let angle = w.mobjs[mo].angle.wrapping_add((w.p_subrandom() << 18) as Angle);

    // use meleerange + 1 se the puff doesn't skip the flash
    let (slope, linetarget) = aim_line_attack(w, mo, angle, MELEERANGE + 1);
    line_attack(w, mo, angle, MELEERANGE + 1, slope, damage);

    let Some(target) = linetarget.and_then(|t| w.mobjs.get(t)).map(|t| (t.x, t.y)) else {
        w.mobj_sound(mo, SfxId::sawful);
        return;
    };
    w.mobj_sound(mo, SfxId::sawhit);

    // turn to face target
    let m = &mut w.mobjs[mo];
    let angle = point_to_angle(target.0 - m.x, target.1 - m.y);
    let delta = angle.wrapping_sub(m.angle);
    if delta > ANG180 {
        if (delta as i32) < -((ANG90 / 20) as i32) {
            m.angle = angle.wrapping_add(ANG90 / 21);
        } else {
            m.angle = m.angle.wrapping_sub(ANG90 / 20);
        }
    } else if delta > ANG90 / 20 {
        m.angle = angle.wrapping_sub(ANG90 / 21);
    } else {
        m.angle = m.angle.wrapping_add(ANG90 / 20);
    }
    m.flags.insert(MobjFlags::JUSTATTACKED);
}

fn use_ammo(w: &mut World, pnum: usize, amount: i32) {
    let p = &mut w.players[pnum];
    if let Some(a) = WEAPONINFO[p.readyweapon as usize].ammo.index() {
        p.ammo[a] -= amount;
    }
}

pub fn a_fire_missile(w: &mut World, pnum: usize, _psp: usize) {
    use_ammo(w, pnum, 1);
    if let Some(mo) = w.players[pnum].mo {
        spawn_player_missile(w, mo, MobjType::MT_ROCKET);
    }
}

pub fn a_fire_bfg(w: &mut World, pnum: usize, _psp: usize) {
    use_ammo(w, pnum, BFGCELLS);
    if let Some(mo) = w.players[pnum].mo {
        spawn_player_missile(w, mo, MobjType::MT_BFG);
    }
}

pub fn a_fire_plasma(w: &mut World, pnum: usize, _psp: usize) {
    use_ammo(w, pnum, 1);

    let flash = weapon_info(w, pnum).flashstate;
    let offset = (w.p_random() & 1) as usize;
    set_psprite(w, pnum, PS_FLASH, state_after(flash, offset));

    if let Some(mo) = w.players[pnum].mo {
        spawn_player_missile(w, mo, MobjType::MT_PLASMA);
    }
}

/// Sets a slope so a near miss is at aproximately
/// the height of the intended target
fn bullet_slope(w: &mut World, mo: MobjId) -> Fixed {
    // see which target is to be aimed at
    let mut an = w.mobjs[mo].angle;
    let (slope, target) = aim_line_attack(w, mo, an, 16 * 64 * FRACUNIT);
    if target.is_some() {
        return slope;
    }

    an = an.wrapping_add(1 << 26);
    let (slope, target) = aim_line_attack(w, mo, an, 16 * 64 * FRACUNIT);
    if target.is_some() {
        return slope;
    }

    an = an.wrapping_sub(2 << 26);
    aim_line_attack(w, mo, an, 16 * 64 * FRACUNIT).0
}

fn gun_shot(w: &mut World, mo: MobjId, accurate: bool, slope: Fixed) {
    let damage = 5 * (w.p_random() % 3 + 1);
    let Some(mut angle) = w.mobjs.get(mo).map(|m| m.angle) else {
        return;
    };

    if !accurate {
        angle = angle.wrapping_add((w.p_subrandom() << 18) as Angle);
    }

    line_attack(w, mo, angle, MISSILERANGE, slope, damage);
}

pub fn a_fire_pistol(w: &mut World, pnum: usize, _psp: usize) {
    let Some(mo) = w.players[pnum].mo else {
        return;
    };
    w.mobj_sound(mo, SfxId::pistol);

    set_mobj_state(w, mo, StateNum::S_PLAY_ATK2);
    use_ammo(w, pnum, 1);

    let flash = weapon_info(w, pnum).flashstate;
    set_psprite(w, pnum, PS_FLASH, flash);

    let slope = bullet_slope(w, mo);
    let accurate = w.players[pnum].refire == 0;
    gun_shot(w, mo, accurate, slope);
}

pub fn a_fire_shotgun(w: &mut World, pnum: usize, _psp: usize) {
    let Some(mo) = w.players[pnum].mo else {
        return;
    };
    w.mobj_sound(mo, SfxId::shotgn);
    set_mobj_state(w, mo, StateNum::S_PLAY_ATK2);

    use_ammo(w, pnum, 1);

    let flash = weapon_info(w, pnum).flashstate;
    set_psprite(w, pnum, PS_FLASH, flash);

    let slope = bullet_slope(w, mo);

    for _ in 0..7 {
        gun_shot(w, mo, false, slope);
    }
}

pub fn a_fire_cgun(w: &mut World, pnum: usize, psp: usize) {
    let Some(mo) = w.players[pnum].mo else {
        return;
    };
    w.mobj_sound(mo, SfxId::pistol);

    let p = &w.players[pnum];
    match WEAPONINFO[p.readyweapon as usize].ammo.index() {
        Some(a) if p.ammo[a] == 0 => return,
        _ => {}
    }

    set_mobj_state(w, mo, StateNum::S_PLAY_ATK2);
    use_ammo(w, pnum, 1);

    // the flash frame follows the barrel frame
    let current = w.players[pnum].psprites[psp].state.unwrap_or(StateNum::S_CHAIN1);
    let offset = (current as usize).saturating_sub(StateNum::S_CHAIN1 as usize);
    let flash = weapon_info(w, pnum).flashstate;
    set_psprite(w, pnum, PS_FLASH, state_after(flash, offset));

    let slope = bullet_slope(w, mo);
    let accurate = w.players[pnum].refire == 0;
    gun_shot(w, mo, accurate, slope);
}

pub fn a_light0(w: &mut World, pnum: usize, _psp: usize) {
    w.players[pnum].extralight = 0;
}

pub fn a_light1(w: &mut World, pnum: usize, _psp: usize) {
    w.players[pnum].extralight = 1;
}

pub fn a_light2(w: &mut World, pnum: usize, _psp: usize) {
    w.players[pnum].extralight = 2;
}

/// Spawn a BFG explosion on every monster in view
pub fn a_bfg_spray(w: &mut World, mo: MobjId) {
    let Some(source) = w.mobjs[mo].target.filter(|&t| w.mobjs.contains(t)) else {
        return;
    };
    let base = w.mobjs[mo].angle;

    // offset angles from its attack angle
    for i in 0..40u32 {
        let an = base.wrapping_sub(ANG90 / 2).wrapping_add((ANG90 / 40) * i);

        // mo->target is the originator (player)
        //  of the missile
        let (_, linetarget) = aim_line_attack(w, source, an, 16 * 64 * FRACUNIT);

        let Some(target) = linetarget.filter(|&t| w.mobjs.contains(t)) else {
            continue;
        };

        let t = &w.mobjs[target];
        let (x, y, z) = (t.x, t.y, t.z + (t.height >> 2));
        spawn_mobj(w, x, y, z, MobjType::MT_EXTRABFG);

        let mut damage = 0;
        for _ in 0..15 {
            damage += (w.p_random() & 7) + 1;
        }

        damage_mobj(w, target, Some(source), Some(source), damage);
        if !w.mobjs.contains(source) {
            return;
        }
    }
}

pub fn a_bfg_sound(w: &mut World, pnum: usize, _psp: usize) {
    if let Some(mo) = w.players[pnum].mo {
        w.mobj_sound(mo, SfxId::bfg);
    }
}

/// Called at start of level for each player.
pub fn setup_psprites(w: &mut World, pnum: usize) {
    let p = &mut w.players[pnum];

    // remove all psprites
    for psp in p.psprites.iter_mut() {
        psp.state = None;
    }

    // spawn the gun
    p.pendingweapon = Some(p.readyweapon);
    bring_up_weapon(w, pnum);
}

/// Called every tic by player thinking routine.
pub fn move_psprites(w: &mut World, pnum: usize) {
    for i in 0..NUMPSPRITES {
        let psp = &mut w.players[pnum].psprites[i];
        // a null state means not active
        let Some(state) = psp.state else {
            continue;
        };

        // drop tic count and possibly change state
        // a -1 tic count never changes
        if psp.tics != -1 {
            psp.tics -= 1;
            if psp.tics == 0 {
                set_psprite(w, pnum, i, state.info().next);
            }
        }
    }

    let p = &mut w.players[pnum];
    p.psprites[PS_FLASH].sx = p.psprites[PS_WEAPON].sx;
    p.psprites[PS_FLASH].sy = p.psprites[PS_WEAPON].sy;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_world_with_player;

    fn run_psprites(w: &mut World, tics: usize) {
        for _ in 0..tics {
            move_psprites(w, 0);
        }
    }

    #[test]
    fn test_weapon_raises_to_ready() {
        let mut w = test_world_with_player();
        assert_eq!(w.players[0].psprites[PS_WEAPON].state, Some(StateNum::S_PISTOLUP));
        // the first raise step runs as the state is entered
        assert_eq!(w.players[0].psprites[PS_WEAPON].sy, WEAPONBOTTOM - RAISESPEED);
        run_psprites(&mut w, 17);
        let psp = w.players[0].psprites[PS_WEAPON];
        assert_eq!(psp.state, Some(StateNum::S_PISTOL));
        assert_eq!(psp.sy, WEAPONTOP);
    }

    #[test]
    fn test_pistol_fires_and_uses_ammo() {
        let mut w = test_world_with_player();
        run_psprites(&mut w, 17);
        w.players[0].cmd.buttons = BT_ATTACK;
        run_psprites(&mut w, 1);
        assert!(w.players[0].attackdown);
        assert_eq!(w.players[0].psprites[PS_WEAPON].state, Some(StateNum::S_PISTOL1));
        // S_PISTOL1 lasts 4 tics before the shot
        run_psprites(&mut w, 4);
        assert_eq!(w.players[0].ammo[AmmoType::Clip as usize], 49);
        assert_eq!(w.players[0].psprites[PS_FLASH].state, Some(StateNum::S_PISTOLFLASH));
        assert_eq!(w.players[0].extralight, 1);
        assert!(w.sounds.iter().any(|s| s.sfx == SfxId::pistol));
    }

    #[test]
    fn test_empty_weapon_switches() {
        let mut w = test_world_with_player();
        run_psprites(&mut w, 17);
        w.players[0].ammo[AmmoType::Clip as usize] = 0;
        assert!(!check_ammo(&mut w, 0));
        assert_eq!(w.players[0].pendingweapon, Some(WeaponType::Fist));
        assert_eq!(w.players[0].psprites[PS_WEAPON].state, Some(StateNum::S_PISTOLDOWN));
    }

    #[test]
    fn test_weapon_change_lowers_then_raises() {
        let mut w = test_world_with_player();
        run_psprites(&mut w, 17);
        w.players[0].weaponowned[WeaponType::Shotgun as usize] = true;
        w.players[0].pendingweapon = Some(WeaponType::Shotgun);
        run_psprites(&mut w, 1);
        assert_eq!(w.players[0].psprites[PS_WEAPON].state, Some(StateNum::S_PISTOLDOWN));
        run_psprites(&mut w, 17);
        assert_eq!(w.players[0].readyweapon, WeaponType::Shotgun);
        assert_eq!(w.players[0].psprites[PS_WEAPON].state, Some(StateNum::S_SGUNUP));
    }

    #[test]
    fn test_bfg_needs_forty_cells() {
        let mut w = test_world_with_player();
        run_psprites(&mut w, 17);
        let p = &mut w.players[0];
        p.weaponowned[WeaponType::Bfg as usize] = true;
        p.readyweapon = WeaponType::Bfg;
        p.ammo[AmmoType::Cell as usize] = 39;
        w.options.gamemode = GameMode::Registered;
        assert!(!check_ammo(&mut w, 0));
        assert_eq!(w.players[0].pendingweapon, Some(WeaponType::Pistol));
        w.players[0].ammo[AmmoType::Cell as usize] = 40;
        assert!(check_ammo(&mut w, 0));
    }
}
