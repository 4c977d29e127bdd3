// user.rs - Player related stuff. Bobbing POV/weapon, movement. Pending weapon.

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

use doom_common::doomdef::{GameMode, PowerType, WeaponType};
use doom_common::fixed::{fixed_mul, Fixed, FRACUNIT};
use doom_common::tables::{finecosine, finesine, fine_index, point_to_angle, Angle, ANG180, ANG90, FINEANGLES, FINEMASK};
use doom_common::ticcmd::{BT_CHANGE, BT_SPECIAL, BT_USE};

use crate::info::{MobjFlags, StateNum};
use crate::local::VIEWHEIGHT;
use crate::map::use_lines;
use crate::mobj::set_mobj_state;
use crate::player::{Cheats, PlayerState};
use crate::pspr::move_psprites;
use crate::spec::player_in_special_sector;
use crate::world::{MobjId, World};

/// Index of the inverted palette in COLORMAP.
pub const INVERSECOLORMAP: i32 = 32;

/// 16 pixels of bob
pub const MAXBOB: Fixed = 0x100000;

const ANG5: Angle = ANG90 / 18;

/// Moves the given origin along a given angle.
pub fn thrust(w: &mut World, mo: MobjId, angle: Angle, mv: Fixed) {
    let fine = fine_index(angle);
    let m = &mut w.mobjs[mo];
    m.momx += fixed_mul(mv, finecosine(fine));
    m.momy += fixed_mul(mv, finesine(fine));
}

/// Calculate the walking / running height adjustment
pub fn calc_height(w: &mut World, pnum: usize) {
    let leveltime = w.leveltime;
    let p = &mut w.players[pnum];
    let Some(m) = p.mo.and_then(|id| w.mobjs.get(id)) else {
        return;
    };

    // Regular movement bobbing
    // (needs to be calculated for gun swing
    // even if not on ground)
    // OPTIMIZE: tablify angle
    // Note: a LUT allows for effects
    //  like a ramp with low health.
    p.bob = (fixed_mul(m.momx, m.momx) + fixed_mul(m.momy, m.momy)) >> 2;
    if p.bob > MAXBOB {
        p.bob = MAXBOB;
    }

    let onground = m.z <= m.floorz;
    if p.cheats.contains(Cheats::NOMOMENTUM) || !onground {
        p.viewz = m.z + VIEWHEIGHT;

        if p.viewz > m.ceilingz - 4 * FRACUNIT {
            p.viewz = m.ceilingz - 4 * FRACUNIT;
        }

        p.viewz = m.z + p.viewheight;
        return;
    }

    let angle = (FINEANGLES / 20 * leveltime as usize) & FINEMASK;
    let bob = fixed_mul(p.bob / 2, finesine(angle));

    // move viewheight
    if p.playerstate == PlayerState::Live {
        p.viewheight += p.deltaviewheight;

        if p.viewheight > VIEWHEIGHT {
            p.viewheight = VIEWHEIGHT;
            p.deltaviewheight = 0;
        }

        if p.viewheight < VIEWHEIGHT / 2 {
            p.viewheight = VIEWHEIGHT / 2;
            if p.deltaviewheight <= 0 {
                p.deltaviewheight = 1;
            }
        }

        if p.deltaviewheight != 0 {
            p.deltaviewheight += FRACUNIT / 4;
            if p.deltaviewheight == 0 {
                p.deltaviewheight = 1;
            }
        }
    }
    p.viewz = m.z + p.viewheight + bob;

    if p.viewz > m.ceilingz - 4 * FRACUNIT {
        p.viewz = m.ceilingz - 4 * FRACUNIT;
    }
}

pub fn move_player(w: &mut World, pnum: usize) {
    let cmd = w.players[pnum].cmd;
    let Some(mo) = w.players[pnum].mo else {
        return;
    };

    let m = &mut w.mobjs[mo];
    m.angle = m.angle.wrapping_add(((cmd.angleturn as i32) << 16) as Angle);
    let angle = m.angle;

    // Do not let the player control movement
    //  if not onground.
    let onground = m.z <= m.floorz;

    if cmd.forwardmove != 0 && onground {
        thrust(w, mo, angle, cmd.forwardmove as i32 * 2048);
    }

    if cmd.sidemove != 0 && onground {
        thrust(w, mo, angle.wrapping_sub(ANG90), cmd.sidemove as i32 * 2048);
    }

    if (cmd.forwardmove != 0 || cmd.sidemove != 0) && w.mobjs[mo].state == StateNum::S_PLAY {
        set_mobj_state(w, mo, StateNum::S_PLAY_RUN1);
    }
}

/// Fall on your face when dying.
/// Decrease POV height to floor height.
pub fn death_think(w: &mut World, pnum: usize) {
    move_psprites(w, pnum);

    // fall to the ground
    let p = &mut w.players[pnum];
    if p.viewheight > 6 * FRACUNIT {
        p.viewheight -= FRACUNIT;
    }

    if p.viewheight < 6 * FRACUNIT {
        p.viewheight = 6 * FRACUNIT;
    }

    p.deltaviewheight = 0;
    calc_height(w, pnum);

    let p = &w.players[pnum];
    let Some(mo) = p.mo else {
        return;
    };
    let attacker = p.attacker.filter(|&a| a != mo).and_then(|a| w.mobjs.get(a)).map(|a| (a.x, a.y));

    let m = &mut w.mobjs[mo];
    let p = &mut w.players[pnum];
    if let Some((ax, ay)) = attacker {
        let angle = point_to_angle(ax - m.x, ay - m.y);

        let delta = angle.wrapping_sub(m.angle);

        if delta < ANG5 || delta > ANG5.wrapping_neg() {
            // Looking at killer,
            //  so fade damage flash down.
            m.angle = angle;

            if p.damagecount != 0 {
                p.damagecount -= 1;
            }
        } else if delta < ANG180 {
            m.angle = m.angle.wrapping_add(ANG5);
        } else {
            m.angle = m.angle.wrapping_sub(ANG5);
        }
    } else if p.damagecount != 0 {
        p.damagecount -= 1;
    }

    if p.cmd.buttons & BT_USE != 0 {
        p.playerstate = PlayerState::Reborn;
    }
}

/// Runs one tic of a player: movement, weapon changes, use, power-up
/// counters.
pub fn player_think(w: &mut World, pnum: usize) {
    let Some(mo) = w.players[pnum].mo.filter(|&m| w.mobjs.contains(m)) else {
        return;
    };

    // fixme: do this in the cheat code
    let p = &mut w.players[pnum];
    let m = &mut w.mobjs[mo];
    if p.cheats.contains(Cheats::NOCLIP) {
        m.flags.insert(MobjFlags::NOCLIP);
    } else {
        m.flags.remove(MobjFlags::NOCLIP);
    }

    // chain saw run forward
    if m.flags.contains(MobjFlags::JUSTATTACKED) {
        p.cmd.angleturn = 0;
        p.cmd.forwardmove = (0xc800 / 512) as i8;
        p.cmd.sidemove = 0;
        m.flags.remove(MobjFlags::JUSTATTACKED);
    }

    if p.playerstate == PlayerState::Dead {
        death_think(w, pnum);
        return;
    }

    // Move around.
    // Reactiontime is used to prevent movement
    //  for a bit after a teleport.
    if m.reactiontime != 0 {
        m.reactiontime -= 1;
    } else {
        move_player(w, pnum);
    }

    calc_height(w, pnum);

    if w.mobjs.contains(mo) && w.level.sectors[w.sector_of(mo)].special != 0 {
        player_in_special_sector(w, pnum);
    }

    // Check for weapon change.

    // A special event has no other buttons.
    let shareware = w.options.gamemode == GameMode::Shareware;
    let p = &mut w.players[pnum];
    if p.cmd.buttons & BT_SPECIAL != 0 {
        p.cmd.buttons = 0;
    }

    if p.cmd.buttons & BT_CHANGE != 0 {
        // The actual changing of the weapon is done
        //  when the weapon psprite can do it
        //  (read: not in the middle of an attack).
        if let Some(mut newweapon) = WeaponType::from_index(p.cmd.weapon_slot()) {
            if newweapon == WeaponType::Fist
                && p.weaponowned[WeaponType::Chainsaw as usize]
                && !(p.readyweapon == WeaponType::Chainsaw && p.powers[PowerType::Strength as usize] != 0)
            {
                newweapon = WeaponType::Chainsaw;
            }

            if p.weaponowned[newweapon as usize] && newweapon != p.readyweapon {
                // Do not go to plasma or BFG in shareware,
                //  even if cheated.
                if (newweapon != WeaponType::Plasma && newweapon != WeaponType::Bfg) || !shareware {
                    p.pendingweapon = Some(newweapon);
                }
            }
        }
    }

    // check for use
    if p.cmd.buttons & BT_USE != 0 {
        if !p.usedown {
            p.usedown = true;
            use_lines(w, pnum);
        }
    } else {
        p.usedown = false;
    }

    // cycle psprites
    move_psprites(w, pnum);

    // Counters, time dependend power ups.

    // Strength counts up to diminish fade.
    let p = &mut w.players[pnum];
    let powers = &mut p.powers;
    if powers[PowerType::Strength as usize] != 0 {
        powers[PowerType::Strength as usize] += 1;
    }

    if powers[PowerType::Invulnerability as usize] != 0 {
        powers[PowerType::Invulnerability as usize] -= 1;
    }

    if powers[PowerType::Invisibility as usize] != 0 {
        powers[PowerType::Invisibility as usize] -= 1;
        if powers[PowerType::Invisibility as usize] == 0 {
            if let Some(m) = w.mobjs.get_mut(mo) {
                m.flags.remove(MobjFlags::SHADOW);
            }
        }
    }

    if powers[PowerType::Infrared as usize] != 0 {
        powers[PowerType::Infrared as usize] -= 1;
    }

    if powers[PowerType::IronFeet as usize] != 0 {
        powers[PowerType::IronFeet as usize] -= 1;
    }

    if p.damagecount != 0 {
        p.damagecount -= 1;
    }

    if p.bonuscount != 0 {
        p.bonuscount -= 1;
    }

    // Handling colormaps.
    let invul = p.powers[PowerType::Invulnerability as usize];
    let infra = p.powers[PowerType::Infrared as usize];
    p.fixedcolormap = if invul != 0 {
        if invul > 4 * 32 || (invul & 8) != 0 {
            INVERSECOLORMAP
        } else {
            0
        }
    } else if infra != 0 {
        if infra > 4 * 32 || (infra & 8) != 0 {
            // almost full bright
            1
        } else {
            0
        }
    } else {
        0
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_world_with_player;
    use doom_common::ticcmd::TicCmd;

    #[test]
    fn test_forward_move_thrusts() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.players[0].cmd = TicCmd {
            forwardmove: 25,
            ..Default::default()
        };
        player_think(&mut w, 0);
        let m = &w.mobjs[mo];
        assert_eq!(m.momx, fixed_mul(25 * 2048, finecosine(0)));
        assert_eq!(m.state, StateNum::S_PLAY_RUN1);
    }

    #[test]
    fn test_turning() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.players[0].cmd.angleturn = 0x4000;
        player_think(&mut w, 0);
        assert_eq!(w.mobjs[mo].angle, ANG90);
    }

    #[test]
    fn test_view_height_standing() {
        let mut w = test_world_with_player();
        player_think(&mut w, 0);
        assert_eq!(w.players[0].viewz, VIEWHEIGHT);
    }

    #[test]
    fn test_weapon_change_request() {
        let mut w = test_world_with_player();
        w.players[0].weaponowned[WeaponType::Shotgun as usize] = true;
        w.players[0].pendingweapon = None;
        w.players[0].cmd.buttons = TicCmd::change_weapon(2);
        player_think(&mut w, 0);
        assert_eq!(w.players[0].pendingweapon, Some(WeaponType::Shotgun));
    }

    #[test]
    fn test_shareware_refuses_plasma() {
        let mut w = test_world_with_player();
        w.players[0].weaponowned[WeaponType::Plasma as usize] = true;
        w.players[0].pendingweapon = None;
        w.players[0].cmd.buttons = TicCmd::change_weapon(5);
        player_think(&mut w, 0);
        assert_eq!(w.players[0].pendingweapon, None);
    }

    #[test]
    fn test_power_countdown_and_colormap() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.players[0].powers[PowerType::Invulnerability as usize] = 200;
        w.players[0].powers[PowerType::Invisibility as usize] = 1;
        w.mobjs[mo].flags.insert(MobjFlags::SHADOW);
        player_think(&mut w, 0);
        assert_eq!(w.players[0].powers[PowerType::Invulnerability as usize], 199);
        assert_eq!(w.players[0].fixedcolormap, INVERSECOLORMAP);
        assert!(!w.mobjs[mo].flags.contains(MobjFlags::SHADOW));
    }

    #[test]
    fn test_dead_player_respawns_on_use() {
        let mut w = test_world_with_player();
        w.players[0].playerstate = PlayerState::Dead;
        w.players[0].cmd.buttons = BT_USE;
        player_think(&mut w, 0);
        assert_eq!(w.players[0].playerstate, PlayerState::Reborn);
        assert_eq!(w.players[0].viewheight, VIEWHEIGHT - FRACUNIT);
    }
}
