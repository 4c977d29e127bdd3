// player.rs - Per-player state

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

use bitflags::bitflags;

use doom_common::doomdef::{AmmoType, WeaponType, MAXAMMO, MAXPLAYERS, NUMAMMO, NUMCARDS, NUMPOWERS, NUMWEAPONS};
use doom_common::fixed::Fixed;
use doom_common::ticcmd::TicCmd;

use crate::info::StateNum;
use crate::world::MobjId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Playing or camping.
    #[default]
    Live,
    /// Dead on the ground, view follows killer.
    Dead,
    /// Ready to restart/respawn.
    Reborn,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Cheats: u32 {
        /// No clipping, walk through barriers.
        const NOCLIP = 1;
        /// No damage, no health loss.
        const GODMODE = 2;
        /// Not really a cheat, just a debug aid.
        const NOMOMENTUM = 4;
    }
}

/// Player sprite slots: the weapon and its muzzle flash.
pub const PS_WEAPON: usize = 0;
pub const PS_FLASH: usize = 1;
pub const NUMPSPRITES: usize = 2;

/// An overlay sprite drawn in front of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PspDef {
    /// `None` means not active.
    pub state: Option<StateNum>,
    pub tics: i32,
    pub sx: Fixed,
    pub sy: Fixed,
}

#[derive(Debug, Clone, Default)]
pub struct Player {
    pub mo: Option<MobjId>,
    pub playerstate: PlayerState,
    pub cmd: TicCmd,

    /// Focal origin above mo.z.
    pub viewz: Fixed,
    /// Base height above floor for viewz.
    pub viewheight: Fixed,
    /// Bob/squat speed.
    pub deltaviewheight: Fixed,
    /// Bounded/scaled total momentum.
    pub bob: Fixed,

    /// This is only used between levels, mo.health is used during levels.
    pub health: i32,
    pub armorpoints: i32,
    /// Armor type is 0-2.
    pub armortype: i32,

    /// Power ups. invinc and invis are tic counters.
    pub powers: [i32; NUMPOWERS],
    pub cards: [bool; NUMCARDS],
    pub backpack: bool,

    /// Frags, kills of other players.
    pub frags: [i32; MAXPLAYERS],
    pub readyweapon: WeaponType,
    /// `None` if not changing.
    pub pendingweapon: Option<WeaponType>,

    pub weaponowned: [bool; NUMWEAPONS],
    pub ammo: [i32; NUMAMMO],
    pub maxammo: [i32; NUMAMMO],

    /// True if button down last tic.
    pub attackdown: bool,
    pub usedown: bool,

    pub cheats: Cheats,

    /// Refired shots are less accurate.
    pub refire: i32,

    /// For intermission stats.
    pub killcount: i32,
    pub itemcount: i32,
    pub secretcount: i32,

    /// Hint messages.
    pub message: Option<&'static str>,

    /// For screen flashing (red or bright).
    pub damagecount: i32,
    pub bonuscount: i32,

    /// Who did damage (`None` for floors/ceilings).
    pub attacker: Option<MobjId>,

    /// So gun flashes light up areas.
    pub extralight: i32,

    /// Current PLAYPAL, can be set to REDCOLORMAP for pain, etc.
    pub fixedcolormap: i32,

    /// Player skin colorshift, 0-3 for which color to draw player.
    pub colormap: i32,

    pub psprites: [PspDef; NUMPSPRITES],

    /// True if secret level has been done.
    pub didsecret: bool,
}

impl Player {
    /// Fresh state for a player entering a game or respawning after death
    /// in single player.
    pub fn reborn(&mut self) {
        let frags = self.frags;
        let killcount = self.killcount;
        let itemcount = self.itemcount;
        let secretcount = self.secretcount;

        *self = Player {
            frags,
            killcount,
            itemcount,
            secretcount,
            usedown: true,
            attackdown: true,
            playerstate: PlayerState::Live,
            health: crate::local::MAXHEALTH,
            readyweapon: WeaponType::Pistol,
            pendingweapon: Some(WeaponType::Pistol),
            maxammo: MAXAMMO,
            ..Default::default()
        };
        self.weaponowned[WeaponType::Fist as usize] = true;
        self.weaponowned[WeaponType::Pistol as usize] = true;
        self.ammo[AmmoType::Clip as usize] = 50;
    }

    /// State carried to the next level: powers, keys and some bookkeeping
    /// are dropped.
    pub fn finish_level(&mut self) {
        self.powers = [0; NUMPOWERS];
        self.cards = [false; NUMCARDS];
        self.extralight = 0;
        self.fixedcolormap = 0;
        self.damagecount = 0;
        self.bonuscount = 0;
        self.mo = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reborn_keeps_stats() {
        let mut p = Player {
            killcount: 7,
            frags: [1, 2, 0, 0],
            health: 3,
            ..Default::default()
        };
        p.weaponowned[WeaponType::Bfg as usize] = true;
        p.reborn();
        assert_eq!(p.killcount, 7);
        assert_eq!(p.frags, [1, 2, 0, 0]);
        assert_eq!(p.health, 100);
        assert!(!p.weaponowned[WeaponType::Bfg as usize]);
        assert!(p.weaponowned[WeaponType::Pistol as usize]);
        assert_eq!(p.ammo[AmmoType::Clip as usize], 50);
    }
}
