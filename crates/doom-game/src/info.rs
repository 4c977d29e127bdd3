// info.rs - Sprite, state, thing and sound tables

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
use doom_common::fixed::{Fixed, FRACUNIT};

/// Frame bit for full bright drawing.
pub const FF_FULLBRIGHT: i32 = 0x8000;
pub const FF_FRAMEMASK: i32 = 0x7fff;

const FF: i32 = FF_FULLBRIGHT;
const F: Fixed = FRACUNIT;

macro_rules! unit {
    ($t:tt) => {
        ()
    };
}

// ============================================================
// Sprites
// ============================================================

macro_rules! define_sprites {
    ($($name:ident),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum SpriteNum { $($name),* }

        pub const NUMSPRITES: usize = <[()]>::len(&[$(unit!($name)),*]);

        /// Lump name prefixes in `SpriteNum` order.
        pub const SPRNAMES: [&str; NUMSPRITES] = [$(stringify!($name)),*];
    };
}

define_sprites! {
    TROO, SHTG, PUNG, PISG, PISF, SHTF, CHGG, CHGF, MISG, MISF, SAWG, PLSG, PLSF, BFGG, BFGF,
    BLUD, PUFF, BAL1, BAL2, PLSS, PLSE, MISL, BFS1, BFE1, BFE2, TFOG, IFOG, PLAY, POSS, SPOS,
    SARG, HEAD, BAL7, BOSS, SKUL, SPID, CYBR, BAR1, BEXP, ARM1, ARM2, BON1, BON2, BKEY, RKEY,
    YKEY, BSKU, RSKU, YSKU, STIM, MEDI, SOUL, PINV, PSTR, PINS, SUIT, PMAP, PVIS, CLIP, AMMO,
    ROCK, BROK, CELL, CELP, SHEL, SBOX, BPAK, BFUG, MGUN, CSAW, LAUN, PLAS, SHOT, COLU, GOR1,
    POL2, POL5, POL4, POL3, POL1, POL6, GOR2, GOR3, GOR4, GOR5, SMIT, COL1, COL2, COL3, COL4,
    CAND, CBRA, COL6, TRE1, TRE2, ELEC, CEYE, FSKU, COL5, TBLU, TGRN, TRED, SMBT, SMGT, SMRT,
}

// ============================================================
// Sounds
// ============================================================

macro_rules! define_sounds {
    ($($name:ident),* $(,)?) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(u16)]
        pub enum SfxId {
            #[default]
            None,
            $($name),*
        }

        impl SfxId {
            /// Sound lump name, e.g. `DSPISTOL`.
            pub fn lump_name(self) -> String {
                match self {
                    SfxId::None => String::new(),
                    $(SfxId::$name => format!("DS{}", stringify!($name).to_uppercase())),*
                }
            }
        }
    };
}

define_sounds! {
    pistol, shotgn, sgcock, plasma, bfg, sawup, sawidl, sawful, sawhit, rlaunc, rxplod, firsht,
    firxpl, pstart, pstop, doropn, dorcls, stnmov, swtchn, swtchx, plpain, dmpain, popain, slop,
    itemup, wpnup, oof, telept, posit1, posit2, posit3, bgsit1, bgsit2, sgtsit, cacsit, brssit,
    cybsit, spisit, sklatk, sgtatk, claw, pldeth, podth1, podth2, podth3, bgdth1, bgdth2, sgtdth,
    cacdth, brsdth, cybdth, spidth, posact, bgact, dmact, noway, barexp, punch, hoof, metal,
    tink, bdopn, bdcls, itmbk, getpow, skldth, pdiehi,
}

// ============================================================
// State actions
// ============================================================

/// Code run when a state is entered. Weapon actions run against a player
/// sprite, the rest against a thing. Dispatch is in `actions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    None,
    // weapons
    Light0,
    WeaponReady,
    Lower,
    Raise,
    Punch,
    ReFire,
    FirePistol,
    Light1,
    FireShotgun,
    Light2,
    FireCGun,
    GunFlash,
    FireMissile,
    Saw,
    FirePlasma,
    BFGsound,
    FireBFG,
    // things
    BFGSpray,
    Explode,
    Pain,
    PlayerScream,
    Fall,
    XScream,
    Look,
    Chase,
    FaceTarget,
    PosAttack,
    Scream,
    SPosAttack,
    TroopAttack,
    SargAttack,
    HeadAttack,
    BruisAttack,
    SkullAttack,
    Metal,
    SpidRefire,
    Hoof,
    CyberAttack,
    BossDeath,
}

impl Action {
    /// Actions that take a player sprite rather than a thing.
    pub fn is_weapon_action(self) -> bool {
        matches!(
            self,
            Action::Light0
                | Action::WeaponReady
                | Action::Lower
                | Action::Raise
                | Action::Punch
                | Action::ReFire
                | Action::FirePistol
                | Action::Light1
                | Action::FireShotgun
                | Action::Light2
                | Action::FireCGun
                | Action::GunFlash
                | Action::FireMissile
                | Action::Saw
                | Action::FirePlasma
                | Action::BFGsound
                | Action::FireBFG
        )
    }
}

// ============================================================
// States
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub sprite: SpriteNum,
    /// Frame number, with `FF_FULLBRIGHT` for full bright.
    pub frame: i32,
    /// -1 means forever.
    pub tics: i32,
    pub action: Action,
    pub next: StateNum,
}

macro_rules! define_states {
    ($($name:ident: $spr:ident, $frame:expr, $tics:expr, $action:ident, $next:ident;)*) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(u16)]
        pub enum StateNum {
            #[default]
            $($name),*
        }

        pub const NUMSTATES: usize = <[()]>::len(&[$(unit!($name)),*]);

        const ALL_STATES: [StateNum; NUMSTATES] = [$(StateNum::$name),*];

        pub static STATES: [State; NUMSTATES] = [
            $(State {
                sprite: SpriteNum::$spr,
                frame: $frame,
                tics: $tics,
                action: Action::$action,
                next: StateNum::$next,
            }),*
        ];
    };
}

impl StateNum {
    #[inline]
    pub fn info(self) -> &'static State {
        &STATES[self as usize]
    }

    pub fn from_index(i: usize) -> Option<StateNum> {
        ALL_STATES.get(i).copied()
    }

    /// Duration of the state. Demons run and recover twice as fast with
    /// fast monsters.
    pub fn tics(self, fast: bool) -> i32 {
        let tics = self.info().tics;
        if fast && (S_SARG_RUN1..=S_SARG_PAIN2).contains(&self) {
            tics >> 1
        } else {
            tics
        }
    }
}

define_states! {
    S_NULL: TROO, 0, -1, None, S_NULL;
    S_LIGHTDONE: SHTG, 4, 0, Light0, S_NULL;
    S_PUNCH: PUNG, 0, 1, WeaponReady, S_PUNCH;
    S_PUNCHDOWN: PUNG, 0, 1, Lower, S_PUNCHDOWN;
    S_PUNCHUP: PUNG, 0, 1, Raise, S_PUNCHUP;
    S_PUNCH1: PUNG, 1, 4, None, S_PUNCH2;
    S_PUNCH2: PUNG, 2, 4, Punch, S_PUNCH3;
    S_PUNCH3: PUNG, 3, 5, None, S_PUNCH4;
    S_PUNCH4: PUNG, 2, 4, None, S_PUNCH5;
    S_PUNCH5: PUNG, 1, 5, ReFire, S_PUNCH;
    S_PISTOL: PISG, 0, 1, WeaponReady, S_PISTOL;
    S_PISTOLDOWN: PISG, 0, 1, Lower, S_PISTOLDOWN;
    S_PISTOLUP: PISG, 0, 1, Raise, S_PISTOLUP;
    S_PISTOL1: PISG, 0, 4, None, S_PISTOL2;
    S_PISTOL2: PISG, 1, 6, FirePistol, S_PISTOL3;
    S_PISTOL3: PISG, 2, 4, None, S_PISTOL4;
    S_PISTOL4: PISG, 1, 5, ReFire, S_PISTOL;
    S_PISTOLFLASH: PISF, FF, 7, Light1, S_LIGHTDONE;
    S_SGUN: SHTG, 0, 1, WeaponReady, S_SGUN;
    S_SGUNDOWN: SHTG, 0, 1, Lower, S_SGUNDOWN;
    S_SGUNUP: SHTG, 0, 1, Raise, S_SGUNUP;
    S_SGUN1: SHTG, 0, 3, None, S_SGUN2;
    S_SGUN2: SHTG, 0, 7, FireShotgun, S_SGUN3;
    S_SGUN3: SHTG, 1, 5, None, S_SGUN4;
    S_SGUN4: SHTG, 2, 5, None, S_SGUN5;
    S_SGUN5: SHTG, 3, 4, None, S_SGUN6;
    S_SGUN6: SHTG, 2, 5, None, S_SGUN7;
    S_SGUN7: SHTG, 1, 5, None, S_SGUN8;
    S_SGUN8: SHTG, 0, 3, None, S_SGUN9;
    S_SGUN9: SHTG, 0, 7, ReFire, S_SGUN;
    S_SGUNFLASH1: SHTF, FF, 4, Light1, S_SGUNFLASH2;
    S_SGUNFLASH2: SHTF, FF | 1, 3, Light2, S_LIGHTDONE;
    S_CHAIN: CHGG, 0, 1, WeaponReady, S_CHAIN;
    S_CHAINDOWN: CHGG, 0, 1, Lower, S_CHAINDOWN;
    S_CHAINUP: CHGG, 0, 1, Raise, S_CHAINUP;
    S_CHAIN1: CHGG, 0, 4, FireCGun, S_CHAIN2;
    S_CHAIN2: CHGG, 1, 4, FireCGun, S_CHAIN3;
    S_CHAIN3: CHGG, 1, 0, ReFire, S_CHAIN;
    S_CHAINFLASH1: CHGF, FF, 5, Light1, S_LIGHTDONE;
    S_CHAINFLASH2: CHGF, FF | 1, 5, Light2, S_LIGHTDONE;
    S_MISSILE: MISG, 0, 1, WeaponReady, S_MISSILE;
    S_MISSILEDOWN: MISG, 0, 1, Lower, S_MISSILEDOWN;
    S_MISSILEUP: MISG, 0, 1, Raise, S_MISSILEUP;
    S_MISSILE1: MISG, 1, 8, GunFlash, S_MISSILE2;
    S_MISSILE2: MISG, 1, 12, FireMissile, S_MISSILE3;
    S_MISSILE3: MISG, 1, 0, ReFire, S_MISSILE;
    S_MISSILEFLASH1: MISF, FF, 3, Light1, S_MISSILEFLASH2;
    S_MISSILEFLASH2: MISF, FF | 1, 4, None, S_MISSILEFLASH3;
    S_MISSILEFLASH3: MISF, FF | 2, 4, Light2, S_MISSILEFLASH4;
    S_MISSILEFLASH4: MISF, FF | 3, 4, Light2, S_LIGHTDONE;
    S_SAW: SAWG, 2, 4, WeaponReady, S_SAWB;
    S_SAWB: SAWG, 3, 4, WeaponReady, S_SAW;
    S_SAWDOWN: SAWG, 2, 1, Lower, S_SAWDOWN;
    S_SAWUP: SAWG, 2, 1, Raise, S_SAWUP;
    S_SAW1: SAWG, 0, 4, Saw, S_SAW2;
    S_SAW2: SAWG, 1, 4, Saw, S_SAW3;
    S_SAW3: SAWG, 1, 0, ReFire, S_SAW;
    S_PLASMA: PLSG, 0, 1, WeaponReady, S_PLASMA;
    S_PLASMADOWN: PLSG, 0, 1, Lower, S_PLASMADOWN;
    S_PLASMAUP: PLSG, 0, 1, Raise, S_PLASMAUP;
    S_PLASMA1: PLSG, 0, 3, FirePlasma, S_PLASMA2;
    S_PLASMA2: PLSG, 1, 20, ReFire, S_PLASMA;
    S_PLASMAFLASH1: PLSF, FF, 4, Light1, S_LIGHTDONE;
    S_PLASMAFLASH2: PLSF, FF | 1, 4, Light1, S_LIGHTDONE;
    S_BFG: BFGG, 0, 1, WeaponReady, S_BFG;
    S_BFGDOWN: BFGG, 0, 1, Lower, S_BFGDOWN;
    S_BFGUP: BFGG, 0, 1, Raise, S_BFGUP;
    S_BFG1: BFGG, 0, 20, BFGsound, S_BFG2;
    S_BFG2: BFGG, 1, 10, GunFlash, S_BFG3;
    S_BFG3: BFGG, 1, 10, FireBFG, S_BFG4;
    S_BFG4: BFGG, 1, 20, ReFire, S_BFG;
    S_BFGFLASH1: BFGF, FF, 11, Light1, S_BFGFLASH2;
    S_BFGFLASH2: BFGF, FF | 1, 6, Light2, S_LIGHTDONE;
    S_BLOOD1: BLUD, 2, 8, None, S_BLOOD2;
    S_BLOOD2: BLUD, 1, 8, None, S_BLOOD3;
    S_BLOOD3: BLUD, 0, 8, None, S_NULL;
    S_PUFF1: PUFF, FF, 4, None, S_PUFF2;
    S_PUFF2: PUFF, 1, 4, None, S_PUFF3;
    S_PUFF3: PUFF, 2, 4, None, S_PUFF4;
    S_PUFF4: PUFF, 3, 4, None, S_NULL;
    S_TBALL1: BAL1, FF, 4, None, S_TBALL2;
    S_TBALL2: BAL1, FF | 1, 4, None, S_TBALL1;
    S_TBALLX1: BAL1, FF | 2, 6, None, S_TBALLX2;
    S_TBALLX2: BAL1, FF | 3, 6, None, S_TBALLX3;
    S_TBALLX3: BAL1, FF | 4, 6, None, S_NULL;
    S_RBALL1: BAL2, FF, 4, None, S_RBALL2;
    S_RBALL2: BAL2, FF | 1, 4, None, S_RBALL1;
    S_RBALLX1: BAL2, FF | 2, 6, None, S_RBALLX2;
    S_RBALLX2: BAL2, FF | 3, 6, None, S_RBALLX3;
    S_RBALLX3: BAL2, FF | 4, 6, None, S_NULL;
    S_PLASBALL: PLSS, FF, 6, None, S_PLASBALL2;
    S_PLASBALL2: PLSS, FF | 1, 6, None, S_PLASBALL;
    S_PLASEXP: PLSE, FF, 4, None, S_PLASEXP2;
    S_PLASEXP2: PLSE, FF | 1, 4, None, S_PLASEXP3;
    S_PLASEXP3: PLSE, FF | 2, 4, None, S_PLASEXP4;
    S_PLASEXP4: PLSE, FF | 3, 4, None, S_PLASEXP5;
    S_PLASEXP5: PLSE, FF | 4, 4, None, S_NULL;
    S_ROCKET: MISL, FF, 1, None, S_ROCKET;
    S_BFGSHOT: BFS1, FF, 4, None, S_BFGSHOT2;
    S_BFGSHOT2: BFS1, FF | 1, 4, None, S_BFGSHOT;
    S_BFGLAND: BFE1, FF, 8, None, S_BFGLAND2;
    S_BFGLAND2: BFE1, FF | 1, 8, None, S_BFGLAND3;
    S_BFGLAND3: BFE1, FF | 2, 8, BFGSpray, S_BFGLAND4;
    S_BFGLAND4: BFE1, FF | 3, 8, None, S_BFGLAND5;
    S_BFGLAND5: BFE1, FF | 4, 8, None, S_BFGLAND6;
    S_BFGLAND6: BFE1, FF | 5, 8, None, S_NULL;
    S_BFGEXP: BFE2, FF, 8, None, S_BFGEXP2;
    S_BFGEXP2: BFE2, FF | 1, 8, None, S_BFGEXP3;
    S_BFGEXP3: BFE2, FF | 2, 8, None, S_BFGEXP4;
    S_BFGEXP4: BFE2, FF | 3, 8, None, S_NULL;
    S_EXPLODE1: MISL, FF | 1, 8, Explode, S_EXPLODE2;
    S_EXPLODE2: MISL, FF | 2, 6, None, S_EXPLODE3;
    S_EXPLODE3: MISL, FF | 3, 4, None, S_NULL;
    S_TFOG: TFOG, FF, 6, None, S_TFOG01;
    S_TFOG01: TFOG, FF | 1, 6, None, S_TFOG02;
    S_TFOG02: TFOG, FF, 6, None, S_TFOG2;
    S_TFOG2: TFOG, FF | 1, 6, None, S_TFOG3;
    S_TFOG3: TFOG, FF | 2, 6, None, S_TFOG4;
    S_TFOG4: TFOG, FF | 3, 6, None, S_TFOG5;
    S_TFOG5: TFOG, FF | 4, 6, None, S_TFOG6;
    S_TFOG6: TFOG, FF | 5, 6, None, S_TFOG7;
    S_TFOG7: TFOG, FF | 6, 6, None, S_TFOG8;
    S_TFOG8: TFOG, FF | 7, 6, None, S_TFOG9;
    S_TFOG9: TFOG, FF | 8, 6, None, S_TFOG10;
    S_TFOG10: TFOG, FF | 9, 6, None, S_NULL;
    S_IFOG: IFOG, FF, 6, None, S_IFOG01;
    S_IFOG01: IFOG, FF | 1, 6, None, S_IFOG02;
    S_IFOG02: IFOG, FF, 6, None, S_IFOG2;
    S_IFOG2: IFOG, FF | 1, 6, None, S_IFOG3;
    S_IFOG3: IFOG, FF | 2, 6, None, S_IFOG4;
    S_IFOG4: IFOG, FF | 3, 6, None, S_IFOG5;
    S_IFOG5: IFOG, FF | 4, 6, None, S_NULL;
    S_PLAY: PLAY, 0, -1, None, S_NULL;
    S_PLAY_RUN1: PLAY, 0, 4, None, S_PLAY_RUN2;
    S_PLAY_RUN2: PLAY, 1, 4, None, S_PLAY_RUN3;
    S_PLAY_RUN3: PLAY, 2, 4, None, S_PLAY_RUN4;
    S_PLAY_RUN4: PLAY, 3, 4, None, S_PLAY_RUN1;
    S_PLAY_ATK1: PLAY, 4, 12, None, S_PLAY;
    S_PLAY_ATK2: PLAY, FF | 5, 6, None, S_PLAY_ATK1;
    S_PLAY_PAIN: PLAY, 6, 4, None, S_PLAY_PAIN2;
    S_PLAY_PAIN2: PLAY, 6, 4, Pain, S_PLAY;
    S_PLAY_DIE1: PLAY, 7, 10, None, S_PLAY_DIE2;
    S_PLAY_DIE2: PLAY, 8, 10, PlayerScream, S_PLAY_DIE3;
    S_PLAY_DIE3: PLAY, 9, 10, Fall, S_PLAY_DIE4;
    S_PLAY_DIE4: PLAY, 10, 10, None, S_PLAY_DIE5;
    S_PLAY_DIE5: PLAY, 11, 10, None, S_PLAY_DIE6;
    S_PLAY_DIE6: PLAY, 12, 10, None, S_PLAY_DIE7;
    S_PLAY_DIE7: PLAY, 13, -1, None, S_NULL;
    S_PLAY_XDIE1: PLAY, 14, 5, None, S_PLAY_XDIE2;
    S_PLAY_XDIE2: PLAY, 15, 5, XScream, S_PLAY_XDIE3;
    S_PLAY_XDIE3: PLAY, 16, 5, Fall, S_PLAY_XDIE4;
    S_PLAY_XDIE4: PLAY, 17, 5, None, S_PLAY_XDIE5;
    S_PLAY_XDIE5: PLAY, 18, 5, None, S_PLAY_XDIE6;
    S_PLAY_XDIE6: PLAY, 19, 5, None, S_PLAY_XDIE7;
    S_PLAY_XDIE7: PLAY, 20, 5, None, S_PLAY_XDIE8;
    S_PLAY_XDIE8: PLAY, 21, 5, None, S_PLAY_XDIE9;
    S_PLAY_XDIE9: PLAY, 22, -1, None, S_NULL;
    S_POSS_STND: POSS, 0, 10, Look, S_POSS_STND2;
    S_POSS_STND2: POSS, 1, 10, Look, S_POSS_STND;
    S_POSS_RUN1: POSS, 0, 4, Chase, S_POSS_RUN2;
    S_POSS_RUN2: POSS, 0, 4, Chase, S_POSS_RUN3;
    S_POSS_RUN3: POSS, 1, 4, Chase, S_POSS_RUN4;
    S_POSS_RUN4: POSS, 1, 4, Chase, S_POSS_RUN5;
    S_POSS_RUN5: POSS, 2, 4, Chase, S_POSS_RUN6;
    S_POSS_RUN6: POSS, 2, 4, Chase, S_POSS_RUN7;
    S_POSS_RUN7: POSS, 3, 4, Chase, S_POSS_RUN8;
    S_POSS_RUN8: POSS, 3, 4, Chase, S_POSS_RUN1;
    S_POSS_ATK1: POSS, 4, 10, FaceTarget, S_POSS_ATK2;
    S_POSS_ATK2: POSS, 5, 8, PosAttack, S_POSS_ATK3;
    S_POSS_ATK3: POSS, 4, 8, None, S_POSS_RUN1;
    S_POSS_PAIN: POSS, 6, 3, None, S_POSS_PAIN2;
    S_POSS_PAIN2: POSS, 6, 3, Pain, S_POSS_RUN1;
    S_POSS_DIE1: POSS, 7, 5, None, S_POSS_DIE2;
    S_POSS_DIE2: POSS, 8, 5, Scream, S_POSS_DIE3;
    S_POSS_DIE3: POSS, 9, 5, Fall, S_POSS_DIE4;
    S_POSS_DIE4: POSS, 10, 5, None, S_POSS_DIE5;
    S_POSS_DIE5: POSS, 11, -1, None, S_NULL;
    S_POSS_XDIE1: POSS, 12, 5, None, S_POSS_XDIE2;
    S_POSS_XDIE2: POSS, 13, 5, XScream, S_POSS_XDIE3;
    S_POSS_XDIE3: POSS, 14, 5, Fall, S_POSS_XDIE4;
    S_POSS_XDIE4: POSS, 15, 5, None, S_POSS_XDIE5;
    S_POSS_XDIE5: POSS, 16, 5, None, S_POSS_XDIE6;
    S_POSS_XDIE6: POSS, 17, 5, None, S_POSS_XDIE7;
    S_POSS_XDIE7: POSS, 18, 5, None, S_POSS_XDIE8;
    S_POSS_XDIE8: POSS, 19, 5, None, S_POSS_XDIE9;
    S_POSS_XDIE9: POSS, 20, -1, None, S_NULL;
    S_SPOS_STND: SPOS, 0, 10, Look, S_SPOS_STND2;
    S_SPOS_STND2: SPOS, 1, 10, Look, S_SPOS_STND;
    S_SPOS_RUN1: SPOS, 0, 3, Chase, S_SPOS_RUN2;
    S_SPOS_RUN2: SPOS, 0, 3, Chase, S_SPOS_RUN3;
    S_SPOS_RUN3: SPOS, 1, 3, Chase, S_SPOS_RUN4;
    S_SPOS_RUN4: SPOS, 1, 3, Chase, S_SPOS_RUN5;
    S_SPOS_RUN5: SPOS, 2, 3, Chase, S_SPOS_RUN6;
    S_SPOS_RUN6: SPOS, 2, 3, Chase, S_SPOS_RUN7;
    S_SPOS_RUN7: SPOS, 3, 3, Chase, S_SPOS_RUN8;
    S_SPOS_RUN8: SPOS, 3, 3, Chase, S_SPOS_RUN1;
    S_SPOS_ATK1: SPOS, 4, 10, FaceTarget, S_SPOS_ATK2;
    S_SPOS_ATK2: SPOS, FF | 5, 10, SPosAttack, S_SPOS_ATK3;
    S_SPOS_ATK3: SPOS, 4, 10, None, S_SPOS_RUN1;
    S_SPOS_PAIN: SPOS, 6, 3, None, S_SPOS_PAIN2;
    S_SPOS_PAIN2: SPOS, 6, 3, Pain, S_SPOS_RUN1;
    S_SPOS_DIE1: SPOS, 7, 5, None, S_SPOS_DIE2;
    S_SPOS_DIE2: SPOS, 8, 5, Scream, S_SPOS_DIE3;
    S_SPOS_DIE3: SPOS, 9, 5, Fall, S_SPOS_DIE4;
    S_SPOS_DIE4: SPOS, 10, 5, None, S_SPOS_DIE5;
    S_SPOS_DIE5: SPOS, 11, -1, None, S_NULL;
    S_SPOS_XDIE1: SPOS, 12, 5, None, S_SPOS_XDIE2;
    S_SPOS_XDIE2: SPOS, 13, 5, XScream, S_SPOS_XDIE3;
    S_SPOS_XDIE3: SPOS, 14, 5, Fall, S_SPOS_XDIE4;
    S_SPOS_XDIE4: SPOS, 15, 5, None, S_SPOS_XDIE5;
    S_SPOS_XDIE5: SPOS, 16, 5, None, S_SPOS_XDIE6;
    S_SPOS_XDIE6: SPOS, 17, 5, None, S_SPOS_XDIE7;
    S_SPOS_XDIE7: SPOS, 18, 5, None, S_SPOS_XDIE8;
    S_SPOS_XDIE8: SPOS, 19, 5, None, S_SPOS_XDIE9;
    S_SPOS_XDIE9: SPOS, 20, -1, None, S_NULL;
    S_TROO_STND: TROO, 0, 10, Look, S_TROO_STND2;
    S_TROO_STND2: TROO, 1, 10, Look, S_TROO_STND;
    S_TROO_RUN1: TROO, 0, 3, Chase, S_TROO_RUN2;
    S_TROO_RUN2: TROO, 0, 3, Chase, S_TROO_RUN3;
    S_TROO_RUN3: TROO, 1, 3, Chase, S_TROO_RUN4;
    S_TROO_RUN4: TROO, 1, 3, Chase, S_TROO_RUN5;
    S_TROO_RUN5: TROO, 2, 3, Chase, S_TROO_RUN6;
    S_TROO_RUN6: TROO, 2, 3, Chase, S_TROO_RUN7;
    S_TROO_RUN7: TROO, 3, 3, Chase, S_TROO_RUN8;
    S_TROO_RUN8: TROO, 3, 3, Chase, S_TROO_RUN1;
    S_TROO_ATK1: TROO, 4, 8, FaceTarget, S_TROO_ATK2;
    S_TROO_ATK2: TROO, 5, 8, FaceTarget, S_TROO_ATK3;
    S_TROO_ATK3: TROO, 6, 6, TroopAttack, S_TROO_RUN1;
    S_TROO_PAIN: TROO, 7, 2, None, S_TROO_PAIN2;
    S_TROO_PAIN2: TROO, 7, 2, Pain, S_TROO_RUN1;
    S_TROO_DIE1: TROO, 8, 8, None, S_TROO_DIE2;
    S_TROO_DIE2: TROO, 9, 8, Scream, S_TROO_DIE3;
    S_TROO_DIE3: TROO, 10, 6, None, S_TROO_DIE4;
    S_TROO_DIE4: TROO, 11, 6, Fall, S_TROO_DIE5;
    S_TROO_DIE5: TROO, 12, -1, None, S_NULL;
    S_TROO_XDIE1: TROO, 13, 5, None, S_TROO_XDIE2;
    S_TROO_XDIE2: TROO, 14, 5, XScream, S_TROO_XDIE3;
    S_TROO_XDIE3: TROO, 15, 5, None, S_TROO_XDIE4;
    S_TROO_XDIE4: TROO, 16, 5, Fall, S_TROO_XDIE5;
    S_TROO_XDIE5: TROO, 17, 5, None, S_TROO_XDIE6;
    S_TROO_XDIE6: TROO, 18, 5, None, S_TROO_XDIE7;
    S_TROO_XDIE7: TROO, 19, 5, None, S_TROO_XDIE8;
    S_TROO_XDIE8: TROO, 20, -1, None, S_NULL;
    S_SARG_STND: SARG, 0, 10, Look, S_SARG_STND2;
    S_SARG_STND2: SARG, 1, 10, Look, S_SARG_STND;
    S_SARG_RUN1: SARG, 0, 2, Chase, S_SARG_RUN2;
    S_SARG_RUN2: SARG, 0, 2, Chase, S_SARG_RUN3;
    S_SARG_RUN3: SARG, 1, 2, Chase, S_SARG_RUN4;
    S_SARG_RUN4: SARG, 1, 2, Chase, S_SARG_RUN5;
    S_SARG_RUN5: SARG, 2, 2, Chase, S_SARG_RUN6;
    S_SARG_RUN6: SARG, 2, 2, Chase, S_SARG_RUN7;
    S_SARG_RUN7: SARG, 3, 2, Chase, S_SARG_RUN8;
    S_SARG_RUN8: SARG, 3, 2, Chase, S_SARG_RUN1;
    S_SARG_ATK1: SARG, 4, 8, FaceTarget, S_SARG_ATK2;
    S_SARG_ATK2: SARG, 5, 8, FaceTarget, S_SARG_ATK3;
    S_SARG_ATK3: SARG, 6, 8, SargAttack, S_SARG_RUN1;
    S_SARG_PAIN: SARG, 7, 2, None, S_SARG_PAIN2;
    S_SARG_PAIN2: SARG, 7, 2, Pain, S_SARG_RUN1;
    S_SARG_DIE1: SARG, 8, 8, None, S_SARG_DIE2;
    S_SARG_DIE2: SARG, 9, 8, Scream, S_SARG_DIE3;
    S_SARG_DIE3: SARG, 10, 4, None, S_SARG_DIE4;
    S_SARG_DIE4: SARG, 11, 4, Fall, S_SARG_DIE5;
    S_SARG_DIE5: SARG, 12, 4, None, S_SARG_DIE6;
    S_SARG_DIE6: SARG, 13, -1, None, S_NULL;
    S_HEAD_STND: HEAD, 0, 10, Look, S_HEAD_STND;
    S_HEAD_RUN1: HEAD, 0, 3, Chase, S_HEAD_RUN1;
    S_HEAD_ATK1: HEAD, 1, 5, FaceTarget, S_HEAD_ATK2;
    S_HEAD_ATK2: HEAD, 2, 5, FaceTarget, S_HEAD_ATK3;
    S_HEAD_ATK3: HEAD, FF | 3, 5, HeadAttack, S_HEAD_RUN1;
    S_HEAD_PAIN: HEAD, 4, 3, None, S_HEAD_PAIN2;
    S_HEAD_PAIN2: HEAD, 4, 3, Pain, S_HEAD_PAIN3;
    S_HEAD_PAIN3: HEAD, 5, 6, None, S_HEAD_RUN1;
    S_HEAD_DIE1: HEAD, 6, 8, None, S_HEAD_DIE2;
    S_HEAD_DIE2: HEAD, 7, 8, Scream, S_HEAD_DIE3;
    S_HEAD_DIE3: HEAD, 8, 8, None, S_HEAD_DIE4;
    S_HEAD_DIE4: HEAD, 9, 8, None, S_HEAD_DIE5;
    S_HEAD_DIE5: HEAD, 10, 8, Fall, S_HEAD_DIE6;
    S_HEAD_DIE6: HEAD, 11, -1, None, S_NULL;
    S_BRBALL1: BAL7, FF, 4, None, S_BRBALL2;
    S_BRBALL2: BAL7, FF | 1, 4, None, S_BRBALL1;
    S_BRBALLX1: BAL7, FF | 2, 6, None, S_BRBALLX2;
    S_BRBALLX2: BAL7, FF | 3, 6, None, S_BRBALLX3;
    S_BRBALLX3: BAL7, FF | 4, 6, None, S_NULL;
    S_BOSS_STND: BOSS, 0, 10, Look, S_BOSS_STND2;
    S_BOSS_STND2: BOSS, 1, 10, Look, S_BOSS_STND;
    S_BOSS_RUN1: BOSS, 0, 3, Chase, S_BOSS_RUN2;
    S_BOSS_RUN2: BOSS, 0, 3, Chase, S_BOSS_RUN3;
    S_BOSS_RUN3: BOSS, 1, 3, Chase, S_BOSS_RUN4;
    S_BOSS_RUN4: BOSS, 1, 3, Chase, S_BOSS_RUN5;
    S_BOSS_RUN5: BOSS, 2, 3, Chase, S_BOSS_RUN6;
    S_BOSS_RUN6: BOSS, 2, 3, Chase, S_BOSS_RUN7;
    S_BOSS_RUN7: BOSS, 3, 3, Chase, S_BOSS_RUN8;
    S_BOSS_RUN8: BOSS, 3, 3, Chase, S_BOSS_RUN1;
    S_BOSS_ATK1: BOSS, 4, 8, FaceTarget, S_BOSS_ATK2;
    S_BOSS_ATK2: BOSS, 5, 8, FaceTarget, S_BOSS_ATK3;
    S_BOSS_ATK3: BOSS, 6, 8, BruisAttack, S_BOSS_RUN1;
    S_BOSS_PAIN: BOSS, 7, 2, None, S_BOSS_PAIN2;
    S_BOSS_PAIN2: BOSS, 7, 2, Pain, S_BOSS_RUN1;
    S_BOSS_DIE1: BOSS, 8, 8, None, S_BOSS_DIE2;
    S_BOSS_DIE2: BOSS, 9, 8, Scream, S_BOSS_DIE3;
    S_BOSS_DIE3: BOSS, 10, 8, None, S_BOSS_DIE4;
    S_BOSS_DIE4: BOSS, 11, 8, Fall, S_BOSS_DIE5;
    S_BOSS_DIE5: BOSS, 12, 8, None, S_BOSS_DIE6;
    S_BOSS_DIE6: BOSS, 13, 8, None, S_BOSS_DIE7;
    S_BOSS_DIE7: BOSS, 14, -1, BossDeath, S_NULL;
    S_SKULL_STND: SKUL, FF, 10, Look, S_SKULL_STND2;
    S_SKULL_STND2: SKUL, FF | 1, 10, Look, S_SKULL_STND;
    S_SKULL_RUN1: SKUL, FF, 6, Chase, S_SKULL_RUN2;
    S_SKULL_RUN2: SKUL, FF | 1, 6, Chase, S_SKULL_RUN1;
    S_SKULL_ATK1: SKUL, FF | 2, 10, FaceTarget, S_SKULL_ATK2;
    S_SKULL_ATK2: SKUL, FF | 3, 4, SkullAttack, S_SKULL_ATK3;
    S_SKULL_ATK3: SKUL, FF | 2, 4, None, S_SKULL_ATK4;
    S_SKULL_ATK4: SKUL, FF | 3, 4, None, S_SKULL_ATK3;
    S_SKULL_PAIN: SKUL, FF | 4, 3, None, S_SKULL_PAIN2;
    S_SKULL_PAIN2: SKUL, FF | 4, 3, Pain, S_SKULL_RUN1;
    S_SKULL_DIE1: SKUL, FF | 5, 6, None, S_SKULL_DIE2;
    S_SKULL_DIE2: SKUL, FF | 6, 6, Scream, S_SKULL_DIE3;
    S_SKULL_DIE3: SKUL, FF | 7, 6, None, S_SKULL_DIE4;
    S_SKULL_DIE4: SKUL, FF | 8, 6, Fall, S_SKULL_DIE5;
    S_SKULL_DIE5: SKUL, 9, 6, None, S_SKULL_DIE6;
    S_SKULL_DIE6: SKUL, 10, 6, None, S_NULL;
    S_SPID_STND: SPID, 0, 10, Look, S_SPID_STND2;
    S_SPID_STND2: SPID, 1, 10, Look, S_SPID_STND;
    S_SPID_RUN1: SPID, 0, 3, Metal, S_SPID_RUN2;
    S_SPID_RUN2: SPID, 0, 3, Chase, S_SPID_RUN3;
    S_SPID_RUN3: SPID, 1, 3, Chase, S_SPID_RUN4;
    S_SPID_RUN4: SPID, 1, 3, Chase, S_SPID_RUN5;
    S_SPID_RUN5: SPID, 2, 3, Metal, S_SPID_RUN6;
    S_SPID_RUN6: SPID, 2, 3, Chase, S_SPID_RUN7;
    S_SPID_RUN7: SPID, 3, 3, Chase, S_SPID_RUN8;
    S_SPID_RUN8: SPID, 3, 3, Chase, S_SPID_RUN9;
    S_SPID_RUN9: SPID, 4, 3, Metal, S_SPID_RUN10;
    S_SPID_RUN10: SPID, 4, 3, Chase, S_SPID_RUN11;
    S_SPID_RUN11: SPID, 5, 3, Chase, S_SPID_RUN12;
    S_SPID_RUN12: SPID, 5, 3, Chase, S_SPID_RUN1;
    S_SPID_ATK1: SPID, FF, 20, FaceTarget, S_SPID_ATK2;
    S_SPID_ATK2: SPID, FF | 6, 4, SPosAttack, S_SPID_ATK3;
    S_SPID_ATK3: SPID, FF | 7, 4, SPosAttack, S_SPID_ATK4;
    S_SPID_ATK4: SPID, FF | 7, 1, SpidRefire, S_SPID_ATK2;
    S_SPID_PAIN: SPID, 8, 3, None, S_SPID_PAIN2;
    S_SPID_PAIN2: SPID, 8, 3, Pain, S_SPID_RUN1;
    S_SPID_DIE1: SPID, 9, 20, Scream, S_SPID_DIE2;
    S_SPID_DIE2: SPID, 10, 10, Fall, S_SPID_DIE3;
    S_SPID_DIE3: SPID, 11, 10, None, S_SPID_DIE4;
    S_SPID_DIE4: SPID, 12, 10, None, S_SPID_DIE5;
    S_SPID_DIE5: SPID, 13, 10, None, S_SPID_DIE6;
    S_SPID_DIE6: SPID, 14, 10, None, S_SPID_DIE7;
    S_SPID_DIE7: SPID, 15, 10, None, S_SPID_DIE8;
    S_SPID_DIE8: SPID, 16, 10, None, S_SPID_DIE9;
    S_SPID_DIE9: SPID, 17, 10, None, S_SPID_DIE10;
    S_SPID_DIE10: SPID, 18, 30, None, S_SPID_DIE11;
    S_SPID_DIE11: SPID, 18, -1, BossDeath, S_NULL;
    S_CYBER_STND: CYBR, 0, 10, Look, S_CYBER_STND2;
    S_CYBER_STND2: CYBR, 1, 10, Look, S_CYBER_STND;
    S_CYBER_RUN1: CYBR, 0, 3, Hoof, S_CYBER_RUN2;
    S_CYBER_RUN2: CYBR, 0, 3, Chase, S_CYBER_RUN3;
    S_CYBER_RUN3: CYBR, 1, 3, Chase, S_CYBER_RUN4;
    S_CYBER_RUN4: CYBR, 1, 3, Chase, S_CYBER_RUN5;
    S_CYBER_RUN5: CYBR, 2, 3, Chase, S_CYBER_RUN6;
    S_CYBER_RUN6: CYBR, 2, 3, Chase, S_CYBER_RUN7;
    S_CYBER_RUN7: CYBR, 3, 3, Metal, S_CYBER_RUN8;
    S_CYBER_RUN8: CYBR, 3, 3, Chase, S_CYBER_RUN1;
    S_CYBER_ATK1: CYBR, 4, 6, FaceTarget, S_CYBER_ATK2;
    S_CYBER_ATK2: CYBR, 5, 12, CyberAttack, S_CYBER_ATK3;
    S_CYBER_ATK3: CYBR, 4, 12, FaceTarget, S_CYBER_ATK4;
    S_CYBER_ATK4: CYBR, 5, 12, CyberAttack, S_CYBER_ATK5;
    S_CYBER_ATK5: CYBR, 4, 12, FaceTarget, S_CYBER_ATK6;
    S_CYBER_ATK6: CYBR, 5, 12, CyberAttack, S_CYBER_RUN1;
    S_CYBER_PAIN: CYBR, 6, 10, Pain, S_CYBER_RUN1;
    S_CYBER_DIE1: CYBR, 7, 10, None, S_CYBER_DIE2;
    S_CYBER_DIE2: CYBR, 8, 10, Scream, S_CYBER_DIE3;
    S_CYBER_DIE3: CYBR, 9, 10, None, S_CYBER_DIE4;
    S_CYBER_DIE4: CYBR, 10, 10, None, S_CYBER_DIE5;
    S_CYBER_DIE5: CYBR, 11, 10, None, S_CYBER_DIE6;
    S_CYBER_DIE6: CYBR, 12, 10, Fall, S_CYBER_DIE7;
    S_CYBER_DIE7: CYBR, 13, 10, None, S_CYBER_DIE8;
    S_CYBER_DIE8: CYBR, 14, 10, None, S_CYBER_DIE9;
    S_CYBER_DIE9: CYBR, 15, 30, None, S_CYBER_DIE10;
    S_CYBER_DIE10: CYBR, 15, -1, BossDeath, S_NULL;
    S_BAR1: BAR1, 0, 6, None, S_BAR2;
    S_BAR2: BAR1, 1, 6, None, S_BAR1;
    S_BEXP: BEXP, FF, 5, None, S_BEXP2;
    S_BEXP2: BEXP, FF | 1, 5, Scream, S_BEXP3;
    S_BEXP3: BEXP, FF | 2, 5, None, S_BEXP4;
    S_BEXP4: BEXP, FF | 3, 10, Explode, S_BEXP5;
    S_BEXP5: BEXP, FF | 4, 10, None, S_NULL;
    S_ARM1: ARM1, 0, 6, None, S_ARM1A;
    S_ARM1A: ARM1, FF | 1, 7, None, S_ARM1;
    S_ARM2: ARM2, 0, 6, None, S_ARM2A;
    S_ARM2A: ARM2, FF | 1, 6, None, S_ARM2;
    S_BON1: BON1, 0, 6, None, S_BON1A;
    S_BON1A: BON1, 1, 6, None, S_BON1B;
    S_BON1B: BON1, 2, 6, None, S_BON1C;
    S_BON1C: BON1, 3, 6, None, S_BON1D;
    S_BON1D: BON1, 2, 6, None, S_BON1E;
    S_BON1E: BON1, 1, 6, None, S_BON1;
    S_BON2: BON2, 0, 6, None, S_BON2A;
    S_BON2A: BON2, 1, 6, None, S_BON2B;
    S_BON2B: BON2, 2, 6, None, S_BON2C;
    S_BON2C: BON2, 3, 6, None, S_BON2D;
    S_BON2D: BON2, 2, 6, None, S_BON2E;
    S_BON2E: BON2, 1, 6, None, S_BON2;
    S_BKEY: BKEY, 0, 10, None, S_BKEY2;
    S_BKEY2: BKEY, FF | 1, 10, None, S_BKEY;
    S_RKEY: RKEY, 0, 10, None, S_RKEY2;
    S_RKEY2: RKEY, FF | 1, 10, None, S_RKEY;
    S_YKEY: YKEY, 0, 10, None, S_YKEY2;
    S_YKEY2: YKEY, FF | 1, 10, None, S_YKEY;
    S_BSKULL: BSKU, 0, 10, None, S_BSKULL2;
    S_BSKULL2: BSKU, FF | 1, 10, None, S_BSKULL;
    S_RSKULL: RSKU, 0, 10, None, S_RSKULL2;
    S_RSKULL2: RSKU, FF | 1, 10, None, S_RSKULL;
    S_YSKULL: YSKU, 0, 10, None, S_YSKULL2;
    S_YSKULL2: YSKU, FF | 1, 10, None, S_YSKULL;
    S_STIM: STIM, 0, -1, None, S_NULL;
    S_MEDI: MEDI, 0, -1, None, S_NULL;
    S_SOUL: SOUL, FF, 6, None, S_SOUL2;
    S_SOUL2: SOUL, FF | 1, 6, None, S_SOUL3;
    S_SOUL3: SOUL, FF | 2, 6, None, S_SOUL4;
    S_SOUL4: SOUL, FF | 3, 6, None, S_SOUL5;
    S_SOUL5: SOUL, FF | 2, 6, None, S_SOUL6;
    S_SOUL6: SOUL, FF | 1, 6, None, S_SOUL;
    S_PINV: PINV, FF, 6, None, S_PINV2;
    S_PINV2: PINV, FF | 1, 6, None, S_PINV3;
    S_PINV3: PINV, FF | 2, 6, None, S_PINV4;
    S_PINV4: PINV, FF | 3, 6, None, S_PINV;
    S_PSTR: PSTR, FF, -1, None, S_NULL;
    S_PINS: PINS, FF, 6, None, S_PINS2;
    S_PINS2: PINS, FF | 1, 6, None, S_PINS3;
    S_PINS3: PINS, FF | 2, 6, None, S_PINS4;
    S_PINS4: PINS, FF | 3, 6, None, S_PINS;
    S_SUIT: SUIT, FF, -1, None, S_NULL;
    S_PMAP: PMAP, FF, 6, None, S_PMAP2;
    S_PMAP2: PMAP, FF | 1, 6, None, S_PMAP3;
    S_PMAP3: PMAP, FF | 2, 6, None, S_PMAP4;
    S_PMAP4: PMAP, FF | 3, 6, None, S_PMAP5;
    S_PMAP5: PMAP, FF | 2, 6, None, S_PMAP6;
    S_PMAP6: PMAP, FF | 1, 6, None, S_PMAP;
    S_PVIS: PVIS, FF, 6, None, S_PVIS2;
    S_PVIS2: PVIS, 1, 6, None, S_PVIS;
    S_CLIP: CLIP, 0, -1, None, S_NULL;
    S_AMMO: AMMO, 0, -1, None, S_NULL;
    S_ROCK: ROCK, 0, -1, None, S_NULL;
    S_BROK: BROK, 0, -1, None, S_NULL;
    S_CELL: CELL, 0, -1, None, S_NULL;
    S_CELP: CELP, 0, -1, None, S_NULL;
    S_SHEL: SHEL, 0, -1, None, S_NULL;
    S_SBOX: SBOX, 0, -1, None, S_NULL;
    S_BPAK: BPAK, 0, -1, None, S_NULL;
    S_BFUG: BFUG, 0, -1, None, S_NULL;
    S_MGUN: MGUN, 0, -1, None, S_NULL;
    S_CSAW: CSAW, 0, -1, None, S_NULL;
    S_LAUN: LAUN, 0, -1, None, S_NULL;
    S_PLAS: PLAS, 0, -1, None, S_NULL;
    S_SHOT: SHOT, 0, -1, None, S_NULL;
    S_COLU: COLU, FF, -1, None, S_NULL;
    S_BLOODYTWITCH: GOR1, 0, 10, None, S_BLOODYTWITCH2;
    S_BLOODYTWITCH2: GOR1, 1, 15, None, S_BLOODYTWITCH3;
    S_BLOODYTWITCH3: GOR1, 2, 8, None, S_BLOODYTWITCH4;
    S_BLOODYTWITCH4: GOR1, 1, 6, None, S_BLOODYTWITCH;
    S_HEADSONSTICK: POL2, 0, -1, None, S_NULL;
    S_GIBS: POL5, 0, -1, None, S_NULL;
    S_HEADONASTICK: POL4, 0, -1, None, S_NULL;
    S_HEADCANDLES: POL3, FF, 6, None, S_HEADCANDLES2;
    S_HEADCANDLES2: POL3, FF | 1, 6, None, S_HEADCANDLES;
    S_DEADSTICK: POL1, 0, -1, None, S_NULL;
    S_LIVESTICK: POL6, 0, 6, None, S_LIVESTICK2;
    S_LIVESTICK2: POL6, 1, 8, None, S_LIVESTICK;
    S_MEAT2: GOR2, 0, -1, None, S_NULL;
    S_MEAT3: GOR3, 0, -1, None, S_NULL;
    S_MEAT4: GOR4, 0, -1, None, S_NULL;
    S_MEAT5: GOR5, 0, -1, None, S_NULL;
    S_STALAGTITE: SMIT, 0, -1, None, S_NULL;
    S_TALLGRNCOL: COL1, 0, -1, None, S_NULL;
    S_SHRTGRNCOL: COL2, 0, -1, None, S_NULL;
    S_TALLREDCOL: COL3, 0, -1, None, S_NULL;
    S_SHRTREDCOL: COL4, 0, -1, None, S_NULL;
    S_CANDLESTIK: CAND, FF, -1, None, S_NULL;
    S_CANDELABRA: CBRA, FF, -1, None, S_NULL;
    S_SKULLCOL: COL6, 0, -1, None, S_NULL;
    S_TORCHTREE: TRE1, 0, -1, None, S_NULL;
    S_BIGTREE: TRE2, 0, -1, None, S_NULL;
    S_TECHPILLAR: ELEC, 0, -1, None, S_NULL;
    S_EVILEYE: CEYE, FF, 6, None, S_EVILEYE2;
    S_EVILEYE2: CEYE, FF | 1, 6, None, S_EVILEYE3;
    S_EVILEYE3: CEYE, FF | 2, 6, None, S_EVILEYE4;
    S_EVILEYE4: CEYE, FF | 1, 6, None, S_EVILEYE;
    S_FLOATSKULL: FSKU, FF, 6, None, S_FLOATSKULL2;
    S_FLOATSKULL2: FSKU, FF | 1, 6, None, S_FLOATSKULL3;
    S_FLOATSKULL3: FSKU, FF | 2, 6, None, S_FLOATSKULL;
    S_HEARTCOL: COL5, 0, 14, None, S_HEARTCOL2;
    S_HEARTCOL2: COL5, 1, 14, None, S_HEARTCOL;
    S_BLUETORCH: TBLU, FF, 4, None, S_BLUETORCH2;
    S_BLUETORCH2: TBLU, FF | 1, 4, None, S_BLUETORCH3;
    S_BLUETORCH3: TBLU, FF | 2, 4, None, S_BLUETORCH4;
    S_BLUETORCH4: TBLU, FF | 3, 4, None, S_BLUETORCH;
    S_GREENTORCH: TGRN, FF, 4, None, S_GREENTORCH2;
    S_GREENTORCH2: TGRN, FF | 1, 4, None, S_GREENTORCH3;
    S_GREENTORCH3: TGRN, FF | 2, 4, None, S_GREENTORCH4;
    S_GREENTORCH4: TGRN, FF | 3, 4, None, S_GREENTORCH;
    S_REDTORCH: TRED, FF, 4, None, S_REDTORCH2;
    S_REDTORCH2: TRED, FF | 1, 4, None, S_REDTORCH3;
    S_REDTORCH3: TRED, FF | 2, 4, None, S_REDTORCH4;
    S_REDTORCH4: TRED, FF | 3, 4, None, S_REDTORCH;
    S_BTORCHSHRT: SMBT, FF, 4, None, S_BTORCHSHRT2;
    S_BTORCHSHRT2: SMBT, FF | 1, 4, None, S_BTORCHSHRT3;
    S_BTORCHSHRT3: SMBT, FF | 2, 4, None, S_BTORCHSHRT4;
    S_BTORCHSHRT4: SMBT, FF | 3, 4, None, S_BTORCHSHRT;
    S_GTORCHSHRT: SMGT, FF, 4, None, S_GTORCHSHRT2;
    S_GTORCHSHRT2: SMGT, FF | 1, 4, None, S_GTORCHSHRT3;
    S_GTORCHSHRT3: SMGT, FF | 2, 4, None, S_GTORCHSHRT4;
    S_GTORCHSHRT4: SMGT, FF | 3, 4, None, S_GTORCHSHRT;
    S_RTORCHSHRT: SMRT, FF, 4, None, S_RTORCHSHRT2;
    S_RTORCHSHRT2: SMRT, FF | 1, 4, None, S_RTORCHSHRT3;
    S_RTORCHSHRT3: SMRT, FF | 2, 4, None, S_RTORCHSHRT4;
    S_RTORCHSHRT4: SMRT, FF | 3, 4, None, S_RTORCHSHRT;
}

// ============================================================
// Thing flags
// ============================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MobjFlags: u32 {
        /// Call touch_special_thing when touched.
        const SPECIAL = 0x1;
        /// Blocks.
        const SOLID = 0x2;
        /// Can be hit.
        const SHOOTABLE = 0x4;
        /// Don't use the sector links (invisible but touchable).
        const NOSECTOR = 0x8;
        /// Don't use the blocklinks (inert but displayable).
        const NOBLOCKMAP = 0x10;
        /// Not to be activated by sound, deaf monster.
        const AMBUSH = 0x20;
        /// Will try to attack right back.
        const JUSTHIT = 0x40;
        /// Will take at least one step before attacking.
        const JUSTATTACKED = 0x80;
        /// Hang from the ceiling instead of standing on the floor.
        const SPAWNCEILING = 0x100;
        /// Don't apply gravity every tic.
        const NOGRAVITY = 0x200;
        /// Allow jumps from high places.
        const DROPOFF = 0x400;
        /// For players, will pick up items.
        const PICKUP = 0x800;
        /// Player cheat.
        const NOCLIP = 0x1000;
        /// Player: keep info about sliding along walls.
        const SLIDE = 0x2000;
        /// Allow moves to any height, no gravity.
        const FLOAT = 0x4000;
        /// Don't cross lines or look at heights on teleport.
        const TELEPORT = 0x8000;
        /// Don't hit same species, explode on block.
        const MISSILE = 0x10000;
        /// Dropped by a demon, not level spawned.
        const DROPPED = 0x20000;
        /// Use fuzzy draw (shadow demons or spectres).
        const SHADOW = 0x40000;
        /// Don't bleed when shot (use puff).
        const NOBLOOD = 0x80000;
        /// Don't stop moving halfway off a step.
        const CORPSE = 0x100000;
        /// Floating to a height for a move, don't auto float to target's height.
        const INFLOAT = 0x200000;
        /// On kill, count this enemy object towards intermission kill total.
        const COUNTKILL = 0x400000;
        /// On picking up, count this item object towards intermission item total.
        const COUNTITEM = 0x800000;
        /// Special handling: skull in flight.
        const SKULLFLY = 0x1000000;
        /// Don't spawn this object in death match mode.
        const NOTDMATCH = 0x2000000;
        /// Player colour translation, two bits.
        const TRANSLATION = 0xc000000;
    }
}

pub const MF_TRANSSHIFT: u32 = 26;

// ============================================================
// Thing types
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobjInfo {
    pub doomednum: i32,
    pub spawnstate: StateNum,
    pub spawnhealth: i32,
    pub seestate: StateNum,
    pub seesound: SfxId,
    pub reactiontime: i32,
    pub attacksound: SfxId,
    pub painstate: StateNum,
    pub painchance: i32,
    pub painsound: SfxId,
    pub meleestate: StateNum,
    pub missilestate: StateNum,
    pub deathstate: StateNum,
    pub xdeathstate: StateNum,
    pub deathsound: SfxId,
    pub speed: i32,
    pub radius: Fixed,
    pub height: Fixed,
    pub mass: i32,
    pub damage: i32,
    pub activesound: SfxId,
    pub flags: MobjFlags,
}

impl MobjInfo {
    const DEFAULT: MobjInfo = MobjInfo {
        doomednum: -1,
        spawnstate: StateNum::S_NULL,
        spawnhealth: 1000,
        seestate: StateNum::S_NULL,
        seesound: SfxId::None,
        reactiontime: 8,
        attacksound: SfxId::None,
        painstate: StateNum::S_NULL,
        painchance: 0,
        painsound: SfxId::None,
        meleestate: StateNum::S_NULL,
        missilestate: StateNum::S_NULL,
        deathstate: StateNum::S_NULL,
        xdeathstate: StateNum::S_NULL,
        deathsound: SfxId::None,
        speed: 0,
        radius: 20 * F,
        height: 16 * F,
        mass: 100,
        damage: 0,
        activesound: SfxId::None,
        flags: MobjFlags::empty(),
    };
}

macro_rules! define_mobjs {
    ($($name:ident { $($field:ident: $value:expr),* $(,)? })*) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum MobjType { $($name),* }

        pub const NUMMOBJTYPES: usize = <[()]>::len(&[$(unit!($name)),*]);

        const ALL_MOBJTYPES: [MobjType; NUMMOBJTYPES] = [$(MobjType::$name),*];

        pub static MOBJINFO: [MobjInfo; NUMMOBJTYPES] = [
            $(MobjInfo { $($field: $value,)* ..MobjInfo::DEFAULT }),*
        ];
    };
}

impl MobjType {
    #[inline]
    pub fn info(self) -> &'static MobjInfo {
        &MOBJINFO[self as usize]
    }

    pub fn from_index(i: usize) -> Option<MobjType> {
        ALL_MOBJTYPES.get(i).copied()
    }

    /// Flight speed, raised for some missiles with fast monsters.
    pub fn speed(self, fast: bool) -> Fixed {
        match self {
            MobjType::MT_BRUISERSHOT | MobjType::MT_HEADSHOT | MobjType::MT_TROOPSHOT if fast => 20 * FRACUNIT,
            _ => self.info().speed,
        }
    }

    /// Type spawned for a map thing number, if any.
    pub fn from_doomednum(num: i32) -> Option<MobjType> {
        if num <= 0 {
            return None;
        }
        ALL_MOBJTYPES.iter().copied().find(|t| t.info().doomednum == num)
    }
}

use MobjFlags as M;
use SfxId as S;
use StateNum::*;

const MISSILE_FLAGS: MobjFlags = M::NOBLOCKMAP
    .union(M::MISSILE)
    .union(M::DROPOFF)
    .union(M::NOGRAVITY);
const MONSTER_FLAGS: MobjFlags = M::SOLID.union(M::SHOOTABLE).union(M::COUNTKILL);
const FLOATER_FLAGS: MobjFlags = MONSTER_FLAGS.union(M::FLOAT).union(M::NOGRAVITY);
const HANGING: MobjFlags = M::SPAWNCEILING.union(M::NOGRAVITY);
const BONUS: MobjFlags = M::SPECIAL.union(M::COUNTITEM);
const KEY: MobjFlags = M::SPECIAL.union(M::NOTDMATCH);

define_mobjs! {
    MT_PLAYER {
        spawnstate: S_PLAY, spawnhealth: 100, seestate: S_PLAY_RUN1, reactiontime: 0,
        painstate: S_PLAY_PAIN, painchance: 255, painsound: S::plpain,
        missilestate: S_PLAY_ATK1, deathstate: S_PLAY_DIE1, xdeathstate: S_PLAY_XDIE1,
        deathsound: S::pldeth, radius: 16 * F, height: 56 * F,
        flags: M::SOLID.union(M::SHOOTABLE).union(M::DROPOFF).union(M::PICKUP).union(M::NOTDMATCH),
    }
    MT_POSSESSED {
        doomednum: 3004, spawnstate: S_POSS_STND, spawnhealth: 20, seestate: S_POSS_RUN1,
        seesound: S::posit1, attacksound: S::pistol, painstate: S_POSS_PAIN, painchance: 200,
        painsound: S::popain, missilestate: S_POSS_ATK1, deathstate: S_POSS_DIE1,
        xdeathstate: S_POSS_XDIE1, deathsound: S::podth1, speed: 8, height: 56 * F,
        activesound: S::posact, flags: MONSTER_FLAGS,
    }
    MT_SHOTGUY {
        doomednum: 9, spawnstate: S_SPOS_STND, spawnhealth: 30, seestate: S_SPOS_RUN1,
        seesound: S::posit2, painstate: S_SPOS_PAIN, painchance: 170, painsound: S::popain,
        missilestate: S_SPOS_ATK1, deathstate: S_SPOS_DIE1, xdeathstate: S_SPOS_XDIE1,
        deathsound: S::podth2, speed: 8, height: 56 * F, activesound: S::posact,
        flags: MONSTER_FLAGS,
    }
    MT_TROOP {
        doomednum: 3001, spawnstate: S_TROO_STND, spawnhealth: 60, seestate: S_TROO_RUN1,
        seesound: S::bgsit1, painstate: S_TROO_PAIN, painchance: 200, painsound: S::popain,
        meleestate: S_TROO_ATK1, missilestate: S_TROO_ATK1, deathstate: S_TROO_DIE1,
        xdeathstate: S_TROO_XDIE1, deathsound: S::bgdth1, speed: 8, height: 56 * F,
        activesound: S::bgact, flags: MONSTER_FLAGS,
    }
    MT_SERGEANT {
        doomednum: 3002, spawnstate: S_SARG_STND, spawnhealth: 150, seestate: S_SARG_RUN1,
        seesound: S::sgtsit, attacksound: S::sgtatk, painstate: S_SARG_PAIN, painchance: 180,
        painsound: S::dmpain, meleestate: S_SARG_ATK1, deathstate: S_SARG_DIE1,
        deathsound: S::sgtdth, speed: 10, radius: 30 * F, height: 56 * F, mass: 400,
        activesound: S::dmact, flags: MONSTER_FLAGS,
    }
    MT_SHADOWS {
        doomednum: 58, spawnstate: S_SARG_STND, spawnhealth: 150, seestate: S_SARG_RUN1,
        seesound: S::sgtsit, attacksound: S::sgtatk, painstate: S_SARG_PAIN, painchance: 180,
        painsound: S::dmpain, meleestate: S_SARG_ATK1, deathstate: S_SARG_DIE1,
        deathsound: S::sgtdth, speed: 10, radius: 30 * F, height: 56 * F, mass: 400,
        activesound: S::dmact, flags: MONSTER_FLAGS.union(M::SHADOW),
    }
    MT_HEAD {
        doomednum: 3005, spawnstate: S_HEAD_STND, spawnhealth: 400, seestate: S_HEAD_RUN1,
        seesound: S::cacsit, painstate: S_HEAD_PAIN, painchance: 128, painsound: S::dmpain,
        missilestate: S_HEAD_ATK1, deathstate: S_HEAD_DIE1, deathsound: S::cacdth, speed: 8,
        radius: 31 * F, height: 56 * F, mass: 400, activesound: S::dmact, flags: FLOATER_FLAGS,
    }
    MT_BRUISER {
        doomednum: 3003, spawnstate: S_BOSS_STND, spawnhealth: 1000, seestate: S_BOSS_RUN1,
        seesound: S::brssit, painstate: S_BOSS_PAIN, painchance: 50, painsound: S::dmpain,
        meleestate: S_BOSS_ATK1, missilestate: S_BOSS_ATK1, deathstate: S_BOSS_DIE1,
        deathsound: S::brsdth, speed: 8, radius: 24 * F, height: 64 * F, mass: 1000,
        activesound: S::dmact, flags: MONSTER_FLAGS,
    }
    MT_BRUISERSHOT {
        spawnstate: S_BRBALL1, seesound: S::firsht, deathstate: S_BRBALLX1,
        deathsound: S::firxpl, speed: 15 * F, radius: 6 * F, height: 8 * F, damage: 8,
        flags: MISSILE_FLAGS,
    }
    MT_SKULL {
        doomednum: 3006, spawnstate: S_SKULL_STND, spawnhealth: 100, seestate: S_SKULL_RUN1,
        attacksound: S::sklatk, painstate: S_SKULL_PAIN, painchance: 256, painsound: S::dmpain,
        missilestate: S_SKULL_ATK1, deathstate: S_SKULL_DIE1, deathsound: S::firxpl, speed: 8,
        radius: 16 * F, height: 56 * F, mass: 50, damage: 3, activesound: S::dmact,
        flags: M::SOLID.union(M::SHOOTABLE).union(M::FLOAT).union(M::NOGRAVITY),
    }
    MT_SPIDER {
        doomednum: 7, spawnstate: S_SPID_STND, spawnhealth: 3000, seestate: S_SPID_RUN1,
        seesound: S::spisit, attacksound: S::shotgn, painstate: S_SPID_PAIN, painchance: 40,
        painsound: S::dmpain, missilestate: S_SPID_ATK1, deathstate: S_SPID_DIE1,
        deathsound: S::spidth, speed: 12, radius: 128 * F, height: 100 * F, mass: 1000,
        activesound: S::dmact, flags: MONSTER_FLAGS,
    }
    MT_CYBORG {
        doomednum: 16, spawnstate: S_CYBER_STND, spawnhealth: 4000, seestate: S_CYBER_RUN1,
        seesound: S::cybsit, painstate: S_CYBER_PAIN, painchance: 20, painsound: S::dmpain,
        missilestate: S_CYBER_ATK1, deathstate: S_CYBER_DIE1, deathsound: S::cybdth,
        speed: 16, radius: 40 * F, height: 110 * F, mass: 1000, activesound: S::dmact,
        flags: MONSTER_FLAGS,
    }
    MT_BARREL {
        doomednum: 2035, spawnstate: S_BAR1, spawnhealth: 20, deathstate: S_BEXP,
        deathsound: S::barexp, radius: 10 * F, height: 42 * F,
        flags: M::SOLID.union(M::SHOOTABLE).union(M::NOBLOOD),
    }
    MT_TROOPSHOT {
        spawnstate: S_TBALL1, seesound: S::firsht, deathstate: S_TBALLX1,
        deathsound: S::firxpl, speed: 10 * F, radius: 6 * F, height: 8 * F, damage: 3,
        flags: MISSILE_FLAGS,
    }
    MT_HEADSHOT {
        spawnstate: S_RBALL1, seesound: S::firsht, deathstate: S_RBALLX1,
        deathsound: S::firxpl, speed: 10 * F, radius: 6 * F, height: 8 * F, damage: 5,
        flags: MISSILE_FLAGS,
    }
    MT_ROCKET {
        spawnstate: S_ROCKET, seesound: S::rlaunc, deathstate: S_EXPLODE1,
        deathsound: S::barexp, speed: 20 * F, radius: 11 * F, height: 8 * F, damage: 20,
        flags: MISSILE_FLAGS,
    }
    MT_PLASMA {
        spawnstate: S_PLASBALL, seesound: S::plasma, deathstate: S_PLASEXP,
        deathsound: S::firxpl, speed: 25 * F, radius: 13 * F, height: 8 * F, damage: 5,
        flags: MISSILE_FLAGS,
    }
    MT_BFG {
        spawnstate: S_BFGSHOT, deathstate: S_BFGLAND, deathsound: S::rxplod, speed: 25 * F,
        radius: 13 * F, height: 8 * F, damage: 100, flags: MISSILE_FLAGS,
    }
    MT_PUFF {
        spawnstate: S_PUFF1, flags: M::NOBLOCKMAP.union(M::NOGRAVITY),
    }
    MT_BLOOD {
        spawnstate: S_BLOOD1, flags: M::NOBLOCKMAP,
    }
    MT_TFOG {
        spawnstate: S_TFOG, flags: M::NOBLOCKMAP.union(M::NOGRAVITY),
    }
    MT_IFOG {
        spawnstate: S_IFOG, flags: M::NOBLOCKMAP.union(M::NOGRAVITY),
    }
    MT_TELEPORTMAN {
        doomednum: 14, flags: M::NOBLOCKMAP.union(M::NOSECTOR),
    }
    MT_EXTRABFG {
        spawnstate: S_BFGEXP, flags: M::NOBLOCKMAP.union(M::NOGRAVITY),
    }
    MT_MISC0 { doomednum: 2018, spawnstate: S_ARM1, flags: M::SPECIAL }
    MT_MISC1 { doomednum: 2019, spawnstate: S_ARM2, flags: M::SPECIAL }
    MT_MISC2 { doomednum: 2014, spawnstate: S_BON1, flags: BONUS }
    MT_MISC3 { doomednum: 2015, spawnstate: S_BON2, flags: BONUS }
    MT_MISC4 { doomednum: 5, spawnstate: S_BKEY, flags: KEY }
    MT_MISC5 { doomednum: 13, spawnstate: S_RKEY, flags: KEY }
    MT_MISC6 { doomednum: 6, spawnstate: S_YKEY, flags: KEY }
    MT_MISC7 { doomednum: 39, spawnstate: S_YSKULL, flags: KEY }
    MT_MISC8 { doomednum: 38, spawnstate: S_RSKULL, flags: KEY }
    MT_MISC9 { doomednum: 40, spawnstate: S_BSKULL, flags: KEY }
    MT_MISC10 { doomednum: 2011, spawnstate: S_STIM, flags: M::SPECIAL }
    MT_MISC11 { doomednum: 2012, spawnstate: S_MEDI, flags: M::SPECIAL }
    MT_MISC12 { doomednum: 2013, spawnstate: S_SOUL, flags: BONUS }
    MT_INV { doomednum: 2022, spawnstate: S_PINV, flags: BONUS }
    MT_MISC13 { doomednum: 2023, spawnstate: S_PSTR, flags: BONUS }
    MT_INS { doomednum: 2024, spawnstate: S_PINS, flags: BONUS }
    MT_MISC14 { doomednum: 2025, spawnstate: S_SUIT, flags: M::SPECIAL }
    MT_MISC15 { doomednum: 2026, spawnstate: S_PMAP, flags: BONUS }
    MT_MISC16 { doomednum: 2045, spawnstate: S_PVIS, flags: BONUS }
    MT_CLIP { doomednum: 2007, spawnstate: S_CLIP, flags: M::SPECIAL }
    MT_MISC17 { doomednum: 2048, spawnstate: S_AMMO, flags: M::SPECIAL }
    MT_MISC18 { doomednum: 2010, spawnstate: S_ROCK, flags: M::SPECIAL }
    MT_MISC19 { doomednum: 2046, spawnstate: S_BROK, flags: M::SPECIAL }
    MT_MISC20 { doomednum: 2047, spawnstate: S_CELL, flags: M::SPECIAL }
    MT_MISC21 { doomednum: 17, spawnstate: S_CELP, flags: M::SPECIAL }
    MT_MISC22 { doomednum: 2008, spawnstate: S_SHEL, flags: M::SPECIAL }
    MT_MISC23 { doomednum: 2049, spawnstate: S_SBOX, flags: M::SPECIAL }
    MT_MISC24 { doomednum: 8, spawnstate: S_BPAK, flags: M::SPECIAL }
    MT_MISC25 { doomednum: 2006, spawnstate: S_BFUG, flags: M::SPECIAL }
    MT_CHAINGUN { doomednum: 2002, spawnstate: S_MGUN, flags: M::SPECIAL }
    MT_MISC26 { doomednum: 2005, spawnstate: S_CSAW, flags: M::SPECIAL }
    MT_MISC27 { doomednum: 2003, spawnstate: S_LAUN, flags: M::SPECIAL }
    MT_MISC28 { doomednum: 2004, spawnstate: S_PLAS, flags: M::SPECIAL }
    MT_SHOTGUN { doomednum: 2001, spawnstate: S_SHOT, flags: M::SPECIAL }
    MT_MISC29 { doomednum: 48, spawnstate: S_TECHPILLAR, radius: 16 * F, flags: M::SOLID }
    MT_MISC30 { doomednum: 30, spawnstate: S_TALLGRNCOL, radius: 16 * F, flags: M::SOLID }
    MT_MISC31 { doomednum: 31, spawnstate: S_SHRTGRNCOL, radius: 16 * F, flags: M::SOLID }
    MT_MISC32 { doomednum: 32, spawnstate: S_TALLREDCOL, radius: 16 * F, flags: M::SOLID }
    MT_MISC33 { doomednum: 33, spawnstate: S_SHRTREDCOL, radius: 16 * F, flags: M::SOLID }
    MT_MISC34 { doomednum: 37, spawnstate: S_SKULLCOL, radius: 16 * F, flags: M::SOLID }
    MT_MISC35 { doomednum: 36, spawnstate: S_HEARTCOL, radius: 16 * F, flags: M::SOLID }
    MT_MISC36 { doomednum: 41, spawnstate: S_EVILEYE, radius: 16 * F, flags: M::SOLID }
    MT_MISC37 { doomednum: 42, spawnstate: S_FLOATSKULL, radius: 16 * F, flags: M::SOLID }
    MT_MISC38 { doomednum: 43, spawnstate: S_TORCHTREE, radius: 16 * F, flags: M::SOLID }
    MT_MISC39 { doomednum: 44, spawnstate: S_BLUETORCH, radius: 16 * F, flags: M::SOLID }
    MT_MISC40 { doomednum: 45, spawnstate: S_GREENTORCH, radius: 16 * F, flags: M::SOLID }
    MT_MISC41 { doomednum: 46, spawnstate: S_REDTORCH, radius: 16 * F, flags: M::SOLID }
    MT_MISC42 { doomednum: 55, spawnstate: S_BTORCHSHRT, radius: 16 * F, flags: M::SOLID }
    MT_MISC43 { doomednum: 56, spawnstate: S_GTORCHSHRT, radius: 16 * F, flags: M::SOLID }
    MT_MISC44 { doomednum: 57, spawnstate: S_RTORCHSHRT, radius: 16 * F, flags: M::SOLID }
    MT_MISC45 { doomednum: 47, spawnstate: S_STALAGTITE, radius: 16 * F, flags: M::SOLID }
    MT_MISC46 { doomednum: 54, spawnstate: S_BIGTREE, radius: 32 * F, flags: M::SOLID }
    MT_MISC47 { doomednum: 2028, spawnstate: S_COLU, radius: 16 * F, flags: M::SOLID }
    MT_MISC48 { doomednum: 34, spawnstate: S_CANDLESTIK, radius: 20 * F }
    MT_MISC49 { doomednum: 35, spawnstate: S_CANDELABRA, radius: 16 * F, flags: M::SOLID }
    MT_MISC50 {
        doomednum: 49, spawnstate: S_BLOODYTWITCH, radius: 16 * F, height: 68 * F,
        flags: M::SOLID.union(HANGING),
    }
    MT_MISC51 {
        doomednum: 50, spawnstate: S_MEAT2, radius: 16 * F, height: 84 * F,
        flags: M::SOLID.union(HANGING),
    }
    MT_MISC52 {
        doomednum: 51, spawnstate: S_MEAT3, radius: 16 * F, height: 84 * F,
        flags: M::SOLID.union(HANGING),
    }
    MT_MISC53 {
        doomednum: 52, spawnstate: S_MEAT4, radius: 16 * F, height: 68 * F,
        flags: M::SOLID.union(HANGING),
    }
    MT_MISC54 {
        doomednum: 53, spawnstate: S_MEAT5, radius: 16 * F, height: 52 * F,
        flags: M::SOLID.union(HANGING),
    }
    MT_MISC55 { doomednum: 59, spawnstate: S_MEAT2, radius: 20 * F, height: 84 * F, flags: HANGING }
    MT_MISC56 { doomednum: 60, spawnstate: S_MEAT4, radius: 20 * F, height: 68 * F, flags: HANGING }
    MT_MISC57 { doomednum: 61, spawnstate: S_MEAT3, radius: 20 * F, height: 52 * F, flags: HANGING }
    MT_MISC58 { doomednum: 62, spawnstate: S_MEAT5, radius: 20 * F, height: 52 * F, flags: HANGING }
    MT_MISC59 {
        doomednum: 63, spawnstate: S_BLOODYTWITCH, radius: 20 * F, height: 68 * F, flags: HANGING,
    }
    MT_MISC60 { doomednum: 22, spawnstate: S_HEAD_DIE6 }
    MT_MISC61 { doomednum: 15, spawnstate: S_PLAY_DIE7 }
    MT_MISC62 { doomednum: 18, spawnstate: S_POSS_DIE5 }
    MT_MISC63 { doomednum: 21, spawnstate: S_SARG_DIE6 }
    MT_MISC64 { doomednum: 23, spawnstate: S_SKULL_DIE6 }
    MT_MISC65 { doomednum: 20, spawnstate: S_TROO_DIE5 }
    MT_MISC66 { doomednum: 19, spawnstate: S_SPOS_DIE5 }
    MT_MISC67 { doomednum: 10, spawnstate: S_PLAY_XDIE9 }
    MT_MISC68 { doomednum: 12, spawnstate: S_PLAY_XDIE9 }
    MT_MISC69 { doomednum: 28, spawnstate: S_HEADSONSTICK, radius: 16 * F, flags: M::SOLID }
    MT_MISC70 { doomednum: 24, spawnstate: S_GIBS }
    MT_MISC71 { doomednum: 27, spawnstate: S_HEADONASTICK, radius: 16 * F, flags: M::SOLID }
    MT_MISC72 { doomednum: 29, spawnstate: S_HEADCANDLES, radius: 16 * F, flags: M::SOLID }
    MT_MISC73 { doomednum: 25, spawnstate: S_DEADSTICK, radius: 16 * F, flags: M::SOLID }
    MT_MISC74 { doomednum: 26, spawnstate: S_LIVESTICK, radius: 16 * F, flags: M::SOLID }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_chains_stay_in_table() {
        for (i, st) in STATES.iter().enumerate() {
            assert!((st.next as usize) < NUMSTATES, "state {} points outside", i);
            assert!(st.frame & FF_FRAMEMASK < 29, "state {} frame out of range", i);
        }
        assert_eq!(StateNum::from_index(NUMSTATES), None);
        assert_eq!(StateNum::from_index(S_PLAY as usize), Some(S_PLAY));
    }

    #[test]
    fn test_doomednum_lookup() {
        assert_eq!(MobjType::from_doomednum(3001), Some(MobjType::MT_TROOP));
        assert_eq!(MobjType::from_doomednum(2007), Some(MobjType::MT_CLIP));
        assert_eq!(MobjType::from_doomednum(1), None);
        assert_eq!(MobjType::from_doomednum(-1), None);
    }

    #[test]
    fn test_player_info() {
        let info = MobjType::MT_PLAYER.info();
        assert_eq!(info.spawnhealth, 100);
        assert_eq!(info.radius, 16 * FRACUNIT);
        assert!(info.flags.contains(MobjFlags::PICKUP));
        assert_eq!(info.spawnstate.info().sprite, SpriteNum::PLAY);
    }

    #[test]
    fn test_sprite_and_sound_names() {
        assert_eq!(SPRNAMES[SpriteNum::TROO as usize], "TROO");
        assert_eq!(SPRNAMES.len(), NUMSPRITES);
        assert_eq!(SfxId::pistol.lump_name(), "DSPISTOL");
        assert!(Action::FirePistol.is_weapon_action());
        assert!(!Action::Chase.is_weapon_action());
    }
}
