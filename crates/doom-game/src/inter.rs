// inter.rs - Handling interactions (i.e., collisions)

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

use doom_common::doomdef::{
    AmmoType, Card, PowerType, Skill, WeaponType, CLIPAMMO, INFRATICS, INVISTICS, INVULNTICS, IRONTICS,
};
use doom_common::fixed::{fixed_mul, FRACUNIT};
use doom_common::tables::{finecosine, finesine, fine_index, point_to_angle, ANG180};

use crate::info::{MobjFlags, MobjType, SfxId, SpriteNum, StateNum};
use crate::local::{BASETHRESHOLD, MAXHEALTH, ONFLOORZ};
use crate::mobj::{remove_mobj, set_mobj_state, spawn_mobj};
use crate::player::{Cheats, PlayerState};
use crate::pspr::{drop_weapon, WEAPONINFO};
use crate::world::{MobjId, SoundOrigin, World};

pub const BONUSADD: i32 = 6;

/// Pickup messages.
pub mod messages {
    pub const GOTARMOR: &str = "Picked up the armor.";
    pub const GOTMEGA: &str = "Picked up the MegaArmor!";
    pub const GOTHTHBONUS: &str = "Picked up a health bonus.";
    pub const GOTARMBONUS: &str = "Picked up an armor bonus.";
    pub const GOTSTIM: &str = "Picked up a stimpack.";
    pub const GOTMEDINEED: &str = "Picked up a medikit that you REALLY need!";
    pub const GOTMEDIKIT: &str = "Picked up a medikit.";
    pub const GOTSUPER: &str = "Supercharge!";

    pub const GOTBLUECARD: &str = "Picked up a blue keycard.";
    pub const GOTYELWCARD: &str = "Picked up a yellow keycard.";
    pub const GOTREDCARD: &str = "Picked up a red keycard.";
    pub const GOTBLUESKUL: &str = "Picked up a blue skull key.";
    pub const GOTYELWSKUL: &str = "Picked up a yellow skull key.";
    pub const GOTREDSKULL: &str = "Picked up a red skull key.";

    pub const GOTINVUL: &str = "Invulnerability!";
    pub const GOTBERSERK: &str = "Berserk!";
    pub const GOTINVIS: &str = "Partial Invisibility";
    pub const GOTSUIT: &str = "Radiation Shielding Suit";
    pub const GOTMAP: &str = "Computer Area Map";
    pub const GOTVISOR: &str = "Light Amplification Visor";

    pub const GOTCLIP: &str = "Picked up a clip.";
    pub const GOTCLIPBOX: &str = "Picked up a box of bullets.";
    pub const GOTROCKET: &str = "Picked up a rocket.";
    pub const GOTROCKBOX: &str = "Picked up a box of rockets.";
    pub const GOTCELL: &str = "Picked up an energy cell.";
    pub const GOTCELLBOX: &str = "Picked up an energy cell pack.";
    pub const GOTSHELLS: &str = "Picked up 4 shotgun shells.";
    pub const GOTSHELLBOX: &str = "Picked up a box of shotgun shells.";
    pub const GOTBACKPACK: &str = "Picked up a backpack full of ammo!";

    pub const GOTBFG9000: &str = "You got the BFG9000!  Oh, yes.";
    pub const GOTCHAINGUN: &str = "You got the chaingun!";
    pub const GOTCHAINSAW: &str = "A chainsaw!  Find some meat!";
    pub const GOTLAUNCHER: &str = "You got the rocket launcher!";
    pub const GOTPLASMA: &str = "You got the plasma gun!";
    pub const GOTSHOTGUN: &str = "You got the shotgun!";
}

use messages::*;

// ============================================================
// GET STUFF
// ============================================================

/// Num is the number of clip loads,
/// not the individual count (0= 1/2 clip).
/// Returns false if the ammo can't be picked up at all
pub fn give_ammo(w: &mut World, pnum: usize, ammo: AmmoType, num: i32) -> bool {
    let Some(a) = ammo.index() else {
        return false;
    };
    let double = matches!(w.options.skill, Skill::Baby | Skill::Nightmare);
    let player = &mut w.players[pnum];

    if player.ammo[a] == player.maxammo[a] {
        return false;
    }

    let mut num = if num != 0 { num * CLIPAMMO[a] } else { CLIPAMMO[a] / 2 };

    if double {
        // give double ammo in trainer mode,
        // you'll need in nightmare
        num <<= 1;
    }

    let oldammo = player.ammo[a];
    player.ammo[a] = (player.ammo[a] + num).min(player.maxammo[a]);

    // If non zero ammo,
    // don't change up weapons,
    // player was lower on purpose.
    if oldammo != 0 {
        return true;
    }

    // We were down to zero,
    // so select a new weapon.
    // Preferences are not user selectable.
    let ready = player.readyweapon;
    let owned = |wp: WeaponType| player.weaponowned[wp as usize];
    let pending = match ammo {
        AmmoType::Clip if ready == WeaponType::Fist => {
            if owned(WeaponType::Chaingun) {
                Some(WeaponType::Chaingun)
            } else {
                Some(WeaponType::Pistol)
            }
        }
        AmmoType::Shell if matches!(ready, WeaponType::Fist | WeaponType::Pistol) => {
            owned(WeaponType::Shotgun).then_some(WeaponType::Shotgun)
        }
        AmmoType::Cell if matches!(ready, WeaponType::Fist | WeaponType::Pistol) => {
            owned(WeaponType::Plasma).then_some(WeaponType::Plasma)
        }
        AmmoType::Missile if ready == WeaponType::Fist => {
            owned(WeaponType::Missile).then_some(WeaponType::Missile)
        }
        _ => None,
    };
    if pending.is_some() {
        player.pendingweapon = pending;
    }

    true
}

/// The weapon name may have a MF_DROPPED flag ored in.
pub fn give_weapon(w: &mut World, pnum: usize, weapon: WeaponType, dropped: bool) -> bool {
    let ammo = WEAPONINFO[weapon as usize].ammo;

    if w.options.netgame && w.options.deathmatch != 2 && !dropped {
        // leave placed weapons forever on net games
        if w.players[pnum].weaponowned[weapon as usize] {
            return false;
        }

        let player = &mut w.players[pnum];
        player.bonuscount += BONUSADD;
        player.weaponowned[weapon as usize] = true;

        if w.options.deathmatch != 0 {
            give_ammo(w, pnum, ammo, 5);
        } else {
            give_ammo(w, pnum, ammo, 2);
        }
        w.players[pnum].pendingweapon = Some(weapon);

        if pnum == w.consoleplayer {
            w.start_sound(SoundOrigin::Global, SfxId::wpnup);
        }
        return false;
    }

    let gaveammo = if ammo != AmmoType::NoAmmo {
        // give one clip with a dropped weapon,
        // two clips with a found weapon
        give_ammo(w, pnum, ammo, if dropped { 1 } else { 2 })
    } else {
        false
    };

    let player = &mut w.players[pnum];
    let gaveweapon = if player.weaponowned[weapon as usize] {
        false
    } else {
        player.weaponowned[weapon as usize] = true;
        player.pendingweapon = Some(weapon);
        true
    };

    gaveweapon || gaveammo
}

/// Returns false if the body isn't needed at all
pub fn give_body(w: &mut World, pnum: usize, num: i32) -> bool {
    let player = &mut w.players[pnum];
    if player.health >= MAXHEALTH {
        return false;
    }

    player.health = (player.health + num).min(MAXHEALTH);
    let health = player.health;
    if let Some(mo) = player.mo.and_then(|id| w.mobjs.get_mut(id)) {
        mo.health = health;
    }

    true
}

/// Returns false if the armor is worse
/// than the current armor.
pub fn give_armor(w: &mut World, pnum: usize, armortype: i32) -> bool {
    let player = &mut w.players[pnum];
    let hits = armortype * 100;
    if player.armorpoints >= hits {
        return false; // don't pick up
    }

    player.armortype = armortype;
    player.armorpoints = hits;

    true
}

pub fn give_card(w: &mut World, pnum: usize, card: Card) {
    let player = &mut w.players[pnum];
    if player.cards[card as usize] {
        return;
    }

    player.bonuscount = BONUSADD;
    player.cards[card as usize] = true;
}

pub fn give_power(w: &mut World, pnum: usize, power: PowerType) -> bool {
    let pw = power as usize;
    match power {
        PowerType::Invulnerability => {
            w.players[pnum].powers[pw] = INVULNTICS;
            true
        }
        PowerType::Invisibility => {
            w.players[pnum].powers[pw] = INVISTICS;
            if let Some(mo) = w.players[pnum].mo.and_then(|id| w.mobjs.get_mut(id)) {
                mo.flags.insert(MobjFlags::SHADOW);
            }
            true
        }
        PowerType::Infrared => {
            w.players[pnum].powers[pw] = INFRATICS;
            true
        }
        PowerType::IronFeet => {
            w.players[pnum].powers[pw] = IRONTICS;
            true
        }
        PowerType::Strength => {
            give_body(w, pnum, 100);
            w.players[pnum].powers[pw] = 1;
            true
        }
        PowerType::AllMap => {
            if w.players[pnum].powers[pw] != 0 {
                return false; // already got it
            }
            w.players[pnum].powers[pw] = 1;
            true
        }
    }
}

fn pick_up_card(w: &mut World, pnum: usize, card: Card, message: &'static str) -> bool {
    if !w.players[pnum].cards[card as usize] {
        w.players[pnum].message = Some(message);
    }
    give_card(w, pnum, card);
    // leave cards for everyone in net games
    !w.options.netgame
}

/// Called when a thing carrying `MF_PICKUP` touches a special thing.
pub fn touch_special_thing(w: &mut World, special: MobjId, toucher: MobjId) {
    let (Some(sp), Some(to)) = (w.mobjs.get(special), w.mobjs.get(toucher)) else {
        return;
    };

    let delta = sp.z - to.z;
    if delta > to.height || delta < -8 * FRACUNIT {
        // out of reach
        return;
    }

    let Some(pnum) = to.player else {
        return;
    };

    // Dead thing touching.
    // Can happen with a sliding player corpse.
    if to.health <= 0 {
        return;
    }

    let sprite = sp.sprite;
    let sp_flags = sp.flags;
    let dropped = sp_flags.contains(MobjFlags::DROPPED);
    let mut sound = SfxId::itemup;

    macro_rules! msg {
        ($m:expr) => {
            w.players[pnum].message = Some($m)
        };
    }

    // Identify by sprite.
    match sprite {
        // armor
        SpriteNum::ARM1 => {
            if !give_armor(w, pnum, 1) {
                return;
            }
            msg!(GOTARMOR);
        }
        SpriteNum::ARM2 => {
            if !give_armor(w, pnum, 2) {
                return;
            }
            msg!(GOTMEGA);
        }

        // bonus items
        SpriteNum::BON1 => {
            let player = &mut w.players[pnum];
            player.health = (player.health + 1).min(200); // can go over 100%
            let health = player.health;
            w.mobjs[toucher].health = health;
            msg!(GOTHTHBONUS);
        }
        SpriteNum::BON2 => {
            let player = &mut w.players[pnum];
            player.armorpoints = (player.armorpoints + 1).min(200); // can go over 100%
            if player.armortype == 0 {
                player.armortype = 1;
            }
            msg!(GOTARMBONUS);
        }
        SpriteNum::SOUL => {
            let player = &mut w.players[pnum];
            player.health = (player.health + 100).min(200);
            let health = player.health;
            w.mobjs[toucher].health = health;
            msg!(GOTSUPER);
            sound = SfxId::getpow;
        }

        // cards
        // leave cards for everyone
        SpriteNum::BKEY => {
            if !pick_up_card(w, pnum, Card::BlueCard, GOTBLUECARD) {
                return;
            }
        }
        SpriteNum::YKEY => {
            if !pick_up_card(w, pnum, Card::YellowCard, GOTYELWCARD) {
                return;
            }
        }
        SpriteNum::RKEY => {
            if !pick_up_card(w, pnum, Card::RedCard, GOTREDCARD) {
                return;
            }
        }
        SpriteNum::BSKU => {
            if !pick_up_card(w, pnum, Card::BlueSkull, GOTBLUESKUL) {
                return;
            }
        }
        SpriteNum::YSKU => {
            if !pick_up_card(w, pnum, Card::YellowSkull, GOTYELWSKUL) {
                return;
            }
        }
        SpriteNum::RSKU => {
            if !pick_up_card(w, pnum, Card::RedSkull, GOTREDSKULL) {
                return;
            }
        }

        // medikits, heals
        SpriteNum::STIM => {
            if !give_body(w, pnum, 10) {
                return;
            }
            msg!(GOTSTIM);
        }
        SpriteNum::MEDI => {
            if !give_body(w, pnum, 25) {
                return;
            }
            // checked after healing, so the urgent message never shows
            if w.players[pnum].health < 25 {
                msg!(GOTMEDINEED);
            } else {
                msg!(GOTMEDIKIT);
            }
        }

        // power ups
        SpriteNum::PINV => {
            if !give_power(w, pnum, PowerType::Invulnerability) {
                return;
            }
            msg!(GOTINVUL);
            sound = SfxId::getpow;
        }
        SpriteNum::PSTR => {
            if !give_power(w, pnum, PowerType::Strength) {
                return;
            }
            msg!(GOTBERSERK);
            if w.players[pnum].readyweapon != WeaponType::Fist {
                w.players[pnum].pendingweapon = Some(WeaponType::Fist);
            }
            sound = SfxId::getpow;
        }
        SpriteNum::PINS => {
            if !give_power(w, pnum, PowerType::Invisibility) {
                return;
            }
            msg!(GOTINVIS);
            sound = SfxId::getpow;
        }
        SpriteNum::SUIT => {
            if !give_power(w, pnum, PowerType::IronFeet) {
                return;
            }
            msg!(GOTSUIT);
            sound = SfxId::getpow;
        }
        SpriteNum::PMAP => {
            if !give_power(w, pnum, PowerType::AllMap) {
                return;
            }
            msg!(GOTMAP);
            sound = SfxId::getpow;
        }
        SpriteNum::PVIS => {
            if !give_power(w, pnum, PowerType::Infrared) {
                return;
            }
            msg!(GOTVISOR);
            sound = SfxId::getpow;
        }

        // ammo
        SpriteNum::CLIP => {
            if !give_ammo(w, pnum, AmmoType::Clip, if dropped { 0 } else { 1 }) {
                return;
            }
            msg!(GOTCLIP);
        }
        SpriteNum::AMMO => {
            if !give_ammo(w, pnum, AmmoType::Clip, 5) {
                return;
            }
            msg!(GOTCLIPBOX);
        }
        SpriteNum::ROCK => {
            if !give_ammo(w, pnum, AmmoType::Missile, 1) {
                return;
            }
            msg!(GOTROCKET);
        }
        SpriteNum::BROK => {
            if !give_ammo(w, pnum, AmmoType::Missile, 5) {
                return;
            }
            msg!(GOTROCKBOX);
        }
        SpriteNum::CELL => {
            if !give_ammo(w, pnum, AmmoType::Cell, 1) {
                return;
            }
            msg!(GOTCELL);
        }
        SpriteNum::CELP => {
            if !give_ammo(w, pnum, AmmoType::Cell, 5) {
                return;
            }
            msg!(GOTCELLBOX);
        }
        SpriteNum::SHEL => {
            if !give_ammo(w, pnum, AmmoType::Shell, 1) {
                return;
            }
            msg!(GOTSHELLS);
        }
        SpriteNum::SBOX => {
            if !give_ammo(w, pnum, AmmoType::Shell, 5) {
                return;
            }
            msg!(GOTSHELLBOX);
        }
        SpriteNum::BPAK => {
            let player = &mut w.players[pnum];
            if !player.backpack {
                for max in player.maxammo.iter_mut() {
                    *max *= 2;
                }
                player.backpack = true;
            }
            for a in [AmmoType::Clip, AmmoType::Shell, AmmoType::Cell, AmmoType::Missile] {
                give_ammo(w, pnum, a, 1);
            }
            msg!(GOTBACKPACK);
        }

        // weapons
        SpriteNum::BFUG => {
            if !give_weapon(w, pnum, WeaponType::Bfg, false) {
                return;
            }
            msg!(GOTBFG9000);
            sound = SfxId::wpnup;
        }
        SpriteNum::MGUN => {
            if !give_weapon(w, pnum, WeaponType::Chaingun, dropped) {
                return;
            }
            msg!(GOTCHAINGUN);
            sound = SfxId::wpnup;
        }
        SpriteNum::CSAW => {
            if !give_weapon(w, pnum, WeaponType::Chainsaw, false) {
                return;
            }
            msg!(GOTCHAINSAW);
            sound = SfxId::wpnup;
        }
        SpriteNum::LAUN => {
            if !give_weapon(w, pnum, WeaponType::Missile, false) {
                return;
            }
            msg!(GOTLAUNCHER);
            sound = SfxId::wpnup;
        }
        SpriteNum::PLAS => {
            if !give_weapon(w, pnum, WeaponType::Plasma, false) {
                return;
            }
            msg!(GOTPLASMA);
            sound = SfxId::wpnup;
        }
        SpriteNum::SHOT => {
            if !give_weapon(w, pnum, WeaponType::Shotgun, dropped) {
                return;
            }
            msg!(GOTSHOTGUN);
            sound = SfxId::wpnup;
        }

        other => {
            warn!("touch_special_thing: unknown gettable thing {:?}", other);
            return;
        }
    }

    if sp_flags.contains(MobjFlags::COUNTITEM) {
        w.players[pnum].itemcount += 1;
    }
    remove_mobj(w, special);
    w.players[pnum].bonuscount += BONUSADD;
    if pnum == w.consoleplayer {
        w.start_sound(SoundOrigin::Global, sound);
    }
}

/// Marks a thing dead: drops its items, updates kill and frag counts and
/// enters its death state.
pub fn kill_mobj(w: &mut World, source: Option<MobjId>, target: MobjId) {
    let mo = &mut w.mobjs[target];
    mo.flags
        .remove(MobjFlags::SHOOTABLE | MobjFlags::FLOAT | MobjFlags::SKULLFLY);

    if mo.kind != MobjType::MT_SKULL {
        mo.flags.remove(MobjFlags::NOGRAVITY);
    }

    mo.flags.insert(MobjFlags::CORPSE | MobjFlags::DROPOFF);
    mo.height >>= 2;

    let countkill = mo.flags.contains(MobjFlags::COUNTKILL);
    let target_player = mo.player;
    let kind = mo.kind;

    let source_player = source.and_then(|s| w.mobjs.get(s)).and_then(|s| s.player);
    if let Some(sp) = source_player {
        // count for intermission
        if countkill {
            w.players[sp].killcount += 1;
        }
        if let Some(tp) = target_player {
            w.players[sp].frags[tp] += 1;
        }
    } else if !w.options.netgame && countkill {
        // count all monster deaths,
        // even those caused by other monsters
        w.players[0].killcount += 1;
    }

    if let Some(tp) = target_player {
        // count environment kills against you
        if source.is_none() {
            w.players[tp].frags[tp] += 1;
        }

        w.mobjs[target].flags.remove(MobjFlags::SOLID);
        w.players[tp].playerstate = PlayerState::Dead;
        drop_weapon(w, tp);
    }

    let info = kind.info();
    let mo = &w.mobjs[target];
    let state = if mo.health < -info.spawnhealth && info.xdeathstate != StateNum::S_NULL {
        info.xdeathstate
    } else {
        info.deathstate
    };
    debug!("{:?} killed by {:?}", kind, source.and_then(|s| w.mobjs.get(s)).map(|s| s.kind));
    if !set_mobj_state(w, target, state) {
        return;
    }

    let r = w.p_random() & 3;
    let mo = &mut w.mobjs[target];
    mo.tics = (mo.tics - r).max(1);

    // Drop stuff.
    // This determines the kind of object spawned
    // during the death frame of a thing.
    let item = match kind {
        MobjType::MT_POSSESSED => MobjType::MT_CLIP,
        MobjType::MT_SHOTGUY => MobjType::MT_SHOTGUN,
        _ => return,
    };

    let (x, y) = (mo.x, mo.y);
    let dropped = spawn_mobj(w, x, y, ONFLOORZ, item);
    // special versions of items
    w.mobjs[dropped].flags.insert(MobjFlags::DROPPED);
}

/// Damages both enemies and players
/// "inflictor" is the thing that caused the damage
///  creature or missile, can be None (slime, etc)
/// "source" is the thing to target after taking damage
///  creature or None
/// Source and inflictor are the same for melee attacks.
/// Source can be None for slime, barrel explosions
/// and other environmental stuff.
pub fn damage_mobj(w: &mut World, target: MobjId, inflictor: Option<MobjId>, source: Option<MobjId>, damage: i32) {
    let Some(mo) = w.mobjs.get_mut(target) else {
        return;
    };
    if !mo.flags.contains(MobjFlags::SHOOTABLE) {
        return; // shouldn't happen...
    }

    if mo.health <= 0 {
        return;
    }

    if mo.flags.contains(MobjFlags::SKULLFLY) {
        mo.momx = 0;
        mo.momy = 0;
        mo.momz = 0;
    }

    let mut damage = damage;
    let player = mo.player;
    if player.is_some() && w.options.skill == Skill::Baby {
        damage >>= 1; // take half damage in trainer mode
    }

    // Some close combat weapons should not
    // inflict thrust and push the victim out of reach,
    // thus kick away unless using the chainsaw.
    let source_mo = source.and_then(|s| w.mobjs.get(s));
    let source_saw = source_mo
        .and_then(|s| s.player)
        .is_some_and(|p| w.players[p].readyweapon == WeaponType::Chainsaw);
    let source_kind = source_mo.map(|s| s.kind);

    if let Some(inf) = inflictor.and_then(|i| w.mobjs.get(i)).map(|i| (i.x, i.y, i.z)) {
        let mo = &w.mobjs[target];
        if !mo.flags.contains(MobjFlags::NOCLIP) && !source_saw {
            let mut ang = point_to_angle(mo.x - inf.0, mo.y - inf.1);
            let mut thrust = damage
                .wrapping_mul(FRACUNIT >> 3)
                .wrapping_mul(100)
                / mo.kind.info().mass;

            // make fall forwards sometimes
            if damage < 40 && damage > mo.health && mo.z - inf.2 > 64 * FRACUNIT && (w.p_random() & 1) != 0 {
                ang = ang.wrapping_add(ANG180);
                thrust *= 4;
            }

            let fine = fine_index(ang);
            let mo = &mut w.mobjs[target];
            mo.momx += fixed_mul(thrust, finecosine(fine));
            mo.momy += fixed_mul(thrust, finesine(fine));
        }
    }

    // player specific
    if let Some(p) = player {
        let mo = &w.mobjs[target];
        let sector = w.level.subsectors[mo.subsector].sector;
        // end of game hell hack
        if w.level.sectors[sector].special == 11 && damage >= mo.health {
            damage = mo.health - 1;
        }

        let pl = &mut w.players[p];

        // Below certain threshold,
        // ignore damage in GOD mode, or with INVUL power.
        if damage < 1000
            && (pl.cheats.contains(Cheats::GODMODE) || pl.powers[PowerType::Invulnerability as usize] != 0)
        {
            return;
        }

        if pl.armortype != 0 {
            let mut saved = if pl.armortype == 1 { damage / 3 } else { damage / 2 };

            if pl.armorpoints <= saved {
                // armor is used up
                saved = pl.armorpoints;
                pl.armortype = 0;
            }
            pl.armorpoints -= saved;
            damage -= saved;
        }
        pl.health = (pl.health - damage).max(0);
        pl.attacker = source;
        pl.damagecount = (pl.damagecount + damage).min(100); // add damage after armor / invuln
    }

    // do the damage
    let mo = &mut w.mobjs[target];
    mo.health -= damage;
    if mo.health <= 0 {
        kill_mobj(w, source, target);
        return;
    }

    let info = mo.kind.info();
    if w.p_random() < info.painchance && !w.mobjs[target].flags.contains(MobjFlags::SKULLFLY) {
        w.mobjs[target].flags.insert(MobjFlags::JUSTHIT); // fight back!
        if !set_mobj_state(w, target, info.painstate) {
            return;
        }
    }

    let Some(mo) = w.mobjs.get_mut(target) else {
        return;
    };
    mo.reactiontime = 0; // we're awake now...

    if mo.threshold == 0 {
        if let Some(src) = source.filter(|&s| s != target && source_kind.is_some()) {
            // if not intent on another player,
            // chase after this one
            mo.target = Some(src);
            mo.threshold = BASETHRESHOLD;
            if mo.state == info.spawnstate && info.seestate != StateNum::S_NULL {
                set_mobj_state(w, target, info.seestate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_world_with_player;
    use doom_common::fixed::FRACUNIT;

    fn player_mo(w: &World) -> MobjId {
        w.players[0].mo.unwrap()
    }

    #[test]
    fn test_clip_pickup() {
        let mut w = test_world_with_player();
        let pmo = player_mo(&w);
        let (x, y) = (w.mobjs[pmo].x, w.mobjs[pmo].y);
        let clip = spawn_mobj(&mut w, x, y, ONFLOORZ, MobjType::MT_CLIP);
        touch_special_thing(&mut w, clip, pmo);
        assert!(!w.mobjs.contains(clip));
        assert_eq!(w.players[0].ammo[AmmoType::Clip as usize], 60);
        assert_eq!(w.players[0].message, Some(GOTCLIP));
        assert_eq!(w.players[0].bonuscount, BONUSADD);
    }

    #[test]
    fn test_full_health_leaves_stimpack() {
        let mut w = test_world_with_player();
        let pmo = player_mo(&w);
        let (x, y) = (w.mobjs[pmo].x, w.mobjs[pmo].y);
        let stim = spawn_mobj(&mut w, x, y, ONFLOORZ, MobjType::MT_MISC10);
        touch_special_thing(&mut w, stim, pmo);
        assert!(w.mobjs.contains(stim));

        w.players[0].health = 50;
        touch_special_thing(&mut w, stim, pmo);
        assert!(!w.mobjs.contains(stim));
        assert_eq!(w.players[0].health, 60);
        assert_eq!(w.mobjs[pmo].health, 60);
    }

    #[test]
    fn test_weapon_pickup_switches() {
        let mut w = test_world_with_player();
        assert!(give_weapon(&mut w, 0, WeaponType::Shotgun, false));
        assert_eq!(w.players[0].pendingweapon, Some(WeaponType::Shotgun));
        assert_eq!(w.players[0].ammo[AmmoType::Shell as usize], 8);
        // owned and shells not full: still picked up for the ammo
        assert!(give_weapon(&mut w, 0, WeaponType::Shotgun, true));
        assert_eq!(w.players[0].ammo[AmmoType::Shell as usize], 12);
    }

    #[test]
    fn test_empty_ammo_selects_weapon() {
        let mut w = test_world_with_player();
        let p = &mut w.players[0];
        p.readyweapon = WeaponType::Fist;
        p.pendingweapon = None;
        p.ammo[AmmoType::Clip as usize] = 0;
        assert!(give_ammo(&mut w, 0, AmmoType::Clip, 1));
        assert_eq!(w.players[0].pendingweapon, Some(WeaponType::Pistol));
    }

    #[test]
    fn test_armor_absorbs_damage() {
        let mut w = test_world_with_player();
        let pmo = player_mo(&w);
        give_armor(&mut w, 0, 1);
        damage_mobj(&mut w, pmo, None, None, 30);
        assert_eq!(w.players[0].armorpoints, 90);
        assert_eq!(w.players[0].health, 80);
        assert_eq!(w.mobjs[pmo].health, 80);
        assert_eq!(w.players[0].damagecount, 20);
    }

    #[test]
    fn test_god_mode_ignores_damage() {
        let mut w = test_world_with_player();
        let pmo = player_mo(&w);
        w.players[0].cheats.insert(Cheats::GODMODE);
        damage_mobj(&mut w, pmo, None, None, 50);
        assert_eq!(w.mobjs[pmo].health, 100);
        damage_mobj(&mut w, pmo, None, None, 10000);
        assert!(w.mobjs[pmo].health <= 0);
    }

    #[test]
    fn test_kill_drops_clip_and_counts() {
        let mut w = test_world_with_player();
        let pmo = player_mo(&w);
        let zombie = spawn_mobj(&mut w, 200 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_POSSESSED);
        damage_mobj(&mut w, zombie, Some(pmo), Some(pmo), 100);
        let mo = &w.mobjs[zombie];
        assert!(mo.flags.contains(MobjFlags::CORPSE));
        assert!(!mo.flags.contains(MobjFlags::SHOOTABLE));
        assert_eq!(w.players[0].killcount, 1);
        let clip = w.mobjs.iter().find(|m| m.kind == MobjType::MT_CLIP).unwrap();
        assert!(clip.flags.contains(MobjFlags::DROPPED));
    }

    #[test]
    fn test_damage_sets_target() {
        let mut w = test_world_with_player();
        let pmo = player_mo(&w);
        let imp = spawn_mobj(&mut w, 200 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        damage_mobj(&mut w, imp, Some(pmo), Some(pmo), 1);
        let mo = &w.mobjs[imp];
        assert_eq!(mo.target, Some(pmo));
        assert_eq!(mo.threshold, BASETHRESHOLD);
        assert_ne!(mo.state, StateNum::S_TROO_STND);
    }

    #[test]
    fn test_player_death() {
        let mut w = test_world_with_player();
        let pmo = player_mo(&w);
        damage_mobj(&mut w, pmo, None, None, 200);
        assert_eq!(w.players[0].playerstate, PlayerState::Dead);
        assert_eq!(w.players[0].frags[0], 1);
        assert!(!w.mobjs[pmo].flags.contains(MobjFlags::SOLID));
    }
}
