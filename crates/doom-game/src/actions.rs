// actions.rs - State action dispatch

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

use log::warn;

use crate::enemy::*;
use crate::info::Action;
use crate::pspr::*;
use crate::world::{MobjId, World};

/// Run the action of a thing's new state.
pub fn call_mobj_action(w: &mut World, mo: MobjId, action: Action) {
    match action {
        Action::None => {}
        Action::BFGSpray => a_bfg_spray(w, mo),
        Action::Explode => a_explode(w, mo),
        Action::Pain => a_pain(w, mo),
        Action::PlayerScream => a_player_scream(w, mo),
        Action::Fall => a_fall(w, mo),
        Action::XScream => a_xscream(w, mo),
        Action::Look => a_look(w, mo),
        Action::Chase => a_chase(w, mo),
        Action::FaceTarget => a_face_target(w, mo),
        Action::PosAttack => a_pos_attack(w, mo),
        Action::Scream => a_scream(w, mo),
        Action::SPosAttack => a_spos_attack(w, mo),
        Action::TroopAttack => a_troop_attack(w, mo),
        Action::SargAttack => a_sarg_attack(w, mo),
        Action::HeadAttack => a_head_attack(w, mo),
        Action::BruisAttack => a_bruis_attack(w, mo),
        Action::SkullAttack => a_skull_attack(w, mo),
        Action::Metal => a_metal(w, mo),
        Action::SpidRefire => a_spid_refire(w, mo),
        Action::Hoof => a_hoof(w, mo),
        Action::CyberAttack => a_cyber_attack(w, mo),
        Action::BossDeath => a_boss_death(w, mo),
        weapon => warn!("weapon action {:?} on a thing state", weapon),
    }
}

/// Run the action of a player sprite's new state.
pub fn call_psprite_action(w: &mut World, pnum: usize, psp: usize, action: Action) {
    match action {
        Action::None => {}
        Action::Light0 => a_light0(w, pnum, psp),
        Action::WeaponReady => a_weapon_ready(w, pnum, psp),
        Action::Lower => a_lower(w, pnum, psp),
        Action::Raise => a_raise(w, pnum, psp),
        Action::Punch => a_punch(w, pnum, psp),
        Action::ReFire => a_refire(w, pnum, psp),
        Action::FirePistol => a_fire_pistol(w, pnum, psp),
        Action::Light1 => a_light1(w, pnum, psp),
        Action::FireShotgun => a_fire_shotgun(w, pnum, psp),
        Action::Light2 => a_light2(w, pnum, psp),
        Action::FireCGun => a_fire_cgun(w, pnum, psp),
        Action::GunFlash => a_gun_flash(w, pnum, psp),
        Action::FireMissile => a_fire_missile(w, pnum, psp),
        Action::Saw => a_saw(w, pnum, psp),
        Action::FirePlasma => a_fire_plasma(w, pnum, psp),
        Action::BFGsound => a_bfg_sound(w, pnum, psp),
        Action::FireBFG => a_fire_bfg(w, pnum, psp),
        thing => warn!("thing action {:?} on a player sprite state", thing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{MobjFlags, MobjType};
    use crate::local::ONFLOORZ;
    use crate::mobj::spawn_mobj;
    use crate::testutil::test_world;
    use doom_common::fixed::FRACUNIT;

    #[test]
    fn test_mobj_action_dispatch() {
        let mut w = test_world();
        let imp = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        call_mobj_action(&mut w, imp, Action::Fall);
        assert!(!w.mobjs[imp].flags.contains(MobjFlags::SOLID));
    }

    #[test]
    fn test_misplaced_actions_are_ignored() {
        let mut w = test_world();
        let imp = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        call_mobj_action(&mut w, imp, Action::FirePistol);
        call_psprite_action(&mut w, 0, 0, Action::Chase);
        assert!(w.mobjs[imp].flags.contains(MobjFlags::SOLID));
    }
}
