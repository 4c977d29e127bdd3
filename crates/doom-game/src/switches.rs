// switches.rs - Switches, buttons. Two-state animation. Exits.

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

use log::debug;

use doom_common::doomdef::{GameMode, TICRATE};
use doom_common::resources::Resources;
use doom_common::wadfiles::LineFlags;

use crate::ceilings::{ev_do_ceiling, CeilingKind};
use crate::doors::{ev_do_door, ev_do_locked_door, ev_vertical_door, DoorKind};
use crate::floors::{ev_build_stairs, ev_do_donut, ev_do_floor, FloorKind, StairKind};
use crate::info::SfxId;
use crate::lights::ev_light_turn_on;
use crate::plats::{ev_do_plat, PlatKind};
use crate::world::{MobjId, World};

/// 1 second, in ticks.
pub const BUTTONTIME: i32 = TICRATE;

/// Switch texture pairs and the first game that has them:
/// 1 shareware, 2 registered, 3 commercial.
const ALPH_SWITCH_LIST: [(&str, &str, i32); 40] = [
    // Doom shareware episode 1 switches
    ("SW1BRCOM", "SW2BRCOM", 1),
    ("SW1BRN1", "SW2BRN1", 1),
    ("SW1BRN2", "SW2BRN2", 1),
    ("SW1BRNGN", "SW2BRNGN", 1),
    ("SW1BROWN", "SW2BROWN", 1),
    ("SW1COMM", "SW2COMM", 1),
    ("SW1COMP", "SW2COMP", 1),
    ("SW1DIRT", "SW2DIRT", 1),
    ("SW1EXIT", "SW2EXIT", 1),
    ("SW1GRAY", "SW2GRAY", 1),
    ("SW1GRAY1", "SW2GRAY1", 1),
    ("SW1METAL", "SW2METAL", 1),
    ("SW1PIPE", "SW2PIPE", 1),
    ("SW1SLAD", "SW2SLAD", 1),
    ("SW1STARG", "SW2STARG", 1),
    ("SW1STON1", "SW2STON1", 1),
    ("SW1STON2", "SW2STON2", 1),
    ("SW1STONE", "SW2STONE", 1),
    ("SW1STRTN", "SW2STRTN", 1),
    // Doom registered episodes 2&3 switches
    ("SW1BLUE", "SW2BLUE", 2),
    ("SW1CMT", "SW2CMT", 2),
    ("SW1GARG", "SW2GARG", 2),
    ("SW1GSTON", "SW2GSTON", 2),
    ("SW1HOT", "SW2HOT", 2),
    ("SW1LION", "SW2LION", 2),
    ("SW1SATYR", "SW2SATYR", 2),
    ("SW1SKIN", "SW2SKIN", 2),
    ("SW1VINE", "SW2VINE", 2),
    ("SW1WOOD", "SW2WOOD", 2),
    // Doom II switches
    ("SW1PANEL", "SW2PANEL", 3),
    ("SW1ROCK", "SW2ROCK", 3),
    ("SW1MET2", "SW2MET2", 3),
    ("SW1WDMET", "SW2WDMET", 3),
    ("SW1BRIK", "SW2BRIK", 3),
    ("SW1MOD1", "SW2MOD1", 3),
    ("SW1ZIM", "SW2ZIM", 3),
    ("SW1STON6", "SW2STON6", 3),
    ("SW1TEK", "SW2TEK", 3),
    ("SW1MARB", "SW2MARB", 3),
    ("SW1SKULL", "SW2SKULL", 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonWhere {
    Top,
    Middle,
    Bottom,
}

/// A pressed switch waiting to pop back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub line: usize,
    pub where_: ButtonWhere,
    pub btexture: usize,
    pub btimer: i32,
    /// Sector whose sound origin plays the click.
    pub soundorg: usize,
}

/// Texture numbers of the switch pairs present for `mode`, on and off
/// textures side by side so `i ^ 1` is the other state.
pub fn init_switch_list(res: &Resources, mode: GameMode) -> Vec<usize> {
    let episode = match mode {
        GameMode::Registered | GameMode::Retail => 2,
        GameMode::Commercial => 3,
        _ => 1,
    };

    let mut list = Vec::new();
    for &(name1, name2, ep) in ALPH_SWITCH_LIST.iter() {
        if ep > episode {
            continue;
        }
        if let (Some(a), Some(b)) = (
            res.textures.check_num_for_name(name1),
            res.textures.check_num_for_name(name2),
        ) {
            list.push(a);
            list.push(b);
        }
    }
    debug!("{} switch textures", list.len() / 2);
    list
}

/// Start a button counting down till it turns off.
fn start_button(w: &mut World, line: usize, where_: ButtonWhere, texture: usize, time: i32) {
    // See if button is already pressed
    if w.buttons.iter().any(|b| b.btimer != 0 && b.line == line) {
        return;
    }

    let soundorg = w.level.lines[line].frontsector;
    w.buttons.push(Button {
        line,
        where_,
        btexture: texture,
        btimer: time,
        soundorg,
    });
}

/// Function that changes wall texture.
/// Tell it if switch is ok to use again (true=yes, it's a button).
pub fn change_switch_texture(w: &mut World, line: usize, use_again: bool) {
    if !use_again {
        w.level.lines[line].special = 0;
    }

    let Some(sidenum) = w.level.lines[line].sidenum[0] else {
        return;
    };
    let side = &w.level.sides[sidenum];
    let (tex_top, tex_mid, tex_bot) = (side.toptexture, side.midtexture, side.bottomtexture);

    // EXIT SWITCH? checked after the special was cleared above
    let sound = if w.level.lines[line].special == 11 {
        SfxId::swtchx
    } else {
        SfxId::swtchn
    };
    let soundorg = w.level.lines[line].frontsector;

    for i in 0..w.switchlist.len() {
        let pic = w.switchlist[i];
        let other = w.switchlist[i ^ 1];
        let where_ = if pic == tex_top {
            ButtonWhere::Top
        } else if pic == tex_mid {
            ButtonWhere::Middle
        } else if pic == tex_bot {
            ButtonWhere::Bottom
        } else {
            continue;
        };

        w.sector_sound(soundorg, sound);
        let side = &mut w.level.sides[sidenum];
        match where_ {
            ButtonWhere::Top => side.toptexture = other,
            ButtonWhere::Middle => side.midtexture = other,
            ButtonWhere::Bottom => side.bottomtexture = other,
        }

        if use_again {
            start_button(w, line, where_, pic, BUTTONTIME);
        }
        return;
    }
}

/// Count down pressed buttons and pop them back out.
pub fn update_buttons(w: &mut World) {
    for i in 0..w.buttons.len() {
        let b = &mut w.buttons[i];
        if b.btimer == 0 {
            continue;
        }
        b.btimer -= 1;
        if b.btimer != 0 {
            continue;
        }

        let b = *b;
        if let Some(sidenum) = w.level.lines[b.line].sidenum[0] {
            let side = &mut w.level.sides[sidenum];
            match b.where_ {
                ButtonWhere::Top => side.toptexture = b.btexture,
                ButtonWhere::Middle => side.midtexture = b.btexture,
                ButtonWhere::Bottom => side.bottomtexture = b.btexture,
            }
        }
        w.sector_sound(b.soundorg, SfxId::swtchn);
    }
    w.buttons.retain(|b| b.btimer != 0);
}

/// Called when a thing uses a special line.
/// Only the front sides of lines are usable.
pub fn use_special_line(w: &mut World, thing: MobjId, line: usize, side: usize) -> bool {
    let (special, tag, flags, front) = {
        let l = &w.level.lines[line];
        (l.special, l.tag, l.flags, l.frontsector)
    };

    // Err...
    // Use the back sides of VERY SPECIAL lines...
    if side != 0 && special != 124 {
        return false;
    }

    // Switches that other things can activate.
    if w.player_of(thing).is_none() {
        // never open secret doors
        if flags.contains(LineFlags::SECRET) {
            return false;
        }

        match special {
            1 // MANUAL DOOR RAISE
            | 32 // MANUAL BLUE
            | 33 // MANUAL RED
            | 34 => {} // MANUAL YELLOW
            _ => return false,
        }
    }

    // a switch that only fires when its action started something
    let switched = |w: &mut World, started: bool, use_again: bool| {
        if started {
            change_switch_texture(w, line, use_again);
        }
    };
    let floor = |w: &mut World, kind: FloorKind| ev_do_floor(w, tag, Some(front), kind);

    // do something
    match special {
        // MANUALS
        1 // Vertical Door
        | 26 // Blue Door/Locked
        | 27 // Yellow Door /Locked
        | 28 // Red Door /Locked
        | 31 // Manual door open
        | 32 // Blue locked door open
        | 33 // Red locked door open
        | 34 // Yellow locked door open
        | 117 // Blazing door raise
        | 118 => ev_vertical_door(w, line, thing), // Blazing door open

        // SWITCHES
        7 => {
            // Build Stairs
            let s = ev_build_stairs(w, tag, StairKind::Build8);
            switched(w, s, false);
        }
        9 => {
            // Change Donut
            let s = ev_do_donut(w, tag);
            switched(w, s, false);
        }
        11 => {
            // Exit level
            change_switch_texture(w, line, false);
            w.exit_level();
        }
        14 => {
            // Raise Floor 32 and change texture
            let s = ev_do_plat(w, line, PlatKind::RaiseAndChange, 32);
            switched(w, s, false);
        }
        15 => {
            // Raise Floor 24 and change texture
            let s = ev_do_plat(w, line, PlatKind::RaiseAndChange, 24);
            switched(w, s, false);
        }
        18 => {
            // Raise Floor to next highest floor
            let s = floor(w, FloorKind::RaiseFloorToNearest);
            switched(w, s, false);
        }
        20 => {
            // Raise Plat next highest floor and change texture
            let s = ev_do_plat(w, line, PlatKind::RaiseToNearestAndChange, 0);
            switched(w, s, false);
        }
        21 => {
            // PlatDownWaitUpStay
            let s = ev_do_plat(w, line, PlatKind::DownWaitUpStay, 0);
            switched(w, s, false);
        }
        23 => {
            // Lower Floor to Lowest
            let s = floor(w, FloorKind::LowerFloorToLowest);
            switched(w, s, false);
        }
        29 => {
            // Raise Door
            let s = ev_do_door(w, tag, DoorKind::Normal);
            switched(w, s, false);
        }
        41 => {
            // Lower Ceiling to Floor
            let s = ev_do_ceiling(w, tag, CeilingKind::LowerToFloor);
            switched(w, s, false);
        }
        71 => {
            // Turbo Lower Floor
            let s = floor(w, FloorKind::TurboLower);
            switched(w, s, false);
        }
        49 => {
            // Ceiling Crush And Raise
            let s = ev_do_ceiling(w, tag, CeilingKind::CrushAndRaise);
            switched(w, s, false);
        }
        50 => {
            // Close Door
            let s = ev_do_door(w, tag, DoorKind::Close);
            switched(w, s, false);
        }
        51 => {
            // Secret EXIT
            change_switch_texture(w, line, false);
            w.secret_exit_level();
        }
        55 => {
            // Raise Floor Crush
            let s = floor(w, FloorKind::RaiseFloorCrush);
            switched(w, s, false);
        }
        101 => {
            // Raise Floor
            let s = floor(w, FloorKind::RaiseFloor);
            switched(w, s, false);
        }
        102 => {
            // Lower Floor to Surrounding floor height
            let s = floor(w, FloorKind::LowerFloor);
            switched(w, s, false);
        }
        103 => {
            // Open Door
            let s = ev_do_door(w, tag, DoorKind::Open);
            switched(w, s, false);
        }
        111 => {
            // Blazing Door Raise (faster than TURBO!)
            let s = ev_do_door(w, tag, DoorKind::BlazeRaise);
            switched(w, s, false);
        }
        112 => {
            // Blazing Door Open (faster than TURBO!)
            let s = ev_do_door(w, tag, DoorKind::BlazeOpen);
            switched(w, s, false);
        }
        113 => {
            // Blazing Door Close (faster than TURBO!)
            let s = ev_do_door(w, tag, DoorKind::BlazeClose);
            switched(w, s, false);
        }
        122 => {
            // Blazing PlatDownWaitUpStay
            let s = ev_do_plat(w, line, PlatKind::BlazeDwus, 0);
            switched(w, s, false);
        }
        127 => {
            // Build Stairs Turbo 16
            let s = ev_build_stairs(w, tag, StairKind::Turbo16);
            switched(w, s, false);
        }
        131 => {
            // Raise Floor Turbo
            let s = floor(w, FloorKind::RaiseFloorTurbo);
            switched(w, s, false);
        }
        133 | 135 | 137 => {
            // BlzOpenDoor BLUE / RED / YELLOW
            let s = ev_do_locked_door(w, line, DoorKind::BlazeOpen, thing);
            switched(w, s, false);
        }
        140 => {
            // Raise Floor 512
            let s = floor(w, FloorKind::RaiseFloor512);
            switched(w, s, false);
        }

        // BUTTONS
        42 => {
            // Close Door
            let s = ev_do_door(w, tag, DoorKind::Close);
            switched(w, s, true);
        }
        43 => {
            // Lower Ceiling to Floor
            let s = ev_do_ceiling(w, tag, CeilingKind::LowerToFloor);
            switched(w, s, true);
        }
        45 => {
            // Lower Floor to Surrounding floor height
            let s = floor(w, FloorKind::LowerFloor);
            switched(w, s, true);
        }
        60 => {
            // Lower Floor to Lowest
            let s = floor(w, FloorKind::LowerFloorToLowest);
            switched(w, s, true);
        }
        61 => {
            // Open Door
            let s = ev_do_door(w, tag, DoorKind::Open);
            switched(w, s, true);
        }
        62 => {
            // PlatDownWaitUpStay
            let s = ev_do_plat(w, line, PlatKind::DownWaitUpStay, 1);
            switched(w, s, true);
        }
        63 => {
            // Raise Door
            let s = ev_do_door(w, tag, DoorKind::Normal);
            switched(w, s, true);
        }
        64 => {
            // Raise Floor to ceiling
            let s = floor(w, FloorKind::RaiseFloor);
            switched(w, s, true);
        }
        66 => {
            // Raise Floor 24 and change texture
            let s = ev_do_plat(w, line, PlatKind::RaiseAndChange, 24);
            switched(w, s, true);
        }
        67 => {
            // Raise Floor 32 and change texture
            let s = ev_do_plat(w, line, PlatKind::RaiseAndChange, 32);
            switched(w, s, true);
        }
        65 => {
            // Raise Floor Crush
            let s = floor(w, FloorKind::RaiseFloorCrush);
            switched(w, s, true);
        }
        68 => {
            // Raise Plat to next highest floor and change texture
            let s = ev_do_plat(w, line, PlatKind::RaiseToNearestAndChange, 0);
            switched(w, s, true);
        }
        69 => {
            // Raise Floor to next highest floor
            let s = floor(w, FloorKind::RaiseFloorToNearest);
            switched(w, s, true);
        }
        70 => {
            // Turbo Lower Floor
            let s = floor(w, FloorKind::TurboLower);
            switched(w, s, true);
        }
        114 => {
            // Blazing Door Raise (faster than TURBO!)
            let s = ev_do_door(w, tag, DoorKind::BlazeRaise);
            switched(w, s, true);
        }
        115 => {
            // Blazing Door Open (faster than TURBO!)
            let s = ev_do_door(w, tag, DoorKind::BlazeOpen);
            switched(w, s, true);
        }
        116 => {
            // Blazing Door Close (faster than TURBO!)
            let s = ev_do_door(w, tag, DoorKind::BlazeClose);
            switched(w, s, true);
        }
        123 => {
            // Blazing PlatDownWaitUpStay
            let s = ev_do_plat(w, line, PlatKind::BlazeDwus, 0);
            switched(w, s, true);
        }
        132 => {
            // Raise Floor Turbo
            let s = floor(w, FloorKind::RaiseFloorTurbo);
            switched(w, s, true);
        }
        99 | 134 | 136 => {
            // BlzOpenDoor BLUE / RED / YELLOW
            let s = ev_do_locked_door(w, line, DoorKind::BlazeOpen, thing);
            switched(w, s, true);
        }
        138 => {
            // Light Turn On
            ev_light_turn_on(w, tag, 255);
            change_switch_texture(w, line, true);
        }
        139 => {
            // Light Turn Off
            ev_light_turn_on(w, tag, 35);
            change_switch_texture(w, line, true);
        }
        _ => {}
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_world, test_world_with_player};
    use doom_common::testkit::DIVIDER_LINE;

    /// Puts the first switch texture on the middle of the divider.
    fn switch_line(w: &mut World, special: i32) -> usize {
        let on = w.switchlist[0];
        let side = w.level.lines[DIVIDER_LINE].sidenum[0].unwrap();
        w.level.sides[side].midtexture = on;
        w.level.lines[DIVIDER_LINE].special = special;
        w.level.lines[DIVIDER_LINE].tag = 1;
        side
    }

    #[test]
    fn test_switch_list_pairs() {
        let w = test_world();
        let on = w.res.textures.num_for_name("SW1COMP");
        let off = w.res.textures.num_for_name("SW2COMP");
        assert_eq!(w.switchlist, vec![on, off]);
    }

    #[test]
    fn test_button_pops_back_out() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        let side = switch_line(&mut w, 63);
        let (on, off) = (w.switchlist[0], w.switchlist[1]);

        assert!(use_special_line(&mut w, mo, DIVIDER_LINE, 0));
        assert_eq!(w.level.sides[side].midtexture, off);
        assert_eq!(w.buttons.len(), 1);
        assert_eq!(w.level.lines[DIVIDER_LINE].special, 63);

        for _ in 0..BUTTONTIME {
            update_buttons(&mut w);
        }
        assert_eq!(w.level.sides[side].midtexture, on);
        assert!(w.buttons.is_empty());
    }

    #[test]
    fn test_switch_is_used_once() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        switch_line(&mut w, 23);
        w.level.sectors[1].floorheight = 32 * doom_common::fixed::FRACUNIT;
        assert!(use_special_line(&mut w, mo, DIVIDER_LINE, 0));
        assert_eq!(w.level.lines[DIVIDER_LINE].special, 0);
        assert!(w.buttons.is_empty());
    }

    #[test]
    fn test_back_side_and_monsters_rejected() {
        let mut w = test_world();
        let imp = crate::mobj::spawn_mobj(
            &mut w,
            100 * doom_common::fixed::FRACUNIT,
            100 * doom_common::fixed::FRACUNIT,
            crate::local::ONFLOORZ,
            crate::info::MobjType::MT_TROOP,
        );
        w.level.lines[DIVIDER_LINE].special = 23;
        assert!(!use_special_line(&mut w, imp, DIVIDER_LINE, 1));
        assert!(!use_special_line(&mut w, imp, DIVIDER_LINE, 0));
    }

    #[test]
    fn test_exit_switch() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.level.lines[DIVIDER_LINE].special = 11;
        assert!(use_special_line(&mut w, mo, DIVIDER_LINE, 0));
        assert_eq!(w.exit, Some(crate::world::LevelExit::Normal));
    }
}
