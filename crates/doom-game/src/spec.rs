// spec.rs - Implements special effects:
// texture animation, height or lighting changes
// according to adjacent sectors, respective
// utility functions, etc.
// Line tag handling. Line and sector triggers.

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

use doom_common::doomdef::PowerType;
use doom_common::fixed::{Fixed, FRACUNIT};
use doom_common::resources::Resources;

use crate::ceilings::{ceiling_crush_stop, ev_do_ceiling, CeilingKind};
use crate::doors::{ev_do_door, spawn_door_close_in_30, spawn_door_raise_in_5_mins, DoorKind};
use crate::floors::{ev_build_stairs, ev_do_floor, FloorKind, StairKind};
use crate::info::MobjType;
use crate::inter::damage_mobj;
use crate::level::Level;
use crate::lights::{
    ev_light_turn_on, ev_start_light_strobing, ev_turn_tag_lights_off, spawn_fire_flicker,
    spawn_glowing_light, spawn_light_flash, spawn_strobe_flash, FASTDARK, SLOWDARK,
};
use crate::plats::{ev_do_plat, ev_stop_plat, PlatKind};
use crate::player::Cheats;
use crate::switches::{change_switch_texture, update_buttons};
use crate::telept::ev_teleport;
use crate::world::{MobjId, World};

// ============================================================
// Animating textures and planes
// ============================================================

struct AnimDef {
    istexture: bool,
    endname: &'static str,
    startname: &'static str,
    speed: i32,
}

const fn def(istexture: bool, endname: &'static str, startname: &'static str) -> AnimDef {
    AnimDef {
        istexture,
        endname,
        startname,
        speed: 8,
    }
}

/// Floor/ceiling animation sequences, defined by first and last frame,
/// i.e. the flat (64x64 tile) name to be used.
/// The full animation sequence is given using all the flats between
/// the start and end entry, in the order found in the WAD file.
const ANIMDEFS: [AnimDef; 22] = [
    def(false, "NUKAGE3", "NUKAGE1"),
    def(false, "FWATER4", "FWATER1"),
    def(false, "SWATER4", "SWATER1"),
    def(false, "LAVA4", "LAVA1"),
    def(false, "BLOOD3", "BLOOD1"),
    // DOOM II flat animations.
    def(false, "RROCK08", "RROCK05"),
    def(false, "SLIME04", "SLIME01"),
    def(false, "SLIME08", "SLIME05"),
    def(false, "SLIME12", "SLIME09"),
    def(true, "BLODGR4", "BLODGR1"),
    def(true, "SLADRIP3", "SLADRIP1"),
    def(true, "BLODRIP4", "BLODRIP1"),
    def(true, "FIREWALL", "FIREWALA"),
    def(true, "GSTFONT3", "GSTFONT1"),
    def(true, "FIRELAVA", "FIRELAV3"),
    def(true, "FIREMAG3", "FIREMAG1"),
    def(true, "FIREBLU2", "FIREBLU1"),
    def(true, "ROCKRED3", "ROCKRED1"),
    def(true, "BFALL4", "BFALL1"),
    def(true, "SFALL4", "SFALL1"),
    def(true, "WFALL4", "WFALL1"),
    def(true, "DBRAIN4", "DBRAIN1"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anim {
    istexture: bool,
    basepic: usize,
    numpics: usize,
    speed: i32,
}

/// Texture and flat translation tables. The renderer draws
/// `texturetranslation[n]` wherever texture `n` is used.
#[derive(Debug, Clone, Default)]
pub struct Animations {
    anims: Vec<Anim>,
    pub texturetranslation: Vec<usize>,
    pub flattranslation: Vec<usize>,
}

impl Animations {
    pub fn new(res: &Resources) -> Animations {
        let mut anims = Vec::new();

        for def in ANIMDEFS.iter() {
            let range = if def.istexture {
                // different episode ?
                match (
                    res.textures.check_num_for_name(def.startname),
                    res.textures.check_num_for_name(def.endname),
                ) {
                    (Some(base), Some(pic)) => Some((base, pic)),
                    _ => None,
                }
            } else {
                match (
                    res.flats.check_num_for_name(def.startname),
                    res.flats.check_num_for_name(def.endname),
                ) {
                    (Some(base), Some(pic)) => Some((base, pic)),
                    _ => None,
                }
            };
            let Some((basepic, picnum)) = range else {
                continue;
            };

            if picnum < basepic + 1 {
                warn!("bad cycle from {} to {}", def.startname, def.endname);
                continue;
            }

            anims.push(Anim {
                istexture: def.istexture,
                basepic,
                numpics: picnum - basepic + 1,
                speed: def.speed,
            });
        }
        debug!("{} animated texture/flat sequences", anims.len());

        Animations {
            anims,
            texturetranslation: (0..res.textures.len()).collect(),
            flattranslation: (0..res.flats.len()).collect(),
        }
    }

    /// Advances every sequence to its frame for `leveltime`.
    pub fn animate(&mut self, leveltime: i32) {
        for anim in &self.anims {
            for i in anim.basepic..anim.basepic + anim.numpics {
                let pic = anim.basepic
                    + ((leveltime / anim.speed) as usize + i) % anim.numpics;
                let table = if anim.istexture {
                    &mut self.texturetranslation
                } else {
                    &mut self.flattranslation
                };
                if let Some(slot) = table.get_mut(i) {
                    *slot = pic;
                }
            }
        }
    }

    #[inline]
    pub fn texture(&self, num: usize) -> usize {
        self.texturetranslation.get(num).copied().unwrap_or(num)
    }

    #[inline]
    pub fn flat(&self, num: usize) -> usize {
        self.flattranslation.get(num).copied().unwrap_or(num)
    }
}

// ============================================================
// UTILITIES
// ============================================================

/// Given the sector number and the line number,
/// it will tell you whether the line is two-sided or not.
pub fn two_sided(level: &Level, sector: usize, line: usize) -> bool {
    level.lines[level.sectors[sector].lines[line]].is_two_sided()
}

/// Find lowest floor height in surrounding sectors.
pub fn find_lowest_floor_surrounding(level: &Level, sec: usize) -> Fixed {
    let mut floor = level.sectors[sec].floorheight;

    for &line in &level.sectors[sec].lines {
        if let Some(other) = level.get_next_sector(line, sec) {
            floor = floor.min(level.sectors[other].floorheight);
        }
    }
    floor
}

/// Find highest floor height in surrounding sectors.
pub fn find_highest_floor_surrounding(level: &Level, sec: usize) -> Fixed {
    let mut floor = -500 * FRACUNIT;

    for &line in &level.sectors[sec].lines {
        if let Some(other) = level.get_next_sector(line, sec) {
            floor = floor.max(level.sectors[other].floorheight);
        }
    }
    floor
}

/// Find the next floor height above `currentheight` in surrounding
/// sectors, or `currentheight` itself if there is none.
pub fn find_next_highest_floor(level: &Level, sec: usize, currentheight: Fixed) -> Fixed {
    level.sectors[sec]
        .lines
        .iter()
        .filter_map(|&line| level.get_next_sector(line, sec))
        .map(|other| level.sectors[other].floorheight)
        .filter(|&h| h > currentheight)
        .min()
        .unwrap_or(currentheight)
}

/// Find lowest ceiling in the surrounding sectors.
pub fn find_lowest_ceiling_surrounding(level: &Level, sec: usize) -> Fixed {
    let mut height = i32::MAX;

    for &line in &level.sectors[sec].lines {
        if let Some(other) = level.get_next_sector(line, sec) {
            height = height.min(level.sectors[other].ceilingheight);
        }
    }
    height
}

/// Find highest ceiling in the surrounding sectors.
pub fn find_highest_ceiling_surrounding(level: &Level, sec: usize) -> Fixed {
    let mut height = 0;

    for &line in &level.sectors[sec].lines {
        if let Some(other) = level.get_next_sector(line, sec) {
            height = height.max(level.sectors[other].ceilingheight);
        }
    }
    height
}

/// Find minimum light from an adjacent sector.
pub fn find_min_surrounding_light(level: &Level, sec: usize, max: i32) -> i32 {
    let mut min = max;

    for &line in &level.sectors[sec].lines {
        if let Some(check) = level.get_next_sector(line, sec) {
            min = min.min(level.sectors[check].lightlevel);
        }
    }
    min
}

/// Next sector after `start` carrying `tag`, searching in index order.
pub fn find_sector_from_tag(level: &Level, tag: i32, start: Option<usize>) -> Option<usize> {
    let from = start.map_or(0, |s| s + 1);
    (from..level.sectors.len()).find(|&i| level.sectors[i].tag == tag)
}

// ============================================================
// EVENTS
// Events are operations triggered by using, crossing,
// or shooting special lines, or by timed thinkers.
// ============================================================

fn floor(w: &mut World, line: usize, kind: FloorKind) -> bool {
    let l = &w.level.lines[line];
    let (tag, front) = (l.tag, l.frontsector);
    ev_do_floor(w, tag, Some(front), kind)
}

fn door(w: &mut World, line: usize, kind: DoorKind) -> bool {
    let tag = w.level.lines[line].tag;
    ev_do_door(w, tag, kind)
}

fn ceiling(w: &mut World, line: usize, kind: CeilingKind) -> bool {
    let tag = w.level.lines[line].tag;
    ev_do_ceiling(w, tag, kind)
}

/// Run the line action for a trigger or retrigger line.
fn line_action(w: &mut World, line: usize, special: i32, side: usize, thing: MobjId) {
    let is_player = w.mobjs[thing].player.is_some();
    let tag = w.level.lines[line].tag;

    match special {
        // Doors
        2 | 86 => {
            door(w, line, DoorKind::Open);
        }
        3 | 75 => {
            door(w, line, DoorKind::Close);
        }
        4 | 90 => {
            door(w, line, DoorKind::Normal);
        }
        16 | 76 => {
            door(w, line, DoorKind::Close30ThenOpen);
        }
        108 | 105 => {
            door(w, line, DoorKind::BlazeRaise);
        }
        109 | 106 => {
            door(w, line, DoorKind::BlazeOpen);
        }
        110 | 107 => {
            door(w, line, DoorKind::BlazeClose);
        }

        // Floors
        5 | 91 => {
            floor(w, line, FloorKind::RaiseFloor);
        }
        19 | 83 => {
            floor(w, line, FloorKind::LowerFloor);
        }
        30 | 96 => {
            floor(w, line, FloorKind::RaiseToTexture);
        }
        36 | 98 => {
            floor(w, line, FloorKind::TurboLower);
        }
        37 | 84 => {
            floor(w, line, FloorKind::LowerAndChange);
        }
        38 | 82 => {
            floor(w, line, FloorKind::LowerFloorToLowest);
        }
        56 | 94 => {
            floor(w, line, FloorKind::RaiseFloorCrush);
        }
        58 | 92 => {
            floor(w, line, FloorKind::RaiseFloor24);
        }
        59 | 93 => {
            floor(w, line, FloorKind::RaiseFloor24AndChange);
        }
        119 | 128 => {
            floor(w, line, FloorKind::RaiseFloorToNearest);
        }
        130 | 129 => {
            floor(w, line, FloorKind::RaiseFloorTurbo);
        }
        8 => {
            ev_build_stairs(w, tag, StairKind::Build8);
        }
        100 => {
            ev_build_stairs(w, tag, StairKind::Turbo16);
        }

        // Ceilings
        6 | 77 => {
            ceiling(w, line, CeilingKind::FastCrushAndRaise);
        }
        25 | 73 => {
            ceiling(w, line, CeilingKind::CrushAndRaise);
        }
        44 | 72 => {
            ceiling(w, line, CeilingKind::LowerAndCrush);
        }
        141 => {
            ceiling(w, line, CeilingKind::SilentCrushAndRaise);
        }
        40 => {
            ceiling(w, line, CeilingKind::RaiseToHighest);
            floor(w, line, FloorKind::LowerFloorToLowest);
        }
        57 | 74 => {
            ceiling_crush_stop(w, tag);
        }

        // Platforms
        10 | 88 => {
            ev_do_plat(w, line, PlatKind::DownWaitUpStay, 0);
        }
        22 | 95 => {
            ev_do_plat(w, line, PlatKind::RaiseToNearestAndChange, 0);
        }
        53 | 87 => {
            ev_do_plat(w, line, PlatKind::PerpetualRaise, 0);
        }
        121 | 120 => {
            ev_do_plat(w, line, PlatKind::BlazeDwus, 0);
        }
        54 | 89 => ev_stop_plat(w, tag),

        // Lights
        12 | 80 => ev_light_turn_on(w, tag, 0),
        13 | 81 => ev_light_turn_on(w, tag, 255),
        35 | 79 => ev_light_turn_on(w, tag, 35),
        17 => ev_start_light_strobing(w, tag),
        104 => ev_turn_tag_lights_off(w, tag),

        // Teleports
        39 | 97 => {
            ev_teleport(w, line, side, thing);
        }
        125 | 126 => {
            if !is_player {
                ev_teleport(w, line, side, thing);
            }
        }

        // Exits
        52 => w.exit_level(),
        124 => w.secret_exit_level(),

        _ => {}
    }
}

/// Is a once-only trigger (cleared after use)?
fn is_trigger(special: i32) -> bool {
    matches!(
        special,
        2 | 3 | 4 | 5 | 6 | 8 | 10 | 12 | 13 | 16 | 17 | 19 | 22 | 25 | 30 | 35 | 36 | 37 | 38
            | 39 | 40 | 44 | 53 | 54 | 56 | 57 | 58 | 59 | 100 | 104 | 108 | 109 | 110 | 119
            | 121 | 130 | 141
    )
}

/// Called every time a thing origin is about
/// to cross a line with a non 0 special.
pub fn cross_special_line(w: &mut World, line: usize, side: usize, thing: MobjId) {
    let special = w.level.lines[line].special;
    let Some(mo) = w.mobjs.get(thing) else {
        return;
    };

    // Triggers that other things can activate
    if mo.player.is_none() {
        // Things that should NOT trigger specials...
        match mo.kind {
            MobjType::MT_ROCKET
            | MobjType::MT_PLASMA
            | MobjType::MT_BFG
            | MobjType::MT_TROOPSHOT
            | MobjType::MT_HEADSHOT
            | MobjType::MT_BRUISERSHOT => return,
            _ => {}
        }

        let ok = matches!(
            special,
            39  // TELEPORT TRIGGER
            | 97  // TELEPORT RETRIGGER
            | 125 // TELEPORT MONSTERONLY TRIGGER
            | 126 // TELEPORT MONSTERONLY RETRIGGER
            | 4   // RAISE DOOR
            | 10  // PLAT DOWN-WAIT-UP-STAY TRIGGER
            | 88 // PLAT DOWN-WAIT-UP-STAY RETRIGGER
        );
        if !ok {
            return;
        }
    }

    // the monster-only teleport trigger stays armed for players
    if special == 125 && w.mobjs[thing].player.is_some() {
        return;
    }

    line_action(w, line, special, side, thing);

    if is_trigger(special) {
        w.level.lines[line].special = 0;
    }
}

/// Called when a thing shoots a special line.
pub fn shoot_special_line(w: &mut World, thing: MobjId, line: usize) {
    let special = w.level.lines[line].special;
    let Some(mo) = w.mobjs.get(thing) else {
        return;
    };

    // Impacts that other things can activate.
    if mo.player.is_none() && special != 46 {
        return;
    }

    match special {
        24 => {
            // RAISE FLOOR
            floor(w, line, FloorKind::RaiseFloor);
            change_switch_texture(w, line, false);
        }
        46 => {
            // OPEN DOOR
            door(w, line, DoorKind::Open);
            change_switch_texture(w, line, true);
        }
        47 => {
            // RAISE FLOOR NEAR AND CHANGE
            ev_do_plat(w, line, PlatKind::RaiseToNearestAndChange, 0);
            change_switch_texture(w, line, false);
        }
        _ => {}
    }
}

/// Called every tic frame
/// that the player origin is in a special sector
pub fn player_in_special_sector(w: &mut World, pnum: usize) {
    let Some(mo) = w.players[pnum].mo else {
        return;
    };
    let sector = w.sector_of(mo);

    // Falling, not all the way down yet?
    if w.mobjs[mo].z != w.level.sectors[sector].floorheight {
        return;
    }

    let ironfeet = w.players[pnum].powers[PowerType::IronFeet as usize] != 0;
    let on_tic = w.leveltime & 0x1f == 0;

    // Has hitten ground.
    match w.level.sectors[sector].special {
        5 => {
            // HELLSLIME DAMAGE
            if !ironfeet && on_tic {
                damage_mobj(w, mo, None, None, 10);
            }
        }
        7 => {
            // NUKAGE DAMAGE
            if !ironfeet && on_tic {
                damage_mobj(w, mo, None, None, 5);
            }
        }
        16 | 4 => {
            // SUPER HELLSLIME DAMAGE
            // STROBE HURT
            if (!ironfeet || w.p_random() < 5) && on_tic {
                damage_mobj(w, mo, None, None, 20);
            }
        }
        9 => {
            // SECRET SECTOR
            w.players[pnum].secretcount += 1;
            w.level.sectors[sector].special = 0;
        }
        11 => {
            // EXIT SUPER DAMAGE! (for E1M8 finale)
            w.players[pnum].cheats.remove(Cheats::GODMODE);

            if on_tic {
                damage_mobj(w, mo, None, None, 20);
            }

            if w.players[pnum].health <= 10 {
                w.exit_level();
            }
        }
        other => {
            warn!("player in sector {} with unknown special {}", sector, other);
        }
    }
}

/// Animate planes, scroll walls, change button textures.
pub fn update_specials(w: &mut World) {
    // ANIMATE FLATS AND TEXTURES GLOBALLY
    w.anims.animate(w.leveltime);

    // ANIMATE LINE SPECIALS
    for &line in &w.scrollers {
        if let Some(side) = w.level.lines[line].sidenum[0] {
            w.level.sides[side].textureoffset += FRACUNIT;
        }
    }

    // DO BUTTONS
    update_buttons(w);
}

// ============================================================
// SPECIAL SPAWNING
// ============================================================

/// After the map has been loaded, scan for specials
/// that spawn thinkers.
pub fn spawn_specials(w: &mut World) {
    // Init special SECTORs.
    for sector in 0..w.level.sectors.len() {
        match w.level.sectors[sector].special {
            0 => {}
            // FLICKERING LIGHTS
            1 => spawn_light_flash(w, sector),
            // STROBE FAST
            2 => spawn_strobe_flash(w, sector, FASTDARK, false),
            // STROBE SLOW
            3 => spawn_strobe_flash(w, sector, SLOWDARK, false),
            4 => {
                // STROBE FAST/DEATH SLIME
                spawn_strobe_flash(w, sector, FASTDARK, false);
                w.level.sectors[sector].special = 4;
            }
            // GLOWING LIGHT
            8 => spawn_glowing_light(w, sector),
            // SECRET SECTOR
            9 => w.totalsecret += 1,
            // DOOR CLOSE IN 30 SECONDS
            10 => spawn_door_close_in_30(w, sector),
            // SYNC STROBE SLOW
            12 => spawn_strobe_flash(w, sector, SLOWDARK, true),
            // SYNC STROBE FAST
            13 => spawn_strobe_flash(w, sector, FASTDARK, true),
            // DOOR RAISE IN 5 MINUTES
            14 => spawn_door_raise_in_5_mins(w, sector),
            17 => spawn_fire_flicker(w, sector),
            _ => {}
        }
    }

    // Init line EFFECTs
    w.scrollers = (0..w.level.lines.len())
        .filter(|&i| w.level.lines[i].special == 48)
        .collect();

    // Init other misc stuff
    w.buttons.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_world, test_world_with_player};
    use crate::world::Thinker;
    use doom_common::testkit::{DIVIDER_LINE, RIGHT_SECTOR_TAG};

    const TAG: i32 = RIGHT_SECTOR_TAG as i32;

    #[test]
    fn test_neighbour_queries() {
        let mut w = test_world();
        w.level.sectors[1].floorheight = 32 * FRACUNIT;
        w.level.sectors[1].ceilingheight = 200 * FRACUNIT;
        w.level.sectors[1].lightlevel = 96;

        assert_eq!(find_lowest_floor_surrounding(&w.level, 1), 0);
        assert_eq!(find_highest_floor_surrounding(&w.level, 0), 32 * FRACUNIT);
        assert_eq!(find_next_highest_floor(&w.level, 0, 0), 32 * FRACUNIT);
        assert_eq!(find_next_highest_floor(&w.level, 0, 40 * FRACUNIT), 40 * FRACUNIT);
        assert_eq!(find_lowest_ceiling_surrounding(&w.level, 1), 128 * FRACUNIT);
        assert_eq!(find_highest_ceiling_surrounding(&w.level, 0), 200 * FRACUNIT);
        assert_eq!(find_min_surrounding_light(&w.level, 0, 255), 96);
    }

    #[test]
    fn test_find_sector_from_tag() {
        let w = test_world();
        assert_eq!(find_sector_from_tag(&w.level, TAG, None), Some(1));
        assert_eq!(find_sector_from_tag(&w.level, TAG, Some(1)), None);
        assert_eq!(find_sector_from_tag(&w.level, 99, None), None);
    }

    #[test]
    fn test_walk_over_trigger_clears_special() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.level.lines[DIVIDER_LINE].special = 38;
        w.level.lines[DIVIDER_LINE].tag = TAG;
        w.level.sectors[1].floorheight = 64 * FRACUNIT;

        cross_special_line(&mut w, DIVIDER_LINE, 0, mo);
        assert_eq!(w.level.lines[DIVIDER_LINE].special, 0);
        assert!(w.level.sectors[1].specialdata.is_some());
    }

    #[test]
    fn test_retrigger_stays_armed() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.level.lines[DIVIDER_LINE].special = 82;
        w.level.lines[DIVIDER_LINE].tag = TAG;
        w.level.sectors[1].floorheight = 64 * FRACUNIT;

        cross_special_line(&mut w, DIVIDER_LINE, 0, mo);
        assert_eq!(w.level.lines[DIVIDER_LINE].special, 82);
    }

    #[test]
    fn test_monsters_only_open_doors() {
        let mut w = test_world();
        let imp = crate::mobj::spawn_mobj(
            &mut w,
            100 * FRACUNIT,
            100 * FRACUNIT,
            crate::local::ONFLOORZ,
            MobjType::MT_TROOP,
        );
        w.level.lines[DIVIDER_LINE].special = 38;
        w.level.lines[DIVIDER_LINE].tag = TAG;
        cross_special_line(&mut w, DIVIDER_LINE, 0, imp);
        assert_eq!(w.level.lines[DIVIDER_LINE].special, 38);
        assert!(w.level.sectors[1].specialdata.is_none());
    }

    #[test]
    fn test_exit_line() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.level.lines[DIVIDER_LINE].special = 52;
        cross_special_line(&mut w, DIVIDER_LINE, 0, mo);
        assert_eq!(w.exit, Some(crate::world::LevelExit::Normal));
    }

    #[test]
    fn test_nukage_hurts_every_32_tics() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.level.sectors[1].special = 7;
        crate::map::teleport_move(&mut w, mo, 384 * FRACUNIT, 128 * FRACUNIT);

        w.leveltime = 1;
        player_in_special_sector(&mut w, 0);
        assert_eq!(w.players[0].health, 100);

        w.leveltime = 32;
        player_in_special_sector(&mut w, 0);
        assert_eq!(w.players[0].health, 95);

        w.players[0].powers[PowerType::IronFeet as usize] = 100;
        w.leveltime = 64;
        player_in_special_sector(&mut w, 0);
        assert_eq!(w.players[0].health, 95);
    }

    #[test]
    fn test_secret_sector_counts_once() {
        let mut w = test_world_with_player();
        w.level.sectors[0].special = 9;
        player_in_special_sector(&mut w, 0);
        player_in_special_sector(&mut w, 0);
        assert_eq!(w.players[0].secretcount, 1);
        assert_eq!(w.level.sectors[0].special, 0);
    }

    #[test]
    fn test_spawn_specials() {
        let mut w = test_world();
        w.level.sectors[0].special = 1;
        w.level.sectors[1].special = 9;
        w.level.lines[0].special = 48;
        spawn_specials(&mut w);

        assert_eq!(w.totalsecret, 1);
        assert_eq!(w.level.sectors[0].special, 0);
        assert!(w.thinkers.iter().any(|(_, t)| matches!(t, Thinker::Flash(_))));
        assert_eq!(w.scrollers, vec![0]);

        let before = w.level.sides[w.level.lines[0].sidenum[0].unwrap()].textureoffset;
        update_specials(&mut w);
        let after = w.level.sides[w.level.lines[0].sidenum[0].unwrap()].textureoffset;
        assert_eq!(after - before, FRACUNIT);
    }

    #[test]
    fn test_scrolling_wall_moves_a_unit_per_tic() {
        let mut w = test_world();
        w.level.lines[DIVIDER_LINE].special = 48;
        spawn_specials(&mut w);
        assert_eq!(w.scrollers, vec![DIVIDER_LINE]);

        let [front, back] = w.level.lines[DIVIDER_LINE].sidenum;
        let (front, back) = (front.unwrap(), back.unwrap());
        let start = w.level.sides[front].textureoffset;
        let back_start = w.level.sides[back].textureoffset;

        for tic in 1..=35 {
            w.ticker();
            assert_eq!(w.level.sides[front].textureoffset, start + tic * FRACUNIT);
        }
        // only the front side scrolls
        assert_eq!(w.level.sides[back].textureoffset, back_start);
        assert_eq!(w.level.sides[0].textureoffset, 0);
    }

    #[test]
    fn test_flat_animation_cycles() {
        let mut w = test_world();
        let base = w.res.flats.num_for_name("NUKAGE1");
        assert!(w.res.flats.check_num_for_name("NUKAGE3").is_some());

        // frames advance every 8 tics and wrap after three
        w.leveltime = 0;
        update_specials(&mut w);
        let first = w.anims.flat(base);
        w.leveltime = 8;
        update_specials(&mut w);
        let second = w.anims.flat(base);
        w.leveltime = 24;
        update_specials(&mut w);
        assert_eq!(w.anims.flat(base), first);
        assert_ne!(first, second);
        assert!((base..base + 3).contains(&second));
    }
}
