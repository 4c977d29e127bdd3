// floors.rs - Floor animation: raising stairs.

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

use doom_common::fixed::{Fixed, FRACUNIT};

use crate::info::SfxId;
use crate::map::change_sector;
use crate::spec::{
    find_highest_floor_surrounding, find_lowest_ceiling_surrounding, find_lowest_floor_surrounding,
    find_next_highest_floor, find_sector_from_tag, two_sided,
};
use crate::world::{Thinker, ThinkerId, World};

pub const FLOORSPEED: Fixed = FRACUNIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorKind {
    /// lower floor to highest surrounding floor
    LowerFloor,
    /// lower floor to lowest surrounding floor
    LowerFloorToLowest,
    /// lower floor to highest surrounding floor VERY FAST
    TurboLower,
    /// raise floor to lowest surrounding CEILING
    RaiseFloor,
    /// raise floor to next highest surrounding floor
    RaiseFloorToNearest,
    /// raise floor to shortest height texture around it
    RaiseToTexture,
    /// lower floor to lowest surrounding floor
    ///  and change floorpic
    LowerAndChange,
    RaiseFloor24,
    RaiseFloor24AndChange,
    RaiseFloorCrush,
    /// raise to next highest floor, turbo-speed
    RaiseFloorTurbo,
    DonutRaise,
    RaiseFloor512,
    /// A stair step.
    BuildStairs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StairKind {
    /// slowly build by 8
    Build8,
    /// quickly build by 16
    Turbo16,
}

/// Outcome of moving a floor or ceiling one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Ok,
    Crushed,
    PastDest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Floor,
    Ceiling,
}

#[derive(Debug, Clone)]
pub struct FloorMove {
    pub kind: FloorKind,
    pub crush: bool,
    pub sector: usize,
    pub direction: i32,
    pub newspecial: i32,
    pub texture: usize,
    pub floordestheight: Fixed,
    pub speed: Fixed,
}

// ============================================================
// FLOORS
// ============================================================

/// Move a plane (floor or ceiling) and check for crushing
pub fn move_plane(
    w: &mut World,
    sector: usize,
    speed: Fixed,
    dest: Fixed,
    crush: bool,
    plane: Plane,
    direction: i32,
) -> MoveResult {
    fn height(w: &mut World, sector: usize, plane: Plane) -> &mut Fixed {
        let sec = &mut w.level.sectors[sector];
        match plane {
            Plane::Floor => &mut sec.floorheight,
            Plane::Ceiling => &mut sec.ceilingheight,
        }
    }

    let lastpos = *height(w, sector, plane);

    // past the destination this step?
    let past = match direction {
        -1 => lastpos - speed < dest,
        1 => lastpos + speed > dest,
        _ => return MoveResult::Ok,
    };

    if past {
        *height(w, sector, plane) = dest;
        if change_sector(w, sector, crush) {
            *height(w, sector, plane) = lastpos;
            change_sector(w, sector, crush);
        }
        return MoveResult::PastDest;
    }

    *height(w, sector, plane) = lastpos + speed * direction;
    if change_sector(w, sector, crush) {
        match (plane, direction) {
            // a rising ceiling never gets stuck
            (Plane::Ceiling, 1) => {}
            // COULD GET CRUSHED
            (Plane::Floor, 1) | (Plane::Ceiling, -1) if crush => return MoveResult::Crushed,
            _ => {
                *height(w, sector, plane) = lastpos;
                change_sector(w, sector, crush);
                return MoveResult::Crushed;
            }
        }
    }
    MoveResult::Ok
}

impl FloorMove {
    /// Move a floor to its destination (up or down).
    pub fn think(&mut self, w: &mut World, id: ThinkerId) {
        let res = move_plane(
            w,
            self.sector,
            self.speed,
            self.floordestheight,
            self.crush,
            Plane::Floor,
            self.direction,
        );

        if w.leveltime & 7 == 0 {
            w.sector_sound(self.sector, SfxId::stnmov);
        }

        if res == MoveResult::PastDest {
            let sec = &mut w.level.sectors[self.sector];
            sec.specialdata = None;

            let change = match self.direction {
                1 => self.kind == FloorKind::DonutRaise,
                -1 => self.kind == FloorKind::LowerAndChange,
                _ => false,
            };
            if change {
                sec.special = self.newspecial;
                sec.floorpic = self.texture;
            }

            w.remove_thinker(id);
            w.sector_sound(self.sector, SfxId::pstop);
        }
    }
}

fn add_floor(w: &mut World, floor: FloorMove) {
    let sector = floor.sector;
    let id = w.add_thinker(Thinker::Floor(floor));
    w.level.sectors[sector].specialdata = Some(id);
}

/// Handle floor types. `model` is the front sector of the activating
/// line, used by the texture changing types.
pub fn ev_do_floor(w: &mut World, tag: i32, model: Option<usize>, kind: FloorKind) -> bool {
    let mut rtn = false;
    let mut secnum = None;

    while let Some(sec) = find_sector_from_tag(&w.level, tag, secnum) {
        secnum = Some(sec);

        // ALREADY MOVING?  IF SO, KEEP GOING...
        if w.level.sectors[sec].specialdata.is_some() {
            continue;
        }

        // new floor thinker
        rtn = true;
        let level = &w.level;
        let floorheight = level.sectors[sec].floorheight;
        let mut floor = FloorMove {
            kind,
            crush: false,
            sector: sec,
            direction: 1,
            newspecial: 0,
            texture: 0,
            floordestheight: floorheight,
            speed: FLOORSPEED,
        };

        match kind {
            FloorKind::LowerFloor => {
                floor.direction = -1;
                floor.floordestheight = find_highest_floor_surrounding(level, sec);
            }
            FloorKind::LowerFloorToLowest => {
                floor.direction = -1;
                floor.floordestheight = find_lowest_floor_surrounding(level, sec);
            }
            FloorKind::TurboLower => {
                floor.direction = -1;
                floor.speed = FLOORSPEED * 4;
                floor.floordestheight = find_highest_floor_surrounding(level, sec);
                if floor.floordestheight != floorheight {
                    floor.floordestheight += 8 * FRACUNIT;
                }
            }
            FloorKind::RaiseFloorCrush | FloorKind::RaiseFloor => {
                floor.crush = kind == FloorKind::RaiseFloorCrush;
                floor.floordestheight = find_lowest_ceiling_surrounding(level, sec)
                    .min(level.sectors[sec].ceilingheight);
                if floor.crush {
                    floor.floordestheight -= 8 * FRACUNIT;
                }
            }
            FloorKind::RaiseFloorTurbo => {
                floor.speed = FLOORSPEED * 4;
                floor.floordestheight = find_next_highest_floor(level, sec, floorheight);
            }
            FloorKind::RaiseFloorToNearest => {
                floor.floordestheight = find_next_highest_floor(level, sec, floorheight);
            }
            FloorKind::RaiseFloor24 => {
                floor.floordestheight = floorheight + 24 * FRACUNIT;
            }
            FloorKind::RaiseFloor512 => {
                floor.floordestheight = floorheight + 512 * FRACUNIT;
            }
            FloorKind::RaiseFloor24AndChange => {
                floor.floordestheight = floorheight + 24 * FRACUNIT;
                if let Some(m) = model {
                    let (pic, special) = (level.sectors[m].floorpic, level.sectors[m].special);
                    w.level.sectors[sec].floorpic = pic;
                    w.level.sectors[sec].special = special;
                }
            }
            FloorKind::RaiseToTexture => {
                let mut minsize = i32::MAX;
                for i in 0..level.sectors[sec].lines.len() {
                    if !two_sided(level, sec, i) {
                        continue;
                    }
                    for side in 0..2 {
                        if let Some(s) = level.get_side(sec, i, side) {
                            minsize = minsize.min(w.res.textures.height(s.bottomtexture));
                        }
                    }
                }
                floor.floordestheight = floorheight.saturating_add(minsize);
            }
            FloorKind::LowerAndChange => {
                floor.direction = -1;
                floor.floordestheight = find_lowest_floor_surrounding(level, sec);
                floor.texture = level.sectors[sec].floorpic;

                for i in 0..level.sectors[sec].lines.len() {
                    if !two_sided(level, sec, i) {
                        continue;
                    }
                    let line = &level.lines[level.sectors[sec].lines[i]];
                    let other = if line.frontsector == sec {
                        line.backsector
                    } else {
                        Some(line.frontsector)
                    };
                    let Some(other) = other else {
                        continue;
                    };
                    if level.sectors[other].floorheight == floor.floordestheight {
                        floor.texture = level.sectors[other].floorpic;
                        floor.newspecial = level.sectors[other].special;
                        break;
                    }
                }
            }
            FloorKind::DonutRaise | FloorKind::BuildStairs => {}
        }

        add_floor(w, floor);
    }
    rtn
}

/// Build a staircase!
pub fn ev_build_stairs(w: &mut World, tag: i32, kind: StairKind) -> bool {
    let (speed, stairsize) = match kind {
        StairKind::Build8 => (FLOORSPEED / 4, 8 * FRACUNIT),
        StairKind::Turbo16 => (FLOORSPEED * 4, 16 * FRACUNIT),
    };

    let mut rtn = false;
    let mut secnum = None;

    // the search resumes after the last step built
    while let Some(first) = find_sector_from_tag(&w.level, tag, secnum) {
        let mut sec = first;
        secnum = Some(sec);

        if w.level.sectors[sec].specialdata.is_some() {
            continue;
        }

        // new floor thinker
        rtn = true;
        let mut height = w.level.sectors[sec].floorheight + stairsize;
        add_floor(
            w,
            FloorMove {
                kind: FloorKind::BuildStairs,
                crush: false,
                sector: sec,
                direction: 1,
                newspecial: 0,
                texture: 0,
                floordestheight: height,
                speed,
            },
        );

        let texture = w.level.sectors[sec].floorpic;

        // Find next sector to raise
        // 1.   Find 2-sided line with same sector side[0]
        // 2.   Other side is the next sector to raise
        loop {
            let mut next = None;
            for &l in &w.level.sectors[sec].lines {
                let line = &w.level.lines[l];
                if !line.is_two_sided() || line.frontsector != sec {
                    continue;
                }
                let Some(tsec) = line.backsector else {
                    continue;
                };
                if w.level.sectors[tsec].floorpic != texture {
                    continue;
                }

                height += stairsize;

                if w.level.sectors[tsec].specialdata.is_some() {
                    continue;
                }

                next = Some(tsec);
                break;
            }

            let Some(tsec) = next else {
                break;
            };
            sec = tsec;
            secnum = Some(sec);
            add_floor(
                w,
                FloorMove {
                    kind: FloorKind::BuildStairs,
                    crush: false,
                    sector: sec,
                    direction: 1,
                    newspecial: 0,
                    texture: 0,
                    floordestheight: height,
                    speed,
                },
            );
        }
    }
    rtn
}

/// Special Stuff that can not be categorized
pub fn ev_do_donut(w: &mut World, tag: i32) -> bool {
    let mut rtn = false;
    let mut secnum = None;

    while let Some(s1) = find_sector_from_tag(&w.level, tag, secnum) {
        secnum = Some(s1);

        // ALREADY MOVING?  IF SO, KEEP GOING...
        if w.level.sectors[s1].specialdata.is_some() {
            continue;
        }

        rtn = true;
        let Some(&first) = w.level.sectors[s1].lines.first() else {
            continue;
        };
        let Some(s2) = w.level.get_next_sector(first, s1) else {
            continue;
        };

        let level = &w.level;
        let s3 = level.sectors[s2].lines.iter().find_map(|&l| {
            let line = &level.lines[l];
            if !line.is_two_sided() || line.backsector == Some(s1) {
                return None;
            }
            line.backsector
        });
        let Some(s3) = s3 else {
            continue;
        };
        let (pic, dest) = (level.sectors[s3].floorpic, level.sectors[s3].floorheight);

        // Spawn rising slime
        add_floor(
            w,
            FloorMove {
                kind: FloorKind::DonutRaise,
                crush: false,
                sector: s2,
                direction: 1,
                newspecial: 0,
                texture: pic,
                floordestheight: dest,
                speed: FLOORSPEED / 2,
            },
        );

        // Spawn lowering donut-hole
        add_floor(
            w,
            FloorMove {
                kind: FloorKind::LowerFloor,
                crush: false,
                sector: s1,
                direction: -1,
                newspecial: 0,
                texture: 0,
                floordestheight: dest,
                speed: FLOORSPEED / 2,
            },
        );
    }
    rtn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_world;
    use crate::tick::run_thinkers;

    fn run(w: &mut World, tics: usize) {
        for _ in 0..tics {
            run_thinkers(w);
            w.leveltime += 1;
        }
    }

    #[test]
    fn test_move_plane_stops_at_dest() {
        let mut w = test_world();
        let res = move_plane(&mut w, 1, 8 * FRACUNIT, 4 * FRACUNIT, false, Plane::Floor, 1);
        assert_eq!(res, MoveResult::PastDest);
        assert_eq!(w.level.sectors[1].floorheight, 4 * FRACUNIT);

        let res = move_plane(&mut w, 1, FRACUNIT, 100 * FRACUNIT, false, Plane::Ceiling, -1);
        assert_eq!(res, MoveResult::Ok);
        assert_eq!(w.level.sectors[1].ceilingheight, 127 * FRACUNIT);
    }

    #[test]
    fn test_lower_to_lowest_runs_to_completion() {
        let mut w = test_world();
        w.level.sectors[1].floorheight = 16 * FRACUNIT;
        assert!(ev_do_floor(&mut w, 1, None, FloorKind::LowerFloorToLowest));
        // a second activation is ignored while moving
        assert!(!ev_do_floor(&mut w, 1, None, FloorKind::LowerFloorToLowest));

        run(&mut w, 8);
        assert_eq!(w.level.sectors[1].floorheight, 8 * FRACUNIT);
        run(&mut w, 9);
        assert_eq!(w.level.sectors[1].floorheight, 0);
        assert!(w.level.sectors[1].specialdata.is_none());
        assert!(w.take_sounds().iter().any(|s| s.sfx == SfxId::pstop));
    }

    #[test]
    fn test_raise_floor_stops_below_ceiling() {
        let mut w = test_world();
        assert!(ev_do_floor(&mut w, 1, None, FloorKind::RaiseFloorCrush));
        run(&mut w, 200);
        assert_eq!(w.level.sectors[1].floorheight, 120 * FRACUNIT);
    }

    #[test]
    fn test_raise_24_and_change() {
        let mut w = test_world();
        let pic = w.level.sectors[0].floorpic;
        assert!(ev_do_floor(&mut w, 1, Some(0), FloorKind::RaiseFloor24AndChange));
        assert_eq!(w.level.sectors[1].floorpic, pic);
        run(&mut w, 30);
        assert_eq!(w.level.sectors[1].floorheight, 24 * FRACUNIT);
    }

    #[test]
    fn test_donut_raises_slime_to_outer_floor() {
        use doom_common::testkit::DIVIDER_LINE;
        use doom_common::wadfiles::LineFlags;

        let mut w = test_world();
        // sector 1 is the hole, sector 0 the slime ring around it and a
        // new sector 2 the outer floor beyond the ring
        let hole_lines = &mut w.level.sectors[1].lines;
        hole_lines.retain(|&l| l != DIVIDER_LINE);
        hole_lines.insert(0, DIVIDER_LINE);

        let outer_pic = w.res.flats.num_for_name("CEIL1_1");
        let mut outer = w.level.sectors[0].clone();
        outer.floorheight = 24 * FRACUNIT;
        outer.floorpic = outer_pic;
        outer.tag = 0;
        outer.lines.clear();
        w.level.sectors.push(outer);

        let mut edge = w.level.lines[0].clone();
        edge.flags |= LineFlags::TWOSIDED;
        edge.frontsector = 0;
        edge.backsector = Some(2);
        let edge_num = w.level.lines.len();
        w.level.lines.push(edge);
        w.level.sectors[0].lines.insert(0, edge_num);
        w.level.sectors[2].lines.push(edge_num);

        w.level.sectors[1].floorheight = 64 * FRACUNIT;
        let ring_pic = w.level.sectors[0].floorpic;

        assert!(ev_do_donut(&mut w, 1));
        run(&mut w, 20);
        assert_eq!(w.level.sectors[0].floorheight, 10 * FRACUNIT);
        assert_eq!(w.level.sectors[1].floorheight, 54 * FRACUNIT);
        assert_eq!(w.level.sectors[0].floorpic, ring_pic);

        run(&mut w, 80);
        assert_eq!(w.level.sectors[0].floorheight, 24 * FRACUNIT);
        assert_eq!(w.level.sectors[0].floorpic, outer_pic);
        assert_eq!(w.level.sectors[0].special, 0);
        assert_eq!(w.level.sectors[1].floorheight, 24 * FRACUNIT);
        assert!(w.level.sectors[0].specialdata.is_none());
        assert!(w.level.sectors[1].specialdata.is_none());
        // the outer floor never moves
        assert_eq!(w.level.sectors[2].floorheight, 24 * FRACUNIT);
    }

    #[test]
    fn test_first_stair_step() {
        let mut w = test_world();
        assert!(ev_build_stairs(&mut w, 1, StairKind::Turbo16));
        run(&mut w, 8);
        assert_eq!(w.level.sectors[1].floorheight, 16 * FRACUNIT);
    }
}
