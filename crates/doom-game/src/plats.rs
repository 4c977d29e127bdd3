// plats.rs - Plats (i.e. elevator platforms) code, raising/lowering.

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

use doom_common::doomdef::TICRATE;
use doom_common::fixed::{Fixed, FRACUNIT};

use crate::floors::{move_plane, MoveResult, Plane};
use crate::info::SfxId;
use crate::spec::{
    find_highest_floor_surrounding, find_lowest_floor_surrounding, find_next_highest_floor,
    find_sector_from_tag,
};
use crate::world::{Thinker, ThinkerId, World};

pub const PLATWAIT: i32 = 3;
pub const PLATSPEED: Fixed = FRACUNIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatStatus {
    Up,
    Down,
    Waiting,
    InStasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatKind {
    PerpetualRaise,
    DownWaitUpStay,
    RaiseAndChange,
    RaiseToNearestAndChange,
    BlazeDwus,
}

#[derive(Debug, Clone)]
pub struct Plat {
    pub sector: usize,
    pub speed: Fixed,
    pub low: Fixed,
    pub high: Fixed,
    pub wait: i32,
    pub count: i32,
    pub status: PlatStatus,
    pub oldstatus: PlatStatus,
    pub crush: bool,
    pub tag: i32,
    pub kind: PlatKind,
}

impl Plat {
    fn remove_active(&self, w: &mut World, id: ThinkerId) {
        w.level.sectors[self.sector].specialdata = None;
        w.remove_thinker(id);
    }

    /// Move a plat up and down
    pub fn think(&mut self, w: &mut World, id: ThinkerId) {
        match self.status {
            PlatStatus::Up => {
                let res = move_plane(w, self.sector, self.speed, self.high, self.crush, Plane::Floor, 1);

                if matches!(self.kind, PlatKind::RaiseAndChange | PlatKind::RaiseToNearestAndChange)
                    && w.leveltime & 7 == 0
                {
                    w.sector_sound(self.sector, SfxId::stnmov);
                }

                if res == MoveResult::Crushed && !self.crush {
                    self.count = self.wait;
                    self.status = PlatStatus::Down;
                    w.sector_sound(self.sector, SfxId::pstart);
                } else if res == MoveResult::PastDest {
                    self.count = self.wait;
                    self.status = PlatStatus::Waiting;
                    w.sector_sound(self.sector, SfxId::pstop);

                    match self.kind {
                        PlatKind::BlazeDwus
                        | PlatKind::DownWaitUpStay
                        | PlatKind::RaiseAndChange
                        | PlatKind::RaiseToNearestAndChange => self.remove_active(w, id),
                        PlatKind::PerpetualRaise => {}
                    }
                }
            }
            PlatStatus::Down => {
                let res = move_plane(w, self.sector, self.speed, self.low, false, Plane::Floor, -1);

                if res == MoveResult::PastDest {
                    self.count = self.wait;
                    self.status = PlatStatus::Waiting;
                    w.sector_sound(self.sector, SfxId::pstop);
                }
            }
            PlatStatus::Waiting => {
                self.count -= 1;
                if self.count == 0 {
                    if w.level.sectors[self.sector].floorheight == self.low {
                        self.status = PlatStatus::Up;
                    } else {
                        self.status = PlatStatus::Down;
                    }
                    w.sector_sound(self.sector, SfxId::pstart);
                }
            }
            PlatStatus::InStasis => {}
        }
    }
}

/// Do Platforms. `amount` is only used for some platforms.
pub fn ev_do_plat(w: &mut World, line: usize, kind: PlatKind, amount: i32) -> bool {
    let tag = w.level.lines[line].tag;

    // Activate all <type> plats that are in_stasis
    if kind == PlatKind::PerpetualRaise {
        activate_in_stasis(w, tag);
    }

    let mut rtn = false;
    let mut secnum = None;

    while let Some(sec) = find_sector_from_tag(&w.level, tag, secnum) {
        secnum = Some(sec);
        if w.level.sectors[sec].specialdata.is_some() {
            continue;
        }

        // Find lowest & highest floors around sector
        rtn = true;
        let floorheight = w.level.sectors[sec].floorheight;
        let mut plat = Plat {
            sector: sec,
            speed: PLATSPEED,
            low: floorheight,
            high: floorheight,
            wait: 0,
            count: 0,
            status: PlatStatus::Up,
            oldstatus: PlatStatus::Up,
            crush: false,
            tag,
            kind,
        };

        match kind {
            PlatKind::RaiseToNearestAndChange | PlatKind::RaiseAndChange => {
                plat.speed = PLATSPEED / 2;
                if let Some(model) = w.level.side_sector(line, 0) {
                    w.level.sectors[sec].floorpic = w.level.sectors[model].floorpic;
                }
                if kind == PlatKind::RaiseToNearestAndChange {
                    plat.high = find_next_highest_floor(&w.level, sec, floorheight);
                    // NO MORE DAMAGE, IF APPLICABLE
                    w.level.sectors[sec].special = 0;
                } else {
                    plat.high = floorheight + amount * FRACUNIT;
                }
                w.sector_sound(sec, SfxId::stnmov);
            }
            PlatKind::DownWaitUpStay | PlatKind::BlazeDwus => {
                plat.speed = if kind == PlatKind::BlazeDwus {
                    PLATSPEED * 8
                } else {
                    PLATSPEED * 4
                };
                plat.low = find_lowest_floor_surrounding(&w.level, sec).min(floorheight);
                plat.wait = TICRATE * PLATWAIT;
                plat.status = PlatStatus::Down;
                w.sector_sound(sec, SfxId::pstart);
            }
            PlatKind::PerpetualRaise => {
                plat.low = find_lowest_floor_surrounding(&w.level, sec).min(floorheight);
                plat.high = find_highest_floor_surrounding(&w.level, sec).max(floorheight);
                plat.wait = TICRATE * PLATWAIT;
                plat.status = if w.p_random() & 1 == 0 {
                    PlatStatus::Up
                } else {
                    PlatStatus::Down
                };
                w.sector_sound(sec, SfxId::pstart);
            }
        }

        let id = w.add_thinker(Thinker::Plat(plat));
        w.level.sectors[sec].specialdata = Some(id);
    }
    rtn
}

fn activate_in_stasis(w: &mut World, tag: i32) {
    for (_, t) in w.thinkers.iter_mut() {
        if let Thinker::Plat(plat) = t {
            if plat.tag == tag && plat.status == PlatStatus::InStasis {
                plat.status = plat.oldstatus;
            }
        }
    }
}

pub fn ev_stop_plat(w: &mut World, tag: i32) {
    for (_, t) in w.thinkers.iter_mut() {
        if let Thinker::Plat(plat) = t {
            if plat.status != PlatStatus::InStasis && plat.tag == tag {
                plat.oldstatus = plat.status;
                plat.status = PlatStatus::InStasis;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_world;
    use crate::tick::run_thinkers;
    use doom_common::testkit::DIVIDER_LINE;

    fn run(w: &mut World, tics: usize) {
        for _ in 0..tics {
            run_thinkers(w);
            w.leveltime += 1;
        }
    }

    fn tagged_line(w: &mut World) -> usize {
        w.level.lines[DIVIDER_LINE].tag = 1;
        DIVIDER_LINE
    }

    #[test]
    fn test_down_wait_up_stay() {
        let mut w = test_world();
        let line = tagged_line(&mut w);
        w.level.sectors[1].floorheight = 64 * FRACUNIT;

        assert!(ev_do_plat(&mut w, line, PlatKind::DownWaitUpStay, 0));
        // 64 units at 4 per tic, one more to arrive
        run(&mut w, 17);
        assert_eq!(w.level.sectors[1].floorheight, 0);

        // waits three seconds before going back up
        run(&mut w, (TICRATE * PLATWAIT) as usize);
        assert_eq!(w.level.sectors[1].floorheight, 0);

        run(&mut w, 17);
        assert_eq!(w.level.sectors[1].floorheight, 64 * FRACUNIT);
        assert!(w.level.sectors[1].specialdata.is_none());
    }

    #[test]
    fn test_raise_and_change() {
        let mut w = test_world();
        let line = tagged_line(&mut w);
        w.level.sectors[1].special = 7;
        assert!(ev_do_plat(&mut w, line, PlatKind::RaiseAndChange, 24));
        run(&mut w, 60);
        assert_eq!(w.level.sectors[1].floorheight, 24 * FRACUNIT);
        // only raise-to-nearest clears the damage
        assert_eq!(w.level.sectors[1].special, 7);
    }

    fn plat_status(w: &World) -> Option<PlatStatus> {
        w.thinkers.iter().find_map(|(_, t)| match t {
            Thinker::Plat(p) => Some(p.status),
            _ => None,
        })
    }

    #[test]
    fn test_stop_and_restart_perpetual() {
        let mut w = test_world();
        let line = tagged_line(&mut w);
        w.level.sectors[0].floorheight = 32 * FRACUNIT;
        assert!(ev_do_plat(&mut w, line, PlatKind::PerpetualRaise, 0));
        run(&mut w, 5);
        let before = plat_status(&w);

        ev_stop_plat(&mut w, 1);
        assert_eq!(plat_status(&w), Some(PlatStatus::InStasis));
        let frozen = w.level.sectors[1].floorheight;
        run(&mut w, 20);
        assert_eq!(w.level.sectors[1].floorheight, frozen);

        // activating again restarts the stopped plat instead of adding one
        assert!(!ev_do_plat(&mut w, line, PlatKind::PerpetualRaise, 0));
        assert_eq!(plat_status(&w), before);
    }
}
