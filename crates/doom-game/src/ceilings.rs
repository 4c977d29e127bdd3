// ceilings.rs - Ceiling animation (lowering, crushing, raising)

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

use crate::floors::{move_plane, MoveResult, Plane};
use crate::info::SfxId;
use crate::spec::{find_highest_ceiling_surrounding, find_sector_from_tag};
use crate::world::{Thinker, ThinkerId, World};

pub const CEILSPEED: Fixed = FRACUNIT;
pub const CEILWAIT: i32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeilingKind {
    LowerToFloor,
    RaiseToHighest,
    LowerAndCrush,
    CrushAndRaise,
    FastCrushAndRaise,
    SilentCrushAndRaise,
}

#[derive(Debug, Clone)]
pub struct Ceiling {
    pub kind: CeilingKind,
    pub sector: usize,
    pub bottomheight: Fixed,
    pub topheight: Fixed,
    pub speed: Fixed,
    pub crush: bool,

    /// 1 = up, 0 = waiting, -1 = down
    pub direction: i32,

    /// ID
    pub tag: i32,
    pub olddirection: i32,
}

impl Ceiling {
    fn remove_active(&self, w: &mut World, id: ThinkerId) {
        w.level.sectors[self.sector].specialdata = None;
        w.remove_thinker(id);
    }

    fn moving_sound(&self, w: &mut World) {
        if w.leveltime & 7 == 0 && self.kind != CeilingKind::SilentCrushAndRaise {
            w.sector_sound(self.sector, SfxId::stnmov);
        }
    }

    pub fn think(&mut self, w: &mut World, id: ThinkerId) {
        match self.direction {
            // IN STASIS
            0 => {}
            1 => {
                // UP
                let res = move_plane(
                    w,
                    self.sector,
                    self.speed,
                    self.topheight,
                    false,
                    Plane::Ceiling,
                    self.direction,
                );
                self.moving_sound(w);

                if res == MoveResult::PastDest {
                    match self.kind {
                        CeilingKind::RaiseToHighest => self.remove_active(w, id),
                        CeilingKind::SilentCrushAndRaise => {
                            w.sector_sound(self.sector, SfxId::pstop);
                            self.direction = -1;
                        }
                        CeilingKind::FastCrushAndRaise | CeilingKind::CrushAndRaise => {
                            self.direction = -1;
                        }
                        _ => {}
                    }
                }
            }
            -1 => {
                // DOWN
                let res = move_plane(
                    w,
                    self.sector,
                    self.speed,
                    self.bottomheight,
                    self.crush,
                    Plane::Ceiling,
                    self.direction,
                );
                self.moving_sound(w);

                match res {
                    MoveResult::PastDest => match self.kind {
                        CeilingKind::SilentCrushAndRaise => {
                            w.sector_sound(self.sector, SfxId::pstop);
                            self.speed = CEILSPEED;
                            self.direction = 1;
                        }
                        CeilingKind::CrushAndRaise => {
                            self.speed = CEILSPEED;
                            self.direction = 1;
                        }
                        CeilingKind::FastCrushAndRaise => self.direction = 1,
                        CeilingKind::LowerAndCrush | CeilingKind::LowerToFloor => {
                            self.remove_active(w, id)
                        }
                        CeilingKind::RaiseToHighest => {}
                    },
                    MoveResult::Crushed => match self.kind {
                        CeilingKind::SilentCrushAndRaise
                        | CeilingKind::CrushAndRaise
                        | CeilingKind::LowerAndCrush => self.speed = CEILSPEED / 8,
                        _ => {}
                    },
                    MoveResult::Ok => {}
                }
            }
            _ => {}
        }
    }
}

/// Move a ceiling up/down and all around!
pub fn ev_do_ceiling(w: &mut World, tag: i32, kind: CeilingKind) -> bool {
    // Reactivate in-stasis ceilings...for certain types.
    if matches!(
        kind,
        CeilingKind::FastCrushAndRaise | CeilingKind::SilentCrushAndRaise | CeilingKind::CrushAndRaise
    ) {
        activate_in_stasis_ceiling(w, tag);
    }

    let mut rtn = false;
    let mut secnum = None;

    while let Some(sec) = find_sector_from_tag(&w.level, tag, secnum) {
        secnum = Some(sec);
        if w.level.sectors[sec].specialdata.is_some() {
            continue;
        }

        // new door thinker
        rtn = true;
        let s = &w.level.sectors[sec];
        let mut ceiling = Ceiling {
            kind,
            sector: sec,
            bottomheight: s.floorheight,
            topheight: s.ceilingheight,
            speed: CEILSPEED,
            crush: false,
            direction: -1,
            tag: s.tag,
            olddirection: 0,
        };

        match kind {
            CeilingKind::FastCrushAndRaise => {
                ceiling.crush = true;
                ceiling.bottomheight += 8 * FRACUNIT;
                ceiling.speed = CEILSPEED * 2;
            }
            CeilingKind::SilentCrushAndRaise | CeilingKind::CrushAndRaise => {
                ceiling.crush = true;
                ceiling.bottomheight += 8 * FRACUNIT;
            }
            CeilingKind::LowerAndCrush => {
                ceiling.bottomheight += 8 * FRACUNIT;
            }
            CeilingKind::LowerToFloor => {}
            CeilingKind::RaiseToHighest => {
                ceiling.topheight = find_highest_ceiling_surrounding(&w.level, sec);
                ceiling.direction = 1;
            }
        }

        let id = w.add_thinker(Thinker::Ceiling(ceiling));
        w.level.sectors[sec].specialdata = Some(id);
    }
    rtn
}

/// Restart a ceiling that's in-stasis
fn activate_in_stasis_ceiling(w: &mut World, tag: i32) {
    for (_, t) in w.thinkers.iter_mut() {
        if let Thinker::Ceiling(c) = t {
            if c.tag == tag && c.direction == 0 {
                c.direction = c.olddirection;
            }
        }
    }
}

/// Stop a ceiling from crushing!
pub fn ceiling_crush_stop(w: &mut World, tag: i32) -> bool {
    let mut rtn = false;
    for (_, t) in w.thinkers.iter_mut() {
        if let Thinker::Ceiling(c) = t {
            if c.tag == tag && c.direction != 0 {
                c.olddirection = c.direction;
                c.direction = 0; // in-stasis
                rtn = true;
            }
        }
    }
    rtn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::MobjType;
    use crate::local::ONFLOORZ;
    use crate::mobj::spawn_mobj;
    use crate::testutil::test_world;
    use crate::tick::run_thinkers;

    fn run(w: &mut World, tics: usize) {
        for _ in 0..tics {
            run_thinkers(w);
            w.leveltime += 1;
        }
    }

    #[test]
    fn test_lower_to_floor() {
        let mut w = test_world();
        assert!(ev_do_ceiling(&mut w, 1, CeilingKind::LowerToFloor));
        run(&mut w, 130);
        assert_eq!(w.level.sectors[1].ceilingheight, 0);
        assert!(w.level.sectors[1].specialdata.is_none());
    }

    #[test]
    fn test_crusher_cycles() {
        let mut w = test_world();
        assert!(ev_do_ceiling(&mut w, 1, CeilingKind::FastCrushAndRaise));
        // 120 units down at 2 per tic, then it heads back up
        run(&mut w, 61);
        assert_eq!(w.level.sectors[1].ceilingheight, 8 * FRACUNIT);
        run(&mut w, 1);
        assert_eq!(w.level.sectors[1].ceilingheight, 10 * FRACUNIT);
    }

    #[test]
    fn test_crusher_hurts_and_stops() {
        let mut w = test_world();
        let imp = spawn_mobj(&mut w, 384 * FRACUNIT, 384 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let health = w.mobjs[imp].health;
        assert!(ev_do_ceiling(&mut w, 1, CeilingKind::CrushAndRaise));

        // down to the imp's head (56 units) and a few crushing tics after
        run(&mut w, 90);
        assert!(w.mobjs.get(imp).map_or(true, |m| m.health < health));

        assert!(ceiling_crush_stop(&mut w, 1));
        let frozen = w.level.sectors[1].ceilingheight;
        run(&mut w, 10);
        assert_eq!(w.level.sectors[1].ceilingheight, frozen);

        // a crush trigger restarts it
        ev_do_ceiling(&mut w, 1, CeilingKind::CrushAndRaise);
        run(&mut w, 10);
        assert_ne!(w.level.sectors[1].ceilingheight, frozen);
    }

    #[test]
    fn test_raise_to_highest() {
        let mut w = test_world();
        w.level.sectors[0].ceilingheight = 160 * FRACUNIT;
        assert!(ev_do_ceiling(&mut w, 1, CeilingKind::RaiseToHighest));
        run(&mut w, 40);
        assert_eq!(w.level.sectors[1].ceilingheight, 160 * FRACUNIT);
        assert!(w.level.sectors[1].specialdata.is_none());
    }
}
