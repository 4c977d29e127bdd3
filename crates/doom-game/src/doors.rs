// doors.rs - Door animation code (opening/closing)

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

use doom_common::doomdef::{Card, TICRATE};
use doom_common::fixed::{Fixed, FRACUNIT};

use crate::floors::{move_plane, MoveResult, Plane};
use crate::info::SfxId;
use crate::spec::{find_lowest_ceiling_surrounding, find_sector_from_tag};
use crate::world::{MobjId, SoundOrigin, Thinker, ThinkerId, World};

pub const VDOORSPEED: Fixed = FRACUNIT * 2;
pub const VDOORWAIT: i32 = 150;

const PD_BLUEO: &str = "You need a blue key to activate this object";
const PD_REDO: &str = "You need a red key to activate this object";
const PD_YELLOWO: &str = "You need a yellow key to activate this object";
const PD_BLUEK: &str = "You need a blue key to open this door";
const PD_REDK: &str = "You need a red key to open this door";
const PD_YELLOWK: &str = "You need a yellow key to open this door";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorKind {
    Normal,
    Close30ThenOpen,
    Close,
    Open,
    RaiseIn5Mins,
    BlazeRaise,
    BlazeOpen,
    BlazeClose,
}

#[derive(Debug, Clone)]
pub struct Door {
    pub kind: DoorKind,
    pub sector: usize,
    pub topheight: Fixed,
    pub speed: Fixed,

    /// 1 = up, 0 = waiting at top, -1 = down, 2 = initial wait
    pub direction: i32,

    /// tics to wait at the top
    pub topwait: i32,
    /// (keep in case a door going down is reset)
    /// when it reaches 0, start going down
    pub topcountdown: i32,
}

impl Door {
    fn remove(&self, w: &mut World, id: ThinkerId) {
        w.level.sectors[self.sector].specialdata = None;
        w.remove_thinker(id);
    }

    pub fn think(&mut self, w: &mut World, id: ThinkerId) {
        match self.direction {
            0 => {
                // WAITING
                self.topcountdown -= 1;
                if self.topcountdown == 0 {
                    match self.kind {
                        DoorKind::BlazeRaise => {
                            self.direction = -1; // time to go back down
                            w.sector_sound(self.sector, SfxId::bdcls);
                        }
                        DoorKind::Normal => {
                            self.direction = -1; // time to go back down
                            w.sector_sound(self.sector, SfxId::dorcls);
                        }
                        DoorKind::Close30ThenOpen => {
                            self.direction = 1;
                            w.sector_sound(self.sector, SfxId::doropn);
                        }
                        _ => {}
                    }
                }
            }
            2 => {
                //  INITIAL WAIT
                self.topcountdown -= 1;
                if self.topcountdown == 0 && self.kind == DoorKind::RaiseIn5Mins {
                    self.direction = 1;
                    self.kind = DoorKind::Normal;
                    w.sector_sound(self.sector, SfxId::doropn);
                }
            }
            -1 => {
                // DOWN
                let floor = w.level.sectors[self.sector].floorheight;
                let res = move_plane(
                    w,
                    self.sector,
                    self.speed,
                    floor,
                    false,
                    Plane::Ceiling,
                    self.direction,
                );
                match res {
                    MoveResult::PastDest => match self.kind {
                        DoorKind::BlazeRaise | DoorKind::BlazeClose => {
                            self.remove(w, id);
                            w.sector_sound(self.sector, SfxId::bdcls);
                        }
                        DoorKind::Normal | DoorKind::Close => self.remove(w, id),
                        DoorKind::Close30ThenOpen => {
                            self.direction = 0;
                            self.topcountdown = TICRATE * 30;
                        }
                        _ => {}
                    },
                    MoveResult::Crushed => match self.kind {
                        // DO NOT GO BACK UP!
                        DoorKind::BlazeClose | DoorKind::Close => {}
                        _ => {
                            self.direction = 1;
                            w.sector_sound(self.sector, SfxId::doropn);
                        }
                    },
                    MoveResult::Ok => {}
                }
            }
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
                if res == MoveResult::PastDest {
                    match self.kind {
                        DoorKind::BlazeRaise | DoorKind::Normal => {
                            self.direction = 0; // wait at top
                            self.topcountdown = self.topwait;
                        }
                        DoorKind::Close30ThenOpen | DoorKind::BlazeOpen | DoorKind::Open => {
                            self.remove(w, id);
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

fn has_key(w: &World, pnum: usize, card: Card, skull: Card) -> bool {
    let cards = &w.players[pnum].cards;
    cards[card as usize] || cards[skull as usize]
}

/// Key needed by a locked line special, as (card, skull, object message,
/// door message).
fn lock_for(special: i32) -> Option<(Card, Card, &'static str, &'static str)> {
    match special {
        // Blue Lock
        26 | 32 | 99 | 133 => Some((Card::BlueCard, Card::BlueSkull, PD_BLUEO, PD_BLUEK)),
        // Yellow Lock
        27 | 34 | 136 | 137 => Some((Card::YellowCard, Card::YellowSkull, PD_YELLOWO, PD_YELLOWK)),
        // Red Lock
        28 | 33 | 134 | 135 => Some((Card::RedCard, Card::RedSkull, PD_REDO, PD_REDK)),
        _ => None,
    }
}

/// Move a locked door up/down
pub fn ev_do_locked_door(w: &mut World, line: usize, kind: DoorKind, thing: MobjId) -> bool {
    let Some(pnum) = w.player_of(thing) else {
        return false;
    };

    let special = w.level.lines[line].special;
    if let Some((card, skull, msg, _)) = lock_for(special) {
        if !has_key(w, pnum, card, skull) {
            w.players[pnum].message = Some(msg);
            w.start_sound(SoundOrigin::Global, SfxId::oof);
            return false;
        }
    }

    let tag = w.level.lines[line].tag;
    ev_do_door(w, tag, kind)
}

pub fn ev_do_door(w: &mut World, tag: i32, kind: DoorKind) -> bool {
    let mut rtn = false;
    let mut secnum = None;

    while let Some(sec) = find_sector_from_tag(&w.level, tag, secnum) {
        secnum = Some(sec);
        if w.level.sectors[sec].specialdata.is_some() {
            continue;
        }

        // new door thinker
        rtn = true;
        let ceilingheight = w.level.sectors[sec].ceilingheight;
        let lowest = find_lowest_ceiling_surrounding(&w.level, sec);
        let mut door = Door {
            kind,
            sector: sec,
            topheight: 0,
            speed: VDOORSPEED,
            direction: 1,
            topwait: VDOORWAIT,
            topcountdown: 0,
        };

        match kind {
            DoorKind::BlazeClose => {
                door.topheight = lowest - 4 * FRACUNIT;
                door.direction = -1;
                door.speed = VDOORSPEED * 4;
                w.sector_sound(sec, SfxId::bdcls);
            }
            DoorKind::Close => {
                door.topheight = lowest - 4 * FRACUNIT;
                door.direction = -1;
                w.sector_sound(sec, SfxId::dorcls);
            }
            DoorKind::Close30ThenOpen => {
                door.topheight = ceilingheight;
                door.direction = -1;
                w.sector_sound(sec, SfxId::dorcls);
            }
            DoorKind::BlazeRaise | DoorKind::BlazeOpen => {
                door.topheight = lowest - 4 * FRACUNIT;
                door.speed = VDOORSPEED * 4;
                if door.topheight != ceilingheight {
                    w.sector_sound(sec, SfxId::bdopn);
                }
            }
            DoorKind::Normal | DoorKind::Open => {
                door.topheight = lowest - 4 * FRACUNIT;
                if door.topheight != ceilingheight {
                    w.sector_sound(sec, SfxId::doropn);
                }
            }
            DoorKind::RaiseIn5Mins => {}
        }

        let id = w.add_thinker(Thinker::Door(door));
        w.level.sectors[sec].specialdata = Some(id);
    }
    rtn
}

/// open a door manually, no tag value
pub fn ev_vertical_door(w: &mut World, line: usize, thing: MobjId) {
    let special = w.level.lines[line].special;
    let player = w.player_of(thing);

    //  Check for locks
    if let (Some((card, skull, _, msg)), true) = (lock_for(special), special < 99) {
        let Some(pnum) = player else {
            return;
        };
        if !has_key(w, pnum, card, skull) {
            w.players[pnum].message = Some(msg);
            w.start_sound(SoundOrigin::Global, SfxId::oof);
            return;
        }
    }

    // if the sector has an active thinker, use it
    let Some(sec) = w.level.side_sector(line, 1) else {
        return;
    };

    if let Some(data) = w.level.sectors[sec].specialdata {
        if matches!(special, 1 | 26 | 27 | 28 | 117) {
            // ONLY FOR "RAISE" DOORS, NOT "OPEN"s
            if let Some(Thinker::Door(door)) = w.thinkers.get_mut(data) {
                if door.direction == -1 {
                    door.direction = 1; // go back up
                } else if player.is_some() {
                    door.direction = -1; // start going down immediately
                }
            }
            // JDC: bad guys never close doors
            return;
        }
    }

    // for proper sound
    match special {
        // BLAZING DOOR RAISE/OPEN
        117 | 118 => w.sector_sound(sec, SfxId::bdopn),
        // NORMAL DOOR SOUND, LOCKED DOOR SOUND
        _ => w.sector_sound(sec, SfxId::doropn),
    }

    // new door thinker
    let mut door = Door {
        kind: DoorKind::Normal,
        sector: sec,
        topheight: 0,
        speed: VDOORSPEED,
        direction: 1,
        topwait: VDOORWAIT,
        topcountdown: 0,
    };

    match special {
        1 | 26 | 27 | 28 => door.kind = DoorKind::Normal,
        31 | 32 | 33 | 34 => {
            door.kind = DoorKind::Open;
            w.level.lines[line].special = 0;
        }
        117 => {
            // blazing door raise
            door.kind = DoorKind::BlazeRaise;
            door.speed = VDOORSPEED * 4;
        }
        118 => {
            // blazing door open
            door.kind = DoorKind::BlazeOpen;
            w.level.lines[line].special = 0;
            door.speed = VDOORSPEED * 4;
        }
        _ => {}
    }

    // find the top and bottom of the movement range
    door.topheight = find_lowest_ceiling_surrounding(&w.level, sec) - 4 * FRACUNIT;

    let id = w.add_thinker(Thinker::Door(door));
    w.level.sectors[sec].specialdata = Some(id);
}

/// Spawn a door that closes after 30 seconds
pub fn spawn_door_close_in_30(w: &mut World, sec: usize) {
    let door = Door {
        kind: DoorKind::Normal,
        sector: sec,
        topheight: 0,
        speed: VDOORSPEED,
        direction: 0,
        topwait: 0,
        topcountdown: 30 * TICRATE,
    };
    let id = w.add_thinker(Thinker::Door(door));
    let s = &mut w.level.sectors[sec];
    s.specialdata = Some(id);
    s.special = 0;
}

/// Spawn a door that opens after 5 minutes
pub fn spawn_door_raise_in_5_mins(w: &mut World, sec: usize) {
    let door = Door {
        kind: DoorKind::RaiseIn5Mins,
        sector: sec,
        topheight: find_lowest_ceiling_surrounding(&w.level, sec) - 4 * FRACUNIT,
        speed: VDOORSPEED,
        direction: 2,
        topwait: VDOORWAIT,
        topcountdown: 5 * 60 * TICRATE,
    };
    let id = w.add_thinker(Thinker::Door(door));
    let s = &mut w.level.sectors[sec];
    s.specialdata = Some(id);
    s.special = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_world, test_world_with_player};
    use crate::tick::run_thinkers;
    use doom_common::testkit::DIVIDER_LINE;

    fn run(w: &mut World, tics: usize) {
        for _ in 0..tics {
            run_thinkers(w);
            w.leveltime += 1;
        }
    }

    fn door_state(w: &World, sec: usize) -> Option<Door> {
        let id = w.level.sectors[sec].specialdata?;
        match w.thinkers.get(id) {
            Some(Thinker::Door(d)) => Some(d.clone()),
            _ => None,
        }
    }

    /// Closes the right room into a door.
    fn shut_right_room(w: &mut World) {
        w.level.sectors[1].ceilingheight = 0;
    }

    #[test]
    fn test_door_opens_waits_and_closes() {
        let mut w = test_world();
        shut_right_room(&mut w);
        assert!(ev_do_door(&mut w, 1, DoorKind::Normal));

        // 124 units at 2 per tic
        run(&mut w, 63);
        assert_eq!(w.level.sectors[1].ceilingheight, 124 * FRACUNIT);
        assert_eq!(door_state(&w, 1).map(|d| d.direction), Some(0));

        run(&mut w, VDOORWAIT as usize);
        assert_eq!(door_state(&w, 1).map(|d| d.direction), Some(-1));

        run(&mut w, 63);
        assert_eq!(w.level.sectors[1].ceilingheight, 0);
        assert!(w.level.sectors[1].specialdata.is_none());
    }

    #[test]
    fn test_blaze_open_stays_open() {
        let mut w = test_world();
        shut_right_room(&mut w);
        assert!(ev_do_door(&mut w, 1, DoorKind::BlazeOpen));
        run(&mut w, 20);
        assert_eq!(w.level.sectors[1].ceilingheight, 124 * FRACUNIT);
        assert!(w.level.sectors[1].specialdata.is_none());
    }

    #[test]
    fn test_close_door() {
        let mut w = test_world();
        assert!(ev_do_door(&mut w, 1, DoorKind::Close));
        run(&mut w, 70);
        assert_eq!(w.level.sectors[1].ceilingheight, 0);
    }

    #[test]
    fn test_manual_door_needs_key() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        shut_right_room(&mut w);
        w.level.lines[DIVIDER_LINE].special = 26;

        ev_vertical_door(&mut w, DIVIDER_LINE, mo);
        assert_eq!(w.players[0].message, Some(PD_BLUEK));
        assert!(w.level.sectors[1].specialdata.is_none());

        w.players[0].cards[Card::BlueSkull as usize] = true;
        ev_vertical_door(&mut w, DIVIDER_LINE, mo);
        let sec = w.level.side_sector(DIVIDER_LINE, 1).unwrap();
        assert!(w.level.sectors[sec].specialdata.is_some());
    }

    #[test]
    fn test_manual_door_reverses_when_used_again() {
        let mut w = test_world_with_player();
        let mo = w.players[0].mo.unwrap();
        w.level.lines[DIVIDER_LINE].special = 1;
        let sec = w.level.side_sector(DIVIDER_LINE, 1).unwrap();
        w.level.sectors[sec].ceilingheight = 0;

        ev_vertical_door(&mut w, DIVIDER_LINE, mo);
        run(&mut w, 4);
        // player closes it again
        ev_vertical_door(&mut w, DIVIDER_LINE, mo);
        assert_eq!(door_state(&w, sec).map(|d| d.direction), Some(-1));
        // and reopens it
        ev_vertical_door(&mut w, DIVIDER_LINE, mo);
        assert_eq!(door_state(&w, sec).map(|d| d.direction), Some(1));
    }

    #[test]
    fn test_door_close_in_30() {
        let mut w = test_world();
        spawn_door_close_in_30(&mut w, 1);
        assert_eq!(w.level.sectors[1].special, 0);
        run(&mut w, (30 * TICRATE - 1) as usize);
        assert_eq!(door_state(&w, 1).map(|d| d.direction), Some(0));
        run(&mut w, 1);
        assert_eq!(door_state(&w, 1).map(|d| d.direction), Some(-1));
        run(&mut w, 70);
        assert_eq!(w.level.sectors[1].ceilingheight, 0);
    }
}
