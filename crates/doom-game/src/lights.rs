// lights.rs - Handle Sector base lighting effects.
// Muzzle flash?

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

use crate::spec::{find_min_surrounding_light, find_sector_from_tag};
use crate::world::{Thinker, World};

pub const GLOWSPEED: i32 = 8;
pub const STROBEBRIGHT: i32 = 5;
pub const FASTDARK: i32 = 15;
pub const SLOWDARK: i32 = 35;

// ============================================================
// FIRELIGHT FLICKER
// ============================================================

#[derive(Debug, Clone)]
pub struct FireFlicker {
    pub sector: usize,
    pub count: i32,
    pub maxlight: i32,
    pub minlight: i32,
}

impl FireFlicker {
    pub fn think(&mut self, w: &mut World) {
        self.count -= 1;
        if self.count != 0 {
            return;
        }

        let amount = (w.p_random() & 3) * 16;
        let sec = &mut w.level.sectors[self.sector];

        if sec.lightlevel - amount < self.minlight {
            sec.lightlevel = self.minlight;
        } else {
            sec.lightlevel = self.maxlight - amount;
        }

        self.count = 4;
    }
}

pub fn spawn_fire_flicker(w: &mut World, sector: usize) {
    // Note that we are resetting sector attributes.
    // Nothing special about it during gameplay.
    w.level.sectors[sector].special = 0;

    let lightlevel = w.level.sectors[sector].lightlevel;
    let flick = FireFlicker {
        sector,
        count: 4,
        maxlight: lightlevel,
        minlight: find_min_surrounding_light(&w.level, sector, lightlevel) + 16,
    };
    w.add_thinker(Thinker::Flicker(flick));
}

// ============================================================
// BROKEN LIGHT FLASHING
// ============================================================

#[derive(Debug, Clone, Default)]
pub struct LightFlash {
    pub sector: usize,
    pub count: i32,
    pub maxlight: i32,
    pub minlight: i32,
    pub maxtime: i32,
    pub mintime: i32,
}

impl LightFlash {
    /// Do flashing lights.
    pub fn think(&mut self, w: &mut World) {
        self.count -= 1;
        if self.count != 0 {
            return;
        }

        if w.level.sectors[self.sector].lightlevel == self.maxlight {
            w.level.sectors[self.sector].lightlevel = self.minlight;
            self.count = (w.p_random() & self.mintime) + 1;
        } else {
            w.level.sectors[self.sector].lightlevel = self.maxlight;
            self.count = (w.p_random() & self.maxtime) + 1;
        }
    }
}

/// After the map has been loaded, scan each sector
/// for specials that spawn thinkers
pub fn spawn_light_flash(w: &mut World, sector: usize) {
    // nothing special about it during gameplay
    w.level.sectors[sector].special = 0;

    // find min light
    let lightlevel = w.level.sectors[sector].lightlevel;
    let minlight = find_min_surrounding_light(&w.level, sector, lightlevel);

    let mut flash = LightFlash {
        sector,
        maxlight: lightlevel,
        minlight,
        maxtime: 64,
        mintime: 7,
        ..Default::default()
    };
    flash.count = (w.p_random() & flash.maxtime) + 1;
    w.add_thinker(Thinker::Flash(flash));
}

// ============================================================
// STROBE LIGHT FLASHING
// ============================================================

#[derive(Debug, Clone)]
pub struct Strobe {
    pub sector: usize,
    pub count: i32,
    pub minlight: i32,
    pub maxlight: i32,
    pub darktime: i32,
    pub brighttime: i32,
}

impl Strobe {
    pub fn think(&mut self, w: &mut World) {
        self.count -= 1;
        if self.count != 0 {
            return;
        }

        let sec = &mut w.level.sectors[self.sector];
        if sec.lightlevel == self.minlight {
            sec.lightlevel = self.maxlight;
            self.count = self.brighttime;
        } else {
            sec.lightlevel = self.minlight;
            self.count = self.darktime;
        }
    }
}

pub fn spawn_strobe_flash(w: &mut World, sector: usize, fast_or_slow: i32, in_sync: bool) {
    let maxlight = w.level.sectors[sector].lightlevel;
    let mut minlight = find_min_surrounding_light(&w.level, sector, maxlight);

    if minlight == maxlight {
        minlight = 0;
    }

    // nothing special about it during gameplay
    w.level.sectors[sector].special = 0;

    let count = if in_sync { 1 } else { (w.p_random() & 7) + 1 };

    w.add_thinker(Thinker::Strobe(Strobe {
        sector,
        count,
        minlight,
        maxlight,
        darktime: fast_or_slow,
        brighttime: STROBEBRIGHT,
    }));
}

/// Start strobing lights (usually from a trigger)
pub fn ev_start_light_strobing(w: &mut World, tag: i32) {
    let mut secnum = None;

    while let Some(sec) = find_sector_from_tag(&w.level, tag, secnum) {
        secnum = Some(sec);
        if w.level.sectors[sec].specialdata.is_some() {
            continue;
        }
        spawn_strobe_flash(w, sec, SLOWDARK, false);
    }
}

/// TURN LINE'S TAG LIGHTS OFF
pub fn ev_turn_tag_lights_off(w: &mut World, tag: i32) {
    for sec in 0..w.level.sectors.len() {
        if w.level.sectors[sec].tag != tag {
            continue;
        }
        let min = find_min_surrounding_light(&w.level, sec, w.level.sectors[sec].lightlevel);
        w.level.sectors[sec].lightlevel = min;
    }
}

/// TURN LINE'S TAG LIGHTS ON
pub fn ev_light_turn_on(w: &mut World, tag: i32, mut bright: i32) {
    for sec in 0..w.level.sectors.len() {
        if w.level.sectors[sec].tag != tag {
            continue;
        }

        // bright = 0 means to search
        // for highest light level
        // surrounding sector
        if bright == 0 {
            for &line in &w.level.sectors[sec].lines {
                if let Some(temp) = w.level.get_next_sector(line, sec) {
                    bright = bright.max(w.level.sectors[temp].lightlevel);
                }
            }
        }
        w.level.sectors[sec].lightlevel = bright;
    }
}

// ============================================================
// Spawn glowing light
// ============================================================

#[derive(Debug, Clone)]
pub struct Glow {
    pub sector: usize,
    pub minlight: i32,
    pub maxlight: i32,
    pub direction: i32,
}

impl Glow {
    pub fn think(&mut self, w: &mut World) {
        let sec = &mut w.level.sectors[self.sector];
        match self.direction {
            -1 => {
                // DOWN
                sec.lightlevel -= GLOWSPEED;
                if sec.lightlevel <= self.minlight {
                    sec.lightlevel += GLOWSPEED;
                    self.direction = 1;
                }
            }
            1 => {
                // UP
                sec.lightlevel += GLOWSPEED;
                if sec.lightlevel >= self.maxlight {
                    sec.lightlevel -= GLOWSPEED;
                    self.direction = -1;
                }
            }
            _ => {}
        }
    }
}

pub fn spawn_glowing_light(w: &mut World, sector: usize) {
    let maxlight = w.level.sectors[sector].lightlevel;
    let glow = Glow {
        sector,
        minlight: find_min_surrounding_light(&w.level, sector, maxlight),
        maxlight,
        direction: -1,
    };
    w.level.sectors[sector].special = 0;
    w.add_thinker(Thinker::Glow(glow));
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
    fn test_strobe_alternates() {
        let mut w = test_world();
        w.level.sectors[0].lightlevel = 200;
        w.level.sectors[1].lightlevel = 100;
        spawn_strobe_flash(&mut w, 0, FASTDARK, true);

        run(&mut w, 1);
        assert_eq!(w.level.sectors[0].lightlevel, 100);
        run(&mut w, FASTDARK as usize);
        assert_eq!(w.level.sectors[0].lightlevel, 200);
        run(&mut w, STROBEBRIGHT as usize);
        assert_eq!(w.level.sectors[0].lightlevel, 100);
    }

    #[test]
    fn test_strobe_without_darker_neighbour_goes_black() {
        let mut w = test_world();
        w.level.sectors[0].lightlevel = 160;
        w.level.sectors[1].lightlevel = 160;
        spawn_strobe_flash(&mut w, 0, SLOWDARK, true);
        run(&mut w, 1);
        assert_eq!(w.level.sectors[0].lightlevel, 0);
    }

    #[test]
    fn test_glow_bounces_between_levels() {
        let mut w = test_world();
        w.level.sectors[0].lightlevel = 160;
        w.level.sectors[1].lightlevel = 128;
        spawn_glowing_light(&mut w, 0);

        let mut seen = Vec::new();
        for _ in 0..12 {
            run(&mut w, 1);
            seen.push(w.level.sectors[0].lightlevel);
        }
        assert!(seen.iter().all(|&l| (128..=160).contains(&l)));
        assert_eq!(&seen[..4], &[152, 144, 136, 136]);
    }

    #[test]
    fn test_flicker_stays_in_range() {
        let mut w = test_world();
        w.level.sectors[0].lightlevel = 192;
        w.level.sectors[1].lightlevel = 96;
        spawn_fire_flicker(&mut w, 0);
        for _ in 0..40 {
            run(&mut w, 1);
            let l = w.level.sectors[0].lightlevel;
            assert!((112..=192).contains(&l), "{}", l);
        }
    }

    #[test]
    fn test_light_turn_on_and_off() {
        let mut w = test_world();
        w.level.sectors[0].lightlevel = 176;
        w.level.sectors[1].lightlevel = 96;

        ev_light_turn_on(&mut w, 1, 0);
        assert_eq!(w.level.sectors[1].lightlevel, 176);

        w.level.sectors[0].lightlevel = 48;
        ev_turn_tag_lights_off(&mut w, 1);
        assert_eq!(w.level.sectors[1].lightlevel, 48);

        ev_light_turn_on(&mut w, 1, 255);
        assert_eq!(w.level.sectors[1].lightlevel, 255);
    }
}
