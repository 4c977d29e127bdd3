// plane.rs - Here is a core component: drawing the floors and ceilings,
// while maintaining a per column clipping list only.

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

use doom_common::doomdef::{SCREENHEIGHT, SCREENWIDTH};
use doom_common::fixed::{fixed_div, fixed_mul, Fixed};
use doom_common::tables::{fine_index, finecosine, finesine, ANG90};
use doom_game::World;

use crate::data::{light_row, LIGHTZSHIFT, MAXLIGHTZ};
use crate::draw::{draw_span, SpanDraw};
use crate::video::Framebuffer;
use crate::view::Renderer;

/// Column without a plane top.
const UNMARKED: u8 = 0xff;

/// A floor or ceiling area: same height, flat and light, with a top and
/// bottom row for each column it covers.
#[derive(Debug, Clone)]
pub(crate) struct Visplane {
    pub height: Fixed,
    pub picnum: usize,
    pub lightlevel: i32,
    pub minx: i32,
    pub maxx: i32,
    /// Indexed by x + 1 so the columns either side of the screen can
    /// hold padding.
    pub top: Vec<u8>,
    pub bottom: Vec<u8>,
}

impl Visplane {
    fn new() -> Visplane {
        Visplane {
            height: 0,
            picnum: 0,
            lightlevel: 0,
            minx: 0,
            maxx: 0,
            top: vec![UNMARKED; SCREENWIDTH + 2],
            bottom: vec![0; SCREENWIDTH + 2],
        }
    }

    fn reset(&mut self, height: Fixed, picnum: usize, lightlevel: i32, minx: i32, maxx: i32) {
        self.height = height;
        self.picnum = picnum;
        self.lightlevel = lightlevel;
        self.minx = minx;
        self.maxx = maxx;
        self.top.fill(UNMARKED);
        self.bottom.fill(0);
    }

    /// Rows `top` to `bottom` of column `x` belong to this plane.
    #[inline]
    pub fn mark(&mut self, x: i32, top: i32, bottom: i32) {
        self.top[(x + 1) as usize] = top as u8;
        self.bottom[(x + 1) as usize] = bottom as u8;
    }

    #[inline]
    pub fn top_at(&self, x: i32) -> i32 {
        self.top[(x + 1) as usize] as i32
    }

    #[inline]
    pub fn bottom_at(&self, x: i32) -> i32 {
        self.bottom[(x + 1) as usize] as i32
    }
}

/// Per row distance cache and span start columns.
#[derive(Debug, Clone)]
pub(crate) struct PlaneCache {
    pub spanstart: Vec<i32>,
    cachedheight: Vec<Fixed>,
    cacheddistance: Vec<Fixed>,
    cachedxstep: Vec<Fixed>,
    cachedystep: Vec<Fixed>,
    pub basexscale: Fixed,
    pub baseyscale: Fixed,
}

impl Default for PlaneCache {
    fn default() -> Self {
        PlaneCache {
            spanstart: vec![0; SCREENHEIGHT],
            cachedheight: vec![0; SCREENHEIGHT],
            cacheddistance: vec![0; SCREENHEIGHT],
            cachedxstep: vec![0; SCREENHEIGHT],
            cachedystep: vec![0; SCREENHEIGHT],
            basexscale: 0,
            baseyscale: 0,
        }
    }
}

/// What the spans of the plane being drawn share.
struct PlaneSpans<'a> {
    height: Fixed,
    source: &'a [u8],
    zlight: usize,
}

impl Renderer {
    /// At begining of frame.
    pub(crate) fn clear_planes(&mut self) {
        let width = self.win.width as usize;

        // opening / clipping determination
        self.floorclip[..width].fill(self.win.height as i16);
        self.ceilingclip[..width].fill(-1);

        self.lastvisplane = 0;
        self.floorplane = None;
        self.ceilingplane = None;
        self.openings.clear();

        // texture calculation
        self.plane_cache.cachedheight.fill(0);

        // left to right mapping
        let angle = fine_index(self.view.angle.wrapping_sub(ANG90));

        // scale will be unit scale at SCREENWIDTH/2 distance
        self.plane_cache.basexscale = fixed_div(finecosine(angle), self.win.centerxfrac);
        self.plane_cache.baseyscale = -fixed_div(finesine(angle), self.win.centerxfrac);
    }

    /// Finds a plane with matching height, flat and light, or starts a
    /// new one.
    pub(crate) fn find_plane(&mut self, w: &World, mut height: Fixed, picnum: usize, mut lightlevel: i32) -> usize {
        if picnum == w.skyflatnum {
            // all skys map together
            height = 0;
            lightlevel = 0;
        }

        if let Some(i) = self.visplanes[..self.lastvisplane]
            .iter()
            .position(|pl| pl.height == height && pl.picnum == picnum && pl.lightlevel == lightlevel)
        {
            return i;
        }

        self.new_plane(height, picnum, lightlevel, SCREENWIDTH as i32, -1)
    }

    fn new_plane(&mut self, height: Fixed, picnum: usize, lightlevel: i32, minx: i32, maxx: i32) -> usize {
        if self.lastvisplane == self.visplanes.len() {
            self.visplanes.push(Visplane::new());
        }
        let i = self.lastvisplane;
        self.lastvisplane += 1;
        self.visplanes[i].reset(height, picnum, lightlevel, minx, maxx);
        i
    }

    /// Extends plane `pl` over columns `start` to `stop`, or makes a
    /// copy of it for them when any of those columns are already marked.
    pub(crate) fn check_plane(&mut self, pl: usize, start: i32, stop: i32) -> usize {
        let plane = &self.visplanes[pl];

        let (intrl, unionl) = if start < plane.minx {
            (plane.minx, start)
        } else {
            (start, plane.minx)
        };

        let (intrh, unionh) = if stop > plane.maxx {
            (plane.maxx, stop)
        } else {
            (stop, plane.maxx)
        };

        let clear = (intrl..=intrh).all(|x| plane.top_at(x) == UNMARKED as i32);
        if clear {
            let plane = &mut self.visplanes[pl];
            plane.minx = unionl;
            plane.maxx = unionh;

            // use the same one
            return pl;
        }

        // make a new visplane
        let (height, picnum, lightlevel) = (plane.height, plane.picnum, plane.lightlevel);
        self.new_plane(height, picnum, lightlevel, start, stop)
    }

    fn make_spans(
        &mut self,
        w: &World,
        fb: &mut Framebuffer,
        ps: &PlaneSpans,
        x: i32,
        mut t1: i32,
        mut b1: i32,
        mut t2: i32,
        mut b2: i32,
    ) {
        while t1 < t2 && t1 <= b1 {
            let x1 = self.plane_cache.spanstart[t1 as usize];
            self.map_plane(w, fb, ps, t1, x1, x - 1);
            t1 += 1;
        }
        while b1 > b2 && b1 >= t1 {
            let x1 = self.plane_cache.spanstart[b1 as usize];
            self.map_plane(w, fb, ps, b1, x1, x - 1);
            b1 -= 1;
        }

        while t2 < t1 && t2 <= b2 {
            self.plane_cache.spanstart[t2 as usize] = x;
            t2 += 1;
        }
        while b2 > b1 && b2 >= t2 {
            self.plane_cache.spanstart[b2 as usize] = x;
            b2 -= 1;
        }
    }

    /// Draws row `y` from `x1` to `x2`. Distance and steps are cached
    /// per row for as long as the plane height stays the same.
    fn map_plane(&mut self, w: &World, fb: &mut Framebuffer, ps: &PlaneSpans, y: i32, x1: i32, x2: i32) {
        if x2 < x1 || x1 < 0 || x2 >= self.win.width || y < 0 || y >= self.win.height {
            return;
        }
        let row = y as usize;
        let cache = &mut self.plane_cache;

        let (distance, xstep, ystep) = if ps.height != cache.cachedheight[row] {
            cache.cachedheight[row] = ps.height;
            let distance = fixed_mul(ps.height, self.yslope[row]);
            cache.cacheddistance[row] = distance;
            cache.cachedxstep[row] = fixed_mul(distance, cache.basexscale);
            cache.cachedystep[row] = fixed_mul(distance, cache.baseyscale);
            (distance, cache.cachedxstep[row], cache.cachedystep[row])
        } else {
            (cache.cacheddistance[row], cache.cachedxstep[row], cache.cachedystep[row])
        };

        let length = fixed_mul(distance, self.distscale[x1 as usize]);
        let angle = fine_index(self.view.angle.wrapping_add(self.xtoviewangle[x1 as usize]));
        let xfrac = self.view.x.wrapping_add(fixed_mul(finecosine(angle), length));
        let yfrac = self.view.y.wrapping_neg().wrapping_sub(fixed_mul(finesine(angle), length));

        let colormap = match self.view.fixedcolormap {
            Some(n) => n,
            None => {
                let index = ((distance >> LIGHTZSHIFT) as usize).min(MAXLIGHTZ - 1);
                self.zlight[ps.zlight][index]
            }
        };

        let d = SpanDraw {
            y,
            x1,
            x2,
            xfrac,
            yfrac,
            xstep,
            ystep,
            source: ps.source,
            colormap: w.res.colormaps.get(colormap),
        };
        draw_span(&self.win, fb, &d);
    }

    /// At the end of each frame.
    pub(crate) fn draw_planes(&mut self, w: &World, fb: &mut Framebuffer) {
        let mut planes = std::mem::take(&mut self.visplanes);

        for pl in planes[..self.lastvisplane].iter_mut() {
            if pl.minx > pl.maxx {
                continue;
            }

            // sky flat
            if pl.picnum == w.skyflatnum {
                self.draw_sky_plane(w, fb, pl);
                continue;
            }

            // regular flat
            let flat = w.res.flats.get(w.anims.flat(pl.picnum));
            let ps = PlaneSpans {
                height: (pl.height - self.view.z).abs(),
                source: &flat.pixels,
                zlight: light_row(pl.lightlevel, self.view.extralight),
            };

            pl.top[(pl.maxx + 2) as usize] = UNMARKED;
            pl.top[pl.minx as usize] = UNMARKED;

            let stop = pl.maxx + 1;
            for x in pl.minx..=stop {
                let (t1, b1) = (pl.top_at(x - 1), pl.bottom_at(x - 1));
                let (t2, b2) = (pl.top_at(x), pl.bottom_at(x));
                self.make_spans(w, fb, &ps, x, t1, b1, t2, b2);
            }
        }

        self.visplanes = planes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_world_with_player;
    use doom_common::fixed::FRACUNIT;

    #[test]
    fn test_find_plane_merges_matches() {
        let w = test_world_with_player();
        let floor = w.level.sectors[0].floorpic;
        let mut r = Renderer::new();
        r.clear_planes();
        let a = r.find_plane(&w, 0, floor, 160);
        let b = r.find_plane(&w, 0, floor, 160);
        let c = r.find_plane(&w, 8 * FRACUNIT, floor, 160);
        assert_eq!(a, b);
        assert_ne!(a, c);

        // all skies are one plane
        let s1 = r.find_plane(&w, 128 * FRACUNIT, w.skyflatnum, 192);
        let s2 = r.find_plane(&w, 300 * FRACUNIT, w.skyflatnum, 100);
        assert_eq!(s1, s2);
        assert_eq!(r.lastvisplane, 3);

        // the pool is reused on the next frame
        r.clear_planes();
        assert_eq!(r.find_plane(&w, 0, floor, 0), 0);
        assert_eq!(r.visplanes.len(), 3);
    }

    #[test]
    fn test_check_plane_splits_on_overlap() {
        let w = test_world_with_player();
        let floor = w.level.sectors[0].floorpic;
        let mut r = Renderer::new();
        r.clear_planes();
        let pl = r.find_plane(&w, 0, floor, 160);

        let pl = r.check_plane(pl, 10, 20);
        assert_eq!((r.visplanes[pl].minx, r.visplanes[pl].maxx), (10, 20));
        r.visplanes[pl].mark(15, 100, 120);

        // disjoint range extends the same plane
        assert_eq!(r.check_plane(pl, 30, 40), pl);
        assert_eq!((r.visplanes[pl].minx, r.visplanes[pl].maxx), (10, 40));

        // overlapping a marked column needs a new plane
        let split = r.check_plane(pl, 12, 16);
        assert_ne!(split, pl);
        assert_eq!((r.visplanes[split].minx, r.visplanes[split].maxx), (12, 16));
        assert_eq!(r.visplanes[split].picnum, floor);
        assert_eq!(r.visplanes[split].top_at(15), UNMARKED as i32);
    }

    #[test]
    fn test_clear_planes_resets_clips() {
        let mut r = Renderer::new();
        r.floorclip[3] = 7;
        r.ceilingclip[3] = 7;
        r.clear_planes();
        assert_eq!(r.floorclip[3], 200);
        assert_eq!(r.ceilingclip[3], -1);
        // facing east, stepping right along a row moves south in flat space
        assert!(r.plane_cache.basexscale.abs() <= 1);
        assert!((r.plane_cache.baseyscale - FRACUNIT / 160).abs() <= 1);
    }
}
