// view.rs - Rendering main loop and setup functions, view size and
// projection tables

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

use log::{debug, trace};

use doom_common::doomdef::{GameMode, SCREENHEIGHT, SCREENWIDTH};
use doom_common::fixed::{fixed_div, fixed_mul, Fixed, FRACBITS, FRACUNIT};
use doom_common::tables::{
    self, fine_index, finecosine, finesine, finetangent, tantoangle, Angle, ANG90, ANGLETOFINESHIFT,
    DBITS, FINEANGLES, SLOPERANGE,
};
use doom_game::level::NodeChild;
use doom_game::mobj::Mobj;
use doom_game::World;

use crate::bsp::{ClipRange, CurLine};
use crate::data::{build_scalelight, build_translation_tables, build_zlight, ScaleLight, ZLight};
use crate::plane::{PlaneCache, Visplane};
use crate::segs::DrawSeg;
use crate::sky::SKYTEXTUREMID;
use crate::things::VisSprite;
use crate::video::Framebuffer;

/// Fineangles in the SCREENWIDTH wide window.
const FIELDOFVIEW: usize = 2048;

// ============================================================
// View window
// ============================================================

/// Placement and projection of the 3D view on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    /// Screen position of the top left corner.
    pub x: i32,
    pub y: i32,
    /// Width in drawn columns. Half the screen width in low detail.
    pub width: i32,
    /// Width in screen pixels.
    pub scaledwidth: i32,
    pub height: i32,
    pub detailshift: i32,
    pub centerx: i32,
    pub centery: i32,
    pub centerxfrac: Fixed,
    pub centeryfrac: Fixed,
    pub projection: Fixed,
}

impl ViewWindow {
    /// Window for a screen size of `blocks` (3 to 11, 11 being the full
    /// screen) and `detail` (0 high, 1 low).
    pub fn new(blocks: i32, detail: i32) -> ViewWindow {
        let blocks = blocks.clamp(3, 11);
        let detailshift = detail.clamp(0, 1);

        let (scaledwidth, height) = if blocks == 11 {
            (SCREENWIDTH as i32, SCREENHEIGHT as i32)
        } else {
            (blocks * 32, (blocks * 168 / 10) & !7)
        };
        let width = scaledwidth >> detailshift;
        let centerx = width / 2;
        let centery = height / 2;

        // status bar height at bottom of screen
        const SBARHEIGHT: i32 = 32;
        let x = (SCREENWIDTH as i32 - scaledwidth) >> 1;
        let y = if scaledwidth == SCREENWIDTH as i32 {
            0
        } else {
            (SCREENHEIGHT as i32 - SBARHEIGHT - height) >> 1
        };

        ViewWindow {
            x,
            y,
            width,
            scaledwidth,
            height,
            detailshift,
            centerx,
            centery,
            centerxfrac: centerx << FRACBITS,
            centeryfrac: centery << FRACBITS,
            projection: centerx << FRACBITS,
        }
    }
}

/// Where the current frame is seen from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewPoint {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Angle,
    pub sin: Fixed,
    pub cos: Fixed,
    pub extralight: i32,
    /// Colormap forced by a power up (light amp, invulnerability).
    pub fixedcolormap: Option<usize>,
    pub player: usize,
}

/// Counters for the last rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub subsectors: usize,
    pub drawsegs: usize,
    pub visplanes: usize,
    pub vissprites: usize,
}

// ============================================================
// Renderer
// ============================================================

/// The software renderer. Holds the projection tables for the current
/// view size and the scratch state of the frame being drawn. The world
/// is only read.
pub struct Renderer {
    pub(crate) win: ViewWindow,
    setblocks: i32,
    setdetail: i32,

    /// Maps a view angle (fine, offset by 90 degrees) to the first screen
    /// column right of it.
    pub(crate) viewangletox: Vec<i32>,
    /// Smallest view angle that maps to each column.
    pub(crate) xtoviewangle: Vec<Angle>,
    /// Half the field of view.
    pub(crate) clipangle: Angle,

    pub(crate) yslope: Vec<Fixed>,
    pub(crate) distscale: Vec<Fixed>,
    pub(crate) pspritescale: Fixed,
    pub(crate) pspriteiscale: Fixed,

    pub(crate) scalelight: Box<ScaleLight>,
    pub(crate) zlight: Box<ZLight>,
    pub(crate) translations: [[u8; 256]; 3],
    pub(crate) skytexturemid: Fixed,

    pub(crate) view: ViewPoint,
    framecount: u32,
    /// Frame in which each sector's things were last added.
    pub(crate) sector_frame: Vec<u32>,
    pub(crate) fuzzpos: usize,
    pub(crate) sscount: usize,

    // bsp
    pub(crate) solidsegs: Vec<ClipRange>,
    pub(crate) drawsegs: Vec<DrawSeg>,
    pub(crate) cur: CurLine,

    // planes
    pub(crate) visplanes: Vec<Visplane>,
    pub(crate) lastvisplane: usize,
    pub(crate) floorplane: Option<usize>,
    pub(crate) ceilingplane: Option<usize>,
    pub(crate) floorclip: Vec<i16>,
    pub(crate) ceilingclip: Vec<i16>,
    pub(crate) openings: Vec<i16>,
    pub(crate) plane_cache: PlaneCache,

    // things
    pub(crate) vissprites: Vec<VisSprite>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// A renderer set up for a full screen, high detail view.
    pub fn new() -> Renderer {
        tables::init_tables();

        let mut r = Renderer {
            win: ViewWindow::new(11, 0),
            setblocks: 11,
            setdetail: 0,
            viewangletox: vec![0; FINEANGLES / 2],
            xtoviewangle: vec![0; SCREENWIDTH + 1],
            clipangle: 0,
            yslope: vec![0; SCREENHEIGHT],
            distscale: vec![0; SCREENWIDTH],
            pspritescale: 0,
            pspriteiscale: 0,
            scalelight: build_scalelight(SCREENWIDTH as i32),
            zlight: build_zlight(),
            translations: build_translation_tables(),
            skytexturemid: SKYTEXTUREMID,
            view: ViewPoint::default(),
            framecount: 0,
            sector_frame: Vec::new(),
            fuzzpos: 0,
            sscount: 0,
            solidsegs: Vec::with_capacity(32),
            drawsegs: Vec::with_capacity(256),
            cur: CurLine::default(),
            visplanes: Vec::new(),
            lastvisplane: 0,
            floorplane: None,
            ceilingplane: None,
            floorclip: vec![0; SCREENWIDTH],
            ceilingclip: vec![0; SCREENWIDTH],
            openings: Vec::with_capacity(SCREENWIDTH * 64),
            plane_cache: PlaneCache::default(),
            vissprites: Vec::with_capacity(128),
        };
        r.execute_set_view_size();
        r
    }

    pub fn window(&self) -> &ViewWindow {
        &self.win
    }

    /// Screen size in blocks and detail level, as last set.
    pub fn view_size(&self) -> (i32, i32) {
        (self.setblocks, self.setdetail)
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            subsectors: self.sscount,
            drawsegs: self.drawsegs.len(),
            visplanes: self.lastvisplane,
            vissprites: self.vissprites.len(),
        }
    }

    /// Changes the view size. Takes effect immediately; call between
    /// frames.
    pub fn set_view_size(&mut self, blocks: i32, detail: i32) {
        self.setblocks = blocks.clamp(3, 11);
        self.setdetail = detail.clamp(0, 1);
        self.execute_set_view_size();
    }

    fn execute_set_view_size(&mut self) {
        self.win = ViewWindow::new(self.setblocks, self.setdetail);
        let win = self.win;
        debug!(
            "view {}x{} at ({}, {}), detail {}",
            win.scaledwidth, win.height, win.x, win.y, win.detailshift
        );

        self.init_texture_mapping();

        // psprite scales
        self.pspritescale = (FRACUNIT * win.width) / SCREENWIDTH as i32;
        self.pspriteiscale = (FRACUNIT * SCREENWIDTH as i32) / win.width;

        // planes
        for i in 0..win.height {
            let dy = (((i - win.height / 2) << FRACBITS) + FRACUNIT / 2).abs();
            self.yslope[i as usize] = fixed_div(((win.width << win.detailshift) / 2) * FRACUNIT, dy);
        }

        for i in 0..win.width as usize {
            let cosadj = finecosine(fine_index(self.xtoviewangle[i])).abs();
            self.distscale[i] = fixed_div(FRACUNIT, cosadj);
        }

        self.scalelight = build_scalelight(win.width << win.detailshift);
    }

    fn init_texture_mapping(&mut self) {
        let win = self.win;

        // Use tangent table to generate viewangletox:
        //  viewangletox will give the next greatest x
        //  after the view angle.
        //
        // Calc focallength
        //  so FIELDOFVIEW angles covers SCREENWIDTH.
        let focallength = fixed_div(win.centerxfrac, finetangent(FINEANGLES / 4 + FIELDOFVIEW / 2));

        for i in 0..FINEANGLES / 2 {
            let tan = finetangent(i);
            let t = if tan > FRACUNIT * 2 {
                -1
            } else if tan < -FRACUNIT * 2 {
                win.width + 1
            } else {
                let t = fixed_mul(tan, focallength);
                ((win.centerxfrac - t + FRACUNIT - 1) >> FRACBITS).clamp(-1, win.width + 1)
            };
            self.viewangletox[i] = t;
        }

        // Scan viewangletox[] to generate xtoviewangle[]:
        //  xtoviewangle will give the smallest view angle
        //  that maps to x.
        for x in 0..=win.width {
            let mut i = 0;
            while self.viewangletox[i] > x {
                i += 1;
            }
            self.xtoviewangle[x as usize] = ((i as u32) << ANGLETOFINESHIFT).wrapping_sub(ANG90);
        }

        // Take out the fencepost cases from viewangletox.
        for t in self.viewangletox.iter_mut() {
            if *t == -1 {
                *t = 0;
            } else if *t == win.width + 1 {
                *t = win.width;
            }
        }

        self.clipangle = self.xtoviewangle[0];
    }

    // ============================================================
    // Projection helpers
    // ============================================================

    /// Angle from the view point to (`x`, `y`).
    #[inline]
    pub fn point_to_angle(&self, x: Fixed, y: Fixed) -> Angle {
        tables::point_to_angle(x.wrapping_sub(self.view.x), y.wrapping_sub(self.view.y))
    }

    /// Distance from the view point to (`x`, `y`).
    pub fn point_to_dist(&self, x: Fixed, y: Fixed) -> Fixed {
        let mut dx = x.wrapping_sub(self.view.x).wrapping_abs();
        let mut dy = y.wrapping_sub(self.view.y).wrapping_abs();

        if dy > dx {
            std::mem::swap(&mut dx, &mut dy);
        }
        if dx == 0 {
            return 0;
        }

        let slope = ((fixed_div(dy, dx) >> DBITS) as usize).min(SLOPERANGE);
        let angle = tantoangle(slope).wrapping_add(ANG90) >> ANGLETOFINESHIFT;

        // use as cosine
        fixed_div(dx, finesine(angle as usize))
    }

    /// Texture mapping scale for the current line at the given angle.
    /// `normalangle` and `distance` describe the wall being drawn.
    pub fn scale_from_global_angle(&self, visangle: Angle, normalangle: Angle, distance: Fixed) -> Fixed {
        let anglea = ANG90.wrapping_add(visangle.wrapping_sub(self.view.angle));
        let angleb = ANG90.wrapping_add(visangle.wrapping_sub(normalangle));

        // both sines are allways positive
        let sinea = finesine(fine_index(anglea));
        let sineb = finesine(fine_index(angleb));
        let num = fixed_mul(self.win.projection, sineb) << self.win.detailshift;
        let den = fixed_mul(distance, sinea);

        if den > num >> 16 {
            fixed_div(num, den).clamp(256, 64 * FRACUNIT)
        } else {
            64 * FRACUNIT
        }
    }

    // ============================================================
    // Frame
    // ============================================================

    fn setup_frame(&mut self, w: &World, pnum: usize, mo: &Mobj) {
        let player = &w.players[pnum];
        let angle = mo.angle;
        self.view = ViewPoint {
            x: mo.x,
            y: mo.y,
            z: player.viewz,
            angle,
            sin: finesine(fine_index(angle)),
            cos: finecosine(fine_index(angle)),
            extralight: player.extralight,
            fixedcolormap: (player.fixedcolormap != 0).then_some(player.fixedcolormap as usize),
            player: pnum,
        };

        self.sscount = 0;
        self.framecount = self.framecount.wrapping_add(1);
        if self.sector_frame.len() != w.level.sectors.len() {
            self.sector_frame = vec![0; w.level.sectors.len()];
        }
        // a wrapped counter must not match stale marks
        if self.framecount == 0 {
            self.sector_frame.fill(0);
            self.framecount = 1;
        }
    }

    #[inline]
    pub(crate) fn framecount(&self) -> u32 {
        self.framecount
    }

    /// Draws player `pnum`'s view of the world into the view window of
    /// `fb`. Nothing is drawn for a player without a body.
    pub fn render_player_view(&mut self, w: &World, pnum: usize, fb: &mut Framebuffer) {
        let Some(mo) = w.players[pnum].mo.and_then(|id| w.mobjs.get(id)) else {
            debug!("player {} has no body to view from", pnum + 1);
            return;
        };

        self.fill_border(w, fb);
        self.setup_frame(w, pnum, mo);

        // Clear buffers.
        self.clear_clip_segs();
        self.drawsegs.clear();
        self.clear_planes();
        self.vissprites.clear();

        // The head node is the last node output.
        match w.level.nodes.len() {
            // single subsector is a special case
            0 => self.render_subsector(w, fb, 0),
            n => self.render_bsp_node(w, fb, NodeChild::Node(n - 1)),
        }

        self.draw_planes(w, fb);
        self.draw_masked(w, fb);

        trace!("frame {}: {:?}", self.framecount, self.stats());
    }

    fn fill_border(&self, w: &World, fb: &mut Framebuffer) {
        let full = self.win.scaledwidth == SCREENWIDTH as i32 && self.win.height == SCREENHEIGHT as i32;
        if full {
            return;
        }
        let name = if w.options.gamemode == GameMode::Commercial {
            "GRNROCK"
        } else {
            "FLOOR7_2"
        };
        match w.res.flats.check_num_for_name(name) {
            Some(n) => fb.fill_back_screen(&self.win, &w.res.flats.get(n).pixels),
            None => fb.fill_back_screen(&self.win, &[0u8; 64 * 64]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{render_test_view, test_world_with_player, UNDRAWN};
    use doom_common::tables::{ANG180, ANG45};

    #[test]
    fn test_full_screen_window() {
        let win = ViewWindow::new(11, 0);
        assert_eq!((win.x, win.y, win.width, win.height), (0, 0, 320, 200));
        assert_eq!(win.centerxfrac, 160 * FRACUNIT);

        let low = ViewWindow::new(11, 1);
        assert_eq!((low.width, low.scaledwidth), (160, 320));

        let small = ViewWindow::new(7, 0);
        assert_eq!((small.scaledwidth, small.height), (224, 112));
        assert_eq!((small.x, small.y), (48, 28));

        assert_eq!(ViewWindow::new(40, 5), ViewWindow::new(11, 1));
    }

    #[test]
    fn test_texture_mapping_covers_field_of_view() {
        let r = Renderer::new();
        // 90 degrees across the screen
        assert!(r.clipangle >= ANG45 && r.clipangle - ANG45 <= 2 << ANGLETOFINESHIFT);
        assert_eq!(r.xtoviewangle[160], 0);
        assert!(r.xtoviewangle[0] > r.xtoviewangle[319]);
        // straight ahead lands in the middle
        assert_eq!(r.viewangletox[FINEANGLES / 4], 160);
        assert!(r.viewangletox.iter().all(|&x| (0..=320).contains(&x)));
    }

    #[test]
    fn test_point_to_angle_and_dist() {
        let mut r = Renderer::new();
        r.view.x = 100 * FRACUNIT;
        r.view.y = 100 * FRACUNIT;
        assert_eq!(r.point_to_angle(200 * FRACUNIT, 100 * FRACUNIT), 0);
        let west = r.point_to_angle(0, 100 * FRACUNIT);
        assert!(west.wrapping_sub(ANG180) < ANG1_TOLERANCE || ANG180.wrapping_sub(west) < ANG1_TOLERANCE);

        let d = r.point_to_dist(200 * FRACUNIT, 100 * FRACUNIT);
        assert!((d - 100 * FRACUNIT).abs() < FRACUNIT / 64);
        let diag = r.point_to_dist(130 * FRACUNIT, 140 * FRACUNIT);
        assert!((diag - 50 * FRACUNIT).abs() < FRACUNIT / 8);
        assert_eq!(r.point_to_dist(100 * FRACUNIT, 100 * FRACUNIT), 0);
    }

    const ANG1_TOLERANCE: Angle = ANG45 / 45;

    #[test]
    fn test_scale_is_clamped() {
        let r = Renderer::new();
        // a wall straight ahead at distance 160 is drawn at unit scale
        let s = r.scale_from_global_angle(0, 0, 160 * FRACUNIT);
        assert!((s - FRACUNIT).abs() < FRACUNIT / 100);
        assert_eq!(r.scale_from_global_angle(0, 0, 1), 64 * FRACUNIT);
        let far = r.scale_from_global_angle(0, 0, i32::MAX);
        assert!((256..400).contains(&far));
    }

    #[test]
    fn test_view_size_rebuilds_tables() {
        let mut r = Renderer::new();
        r.set_view_size(8, 1);
        assert_eq!(r.view_size(), (8, 1));
        assert_eq!(r.window().width, 128);
        assert!(r.clipangle >= ANG45 && r.clipangle - ANG45 <= 2 << ANGLETOFINESHIFT);
        assert_eq!(r.pspritescale, FRACUNIT * 128 / 320);
        assert_eq!(r.viewangletox[FINEANGLES / 4], 64);
    }

    #[test]
    fn test_full_frame_is_covered() {
        let w = test_world_with_player();
        let (r, fb) = render_test_view(&w);
        assert!(fb.pixels().iter().all(|&c| c != UNDRAWN));

        let stats = r.stats();
        assert_eq!(stats.subsectors, 2);
        assert!(stats.drawsegs >= 3);
        assert!(stats.visplanes >= 3);
        assert_eq!(stats.vissprites, 1);
    }

    #[test]
    fn test_player_without_body_draws_nothing() {
        let mut w = test_world_with_player();
        w.players[0].mo = None;
        let (r, fb) = render_test_view(&w);
        assert!(fb.pixels().iter().all(|&c| c == UNDRAWN));
        assert_eq!(r.stats(), FrameStats::default());
    }

    #[test]
    fn test_small_window_gets_border() {
        let w = test_world_with_player();
        let mut r = Renderer::new();
        r.set_view_size(7, 0);
        let mut fb = Framebuffer::new();
        fb.fill(UNDRAWN);
        r.render_player_view(&w, 0, &mut fb);
        assert!(fb.pixels().iter().all(|&c| c != UNDRAWN));
    }

    #[test]
    fn test_low_detail_doubles_columns() {
        let w = test_world_with_player();
        let mut r = Renderer::new();
        r.set_view_size(11, 1);
        let mut fb = Framebuffer::new();
        fb.fill(UNDRAWN);
        r.render_player_view(&w, 0, &mut fb);
        for y in 0..SCREENHEIGHT {
            let row = fb.row(y);
            assert!(row.chunks_exact(2).all(|p| p[0] == p[1] && p[0] != UNDRAWN));
        }
    }

    #[test]
    fn test_fixed_colormap_overrides_light() {
        let mut w = test_world_with_player();
        let (_, normal) = render_test_view(&w);
        w.players[0].fixedcolormap = 32;
        let (r, inverted) = render_test_view(&w);
        assert_eq!(r.view.fixedcolormap, Some(32));
        assert_ne!(normal.pixels(), inverted.pixels());
    }
}
