// draw.rs - Column and span drawers

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

use doom_common::doomdef::SCREENWIDTH;
use doom_common::fixed::{Fixed, FRACBITS};

use crate::video::Framebuffer;
use crate::view::{Renderer, ViewWindow};

/// Colormap used to darken what is behind a fuzzy column.
pub const FUZZCOLORMAP: usize = 6;

const FUZZTABLE: usize = 50;

/// Rows above (-1) or below (1) to sample for each fuzz pixel.
const FUZZOFFSET: [i32; FUZZTABLE] = [
    1, -1, 1, -1, 1, 1, -1, 1, 1, -1, 1, 1, 1, -1, 1, 1, 1, -1, -1, -1, -1, 1, -1, -1, 1, 1, 1, 1, -1, 1, -1,
    1, 1, -1, -1, 1, 1, -1, -1, -1, -1, 1, 1, 1, 1, -1, 1, 1, -1, 1,
];

/// A vertical run to draw. `x` and the rows are in view window
/// coordinates.
pub(crate) struct ColumnDraw<'a> {
    pub x: i32,
    pub yl: i32,
    pub yh: i32,
    pub iscale: Fixed,
    pub texturemid: Fixed,
    pub source: &'a [u8],
    pub colormap: &'a [u8; 256],
}

/// How a column's pixels reach the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnStyle {
    Normal,
    /// Spectre and invisibility effect. The column colormap must be
    /// `FUZZCOLORMAP`.
    Fuzz,
    /// Green ramp remapped through translation table `n`.
    Translated(usize),
}

/// A horizontal run of a floor or ceiling.
pub(crate) struct SpanDraw<'a> {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    pub xfrac: Fixed,
    pub yfrac: Fixed,
    pub xstep: Fixed,
    pub ystep: Fixed,
    pub source: &'a [u8],
    pub colormap: &'a [u8; 256],
}

/// Row of `source` for texture coordinate `frac`. Sources repeat
/// vertically at their own height.
#[inline]
fn texel(frac: Fixed, len: i32) -> usize {
    (frac >> FRACBITS).rem_euclid(len) as usize
}

#[inline]
fn offset(win: &ViewWindow, x: i32, y: i32) -> usize {
    (win.y + y) as usize * SCREENWIDTH + (win.x + (x << win.detailshift)) as usize
}

#[inline]
fn put(pixels: &mut [u8], win: &ViewWindow, i: usize, c: u8) {
    pixels[i] = c;
    if win.detailshift == 1 {
        pixels[i + 1] = c;
    }
}

/// Clips a column to the window. `None` when nothing is left.
#[inline]
fn clip_column(win: &ViewWindow, d: &ColumnDraw) -> Option<(i32, i32)> {
    if d.x < 0 || d.x >= win.width || d.source.is_empty() {
        return None;
    }
    let yl = d.yl.max(0);
    let yh = d.yh.min(win.height - 1);
    (yl <= yh).then_some((yl, yh))
}

/// A vertical run of texture, sprite or sky pixels, scaled and lit.
pub(crate) fn draw_column(win: &ViewWindow, fb: &mut Framebuffer, d: &ColumnDraw) {
    let Some((yl, yh)) = clip_column(win, d) else {
        return;
    };
    let len = d.source.len() as i32;
    let pixels = fb.pixels_mut();

    // Determine scaling,
    //  which is the only mapping to be done.
    let mut frac = d
        .texturemid
        .wrapping_add((yl - win.centery).wrapping_mul(d.iscale));
    for y in yl..=yh {
        let c = d.colormap[d.source[texel(frac, len)] as usize];
        put(pixels, win, offset(win, d.x, y), c);
        frac = frac.wrapping_add(d.iscale);
    }
}

/// Remaps the green player ramp before lighting.
pub(crate) fn draw_translated_column(win: &ViewWindow, fb: &mut Framebuffer, d: &ColumnDraw, translation: &[u8; 256]) {
    let Some((yl, yh)) = clip_column(win, d) else {
        return;
    };
    let len = d.source.len() as i32;
    let pixels = fb.pixels_mut();

    let mut frac = d
        .texturemid
        .wrapping_add((yl - win.centery).wrapping_mul(d.iscale));
    for y in yl..=yh {
        let c = d.colormap[translation[d.source[texel(frac, len)] as usize] as usize];
        put(pixels, win, offset(win, d.x, y), c);
        frac = frac.wrapping_add(d.iscale);
    }
}

/// Darkens the pixels already on screen, sampling one row up or down.
/// The first and last rows of the window are never touched since they
/// have no neighbour on one side.
pub(crate) fn draw_fuzz_column(win: &ViewWindow, fb: &mut Framebuffer, d: &ColumnDraw, fuzzpos: &mut usize) {
    if d.x < 0 || d.x >= win.width {
        return;
    }
    // Adjust borders. Low...
    let yl = d.yl.max(1);
    // .. and high.
    let yh = d.yh.min(win.height - 2);
    if yl > yh {
        return;
    }

    let pixels = fb.pixels_mut();
    for y in yl..=yh {
        let src = offset(win, d.x, y + FUZZOFFSET[*fuzzpos]);
        let c = d.colormap[pixels[src] as usize];
        put(pixels, win, offset(win, d.x, y), c);

        // Clamp table lookup index.
        *fuzzpos += 1;
        if *fuzzpos == FUZZTABLE {
            *fuzzpos = 0;
        }
    }
}

/// Draws a flat span. Flats are 64x64, so the fractions wrap at 64.
pub(crate) fn draw_span(win: &ViewWindow, fb: &mut Framebuffer, d: &SpanDraw) {
    if d.y < 0 || d.y >= win.height || d.source.len() < 64 * 64 {
        return;
    }
    let x1 = d.x1.max(0);
    let x2 = d.x2.min(win.width - 1);
    if x1 > x2 {
        return;
    }

    let pixels = fb.pixels_mut();
    let mut xfrac = d.xfrac.wrapping_add(d.xstep.wrapping_mul(x1 - d.x1));
    let mut yfrac = d.yfrac.wrapping_add(d.ystep.wrapping_mul(x1 - d.x1));
    for x in x1..=x2 {
        // Current texture index in u,v.
        let spot = (((yfrac >> (16 - 6)) & (63 * 64)) + ((xfrac >> 16) & 63)) as usize;
        put(pixels, win, offset(win, x, d.y), d.colormap[d.source[spot] as usize]);
        xfrac = xfrac.wrapping_add(d.xstep);
        yfrac = yfrac.wrapping_add(d.ystep);
    }
}

impl Renderer {
    /// Draws a column in the given style.
    pub(crate) fn draw_styled_column(&mut self, fb: &mut Framebuffer, d: &ColumnDraw, style: ColumnStyle) {
        match style {
            ColumnStyle::Normal => draw_column(&self.win, fb, d),
            ColumnStyle::Fuzz => draw_fuzz_column(&self.win, fb, d, &mut self.fuzzpos),
            ColumnStyle::Translated(n) => {
                let table = &self.translations[n.min(self.translations.len() - 1)];
                draw_translated_column(&self.win, fb, d, table)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doom_common::fixed::FRACUNIT;

    fn identity() -> [u8; 256] {
        let mut map = [0u8; 256];
        for (i, m) in map.iter_mut().enumerate() {
            *m = i as u8;
        }
        map
    }

    #[test]
    fn test_column_scales_and_wraps() {
        let win = ViewWindow::new(11, 0);
        let map = identity();
        let source: Vec<u8> = (10..18).collect();
        let mut fb = Framebuffer::new();
        // texture row 0 on the center row, two screen rows per texel
        let d = ColumnDraw {
            x: 5,
            yl: 100,
            yh: 131,
            iscale: FRACUNIT / 2,
            texturemid: 0,
            source: &source,
            colormap: &map,
        };
        draw_column(&win, &mut fb, &d);
        assert_eq!(fb.pixel(5, 100), 10);
        assert_eq!(fb.pixel(5, 101), 10);
        assert_eq!(fb.pixel(5, 102), 11);
        // repeats after eight texels
        assert_eq!(fb.pixel(5, 116), 10);
        assert_eq!(fb.pixel(5, 99), 0);
        assert_eq!(fb.pixel(5, 132), 0);
    }

    #[test]
    fn test_column_clipped_to_window() {
        let win = ViewWindow::new(8, 0);
        let map = identity();
        let source = [7u8; 4];
        let mut fb = Framebuffer::new();
        let d = ColumnDraw {
            x: 0,
            yl: -50,
            yh: 500,
            iscale: FRACUNIT,
            texturemid: 0,
            source: &source,
            colormap: &map,
        };
        draw_column(&win, &mut fb, &d);
        let (x, y) = (win.x as usize, win.y as usize);
        assert_eq!(fb.pixel(x, y), 7);
        assert_eq!(fb.pixel(x, y + win.height as usize - 1), 7);
        assert_eq!(fb.pixel(x, y - 1), 0);
        assert_eq!(fb.pixel(x, y + win.height as usize), 0);
    }

    #[test]
    fn test_low_detail_doubles_pixels() {
        let win = ViewWindow::new(11, 1);
        let map = identity();
        let source = [9u8];
        let mut fb = Framebuffer::new();
        let d = ColumnDraw {
            x: 3,
            yl: 0,
            yh: 0,
            iscale: FRACUNIT,
            texturemid: 0,
            source: &source,
            colormap: &map,
        };
        draw_column(&win, &mut fb, &d);
        assert_eq!(fb.pixel(6, 0), 9);
        assert_eq!(fb.pixel(7, 0), 9);
        assert_eq!(fb.pixel(8, 0), 0);
    }

    #[test]
    fn test_translated_column_remaps_green() {
        let win = ViewWindow::new(11, 0);
        let map = identity();
        let tables = crate::data::build_translation_tables();
        let source = [0x72u8, 0x10];
        let mut fb = Framebuffer::new();
        let d = ColumnDraw {
            x: 0,
            yl: 100,
            yh: 101,
            iscale: FRACUNIT,
            texturemid: 0,
            source: &source,
            colormap: &map,
        };
        draw_translated_column(&win, &mut fb, &d, &tables[2]);
        assert_eq!(fb.pixel(0, 100), 0x22);
        assert_eq!(fb.pixel(0, 101), 0x10);
    }

    #[test]
    fn test_fuzz_samples_neighbours() {
        let win = ViewWindow::new(11, 0);
        let mut dark = [0u8; 256];
        for (i, m) in dark.iter_mut().enumerate() {
            *m = (i / 2) as u8;
        }
        let mut fb = Framebuffer::new();
        for y in 0..200 {
            fb.pixels_mut()[y * SCREENWIDTH + 4] = 100;
        }
        let d = ColumnDraw {
            x: 4,
            yl: 0,
            yh: 199,
            iscale: FRACUNIT,
            texturemid: 0,
            source: &[],
            colormap: &dark,
        };
        let mut fuzzpos = 0;
        draw_fuzz_column(&win, &mut fb, &d, &mut fuzzpos);
        // border rows untouched
        assert_eq!(fb.pixel(4, 0), 100);
        assert_eq!(fb.pixel(4, 199), 100);
        assert_eq!(fuzzpos, 198 % FUZZTABLE);
        assert!((1..199).all(|y| fb.pixel(4, y) < 100));
    }

    #[test]
    fn test_span_steps_across_flat() {
        let win = ViewWindow::new(11, 0);
        let map = identity();
        let flat: Vec<u8> = (0..4096).map(|i| (i % 64) as u8).collect();
        let mut fb = Framebuffer::new();
        let d = SpanDraw {
            y: 150,
            x1: 10,
            x2: 80,
            xfrac: 0,
            yfrac: 0,
            xstep: FRACUNIT,
            ystep: 0,
            source: &flat,
            colormap: &map,
        };
        draw_span(&win, &mut fb, &d);
        assert_eq!(fb.pixel(10, 150), 0);
        assert_eq!(fb.pixel(11, 150), 1);
        // wraps at the flat edge
        assert_eq!(fb.pixel(74, 150), 0);
        assert_eq!(fb.pixel(9, 150), 0);
        assert_eq!(fb.pixel(81, 150), 0);
    }
}
