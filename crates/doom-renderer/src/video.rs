// video.rs - 8-bit framebuffer, patch drawing and palette output

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

use rayon::prelude::*;

use doom_common::doomdef::{PowerType, SCREENHEIGHT, SCREENWIDTH};
use doom_common::gfx::{Palettes, Patch};
use doom_game::player::Player;

use crate::view::ViewWindow;

// ============================================================
// Palette selection
// ============================================================

pub const STARTREDPALS: usize = 1;
pub const STARTBONUSPALS: usize = 9;
pub const NUMREDPALS: usize = 8;
pub const NUMBONUSPALS: usize = 4;
/// Radiation suit, green shift.
pub const RADIATIONPAL: usize = 13;

/// Palette to show for a player: red while hurt or berserk, gold after
/// a pickup, green while the radiation suit is active.
pub fn player_palette(player: &Player) -> usize {
    let mut cnt = player.damagecount;

    let strength = player.powers[PowerType::Strength as usize];
    if strength != 0 {
        // slowly fade the berzerk out
        let bzc = 12 - (strength >> 6);
        if bzc > cnt {
            cnt = bzc;
        }
    }

    let ironfeet = player.powers[PowerType::IronFeet as usize];
    if cnt > 0 {
        let palette = ((cnt + 7) >> 3) as usize;
        palette.min(NUMREDPALS - 1) + STARTREDPALS
    } else if player.bonuscount > 0 {
        let palette = ((player.bonuscount + 7) >> 3) as usize;
        palette.min(NUMBONUSPALS - 1) + STARTBONUSPALS
    } else if ironfeet > 4 * 32 || ironfeet & 8 != 0 {
        RADIATIONPAL
    } else {
        0
    }
}

// ============================================================
// Framebuffer
// ============================================================

/// The screen: one palette index per pixel, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Vec<u8>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub const WIDTH: usize = SCREENWIDTH;
    pub const HEIGHT: usize = SCREENHEIGHT;

    pub fn new() -> Framebuffer {
        Framebuffer {
            pixels: vec![0; SCREENWIDTH * SCREENHEIGHT],
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * SCREENWIDTH + x]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * SCREENWIDTH..(y + 1) * SCREENWIDTH]
    }

    pub fn fill(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    /// Draws a patch with its offsets applied. Parts off the screen are
    /// clipped.
    pub fn draw_patch(&mut self, x: i32, y: i32, patch: &Patch) {
        let x0 = x - patch.left_offset;
        let y0 = y - patch.top_offset;

        for col in 0..patch.width {
            let sx = x0 + col;
            if sx < 0 || sx >= SCREENWIDTH as i32 {
                continue;
            }
            for post in patch.column(col) {
                for (i, &c) in post.pixels.iter().enumerate() {
                    let sy = y0 + post.top_delta + i as i32;
                    if sy < 0 || sy >= SCREENHEIGHT as i32 {
                        continue;
                    }
                    self.pixels[sy as usize * SCREENWIDTH + sx as usize] = c;
                }
            }
        }
    }

    /// A full screen picture such as TITLEPIC.
    pub fn draw_page(&mut self, page: &Patch) {
        self.fill(0);
        self.draw_patch(0, 0, page);
    }

    /// Tiles a 64x64 flat over everything outside the view window.
    pub fn fill_back_screen(&mut self, win: &ViewWindow, flat: &[u8]) {
        if win.scaledwidth == SCREENWIDTH as i32 && win.height == SCREENHEIGHT as i32 {
            return;
        }
        let (vx, vy) = (win.x as usize, win.y as usize);
        let (vw, vh) = (win.scaledwidth as usize, win.height as usize);
        for (y, row) in self.pixels.chunks_exact_mut(SCREENWIDTH).enumerate() {
            let src = &flat[(y & 63) * 64..(y & 63) * 64 + 64];
            for (x, p) in row.iter_mut().enumerate() {
                if y >= vy && y < vy + vh && x >= vx && x < vx + vw {
                    continue;
                }
                *p = src[x & 63];
            }
        }
    }

    // ============================================================
    // Output
    // ============================================================

    /// Converts the screen through palette `palette` with gamma level
    /// `gamma` into 0xAABBGGRR words.
    pub fn to_rgba(&self, palettes: &Palettes, palette: usize, gamma: usize) -> Vec<u32> {
        let lut = palettes.rgba_lut(palette, gamma);
        let mut out = vec![0u32; self.pixels.len()];
        out.par_chunks_mut(SCREENWIDTH)
            .zip(self.pixels.par_chunks(SCREENWIDTH))
            .for_each(|(dst, src)| {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d = lut[s as usize];
                }
            });
        out
    }
}

/// Byte view of converted pixels in R, G, B, A order.
pub fn rgba_bytes(rgba: &[u32]) -> &[u8] {
    bytemuck::cast_slice(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doom_common::testkit;
    use doom_common::wad::Wad;

    fn test_palettes(wad: &Wad) -> Palettes {
        Palettes::from_lump(wad.lump_by_name("PLAYPAL").unwrap()).unwrap()
    }

    #[test]
    fn test_palette_from_player_state() {
        let mut p = Player::default();
        assert_eq!(player_palette(&p), 0);

        p.bonuscount = 6;
        assert_eq!(player_palette(&p), STARTBONUSPALS + 1);

        p.damagecount = 100;
        assert_eq!(player_palette(&p), STARTREDPALS + NUMREDPALS - 1);

        p.damagecount = 0;
        p.bonuscount = 0;
        p.powers[PowerType::IronFeet as usize] = 1000;
        assert_eq!(player_palette(&p), RADIATIONPAL);
        // flickers as the suit runs out
        p.powers[PowerType::IronFeet as usize] = 7;
        assert_eq!(player_palette(&p), 0);

        p.powers[PowerType::Strength as usize] = 1;
        assert_eq!(player_palette(&p), STARTREDPALS + 2);
    }

    #[test]
    fn test_page_covers_screen() {
        let wad = testkit::wad();
        let page = doom_common::resources::Resources::load_patch(&wad, "TITLEPIC").unwrap();
        let mut fb = Framebuffer::new();
        fb.fill(255);
        fb.draw_page(&page);
        assert_eq!(fb.pixel(0, 0), 0);
        assert_eq!(fb.pixel(10, 3), 13);
        assert!(fb.pixels().iter().all(|&c| c != 255));
    }

    #[test]
    fn test_patch_clipped_at_edges() {
        let px = vec![Some(7u8); 16 * 16];
        let patch = Patch::from_pixels(16, 16, 0, 0, &px);
        let mut fb = Framebuffer::new();
        fb.draw_patch(-8, SCREENHEIGHT as i32 - 4, &patch);
        assert_eq!(fb.pixel(0, SCREENHEIGHT - 1), 7);
        assert_eq!(fb.pixel(7, SCREENHEIGHT - 4), 7);
        assert_eq!(fb.pixel(8, SCREENHEIGHT - 1), 0);
        assert_eq!(fb.pixel(0, SCREENHEIGHT - 5), 0);
    }

    #[test]
    fn test_back_screen_leaves_view_alone() {
        let win = ViewWindow::new(8, 0);
        let flat = vec![9u8; 64 * 64];
        let mut fb = Framebuffer::new();
        fb.fill_back_screen(&win, &flat);
        assert_eq!(fb.pixel(0, 0), 9);
        assert_eq!(fb.pixel(win.x as usize, win.y as usize), 0);
        assert_eq!(fb.pixel((win.x + win.scaledwidth) as usize, win.y as usize), 9);

        let mut full = Framebuffer::new();
        full.fill_back_screen(&ViewWindow::new(11, 0), &flat);
        assert!(full.pixels().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_rgba_conversion() {
        let wad = testkit::wad();
        let pals = test_palettes(&wad);
        let mut fb = Framebuffer::new();
        fb.pixels_mut()[1] = 100;
        let rgba = fb.to_rgba(&pals, 0, 0);
        assert_eq!(rgba.len(), SCREENWIDTH * SCREENHEIGHT);
        let bytes = rgba_bytes(&rgba);
        // test palette entry i is (i, i / 2, 255 - i)
        assert_eq!(&bytes[4..8], &[100, 50, 155, 255]);
        assert_eq!(&bytes[0..4], &[0, 0, 255, 255]);
    }
}
