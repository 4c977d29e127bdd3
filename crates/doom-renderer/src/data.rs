// data.rs - Light tables and player translation tables

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
use doom_common::fixed::{fixed_div, FRACUNIT};
use doom_common::gfx::NUMCOLORMAPS;

// Lighting constants.
// Now why not 32 levels here?
pub const LIGHTLEVELS: usize = 16;
pub const LIGHTSEGSHIFT: i32 = 4;

pub const MAXLIGHTSCALE: usize = 48;
pub const LIGHTSCALESHIFT: i32 = 12;
pub const MAXLIGHTZ: usize = 128;
pub const LIGHTZSHIFT: i32 = 20;

const DISTMAP: i32 = 2;

/// Colormap numbers by light level and wall scale.
pub type ScaleLight = [[usize; MAXLIGHTSCALE]; LIGHTLEVELS];
/// Colormap numbers by light level and plane distance.
pub type ZLight = [[usize; MAXLIGHTZ]; LIGHTLEVELS];

fn startmap(level: usize) -> i32 {
    ((LIGHTLEVELS - 1 - level) * 2 * NUMCOLORMAPS / LIGHTLEVELS) as i32
}

/// Light level and distance combinations for floors and ceilings. Does
/// not depend on the view size.
pub fn build_zlight() -> Box<ZLight> {
    let mut zlight = Box::new([[0usize; MAXLIGHTZ]; LIGHTLEVELS]);
    for (i, row) in zlight.iter_mut().enumerate() {
        let start = startmap(i);
        for (j, out) in row.iter_mut().enumerate() {
            let scale = fixed_div((SCREENWIDTH as i32 / 2) * FRACUNIT, ((j + 1) as i32) << LIGHTZSHIFT);
            let level = start - (scale >> LIGHTSCALESHIFT) / DISTMAP;
            *out = level.clamp(0, NUMCOLORMAPS as i32 - 1) as usize;
        }
    }
    zlight
}

/// Light level and wall scale combinations for a view `scaledwidth`
/// pixels wide.
pub fn build_scalelight(scaledwidth: i32) -> Box<ScaleLight> {
    let mut scalelight = Box::new([[0usize; MAXLIGHTSCALE]; LIGHTLEVELS]);
    for (i, row) in scalelight.iter_mut().enumerate() {
        let start = startmap(i);
        for (j, out) in row.iter_mut().enumerate() {
            let level = start - ((j as i32 * SCREENWIDTH as i32) / scaledwidth) / DISTMAP;
            *out = level.clamp(0, NUMCOLORMAPS as i32 - 1) as usize;
        }
    }
    scalelight
}

/// Light row for a sector light level plus extra light, clamped.
#[inline]
pub fn light_row(lightlevel: i32, extralight: i32) -> usize {
    ((lightlevel >> LIGHTSEGSHIFT) + extralight).clamp(0, LIGHTLEVELS as i32 - 1) as usize
}

// ============================================================
// Translation tables
// ============================================================

/// Tables mapping the green player ramp to gray, brown and red. Table
/// `n` is used for things whose translation bits are `n + 1`.
pub fn build_translation_tables() -> [[u8; 256]; 3] {
    let mut tables = [[0u8; 256]; 3];
    for i in 0..=255u8 {
        if (0x70..=0x7f).contains(&i) {
            // map green ramp to gray, brown, red
            tables[0][i as usize] = 0x60 + (i & 0xf);
            tables[1][i as usize] = 0x40 + (i & 0xf);
            tables[2][i as usize] = 0x20 + (i & 0xf);
        } else {
            // keep all other colors as is
            for t in tables.iter_mut() {
                t[i as usize] = i;
            }
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zlight_darkens_with_distance() {
        let z = build_zlight();
        // full light stays full at any distance
        assert_eq!(z[LIGHTLEVELS - 1][MAXLIGHTZ - 1], 0);
        for row in z.iter() {
            for pair in row.windows(2) {
                assert!(pair[0] <= pair[1]);
            }
        }
        assert_eq!(z[0][0], 0);
        assert_eq!(z[0][MAXLIGHTZ - 1], NUMCOLORMAPS - 1);
    }

    #[test]
    fn test_scalelight_full_width() {
        let s = build_scalelight(SCREENWIDTH as i32);
        assert_eq!(s[LIGHTLEVELS - 1][0], 0);
        assert_eq!(s[0][0], NUMCOLORMAPS - 1);
        // brighter as the wall gets closer
        assert_eq!(s[8][0], 28);
        assert_eq!(s[8][MAXLIGHTSCALE - 1], 5);
        // scales are smaller in a narrow view
        let narrow = build_scalelight(SCREENWIDTH as i32 / 2);
        assert!(narrow[8][10] <= s[8][10]);
    }

    #[test]
    fn test_light_row_clamps() {
        assert_eq!(light_row(255, 0), 15);
        assert_eq!(light_row(255, 2), 15);
        assert_eq!(light_row(0, -1), 0);
        assert_eq!(light_row(160, 1), 11);
    }

    #[test]
    fn test_translation_only_touches_green() {
        let t = build_translation_tables();
        assert_eq!(t[0][0x70], 0x60);
        assert_eq!(t[1][0x7f], 0x4f);
        assert_eq!(t[2][0x75], 0x25);
        assert_eq!(t[0][0x6f], 0x6f);
        assert_eq!(t[2][0x80], 0x80);
    }
}
