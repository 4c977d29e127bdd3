// sky.rs - Sky rendering. The sky texture is drawn as wall columns where
// the sky flat would be, at a fixed distance so it never moves with the
// player.

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
use doom_game::World;

use crate::draw::{draw_column, ColumnDraw};
use crate::plane::Visplane;
use crate::video::Framebuffer;
use crate::view::Renderer;

/// SKY, store the number for name.
pub const SKYTEXTUREMID: Fixed = 100 * FRACUNIT;

/// The sky map is 256*128*4 maps.
pub const ANGLETOSKYSHIFT: u32 = 22;

impl Renderer {
    /// Sky is allways drawn full bright,
    ///  i.e. colormaps[0] is used.
    /// Because of this hack, sky is not affected
    ///  by INVUL inverse mapping.
    pub(crate) fn draw_sky_plane(&self, w: &World, fb: &mut Framebuffer, pl: &Visplane) {
        let texture = w.res.textures.get(w.skytexture);
        let colormap = w.res.colormaps.get(0);
        let iscale = self.pspriteiscale >> self.win.detailshift;

        for x in pl.minx..=pl.maxx {
            let yl = pl.top_at(x);
            let yh = pl.bottom_at(x);

            if yl <= yh {
                let angle = self
                    .view
                    .angle
                    .wrapping_add(self.xtoviewangle[x as usize])
                    >> ANGLETOSKYSHIFT;
                let d = ColumnDraw {
                    x,
                    yl,
                    yh,
                    iscale,
                    texturemid: self.skytexturemid,
                    source: texture.column(angle as i32),
                    colormap,
                };
                draw_column(&self.win, fb, &d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{render_from, test_world_with_player};

    #[test]
    fn test_sky_fills_top_of_outdoor_view() {
        let mut w = test_world_with_player();
        // inside the outdoor room, facing east
        let (_, fb) = render_from(&mut w, 300, 256, 0);
        // test sky rows are 200 + row / 16, drawn at unit scale with row
        // 0 at the top of the screen
        assert_eq!(fb.pixel(160, 0), 200);
        assert_eq!(fb.pixel(160, 20), 201);
        assert_eq!(fb.pixel(0, 5), 200);
    }

    #[test]
    fn test_sky_ignores_fixed_colormap() {
        let mut w = test_world_with_player();
        w.players[0].fixedcolormap = 32;
        let (_, fb) = render_from(&mut w, 300, 256, 0);
        assert_eq!(fb.pixel(160, 0), 200);
    }
}
