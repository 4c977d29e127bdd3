// things.rs - Refresh of things, i.e. objects represented by sprites

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

use doom_common::doomdef::{PowerType, SCREENWIDTH};
use doom_common::fixed::{fixed_div, fixed_mul, Fixed, FRACBITS, FRACUNIT};
use doom_common::gfx::Post;
use doom_common::tables::{Angle, ANG45};
use doom_game::info::{MobjFlags, FF_FRAMEMASK, FF_FULLBRIGHT, MF_TRANSSHIFT};
use doom_game::mobj::Mobj;
use doom_game::player::PspDef;
use doom_game::World;

use crate::bsp::point_on_seg_side;
use crate::data::{light_row, LIGHTSCALESHIFT, MAXLIGHTSCALE};
use crate::draw::{ColumnDraw, ColumnStyle, FUZZCOLORMAP};
use crate::segs::{SIL_BOTTOM, SIL_TOP};
use crate::video::Framebuffer;
use crate::view::Renderer;

const MINZ: Fixed = FRACUNIT * 4;
const BASEYCENTER: i32 = 100;

/// How a sprite is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpriteLight {
    /// Drawn with the fuzz effect.
    Shadow,
    Colormap(usize),
}

/// A sprite projected onto the screen.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VisSprite {
    pub x1: i32,
    pub x2: i32,

    /// for line side calculation
    pub gx: Fixed,
    pub gy: Fixed,

    /// global bottom / top for silhouette clipping
    pub gz: Fixed,
    pub gzt: Fixed,

    /// horizontal position of x1
    pub startfrac: Fixed,

    pub scale: Fixed,

    /// negative if flipped
    pub xiscale: Fixed,

    pub texturemid: Fixed,
    /// Sprite patch lump.
    pub patch: usize,
    pub light: SpriteLight,
    pub mobjflags: MobjFlags,
}

/// Placement of a masked column: sprite or masked middle texture.
pub(crate) struct MaskedColumn<'a> {
    pub sprtopscreen: Fixed,
    pub spryscale: Fixed,
    pub iscale: Fixed,
    pub texturemid: Fixed,
    pub colormap: &'a [u8; 256],
    pub style: ColumnStyle,
}

impl Renderer {
    /// Draws the posts of one masked column between the clip rows.
    pub(crate) fn draw_masked_column(
        &mut self,
        fb: &mut Framebuffer,
        x: i32,
        posts: &[Post],
        col: &MaskedColumn,
        floorclip: i16,
        ceilingclip: i16,
    ) {
        for post in posts {
            // calculate unclipped screen coordinates
            //  for post
            let topscreen = col
                .sprtopscreen
                .wrapping_add(col.spryscale.wrapping_mul(post.top_delta));
            let bottomscreen = topscreen.wrapping_add(col.spryscale.wrapping_mul(post.pixels.len() as i32));

            let mut yl = (topscreen + FRACUNIT - 1) >> FRACBITS;
            let mut yh = (bottomscreen - 1) >> FRACBITS;

            if yh >= floorclip as i32 {
                yh = floorclip as i32 - 1;
            }
            if yl <= ceilingclip as i32 {
                yl = ceilingclip as i32 + 1;
            }

            if yl <= yh {
                let d = ColumnDraw {
                    x,
                    yl,
                    yh,
                    iscale: col.iscale,
                    texturemid: col.texturemid - (post.top_delta << FRACBITS),
                    source: &post.pixels,
                    colormap: col.colormap,
                };
                self.draw_styled_column(fb, &d, col.style);
            }
        }
    }

    fn sprite_style(flags: MobjFlags, light: SpriteLight) -> ColumnStyle {
        if light == SpriteLight::Shadow {
            return ColumnStyle::Fuzz;
        }
        let translation = ((flags & MobjFlags::TRANSLATION).bits() >> MF_TRANSSHIFT) as usize;
        if translation != 0 {
            ColumnStyle::Translated(translation - 1)
        } else {
            ColumnStyle::Normal
        }
    }

    /// Draws a projected sprite between the given clip rows.
    fn draw_vis_sprite(&mut self, w: &World, fb: &mut Framebuffer, vis: &VisSprite, clipbot: &[i16], cliptop: &[i16]) {
        let patch = w.res.sprites.patch(vis.patch);

        let colormap = match vis.light {
            SpriteLight::Shadow => w.res.colormaps.get(FUZZCOLORMAP),
            SpriteLight::Colormap(n) => w.res.colormaps.get(n),
        };
        let style = Self::sprite_style(vis.mobjflags, vis.light);

        let col = MaskedColumn {
            sprtopscreen: self.win.centeryfrac - fixed_mul(vis.texturemid, vis.scale),
            spryscale: vis.scale,
            iscale: vis.xiscale.wrapping_abs() >> self.win.detailshift,
            texturemid: vis.texturemid,
            colormap,
            style,
        };

        let mut frac = vis.startfrac;
        for x in vis.x1..=vis.x2 {
            let texturecolumn = frac >> FRACBITS;
            let posts = patch.column(texturecolumn);
            self.draw_masked_column(fb, x, posts, &col, clipbot[x as usize], cliptop[x as usize]);
            frac = frac.wrapping_add(vis.xiscale);
        }
    }

    /// Generates a vissprite for a thing
    ///  if it might be visible.
    fn project_sprite(&mut self, w: &World, thing: &Mobj, spritelights: usize) {
        // transform the origin point
        let tr_x = thing.x.wrapping_sub(self.view.x);
        let tr_y = thing.y.wrapping_sub(self.view.y);

        let gxt = fixed_mul(tr_x, self.view.cos);
        let gyt = -fixed_mul(tr_y, self.view.sin);

        let tz = gxt - gyt;

        // thing is behind view plane?
        if tz < MINZ {
            return;
        }

        let xscale = fixed_div(self.win.projection, tz);

        let gxt = -fixed_mul(tr_x, self.view.sin);
        let gyt = fixed_mul(tr_y, self.view.cos);
        let mut tx = -(gyt + gxt);

        // too far off the side?
        if (tx as i64).abs() > (tz as i64) << 2 {
            return;
        }

        // decide which patch to use for sprite relative to player
        let Some(sprdef) = w.res.sprites.sprite(thing.sprite as usize) else {
            return;
        };
        let Some(sprframe) = sprdef.frames.get((thing.frame & FF_FRAMEMASK) as usize) else {
            return;
        };

        let (lump, flip) = if sprframe.rotate {
            // choose a different rotation based on player view
            let ang: Angle = self.point_to_angle(thing.x, thing.y);
            let rot = (ang
                .wrapping_sub(thing.angle)
                .wrapping_add((ANG45 / 2).wrapping_mul(9))
                >> 29) as usize;
            (sprframe.lump[rot], sprframe.flip[rot])
        } else {
            // use single rotation for all views
            (sprframe.lump[0], sprframe.flip[0])
        };
        let patch = w.res.sprites.patch(lump);

        // calculate edges of the shape
        tx -= patch.left_offset << FRACBITS;
        let x1 = (self.win.centerxfrac + fixed_mul(tx, xscale)) >> FRACBITS;

        // off the right side?
        if x1 > self.win.width {
            return;
        }

        tx += patch.width << FRACBITS;
        let x2 = ((self.win.centerxfrac + fixed_mul(tx, xscale)) >> FRACBITS) - 1;

        // off the left side
        if x2 < 0 {
            return;
        }

        // store information in a vissprite
        let gzt = thing.z + (patch.top_offset << FRACBITS);
        let iscale = fixed_div(FRACUNIT, xscale);
        let mut vis = VisSprite {
            x1: x1.max(0),
            x2: x2.min(self.win.width - 1),
            gx: thing.x,
            gy: thing.y,
            gz: thing.z,
            gzt,
            startfrac: 0,
            scale: xscale << self.win.detailshift,
            xiscale: iscale,
            texturemid: gzt - self.view.z,
            patch: lump,
            light: SpriteLight::Colormap(0),
            mobjflags: thing.flags,
        };

        if flip {
            vis.startfrac = (patch.width << FRACBITS) - 1;
            vis.xiscale = -iscale;
        }

        if vis.x1 > x1 {
            vis.startfrac += vis.xiscale * (vis.x1 - x1);
        }

        // get light level
        vis.light = if thing.flags.contains(MobjFlags::SHADOW) {
            // shadow draw
            SpriteLight::Shadow
        } else if let Some(n) = self.view.fixedcolormap {
            // fixed map
            SpriteLight::Colormap(n)
        } else if thing.frame & FF_FULLBRIGHT != 0 {
            // full bright
            SpriteLight::Colormap(0)
        } else {
            // diminished light
            let index = ((xscale >> (LIGHTSCALESHIFT - self.win.detailshift)) as usize).min(MAXLIGHTSCALE - 1);
            SpriteLight::Colormap(self.scalelight[spritelights][index])
        };

        self.vissprites.push(vis);
    }

    /// During BSP traversal, this adds sprites by sector.
    pub(crate) fn add_sprites(&mut self, w: &World, secnum: usize) {
        // BSP is traversed by subsector.
        // A sector might have been split into several
        //  subsectors during BSP building.
        // Thus we check whether its already added.
        if self.sector_frame[secnum] == self.framecount() {
            return;
        }

        // Well, now it will be done.
        self.sector_frame[secnum] = self.framecount();

        let sector = &w.level.sectors[secnum];
        let spritelights = light_row(sector.lightlevel, self.view.extralight);

        // Handle all things in sector.
        for &id in &sector.things {
            if let Some(thing) = w.mobjs.get(id) {
                self.project_sprite(w, thing, spritelights);
            }
        }
    }

    fn draw_psprite(&mut self, w: &World, fb: &mut Framebuffer, psp: &PspDef, spritelights: usize, invisibility: i32) {
        let Some(state) = psp.state else {
            return;
        };
        let state = state.info();

        // decide which patch to use
        let Some(sprdef) = w.res.sprites.sprite(state.sprite as usize) else {
            return;
        };
        let Some(sprframe) = sprdef.frames.get((state.frame & FF_FRAMEMASK) as usize) else {
            return;
        };
        let lump = sprframe.lump[0];
        let flip = sprframe.flip[0];
        let patch = w.res.sprites.patch(lump);

        // calculate edges of the shape
        let mut tx = psp.sx - (SCREENWIDTH as i32 / 2) * FRACUNIT;

        tx -= patch.left_offset << FRACBITS;
        let x1 = (self.win.centerxfrac + fixed_mul(tx, self.pspritescale)) >> FRACBITS;

        // off the right side
        if x1 > self.win.width {
            return;
        }

        tx += patch.width << FRACBITS;
        let x2 = ((self.win.centerxfrac + fixed_mul(tx, self.pspritescale)) >> FRACBITS) - 1;

        // off the left side
        if x2 < 0 {
            return;
        }

        // store information in a vissprite
        let mut vis = VisSprite {
            x1: x1.max(0),
            x2: x2.min(self.win.width - 1),
            gx: 0,
            gy: 0,
            gz: 0,
            gzt: 0,
            startfrac: 0,
            scale: self.pspritescale << self.win.detailshift,
            xiscale: self.pspriteiscale,
            texturemid: (BASEYCENTER << FRACBITS) + FRACUNIT / 2 - (psp.sy - (patch.top_offset << FRACBITS)),
            patch: lump,
            light: SpriteLight::Colormap(0),
            mobjflags: MobjFlags::empty(),
        };

        if flip {
            vis.xiscale = -self.pspriteiscale;
            vis.startfrac = (patch.width << FRACBITS) - 1;
        }

        if vis.x1 > x1 {
            vis.startfrac += vis.xiscale * (vis.x1 - x1);
        }

        vis.light = if invisibility > 4 * 32 || invisibility & 8 != 0 {
            // shadow draw
            SpriteLight::Shadow
        } else if let Some(n) = self.view.fixedcolormap {
            // fixed color
            SpriteLight::Colormap(n)
        } else if state.frame & FF_FULLBRIGHT != 0 {
            // full bright
            SpriteLight::Colormap(0)
        } else {
            // local light
            SpriteLight::Colormap(self.scalelight[spritelights][MAXLIGHTSCALE - 1])
        };

        let width = self.win.width as usize;
        let clipbot = [self.win.height as i16; SCREENWIDTH];
        let cliptop = [-1i16; SCREENWIDTH];
        self.draw_vis_sprite(w, fb, &vis, &clipbot[..width], &cliptop[..width]);
    }

    fn draw_player_sprites(&mut self, w: &World, fb: &mut Framebuffer) {
        let player = &w.players[self.view.player];
        let Some(mo) = player.mo.and_then(|id| w.mobjs.get(id)) else {
            return;
        };

        // get light level
        let sector = w
            .level
            .subsectors
            .get(mo.subsector)
            .map_or(0, |ss| ss.sector);
        let spritelights = light_row(w.level.sectors[sector].lightlevel, self.view.extralight);
        let invisibility = player.powers[PowerType::Invisibility as usize];

        // add all active psprites
        for psp in &player.psprites {
            self.draw_psprite(w, fb, psp, spritelights, invisibility);
        }
    }

    fn draw_sprite(&mut self, w: &World, fb: &mut Framebuffer, spr: &VisSprite) {
        let mut clipbot = [-2i16; SCREENWIDTH];
        let mut cliptop = [-2i16; SCREENWIDTH];

        // Scan drawsegs from end to start for obscuring segs.
        // The first drawseg that has a greater scale
        //  is the clip seg.
        for dsnum in (0..self.drawsegs.len()).rev() {
            let ds = self.drawsegs[dsnum];

            // determine if the drawseg obscures the sprite
            if ds.x1 > spr.x2 || ds.x2 < spr.x1 || (ds.silhouette == 0 && ds.maskedtexturecol.is_none()) {
                // does not cover sprite
                continue;
            }

            let r1 = ds.x1.max(spr.x1);
            let r2 = ds.x2.min(spr.x2);

            let (lowscale, scale) = if ds.scale1 > ds.scale2 {
                (ds.scale2, ds.scale1)
            } else {
                (ds.scale1, ds.scale2)
            };

            if scale < spr.scale
                || (lowscale < spr.scale && point_on_seg_side(spr.gx, spr.gy, &w.level.segs[ds.seg]) == 0)
            {
                // masked mid texture?
                if ds.maskedtexturecol.is_some() {
                    self.render_masked_seg_range(w, fb, dsnum, r1, r2);
                }
                // seg is behind sprite
                continue;
            }

            // clip this piece of the sprite
            let mut silhouette = ds.silhouette;

            if spr.gz >= ds.bsilheight {
                silhouette &= !SIL_BOTTOM;
            }

            if spr.gzt <= ds.tsilheight {
                silhouette &= !SIL_TOP;
            }

            for x in r1..=r2 {
                let xi = x as usize;
                if silhouette & SIL_BOTTOM != 0 && clipbot[xi] == -2 {
                    if let Some(c) = ds.sprbottomclip {
                        clipbot[xi] = self.clip_value(c, x);
                    }
                }
                if silhouette & SIL_TOP != 0 && cliptop[xi] == -2 {
                    if let Some(c) = ds.sprtopclip {
                        cliptop[xi] = self.clip_value(c, x);
                    }
                }
            }
        }

        // all clipping has been performed, so draw the sprite

        // check for unclipped columns
        for x in spr.x1..=spr.x2 {
            let xi = x as usize;
            if clipbot[xi] == -2 {
                clipbot[xi] = self.win.height as i16;
            }
            if cliptop[xi] == -2 {
                cliptop[xi] = -1;
            }
        }

        self.draw_vis_sprite(w, fb, spr, &clipbot, &cliptop);
    }

    /// Draws sprites back to front, then what is left of the masked
    /// middle textures, then the player's weapon.
    pub(crate) fn draw_masked(&mut self, w: &World, fb: &mut Framebuffer) {
        // farthest first
        self.vissprites.sort_by_key(|v| v.scale);

        let sprites = std::mem::take(&mut self.vissprites);
        for spr in &sprites {
            self.draw_sprite(w, fb, spr);
        }
        self.vissprites = sprites;

        // render any remaining masked mid textures
        for dsnum in (0..self.drawsegs.len()).rev() {
            if self.drawsegs[dsnum].maskedtexturecol.is_some() {
                let (x1, x2) = (self.drawsegs[dsnum].x1, self.drawsegs[dsnum].x2);
                self.render_masked_seg_range(w, fb, dsnum, x1, x2);
            }
        }

        // draw the psprites on top of everything
        self.draw_player_sprites(w, fb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{render_test_view, test_world_with_player};
    use doom_common::testkit::IMP_START;

    fn imp(w: &World) -> doom_game::MobjId {
        w.mobjs
            .iter()
            .find(|m| m.x == (IMP_START.0 as i32) << FRACBITS && m.y == (IMP_START.1 as i32) << FRACBITS)
            .map(|m| m.id)
            .unwrap()
    }

    #[test]
    fn test_imp_is_projected_ahead() {
        let w = test_world_with_player();
        let (r, _) = render_test_view(&w);
        assert_eq!(r.vissprites.len(), 1);
        let spr = r.vissprites[0];
        // straight ahead, 256 units out
        assert!(spr.x1 < 160 && spr.x2 >= 160);
        assert!((spr.scale - FRACUNIT * 5 / 8).abs() < 64);
        assert!(matches!(spr.light, SpriteLight::Colormap(_)));
    }

    #[test]
    fn test_sprite_drawn_over_floor() {
        let w = test_world_with_player();
        let (_, with_imp) = render_test_view(&w);

        let mut w = w;
        let id = imp(&w);
        // behind the view
        w.mobjs[id].x = 10 << FRACBITS;
        let (r, without) = render_test_view(&w);
        assert!(r.vissprites.is_empty());
        assert_ne!(with_imp.pixel(160, 118), without.pixel(160, 118));
        // far from the sprite nothing changes
        assert_eq!(with_imp.pixel(300, 118), without.pixel(300, 118));
    }

    #[test]
    fn test_shadow_and_fullbright() {
        let mut w = test_world_with_player();
        let id = imp(&w);
        w.mobjs[id].flags |= MobjFlags::SHADOW;
        let (r, _) = render_test_view(&w);
        assert_eq!(r.vissprites[0].light, SpriteLight::Shadow);

        w.mobjs[id].flags &= !MobjFlags::SHADOW;
        w.mobjs[id].frame |= FF_FULLBRIGHT;
        let (r, _) = render_test_view(&w);
        assert_eq!(r.vissprites[0].light, SpriteLight::Colormap(0));
    }

    #[test]
    fn test_translation_bits_pick_table() {
        let flags = MobjFlags::from_bits_retain(2 << MF_TRANSSHIFT);
        assert_eq!(
            Renderer::sprite_style(flags, SpriteLight::Colormap(0)),
            ColumnStyle::Translated(1)
        );
        assert_eq!(Renderer::sprite_style(flags, SpriteLight::Shadow), ColumnStyle::Fuzz);
        assert_eq!(
            Renderer::sprite_style(MobjFlags::empty(), SpriteLight::Colormap(3)),
            ColumnStyle::Normal
        );
    }

    #[test]
    fn test_weapon_drawn_on_top() {
        let w = test_world_with_player();
        let (_, with_gun) = render_test_view(&w);

        let mut w = w;
        for psp in w.players[0].psprites.iter_mut() {
            psp.state = None;
        }
        let (_, without) = render_test_view(&w);
        assert_ne!(with_gun.pixels(), without.pixels());
    }
}
