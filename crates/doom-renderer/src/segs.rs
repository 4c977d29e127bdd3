// segs.rs - All the clipping: columns, horizontal spans, sky columns

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

use doom_common::fixed::{fixed_mul, Fixed, FRACBITS};
use doom_common::tables::{fine_index, finesine, finetangent, Angle, ANG180, ANG90, FINEANGLES};
use doom_common::wadfiles::LineFlags;
use doom_game::World;

use crate::data::{LIGHTLEVELS, LIGHTSCALESHIFT, LIGHTSEGSHIFT, MAXLIGHTSCALE};
use crate::draw::{draw_column, ColumnDraw, ColumnStyle};
use crate::things::MaskedColumn;
use crate::video::Framebuffer;
use crate::view::Renderer;

pub const SIL_NONE: u8 = 0;
pub const SIL_BOTTOM: u8 = 1;
pub const SIL_TOP: u8 = 2;
pub const SIL_BOTH: u8 = 3;

/// Marks a masked column that has been drawn.
pub(crate) const MAXSHORT: i16 = i16::MAX;

const HEIGHTBITS: i32 = 12;
const HEIGHTUNIT: i32 = 1 << HEIGHTBITS;

/// Where a drawseg's sprite clip values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClipRef {
    /// `openings[base + x]`
    Openings(isize),
    /// The view height for every column.
    ScreenHeight,
    /// -1 for every column.
    NegOne,
}

/// A wall range that has been drawn, kept for clipping sprites and for
/// drawing masked middle textures afterwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DrawSeg {
    pub seg: usize,
    pub x1: i32,
    pub x2: i32,
    pub scale1: Fixed,
    pub scale2: Fixed,
    pub scalestep: Fixed,
    /// 0=none, 1=bottom, 2=top, 3=both
    pub silhouette: u8,
    /// Do not clip sprites above this.
    pub bsilheight: Fixed,
    /// Do not clip sprites below this.
    pub tsilheight: Fixed,
    pub sprtopclip: Option<ClipRef>,
    pub sprbottomclip: Option<ClipRef>,
    /// Texture columns of the masked middle texture, indexed like the
    /// clip arrays.
    pub maskedtexturecol: Option<isize>,
}

/// Stepping state of the wall range being drawn.
#[derive(Default)]
struct SegLoop {
    rw_x: i32,
    rw_stopx: i32,
    rw_scale: Fixed,
    rw_scalestep: Fixed,
    rw_centerangle: Angle,
    rw_offset: Fixed,
    rw_distance: Fixed,
    light: usize,

    segtextured: bool,
    markfloor: bool,
    markceiling: bool,
    maskedtexture: bool,
    maskedtexturecol: isize,

    midtexture: usize,
    toptexture: usize,
    bottomtexture: usize,
    rw_midtexturemid: Fixed,
    rw_toptexturemid: Fixed,
    rw_bottomtexturemid: Fixed,

    topfrac: Fixed,
    topstep: Fixed,
    bottomfrac: Fixed,
    bottomstep: Fixed,
    pixhigh: Fixed,
    pixhighstep: Fixed,
    pixlow: Fixed,
    pixlowstep: Fixed,
}

impl Renderer {
    /// Clip value of `clip` at column `x`.
    #[inline]
    pub(crate) fn clip_value(&self, clip: ClipRef, x: i32) -> i16 {
        match clip {
            ClipRef::Openings(base) => self.openings[(base + x as isize) as usize],
            ClipRef::ScreenHeight => self.win.height as i16,
            ClipRef::NegOne => -1,
        }
    }

    /// Reserves `count` opening slots and returns a base such that
    /// `base + x` indexes them for x from `first`.
    fn alloc_openings(&mut self, first: i32, count: i32) -> isize {
        let start = self.openings.len() as isize;
        self.openings.resize(self.openings.len() + count.max(0) as usize, 0);
        start - first as isize
    }

    /// Light row for a seg, with fake contrast on axis aligned walls.
    pub(crate) fn seg_light_row(&self, w: &World, segnum: usize, sector: usize) -> usize {
        let seg = &w.level.segs[segnum];
        let mut lightnum = (w.level.sectors[sector].lightlevel >> LIGHTSEGSHIFT) + self.view.extralight;
        if seg.v1.y == seg.v2.y {
            lightnum -= 1;
        } else if seg.v1.x == seg.v2.x {
            lightnum += 1;
        }
        lightnum.clamp(0, LIGHTLEVELS as i32 - 1) as usize
    }

    /// Draws the masked middle texture of a two sided line between
    /// columns `x1` and `x2`.
    pub(crate) fn render_masked_seg_range(&mut self, w: &World, fb: &mut Framebuffer, dsnum: usize, x1: i32, x2: i32) {
        let ds = self.drawsegs[dsnum];
        let Some(texcol) = ds.maskedtexturecol else {
            return;
        };
        let seg = &w.level.segs[ds.seg];
        let side = &w.level.sides[seg.sidedef];
        let line = &w.level.lines[seg.linedef];
        let front = &w.level.sectors[seg.frontsector];
        let back = &w.level.sectors[seg.backsector.unwrap_or(seg.frontsector)];

        let texnum = w.anims.texture(side.midtexture);
        let texture = w.res.textures.get(texnum);
        let light = self.seg_light_row(w, ds.seg, seg.frontsector);

        let rw_scalestep = ds.scalestep;
        let mut spryscale = ds.scale1 + (x1 - ds.x1) * rw_scalestep;

        // find positioning
        let mut texturemid = if line.flags.contains(LineFlags::DONTPEGBOTTOM) {
            front.floorheight.max(back.floorheight) + texture.height_fixed() - self.view.z
        } else {
            front.ceilingheight.min(back.ceilingheight) - self.view.z
        };
        texturemid += side.rowoffset;

        for x in x1..=x2 {
            let idx = (texcol + x as isize) as usize;
            // calculate lighting
            if self.openings[idx] != MAXSHORT {
                let colormap = match self.view.fixedcolormap {
                    Some(n) => n,
                    None => {
                        let index = ((spryscale >> LIGHTSCALESHIFT) as usize).min(MAXLIGHTSCALE - 1);
                        self.scalelight[light][index]
                    }
                };

                let col = MaskedColumn {
                    sprtopscreen: self.win.centeryfrac - fixed_mul(texturemid, spryscale),
                    spryscale,
                    iscale: (0xffff_ffffu32 / spryscale.max(1) as u32) as Fixed,
                    texturemid,
                    colormap: w.res.colormaps.get(colormap),
                    style: ColumnStyle::Normal,
                };
                let floorclip = ds.sprbottomclip.map_or(self.win.height as i16, |c| self.clip_value(c, x));
                let ceilingclip = ds.sprtopclip.map_or(-1, |c| self.clip_value(c, x));

                // draw the texture
                let posts = texture.column_posts(self.openings[idx] as i32);
                self.draw_masked_column(fb, x, posts, &col, floorclip, ceilingclip);
                self.openings[idx] = MAXSHORT;
            }
            spryscale += rw_scalestep;
        }
    }

    /// Draws the wall columns of the seg between `start` and `stop`,
    /// marking floor and ceiling planes as it goes, and records a
    /// drawseg.
    pub(crate) fn store_wall_range(&mut self, w: &World, fb: &mut Framebuffer, start: i32, stop: i32) {
        if start < 0 || stop >= self.win.width || start > stop {
            return;
        }

        let segnum = self.cur.seg;
        let seg = &w.level.segs[segnum];
        let side = &w.level.sides[seg.sidedef];
        let line = &w.level.lines[seg.linedef];
        let front = &w.level.sectors[self.cur.frontsector];
        let back = self.cur.backsector.map(|b| &w.level.sectors[b]);
        let viewz = self.view.z;

        // calculate rw_distance for scale calculation
        let rw_normalangle = seg.angle.wrapping_add(ANG90);
        let offsetangle = (rw_normalangle.wrapping_sub(self.cur.rw_angle1) as i32).unsigned_abs().min(ANG90);

        let distangle = ANG90 - offsetangle;
        let hyp = self.point_to_dist(seg.v1.x, seg.v1.y);
        let sineval = finesine(fine_index(distangle));

        let mut s = SegLoop {
            rw_x: start,
            rw_stopx: stop + 1,
            rw_distance: fixed_mul(hyp, sineval),
            ..Default::default()
        };

        // calculate scale at both ends and step
        let scale1 = self.scale_from_global_angle(
            self.view.angle.wrapping_add(self.xtoviewangle[start as usize]),
            rw_normalangle,
            s.rw_distance,
        );
        s.rw_scale = scale1;
        let (scale2, scalestep) = if stop > start {
            let scale2 = self.scale_from_global_angle(
                self.view.angle.wrapping_add(self.xtoviewangle[stop as usize]),
                rw_normalangle,
                s.rw_distance,
            );
            (scale2, (scale2 - scale1) / (stop - start))
        } else {
            (scale1, 0)
        };
        s.rw_scalestep = scalestep;

        let mut ds = DrawSeg {
            seg: segnum,
            x1: start,
            x2: stop,
            scale1,
            scale2,
            scalestep,
            silhouette: SIL_NONE,
            bsilheight: 0,
            tsilheight: 0,
            sprtopclip: None,
            sprbottomclip: None,
            maskedtexturecol: None,
        };

        // calculate texture boundaries
        //  and decide if floor / ceiling marks are needed
        let mut worldtop = front.ceilingheight - viewz;
        let mut worldbottom = front.floorheight - viewz;
        let mut worldhigh = 0;
        let mut worldlow = 0;

        match back {
            None => {
                // single sided line
                s.midtexture = w.anims.texture(side.midtexture);
                // a single sided line is terminal, so it must mark ends
                s.markfloor = true;
                s.markceiling = true;
                s.rw_midtexturemid = if line.flags.contains(LineFlags::DONTPEGBOTTOM) {
                    // bottom of texture at bottom
                    front.floorheight + w.res.textures.height(side.midtexture) - viewz
                } else {
                    // top of texture at top
                    worldtop
                };
                s.rw_midtexturemid += side.rowoffset;

                ds.silhouette = SIL_BOTH;
                ds.sprtopclip = Some(ClipRef::ScreenHeight);
                ds.sprbottomclip = Some(ClipRef::NegOne);
                ds.bsilheight = i32::MAX;
                ds.tsilheight = i32::MIN;
            }
            Some(back) => {
                // two sided line
                if front.floorheight > back.floorheight {
                    ds.silhouette = SIL_BOTTOM;
                    ds.bsilheight = front.floorheight;
                } else if back.floorheight > viewz {
                    ds.silhouette = SIL_BOTTOM;
                    ds.bsilheight = i32::MAX;
                }

                if front.ceilingheight < back.ceilingheight {
                    ds.silhouette |= SIL_TOP;
                    ds.tsilheight = front.ceilingheight;
                } else if back.ceilingheight < viewz {
                    ds.silhouette |= SIL_TOP;
                    ds.tsilheight = i32::MIN;
                }

                if back.ceilingheight <= front.floorheight {
                    ds.sprbottomclip = Some(ClipRef::NegOne);
                    ds.bsilheight = i32::MAX;
                    ds.silhouette |= SIL_BOTTOM;
                }

                if back.floorheight >= front.ceilingheight {
                    ds.sprtopclip = Some(ClipRef::ScreenHeight);
                    ds.tsilheight = i32::MIN;
                    ds.silhouette |= SIL_TOP;
                }

                worldhigh = back.ceilingheight - viewz;
                worldlow = back.floorheight - viewz;

                // hack to allow height changes in outdoor areas
                if front.ceilingpic == w.skyflatnum && back.ceilingpic == w.skyflatnum {
                    worldtop = worldhigh;
                }

                s.markfloor = !(worldlow == worldbottom
                    && back.floorpic == front.floorpic
                    && back.lightlevel == front.lightlevel);

                s.markceiling = !(worldhigh == worldtop
                    && back.ceilingpic == front.ceilingpic
                    && back.lightlevel == front.lightlevel);

                if back.ceilingheight <= front.floorheight || back.floorheight >= front.ceilingheight {
                    // closed door
                    s.markceiling = true;
                    s.markfloor = true;
                }

                if worldhigh < worldtop {
                    // top texture
                    s.toptexture = w.anims.texture(side.toptexture);
                    s.rw_toptexturemid = if line.flags.contains(LineFlags::DONTPEGTOP) {
                        // top of texture at top
                        worldtop
                    } else {
                        // bottom of texture
                        back.ceilingheight + w.res.textures.height(side.toptexture) - viewz
                    };
                }
                if worldlow > worldbottom {
                    // bottom texture
                    s.bottomtexture = w.anims.texture(side.bottomtexture);
                    s.rw_bottomtexturemid = if line.flags.contains(LineFlags::DONTPEGBOTTOM) {
                        // bottom of texture at bottom
                        // top of texture at top
                        worldtop
                    } else {
                        // top of texture at top
                        worldlow
                    };
                }
                s.rw_toptexturemid += side.rowoffset;
                s.rw_bottomtexturemid += side.rowoffset;

                // allocate space for masked texture tables
                if side.midtexture != 0 {
                    // masked midtexture
                    s.maskedtexture = true;
                    s.maskedtexturecol = self.alloc_openings(start, s.rw_stopx - start);
                    ds.maskedtexturecol = Some(s.maskedtexturecol);
                }
            }
        }

        // calculate rw_offset (only needed for textured lines)
        s.segtextured = s.midtexture != 0 || s.toptexture != 0 || s.bottomtexture != 0 || s.maskedtexture;

        if s.segtextured {
            let diff = rw_normalangle.wrapping_sub(self.cur.rw_angle1);
            let mut offsetangle = if diff > ANG180 { diff.wrapping_neg() } else { diff };
            if offsetangle > ANG90 {
                offsetangle = ANG90;
            }

            let sineval = finesine(fine_index(offsetangle));
            s.rw_offset = fixed_mul(hyp, sineval);

            if diff < ANG180 {
                s.rw_offset = -s.rw_offset;
            }

            s.rw_offset += side.textureoffset + seg.offset;
            s.rw_centerangle = ANG90
                .wrapping_add(self.view.angle)
                .wrapping_sub(rw_normalangle);

            // calculate light table
            //  use different light tables
            //  for horizontal / vertical / diagonal
            if self.view.fixedcolormap.is_none() {
                s.light = self.seg_light_row(w, segnum, self.cur.frontsector);
            }
        }

        // if a floor / ceiling plane is on the wrong side
        //  of the view plane, it is definitely invisible
        //  and doesn't need to be marked.
        if front.floorheight >= viewz {
            // above view plane
            s.markfloor = false;
        }

        if front.ceilingheight <= viewz && front.ceilingpic != w.skyflatnum {
            // below view plane
            s.markceiling = false;
        }

        // calculate incremental stepping values for texture edges
        worldtop >>= 4;
        worldbottom >>= 4;

        let centeryfrac = self.win.centeryfrac >> 4;
        s.topstep = -fixed_mul(s.rw_scalestep, worldtop);
        s.topfrac = centeryfrac - fixed_mul(worldtop, s.rw_scale);

        s.bottomstep = -fixed_mul(s.rw_scalestep, worldbottom);
        s.bottomfrac = centeryfrac - fixed_mul(worldbottom, s.rw_scale);

        if back.is_some() {
            worldhigh >>= 4;
            worldlow >>= 4;

            if worldhigh < worldtop {
                s.pixhigh = centeryfrac - fixed_mul(worldhigh, s.rw_scale);
                s.pixhighstep = -fixed_mul(s.rw_scalestep, worldhigh);
            }

            if worldlow > worldbottom {
                s.pixlow = centeryfrac - fixed_mul(worldlow, s.rw_scale);
                s.pixlowstep = -fixed_mul(s.rw_scalestep, worldlow);
            }
        }

        // render it
        if s.markceiling {
            match self.ceilingplane {
                Some(pl) => self.ceilingplane = Some(self.check_plane(pl, start, stop)),
                None => s.markceiling = false,
            }
        }

        if s.markfloor {
            match self.floorplane {
                Some(pl) => self.floorplane = Some(self.check_plane(pl, start, stop)),
                None => s.markfloor = false,
            }
        }

        self.render_seg_loop(w, fb, &mut s);

        // save sprite clipping info
        if (ds.silhouette & SIL_TOP != 0 || s.maskedtexture) && ds.sprtopclip.is_none() {
            let base = self.alloc_openings(start, s.rw_stopx - start);
            for x in start..s.rw_stopx {
                self.openings[(base + x as isize) as usize] = self.ceilingclip[x as usize];
            }
            ds.sprtopclip = Some(ClipRef::Openings(base));
        }

        if (ds.silhouette & SIL_BOTTOM != 0 || s.maskedtexture) && ds.sprbottomclip.is_none() {
            let base = self.alloc_openings(start, s.rw_stopx - start);
            for x in start..s.rw_stopx {
                self.openings[(base + x as isize) as usize] = self.floorclip[x as usize];
            }
            ds.sprbottomclip = Some(ClipRef::Openings(base));
        }

        if s.maskedtexture && ds.silhouette & SIL_TOP == 0 {
            ds.silhouette |= SIL_TOP;
            ds.tsilheight = i32::MIN;
        }
        if s.maskedtexture && ds.silhouette & SIL_BOTTOM == 0 {
            ds.silhouette |= SIL_BOTTOM;
            ds.bsilheight = i32::MAX;
        }

        self.drawsegs.push(ds);
    }

    /// Draws zero, one, or two textures (and possibly a masked
    ///  texture) for walls.
    /// Can draw or mark the starting pixel of floor and ceiling
    ///  textures.
    fn render_seg_loop(&mut self, w: &World, fb: &mut Framebuffer, s: &mut SegLoop) {
        let textures = &w.res.textures;
        let mut texturecolumn = 0;
        let mut colormap = w.res.colormaps.get(self.view.fixedcolormap.unwrap_or(0));
        let mut iscale = 0;

        while s.rw_x < s.rw_stopx {
            let x = s.rw_x as usize;

            // mark floor / ceiling areas
            let mut yl = (s.topfrac + HEIGHTUNIT - 1) >> HEIGHTBITS;

            // no space above wall?
            let ceil = self.ceilingclip[x] as i32;
            let floor = self.floorclip[x] as i32;
            if yl < ceil + 1 {
                yl = ceil + 1;
            }

            if s.markceiling {
                let top = ceil + 1;
                let mut bottom = yl - 1;

                if bottom >= floor {
                    bottom = floor - 1;
                }

                if top <= bottom {
                    if let Some(pl) = self.ceilingplane {
                        self.visplanes[pl].mark(s.rw_x, top, bottom);
                    }
                }
            }

            let mut yh = s.bottomfrac >> HEIGHTBITS;

            if yh >= floor {
                yh = floor - 1;
            }

            if s.markfloor {
                let mut top = yh + 1;
                let bottom = floor - 1;
                if top <= ceil {
                    top = ceil + 1;
                }
                if top <= bottom {
                    if let Some(pl) = self.floorplane {
                        self.visplanes[pl].mark(s.rw_x, top, bottom);
                    }
                }
            }

            // texturecolumn and lighting are independent of wall tiers
            if s.segtextured {
                // calculate texture offset
                let angle = fine_index(s.rw_centerangle.wrapping_add(self.xtoviewangle[x])) & (FINEANGLES / 2 - 1);
                texturecolumn = (s.rw_offset - fixed_mul(finetangent(angle), s.rw_distance)) >> FRACBITS;

                // calculate lighting
                if self.view.fixedcolormap.is_none() {
                    let index = ((s.rw_scale >> LIGHTSCALESHIFT) as usize).min(MAXLIGHTSCALE - 1);
                    colormap = w.res.colormaps.get(self.scalelight[s.light][index]);
                }

                iscale = (0xffff_ffffu32 / (s.rw_scale.max(1) as u32)) as Fixed;
            }

            // draw the wall tiers
            if s.midtexture != 0 {
                // single sided line
                let d = ColumnDraw {
                    x: s.rw_x,
                    yl,
                    yh,
                    iscale,
                    texturemid: s.rw_midtexturemid,
                    source: textures.get(s.midtexture).column(texturecolumn),
                    colormap,
                };
                draw_column(&self.win, fb, &d);
                self.ceilingclip[x] = self.win.height as i16;
                self.floorclip[x] = -1;
            } else {
                // two sided line
                if s.toptexture != 0 {
                    // top wall
                    let mut mid = s.pixhigh >> HEIGHTBITS;
                    s.pixhigh += s.pixhighstep;

                    if mid >= floor {
                        mid = floor - 1;
                    }

                    if mid >= yl {
                        let d = ColumnDraw {
                            x: s.rw_x,
                            yl,
                            yh: mid,
                            iscale,
                            texturemid: s.rw_toptexturemid,
                            source: textures.get(s.toptexture).column(texturecolumn),
                            colormap,
                        };
                        draw_column(&self.win, fb, &d);
                        self.ceilingclip[x] = mid as i16;
                    } else {
                        self.ceilingclip[x] = (yl - 1) as i16;
                    }
                } else if s.markceiling {
                    // no top wall
                    self.ceilingclip[x] = (yl - 1) as i16;
                }

                if s.bottomtexture != 0 {
                    // bottom wall
                    let mut mid = (s.pixlow + HEIGHTUNIT - 1) >> HEIGHTBITS;
                    s.pixlow += s.pixlowstep;

                    // no space above wall?
                    let ceil = self.ceilingclip[x] as i32;
                    if mid <= ceil {
                        mid = ceil + 1;
                    }

                    if mid <= yh {
                        let d = ColumnDraw {
                            x: s.rw_x,
                            yl: mid,
                            yh,
                            iscale,
                            texturemid: s.rw_bottomtexturemid,
                            source: textures.get(s.bottomtexture).column(texturecolumn),
                            colormap,
                        };
                        draw_column(&self.win, fb, &d);
                        self.floorclip[x] = mid as i16;
                    } else {
                        self.floorclip[x] = (yh + 1) as i16;
                    }
                } else if s.markfloor {
                    // no bottom wall
                    self.floorclip[x] = (yh + 1) as i16;
                }

                if s.maskedtexture {
                    // save texturecol
                    //  for backdrawing of masked mid texture
                    self.openings[(s.maskedtexturecol + s.rw_x as isize) as usize] = texturecolumn as i16;
                }
            }

            s.rw_scale += s.rw_scalestep;
            s.topfrac += s.topstep;
            s.bottomfrac += s.bottomstep;
            s.rw_x += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::light_row;
    use crate::testutil::{render_test_view, test_world_with_player};

    #[test]
    fn test_clip_values() {
        let mut r = Renderer::new();
        r.openings = vec![5, 6, 7];
        assert_eq!(r.clip_value(ClipRef::Openings(-10), 11), 6);
        assert_eq!(r.clip_value(ClipRef::ScreenHeight, 40), 200);
        assert_eq!(r.clip_value(ClipRef::NegOne, 40), -1);

        let base = r.alloc_openings(100, 4);
        assert_eq!(r.openings.len(), 7);
        assert_eq!((base + 100) as usize, 3);
    }

    #[test]
    fn test_walls_leave_drawsegs() {
        let w = test_world_with_player();
        let (r, _) = render_test_view(&w);
        assert!(!r.drawsegs.is_empty());
        for ds in &r.drawsegs {
            assert!(ds.x1 <= ds.x2);
            assert!(ds.x2 < r.win.width);
            assert!(ds.scale1 >= 256 && ds.scale1 <= 64 << FRACBITS);
        }
        // one sided walls clip sprites everywhere
        assert!(r
            .drawsegs
            .iter()
            .filter(|ds| w.level.segs[ds.seg].backsector.is_none())
            .all(|ds| ds.silhouette == SIL_BOTH));
    }

    #[test]
    fn test_axis_aligned_walls_get_fake_contrast() {
        let w = test_world_with_player();
        let r = Renderer::new();
        // the test map is made of axis aligned walls only
        let horizontal = w.level.segs.iter().position(|s| s.v1.y == s.v2.y).unwrap();
        let vertical = w.level.segs.iter().position(|s| s.v1.x == s.v2.x).unwrap();
        let sector = w.level.segs[horizontal].frontsector;
        let base = light_row(w.level.sectors[sector].lightlevel, 0);
        assert_eq!(r.seg_light_row(&w, horizontal, sector), base - 1);
        assert_eq!(r.seg_light_row(&w, vertical, sector), base + 1);
    }
}
