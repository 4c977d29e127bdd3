// bsp.rs - BSP traversal, handling of LineSegs for rendering

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

use doom_common::bbox::{BBox, BOXBOTTOM, BOXLEFT, BOXRIGHT, BOXTOP};
use doom_common::fixed::{fixed_mul, Fixed, FRACBITS};
use doom_common::tables::{Angle, ANG180, ANG90, ANGLETOFINESHIFT};
use doom_game::level::{NodeChild, Seg};
use doom_game::World;

use crate::video::Framebuffer;
use crate::view::Renderer;

/// A range of columns already fully covered by solid walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClipRange {
    pub first: i32,
    pub last: i32,
}

/// The seg being clipped and drawn.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CurLine {
    pub seg: usize,
    pub frontsector: usize,
    pub backsector: Option<usize>,
    /// Angle from the view point to the seg's first vertex.
    pub rw_angle1: Angle,
}

// Corners of a bounding box to test, indexed by the view point's
// position relative to the box.
const CHECKCOORD: [[usize; 4]; 12] = [
    [3, 0, 2, 1],
    [3, 0, 2, 0],
    [3, 1, 2, 0],
    [0; 4],
    [2, 0, 2, 1],
    [0; 4],
    [3, 1, 3, 0],
    [0; 4],
    [2, 0, 3, 1],
    [2, 1, 3, 1],
    [2, 1, 3, 0],
    [0; 4],
];

/// Which side of a seg a point is on: 0 front, 1 back.
pub(crate) fn point_on_seg_side(x: Fixed, y: Fixed, seg: &Seg) -> usize {
    let lx = seg.v1.x;
    let ly = seg.v1.y;
    let ldx = seg.v2.x - lx;
    let ldy = seg.v2.y - ly;

    if ldx == 0 {
        if x <= lx {
            return (ldy > 0) as usize;
        }
        return (ldy < 0) as usize;
    }
    if ldy == 0 {
        if y <= ly {
            return (ldx < 0) as usize;
        }
        return (ldx > 0) as usize;
    }

    let dx = x.wrapping_sub(lx);
    let dy = y.wrapping_sub(ly);

    // Try to quickly decide by looking at sign bits.
    if ((ldy ^ ldx ^ dx ^ dy) as u32) & 0x8000_0000 != 0 {
        if ((ldy ^ dx) as u32) & 0x8000_0000 != 0 {
            // (left is negative)
            return 1;
        }
        return 0;
    }

    let left = fixed_mul(ldy >> FRACBITS, dx);
    let right = fixed_mul(dy, ldx >> FRACBITS);

    if right < left {
        // front side
        0
    } else {
        // back side
        1
    }
}

impl Renderer {
    pub(crate) fn clear_clip_segs(&mut self) {
        self.solidsegs.clear();
        self.solidsegs.push(ClipRange {
            first: -0x7fff_ffff,
            last: -1,
        });
        self.solidsegs.push(ClipRange {
            first: self.win.width,
            last: 0x7fff_ffff,
        });
    }

    /// Does handle solid walls,
    ///  e.g. single sided LineDefs (middle texture)
    ///  that entirely block the view.
    fn clip_solid_wall_segment(&mut self, w: &World, fb: &mut Framebuffer, first: i32, last: i32) {
        // Find the first range that touches the range
        //  (adjacent pixels are touching).
        let mut start = 0;
        while self.solidsegs[start].last < first - 1 {
            start += 1;
        }

        if first < self.solidsegs[start].first {
            if last < self.solidsegs[start].first - 1 {
                // Post is entirely visible (above start),
                //  so insert a new clippost.
                self.store_wall_range(w, fb, first, last);
                self.solidsegs.insert(start, ClipRange { first, last });
                return;
            }

            // There is a fragment above *start.
            let stop = self.solidsegs[start].first - 1;
            self.store_wall_range(w, fb, first, stop);
            // Now adjust the clip size.
            self.solidsegs[start].first = first;
        }

        // Bottom contained in start?
        if last <= self.solidsegs[start].last {
            return;
        }

        let mut next = start;
        while last >= self.solidsegs[next + 1].first - 1 {
            // There is a fragment between two posts.
            let (a, b) = (self.solidsegs[next].last + 1, self.solidsegs[next + 1].first - 1);
            self.store_wall_range(w, fb, a, b);
            next += 1;

            if last <= self.solidsegs[next].last {
                // Bottom is contained in next.
                // Adjust the clip size.
                self.solidsegs[start].last = self.solidsegs[next].last;
                self.crunch_solid_segs(start, next);
                return;
            }
        }

        // There is a fragment after *next.
        let a = self.solidsegs[next].last + 1;
        self.store_wall_range(w, fb, a, last);
        // Adjust the clip size.
        self.solidsegs[start].last = last;
        self.crunch_solid_segs(start, next);
    }

    /// Remove start+1 to next from the clip list,
    /// because start now covers their area.
    fn crunch_solid_segs(&mut self, start: usize, next: usize) {
        if next > start {
            self.solidsegs.drain(start + 1..=next);
        }
    }

    /// Clips the given range of columns,
    ///  but does not includes it in the clip list.
    /// Does handle windows,
    ///  e.g. LineDefs with upper and lower texture.
    fn clip_pass_wall_segment(&mut self, w: &World, fb: &mut Framebuffer, first: i32, last: i32) {
        // Find the first range that touches the range
        //  (adjacent pixels are touching).
        let mut start = 0;
        while self.solidsegs[start].last < first - 1 {
            start += 1;
        }

        if first < self.solidsegs[start].first {
            if last < self.solidsegs[start].first - 1 {
                // Post is entirely visible (above start).
                self.store_wall_range(w, fb, first, last);
                return;
            }

            // There is a fragment above *start.
            let stop = self.solidsegs[start].first - 1;
            self.store_wall_range(w, fb, first, stop);
        }

        // Bottom contained in start?
        if last <= self.solidsegs[start].last {
            return;
        }

        while last >= self.solidsegs[start + 1].first - 1 {
            // There is a fragment between two posts.
            let (a, b) = (self.solidsegs[start].last + 1, self.solidsegs[start + 1].first - 1);
            self.store_wall_range(w, fb, a, b);
            start += 1;

            if last <= self.solidsegs[start].last {
                return;
            }
        }

        // There is a fragment after *next.
        let a = self.solidsegs[start].last + 1;
        self.store_wall_range(w, fb, a, last);
    }

    /// Clips view relative angles to the field of view. Returns the
    /// screen columns covered, or `None` when the span is off screen or
    /// too thin to hit a column.
    fn clip_angles(&self, mut angle1: Angle, mut angle2: Angle, span: Angle) -> Option<(i32, i32)> {
        let clipangle = self.clipangle;
        let clip2 = clipangle.wrapping_mul(2);

        let mut tspan = angle1.wrapping_add(clipangle);
        if tspan > clip2 {
            tspan -= clip2;

            // Totally off the left edge?
            if tspan >= span {
                return None;
            }
            angle1 = clipangle;
        }
        tspan = clipangle.wrapping_sub(angle2);
        if tspan > clip2 {
            tspan -= clip2;

            // Totally off the left edge?
            if tspan >= span {
                return None;
            }
            angle2 = clipangle.wrapping_neg();
        }

        // The seg is in the view range,
        // but not necessarily visible.
        let a1 = (angle1.wrapping_add(ANG90) >> ANGLETOFINESHIFT) as usize;
        let a2 = (angle2.wrapping_add(ANG90) >> ANGLETOFINESHIFT) as usize;
        let x1 = self.viewangletox[a1];
        let x2 = self.viewangletox[a2];

        // Does not cross a pixel?
        (x1 != x2).then_some((x1, x2))
    }

    /// Clips the given seg
    /// and adds any visible pieces to the line list.
    fn add_line(&mut self, w: &World, fb: &mut Framebuffer, segnum: usize) {
        let seg = &w.level.segs[segnum];

        // OPTIMIZE: quickly reject orthogonal back sides.
        let angle1 = self.point_to_angle(seg.v1.x, seg.v1.y);
        let angle2 = self.point_to_angle(seg.v2.x, seg.v2.y);

        // Clip to view edges.
        let span = angle1.wrapping_sub(angle2);

        // Back side? I.e. backface culling?
        if span >= ANG180 {
            return;
        }

        let Some((x1, x2)) = self.clip_angles(
            angle1.wrapping_sub(self.view.angle),
            angle2.wrapping_sub(self.view.angle),
            span,
        ) else {
            return;
        };

        self.cur.seg = segnum;
        self.cur.rw_angle1 = angle1;
        self.cur.backsector = seg.backsector;

        // Single sided line?
        let Some(back) = seg.backsector else {
            self.clip_solid_wall_segment(w, fb, x1, x2 - 1);
            return;
        };
        let backsector = &w.level.sectors[back];
        let frontsector = &w.level.sectors[self.cur.frontsector];

        // Closed door.
        if backsector.ceilingheight <= frontsector.floorheight
            || backsector.floorheight >= frontsector.ceilingheight
        {
            self.clip_solid_wall_segment(w, fb, x1, x2 - 1);
            return;
        }

        // Window.
        if backsector.ceilingheight != frontsector.ceilingheight
            || backsector.floorheight != frontsector.floorheight
        {
            self.clip_pass_wall_segment(w, fb, x1, x2 - 1);
            return;
        }

        // Reject empty lines used for triggers
        //  and special events.
        // Identical floor and ceiling on both sides,
        // identical light levels on both sides,
        // and no middle texture.
        if backsector.ceilingpic == frontsector.ceilingpic
            && backsector.floorpic == frontsector.floorpic
            && backsector.lightlevel == frontsector.lightlevel
            && w.level.sides[seg.sidedef].midtexture == 0
        {
            return;
        }

        self.clip_pass_wall_segment(w, fb, x1, x2 - 1);
    }

    /// Checks BSP node/subtree bounding box.
    /// Returns true
    ///  if some part of the bbox might be visible.
    fn check_bbox(&self, bspcoord: &BBox) -> bool {
        let (vx, vy) = (self.view.x, self.view.y);

        // Find the corners of the box
        // that define the edges from current viewpoint.
        let boxx = if vx <= bspcoord[BOXLEFT] {
            0
        } else if vx < bspcoord[BOXRIGHT] {
            1
        } else {
            2
        };
        let boxy = if vy >= bspcoord[BOXTOP] {
            0
        } else if vy > bspcoord[BOXBOTTOM] {
            1
        } else {
            2
        };

        let boxpos = (boxy << 2) + boxx;
        if boxpos == 5 {
            return true;
        }

        let c = CHECKCOORD[boxpos];
        let (x1, y1) = (bspcoord[c[0]], bspcoord[c[1]]);
        let (x2, y2) = (bspcoord[c[2]], bspcoord[c[3]]);

        // check clip list for an open space
        let angle1 = self.point_to_angle(x1, y1).wrapping_sub(self.view.angle);
        let angle2 = self.point_to_angle(x2, y2).wrapping_sub(self.view.angle);

        let span = angle1.wrapping_sub(angle2);

        // Sitting on a line?
        if span >= ANG180 {
            return true;
        }

        let Some((sx1, sx2)) = self.clip_angles(angle1, angle2, span) else {
            return false;
        };
        let sx2 = sx2 - 1;

        let Some(start) = self.solidsegs.iter().find(|s| s.last >= sx2) else {
            return true;
        };

        // The clippost contains the new span.
        !(sx1 >= start.first && sx2 <= start.last)
    }

    /// Determine floor/ceiling planes.
    /// Add sprites of things in sector.
    /// Draw one or more line segments.
    pub(crate) fn render_subsector(&mut self, w: &World, fb: &mut Framebuffer, num: usize) {
        let Some(sub) = w.level.subsectors.get(num) else {
            return;
        };
        self.sscount += 1;

        let secnum = sub.sector;
        let front = &w.level.sectors[secnum];
        self.cur.frontsector = secnum;

        self.floorplane = if front.floorheight < self.view.z {
            Some(self.find_plane(w, front.floorheight, front.floorpic, front.lightlevel))
        } else {
            None
        };

        self.ceilingplane = if front.ceilingheight > self.view.z || front.ceilingpic == w.skyflatnum {
            Some(self.find_plane(w, front.ceilingheight, front.ceilingpic, front.lightlevel))
        } else {
            None
        };

        self.add_sprites(w, secnum);

        for segnum in sub.firstline..sub.firstline + sub.numlines {
            self.add_line(w, fb, segnum);
        }
    }

    /// Renders all subsectors below a given node,
    ///  traversing subtree recursively.
    pub(crate) fn render_bsp_node(&mut self, w: &World, fb: &mut Framebuffer, child: NodeChild) {
        match child {
            NodeChild::Subsector(num) => self.render_subsector(w, fb, num),
            NodeChild::Node(num) => {
                let node = &w.level.nodes[num];

                // Decide which side the view point is on.
                let side = node.point_on_side(self.view.x, self.view.y);

                // Recursively divide front space.
                self.render_bsp_node(w, fb, node.children[side]);

                // Possibly divide back space.
                if self.check_bbox(&node.bbox[side ^ 1]) {
                    self.render_bsp_node(w, fb, node.children[side ^ 1]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doom_common::fixed::FRACUNIT;
    use doom_game::level::Vertex;

    fn seg(x1: i32, y1: i32, x2: i32, y2: i32) -> Seg {
        Seg {
            v1: Vertex {
                x: x1 * FRACUNIT,
                y: y1 * FRACUNIT,
            },
            v2: Vertex {
                x: x2 * FRACUNIT,
                y: y2 * FRACUNIT,
            },
            offset: 0,
            angle: 0,
            sidedef: 0,
            linedef: 0,
            frontsector: 0,
            backsector: None,
        }
    }

    #[test]
    fn test_point_on_seg_side() {
        // east pointing seg: front is to the right, i.e. south
        let s = seg(0, 0, 64, 0);
        assert_eq!(point_on_seg_side(10 * FRACUNIT, -5 * FRACUNIT, &s), 0);
        assert_eq!(point_on_seg_side(10 * FRACUNIT, 5 * FRACUNIT, &s), 1);

        let diag = seg(0, 0, 64, 64);
        assert_eq!(point_on_seg_side(40 * FRACUNIT, 10 * FRACUNIT, &diag), 0);
        assert_eq!(point_on_seg_side(10 * FRACUNIT, 40 * FRACUNIT, &diag), 1);
    }

    #[test]
    fn test_clip_angles_to_field_of_view() {
        let mut r = Renderer::new();
        r.clear_clip_segs();
        assert_eq!(r.solidsegs.len(), 2);
        assert_eq!(r.solidsegs[1].first, 320);

        // wider than the view on both sides
        let a1 = ANG90 - 1;
        let a2 = ANG90.wrapping_neg() + 1;
        let (x1, x2) = r.clip_angles(a1, a2, a1.wrapping_sub(a2)).unwrap();
        assert_eq!(x1, 0);
        assert!(x2 >= 319);

        // entirely left of the view
        let b1 = ANG90 + ANG90 / 2;
        let b2 = ANG90;
        assert_eq!(r.clip_angles(b1, b2, b1 - b2), None);
    }

    #[test]
    fn test_bbox_around_view_is_visible() {
        let mut r = Renderer::new();
        r.clear_clip_segs();
        r.view.x = 32 * FRACUNIT;
        r.view.y = 32 * FRACUNIT;
        let around: BBox = [64 * FRACUNIT, 0, 0, 64 * FRACUNIT];
        assert!(r.check_bbox(&around));

        // a box straight ahead is visible until the screen is covered
        let ahead: BBox = [40 * FRACUNIT, 24 * FRACUNIT, 100 * FRACUNIT, 120 * FRACUNIT];
        assert!(r.check_bbox(&ahead));
        r.solidsegs = vec![ClipRange {
            first: -0x7fff_ffff,
            last: 0x7fff_ffff,
        }];
        assert!(!r.check_bbox(&ahead));

        // behind the view
        r.clear_clip_segs();
        let behind: BBox = [40 * FRACUNIT, 24 * FRACUNIT, -120 * FRACUNIT, -100 * FRACUNIT];
        assert!(!r.check_bbox(&behind));
    }
}
