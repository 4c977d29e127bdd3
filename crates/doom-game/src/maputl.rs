// maputl.rs - Movement/collision utility functions, blockmap iterators
// and intercept traversal

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
use doom_common::fixed::{fixed_div, fixed_mul, Fixed, FRACBITS, FRACUNIT};

use crate::info::MobjFlags;
use crate::level::{Level, Line, SlopeType};
use crate::local::{MAPBLOCKSHIFT, MAPBLOCKSIZE, MAPBTOFRAC};
use crate::world::{MobjId, World};

/// Gives an estimation of distance (not exact).
pub fn aprox_distance(dx: Fixed, dy: Fixed) -> Fixed {
    let dx = dx.abs();
    let dy = dy.abs();
    if dx < dy {
        return dx + dy - (dx >> 1);
    }
    dx + dy - (dy >> 1)
}

/// Returns 0 or 1.
pub fn point_on_line_side(x: Fixed, y: Fixed, line: &Line) -> usize {
    if line.dx == 0 {
        if x <= line.v1.x {
            return (line.dy > 0) as usize;
        }
        return (line.dy < 0) as usize;
    }
    if line.dy == 0 {
        if y <= line.v1.y {
            return (line.dx < 0) as usize;
        }
        return (line.dx > 0) as usize;
    }

    let dx = x - line.v1.x;
    let dy = y - line.v1.y;

    let left = fixed_mul(line.dy >> FRACBITS, dx);
    let right = fixed_mul(dy, line.dx >> FRACBITS);

    if right < left {
        0 // front side
    } else {
        1 // back side
    }
}

/// Considers the line to be infinite.
/// Returns side 0 or 1, -1 if box crosses the line.
pub fn box_on_line_side(tmbox: &BBox, ld: &Line) -> i32 {
    let (mut p1, mut p2);
    match ld.slopetype {
        SlopeType::Horizontal => {
            p1 = (tmbox[BOXTOP] > ld.v1.y) as i32;
            p2 = (tmbox[BOXBOTTOM] > ld.v1.y) as i32;
            if ld.dx < 0 {
                p1 ^= 1;
                p2 ^= 1;
            }
        }
        SlopeType::Vertical => {
            p1 = (tmbox[BOXRIGHT] < ld.v1.x) as i32;
            p2 = (tmbox[BOXLEFT] < ld.v1.x) as i32;
            if ld.dy < 0 {
                p1 ^= 1;
                p2 ^= 1;
            }
        }
        SlopeType::Positive => {
            p1 = point_on_line_side(tmbox[BOXLEFT], tmbox[BOXTOP], ld) as i32;
            p2 = point_on_line_side(tmbox[BOXRIGHT], tmbox[BOXBOTTOM], ld) as i32;
        }
        SlopeType::Negative => {
            p1 = point_on_line_side(tmbox[BOXRIGHT], tmbox[BOXTOP], ld) as i32;
            p2 = point_on_line_side(tmbox[BOXLEFT], tmbox[BOXBOTTOM], ld) as i32;
        }
    }

    if p1 == p2 {
        return p1;
    }
    -1
}

/// A line through a point with a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Divline {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
}

impl Divline {
    pub fn from_line(li: &Line) -> Divline {
        Divline {
            x: li.v1.x,
            y: li.v1.y,
            dx: li.dx,
            dy: li.dy,
        }
    }
}

/// Returns 0 or 1.
pub fn point_on_divline_side(x: Fixed, y: Fixed, line: &Divline) -> usize {
    if line.dx == 0 {
        if x <= line.x {
            return (line.dy > 0) as usize;
        }
        return (line.dy < 0) as usize;
    }
    if line.dy == 0 {
        if y <= line.y {
            return (line.dx < 0) as usize;
        }
        return (line.dx > 0) as usize;
    }

    let dx = x - line.x;
    let dy = y - line.y;

    // try to quickly decide by looking at sign bits
    if ((line.dy ^ line.dx ^ dx ^ dy) as u32) & 0x8000_0000 != 0 {
        if ((line.dy ^ dx) as u32) & 0x8000_0000 != 0 {
            return 1; // left is negative
        }
        return 0;
    }

    let left = fixed_mul(line.dy >> 8, dx >> 8);
    let right = fixed_mul(dy >> 8, line.dx >> 8);

    if right < left {
        0 // front side
    } else {
        1 // back side
    }
}

/// Returns the fractional intercept point along the first divline.
pub fn intercept_vector(v2: &Divline, v1: &Divline) -> Fixed {
    let den = fixed_mul(v1.dy >> 8, v2.dx) - fixed_mul(v1.dx >> 8, v2.dy);
    if den == 0 {
        return 0;
    }
    let num = fixed_mul((v1.x - v2.x) >> 8, v1.dy) + fixed_mul((v2.y - v1.y) >> 8, v1.dx);
    fixed_div(num, den)
}

/// Vertical gap through a two sided line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Opening {
    pub top: Fixed,
    pub bottom: Fixed,
    pub range: Fixed,
    pub lowfloor: Fixed,
}

/// Sets opentop and openbottom to the window
/// through a two sided line.
pub fn line_opening(level: &Level, line: usize) -> Opening {
    let ld = &level.lines[line];
    let Some(back) = ld.backsector.filter(|_| ld.sidenum[1].is_some()) else {
        // single sided line
        return Opening::default();
    };
    let front = &level.sectors[ld.frontsector];
    let back = &level.sectors[back];

    let top = front.ceilingheight.min(back.ceilingheight);
    let (bottom, lowfloor) = if front.floorheight > back.floorheight {
        (front.floorheight, back.floorheight)
    } else {
        (back.floorheight, front.floorheight)
    };

    Opening {
        top,
        bottom,
        range: top - bottom,
        lowfloor,
    }
}

// ============================================================
// Thing position setting
// ============================================================

/// Unlinks a thing from block map and sectors.
/// On each position change, BLOCKMAP and other
/// lookups maintaining lists ot things inside
/// these structures need to be updated.
pub fn unset_thing_position(w: &mut World, id: MobjId) {
    let Some(mo) = w.mobjs.get_mut(id) else {
        return;
    };
    let flags = mo.flags;
    let block = mo.blockindex.take();
    let sector = w.level.subsectors[mo.subsector].sector;

    if !flags.contains(MobjFlags::NOSECTOR) {
        // inert things don't need to be in blockmap?
        let things = &mut w.level.sectors[sector].things;
        if let Some(pos) = things.iter().position(|&t| t == id) {
            things.remove(pos);
        }
    }

    if let Some(block) = block {
        let links = &mut w.level.blockmap.links[block];
        if let Some(pos) = links.iter().position(|&t| t == id) {
            links.remove(pos);
        }
    }
}

/// Links a thing into both a block and a subsector
/// based on it's x y.
/// Sets thing->subsector properly
pub fn set_thing_position(w: &mut World, id: MobjId) {
    let Some(mo) = w.mobjs.get(id) else {
        return;
    };
    let (x, y, flags) = (mo.x, mo.y, mo.flags);

    // link into subsector
    let ss = w.level.point_in_subsector(x, y);
    let sector = w.level.subsectors[ss].sector;

    if !flags.contains(MobjFlags::NOSECTOR) {
        w.level.sectors[sector].things.push(id);
    }

    // link into blockmap
    let mut blockindex = None;
    if !flags.contains(MobjFlags::NOBLOCKMAP) {
        let bm = &mut w.level.blockmap;
        let (bx, by) = bm.block_coords(x, y);
        if let Some(b) = bm.block_index(bx, by) {
            bm.links[b].push(id);
            blockindex = Some(b);
        }
        // thing is off the map otherwise
    }

    let mo = &mut w.mobjs[id];
    mo.subsector = ss;
    mo.blockindex = blockindex;
}

// ============================================================
// Block map iterators
// ============================================================

/// Calls `func` for every line in block (x, y) not yet checked this
/// validcount. Stops and returns false as soon as `func` does.
pub fn block_lines_iterator(
    w: &mut World,
    x: i32,
    y: i32,
    mut func: impl FnMut(&mut World, usize) -> bool,
) -> bool {
    let Some(block) = w.level.blockmap.block_index(x, y) else {
        return true;
    };

    let count = w.level.blockmap.lines[block].len();
    for i in 0..count {
        let ld = w.level.blockmap.lines[block][i];
        let line = &mut w.level.lines[ld];
        if line.validcount == w.validcount {
            continue; // line has already been checked
        }
        line.validcount = w.validcount;

        if !func(w, ld) {
            return false;
        }
    }
    true // everything was checked
}

/// Calls `func` for every thing in block (x, y), most recently linked
/// first.
pub fn block_things_iterator(
    w: &mut World,
    x: i32,
    y: i32,
    mut func: impl FnMut(&mut World, MobjId) -> bool,
) -> bool {
    let Some(block) = w.level.blockmap.block_index(x, y) else {
        return true;
    };

    let things = w.level.blockmap.links[block].clone();
    for &mobj in things.iter().rev() {
        if !w.mobjs.contains(mobj) {
            continue;
        }
        if !func(w, mobj) {
            return false;
        }
    }
    true
}

/// Things in a sector, most recently linked first.
pub fn sector_things(w: &World, sector: usize) -> Vec<MobjId> {
    w.level.sectors[sector].things.iter().rev().copied().collect()
}

// ============================================================
// Intercept routines
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptKind {
    Line(usize),
    Thing(MobjId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intercept {
    /// Along trace line.
    pub frac: Fixed,
    pub kind: InterceptKind,
}

pub const PT_ADDLINES: u32 = 1;
pub const PT_ADDTHINGS: u32 = 2;
pub const PT_EARLYOUT: u32 = 4;

struct Tracer {
    trace: Divline,
    earlyout: bool,
    intercepts: Vec<Intercept>,
}

impl Tracer {
    /// Looks for lines in the given block
    /// that intercept the given trace
    /// to add to the intercepts list.
    ///
    /// A line is crossed if its endpoints
    /// are on opposite sides of the trace.
    /// Returns true if earlyout and a solid line hit.
    fn add_line_intercepts(&mut self, level: &Level, ld: usize) -> bool {
        let li = &level.lines[ld];
        let trace = &self.trace;

        // avoid precision problems with two routines
        let (s1, s2) = if trace.dx > FRACUNIT * 16
            || trace.dy > FRACUNIT * 16
            || trace.dx < -FRACUNIT * 16
            || trace.dy < -FRACUNIT * 16
        {
            (
                point_on_divline_side(li.v1.x, li.v1.y, trace),
                point_on_divline_side(li.v2.x, li.v2.y, trace),
            )
        } else {
            (
                point_on_line_side(trace.x, trace.y, li),
                point_on_line_side(trace.x + trace.dx, trace.y + trace.dy, li),
            )
        };

        if s1 == s2 {
            return true; // line isn't crossed
        }

        // hit the line
        let dl = Divline::from_line(li);
        let frac = intercept_vector(trace, &dl);

        if frac < 0 {
            return true; // behind source
        }

        // try to early out the check
        if self.earlyout && frac < FRACUNIT && li.backsector.is_none() {
            return false; // stop checking
        }

        self.intercepts.push(Intercept {
            frac,
            kind: InterceptKind::Line(ld),
        });
        true // continue
    }

    fn add_thing_intercepts(&mut self, w: &World, thing: MobjId) -> bool {
        let th = &w.mobjs[thing];
        let trace = &self.trace;

        // check a corner to corner crossection for hit
        let tracepositive = (trace.dx ^ trace.dy) > 0;
        let (x1, y1, x2, y2) = if tracepositive {
            (th.x - th.radius, th.y + th.radius, th.x + th.radius, th.y - th.radius)
        } else {
            (th.x - th.radius, th.y - th.radius, th.x + th.radius, th.y + th.radius)
        };

        let s1 = point_on_divline_side(x1, y1, trace);
        let s2 = point_on_divline_side(x2, y2, trace);

        if s1 == s2 {
            return true; // line isn't crossed
        }

        let dl = Divline {
            x: x1,
            y: y1,
            dx: x2 - x1,
            dy: y2 - y1,
        };
        let frac = intercept_vector(trace, &dl);

        if frac < 0 {
            return true; // behind source
        }

        self.intercepts.push(Intercept {
            frac,
            kind: InterceptKind::Thing(thing),
        });
        true // keep going
    }
}

/// Returns true if the traverser function returns true
/// for all lines.
fn traverse_intercepts(
    w: &mut World,
    intercepts: &mut [Intercept],
    trace: &Divline,
    maxfrac: Fixed,
    func: &mut impl FnMut(&mut World, &Intercept, &Divline) -> bool,
) -> bool {
    for _ in 0..intercepts.len() {
        let mut dist = i32::MAX;
        let mut closest = 0;
        for (i, scan) in intercepts.iter().enumerate() {
            if scan.frac < dist {
                dist = scan.frac;
                closest = i;
            }
        }

        if dist > maxfrac {
            return true; // checked everything in range
        }

        let hit = intercepts[closest];
        if let InterceptKind::Thing(t) = hit.kind {
            if !w.mobjs.contains(t) {
                intercepts[closest].frac = i32::MAX;
                continue;
            }
        }
        if !func(w, &hit, trace) {
            return false; // don't bother going farther
        }

        intercepts[closest].frac = i32::MAX;
    }

    true // everything was traversed
}

/// Traces a line from x1,y1 to x2,y2,
/// calling the traverser function for each.
/// Returns true if the traverser function returns true
/// for all lines.
pub fn path_traverse(
    w: &mut World,
    mut x1: Fixed,
    mut y1: Fixed,
    mut x2: Fixed,
    mut y2: Fixed,
    flags: u32,
    mut trav: impl FnMut(&mut World, &Intercept, &Divline) -> bool,
) -> bool {
    w.next_validcount();

    let (orgx, orgy) = (w.level.blockmap.orgx, w.level.blockmap.orgy);

    if ((x1 - orgx) & (MAPBLOCKSIZE - 1)) == 0 {
        x1 += FRACUNIT; // don't side exactly on a line
    }
    if ((y1 - orgy) & (MAPBLOCKSIZE - 1)) == 0 {
        y1 += FRACUNIT; // don't side exactly on a line
    }

    let mut tracer = Tracer {
        trace: Divline {
            x: x1,
            y: y1,
            dx: x2 - x1,
            dy: y2 - y1,
        },
        earlyout: flags & PT_EARLYOUT != 0,
        intercepts: Vec::new(),
    };

    x1 -= orgx;
    y1 -= orgy;
    let xt1 = x1 >> MAPBLOCKSHIFT;
    let yt1 = y1 >> MAPBLOCKSHIFT;

    x2 -= orgx;
    y2 -= orgy;
    let xt2 = x2 >> MAPBLOCKSHIFT;
    let yt2 = y2 >> MAPBLOCKSHIFT;

    let (mapxstep, partial, ystep);
    if xt2 > xt1 {
        mapxstep = 1;
        partial = FRACUNIT - ((x1 >> MAPBTOFRAC) & (FRACUNIT - 1));
        ystep = fixed_div(y2 - y1, (x2 - x1).abs());
    } else if xt2 < xt1 {
        mapxstep = -1;
        partial = (x1 >> MAPBTOFRAC) & (FRACUNIT - 1);
        ystep = fixed_div(y2 - y1, (x2 - x1).abs());
    } else {
        mapxstep = 0;
        partial = FRACUNIT;
        ystep = 256 * FRACUNIT;
    }
    let mut yintercept = (y1 >> MAPBTOFRAC) + fixed_mul(partial, ystep);

    let (mapystep, partial, xstep);
    if yt2 > yt1 {
        mapystep = 1;
        partial = FRACUNIT - ((y1 >> MAPBTOFRAC) & (FRACUNIT - 1));
        xstep = fixed_div(x2 - x1, (y2 - y1).abs());
    } else if yt2 < yt1 {
        mapystep = -1;
        partial = (y1 >> MAPBTOFRAC) & (FRACUNIT - 1);
        xstep = fixed_div(x2 - x1, (y2 - y1).abs());
    } else {
        mapystep = 0;
        partial = FRACUNIT;
        xstep = 256 * FRACUNIT;
    }
    let mut xintercept = (x1 >> MAPBTOFRAC) + fixed_mul(partial, xstep);

    // Step through map blocks.
    // Count is present to prevent a round off error
    // from skipping the break.
    let mut mapx = xt1;
    let mut mapy = yt1;

    for _ in 0..64 {
        if flags & PT_ADDLINES != 0 {
            let ok = block_lines_iterator(w, mapx, mapy, |w, ld| tracer.add_line_intercepts(&w.level, ld));
            if !ok {
                return false; // early out
            }
        }

        if flags & PT_ADDTHINGS != 0 {
            let ok = block_things_iterator(w, mapx, mapy, |w, th| tracer.add_thing_intercepts(w, th));
            if !ok {
                return false; // early out
            }
        }

        if mapx == xt2 && mapy == yt2 {
            break;
        }

        if (yintercept >> FRACBITS) == mapy {
            yintercept += ystep;
            mapx += mapxstep;
        } else if (xintercept >> FRACBITS) == mapx {
            xintercept += xstep;
            mapy += mapystep;
        }
    }

    // go through the sorted list
    let Tracer { trace, mut intercepts, .. } = tracer;
    traverse_intercepts(w, &mut intercepts, &trace, FRACUNIT, &mut trav)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::MobjType;
    use crate::local::ONFLOORZ;
    use crate::mobj::spawn_mobj;
    use crate::testutil::test_world;

    #[test]
    fn test_aprox_distance() {
        assert_eq!(aprox_distance(3 * FRACUNIT, 0), 3 * FRACUNIT);
        assert_eq!(aprox_distance(-4 * FRACUNIT, 4 * FRACUNIT), 6 * FRACUNIT);
    }

    #[test]
    fn test_point_and_box_sides() {
        let w = test_world();
        // the divider runs from (256,0) up to (256,512)
        let ld = &w.level.lines[doom_common::testkit::DIVIDER_LINE];
        let left = point_on_line_side(100 * FRACUNIT, 10 * FRACUNIT, ld);
        let right = point_on_line_side(300 * FRACUNIT, 10 * FRACUNIT, ld);
        assert_ne!(left, right);

        let across: BBox = [20 * FRACUNIT, 0, 250 * FRACUNIT, 260 * FRACUNIT];
        assert_eq!(box_on_line_side(&across, ld), -1);
        let inside: BBox = [20 * FRACUNIT, 0, 100 * FRACUNIT, 120 * FRACUNIT];
        assert_eq!(box_on_line_side(&inside, ld), left as i32);
    }

    #[test]
    fn test_opening_through_divider() {
        let w = test_world();
        let open = line_opening(&w.level, doom_common::testkit::DIVIDER_LINE);
        assert_eq!(open.bottom, 0);
        assert_eq!(open.top, 128 * FRACUNIT);
        assert_eq!(open.range, 128 * FRACUNIT);

        let solid = line_opening(&w.level, 0);
        assert_eq!(solid.range, 0);
    }

    #[test]
    fn test_intercept_vector_midpoint() {
        let trace = Divline { x: 0, y: 0, dx: 100 * FRACUNIT, dy: 0 };
        let wall = Divline { x: 50 * FRACUNIT, y: -10 * FRACUNIT, dx: 0, dy: 20 * FRACUNIT };
        assert_eq!(intercept_vector(&trace, &wall), FRACUNIT / 2);
    }

    #[test]
    fn test_path_traverse_orders_hits() {
        let mut w = test_world();
        let near = spawn_mobj(&mut w, 150 * FRACUNIT, 256 * FRACUNIT, ONFLOORZ, MobjType::MT_BARREL);
        let far = spawn_mobj(&mut w, 400 * FRACUNIT, 256 * FRACUNIT, ONFLOORZ, MobjType::MT_BARREL);

        let mut hits = Vec::new();
        path_traverse(
            &mut w,
            40 * FRACUNIT,
            256 * FRACUNIT,
            500 * FRACUNIT,
            256 * FRACUNIT,
            PT_ADDLINES | PT_ADDTHINGS,
            |_, ic, _| {
                hits.push(ic.kind);
                true
            },
        );
        assert_eq!(
            hits,
            vec![
                InterceptKind::Thing(near),
                InterceptKind::Line(doom_common::testkit::DIVIDER_LINE),
                InterceptKind::Thing(far),
            ]
        );
    }

    #[test]
    fn test_path_traverse_stops_early() {
        let mut w = test_world();
        let mut count = 0;
        let finished = path_traverse(
            &mut w,
            40 * FRACUNIT,
            256 * FRACUNIT,
            600 * FRACUNIT,
            256 * FRACUNIT,
            PT_ADDLINES,
            |_, _, _| {
                count += 1;
                false
            },
        );
        assert!(!finished);
        assert_eq!(count, 1);
    }
}
