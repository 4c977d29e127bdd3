// map.rs - Movement, collision handling, shooting and aiming

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
use doom_common::tables::{finecosine, finesine, fine_index, point_to_angle, Angle, ANG180, ANGLETOFINESHIFT};
use doom_common::wadfiles::LineFlags;

use crate::info::{MobjFlags, MobjType, SfxId, StateNum};
use crate::inter::{damage_mobj, touch_special_thing};
use crate::level::SlopeType;
use crate::local::*;
use crate::maputl::*;
use crate::mobj::{remove_mobj, set_mobj_state, spawn_blood, spawn_mobj, spawn_puff};
use crate::sight::check_sight;
use crate::spec::{cross_special_line, shoot_special_line};
use crate::switches::use_special_line;
use crate::world::{MobjId, World};

/// Result of a position check or move attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveState {
    /// The position was clear, or the move happened.
    pub ok: bool,
    /// Lowest ceiling and highest floor over the thing's box.
    pub floorz: Fixed,
    pub ceilingz: Fixed,
    pub dropoffz: Fixed,
    /// Line that lowered the ceiling, for the sky hack on missiles.
    pub ceilingline: Option<usize>,
    /// Special lines touched, in contact order.
    pub spechit: Vec<usize>,
    /// A floating monster could fit if it changed height.
    pub floatok: bool,
}

struct Check {
    thing: MobjId,
    flags: MobjFlags,
    x: Fixed,
    y: Fixed,
    bbox: BBox,
    state: MoveState,
}

fn thing_box(x: Fixed, y: Fixed, radius: Fixed) -> BBox {
    let mut b = [0; 4];
    b[BOXTOP] = y + radius;
    b[BOXBOTTOM] = y - radius;
    b[BOXRIGHT] = x + radius;
    b[BOXLEFT] = x - radius;
    b
}

/// Blocks covered by a box, optionally grown by `MAXRADIUS` so things
/// centred in a neighbouring block are found.
fn box_block_range(w: &World, bbox: &BBox, pad: Fixed) -> (i32, i32, i32, i32) {
    let bm = &w.level.blockmap;
    let xl = (bbox[BOXLEFT] - bm.orgx - pad) >> MAPBLOCKSHIFT;
    let xh = (bbox[BOXRIGHT] - bm.orgx + pad) >> MAPBLOCKSHIFT;
    let yl = (bbox[BOXBOTTOM] - bm.orgy - pad) >> MAPBLOCKSHIFT;
    let yh = (bbox[BOXTOP] - bm.orgy + pad) >> MAPBLOCKSHIFT;
    (xl, xh, yl, yh)
}

// ============================================================
// Teleport move
// ============================================================

fn stomp_thing(w: &mut World, c: &Check, thing: MobjId) -> bool {
    let th = &w.mobjs[thing];
    if !th.flags.contains(MobjFlags::SHOOTABLE) {
        return true;
    }

    let blockdist = th.radius + w.mobjs[c.thing].radius;
    if (th.x - c.x).abs() >= blockdist || (th.y - c.y).abs() >= blockdist {
        // didn't hit it
        return true;
    }

    // don't clip against self
    if thing == c.thing {
        return true;
    }

    // monsters don't stomp things except on boss level
    if w.mobjs[c.thing].player.is_none() && w.options.map != 30 {
        return false;
    }

    damage_mobj(w, thing, Some(c.thing), Some(c.thing), 10000);
    true
}

/// Moves a thing to a spot, killing anything shootable already there.
pub fn teleport_move(w: &mut World, id: MobjId, x: Fixed, y: Fixed) -> bool {
    // kill anything occupying the position
    let mo = &w.mobjs[id];
    let bbox = thing_box(x, y, mo.radius);
    let sector = w.level.sector_at(x, y);
    let s = &w.level.sectors[sector];
    let c = Check {
        thing: id,
        flags: mo.flags,
        x,
        y,
        bbox,
        state: MoveState {
            floorz: s.floorheight,
            dropoffz: s.floorheight,
            ceilingz: s.ceilingheight,
            ..Default::default()
        },
    };

    // The base floor/ceiling is from the subsector
    // that contains the point.
    // Any contacted lines the step closer together
    // will adjust them.
    w.next_validcount();

    // stomp on any things contacted
    let (xl, xh, yl, yh) = box_block_range(w, &c.bbox, MAXRADIUS);
    for bx in xl..=xh {
        for by in yl..=yh {
            if !block_things_iterator(w, bx, by, |w, th| stomp_thing(w, &c, th)) {
                return false;
            }
        }
    }

    // the move is ok,
    // so link the thing into its new position
    unset_thing_position(w, id);
    let mo = &mut w.mobjs[id];
    mo.floorz = c.state.floorz;
    mo.ceilingz = c.state.ceilingz;
    mo.x = x;
    mo.y = y;
    set_thing_position(w, id);
    true
}

// ============================================================
// Movement iterator functions
// ============================================================

/// Adjusts the check state for a line the thing's box touches.
fn check_line(w: &mut World, c: &mut Check, ld: usize) -> bool {
    let line = &w.level.lines[ld];
    if c.bbox[BOXRIGHT] <= line.bbox[BOXLEFT]
        || c.bbox[BOXLEFT] >= line.bbox[BOXRIGHT]
        || c.bbox[BOXTOP] <= line.bbox[BOXBOTTOM]
        || c.bbox[BOXBOTTOM] >= line.bbox[BOXTOP]
    {
        return true;
    }

    if box_on_line_side(&c.bbox, line) != -1 {
        return true;
    }

    // A line has been hit

    // The moving thing's destination position will cross
    // the given line.
    // If this should not be allowed, return false.
    // If the line is special, keep track of it
    // to process later if the move is proven ok.
    // NOTE: specials are NOT sorted by order,
    // so two special lines that are only 8 pixels apart
    // could be crossed in either order.

    if line.backsector.is_none() {
        return false; // one sided line
    }

    if !c.flags.contains(MobjFlags::MISSILE) {
        if line.flags.contains(LineFlags::BLOCKING) {
            return false; // explicitly blocking everything
        }
        if w.mobjs[c.thing].player.is_none() && line.flags.contains(LineFlags::BLOCKMONSTERS) {
            return false; // block monsters only
        }
    }

    // set openrange, opentop, openbottom
    let open = line_opening(&w.level, ld);
    let st = &mut c.state;

    // adjust floor / ceiling heights
    if open.top < st.ceilingz {
        st.ceilingz = open.top;
        st.ceilingline = Some(ld);
    }
    if open.bottom > st.floorz {
        st.floorz = open.bottom;
    }
    if open.lowfloor < st.dropoffz {
        st.dropoffz = open.lowfloor;
    }

    // if contacted a special line, add it to the list
    if line.special != 0 {
        st.spechit.push(ld);
    }

    true
}

fn check_thing(w: &mut World, c: &mut Check, thing: MobjId) -> bool {
    let th = &w.mobjs[thing];
    if !th
        .flags
        .intersects(MobjFlags::SOLID | MobjFlags::SPECIAL | MobjFlags::SHOOTABLE)
    {
        return true;
    }

    let tm = &w.mobjs[c.thing];
    let blockdist = th.radius + tm.radius;
    if (th.x - c.x).abs() >= blockdist || (th.y - c.y).abs() >= blockdist {
        // didn't hit it
        return true;
    }

    // don't clip against self
    if thing == c.thing {
        return true;
    }

    // check for skulls slamming into things
    if c.flags.contains(MobjFlags::SKULLFLY) {
        let damage = ((w.p_random() % 8) + 1) * w.mobjs[c.thing].kind.info().damage;
        damage_mobj(w, thing, Some(c.thing), Some(c.thing), damage);

        if let Some(tm) = w.mobjs.get_mut(c.thing) {
            tm.flags.remove(MobjFlags::SKULLFLY);
            tm.momx = 0;
            tm.momy = 0;
            tm.momz = 0;
            let spawn = tm.kind.info().spawnstate;
            set_mobj_state(w, c.thing, spawn);
        }

        return false; // stop moving
    }

    // missiles can hit other things
    if c.flags.contains(MobjFlags::MISSILE) {
        // see if it went over / under
        if tm.z > th.z + th.height {
            return true; // overhead
        }
        if tm.z + tm.height < th.z {
            return true; // underneath
        }

        if let Some(source) = tm.target.and_then(|t| w.mobjs.get(t)) {
            if source.kind == th.kind {
                // Don't hit same species as originator.
                if Some(thing) == tm.target {
                    return true;
                }

                if th.kind != MobjType::MT_PLAYER {
                    // Explode, but do no damage.
                    // Let players missile other players.
                    return false;
                }
            }
        }

        if !th.flags.contains(MobjFlags::SHOOTABLE) {
            // didn't do any damage
            return !th.flags.contains(MobjFlags::SOLID);
        }

        // damage / explode
        let source = tm.target;
        let info_damage = tm.kind.info().damage;
        let damage = ((w.p_random() % 8) + 1) * info_damage;
        damage_mobj(w, thing, Some(c.thing), source, damage);

        // don't traverse any more
        return false;
    }

    // check for special pickup
    if th.flags.contains(MobjFlags::SPECIAL) {
        let solid = th.flags.contains(MobjFlags::SOLID);
        if c.flags.contains(MobjFlags::PICKUP) {
            // can remove thing
            touch_special_thing(w, thing, c.thing);
        }
        return !solid;
    }

    !th.flags.contains(MobjFlags::SOLID)
}

// ============================================================
// Movement clipping
// ============================================================

/// This is purely informative, nothing is modified
/// (except things picked up).
///
/// in:
///  a thing (can be valid or invalid)
///  a position to be checked
///   (doesn't need to be related to the thing's current position)
///
/// during:
///  special things are touched if MF_PICKUP
///  early out on solid lines?
///
/// out:
///  floorz, ceilingz, dropoffz (the lowest point contacted,
///  whether a monster could step off), ceilingline and spechit.
pub fn check_position(w: &mut World, id: MobjId, x: Fixed, y: Fixed) -> MoveState {
    let mo = &w.mobjs[id];
    let mut c = Check {
        thing: id,
        flags: mo.flags,
        x,
        y,
        bbox: thing_box(x, y, mo.radius),
        state: MoveState::default(),
    };

    // The base floor / ceiling is from the subsector
    // that contains the point.
    // Any contacted lines the step closer together
    // will adjust them.
    let sector = &w.level.sectors[w.level.sector_at(x, y)];
    c.state.floorz = sector.floorheight;
    c.state.dropoffz = sector.floorheight;
    c.state.ceilingz = sector.ceilingheight;

    w.next_validcount();

    if c.flags.contains(MobjFlags::NOCLIP) {
        c.state.ok = true;
        return c.state;
    }

    // Check things first, possibly picking things up.
    // The bounding box is extended by MAXRADIUS
    // because mobj_ts are grouped into mapblocks
    // based on their origin point, and can overlap
    // into adjacent blocks by up to MAXRADIUS units.
    let (xl, xh, yl, yh) = box_block_range(w, &c.bbox, MAXRADIUS);
    for bx in xl..=xh {
        for by in yl..=yh {
            if !block_things_iterator(w, bx, by, |w, th| check_thing(w, &mut c, th)) {
                return c.state;
            }
        }
    }

    // check lines
    let (xl, xh, yl, yh) = box_block_range(w, &c.bbox, 0);
    for bx in xl..=xh {
        for by in yl..=yh {
            if !block_lines_iterator(w, bx, by, |w, ld| check_line(w, &mut c, ld)) {
                return c.state;
            }
        }
    }

    c.state.ok = true;
    c.state
}

/// Attempt to move to a new position,
/// crossing special lines unless MF_TELEPORT is set.
pub fn try_move(w: &mut World, id: MobjId, x: Fixed, y: Fixed) -> MoveState {
    let mut result = check_position(w, id, x, y);
    if !result.ok {
        return result; // solid wall or thing
    }
    result.ok = false;

    let Some(mo) = w.mobjs.get(id) else {
        return result;
    };
    if !mo.flags.contains(MobjFlags::NOCLIP) {
        if result.ceilingz - result.floorz < mo.height {
            return result; // doesn't fit
        }

        result.floatok = true;

        if !mo.flags.contains(MobjFlags::TELEPORT) && result.ceilingz - mo.z < mo.height {
            return result; // mobj must lower itself to fit
        }

        if !mo.flags.contains(MobjFlags::TELEPORT) && result.floorz - mo.z > 24 * FRACUNIT {
            return result; // too big a step up
        }

        if !mo.flags.intersects(MobjFlags::DROPOFF | MobjFlags::FLOAT)
            && result.floorz - result.dropoffz > 24 * FRACUNIT
        {
            return result; // don't stand over a dropoff
        }
    }

    // the move is ok,
    // so link the thing into its new position
    unset_thing_position(w, id);

    let mo = &mut w.mobjs[id];
    let (oldx, oldy) = (mo.x, mo.y);
    mo.floorz = result.floorz;
    mo.ceilingz = result.ceilingz;
    mo.x = x;
    mo.y = y;
    let flags = mo.flags;

    set_thing_position(w, id);

    // if any special lines were hit, do the effect
    if !flags.intersects(MobjFlags::TELEPORT | MobjFlags::NOCLIP) {
        for &ld in result.spechit.iter().rev() {
            // see if the line was crossed
            let Some(mo) = w.mobjs.get(id) else {
                break;
            };
            let line = &w.level.lines[ld];
            let side = point_on_line_side(mo.x, mo.y, line);
            let oldside = point_on_line_side(oldx, oldy, line);
            if side != oldside && line.special != 0 {
                cross_special_line(w, ld, oldside, id);
            }
        }
    }

    result.ok = true;
    result
}

/// Takes a valid thing and adjusts the thing->floorz,
/// thing->ceilingz, and possibly thing->z.
/// This is called for all nearby monsters
/// whenever a sector changes height.
/// If the thing doesn't fit,
/// the z will be set to the lowest value
/// and false will be returned.
pub fn thing_height_clip(w: &mut World, id: MobjId) -> bool {
    let mo = &w.mobjs[id];
    let onfloor = mo.z == mo.floorz;
    let (x, y) = (mo.x, mo.y);

    let st = check_position(w, id, x, y);
    // what about stranding a monster partially off an edge?

    let Some(mo) = w.mobjs.get_mut(id) else {
        return true;
    };
    mo.floorz = st.floorz;
    mo.ceilingz = st.ceilingz;

    if onfloor {
        // walking monsters rise and fall with the floor
        mo.z = mo.floorz;
    } else {
        // don't adjust a floating monster unless forced to
        if mo.z + mo.height > mo.ceilingz {
            mo.z = mo.ceilingz - mo.height;
        }
    }

    mo.ceilingz - mo.floorz >= mo.height
}

// ============================================================
// Slide move
// Allows the player to slide along any angled walls.
// ============================================================

struct Slide {
    mo: MobjId,
    bestslidefrac: Fixed,
    bestslideline: Option<usize>,
    tmxmove: Fixed,
    tmymove: Fixed,
}

/// Adjusts the xmove / ymove
/// so that the next move will slide along the wall.
fn hit_slide_line(w: &World, s: &mut Slide, ld: usize) {
    let line = &w.level.lines[ld];
    if line.slopetype == SlopeType::Horizontal {
        s.tmymove = 0;
        return;
    }

    if line.slopetype == SlopeType::Vertical {
        s.tmxmove = 0;
        return;
    }

    let mo = &w.mobjs[s.mo];
    let side = point_on_line_side(mo.x, mo.y, line);

    let mut lineangle = point_to_angle(line.dx, line.dy);

    if side == 1 {
        lineangle = lineangle.wrapping_add(ANG180);
    }

    let moveangle = point_to_angle(s.tmxmove, s.tmymove);
    let mut deltaangle = moveangle.wrapping_sub(lineangle);

    if deltaangle > ANG180 {
        deltaangle = deltaangle.wrapping_add(ANG180);
    }
    //  I_Error ("SlideLine: ang>ANG180");

    let lineangle = (lineangle >> ANGLETOFINESHIFT) as usize;
    let deltaangle = (deltaangle >> ANGLETOFINESHIFT) as usize;

    let movelen = aprox_distance(s.tmxmove, s.tmymove);
    let newlen = fixed_mul(movelen, finecosine(deltaangle));

    s.tmxmove = fixed_mul(newlen, finecosine(lineangle));
    s.tmymove = fixed_mul(newlen, finesine(lineangle));
}

fn slide_traverse(w: &World, s: &mut Slide, ic: &Intercept) -> bool {
    let InterceptKind::Line(ld) = ic.kind else {
        return true;
    };
    let li = &w.level.lines[ld];
    let mo = &w.mobjs[s.mo];

    let blocking = if !li.flags.contains(LineFlags::TWOSIDED) {
        if point_on_line_side(mo.x, mo.y, li) != 0 {
            // don't hit the back side
            return true;
        }
        true
    } else {
        // set openrange, opentop, openbottom
        let open = line_opening(&w.level, ld);
        open.range < mo.height // doesn't fit
            || open.top - mo.z < mo.height // mobj is too high
            || open.bottom - mo.z > 24 * FRACUNIT // too big a step up
    };

    if !blocking {
        // this line doesn't block movement
        return true;
    }

    // the line does block movement,
    // see if it is closer than best so far
    if ic.frac < s.bestslidefrac {
        s.bestslidefrac = ic.frac;
        s.bestslideline = Some(ld);
    }

    false // stop
}

fn stairstep(w: &mut World, id: MobjId) {
    let mo = &w.mobjs[id];
    let (x, y, momx, momy) = (mo.x, mo.y, mo.momx, mo.momy);
    if !try_move(w, id, x, y + momy).ok {
        try_move(w, id, x + momx, y);
    }
}

/// The momx / momy move is bad, so try to slide
/// along a wall.
/// Find the first line hit, move flush to it,
/// and slide along it
///
/// This is a kludgy mess.
pub fn slide_move(w: &mut World, id: MobjId) {
    let mut hitcount = 0;

    loop {
        if !w.mobjs.contains(id) {
            return;
        }
        hitcount += 1;
        if hitcount == 3 {
            stairstep(w, id); // don't loop forever
            return;
        }

        // trace along the three leading corners
        let mo = &w.mobjs[id];
        let (leadx, trailx) = if mo.momx > 0 {
            (mo.x + mo.radius, mo.x - mo.radius)
        } else {
            (mo.x - mo.radius, mo.x + mo.radius)
        };
        let (leady, traily) = if mo.momy > 0 {
            (mo.y + mo.radius, mo.y - mo.radius)
        } else {
            (mo.y - mo.radius, mo.y + mo.radius)
        };
        let (momx, momy) = (mo.momx, mo.momy);

        let mut s = Slide {
            mo: id,
            bestslidefrac: FRACUNIT + 1,
            bestslideline: None,
            tmxmove: 0,
            tmymove: 0,
        };

        for (sx, sy) in [(leadx, leady), (trailx, leady), (leadx, traily)] {
            path_traverse(w, sx, sy, sx + momx, sy + momy, PT_ADDLINES, |w, ic, _| {
                slide_traverse(w, &mut s, ic)
            });
        }

        // move up to the wall
        let Some(bestline) = s.bestslideline.filter(|_| s.bestslidefrac != FRACUNIT + 1) else {
            // the move most have hit the middle, so stairstep
            stairstep(w, id);
            return;
        };

        // fudge a bit to make sure it doesn't hit
        s.bestslidefrac -= 0x800;
        if s.bestslidefrac > 0 {
            let newx = fixed_mul(momx, s.bestslidefrac);
            let newy = fixed_mul(momy, s.bestslidefrac);
            let mo = &w.mobjs[id];
            let (x, y) = (mo.x, mo.y);
            if !try_move(w, id, x + newx, y + newy).ok {
                stairstep(w, id);
                return;
            }
        }

        // Now continue along the wall.
        // First calculate remainder.
        s.bestslidefrac = FRACUNIT - (s.bestslidefrac + 0x800);

        if s.bestslidefrac > FRACUNIT {
            s.bestslidefrac = FRACUNIT;
        }

        if s.bestslidefrac <= 0 {
            return;
        }

        s.tmxmove = fixed_mul(momx, s.bestslidefrac);
        s.tmymove = fixed_mul(momy, s.bestslidefrac);

        if !w.mobjs.contains(id) {
            return;
        }
        hit_slide_line(w, &mut s, bestline); // clip the moves

        let mo = &mut w.mobjs[id];
        mo.momx = s.tmxmove;
        mo.momy = s.tmymove;
        let (x, y) = (mo.x, mo.y);

        if try_move(w, id, x + s.tmxmove, y + s.tmymove).ok {
            return;
        }
        // goto retry
    }
}

// ============================================================
// Aiming and shooting
// ============================================================

struct Aim {
    shootthing: MobjId,
    shootz: Fixed,
    attackrange: Fixed,
    topslope: Fixed,
    bottomslope: Fixed,
    aimslope: Fixed,
    linetarget: Option<MobjId>,
}

/// Sets linetaget and aimslope when a target is aimed at.
fn aim_traverse(w: &World, a: &mut Aim, ic: &Intercept) -> bool {
    match ic.kind {
        InterceptKind::Line(ld) => {
            let li = &w.level.lines[ld];

            if !li.flags.contains(LineFlags::TWOSIDED) {
                return false; // stop
            }

            // Crosses a two sided line.
            // A two sided line will restrict
            // the possible target ranges.
            let open = line_opening(&w.level, ld);

            if open.bottom >= open.top {
                return false; // stop
            }

            let dist = fixed_mul(a.attackrange, ic.frac);
            let front = &w.level.sectors[li.frontsector];
            let Some(back) = li.backsector.map(|b| &w.level.sectors[b]) else {
                return false;
            };

            if front.floorheight != back.floorheight {
                let slope = fixed_div(open.bottom - a.shootz, dist);
                if slope > a.bottomslope {
                    a.bottomslope = slope;
                }
            }

            if front.ceilingheight != back.ceilingheight {
                let slope = fixed_div(open.top - a.shootz, dist);
                if slope < a.topslope {
                    a.topslope = slope;
                }
            }

            if a.topslope <= a.bottomslope {
                return false; // stop
            }

            true // shot continues
        }
        InterceptKind::Thing(t) => {
            // shoot a thing
            if t == a.shootthing {
                return true; // can't shoot self
            }
            let th = &w.mobjs[t];

            if !th.flags.contains(MobjFlags::SHOOTABLE) {
                return true; // corpse or something
            }

            // check angles to see if the thing can be aimed at
            let dist = fixed_mul(a.attackrange, ic.frac);
            let mut thingtopslope = fixed_div(th.z + th.height - a.shootz, dist);

            if thingtopslope < a.bottomslope {
                return true; // shot over the thing
            }

            let mut thingbottomslope = fixed_div(th.z - a.shootz, dist);

            if thingbottomslope > a.topslope {
                return true; // shot under the thing
            }

            // this thing can be hit!
            if thingtopslope > a.topslope {
                thingtopslope = a.topslope;
            }

            if thingbottomslope < a.bottomslope {
                thingbottomslope = a.bottomslope;
            }

            a.aimslope = (thingtopslope + thingbottomslope) / 2;
            a.linetarget = Some(t);

            false // don't go any farther
        }
    }
}

/// Finds the slope to the first shootable thing along `angle`, and the
/// thing itself. The slope is 0 when nothing is found.
pub fn aim_line_attack(w: &mut World, t1: MobjId, angle: Angle, distance: Fixed) -> (Fixed, Option<MobjId>) {
    let mo = &w.mobjs[t1];
    let fine = fine_index(angle);
    let (x, y) = (mo.x, mo.y);
    let x2 = x + (distance >> FRACBITS) * finecosine(fine);
    let y2 = y + (distance >> FRACBITS) * finesine(fine);

    // can't shoot outside view angles
    let mut a = Aim {
        shootthing: t1,
        shootz: mo.z + (mo.height >> 1) + 8 * FRACUNIT,
        attackrange: distance,
        topslope: 100 * FRACUNIT / 160,
        bottomslope: -100 * FRACUNIT / 160,
        aimslope: 0,
        linetarget: None,
    };

    path_traverse(w, x, y, x2, y2, PT_ADDLINES | PT_ADDTHINGS, |w, ic, _| aim_traverse(w, &mut a, ic));

    if a.linetarget.is_some() {
        return (a.aimslope, a.linetarget);
    }
    (0, None)
}

struct Shot {
    shootthing: MobjId,
    shootz: Fixed,
    attackrange: Fixed,
    aimslope: Fixed,
    damage: i32,
}

fn shoot_traverse(w: &mut World, s: &Shot, ic: &Intercept, trace: &Divline) -> bool {
    match ic.kind {
        InterceptKind::Line(ld) => {
            if w.level.lines[ld].special != 0 {
                shoot_special_line(w, s.shootthing, ld);
            }

            let li = &w.level.lines[ld];
            let passes = li.flags.contains(LineFlags::TWOSIDED) && {
                // crosses a two sided line
                let open = line_opening(&w.level, ld);
                let dist = fixed_mul(s.attackrange, ic.frac);
                let front = &w.level.sectors[li.frontsector];
                match li.backsector.map(|b| &w.level.sectors[b]) {
                    Some(back) => {
                        !(front.floorheight != back.floorheight
                            && fixed_div(open.bottom - s.shootz, dist) > s.aimslope)
                            && !(front.ceilingheight != back.ceilingheight
                                && fixed_div(open.top - s.shootz, dist) < s.aimslope)
                    }
                    None => false,
                }
            };
            if passes {
                // shot continues
                return true;
            }

            // hit line
            // position a bit closer
            let frac = ic.frac - fixed_div(4 * FRACUNIT, s.attackrange);
            let x = trace.x + fixed_mul(trace.dx, frac);
            let y = trace.y + fixed_mul(trace.dy, frac);
            let z = s.shootz + fixed_mul(s.aimslope, fixed_mul(frac, s.attackrange));

            let front = &w.level.sectors[li.frontsector];
            if front.ceilingpic == w.skyflatnum {
                // don't shoot the sky!
                if z > front.ceilingheight {
                    return false;
                }

                // it's a sky hack wall
                if li
                    .backsector
                    .is_some_and(|b| w.level.sectors[b].ceilingpic == w.skyflatnum)
                {
                    return false;
                }
            }

            // Spawn bullet puffs.
            spawn_puff(w, x, y, z, s.attackrange);

            // don't go any farther
            false
        }
        InterceptKind::Thing(t) => {
            // shoot a thing
            if t == s.shootthing {
                return true; // can't shoot self
            }
            let th = &w.mobjs[t];

            if !th.flags.contains(MobjFlags::SHOOTABLE) {
                return true; // corpse or something
            }

            // check angles to see if the thing can be aimed at
            let dist = fixed_mul(s.attackrange, ic.frac);
            let thingtopslope = fixed_div(th.z + th.height - s.shootz, dist);

            if thingtopslope < s.aimslope {
                return true; // shot over the thing
            }

            let thingbottomslope = fixed_div(th.z - s.shootz, dist);

            if thingbottomslope > s.aimslope {
                return true; // shot under the thing
            }

            // hit thing
            // position a bit closer
            let frac = ic.frac - fixed_div(10 * FRACUNIT, s.attackrange);

            let x = trace.x + fixed_mul(trace.dx, frac);
            let y = trace.y + fixed_mul(trace.dy, frac);
            let z = s.shootz + fixed_mul(s.aimslope, fixed_mul(frac, s.attackrange));

            // Spawn bullet puffs or blod spots,
            // depending on target type.
            if th.flags.contains(MobjFlags::NOBLOOD) {
                spawn_puff(w, x, y, z, s.attackrange);
            } else {
                spawn_blood(w, x, y, z, s.damage);
            }

            if s.damage != 0 {
                damage_mobj(w, t, Some(s.shootthing), Some(s.shootthing), s.damage);
            }

            // don't go any farther
            false
        }
    }
}

/// If damage == 0, it is just a test trace
/// that will leave linetarget set.
pub fn line_attack(w: &mut World, t1: MobjId, angle: Angle, distance: Fixed, slope: Fixed, damage: i32) {
    let Some(mo) = w.mobjs.get(t1) else {
        return;
    };
    let fine = fine_index(angle);
    let (x, y) = (mo.x, mo.y);
    let x2 = x + (distance >> FRACBITS) * finecosine(fine);
    let y2 = y + (distance >> FRACBITS) * finesine(fine);
    let shot = Shot {
        shootthing: t1,
        shootz: mo.z + (mo.height >> 1) + 8 * FRACUNIT,
        attackrange: distance,
        aimslope: slope,
        damage,
    };

    path_traverse(w, x, y, x2, y2, PT_ADDLINES | PT_ADDTHINGS, |w, ic, trace| {
        shoot_traverse(w, &shot, ic, trace)
    });
}

// ============================================================
// Use lines
// ============================================================

fn use_traverse(w: &mut World, usething: MobjId, ic: &Intercept) -> bool {
    let InterceptKind::Line(ld) = ic.kind else {
        return true;
    };

    if w.level.lines[ld].special == 0 {
        let open = line_opening(&w.level, ld);
        if open.range <= 0 {
            w.mobj_sound(usething, SfxId::noway);

            // can't use through a wall
            return false;
        }
        // not a special line, but keep checking
        return true;
    }

    let mo = &w.mobjs[usething];
    let side = point_on_line_side(mo.x, mo.y, &w.level.lines[ld]);

    use_special_line(w, usething, ld, side);

    // can't use for than one special line in a row
    false
}

/// Looks for special lines in front of the player to activate.
pub fn use_lines(w: &mut World, player: usize) {
    let Some(id) = w.players[player].mo else {
        return;
    };
    let mo = &w.mobjs[id];
    let fine = fine_index(mo.angle);

    let (x1, y1) = (mo.x, mo.y);
    let x2 = x1 + (USERANGE >> FRACBITS) * finecosine(fine);
    let y2 = y1 + (USERANGE >> FRACBITS) * finesine(fine);

    path_traverse(w, x1, y1, x2, y2, PT_ADDLINES, |w, ic, _| use_traverse(w, id, ic));
}

// ============================================================
// Radius attack
// ============================================================

struct Bomb {
    spot: MobjId,
    source: Option<MobjId>,
    damage: i32,
}

/// "bombsource" is the creature
/// that caused the explosion at "bombspot".
fn radius_attack_thing(w: &mut World, b: &Bomb, thing: MobjId) -> bool {
    let th = &w.mobjs[thing];
    if !th.flags.contains(MobjFlags::SHOOTABLE) {
        return true;
    }

    // Boss spider and cyborg
    // take no damage from concussion.
    if th.kind == MobjType::MT_CYBORG || th.kind == MobjType::MT_SPIDER {
        return true;
    }

    let Some(spot) = w.mobjs.get(b.spot) else {
        return false;
    };
    let dx = (th.x - spot.x).abs();
    let dy = (th.y - spot.y).abs();

    let dist = ((dx.max(dy) - th.radius) >> FRACBITS).max(0);

    if dist >= b.damage {
        return true; // out of range
    }

    if check_sight(w, thing, b.spot) {
        // must be in direct path
        damage_mobj(w, thing, Some(b.spot), b.source, b.damage - dist);
    }

    true
}

/// Source is the creature that caused the explosion at spot.
pub fn radius_attack(w: &mut World, spot: MobjId, source: Option<MobjId>, damage: i32) {
    let Some(mo) = w.mobjs.get(spot) else {
        return;
    };
    let dist = damage << FRACBITS;
    let bm = &w.level.blockmap;
    let yh = (mo.y + dist - bm.orgy) >> MAPBLOCKSHIFT;
    let yl = (mo.y - dist - bm.orgy) >> MAPBLOCKSHIFT;
    let xh = (mo.x + dist - bm.orgx) >> MAPBLOCKSHIFT;
    let xl = (mo.x - dist - bm.orgx) >> MAPBLOCKSHIFT;
    let bomb = Bomb { spot, source, damage };

    for y in yl..=yh {
        for x in xl..=xh {
            block_things_iterator(w, x, y, |w, th| radius_attack_thing(w, &bomb, th));
        }
    }
}

// ============================================================
// Sector height changing
// After modifying a sectors floor or ceiling height,
// call this routine to adjust the positions
// of all things that touch the sector.
//
// If anything doesn't fit anymore, true will be returned.
// If crunch is true, they will take damage
//  as they are being crushed.
// If Crunch is false, you should set the sector height back
//  the way it was and call change_sector again
//  to undo the changes.
// ============================================================

fn change_sector_thing(w: &mut World, crunch: bool, nofit: &mut bool, thing: MobjId) -> bool {
    if thing_height_clip(w, thing) {
        // keep checking
        return true;
    }

    let th = &mut w.mobjs[thing];

    // crunch bodies to giblets
    if th.health <= 0 {
        th.flags.remove(MobjFlags::SOLID);
        th.height = 0;
        th.radius = 0;
        set_mobj_state(w, thing, StateNum::S_GIBS);

        // keep checking
        return true;
    }

    // crunch dropped items
    if th.flags.contains(MobjFlags::DROPPED) {
        remove_mobj(w, thing);

        // keep checking
        return true;
    }

    if !th.flags.contains(MobjFlags::SHOOTABLE) {
        // assume it is bloody gibs or something
        return true;
    }

    *nofit = true;

    if crunch && (w.leveltime & 3) == 0 {
        damage_mobj(w, thing, None, None, 10);

        // spray blood in a random direction
        if let Some(th) = w.mobjs.get(thing) {
            let (x, y, z) = (th.x, th.y, th.z + th.height / 2);
            let mo = spawn_mobj(w, x, y, z, MobjType::MT_BLOOD);
            let momx = w.p_subrandom() << 12;
            let momy = w.p_subrandom() << 12;
            let mo = &mut w.mobjs[mo];
            mo.momx = momx;
            mo.momy = momy;
        }
    }

    // keep checking (crush other things)
    true
}

/// Re-clips every thing in the sector's blocks. Returns true when
/// something no longer fits.
pub fn change_sector(w: &mut World, sector: usize, crunch: bool) -> bool {
    let mut nofit = false;
    let bb = w.level.sectors[sector].blockbox;

    // re-check heights for all things near the moving sector
    for x in bb[BOXLEFT]..=bb[BOXRIGHT] {
        for y in bb[BOXBOTTOM]..=bb[BOXTOP] {
            block_things_iterator(w, x, y, |w, th| change_sector_thing(w, crunch, &mut nofit, th));
        }
    }

    nofit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_world, test_world_with_player};

    #[test]
    fn test_check_position_open_floor() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let st = check_position(&mut w, id, 120 * FRACUNIT, 100 * FRACUNIT);
        assert!(st.ok);
        assert_eq!(st.floorz, 0);
        assert_eq!(st.ceilingz, 128 * FRACUNIT);
    }

    #[test]
    fn test_solid_things_block() {
        let mut w = test_world();
        let a = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        spawn_mobj(&mut w, 150 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        assert!(!try_move(&mut w, a, 120 * FRACUNIT, 100 * FRACUNIT).ok);
        assert_eq!(w.mobjs[a].x, 100 * FRACUNIT);
        assert!(try_move(&mut w, a, 105 * FRACUNIT, 100 * FRACUNIT).ok);
        assert_eq!(w.mobjs[a].x, 105 * FRACUNIT);
    }

    #[test]
    fn test_step_height_limit() {
        let mut w = test_world();
        w.level.sectors[1].floorheight = 32 * FRACUNIT;
        let id = spawn_mobj(&mut w, 230 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        assert!(!try_move(&mut w, id, 260 * FRACUNIT, 100 * FRACUNIT).ok);

        w.level.sectors[1].floorheight = 24 * FRACUNIT;
        let st = try_move(&mut w, id, 260 * FRACUNIT, 100 * FRACUNIT);
        assert!(st.ok);
        assert_eq!(w.mobjs[id].floorz, 24 * FRACUNIT);
    }

    #[test]
    fn test_aim_finds_monster() {
        let mut w = test_world_with_player();
        let player = w.players[0].mo.unwrap();
        let imp = spawn_mobj(&mut w, 300 * FRACUNIT, 256 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let (slope, target) = aim_line_attack(&mut w, player, 0, MISSILERANGE);
        assert_eq!(target, Some(imp));
        assert!(slope.abs() < FRACUNIT);
    }

    #[test]
    fn test_line_attack_damages() {
        let mut w = test_world_with_player();
        let player = w.players[0].mo.unwrap();
        let imp = spawn_mobj(&mut w, 300 * FRACUNIT, 256 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let (slope, _) = aim_line_attack(&mut w, player, 0, MISSILERANGE);
        line_attack(&mut w, player, 0, MISSILERANGE, slope, 10);
        assert_eq!(w.mobjs[imp].health, 50);
        assert!(w.mobjs.iter().any(|m| m.kind == MobjType::MT_BLOOD));
    }

    #[test]
    fn test_radius_attack_falls_off() {
        let mut w = test_world();
        let spot = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_ROCKET);
        let near = spawn_mobj(&mut w, 140 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_SERGEANT);
        let far = spawn_mobj(&mut w, 100 * FRACUNIT, 400 * FRACUNIT, ONFLOORZ, MobjType::MT_SERGEANT);
        radius_attack(&mut w, spot, None, 128);
        // 40 units away, minus a 30 unit radius
        assert_eq!(w.mobjs[near].health, 150 - 118);
        assert_eq!(w.mobjs[far].health, 150);
    }

    #[test]
    fn test_crushing_ceiling_gibs_corpse() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        w.mobjs[id].health = 0;
        w.level.sectors[0].ceilingheight = 20 * FRACUNIT;
        let nofit = change_sector(&mut w, 0, true);
        assert!(!nofit);
        assert_eq!(w.mobjs[id].state, StateNum::S_GIBS);
        assert_eq!(w.mobjs[id].height, 0);
    }

    #[test]
    fn test_live_thing_does_not_fit() {
        let mut w = test_world();
        let id = spawn_mobj(&mut w, 100 * FRACUNIT, 100 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        w.level.sectors[0].ceilingheight = 20 * FRACUNIT;
        w.leveltime = 1;
        assert!(change_sector(&mut w, 0, false));
        assert_eq!(w.mobjs[id].health, 60);
    }

    #[test]
    fn test_use_wall_says_noway() {
        let mut w = test_world_with_player();
        let id = w.players[0].mo.unwrap();
        // face the left wall from close by
        w.mobjs[id].angle = ANG180;
        unset_thing_position(&mut w, id);
        w.mobjs[id].x = 40 * FRACUNIT;
        set_thing_position(&mut w, id);
        w.sounds.clear();
        use_lines(&mut w, 0);
        assert!(w.sounds.iter().any(|s| s.sfx == SfxId::noway));
    }
}
