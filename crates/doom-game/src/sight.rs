// sight.rs - Line of sight checking

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

use doom_common::fixed::{fixed_div, Fixed, FRACBITS};
use doom_common::wadfiles::LineFlags;

use crate::level::{Level, Node, NodeChild};
use crate::maputl::{intercept_vector, Divline};
use crate::world::{MobjId, World};

struct SightTrace {
    /// From t1 to t2.
    strace: Divline,
    t2x: Fixed,
    t2y: Fixed,
    /// Eye z of looker.
    sightzstart: Fixed,
    /// Slopes to top and bottom of target.
    topslope: Fixed,
    bottomslope: Fixed,
    validcount: i32,
}

/// Returns side 0 (front), 1 (back), or 2 (on).
fn divline_side(x: Fixed, y: Fixed, node: &Divline) -> usize {
    if node.dx == 0 {
        if x == node.x {
            return 2;
        }
        if x <= node.x {
            return (node.dy > 0) as usize;
        }
        return (node.dy < 0) as usize;
    }

    if node.dy == 0 {
        // compares x against the partition y, as the original engine did
        if x == node.y {
            return 2;
        }
        if y <= node.y {
            return (node.dx < 0) as usize;
        }
        return (node.dx > 0) as usize;
    }

    let dx = x - node.x;
    let dy = y - node.y;

    let left = (node.dy >> FRACBITS) * (dx >> FRACBITS);
    let right = (dy >> FRACBITS) * (node.dx >> FRACBITS);

    if right < left {
        return 0; // front side
    }
    if left == right {
        return 2;
    }
    1 // back side
}

fn node_divline(node: &Node) -> Divline {
    Divline {
        x: node.x,
        y: node.y,
        dx: node.dx,
        dy: node.dy,
    }
}

impl SightTrace {
    /// Returns true if strace crosses the given subsector successfully.
    fn cross_subsector(&mut self, level: &mut Level, num: usize) -> bool {
        let sub = level.subsectors[num];

        // check lines
        for segnum in sub.firstline..sub.firstline + sub.numlines {
            let seg = level.segs[segnum];
            let line = &mut level.lines[seg.linedef];

            // allready checked other side?
            if line.validcount == self.validcount {
                continue;
            }
            line.validcount = self.validcount;

            let v1 = line.v1;
            let v2 = line.v2;
            let s1 = divline_side(v1.x, v1.y, &self.strace);
            let s2 = divline_side(v2.x, v2.y, &self.strace);

            // line isn't crossed?
            if s1 == s2 {
                continue;
            }

            let divl = Divline {
                x: v1.x,
                y: v1.y,
                dx: v2.x - v1.x,
                dy: v2.y - v1.y,
            };
            let s1 = divline_side(self.strace.x, self.strace.y, &divl);
            let s2 = divline_side(self.t2x, self.t2y, &divl);

            // line isn't crossed?
            if s1 == s2 {
                continue;
            }

            // stop because it is not two sided anyway
            // might do this after updating validcount?
            if !line.flags.contains(LineFlags::TWOSIDED) {
                return false;
            }

            // crosses a two sided line
            let front = &level.sectors[seg.frontsector];
            let Some(back) = seg.backsector.map(|b| &level.sectors[b]) else {
                return false;
            };

            // no wall to block sight with?
            if front.floorheight == back.floorheight && front.ceilingheight == back.ceilingheight {
                continue;
            }

            // possible occluder
            // because of ceiling height differences
            let opentop = front.ceilingheight.min(back.ceilingheight);

            // because of ceiling height differences
            let openbottom = front.floorheight.max(back.floorheight);

            // quick test for totally closed doors
            if openbottom >= opentop {
                return false; // stop
            }

            let frac = intercept_vector(&self.strace, &divl);

            if front.floorheight != back.floorheight {
                let slope = fixed_div(openbottom - self.sightzstart, frac);
                if slope > self.bottomslope {
                    self.bottomslope = slope;
                }
            }

            if front.ceilingheight != back.ceilingheight {
                let slope = fixed_div(opentop - self.sightzstart, frac);
                if slope < self.topslope {
                    self.topslope = slope;
                }
            }

            if self.topslope <= self.bottomslope {
                return false; // stop
            }
        }

        // passed the subsector ok
        true
    }

    /// Returns true if strace crosses the given node successfully.
    fn cross_bsp_node(&mut self, level: &mut Level, child: NodeChild) -> bool {
        let bspnum = match child {
            NodeChild::Subsector(s) => return self.cross_subsector(level, s),
            NodeChild::Node(n) => n,
        };

        let bsp = node_divline(&level.nodes[bspnum]);
        let children = level.nodes[bspnum].children;

        // decide which side the start point is on
        let mut side = divline_side(self.strace.x, self.strace.y, &bsp);
        if side == 2 {
            side = 0; // an "on" should cross both sides
        }

        // cross the starting side
        if !self.cross_bsp_node(level, children[side]) {
            return false;
        }

        // the partition plane is crossed here
        if side == divline_side(self.t2x, self.t2y, &bsp) {
            // the line doesn't touch the other side
            return true;
        }

        // cross the ending side
        self.cross_bsp_node(level, children[side ^ 1])
    }
}

/// Returns true
///  if a straight line between t1 and t2 is unobstructed.
/// Uses REJECT.
pub fn check_sight(w: &mut World, t1: MobjId, t2: MobjId) -> bool {
    let (Some(a), Some(b)) = (w.mobjs.get(t1), w.mobjs.get(t2)) else {
        return false;
    };

    // First check for trivial rejection.

    // Determine subsector entries in REJECT table.
    let s1 = w.level.subsectors[a.subsector].sector;
    let s2 = w.level.subsectors[b.subsector].sector;

    // Check in REJECT table.
    if w.level.reject.rejects(s1, s2) {
        // can't possibly be connected
        return false;
    }

    // An unobstructed LOS is possible.
    // Now look from eyes of t1 to any part of t2.
    let sightzstart = a.z + a.height - (a.height >> 2);
    let mut trace = SightTrace {
        strace: Divline {
            x: a.x,
            y: a.y,
            dx: b.x - a.x,
            dy: b.y - a.y,
        },
        t2x: b.x,
        t2y: b.y,
        sightzstart,
        topslope: (b.z + b.height) - sightzstart,
        bottomslope: b.z - sightzstart,
        validcount: 0,
    };
    trace.validcount = w.next_validcount();

    // the head node is the last node output
    let root = if w.level.nodes.is_empty() {
        NodeChild::Subsector(0)
    } else {
        NodeChild::Node(w.level.nodes.len() - 1)
    };
    trace.cross_bsp_node(&mut w.level, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::MobjType;
    use crate::local::ONFLOORZ;
    use crate::mobj::spawn_mobj;
    use crate::testutil::test_world;
    use doom_common::fixed::FRACUNIT;

    #[test]
    fn test_clear_sight_across_rooms() {
        let mut w = test_world();
        let a = spawn_mobj(&mut w, 100 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let b = spawn_mobj(&mut w, 400 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        assert!(check_sight(&mut w, a, b));
        assert!(check_sight(&mut w, b, a));
    }

    #[test]
    fn test_closed_door_blocks_sight() {
        let mut w = test_world();
        let a = spawn_mobj(&mut w, 100 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let b = spawn_mobj(&mut w, 400 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        w.level.sectors[1].ceilingheight = 0;
        assert!(!check_sight(&mut w, a, b));
    }

    #[test]
    fn test_raised_floor_hides_low_target() {
        let mut w = test_world();
        let a = spawn_mobj(&mut w, 100 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let b = spawn_mobj(&mut w, 500 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        w.level.sectors[1].floorheight = 100 * FRACUNIT;
        w.level.sectors[1].ceilingheight = 300 * FRACUNIT;
        // the ledge edge is above the whole target
        w.mobjs[b].z = 0;
        assert!(!check_sight(&mut w, a, b));
        // standing high enough to show over it
        w.mobjs[b].z = 200 * FRACUNIT;
        assert!(check_sight(&mut w, a, b));
    }

    #[test]
    fn test_reject_short_circuits() {
        let mut w = test_world();
        let a = spawn_mobj(&mut w, 100 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        let b = spawn_mobj(&mut w, 400 * FRACUNIT, 200 * FRACUNIT, ONFLOORZ, MobjType::MT_TROOP);
        // sector 0 -> sector 1 is bit 1
        w.level.reject = crate::blockmap::Reject::new(vec![0b0010], 2);
        assert!(!check_sight(&mut w, a, b));
        assert!(check_sight(&mut w, b, a));
    }
}
