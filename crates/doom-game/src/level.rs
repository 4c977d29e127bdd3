// level.rs - Level geometry: vertices, sectors, sides, lines, BSP

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

use doom_common::bbox::BBox;
use doom_common::fixed::{fixed_mul, Fixed, FRACBITS};
use doom_common::tables::Angle;
use doom_common::wadfiles::{LineFlags, MapThing};

use crate::blockmap::{Blockmap, Reject};
use crate::world::MobjId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vertex {
    pub x: Fixed,
    pub y: Fixed,
}

/// The sector is the basic unit of height and lighting. Everything in
/// here may change during play.
#[derive(Debug, Clone, Default)]
pub struct Sector {
    pub floorheight: Fixed,
    pub ceilingheight: Fixed,
    pub floorpic: usize,
    pub ceilingpic: usize,
    pub lightlevel: i32,
    pub special: i32,
    pub tag: i32,

    /// 0 = untraversed, 1,2 = sndlines - 1
    pub soundtraversed: i32,
    /// Thing that made a sound (or null).
    pub soundtarget: Option<MobjId>,

    /// Mapblock bounding box for height changes.
    pub blockbox: [i32; 4],
    /// Origin for any sounds played by the sector.
    pub soundorg: (Fixed, Fixed),

    /// If == validcount, already checked.
    pub validcount: i32,

    /// Things standing in the sector, newest last.
    pub things: Vec<MobjId>,

    /// Active floor, ceiling or door mover, if any.
    pub specialdata: Option<crate::world::ThinkerId>,

    /// Lines bounding the sector.
    pub lines: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Side {
    /// Add this to the calculated texture column.
    pub textureoffset: Fixed,
    /// Add this to the calculated texture top.
    pub rowoffset: Fixed,
    /// Texture indices. 0 means no texture.
    pub toptexture: usize,
    pub bottomtexture: usize,
    pub midtexture: usize,
    pub sector: usize,
}

/// Move clipping aid for lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlopeType {
    #[default]
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

#[derive(Debug, Clone, Default)]
pub struct Line {
    pub v1: Vertex,
    pub v2: Vertex,
    /// Precalculated v2 - v1 for side checking.
    pub dx: Fixed,
    pub dy: Fixed,
    pub flags: LineFlags,
    pub special: i32,
    pub tag: i32,
    /// Front and back sidedef.
    pub sidenum: [Option<usize>; 2],
    pub bbox: BBox,
    pub slopetype: SlopeType,
    pub frontsector: usize,
    pub backsector: Option<usize>,
    /// If == validcount, already checked.
    pub validcount: i32,
}

impl Line {
    pub fn is_two_sided(&self) -> bool {
        self.flags.contains(LineFlags::TWOSIDED)
    }
}

/// A piece of a line bounding a subsector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Seg {
    pub v1: Vertex,
    pub v2: Vertex,
    pub offset: Fixed,
    pub angle: Angle,
    pub sidedef: usize,
    pub linedef: usize,
    pub frontsector: usize,
    /// Only set for two sided lines.
    pub backsector: Option<usize>,
}

/// A convex polygon of segs, the leaves of the BSP tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubSector {
    pub sector: usize,
    pub numlines: usize,
    pub firstline: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeChild {
    Node(usize),
    Subsector(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Node {
    /// Partition line.
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
    /// Bounding box for each child.
    pub bbox: [BBox; 2],
    pub children: [NodeChild; 2],
}

impl Node {
    /// Which side of the partition a point is on: 0 front (right), 1 back.
    pub fn point_on_side(&self, x: Fixed, y: Fixed) -> usize {
        if self.dx == 0 {
            if x <= self.x {
                return (self.dy > 0) as usize;
            }
            return (self.dy < 0) as usize;
        }
        if self.dy == 0 {
            if y <= self.y {
                return (self.dx < 0) as usize;
            }
            return (self.dx > 0) as usize;
        }

        let dx = x - self.x;
        let dy = y - self.y;

        // try to quickly decide by looking at sign bits
        if ((self.dy ^ self.dx ^ dx ^ dy) as u32) & 0x8000_0000 != 0 {
            if ((self.dy ^ dx) as u32) & 0x8000_0000 != 0 {
                // left is negative
                return 1;
            }
            return 0;
        }

        let left = fixed_mul(self.dy >> FRACBITS, dx);
        let right = fixed_mul(dy, self.dx >> FRACBITS);
        if right < left {
            // front side
            0
        } else {
            1
        }
    }
}

/// Everything loaded from a map's lumps.
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub name: String,
    pub vertexes: Vec<Vertex>,
    pub sectors: Vec<Sector>,
    pub sides: Vec<Side>,
    pub lines: Vec<Line>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<SubSector>,
    pub nodes: Vec<Node>,
    pub blockmap: Blockmap,
    pub reject: Reject,
    /// Map things as loaded, spawned after the world is built.
    pub things: Vec<MapThing>,
}

impl Level {
    /// Subsector containing a point. A map without nodes is a single
    /// subsector.
    pub fn point_in_subsector(&self, x: Fixed, y: Fixed) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut child = NodeChild::Node(self.nodes.len() - 1);
        loop {
            match child {
                NodeChild::Subsector(s) => return s,
                NodeChild::Node(n) => {
                    let node = &self.nodes[n];
                    child = node.children[node.point_on_side(x, y)];
                }
            }
        }
    }

    #[inline]
    pub fn sector_at(&self, x: Fixed, y: Fixed) -> usize {
        self.subsectors[self.point_in_subsector(x, y)].sector
    }

    /// Sector on the other side of line `line` from `sec`, if two sided.
    pub fn get_next_sector(&self, line: usize, sec: usize) -> Option<usize> {
        let l = &self.lines[line];
        if !l.is_two_sided() {
            return None;
        }
        if l.frontsector == sec {
            return l.backsector;
        }
        Some(l.frontsector)
    }

    /// Side `side` (0 or 1) of the `line`th line of sector `sec`.
    pub fn get_side(&self, sec: usize, line: usize, side: usize) -> Option<&Side> {
        let l = self.sectors[sec].lines[line];
        self.lines[l].sidenum[side].map(|s| &self.sides[s])
    }

    /// Sector on `side` of a line.
    pub fn side_sector(&self, line: usize, side: usize) -> Option<usize> {
        self.lines[line].sidenum[side].map(|s| self.sides[s].sector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doom_common::fixed::FRACUNIT;

    fn vertical_node() -> Node {
        Node {
            x: 256 * FRACUNIT,
            y: 0,
            dx: 0,
            dy: 512 * FRACUNIT,
            bbox: [[0; 4]; 2],
            children: [NodeChild::Subsector(1), NodeChild::Subsector(0)],
        }
    }

    #[test]
    fn test_point_on_side_axis_aligned() {
        let node = vertical_node();
        assert_eq!(node.point_on_side(300 * FRACUNIT, 10 * FRACUNIT), 0);
        assert_eq!(node.point_on_side(100 * FRACUNIT, 10 * FRACUNIT), 1);
    }

    #[test]
    fn test_point_on_side_diagonal() {
        let node = Node {
            x: 0,
            y: 0,
            dx: 64 * FRACUNIT,
            dy: 64 * FRACUNIT,
            bbox: [[0; 4]; 2],
            children: [NodeChild::Subsector(0), NodeChild::Subsector(1)],
        };
        // right of a line heading north-east
        assert_eq!(node.point_on_side(32 * FRACUNIT, 0), 0);
        assert_eq!(node.point_on_side(0, 32 * FRACUNIT), 1);
    }

    #[test]
    fn test_point_in_subsector() {
        let level = Level {
            nodes: vec![vertical_node()],
            ..Default::default()
        };
        assert_eq!(level.point_in_subsector(400 * FRACUNIT, 5 * FRACUNIT), 1);
        assert_eq!(level.point_in_subsector(5 * FRACUNIT, 5 * FRACUNIT), 0);
        assert_eq!(Level::default().point_in_subsector(0, 0), 0);
    }
}
