// wadfiles.rs - On-disk lump record layouts

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

use bitflags::bitflags;

use crate::wad::{name_from_bytes, LumpName};

// ============================================================
// Map lump order, relative to the map marker lump
// ============================================================

pub const ML_LABEL: usize = 0;
pub const ML_THINGS: usize = 1;
pub const ML_LINEDEFS: usize = 2;
pub const ML_SIDEDEFS: usize = 3;
pub const ML_VERTEXES: usize = 4;
pub const ML_SEGS: usize = 5;
pub const ML_SSECTORS: usize = 6;
pub const ML_NODES: usize = 7;
pub const ML_SECTORS: usize = 8;
pub const ML_REJECT: usize = 9;
pub const ML_BLOCKMAP: usize = 10;

pub const MAP_LUMP_NAMES: [&str; 10] = [
    "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS",
    "REJECT", "BLOCKMAP",
];

bitflags! {
    /// Linedef flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineFlags: u16 {
        /// Solid, is an obstacle.
        const BLOCKING = 1;
        /// Blocks monsters only.
        const BLOCKMONSTERS = 2;
        /// Backside will not be present at all if not two sided.
        const TWOSIDED = 4;
        /// Upper texture unpegged.
        const DONTPEGTOP = 8;
        /// Lower texture unpegged.
        const DONTPEGBOTTOM = 16;
        /// In automap, shown as one sided.
        const SECRET = 32;
        /// Sound rendering: don't let sound cross two of these.
        const SOUNDBLOCK = 64;
        /// Don't draw on the automap at all.
        const DONTDRAW = 128;
        /// Set once seen, for the automap.
        const MAPPED = 256;
    }
}

// Thing option bits
pub const MTF_EASY: i16 = 1;
pub const MTF_NORMAL: i16 = 2;
pub const MTF_HARD: i16 = 4;
/// Deaf monsters, do not react to sound.
pub const MTF_AMBUSH: i16 = 8;
/// Only in multiplayer.
pub const MTF_NOTSINGLE: i16 = 16;

/// Child index flag in BSP nodes: the child is a subsector.
pub const NF_SUBSECTOR: u16 = 0x8000;

#[inline]
fn rd_i16(d: &[u8], o: usize) -> i16 {
    i16::from_le_bytes([d[o], d[o + 1]])
}

#[inline]
fn rd_u16(d: &[u8], o: usize) -> u16 {
    u16::from_le_bytes([d[o], d[o + 1]])
}

#[inline]
fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_name(out: &mut Vec<u8>, name: &LumpName) {
    out.extend_from_slice(name);
}

/// A fixed size record inside a map lump.
pub trait MapRecord: Sized {
    const SIZE: usize;

    /// `raw` is exactly `SIZE` bytes.
    fn parse(raw: &[u8]) -> Self;

    fn write(&self, out: &mut Vec<u8>);
}

/// Parses every whole record in a lump. Trailing partial records are
/// ignored.
pub fn parse_records<T: MapRecord>(data: &[u8]) -> Vec<T> {
    data.chunks_exact(T::SIZE).map(T::parse).collect()
}

pub fn write_records<T: MapRecord>(records: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * T::SIZE);
    for r in records {
        r.write(&mut out);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapVertex {
    pub x: i16,
    pub y: i16,
}

impl MapRecord for MapVertex {
    const SIZE: usize = 4;

    fn parse(raw: &[u8]) -> Self {
        Self {
            x: rd_i16(raw, 0),
            y: rd_i16(raw, 2),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i16(out, self.x);
        put_i16(out, self.y);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapSideDef {
    pub textureoffset: i16,
    pub rowoffset: i16,
    pub toptexture: LumpName,
    pub bottomtexture: LumpName,
    pub midtexture: LumpName,
    /// Front sector, towards viewer.
    pub sector: i16,
}

impl MapRecord for MapSideDef {
    const SIZE: usize = 30;

    fn parse(raw: &[u8]) -> Self {
        Self {
            textureoffset: rd_i16(raw, 0),
            rowoffset: rd_i16(raw, 2),
            toptexture: name_from_bytes(&raw[4..12]),
            bottomtexture: name_from_bytes(&raw[12..20]),
            midtexture: name_from_bytes(&raw[20..28]),
            sector: rd_i16(raw, 28),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i16(out, self.textureoffset);
        put_i16(out, self.rowoffset);
        put_name(out, &self.toptexture);
        put_name(out, &self.bottomtexture);
        put_name(out, &self.midtexture);
        put_i16(out, self.sector);
    }
}

/// A linedef, as used for editing, and as input to the BSP builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapLineDef {
    pub v1: u16,
    pub v2: u16,
    pub flags: u16,
    pub special: i16,
    pub tag: i16,
    /// `0xffff` when the side is absent.
    pub sidenum: [u16; 2],
}

pub const NO_SIDEDEF: u16 = 0xffff;

impl MapRecord for MapLineDef {
    const SIZE: usize = 14;

    fn parse(raw: &[u8]) -> Self {
        Self {
            v1: rd_u16(raw, 0),
            v2: rd_u16(raw, 2),
            flags: rd_u16(raw, 4),
            special: rd_i16(raw, 6),
            tag: rd_i16(raw, 8),
            sidenum: [rd_u16(raw, 10), rd_u16(raw, 12)],
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u16(out, self.v1);
        put_u16(out, self.v2);
        put_u16(out, self.flags);
        put_i16(out, self.special);
        put_i16(out, self.tag);
        put_u16(out, self.sidenum[0]);
        put_u16(out, self.sidenum[1]);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapSector {
    pub floorheight: i16,
    pub ceilingheight: i16,
    pub floorpic: LumpName,
    pub ceilingpic: LumpName,
    pub lightlevel: i16,
    pub special: i16,
    pub tag: i16,
}

impl MapRecord for MapSector {
    const SIZE: usize = 26;

    fn parse(raw: &[u8]) -> Self {
        Self {
            floorheight: rd_i16(raw, 0),
            ceilingheight: rd_i16(raw, 2),
            floorpic: name_from_bytes(&raw[4..12]),
            ceilingpic: name_from_bytes(&raw[12..20]),
            lightlevel: rd_i16(raw, 20),
            special: rd_i16(raw, 22),
            tag: rd_i16(raw, 24),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i16(out, self.floorheight);
        put_i16(out, self.ceilingheight);
        put_name(out, &self.floorpic);
        put_name(out, &self.ceilingpic);
        put_i16(out, self.lightlevel);
        put_i16(out, self.special);
        put_i16(out, self.tag);
    }
}

/// Subsector: a convex run of segs, from the BSP builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapSubSector {
    pub numsegs: u16,
    pub firstseg: u16,
}

impl MapRecord for MapSubSector {
    const SIZE: usize = 4;

    fn parse(raw: &[u8]) -> Self {
        Self {
            numsegs: rd_u16(raw, 0),
            firstseg: rd_u16(raw, 2),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u16(out, self.numsegs);
        put_u16(out, self.firstseg);
    }
}

/// Line segment, the part of a linedef bounding a subsector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapSeg {
    pub v1: u16,
    pub v2: u16,
    pub angle: i16,
    pub linedef: u16,
    pub side: i16,
    pub offset: i16,
}

impl MapRecord for MapSeg {
    const SIZE: usize = 12;

    fn parse(raw: &[u8]) -> Self {
        Self {
            v1: rd_u16(raw, 0),
            v2: rd_u16(raw, 2),
            angle: rd_i16(raw, 4),
            linedef: rd_u16(raw, 6),
            side: rd_i16(raw, 8),
            offset: rd_i16(raw, 10),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u16(out, self.v1);
        put_u16(out, self.v2);
        put_i16(out, self.angle);
        put_u16(out, self.linedef);
        put_i16(out, self.side);
        put_i16(out, self.offset);
    }
}

/// BSP node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapNode {
    /// Partition line from (x,y) to x+dx,y+dy.
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    /// Bounding box for each child, `[top, bottom, left, right]`.
    pub bbox: [[i16; 4]; 2],
    /// If `NF_SUBSECTOR` is set it's a subsector.
    pub children: [u16; 2],
}

impl MapRecord for MapNode {
    const SIZE: usize = 28;

    fn parse(raw: &[u8]) -> Self {
        let mut bbox = [[0i16; 4]; 2];
        for (side, b) in bbox.iter_mut().enumerate() {
            for (k, v) in b.iter_mut().enumerate() {
                *v = rd_i16(raw, 8 + side * 8 + k * 2);
            }
        }
        Self {
            x: rd_i16(raw, 0),
            y: rd_i16(raw, 2),
            dx: rd_i16(raw, 4),
            dy: rd_i16(raw, 6),
            bbox,
            children: [rd_u16(raw, 24), rd_u16(raw, 26)],
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i16(out, self.x);
        put_i16(out, self.y);
        put_i16(out, self.dx);
        put_i16(out, self.dy);
        for b in &self.bbox {
            for &v in b {
                put_i16(out, v);
            }
        }
        put_u16(out, self.children[0]);
        put_u16(out, self.children[1]);
    }
}

/// Thing definition, position, orientation and type, plus skill/visibility
/// flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapThing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub kind: i16,
    pub options: i16,
}

impl MapRecord for MapThing {
    const SIZE: usize = 10;

    fn parse(raw: &[u8]) -> Self {
        Self {
            x: rd_i16(raw, 0),
            y: rd_i16(raw, 2),
            angle: rd_i16(raw, 4),
            kind: rd_i16(raw, 6),
            options: rd_i16(raw, 8),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_i16(out, self.x);
        put_i16(out, self.y);
        put_i16(out, self.angle);
        put_i16(out, self.kind);
        put_i16(out, self.options);
    }
}

// ============================================================
// Texture definition lumps
// ============================================================

/// One patch placed inside a texture definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapPatch {
    pub originx: i16,
    pub originy: i16,
    /// Index into PNAMES.
    pub patch: i16,
}

/// A texture definition from TEXTURE1/TEXTURE2.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapTexture {
    pub name: LumpName,
    pub masked: bool,
    pub width: i16,
    pub height: i16,
    pub patches: Vec<MapPatch>,
}

pub const MAPTEXTURE_HEADER_SIZE: usize = 22;
pub const MAPPATCH_SIZE: usize = 10;

impl MapTexture {
    /// Parses one definition at `ofs`. Returns `None` when the record runs
    /// past the end of the lump.
    pub fn parse_at(data: &[u8], ofs: usize) -> Option<MapTexture> {
        if ofs + MAPTEXTURE_HEADER_SIZE > data.len() {
            return None;
        }
        let raw = &data[ofs..];
        let patchcount = rd_i16(raw, 20).max(0) as usize;
        if ofs + MAPTEXTURE_HEADER_SIZE + patchcount * MAPPATCH_SIZE > data.len() {
            return None;
        }
        let patches = (0..patchcount)
            .map(|i| {
                let p = MAPTEXTURE_HEADER_SIZE + i * MAPPATCH_SIZE;
                MapPatch {
                    originx: rd_i16(raw, p),
                    originy: rd_i16(raw, p + 2),
                    patch: rd_i16(raw, p + 4),
                }
            })
            .collect();
        Some(MapTexture {
            name: name_from_bytes(&raw[0..8]),
            masked: i32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]) != 0,
            width: rd_i16(raw, 12),
            height: rd_i16(raw, 14),
            patches,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        put_name(out, &self.name);
        out.extend_from_slice(&(self.masked as i32).to_le_bytes());
        put_i16(out, self.width);
        put_i16(out, self.height);
        // obsolete column directory
        out.extend_from_slice(&0i32.to_le_bytes());
        put_i16(out, self.patches.len() as i16);
        for p in &self.patches {
            put_i16(out, p.originx);
            put_i16(out, p.originy);
            put_i16(out, p.patch);
            // stepdir, colormap
            put_i16(out, 1);
            put_i16(out, 0);
        }
    }
}

/// Builds a TEXTURE1 style lump from definitions.
pub fn write_texture_lump(textures: &[MapTexture]) -> Vec<u8> {
    let mut body = Vec::new();
    let mut offsets = Vec::with_capacity(textures.len());
    let header = 4 + 4 * textures.len();
    for t in textures {
        offsets.push((header + body.len()) as i32);
        t.write(&mut body);
    }
    let mut out = Vec::with_capacity(header + body.len());
    out.extend_from_slice(&(textures.len() as i32).to_le_bytes());
    for o in offsets {
        out.extend_from_slice(&o.to_le_bytes());
    }
    out.extend_from_slice(&body);
    out
}

/// Builds a PNAMES lump.
pub fn write_pnames(names: &[&str]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + names.len() * 8);
    out.extend_from_slice(&(names.len() as i32).to_le_bytes());
    for n in names {
        out.extend_from_slice(&crate::wad::lump_name(n));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::lump_name;

    #[test]
    fn test_linedef_layout() {
        let line = MapLineDef {
            v1: 1,
            v2: 2,
            flags: LineFlags::TWOSIDED.bits(),
            special: 1,
            tag: 7,
            sidenum: [3, NO_SIDEDEF],
        };
        let bytes = write_records(&[line]);
        assert_eq!(bytes.len(), MapLineDef::SIZE);
        assert_eq!(&bytes[12..14], &[0xff, 0xff]);
        assert_eq!(parse_records::<MapLineDef>(&bytes), vec![line]);
    }

    #[test]
    fn test_sector_names_are_normalised() {
        let mut raw = vec![0u8; MapSector::SIZE];
        raw[4..10].copy_from_slice(b"flat14");
        let s = MapSector::parse(&raw);
        assert_eq!(s.floorpic, lump_name("FLAT14"));
    }

    #[test]
    fn test_partial_trailing_record_ignored() {
        let raw = vec![0u8; MapVertex::SIZE * 3 + 2];
        assert_eq!(parse_records::<MapVertex>(&raw).len(), 3);
    }

    #[test]
    fn test_node_children_offsets() {
        let node = MapNode {
            x: 64,
            y: -64,
            dx: 0,
            dy: 128,
            bbox: [[10, 0, 0, 10], [20, 5, 5, 20]],
            children: [NF_SUBSECTOR, NF_SUBSECTOR | 1],
        };
        let bytes = write_records(&[node]);
        assert_eq!(bytes.len(), 28);
        let back = MapNode::parse(&bytes);
        assert_eq!(back.bbox[1][3], 20);
        assert_eq!(back.children[1] & !NF_SUBSECTOR, 1);
    }

    #[test]
    fn test_texture_lump_parses() {
        let tex = MapTexture {
            name: lump_name("STARTAN3"),
            masked: false,
            width: 128,
            height: 128,
            patches: vec![MapPatch { originx: 0, originy: 0, patch: 0 }],
        };
        let lump = write_texture_lump(&[tex.clone()]);
        let ofs = i32::from_le_bytes([lump[4], lump[5], lump[6], lump[7]]) as usize;
        assert_eq!(MapTexture::parse_at(&lump, ofs), Some(tex));
        assert_eq!(MapTexture::parse_at(&lump, lump.len() - 4), None);
    }
}
