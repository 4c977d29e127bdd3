// blockmap.rs - Blockmap and reject tables

use log::{debug, warn};

use doom_common::bbox::{BOXBOTTOM, BOXLEFT, BOXRIGHT, BOXTOP};
use doom_common::fixed::{Fixed, FRACBITS};

use crate::level::{Line, Vertex};
use crate::local::{MAPBLOCKSHIFT, MAPBLOCKUNITS};
use crate::world::MobjId;

/// The map cut into 128x128 unit blocks, each listing the lines that touch
/// it and the things whose centre is in it.
#[derive(Debug, Clone, Default)]
pub struct Blockmap {
    pub orgx: Fixed,
    pub orgy: Fixed,
    pub width: i32,
    pub height: i32,
    pub lines: Vec<Vec<usize>>,
    pub links: Vec<Vec<MobjId>>,
}

fn rd_i16(d: &[u8], i: usize) -> i16 {
    i16::from_le_bytes([d[i * 2], d[i * 2 + 1]])
}

impl Blockmap {
    /// Parses a BLOCKMAP lump. Returns `None` when the lump is too damaged
    /// to use, so the caller can build one instead.
    ///
    /// Every block list starts with a 0 entry that the node builders emit
    /// as a delimiter. It is skipped rather than treated as line 0.
    pub fn parse(data: &[u8], numlines: usize) -> Option<Blockmap> {
        let count = data.len() / 2;
        if count < 4 {
            return None;
        }
        let orgx = (rd_i16(data, 0) as i32) << FRACBITS;
        let orgy = (rd_i16(data, 1) as i32) << FRACBITS;
        let width = rd_i16(data, 2) as i32;
        let height = rd_i16(data, 3) as i32;
        if width <= 0 || height <= 0 || count < 4 + (width * height) as usize {
            return None;
        }

        let mut lines = Vec::with_capacity((width * height) as usize);
        let mut bad = 0usize;
        for b in 0..(width * height) as usize {
            let mut ofs = u16::from_le_bytes([data[8 + b * 2], data[9 + b * 2]]) as usize;
            let mut list = Vec::new();
            if ofs < count && rd_i16(data, ofs) == 0 {
                ofs += 1;
            }
            while ofs < count {
                let l = rd_i16(data, ofs) as u16;
                if l == 0xffff {
                    break;
                }
                if (l as usize) < numlines {
                    list.push(l as usize);
                } else {
                    bad += 1;
                }
                ofs += 1;
            }
            lines.push(list);
        }
        if bad > 0 {
            warn!("blockmap refers to {} missing lines", bad);
        }

        Some(Blockmap {
            orgx,
            orgy,
            width,
            height,
            links: vec![Vec::new(); lines.len()],
            lines,
        })
    }

    /// Builds a blockmap from the lines, for maps shipped without one.
    pub fn build(lines: &[Line], vertexes: &[Vertex]) -> Blockmap {
        let (mut minx, mut miny, mut maxx, mut maxy) = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);
        for v in vertexes {
            minx = minx.min(v.x >> FRACBITS);
            miny = miny.min(v.y >> FRACBITS);
            maxx = maxx.max(v.x >> FRACBITS);
            maxy = maxy.max(v.y >> FRACBITS);
        }
        if vertexes.is_empty() {
            (minx, miny, maxx, maxy) = (0, 0, 0, 0);
        }
        // leave a margin so things at the very edge still get a block
        minx -= 8;
        miny -= 8;
        let width = (maxx - minx) / MAPBLOCKUNITS + 1;
        let height = (maxy - miny) / MAPBLOCKUNITS + 1;
        let mut blocks = vec![Vec::new(); (width * height) as usize];

        for (i, l) in lines.iter().enumerate() {
            let x1 = (l.v1.x >> FRACBITS) - minx;
            let y1 = (l.v1.y >> FRACBITS) - miny;
            let x2 = (l.v2.x >> FRACBITS) - minx;
            let y2 = (l.v2.y >> FRACBITS) - miny;
            let bx1 = (x1.min(x2) / MAPBLOCKUNITS).clamp(0, width - 1);
            let bx2 = (x1.max(x2) / MAPBLOCKUNITS).clamp(0, width - 1);
            let by1 = (y1.min(y2) / MAPBLOCKUNITS).clamp(0, height - 1);
            let by2 = (y1.max(y2) / MAPBLOCKUNITS).clamp(0, height - 1);
            let (dx, dy) = ((x2 - x1) as i64, (y2 - y1) as i64);

            for by in by1..=by2 {
                for bx in bx1..=bx2 {
                    // the line touches the block unless all four corners are
                    // strictly on one side of it
                    let left = (bx * MAPBLOCKUNITS) as i64;
                    let bottom = (by * MAPBLOCKUNITS) as i64;
                    let corners = [
                        (left, bottom),
                        (left + MAPBLOCKUNITS as i64, bottom),
                        (left, bottom + MAPBLOCKUNITS as i64),
                        (left + MAPBLOCKUNITS as i64, bottom + MAPBLOCKUNITS as i64),
                    ];
                    let sides: Vec<i64> = corners
                        .iter()
                        .map(|&(cx, cy)| (cx - x1 as i64) * dy - (cy - y1 as i64) * dx)
                        .collect();
                    let all_pos = sides.iter().all(|&s| s > 0);
                    let all_neg = sides.iter().all(|&s| s < 0);
                    if !all_pos && !all_neg {
                        blocks[(by * width + bx) as usize].push(i);
                    }
                }
            }
        }

        debug!("built {}x{} blockmap", width, height);
        Blockmap {
            orgx: minx << FRACBITS,
            orgy: miny << FRACBITS,
            width,
            height,
            links: vec![Vec::new(); blocks.len()],
            lines: blocks,
        }
    }

    /// Block coordinates of a map point. May be out of range.
    #[inline]
    pub fn block_coords(&self, x: Fixed, y: Fixed) -> (i32, i32) {
        ((x - self.orgx) >> MAPBLOCKSHIFT, (y - self.orgy) >> MAPBLOCKSHIFT)
    }

    #[inline]
    pub fn block_index(&self, bx: i32, by: i32) -> Option<usize> {
        if bx < 0 || by < 0 || bx >= self.width || by >= self.height {
            None
        } else {
            Some((by * self.width + bx) as usize)
        }
    }

    /// Block range covered by a sector bounding box, padded by `pad`.
    pub fn box_blocks(&self, bbox: &[Fixed; 4], pad: Fixed) -> [i32; 4] {
        let mut out = [0; 4];
        out[BOXTOP] = ((bbox[BOXTOP] - self.orgy + pad) >> MAPBLOCKSHIFT).min(self.height - 1);
        out[BOXBOTTOM] = ((bbox[BOXBOTTOM] - self.orgy - pad) >> MAPBLOCKSHIFT).max(0);
        out[BOXRIGHT] = ((bbox[BOXRIGHT] - self.orgx + pad) >> MAPBLOCKSHIFT).min(self.width - 1);
        out[BOXLEFT] = ((bbox[BOXLEFT] - self.orgx - pad) >> MAPBLOCKSHIFT).max(0);
        out
    }

    pub fn clear_links(&mut self) {
        for l in &mut self.links {
            l.clear();
        }
    }
}

/// Sector to sector visibility. A set bit means the pair can never see
/// each other. Missing or short tables reject nothing.
#[derive(Debug, Clone, Default)]
pub struct Reject {
    bits: Vec<u8>,
    numsectors: usize,
}

impl Reject {
    pub fn new(bits: Vec<u8>, numsectors: usize) -> Self {
        let needed = (numsectors * numsectors + 7) / 8;
        if !bits.is_empty() && bits.len() < needed {
            warn!("REJECT is {} bytes, expected {}; ignoring it", bits.len(), needed);
            return Self {
                bits: Vec::new(),
                numsectors,
            };
        }
        Self { bits, numsectors }
    }

    pub fn rejects(&self, s1: usize, s2: usize) -> bool {
        if self.bits.is_empty() {
            return false;
        }
        let pnum = s1 * self.numsectors + s2;
        self.bits[pnum >> 3] & (1 << (pnum & 7)) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doom_common::fixed::FRACUNIT;

    fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Line {
        Line {
            v1: Vertex {
                x: x1 * FRACUNIT,
                y: y1 * FRACUNIT,
            },
            v2: Vertex {
                x: x2 * FRACUNIT,
                y: y2 * FRACUNIT,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_skips_leading_zero() {
        // 1x1 blockmap at (0,0): list [0, 3, 0xffff]
        let mut lump = Vec::new();
        for v in [0i16, 0, 1, 1, 5, 0, 3, -1] {
            lump.extend_from_slice(&v.to_le_bytes());
        }
        let bm = Blockmap::parse(&lump, 4).unwrap();
        assert_eq!(bm.width, 1);
        assert_eq!(bm.lines[0], vec![3]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Blockmap::parse(&[0, 0, 0], 1).is_none());
        let mut lump = Vec::new();
        for v in [0i16, 0, 10, 10] {
            lump.extend_from_slice(&v.to_le_bytes());
        }
        assert!(Blockmap::parse(&lump, 1).is_none());
    }

    #[test]
    fn test_build_assigns_lines_to_blocks() {
        let verts = [
            Vertex { x: 0, y: 0 },
            Vertex {
                x: 512 * FRACUNIT,
                y: 512 * FRACUNIT,
            },
        ];
        let lines = [line(0, 0, 0, 512), line(0, 0, 512, 0)];
        let bm = Blockmap::build(&lines, &verts);
        let (bx, by) = bm.block_coords(0, 300 * FRACUNIT);
        let b = bm.block_index(bx, by).unwrap();
        assert!(bm.lines[b].contains(&0));
        assert!(!bm.lines[b].contains(&1));
        let (bx, by) = bm.block_coords(400 * FRACUNIT, 300 * FRACUNIT);
        assert!(bm.lines[bm.block_index(bx, by).unwrap()].is_empty());
    }

    #[test]
    fn test_reject_bits() {
        // two sectors, 0 can't see 1
        let r = Reject::new(vec![0b0000_0010], 2);
        assert!(r.rejects(0, 1));
        assert!(!r.rejects(1, 0));
        assert!(!Reject::new(Vec::new(), 2).rejects(0, 1));
    }
}
