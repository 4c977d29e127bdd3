// gfx.rs - Palettes, light maps and column-run patches

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

use crate::error::ResourceError;

// ============================================================
// PLAYPAL
// ============================================================

pub const PALETTE_SIZE: usize = 768;
pub const NUMPALETTES: usize = 14;

/// The PLAYPAL palettes: 0 normal, 1-8 damage red, 9-12 bonus gold,
/// 13 radiation suit green.
#[derive(Debug, Clone)]
pub struct Palettes {
    pals: Vec<[u8; PALETTE_SIZE]>,
}

impl Palettes {
    pub fn from_lump(data: &[u8]) -> Result<Self, ResourceError> {
        if data.len() < PALETTE_SIZE {
            return Err(ResourceError::BadLump {
                lump: "PLAYPAL".into(),
                reason: format!("{} bytes is less than one palette", data.len()),
            });
        }
        let pals = data
            .chunks_exact(PALETTE_SIZE)
            .map(|c| {
                let mut p = [0u8; PALETTE_SIZE];
                p.copy_from_slice(c);
                p
            })
            .collect();
        Ok(Self { pals })
    }

    pub fn len(&self) -> usize {
        self.pals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pals.is_empty()
    }

    /// Palette `n`, falling back to palette 0 when the lump is short.
    pub fn get(&self, n: usize) -> &[u8; PALETTE_SIZE] {
        self.pals.get(n).unwrap_or(&self.pals[0])
    }

    /// Packs palette `n` into `0xAABBGGRR` words (RGBA byte order in
    /// memory) after gamma correction.
    pub fn rgba_lut(&self, n: usize, gamma: usize) -> [u32; 256] {
        let pal = self.get(n);
        let g = gamma_table(gamma);
        let mut lut = [0u32; 256];
        for (i, out) in lut.iter_mut().enumerate() {
            let r = g[pal[i * 3] as usize] as u32;
            let gr = g[pal[i * 3 + 1] as usize] as u32;
            let b = g[pal[i * 3 + 2] as usize] as u32;
            *out = 0xff00_0000 | (b << 16) | (gr << 8) | r;
        }
        lut
    }
}

// ============================================================
// Gamma correction
// ============================================================

pub const GAMMA_LEVELS: usize = 5;

/// Gamma correction curve `level` (0 is no correction). Each step raises
/// mid tones while keeping black and white fixed.
pub fn gamma_table(level: usize) -> [u8; 256] {
    let level = level.min(GAMMA_LEVELS - 1);
    let mut t = [0u8; 256];
    if level == 0 {
        for (i, v) in t.iter_mut().enumerate() {
            *v = i as u8;
        }
        return t;
    }
    let exponent = 1.0 / (1.0 + 0.25 * level as f64);
    for (i, v) in t.iter_mut().enumerate() {
        let f = (i as f64 / 255.0).powf(exponent);
        *v = (f * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    t
}

// ============================================================
// COLORMAP
// ============================================================

/// Light levels in COLORMAP; 0 is full bright.
pub const NUMCOLORMAPS: usize = 32;
/// Index of the invulnerability inverse greyscale map.
pub const INVERSECOLORMAP: usize = 32;
pub const COLORMAP_SIZE: usize = 256;

#[derive(Debug, Clone)]
pub struct ColorMaps {
    maps: Vec<[u8; COLORMAP_SIZE]>,
}

impl ColorMaps {
    pub fn from_lump(data: &[u8]) -> Result<Self, ResourceError> {
        if data.len() < (NUMCOLORMAPS + 1) * COLORMAP_SIZE {
            return Err(ResourceError::BadLump {
                lump: "COLORMAP".into(),
                reason: format!("{} bytes is too short", data.len()),
            });
        }
        let maps = data
            .chunks_exact(COLORMAP_SIZE)
            .map(|c| {
                let mut m = [0u8; COLORMAP_SIZE];
                m.copy_from_slice(c);
                m
            })
            .collect();
        Ok(Self { maps })
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    #[inline]
    pub fn get(&self, n: usize) -> &[u8; COLORMAP_SIZE] {
        &self.maps[n.min(self.maps.len() - 1)]
    }
}

// ============================================================
// Patches
// ============================================================

/// A run of opaque pixels in a patch column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Row of the first pixel.
    pub top_delta: i32,
    pub pixels: Vec<u8>,
}

/// A masked picture stored as columns of posts. Used for sprites, wall
/// patches and full screen pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub width: i32,
    pub height: i32,
    /// Pixels to the left of origin.
    pub left_offset: i32,
    /// Pixels below the origin.
    pub top_offset: i32,
    pub columns: Vec<Vec<Post>>,
}

fn rd_i16(d: &[u8], o: usize) -> i32 {
    i16::from_le_bytes([d[o], d[o + 1]]) as i32
}

impl Patch {
    pub fn from_lump(name: &str, data: &[u8]) -> Result<Patch, ResourceError> {
        let bad = || ResourceError::BadPatch(name.to_string());
        if data.len() < 8 {
            return Err(bad());
        }
        let width = rd_i16(data, 0);
        let height = rd_i16(data, 2);
        if width <= 0 || height < 0 {
            return Err(bad());
        }
        let table_end = 8 + width as usize * 4;
        if table_end > data.len() {
            return Err(bad());
        }

        let mut columns = Vec::with_capacity(width as usize);
        for x in 0..width as usize {
            let o = 8 + x * 4;
            let mut ofs = u32::from_le_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]]) as usize;
            let mut posts = Vec::new();
            loop {
                let top_delta = *data.get(ofs).ok_or_else(bad)?;
                if top_delta == 0xff {
                    break;
                }
                let length = *data.get(ofs + 1).ok_or_else(bad)? as usize;
                let start = ofs + 3;
                let end = start + length;
                if end >= data.len() + 1 {
                    return Err(bad());
                }
                posts.push(Post {
                    top_delta: top_delta as i32,
                    pixels: data[start..end].to_vec(),
                });
                ofs = end + 1;
            }
            columns.push(posts);
        }

        Ok(Patch {
            width,
            height,
            left_offset: rd_i16(data, 4),
            top_offset: rd_i16(data, 6),
            columns,
        })
    }

    /// Builds a patch from a row-major grid where `None` is transparent.
    pub fn from_pixels(
        width: i32,
        height: i32,
        left_offset: i32,
        top_offset: i32,
        pixels: &[Option<u8>],
    ) -> Patch {
        let mut columns = Vec::with_capacity(width as usize);
        for x in 0..width {
            let mut posts: Vec<Post> = Vec::new();
            let mut current: Option<Post> = None;
            for y in 0..height {
                match pixels[(y * width + x) as usize] {
                    Some(c) => match current.as_mut() {
                        Some(p) if p.pixels.len() < 255 => p.pixels.push(c),
                        _ => {
                            if let Some(p) = current.take() {
                                posts.push(p);
                            }
                            current = Some(Post {
                                top_delta: y,
                                pixels: vec![c],
                            });
                        }
                    },
                    None => {
                        if let Some(p) = current.take() {
                            posts.push(p);
                        }
                    }
                }
            }
            if let Some(p) = current.take() {
                posts.push(p);
            }
            columns.push(posts);
        }
        Patch {
            width,
            height,
            left_offset,
            top_offset,
            columns,
        }
    }

    /// Serialises to the on-disk format.
    pub fn to_lump(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.width as i16).to_le_bytes());
        out.extend_from_slice(&(self.height as i16).to_le_bytes());
        out.extend_from_slice(&(self.left_offset as i16).to_le_bytes());
        out.extend_from_slice(&(self.top_offset as i16).to_le_bytes());
        let table = out.len();
        out.resize(table + self.columns.len() * 4, 0);
        for (x, posts) in self.columns.iter().enumerate() {
            let ofs = out.len() as u32;
            out[table + x * 4..table + x * 4 + 4].copy_from_slice(&ofs.to_le_bytes());
            for p in posts {
                out.push(p.top_delta as u8);
                out.push(p.pixels.len() as u8);
                out.push(0);
                out.extend_from_slice(&p.pixels);
                out.push(0);
            }
            out.push(0xff);
        }
        out
    }

    /// Column `x` clamped into range.
    #[inline]
    pub fn column(&self, x: i32) -> &[Post] {
        let x = x.clamp(0, self.width - 1) as usize;
        &self.columns[x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_rgba_lut() {
        let mut lump = vec![0u8; PALETTE_SIZE * 2];
        lump[3] = 10;
        lump[4] = 20;
        lump[5] = 30;
        let pals = Palettes::from_lump(&lump).unwrap();
        assert_eq!(pals.len(), 2);
        let lut = pals.rgba_lut(0, 0);
        assert_eq!(lut[1], 0xff00_0000 | (30 << 16) | (20 << 8) | 10);
        // missing palettes fall back to 0
        assert_eq!(pals.get(13), pals.get(0));
    }

    #[test]
    fn test_short_playpal_rejected() {
        assert!(Palettes::from_lump(&[0u8; 10]).is_err());
    }

    #[test]
    fn test_gamma_keeps_endpoints() {
        for level in 0..GAMMA_LEVELS {
            let t = gamma_table(level);
            assert_eq!(t[0], 0);
            assert_eq!(t[255], 255);
        }
        assert_eq!(gamma_table(0)[100], 100);
        assert!(gamma_table(4)[100] > gamma_table(1)[100]);
    }

    #[test]
    fn test_colormap_requires_inverse_map() {
        assert!(ColorMaps::from_lump(&vec![0u8; 32 * 256]).is_err());
        let maps = ColorMaps::from_lump(&vec![0u8; 34 * 256]).unwrap();
        assert_eq!(maps.len(), 34);
    }

    #[test]
    fn test_patch_lump_roundtrip_with_holes() {
        let px = [
            Some(1), None,
            Some(2), Some(5),
            None, Some(6),
        ];
        let p = Patch::from_pixels(2, 3, 1, 2, &px);
        assert_eq!(p.columns[0].len(), 1);
        assert_eq!(p.columns[0][0].pixels, vec![1, 2]);
        assert_eq!(p.columns[1][0].top_delta, 1);

        let back = Patch::from_lump("TEST", &p.to_lump()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_patch_truncated_column() {
        let p = Patch::from_pixels(1, 2, 0, 0, &[Some(1), Some(1)]);
        let mut lump = p.to_lump();
        lump.truncate(lump.len() - 3);
        assert!(Patch::from_lump("BAD", &lump).is_err());
    }
}
