// resources.rs - Textures, flats and sprites decoded from the WAD

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

use std::collections::HashMap;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::ResourceError;
use crate::fixed::{Fixed, FRACBITS};
use crate::gfx::{ColorMaps, Palettes, Patch, Post};
use crate::wad::{lump_name, name_to_string, read_i32, LumpName, Wad};
use crate::wadfiles::MapTexture;

pub const FLAT_SIZE: usize = 64 * 64;

// ============================================================
// Wall textures
// ============================================================

/// A wall texture composed from its patches. Pixels are stored column
/// major so the column drawers can walk them directly.
#[derive(Debug, Clone)]
pub struct Texture {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub masked: bool,
    pixels: Vec<u8>,
    posts: Vec<Vec<Post>>,
}

impl Texture {
    /// Opaque pixels of column `col`, wrapping horizontally.
    #[inline]
    pub fn column(&self, col: i32) -> &[u8] {
        let x = col.rem_euclid(self.width) as usize;
        let h = self.height as usize;
        &self.pixels[x * h..x * h + h]
    }

    /// Posts of column `col` for masked drawing, wrapping horizontally.
    #[inline]
    pub fn column_posts(&self, col: i32) -> &[Post] {
        &self.posts[col.rem_euclid(self.width) as usize]
    }

    pub fn height_fixed(&self) -> Fixed {
        self.height << FRACBITS
    }
}

fn compose_texture(def: &MapTexture, patches: &[Option<Patch>]) -> Result<Texture, ResourceError> {
    let name = name_to_string(&def.name);
    let width = def.width as i32;
    let height = def.height as i32;
    if width <= 0 || height <= 0 {
        return Err(ResourceError::BadTexture {
            texture: name,
            reason: format!("bad size {}x{}", width, height),
        });
    }

    let mut pixels = vec![0u8; (width * height) as usize];
    let mut opaque = vec![false; (width * height) as usize];
    let mut covered = vec![false; width as usize];

    for mp in &def.patches {
        let patch = patches
            .get(mp.patch.max(0) as usize)
            .and_then(|p| p.as_ref())
            .ok_or_else(|| ResourceError::BadTexture {
                texture: name.clone(),
                reason: format!("missing patch {}", mp.patch),
            })?;

        let x1 = mp.originx as i32;
        let x2 = (x1 + patch.width).min(width);
        for x in x1.max(0)..x2 {
            covered[x as usize] = true;
            let col_base = (x * height) as usize;
            for post in &patch.columns[(x - x1) as usize] {
                let mut position = mp.originy as i32 + post.top_delta;
                let mut src = 0usize;
                let mut count = post.pixels.len() as i32;
                if position < 0 {
                    count += position;
                    src = (-position) as usize;
                    position = 0;
                }
                if position + count > height {
                    count = height - position;
                }
                for i in 0..count.max(0) as usize {
                    let dst = col_base + position as usize + i;
                    pixels[dst] = post.pixels[src + i];
                    opaque[dst] = true;
                }
            }
        }
    }

    if let Some(x) = covered.iter().position(|c| !c) {
        warn!("texture {}: column {} without a patch", name, x);
    }

    let posts = (0..width)
        .map(|x| {
            let base = (x * height) as usize;
            let mut out: Vec<Post> = Vec::new();
            let mut y = 0;
            while y < height {
                if !opaque[base + y as usize] {
                    y += 1;
                    continue;
                }
                let start = y;
                while y < height && opaque[base + y as usize] {
                    y += 1;
                }
                out.push(Post {
                    top_delta: start,
                    pixels: pixels[base + start as usize..base + y as usize].to_vec(),
                });
            }
            out
        })
        .collect();

    Ok(Texture {
        name,
        width,
        height,
        masked: def.masked,
        pixels,
        posts,
    })
}

/// All wall textures from TEXTURE1 and TEXTURE2. Texture 0 is reserved as
/// "no texture" and never drawn.
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    textures: Vec<Texture>,
    by_name: HashMap<LumpName, usize>,
}

impl TextureSet {
    pub fn load(wad: &Wad) -> Result<Self, ResourceError> {
        let pnames = wad.lump_by_name("PNAMES")?;
        if pnames.len() < 4 {
            return Err(ResourceError::BadLump {
                lump: "PNAMES".into(),
                reason: "too short".into(),
            });
        }
        let nummappatches = (read_i32(pnames, 0).max(0) as usize).min((pnames.len() - 4) / 8);
        let names: Vec<LumpName> = (0..nummappatches)
            .map(|i| crate::wad::name_from_bytes(&pnames[4 + i * 8..12 + i * 8]))
            .collect();

        let patches: Vec<Option<Patch>> = names
            .par_iter()
            .map(|n| {
                let pname = name_to_string(n);
                let lump = wad.check_num_for_name(&pname)?;
                let data = wad.lump(lump).ok()?;
                Patch::from_lump(&pname, data).ok()
            })
            .collect();

        let mut defs = Vec::new();
        for lump in ["TEXTURE1", "TEXTURE2"] {
            let Some(num) = wad.check_num_for_name(lump) else {
                continue;
            };
            let data = wad.lump(num)?;
            if data.len() < 4 {
                continue;
            }
            let count = read_i32(data, 0).max(0) as usize;
            for i in 0..count {
                let dir = 4 + i * 4;
                if dir + 4 > data.len() {
                    break;
                }
                let ofs = read_i32(data, dir).max(0) as usize;
                let def = MapTexture::parse_at(data, ofs).ok_or_else(|| ResourceError::BadLump {
                    lump: lump.to_string(),
                    reason: format!("texture {} runs past end of lump", i),
                })?;
                defs.push(def);
            }
        }

        let textures = defs
            .par_iter()
            .map(|def| compose_texture(def, &patches))
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_name = HashMap::with_capacity(textures.len());
        for (i, t) in textures.iter().enumerate() {
            by_name.entry(lump_name(&t.name)).or_insert(i);
        }

        info!("{} textures from {} patches", textures.len(), nummappatches);
        Ok(Self { textures, by_name })
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Texture number for a sidedef name. `-` (and an empty name) means no
    /// texture and yields 0.
    pub fn check_num_for_name(&self, name: &str) -> Option<usize> {
        if name.is_empty() || name.starts_with('-') {
            return Some(0);
        }
        self.by_name.get(&lump_name(name)).copied()
    }

    /// Like `check_num_for_name` but unknown names map to texture 0 with a
    /// warning, so broken PWADs still load.
    pub fn num_for_name(&self, name: &str) -> usize {
        match self.check_num_for_name(name) {
            Some(n) => n,
            None => {
                warn!("texture {} not found", name);
                0
            }
        }
    }

    #[inline]
    pub fn get(&self, num: usize) -> &Texture {
        &self.textures[num]
    }

    pub fn height(&self, num: usize) -> Fixed {
        self.textures.get(num).map(|t| t.height_fixed()).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Texture> {
        self.textures.iter()
    }
}

// ============================================================
// Flats
// ============================================================

#[derive(Debug, Clone)]
pub struct Flat {
    pub name: String,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct FlatSet {
    flats: Vec<Flat>,
    by_name: HashMap<LumpName, usize>,
}

impl FlatSet {
    pub fn load(wad: &Wad) -> Result<Self, ResourceError> {
        let range = wad.lumps_between("F_START", "F_END")?;
        let mut flats = Vec::with_capacity(range.len());
        for lump in range {
            let data = wad.lump(lump)?;
            // sub-section markers such as F1_START
            if data.is_empty() {
                continue;
            }
            let mut pixels = data[..data.len().min(FLAT_SIZE)].to_vec();
            pixels.resize(FLAT_SIZE, 0);
            flats.push(Flat {
                name: wad.lump_name(lump)?,
                pixels,
            });
        }

        let mut by_name = HashMap::with_capacity(flats.len());
        for (i, f) in flats.iter().enumerate() {
            by_name.insert(lump_name(&f.name), i);
        }
        debug!("{} flats", flats.len());
        Ok(Self { flats, by_name })
    }

    pub fn len(&self) -> usize {
        self.flats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flats.is_empty()
    }

    pub fn check_num_for_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(&lump_name(name)).copied()
    }

    pub fn num_for_name(&self, name: &str) -> usize {
        match self.check_num_for_name(name) {
            Some(n) => n,
            None => {
                warn!("flat {} not found", name);
                0
            }
        }
    }

    #[inline]
    pub fn get(&self, num: usize) -> &Flat {
        &self.flats[num.min(self.flats.len().saturating_sub(1))]
    }
}

// ============================================================
// Sprites
// ============================================================

/// Highest frame letter allowed in a sprite lump name (`A` + 28).
pub const MAX_SPRITE_FRAMES: usize = 29;

/// One animation frame of a sprite: either a single picture for every view
/// angle, or eight rotations, some of which may be mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub rotate: bool,
    /// Index into `SpriteSet::patch`.
    pub lump: [usize; 8],
    pub flip: [bool; 8],
}

#[derive(Debug, Clone, Default)]
pub struct SpriteDef {
    pub frames: Vec<SpriteFrame>,
}

#[derive(Clone, Copy)]
struct FrameTemp {
    /// -1 unset, 0 single picture, 1 rotations.
    rotate: i8,
    lump: [Option<usize>; 8],
    flip: [bool; 8],
}

impl Default for FrameTemp {
    fn default() -> Self {
        Self {
            rotate: -1,
            lump: [None; 8],
            flip: [false; 8],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    sprites: Vec<SpriteDef>,
    patches: Vec<Patch>,
}

fn install_sprite_lump(
    sprite: &str,
    temp: &mut [FrameTemp; MAX_SPRITE_FRAMES],
    maxframe: &mut i32,
    lump: usize,
    frame: u8,
    rotation: u8,
    flipped: bool,
) -> Result<(), ResourceError> {
    // the name byte, even when it is not a frame letter
    let frame_ch = b'A'.wrapping_add(frame) as char;
    let bad = |reason: &str| ResourceError::BadSprite {
        sprite: sprite.to_string(),
        frame: frame_ch,
        reason: reason.to_string(),
    };

    if frame as usize >= MAX_SPRITE_FRAMES || rotation > 8 {
        return Err(bad("bad frame characters in lump name"));
    }
    if frame as i32 > *maxframe {
        *maxframe = frame as i32;
    }

    let t = &mut temp[frame as usize];
    if rotation == 0 {
        // the lump should be used for all rotations
        if t.rotate == 1 {
            return Err(bad("has rotations and a rot=0 lump"));
        }
        t.rotate = 0;
        t.lump = [Some(lump); 8];
        t.flip = [flipped; 8];
        return Ok(());
    }

    if t.rotate == 0 {
        return Err(bad("has rotations and a rot=0 lump"));
    }
    t.rotate = 1;
    let r = (rotation - 1) as usize;
    if t.lump[r].is_some() {
        // a later definition of the same rotation wins
        debug!("sprite {} frame {} rotation {} defined twice", sprite, frame_ch, rotation);
    }
    t.lump[r] = Some(lump);
    t.flip[r] = flipped;
    Ok(())
}

impl SpriteSet {
    /// Builds frame tables for each of `names` (four letter sprite
    /// prefixes, in sprite number order) from the `S_START`..`S_END`
    /// section.
    pub fn load(wad: &Wad, names: &[&str]) -> Result<Self, ResourceError> {
        let range = wad.lumps_between("S_START", "S_END")?;
        let lump_names: Vec<LumpName> = range
            .clone()
            .map(|l| wad.lump_info(l).map(|i| i.name))
            .collect::<Result<_, _>>()?;

        let patches = range
            .clone()
            .into_par_iter()
            .map(|l| -> Result<Patch, ResourceError> {
                let name = wad.lump_name(l)?;
                let data = wad.lump(l)?;
                if data.is_empty() {
                    return Ok(Patch::from_pixels(1, 1, 0, 0, &[None]));
                }
                Patch::from_lump(&name, data)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut sprites = Vec::with_capacity(names.len());
        for spr in names {
            let prefix = lump_name(spr);
            let mut temp = [FrameTemp::default(); MAX_SPRITE_FRAMES];
            let mut maxframe = -1i32;

            for (i, n) in lump_names.iter().enumerate() {
                if n[0..4] != prefix[0..4] || n[4] == 0 {
                    continue;
                }
                let lump = i;
                install_sprite_lump(
                    spr,
                    &mut temp,
                    &mut maxframe,
                    lump,
                    n[4].wrapping_sub(b'A'),
                    n[5].wrapping_sub(b'0'),
                    false,
                )?;
                if n[6] != 0 {
                    install_sprite_lump(
                        spr,
                        &mut temp,
                        &mut maxframe,
                        lump,
                        n[6].wrapping_sub(b'A'),
                        n[7].wrapping_sub(b'0'),
                        true,
                    )?;
                }
            }

            let mut frames = Vec::with_capacity((maxframe + 1).max(0) as usize);
            for (f, t) in temp.iter().enumerate().take((maxframe + 1).max(0) as usize) {
                let frame_ch = (b'A' + f as u8) as char;
                match t.rotate {
                    -1 => {
                        return Err(ResourceError::BadSprite {
                            sprite: spr.to_string(),
                            frame: frame_ch,
                            reason: "no patches found".into(),
                        })
                    }
                    _ => {
                        let mut lump = [0usize; 8];
                        for r in 0..8 {
                            lump[r] = t.lump[r].ok_or_else(|| ResourceError::BadSprite {
                                sprite: spr.to_string(),
                                frame: frame_ch,
                                reason: format!("missing rotation {}", r + 1),
                            })?;
                        }
                        frames.push(SpriteFrame {
                            rotate: t.rotate == 1,
                            lump,
                            flip: t.flip,
                        });
                    }
                }
            }
            sprites.push(SpriteDef { frames });
        }

        info!("{} sprites, {} sprite lumps", sprites.len(), patches.len());
        Ok(Self { sprites, patches })
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn sprite(&self, num: usize) -> Option<&SpriteDef> {
        self.sprites.get(num)
    }

    #[inline]
    pub fn patch(&self, lump: usize) -> &Patch {
        &self.patches[lump]
    }
}

// ============================================================
// Bundle
// ============================================================

/// Everything decoded from the WAD that the simulation and the renderer
/// share. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Resources {
    pub palettes: Palettes,
    pub colormaps: ColorMaps,
    pub textures: TextureSet,
    pub flats: FlatSet,
    pub sprites: SpriteSet,
}

impl Resources {
    pub fn load(wad: &Wad, sprite_names: &[&str]) -> Result<Self, ResourceError> {
        let palettes = Palettes::from_lump(wad.lump_by_name("PLAYPAL")?)?;
        let colormaps = ColorMaps::from_lump(wad.lump_by_name("COLORMAP")?)?;
        let textures = TextureSet::load(wad)?;
        let flats = FlatSet::load(wad)?;
        let sprites = SpriteSet::load(wad, sprite_names)?;
        Ok(Self {
            palettes,
            colormaps,
            textures,
            flats,
            sprites,
        })
    }

    /// Decodes a named patch, e.g. a full screen page.
    pub fn load_patch(wad: &Wad, name: &str) -> Result<Patch, ResourceError> {
        Patch::from_lump(name, wad.lump_by_name(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;

    fn wad() -> Wad {
        let mut wad = Wad::new();
        wad.add_bytes("test.wad", testkit::build_iwad()).unwrap();
        wad
    }

    #[test]
    fn test_texture_lookup() {
        let wad = wad();
        let set = TextureSet::load(&wad).unwrap();
        assert!(set.len() >= 3);
        assert_eq!(set.check_num_for_name("-"), Some(0));
        let n = set.check_num_for_name("wall1").unwrap();
        assert_eq!(set.get(n).width, 64);
        assert_eq!(set.height(n), 128 << FRACBITS);
        assert_eq!(set.num_for_name("NOSUCH"), 0);
    }

    #[test]
    fn test_texture_column_wraps() {
        let wad = wad();
        let set = TextureSet::load(&wad).unwrap();
        let t = set.get(set.check_num_for_name("WALL1").unwrap());
        assert_eq!(t.column(-1), t.column(63));
        assert_eq!(t.column(64), t.column(0));
        assert_eq!(t.column(0).len(), 128);
    }

    #[test]
    fn test_masked_texture_keeps_holes() {
        let wad = wad();
        let set = TextureSet::load(&wad).unwrap();
        let t = set.get(set.check_num_for_name("GRATE").unwrap());
        assert!(t.masked);
        // grate patch is opaque on even columns only
        assert!(!t.column_posts(0).is_empty());
        assert!(t.column_posts(1).is_empty());
    }

    #[test]
    fn test_flats_skip_submarkers() {
        let wad = wad();
        let flats = FlatSet::load(&wad).unwrap();
        assert!(flats.check_num_for_name("F1_START").is_none());
        let n = flats.check_num_for_name("FLOOR0_1").unwrap();
        assert_eq!(flats.get(n).pixels.len(), FLAT_SIZE);
        assert!(flats.check_num_for_name("F_SKY1").is_some());
    }

    #[test]
    fn test_sprite_frames_and_rotations() {
        let wad = wad();
        let sprites = SpriteSet::load(&wad, &testkit::SPRITE_NAMES).unwrap();
        // PLAY has eight rotations with mirrored pairs
        let play = sprites.sprite(1).unwrap();
        assert!(!play.frames.is_empty());
        assert!(play.frames[0].rotate);
        assert!(play.frames[0].flip[7]);
        assert!(!play.frames[0].flip[1]);
        assert_eq!(play.frames[0].lump[1], play.frames[0].lump[7]);
        // a sprite with no lumps at all has no frames
        assert!(sprites.sprite(2).unwrap().frames.is_empty());
    }

    #[test]
    fn test_sprite_missing_rotation_is_error() {
        let mut w = crate::wad_writer::WadWriter::pwad();
        let p = Patch::from_pixels(1, 1, 0, 0, &[Some(1)]).to_lump();
        w.add_marker("S_START");
        w.add_lump("BADXA1", p.clone());
        w.add_lump("BADXA2", p);
        w.add_marker("S_END");
        let mut wad = Wad::new();
        wad.add_bytes("bad.wad", w.to_bytes()).unwrap();
        let err = SpriteSet::load(&wad, &["BADX"]).unwrap_err();
        assert!(matches!(err, ResourceError::BadSprite { frame: 'A', .. }));
    }

    #[test]
    fn test_sprite_frame_below_a_is_error() {
        let mut w = crate::wad_writer::WadWriter::pwad();
        let p = Patch::from_pixels(1, 1, 0, 0, &[Some(1)]).to_lump();
        w.add_marker("S_START");
        w.add_lump("BADX10", p);
        w.add_marker("S_END");
        let mut wad = Wad::new();
        wad.add_bytes("bad.wad", w.to_bytes()).unwrap();
        let err = SpriteSet::load(&wad, &["BADX"]).unwrap_err();
        assert!(matches!(err, ResourceError::BadSprite { frame: '1', .. }));
    }

    #[test]
    fn test_resources_bundle() {
        let wad = wad();
        let res = Resources::load(&wad, &testkit::SPRITE_NAMES).unwrap();
        assert_eq!(res.colormaps.len(), 34);
        assert!(Resources::load_patch(&wad, "TITLEPIC").is_ok());
    }
}
