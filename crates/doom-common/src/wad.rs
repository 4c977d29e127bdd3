// wad.rs - WAD file header, lump directory and lump lookups

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
use std::fs;
use std::ops::Range;
use std::path::Path;

use log::{debug, info};

use crate::doomdef::GameMode;
use crate::error::WadError;

/// WAD header: 4 byte id, lump count, directory offset.
pub const WAD_HEADER_SIZE: usize = 12;
/// Directory entry: offset, size, 8 byte name.
pub const WAD_DIRENTRY_SIZE: usize = 16;

/// Lump names are up to 8 upper case characters, zero padded.
pub type LumpName = [u8; 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    Pwad,
    /// A bare lump file added as a single lump.
    Lump,
}

#[derive(Debug)]
struct WadFile {
    path: String,
    kind: WadKind,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct LumpInfo {
    pub name: LumpName,
    file: usize,
    offset: usize,
    size: usize,
}

impl LumpInfo {
    pub fn name_str(&self) -> String {
        name_to_string(&self.name)
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// The combined lump directory of every loaded file. Files added later
/// override lumps of the same name from earlier files.
#[derive(Debug, Default)]
pub struct Wad {
    files: Vec<WadFile>,
    lumps: Vec<LumpInfo>,
    /// Name -> index of the last lump with that name.
    name_index: HashMap<LumpName, usize>,
}

/// Upper-cases and zero pads a lump name, truncating at 8 characters.
pub fn lump_name(name: &str) -> LumpName {
    let mut out = [0u8; 8];
    for (dst, src) in out.iter_mut().zip(name.bytes()) {
        if src == 0 {
            break;
        }
        *dst = src.to_ascii_uppercase();
    }
    out
}

/// Reads a fixed 8 byte name field as stored on disk.
pub fn name_from_bytes(raw: &[u8]) -> LumpName {
    let mut out = [0u8; 8];
    for (dst, &src) in out.iter_mut().zip(raw.iter()) {
        if src == 0 {
            break;
        }
        *dst = src.to_ascii_uppercase();
    }
    out
}

pub fn name_to_string(name: &LumpName) -> String {
    let len = name.iter().position(|&c| c == 0).unwrap_or(8);
    String::from_utf8_lossy(&name[..len]).into_owned()
}

#[inline]
pub(crate) fn read_i32(data: &[u8], ofs: usize) -> i32 {
    i32::from_le_bytes([data[ofs], data[ofs + 1], data[ofs + 2], data[ofs + 3]])
}

/// Strips directories and extension, e.g. `/demos/DEMO1.LMP` -> `DEMO1`.
fn extract_file_base(path: &str) -> LumpName {
    let stem = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    lump_name(&stem)
}

impl Wad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a file from disk. Files ending in `.wad` are parsed as WADs,
    /// anything else becomes one lump named after the file.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), WadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let data = fs::read(path).map_err(|source| WadError::Io {
            path: display.clone(),
            source,
        })?;

        let is_wad = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("wad"))
            .unwrap_or(false);

        if is_wad {
            self.add_bytes(&display, data)
        } else {
            self.add_lump_file(&display, data);
            Ok(())
        }
    }

    /// Adds an in-memory WAD image.
    pub fn add_bytes(&mut self, name: &str, data: Vec<u8>) -> Result<(), WadError> {
        if data.len() < WAD_HEADER_SIZE {
            return Err(WadError::Truncated {
                file: name.to_string(),
                len: data.len(),
            });
        }

        let kind = match &data[0..4] {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            _ => {
                return Err(WadError::BadMagic {
                    file: name.to_string(),
                })
            }
        };

        let numlumps = read_i32(&data, 4).max(0) as usize;
        let infotableofs = read_i32(&data, 8).max(0) as usize;

        let dir_end = numlumps
            .checked_mul(WAD_DIRENTRY_SIZE)
            .and_then(|n| n.checked_add(infotableofs));
        if dir_end.map(|end| end > data.len()).unwrap_or(true) {
            return Err(WadError::BadDirectory {
                file: name.to_string(),
                offset: infotableofs,
                count: numlumps,
            });
        }

        let file_index = self.files.len();
        let mut new_lumps = Vec::with_capacity(numlumps);
        for i in 0..numlumps {
            let entry = infotableofs + i * WAD_DIRENTRY_SIZE;
            let offset = read_i32(&data, entry).max(0) as usize;
            let size = read_i32(&data, entry + 4).max(0) as usize;
            let lname = name_from_bytes(&data[entry + 8..entry + 16]);

            if offset.checked_add(size).map(|end| end > data.len()).unwrap_or(true) {
                return Err(WadError::BadLump {
                    file: name.to_string(),
                    name: name_to_string(&lname),
                    offset,
                    size,
                });
            }

            new_lumps.push(LumpInfo {
                name: lname,
                file: file_index,
                offset,
                size,
            });
        }

        info!(
            "adding {} ({} lumps, {})",
            name,
            numlumps,
            if kind == WadKind::Iwad { "IWAD" } else { "PWAD" }
        );

        self.files.push(WadFile {
            path: name.to_string(),
            kind,
            data,
        });
        for lump in new_lumps {
            self.push_lump(lump);
        }
        Ok(())
    }

    /// Adds a single raw lump, e.g. a demo `.lmp`.
    pub fn add_lump_file(&mut self, path: &str, data: Vec<u8>) {
        let lname = extract_file_base(path);
        debug!("adding lump {} from {}", name_to_string(&lname), path);
        let file_index = self.files.len();
        let size = data.len();
        self.files.push(WadFile {
            path: path.to_string(),
            kind: WadKind::Lump,
            data,
        });
        self.push_lump(LumpInfo {
            name: lname,
            file: file_index,
            offset: 0,
            size,
        });
    }

    fn push_lump(&mut self, lump: LumpInfo) {
        let index = self.lumps.len();
        self.name_index.insert(lump.name, index);
        self.lumps.push(lump);
    }

    pub fn num_lumps(&self) -> usize {
        self.lumps.len()
    }

    pub fn has_iwad(&self) -> bool {
        self.files.iter().any(|f| f.kind == WadKind::Iwad)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    /// Returns the lump number for `name`, the last one loaded wins.
    pub fn check_num_for_name(&self, name: &str) -> Option<usize> {
        self.name_index.get(&lump_name(name)).copied()
    }

    pub fn get_num_for_name(&self, name: &str) -> Result<usize, WadError> {
        self.check_num_for_name(name)
            .ok_or_else(|| WadError::LumpNotFound(name.to_ascii_uppercase()))
    }

    pub fn lump_info(&self, lump: usize) -> Result<&LumpInfo, WadError> {
        self.lumps.get(lump).ok_or(WadError::LumpOutOfRange(lump))
    }

    pub fn lump_name(&self, lump: usize) -> Result<String, WadError> {
        self.lump_info(lump).map(|l| l.name_str())
    }

    pub fn lump_length(&self, lump: usize) -> Result<usize, WadError> {
        self.lump_info(lump).map(|l| l.size)
    }

    pub fn lump(&self, lump: usize) -> Result<&[u8], WadError> {
        let info = self.lump_info(lump)?;
        let file = &self.files[info.file];
        Ok(&file.data[info.offset..info.offset + info.size])
    }

    pub fn lump_by_name(&self, name: &str) -> Result<&[u8], WadError> {
        self.lump(self.get_num_for_name(name)?)
    }

    /// Lump numbers strictly between two marker lumps, e.g. `F_START` and
    /// `F_END`. The last definition of each marker is used.
    pub fn lumps_between(&self, start: &str, end: &str) -> Result<Range<usize>, WadError> {
        let first = self
            .check_num_for_name(start)
            .ok_or_else(|| WadError::MarkerNotFound(start.to_string()))?;
        let last = self
            .check_num_for_name(end)
            .ok_or_else(|| WadError::MarkerNotFound(end.to_string()))?;
        if last < first {
            return Ok(first + 1..first + 1);
        }
        Ok(first + 1..last)
    }

    /// Lump numbers between every `start`/`end` marker pair, in load order.
    /// PWADs that carry their own flat or sprite sections are merged this
    /// way.
    pub fn all_lumps_between(&self, start: &str, end: &str) -> Vec<usize> {
        let start = lump_name(start);
        let end = lump_name(end);
        let mut out = Vec::new();
        let mut inside = false;
        for (i, lump) in self.lumps.iter().enumerate() {
            if lump.name == start {
                inside = true;
            } else if lump.name == end {
                inside = false;
            } else if inside {
                out.push(i);
            }
        }
        out
    }

    /// Works out which game the IWAD is from the maps it carries.
    pub fn identify_game_mode(&self) -> GameMode {
        if self.check_num_for_name("MAP01").is_some() {
            GameMode::Commercial
        } else if self.check_num_for_name("E4M1").is_some() {
            GameMode::Retail
        } else if self.check_num_for_name("E3M1").is_some() {
            GameMode::Registered
        } else if self.check_num_for_name("E1M1").is_some() {
            GameMode::Shareware
        } else {
            GameMode::Indetermined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad_writer::WadWriter;

    fn sample_wad() -> Vec<u8> {
        let mut w = WadWriter::iwad();
        w.add_lump("PLAYPAL", vec![1, 2, 3]);
        w.add_marker("F_START");
        w.add_lump("FLOOR1", vec![7; 4096]);
        w.add_lump("FLOOR2", vec![8; 4096]);
        w.add_marker("F_END");
        w.add_lump("E1M1", Vec::new());
        w.to_bytes()
    }

    #[test]
    fn test_parse_directory() {
        let mut wad = Wad::new();
        wad.add_bytes("test.wad", sample_wad()).unwrap();
        assert_eq!(wad.num_lumps(), 6);
        assert!(wad.has_iwad());
        assert_eq!(wad.lump_by_name("playpal").unwrap(), &[1, 2, 3]);
        assert_eq!(wad.lump_length(wad.get_num_for_name("FLOOR1").unwrap()).unwrap(), 4096);
    }

    #[test]
    fn test_marker_range() {
        let mut wad = Wad::new();
        wad.add_bytes("test.wad", sample_wad()).unwrap();
        let range = wad.lumps_between("F_START", "F_END").unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(wad.lump_name(range.start).unwrap(), "FLOOR1");
    }

    #[test]
    fn test_pwad_overrides_iwad() {
        let mut wad = Wad::new();
        wad.add_bytes("test.wad", sample_wad()).unwrap();
        let mut p = WadWriter::pwad();
        p.add_lump("PLAYPAL", vec![9, 9]);
        wad.add_bytes("patch.wad", p.to_bytes()).unwrap();
        assert_eq!(wad.lump_by_name("PLAYPAL").unwrap(), &[9, 9]);
        assert_eq!(wad.num_lumps(), 7);
    }

    #[test]
    fn test_missing_lump_is_error() {
        let wad = Wad::new();
        assert!(wad.check_num_for_name("NOPE").is_none());
        assert!(matches!(wad.get_num_for_name("nope"), Err(WadError::LumpNotFound(n)) if n == "NOPE"));
        assert!(wad.lump(3).is_err());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut wad = Wad::new();
        let err = wad.add_bytes("x.wad", b"JUNKxxxxxxxxxxxx".to_vec());
        assert!(matches!(err, Err(WadError::BadMagic { .. })));
    }

    #[test]
    fn test_rejects_truncated_directory() {
        let mut bytes = sample_wad();
        bytes.truncate(bytes.len() - 8);
        let mut wad = Wad::new();
        assert!(matches!(
            wad.add_bytes("x.wad", bytes),
            Err(WadError::BadDirectory { .. })
        ));
    }

    #[test]
    fn test_rejects_lump_out_of_bounds() {
        let mut bytes = sample_wad();
        // first directory entry's size field
        let dirofs = read_i32(&bytes, 8) as usize;
        bytes[dirofs + 4..dirofs + 8].copy_from_slice(&100_000i32.to_le_bytes());
        let mut wad = Wad::new();
        assert!(matches!(wad.add_bytes("x.wad", bytes), Err(WadError::BadLump { .. })));
    }

    #[test]
    fn test_bare_lump_file_named_from_path() {
        let mut wad = Wad::new();
        wad.add_lump_file("/tmp/demos/mydemo.lmp", vec![109, 2]);
        assert_eq!(wad.lump_by_name("MYDEMO").unwrap(), &[109, 2]);
    }

    #[test]
    fn test_identify_game_mode() {
        let mut wad = Wad::new();
        wad.add_bytes("test.wad", sample_wad()).unwrap();
        assert_eq!(wad.identify_game_mode(), GameMode::Shareware);
    }

    #[test]
    fn test_lump_name_truncates_and_uppercases() {
        assert_eq!(&lump_name("texture1x"), b"TEXTURE1");
        assert_eq!(name_to_string(&lump_name("e1m1")), "E1M1");
    }
}
