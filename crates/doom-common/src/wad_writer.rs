// wad_writer.rs - Builds WAD images in memory

use std::fs;
use std::io;
use std::path::Path;

use crate::wad::{lump_name, WAD_DIRENTRY_SIZE, WAD_HEADER_SIZE};

/// Collects lumps and serialises them as a WAD. The directory is written
/// after the lump data, as the id tools did.
#[derive(Debug, Clone)]
pub struct WadWriter {
    magic: [u8; 4],
    lumps: Vec<([u8; 8], Vec<u8>)>,
}

impl WadWriter {
    pub fn iwad() -> Self {
        Self {
            magic: *b"IWAD",
            lumps: Vec::new(),
        }
    }

    pub fn pwad() -> Self {
        Self {
            magic: *b"PWAD",
            lumps: Vec::new(),
        }
    }

    pub fn add_lump(&mut self, name: &str, data: Vec<u8>) -> &mut Self {
        self.lumps.push((lump_name(name), data));
        self
    }

    /// Zero length lump used as a section marker.
    pub fn add_marker(&mut self, name: &str) -> &mut Self {
        self.add_lump(name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let data_len: usize = self.lumps.iter().map(|(_, d)| d.len()).sum();
        let mut out =
            Vec::with_capacity(WAD_HEADER_SIZE + data_len + self.lumps.len() * WAD_DIRENTRY_SIZE);

        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&(self.lumps.len() as i32).to_le_bytes());
        out.extend_from_slice(&((WAD_HEADER_SIZE + data_len) as i32).to_le_bytes());

        let mut offsets = Vec::with_capacity(self.lumps.len());
        for (_, data) in &self.lumps {
            offsets.push(out.len());
            out.extend_from_slice(data);
        }

        for ((name, data), ofs) in self.lumps.iter().zip(offsets) {
            out.extend_from_slice(&(ofs as i32).to_le_bytes());
            out.extend_from_slice(&(data.len() as i32).to_le_bytes());
            out.extend_from_slice(name);
        }
        out
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::Wad;

    #[test]
    fn test_header_layout() {
        let mut w = WadWriter::pwad();
        w.add_lump("A", vec![1, 2, 3, 4]);
        let bytes = w.to_bytes();
        assert_eq!(&bytes[0..4], b"PWAD");
        assert_eq!(i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 1);
        assert_eq!(i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]), 16);
        assert_eq!(bytes.len(), 12 + 4 + 16);
    }

    #[test]
    fn test_reads_back() {
        let mut w = WadWriter::pwad();
        w.add_marker("S_START").add_lump("TROOA1", vec![5; 10]).add_marker("S_END");
        let mut wad = Wad::new();
        wad.add_bytes("w.wad", w.to_bytes()).unwrap();
        assert_eq!(wad.num_lumps(), 3);
        assert_eq!(wad.lump_by_name("TROOA1").unwrap().len(), 10);
    }
}
