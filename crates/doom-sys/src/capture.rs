// capture.rs - Frame capture. Converted frames are handed to a writer
// thread that checksums them and optionally saves them as PNG files.

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

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use crc::{Crc, Digest, CRC_32_ISO_HDLC};
use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, info};
use parking_lot::Mutex;

use doom_common::doomdef::{SCREENHEIGHT, SCREENWIDTH};
use doom_renderer::rgba_bytes;

/// Checksum applied to each frame's RGBA bytes.
pub static FRAME_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Frames queued before the game thread waits for the writer.
const QUEUE_DEPTH: usize = 8;

/// Name of the per-frame checksum listing in the frame directory.
pub const CHECKSUM_FILE: &str = "checksums.txt";

/// One converted screen, 0xAABBGGRR words.
pub struct Frame {
    pub tic: i32,
    pub rgba: Vec<u32>,
}

/// Running totals, shared between the writer and the game thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames: u64,
    pub files_written: u64,
    pub last_tic: i32,
    pub last_crc: u32,
}

/// Final result of a capture run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSummary {
    pub stats: CaptureStats,
    /// CRC-32 over every frame checksum in order.
    pub run_crc: u32,
}

pub struct Capture {
    tx: Option<Sender<Frame>>,
    handle: Option<JoinHandle<Result<u32>>>,
    stats: Arc<Mutex<CaptureStats>>,
}

// ============================================================
// Writer thread
// ============================================================

struct Writer {
    dir: Option<PathBuf>,
    listing: Option<BufWriter<File>>,
    run: Digest<'static, u32>,
    stats: Arc<Mutex<CaptureStats>>,
}

impl Writer {
    fn new(dir: Option<PathBuf>, stats: Arc<Mutex<CaptureStats>>) -> Result<Writer> {
        let listing = match &dir {
            Some(d) => {
                fs::create_dir_all(d).with_context(|| format!("creating frame directory {}", d.display()))?;
                let path = d.join(CHECKSUM_FILE);
                let f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                Some(BufWriter::new(f))
            }
            None => None,
        };
        Ok(Writer {
            dir,
            listing,
            run: FRAME_CRC.digest(),
            stats,
        })
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let bytes = rgba_bytes(&frame.rgba);
        let crc = FRAME_CRC.checksum(bytes);
        self.run.update(&crc.to_le_bytes());

        let mut written = 0;
        if let Some(dir) = &self.dir {
            let path = frame_path(dir, frame.tic);
            save_png(&path, bytes)?;
            written = 1;
        }
        if let Some(listing) = self.listing.as_mut() {
            writeln!(listing, "{:06} {:08x}", frame.tic, crc)?;
        }

        let mut st = self.stats.lock();
        st.frames += 1;
        st.files_written += written;
        st.last_tic = frame.tic;
        st.last_crc = crc;
        Ok(())
    }

    fn run(mut self, rx: Receiver<Frame>) -> Result<u32> {
        for frame in rx {
            self.write_frame(&frame)?;
        }
        if let Some(mut listing) = self.listing.take() {
            listing.flush()?;
        }
        Ok(self.run.finalize())
    }
}

/// File a captured tic is written to.
pub fn frame_path(dir: &Path, tic: i32) -> PathBuf {
    dir.join(format!("frame{:06}.png", tic))
}

fn save_png(path: &Path, bytes: &[u8]) -> Result<()> {
    let img = image::RgbaImage::from_raw(SCREENWIDTH as u32, SCREENHEIGHT as u32, bytes.to_vec())
        .ok_or_else(|| anyhow!("frame is not {}x{}", SCREENWIDTH, SCREENHEIGHT))?;
    img.save(path).with_context(|| format!("writing {}", path.display()))
}

// ============================================================
// Game thread side
// ============================================================

impl Capture {
    /// Starts the writer. With `dir` every frame is also saved there.
    pub fn start(dir: Option<PathBuf>) -> Result<Capture> {
        let stats = Arc::new(Mutex::new(CaptureStats::default()));
        let writer = Writer::new(dir, stats.clone())?;
        let (tx, rx) = bounded(QUEUE_DEPTH);
        let handle = thread::Builder::new()
            .name("frame-writer".into())
            .spawn(move || writer.run(rx))
            .context("spawning frame writer")?;
        debug!("frame writer started");
        Ok(Capture {
            tx: Some(tx),
            handle: Some(handle),
            stats,
        })
    }

    /// Queues a frame, waiting if the writer is behind. Fails only if the
    /// writer stopped; the error it stopped with is returned.
    pub fn submit(&mut self, frame: Frame) -> Result<()> {
        let Some(tx) = &self.tx else {
            return Err(anyhow!("capture already finished"));
        };
        if tx.send(frame).is_ok() {
            return Ok(());
        }

        // the writer hung up, collect why
        self.tx = None;
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(Err(e))) => Err(e.context("frame writer stopped")),
            Some(Err(_)) => Err(anyhow!("frame writer panicked")),
            _ => Err(anyhow!("frame writer stopped")),
        }
    }

    pub fn stats(&self) -> CaptureStats {
        *self.stats.lock()
    }

    /// Drains the queue and stops the writer.
    pub fn finish(mut self) -> Result<CaptureSummary> {
        self.tx = None;
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("capture already finished"))?;
        let run_crc = handle
            .join()
            .map_err(|_| anyhow!("frame writer panicked"))??;
        let stats = self.stats();
        info!(
            "captured {} frames, {} files, run checksum {:08x}",
            stats.frames, stats.files_written, run_crc
        );
        Ok(CaptureSummary { stats, run_crc })
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        self.tx = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tic: i32, word: u32) -> Frame {
        Frame {
            tic,
            rgba: vec![word; SCREENWIDTH * SCREENHEIGHT],
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("doom-rust-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_checksums_without_files() {
        let mut cap = Capture::start(None).unwrap();
        cap.submit(frame(0, 0xff00_00ff)).unwrap();
        cap.submit(frame(1, 0xff00_ff00)).unwrap();
        let summary = cap.finish().unwrap();

        assert_eq!(summary.stats.frames, 2);
        assert_eq!(summary.stats.files_written, 0);
        assert_eq!(summary.stats.last_tic, 1);
        let expect = FRAME_CRC.checksum(rgba_bytes(&frame(1, 0xff00_ff00).rgba));
        assert_eq!(summary.stats.last_crc, expect);
    }

    #[test]
    fn test_run_checksum_depends_on_order() {
        let run = |words: [u32; 2]| {
            let mut cap = Capture::start(None).unwrap();
            for (i, w) in words.iter().enumerate() {
                cap.submit(frame(i as i32, *w)).unwrap();
            }
            cap.finish().unwrap().run_crc
        };
        assert_eq!(run([1, 2]), run([1, 2]));
        assert_ne!(run([1, 2]), run([2, 1]));
    }

    #[test]
    fn test_frames_written_as_png() {
        let dir = scratch_dir("png");
        let mut cap = Capture::start(Some(dir.clone())).unwrap();
        cap.submit(frame(7, 0xff10_2030)).unwrap();
        let summary = cap.finish().unwrap();
        assert_eq!(summary.stats.files_written, 1);

        let img = image::open(frame_path(&dir, 7)).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (SCREENWIDTH as u32, SCREENHEIGHT as u32));
        assert_eq!(img.get_pixel(5, 5).0, [0x30, 0x20, 0x10, 0xff]);

        let listing = fs::read_to_string(dir.join(CHECKSUM_FILE)).unwrap();
        assert_eq!(listing, format!("000007 {:08x}\n", summary.stats.last_crc));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_error_reaches_submit() {
        let dir = scratch_dir("unwritable");
        // a directory where the frame file should go
        fs::create_dir_all(frame_path(&dir, 3)).unwrap();
        let mut cap = Capture::start(Some(dir.clone())).unwrap();

        let mut err = None;
        for _ in 0..QUEUE_DEPTH + 2 {
            if let Err(e) = cap.submit(frame(3, 0)) {
                err = Some(e);
                break;
            }
        }
        let err = err.expect("writer should stop on the first frame");
        let chain = format!("{:#}", err);
        assert!(chain.contains("frame writer stopped"), "{}", chain);
        assert!(chain.contains("writing"), "{}", chain);
        assert!(cap.submit(frame(4, 0)).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_start_fails_when_directory_is_a_file() {
        // a file where the frame directory should be
        let path = scratch_dir("blocked");
        fs::write(&path, b"x").unwrap();
        assert!(Capture::start(Some(path.clone())).is_err());
        let _ = fs::remove_file(&path);
    }
}
