// host.rs - The headless main loop. Runs game tics, draws the view or the
// current page after each one and hands the frames to the capture thread.

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
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use log::{debug, info, trace, warn};

use doom_common::doomdef::{MAXPLAYERS, TICRATE};
use doom_common::gfx::Patch;
use doom_common::resources::Resources;
use doom_common::ticcmd::TicCmd;
use doom_common::wad::Wad;
use doom_game::info::SPRNAMES;
use doom_game::{Game, GameState, SaveError};
use doom_renderer::{player_palette, Framebuffer, Renderer};

use crate::capture::{Capture, CaptureSummary, Frame};
use crate::config::{HostConfig, RunMode};

/// What a finished run did.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub tics: u32,
    pub realtime: Duration,
    pub sounds: u64,
    pub capture: CaptureSummary,
}

impl RunReport {
    /// Elapsed time in 1/35 second tics, as the timedemo report gives it.
    pub fn realtics(&self) -> u64 {
        (self.realtime.as_micros() * TICRATE as u128 / 1_000_000) as u64
    }

    pub fn fps(&self) -> f64 {
        let secs = self.realtime.as_secs_f64();
        if secs > 0.0 {
            self.capture.stats.frames as f64 / secs
        } else {
            0.0
        }
    }
}

// ============================================================
// WAD files
// ============================================================

/// Demo lump name for a `--playdemo` argument: the file's base name.
pub fn demo_lump_name(arg: &str) -> String {
    let base = Path::new(arg)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(arg);
    base.chars().take(8).collect::<String>().to_uppercase()
}

/// Loads the IWAD, the extra files and a demo given as a file.
pub fn load_wads(cfg: &HostConfig) -> Result<Wad> {
    let mut wad = Wad::new();
    wad.add_file(&cfg.iwad)
        .with_context(|| format!("loading {}", cfg.iwad.display()))?;
    if !wad.has_iwad() {
        bail!("{} is not an IWAD", cfg.iwad.display());
    }
    for f in &cfg.files {
        wad.add_file(f)
            .with_context(|| format!("loading {}", f.display()))?;
    }

    // -playdemo demo1 finds demo1.lmp if there is one
    if let Some(name) = cfg.playdemo.as_ref().or(cfg.timedemo.as_ref()) {
        let file = demo_file_path(name);
        if file.exists() {
            info!("demo file {}", file.display());
            wad.add_file(&file)
                .with_context(|| format!("loading {}", file.display()))?;
        }
    }
    info!("{} lumps", wad.num_lumps());
    Ok(wad)
}

fn demo_file_path(name: &str) -> PathBuf {
    let p = PathBuf::from(name);
    if p.extension().is_some() {
        p
    } else {
        p.with_extension("lmp")
    }
}

// ============================================================
// Host
// ============================================================

pub struct Host {
    game: Game,
    renderer: Renderer,
    fb: Framebuffer,
    /// Decoded full screen pages. `None` marks a page missing from the WAD.
    pages: HashMap<&'static str, Option<Patch>>,
    capture: Capture,

    gamma: usize,
    frame_interval: u32,
    tic_limit: Option<u32>,
    save_at: Option<u32>,
    load_at: Option<u32>,
    savefile: PathBuf,
    record: Option<PathBuf>,
    timing: bool,
    sounds: u64,
}

impl Host {
    /// Sets up the game for the selected run mode.
    pub fn new(wad: Wad, cfg: &HostConfig) -> Result<Host> {
        let wad = Arc::new(wad);
        let res = Arc::new(Resources::load(&wad, &SPRNAMES).context("loading graphics")?);
        let mut game = Game::new(wad, res);

        let mut renderer = Renderer::new();
        renderer.set_view_size(cfg.screenblocks, cfg.detail());

        let mode = cfg.run_mode(game.gamemode)?;
        let mut record = cfg.record.clone();
        match &mode {
            RunMode::PlayDemo(name) => game.play_demo(&demo_lump_name(name)),
            RunMode::TimeDemo(name) => game.time_demo(&demo_lump_name(name)),
            RunMode::Warp { skill, episode, map } => {
                game.options.respawnmonsters = cfg.respawn;
                game.options.fastparm = cfg.fast;
                game.options.nomonsters = cfg.nomonsters;
                game.init_new(*skill, *episode, *map)
                    .with_context(|| format!("starting episode {} map {}", episode, map))?;
                if record.is_some() {
                    game.begin_recording();
                }
            }
            RunMode::LoadGame(path) => {
                let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
                game.load_game(&data)
                    .with_context(|| format!("loading saved game {}", path.display()))?;
            }
            RunMode::Attract => game.start_title(),
        }
        if record.is_some() && !matches!(mode, RunMode::Warp { .. }) {
            warn!("--record only applies to a warped game");
            record = None;
        }
        debug!("run mode {:?}", mode);

        Ok(Host {
            game,
            renderer,
            fb: Framebuffer::new(),
            pages: HashMap::new(),
            capture: Capture::start(cfg.frames.clone())?,
            gamma: cfg.gamma(),
            frame_interval: cfg.frame_interval.max(1),
            tic_limit: cfg.tic_limit(&mode),
            save_at: cfg.save_at,
            load_at: cfg.load_at,
            savefile: cfg.savefile.clone(),
            record,
            timing: matches!(mode, RunMode::TimeDemo(_)),
            sounds: 0,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Runs until the game quits or the tic limit is reached.
    pub fn run(mut self) -> Result<RunReport> {
        let cmds = [TicCmd::default(); MAXPLAYERS];
        let start = Instant::now();
        let mut tics = 0u32;

        while !self.game.quit_requested() && self.tic_limit.map_or(true, |l| tics < l) {
            self.game.ticker(&cmds)?;
            tics += 1;
            self.drain_sounds();

            if self.save_at == Some(tics) {
                self.save()?;
            }
            if self.load_at == Some(tics) {
                self.load()?;
            }
            if self.game.quit_requested() {
                break;
            }
            if tics % self.frame_interval == 0 {
                self.display();
                let rgba = self.convert();
                self.capture.submit(Frame {
                    tic: self.game.gametic,
                    rgba,
                })?;
            }
        }
        let realtime = start.elapsed();

        if let Some(path) = self.record.take() {
            if let Some(lump) = self.game.finish_recording() {
                fs::write(&path, lump).with_context(|| format!("writing demo {}", path.display()))?;
                info!("recorded {}", path.display());
            }
        }

        let Host { capture, sounds, timing, .. } = self;
        let report = RunReport {
            tics,
            realtime,
            sounds,
            capture: capture.finish()?,
        };
        if timing {
            info!("timed {} gametics in {} realtics", report.tics, report.realtics());
        }
        Ok(report)
    }

    /// Draws the current screen into the framebuffer.
    pub fn display(&mut self) {
        match self.game.state {
            GameState::Level => match &self.game.world {
                Some(w) => self
                    .renderer
                    .render_player_view(w, self.game.consoleplayer, &mut self.fb),
                None => self.fb.fill(0),
            },
            GameState::DemoScreen => self.draw_page(),
        }
    }

    fn draw_page(&mut self) {
        let name = self.game.page_name();
        let wad = self.game.wad();
        let page = self.pages.entry(name).or_insert_with(|| {
            match Resources::load_patch(wad, name) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("page {}: {}", name, e);
                    None
                }
            }
        });
        match page {
            Some(p) => self.fb.draw_page(p),
            None => self.fb.fill(0),
        }
    }

    /// The framebuffer through the palette the console player's state
    /// calls for.
    fn convert(&self) -> Vec<u32> {
        let palette = match (&self.game.state, &self.game.world) {
            (GameState::Level, Some(w)) => player_palette(&w.players[self.game.consoleplayer]),
            _ => 0,
        };
        self.fb
            .to_rgba(&self.game.resources().palettes, palette, self.gamma)
    }

    fn drain_sounds(&mut self) {
        let Some(w) = self.game.world.as_mut() else {
            return;
        };
        for s in w.take_sounds() {
            trace!("tic {}: {:?} from {:?}", s.tic, s.sfx, s.origin);
            self.sounds += 1;
        }
    }

    fn save(&mut self) -> Result<()> {
        match self.game.save_game() {
            Ok(data) => {
                fs::write(&self.savefile, data)
                    .with_context(|| format!("writing {}", self.savefile.display()))?;
                info!("game saved to {} at tic {}", self.savefile.display(), self.game.gametic);
            }
            Err(SaveError::NotInLevel) => warn!("no level to save at tic {}", self.game.gametic),
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        let data = fs::read(&self.savefile)
            .with_context(|| format!("reading {}", self.savefile.display()))?;
        self.game
            .load_game(&data)
            .with_context(|| format!("loading saved game {}", self.savefile.display()))?;
        info!("game loaded from {} at tic {}", self.savefile.display(), self.game.gametic);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use doom_common::testkit;

    fn config(args: &[&str]) -> HostConfig {
        HostConfig::try_parse_from(std::iter::once("doom-rust").chain(args.iter().copied())).unwrap()
    }

    fn host(args: &[&str]) -> Host {
        Host::new(testkit::wad(), &config(args)).unwrap()
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("doom-rust-host-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_demo_lump_name() {
        assert_eq!(demo_lump_name("demo1"), "DEMO1");
        assert_eq!(demo_lump_name("runs/mylongdemo.lmp"), "MYLONGDE");
        assert_eq!(demo_file_path("demo1"), PathBuf::from("demo1.lmp"));
        assert_eq!(demo_file_path("x.lmp"), PathBuf::from("x.lmp"));
    }

    #[test]
    fn test_attract_shows_title_page() {
        let mut h = host(&["--tics", "1"]);
        h.game.ticker(&[TicCmd::default(); MAXPLAYERS]).unwrap();
        assert_eq!(h.game.state, GameState::DemoScreen);
        h.display();
        // the test pages are (x + y) % 255
        assert_eq!(h.fb.pixel(3, 4), 7);
        assert_eq!(h.fb.pixel(300, 100), 145);
    }

    #[test]
    fn test_attract_run_captures_every_tic() {
        let report = host(&["--attract", "--tics", "20"]).run().unwrap();
        assert_eq!(report.tics, 20);
        assert_eq!(report.capture.stats.frames, 20);
        assert_eq!(report.capture.stats.files_written, 0);
    }

    #[test]
    fn test_frame_interval() {
        let report = host(&["--tics", "20", "--frame-interval", "5"]).run().unwrap();
        assert_eq!(report.capture.stats.frames, 4);
    }

    #[test]
    fn test_play_demo_quits_at_the_end() {
        let report = host(&["--playdemo", "demo1"]).run().unwrap();
        // 70 tics of commands, then the end marker
        assert_eq!(report.tics, 71);
        assert_eq!(report.capture.stats.frames, 70);
    }

    #[test]
    fn test_same_demo_same_checksums() {
        let a = host(&["--timedemo", "demo2"]).run().unwrap();
        let b = host(&["--playdemo", "demo2"]).run().unwrap();
        assert_eq!(a.capture.run_crc, b.capture.run_crc);
        assert_ne!(a.capture.run_crc, host(&["--playdemo", "demo1"]).run().unwrap().capture.run_crc);
    }

    #[test]
    fn test_warp_renders_the_level() {
        let mut h = host(&["--warp", "1", "2", "--skill", "5"]);
        assert_eq!(h.game.state, GameState::Level);
        let w = h.game.world.as_ref().unwrap();
        assert_eq!(w.level.name, "E1M2");
        assert!(w.options.respawnmonsters);

        h.display();
        let title = {
            let mut a = host(&[]);
            a.game.ticker(&[TicCmd::default(); MAXPLAYERS]).unwrap();
            a.display();
            a.fb.pixels().to_vec()
        };
        assert_ne!(h.fb.pixels(), &title[..]);
    }

    #[test]
    fn test_warp_options() {
        let h = host(&["--warp", "1", "1", "--fast", "--nomonsters"]);
        let opts = h.game.options;
        assert!(opts.fastparm);
        assert!(opts.nomonsters);
        assert!(!opts.respawnmonsters);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("save.dsg");
        let p = path.to_str().unwrap();
        let report = host(&["--warp", "1", "1", "--tics", "10", "--save-at", "5", "--savefile", p])
            .run()
            .unwrap();
        assert_eq!(report.tics, 10);
        assert!(path.exists());

        let h = host(&["--loadgame", p, "--tics", "3"]);
        assert_eq!(h.game.state, GameState::Level);
        assert_eq!(h.game.world.as_ref().unwrap().level.name, "E1M1");
        assert_eq!(h.run().unwrap().tics, 3);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_at_restores_the_saved_state() {
        let path = scratch("reload.dsg");
        let p = path.to_str().unwrap();
        let mut h = host(&["--warp", "1", "1", "--savefile", p]);
        h.game.ticker(&[TicCmd::default(); MAXPLAYERS]).unwrap();
        h.save().unwrap();

        let w = h.game.world.as_mut().unwrap();
        let mo = w.players[0].mo.unwrap();
        let x = w.mobjs[mo].x;
        w.mobjs[mo].x += 64 << doom_common::FRACBITS;

        h.load().unwrap();
        let w = h.game.world.as_ref().unwrap();
        let mo = w.players[0].mo.unwrap();
        assert_eq!(w.mobjs[mo].x, x);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_outside_a_level_is_not_fatal() {
        let path = scratch("nosave.dsg");
        let p = path.to_str().unwrap();
        let report = host(&["--tics", "3", "--save-at", "2", "--savefile", p]).run().unwrap();
        assert_eq!(report.tics, 3);
        assert!(!path.exists());
    }

    #[test]
    fn test_record_then_play_back() {
        let path = scratch("rec.lmp");
        let p = path.to_str().unwrap();
        host(&["--warp", "1", "1", "--tics", "30", "--record", p]).run().unwrap();
        let lump = fs::read(&path).unwrap();
        assert_eq!(lump[0], 109);
        assert_eq!(lump.last(), Some(&0x80));
        // 13 byte header, 4 bytes a tic
        assert_eq!(lump.len(), 13 + 30 * 4 + 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_frame_write_error_is_reported() {
        let dir = scratch("blocked-frames");
        let _ = fs::remove_dir_all(&dir);
        for tic in 1..=40 {
            fs::create_dir_all(crate::capture::frame_path(&dir, tic)).unwrap();
        }
        let d = dir.to_str().unwrap();
        let err = host(&["--attract", "--tics", "40", "--frames", d]).run().unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("writing"), "{}", chain);
        assert!(chain.contains("frame000001.png"), "{}", chain);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_demo_fails_the_run() {
        assert!(host(&["--playdemo", "demo9"]).run().is_err());
    }
}
