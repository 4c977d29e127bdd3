// config.rs - Command line options of the headless host

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

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};

use doom_common::doomdef::{GameMode, Skill, TICRATE};
use doom_common::gfx::GAMMA_LEVELS;

/// Tics a warped or opening sequence run lasts when `--tics` is not given.
pub const DEFAULT_RUN_TICS: u32 = 60 * TICRATE as u32;

/// Headless Doom: plays demos, warps into maps or runs the opening
/// sequence, and captures the frames it draws.
#[derive(Parser, Debug, Clone)]
#[command(name = "doom-rust", version, about)]
#[command(group(
    ArgGroup::new("mode")
        .args(["playdemo", "timedemo", "warp", "attract", "loadgame"])
        .multiple(false)
))]
pub struct HostConfig {
    /// The main game WAD
    #[arg(long, default_value = "doom1.wad")]
    pub iwad: PathBuf,

    /// Extra WADs or lumps loaded after the IWAD
    #[arg(long = "file", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Play a demo lump (or NAME.lmp) and exit when it ends
    #[arg(long, value_name = "NAME")]
    pub playdemo: Option<String>,

    /// Play a demo as fast as possible and report the time taken
    #[arg(long, value_name = "NAME")]
    pub timedemo: Option<String>,

    /// Start a game on a map: EPISODE MAP, or MAP for commercial games
    #[arg(long, num_args = 1..=2, value_names = ["EPISODE", "MAP"])]
    pub warp: Option<Vec<i32>>,

    /// Run the title pages and demo cycle
    #[arg(long)]
    pub attract: bool,

    /// Continue a saved game
    #[arg(long, value_name = "PATH")]
    pub loadgame: Option<PathBuf>,

    /// Skill level, 1 to 5
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub skill: u8,

    /// Monsters respawn after being killed
    #[arg(long)]
    pub respawn: bool,

    /// Fast monsters and projectiles
    #[arg(long)]
    pub fast: bool,

    /// Spawn no monsters
    #[arg(long)]
    pub nomonsters: bool,

    /// Game tics to run; demos otherwise run to their end
    #[arg(long)]
    pub tics: Option<u32>,

    /// Record the game's commands to a demo file
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Save the game to `--savefile` when this tic is reached
    #[arg(long, value_name = "TIC")]
    pub save_at: Option<u32>,

    /// Reload `--savefile` when this tic is reached
    #[arg(long, value_name = "TIC")]
    pub load_at: Option<u32>,

    #[arg(long, default_value = "doomsav0.dsg")]
    pub savefile: PathBuf,

    /// Write captured frames as PNG files into this directory
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Capture every Nth tic
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_interval: u32,

    /// Gamma correction level
    #[arg(long, default_value_t = 0)]
    pub gamma: usize,

    /// View size, 3 to 11
    #[arg(long, default_value_t = 11, value_parser = clap::value_parser!(i32).range(3..=11))]
    pub screenblocks: i32,

    /// Draw the view at half horizontal resolution
    #[arg(long)]
    pub low_detail: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the host does with the game once it is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    PlayDemo(String),
    TimeDemo(String),
    Warp { skill: Skill, episode: i32, map: i32 },
    LoadGame(PathBuf),
    Attract,
}

impl HostConfig {
    /// The run mode the options select, checked against the game mode
    /// of the loaded IWAD.
    pub fn run_mode(&self, gamemode: GameMode) -> Result<RunMode> {
        if let Some(name) = &self.playdemo {
            return Ok(RunMode::PlayDemo(name.clone()));
        }
        if let Some(name) = &self.timedemo {
            return Ok(RunMode::TimeDemo(name.clone()));
        }
        if let Some(path) = &self.loadgame {
            return Ok(RunMode::LoadGame(path.clone()));
        }
        if let Some(args) = &self.warp {
            let (episode, map) = match (gamemode, args.as_slice()) {
                (GameMode::Commercial, [map]) => (1, *map),
                (GameMode::Commercial, [_, map]) => (1, *map),
                (_, [episode, map]) => (*episode, *map),
                (_, [episode]) => (*episode, 1),
                _ => bail!("--warp needs a map"),
            };
            return Ok(RunMode::Warp {
                skill: self.skill(),
                episode,
                map,
            });
        }
        Ok(RunMode::Attract)
    }

    pub fn skill(&self) -> Skill {
        Skill::from_u8(self.skill.saturating_sub(1)).unwrap_or_default()
    }

    pub fn gamma(&self) -> usize {
        self.gamma.min(GAMMA_LEVELS - 1)
    }

    /// Tic limit of the run, if any.
    pub fn tic_limit(&self, mode: &RunMode) -> Option<u32> {
        match (self.tics, mode) {
            (Some(t), _) => Some(t),
            (None, RunMode::PlayDemo(_) | RunMode::TimeDemo(_)) => None,
            (None, _) => Some(DEFAULT_RUN_TICS),
        }
    }

    pub fn detail(&self) -> i32 {
        i32::from(self.low_detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> HostConfig {
        HostConfig::try_parse_from(std::iter::once("doom-rust").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_run_the_opening_sequence() {
        let c = parse(&[]);
        assert_eq!(c.iwad, PathBuf::from("doom1.wad"));
        assert_eq!(c.run_mode(GameMode::Shareware).unwrap(), RunMode::Attract);
        assert_eq!(c.skill(), Skill::Medium);
        assert_eq!(c.tic_limit(&RunMode::Attract), Some(DEFAULT_RUN_TICS));
        assert_eq!(c.screenblocks, 11);
        assert_eq!(c.detail(), 0);
    }

    #[test]
    fn test_warp_episode_and_map() {
        let c = parse(&["--warp", "2", "5", "--skill", "4"]);
        assert_eq!(
            c.run_mode(GameMode::Registered).unwrap(),
            RunMode::Warp {
                skill: Skill::Hard,
                episode: 2,
                map: 5
            }
        );
    }

    #[test]
    fn test_warp_single_number_is_the_map_in_commercial() {
        let c = parse(&["--warp", "7"]);
        match c.run_mode(GameMode::Commercial).unwrap() {
            RunMode::Warp { episode, map, .. } => assert_eq!((episode, map), (1, 7)),
            m => panic!("unexpected mode {:?}", m),
        }
        match c.run_mode(GameMode::Retail).unwrap() {
            RunMode::Warp { episode, map, .. } => assert_eq!((episode, map), (7, 1)),
            m => panic!("unexpected mode {:?}", m),
        }
    }

    #[test]
    fn test_demos_run_to_the_end() {
        let c = parse(&["--timedemo", "demo1"]);
        let mode = c.run_mode(GameMode::Shareware).unwrap();
        assert_eq!(mode, RunMode::TimeDemo("demo1".into()));
        assert_eq!(c.tic_limit(&mode), None);

        let c = parse(&["--playdemo", "demo2", "--tics", "10"]);
        let mode = c.run_mode(GameMode::Shareware).unwrap();
        assert_eq!(c.tic_limit(&mode), Some(10));
    }

    #[test]
    fn test_modes_are_exclusive() {
        let r = HostConfig::try_parse_from(["doom-rust", "--attract", "--playdemo", "demo1"]);
        assert!(r.is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(HostConfig::try_parse_from(["doom-rust", "--skill", "6"]).is_err());
        assert!(HostConfig::try_parse_from(["doom-rust", "--screenblocks", "2"]).is_err());
        assert!(HostConfig::try_parse_from(["doom-rust", "--frame-interval", "0"]).is_err());
        let c = parse(&["--gamma", "9"]);
        assert_eq!(c.gamma(), GAMMA_LEVELS - 1);
    }

    #[test]
    fn test_save_and_load_tics() {
        let c = parse(&["--warp", "1", "1", "--save-at", "10", "--load-at", "20"]);
        assert_eq!(c.save_at, Some(10));
        assert_eq!(c.load_at, Some(20));
        assert_eq!(c.savefile, PathBuf::from("doomsav0.dsg"));
    }

    #[test]
    fn test_extra_files() {
        let c = parse(&["--file", "a.wad", "b.lmp", "--skill", "1"]);
        assert_eq!(c.files, vec![PathBuf::from("a.wad"), PathBuf::from("b.lmp")]);
        assert_eq!(c.skill(), Skill::Baby);
    }
}
