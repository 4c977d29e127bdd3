// game.rs - Game loop functions, events handling: level flow, reborns,
//  demo playback and recording, the opening sequence.

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

use std::sync::Arc;

use log::{debug, info, warn};

use doom_common::doomdef::{GameMode, Skill, MAXPLAYERS, TICRATE};
use doom_common::fixed::{Fixed, FRACBITS};
use doom_common::random::DoomRandom;
use doom_common::resources::Resources;
use doom_common::tables::{fine_index, finecosine, finesine, ANG45};
use doom_common::ticcmd::TicCmd;
use doom_common::wad::Wad;
use doom_common::wadfiles::MapThing;

use crate::demo::{Demo, DemoHeader, DemoRecorder};
use crate::error::{DemoError, GameError, SaveError};
use crate::info::{MobjType, SfxId};
use crate::map::check_position;
use crate::mobj::{remove_mobj, spawn_mobj, spawn_player};
use crate::player::{Player, PlayerState};
use crate::saveg;
use crate::setup::{load_level, setup_level};
use crate::world::{GameOptions, LevelExit, World};

/// Corpses kept around in multiplayer before the oldest is removed.
pub const BODYQUESIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Playing or watching a demo.
    Level,
    /// A full screen page of the opening sequence.
    DemoScreen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GameAction {
    Nothing,
    LoadLevel,
    NewGame { skill: Skill, episode: i32, map: i32 },
    PlayDemo(String),
    Completed,
    Victory,
}

pub struct Game {
    wad: Arc<Wad>,
    res: Arc<Resources>,

    pub gamemode: GameMode,
    pub options: GameOptions,
    pub state: GameState,
    action: GameAction,

    /// The level being played. Players and the random number generator
    /// live here while a level is loaded.
    pub world: Option<World>,
    players: [Player; MAXPLAYERS],
    rng: DoomRandom,

    pub playeringame: [bool; MAXPLAYERS],
    pub consoleplayer: usize,
    pub gametic: i32,
    /// A game started by the user rather than a demo.
    pub usergame: bool,
    secretexit: bool,

    demo: Option<Demo>,
    recorder: Option<DemoRecorder>,
    /// Quit after the demo rather than going back to the opening sequence.
    pub singledemo: bool,
    pub timingdemo: bool,
    quit: bool,

    demosequence: i32,
    pagetic: i32,
    pagename: &'static str,
    advancedemo: bool,
}

impl Game {
    pub fn new(wad: Arc<Wad>, res: Arc<Resources>) -> Game {
        let gamemode = wad.identify_game_mode();
        info!("game mode {:?}", gamemode);
        let mut playeringame = [false; MAXPLAYERS];
        playeringame[0] = true;
        Game {
            wad,
            res,
            gamemode,
            options: GameOptions {
                gamemode,
                ..Default::default()
            },
            state: GameState::DemoScreen,
            action: GameAction::Nothing,
            world: None,
            players: Default::default(),
            rng: DoomRandom::new(),
            playeringame,
            consoleplayer: 0,
            gametic: 0,
            usergame: false,
            secretexit: false,
            demo: None,
            recorder: None,
            singledemo: false,
            timingdemo: false,
            quit: false,
            demosequence: -1,
            pagetic: 0,
            pagename: "TITLEPIC",
            advancedemo: false,
        }
    }

    pub fn wad(&self) -> &Arc<Wad> {
        &self.wad
    }

    pub fn resources(&self) -> &Arc<Resources> {
        &self.res
    }

    /// Page shown while in `GameState::DemoScreen`.
    pub fn page_name(&self) -> &'static str {
        self.pagename
    }

    pub fn demo_playing(&self) -> bool {
        self.demo.is_some()
    }

    /// A single demo finished, or the game ended.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn map_name(&self, episode: i32, map: i32) -> String {
        if self.gamemode == GameMode::Commercial {
            format!("MAP{:02}", map)
        } else {
            format!("E{}M{}", episode, map)
        }
    }

    // ============================================================
    // New game and level loading
    // ============================================================

    /// Can be called by the startup code or the menu task; the game
    /// starts on the next tic.
    pub fn defer_new_game(&mut self, skill: Skill, episode: i32, map: i32) {
        self.action = GameAction::NewGame { skill, episode, map };
    }

    fn do_new_game(&mut self, skill: Skill, episode: i32, map: i32) -> Result<(), GameError> {
        self.demo = None;
        self.options.netgame = false;
        self.options.deathmatch = 0;
        self.playeringame = [true, false, false, false];
        self.options.respawnmonsters = false;
        self.options.fastparm = false;
        self.options.nomonsters = false;
        self.consoleplayer = 0;
        self.init_new(skill, episode, map)
    }

    /// Starts a game on a given map with the flags in `options`, loading
    /// the level right away.
    pub fn init_new(&mut self, skill: Skill, mut episode: i32, mut map: i32) -> Result<(), GameError> {
        if episode < 1 {
            episode = 1;
        }
        match self.gamemode {
            GameMode::Retail => episode = episode.min(4),
            GameMode::Shareware => episode = episode.min(1),
            _ => episode = episode.min(3),
        }
        if map < 1 {
            map = 1;
        }
        if map > 9 && self.gamemode != GameMode::Commercial {
            map = 9;
        }

        self.rng_mut().clear();

        if skill == Skill::Nightmare {
            self.options.respawnmonsters = true;
        }

        // force players to be initialized upon first level load
        let players = self.world.as_mut().map_or(&mut self.players, |w| &mut w.players);
        for p in players.iter_mut() {
            p.playerstate = PlayerState::Reborn;
        }

        self.usergame = true;
        self.options.skill = skill;
        self.options.episode = episode;
        self.options.map = map;

        self.do_load_level()
    }

    fn rng_mut(&mut self) -> &mut DoomRandom {
        match &mut self.world {
            Some(w) => &mut w.rng,
            None => &mut self.rng,
        }
    }

    fn do_load_level(&mut self) -> Result<(), GameError> {
        let name = self.map_name(self.options.episode, self.options.map);
        info!("loading {} (skill {:?})", name, self.options.skill);
        let level = load_level(&self.wad, &self.res, &name)?;

        let (players, rng) = match self.world.take() {
            Some(w) => (w.players, w.rng),
            None => (std::mem::take(&mut self.players), self.rng),
        };

        self.options.gamemode = self.gamemode;
        let mut w = World::new(level, self.res.clone(), self.options);
        w.rng = rng;
        w.players = players;
        w.playeringame = self.playeringame;
        w.consoleplayer = self.consoleplayer;

        for (i, p) in w.players.iter_mut().enumerate() {
            if !self.playeringame[i] {
                continue;
            }
            if p.playerstate == PlayerState::Dead {
                p.playerstate = PlayerState::Reborn;
            }
            p.frags = [0; MAXPLAYERS];
            p.killcount = 0;
            p.secretcount = 0;
            p.itemcount = 0;
        }

        setup_level(&mut w);

        // if deathmatch, randomly spawn the active players
        if self.options.deathmatch != 0 {
            for i in 0..MAXPLAYERS {
                if self.playeringame[i] {
                    w.players[i].mo = None;
                    deathmatch_spawn_player(&mut w, i);
                }
            }
        }

        self.world = Some(w);
        self.state = GameState::Level;
        Ok(())
    }

    // ============================================================
    // Reborn
    // ============================================================

    fn do_reborn(&mut self, pnum: usize) {
        if !self.options.netgame {
            // reload the level from scratch
            self.action = GameAction::LoadLevel;
            return;
        }
        let Some(w) = self.world.as_mut() else {
            return;
        };

        // dissasociate the corpse
        if let Some(mo) = w.players[pnum].mo {
            if let Some(m) = w.mobjs.get_mut(mo) {
                m.player = None;
            }
        }

        // spawn at random spot if in death match
        if self.options.deathmatch != 0 {
            deathmatch_spawn_player(w, pnum);
            return;
        }

        if let Some(start) = w.playerstarts[pnum] {
            if check_spot(w, pnum, &start) {
                spawn_player(w, &start);
                return;
            }
        }

        // try to spawn at one of the other players spots
        for i in 0..MAXPLAYERS {
            let Some(mut start) = w.playerstarts[i] else {
                continue;
            };
            if check_spot(w, pnum, &start) {
                // fake as other player
                start.kind = pnum as i16 + 1;
                spawn_player(w, &start);
                return;
            }
        }

        // he's going to be inside something.  Too bad.
        if let Some(start) = w.playerstarts[pnum] {
            spawn_player(w, &start);
        }
    }

    // ============================================================
    // Level completion
    // ============================================================

    fn do_completed(&mut self) -> Result<(), GameError> {
        self.action = GameAction::Nothing;
        let commercial = self.gamemode == GameMode::Commercial;
        let map = self.options.map;

        if let Some(w) = self.world.as_mut() {
            for i in 0..MAXPLAYERS {
                if self.playeringame[i] {
                    w.players[i].finish_level();
                }
            }
            if !commercial && map == 9 {
                for p in w.players.iter_mut() {
                    p.didsecret = true;
                }
            }
            if self.secretexit {
                w.players[self.consoleplayer].didsecret = true;
            }
        }

        if (!commercial && map == 8) || (commercial && map == 30) {
            self.action = GameAction::Victory;
            return Ok(());
        }

        let next = self.next_map();
        debug!(
            "{} done, next {}",
            self.map_name(self.options.episode, map),
            self.map_name(self.options.episode, next)
        );
        self.options.map = next;
        self.do_load_level()
    }

    /// Map after the current one, given how it was left.
    fn next_map(&self) -> i32 {
        let map = self.options.map;
        if self.gamemode == GameMode::Commercial {
            if self.secretexit {
                match map {
                    15 => 31,
                    31 => 32,
                    _ => map + 1,
                }
            } else {
                match map {
                    31 | 32 => 16,
                    _ => map + 1,
                }
            }
        } else if self.secretexit {
            // go to secret level
            9
        } else if map == 9 {
            // returning from secret level
            match self.options.episode {
                1 => 4,
                2 => 6,
                3 => 7,
                _ => 3,
            }
        } else {
            map + 1
        }
    }

    fn note_exit(&mut self, exit: LevelExit) {
        self.secretexit = match exit {
            LevelExit::Normal => false,
            // IF NO WOLF3D LEVELS, NO SECRET EXIT!
            LevelExit::Secret => {
                self.gamemode != GameMode::Commercial || self.wad.check_num_for_name("MAP31").is_some()
            }
        };
        self.action = GameAction::Completed;
    }

    // ============================================================
    // Demos
    // ============================================================

    /// Plays one demo and quits when it ends.
    pub fn play_demo(&mut self, name: &str) {
        self.singledemo = true;
        self.action = GameAction::PlayDemo(name.to_string());
    }

    /// Like `play_demo`, for benchmarking: the host times the run.
    pub fn time_demo(&mut self, name: &str) {
        self.timingdemo = true;
        self.play_demo(name);
    }

    fn do_play_demo(&mut self, name: &str) -> Result<(), GameError> {
        self.action = GameAction::Nothing;
        let data = self.wad.lump_by_name(name).map_err(DemoError::from)?.to_vec();
        let demo = Demo::parse(data)?;
        let h = demo.header;

        self.options.deathmatch = h.deathmatch;
        self.options.respawnmonsters = h.respawnparm;
        self.options.fastparm = h.fastparm;
        self.options.nomonsters = h.nomonsters;
        self.consoleplayer = h.consoleplayer;
        self.playeringame = h.playeringame;
        self.options.netgame = h.playeringame[1..].iter().any(|&p| p);

        info!(
            "playing {} (E{}M{}, skill {:?})",
            name.to_uppercase(),
            h.episode,
            h.map,
            h.skill
        );

        // don't spend a lot of time in loadlevel
        self.init_new(h.skill, h.episode, h.map)?;
        self.usergame = false;
        self.demo = Some(demo);
        Ok(())
    }

    /// Demo ran out: back to the opening sequence, or quit for a single
    /// demo.
    fn check_demo_status(&mut self) {
        if self.timingdemo {
            info!("timed {} gametics", self.gametic);
        }
        self.demo = None;
        if self.singledemo {
            self.quit = true;
            return;
        }

        self.options.netgame = false;
        self.options.deathmatch = 0;
        self.playeringame = [false; MAXPLAYERS];
        self.options.respawnmonsters = false;
        self.options.fastparm = false;
        self.options.nomonsters = false;
        self.consoleplayer = 0;
        if let Some(w) = self.world.as_mut() {
            w.playeringame = [false; MAXPLAYERS];
        }
        self.advance_demo();
    }

    /// Starts recording the current game's commands.
    pub fn begin_recording(&mut self) {
        let header = DemoHeader {
            version: crate::demo::VERSION,
            skill: self.options.skill,
            episode: self.options.episode,
            map: self.options.map,
            deathmatch: self.options.deathmatch,
            respawnparm: self.options.respawnmonsters,
            fastparm: self.options.fastparm,
            nomonsters: self.options.nomonsters,
            consoleplayer: self.consoleplayer,
            playeringame: self.playeringame,
        };
        self.recorder = Some(DemoRecorder::new(header));
    }

    /// The recorded demo lump, if recording.
    pub fn finish_recording(&mut self) -> Option<Vec<u8>> {
        self.recorder.take().map(DemoRecorder::finish)
    }

    // ============================================================
    // Opening sequence
    // ============================================================

    pub fn start_title(&mut self) {
        self.demosequence = -1;
        self.advance_demo();
    }

    /// Called after each demo or intro demosequence finishes.
    pub fn advance_demo(&mut self) {
        self.advancedemo = true;
    }

    /// This cycles through the demo sequences.
    fn do_advance_demo(&mut self) {
        let consoleplayer = self.consoleplayer;
        if let Some(w) = self.world.as_mut() {
            // not reborn
            w.players[consoleplayer].playerstate = PlayerState::Live;
        }
        self.advancedemo = false;
        self.usergame = false;
        self.action = GameAction::Nothing;

        let commercial = self.gamemode == GameMode::Commercial;
        let len = if self.gamemode == GameMode::Retail { 7 } else { 6 };
        self.demosequence = (self.demosequence + 1) % len;

        match self.demosequence {
            0 => {
                self.pagetic = if commercial { TICRATE * 11 } else { 170 };
                self.state = GameState::DemoScreen;
                self.pagename = "TITLEPIC";
            }
            1 => self.action = GameAction::PlayDemo("DEMO1".to_string()),
            2 => {
                self.pagetic = 200;
                self.state = GameState::DemoScreen;
                self.pagename = "CREDIT";
            }
            3 => self.action = GameAction::PlayDemo("DEMO2".to_string()),
            4 => {
                self.state = GameState::DemoScreen;
                if commercial {
                    self.pagetic = TICRATE * 11;
                    self.pagename = "TITLEPIC";
                } else {
                    self.pagetic = 200;
                    self.pagename = if self.gamemode == GameMode::Retail {
                        "CREDIT"
                    } else {
                        "HELP2"
                    };
                }
            }
            5 => self.action = GameAction::PlayDemo("DEMO3".to_string()),
            // THE DEFINITIVE DOOM Special Edition demo
            _ => self.action = GameAction::PlayDemo("DEMO4".to_string()),
        }
        debug!("demo sequence {}", self.demosequence);
    }

    /// Handles timing for warped projection
    fn page_ticker(&mut self) {
        self.pagetic -= 1;
        if self.pagetic < 0 {
            self.advance_demo();
        }
    }

    // ============================================================
    // Saved games
    // ============================================================

    pub fn save_game(&self) -> Result<Vec<u8>, SaveError> {
        match &self.world {
            Some(w) if self.state == GameState::Level => Ok(saveg::save_game(w)),
            _ => Err(SaveError::NotInLevel),
        }
    }

    pub fn load_game(&mut self, data: &[u8]) -> Result<(), GameError> {
        let w = saveg::load_game(&self.wad, self.res.clone(), data)?;
        self.options = w.options;
        self.playeringame = w.playeringame;
        self.consoleplayer = w.consoleplayer;
        self.world = Some(w);
        self.demo = None;
        self.state = GameState::Level;
        self.action = GameAction::Nothing;
        self.usergame = true;
        info!("loaded saved game on {}", self.map_name(self.options.episode, self.options.map));
        Ok(())
    }

    // ============================================================
    // Ticker
    // ============================================================

    /// Make ticcmd_ts for the players. `cmds` is used for players not
    /// driven by a demo.
    pub fn ticker(&mut self, cmds: &[TicCmd; MAXPLAYERS]) -> Result<(), GameError> {
        if self.quit {
            return Ok(());
        }
        if self.advancedemo {
            self.do_advance_demo();
        }

        // do player reborns if needed
        if self.state == GameState::Level {
            for i in 0..MAXPLAYERS {
                let reborn = self
                    .world
                    .as_ref()
                    .map_or(false, |w| w.players[i].playerstate == PlayerState::Reborn);
                if self.playeringame[i] && reborn {
                    self.do_reborn(i);
                }
            }
        }

        // do things to change the game state
        loop {
            match std::mem::replace(&mut self.action, GameAction::Nothing) {
                GameAction::Nothing => break,
                GameAction::LoadLevel => self.do_load_level()?,
                GameAction::NewGame { skill, episode, map } => self.do_new_game(skill, episode, map)?,
                GameAction::PlayDemo(name) => {
                    if let Err(e) = self.do_play_demo(&name) {
                        if self.singledemo {
                            return Err(e);
                        }
                        warn!("{}: {}", name, e);
                        self.advance_demo();
                        self.state = GameState::DemoScreen;
                        return Ok(());
                    }
                }
                GameAction::Completed => self.do_completed()?,
                GameAction::Victory => {
                    info!("{} complete", self.map_name(self.options.episode, self.options.map));
                    if self.demo.is_some() {
                        self.check_demo_status();
                    } else {
                        self.start_title();
                    }
                    self.world = None;
                    self.state = GameState::DemoScreen;
                    return Ok(());
                }
            }
        }

        // get commands
        let mut cmds = *cmds;
        if let Some(demo) = self.demo.as_mut() {
            match demo.read_tic() {
                Some(c) => cmds = c,
                None => {
                    self.check_demo_status();
                    if self.quit {
                        return Ok(());
                    }
                }
            }
        }
        if let Some(rec) = self.recorder.as_mut() {
            rec.record_tic(&mut cmds);
        }

        match self.state {
            GameState::Level => {
                if let Some(w) = self.world.as_mut() {
                    for i in 0..MAXPLAYERS {
                        if w.playeringame[i] {
                            w.players[i].cmd = cmds[i];
                        }
                    }
                    w.ticker();
                    if let Some(exit) = w.exit.take() {
                        self.note_exit(exit);
                    }
                }
            }
            GameState::DemoScreen => self.page_ticker(),
        }

        self.gametic += 1;
        Ok(())
    }
}

// ============================================================
// Spawn spots
// ============================================================

/// Returns false if the player cannot be respawned
/// at the given mapthing_t spot
/// because something is occupying it
fn check_spot(w: &mut World, pnum: usize, mthing: &MapThing) -> bool {
    let x = (mthing.x as Fixed) << FRACBITS;
    let y = (mthing.y as Fixed) << FRACBITS;

    let Some(mo) = w.players[pnum].mo.filter(|&m| w.mobjs.contains(m)) else {
        // first spawn of level, before corpses
        for i in 0..pnum {
            if let Some(other) = w.players[i].mo.and_then(|m| w.mobjs.get(m)) {
                if other.x == x && other.y == y {
                    return false;
                }
            }
        }
        return true;
    };

    if !check_position(w, mo, x, y).ok {
        return false;
    }

    // flush an old corpse if needed
    if w.bodyque.len() >= BODYQUESIZE {
        if let Some(old) = w.bodyque.pop_front() {
            if w.mobjs.contains(old) {
                remove_mobj(w, old);
            }
        }
    }
    w.bodyque.push_back(mo);

    // spawn a teleport fog
    let floor = w.level.sectors[w.level.sector_at(x, y)].floorheight;
    let an = fine_index(ANG45.wrapping_mul((mthing.angle as i32 / 45) as u32));
    let fog = spawn_mobj(w, x + 20 * finecosine(an), y + 20 * finesine(an), floor, MobjType::MT_TFOG);
    w.mobj_sound(fog, SfxId::telept);
    true
}

/// Spawns a player at one of the random death match spots
/// called at level load and each death
fn deathmatch_spawn_player(w: &mut World, pnum: usize) {
    let selections = w.deathmatchstarts.len();
    if selections < 4 {
        warn!("only {} deathmatch spots, 4 required", selections);
    }

    if selections > 0 {
        for _ in 0..20 {
            let i = w.p_random() as usize % selections;
            let mut start = w.deathmatchstarts[i];
            if check_spot(w, pnum, &start) {
                start.kind = pnum as i16 + 1;
                w.deathmatchstarts[i].kind = start.kind;
                spawn_player(w, &start);
                return;
            }
        }
    }

    // no good spot, so the player will probably get stuck
    if let Some(start) = w.playerstarts[pnum] {
        spawn_player(w, &start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_resources;
    use doom_common::testkit;

    fn game() -> Game {
        Game::new(Arc::new(testkit::wad()), test_resources())
    }

    fn run(g: &mut Game, tics: usize) {
        let cmds = [TicCmd::default(); MAXPLAYERS];
        for _ in 0..tics {
            g.ticker(&cmds).unwrap();
        }
    }

    #[test]
    fn test_new_game_loads_level() {
        let mut g = game();
        g.init_new(Skill::Hard, 1, 1).unwrap();
        assert_eq!(g.state, GameState::Level);
        let w = g.world.as_ref().unwrap();
        assert_eq!(w.level.name, "E1M1");
        assert!(w.players[0].mo.is_some());
        assert_eq!(w.players[0].health, 100);
        assert!(g.usergame);
    }

    #[test]
    fn test_episode_and_map_clamped() {
        let mut g = game();
        g.init_new(Skill::Medium, 3, 0).unwrap();
        assert_eq!((g.options.episode, g.options.map), (1, 1));
    }

    #[test]
    fn test_exit_loads_next_map() {
        let mut g = game();
        g.init_new(Skill::Medium, 1, 1).unwrap();
        let kills = g.world.as_ref().unwrap().totalkills;
        g.world.as_mut().unwrap().exit_level();
        run(&mut g, 1);
        // the exit is noticed after the tic, the next map loads on the next
        run(&mut g, 1);
        let w = g.world.as_ref().unwrap();
        assert_eq!(w.level.name, "E1M2");
        assert_eq!(w.totalkills, kills);
        assert_eq!(w.players[0].playerstate, PlayerState::Live);
        assert_eq!(w.leveltime, 1);
    }

    #[test]
    fn test_next_map_rules() {
        let mut g = game();
        g.options.episode = 2;
        g.options.map = 3;
        g.secretexit = true;
        assert_eq!(g.next_map(), 9);
        g.secretexit = false;
        g.options.map = 9;
        assert_eq!(g.next_map(), 6);

        g.gamemode = GameMode::Commercial;
        g.options.map = 15;
        g.secretexit = true;
        assert_eq!(g.next_map(), 31);
        g.secretexit = false;
        g.options.map = 32;
        assert_eq!(g.next_map(), 16);
        assert_eq!(g.map_name(1, 7), "MAP07");
    }

    #[test]
    fn test_player_death_reloads_level() {
        let mut g = game();
        g.init_new(Skill::Medium, 1, 1).unwrap();
        run(&mut g, 5);
        let w = g.world.as_mut().unwrap();
        w.players[0].playerstate = PlayerState::Reborn;
        run(&mut g, 1);
        let w = g.world.as_ref().unwrap();
        assert_eq!(w.leveltime, 1);
        assert_eq!(w.players[0].playerstate, PlayerState::Live);
    }

    #[test]
    fn test_opening_sequence() {
        let mut g = game();
        g.start_title();
        run(&mut g, 1);
        assert_eq!(g.state, GameState::DemoScreen);
        assert_eq!(g.page_name(), "TITLEPIC");

        // title page runs out, demo 1 starts
        run(&mut g, 171);
        assert_eq!(g.state, GameState::Level);
        assert!(g.demo_playing());
        assert!(!g.usergame);

        // 70 tics of demo, then the credits
        run(&mut g, 72);
        assert!(!g.demo_playing());
        assert_eq!(g.state, GameState::DemoScreen);
        assert_eq!(g.page_name(), "CREDIT");
    }

    #[test]
    fn test_single_demo_quits() {
        let mut g = game();
        g.play_demo("DEMO1");
        run(&mut g, 1);
        let mo = g.world.as_ref().unwrap().players[0].mo.unwrap();
        let x0 = g.world.as_ref().unwrap().mobjs[mo].x;
        run(&mut g, 69);
        assert!(!g.quit_requested());
        // walked east
        assert!(g.world.as_ref().unwrap().mobjs[mo].x > x0);
        run(&mut g, 1);
        assert!(g.quit_requested());
    }

    #[test]
    fn test_missing_demo_is_an_error_for_single_demo() {
        let mut g = game();
        g.play_demo("DEMO9");
        let cmds = [TicCmd::default(); MAXPLAYERS];
        assert!(matches!(g.ticker(&cmds), Err(GameError::Demo(_))));
    }

    #[test]
    fn test_recorded_demo_replays_the_same() {
        let mut g = game();
        g.init_new(Skill::Medium, 1, 1).unwrap();
        g.begin_recording();
        let mut cmds = [TicCmd::default(); MAXPLAYERS];
        for i in 0..40 {
            cmds[0].forwardmove = 25;
            cmds[0].angleturn = if i % 3 == 0 { 0x300 } else { 0 };
            g.ticker(&cmds).unwrap();
        }
        let w = g.world.as_ref().unwrap();
        let mo = w.players[0].mo.unwrap();
        let end = (w.mobjs[mo].x, w.mobjs[mo].y, w.mobjs[mo].angle);
        let lump = g.finish_recording().unwrap();

        let mut wad = testkit::wad();
        let mut pw = doom_common::wad_writer::WadWriter::pwad();
        pw.add_lump("MYDEMO", lump);
        wad.add_bytes("demo.wad", pw.to_bytes()).unwrap();
        let mut g = Game::new(Arc::new(wad), test_resources());
        g.play_demo("MYDEMO");
        run(&mut g, 40);
        let w = g.world.as_ref().unwrap();
        let mo = w.players[0].mo.unwrap();
        assert_eq!((w.mobjs[mo].x, w.mobjs[mo].y, w.mobjs[mo].angle), end);
    }
}
