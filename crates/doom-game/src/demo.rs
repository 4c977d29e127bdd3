// demo.rs - Demo lumps: recorded tic commands for playback and timing

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

use log::{debug, warn};

use doom_common::doomdef::{Skill, MAXPLAYERS};
use doom_common::ticcmd::TicCmd;

use crate::error::DemoError;

pub const VERSION: u8 = 109;
pub const DEMOMARKER: u8 = 0x80;

/// Game settings a demo starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoHeader {
    pub version: u8,
    pub skill: Skill,
    pub episode: i32,
    pub map: i32,
    pub deathmatch: i32,
    pub respawnparm: bool,
    pub fastparm: bool,
    pub nomonsters: bool,
    pub consoleplayer: usize,
    pub playeringame: [bool; MAXPLAYERS],
}

impl DemoHeader {
    /// Bytes taken by the header of a current version demo.
    pub const SIZE: usize = 13;

    fn parse(data: &[u8]) -> Result<(DemoHeader, usize), DemoError> {
        let Some(&first) = data.first() else {
            return Err(DemoError::Truncated(0));
        };

        // demos from before the version byte start with the skill
        if first <= Skill::Nightmare as u8 {
            if data.len() < 7 {
                return Err(DemoError::Truncated(data.len()));
            }
            let mut playeringame = [false; MAXPLAYERS];
            for (i, p) in playeringame.iter_mut().enumerate() {
                *p = data[3 + i] != 0;
            }
            let header = DemoHeader {
                version: 0,
                skill: skill_from(data[0])?,
                episode: data[1] as i32,
                map: data[2] as i32,
                deathmatch: 0,
                respawnparm: false,
                fastparm: false,
                nomonsters: false,
                consoleplayer: 0,
                playeringame,
            };
            return Ok((header, 7));
        }

        if first != VERSION {
            return Err(DemoError::BadVersion(first));
        }
        if data.len() < Self::SIZE {
            return Err(DemoError::Truncated(data.len()));
        }

        let consoleplayer = data[8] as usize;
        if consoleplayer >= MAXPLAYERS {
            return Err(DemoError::BadHeader(format!("console player {}", consoleplayer)));
        }
        let mut playeringame = [false; MAXPLAYERS];
        for (i, p) in playeringame.iter_mut().enumerate() {
            *p = data[9 + i] != 0;
        }
        if !playeringame.iter().any(|&p| p) {
            return Err(DemoError::BadHeader("no players".to_string()));
        }

        let header = DemoHeader {
            version: first,
            skill: skill_from(data[1])?,
            episode: data[2] as i32,
            map: data[3] as i32,
            deathmatch: data[4] as i32,
            respawnparm: data[5] != 0,
            fastparm: data[6] != 0,
            nomonsters: data[7] != 0,
            consoleplayer,
            playeringame,
        };
        Ok((header, Self::SIZE))
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(VERSION);
        out.push(self.skill as u8);
        out.push(self.episode as u8);
        out.push(self.map as u8);
        out.push(self.deathmatch as u8);
        out.push(self.respawnparm as u8);
        out.push(self.fastparm as u8);
        out.push(self.nomonsters as u8);
        out.push(self.consoleplayer as u8);
        for &p in &self.playeringame {
            out.push(p as u8);
        }
    }
}

fn skill_from(b: u8) -> Result<Skill, DemoError> {
    Skill::from_u8(b).ok_or_else(|| DemoError::BadHeader(format!("skill {}", b)))
}

/// A demo being played back.
#[derive(Debug, Clone)]
pub struct Demo {
    pub header: DemoHeader,
    data: Vec<u8>,
    pos: usize,
}

impl Demo {
    pub fn parse(data: Vec<u8>) -> Result<Demo, DemoError> {
        let (header, pos) = DemoHeader::parse(&data)?;
        debug!(
            "demo version {}, skill {:?}, E{}M{}, {} bytes",
            header.version,
            header.skill,
            header.episode,
            header.map,
            data.len()
        );
        Ok(Demo { header, data, pos })
    }

    /// Commands for the next tic, or `None` at the end marker. A demo
    /// that stops mid-tic ends there too.
    pub fn read_tic(&mut self) -> Option<[TicCmd; MAXPLAYERS]> {
        let mut cmds = [TicCmd::default(); MAXPLAYERS];
        for (i, cmd) in cmds.iter_mut().enumerate() {
            if !self.header.playeringame[i] {
                continue;
            }
            match self.data.get(self.pos) {
                Some(&DEMOMARKER) | None => return None,
                _ => {}
            }
            let Some(raw) = self.data.get(self.pos..self.pos + 4) else {
                warn!("demo ends in the middle of a tic");
                self.pos = self.data.len();
                return None;
            };
            *cmd = decode_tic(raw);
            self.pos += 4;
        }
        Some(cmds)
    }

    pub fn finished(&self) -> bool {
        self.data.get(self.pos).map_or(true, |&b| b == DEMOMARKER)
    }
}

fn decode_tic(raw: &[u8]) -> TicCmd {
    TicCmd {
        forwardmove: raw[0] as i8,
        sidemove: raw[1] as i8,
        angleturn: ((raw[2] as u16) << 8) as i16,
        buttons: raw[3],
        ..Default::default()
    }
}

/// Writes the commands of a game as they are played.
#[derive(Debug, Clone)]
pub struct DemoRecorder {
    header: DemoHeader,
    data: Vec<u8>,
}

impl DemoRecorder {
    pub fn new(header: DemoHeader) -> DemoRecorder {
        let mut data = Vec::with_capacity(0x20000);
        header.write(&mut data);
        DemoRecorder { header, data }
    }

    /// Appends the tic's commands and rounds them the way playback will
    /// see them, so the recording game stays in sync with its demo.
    pub fn record_tic(&mut self, cmds: &mut [TicCmd; MAXPLAYERS]) {
        for (i, cmd) in cmds.iter_mut().enumerate() {
            if !self.header.playeringame[i] {
                continue;
            }
            let raw = [
                cmd.forwardmove as u8,
                cmd.sidemove as u8,
                ((cmd.angleturn as i32 + 128) >> 8) as u8,
                cmd.buttons,
            ];
            self.data.extend_from_slice(&raw);
            *cmd = decode_tic(&raw);
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() <= DemoHeader::SIZE
    }

    /// The finished lump, end marker included.
    pub fn finish(mut self) -> Vec<u8> {
        self.data.push(DEMOMARKER);
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doom_common::testkit::demo_lump;

    #[test]
    fn test_parse_testkit_demo() {
        let mut demo = Demo::parse(demo_lump(&[[25, 0, 2, 1], [0, 0, 0, 0]])).unwrap();
        assert_eq!(demo.header.skill, Skill::Medium);
        assert_eq!((demo.header.episode, demo.header.map), (1, 1));
        assert_eq!(demo.header.playeringame, [true, false, false, false]);

        let cmds = demo.read_tic().unwrap();
        assert_eq!(cmds[0].forwardmove, 25);
        assert_eq!(cmds[0].angleturn, 0x200);
        assert_eq!(cmds[0].buttons, 1);
        assert!(demo.read_tic().is_some());
        assert!(demo.finished());
        assert!(demo.read_tic().is_none());
    }

    #[test]
    fn test_bad_headers() {
        assert!(matches!(Demo::parse(vec![]), Err(DemoError::Truncated(0))));
        assert!(matches!(Demo::parse(vec![110, 2, 1, 1]), Err(DemoError::BadVersion(110))));
        assert!(matches!(Demo::parse(vec![109, 2, 1]), Err(DemoError::Truncated(3))));
        let mut nobody = demo_lump(&[]);
        nobody[9] = 0;
        assert!(matches!(Demo::parse(nobody), Err(DemoError::BadHeader(_))));
    }

    #[test]
    fn test_old_format_header() {
        let mut demo = Demo::parse(vec![3, 2, 5, 1, 1, 0, 0, 10, 0xf8, 0, 0, 0x80]).unwrap();
        assert_eq!(demo.header.skill, Skill::Hard);
        assert_eq!((demo.header.episode, demo.header.map), (2, 5));
        assert_eq!(demo.header.playeringame, [true, true, false, false]);
        let cmds = demo.read_tic();
        // the second player's command is cut short by the marker
        assert!(cmds.is_none());
    }

    #[test]
    fn test_recording_plays_back() {
        let header = Demo::parse(demo_lump(&[])).unwrap().header;
        let mut rec = DemoRecorder::new(header);
        let mut cmds = [TicCmd::default(); MAXPLAYERS];
        cmds[0] = TicCmd {
            forwardmove: -50,
            sidemove: 24,
            angleturn: 0x1f0,
            buttons: 2,
            ..Default::default()
        };
        rec.record_tic(&mut cmds);
        // turning is rounded to whole bytes
        assert_eq!(cmds[0].angleturn, 0x200);

        let mut demo = Demo::parse(rec.finish()).unwrap();
        assert_eq!(demo.read_tic().unwrap()[0], cmds[0]);
        assert!(demo.read_tic().is_none());
    }
}
