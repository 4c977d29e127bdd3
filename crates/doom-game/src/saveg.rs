// saveg.rs - Archiving: SaveGame I/O.

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

//! A saved game is a snapshot of one level in play: options, players,
//! the changeable parts of the geometry and every thinker in run order.
//! Thing references are written as 1-based positions among the saved
//! things, with 0 for none. Everything is little endian.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use doom_common::doomdef::{Skill, WeaponType, MAXPLAYERS, NUMAMMO, NUMCARDS, NUMPOWERS, NUMWEAPONS};
use doom_common::resources::Resources;
use doom_common::wad::Wad;
use doom_common::wadfiles::{LineFlags, MapThing};

use crate::ceilings::{Ceiling, CeilingKind};
use crate::doors::{Door, DoorKind};
use crate::error::SaveError;
use crate::floors::{FloorKind, FloorMove};
use crate::info::{MobjFlags, MobjType, StateNum};
use crate::lights::{FireFlicker, Glow, LightFlash, Strobe};
use crate::maputl::set_thing_position;
use crate::mobj::Mobj;
use crate::plats::{Plat, PlatKind, PlatStatus};
use crate::player::{Cheats, Player, PlayerState, PspDef, NUMPSPRITES};
use crate::setup::load_level;
use crate::world::{GameOptions, MobjId, Thinker, ThinkerId, World};

const SAVE_MAGIC: &[u8; 8] = b"DOOMSAVE";
const SAVE_VERSION: u16 = 1;
/// Ends the file, so a cut off save is noticed.
const SAVE_END: u8 = 0x1d;

const TC_MOBJ: u8 = 1;
const TC_DOOR: u8 = 2;
const TC_FLOOR: u8 = 3;
const TC_PLAT: u8 = 4;
const TC_CEILING: u8 = 5;
const TC_FLASH: u8 = 6;
const TC_STROBE: u8 = 7;
const TC_GLOW: u8 = 8;
const TC_FLICKER: u8 = 9;

const DOOR_KINDS: [DoorKind; 8] = [
    DoorKind::Normal,
    DoorKind::Close30ThenOpen,
    DoorKind::Close,
    DoorKind::Open,
    DoorKind::RaiseIn5Mins,
    DoorKind::BlazeRaise,
    DoorKind::BlazeOpen,
    DoorKind::BlazeClose,
];

const FLOOR_KINDS: [FloorKind; 14] = [
    FloorKind::LowerFloor,
    FloorKind::LowerFloorToLowest,
    FloorKind::TurboLower,
    FloorKind::RaiseFloor,
    FloorKind::RaiseFloorToNearest,
    FloorKind::RaiseToTexture,
    FloorKind::LowerAndChange,
    FloorKind::RaiseFloor24,
    FloorKind::RaiseFloor24AndChange,
    FloorKind::RaiseFloorCrush,
    FloorKind::RaiseFloorTurbo,
    FloorKind::DonutRaise,
    FloorKind::RaiseFloor512,
    FloorKind::BuildStairs,
];

const PLAT_KINDS: [PlatKind; 5] = [
    PlatKind::PerpetualRaise,
    PlatKind::DownWaitUpStay,
    PlatKind::RaiseAndChange,
    PlatKind::RaiseToNearestAndChange,
    PlatKind::BlazeDwus,
];

const PLAT_STATUSES: [PlatStatus; 4] = [
    PlatStatus::Up,
    PlatStatus::Down,
    PlatStatus::Waiting,
    PlatStatus::InStasis,
];

const CEILING_KINDS: [CeilingKind; 6] = [
    CeilingKind::LowerToFloor,
    CeilingKind::RaiseToHighest,
    CeilingKind::LowerAndCrush,
    CeilingKind::CrushAndRaise,
    CeilingKind::FastCrushAndRaise,
    CeilingKind::SilentCrushAndRaise,
];

const PLAYER_STATES: [PlayerState; 3] = [PlayerState::Live, PlayerState::Dead, PlayerState::Reborn];

fn lookup<T: Copy>(table: &[T], what: &'static str, value: i32) -> Result<T, SaveError> {
    usize::try_from(value)
        .ok()
        .and_then(|i| table.get(i).copied())
        .ok_or(SaveError::BadValue {
            what,
            value: value as i64,
        })
}

// ============================================================
// Serialization helpers
// ============================================================

fn write_u8(f: &mut Vec<u8>, val: u8) {
    f.push(val);
}

fn write_u16(f: &mut Vec<u8>, val: u16) {
    f.extend_from_slice(&val.to_le_bytes());
}

fn write_i32(f: &mut Vec<u8>, val: i32) {
    f.extend_from_slice(&val.to_le_bytes());
}

fn write_bool(f: &mut Vec<u8>, val: bool) {
    f.push(val as u8);
}

fn write_string(f: &mut Vec<u8>, s: &str) {
    write_u8(f, s.len() as u8);
    f.extend_from_slice(s.as_bytes());
}

fn write_option_usize(f: &mut Vec<u8>, val: Option<usize>) {
    match val {
        Some(v) => write_i32(f, v as i32),
        None => write_i32(f, -1),
    }
}

fn write_mapthing(f: &mut Vec<u8>, mt: &MapThing) {
    write_i32(f, mt.x as i32);
    write_i32(f, mt.y as i32);
    write_i32(f, mt.angle as i32);
    write_i32(f, mt.kind as i32);
    write_i32(f, mt.options as i32);
}

/// Cursor over a saved game.
struct SaveReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SaveReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8], SaveError> {
        let out = self.data.get(self.pos..self.pos + n).ok_or(SaveError::Truncated)?;
        self.pos += n;
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8, SaveError> {
        Ok(self.bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, SaveError> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_i32(&mut self) -> Result<i32, SaveError> {
        let b = self.bytes(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_bool(&mut self) -> Result<bool, SaveError> {
        Ok(self.read_u8()? != 0)
    }

    fn read_string(&mut self) -> Result<String, SaveError> {
        let len = self.read_u8()? as usize;
        Ok(String::from_utf8_lossy(self.bytes(len)?).into_owned())
    }

    fn read_option_usize(&mut self) -> Result<Option<usize>, SaveError> {
        let idx = self.read_i32()?;
        Ok(if idx < 0 { None } else { Some(idx as usize) })
    }

    /// An index below `limit`, for lists the level already has.
    fn read_index(&mut self, what: &'static str, limit: usize) -> Result<usize, SaveError> {
        let v = self.read_i32()?;
        match usize::try_from(v) {
            Ok(i) if i < limit => Ok(i),
            _ => Err(SaveError::BadValue { what, value: v as i64 }),
        }
    }

    fn read_mapthing(&mut self) -> Result<MapThing, SaveError> {
        Ok(MapThing {
            x: self.read_i32()? as i16,
            y: self.read_i32()? as i16,
            angle: self.read_i32()? as i16,
            kind: self.read_i32()? as i16,
            options: self.read_i32()? as i16,
        })
    }
}

// ============================================================
// Save
// ============================================================

/// Positions of things and thinkers in the saved thinker list.
struct SaveRefs {
    mobjs: HashMap<MobjId, i32>,
    thinkers: HashMap<ThinkerId, i32>,
}

impl SaveRefs {
    fn new(w: &World) -> Self {
        let mut mobjs = HashMap::new();
        let mut thinkers = HashMap::new();
        for (i, (id, t)) in w.thinkers.iter().enumerate() {
            thinkers.insert(id, i as i32);
            if let Thinker::Mobj(mo) = t {
                if w.mobjs.contains(*mo) {
                    let n = mobjs.len() as i32 + 1;
                    mobjs.insert(*mo, n);
                }
            }
        }
        Self { mobjs, thinkers }
    }

    fn mobj(&self, mo: Option<MobjId>) -> i32 {
        mo.and_then(|m| self.mobjs.get(&m).copied()).unwrap_or(0)
    }

    fn thinker(&self, t: Option<ThinkerId>) -> Option<usize> {
        t.and_then(|t| self.thinkers.get(&t)).map(|&i| i as usize)
    }
}

/// Writes the level in play.
pub fn save_game(w: &World) -> Vec<u8> {
    let refs = SaveRefs::new(w);
    let mut f = Vec::with_capacity(0x2c000);

    f.extend_from_slice(SAVE_MAGIC);
    write_u16(&mut f, SAVE_VERSION);

    let o = &w.options;
    write_u8(&mut f, o.skill as u8);
    write_i32(&mut f, o.episode);
    write_i32(&mut f, o.map);
    write_i32(&mut f, o.deathmatch);
    write_bool(&mut f, o.respawnmonsters);
    write_bool(&mut f, o.fastparm);
    write_bool(&mut f, o.nomonsters);
    write_bool(&mut f, o.netgame);
    write_string(&mut f, &w.level.name);

    for &p in &w.playeringame {
        write_bool(&mut f, p);
    }
    write_u8(&mut f, w.consoleplayer as u8);
    write_i32(&mut f, w.leveltime);
    write_i32(&mut f, w.totalkills);
    write_i32(&mut f, w.totalitems);
    write_i32(&mut f, w.totalsecret);
    write_u8(&mut f, w.rng.rndindex);
    write_u8(&mut f, w.rng.prndindex);

    for i in 0..MAXPLAYERS {
        if w.playeringame[i] {
            archive_player(&mut f, &w.players[i], &refs);
        }
    }

    archive_world(&mut f, w, &refs);
    archive_thinkers(&mut f, w, &refs);

    write_u8(&mut f, SAVE_END);
    debug!("saved {} at tic {}: {} bytes", w.level.name, w.leveltime, f.len());
    f
}

fn archive_player(f: &mut Vec<u8>, p: &Player, refs: &SaveRefs) {
    write_i32(f, refs.mobj(p.mo));
    write_u8(f, p.playerstate as u8);
    write_i32(f, p.viewz);
    write_i32(f, p.viewheight);
    write_i32(f, p.deltaviewheight);
    write_i32(f, p.bob);
    write_i32(f, p.health);
    write_i32(f, p.armorpoints);
    write_i32(f, p.armortype);
    for &pw in &p.powers {
        write_i32(f, pw);
    }
    for &c in &p.cards {
        write_bool(f, c);
    }
    write_bool(f, p.backpack);
    for &fr in &p.frags {
        write_i32(f, fr);
    }
    write_u8(f, p.readyweapon as u8);
    write_option_usize(f, p.pendingweapon.map(|w| w as usize));
    for &o in &p.weaponowned {
        write_bool(f, o);
    }
    for &a in &p.ammo {
        write_i32(f, a);
    }
    for &a in &p.maxammo {
        write_i32(f, a);
    }
    write_bool(f, p.attackdown);
    write_bool(f, p.usedown);
    write_i32(f, p.cheats.bits() as i32);
    write_i32(f, p.refire);
    write_i32(f, p.killcount);
    write_i32(f, p.itemcount);
    write_i32(f, p.secretcount);
    write_i32(f, p.damagecount);
    write_i32(f, p.bonuscount);
    write_i32(f, refs.mobj(p.attacker));
    write_i32(f, p.extralight);
    write_i32(f, p.fixedcolormap);
    write_i32(f, p.colormap);
    for psp in &p.psprites {
        write_option_usize(f, psp.state.map(|s| s as usize));
        write_i32(f, psp.tics);
        write_i32(f, psp.sx);
        write_i32(f, psp.sy);
    }
    write_bool(f, p.didsecret);
}

fn archive_world(f: &mut Vec<u8>, w: &World, refs: &SaveRefs) {
    let level = &w.level;
    write_i32(f, level.sectors.len() as i32);
    for sec in &level.sectors {
        write_i32(f, sec.floorheight);
        write_i32(f, sec.ceilingheight);
        write_i32(f, sec.floorpic as i32);
        write_i32(f, sec.ceilingpic as i32);
        write_i32(f, sec.lightlevel);
        write_i32(f, sec.special);
        write_i32(f, sec.tag);
        write_i32(f, sec.soundtraversed);
        write_i32(f, refs.mobj(sec.soundtarget));
        write_option_usize(f, refs.thinker(sec.specialdata));
    }

    write_i32(f, level.lines.len() as i32);
    for line in &level.lines {
        write_u16(f, line.flags.bits());
        write_i32(f, line.special);
        write_i32(f, line.tag);
    }

    write_i32(f, level.sides.len() as i32);
    for side in &level.sides {
        write_i32(f, side.textureoffset);
        write_i32(f, side.rowoffset);
        write_i32(f, side.toptexture as i32);
        write_i32(f, side.bottomtexture as i32);
        write_i32(f, side.midtexture as i32);
    }
}

fn archive_thinkers(f: &mut Vec<u8>, w: &World, refs: &SaveRefs) {
    let count = w.thinkers.iter().count();
    write_i32(f, count as i32);

    for (_, t) in w.thinkers.iter() {
        match t {
            Thinker::Mobj(id) => match w.mobjs.get(*id) {
                Some(mo) => {
                    write_u8(f, TC_MOBJ);
                    archive_mobj(f, mo, refs);
                }
                // keep positions stable for specialdata
                None => write_u8(f, 0),
            },
            Thinker::Door(d) => {
                write_u8(f, TC_DOOR);
                write_u8(f, d.kind as u8);
                write_i32(f, d.sector as i32);
                write_i32(f, d.topheight);
                write_i32(f, d.speed);
                write_i32(f, d.direction);
                write_i32(f, d.topwait);
                write_i32(f, d.topcountdown);
            }
            Thinker::Floor(fl) => {
                write_u8(f, TC_FLOOR);
                write_u8(f, fl.kind as u8);
                write_bool(f, fl.crush);
                write_i32(f, fl.sector as i32);
                write_i32(f, fl.direction);
                write_i32(f, fl.newspecial);
                write_i32(f, fl.texture as i32);
                write_i32(f, fl.floordestheight);
                write_i32(f, fl.speed);
            }
            Thinker::Plat(p) => {
                write_u8(f, TC_PLAT);
                write_i32(f, p.sector as i32);
                write_i32(f, p.speed);
                write_i32(f, p.low);
                write_i32(f, p.high);
                write_i32(f, p.wait);
                write_i32(f, p.count);
                write_u8(f, p.status as u8);
                write_u8(f, p.oldstatus as u8);
                write_bool(f, p.crush);
                write_i32(f, p.tag);
                write_u8(f, p.kind as u8);
            }
            Thinker::Ceiling(c) => {
                write_u8(f, TC_CEILING);
                write_u8(f, c.kind as u8);
                write_i32(f, c.sector as i32);
                write_i32(f, c.bottomheight);
                write_i32(f, c.topheight);
                write_i32(f, c.speed);
                write_bool(f, c.crush);
                write_i32(f, c.direction);
                write_i32(f, c.tag);
                write_i32(f, c.olddirection);
            }
            Thinker::Flash(l) => {
                write_u8(f, TC_FLASH);
                write_i32(f, l.sector as i32);
                write_i32(f, l.count);
                write_i32(f, l.maxlight);
                write_i32(f, l.minlight);
                write_i32(f, l.maxtime);
                write_i32(f, l.mintime);
            }
            Thinker::Strobe(s) => {
                write_u8(f, TC_STROBE);
                write_i32(f, s.sector as i32);
                write_i32(f, s.count);
                write_i32(f, s.minlight);
                write_i32(f, s.maxlight);
                write_i32(f, s.darktime);
                write_i32(f, s.brighttime);
            }
            Thinker::Glow(g) => {
                write_u8(f, TC_GLOW);
                write_i32(f, g.sector as i32);
                write_i32(f, g.minlight);
                write_i32(f, g.maxlight);
                write_i32(f, g.direction);
            }
            Thinker::Flicker(fl) => {
                write_u8(f, TC_FLICKER);
                write_i32(f, fl.sector as i32);
                write_i32(f, fl.count);
                write_i32(f, fl.maxlight);
                write_i32(f, fl.minlight);
            }
        }
    }
}

fn archive_mobj(f: &mut Vec<u8>, mo: &Mobj, refs: &SaveRefs) {
    write_u16(f, mo.kind as u16);
    write_i32(f, mo.x);
    write_i32(f, mo.y);
    write_i32(f, mo.z);
    write_i32(f, mo.angle as i32);
    write_i32(f, mo.frame);
    write_i32(f, mo.floorz);
    write_i32(f, mo.ceilingz);
    write_i32(f, mo.radius);
    write_i32(f, mo.height);
    write_i32(f, mo.momx);
    write_i32(f, mo.momy);
    write_i32(f, mo.momz);
    write_i32(f, mo.tics);
    write_u16(f, mo.state as u16);
    write_i32(f, mo.flags.bits() as i32);
    write_i32(f, mo.health);
    write_i32(f, mo.movedir);
    write_i32(f, mo.movecount);
    write_i32(f, refs.mobj(mo.target));
    write_i32(f, mo.reactiontime);
    write_i32(f, mo.threshold);
    write_option_usize(f, mo.player);
    write_i32(f, mo.lastlook as i32);
    write_mapthing(f, &mo.spawnpoint);
    write_i32(f, refs.mobj(mo.tracer));
}

// ============================================================
// Load
// ============================================================

/// Thing references read before all things exist.
#[derive(Default)]
struct PendingRefs {
    /// Things in saved order.
    mobjs: Vec<MobjId>,
    /// Thinkers in saved order, `None` for dropped slots.
    thinkers: Vec<Option<ThinkerId>>,
    mobj_links: Vec<(MobjId, i32, i32)>,
    player_links: Vec<(usize, i32, i32)>,
    sector_links: Vec<(usize, i32, Option<usize>)>,
}

impl PendingRefs {
    fn mobj(&self, n: i32) -> Result<Option<MobjId>, SaveError> {
        if n == 0 {
            return Ok(None);
        }
        usize::try_from(n - 1)
            .ok()
            .and_then(|i| self.mobjs.get(i))
            .map(|&id| Some(id))
            .ok_or(SaveError::BadValue {
                what: "thing reference",
                value: n as i64,
            })
    }
}

/// Rebuilds a level in play from `save_game` output. The map itself is
/// loaded from `wad`.
pub fn load_game(wad: &Wad, res: Arc<Resources>, data: &[u8]) -> Result<World, SaveError> {
    let mut r = SaveReader::new(data);

    if r.bytes(SAVE_MAGIC.len())? != SAVE_MAGIC || r.read_u16()? != SAVE_VERSION {
        return Err(SaveError::BadVersion);
    }

    let skill = r.read_u8()?;
    let options = GameOptions {
        skill: Skill::from_u8(skill).ok_or(SaveError::BadValue {
            what: "skill",
            value: skill as i64,
        })?,
        gamemode: wad.identify_game_mode(),
        episode: r.read_i32()?,
        map: r.read_i32()?,
        deathmatch: r.read_i32()?,
        respawnmonsters: r.read_bool()?,
        fastparm: r.read_bool()?,
        nomonsters: r.read_bool()?,
        netgame: r.read_bool()?,
    };
    let name = r.read_string()?;

    let level = load_level(wad, &res, &name)?;
    let mut w = World::new(level, res, options);

    for p in w.playeringame.iter_mut() {
        *p = r.read_bool()?;
    }
    w.consoleplayer = r.read_index("console player", MAXPLAYERS)?;
    w.leveltime = r.read_i32()?;
    w.totalkills = r.read_i32()?;
    w.totalitems = r.read_i32()?;
    w.totalsecret = r.read_i32()?;
    w.rng.rndindex = r.read_u8()?;
    w.rng.prndindex = r.read_u8()?;

    let mut pending = PendingRefs::default();
    for i in 0..MAXPLAYERS {
        if w.playeringame[i] {
            unarchive_player(&mut r, &mut w.players[i], i, &mut pending)?;
        }
    }

    unarchive_world(&mut r, &mut w, &mut pending)?;
    unarchive_thinkers(&mut r, &mut w, &mut pending)?;

    if r.read_u8()? != SAVE_END {
        return Err(SaveError::BadValue {
            what: "end marker",
            value: r.pos as i64,
        });
    }

    resolve_refs(&mut w, &pending)?;

    // scrolling walls are found again, everything else came from the save
    w.scrollers = (0..w.level.lines.len())
        .filter(|&i| w.level.lines[i].special == 48)
        .collect();

    info!("loaded {} at tic {}", w.level.name, w.leveltime);
    Ok(w)
}

fn unarchive_player(
    r: &mut SaveReader,
    p: &mut Player,
    pnum: usize,
    pending: &mut PendingRefs,
) -> Result<(), SaveError> {
    *p = Player::default();
    let mo = r.read_i32()?;
    p.playerstate = lookup(&PLAYER_STATES, "player state", r.read_u8()? as i32)?;
    p.viewz = r.read_i32()?;
    p.viewheight = r.read_i32()?;
    p.deltaviewheight = r.read_i32()?;
    p.bob = r.read_i32()?;
    p.health = r.read_i32()?;
    p.armorpoints = r.read_i32()?;
    p.armortype = r.read_i32()?;
    for i in 0..NUMPOWERS {
        p.powers[i] = r.read_i32()?;
    }
    for i in 0..NUMCARDS {
        p.cards[i] = r.read_bool()?;
    }
    p.backpack = r.read_bool()?;
    for i in 0..MAXPLAYERS {
        p.frags[i] = r.read_i32()?;
    }
    p.readyweapon = lookup(&WeaponType::ALL, "weapon", r.read_u8()? as i32)?;
    p.pendingweapon = match r.read_option_usize()? {
        Some(i) => Some(lookup(&WeaponType::ALL, "weapon", i as i32)?),
        None => None,
    };
    for i in 0..NUMWEAPONS {
        p.weaponowned[i] = r.read_bool()?;
    }
    for i in 0..NUMAMMO {
        p.ammo[i] = r.read_i32()?;
    }
    for i in 0..NUMAMMO {
        p.maxammo[i] = r.read_i32()?;
    }
    p.attackdown = r.read_bool()?;
    p.usedown = r.read_bool()?;
    p.cheats = Cheats::from_bits_truncate(r.read_i32()? as u32);
    p.refire = r.read_i32()?;
    p.killcount = r.read_i32()?;
    p.itemcount = r.read_i32()?;
    p.secretcount = r.read_i32()?;
    p.damagecount = r.read_i32()?;
    p.bonuscount = r.read_i32()?;
    let attacker = r.read_i32()?;
    p.extralight = r.read_i32()?;
    p.fixedcolormap = r.read_i32()?;
    p.colormap = r.read_i32()?;
    for i in 0..NUMPSPRITES {
        let state = match r.read_option_usize()? {
            Some(s) => Some(state_from(s as i32)?),
            None => None,
        };
        p.psprites[i] = PspDef {
            state,
            tics: r.read_i32()?,
            sx: r.read_i32()?,
            sy: r.read_i32()?,
        };
    }
    p.didsecret = r.read_bool()?;

    pending.player_links.push((pnum, mo, attacker));
    Ok(())
}

fn state_from(v: i32) -> Result<StateNum, SaveError> {
    usize::try_from(v)
        .ok()
        .and_then(StateNum::from_index)
        .ok_or(SaveError::BadValue {
            what: "state",
            value: v as i64,
        })
}

fn unarchive_world(r: &mut SaveReader, w: &mut World, pending: &mut PendingRefs) -> Result<(), SaveError> {
    let numflats = w.res.flats.len();
    let numtextures = w.res.textures.len();

    expect_count(r, "sector count", w.level.sectors.len())?;
    for i in 0..w.level.sectors.len() {
        let floorheight = r.read_i32()?;
        let ceilingheight = r.read_i32()?;
        let floorpic = r.read_index("flat", numflats)?;
        let ceilingpic = r.read_index("flat", numflats)?;
        let sec = &mut w.level.sectors[i];
        sec.floorheight = floorheight;
        sec.ceilingheight = ceilingheight;
        sec.floorpic = floorpic;
        sec.ceilingpic = ceilingpic;
        sec.lightlevel = r.read_i32()?;
        sec.special = r.read_i32()?;
        sec.tag = r.read_i32()?;
        sec.soundtraversed = r.read_i32()?;
        let target = r.read_i32()?;
        let special = r.read_option_usize()?;
        pending.sector_links.push((i, target, special));
    }

    expect_count(r, "line count", w.level.lines.len())?;
    for line in w.level.lines.iter_mut() {
        line.flags = LineFlags::from_bits_retain(r.read_u16()?);
        line.special = r.read_i32()?;
        line.tag = r.read_i32()?;
    }

    expect_count(r, "side count", w.level.sides.len())?;
    for side in w.level.sides.iter_mut() {
        side.textureoffset = r.read_i32()?;
        side.rowoffset = r.read_i32()?;
        side.toptexture = r.read_index("texture", numtextures)?;
        side.bottomtexture = r.read_index("texture", numtextures)?;
        side.midtexture = r.read_index("texture", numtextures)?;
    }
    Ok(())
}

fn expect_count(r: &mut SaveReader, what: &'static str, n: usize) -> Result<(), SaveError> {
    let v = r.read_i32()?;
    if v as usize != n {
        return Err(SaveError::BadValue { what, value: v as i64 });
    }
    Ok(())
}

fn unarchive_thinkers(r: &mut SaveReader, w: &mut World, pending: &mut PendingRefs) -> Result<(), SaveError> {
    let count = r.read_i32()?;
    if count < 0 {
        return Err(SaveError::BadValue {
            what: "thinker count",
            value: count as i64,
        });
    }
    let numsectors = w.level.sectors.len();

    for _ in 0..count {
        let tclass = r.read_u8()?;
        let thinker = match tclass {
            0 => {
                pending.thinkers.push(None);
                continue;
            }
            TC_MOBJ => {
                let id = unarchive_mobj(r, w, pending)?;
                pending.thinkers.push(w.mobjs.get(id).map(|m| m.thinker));
                continue;
            }
            TC_DOOR => Thinker::Door(Door {
                kind: lookup(&DOOR_KINDS, "door type", r.read_u8()? as i32)?,
                sector: r.read_index("sector", numsectors)?,
                topheight: r.read_i32()?,
                speed: r.read_i32()?,
                direction: r.read_i32()?,
                topwait: r.read_i32()?,
                topcountdown: r.read_i32()?,
            }),
            TC_FLOOR => Thinker::Floor(FloorMove {
                kind: lookup(&FLOOR_KINDS, "floor type", r.read_u8()? as i32)?,
                crush: r.read_bool()?,
                sector: r.read_index("sector", numsectors)?,
                direction: r.read_i32()?,
                newspecial: r.read_i32()?,
                texture: r.read_index("flat", w.res.flats.len())?,
                floordestheight: r.read_i32()?,
                speed: r.read_i32()?,
            }),
            TC_PLAT => Thinker::Plat(Plat {
                sector: r.read_index("sector", numsectors)?,
                speed: r.read_i32()?,
                low: r.read_i32()?,
                high: r.read_i32()?,
                wait: r.read_i32()?,
                count: r.read_i32()?,
                status: lookup(&PLAT_STATUSES, "plat status", r.read_u8()? as i32)?,
                oldstatus: lookup(&PLAT_STATUSES, "plat status", r.read_u8()? as i32)?,
                crush: r.read_bool()?,
                tag: r.read_i32()?,
                kind: lookup(&PLAT_KINDS, "plat type", r.read_u8()? as i32)?,
            }),
            TC_CEILING => Thinker::Ceiling(Ceiling {
                kind: lookup(&CEILING_KINDS, "ceiling type", r.read_u8()? as i32)?,
                sector: r.read_index("sector", numsectors)?,
                bottomheight: r.read_i32()?,
                topheight: r.read_i32()?,
                speed: r.read_i32()?,
                crush: r.read_bool()?,
                direction: r.read_i32()?,
                tag: r.read_i32()?,
                olddirection: r.read_i32()?,
            }),
            TC_FLASH => Thinker::Flash(LightFlash {
                sector: r.read_index("sector", numsectors)?,
                count: r.read_i32()?,
                maxlight: r.read_i32()?,
                minlight: r.read_i32()?,
                maxtime: r.read_i32()?,
                mintime: r.read_i32()?,
            }),
            TC_STROBE => Thinker::Strobe(Strobe {
                sector: r.read_index("sector", numsectors)?,
                count: r.read_i32()?,
                minlight: r.read_i32()?,
                maxlight: r.read_i32()?,
                darktime: r.read_i32()?,
                brighttime: r.read_i32()?,
            }),
            TC_GLOW => Thinker::Glow(Glow {
                sector: r.read_index("sector", numsectors)?,
                minlight: r.read_i32()?,
                maxlight: r.read_i32()?,
                direction: r.read_i32()?,
            }),
            TC_FLICKER => Thinker::Flicker(FireFlicker {
                sector: r.read_index("sector", numsectors)?,
                count: r.read_i32()?,
                maxlight: r.read_i32()?,
                minlight: r.read_i32()?,
            }),
            _ => {
                return Err(SaveError::BadValue {
                    what: "thinker class",
                    value: tclass as i64,
                })
            }
        };
        let id = w.add_thinker(thinker);
        pending.thinkers.push(Some(id));
    }
    Ok(())
}

fn unarchive_mobj(r: &mut SaveReader, w: &mut World, pending: &mut PendingRefs) -> Result<MobjId, SaveError> {
    let kind = r.read_u16()?;
    let kind = MobjType::from_index(kind as usize).ok_or(SaveError::BadValue {
        what: "thing type",
        value: kind as i64,
    })?;

    let id = w.mobjs.insert(|id| Mobj::new_unlinked(id, ThinkerId(0), kind));
    let mo = &mut w.mobjs[id];
    mo.x = r.read_i32()?;
    mo.y = r.read_i32()?;
    mo.z = r.read_i32()?;
    mo.angle = r.read_i32()? as u32;
    mo.frame = r.read_i32()?;
    mo.floorz = r.read_i32()?;
    mo.ceilingz = r.read_i32()?;
    mo.radius = r.read_i32()?;
    mo.height = r.read_i32()?;
    mo.momx = r.read_i32()?;
    mo.momy = r.read_i32()?;
    mo.momz = r.read_i32()?;
    mo.tics = r.read_i32()?;
    let state = r.read_u16()?;
    mo.state = state_from(state as i32)?;
    mo.sprite = mo.state.info().sprite;
    mo.flags = MobjFlags::from_bits_retain(r.read_i32()? as u32);
    mo.health = r.read_i32()?;
    mo.movedir = r.read_i32()?;
    mo.movecount = r.read_i32()?;
    let target = r.read_i32()?;
    mo.reactiontime = r.read_i32()?;
    mo.threshold = r.read_i32()?;
    mo.player = match r.read_option_usize()? {
        Some(p) if p < MAXPLAYERS => Some(p),
        Some(p) => {
            return Err(SaveError::BadValue {
                what: "player",
                value: p as i64,
            })
        }
        None => None,
    };
    mo.lastlook = r.read_i32()? as usize % MAXPLAYERS;
    mo.spawnpoint = r.read_mapthing()?;
    let tracer = r.read_i32()?;

    let tid = w.add_thinker(Thinker::Mobj(id));
    w.mobjs[id].thinker = tid;
    set_thing_position(w, id);

    pending.mobjs.push(id);
    pending.mobj_links.push((id, target, tracer));
    Ok(id)
}

fn resolve_refs(w: &mut World, pending: &PendingRefs) -> Result<(), SaveError> {
    for &(id, target, tracer) in &pending.mobj_links {
        let target = pending.mobj(target)?;
        let tracer = pending.mobj(tracer)?;
        let mo = &mut w.mobjs[id];
        mo.target = target;
        mo.tracer = tracer;
    }

    for &(pnum, mo, attacker) in &pending.player_links {
        w.players[pnum].mo = pending.mobj(mo)?;
        w.players[pnum].attacker = pending.mobj(attacker)?;
    }

    for &(sec, target, special) in &pending.sector_links {
        w.level.sectors[sec].soundtarget = pending.mobj(target)?;
        w.level.sectors[sec].specialdata = match special {
            Some(i) => {
                let t = pending.thinkers.get(i).copied().flatten();
                if t.is_none() {
                    return Err(SaveError::BadValue {
                        what: "sector special",
                        value: i as i64,
                    });
                }
                t
            }
            None => None,
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doors::ev_do_door;
    use crate::lights::spawn_glowing_light;
    use crate::testutil::{test_resources, test_world_with_player};
    use doom_common::fixed::FRACUNIT;
    use doom_common::testkit;

    fn reload(w: &World) -> World {
        let data = save_game(w);
        load_game(&testkit::wad(), test_resources(), &data).unwrap()
    }

    #[test]
    fn test_save_restores_players_and_sectors() {
        let mut w = test_world_with_player();
        w.leveltime = 345;
        w.rng.prndindex = 77;
        w.players[0].health = 42;
        w.players[0].ammo[0] = 13;
        w.players[0].readyweapon = WeaponType::Shotgun;
        w.players[0].pendingweapon = None;
        w.level.sectors[1].lightlevel = 99;
        w.level.sides[0].textureoffset = 5 * FRACUNIT;

        let l = reload(&w);
        assert_eq!(l.leveltime, 345);
        assert_eq!(l.rng.prndindex, 77);
        assert!(l.playeringame[0]);
        let p = &l.players[0];
        assert_eq!(p.health, 42);
        assert_eq!(p.ammo[0], 13);
        assert_eq!(p.readyweapon, WeaponType::Shotgun);
        assert_eq!(p.pendingweapon, None);
        assert_eq!(l.level.sectors[1].lightlevel, 99);
        assert_eq!(l.level.sides[0].textureoffset, 5 * FRACUNIT);
    }

    #[test]
    fn test_save_relinks_things() {
        let mut w = test_world_with_player();
        let pmo = w.players[0].mo.unwrap();
        let imp = crate::mobj::spawn_mobj(
            &mut w,
            384 * FRACUNIT,
            256 * FRACUNIT,
            crate::local::ONFLOORZ,
            MobjType::MT_TROOP,
        );
        w.mobjs[imp].target = Some(pmo);
        w.mobjs[imp].health = 17;

        let l = reload(&w);
        assert_eq!(l.mobjs.len(), 2);
        let lp = l.players[0].mo.unwrap();
        assert_eq!(l.mobjs[lp].player, Some(0));
        assert_eq!((l.mobjs[lp].x, l.mobjs[lp].y), (w.mobjs[pmo].x, w.mobjs[pmo].y));

        let limp = l.mobjs.iter().find(|m| m.kind == MobjType::MT_TROOP).unwrap();
        assert_eq!(limp.health, 17);
        assert_eq!(limp.target, Some(lp));
        // linked back into its sector
        let sec = l.level.sector_at(limp.x, limp.y);
        assert!(l.level.sectors[sec].things.contains(&limp.id));
    }

    #[test]
    fn test_save_keeps_movers_attached() {
        let mut w = test_world_with_player();
        spawn_glowing_light(&mut w, 0);
        w.level.sectors[1].ceilingheight = 0;
        assert!(ev_do_door(&mut w, 1, DoorKind::Open));
        w.ticker();

        let mut l = reload(&w);
        let door = l.level.sectors[1].specialdata.unwrap();
        assert!(matches!(l.thinkers.get(door), Some(Thinker::Door(_))));
        assert!(l.thinkers.iter().any(|(_, t)| matches!(t, Thinker::Glow(_))));

        // both copies carry on the same way
        w.ticker();
        l.ticker();
        assert_eq!(l.level.sectors[1].ceilingheight, w.level.sectors[1].ceilingheight);
        assert_eq!(l.level.sectors[0].lightlevel, w.level.sectors[0].lightlevel);
    }

    #[test]
    fn test_damaged_saves_are_rejected() {
        let w = test_world_with_player();
        let data = save_game(&w);
        let res = test_resources();
        let wad = testkit::wad();

        assert!(matches!(load_game(&wad, res.clone(), b"NOTASAVE\x01\x00"), Err(SaveError::BadVersion)));
        assert!(matches!(
            load_game(&wad, res.clone(), &data[..data.len() - 1]),
            Err(SaveError::Truncated)
        ));

        let mut bad = data.clone();
        // skill byte right after the header
        bad[10] = 9;
        assert!(matches!(
            load_game(&wad, res, &bad),
            Err(SaveError::BadValue { what: "skill", .. })
        ));
    }
}
