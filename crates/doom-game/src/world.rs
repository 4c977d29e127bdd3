// world.rs - The play simulation state: things, thinkers, players

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

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use log::trace;

use doom_common::doomdef::{GameMode, Skill, MAXPLAYERS};
use doom_common::random::DoomRandom;
use doom_common::resources::Resources;
use doom_common::wadfiles::MapThing;

use crate::ceilings::Ceiling;
use crate::doors::Door;
use crate::floors::FloorMove;
use crate::info::SfxId;
use crate::level::Level;
use crate::lights::{FireFlicker, Glow, LightFlash, Strobe};
use crate::mobj::Mobj;
use crate::plats::Plat;
use crate::player::Player;
use crate::spec::Animations;
use crate::switches::{init_switch_list, Button};

// ============================================================
// Thing arena
// ============================================================

/// Handle to a thing. Handles to removed things stop resolving instead of
/// pointing at whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MobjId {
    index: u32,
    generation: u32,
}

impl MobjId {
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    mobj: Option<Mobj>,
}

#[derive(Debug, Clone, Default)]
pub struct MobjArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl MobjArena {
    pub fn insert(&mut self, make: impl FnOnce(MobjId) -> Mobj) -> MobjId {
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = MobjId {
            index,
            generation: slot.generation,
        };
        slot.mobj = Some(make(id));
        self.live += 1;
        id
    }

    pub fn remove(&mut self, id: MobjId) -> Option<Mobj> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let mobj = slot.mobj.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(mobj)
    }

    #[inline]
    pub fn get(&self, id: MobjId) -> Option<&Mobj> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.mobj.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, id: MobjId) -> Option<&mut Mobj> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.mobj.as_mut())
    }

    #[inline]
    pub fn contains(&self, id: MobjId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mobj> {
        self.slots.iter().filter_map(|s| s.mobj.as_ref())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl Index<MobjId> for MobjArena {
    type Output = Mobj;

    fn index(&self, id: MobjId) -> &Mobj {
        match self.get(id) {
            Some(m) => m,
            None => panic!("stale thing handle {:?}", id),
        }
    }
}

impl IndexMut<MobjId> for MobjArena {
    fn index_mut(&mut self, id: MobjId) -> &mut Mobj {
        match self.get_mut(id) {
            Some(m) => m,
            None => panic!("stale thing handle {:?}", id),
        }
    }
}

// ============================================================
// Thinkers
// ============================================================

/// Creation order of a thinker. Thinkers run in this order every tic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThinkerId(pub u64);

#[derive(Debug, Clone)]
pub enum Thinker {
    Mobj(crate::world::MobjId),
    Door(Door),
    Floor(FloorMove),
    Plat(Plat),
    Ceiling(Ceiling),
    Flash(LightFlash),
    Strobe(Strobe),
    Glow(Glow),
    Flicker(FireFlicker),
}

#[derive(Debug, Clone)]
struct ThinkerSlot {
    id: ThinkerId,
    thinker: Option<Thinker>,
    removed: bool,
}

/// Thinkers in creation order. Removal only marks a slot; slots are
/// dropped by `compact` at the end of each tic so indices stay stable while
/// the list is being run.
#[derive(Debug, Clone, Default)]
pub struct ThinkerList {
    slots: Vec<ThinkerSlot>,
    next_id: u64,
}

impl ThinkerList {
    pub fn add(&mut self, thinker: Thinker) -> ThinkerId {
        let id = ThinkerId(self.next_id);
        self.next_id += 1;
        self.slots.push(ThinkerSlot {
            id,
            thinker: Some(thinker),
            removed: false,
        });
        id
    }

    fn find(&self, id: ThinkerId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |s| s.id).ok()
    }

    pub fn remove(&mut self, id: ThinkerId) {
        if let Some(i) = self.find(id) {
            self.slots[i].removed = true;
            self.slots[i].thinker = None;
        }
    }

    pub fn get(&self, id: ThinkerId) -> Option<&Thinker> {
        self.find(id).and_then(|i| self.slots[i].thinker.as_ref())
    }

    pub fn get_mut(&mut self, id: ThinkerId) -> Option<&mut Thinker> {
        let i = self.find(id)?;
        self.slots[i].thinker.as_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Id and a copy of the mobj handle, if any, at run position `i`.
    pub(crate) fn slot(&self, i: usize) -> Option<(ThinkerId, Option<&Thinker>)> {
        self.slots
            .get(i)
            .filter(|s| !s.removed)
            .map(|s| (s.id, s.thinker.as_ref()))
    }

    /// Takes a thinker out to run it against the world.
    pub(crate) fn take(&mut self, i: usize) -> Option<Thinker> {
        self.slots.get_mut(i).and_then(|s| s.thinker.take())
    }

    /// Puts a thinker back after running, unless it was removed meanwhile.
    pub(crate) fn put_back(&mut self, i: usize, thinker: Thinker) {
        if let Some(s) = self.slots.get_mut(i) {
            if !s.removed {
                s.thinker = Some(thinker);
            }
        }
    }

    pub fn compact(&mut self) {
        self.slots.retain(|s| !s.removed);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThinkerId, &Thinker)> {
        self.slots
            .iter()
            .filter(|s| !s.removed)
            .filter_map(|s| s.thinker.as_ref().map(|t| (s.id, t)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ThinkerId, &mut Thinker)> {
        self.slots
            .iter_mut()
            .filter(|s| !s.removed)
            .filter_map(|s| {
                let id = s.id;
                s.thinker.as_mut().map(|t| (id, t))
            })
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

// ============================================================
// Sounds
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundOrigin {
    /// Heard everywhere at full volume.
    Global,
    Mobj(MobjId),
    /// A sector's sound origin.
    Sector(usize),
}

/// A sound started by the simulation. The host decides what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEvent {
    pub sfx: SfxId,
    pub origin: SoundOrigin,
    pub tic: i32,
}

// ============================================================
// World
// ============================================================

/// Settings fixed for the duration of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    pub skill: Skill,
    pub gamemode: GameMode,
    pub episode: i32,
    pub map: i32,
    /// 0 cooperative, 1 deathmatch, 2 altdeath.
    pub deathmatch: i32,
    pub respawnmonsters: bool,
    pub fastparm: bool,
    pub nomonsters: bool,
    pub netgame: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            skill: Skill::Medium,
            gamemode: GameMode::Shareware,
            episode: 1,
            map: 1,
            deathmatch: 0,
            respawnmonsters: false,
            fastparm: false,
            nomonsters: false,
            netgame: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelExit {
    Normal,
    Secret,
}

/// Everything that changes during play. Level geometry lives here too
/// since sectors, lines and sides move, light and change texture.
pub struct World {
    pub level: Level,
    pub res: Arc<Resources>,
    pub options: GameOptions,

    pub mobjs: MobjArena,
    pub thinkers: ThinkerList,

    pub players: [Player; MAXPLAYERS],
    pub playeringame: [bool; MAXPLAYERS],
    pub consoleplayer: usize,

    pub rng: DoomRandom,
    pub leveltime: i32,
    pub totalkills: i32,
    pub totalitems: i32,
    pub totalsecret: i32,

    pub playerstarts: [Option<MapThing>; MAXPLAYERS],
    pub deathmatchstarts: Vec<MapThing>,

    /// Increment every time a check is made.
    pub validcount: i32,

    pub skyflatnum: usize,
    pub skytexture: usize,

    pub anims: Animations,
    /// Switch textures in on/off pairs.
    pub switchlist: Vec<usize>,
    pub buttons: Vec<Button>,
    /// Lines with the scrolling wall special.
    pub scrollers: Vec<usize>,

    /// Deathmatch 2 items waiting to respawn, with their removal time.
    pub itemrespawnque: VecDeque<(MapThing, i32)>,

    /// Player corpses kept around in deathmatch.
    pub bodyque: VecDeque<MobjId>,

    pub sounds: Vec<SoundEvent>,
    pub exit: Option<LevelExit>,
}

impl World {
    pub fn new(level: Level, res: Arc<Resources>, options: GameOptions) -> World {
        let skyflatnum = res.flats.num_for_name("F_SKY1");
        let skytexture = res.textures.num_for_name(&sky_texture_name(&options));
        let anims = Animations::new(&res);
        let switchlist = init_switch_list(&res, options.gamemode);
        World {
            level,
            res,
            options,
            mobjs: MobjArena::default(),
            thinkers: ThinkerList::default(),
            players: Default::default(),
            playeringame: [false; MAXPLAYERS],
            consoleplayer: 0,
            rng: DoomRandom::new(),
            leveltime: 0,
            totalkills: 0,
            totalitems: 0,
            totalsecret: 0,
            playerstarts: [None; MAXPLAYERS],
            deathmatchstarts: Vec::new(),
            validcount: 1,
            skyflatnum,
            skytexture,
            anims,
            switchlist,
            buttons: Vec::new(),
            scrollers: Vec::new(),
            itemrespawnque: VecDeque::new(),
            bodyque: VecDeque::new(),
            sounds: Vec::new(),
            exit: None,
        }
    }

    #[inline]
    pub fn p_random(&mut self) -> i32 {
        self.rng.p_random()
    }

    #[inline]
    pub fn p_subrandom(&mut self) -> i32 {
        self.rng.p_subrandom()
    }

    /// Nightmare or -fast: quicker demons and imp, baron, caco shots.
    #[inline]
    pub fn fast_monsters(&self) -> bool {
        self.options.fastparm || self.options.skill == Skill::Nightmare
    }

    #[inline]
    pub fn mobj(&self, id: MobjId) -> Option<&Mobj> {
        self.mobjs.get(id)
    }

    #[inline]
    pub fn mobj_mut(&mut self, id: MobjId) -> Option<&mut Mobj> {
        self.mobjs.get_mut(id)
    }

    /// Sector a thing is in.
    #[inline]
    pub fn sector_of(&self, id: MobjId) -> usize {
        self.level.subsectors[self.mobjs[id].subsector].sector
    }

    pub fn next_validcount(&mut self) -> i32 {
        self.validcount = self.validcount.wrapping_add(1);
        self.validcount
    }

    pub fn add_thinker(&mut self, thinker: Thinker) -> ThinkerId {
        self.thinkers.add(thinker)
    }

    pub fn remove_thinker(&mut self, id: ThinkerId) {
        self.thinkers.remove(id);
    }

    pub fn start_sound(&mut self, origin: SoundOrigin, sfx: SfxId) {
        if sfx == SfxId::None {
            return;
        }
        trace!("tic {}: sound {:?} from {:?}", self.leveltime, sfx, origin);
        self.sounds.push(SoundEvent {
            sfx,
            origin,
            tic: self.leveltime,
        });
    }

    pub fn mobj_sound(&mut self, id: MobjId, sfx: SfxId) {
        self.start_sound(SoundOrigin::Mobj(id), sfx);
    }

    pub fn sector_sound(&mut self, sector: usize, sfx: SfxId) {
        self.start_sound(SoundOrigin::Sector(sector), sfx);
    }

    /// Sounds started since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    /// Index of the player driving a thing, if any.
    #[inline]
    pub fn player_of(&self, id: MobjId) -> Option<usize> {
        self.mobjs.get(id).and_then(|m| m.player)
    }

    pub fn exit_level(&mut self) {
        self.exit = Some(LevelExit::Normal);
    }

    pub fn secret_exit_level(&mut self) {
        self.exit = Some(LevelExit::Secret);
    }
}

/// Sky texture for a map: one per episode, or per group of maps in
/// Doom II.
pub fn sky_texture_name(options: &GameOptions) -> String {
    if options.gamemode == GameMode::Commercial {
        return match options.map {
            m if m < 12 => "SKY1",
            m if m < 21 => "SKY2",
            _ => "SKY3",
        }
        .to_string();
    }
    match options.episode {
        2 => "SKY2",
        3 => "SKY3",
        4 => "SKY4",
        _ => "SKY1",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::MobjType;

    fn dummy(id: MobjId) -> Mobj {
        Mobj::new_unlinked(id, ThinkerId(0), MobjType::MT_PUFF)
    }

    #[test]
    fn test_arena_generations() {
        let mut arena = MobjArena::default();
        let a = arena.insert(dummy);
        assert!(arena.contains(a));
        assert!(arena.remove(a).is_some());
        assert!(!arena.contains(a));
        let b = arena.insert(dummy);
        // slot is reused but the old handle stays dead
        assert_eq!(a.index(), b.index());
        assert!(arena.get(a).is_none());
        assert!(arena.get(b).is_some());
        assert_eq!(arena.len(), 1);
        assert!(arena.remove(a).is_none());
    }

    #[test]
    fn test_thinker_order_and_compaction() {
        let mut list = ThinkerList::default();
        let mut arena = MobjArena::default();
        let ids: Vec<ThinkerId> = (0..4)
            .map(|_| list.add(Thinker::Mobj(arena.insert(dummy))))
            .collect();
        list.remove(ids[1]);
        assert_eq!(list.len(), 4);
        assert!(list.get(ids[1]).is_none());
        assert!(list.slot(1).is_none());
        list.compact();
        assert_eq!(list.len(), 3);
        let order: Vec<ThinkerId> = list.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[3]]);
        assert!(list.get(ids[3]).is_some());
    }

    #[test]
    fn test_take_and_put_back() {
        let mut list = ThinkerList::default();
        let id = list.add(Thinker::Flash(LightFlash::default()));
        let t = list.take(0).unwrap();
        assert!(list.get(id).is_none());
        list.put_back(0, t);
        assert!(list.get(id).is_some());

        let t = list.take(0).unwrap();
        list.remove(id);
        list.put_back(0, t);
        assert!(list.get(id).is_none());
    }
}
