// setup.rs - Do all the WAD I/O, get map description,
//  set up initial state and misc. LUTs.

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

use log::{debug, info, warn};

use doom_common::bbox::{add_to_box, cleared_box, BOXBOTTOM, BOXLEFT, BOXRIGHT, BOXTOP};
use doom_common::fixed::{fixed_div, Fixed, FRACBITS};
use doom_common::resources::Resources;
use doom_common::wad::{name_to_string, Wad};
use doom_common::wadfiles::*;

use crate::blockmap::{Blockmap, Reject};
use crate::error::LevelError;
use crate::level::*;
use crate::local::MAXRADIUS;
use crate::mobj::spawn_map_thing;
use crate::spec::spawn_specials;
use crate::world::World;

/// Lumps of one map, by `ML_*` index. REJECT and BLOCKMAP may be absent.
struct MapLumps<'a> {
    name: &'a str,
    data: [Option<&'a [u8]>; 11],
}

impl<'a> MapLumps<'a> {
    fn find(wad: &'a Wad, name: &'a str) -> Result<Self, LevelError> {
        let marker = wad
            .check_num_for_name(name)
            .ok_or_else(|| LevelError::MapNotFound(name.to_string()))?;

        let mut data = [None; 11];
        for (i, expected) in MAP_LUMP_NAMES.iter().enumerate() {
            let lump = marker + 1 + i;
            let present = lump < wad.num_lumps() && wad.lump_name(lump)?.eq_ignore_ascii_case(expected);
            if present {
                data[ML_THINGS + i] = Some(wad.lump(lump)?);
                continue;
            }
            if ML_THINGS + i < ML_REJECT {
                return Err(LevelError::MissingLump {
                    map: name.to_string(),
                    expected,
                });
            }
            // later optional lumps can't follow a missing one
            break;
        }
        Ok(Self { name, data })
    }

    fn get(&self, ml: usize) -> &'a [u8] {
        self.data[ml].unwrap_or(&[])
    }

    fn bad_ref(&self, lump: &'static str, index: usize, what: &'static str, target: usize) -> LevelError {
        LevelError::BadReference {
            map: self.name.to_string(),
            lump,
            index,
            what,
            target,
        }
    }
}

fn load_vertexes(lumps: &MapLumps) -> Vec<Vertex> {
    parse_records::<MapVertex>(lumps.get(ML_VERTEXES))
        .iter()
        .map(|v| Vertex {
            x: (v.x as Fixed) << FRACBITS,
            y: (v.y as Fixed) << FRACBITS,
        })
        .collect()
}

fn load_sectors(lumps: &MapLumps, res: &Resources) -> Vec<Sector> {
    parse_records::<MapSector>(lumps.get(ML_SECTORS))
        .iter()
        .map(|ms| Sector {
            floorheight: (ms.floorheight as Fixed) << FRACBITS,
            ceilingheight: (ms.ceilingheight as Fixed) << FRACBITS,
            floorpic: res.flats.num_for_name(&name_to_string(&ms.floorpic)),
            ceilingpic: res.flats.num_for_name(&name_to_string(&ms.ceilingpic)),
            lightlevel: ms.lightlevel as i32,
            special: ms.special as i32,
            tag: ms.tag as i32,
            ..Default::default()
        })
        .collect()
}

fn load_sides(lumps: &MapLumps, res: &Resources, numsectors: usize) -> Result<Vec<Side>, LevelError> {
    parse_records::<MapSideDef>(lumps.get(ML_SIDEDEFS))
        .iter()
        .enumerate()
        .map(|(i, msd)| {
            let sector = msd.sector as u16 as usize;
            if sector >= numsectors {
                return Err(lumps.bad_ref("SIDEDEFS", i, "sector", sector));
            }
            Ok(Side {
                textureoffset: (msd.textureoffset as Fixed) << FRACBITS,
                rowoffset: (msd.rowoffset as Fixed) << FRACBITS,
                toptexture: res.textures.num_for_name(&name_to_string(&msd.toptexture)),
                bottomtexture: res.textures.num_for_name(&name_to_string(&msd.bottomtexture)),
                midtexture: res.textures.num_for_name(&name_to_string(&msd.midtexture)),
                sector,
            })
        })
        .collect()
}

fn load_lines(lumps: &MapLumps, vertexes: &[Vertex], sides: &[Side]) -> Result<Vec<Line>, LevelError> {
    let mut lines = Vec::new();
    for (i, mld) in parse_records::<MapLineDef>(lumps.get(ML_LINEDEFS)).iter().enumerate() {
        let v1 = *vertexes
            .get(mld.v1 as usize)
            .ok_or_else(|| lumps.bad_ref("LINEDEFS", i, "vertex", mld.v1 as usize))?;
        let v2 = *vertexes
            .get(mld.v2 as usize)
            .ok_or_else(|| lumps.bad_ref("LINEDEFS", i, "vertex", mld.v2 as usize))?;

        let mut sidenum = [None; 2];
        for (s, &raw) in mld.sidenum.iter().enumerate() {
            if raw == NO_SIDEDEF {
                continue;
            }
            if raw as usize >= sides.len() {
                return Err(lumps.bad_ref("LINEDEFS", i, "sidedef", raw as usize));
            }
            sidenum[s] = Some(raw as usize);
        }
        let Some(front) = sidenum[0] else {
            return Err(lumps.bad_ref("LINEDEFS", i, "sidedef", NO_SIDEDEF as usize));
        };

        let dx = v2.x - v1.x;
        let dy = v2.y - v1.y;
        let slopetype = if dx == 0 {
            SlopeType::Vertical
        } else if dy == 0 {
            SlopeType::Horizontal
        } else if fixed_div(dy, dx) > 0 {
            SlopeType::Positive
        } else {
            SlopeType::Negative
        };

        let mut bbox = [0; 4];
        bbox[BOXLEFT] = v1.x.min(v2.x);
        bbox[BOXRIGHT] = v1.x.max(v2.x);
        bbox[BOXBOTTOM] = v1.y.min(v2.y);
        bbox[BOXTOP] = v1.y.max(v2.y);

        lines.push(Line {
            v1,
            v2,
            dx,
            dy,
            flags: LineFlags::from_bits_retain(mld.flags),
            special: mld.special as i32,
            tag: mld.tag as i32,
            sidenum,
            bbox,
            slopetype,
            frontsector: sides[front].sector,
            backsector: sidenum[1].map(|s| sides[s].sector),
            validcount: 0,
        });
    }
    Ok(lines)
}

fn load_segs(lumps: &MapLumps, vertexes: &[Vertex], lines: &[Line], sides: &[Side]) -> Result<Vec<Seg>, LevelError> {
    let mut segs = Vec::new();
    for (i, ms) in parse_records::<MapSeg>(lumps.get(ML_SEGS)).iter().enumerate() {
        let v1 = *vertexes
            .get(ms.v1 as usize)
            .ok_or_else(|| lumps.bad_ref("SEGS", i, "vertex", ms.v1 as usize))?;
        let v2 = *vertexes
            .get(ms.v2 as usize)
            .ok_or_else(|| lumps.bad_ref("SEGS", i, "vertex", ms.v2 as usize))?;
        let linedef = ms.linedef as usize;
        let ldef = lines
            .get(linedef)
            .ok_or_else(|| lumps.bad_ref("SEGS", i, "linedef", linedef))?;
        let side = (ms.side & 1) as usize;
        let sidedef = ldef.sidenum[side].ok_or_else(|| lumps.bad_ref("SEGS", i, "side", side))?;

        let backsector = if ldef.flags.contains(LineFlags::TWOSIDED) {
            ldef.sidenum[side ^ 1].map(|s| sides[s].sector)
        } else {
            None
        };

        segs.push(Seg {
            v1,
            v2,
            angle: ((ms.angle as u16) as u32) << 16,
            offset: (ms.offset as Fixed) << FRACBITS,
            sidedef,
            linedef,
            frontsector: sides[sidedef].sector,
            backsector,
        });
    }
    Ok(segs)
}

fn load_subsectors(lumps: &MapLumps, segs: &[Seg]) -> Result<Vec<SubSector>, LevelError> {
    parse_records::<MapSubSector>(lumps.get(ML_SSECTORS))
        .iter()
        .enumerate()
        .map(|(i, ms)| {
            let firstline = ms.firstseg as usize;
            let numlines = ms.numsegs as usize;
            if numlines == 0 || firstline + numlines > segs.len() {
                return Err(lumps.bad_ref("SSECTORS", i, "seg", firstline + numlines));
            }
            Ok(SubSector {
                sector: segs[firstline].frontsector,
                numlines,
                firstline,
            })
        })
        .collect()
}

fn load_nodes(lumps: &MapLumps, numsubsectors: usize) -> Result<Vec<Node>, LevelError> {
    let raw = parse_records::<MapNode>(lumps.get(ML_NODES));
    let numnodes = raw.len();
    let mut nodes = Vec::with_capacity(numnodes);
    for (i, mn) in raw.iter().enumerate() {
        let mut children = [NodeChild::Subsector(0); 2];
        let mut bbox = [[0; 4]; 2];
        for j in 0..2 {
            let c = mn.children[j];
            children[j] = if c & NF_SUBSECTOR != 0 {
                let s = (c & !NF_SUBSECTOR) as usize;
                if s >= numsubsectors {
                    return Err(lumps.bad_ref("NODES", i, "subsector", s));
                }
                NodeChild::Subsector(s)
            } else {
                if c as usize >= numnodes {
                    return Err(lumps.bad_ref("NODES", i, "node", c as usize));
                }
                NodeChild::Node(c as usize)
            };
            for k in 0..4 {
                bbox[j][k] = (mn.bbox[j][k] as Fixed) << FRACBITS;
            }
        }
        nodes.push(Node {
            x: (mn.x as Fixed) << FRACBITS,
            y: (mn.y as Fixed) << FRACBITS,
            dx: (mn.dx as Fixed) << FRACBITS,
            dy: (mn.dy as Fixed) << FRACBITS,
            bbox,
            children,
        });
    }
    Ok(nodes)
}

/// Builds sector line lists, bounding boxes and sound origins.
fn group_lines(level: &mut Level) {
    let mut boxes = vec![cleared_box(); level.sectors.len()];
    for (i, l) in level.lines.iter().enumerate() {
        let mut add = |sec: usize| {
            level.sectors[sec].lines.push(i);
            add_to_box(&mut boxes[sec], l.v1.x, l.v1.y);
            add_to_box(&mut boxes[sec], l.v2.x, l.v2.y);
        };
        add(l.frontsector);
        if let Some(back) = l.backsector {
            if back != l.frontsector {
                add(back);
            }
        }
    }

    for (sec, bbox) in level.sectors.iter_mut().zip(boxes.iter()) {
        if sec.lines.is_empty() {
            continue;
        }
        // set the degenmobj to the middle of the bounding box
        sec.soundorg = (
            (bbox[BOXRIGHT] + bbox[BOXLEFT]) / 2,
            (bbox[BOXTOP] + bbox[BOXBOTTOM]) / 2,
        );
        // adjust bounding box to map blocks
        let b = level.blockmap.box_blocks(bbox, MAXRADIUS);
        sec.blockbox = b;
    }
}

/// Reads a map's lumps into level geometry. Textures and flats are
/// resolved against `res`; things are kept for spawning once the world
/// exists.
pub fn load_level(wad: &Wad, res: &Resources, map_name: &str) -> Result<Level, LevelError> {
    let lumps = MapLumps::find(wad, map_name)?;

    let vertexes = load_vertexes(&lumps);
    let sectors = load_sectors(&lumps, res);
    let sides = load_sides(&lumps, res, sectors.len())?;
    let lines = load_lines(&lumps, &vertexes, &sides)?;
    let segs = load_segs(&lumps, &vertexes, &lines, &sides)?;
    let subsectors = load_subsectors(&lumps, &segs)?;
    let nodes = load_nodes(&lumps, subsectors.len())?;

    if subsectors.is_empty() {
        return Err(LevelError::BadLump {
            map: map_name.to_string(),
            lump: "SSECTORS",
            reason: "is empty".to_string(),
        });
    }

    let blockmap = match lumps.data[ML_BLOCKMAP].and_then(|d| Blockmap::parse(d, lines.len())) {
        Some(bm) => bm,
        None => {
            if lumps.data[ML_BLOCKMAP].map_or(false, |d| !d.is_empty()) {
                warn!("{}: BLOCKMAP is damaged, rebuilding it", map_name);
            }
            Blockmap::build(&lines, &vertexes)
        }
    };
    let reject = Reject::new(lumps.get(ML_REJECT).to_vec(), sectors.len());
    let things = parse_records::<MapThing>(lumps.get(ML_THINGS));

    let mut level = Level {
        name: map_name.to_uppercase(),
        vertexes,
        sectors,
        sides,
        lines,
        segs,
        subsectors,
        nodes,
        blockmap,
        reject,
        things,
    };
    group_lines(&mut level);

    debug!(
        "{}: {} sectors, {} lines, {} segs, {} subsectors, {} nodes, {} things",
        level.name,
        level.sectors.len(),
        level.lines.len(),
        level.segs.len(),
        level.subsectors.len(),
        level.nodes.len(),
        level.things.len()
    );
    Ok(level)
}

/// Spawns the map's things and starts sector specials. Players must be
/// marked in game beforehand.
pub fn setup_level(w: &mut World) {
    w.totalkills = 0;
    w.totalitems = 0;
    w.totalsecret = 0;
    w.leveltime = 0;
    w.deathmatchstarts.clear();
    w.playerstarts = Default::default();

    let things = std::mem::take(&mut w.level.things);
    for mt in &things {
        spawn_map_thing(w, mt);
    }
    w.level.things = things;

    // set up world state
    spawn_specials(w);

    info!(
        "{}: {} monsters, {} items, {} secrets",
        w.level.name, w.totalkills, w.totalitems, w.totalsecret
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::MobjType;
    use crate::player::PlayerState;
    use crate::testutil::{test_resources, test_world};
    use doom_common::fixed::FRACUNIT;
    use doom_common::testkit::{self, DIVIDER_LINE, PLAYER_START};
    use doom_common::wad_writer::WadWriter;

    #[test]
    fn test_load_room_map() {
        let wad = testkit::wad();
        let res = test_resources();
        let level = load_level(&wad, &res, "E1M1").unwrap();

        assert_eq!(level.sectors.len(), 2);
        assert_eq!(level.lines.len(), 7);
        assert_eq!(level.subsectors.len(), 2);
        assert_eq!(level.nodes.len(), 1);
        assert_eq!(level.things.len(), 4);

        let divider = &level.lines[DIVIDER_LINE];
        assert!(divider.is_two_sided());
        assert_eq!(divider.slopetype, SlopeType::Vertical);
        assert_eq!(divider.backsector, Some(0));
        assert_eq!(divider.frontsector, 1);

        // divider belongs to both rooms
        assert_eq!(level.sectors[0].lines.len(), 4);
        assert_eq!(level.sectors[1].lines.len(), 4);
        assert_eq!(level.sectors[0].soundorg, (128 * FRACUNIT, 256 * FRACUNIT));

        assert_eq!(level.sector_at(100 * FRACUNIT, 100 * FRACUNIT), 0);
        assert_eq!(level.sector_at(300 * FRACUNIT, 100 * FRACUNIT), 1);
        assert_eq!(level.sectors[1].floorpic, res.flats.num_for_name("NUKAGE1"));

        // no BLOCKMAP lump, so one was built
        assert!(level.blockmap.width > 0);
        assert!(!level.reject.rejects(0, 1));
    }

    #[test]
    fn test_missing_map() {
        let wad = testkit::wad();
        let res = test_resources();
        assert!(matches!(
            load_level(&wad, &res, "E9M9"),
            Err(LevelError::MapNotFound(_))
        ));
    }

    #[test]
    fn test_truncated_map_is_an_error() {
        let mut w = WadWriter::pwad();
        w.add_marker("E1M3");
        w.add_lump("THINGS", Vec::new());
        w.add_lump("LINEDEFS", Vec::new());
        let mut wad = testkit::wad();
        wad.add_bytes("broken.wad", w.to_bytes()).unwrap();
        let res = test_resources();
        assert!(matches!(
            load_level(&wad, &res, "E1M3"),
            Err(LevelError::MissingLump { expected: "SIDEDEFS", .. })
        ));
    }

    #[test]
    fn test_bad_vertex_reference() {
        let mut w = WadWriter::pwad();
        testkit::add_room_map(&mut w, "E1M4");
        let mut wad = testkit::wad();
        wad.add_bytes("rooms.wad", w.to_bytes()).unwrap();

        // corrupt the first linedef's start vertex
        let lump = wad.check_num_for_name("E1M4").unwrap() + ML_LINEDEFS;
        let mut lines = wad.lump(lump).unwrap().to_vec();
        lines[0] = 0xff;
        lines[1] = 0x00;
        let mut w = WadWriter::pwad();
        w.add_marker("E1M4");
        for (i, name) in MAP_LUMP_NAMES.iter().enumerate() {
            let l = wad.check_num_for_name("E1M4").unwrap() + 1 + i;
            let data = if i + 1 == ML_LINEDEFS {
                lines.clone()
            } else {
                wad.lump(l).unwrap().to_vec()
            };
            w.add_lump(name, data);
        }
        wad.add_bytes("broken.wad", w.to_bytes()).unwrap();

        let res = test_resources();
        assert!(matches!(
            load_level(&wad, &res, "E1M4"),
            Err(LevelError::BadReference { what: "vertex", target: 255, .. })
        ));
    }

    #[test]
    fn test_setup_spawns_things() {
        let mut w = test_world();
        w.playeringame[0] = true;
        w.players[0].playerstate = PlayerState::Reborn;
        setup_level(&mut w);

        let mo = w.players[0].mo.unwrap();
        assert_eq!(
            (w.mobjs[mo].x, w.mobjs[mo].y),
            ((PLAYER_START.0 as Fixed) << FRACBITS, (PLAYER_START.1 as Fixed) << FRACBITS)
        );
        assert_eq!(w.totalkills, 1);
        assert_eq!(w.totalitems, 0);
        assert_eq!(w.deathmatchstarts.len(), 1);
        assert!(w.mobjs.iter().any(|m| m.kind == MobjType::MT_TROOP));
        assert!(w.mobjs.iter().any(|m| m.kind == MobjType::MT_CLIP));
    }
}
