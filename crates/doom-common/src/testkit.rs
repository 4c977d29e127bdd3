// testkit.rs - In-memory IWAD used by tests across the workspace

use crate::gfx::{Patch, COLORMAP_SIZE, NUMPALETTES, PALETTE_SIZE};
use crate::resources::FLAT_SIZE;
use crate::wad::{lump_name, Wad};
use crate::wad_writer::WadWriter;
use crate::wadfiles::*;

/// Sprite list for resource tests: one single-angle sprite, one fully
/// rotated sprite and one with no lumps.
pub const SPRITE_NAMES: [&str; 3] = ["TROO", "PLAY", "POSS"];

/// Player 1 start in the test map, map units.
pub const PLAYER_START: (i16, i16) = (128, 256);
/// Imp in the right hand room.
pub const IMP_START: (i16, i16) = (384, 256);
/// Ammo clip in the left hand room.
pub const CLIP_START: (i16, i16) = (64, 64);
/// Tag of the right hand sector.
pub const RIGHT_SECTOR_TAG: i16 = 1;

/// The two-sided linedef splitting the rooms.
pub const DIVIDER_LINE: usize = 6;

fn palette_lump() -> Vec<u8> {
    let mut out = Vec::with_capacity(PALETTE_SIZE * NUMPALETTES);
    for p in 0..NUMPALETTES {
        for i in 0..256usize {
            out.push((i + p * 10).min(255) as u8);
            out.push((i / 2) as u8);
            out.push((255 - i) as u8);
        }
    }
    out
}

fn colormap_lump() -> Vec<u8> {
    let mut out = Vec::with_capacity(34 * COLORMAP_SIZE);
    for n in 0..32usize {
        for c in 0..256usize {
            out.push((c * (32 - n) / 32) as u8);
        }
    }
    for c in 0..256usize {
        out.push((255 - c) as u8);
    }
    out.extend(std::iter::repeat(0u8).take(COLORMAP_SIZE));
    out
}

fn solid_patch(width: i32, height: i32, f: impl Fn(i32, i32) -> Option<u8>) -> Vec<u8> {
    let mut px = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            px.push(f(x, y));
        }
    }
    Patch::from_pixels(width, height, 0, 0, &px).to_lump()
}

fn sprite_patch(color: u8) -> Vec<u8> {
    let (w, h) = (16, 32);
    let px = vec![Some(color); (w * h) as usize];
    Patch::from_pixels(w, h, w / 2, h - 4, &px).to_lump()
}

fn texture(name: &str, width: i16, height: i16, masked: bool, patch: i16) -> MapTexture {
    MapTexture {
        name: lump_name(name),
        masked,
        width,
        height,
        patches: vec![MapPatch {
            originx: 0,
            originy: 0,
            patch,
        }],
    }
}

fn side(upper: &str, lower: &str, mid: &str, sector: i16) -> MapSideDef {
    MapSideDef {
        textureoffset: 0,
        rowoffset: 0,
        toptexture: lump_name(upper),
        bottomtexture: lump_name(lower),
        midtexture: lump_name(mid),
        sector,
    }
}

fn line(v1: u16, v2: u16, flags: LineFlags, front: u16, back: u16) -> MapLineDef {
    MapLineDef {
        v1,
        v2,
        flags: flags.bits(),
        special: 0,
        tag: 0,
        sidenum: [front, back],
    }
}

fn seg(v1: u16, v2: u16, angle: u16, linedef: u16, side: i16) -> MapSeg {
    MapSeg {
        v1,
        v2,
        angle: angle as i16,
        linedef,
        side,
        offset: 0,
    }
}

/// Two 256x512 rooms side by side, split by a two-sided line at x = 256.
/// The left room has a normal ceiling, the right one a sky ceiling and
/// tag 1. No blockmap or reject: both are built at load time.
pub fn add_room_map(w: &mut WadWriter, name: &str) {
    let things = [
        MapThing {
            x: PLAYER_START.0,
            y: PLAYER_START.1,
            angle: 0,
            kind: 1,
            options: 7,
        },
        MapThing {
            x: IMP_START.0,
            y: IMP_START.1,
            angle: 180,
            kind: 3001,
            options: 7,
        },
        MapThing {
            x: CLIP_START.0,
            y: CLIP_START.1,
            angle: 0,
            kind: 2007,
            options: 7,
        },
        MapThing {
            x: 64,
            y: 448,
            angle: 90,
            kind: 11,
            options: 7,
        },
    ];

    let vertexes = [
        MapVertex { x: 0, y: 0 },
        MapVertex { x: 0, y: 512 },
        MapVertex { x: 256, y: 512 },
        MapVertex { x: 512, y: 512 },
        MapVertex { x: 512, y: 0 },
        MapVertex { x: 256, y: 0 },
    ];

    let impassable = LineFlags::BLOCKING;
    let lines = [
        line(0, 1, impassable, 0, NO_SIDEDEF),
        line(1, 2, impassable, 1, NO_SIDEDEF),
        line(2, 3, impassable, 2, NO_SIDEDEF),
        line(3, 4, impassable, 3, NO_SIDEDEF),
        line(4, 5, impassable, 4, NO_SIDEDEF),
        line(5, 0, impassable, 5, NO_SIDEDEF),
        line(5, 2, LineFlags::TWOSIDED, 6, 7),
    ];

    let sides = [
        side("-", "-", "WALL1", 0),
        side("-", "-", "WALL1", 0),
        side("-", "-", "SW1COMP", 1),
        side("-", "-", "WALL1", 1),
        side("-", "-", "WALL1", 1),
        side("-", "-", "WALL1", 0),
        side("WALL1", "WALL1", "-", 1),
        side("WALL1", "WALL1", "-", 0),
    ];

    let segs = [
        // left room
        seg(0, 1, 0x4000, 0, 0),
        seg(1, 2, 0x0000, 1, 0),
        seg(2, 5, 0xc000, 6, 1),
        seg(5, 0, 0x8000, 5, 0),
        // right room
        seg(2, 3, 0x0000, 2, 0),
        seg(3, 4, 0xc000, 3, 0),
        seg(4, 5, 0x8000, 4, 0),
        seg(5, 2, 0x4000, 6, 0),
    ];

    let subsectors = [
        MapSubSector {
            numsegs: 4,
            firstseg: 0,
        },
        MapSubSector {
            numsegs: 4,
            firstseg: 4,
        },
    ];

    let nodes = [MapNode {
        x: 256,
        y: 0,
        dx: 0,
        dy: 512,
        bbox: [[512, 0, 256, 512], [512, 0, 0, 256]],
        children: [1 | NF_SUBSECTOR, NF_SUBSECTOR],
    }];

    let sectors = [
        MapSector {
            floorheight: 0,
            ceilingheight: 128,
            floorpic: lump_name("FLOOR0_1"),
            ceilingpic: lump_name("CEIL1_1"),
            lightlevel: 160,
            special: 0,
            tag: 0,
        },
        MapSector {
            floorheight: 0,
            ceilingheight: 128,
            floorpic: lump_name("NUKAGE1"),
            ceilingpic: lump_name("F_SKY1"),
            lightlevel: 192,
            special: 0,
            tag: RIGHT_SECTOR_TAG,
        },
    ];

    w.add_marker(name);
    w.add_lump("THINGS", write_records(&things));
    w.add_lump("LINEDEFS", write_records(&lines));
    w.add_lump("SIDEDEFS", write_records(&sides));
    w.add_lump("VERTEXES", write_records(&vertexes));
    w.add_lump("SEGS", write_records(&segs));
    w.add_lump("SSECTORS", write_records(&subsectors));
    w.add_lump("NODES", write_records(&nodes));
    w.add_lump("SECTORS", write_records(&sectors));
    w.add_lump("REJECT", Vec::new());
    w.add_lump("BLOCKMAP", Vec::new());
}

/// A version 109 demo for player 1 on E1M1, skill 3, with the given
/// `[forward, side, turn, buttons]` tics.
pub fn demo_lump(tics: &[[u8; 4]]) -> Vec<u8> {
    let mut out = vec![109, 2, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0];
    for t in tics {
        out.extend_from_slice(t);
    }
    out.push(0x80);
    out
}

/// All lumps of the test IWAD, ready for more to be appended.
pub fn iwad_writer() -> WadWriter {
    let mut w = WadWriter::iwad();
    w.add_lump("PLAYPAL", palette_lump());
    w.add_lump("COLORMAP", colormap_lump());

    let walk: Vec<[u8; 4]> = (0..70).map(|_| [25, 0, 0, 0]).collect();
    let turn: Vec<[u8; 4]> = (0..70).map(|_| [0, 0, 2, 0]).collect();
    let fire: Vec<[u8; 4]> = (0..70).map(|i| [0, 0, 0, (i % 2) as u8]).collect();
    w.add_lump("DEMO1", demo_lump(&walk));
    w.add_lump("DEMO2", demo_lump(&turn));
    w.add_lump("DEMO3", demo_lump(&fire));

    add_room_map(&mut w, "E1M1");
    add_room_map(&mut w, "E1M2");

    w.add_lump(
        "TEXTURE1",
        write_texture_lump(&[
            texture("AASTINKY", 64, 128, false, 0),
            texture("WALL1", 64, 128, false, 0),
            texture("GRATE", 64, 128, true, 1),
            texture("SKY1", 256, 128, false, 2),
            texture("SW1COMP", 64, 128, false, 0),
            texture("SW2COMP", 64, 128, false, 3),
            texture("DOOR1", 64, 128, false, 3),
        ]),
    );
    w.add_lump("PNAMES", write_pnames(&["WALLP", "GRATEP", "SKYP", "PANELP"]));

    let page = solid_patch(320, 200, |x, y| Some(((x + y) % 255) as u8));
    w.add_lump("TITLEPIC", page.clone());
    w.add_lump("CREDIT", page.clone());
    w.add_lump("HELP2", page);

    w.add_marker("S_START");
    w.add_lump("TROOA0", sprite_patch(40));
    w.add_lump("PLAYA1", sprite_patch(80));
    w.add_lump("PLAYA2A8", sprite_patch(81));
    w.add_lump("PLAYA3A7", sprite_patch(82));
    w.add_lump("PLAYA4A6", sprite_patch(83));
    w.add_lump("PLAYA5", sprite_patch(84));
    w.add_lump("PISGA0", sprite_patch(120));
    w.add_lump("CLIPA0", sprite_patch(140));
    w.add_marker("S_END");

    w.add_marker("P_START");
    w.add_lump(
        "WALLP",
        solid_patch(64, 128, |x, y| Some(1 + ((x * 3 + y) % 250) as u8)),
    );
    w.add_lump(
        "GRATEP",
        solid_patch(64, 128, |x, _| if x % 2 == 0 { Some(50) } else { None }),
    );
    w.add_lump("SKYP", solid_patch(256, 128, |_, y| Some(200 + (y / 16) as u8)));
    w.add_lump("PANELP", solid_patch(64, 128, |_, _| Some(99)));
    w.add_marker("P_END");

    w.add_marker("F_START");
    w.add_marker("F1_START");
    w.add_lump("FLOOR0_1", (0..FLAT_SIZE).map(|i| (i % 64) as u8 + 1).collect());
    w.add_lump("CEIL1_1", vec![30; FLAT_SIZE]);
    w.add_lump("NUKAGE1", vec![60; FLAT_SIZE]);
    w.add_lump("NUKAGE2", vec![61; FLAT_SIZE]);
    w.add_lump("NUKAGE3", vec![62; FLAT_SIZE]);
    w.add_lump("F_SKY1", vec![0; FLAT_SIZE]);
    w.add_marker("F1_END");
    w.add_marker("F_END");
    w
}

pub fn build_iwad() -> Vec<u8> {
    iwad_writer().to_bytes()
}

/// The test IWAD, loaded.
pub fn wad() -> Wad {
    let mut wad = Wad::new();
    wad.add_bytes("doom1.wad", build_iwad())
        .expect("test iwad is well formed");
    wad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doomdef::GameMode;

    #[test]
    fn test_testkit_wad_is_shareware() {
        let wad = wad();
        assert!(wad.has_iwad());
        assert_eq!(wad.identify_game_mode(), GameMode::Shareware);
        assert_eq!(wad.lump_length(wad.get_num_for_name("SECTORS").unwrap()).unwrap(), 52);
    }

    #[test]
    fn test_demo_lump_layout() {
        let d = demo_lump(&[[1, 2, 3, 4]]);
        assert_eq!(d[0], 109);
        assert_eq!(d.len(), 13 + 4 + 1);
        assert_eq!(*d.last().unwrap(), 0x80);
    }
}
