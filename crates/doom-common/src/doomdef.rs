// doomdef.rs - Engine wide constants and enumerations

pub const SCREENWIDTH: usize = 320;
pub const SCREENHEIGHT: usize = 200;

pub const MAXPLAYERS: usize = 4;

/// Simulation rate in tics per second.
pub const TICRATE: i32 = 35;

/// Number of Doom II style maps per "episode".
pub const COMMERCIAL_MAPS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Skill {
    Baby = 0,
    Easy,
    #[default]
    Medium,
    Hard,
    Nightmare,
}

impl Skill {
    pub fn from_u8(v: u8) -> Option<Skill> {
        match v {
            0 => Some(Skill::Baby),
            1 => Some(Skill::Easy),
            2 => Some(Skill::Medium),
            3 => Some(Skill::Hard),
            4 => Some(Skill::Nightmare),
            _ => None,
        }
    }
}

/// Which game the loaded IWAD provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Episode 1 only.
    Shareware,
    /// Episodes 1-3.
    Registered,
    /// MAP01-MAP32.
    Commercial,
    /// Episodes 1-4.
    Retail,
    #[default]
    Indetermined,
}

impl GameMode {
    pub fn num_episodes(self) -> usize {
        match self {
            GameMode::Shareware => 1,
            GameMode::Registered => 3,
            GameMode::Retail => 4,
            GameMode::Commercial => 1,
            GameMode::Indetermined => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum WeaponType {
    #[default]
    Fist = 0,
    Pistol,
    Shotgun,
    Chaingun,
    Missile,
    Plasma,
    Bfg,
    Chainsaw,
}

pub const NUMWEAPONS: usize = 8;

impl WeaponType {
    pub const ALL: [WeaponType; NUMWEAPONS] = [
        WeaponType::Fist,
        WeaponType::Pistol,
        WeaponType::Shotgun,
        WeaponType::Chaingun,
        WeaponType::Missile,
        WeaponType::Plasma,
        WeaponType::Bfg,
        WeaponType::Chainsaw,
    ];

    pub fn from_index(i: usize) -> Option<WeaponType> {
        Self::ALL.get(i).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AmmoType {
    Clip = 0,
    Shell,
    Cell,
    Missile,
    NoAmmo,
}

pub const NUMAMMO: usize = 4;

impl AmmoType {
    pub fn index(self) -> Option<usize> {
        match self {
            AmmoType::NoAmmo => None,
            a => Some(a as usize),
        }
    }
}

/// Full ammo capacity, doubled by a backpack.
pub const MAXAMMO: [i32; NUMAMMO] = [200, 50, 300, 50];
/// Ammo in a normal pickup.
pub const CLIPAMMO: [i32; NUMAMMO] = [10, 4, 20, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerType {
    Invulnerability = 0,
    Strength,
    Invisibility,
    IronFeet,
    AllMap,
    Infrared,
}

pub const NUMPOWERS: usize = 6;

pub const INVULNTICS: i32 = 30 * TICRATE;
pub const INVISTICS: i32 = 60 * TICRATE;
pub const INFRATICS: i32 = 120 * TICRATE;
pub const IRONTICS: i32 = 60 * TICRATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Card {
    BlueCard = 0,
    YellowCard,
    RedCard,
    BlueSkull,
    YellowSkull,
    RedSkull,
}

pub const NUMCARDS: usize = 6;
