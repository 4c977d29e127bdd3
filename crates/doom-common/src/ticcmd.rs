// ticcmd.rs - Per-tic player input

pub const BT_ATTACK: u8 = 1;
pub const BT_USE: u8 = 2;
/// Special events (pause, save) replace the normal button meaning.
pub const BT_SPECIAL: u8 = 128;
pub const BT_SPECIALMASK: u8 = 3;
/// A weapon change is pending, weapon number in `BT_WEAPONMASK`.
pub const BT_CHANGE: u8 = 4;
pub const BT_WEAPONMASK: u8 = 8 + 16 + 32;
pub const BT_WEAPONSHIFT: u8 = 3;

pub const BTS_PAUSE: u8 = 1;
pub const BTS_SAVEGAME: u8 = 2;
pub const BTS_SAVEMASK: u8 = 4 + 8 + 16;
pub const BTS_SAVESHIFT: u8 = 2;

/// The input for one player for one tic. This is all that is recorded in
/// demos and sent over the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicCmd {
    /// *2048 for move
    pub forwardmove: i8,
    /// *2048 for move
    pub sidemove: i8,
    /// <<16 for angle delta
    pub angleturn: i16,
    /// checks for net game
    pub consistancy: i16,
    pub chatchar: u8,
    pub buttons: u8,
}

impl TicCmd {
    /// Weapon slot requested by a `BT_CHANGE` command.
    pub fn weapon_slot(&self) -> usize {
        ((self.buttons & BT_WEAPONMASK) >> BT_WEAPONSHIFT) as usize
    }

    pub fn change_weapon(slot: u8) -> u8 {
        BT_CHANGE | ((slot << BT_WEAPONSHIFT) & BT_WEAPONMASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_slot_roundtrip() {
        let cmd = TicCmd {
            buttons: TicCmd::change_weapon(5) | BT_ATTACK,
            ..Default::default()
        };
        assert_eq!(cmd.weapon_slot(), 5);
        assert_ne!(cmd.buttons & BT_CHANGE, 0);
        assert_ne!(cmd.buttons & BT_ATTACK, 0);
    }
}
