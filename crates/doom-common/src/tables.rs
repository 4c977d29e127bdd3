// tables.rs - Binary angles and trigonometry lookup tables

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

use std::f64::consts::PI;

use once_cell::sync::Lazy;

use crate::fixed::{Fixed, FRACUNIT};

/// Binary angle: the full circle maps onto the full `u32` range.
pub type Angle = u32;

pub const ANG45: Angle = 0x2000_0000;
pub const ANG90: Angle = 0x4000_0000;
pub const ANG180: Angle = 0x8000_0000;
pub const ANG270: Angle = 0xc000_0000;
pub const ANG1: Angle = ANG45 / 45;
pub const ANGLE_MAX: Angle = 0xffff_ffff;

pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
/// Shift from a binary angle to a fine table index.
pub const ANGLETOFINESHIFT: u32 = 19;

pub const SLOPERANGE: usize = 2048;
pub const SLOPEBITS: u32 = 11;
pub const DBITS: u32 = 16 - SLOPEBITS;

const FINESINE_LEN: usize = 5 * FINEANGLES / 4;
const FINETANGENT_LEN: usize = FINEANGLES / 2;

struct TrigTables {
    finesine: Vec<Fixed>,
    finetangent: Vec<Fixed>,
    tantoangle: Vec<Angle>,
}

static TABLES: Lazy<TrigTables> = Lazy::new(build_tables);

/// Tables are sampled at the centre of each fine angle. The angle is held
/// in single precision, as is the tangent before truncation, which keeps
/// the low bits equal to the shipped tables.
fn build_tables() -> TrigTables {
    let unit = FRACUNIT as f64;
    let fine_angle = |i: f64| ((i + 0.5) * PI * 2.0 / FINEANGLES as f64) as f32 as f64;

    let finesine = (0..FINESINE_LEN)
        .map(|i| (fine_angle(i as f64).sin() * unit) as Fixed)
        .collect();

    let finetangent = (0..FINETANGENT_LEN)
        .map(|i| {
            let a = fine_angle(i as f64 - (FINEANGLES / 4) as f64);
            (a.tan() * unit) as f32 as Fixed
        })
        .collect();

    let tantoangle = (0..=SLOPERANGE)
        .map(|i| {
            let a = (i as f64 / SLOPERANGE as f64).atan();
            (a / (2.0 * PI) * 4_294_967_296.0).round() as Angle
        })
        .collect();

    TrigTables {
        finesine,
        finetangent,
        tantoangle,
    }
}

#[inline]
pub fn finesine(i: usize) -> Fixed {
    TABLES.finesine[i]
}

#[inline]
pub fn finecosine(i: usize) -> Fixed {
    TABLES.finesine[i + FINEANGLES / 4]
}

#[inline]
pub fn finetangent(i: usize) -> Fixed {
    TABLES.finetangent[i]
}

#[inline]
pub fn tantoangle(i: usize) -> Angle {
    TABLES.tantoangle[i]
}

/// Fine table index for a binary angle.
#[inline]
pub fn fine_index(angle: Angle) -> usize {
    (angle >> ANGLETOFINESHIFT) as usize
}

/// Forces table construction. Useful before starting timed loops.
pub fn init_tables() {
    Lazy::force(&TABLES);
}

/// Tangent slope index used by `point_to_angle`.
pub fn slope_div(num: u32, den: u32) -> usize {
    if den < 512 {
        return SLOPERANGE;
    }
    let ans = (num << 3) / (den >> 8);
    if (ans as usize) <= SLOPERANGE {
        ans as usize
    } else {
        SLOPERANGE
    }
}

/// Angle of the vector (`x`, `y`), measured counter-clockwise from east.
/// The vector is folded into the first octant so the slope can be looked
/// up in `tantoangle`.
pub fn point_to_angle(x: Fixed, y: Fixed) -> Angle {
    if x == 0 && y == 0 {
        return 0;
    }

    if x >= 0 {
        if y >= 0 {
            if x > y {
                // octant 0
                tantoangle(slope_div(y as u32, x as u32))
            } else {
                // octant 1
                (ANG90 - 1).wrapping_sub(tantoangle(slope_div(x as u32, y as u32)))
            }
        } else {
            let y = y.wrapping_neg();
            if x > y {
                // octant 8
                0u32.wrapping_sub(tantoangle(slope_div(y as u32, x as u32)))
            } else {
                // octant 7
                ANG270.wrapping_add(tantoangle(slope_div(x as u32, y as u32)))
            }
        }
    } else {
        let x = x.wrapping_neg();
        if y >= 0 {
            if x > y {
                // octant 3
                (ANG180 - 1).wrapping_sub(tantoangle(slope_div(y as u32, x as u32)))
            } else {
                // octant 2
                ANG90.wrapping_add(tantoangle(slope_div(x as u32, y as u32)))
            }
        } else {
            let y = y.wrapping_neg();
            if x > y {
                // octant 4
                ANG180.wrapping_add(tantoangle(slope_div(y as u32, x as u32)))
            } else {
                // octant 5
                (ANG270 - 1).wrapping_sub(tantoangle(slope_div(x as u32, y as u32)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finesine_shape() {
        assert_eq!(finesine(0), 25);
        assert!(finesine(FINEANGLES / 4) >= 65535);
        assert!(finesine(FINEANGLES / 2) <= 0);
        assert!(finesine(3 * FINEANGLES / 4) <= -65535);
        // cosine is the same table shifted a quarter turn
        assert_eq!(finecosine(0), finesine(FINEANGLES / 4));
        assert_eq!(finecosine(FINEANGLES - 1), finesine(FINEANGLES + FINEANGLES / 4 - 1));
    }

    #[test]
    fn test_known_table_values() {
        assert_eq!(finesine(1), 75);
        assert_eq!(finesine(2), 125);
        assert_eq!(finesine(FINEANGLES / 4 - 1), 65535);
        assert_eq!(finesine(FINEANGLES / 2), -25);
        assert_eq!(finetangent(0), -170910304);
        assert_eq!(finetangent(1), -56965752);
        assert_eq!(finetangent(2), -34178904);
        assert_eq!(finetangent(3), -24413316);
        assert_eq!(finetangent(FINEANGLES / 4 - 1), -25);
        assert_eq!(finetangent(FINEANGLES / 4), 25);
        assert_eq!(finetangent(FINEANGLES / 2 - 1), 170910304);
        assert_eq!(tantoangle(1), 333772);
        assert_eq!(tantoangle(2), 667544);
    }

    #[test]
    fn test_finetangent_is_monotonic() {
        for i in 1..FINEANGLES / 2 {
            assert!(finetangent(i) > finetangent(i - 1));
        }
        assert!(finetangent(FINEANGLES / 4) > 0);
        assert!(finetangent(FINEANGLES / 4 - 1) < 0);
    }

    #[test]
    fn test_tantoangle_endpoints() {
        assert_eq!(tantoangle(0), 0);
        assert_eq!(tantoangle(SLOPERANGE), ANG45);
    }

    #[test]
    fn test_slope_div_small_denominator() {
        assert_eq!(slope_div(100, 10), SLOPERANGE);
        assert_eq!(slope_div(0, 1 << 16), 0);
        assert_eq!(slope_div(1 << 16, 1 << 16), SLOPERANGE);
    }

    #[test]
    fn test_point_to_angle_axes() {
        assert_eq!(point_to_angle(0, 0), 0);
        assert_eq!(point_to_angle(FRACUNIT, 0), 0);
        let north = point_to_angle(0, FRACUNIT);
        assert!(north.abs_diff(ANG90) < ANG1);
        let west = point_to_angle(-FRACUNIT, 0);
        assert!(west.abs_diff(ANG180) < ANG1);
        let south = point_to_angle(0, -FRACUNIT);
        assert!(south.abs_diff(ANG270) < ANG1);
    }

    #[test]
    fn test_point_to_angle_diagonals() {
        let ne = point_to_angle(FRACUNIT, FRACUNIT);
        assert!(ne.abs_diff(ANG45) < ANG1);
        let sw = point_to_angle(-FRACUNIT, -FRACUNIT);
        assert!(sw.abs_diff(ANG180 + ANG45) < ANG1);
    }
}
