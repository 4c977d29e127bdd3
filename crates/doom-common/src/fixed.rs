// fixed.rs - 16.16 fixed point arithmetic

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

/// 16.16 fixed point value.
pub type Fixed = i32;

pub const FRACBITS: i32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;

#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// Fixed point divide. Results that would overflow saturate to
/// `i32::MIN`/`i32::MAX` with the sign of the quotient, which also covers
/// division by zero.
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if (a.unsigned_abs() >> 14) >= b.unsigned_abs() {
        return if (a ^ b) < 0 { i32::MIN } else { i32::MAX };
    }
    fixed_div2(a, b)
}

#[inline]
fn fixed_div2(a: Fixed, b: Fixed) -> Fixed {
    let c = ((a as i64) << FRACBITS) / (b as i64);
    c.clamp(i32::MIN as i64, i32::MAX as i64) as Fixed
}

/// Integer part of a fixed point value (arithmetic shift, rounds toward
/// negative infinity).
#[inline]
pub fn fixed_to_int(a: Fixed) -> i32 {
    a >> FRACBITS
}

#[inline]
pub fn int_to_fixed(a: i32) -> Fixed {
    a << FRACBITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_mul_basic() {
        assert_eq!(fixed_mul(2 * FRACUNIT, 3 * FRACUNIT), 6 * FRACUNIT);
        assert_eq!(fixed_mul(FRACUNIT / 2, FRACUNIT / 2), FRACUNIT / 4);
        assert_eq!(fixed_mul(-2 * FRACUNIT, 3 * FRACUNIT), -6 * FRACUNIT);
    }

    #[test]
    fn test_fixed_div_basic() {
        assert_eq!(fixed_div(6 * FRACUNIT, 3 * FRACUNIT), 2 * FRACUNIT);
        assert_eq!(fixed_div(FRACUNIT, 4 * FRACUNIT), FRACUNIT / 4);
        assert_eq!(fixed_div(-6 * FRACUNIT, 3 * FRACUNIT), -2 * FRACUNIT);
    }

    #[test]
    fn test_fixed_div_saturates() {
        assert_eq!(fixed_div(FRACUNIT, 0), i32::MAX);
        assert_eq!(fixed_div(-FRACUNIT, 0), i32::MIN);
        assert_eq!(fixed_div(i32::MAX, 1), i32::MAX);
        assert_eq!(fixed_div(i32::MAX, -1), i32::MIN);
        assert_eq!(fixed_div(i32::MIN, 0), i32::MIN);
        assert_eq!(fixed_div(i32::MIN, 1), i32::MIN);
        assert_eq!(fixed_div(i32::MIN, -FRACUNIT), i32::MAX);
        // in range quotients are unchanged
        assert_eq!(fixed_div(-6 * FRACUNIT, 2 * FRACUNIT), -3 * FRACUNIT);
    }

    #[test]
    fn test_fixed_to_int_floors() {
        assert_eq!(fixed_to_int(3 * FRACUNIT + 5), 3);
        assert_eq!(fixed_to_int(-FRACUNIT / 2), -1);
        assert_eq!(int_to_fixed(7), 7 * FRACUNIT);
    }
}
