// bbox.rs - Axis aligned bounding boxes in map space

use crate::fixed::Fixed;

pub const BOXTOP: usize = 0;
pub const BOXBOTTOM: usize = 1;
pub const BOXLEFT: usize = 2;
pub const BOXRIGHT: usize = 3;

/// `[top, bottom, left, right]`
pub type BBox = [Fixed; 4];

/// An empty box that any point will grow.
pub const fn cleared_box() -> BBox {
    [i32::MIN, i32::MAX, i32::MAX, i32::MIN]
}

pub fn clear_box(b: &mut BBox) {
    *b = cleared_box();
}

pub fn add_to_box(b: &mut BBox, x: Fixed, y: Fixed) {
    if x < b[BOXLEFT] {
        b[BOXLEFT] = x;
    }
    if x > b[BOXRIGHT] {
        b[BOXRIGHT] = x;
    }
    if y < b[BOXBOTTOM] {
        b[BOXBOTTOM] = y;
    }
    if y > b[BOXTOP] {
        b[BOXTOP] = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_box_grows() {
        let mut b = cleared_box();
        add_to_box(&mut b, 10, -5);
        add_to_box(&mut b, -3, 20);
        assert_eq!(b, [20, -5, -3, 10]);
    }
}
