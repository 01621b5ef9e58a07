// Copyright (c) 2026 rezky_nightky

/// A grid coordinate. Not bounds-checked; a falling trail can sit above the
/// top row or below the bottom one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub x: i32,
    pub y: i32,
}

impl Cursor {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn above(self, n: i32) -> Self {
        Self {
            x: self.x,
            y: self.y - n,
        }
    }

    pub const fn below(self, n: i32) -> Self {
        Self {
            x: self.x,
            y: self.y + n,
        }
    }
}
