// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::config::Tuning;
use crate::cursor::Cursor;
use crate::frame::Surface;
use crate::layout::{Dims, Layout};

/// One falling trail: a bright head, a dim body and a tail that restores
/// the background as it passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Raindrop {
    pub length: i32,
    pub progress: Cursor,
}

impl Raindrop {
    /// A new drop at the top of column `x`, with a length in
    /// `[min_drop_length, 3 * h / 4)`.
    pub fn new<R: Rng + ?Sized>(x: i32, dims: Dims, tuning: &Tuning, rng: &mut R) -> Self {
        let min = tuning.min_drop_length;
        let max = (3 * dims.h / 4).max(min + 1);
        Self {
            length: rng.random_range(min..max),
            progress: Cursor::new(x, 0),
        }
    }

    pub fn tail_cursor(&self) -> Cursor {
        self.progress.above(self.length)
    }

    pub fn draw<S: Surface>(&self, layout: &Layout, surface: &mut S) {
        let tail = self.tail_cursor();
        if !layout.v_contains(tail) && !layout.v_contains(self.progress) {
            return;
        }

        let palette = layout.palette();
        layout.set_style_at(surface, self.progress, palette.head);
        for i in 0..self.length {
            if self.progress.y - i == 0 {
                break;
            }
            layout.set_style_at(surface, self.progress.above(i + 1), palette.body);
        }
        layout.set_style_at(surface, tail, palette.background);
    }

    pub fn update(&mut self) {
        self.progress = self.progress.below(1);
    }
}
