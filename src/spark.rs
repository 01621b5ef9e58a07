// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::column::Column;
use crate::cursor::Cursor;
use crate::frame::Surface;
use crate::glyphs::GlyphSet;
use crate::layout::{write_glyph, Dims, Layout};

/// A highlighted cell that keeps retyping its glyph and jumps somewhere
/// else once it has outlived `lifespan` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spark {
    pub position: Cursor,
    pub age: u32,
    pub lifespan: u32,
    /// Number of times the spark has jumped to a new cell.
    pub relocations: u64,
}

impl Spark {
    pub fn new<R: Rng + ?Sized>(dims: Dims, lifespan: u32, rng: &mut R) -> Self {
        Self {
            position: dims.random_cursor(rng),
            age: 0,
            lifespan,
            relocations: 0,
        }
    }

    fn is_dead(&self) -> bool {
        self.age > self.lifespan
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dims: Dims,
        cols: &mut [Column],
        glyphs: &GlyphSet,
        rng: &mut R,
    ) {
        self.age += 1;
        if self.is_dead() {
            self.position = dims.random_cursor(rng);
            self.age = 0;
            self.relocations += 1;
        }
        write_glyph(cols, dims, self.position, glyphs.sample(rng));
    }

    pub fn draw<S: Surface>(&self, layout: &Layout, surface: &mut S) {
        layout.set_style_at(surface, self.position, layout.palette().spark);
    }
}
