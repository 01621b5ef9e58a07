// Copyright (c) 2026 rezky_nightky

use rand::Rng;
use tracing::trace;

use crate::cell::Cell;
use crate::config::{Tuning, MAX_DROPS_PER_COLUMN};
use crate::cursor::Cursor;
use crate::frame::Surface;
use crate::glyphs::GlyphSet;
use crate::layout::{Dims, Layout};
use crate::raindrop::Raindrop;

/// One screen column: the background glyphs plus the drops falling
/// through it, newest first.
#[derive(Clone, Debug)]
pub struct Column {
    pub index: i32,
    pub content: Vec<char>,
    pub raindrops: Vec<Raindrop>,
}

impl Column {
    pub fn new<R: Rng + ?Sized>(
        index: i32,
        dims: Dims,
        glyphs: &GlyphSet,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let content = glyphs.sample_n(rng, dims.h.max(0) as usize);
        let mut first = Raindrop::new(index, dims, tuning, rng);
        // Stagger the first drops so columns don't fall in lock-step.
        first.progress.y = rng.random_range(0..(dims.h / 2).max(1));

        Self {
            index,
            content,
            raindrops: vec![first],
        }
    }

    pub fn draw<S: Surface>(&self, layout: &Layout, surface: &mut S) {
        let background = layout.palette().background;
        for (y, &ch) in self.content.iter().enumerate() {
            let cursor = Cursor::new(self.index, y as i32);
            if layout.contains(cursor) {
                surface.set_cell(cursor.x as u16, cursor.y as u16, Cell::new(ch, background));
            }
        }
        for drop in &self.raindrops {
            drop.draw(layout, surface);
        }
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dims: Dims,
        glyphs: &GlyphSet,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        for drop in &mut self.raindrops {
            drop.update();
            if dims.is_out_of_bounds_below(drop.tail_cursor()) || !dims.v_contains(drop.progress) {
                continue;
            }
            if let Some(ch) = self.content.get_mut(drop.progress.y as usize) {
                *ch = glyphs.sample(rng);
            }
        }

        let before = self.raindrops.len();
        self.raindrops
            .retain(|d| !dims.is_out_of_bounds_below(d.tail_cursor()));
        if self.raindrops.len() != before {
            trace!(column = self.index, died = before - self.raindrops.len(), "raindrop left the grid");
        }

        if self.should_spawn(tuning) {
            self.raindrops
                .insert(0, Raindrop::new(self.index, dims, tuning, rng));
        }
    }

    fn should_spawn(&self, tuning: &Tuning) -> bool {
        match self.raindrops.first() {
            None => true,
            Some(newest) => {
                self.raindrops.len() < MAX_DROPS_PER_COLUMN
                    && newest.tail_cursor().y > tuning.spawn_threshold
            }
        }
    }
}
