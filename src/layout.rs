// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, Rng};
use tracing::debug;

use crate::cell::{Cell, Style};
use crate::column::Column;
use crate::config::Tuning;
use crate::cursor::Cursor;
use crate::frame::Surface;
use crate::glyphs::GlyphSet;
use crate::palette::Palette;
use crate::spark::Spark;

/// Grid dimensions in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dims {
    pub w: i32,
    pub h: i32,
}

impl Dims {
    pub fn contains(self, c: Cursor) -> bool {
        c.x >= 0 && c.x < self.w && self.v_contains(c)
    }

    pub fn v_contains(self, c: Cursor) -> bool {
        c.y >= 0 && c.y < self.h
    }

    /// Strictly past the last row; a cursor at `y == h` is not yet below.
    pub fn is_out_of_bounds_below(self, c: Cursor) -> bool {
        c.y > self.h
    }

    pub fn random_cursor<R: Rng + ?Sized>(self, rng: &mut R) -> Cursor {
        if self.w <= 0 || self.h <= 0 {
            return Cursor::default();
        }
        Cursor::new(rng.random_range(0..self.w), rng.random_range(0..self.h))
    }
}

/// Stores `glyph` as the background glyph of the cell under `cursor`.
pub fn write_glyph(cols: &mut [Column], dims: Dims, cursor: Cursor, glyph: char) {
    if !dims.contains(cursor) {
        return;
    }
    if let Some(slot) = cols
        .get_mut(cursor.x as usize)
        .and_then(|col| col.content.get_mut(cursor.y as usize))
    {
        *slot = glyph;
    }
}

/// The whole rain: one `Column` per screen column plus the sparks. The only
/// thing that paints onto the surface.
pub struct Layout {
    dims: Dims,
    pub cols: Vec<Column>,
    pub sparks: Vec<Spark>,
    glyphs: GlyphSet,
    palette: Palette,
    tuning: Tuning,
    rng: StdRng,
}

impl Layout {
    pub fn new<S: Surface>(
        surface: &S,
        glyphs: GlyphSet,
        palette: Palette,
        tuning: Tuning,
        rng: StdRng,
    ) -> Self {
        let mut layout = Self {
            dims: Dims::default(),
            cols: Vec::new(),
            sparks: Vec::new(),
            glyphs,
            palette,
            tuning,
            rng,
        };
        layout.sync(surface);
        layout.rebuild();
        layout
    }

    #[cfg(test)]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Re-reads the surface size. Returns `true` when it changed; columns
    /// are left alone until `rebuild` is called.
    pub fn sync<S: Surface>(&mut self, surface: &S) -> bool {
        let (w, h) = surface.size();
        let dims = Dims {
            w: w as i32,
            h: h as i32,
        };
        if dims == self.dims {
            return false;
        }
        self.dims = dims;
        true
    }

    /// Throws away all rain state and reseeds it for the current size.
    pub fn rebuild(&mut self) {
        let Self {
            dims,
            cols,
            sparks,
            glyphs,
            tuning,
            rng,
            ..
        } = self;

        *cols = (0..dims.w)
            .map(|x| Column::new(x, *dims, glyphs, tuning, rng))
            .collect();
        *sparks = (0..cols.len() / tuning.columns_per_spark.max(1))
            .map(|_| Spark::new(*dims, tuning.spark_lifespan, rng))
            .collect();

        debug!(
            width = dims.w,
            height = dims.h,
            sparks = sparks.len(),
            "layout rebuilt"
        );
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        for col in &self.cols {
            col.draw(self, surface);
        }
        for spark in &self.sparks {
            spark.draw(self, surface);
        }
    }

    pub fn update(&mut self) {
        let Self {
            dims,
            cols,
            sparks,
            glyphs,
            tuning,
            rng,
            ..
        } = self;

        for col in cols.iter_mut() {
            col.update(*dims, glyphs, tuning, rng);
        }
        for spark in sparks.iter_mut() {
            spark.update(*dims, cols, glyphs, rng);
        }
    }

    pub fn contains(&self, c: Cursor) -> bool {
        self.dims.contains(c)
    }

    pub fn v_contains(&self, c: Cursor) -> bool {
        self.dims.v_contains(c)
    }

    pub fn glyph_at(&self, c: Cursor) -> Option<char> {
        if !self.contains(c) {
            return None;
        }
        self.cols
            .get(c.x as usize)
            .and_then(|col| col.content.get(c.y as usize))
            .copied()
    }

    /// Restyles one cell with the glyph recorded in its column. Skips the
    /// write when the style is already in place or the cursor is off-grid.
    pub fn set_style_at<S: Surface>(&self, surface: &mut S, c: Cursor, style: Style) {
        let Some(ch) = self.glyph_at(c) else {
            return;
        };
        let (x, y) = (c.x as u16, c.y as u16);
        if surface.style_at(x, y) == Some(style) {
            return;
        }
        surface.set_cell(x, y, Cell::new(ch, style));
    }
}
