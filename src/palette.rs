// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Style;

const BACKGROUND_RGB: (u8, u8, u8) = (0x00, 0x00, 0x00);
const BODY_RGB: (u8, u8, u8) = (0x11, 0x99, 0x22);
const HEAD_RGB: (u8, u8, u8) = (0x88, 0xff, 0x99);
const SPARK_RGB: (u8, u8, u8) = (0xaa, 0xff, 0xcc);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn detect() -> Self {
        Self::from_env(
            &std::env::var("COLORTERM").unwrap_or_default(),
            &std::env::var("TERM").unwrap_or_default(),
        )
    }

    fn from_env(colorterm: &str, term: &str) -> Self {
        let colorterm = colorterm.to_ascii_lowercase();
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorMode::TrueColor;
        }
        let term = term.to_ascii_lowercase();
        if term.contains("256color") {
            return ColorMode::Color256;
        }
        if term == "dumb" || term == "linux" {
            return ColorMode::Color16;
        }
        ColorMode::Color256
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
        }
    }

    fn color(self, (r, g, b): (u8, u8, u8)) -> Color {
        match self {
            ColorMode::TrueColor => Color::Rgb { r, g, b },
            ColorMode::Color256 => Color::AnsiValue(rgb_to_ansi256(r, g, b)),
            ColorMode::Color16 => rgb_to_color16(r, g, b),
        }
    }
}

/// The four fixed styles of the rain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Background noise glyphs; drawn in black so they stay hidden until
    /// a trail passes over them.
    pub background: Style,
    pub body: Style,
    pub head: Style,
    pub spark: Style,
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            background: Style::fg(mode.color(BACKGROUND_RGB)),
            body: Style::fg(mode.color(BODY_RGB)),
            head: Style::fg(mode.color(HEAD_RGB)).bold(),
            spark: Style::fg(mode.color(SPARK_RGB)).bold(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ColorMode::TrueColor)
    }
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(
        r,
        g,
        b,
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = if avg < 8 {
        (16, 0)
    } else if avg > 238 {
        (231, 255)
    } else {
        let idx = 232 + ((avg - 8) / 10);
        (idx, 8 + 10 * (idx - 232))
    };

    if dist2(r, g, b, gray, gray, gray) < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (c, (cr, cg, cb)) in TABLE {
        let d = dist2(r, g, b, cr, cg, cb);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}
