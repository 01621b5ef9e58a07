// Copyright (c) 2026 rezky_nightky

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlyphError {
    #[error("glyph set is empty after applying exclusions")]
    Empty,

    #[error("failed to write glyph set to {}: {source}", .path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("stdout is not a terminal")]
    NotATerminal,

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("failed to start input thread: {0}")]
    InputThread(#[source] io::Error),

    #[error("terminal input closed")]
    InputClosed,
}
