// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const FRAME_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 30);

pub const MIN_DROP_LENGTH: i32 = 4;
pub const SPAWN_THRESHOLD: i32 = 15;
/// Threshold of the sparser rain variant.
pub const SPARSE_SPAWN_THRESHOLD: i32 = 10;
pub const SPARK_LIFESPAN: u32 = 60;
pub const COLUMNS_PER_SPARK: usize = 10;
pub const MAX_DROPS_PER_COLUMN: usize = 2;

pub const INPUT_QUEUE_DEPTH: usize = 64;
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Fixed rain constants, bundled so tests can pick the sparse variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tuning {
    pub min_drop_length: i32,
    pub spawn_threshold: i32,
    pub spark_lifespan: u32,
    pub columns_per_spark: usize,
}

impl Tuning {
    #[cfg(test)]
    pub fn sparse() -> Self {
        Self {
            spawn_threshold: SPARSE_SPAWN_THRESHOLD,
            ..Self::default()
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_drop_length: MIN_DROP_LENGTH,
            spawn_threshold: SPAWN_THRESHOLD,
            spark_lifespan: SPARK_LIFESPAN,
            columns_per_spark: COLUMNS_PER_SPARK,
        }
    }
}

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "glyphfall", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "dump-glyphs",
        visible_alias = "dump-src",
        value_name = "PATH",
        help_heading = "DIAGNOSTICS",
        help = "Write the glyph set to PATH and exit"
    )]
    pub dump_glyphs: Option<PathBuf>,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "DIAGNOSTICS",
        help = "Append tracing output to PATH (filter with RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        short = 'i',
        long = "info",
        help_heading = "HELP",
        help = "Show build information"
    )]
    pub info: bool,

    #[arg(
        short = 'V',
        long = "version",
        help_heading = "HELP",
        help = "Print version"
    )]
    pub version: bool,
}
