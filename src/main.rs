// Copyright (c) 2026 rezky_nightky

mod app;
mod cell;
mod column;
mod config;
mod cursor;
mod error;
mod frame;
mod glyphs;
mod input;
mod layout;
mod palette;
mod raindrop;
mod spark;
mod telemetry;
mod terminal;

use std::process::ExitCode;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{color_enabled_stdout, Args};
use crate::glyphs::GlyphSet;
use crate::palette::{ColorMode, Palette};
use crate::terminal::restore_terminal_best_effort;

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn main() -> ExitCode {
    let mut cmd = Args::command().styles(clap_styles());
    cmd = cmd.help_template(if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    });
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.info {
        let sha = env!("GLYPHFALL_GIT_SHA");
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        if sha.is_empty() {
            println!("Build: {}", env!("GLYPHFALL_BUILD"));
        } else {
            println!("Build: {} ({})", env!("GLYPHFALL_BUILD"), sha);
        }
        println!("Color: {}", ColorMode::detect().label());
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return ExitCode::SUCCESS;
    }

    let _telemetry = telemetry::init_tracing(args.log_file.as_deref(), "info");

    let glyphs = GlyphSet::standard();

    if let Some(path) = &args.dump_glyphs {
        match glyphs.dump(path) {
            Ok(()) => info!(path = %path.display(), count = glyphs.len(), "glyph set written"),
            Err(e) => {
                error!(error = %e, "glyph dump failed");
                println!("{}", e);
            }
        }
        return ExitCode::SUCCESS;
    }

    install_exit_handlers();

    let palette = Palette::new(ColorMode::detect());
    match app::run(glyphs.clone(), palette, StdRng::from_os_rng()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
