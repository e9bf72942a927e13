//! Puyotui: puyo-style falling-pair connection puzzle in the terminal.

mod app;
mod board;
mod game;
mod gravity;
mod input;
mod piece;
mod resolve;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Largest board edge; keeps terminal coordinates within u16.
const MAX_BOARD_EDGE: usize = 200;

/// Accepted simulation rates in ticks per second.
const FPS_RANGE: std::ops::RangeInclusive<f64> = 0.1..=1000.0;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub fps: f64,
    pub fall_interval: u32,
    pub soft_drop_factor: u32,
    pub seed: u64,
    pub high_color: bool,
    pub no_animation: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board width must be between 3 and 200 (got {0})")]
    Width(usize),
    #[error("board height must be between 2 and 200 (got {0})")]
    Height(usize),
    #[error("frame rate must be between 0.1 and 1000 (got {0})")]
    FrameRate(f64),
    #[error("fall interval must be at least 1 tick")]
    FallInterval,
    #[error("soft drop factor must be at least 1")]
    SoftDropFactor,
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            fps: args.fps,
            fall_interval: args.fall_interval,
            soft_drop_factor: args.soft_drop_factor,
            seed: args.seed.unwrap_or_else(rand::random),
            high_color: args.high_color,
            no_animation: args.no_animation,
        }
    }

    /// The spawn pair sits at columns width/2 and width/2 + 1, so the board needs three columns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(3..=MAX_BOARD_EDGE).contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !(2..=MAX_BOARD_EDGE).contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        if !FPS_RANGE.contains(&self.fps) {
            return Err(ConfigError::FrameRate(self.fps));
        }
        if self.fall_interval == 0 {
            return Err(ConfigError::FallInterval);
        }
        if self.soft_drop_factor == 0 {
            return Err(ConfigError::SoftDropFactor);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::from_args(&args);
    config.validate()?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Puyo-style puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "puyotui",
    version,
    about = "Puyo-style falling-pair puzzle in the terminal. Connect four or more of a colour to clear them.",
    long_about = "Puyotui is a terminal falling-pair puzzle.\n\n\
        Pairs of coloured puyos fall into the well. When a pair lands it locks; any group of \
        four or more same-coloured puyos touching orthogonally is removed and the columns \
        settle. The game ends when a new pair cannot enter the well.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move    Up, k or x  Rotate    Down or j  Soft drop    Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Board width in cells.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: usize,

    /// Board height in cells.
    #[arg(long, default_value = "15", value_name = "ROWS")]
    pub height: usize,

    /// Simulation ticks (and frames) per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub fps: f64,

    /// Ticks between fall steps at the base rate.
    #[arg(long, default_value = "60", value_name = "TICKS")]
    pub fall_interval: u32,

    /// Fall-rate multiplier while soft drop is held.
    #[arg(long, default_value = "10", value_name = "N")]
    pub soft_drop_factor: u32,

    /// Seed for the colour generator (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Five colours (adds purple) instead of four.
    #[arg(long)]
    pub high_color: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the flash over removed puyos.
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
