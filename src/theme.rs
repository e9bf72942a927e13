//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::board::PuyoColor;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Board, puyo and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Puyo colours indexed by `PuyoColor::index`: red, green, blue, yellow, purple.
    pub puyo: [Color; 5],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Sidebar text.
    pub main_fg: Color,
    /// Titles and key hints.
    pub title: Color,
    /// Secondary text (phase line).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

/// `#RRGGBB` literal → Color; only for the hardcoded tables below.
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const ONEDARK_PUYO: [Color; 5] = [
    rgb(0xE06C75), // red
    rgb(0x98C379), // green
    rgb(0x61AFEF), // blue
    rgb(0xE5C07B), // yellow
    rgb(0xC678DD), // magenta
];

impl Theme {
    /// One Dark defaults.
    pub fn onedark_default() -> Self {
        Self {
            puyo: ONEDARK_PUYO,
            bg: rgb(0x31353F),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark if `path` is None or missing; `palette` then overrides the puyo colours.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))
            }
            _ => Self::onedark_default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.puyo = [
                    rgb(0xFF0000),
                    rgb(0x00FF00),
                    rgb(0x0088FF),
                    rgb(0xFFFF00),
                    rgb(0xFF00FF),
                ];
            }
            crate::Palette::Colorblind => {
                // Tol bright scheme: no red/green pair.
                self.puyo = [
                    rgb(0xCC3311),
                    rgb(0x009988),
                    rgb(0x0077BB),
                    rgb(0xEE7733),
                    rgb(0xEE3377),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let d = Self::onedark_default();
        Self {
            puyo: [
                get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.puyo[0]),
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(d.puyo[1]),
                get("cpu_box").unwrap_or(d.puyo[2]),
                get("cpu_mid").or_else(|| get("title")).unwrap_or(d.puyo[3]),
                get("net_box").unwrap_or(d.puyo[4]),
            ],
            bg: get("meter_bg").unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
        }
    }

    #[inline]
    pub fn puyo_color(&self, color: PuyoColor) -> Color {
        self.puyo[color.index()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        _ => Err(invalid()),
    }
}
