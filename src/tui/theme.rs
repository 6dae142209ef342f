use ratatui::style::Color;

use crate::model::UiConfig;

/// Screen colors. Every slot can be overridden from `[ui.colors]`.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub purple: Color,
    pub selection_bg: Color,
    /// Unfilled part of the progress bar
    pub track: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x14, 0x11, 0x1F),
            text: Color::Rgb(0xC9, 0xC3, 0xE6),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xA7, 0x8B, 0xFA),
            dim: Color::Rgb(0x6E, 0x68, 0x90),
            red: Color::Rgb(0xF8, 0x71, 0x71),
            green: Color::Rgb(0x4A, 0xDE, 0x80),
            purple: Color::Rgb(0x7C, 0x3A, 0xED),
            selection_bg: Color::Rgb(0x2A, 0x21, 0x40),
            track: Color::Rgb(0x33, 0x2B, 0x4D),
        }
    }
}

/// Parse "#RRGGBB"
fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

impl Theme {
    /// Defaults with `[ui.colors]` overrides applied. Unknown keys and
    /// malformed colors are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring malformed color");
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "red" => &mut theme.red,
                "green" => &mut theme.green,
                "purple" => &mut theme.purple,
                "selection_bg" => &mut theme.selection_bg,
                "track" => &mut theme.track,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }
}
