// Copyright (c) 2026 glyphfall contributors

use clap::ValueEnum;
use crossterm::style::Color;

// Every head renders in this color no matter which trail color is picked.
pub const LEADING_EDGE: Color = Color::White;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorName {
    Green,
    Red,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    White,
}

// crossterm's bare named colors are the bright SGR variants, which is the
// classic rain look for the trail.
pub fn trail_color(name: ColorName) -> Color {
    match name {
        ColorName::Green => Color::Green,
        ColorName::Red => Color::Red,
        ColorName::Blue => Color::Blue,
        ColorName::Yellow => Color::Yellow,
        ColorName::Magenta => Color::Magenta,
        ColorName::Cyan => Color::Cyan,
        ColorName::White => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_trail_is_green() {
        assert_eq!(trail_color(ColorName::Green), Color::Green);
    }

    #[test]
    fn white_trail_matches_the_leading_edge() {
        assert_eq!(trail_color(ColorName::White), LEADING_EDGE);
    }
}
