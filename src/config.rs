// Copyright (c) 2026 glyphfall contributors

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::charset::CharRange;
use crate::palette::ColorName;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    #[value(name = "vertical", alias = "v")]
    Vertical,
    #[value(name = "horizontal", alias = "h")]
    Horizontal,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Horizontal)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "glyphfall",
    version,
    about = "Falling-glyph rain for the terminal, with image-derived stencils"
)]
pub struct Args {
    #[arg(
        short = 'd',
        long = "direction",
        value_enum,
        default_value_t = Direction::Vertical,
        help_heading = "GENERAL",
        help = "Rain direction: vertical falls down, horizontal flows right"
    )]
    pub direction: Direction,

    #[arg(
        short = 'c',
        long = "color",
        value_enum,
        default_value_t = ColorName::Green,
        help_heading = "APPEARANCE",
        help = "Trail color (the leading edge is always white)"
    )]
    pub color: ColorName,

    #[arg(
        short = 'k',
        long = "char-range",
        value_enum,
        default_value_t = CharRange::Ascii,
        help_heading = "APPEARANCE",
        help = "Glyph alphabet"
    )]
    pub char_range: CharRange,

    #[arg(
        short = 'f',
        long = "file-path",
        help_heading = "APPEARANCE",
        help = "Rain the characters of a file instead of an alphabet"
    )]
    pub file_path: Option<PathBuf>,

    #[arg(
        short = 'm',
        long = "mask-path",
        help_heading = "MASK",
        help = "Image whose shape confines the rain"
    )]
    pub mask_path: Option<PathBuf>,

    #[arg(
        short = 'i',
        long = "invert-mask",
        help_heading = "MASK",
        help = "Swap which side of the mask suppresses rain"
    )]
    pub invert_mask: bool,

    #[arg(
        long = "offset-row",
        default_value_t = 0,
        help_heading = "MASK",
        help = "Shift the mask down by N rows"
    )]
    pub offset_row: u16,

    #[arg(
        long = "offset-col",
        default_value_t = 0,
        help_heading = "MASK",
        help = "Shift the mask right by N columns"
    )]
    pub offset_col: u16,

    #[arg(
        long = "font-ratio",
        default_value_t = 2,
        value_parser = clap::value_parser!(u16).range(1..),
        help_heading = "MASK",
        help = "Terminal cell height as a multiple of its width"
    )]
    pub font_ratio: u16,

    #[arg(
        long = "print-mask",
        help_heading = "MASK",
        help = "Print the rendered mask grid and exit"
    )]
    pub print_mask: bool,
}

#[derive(Debug, Clone)]
pub struct MaskSettings {
    pub path: PathBuf,
    pub inverted: bool,
    pub offset_row: u16,
    pub offset_col: u16,
    pub font_ratio: u16,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub direction: Direction,
    pub color: ColorName,
    pub char_range: CharRange,
    pub file_chars: Vec<char>,
    pub mask: Option<MaskSettings>,
    pub print_mask: bool,
}

impl Settings {
    // Every side effect and cross-option rule runs here, once, before any
    // simulation state exists.
    pub fn resolve(args: Args) -> Result<Self, String> {
        let mut direction = args.direction;
        let mut color = args.color;
        let mut char_range = args.char_range;
        let mut file_chars = Vec::new();

        if let Some(path) = &args.file_path {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read character file {}: {}", path.display(), e))?;
            // A newline or tab in a glyph run would move the cursor mid-write.
            file_chars = text
                .chars()
                .filter(|c| !c.is_control() && !c.is_whitespace())
                .collect();
            if file_chars.is_empty() {
                return Err(format!(
                    "character file {} has no characters",
                    path.display()
                ));
            }
            char_range = CharRange::File;
        }

        // The lil-guys literal only reads sideways, and it pins the color.
        if char_range == CharRange::LilGuys {
            direction = Direction::Horizontal;
            color = ColorName::White;
        }

        if args.print_mask && args.mask_path.is_none() {
            return Err("--print-mask needs --mask-path".to_string());
        }

        let mask = args.mask_path.map(|path| MaskSettings {
            path,
            inverted: args.invert_mask,
            offset_row: args.offset_row,
            offset_col: args.offset_col,
            font_ratio: args.font_ratio,
        });

        Ok(Self {
            direction,
            color,
            char_range,
            file_chars,
            mask,
            print_mask: args.print_mask,
        })
    }
}
