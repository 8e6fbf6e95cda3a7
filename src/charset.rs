// Copyright (c) 2026 glyphfall contributors

use std::fmt;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::Rng;

// Code-point spans are half-open: [start, end).
const ASCII: (u32, u32) = (0x21, 0x7E);
const BINARY: (u32, u32) = (0x30, 0x32);
const BRAILLE: (u32, u32) = (0x2840, 0x28FF);
const KATAKANA: (u32, u32) = (0x30A0, 0x30FF);
const CJK: (u32, u32) = (0x4E00, 0x9FA5);
// Emoticons block. Older terminals addressed it as the surrogate pair
// 0xD83D + [0xDE01, 0xDE4A).
const EMOJI: (u32, u32) = (0x1F601, 0x1F64A);

pub const LIL_GUY: &str = "  ~~o ";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharRange {
    Ascii,
    Binary,
    Braille,
    Katakana,
    Cjk,
    Emoji,
    LilGuys,
    // Selected through --file-path, not by name.
    #[value(skip)]
    File,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Char(char),
    Literal(&'static str),
}

// Erase writes and stencil substitutions both paint this.
pub const BLANK: Glyph = Glyph::Literal(" ");

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Glyph::Char(c) => write!(f, "{c}"),
            Glyph::Literal(s) => f.write_str(s),
        }
    }
}

pub struct CharGen {
    range: CharRange,
    file_chars: Vec<char>,
    file_pos: usize,
}

impl CharGen {
    pub fn new(range: CharRange, mut file_chars: Vec<char>) -> Self {
        if range == CharRange::File && file_chars.is_empty() {
            file_chars.push('0');
            file_chars.push('1');
        }
        Self {
            range,
            file_chars,
            file_pos: 0,
        }
    }

    pub fn generate(&mut self, count: usize, rng: &mut StdRng) -> Vec<Glyph> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.next_glyph(rng));
        }
        out
    }

    fn next_glyph(&mut self, rng: &mut StdRng) -> Glyph {
        let (start, end) = match self.range {
            CharRange::Ascii => ASCII,
            CharRange::Binary => BINARY,
            CharRange::Braille => BRAILLE,
            CharRange::Katakana => KATAKANA,
            CharRange::Cjk => CJK,
            CharRange::Emoji => EMOJI,
            CharRange::LilGuys => return Glyph::Literal(LIL_GUY),
            CharRange::File => {
                // One cursor for the whole field, so consecutive droplets
                // keep reading where the previous one stopped.
                if self.file_pos >= self.file_chars.len() {
                    self.file_pos = 0;
                }
                let ch = self.file_chars[self.file_pos];
                self.file_pos += 1;
                return Glyph::Char(ch);
            }
        };
        let v = rng.random_range(start..end);
        Glyph::Char(char::from_u32(v).unwrap_or('0'))
    }
}
