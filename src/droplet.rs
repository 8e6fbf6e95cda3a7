// Copyright (c) 2026 glyphfall contributors

use crate::charset::Glyph;

// Exclusive upper bound for tick_divisor. 1 advances every tick, 19 every
// nineteenth.
pub const MAX_SPEED: u16 = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Droplet {
    pub column: u16,
    pub current_row: u16,
    pub trail_length: u16,
    pub tick_divisor: u16,
    pub ticks_elapsed: u64,
    // One glyph per logical row, fixed for the droplet's lifetime.
    pub glyphs: Vec<Glyph>,
}

impl Droplet {
    // Count one scheduler tick. True when the droplet is due to advance.
    pub fn tick(&mut self) -> bool {
        self.ticks_elapsed += 1;
        self.ticks_elapsed % u64::from(self.tick_divisor.max(1)) == 0
    }

    pub fn advance(&mut self) {
        self.current_row = self.current_row.saturating_add(1);
    }

    // Fully scrolled past the viewport, trail included.
    pub fn is_spent(&self, rows: u16) -> bool {
        u32::from(self.current_row) > u32::from(rows) + u32::from(self.trail_length)
    }
}
