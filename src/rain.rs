// Copyright (c) 2026 glyphfall contributors

use std::io;

use crossterm::style::Color;
use rand::rngs::StdRng;
use rand::Rng;

use crate::charset::{CharGen, Glyph, BLANK};
use crate::droplet::{Droplet, MAX_SPEED};
use crate::mask::Stencil;
use crate::palette::LEADING_EDGE;
use crate::terminal::Terminal;
use crate::viewport::Viewport;

pub const DROPLETS_PER_COLUMN: usize = 2;

// One resolved write in physical screen coordinates; erases carry no color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellWrite {
    pub x: u16,
    pub y: u16,
    pub fg: Option<Color>,
    pub glyph: Glyph,
}

pub struct Rain {
    viewport: Viewport,
    columns: Vec<[Droplet; DROPLETS_PER_COLUMN]>,
    stencil: Option<Stencil>,
    chargen: CharGen,
    trail_color: Color,
    rng: StdRng,
    writes: Vec<CellWrite>,
}

impl Rain {
    pub fn new(chargen: CharGen, trail_color: Color, transpose: bool, rng: StdRng) -> Self {
        Self {
            viewport: Viewport::new(0, 0, transpose),
            columns: Vec::new(),
            stencil: None,
            chargen,
            trail_color,
            rng,
            writes: Vec::new(),
        }
    }

    pub fn install_stencil(&mut self, stencil: Option<Stencil>) {
        self.stencil = stencil;
    }

    // Surviving columns keep their droplets; zero rows empties the field.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width, height, self.viewport.transpose);
        let target = if self.viewport.rows == 0 {
            0
        } else {
            usize::from(self.viewport.cols)
        };
        if target > self.columns.len() {
            for col in self.columns.len()..target {
                let pair = [
                    self.make_droplet(col as u16),
                    self.make_droplet(col as u16),
                ];
                self.columns.push(pair);
            }
        } else {
            self.columns.truncate(target);
        }
    }

    fn make_droplet(&mut self, column: u16) -> Droplet {
        let rows = self.viewport.rows.max(1);
        let current_row = self.rng.random_range(0..rows);
        let trail_length = self.rng.random_range(rows / 2..rows);
        let tick_divisor = self.rng.random_range(1..MAX_SPEED);
        let glyphs = self.chargen.generate(usize::from(rows), &mut self.rng);
        Droplet {
            column,
            current_row,
            trail_length,
            tick_divisor,
            ticks_elapsed: 0,
            glyphs,
        }
    }

    pub fn render_frame(&mut self, term: &mut Terminal) -> io::Result<()> {
        self.step();
        for w in &self.writes {
            term.put(w.x, w.y, w.fg, w.glyph)?;
        }
        term.flush()
    }

    // Trail, head, erase queue in that order; overlaps resolve by emission
    // order.
    fn step(&mut self) -> &[CellWrite] {
        self.writes.clear();
        for ci in 0..self.columns.len() {
            for k in 0..DROPLETS_PER_COLUMN {
                let due = self.columns[ci][k].tick();
                if due {
                    let (column, head, trail_length, behind_head, at_head) = {
                        let d = &self.columns[ci][k];
                        let behind_head = d.current_row.checked_sub(1).and_then(|row| {
                            d.glyphs.get(usize::from(row)).map(|&g| (row, g))
                        });
                        let at_head = d
                            .glyphs
                            .get(usize::from(d.current_row))
                            .map(|&g| (d.current_row, g));
                        (d.column, d.current_row, d.trail_length, behind_head, at_head)
                    };
                    if let Some((row, glyph)) = behind_head {
                        self.push_write(row, column, glyph, Some(self.trail_color));
                    }
                    if let Some((row, glyph)) = at_head {
                        self.push_write(row, column, glyph, Some(LEADING_EDGE));
                    }
                    if let Some(row) = head.checked_sub(trail_length) {
                        self.push_write(row, column, BLANK, None);
                    }
                    self.columns[ci][k].advance();
                }
                if self.columns[ci][k].is_spent(self.viewport.rows) {
                    let column = self.columns[ci][k].column;
                    let mut fresh = self.make_droplet(column);
                    fresh.current_row = 0;
                    self.columns[ci][k] = fresh;
                }
            }
        }
        &self.writes
    }

    fn push_write(&mut self, row: u16, col: u16, glyph: Glyph, fg: Option<Color>) {
        if let Some(w) = plan_write(&self.viewport, self.stencil.as_ref(), row, col, glyph, fg) {
            self.writes.push(w);
        }
    }
}

// A masked-blank cell paints a single space whatever glyph was asked for.
fn plan_write(
    viewport: &Viewport,
    stencil: Option<&Stencil>,
    row: u16,
    col: u16,
    glyph: Glyph,
    fg: Option<Color>,
) -> Option<CellWrite> {
    if !viewport.contains(row, col) {
        return None;
    }
    let (phys_row, phys_col) = viewport.to_physical(row, col);
    let glyph = if stencil.is_some_and(|s| s.is_blank(phys_row, phys_col)) {
        BLANK
    } else {
        glyph
    };
    Some(CellWrite {
        x: phys_col,
        y: phys_row,
        fg,
        glyph,
    })
}
