// Copyright (c) 2026 glyphfall contributors

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use image::imageops::FilterType;
use thiserror::Error;

pub const MASK_FOREGROUND: char = '#';
pub const MASK_BACKGROUND: char = ' ';

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("cannot decode mask image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("mask rendered to an empty grid")]
    EmptyRender,
    #[error("viewport too small for a mask")]
    ViewportTooSmall,
}

// Rectangular rows of '#' (paintable subject) and ' ' (background).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskGrid {
    rows: Vec<String>,
    width: u16,
}

impl MaskGrid {
    pub fn new(mut rows: Vec<String>) -> Self {
        let width = rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
            .min(usize::from(u16::MAX)) as u16;
        for row in &mut rows {
            let have = row.chars().count();
            for _ in have..usize::from(width) {
                row.push(MASK_BACKGROUND);
            }
        }
        Self { rows, width }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.rows.len().min(usize::from(u16::MAX)) as u16
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

// Grid height is corrected for cells font_ratio taller than wide.
pub fn render_grid(
    path: &Path,
    cols: u16,
    rows: u16,
    font_ratio: u16,
) -> Result<MaskGrid, MaskError> {
    if cols == 0 || rows == 0 {
        return Err(MaskError::ViewportTooSmall);
    }
    let img = image::open(path)?;
    let (grid_w, grid_h) = fit_grid(img.width(), img.height(), cols, rows, font_ratio);
    let cells = img
        .resize_exact(u32::from(grid_w), u32::from(grid_h), FilterType::Triangle)
        .to_luma_alpha8();

    let mut out = Vec::with_capacity(usize::from(grid_h));
    for y in 0..u32::from(grid_h) {
        let mut line = String::with_capacity(usize::from(grid_w));
        for x in 0..u32::from(grid_w) {
            let [luma, alpha] = cells.get_pixel(x, y).0;
            line.push(if alpha >= 128 && luma < 128 {
                MASK_FOREGROUND
            } else {
                MASK_BACKGROUND
            });
        }
        out.push(line);
    }
    Ok(MaskGrid::new(out))
}

fn fit_grid(img_w: u32, img_h: u32, cols: u16, rows: u16, font_ratio: u16) -> (u16, u16) {
    let ratio = u64::from(font_ratio.max(1));
    let iw = u64::from(img_w.max(1));
    let ih = u64::from(img_h.max(1));
    let max_w = u64::from(cols);
    let max_h = u64::from(rows);

    let mut grid_w = max_w;
    let mut grid_h = (grid_w * ih / (iw * ratio)).max(1);
    if grid_h > max_h {
        grid_h = max_h;
        grid_w = (grid_h * ratio * iw / ih).clamp(1, max_w);
    }
    (grid_w as u16, grid_h as u16)
}

// Dropping the receiver retires a superseded worker mid-render.
pub fn spawn_render(
    path: PathBuf,
    cols: u16,
    rows: u16,
    font_ratio: u16,
) -> Receiver<Result<MaskGrid, MaskError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(render_grid(&path, cols, rows, font_ratio));
    });
    rx
}

pub fn printout(grid: &MaskGrid, offset_row: u16, offset_col: u16) -> String {
    let mut out = String::new();
    for _ in 0..offset_row {
        out.push('\n');
    }
    let pad = " ".repeat(usize::from(offset_col));
    for row in grid.rows() {
        out.push_str(&pad);
        out.push_str(row);
        out.push('\n');
    }
    out
}

// Blank/paint bitmap in physical screen coordinates; rebuilt, never mutated.
#[derive(Clone, Debug)]
pub struct Stencil {
    width: u16,
    height: u16,
    offset_row: u16,
    offset_col: u16,
    blank: Vec<bool>,
}

impl Stencil {
    pub fn build(
        grid: &MaskGrid,
        viewport_cols: u16,
        viewport_rows: u16,
        offset_row: u16,
        offset_col: u16,
        inverted: bool,
    ) -> Result<Self, MaskError> {
        if viewport_cols == 0 || viewport_rows == 0 {
            return Err(MaskError::ViewportTooSmall);
        }
        if grid.height() == 0 || grid.width() == 0 {
            return Err(MaskError::EmptyRender);
        }
        let blank_marker = if inverted {
            MASK_FOREGROUND
        } else {
            MASK_BACKGROUND
        };
        let width = grid.width();
        let mut blank = Vec::with_capacity(usize::from(width) * usize::from(grid.height()));
        for row in grid.rows() {
            for ch in row.chars().take(usize::from(width)) {
                blank.push(ch == blank_marker);
            }
        }
        Ok(Self {
            width,
            height: grid.height(),
            offset_row,
            offset_col,
            blank,
        })
    }

    // Cells outside the stencil rectangle always paint.
    pub fn is_blank(&self, phys_row: u16, phys_col: u16) -> bool {
        let Some(row) = phys_row.checked_sub(self.offset_row) else {
            return false;
        };
        let Some(col) = phys_col.checked_sub(self.offset_col) else {
            return false;
        };
        if row >= self.height || col >= self.width {
            return false;
        }
        self.blank[usize::from(row) * usize::from(self.width) + usize::from(col)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn grid(rows: &[&str]) -> MaskGrid {
        MaskGrid::new(rows.iter().map(|r| r.to_string()).collect())
    }

    struct TempPng(PathBuf);

    impl TempPng {
        fn save(tag: &str, img: RgbaImage) -> Self {
            let path = std::env::temp_dir().join(format!(
                "glyphfall-mask-test-{}-{}.png",
                tag,
                std::process::id()
            ));
            img.save(&path).unwrap();
            Self(path)
        }
    }

    impl Drop for TempPng {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn grid_pads_short_rows_to_a_rectangle() {
        let g = grid(&["##", "#"]);
        assert_eq!(g.width(), 2);
        assert_eq!(g.rows()[1], "# ");
    }

    #[test]
    fn fit_keeps_aspect_under_font_ratio_correction() {
        // A square image in 80x24 cells at ratio 2 spans 48x24: 48 wide by
        // 48 display units tall.
        assert_eq!(fit_grid(100, 100, 80, 24, 2), (48, 24));
    }

    #[test]
    fn fit_caps_width_at_the_viewport() {
        // A very wide image fills the columns and flattens to a single row.
        assert_eq!(fit_grid(1000, 10, 80, 24, 2), (80, 1));
    }

    #[test]
    fn fit_lets_height_bind_for_tall_images() {
        // 100x400 at ratio 2 wants 100x200 cells from 80x24: height binds,
        // width follows as 24 * 2 * 100 / 400 = 12.
        assert_eq!(fit_grid(100, 400, 80, 24, 2), (12, 24));
    }

    #[test]
    fn fit_never_collapses_to_zero() {
        let (w, h) = fit_grid(1, 10_000, 80, 24, 2);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn render_grid_marks_opaque_dark_pixels_only() {
        // Row 0: opaque black; both thresholds just inside (alpha 128,
        // luma 127); alpha just outside (127); opaque white.
        // Row 1: luma just outside (128); transparent; opaque black;
        // luma 127 fully opaque.
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([127, 127, 127, 128]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 127]));
        img.put_pixel(3, 0, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 1, Rgba([128, 128, 128, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(3, 1, Rgba([127, 127, 127, 255]));
        let tmp = TempPng::save("thresholds", img);

        // A 4x2 image in a 4x2 viewport at ratio 1 maps one pixel per cell.
        let grid = render_grid(&tmp.0, 4, 2, 1).unwrap();
        assert_eq!(grid.rows(), vec!["##  ", "  ##"]);
    }

    #[test]
    fn render_grid_halves_height_for_the_font_ratio() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let tmp = TempPng::save("ratio", img);

        let grid = render_grid(&tmp.0, 4, 24, 2).unwrap();
        assert_eq!((grid.width(), grid.height()), (4, 2));
        assert_eq!(grid.rows(), vec!["####", "####"]);
    }

    #[test]
    fn render_grid_rejects_a_zero_viewport_before_decoding() {
        let missing = Path::new("/nonexistent/glyphfall-mask.png");
        assert!(matches!(
            render_grid(missing, 0, 24, 2),
            Err(MaskError::ViewportTooSmall)
        ));
        assert!(matches!(
            render_grid(missing, 80, 0, 2),
            Err(MaskError::ViewportTooSmall)
        ));
    }

    #[test]
    fn render_grid_surfaces_decode_failures() {
        let missing = Path::new("/nonexistent/glyphfall-mask.png");
        assert!(matches!(
            render_grid(missing, 80, 24, 2),
            Err(MaskError::Decode(_))
        ));
    }

    #[test]
    fn stencil_blanks_background_cells() {
        let g = grid(&[" #", "# "]);
        let s = Stencil::build(&g, 10, 10, 0, 0, false).unwrap();
        assert!(s.is_blank(0, 0));
        assert!(!s.is_blank(0, 1));
        assert!(!s.is_blank(1, 0));
        assert!(s.is_blank(1, 1));
    }

    #[test]
    fn inverting_swaps_the_blank_marker() {
        let g = grid(&[" #"]);
        let s = Stencil::build(&g, 10, 10, 0, 0, true).unwrap();
        assert!(!s.is_blank(0, 0));
        assert!(s.is_blank(0, 1));
    }

    #[test]
    fn offsets_shift_the_stencil_down_and_right() {
        let g = grid(&[" "]);
        let s = Stencil::build(&g, 10, 10, 2, 3, false).unwrap();
        assert!(s.is_blank(2, 3));
        // Above or left of the stencil is outside it.
        assert!(!s.is_blank(1, 3));
        assert!(!s.is_blank(2, 2));
        assert!(!s.is_blank(0, 0));
    }

    #[test]
    fn outside_the_stencil_always_paints() {
        let g = grid(&["  ", "  "]);
        let s = Stencil::build(&g, 80, 24, 0, 0, false).unwrap();
        assert!(!s.is_blank(2, 0));
        assert!(!s.is_blank(0, 2));
        assert!(!s.is_blank(23, 79));
    }

    #[test]
    fn empty_grid_fails_to_build() {
        let g = MaskGrid::new(Vec::new());
        assert!(matches!(
            Stencil::build(&g, 80, 24, 0, 0, false),
            Err(MaskError::EmptyRender)
        ));
    }

    #[test]
    fn zero_viewport_fails_to_build() {
        let g = grid(&["#"]);
        assert!(matches!(
            Stencil::build(&g, 0, 24, 0, 0, false),
            Err(MaskError::ViewportTooSmall)
        ));
        assert!(matches!(
            Stencil::build(&g, 80, 0, 0, 0, false),
            Err(MaskError::ViewportTooSmall)
        ));
    }

    #[test]
    fn printout_prefixes_offsets() {
        let g = grid(&["##", "##"]);
        assert_eq!(printout(&g, 2, 3), "\n\n   ##\n   ##\n");
    }

    #[test]
    fn printout_without_offsets_is_just_the_rows() {
        let g = grid(&["# "]);
        assert_eq!(printout(&g, 0, 0), "# \n");
    }
}
