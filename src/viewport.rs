// Copyright (c) 2026 glyphfall contributors

// Logical space is what the simulation sees: droplets always fall down
// columns. Transposition happens here and nowhere else, so horizontal rain
// is the same simulation over a swapped screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub rows: u16,
    pub cols: u16,
    pub transpose: bool,
}

impl Viewport {
    pub fn new(width: u16, height: u16, transpose: bool) -> Self {
        let (cols, rows) = if transpose {
            (height, width)
        } else {
            (width, height)
        };
        Self {
            rows,
            cols,
            transpose,
        }
    }

    pub fn contains(&self, row: u16, col: u16) -> bool {
        row < self.rows && col < self.cols
    }

    // Logical (row, col) to physical (row, col).
    pub fn to_physical(&self, row: u16, col: u16) -> (u16, u16) {
        if self.transpose {
            (col, row)
        } else {
            (row, col)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upright_viewport_keeps_terminal_dimensions() {
        let v = Viewport::new(80, 24, false);
        assert_eq!((v.cols, v.rows), (80, 24));
        assert_eq!(v.to_physical(5, 12), (5, 12));
    }

    #[test]
    fn transposed_viewport_swaps_dimensions_and_coordinates() {
        let v = Viewport::new(80, 24, true);
        assert_eq!((v.cols, v.rows), (24, 80));
        assert_eq!(v.to_physical(70, 7), (7, 70));
    }

    #[test]
    fn contains_is_exclusive_at_the_edges() {
        let v = Viewport::new(10, 4, false);
        assert!(v.contains(0, 0));
        assert!(v.contains(3, 9));
        assert!(!v.contains(4, 9));
        assert!(!v.contains(3, 10));
    }

    #[test]
    fn zero_sized_viewport_contains_nothing() {
        let v = Viewport::new(0, 4, false);
        assert!(!v.contains(0, 0));
    }
}
