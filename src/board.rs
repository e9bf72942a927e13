//! Board: fixed-size occupancy grid of settled puyos.

/// Puyo colours. The first four form the base palette; `Purple` is added in high-colour mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuyoColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl PuyoColor {
    pub const BASE: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];
    pub const ALL: [Self; 5] = [Self::Red, Self::Green, Self::Blue, Self::Yellow, Self::Purple];

    /// Colours a new piece may be drawn from.
    pub fn palette(high_color: bool) -> &'static [Self] {
        if high_color { &Self::ALL[..] } else { &Self::BASE[..] }
    }

    /// Index into theme colour tables (0..5).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Yellow => 3,
            Self::Purple => 4,
        }
    }

    /// Single-letter code used by `Board::from_rows`.
    #[cfg(test)]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Self::Red),
            'G' => Some(Self::Green),
            'B' => Some(Self::Blue),
            'Y' => Some(Self::Yellow),
            'P' => Some(Self::Purple),
            _ => None,
        }
    }
}

/// Settled cells. y=0 is the top row, y=height-1 the floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// cells[y * width + x]
    cells: Vec<Option<PuyoColor>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Build a board from text rows, top row first. `.` is empty, `RGBYP` are colours.
    /// Every row must have the same length.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.chars().count(), width, "ragged board row {y}");
            for (x, c) in row.chars().enumerate() {
                if let Some(color) = PuyoColor::from_char(c) {
                    board.place(x, y, color);
                }
            }
        }
        board
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// True if (x, y) lies on the board. Accepts signed coordinates so piece targets can be checked directly.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<PuyoColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[self.idx(x, y)]
    }

    /// Out-of-bounds cells report unoccupied; callers bounds-check first.
    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some()
    }

    /// True if (x, y) is on the board and empty.
    #[inline]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.is_occupied(x as usize, y as usize)
    }

    /// Write a colour into an empty cell.
    ///
    /// # Panics
    /// If (x, y) is out of bounds or already occupied.
    pub fn place(&mut self, x: usize, y: usize, color: PuyoColor) {
        assert!(
            x < self.width && y < self.height,
            "place out of bounds: ({x}, {y}) on {}x{}",
            self.width,
            self.height
        );
        let i = self.idx(x, y);
        assert!(self.cells[i].is_none(), "place into occupied cell ({x}, {y})");
        self.cells[i] = Some(color);
    }

    /// Reset a cell to empty.
    ///
    /// # Panics
    /// If (x, y) is out of bounds.
    pub fn clear(&mut self, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.height,
            "clear out of bounds: ({x}, {y}) on {}x{}",
            self.width,
            self.height
        );
        let i = self.idx(x, y);
        self.cells[i] = None;
    }

    /// Remove and return the colour at (x, y), if any.
    pub(crate) fn take(&mut self, x: usize, y: usize) -> Option<PuyoColor> {
        let i = self.idx(x, y);
        self.cells[i].take()
    }

    /// Occupied cells as (x, y, colour), row-major.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, PuyoColor)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|color| (i % self.width, i / self.width, color)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_unoccupied() {
        let mut b = Board::new(3, 2);
        b.place(2, 1, PuyoColor::Red);
        assert!(b.is_occupied(2, 1));
        assert!(!b.is_occupied(3, 1));
        assert!(!b.is_occupied(0, 2));
        assert!(!b.is_free(-1, 0));
        assert!(!b.is_free(2, 1));
        assert!(b.is_free(0, 0));
    }

    #[test]
    fn test_place_and_clear() {
        let mut b = Board::new(4, 4);
        b.place(1, 3, PuyoColor::Blue);
        assert_eq!(b.get(1, 3), Some(PuyoColor::Blue));
        assert_eq!(b.occupied_count(), 1);
        b.clear(1, 3);
        assert_eq!(b.get(1, 3), None);
        assert_eq!(b.dimensions(), (4, 4));
    }

    #[test]
    #[should_panic(expected = "occupied")]
    fn test_place_into_occupied_panics() {
        let mut b = Board::new(2, 2);
        b.place(0, 0, PuyoColor::Red);
        b.place(0, 0, PuyoColor::Green);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_place_out_of_bounds_panics() {
        let mut b = Board::new(2, 2);
        b.place(2, 0, PuyoColor::Red);
    }

    #[test]
    fn test_from_rows_and_occupied_order() {
        let b = Board::from_rows(&["R..", ".G.", "..b"]);
        let cells: Vec<_> = b.occupied_cells().collect();
        assert_eq!(
            cells,
            vec![
                (0, 0, PuyoColor::Red),
                (1, 1, PuyoColor::Green),
                (2, 2, PuyoColor::Blue),
            ]
        );
    }
}
