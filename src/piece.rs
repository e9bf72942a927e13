//! Falling pair: pivot + satellite, translation and rotation against the board.

use crate::board::{Board, PuyoColor};

/// One cell of a piece: grid position and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Puyo {
    pub x: i32,
    pub y: i32,
    pub color: PuyoColor,
}

/// Current piece. The satellite always sits on one of the pivot's four orthogonal neighbours;
/// that offset is the rotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub pivot: Puyo,
    pub satellite: Puyo,
}

impl Piece {
    /// Pivot at (x, y), satellite to its right.
    pub fn new(x: i32, y: i32, pivot_color: PuyoColor, satellite_color: PuyoColor) -> Self {
        Self {
            pivot: Puyo { x, y, color: pivot_color },
            satellite: Puyo { x: x + 1, y, color: satellite_color },
        }
    }

    /// Satellite position relative to the pivot.
    #[inline]
    pub fn offset(&self) -> (i32, i32) {
        (self.satellite.x - self.pivot.x, self.satellite.y - self.pivot.y)
    }

    #[inline]
    pub fn cells(&self) -> [Puyo; 2] {
        [self.pivot, self.satellite]
    }

    /// True if both cells are on the board and empty.
    pub fn fits(&self, board: &Board) -> bool {
        board.is_free(self.pivot.x, self.pivot.y) && board.is_free(self.satellite.x, self.satellite.y)
    }

    /// Move both cells by (dx, dy). All-or-nothing: if either target is off the board or
    /// occupied, nothing moves and `false` is returned.
    pub fn translate(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        let (px, py) = (self.pivot.x + dx, self.pivot.y + dy);
        let (sx, sy) = (self.satellite.x + dx, self.satellite.y + dy);
        if !board.is_free(px, py) || !board.is_free(sx, sy) {
            return false;
        }
        self.pivot.x = px;
        self.pivot.y = py;
        self.satellite.x = sx;
        self.satellite.y = sy;
        true
    }

    /// Rotate the satellite 90° clockwise around the pivot: (dx, dy) -> (-dy, dx).
    /// The pivot never moves; a blocked rotation leaves the piece unchanged.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let (dx, dy) = self.offset();
        let (nx, ny) = (self.pivot.x - dy, self.pivot.y + dx);
        if !board.is_free(nx, ny) {
            return false;
        }
        self.satellite.x = nx;
        self.satellite.y = ny;
        true
    }

    /// Write both cells into the board.
    ///
    /// # Panics
    /// If either cell is off the board or occupied; callers only lock a piece that fits.
    pub fn lock_into(self, board: &mut Board) {
        for p in self.cells() {
            board.place(p.x as usize, p.y as usize, p.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const R: PuyoColor = PuyoColor::Red;
    const G: PuyoColor = PuyoColor::Green;

    #[test]
    fn test_rotation_cycles_back_after_four_turns() {
        let board = Board::new(6, 6);
        let mut piece = Piece::new(2, 2, R, G);
        let start = piece.offset();
        let mut seen = Vec::new();
        for _ in 0..4 {
            assert!(piece.rotate(&board));
            seen.push(piece.offset());
        }
        assert_eq!(seen, vec![(0, 1), (-1, 0), (0, -1), (1, 0)]);
        assert_eq!(piece.offset(), start);
        assert_eq!((piece.pivot.x, piece.pivot.y), (2, 2));
    }

    #[test]
    fn test_rotation_into_wall_is_rejected() {
        let board = Board::new(6, 6);
        // Satellite below pivot at the left wall: next offset (-1, 0) is off the board.
        let mut piece = Piece::new(0, 2, R, G);
        assert!(piece.rotate(&board));
        let before = piece;
        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotation_into_stack_is_rejected() {
        let board = Board::from_rows(&["....", "....", ".R..", "...."]);
        let mut piece = Piece::new(1, 1, R, G);
        let before = piece;
        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_translate_is_atomic_when_one_cell_blocked() {
        // Satellite at (2,0) is blocked below by (2,1); pivot at (1,0) is free below.
        let board = Board::from_rows(&["....", "..G.", "...."]);
        let mut piece = Piece::new(1, 0, R, G);
        let before = piece;
        assert!(!piece.translate(&board, 0, 1));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_translate_blocked_by_wall() {
        let board = Board::new(4, 4);
        let mut piece = Piece::new(2, 0, R, G);
        assert!(!piece.translate(&board, 1, 0));
        assert_eq!(piece.satellite.x, 3);
        assert!(piece.translate(&board, -1, 0));
        assert_eq!((piece.pivot.x, piece.satellite.x), (1, 2));
    }

    #[test]
    fn test_vertical_piece_moves_into_cell_vacated_by_partner() {
        // Satellite below pivot: moving down, the pivot's target is the satellite's current cell.
        let board = Board::new(3, 4);
        let mut piece = Piece::new(1, 0, R, G);
        assert!(piece.rotate(&board));
        assert!(piece.translate(&board, 0, 1));
        assert_eq!((piece.pivot.y, piece.satellite.y), (1, 2));
        assert!(piece.translate(&board, 0, 1));
        assert!(!piece.translate(&board, 0, 1));
        assert_eq!(piece.satellite.y, 3);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Left,
        Right,
        Down,
        Rotate,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Left), Just(Op::Right), Just(Op::Down), Just(Op::Rotate)]
    }

    proptest! {
        #[test]
        fn prop_piece_stays_in_bounds_and_off_the_stack(
            filled in proptest::collection::vec(any::<bool>(), 6 * 8),
            ops in proptest::collection::vec(op(), 0..64),
        ) {
            let mut board = Board::new(6, 8);
            for (i, f) in filled.iter().enumerate() {
                // Keep the top two rows clear so the piece has somewhere to start.
                if *f && i >= 12 {
                    board.place(i % 6, i / 6, PuyoColor::Blue);
                }
            }
            let mut piece = Piece::new(2, 0, R, G);
            prop_assume!(piece.fits(&board));
            for op in ops {
                let before = piece;
                let moved = match op {
                    Op::Left => piece.translate(&board, -1, 0),
                    Op::Right => piece.translate(&board, 1, 0),
                    Op::Down => piece.translate(&board, 0, 1),
                    Op::Rotate => piece.rotate(&board),
                };
                if !moved {
                    prop_assert_eq!(piece, before);
                }
                prop_assert!(piece.fits(&board));
                let (dx, dy) = piece.offset();
                prop_assert_eq!(dx.abs() + dy.abs(), 1);
            }
        }
    }
}
