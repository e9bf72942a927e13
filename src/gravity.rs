//! Column compaction after matched cells are removed.

use crate::board::Board;

/// Drop every column's remaining cells to the floor, keeping their top-to-bottom order.
/// Returns how many cells changed row.
pub fn compact(board: &mut Board) -> usize {
    let (w, h) = board.dimensions();
    let mut moved = 0;
    let mut column = Vec::with_capacity(h);
    for x in 0..w {
        // Floor -> top, so the first collected cell lands on row h-1.
        column.clear();
        for y in (0..h).rev() {
            if let Some(color) = board.take(x, y) {
                column.push((y, color));
            }
        }
        for (i, &(old_y, color)) in column.iter().enumerate() {
            let new_y = h - 1 - i;
            if new_y != old_y {
                moved += 1;
            }
            board.place(x, new_y, color);
        }
    }
    moved
}
