//! Match detection: 4-connected same-colour groups of at least `MIN_GROUP_SIZE` cells.

use crate::board::Board;

/// Smallest connected group that is removed.
pub const MIN_GROUP_SIZE: usize = 4;

const NEIGHBOURS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Every maximal same-colour group of size >= `MIN_GROUP_SIZE`, in row-major seed order.
/// Each cell is visited once; the flood fill uses an explicit stack.
pub fn find_groups(board: &Board) -> Vec<Vec<(usize, usize)>> {
    let (w, h) = board.dimensions();
    let mut visited = vec![false; w * h];
    let mut groups = Vec::new();
    let mut stack = Vec::new();

    for start_y in 0..h {
        for start_x in 0..w {
            if visited[start_y * w + start_x] {
                continue;
            }
            let Some(color) = board.get(start_x, start_y) else {
                continue;
            };

            let mut component = Vec::new();
            visited[start_y * w + start_x] = true;
            stack.push((start_x, start_y));

            while let Some((x, y)) = stack.pop() {
                component.push((x, y));
                for (dx, dy) in NEIGHBOURS_4 {
                    let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                    if !board.in_bounds(nx, ny) {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if !visited[ny * w + nx] && board.get(nx, ny) == Some(color) {
                        visited[ny * w + nx] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            if component.len() >= MIN_GROUP_SIZE {
                groups.push(component);
            }
        }
    }
    groups
}

/// All cells belonging to a removable group, concatenated in group discovery order.
pub fn find_matches(board: &Board) -> Vec<(usize, usize)> {
    find_groups(board).into_iter().flatten().collect()
}

/// Empty every listed cell.
pub fn remove_matches(board: &mut Board, cells: &[(usize, usize)]) {
    for &(x, y) in cells {
        board.clear(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(cells: &[(usize, usize)]) -> HashSet<(usize, usize)> {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_plus_shape_is_one_group() {
        let board = Board::from_rows(&[
            "GBYG.", //
            "BYRYB", //
            "YRRRY", //
            "GYRYG", //
            ".GYG.",
        ]);
        let groups = find_groups(&board);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            as_set(&groups[0]),
            as_set(&[(2, 1), (1, 2), (2, 2), (3, 2), (2, 3)])
        );
        assert_eq!(find_matches(&board).len(), 5);
    }

    #[test]
    fn test_group_of_three_is_not_matched() {
        let board = Board::from_rows(&["....", "....", "RRR.", "GGBB"]);
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_diagonal_cells_are_not_connected() {
        let board = Board::from_rows(&["R...", ".R..", "..R.", "...R"]);
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_groups_reported_in_row_major_seed_order() {
        let board = Board::from_rows(&[
            "....BB", //
            "....BB", //
            "RRRR..",
        ]);
        let groups = find_groups(&board);
        assert_eq!(groups.len(), 2);
        assert_eq!(as_set(&groups[0]), as_set(&[(4, 0), (5, 0), (4, 1), (5, 1)]));
        assert_eq!(as_set(&groups[1]), as_set(&[(0, 2), (1, 2), (2, 2), (3, 2)]));
        // The seed cell of each group comes first.
        assert_eq!(groups[0][0], (4, 0));
        assert_eq!(groups[1][0], (0, 2));
    }

    #[test]
    fn test_same_colour_groups_separated_by_gap_stay_apart() {
        let board = Board::from_rows(&["YY.YY", "YY.Y."]);
        let groups = find_groups(&board);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 4);
        assert!(!as_set(&groups[0]).contains(&(3, 0)));
    }

    #[test]
    fn test_remove_matches_clears_only_listed_cells() {
        let mut board = Board::from_rows(&["G...", "RRRR"]);
        let matches = find_matches(&board);
        remove_matches(&mut board, &matches);
        assert_eq!(board.occupied_count(), 1);
        assert!(board.is_occupied(0, 0));
    }
}
