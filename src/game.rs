//! Game state: board, active piece, and the per-tick phase machine
//! (spawn, fall, lock, resolve, game over).

use crate::board::{Board, PuyoColor};
use crate::gravity;
use crate::piece::Piece;
use crate::resolve;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where the game is within its spawn → fall → lock → resolve cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locked,
    Resolving,
    GameOver,
}

/// Key states for one tick, already debounced by the input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
    pub rotate: bool,
    pub quit: bool,
}

/// Supplies colours for new pieces.
pub trait ColorSource {
    fn next_color(&mut self) -> PuyoColor;
}

/// Uniform picks from a fixed palette, seedable for reproducible runs.
#[derive(Debug, Clone)]
pub struct RandomColors {
    rng: StdRng,
    palette: &'static [PuyoColor],
}

impl RandomColors {
    pub fn new(seed: u64, high_color: bool) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            palette: PuyoColor::palette(high_color),
        }
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> PuyoColor {
        self.palette[self.rng.random_range(0..self.palette.len())]
    }
}

/// Fall timing: a fall step fires every `fall_interval` ticks, or every
/// `fall_interval / soft_drop_factor` ticks (at least 1) while soft drop is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub fall_interval: u32,
    pub soft_drop_factor: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            fall_interval: 60,
            soft_drop_factor: 10,
        }
    }
}

impl Timing {
    #[inline]
    pub fn interval(&self, soft_drop: bool) -> u32 {
        let base = self.fall_interval.max(1);
        if soft_drop {
            (base / self.soft_drop_factor.max(1)).max(1)
        } else {
            base
        }
    }
}

/// Owns the board and the active piece; all mutation goes through `tick`.
pub struct GameState {
    board: Board,
    piece: Option<Piece>,
    phase: Phase,
    colors: Box<dyn ColorSource>,
    timing: Timing,
    /// Ticks since the last fall step.
    fall_counter: u32,
    /// Cells removed by the most recent resolution that found a match.
    last_cleared: Vec<(usize, usize)>,
    /// Bumped on each resolution that removed cells.
    clear_generation: u64,
    cleared_total: u64,
}

impl GameState {
    pub fn new(width: usize, height: usize, timing: Timing, colors: Box<dyn ColorSource>) -> Self {
        Self::with_board(Board::new(width, height), timing, colors)
    }

    /// Start from an existing board (e.g. a prepared position).
    pub fn with_board(board: Board, timing: Timing, colors: Box<dyn ColorSource>) -> Self {
        Self {
            board,
            piece: None,
            phase: Phase::Spawning,
            colors,
            timing,
            fall_counter: 0,
            last_cleared: Vec::new(),
            clear_generation: 0,
            cleared_total: 0,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn last_cleared(&self) -> &[(usize, usize)] {
        &self.last_cleared
    }

    pub fn clear_generation(&self) -> u64 {
        self.clear_generation
    }

    pub fn cleared_total(&self) -> u64 {
        self.cleared_total
    }

    /// Pivot spawn cell; the satellite starts one column to the right.
    pub fn spawn_position(&self) -> (i32, i32) {
        ((self.board.width() / 2) as i32, 0)
    }

    /// One simulation step. Transient phases (spawn, lock, resolve) complete within the
    /// same call, so after `tick` the phase is `Falling` or `GameOver`.
    pub fn tick(&mut self, input: InputSnapshot) -> Phase {
        self.advance();
        if self.phase == Phase::Falling {
            self.tick_falling(input);
            self.advance();
        }
        self.phase
    }

    /// Run transient phases until the machine rests in `Falling` or `GameOver`.
    fn advance(&mut self) {
        loop {
            match self.phase {
                Phase::Spawning => {
                    self.spawn();
                }
                Phase::Locked => self.phase = Phase::Resolving,
                Phase::Resolving => {
                    self.resolve();
                }
                Phase::Falling | Phase::GameOver => return,
            }
        }
    }

    /// Create the next piece at the spawn cells. If they are blocked the game ends
    /// without touching the board. Returns whether a piece was spawned; outside
    /// `Spawning` nothing happens.
    fn spawn(&mut self) -> bool {
        if self.phase != Phase::Spawning {
            return false;
        }
        let (x, y) = self.spawn_position();
        let pivot_color = self.colors.next_color();
        let satellite_color = self.colors.next_color();
        let piece = Piece::new(x, y, pivot_color, satellite_color);
        self.fall_counter = 0;
        if piece.fits(&self.board) {
            self.piece = Some(piece);
            self.phase = Phase::Falling;
            true
        } else {
            self.piece = None;
            self.phase = Phase::GameOver;
            false
        }
    }

    fn tick_falling(&mut self, input: InputSnapshot) {
        let Some(piece) = self.piece.as_mut() else {
            self.phase = Phase::Spawning;
            return;
        };

        if input.left {
            piece.translate(&self.board, -1, 0);
        }
        if input.right {
            piece.translate(&self.board, 1, 0);
        }
        if input.rotate {
            piece.rotate(&self.board);
        }

        self.fall_counter += 1;
        if self.fall_counter < self.timing.interval(input.soft_drop) {
            return;
        }
        self.fall_counter = 0;
        if !piece.translate(&self.board, 0, 1) {
            self.lock();
        }
    }

    /// Write the active piece into the board.
    fn lock(&mut self) {
        if let Some(piece) = self.piece.take() {
            piece.lock_into(&mut self.board);
            self.phase = Phase::Locked;
        }
    }

    /// Single resolution pass: remove matched groups, compact columns, then spawn next.
    /// Returns how many cells were removed; outside `Resolving` nothing happens.
    fn resolve(&mut self) -> usize {
        if self.phase != Phase::Resolving {
            return 0;
        }
        let matches = resolve::find_matches(&self.board);
        let removed = matches.len();
        if removed > 0 {
            resolve::remove_matches(&mut self.board, &matches);
            gravity::compact(&mut self.board);
            self.cleared_total += removed as u64;
            self.clear_generation += 1;
            self.last_cleared = matches;
        }
        self.phase = Phase::Spawning;
        removed
    }
}
