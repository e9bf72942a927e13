//! Key bindings (normal and vim-style) and the per-frame input latch.

use crate::game::InputSnapshot;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// Without release events, soft drop stays held this long after the last press/repeat.
pub const SOFT_DROP_HOLD_MS: u64 = 120;

/// Action from a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    Quit,
    None,
}

/// Map key event to game action. Supports both normal (arrows) and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('x') => Action::Rotate,
        KeyCode::Down | KeyCode::Char('j') => Action::SoftDrop,
        _ => Action::None,
    }
}

/// Collects key events between ticks and turns them into one `InputSnapshot`.
///
/// Move, rotate and quit are edge-triggered: true for the tick after a press or repeat.
/// Soft drop is level-triggered: held from press until release. Terminals that never
/// report release fall back to `SOFT_DROP_HOLD_MS` after the last press/repeat.
#[derive(Debug, Default)]
pub struct InputLatch {
    pending: InputSnapshot,
    /// Last press/repeat of soft drop; None once released.
    soft_drop_at: Option<Instant>,
    /// Release events are delivered, so a held key stays held until its release.
    reports_release: bool,
}

impl InputLatch {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            ..Self::default()
        }
    }

    pub fn record(&mut self, action: Action, kind: KeyEventKind, now: Instant) {
        if kind == KeyEventKind::Release {
            self.reports_release = true;
            if action == Action::SoftDrop {
                self.soft_drop_at = None;
            }
            return;
        }
        match action {
            Action::MoveLeft => self.pending.left = true,
            Action::MoveRight => self.pending.right = true,
            Action::Rotate => self.pending.rotate = true,
            Action::SoftDrop => self.soft_drop_at = Some(now),
            Action::Quit => self.pending.quit = true,
            Action::None => {}
        }
    }

    /// Snapshot for this tick; clears the edge-triggered flags.
    pub fn take(&mut self, now: Instant) -> InputSnapshot {
        let hold = Duration::from_millis(SOFT_DROP_HOLD_MS);
        let soft_drop = self
            .soft_drop_at
            .is_some_and(|t| self.reports_release || now.saturating_duration_since(t) < hold);
        if !soft_drop {
            self.soft_drop_at = None;
        }
        let mut snapshot = std::mem::take(&mut self.pending);
        snapshot.soft_drop = soft_drop;
        snapshot
    }
}
