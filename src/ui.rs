//! Layout and drawing: playfield, active piece, sidebar, removal flash.

use crate::board::PuyoColor;
use crate::game::{GameState, Phase};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Terminal cells per board cell: two columns wide so squares look square.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;

const SIDEBAR_WIDTH: u16 = 24;

/// Duration of the flash over removed cells.
const CLEAR_FLASH_MS: u32 = 300;

/// Playfield size in terminal cells (border + grid) for given board dimensions.
pub fn playfield_size(width: usize, height: usize) -> (u16, u16) {
    (
        width as u16 * CELL_WIDTH + 2,
        height as u16 * CELL_HEIGHT + 2,
    )
}

/// Terminal cells covered by board cell (x, y) inside `board_rect`.
fn cell_rect(board_rect: Rect, x: usize, y: usize) -> Rect {
    Rect {
        x: board_rect.x + x as u16 * CELL_WIDTH,
        y: board_rect.y + y as u16 * CELL_HEIGHT,
        width: CELL_WIDTH,
        height: CELL_HEIGHT,
    }
    .intersection(board_rect)
}

/// Buffer positions of the given board cells.
fn buffer_positions(board_rect: Rect, cells: &[(usize, usize)]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &(x, y) in cells {
        let r = cell_rect(board_rect, x, y);
        for bx in r.left()..r.right() {
            for by in r.top()..r.bottom() {
                set.insert((bx, by));
            }
        }
    }
    set
}

/// Flash over cells removed by the latest resolution (TachyonFX fade from white).
#[derive(Default)]
pub struct ClearFlash {
    enabled: bool,
    /// `GameState::clear_generation` the current effect was built for.
    generation: u64,
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl ClearFlash {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    fn render(&mut self, frame: &mut Frame, state: &GameState, board_rect: Rect, now: Instant) {
        if state.clear_generation() != self.generation {
            self.generation = state.clear_generation();
            self.effect = None;
            if self.enabled {
                let positions = buffer_positions(board_rect, state.last_cleared());
                let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
                    positions.contains(&(pos.x, pos.y))
                }));
                let effect = fx::fade_from(
                    Color::White,
                    Color::White,
                    (CLEAR_FLASH_MS, Interpolation::Linear),
                )
                .with_filter(filter)
                .with_area(board_rect);
                self.effect = Some(effect);
                self.last_process = Some(now);
            }
        }

        let delta = self
            .last_process
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(std::time::Duration::ZERO);
        let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
        self.last_process = Some(now);

        if let Some(effect) = self.effect.as_mut() {
            frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
            if effect.done() {
                self.effect = None;
            }
        }
    }
}

/// Draw the game: playfield with the active piece, sidebar, and any running flash.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    high_color: bool,
    flash: &mut ClearFlash,
    now: Instant,
) {
    let area = frame.area();
    let (w, h) = state.board().dimensions();
    let (pw, ph) = playfield_size(w, h);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let board_rect = draw_playfield(frame, state, theme, inner[0]);
    draw_sidebar(frame, state, theme, high_color, inner[1]);
    flash.render(frame, state, board_rect, now);
}

/// Returns the board rect (inside the border).
fn draw_playfield(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Puyotui ", theme.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let (w, h) = state.board().dimensions();
    let board_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: (w as u16 * CELL_WIDTH).min(inner.width),
        height: (h as u16 * CELL_HEIGHT).min(inner.height),
    };

    let buf = frame.buffer_mut();
    fill(buf, board_rect, Style::default().bg(theme.bg));
    for (x, y, color) in state.board().occupied_cells() {
        fill(buf, cell_rect(board_rect, x, y), puyo_style(theme, color));
    }

    if let Some(piece) = state.piece() {
        for p in piece.cells() {
            if p.x < 0 || p.y < 0 {
                continue;
            }
            let r = cell_rect(board_rect, p.x as usize, p.y as usize);
            fill(buf, r, puyo_style(theme, p.color));
        }
    }
    board_rect
}

fn puyo_style(theme: &Theme, color: PuyoColor) -> Style {
    Style::default().fg(theme.puyo_color(color)).bg(theme.bg)
}

/// Paint a cell rect with full blocks (or blanks when the style has no fg).
fn fill(buf: &mut ratatui::buffer::Buffer, r: Rect, style: Style) {
    let symbol = if style.fg.is_some() { "█" } else { " " };
    for by in r.top()..r.bottom() {
        for bx in r.left()..r.right() {
            buf[(bx, by)].set_symbol(symbol).set_style(style);
        }
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Spawning => "Spawning",
        Phase::Falling => "Falling",
        Phase::Locked => "Locked",
        Phase::Resolving => "Resolving",
        Phase::GameOver => "Game over",
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, high_color: bool, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Colours
            Constraint::Length(1),
            Constraint::Length(6), // Stats
            Constraint::Length(1),
            Constraint::Length(7), // Controls
        ])
        .split(area);

    // --- Colours ---
    let colours_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let colours_inner = colours_block.inner(chunks[0]);
    colours_block.render(chunks[0], frame.buffer_mut());
    let colours_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(colours_inner);
    Paragraph::new(Line::from(Span::styled("Colours", title_style)))
        .render(colours_layout[0], frame.buffer_mut());
    let strip: Vec<Span> = PuyoColor::palette(high_color)
        .iter()
        .map(|&c| Span::styled("██ ", Style::default().fg(theme.puyo_color(c))))
        .collect();
    Paragraph::new(Line::from(strip)).render(colours_layout[1], frame.buffer_mut());

    // --- Stats ---
    let stats_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let (w, h) = state.board().dimensions();
    let phase_style = if state.is_game_over() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.inactive_fg)
    };
    let stats = vec![
        Line::from(vec![
            Span::styled("Cells cleared: ", title_style),
            Span::styled(state.cleared_total().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("On board: ", title_style),
            Span::styled(state.board().occupied_count().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Board: ", title_style),
            Span::styled(format!("{w}×{h}"), fg_style),
        ]),
        Line::from(Span::styled(phase_label(state.phase()), phase_style)),
    ];
    Paragraph::new(Text::from(stats)).render(stats_inner, frame.buffer_mut());

    // --- Controls ---
    let controls_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let controls_inner = controls_block.inner(chunks[4]);
    controls_block.render(chunks[4], frame.buffer_mut());
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{k:<7}"), title_style),
            Span::styled(what, fg_style),
        ])
    };
    let controls = vec![
        key("← h", "Move left"),
        key("→ l", "Move right"),
        key("↑ k x", "Rotate"),
        key("↓ j", "Soft drop"),
        key("q Esc", "Quit"),
    ];
    Paragraph::new(Text::from(controls)).render(controls_inner, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{RandomColors, Timing};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(state: &GameState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        let theme = Theme::default();
        let mut flash = ClearFlash::new(false);
        terminal
            .draw(|f| draw(f, state, &theme, false, &mut flash, Instant::now()))
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_playfield_size_includes_border() {
        assert_eq!(playfield_size(10, 15), (22, 17));
    }

    #[test]
    fn test_removed_count_is_shown_once_as_board_stat() {
        let state = GameState::new(10, 15, Timing::default(), Box::new(RandomColors::new(1, false)));
        let text = rendered_text(&state);
        assert!(text.contains("Puyotui"));
        assert_eq!(text.matches("Cells cleared: 0").count(), 1);
        assert!(!text.contains("Cleared:"));
    }

    #[test]
    fn test_cell_rect_is_clipped_to_board() {
        let board = Rect::new(1, 1, 5, 3);
        assert_eq!(cell_rect(board, 0, 0), Rect::new(1, 1, 2, 1));
        assert_eq!(cell_rect(board, 2, 2), Rect::new(5, 3, 1, 1));
        assert!(cell_rect(board, 4, 0).is_empty());
    }

    #[test]
    fn test_buffer_positions_cover_both_columns() {
        let board = Rect::new(1, 1, 20, 15);
        let set = buffer_positions(board, &[(0, 0), (3, 2)]);
        let expected: HashSet<(u16, u16)> = [(1, 1), (2, 1), (7, 3), (8, 3)].into_iter().collect();
        assert_eq!(set, expected);
    }
}
