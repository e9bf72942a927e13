//! App: terminal init, fixed-rate frame loop, key handling.

use crate::GameConfig;
use crate::game::{GameState, Phase, RandomColors, Timing};
use crate::input::{InputLatch, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, ClearFlash};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// How long the final board stays on screen after game over.
const GAME_OVER_HOLD_MS: u64 = 1200;

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    latch: InputLatch,
    flash: ClearFlash,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let timing = Timing {
            fall_interval: config.fall_interval,
            soft_drop_factor: config.soft_drop_factor,
        };
        let colors = RandomColors::new(config.seed, config.high_color);
        let state = GameState::new(config.width, config.height, timing, Box::new(colors));
        let flash = ClearFlash::new(!config.no_animation);
        Self {
            config,
            theme,
            state,
            latch: InputLatch::default(),
            flash,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                supports_keyboard_enhancement,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events let soft drop end as soon as the key is let go.
        let reports_release = matches!(supports_keyboard_enhancement(), Ok(true))
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        self.latch = InputLatch::new(reports_release);

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let now = Instant::now();
        terminal.draw(|f| {
            ui::draw(f, &self.state, &self.theme, self.config.high_color, &mut self.flash, now)
        })?;
        Ok(())
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame = Duration::from_secs_f64(1.0 / self.config.fps);
        let mut next_tick = Instant::now() + frame;

        loop {
            self.draw(terminal)?;

            // Gather key events until this frame's tick is due.
            loop {
                let timeout = next_tick.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                if let Event::Key(key) = event::read()? {
                    self.latch.record(key_to_action(key), key.kind, Instant::now());
                }
            }

            let now = Instant::now();
            next_tick += frame;
            if next_tick < now {
                // Fell behind (e.g. suspended); resync instead of bursting ticks.
                next_tick = now + frame;
            }

            let input = self.latch.take(now);
            if input.quit {
                return Ok(());
            }
            if self.state.tick(input) == Phase::GameOver {
                self.draw(terminal)?;
                std::thread::sleep(Duration::from_millis(GAME_OVER_HOLD_MS));
                return Ok(());
            }
        }
    }
}
