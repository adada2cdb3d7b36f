//! Terminal UI module using ratatui
//!
//! Provides a simple API for displaying population state:
//! - Current phase (Preparing, Fetching, Complete)
//! - Progress (current/total with optional details)
//! - Activity log (scrollable history)

mod components;

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, info};

use components::{LogPanel, ProgressPanel, StatusPanel};

pub use components::FAILURE_MARKER;

/// Application phases shown in the status panel
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Preparing,
    Fetching,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Preparing => write!(f, "Preparing database"),
            Phase::Fetching => write!(f, "Fetching from PokeAPI"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Progress information for the current operation
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Trait for UI implementations - allows TUI, log-only and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);

    /// Whether the user asked to stop the current batch
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Whether a key press asks to stop the batch: `q`, `Esc` or Ctrl+C
pub fn is_stop_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Whether a key press dismisses the summary screen
fn is_continue_key(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q'))
}

/// Full-screen progress view shown while the store is populated
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    status: StatusPanel,
    progress: ProgressPanel,
    log: LogPanel,
    stop_requested: bool,
    active: bool,
}

impl UiApp {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            status: StatusPanel::new(),
            progress: ProgressPanel::new(),
            log: LogPanel::new(),
            stop_requested: false,
            active: true,
        })
    }

    /// Drain pending key events without blocking; latches once a stop key is seen
    fn poll_stop(&mut self) -> bool {
        while !self.stop_requested && event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(CrosstermEvent::Key(key)) = event::read() {
                self.stop_requested = is_stop_key(&key);
            }
        }
        self.stop_requested
    }

    fn draw(&mut self) -> Result<()> {
        let (status, progress, log) = (&self.status, &self.progress, &self.log);

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5),
                    Constraint::Length(3),
                    Constraint::Min(5),
                ])
                .split(frame.area());

            status.render(frame, chunks[0]);
            progress.render(frame, chunks[1]);
            log.render(frame, chunks[2]);
        })?;

        Ok(())
    }

    /// Show the batch summary until Enter is pressed, then hand the terminal
    /// back for the lookup prompt
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.status.set_phase(Phase::Complete);
        self.status.set_info(summary);
        self.progress.clear();
        self.log.add("Press Enter to continue");
        self.draw()?;

        loop {
            if let CrosstermEvent::Key(key) = event::read()? {
                if is_continue_key(&key) {
                    break;
                }
            }
        }

        self.restore()
    }

    /// Leave the alternate screen immediately
    pub fn restore(mut self) -> Result<()> {
        self.leave()
    }

    fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.status.set_phase(phase);
        self.draw().ok();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.status.set_info(info);
        self.draw().ok();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.progress.set_progress(Progress::new(current, total, label));
        self.draw().ok();
    }

    fn clear_progress(&mut self) {
        self.progress.clear();
        self.draw().ok();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.log.add(message);
        self.draw().ok();
    }

    fn should_stop(&mut self) -> bool {
        self.poll_stop()
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        self.leave().ok();
    }
}

/// Line-oriented UI that reports through `tracing`
#[derive(Default)]
pub struct LogUi {
    last_percent: Option<u64>,
}

impl LogUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ui for LogUi {
    fn set_phase(&mut self, phase: Phase) {
        info!("{}", phase);
    }

    fn set_info(&mut self, info: impl Into<String>) {
        info!("{}", info.into());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        // Only report every 10%
        let percent = (Progress::new(current, total, "").ratio() * 10.0) as u64 * 10;
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            debug!(current, total, "{}", label.into());
        }
    }

    fn clear_progress(&mut self) {
        self.last_percent = None;
    }

    fn log(&mut self, message: impl Into<String>) {
        info!("{}", message.into());
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
