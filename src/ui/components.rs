//! UI Components for the terminal interface

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use super::{Phase, Progress};

/// Log entries starting with this marker are drawn as failures
pub const FAILURE_MARKER: &str = "✗";

/// Status panel showing current phase and info
pub struct StatusPanel {
    phase: Phase,
    info: String,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Preparing,
            info: String::new(),
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (indicator, color) = match self.phase {
            Phase::Preparing => ("⚙", Color::Yellow),
            Phase::Fetching => ("↓", Color::Cyan),
            Phase::Complete => ("✓", Color::Green),
        };
        let phase_style = Style::default().fg(color).add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", indicator), phase_style),
                Span::styled(self.phase.to_string(), phase_style),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(&self.info, Style::default().fg(Color::Gray)),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Pokédex to SQLite ")
            .title_bottom(" q / Esc / Ctrl+C: stop after current Pokémon ")
            .border_style(Style::default().fg(Color::Red));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Progress panel showing how many ids have been processed
pub struct ProgressPanel {
    progress: Option<Progress>,
}

impl ProgressPanel {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::Red));

        let Some(progress) = &self.progress else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let label = if progress.total > 0 {
            format!("{} ({}/{})", progress.label, progress.current, progress.total)
        } else {
            progress.label.clone()
        };

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
            .ratio(progress.ratio().min(1.0))
            .label(label);

        frame.render_widget(gauge, area);
    }
}

/// Log panel showing the most recent inserts and failures
pub struct LogPanel {
    entries: Vec<String>,
    max_entries: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 200,
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Activity ")
            .border_style(Style::default().fg(Color::Red));

        let visible_height = area.height.saturating_sub(2) as usize;
        let start = self.entries.len().saturating_sub(visible_height);

        let items: Vec<ListItem> = self.entries[start..]
            .iter()
            .map(|entry| {
                let style = if entry.starts_with(FAILURE_MARKER) {
                    Style::default().fg(Color::LightRed)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Span::styled(format!(" {}", entry), style))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
