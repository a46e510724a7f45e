//! Modal overlays used while generating a script.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

/// Result of feeding a key to a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Pending,
    Submitted(T),
    Dismissed,
}

/// Save-file prompt with an editable path.
#[derive(Debug, Clone)]
pub struct SavePromptState {
    input: String,
    warning: Option<String>,
}

impl SavePromptState {
    pub fn new(suggested: impl Into<String>) -> Self {
        Self {
            input: suggested.into(),
            warning: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome<PathBuf> {
        match key.code {
            KeyCode::Esc => DialogOutcome::Dismissed,
            KeyCode::Enter => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    self.warning = Some("Enter a file name first.".into());
                    DialogOutcome::Pending
                } else {
                    DialogOutcome::Submitted(PathBuf::from(trimmed))
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                DialogOutcome::Pending
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                DialogOutcome::Pending
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(ch);
                self.warning = None;
                DialogOutcome::Pending
            }
            _ => DialogOutcome::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let popup = centered(area, 80, 6);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title("Save batch file · enter to save · esc to cancel")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let prompt = Paragraph::new(format!("{}▏", self.input))
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false });
        frame.render_widget(prompt, layout[0]);

        if let Some(warning) = &self.warning {
            frame.render_widget(warning_line(warning), layout[1]);
        }
    }
}

/// List of candidate executables for one program.
///
/// Nothing is highlighted until the user moves, so confirming straight away warns instead of
/// picking a default.
#[derive(Debug, Clone)]
pub struct ChoiceDialogState {
    name: String,
    candidates: Vec<PathBuf>,
    highlighted: Option<usize>,
    warning: Option<String>,
}

impl ChoiceDialogState {
    pub fn new(name: impl Into<String>, candidates: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            candidates,
            highlighted: None,
            warning: None,
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome<PathBuf> {
        match key.code {
            KeyCode::Esc => DialogOutcome::Dismissed,
            KeyCode::Down | KeyCode::Char('j') => {
                self.highlighted = match self.highlighted {
                    None if !self.candidates.is_empty() => Some(0),
                    Some(idx) if idx + 1 < self.candidates.len() => Some(idx + 1),
                    other => other,
                };
                DialogOutcome::Pending
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.highlighted = match self.highlighted {
                    Some(idx) => Some(idx.saturating_sub(1)),
                    None if !self.candidates.is_empty() => Some(0),
                    None => None,
                };
                DialogOutcome::Pending
            }
            KeyCode::Enter => match self.highlighted.and_then(|idx| self.candidates.get(idx)) {
                Some(path) => DialogOutcome::Submitted(path.clone()),
                None => {
                    self.warning = Some("Select an executable first.".into());
                    DialogOutcome::Pending
                }
            },
            _ => DialogOutcome::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let height = (self.candidates.len() as u16).saturating_add(5).min(area.height);
        let popup = centered(area, 100, height.max(7));
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!("Choose the executable for {}", self.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let items: Vec<ListItem> = self
            .candidates
            .iter()
            .map(|path| ListItem::new(path.display().to_string()))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        let mut list_state = ListState::default();
        list_state.select(self.highlighted);
        frame.render_stateful_widget(list, layout[0], &mut list_state);

        if let Some(warning) = &self.warning {
            frame.render_widget(warning_line(warning), layout[1]);
        }
        let hint = Paragraph::new("j/k move · enter choose · esc skip")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, layout[2]);
    }
}

/// Severity of a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
}

/// Modal message closed by enter, space, or esc.
#[derive(Debug, Clone)]
pub struct MessageDialog {
    level: MessageLevel,
    title: String,
    body: String,
}

impl MessageDialog {
    pub fn new(level: MessageLevel, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn handle_key(&self, key: KeyEvent) -> DialogOutcome<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => DialogOutcome::Submitted(()),
            _ => DialogOutcome::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let popup = centered(area, 70, 7);
        frame.render_widget(Clear, popup);

        let color = match self.level {
            MessageLevel::Info => Color::Green,
            MessageLevel::Warning => Color::Yellow,
        };
        let block = Block::default()
            .title(self.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        let body = Paragraph::new(Line::from(self.body.clone())).wrap(Wrap { trim: true });
        frame.render_widget(body, layout[0]);
        let hint = Paragraph::new("press enter").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, layout[1]);
    }
}

fn warning_line(text: &str) -> Paragraph<'static> {
    Paragraph::new(text.to_owned()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
