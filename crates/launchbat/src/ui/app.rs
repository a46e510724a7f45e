//! Application loop for the TUI.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::app::batch::{BatchGenerator, GenerateReport, suggested_output};
use crate::app::catalog::Catalog;
use crate::infra::clipboard::{Clipboard, ClipboardSink};
use crate::infra::config::Config;
use crate::infra::desktop::desktop_dir;
use crate::ui::components::path_field::PathField;
use crate::ui::components::software_list::{SoftwareList, SoftwareListState};
use crate::ui::prompts::{TerminalPrompts, next_key};

const TICK_RATE: Duration = Duration::from_millis(120);

/// Primary entry point for running the interactive TUI.
///
/// Owns every piece of window state; event handlers receive it through `&mut self`.
pub struct UiApp {
    config: Config,
    list: SoftwareListState,
    software_list: SoftwareList,
    path_field: PathField,
    clipboard: Box<dyn ClipboardSink>,
    generator: BatchGenerator,
    status: Option<StatusMessage>,
    pending: Option<PendingAction>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(config: Config, catalog: Catalog) -> Result<Self> {
        let generator = BatchGenerator::new(config.output.line_ending())?;
        Ok(Self {
            config,
            list: SoftwareListState::new(catalog),
            software_list: SoftwareList,
            path_field: PathField::new(),
            clipboard: Box::new(Clipboard::new()),
            generator,
            status: None,
            pending: None,
            should_quit: false,
        })
    }

    /// Replace the clipboard backend.
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = terminal.show_cursor();

        event_loop_result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.should_quit {
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(ev)?;
            }

            self.run_pending(terminal, next_key);
        }
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(2),
            ])
            .split(size);

        self.software_list.render(frame, layout[0], &self.list);

        let path = self.current_path();
        self.path_field.render(frame, layout[1], path.as_deref());

        let hints = Paragraph::new(Line::from(vec![
            Span::styled("j/k", Style::default().fg(Color::Cyan)),
            Span::raw(" move · "),
            Span::styled("space", Style::default().fg(Color::Cyan)),
            Span::raw(" select · "),
            Span::styled("a", Style::default().fg(Color::Cyan)),
            Span::raw(" all · "),
            Span::styled("/", Style::default().fg(Color::Cyan)),
            Span::raw(" search · "),
            Span::styled("g", Style::default().fg(Color::Cyan)),
            Span::raw(" generate · "),
            Span::styled("y", Style::default().fg(Color::Cyan)),
            Span::raw(" copy path · "),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(" quit"),
        ]))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(hints, layout[2]);

        self.render_status(frame, layout[3]);
    }

    fn render_status(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let message = self.status.as_ref().map(|status| {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::Gray),
                StatusLevel::Success => Style::default().fg(Color::Green),
                StatusLevel::Warning => Style::default().fg(Color::Yellow),
                StatusLevel::Error => Style::default().fg(Color::Red),
            };
            Line::styled(status.text.clone(), style)
        });

        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let line = message.unwrap_or_else(|| {
            Line::styled(
                "Select software, then press g to write a batch file",
                Style::default().fg(Color::DarkGray),
            )
        });
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key)?,
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('g') => {
                    self.request_generate();
                    return Ok(());
                }
                _ => {}
            }
        }

        if self.list.is_filter_active() {
            self.handle_filter_input(key);
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('/') => {
                self.list.begin_filter();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.list.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.list.select_previous();
            }
            KeyCode::Char(' ') => {
                if let Some(selected) = self.list.toggle_current() {
                    let verb = if selected { "Selected" } else { "Deselected" };
                    let name = self
                        .list
                        .current_entry()
                        .map(|entry| entry.name.clone())
                        .unwrap_or_default();
                    self.set_status(StatusLevel::Info, format!("{verb} {name}"));
                }
                self.list.select_next();
            }
            KeyCode::Char('a') => {
                self.list.toggle_all_visible();
            }
            KeyCode::Char('g') => {
                self.request_generate();
            }
            KeyCode::Char('y') => {
                self.copy_path();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_filter_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.list.clear_filter();
                self.list.end_filter();
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Up => {
                self.list.end_filter();
            }
            KeyCode::Backspace => {
                self.list.pop_filter_char();
            }
            KeyCode::Char(ch) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.list.push_filter_char(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind
            && self.path_field.contains(mouse.column, mouse.row)
        {
            self.copy_path();
        }
    }

    /// Location of the entry under the cursor, as shown in the path field.
    pub fn current_path(&self) -> Option<String> {
        self.list
            .current_entry()
            .map(|entry| entry.location.display().to_string())
    }

    fn copy_path(&mut self) {
        let Some(path) = self.current_path() else {
            return;
        };
        match self.clipboard.set_text(&path) {
            Ok(()) => self.set_status(StatusLevel::Success, format!("Copied {path}")),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard copy failed");
                self.set_status(StatusLevel::Error, format!("Copy failed: {err}"));
            }
        }
    }

    fn request_generate(&mut self) {
        if self.list.selected_count() == 0 {
            self.set_status(
                StatusLevel::Warning,
                "Select the software to include in the batch file first",
            );
            return;
        }
        self.pending = Some(PendingAction::Generate);
    }

    /// Carry out the action queued by the last event, reading dialog answers from `keys`.
    pub fn run_pending<B, K>(&mut self, terminal: &mut Terminal<B>, keys: K)
    where
        B: Backend,
        K: FnMut() -> Result<KeyEvent>,
    {
        if let Some(action) = self.pending.take() {
            match action {
                PendingAction::Generate => self.generate(terminal, keys),
            }
        }
    }

    fn generate<B, K>(&mut self, terminal: &mut Terminal<B>, keys: K)
    where
        B: Backend,
        K: FnMut() -> Result<KeyEvent>,
    {
        let selections = self.list.selected_entries();
        let suggested = self.suggested_output();
        let mut prompts = TerminalPrompts::new(terminal, keys);

        match self.generator.generate(&selections, &suggested, &mut prompts) {
            Ok(Some(report)) => {
                let text = report_summary(&report);
                self.set_status(StatusLevel::Success, text);
            }
            Ok(None) => self.set_status(StatusLevel::Info, "Generation cancelled"),
            Err(err) => {
                tracing::error!(error = %err, "batch generation failed");
                self.set_status(StatusLevel::Error, format!("{err:#}"));
            }
        }
    }

    fn suggested_output(&self) -> PathBuf {
        let fallback = desktop_dir()
            .filter(|dir| dir.is_dir())
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        suggested_output(
            self.config.output.directory(),
            &fallback,
            &self.config.output.file_name(),
        )
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn generate_requested(&self) -> bool {
        matches!(self.pending, Some(PendingAction::Generate))
    }
}

fn report_summary(report: &GenerateReport) -> String {
    let mut text = format!(
        "Wrote {} launch(es) to {}",
        report.launches.len(),
        report.output_path.display()
    );
    if !report.unresolved.is_empty() {
        text.push_str(&format!(" · {} without an executable", report.unresolved.len()));
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    Generate,
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}
