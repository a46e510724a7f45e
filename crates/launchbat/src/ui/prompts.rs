//! Blocking terminal dialogs backing batch generation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};

use crate::app::batch::{ExecutableChoice, GenerateInteraction};
use crate::ui::components::dialogs::{
    ChoiceDialogState, DialogOutcome, MessageDialog, MessageLevel, SavePromptState,
};

/// Runs each prompt as its own draw/read loop on the shared terminal, returning only once the
/// dialog is closed.
///
/// Keys come from `keys`; the event loop passes [`next_key`].
pub struct TerminalPrompts<'a, B: Backend, K> {
    terminal: &'a mut Terminal<B>,
    keys: K,
}

impl<'a, B, K> TerminalPrompts<'a, B, K>
where
    B: Backend,
    K: FnMut() -> Result<KeyEvent>,
{
    pub fn new(terminal: &'a mut Terminal<B>, keys: K) -> Self {
        Self { terminal, keys }
    }

    /// Show a message box and wait for it to be acknowledged.
    pub fn show_message(&mut self, dialog: &MessageDialog) -> Result<()> {
        loop {
            self.draw(|frame| {
                let area = frame.size();
                dialog.render(frame, area);
            })?;
            if let DialogOutcome::Submitted(()) = dialog.handle_key((self.keys)()?) {
                return Ok(());
            }
        }
    }

    fn draw<F>(&mut self, overlay: F) -> Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal
            .draw(|frame| {
                draw_backdrop(frame);
                overlay(frame);
            })
            .context("failed to draw dialog")?;
        Ok(())
    }
}

impl<B, K> GenerateInteraction for TerminalPrompts<'_, B, K>
where
    B: Backend,
    K: FnMut() -> Result<KeyEvent>,
{
    fn ask_output_path(&mut self, suggested: &Path) -> Result<Option<PathBuf>> {
        let mut prompt = SavePromptState::new(suggested.display().to_string());
        loop {
            self.draw(|frame| {
                let area = frame.size();
                prompt.render(frame, area);
            })?;
            match prompt.handle_key((self.keys)()?) {
                DialogOutcome::Pending => {}
                DialogOutcome::Submitted(path) => return Ok(Some(path)),
                DialogOutcome::Dismissed => return Ok(None),
            }
        }
    }

    fn choose_executable(
        &mut self,
        name: &str,
        candidates: &[PathBuf],
    ) -> Result<ExecutableChoice> {
        let mut dialog = ChoiceDialogState::new(name, candidates.to_vec());
        loop {
            self.draw(|frame| {
                let area = frame.size();
                dialog.render(frame, area);
            })?;
            match dialog.handle_key((self.keys)()?) {
                DialogOutcome::Pending => {}
                DialogOutcome::Submitted(path) => return Ok(ExecutableChoice::Resolved(path)),
                DialogOutcome::Dismissed => return Ok(ExecutableChoice::Cancelled),
            }
        }
    }

    fn warn_unresolved(&mut self, location: &Path) -> Result<()> {
        let dialog = MessageDialog::new(
            MessageLevel::Warning,
            "Warning",
            format!("No executable found in {}.", location.display()),
        );
        self.show_message(&dialog)
    }

    fn notify_complete(&mut self, output: &Path) -> Result<()> {
        let dialog = MessageDialog::new(
            MessageLevel::Info,
            "Done",
            format!("Batch file written: {}", output.display()),
        );
        self.show_message(&dialog)
    }
}

/// Block until the next key press; releases and non-key events are skipped.
pub fn next_key() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read().context("failed to read terminal event")?
            && key.kind == KeyEventKind::Press
        {
            return Ok(key);
        }
    }
}

fn draw_backdrop(frame: &mut Frame<'_>) {
    let area = frame.size();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Generating batch file")
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new("Answer the dialog to continue.")
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .block(block);
    frame.render_widget(paragraph, area);
}
