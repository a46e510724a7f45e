//! System clipboard access for the path field.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// Anything that can take over the clipboard contents.
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard backed by `arboard`, with command-line tools as a fallback.
pub struct Clipboard {
    primary: Option<arboard::Clipboard>,
}

impl Clipboard {
    /// Open the system clipboard. Failure is deferred until the first copy, which then goes
    /// through the fallback tools.
    pub fn new() -> Self {
        let primary = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                tracing::debug!(error = %err, "system clipboard unavailable");
                None
            }
        };
        Self { primary }
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if let Some(primary) = self.primary.as_mut()
            && primary.set_text(text.to_owned()).is_ok()
        {
            return Ok(());
        }

        self.primary = None;
        copy_with_tools(text)
    }
}

fn copy_with_tools(text: &str) -> Result<()> {
    for command in fallback_commands() {
        match pipe_into(command, text) {
            Ok(()) => return Ok(()),
            Err(err) => tracing::debug!(error = %err, "clipboard tool failed"),
        }
    }

    Err(anyhow!("no clipboard backend accepted the text"))
}

fn pipe_into(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("clipboard command missing program")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("failed to write to {program}"))?;
    }
    drop(child.stdin.take());

    let status = child
        .wait()
        .with_context(|| format!("{program} did not exit cleanly"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("{program} exited with status {status}"))
    }
}

#[cfg(target_os = "windows")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![
        &["clip.exe"],
        &["powershell.exe", "-NoProfile", "-Command", "$input | Set-Clipboard"],
    ]
}

#[cfg(target_os = "macos")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["pbcopy"]]
}

#[cfg(all(unix, not(target_os = "macos")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["wl-copy"], &["xclip", "-selection", "clipboard"]]
}

#[cfg(not(any(unix, target_os = "windows")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    Vec::new()
}

/// In-memory clipboard for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_owned());
        Ok(())
    }
}
