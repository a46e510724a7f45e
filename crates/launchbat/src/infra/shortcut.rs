//! Shortcut target resolution through the Windows shell automation interface.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Resolves a `.lnk` file to the path it points at.
pub trait ShortcutResolver {
    /// Target path of the shortcut, or `None` when it cannot be read.
    fn target(&self, shortcut: &Path) -> Option<PathBuf>;
}

/// Asks `WScript.Shell` for the target via a PowerShell one-liner.
#[derive(Debug, Clone)]
pub struct ShellShortcutResolver {
    program: String,
}

impl ShellShortcutResolver {
    pub fn new() -> Self {
        Self {
            program: "powershell.exe".to_owned(),
        }
    }
}

impl Default for ShellShortcutResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutResolver for ShellShortcutResolver {
    fn target(&self, shortcut: &Path) -> Option<PathBuf> {
        let script = target_script(shortcut);
        let output = match Command::new(&self.program)
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(error = %err, program = %self.program, "shell unavailable");
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!(
                shortcut = %shortcut.display(),
                status = %output.status,
                "shortcut target lookup failed"
            );
            return None;
        }

        let target = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        (!target.is_empty()).then(|| PathBuf::from(target))
    }
}

fn target_script(shortcut: &Path) -> String {
    // Single-quoted PowerShell strings only need embedded quotes doubled.
    let quoted = shortcut.display().to_string().replace('\'', "''");
    format!(
        "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; \
         (New-Object -ComObject WScript.Shell).CreateShortcut('{quoted}').TargetPath"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_doubles_single_quotes() {
        let script = target_script(Path::new(r"C:\Users\me\Desktop\Bob's Tool.lnk"));
        assert!(script.contains(r"CreateShortcut('C:\Users\me\Desktop\Bob''s Tool.lnk')"));
        assert!(script.ends_with(".TargetPath"));
    }

    #[test]
    fn missing_shell_yields_no_target() {
        let resolver = ShellShortcutResolver {
            program: "launchbat-test-no-such-shell".to_owned(),
        };
        assert_eq!(resolver.target(Path::new("anything.lnk")), None);
    }
}
