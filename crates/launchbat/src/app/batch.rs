//! Batch script generation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use minijinja::Environment;
use serde::Serialize;

use crate::app::resolver::{self, Resolution};
use crate::domain::errors::GenerateError;
use crate::domain::model::{Launch, SoftwareEntry, is_executable_name};
use crate::infra::config::LineEnding;

/// Answer from the executable-choice dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableChoice {
    Resolved(PathBuf),
    Cancelled,
}

/// User-facing prompts the generator needs while it runs.
///
/// Each call blocks until the user has answered.
pub trait GenerateInteraction {
    /// Ask where to save the script. `None` cancels generation.
    fn ask_output_path(&mut self, suggested: &Path) -> Result<Option<PathBuf>>;

    /// Let the user pick one of several executables for `name`.
    fn choose_executable(&mut self, name: &str, candidates: &[PathBuf])
    -> Result<ExecutableChoice>;

    /// Report that no executable was found for `location`.
    fn warn_unresolved(&mut self, location: &Path) -> Result<()>;

    /// Report that the script was written.
    fn notify_complete(&mut self, output: &Path) -> Result<()>;
}

/// Summary of a finished generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub output_path: PathBuf,
    pub launches: Vec<Launch>,
    pub unresolved: Vec<PathBuf>,
}

/// Renders and writes `.bat` launcher scripts.
pub struct BatchGenerator {
    env: Environment<'static>,
    line_ending: LineEnding,
}

impl BatchGenerator {
    pub fn new(line_ending: LineEnding) -> Result<Self> {
        Ok(Self {
            env: script_environment()?,
            line_ending,
        })
    }

    /// Run a full generation: prompt for the output file, resolve every selection, write the
    /// script, and confirm.
    ///
    /// Returns `Ok(None)` when the save prompt is cancelled; nothing is written in that case.
    pub fn generate(
        &self,
        selections: &[SoftwareEntry],
        suggested: &Path,
        interaction: &mut dyn GenerateInteraction,
    ) -> Result<Option<GenerateReport>> {
        if selections.is_empty() {
            return Err(GenerateError::NothingSelected.into());
        }

        let Some(output_path) = interaction.ask_output_path(suggested)? else {
            tracing::info!("batch generation cancelled at save prompt");
            return Ok(None);
        };
        let output_path = with_default_extension(output_path);

        let mut launches = Vec::new();
        let mut unresolved = Vec::new();
        for entry in selections {
            match self.resolve_entry(entry, interaction)? {
                Some(executable) => launches.push(Launch::for_executable(executable)),
                None => {
                    tracing::warn!(
                        name = %entry.name,
                        location = %entry.location.display(),
                        "no executable found"
                    );
                    interaction.warn_unresolved(&entry.location)?;
                    unresolved.push(entry.location.clone());
                }
            }
        }

        let script = self.render(&launches)?;
        fs::write(&output_path, script).map_err(|source| GenerateError::WriteFailed {
            path: output_path.clone(),
            source,
        })?;
        tracing::info!(
            path = %output_path.display(),
            launches = launches.len(),
            unresolved = unresolved.len(),
            "batch file written"
        );

        interaction.notify_complete(&output_path)?;

        Ok(Some(GenerateReport {
            output_path,
            launches,
            unresolved,
        }))
    }

    fn resolve_entry(
        &self,
        entry: &SoftwareEntry,
        interaction: &mut dyn GenerateInteraction,
    ) -> Result<Option<PathBuf>> {
        if is_direct_executable(&entry.location) {
            return Ok(Some(entry.location.clone()));
        }

        match resolver::resolve(&entry.name, &entry.location) {
            Resolution::Found(path) => Ok(Some(path)),
            Resolution::Candidates(candidates) if candidates.is_empty() => Ok(None),
            Resolution::Candidates(candidates) => {
                match interaction.choose_executable(&entry.name, &candidates)? {
                    ExecutableChoice::Resolved(path) => Ok(Some(path)),
                    ExecutableChoice::Cancelled => Ok(None),
                }
            }
        }
    }

    /// Render the script text for `launches`.
    pub fn render(&self, launches: &[Launch]) -> Result<String> {
        let context = ScriptContext {
            launches: launches
                .iter()
                .map(|launch| ScriptLaunch {
                    directory: launch.directory.display().to_string(),
                    executable: launch.executable.display().to_string(),
                })
                .collect(),
        };
        let rendered = self
            .env
            .get_template(SCRIPT_TEMPLATE_NAME)
            .map_err(|err| anyhow!("batch template missing: {err}"))?
            .render(&context)
            .map_err(|err| anyhow!("failed to render batch script: {err}"))?;

        Ok(match self.line_ending {
            LineEnding::Lf => rendered,
            LineEnding::Crlf => rendered.replace('\n', self.line_ending.as_str()),
        })
    }
}

/// Whether `path` can be launched as-is without searching.
pub fn is_direct_executable(path: &Path) -> bool {
    path.is_file() && is_executable_name(&path.to_string_lossy())
}

/// Append `.bat` when the chosen file name has no extension.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("bat")
    }
}

/// Suggested save location: the configured directory (or `fallback_dir`) joined with the file
/// name.
pub fn suggested_output(
    directory: Option<PathBuf>,
    fallback_dir: &Path,
    file_name: &str,
) -> PathBuf {
    directory
        .unwrap_or_else(|| fallback_dir.to_path_buf())
        .join(file_name)
}

fn script_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("cmd_escape", cmd_escape);
    env.add_template(SCRIPT_TEMPLATE_NAME, SCRIPT_TEMPLATE)
        .map_err(|err| anyhow!("failed to register batch template: {err}"))?;
    Ok(env)
}

/// Double `%` so cmd.exe does not expand it as a variable reference.
fn cmd_escape(value: String) -> String {
    value.replace('%', "%%")
}

#[derive(Serialize)]
struct ScriptContext {
    launches: Vec<ScriptLaunch>,
}

#[derive(Serialize)]
struct ScriptLaunch {
    directory: String,
    executable: String,
}

const SCRIPT_TEMPLATE_NAME: &str = "launch_script";

const SCRIPT_TEMPLATE: &str = r#"@echo off
echo Running as administrator...
{% for launch in launches %}
cd /d "{{ launch.directory | cmd_escape }}"
start "" "{{ launch.executable | cmd_escape }}"
{% endfor %}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::EntryOrigin;

    #[derive(Default)]
    struct Scripted {
        output: Option<PathBuf>,
        choice: Option<ExecutableChoice>,
        prompted: usize,
        choices_offered: Vec<Vec<PathBuf>>,
        warnings: Vec<PathBuf>,
        completed: Vec<PathBuf>,
    }

    impl GenerateInteraction for Scripted {
        fn ask_output_path(&mut self, _suggested: &Path) -> Result<Option<PathBuf>> {
            self.prompted += 1;
            Ok(self.output.clone())
        }

        fn choose_executable(
            &mut self,
            _name: &str,
            candidates: &[PathBuf],
        ) -> Result<ExecutableChoice> {
            self.choices_offered.push(candidates.to_vec());
            Ok(self.choice.clone().unwrap_or(ExecutableChoice::Cancelled))
        }

        fn warn_unresolved(&mut self, location: &Path) -> Result<()> {
            self.warnings.push(location.to_path_buf());
            Ok(())
        }

        fn notify_complete(&mut self, output: &Path) -> Result<()> {
            self.completed.push(output.to_path_buf());
            Ok(())
        }
    }

    fn generator() -> BatchGenerator {
        BatchGenerator::new(LineEnding::Lf).unwrap()
    }

    #[test]
    fn renders_header_and_launch_pairs() {
        let launches = vec![Launch::for_executable(r"C:\Apps\Foo\foo.exe")];
        let script = generator().render(&launches).unwrap();
        let lines: Vec<_> = script.lines().collect();
        assert_eq!(lines[0], "@echo off");
        assert_eq!(lines[1], "echo Running as administrator...");
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with(r#"start "" ""#));
    }

    #[test]
    fn empty_script_is_header_only() {
        let script = generator().render(&[]).unwrap();
        assert_eq!(script, "@echo off\necho Running as administrator...\n");
    }

    #[test]
    fn crlf_line_endings() {
        let script = BatchGenerator::new(LineEnding::Crlf)
            .unwrap()
            .render(&[])
            .unwrap();
        assert_eq!(script, "@echo off\r\necho Running as administrator...\r\n");
    }

    #[test]
    fn percent_signs_are_escaped() {
        let launches = vec![Launch {
            directory: PathBuf::from("/apps/100%"),
            executable: PathBuf::from("/apps/100%/run.exe"),
        }];
        let script = generator().render(&launches).unwrap();
        assert!(script.contains(r#"cd /d "/apps/100%%""#));
        assert!(script.contains(r#"start "" "/apps/100%%/run.exe""#));
    }

    #[test]
    fn direct_executable_skips_resolver_and_dialog() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let exe = temp.path().join("direct.exe");
        fs::write(&exe, b"")?;
        let output = temp.path().join("out.bat");

        let mut ui = Scripted {
            output: Some(output.clone()),
            ..Default::default()
        };
        let selections = vec![SoftwareEntry::new("Unrelated", &exe, EntryOrigin::Shortcut)];
        let report = generator()
            .generate(&selections, &output, &mut ui)?
            .expect("generated");

        assert_eq!(report.launches, vec![Launch::for_executable(&exe)]);
        assert!(ui.choices_offered.is_empty());
        let written = fs::read_to_string(&output)?;
        assert!(written.contains(&format!("cd /d \"{}\"", temp.path().display())));
        assert!(written.contains(&format!("start \"\" \"{}\"", exe.display())));
        Ok(())
    }

    #[test]
    fn cancelled_save_prompt_writes_nothing() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let output = temp.path().join("never.bat");
        let mut ui = Scripted::default();
        let selections = vec![SoftwareEntry::new("Foo", temp.path(), EntryOrigin::Registry)];

        let report = generator().generate(&selections, &output, &mut ui)?;
        assert!(report.is_none());
        assert_eq!(ui.prompted, 1);
        assert!(!output.exists());
        assert!(ui.completed.is_empty());
        Ok(())
    }

    #[test]
    fn ambiguous_directory_uses_dialog_choice() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let install = temp.path().join("suite");
        fs::create_dir_all(&install)?;
        fs::write(install.join("alpha.exe"), b"")?;
        fs::write(install.join("beta.exe"), b"")?;
        let output = temp.path().join("out.bat");

        let mut ui = Scripted {
            output: Some(output.clone()),
            choice: Some(ExecutableChoice::Resolved(install.join("beta.exe"))),
            ..Default::default()
        };
        let selections = vec![SoftwareEntry::new("Suite", &install, EntryOrigin::Registry)];
        let report = generator()
            .generate(&selections, &output, &mut ui)?
            .expect("generated");

        assert_eq!(ui.choices_offered.len(), 1);
        assert_eq!(ui.choices_offered[0].len(), 2);
        assert_eq!(report.launches, vec![Launch::for_executable(install.join("beta.exe"))]);
        assert!(ui.warnings.is_empty());
        Ok(())
    }

    #[test]
    fn cancelled_choice_is_unresolved() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let install = temp.path().join("suite");
        fs::create_dir_all(&install)?;
        fs::write(install.join("alpha.exe"), b"")?;
        let output = temp.path().join("out.bat");

        let mut ui = Scripted {
            output: Some(output.clone()),
            choice: Some(ExecutableChoice::Cancelled),
            ..Default::default()
        };
        let selections = vec![SoftwareEntry::new("Other", &install, EntryOrigin::Registry)];
        let report = generator()
            .generate(&selections, &output, &mut ui)?
            .expect("generated");

        assert!(report.launches.is_empty());
        assert_eq!(ui.warnings, vec![install.clone()]);
        assert_eq!(ui.completed, vec![output]);
        Ok(())
    }

    #[test]
    fn empty_candidate_list_is_not_offered() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let install = temp.path().join("empty");
        fs::create_dir_all(&install)?;
        let output = temp.path().join("out.bat");

        let mut ui = Scripted {
            output: Some(output.clone()),
            ..Default::default()
        };
        let selections = vec![SoftwareEntry::new("Empty", &install, EntryOrigin::Registry)];
        generator().generate(&selections, &output, &mut ui)?;

        assert!(ui.choices_offered.is_empty());
        assert_eq!(ui.warnings, vec![install]);
        Ok(())
    }

    #[test]
    fn nothing_selected_is_an_error() {
        let mut ui = Scripted::default();
        let err = generator()
            .generate(&[], Path::new("out.bat"), &mut ui)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::NothingSelected)
        ));
        assert_eq!(ui.prompted, 0);
    }

    #[test]
    fn missing_extension_defaults_to_bat() {
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/morning")),
            PathBuf::from("/tmp/morning.bat")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("/tmp/morning.cmd")),
            PathBuf::from("/tmp/morning.cmd")
        );
    }

    #[test]
    fn suggestion_prefers_configured_directory() {
        assert_eq!(
            suggested_output(Some(PathBuf::from("/cfg")), Path::new("/desk"), "launch.bat"),
            PathBuf::from("/cfg/launch.bat")
        );
        assert_eq!(
            suggested_output(None, Path::new("/desk"), "launch.bat"),
            PathBuf::from("/desk/launch.bat")
        );
    }
}
