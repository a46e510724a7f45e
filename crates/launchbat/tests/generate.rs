use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use launchbat::app::batch::{BatchGenerator, ExecutableChoice, GenerateInteraction};
use launchbat::domain::model::{EntryOrigin, Launch, SoftwareEntry};
use launchbat::infra::config::LineEnding;

/// Answers prompts from a fixed script and records what it was asked.
struct Scripted {
    output: PathBuf,
    pick: usize,
    choices_offered: Vec<String>,
    warnings: Vec<PathBuf>,
    completed: Option<PathBuf>,
}

impl Scripted {
    fn new(output: PathBuf, pick: usize) -> Self {
        Self {
            output,
            pick,
            choices_offered: Vec::new(),
            warnings: Vec::new(),
            completed: None,
        }
    }
}

impl GenerateInteraction for Scripted {
    fn ask_output_path(&mut self, _suggested: &Path) -> Result<Option<PathBuf>> {
        Ok(Some(self.output.clone()))
    }

    fn choose_executable(
        &mut self,
        name: &str,
        candidates: &[PathBuf],
    ) -> Result<ExecutableChoice> {
        self.choices_offered.push(name.to_string());
        Ok(candidates
            .get(self.pick)
            .cloned()
            .map(ExecutableChoice::Resolved)
            .unwrap_or(ExecutableChoice::Cancelled))
    }

    fn warn_unresolved(&mut self, location: &Path) -> Result<()> {
        self.warnings.push(location.to_path_buf());
        Ok(())
    }

    fn notify_complete(&mut self, output: &Path) -> Result<()> {
        self.completed = Some(output.to_path_buf());
        Ok(())
    }
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

#[test]
fn partial_failure_writes_resolved_launches_and_warns_once() -> Result<()> {
    let root = tempfile::tempdir()?;
    let direct = root.path().join("tools").join("viewer.exe");
    touch(&direct);
    let foo_dir = root.path().join("foo");
    touch(&foo_dir.join("helper.exe"));
    touch(&foo_dir.join("bin").join("Foo.exe"));
    let empty_dir = root.path().join("empty");
    fs::create_dir_all(&empty_dir)?;

    let selections = vec![
        SoftwareEntry::new("Viewer", &direct, EntryOrigin::Shortcut),
        SoftwareEntry::new("Foo", &foo_dir, EntryOrigin::Registry),
        SoftwareEntry::new("Nothing Here", &empty_dir, EntryOrigin::Registry),
    ];

    let output = root.path().join("launch.bat");
    let mut interaction = Scripted::new(output.clone(), 0);
    let generator = BatchGenerator::new(LineEnding::Lf)?;
    let report = generator
        .generate(&selections, &output, &mut interaction)?
        .expect("not cancelled");

    assert_eq!(report.output_path, output);
    assert_eq!(
        report.launches,
        vec![
            Launch::for_executable(&direct),
            Launch::for_executable(foo_dir.join("bin").join("Foo.exe")),
        ]
    );
    assert_eq!(report.unresolved, vec![empty_dir.clone()]);
    assert_eq!(interaction.warnings, vec![empty_dir]);
    assert!(interaction.choices_offered.is_empty());
    assert_eq!(interaction.completed.as_deref(), Some(output.as_path()));

    let script = fs::read_to_string(&output)?;
    assert_eq!(script.matches("cd /d ").count(), 2);
    assert_eq!(script.matches("start \"\" ").count(), 2);
    assert!(script.starts_with("@echo off\necho Running as administrator...\n"));
    Ok(())
}

#[test]
fn ambiguous_directory_follows_the_users_choice() -> Result<()> {
    let root = tempfile::tempdir()?;
    let suite = root.path().join("suite");
    touch(&suite.join("alpha.exe"));
    touch(&suite.join("beta.exe"));

    let selections = vec![SoftwareEntry::new("Office Suite", &suite, EntryOrigin::Registry)];
    let output = root.path().join("suite.bat");
    let mut interaction = Scripted::new(output.clone(), 1);
    let report = BatchGenerator::new(LineEnding::Crlf)?
        .generate(&selections, &output, &mut interaction)?
        .expect("not cancelled");

    assert_eq!(interaction.choices_offered, vec!["Office Suite".to_string()]);
    assert_eq!(report.launches.len(), 1);
    assert!(report.unresolved.is_empty());

    let script = fs::read_to_string(&output)?;
    assert!(script.contains("\r\n"));
    assert!(!script.replace("\r\n", "").contains('\n'));
    Ok(())
}

#[test]
fn rendered_script_matches_snapshot() -> Result<()> {
    let generator = BatchGenerator::new(LineEnding::Lf)?;
    let launches = vec![
        Launch {
            directory: PathBuf::from(r"C:\Apps\Foo"),
            executable: PathBuf::from(r"C:\Apps\Foo\foo.exe"),
        },
        Launch {
            directory: PathBuf::from(r"C:\Apps\100% Tools"),
            executable: PathBuf::from(r"C:\Apps\100% Tools\tool.exe"),
        },
    ];
    let rendered = generator.render(&launches)?;
    insta::assert_snapshot!(rendered, @r###"
    @echo off
    echo Running as administrator...
    cd /d "C:\Apps\Foo"
    start "" "C:\Apps\Foo\foo.exe"
    cd /d "C:\Apps\100%% Tools"
    start "" "C:\Apps\100%% Tools\tool.exe"
    "###);
    Ok(())
}
