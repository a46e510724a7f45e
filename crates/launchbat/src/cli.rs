//! Command-line surface: the interactive UI plus scriptable subcommands.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::app::batch::{BatchGenerator, ExecutableChoice, GenerateInteraction};
use crate::app::catalog::Catalog;
use crate::app::resolver::{self, Resolution};
use crate::domain::model::SoftwareEntry;
use crate::infra::config::Config;
use crate::infra::logging::{self, LogTarget};
use crate::infra::shortcut::ShellShortcutResolver;
use crate::ui::app::UiApp;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(about = "Pick installed programs and write a batch file that starts them")]
pub struct Cli {
    /// Extra config file layered over the global one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive selection screen (default)
    Ui,
    /// Print the discovered software
    List {
        /// Only entries whose name contains this keyword
        #[arg(long)]
        filter: Option<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Find the executable for a program inside a directory
    Resolve { name: String, dir: PathBuf },
    /// Write a batch file without the UI
    Generate {
        /// Destination file; `.bat` is appended when it has no extension
        #[arg(long, short)]
        output: PathBuf,
        /// How to answer when several executables are possible
        #[arg(long, value_enum, default_value_t = PickPolicy::First)]
        pick: PickPolicy,
        /// Display names to include, matched without regard to case
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print shell completions
    Completions { shell: Shell },
}

/// Answer used for the executable-choice prompt in headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PickPolicy {
    First,
    None,
}

pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        verbose,
        log_file,
        command,
    } = cli;
    let command = command.unwrap_or(Command::Ui);

    if let Command::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "launchbat", &mut io::stdout());
        return Ok(());
    }

    let interactive = matches!(command, Command::Ui);
    let target = match (log_file, interactive) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Silent,
        (None, false) => LogTarget::Stderr,
    };
    logging::init(verbose, target)?;

    let config = Config::load(config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match command {
        Command::Ui => {
            let catalog = Catalog::load(&config.scan, &ShellShortcutResolver::new())?;
            UiApp::new(config, catalog)?.run()
        }
        Command::List { filter, json } => {
            let catalog = Catalog::load(&config.scan, &ShellShortcutResolver::new())?;
            let entries = catalog.filter(filter.as_deref().unwrap_or_default());
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{}", list_line(entry));
                }
            }
            Ok(())
        }
        Command::Resolve { name, dir } => match resolver::resolve(&name, &dir) {
            Resolution::Found(path) => {
                println!("{}", path.display());
                Ok(())
            }
            Resolution::Candidates(candidates) if candidates.is_empty() => {
                bail!("no executable found under {}", dir.display())
            }
            Resolution::Candidates(candidates) => {
                eprintln!("no file name contains {name:?}; candidates:");
                for candidate in candidates {
                    println!("{}", candidate.display());
                }
                Ok(())
            }
        },
        Command::Generate {
            output,
            pick,
            names,
        } => {
            let catalog = Catalog::load(&config.scan, &ShellShortcutResolver::new())?;
            let selections = select_named(&catalog, &names)?;
            let generator = BatchGenerator::new(config.output.line_ending())?;
            let mut prompts = HeadlessPrompts::new(output.clone(), pick);
            if let Some(report) = generator.generate(&selections, &output, &mut prompts)? {
                tracing::info!(
                    output = %report.output_path.display(),
                    launches = report.launches.len(),
                    unresolved = report.unresolved.len(),
                    "batch file generated"
                );
            }
            Ok(())
        }
        Command::Completions { .. } => Ok(()),
    }
}

fn list_line(entry: &SoftwareEntry) -> String {
    format!(
        "{:<9} {:<40} {}",
        entry.origin.label(),
        entry.name,
        entry.location.display()
    )
}

/// Catalog entries for each requested name, in the order the names were given.
pub fn select_named(catalog: &Catalog, names: &[String]) -> Result<Vec<SoftwareEntry>> {
    let mut selections = Vec::new();
    for name in names {
        let matches = catalog.find_by_name(name);
        if matches.is_empty() {
            bail!("no software named {name:?}; run `launchbat list` to see what was found");
        }
        selections.extend(matches.into_iter().cloned());
    }
    Ok(selections)
}

/// Non-interactive answers: a fixed output path and a pick policy.
pub struct HeadlessPrompts {
    output: PathBuf,
    pick: PickPolicy,
}

impl HeadlessPrompts {
    pub fn new(output: PathBuf, pick: PickPolicy) -> Self {
        Self { output, pick }
    }
}

impl GenerateInteraction for HeadlessPrompts {
    fn ask_output_path(&mut self, _suggested: &Path) -> Result<Option<PathBuf>> {
        Ok(Some(self.output.clone()))
    }

    fn choose_executable(
        &mut self,
        name: &str,
        candidates: &[PathBuf],
    ) -> Result<ExecutableChoice> {
        let choice = match (self.pick, candidates.first()) {
            (PickPolicy::First, Some(first)) => ExecutableChoice::Resolved(first.clone()),
            _ => ExecutableChoice::Cancelled,
        };
        tracing::info!(name, ?choice, "executable choice answered");
        Ok(choice)
    }

    fn warn_unresolved(&mut self, location: &Path) -> Result<()> {
        eprintln!("warning: no executable found in {}", location.display());
        Ok(())
    }

    fn notify_complete(&mut self, output: &Path) -> Result<()> {
        println!("Batch file written: {}", output.display());
        Ok(())
    }
}
