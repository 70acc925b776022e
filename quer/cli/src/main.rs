//! Queue shell commands, then run them, record them, or replay a recording.
//!
//! ## Usage
//!
//! ```bash
//! # Queue commands and run them when you type `done`
//! quer
//!
//! # Record a querscript instead of running it
//! quer -r deploy
//!
//! # Replay a recorded querscript
//! quer -p deploy
//!
//! # Manage saved scripts
//! quer -ls
//! quer -fs
//! quer -c
//! ```

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgGroup, Parser};
use crossterm::style::Stylize;
use quer_lib::{
    parse_script_name,
    DirScriptStore,
    QuerConfig,
    QueueSession,
    RunMode,
    ScriptStore,
    SessionError,
    ShellExecutor,
    StoreError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Queue shell commands, then run, record, or replay them.
///
/// Help and version output are static text, so clap's generated flags are
/// disabled in favour of our own `-h` and `-v`.
#[derive(Debug, Parser)]
#[command(name = "quer", disable_help_flag = true, disable_version_flag = true)]
#[command(group(
    ArgGroup::new("action")
        .multiple(false)
        .args(["help", "version", "list_scripts", "find_scripts", "where_dir", "clean", "record", "play"])
))]
struct Cli {
    /// Show the help menu.
    #[arg(short, long)]
    help: bool,

    /// Show the quer version.
    #[arg(short = 'v', long)]
    version: bool,

    /// List saved quer scripts (also `-ls`).
    #[arg(long = "listscripts")]
    list_scripts: bool,

    /// Open the quer script directory (also `-fs`).
    #[arg(long = "findscripts")]
    find_scripts: bool,

    /// Print the quer script directory.
    #[arg(long = "where")]
    where_dir: bool,

    /// Remove every saved quer script.
    #[arg(short, long)]
    clean: bool,

    /// Record a quer script instead of running the queue.
    #[arg(short, long, value_name = "NAME", value_parser = parse_script_name)]
    record: Option<String>,

    /// Play back a recorded quer script.
    #[arg(short, long, value_name = "NAME", value_parser = parse_script_name)]
    play: Option<String>,
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Queue {
        mode: RunMode,
        script: Option<String>,
    },
    Help,
    Version,
    ListScripts,
    FindScripts,
    Where,
    Clean,
}

impl Cli {
    fn action(self) -> Action {
        if let Some(script) = self.record {
            return Action::Queue {
                mode: RunMode::Record,
                script: Some(script),
            };
        }
        if let Some(script) = self.play {
            return Action::Queue {
                mode: RunMode::Play,
                script: Some(script),
            };
        }

        if self.help {
            Action::Help
        } else if self.version {
            Action::Version
        } else if self.list_scripts {
            Action::ListScripts
        } else if self.find_scripts {
            Action::FindScripts
        } else if self.where_dir {
            Action::Where
        } else if self.clean {
            Action::Clean
        } else {
            Action::Queue {
                mode: RunMode::Run,
                script: None,
            }
        }
    }
}

#[derive(Debug, Error)]
enum QuerError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("script directory error: {0}")]
    Store(#[from] StoreError),

    #[error("could not open the file browser: {0}")]
    Reveal(io::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

const NEEDS_NAME: &str =
    "'--play' and '--record' need a valid script name to read from/write to. See 'quer --help'.";
const UNKNOWN_ARGUMENT: &str = "Unknown command argument encountered. See 'quer --help'.";
const ONE_ACTION: &str = "Only one action can be given at a time. See 'quer --help'.";

const HELP: &str = "\
+----------------------- Quer Help Menu ----------------------+
| General usage:   quer [action] [name]                       |
+--------------------------------------------------- Actions -+
| No arguments                                                |
|                  Queue commands and run them.               |
| -r <name>, --record <name>                                  |
|                  Record a quer script which can be          |
|                  played back using 'quer -p'.               |
| -p <name>, --play <name>                                    |
|                  Play back a saved quer script.             |
| -ls, --listscripts                                          |
|                  List all saved quer scripts.               |
| -fs, --findscripts                                          |
|                  Open the quer script directory.            |
| --where                                                     |
|                  Print the quer script directory.           |
| -c, --clean                                                 |
|                  Remove all saved quer scripts.             |
| -h, --help                                                  |
|                  Show this help menu.                       |
| -v, --version                                               |
|                  Show the quer version.                     |
+-------------------------------------------------- Commands -+
| done             Start the queue.                           |
| quit             Cancel immediately; nothing runs.          |
| show             List the queued commands.                  |
| undo             Remove the last queued command.            |
| undo <n>         Remove queued command number <n>.          |
| undo all         Remove every queued command.               |
+-------------------------------------------------------------+
| Scripts live in ~/.querscripts (override: QUER_SCRIPT_DIR). |
+-------------------------------------------------------------+";

fn main() -> ExitCode {
    init_tracing();

    let args = normalize_args(std::env::args_os());
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!(
                "{} Invalid syntax: {}",
                prefix(io::stderr().is_terminal()),
                invalid_syntax_message(&err)
            );
            return ExitCode::FAILURE;
        }
    };

    let config = QuerConfig::from_env();
    match run(cli.action(), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", prefix(io::stderr().is_terminal()));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so they never interleave with the session transcript.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .compact()
        .init();
}

/// Rewrites the two-letter single-dash flags clap cannot express as shorts.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 {
                arg
            } else if arg == "-ls" {
                OsString::from("--listscripts")
            } else if arg == "-fs" {
                OsString::from("--findscripts")
            } else {
                arg
            }
        })
        .collect()
}

fn invalid_syntax_message(err: &clap::Error) -> &'static str {
    match err.kind() {
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => NEEDS_NAME,
        ErrorKind::ArgumentConflict => ONE_ACTION,
        _ => UNKNOWN_ARGUMENT,
    }
}

fn prefix(styled: bool) -> String {
    if styled {
        "[quer]".cyan().bold().to_string()
    } else {
        "[quer]".to_string()
    }
}

#[tracing::instrument(skip(config))]
fn run(action: Action, config: &QuerConfig) -> Result<(), QuerError> {
    let store = DirScriptStore::new(config);
    let mut stdout = io::stdout().lock();
    let tag = prefix(io::stdout().is_terminal());

    match action {
        Action::Queue { mode, script } => {
            let mut executor = ShellExecutor::default();
            let mut session = QueueSession::new(mode, &store, &mut executor, stdout);
            if let Some(name) = script {
                session = session.with_script(name);
            }
            let outcome = session.run(io::stdin().lock())?;
            info!(?outcome, "session finished");
        }
        Action::Help => writeln!(stdout, "{HELP}")?,
        Action::Version => {
            writeln!(stdout, "{tag} Version {}.", env!("CARGO_PKG_VERSION"))?;
        }
        Action::ListScripts => {
            let names = store.list()?;
            if names.is_empty() {
                writeln!(
                    stdout,
                    "{tag} No quer scripts found in {}.",
                    store.location().display()
                )?;
            } else {
                writeln!(stdout, "{}", names.join(" "))?;
            }
        }
        Action::FindScripts => {
            let dir = store.ensure_location()?;
            writeln!(stdout, "{tag} Quer scripts are located in: {}", dir.display())?;
            stdout.flush()?;
            open::that(dir).map_err(QuerError::Reveal)?;
        }
        Action::Where => {
            writeln!(
                stdout,
                "{tag} Quer scripts are located in: {}",
                store.location().display()
            )?;
        }
        Action::Clean => {
            let removed = store.clean()?;
            let noun = if removed == 1 { "entry" } else { "entries" };
            writeln!(
                stdout,
                "{tag} Removed {removed} {noun} from {}.",
                store.location().display()
            )?;
        }
    }

    Ok(())
}
