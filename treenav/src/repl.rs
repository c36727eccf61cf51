//! Interactive loop (rustyline) and non-interactive `-c` scripts.

use std::io::{self, Write};
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use tracing::{debug, warn};

use crate::commands::{Control, Verb, VERBS, lookup, run_line};
use crate::io::config::ShellConfig;
use crate::session::{Session, WILDCARD};
use crate::tree::Kind;

const NO_FILE: &str = "(no file)";

/// Shorten a container path for the prompt, keeping only its file name.
pub fn abbreviate(path: &str) -> String {
    let split: Vec<&str> = path.split('/').collect();
    let last = split.last().copied().unwrap_or_default();
    if path.starts_with('/') {
        format!("/.../{}", last)
    } else if path.starts_with("../") {
        if split.len() > 2 {
            format!("../.../{}", last)
        } else {
            path.to_string()
        }
    } else if split.len() > 2 {
        format!(".../{}", last)
    } else {
        path.to_string()
    }
}

/// `treenav <file><position> > `
pub fn prompt(session: &Session, color: bool) -> String {
    let file = session
        .location()
        .map(|location| abbreviate(&location))
        .unwrap_or_else(|| NO_FILE.to_string());
    let name = if color {
        "treenav".green().to_string()
    } else {
        "treenav".to_string()
    };
    format!("{} {}{} > ", name, file, session.position())
}

pub fn intro() -> String {
    format!(
        "Welcome to the treenav command line (V {})\n\
         Type help or ? for a list of commands,\n     \
         ?about for more on this app",
        env!("CARGO_PKG_VERSION")
    )
}

/// Run `commands` in order, echoing each one. Stops at the first failing
/// command unless `keep_going` is set. Returns whether every command
/// succeeded. The session is closed afterwards.
pub fn run_script(
    session: &mut Session,
    commands: &[String],
    keep_going: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut ok = true;
    for command in commands {
        writeln!(out, "treenav> {}", command)?;
        match run_line(session, command, out)? {
            Control::Continue => {}
            Control::Exit => break,
            Control::Failed => {
                ok = false;
                if !keep_going {
                    break;
                }
            }
        }
    }
    session.close();
    Ok(ok)
}

/// Interactive loop until `exit` or end-of-input. Ctrl-C drops the current
/// line and keeps the session.
pub fn run_interactive(session: &mut Session, config: &ShellConfig) -> Result<()> {
    let rl_config = Config::builder()
        .max_history_size(config.max_history)
        .map_err(|e| anyhow!("invalid history size: {e}"))?
        .auto_add_history(false)
        .build();
    let completions = Arc::new(RwLock::new(CompletionData::default()));
    let mut rl: Editor<LineHelper, DefaultHistory> =
        Editor::with_config(rl_config).map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    rl.set_helper(Some(LineHelper::new(completions.clone())));
    if let Some(path) = &config.history_file {
        if let Err(err) = rl.load_history(path) {
            debug!(path = %path.display(), error = %err, "no history loaded");
        }
    }

    println!("{}", intro());
    let mut stdout = io::stdout();
    loop {
        refresh_completions(&completions, session);
        let line = match rl.readline(&prompt(session, config.color)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                run_line(session, "exit", &mut stdout)?;
                break;
            }
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };
        if !line.trim().is_empty() {
            if let Err(err) = rl.add_history_entry(line.as_str()) {
                warn!(error = %err, "failed to record history");
            }
        }
        let control = run_line(session, &line, &mut stdout)?;
        stdout.flush()?;
        if control == Control::Exit {
            break;
        }
    }

    if let Some(path) = &config.history_file {
        if let Err(err) = rl.save_history(path) {
            warn!(path = %path.display(), error = %err, "failed to save history");
        }
    }
    Ok(())
}

#[derive(Debug, Default, Clone)]
struct CompletionData {
    groups: Vec<String>,
    datasets: Vec<String>,
}

/// Snapshot the current group's children for completion. Leading
/// whitespace is dropped; the resolver puts it back.
fn refresh_completions(data: &Arc<RwLock<CompletionData>>, session: &Session) {
    let trimmed = |names: Vec<String>| -> Vec<String> {
        names
            .into_iter()
            .map(|name| name.trim_start().to_string())
            .collect()
    };
    if let Ok(mut data) = data.write() {
        data.groups = trimmed(session.child_names(Some(Kind::Group)));
        data.datasets = trimmed(session.child_names(Some(Kind::Dataset)));
    }
}

struct LineHelper {
    files: FilenameCompleter,
    data: Arc<RwLock<CompletionData>>,
}

impl LineHelper {
    fn new(data: Arc<RwLock<CompletionData>>) -> Self {
        Self {
            files: FilenameCompleter::new(),
            data,
        }
    }
}

fn pairs_from_prefix<'a>(items: impl IntoIterator<Item = &'a str>, prefix: &str) -> Vec<Pair> {
    items
        .into_iter()
        .filter(|item| item.starts_with(prefix))
        .map(|item| Pair {
            display: item.to_string(),
            replacement: item.to_string(),
        })
        .collect()
}

/// Byte offset where the last word of `line` begins.
fn word_start(line: &str) -> usize {
    line.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

impl Helper for LineHelper {}

impl Highlighter for LineHelper {}

impl Hinter for LineHelper {
    type Hint = String;
}

impl Validator for LineHelper {}

impl Completer for LineHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = word_start(&line[..pos]);
        let word = &line[start..pos];
        let tokens: Vec<&str> = line[..start].split_whitespace().collect();

        let Some(first) = tokens.first() else {
            return Ok((start, pairs_from_prefix(VERBS.iter().map(|v| v.name), word)));
        };
        let Ok(spec) = lookup(first) else {
            return Ok((start, Vec::new()));
        };
        if spec.verb == Verb::Open {
            return self.files.complete(line, pos, ctx);
        }
        let Ok(data) = self.data.read() else {
            return Ok((start, Vec::new()));
        };
        let groups = data.groups.iter().map(String::as_str);
        let datasets = data.datasets.iter().map(String::as_str);
        let candidates = match spec.verb {
            Verb::Cd => pairs_from_prefix(groups, word),
            Verb::Ls => pairs_from_prefix(groups.chain([WILDCARD]), word),
            Verb::Print | Verb::Stats | Verb::Pdf | Verb::Dump | Verb::TxtDump => {
                pairs_from_prefix(datasets.chain([WILDCARD]), word)
            }
            Verb::Rm => pairs_from_prefix(groups.chain(datasets), word),
            Verb::Help => pairs_from_prefix(VERBS.iter().map(|v| v.name), word),
            _ => Vec::new(),
        };
        Ok((start, candidates))
    }
}
