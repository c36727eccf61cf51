//! `treenav`: browse and edit a hierarchical container from the command line.

use std::io;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::debug;

use treenav::commands::report;
use treenav::error::CommandError;
use treenav::exit_codes;
use treenav::interrupt::Interrupt;
use treenav::io::config::{DEFAULT_CONFIG_PATH, load_config};
use treenav::logging;
use treenav::repl::{run_interactive, run_script};
use treenav::session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "treenav",
    version,
    about = "Interactive navigation of hierarchical array containers"
)]
struct Cli {
    /// Container file to open on startup.
    file: Option<PathBuf>,

    /// Config file (TOML). Missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Run this command instead of starting the interactive shell. Repeatable.
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    commands: Vec<String>,

    /// Keep running `-c` commands after one reports an error.
    #[arg(long, requires = "commands")]
    keep_going: bool,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    debug!(?config, "loaded config");

    let interrupt = Interrupt::install()?;
    let mut session = Session::new(config.output_dir.clone()).with_interrupt(interrupt);
    if let Some(file) = &cli.file {
        let arg = file.display().to_string();
        if let Err(err) = session.open(&arg) {
            if !cli.commands.is_empty() {
                bail!("{}", err);
            }
            report(&CommandError::from(err), &mut io::stdout())?;
        }
    }

    if !cli.commands.is_empty() {
        let ok = run_script(&mut session, &cli.commands, cli.keep_going, &mut io::stdout())?;
        return Ok(if ok { exit_codes::OK } else { exit_codes::INVALID });
    }

    run_interactive(&mut session, &config)?;
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_file_and_commands() {
        let cli = Cli::parse_from(["treenav", "data.json", "-c", "ls", "-c", "cd Group1"]);
        assert_eq!(cli.file, Some(PathBuf::from("data.json")));
        assert_eq!(cli.commands, vec!["ls".to_string(), "cd Group1".to_string()]);
        assert!(!cli.keep_going);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn parse_without_file() {
        let cli = Cli::parse_from(["treenav"]);
        assert_eq!(cli.file, None);
        assert!(cli.commands.is_empty());
    }

    #[test]
    fn keep_going_requires_commands() {
        assert!(Cli::try_parse_from(["treenav", "--keep-going"]).is_err());
    }
}
