//! Verb table, shortcut resolution and line dispatch.
//!
//! A typed command word selects a verb by exact name or, failing that, by a
//! unique prefix (`pr` runs `print`). Errors from any verb are reported on
//! the output as `*** <message>` lines and never end the session.

use std::io::Write;

use tracing::debug;

use crate::error::{CommandError, NavError, Result};
use crate::io::export::ExportFormat;
use crate::io::shell::run_shell;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Open,
    Close,
    Ls,
    Cd,
    Print,
    Stats,
    Pdf,
    Dump,
    TxtDump,
    Rm,
    Shell,
    Help,
    Exit,
}

/// One entry of the verb table.
#[derive(Debug)]
pub struct VerbSpec {
    pub name: &'static str,
    pub verb: Verb,
    pub help: &'static str,
}

pub const VERBS: &[VerbSpec] = &[
    VerbSpec {
        name: "open",
        verb: Verb::Open,
        help: "Load a container file: open <file>",
    },
    VerbSpec {
        name: "close",
        verb: Verb::Close,
        help: "Close current file",
    },
    VerbSpec {
        name: "ls",
        verb: Verb::Ls,
        help: "List current group contents. Supports `ls <group>` and `ls *`",
    },
    VerbSpec {
        name: "cd",
        verb: Verb::Cd,
        help: "Enter group. Also ok: `cd ..` (up), `cd -` (last), `cd` (root)",
    },
    VerbSpec {
        name: "print",
        verb: Verb::Print,
        help: "Print dataset to screen",
    },
    VerbSpec {
        name: "stats",
        verb: Verb::Stats,
        help: "Get general statistics of dataset",
    },
    VerbSpec {
        name: "pdf",
        verb: Verb::Pdf,
        help: "Get pdf of dataset",
    },
    VerbSpec {
        name: "dump",
        verb: Verb::Dump,
        help: "Dump dataset to numpy binary",
    },
    VerbSpec {
        name: "txt_dump",
        verb: Verb::TxtDump,
        help: "Dump dataset to txt file",
    },
    VerbSpec {
        name: "rm",
        verb: Verb::Rm,
        help: "Delete a group or dataset",
    },
    VerbSpec {
        name: "shell",
        verb: Verb::Shell,
        help: "Execute a regular shell command.\n\
               Useful for e.g. 'shell ls' (to see what has been written).\n\
               Note : '!ls' is equivalent to 'shell ls'.",
    },
    VerbSpec {
        name: "help",
        verb: Verb::Help,
        help: "List commands, or describe one: help <command>",
    },
    VerbSpec {
        name: "exit",
        verb: Verb::Exit,
        help: "Get out of here",
    },
    VerbSpec {
        name: "quit",
        verb: Verb::Exit,
        help: "Get out of here",
    },
    VerbSpec {
        name: "bye",
        verb: Verb::Exit,
        help: "Get out of here",
    },
];

const ABOUT: &str = "\
Welcome to treenav!

With this app, you can navigate a container file as if you were in
the command line. Use `cd`, `ls`, etc... to this end.
Information about the various fields can be given using `stats`,
`pdf` or `dump` for example.";

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// The line was handled but reported an error.
    Failed,
    Exit,
}

/// Find the verb named by `word`: exact name first, then unique prefix.
pub fn lookup(word: &str) -> Result<&'static VerbSpec, CommandError> {
    if let Some(spec) = VERBS.iter().find(|spec| spec.name == word) {
        return Ok(spec);
    }
    let matches: Vec<&VerbSpec> = VERBS
        .iter()
        .filter(|spec| spec.name.starts_with(word))
        .collect();
    match matches.as_slice() {
        [] => Err(CommandError::UnknownSyntax(word.to_string())),
        [only] => Ok(*only),
        _ => Err(CommandError::Ambiguous(word.to_string())),
    }
}

/// Split a line into the command word and the rest. `!cmd` is `shell cmd`
/// and `?x` is `help x`.
pub fn split_line(line: &str) -> (&str, &str) {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('!') {
        return ("shell", rest.trim());
    }
    if let Some(rest) = line.strip_prefix('?') {
        return ("help", rest.trim());
    }
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

/// Run one input line against `session`, reporting any error on `out`.
pub fn run_line(session: &mut Session, line: &str, out: &mut dyn Write) -> std::io::Result<Control> {
    let (word, arg) = split_line(line);
    if word.is_empty() {
        return Ok(Control::Continue);
    }
    let interrupt = session.interrupt().clone();
    interrupt.take();
    let result = execute(session, line, word, arg, out);
    if interrupt.take() && !matches!(result, Ok(Control::Exit)) {
        // Cancelled, not failed: the partial output stays and the session is kept.
        debug!(line, "interrupted");
        writeln!(out)?;
        return Ok(Control::Continue);
    }
    match result {
        Ok(control) => Ok(control),
        Err(err) => {
            debug!(line, error = ?err, "command failed");
            report(&err, out)?;
            Ok(Control::Failed)
        }
    }
}

fn execute(
    session: &mut Session,
    line: &str,
    word: &str,
    arg: &str,
    out: &mut dyn Write,
) -> Result<Control, CommandError> {
    let spec = lookup(word).map_err(|err| match err {
        CommandError::UnknownSyntax(_) => CommandError::UnknownSyntax(line.trim().to_string()),
        other => other,
    })?;
    match spec.verb {
        Verb::Open => session.open(arg)?,
        Verb::Close => {
            no_arg(arg)?;
            session.close();
        }
        Verb::Ls => session.ls(arg, out)?,
        Verb::Cd => session.cd(arg)?,
        Verb::Print => session.print(arg, out)?,
        Verb::Stats => session.stats(arg, out)?,
        Verb::Pdf => session.pdf(arg, out)?,
        Verb::Dump => session.dump(arg, ExportFormat::Npy, out)?,
        Verb::TxtDump => session.dump(arg, ExportFormat::Txt, out)?,
        Verb::Rm => session.rm(arg, out)?,
        Verb::Shell => {
            if arg.is_empty() {
                return Err(NavError::InvalidArgumentCount.into());
            }
            out.flush()?;
            let status = run_shell(arg).map_err(NavError::from)?;
            debug!(code = ?status.code(), "shell finished");
        }
        Verb::Help => help(arg, out)?,
        Verb::Exit => {
            no_arg(arg)?;
            session.close();
            writeln!(out, "Bye!")?;
            return Ok(Control::Exit);
        }
    }
    Ok(Control::Continue)
}

fn no_arg(arg: &str) -> Result<()> {
    if arg.is_empty() {
        Ok(())
    } else {
        Err(NavError::InvalidArgumentCount)
    }
}

fn help(arg: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    if arg.is_empty() {
        writeln!(out, "Documented commands (type help <topic>):")?;
        writeln!(out, "========================================")?;
        let names: Vec<&str> = VERBS.iter().map(|spec| spec.name).collect();
        writeln!(out, "{}", names.join("  "))?;
        writeln!(out)?;
        writeln!(out, "Miscellaneous help topics: about")?;
        return Ok(());
    }
    if "about".starts_with(arg) {
        writeln!(out, "{}", ABOUT)?;
        return Ok(());
    }
    let spec = lookup(arg).map_err(|err| match err {
        CommandError::UnknownSyntax(word) => CommandError::UnknownCommand(word),
        other => other,
    })?;
    writeln!(out, "{}", spec.help)?;
    Ok(())
}

/// Write `err` as `*** `-prefixed lines.
pub fn report(err: &CommandError, out: &mut dyn Write) -> std::io::Result<()> {
    for line in err.to_string().lines() {
        writeln!(out, "*** {}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::interrupt::Interrupt;
    use crate::test_support::fixture_tree;
    use crate::tree::{Array, Kind, Node, Tree};

    /// Raises the interrupt on every read, as if Ctrl-C arrived mid-verb.
    struct InterruptingTree {
        root: Node,
        interrupt: Interrupt,
    }

    impl Tree for InterruptingTree {
        fn children_of(&self, group: &str) -> anyhow::Result<BTreeMap<String, Kind>> {
            self.root.children_of(group)
        }

        fn read(&self, path: &str) -> anyhow::Result<Array> {
            self.interrupt.raise();
            self.root.read(path)
        }

        fn delete(&mut self, path: &str) -> anyhow::Result<()> {
            Tree::delete(&mut self.root, path)
        }

        fn close(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn location(&self) -> String {
            "(interrupting)".to_string()
        }
    }

    fn session() -> Session {
        Session::with_tree(Box::new(fixture_tree()), ".")
    }

    fn run(session: &mut Session, line: &str) -> (Control, String) {
        let mut buf = Vec::new();
        let control = run_line(session, line, &mut buf).expect("run line");
        (control, String::from_utf8(buf).expect("utf8"))
    }

    #[test]
    fn exact_name_beats_prefix() {
        assert_eq!(lookup("cd").expect("cd").verb, Verb::Cd);
        assert_eq!(lookup("exit").expect("exit").verb, Verb::Exit);
    }

    #[test]
    fn unique_prefix_selects_verb() {
        assert_eq!(lookup("pr").expect("pr").verb, Verb::Print);
        assert_eq!(lookup("t").expect("t").verb, Verb::TxtDump);
        assert_eq!(lookup("q").expect("q").verb, Verb::Exit);
    }

    #[test]
    fn shared_prefix_is_ambiguous() {
        assert!(matches!(lookup("p"), Err(CommandError::Ambiguous(_))));
        assert!(matches!(lookup("c"), Err(CommandError::Ambiguous(_))));
        assert!(matches!(lookup("zz"), Err(CommandError::UnknownSyntax(_))));
    }

    #[test]
    fn split_handles_shortcuts() {
        assert_eq!(split_line("  cd   Group1 "), ("cd", "Group1"));
        assert_eq!(split_line("cd"), ("cd", ""));
        assert_eq!(split_line("!ls -l"), ("shell", "ls -l"));
        assert_eq!(split_line("?cd"), ("help", "cd"));
    }

    #[test]
    fn prefix_dispatch_runs_verb() {
        let mut s = session();
        run(&mut s, "cd Group1");
        let (control, out) = run(&mut s, "pr field1");
        assert_eq!(control, Control::Continue);
        assert_eq!(out, "information\n");
    }

    #[test]
    fn errors_are_reported_with_stars() {
        let mut s = session();
        let (control, out) = run(&mut s, "cd zzz");
        assert_eq!(control, Control::Failed);
        assert_eq!(out, "*** unknown label\n");

        let (_, out) = run(&mut s, "cd Group1 Group2");
        assert_eq!(out, "*** invalid number of arguments\n");

        run(&mut s, "cd Group1");
        let (_, out) = run(&mut s, "cd field1");
        assert_eq!(out, "*** can only cd into groups\n");
    }

    #[test]
    fn unknown_and_ambiguous_words() {
        let mut s = session();
        let (control, out) = run(&mut s, "frobnicate now");
        assert_eq!(control, Control::Failed);
        assert_eq!(out, "*** Unknown syntax: frobnicate now\n");

        let (_, out) = run(&mut s, "p field1");
        assert_eq!(
            out,
            "*** p is a shortcut to several commands\n\
             *** Please give more characters for disambiguation\n"
        );
    }

    #[test]
    fn empty_line_is_noop() {
        let mut s = session();
        assert_eq!(run(&mut s, "   "), (Control::Continue, String::new()));
    }

    #[test]
    fn close_rejects_arguments() {
        let mut s = session();
        let (_, out) = run(&mut s, "close now");
        assert_eq!(out, "*** invalid number of arguments\n");
        assert!(s.is_open());
        let (control, _) = run(&mut s, "close");
        assert_eq!(control, Control::Continue);
        assert!(!s.is_open());
        let (_, out) = run(&mut s, "ls");
        assert_eq!(out, "*** please open a file\n");
    }

    #[test]
    fn exit_closes_and_says_bye() {
        let mut s = session();
        let (control, out) = run(&mut s, "bye");
        assert_eq!(control, Control::Exit);
        assert_eq!(out, "Bye!\n");
        assert!(!s.is_open());
    }

    #[test]
    fn exit_rejects_arguments() {
        let mut s = session();
        let (control, out) = run(&mut s, "exit now");
        assert_eq!(control, Control::Failed);
        assert_eq!(out, "*** invalid number of arguments\n");
        assert!(s.is_open());
    }

    #[test]
    fn stale_interrupt_does_not_cancel_next_line() {
        let mut s = session();
        s.interrupt().raise();
        let (control, out) = run(&mut s, "cd Group1");
        assert_eq!(control, Control::Continue);
        assert_eq!(out, "");
        assert_eq!(s.position(), "/Group1/");
        assert!(!s.interrupt().is_raised());
    }

    #[test]
    fn interrupt_mid_verb_cancels_line_and_keeps_session() {
        let interrupt = Interrupt::default();
        let tree = InterruptingTree {
            root: fixture_tree(),
            interrupt: interrupt.clone(),
        };
        let mut s = Session::with_tree(Box::new(tree), ".").with_interrupt(interrupt);
        run(&mut s, "cd Group1");
        run(&mut s, "cd Subgroup1");

        let (control, out) = run(&mut s, "print *");
        assert_eq!(control, Control::Continue);
        assert!(out.starts_with(" field2 :\n"));
        assert!(out.ends_with("]\n\n"));
        assert!(!out.contains("field1 :"));
        assert!(!out.contains("***"));

        assert!(s.is_open());
        assert_eq!(s.position(), "/Group1/Subgroup1/");
        assert!(!s.interrupt().is_raised());
        let (control, out) = run(&mut s, "ls");
        assert_eq!(control, Control::Continue);
        assert_eq!(out, " field2 field1\n");
    }

    #[test]
    fn every_verb_has_help() {
        let mut s = Session::new(".");
        for spec in VERBS {
            let (control, out) = run(&mut s, &format!("help {}", spec.name));
            assert_eq!(control, Control::Continue, "{}", spec.name);
            assert_eq!(out.trim_end(), spec.help);
        }
        let (_, out) = run(&mut s, "help about");
        assert!(out.starts_with("Welcome to treenav!"));
        let (_, out) = run(&mut s, "help nothing");
        assert_eq!(out, "*** Unknown command: nothing\n");
    }

    #[test]
    fn shell_requires_a_command() {
        let mut s = Session::new(".");
        let (_, out) = run(&mut s, "shell");
        assert_eq!(out, "*** invalid number of arguments\n");
        let (control, _) = run(&mut s, "!true");
        assert_eq!(control, Control::Continue);
    }
}
