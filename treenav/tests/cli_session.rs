//! CLI tests for `treenav -c ...` scripts.
//!
//! Spawns the binary against a fixture container and checks stdout, the
//! exit code, and what was written to disk.

use std::fs;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use treenav::exit_codes;
use treenav::io::container::Container;
use treenav::test_support::FixtureFile;
use treenav::tree::Tree;

fn treenav(fixture: &FixtureFile, commands: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_treenav"));
    cmd.current_dir(fixture.dir()).arg(fixture.path());
    for command in commands {
        cmd.arg("-c").arg(command);
    }
    cmd.output().expect("run treenav")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8")
}

#[test]
fn navigation_scenario() {
    let fixture = FixtureFile::new().expect("fixture");
    let output = treenav(
        &fixture,
        &["cd Group1", "print field1", "cd ..", "cd Group2", "ls"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stdout(&output),
        "treenav> cd Group1\n\
         treenav> print field1\n\
         information\n\
         treenav> cd ..\n\
         treenav> cd Group2\n\
         treenav> ls\n\
         field1\n"
    );
}

#[test]
fn failing_command_sets_exit_code() {
    let fixture = FixtureFile::new().expect("fixture");
    let output = treenav(&fixture, &["cd Group1 Group2", "ls"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert_eq!(
        stdout(&output),
        "treenav> cd Group1 Group2\n*** invalid number of arguments\n"
    );
}

#[test]
fn rm_is_persisted() {
    let fixture = FixtureFile::new().expect("fixture");
    let output = treenav(&fixture, &["rm Group2", "ls"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).ends_with("treenav> ls\nGroup1/\n"));

    let container = Container::open(fixture.path()).expect("reopen");
    let children = container.children_of("/").expect("children");
    assert_eq!(children.keys().cloned().collect::<Vec<_>>(), vec!["Group1"]);
}

#[test]
fn dumps_land_in_working_directory() {
    let fixture = FixtureFile::new().expect("fixture");
    let output = treenav(&fixture, &["cd Group2", "dump field1", "txt_dump field1"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let npy = fs::read(fixture.dir().join("field1.npy")).expect("npy");
    assert!(npy.starts_with(b"\x93NUMPY"));
    let txt = fs::read_to_string(fixture.dir().join("field1.txt")).expect("txt");
    assert_eq!(txt.lines().count(), 10);
    assert!(
        txt.lines()
            .all(|line| line == "0.000000000000000000e+00")
    );
}

#[test]
fn exit_says_bye() {
    let fixture = FixtureFile::new().expect("fixture");
    let output = treenav(&fixture, &["exit", "ls"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "treenav> exit\nBye!\n");
}

#[test]
fn missing_file_fails_script() {
    let fixture = FixtureFile::new().expect("fixture");
    let output = Command::new(env!("CARGO_BIN_EXE_treenav"))
        .current_dir(fixture.dir())
        .arg("missing.json")
        .arg("-c")
        .arg("ls")
        .output()
        .expect("run treenav");
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("Can't access file missing.json"));
}

#[cfg(unix)]
#[test]
fn sigint_cancels_running_command_only() {
    let fixture = FixtureFile::new().expect("fixture");
    let child = Command::new(env!("CARGO_BIN_EXE_treenav"))
        .current_dir(fixture.dir())
        .arg(fixture.path())
        .args(["-c", "cd Group1", "-c", "shell sleep 2", "-c", "ls"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn treenav");

    thread::sleep(Duration::from_millis(500));
    let status = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .status()
        .expect("run kill");
    assert!(status.success());

    let output = child.wait_with_output().expect("wait treenav");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stdout(&output),
        "treenav> cd Group1\n\
         treenav> shell sleep 2\n\
         \n\
         treenav> ls\n\
         Subgroup1/ field1\n"
    );
}
