#![cfg(unix)]

use msh::{EvictionPolicy, Interpreter};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

fn run_lines(sh: &mut Interpreter, dir: &Path, lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let path = dir.join(format!("out{}", i));
            sh.execute_line(line, Box::new(File::create(&path).unwrap()))
                .unwrap();
            fs::read_to_string(path).unwrap()
        })
        .collect()
}

#[test]
fn replayed_line_is_run_and_recorded_again() {
    let dir = tempfile::tempdir().unwrap();
    let mut sh = Interpreter::new(EvictionPolicy::Shift);

    let outputs = run_lines(&mut sh, dir.path(), &["echo hi", "!0", "history"]);

    assert_eq!(outputs[0], "hi\n");
    assert_eq!(outputs[1], "echo hi\nhi\n");
    assert_eq!(outputs[2], "[0]: echo hi\n[1]: echo hi\n");
}

#[test]
fn history_keeps_the_ten_most_recent_lines() {
    let dir = tempfile::tempdir().unwrap();
    let mut sh = Interpreter::new(EvictionPolicy::Shift);
    let lines: Vec<String> = (0..11).map(|i| format!("echo {}", i)).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    run_lines(&mut sh, dir.path(), &refs);

    let listed = run_lines(&mut sh, dir.path(), &["history"]).remove(0);

    let expected: String = (1..11)
        .enumerate()
        .map(|(i, n)| format!("[{}]: echo {}\n", i, n))
        .collect();
    assert_eq!(listed, expected);

    let replayed = run_lines(&mut sh, dir.path(), &["!0"]).remove(0);
    assert_eq!(replayed, "echo 2\n2\n");
}

#[test]
fn overwrite_policy_numbers_entries_by_slot() {
    let dir = tempfile::tempdir().unwrap();
    let mut sh = Interpreter::new(EvictionPolicy::Overwrite);
    let lines: Vec<String> = (0..11).map(|i| format!("echo {}", i)).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    run_lines(&mut sh, dir.path(), &refs);

    let listed = run_lines(&mut sh, dir.path(), &["history"]).remove(0);

    assert!(listed.starts_with("[0]: echo 10\n[1]: echo 1\n"));
    assert!(listed.ends_with("[9]: echo 9\n"));
}

#[test]
fn pipeline_and_redirect_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("listing.txt");
    let mut sh = Interpreter::new(EvictionPolicy::Shift);

    let line = format!("printf x\\ny\\n > {}", target.display());
    let outputs = run_lines(&mut sh, dir.path(), &[line.as_str()]);
    assert_eq!(outputs[0], "");
    assert_eq!(fs::read_to_string(&target).unwrap(), "x\ny\n");

    let line = format!("cat {} | wc -l", target.display());
    let outputs = run_lines(&mut sh, dir.path(), &[line.as_str()]);
    assert_eq!(outputs[0].trim(), "2");
}

#[test]
fn binary_reads_lines_from_stdin_and_quits_cleanly() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_msh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"echo hi\n!0\nhistory\nquit\necho never\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("[0]: echo hi\n[1]: echo hi\n"), "{}", stdout);
    assert!(!stdout.contains("never"));
}

#[test]
fn binary_exits_zero_on_end_of_input() {
    let output = Command::new(env!("CARGO_BIN_EXE_msh"))
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(output.status.success());
}

#[test]
fn binary_reports_unknown_command_and_continues() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_msh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"msh-no-such-program\necho still here\nexit\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("msh-no-such-program: command not found"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("still here"));
}
