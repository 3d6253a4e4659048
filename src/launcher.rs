//! Starting external programs: one plain child, one child writing to a file,
//! or two children joined by a pipe.
//!
//! Every launcher blocks until all children it started have exited. Pipe and
//! file descriptors are owned values, so the parent never keeps an end it does
//! not use once the children are running.

use crate::command::{
    ExitCode, NOT_FOUND_EXIT_CODE, PipelineSpec, PipelineStatus, RedirectSpec, Stdout,
};
use crate::env::Environment;
use crate::external::{ExternalCommand, exit_code};
use anyhow::{Context, Result};
use log::debug;
use nix::errno::Errno;
use std::fs::OpenOptions;
use std::io;
use std::process::{Child, Stdio};

/// Resolve `argv`, printing the shell's "command not found" message on failure.
fn resolve_or_report(env: &Environment, argv: &[String]) -> Option<ExternalCommand> {
    let resolved = ExternalCommand::resolve(env, argv);
    if resolved.is_none() {
        let name = argv.first().map(String::as_str).unwrap_or_default();
        eprintln!("{}: command not found", name);
    }
    resolved
}

/// Start `external`, or report it as not found when the program cannot be
/// executed (missing `#!` interpreter, no permission, bad format).
fn spawn(
    external: &ExternalCommand,
    env: &Environment,
    stdin: Stdio,
    stdout: Stdio,
) -> Result<Option<Child>> {
    // The `Command` and the stdio handles it owns are dropped on return, which
    // closes the parent's copies of any pipe end handed to the child.
    match external.to_command(env).stdin(stdin).stdout(stdout).spawn() {
        Ok(child) => {
            debug!("started {} as pid {}", external.name(), child.id());
            Ok(Some(child))
        }
        Err(err) if is_not_executable(&err) => {
            debug!("cannot execute {}: {}", external.program().display(), err);
            eprintln!("{}: command not found", external.name());
            Ok(None)
        }
        Err(err) => Err(err).with_context(|| format!("{}: failed to start", external.name())),
    }
}

fn is_not_executable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) || err.raw_os_error() == Some(Errno::ENOEXEC as i32)
}

fn wait(mut child: Child, name: &str) -> Result<ExitCode> {
    let status = child
        .wait()
        .with_context(|| format!("{}: failed to wait for pid {}", name, child.id()))?;
    let code = exit_code(status);
    debug!("pid {} ({}) exited with {}", child.id(), name, code);
    Ok(code)
}

/// Run one external command with inherited stdin and the given stdout.
pub fn run_plain(argv: &[String], stdout: Box<dyn Stdout>, env: &Environment) -> Result<ExitCode> {
    let Some(external) = resolve_or_report(env, argv) else {
        return Ok(NOT_FOUND_EXIT_CODE);
    };
    match spawn(&external, env, Stdio::inherit(), stdout.stdio())? {
        Some(child) => wait(child, external.name()),
        None => Ok(NOT_FOUND_EXIT_CODE),
    }
}

/// Run a command with its stdout replaced by `spec.target`.
///
/// The target is created when missing and truncated when present. A target
/// that cannot be opened fails the request before anything is started.
pub fn run_redirect(spec: &RedirectSpec, env: &Environment) -> Result<ExitCode> {
    let path = env.current_dir.join(&spec.target);
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("{}: cannot open for writing", spec.target.display()))?;
    debug!("redirecting stdout to {}", path.display());
    run_plain(&spec.argv, Box::new(file), env)
}

/// Run `spec.left | spec.right` and wait for both sides.
///
/// The left side inherits stdin, the right side writes to `stdout`. A side
/// whose command cannot be resolved or executed reports it and counts as
/// status 1; the other side still runs, reading end-of-file or writing into a
/// closed pipe.
pub fn run_pipeline(
    spec: &PipelineSpec,
    stdout: Box<dyn Stdout>,
    env: &Environment,
) -> Result<PipelineStatus> {
    let mut left = match resolve_or_report(env, &spec.left) {
        Some(external) => spawn(&external, env, Stdio::inherit(), Stdio::piped())?
            .map(|child| (child, external)),
        None => None,
    };

    let pipe_reader = match left.as_mut().and_then(|(child, _)| child.stdout.take()) {
        Some(reader) => Stdio::from(reader),
        None => Stdio::null(),
    };

    let right = match resolve_or_report(env, &spec.right) {
        Some(external) => match spawn(&external, env, pipe_reader, stdout.stdio()) {
            Ok(child) => child.map(|child| (child, external)),
            Err(err) => {
                // The reader end is already closed; reap the writer before bailing out.
                if let Some((child, external)) = left {
                    wait(child, external.name())?;
                }
                return Err(err);
            }
        },
        None => {
            drop(pipe_reader);
            None
        }
    };

    let left = match left {
        Some((child, external)) => wait(child, external.name())?,
        None => NOT_FOUND_EXIT_CODE,
    };
    let right = match right {
        Some((child, external)) => wait(child, external.name())?,
        None => NOT_FOUND_EXIT_CODE,
    };
    Ok(PipelineStatus { left, right })
}
