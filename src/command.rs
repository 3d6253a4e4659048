use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// A child killed by a signal is reported as `128 + signal`, like POSIX shells do.
pub type ExitCode = i32;

/// Exit code reported for a command that could not be resolved or started.
pub const NOT_FOUND_EXIT_CODE: ExitCode = 1;

/// Abstraction over a writable output stream that can also be converted into
/// a [`Stdio`] handle for spawning external processes.
///
/// Built-ins write to it directly; launchers hand it to the last process of the
/// line. A blanket implementation exists for any type that implements `Write`
/// and `Into<Stdio>` (e.g. `std::io::Stdout` or `std::fs::File`).
pub trait Stdout: Write {
    /// Convert this output into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// Two commands joined by a single pipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSpec {
    /// Writer side: its stdout feeds the pipe.
    pub left: Vec<String>,
    /// Reader side: its stdin is the pipe.
    pub right: Vec<String>,
}

/// A command whose stdout goes to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSpec {
    /// Command and arguments with the `>` operator and its target removed.
    pub argv: Vec<String>,
    pub target: PathBuf,
}

/// The single action a tokenized line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing to do (the line held no words).
    Empty,
    /// `quit` or `exit`.
    Quit,
    /// `cd [dir]`; arguments after the first are handed to the built-in as is.
    Cd(Vec<String>),
    /// `history`.
    History(Vec<String>),
    Pipeline(PipelineSpec),
    Redirect(RedirectSpec),
    /// An external command launched unchanged.
    Plain(Vec<String>),
}

/// Exit statuses of both halves of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStatus {
    pub left: ExitCode,
    pub right: ExitCode,
}
