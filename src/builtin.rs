use crate::command::ExitCode;
use crate::env::Environment;
use crate::history::HistoryRing;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Shell state a built-in may read or change.
pub(crate) struct ShellState<'a> {
    pub env: &'a mut Environment,
    pub history: &'a HistoryRing,
}

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in the shell process without spawning a child.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "history".
    fn name() -> &'static str;

    /// Executes the command.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, shell: &mut ShellState<'_>) -> Result<ExitCode>;
}

/// Parse `args` for built-in `T` and run it.
///
/// Usage problems and execution errors are reported on stderr and turned into
/// exit code 1; they never abort the shell.
pub(crate) fn run<T: BuiltinCommand>(
    args: &[String],
    stdout: &mut dyn Write,
    shell: &mut ShellState<'_>,
) -> Result<ExitCode> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match T::from_args(&[T::name()], &args) {
        Ok(cmd) => match cmd.execute(stdout, shell) {
            Ok(code) => Ok(code),
            Err(e) => {
                eprintln!("{:#}", e);
                Ok(1)
            }
        },
        Err(EarlyExit { output, status }) => {
            if status.is_ok() {
                stdout.write_all(output.as_bytes())?;
                Ok(0)
            } else {
                eprint!("{}", output);
                Ok(1)
            }
        }
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to $HOME when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, shell: &mut ShellState<'_>) -> Result<ExitCode> {
        let env = &mut *shell.env;
        let typed = match self.target {
            Some(t) if !t.is_empty() => t,
            _ => env
                .get_var("HOME")
                .ok_or_else(|| anyhow::anyhow!("cd: no target and HOME not set"))?,
        };

        let target = PathBuf::from(&typed);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical =
            fs::canonicalize(&new_dir).with_context(|| format!("cd: {}", typed))?;

        env::set_current_dir(&canonical).with_context(|| format!("cd: {}", typed))?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Leave the shell with status 0. Words after `quit` or `exit` are dropped by the parser.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, shell: &mut ShellState<'_>) -> Result<ExitCode> {
        shell.env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// List the most recent command lines with the index `!N` replays them by.
pub struct History {}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, shell: &mut ShellState<'_>) -> Result<ExitCode> {
        for (index, line) in shell.history.list() {
            writeln!(stdout, "[{}]: {}", index, line)?;
        }
        Ok(0)
    }
}
