use crate::builtin::{self, Cd, Exit, History, ShellState};
use crate::command::{Command, ExitCode, Stdout};
use crate::env::Environment;
use crate::history::{EvictionPolicy, HistoryRing, parse_replay};
use crate::{launcher, lexer, parser};
use log::debug;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// Prompt printed before every line unless configured otherwise.
pub const DEFAULT_PROMPT: &str = "msh> ";

/// The command loop: history, classification and dispatch of one line at a time.
///
/// Example
/// ```
/// use msh::{EvictionPolicy, Interpreter};
/// let mut sh = Interpreter::new(EvictionPolicy::Shift);
/// let code = sh.execute_line("true", Box::new(std::io::stdout())).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(sh.history().replay(0).unwrap(), "true");
/// ```
pub struct Interpreter {
    env: Environment,
    history: HistoryRing,
}

impl Interpreter {
    /// Create an interpreter over the current process environment.
    pub fn new(policy: EvictionPolicy) -> Self {
        Self::with_environment(Environment::new(), policy)
    }

    pub fn with_environment(env: Environment, policy: EvictionPolicy) -> Self {
        Self {
            env,
            history: HistoryRing::new(policy),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// True once `quit` or `exit` has run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Interpret one input line.
    ///
    /// `stdout` receives built-in output and the output of the last process on
    /// the line, unless the line redirects it to a file. A `!N` line is replaced
    /// by history entry `N`, which is echoed and then run as if typed.
    ///
    /// The effective line is recorded in history once it has run, so `history`
    /// never lists itself. Blank lines, failed replays and malformed lines are
    /// reported through the returned error and are not recorded.
    pub fn execute_line(&mut self, line: &str, mut stdout: Box<dyn Stdout>) -> anyhow::Result<ExitCode> {
        let line = lexer::truncate_line(line).trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return Ok(0);
        }

        let line = match parse_replay(line) {
            Some(index) => {
                let replayed = self.history.replay(index?)?.to_owned();
                writeln!(stdout, "{}", replayed)?;
                replayed
            }
            None => line.to_owned(),
        };
        stdout.flush()?;

        let command = parser::classify(lexer::split_into_tokens(&line))?;
        let result = self.dispatch(command, stdout);
        if !self.env.should_exit {
            self.history.record(&line);
        }
        debug!("{:?} finished with {:?}", line, result.as_ref().ok());
        result
    }

    fn dispatch(&mut self, command: Command, mut stdout: Box<dyn Stdout>) -> anyhow::Result<ExitCode> {
        let mut shell = ShellState {
            env: &mut self.env,
            history: &self.history,
        };
        match command {
            Command::Empty => Ok(0),
            Command::Quit => builtin::run::<Exit>(&[], &mut stdout, &mut shell),
            Command::Cd(args) => builtin::run::<Cd>(&args, &mut stdout, &mut shell),
            Command::History(args) => builtin::run::<History>(&args, &mut stdout, &mut shell),
            Command::Plain(argv) => launcher::run_plain(&argv, stdout, shell.env),
            Command::Redirect(spec) => launcher::run_redirect(&spec, shell.env),
            Command::Pipeline(spec) => {
                let status = launcher::run_pipeline(&spec, stdout, shell.env)?;
                debug!("pipeline statuses: left {}, right {}", status.left, status.right);
                Ok(status.right)
            }
        }
    }

    /// Read-eval loop on the terminal until `quit`, `exit` or end of input.
    ///
    /// Per-line failures are printed and the loop goes on; only a failure of
    /// the line reader itself ends it with an error.
    pub fn repl(&mut self, prompt: &str) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline(prompt) {
                Ok(line) => {
                    if let Err(err) = self.execute_line(&line, Box::new(std::io::stdout())) {
                        eprintln!("{:#}", err);
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(EvictionPolicy::default())
    }
}
