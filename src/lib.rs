//! A small interactive shell: built-ins, external programs, one pipe, output
//! redirection and a ten-line history with `!N` replay.
//!
//! A line goes through the [`lexer`] (whitespace splitting), the [`parser`]
//! (classification into a [`Command`]) and then either a built-in or one of the
//! launchers, which start children with `std::process::Command` and wait for
//! all of them. [`Interpreter`] ties the steps together and owns the
//! [`HistoryRing`].

mod builtin;
pub mod command;
pub mod env;
pub mod external;
pub mod history;
mod interpreter;
pub mod launcher;
pub mod lexer;
pub mod parser;
pub mod signals;
#[cfg(test)]
mod test_support;

pub use command::{Command, ExitCode, PipelineSpec, PipelineStatus, RedirectSpec};
pub use history::{EvictionPolicy, HistoryError, HistoryRing};
pub use interpreter::{DEFAULT_PROMPT, Interpreter};
