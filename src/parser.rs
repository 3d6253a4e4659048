use crate::command::{Command, PipelineSpec, RedirectSpec};
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

/// Word that joins two commands with a pipe.
pub const PIPE_TOKEN: &str = "|";

/// Word that sends a command's output to a file.
pub const REDIRECT_TOKEN: &str = ">";

/// Errors that can occur while classifying a tokenized line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsingError {
    /// A structural word appeared where a command name was expected.
    #[error("syntax error near unexpected token `{0}`")]
    UnexpectedToken(String),
    /// One side of a pipe has no command.
    #[error("syntax error: pipe needs a command on both sides")]
    EmptyPipeline,
    /// `>` was the last word on the line.
    #[error("syntax error: expected a file name after `>`")]
    MissingRedirectTarget,
}

fn is_structural(token: &str) -> bool {
    token == PIPE_TOKEN || token == REDIRECT_TOKEN
}

/// Decide what a tokenized line asks the shell to do.
///
/// Built-in names are only recognized in the first position. For everything
/// else the first `|` wins; a `>` is only honoured when there is no pipe, so
/// in a piped line it is passed through as an ordinary argument.
pub fn classify(tokens: Vec<String>) -> Result<Command, ParsingError> {
    let Some(first) = tokens.first().cloned() else {
        return Ok(Command::Empty);
    };

    let command = match first.as_str() {
        "quit" | "exit" => Command::Quit,
        "cd" => Command::Cd(tokens[1..].to_vec()),
        "history" => Command::History(tokens[1..].to_vec()),
        name if is_structural(name) => {
            return Err(ParsingError::UnexpectedToken(name.to_owned()));
        }
        _ => classify_external(tokens)?,
    };
    debug!("classified as {:?}", command);
    Ok(command)
}

fn classify_external(mut tokens: Vec<String>) -> Result<Command, ParsingError> {
    if let Some(pipe_index) = tokens.iter().position(|t| t == PIPE_TOKEN) {
        let right = tokens.split_off(pipe_index + 1);
        tokens.truncate(pipe_index);
        if right.is_empty() {
            return Err(ParsingError::EmptyPipeline);
        }
        if is_structural(&right[0]) {
            return Err(ParsingError::UnexpectedToken(right[0].clone()));
        }
        return Ok(Command::Pipeline(PipelineSpec {
            left: tokens,
            right,
        }));
    }

    if let Some(redir_index) = tokens.iter().position(|t| t == REDIRECT_TOKEN) {
        if redir_index + 1 >= tokens.len() {
            return Err(ParsingError::MissingRedirectTarget);
        }
        if is_structural(&tokens[redir_index + 1]) {
            return Err(ParsingError::UnexpectedToken(tokens[redir_index + 1].clone()));
        }
        let target = PathBuf::from(tokens.remove(redir_index + 1));
        tokens.remove(redir_index);
        return Ok(Command::Redirect(RedirectSpec {
            argv: tokens,
            target,
        }));
    }

    Ok(Command::Plain(tokens))
}
