//! Lexical analysis for the shell: splitting a raw input line into words.
//!
//! The grammar is deliberately tiny. Words are separated by runs of
//! whitespace, there is no quoting, and the structural words `|` and `>` are
//! ordinary tokens here; the [`parser`](crate::parser) gives them meaning.

use log::{debug, warn};

/// Characters that separate words on the command line.
pub const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r'];

/// The maximum command-line size, terminator included.
pub const MAX_COMMAND_SIZE: usize = 128;

/// The maximum number of words recognized on a single line.
pub const MAX_NUM_ARGUMENTS: usize = 13;

/// Clamp a raw input line to `MAX_COMMAND_SIZE - 1` bytes.
///
/// The cut always lands on a UTF-8 character boundary, so the result may be a
/// few bytes shorter than the limit when a multi-byte character straddles it.
pub fn truncate_line(line: &str) -> &str {
    let limit = MAX_COMMAND_SIZE - 1;
    if line.len() <= limit {
        return line;
    }
    let mut end = limit;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    warn!(
        "input line of {} bytes truncated to {} bytes",
        line.len(),
        end
    );
    &line[..end]
}

/// Split a line into owned words.
///
/// Empty fields produced by consecutive delimiters are dropped, so every
/// returned token is non-empty and the length of the vector marks the end of
/// the argument list. Words past [`MAX_NUM_ARGUMENTS`] are silently ignored.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    let tokens: Vec<String> = line
        .split(WHITESPACE)
        .filter(|word| !word.is_empty())
        .take(MAX_NUM_ARGUMENTS)
        .map(str::to_owned)
        .collect();
    debug!("tokens = {:?}", tokens);
    tokens
}
