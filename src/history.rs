//! Bounded log of the most recent command lines and the `!N` replay syntax.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of lines the ring remembers.
pub const HISTORY_CAPACITY: usize = 10;

/// How the ring makes room once all slots are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Drop the oldest entry and shift the rest down by one.
    ///
    /// Indices always run `0..count` from oldest to newest.
    #[default]
    Shift,
    /// Overwrite slot `total % 10` in place.
    ///
    /// Indices are slot numbers, so after wrap-around index 0 is no longer the
    /// oldest line.
    Overwrite,
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shift" => Ok(EvictionPolicy::Shift),
            "overwrite" => Ok(EvictionPolicy::Overwrite),
            other => Err(format!(
                "unknown history policy `{}`, expected `shift` or `overwrite`",
                other
            )),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Shift => f.write_str("shift"),
            EvictionPolicy::Overwrite => f.write_str("overwrite"),
        }
    }
}

/// Errors produced when resolving a `!N` reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("!{index}: event not found ({recorded} recorded)")]
    OutOfRange { index: usize, recorded: usize },
    #[error("{0}: malformed history reference")]
    Malformed(String),
}

/// Fixed-capacity history of raw command lines.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<String>,
    policy: EvictionPolicy,
    total: usize,
}

impl HistoryRing {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
            policy,
            total: 0,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Store a copy of `line` as the most recent entry.
    pub fn record(&mut self, line: &str) {
        let line = line.to_owned();
        if self.entries.len() < HISTORY_CAPACITY {
            self.entries.push_back(line);
        } else {
            match self.policy {
                EvictionPolicy::Shift => {
                    self.entries.pop_front();
                    self.entries.push_back(line);
                }
                EvictionPolicy::Overwrite => {
                    self.entries[self.total % HISTORY_CAPACITY] = line;
                }
            }
        }
        self.total += 1;
    }

    /// Number of entries currently stored, never more than [`HISTORY_CAPACITY`].
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of lines ever recorded, including evicted ones.
    pub fn recorded_total(&self) -> usize {
        self.total
    }

    /// Return the line stored at display index `index`.
    pub fn replay(&self, index: usize) -> Result<&str, HistoryError> {
        self.entries
            .get(index)
            .map(String::as_str)
            .ok_or(HistoryError::OutOfRange {
                index,
                recorded: self.entries.len(),
            })
    }

    /// Entries tagged with their display index, in display order.
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, line)| (i, line.as_str()))
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(EvictionPolicy::default())
    }
}

/// Recognize a `!N` replay request.
///
/// Returns `None` when the line is not a replay request at all, otherwise the
/// parsed 0-based index or [`HistoryError::Malformed`] when what follows the
/// `!` is not a non-negative decimal integer.
pub fn parse_replay(line: &str) -> Option<Result<usize, HistoryError>> {
    let line = line.trim_end();
    let rest = line.strip_prefix('!')?;
    let digits = rest.trim_start();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Err(HistoryError::Malformed(line.to_owned())));
    }
    Some(
        digits
            .parse::<usize>()
            .map_err(|_| HistoryError::Malformed(line.to_owned())),
    )
}
