//! Process-wide signal setup done once when the shell starts.

use nix::sys::signal::{SigSet, SigmaskHow, Signal, sigprocmask};

fn interactive_signals() -> SigSet {
    let mut mask = SigSet::empty();
    mask.add(Signal::SIGINT);
    mask.add(Signal::SIGTSTP);
    mask
}

/// Block SIGINT and SIGTSTP for the shell process.
///
/// A blocked mask survives `exec`, so every child must undo this with
/// [`unblock_interactive_signals`] before it runs its program.
pub fn block_interactive_signals() -> nix::Result<()> {
    sigprocmask(SigmaskHow::SIG_BLOCK, Some(&interactive_signals()), None)
}

/// Unblock SIGINT and SIGTSTP again.
///
/// Runs in a freshly forked child between `fork` and `exec`, so it only calls
/// `sigemptyset`, `sigaddset` and `sigprocmask`.
pub fn unblock_interactive_signals() -> std::io::Result<()> {
    sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&interactive_signals()), None)?;
    Ok(())
}
