use argh::FromArgs;
use msh::{DEFAULT_PROMPT, EvictionPolicy, Interpreter};
use std::process::ExitCode;

#[derive(FromArgs)]
/// Interactive shell with built-ins, a single pipe, output redirection and `!N` history replay.
struct Args {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text printed before each input line
    prompt: String,

    #[argh(option, default = "EvictionPolicy::Shift")]
    /// what happens once ten lines are recorded: `shift` drops the oldest, `overwrite` reuses slots cyclically
    history_policy: EvictionPolicy,
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();

    if let Err(err) = msh::signals::block_interactive_signals() {
        log::warn!("cannot block SIGINT/SIGTSTP: {}", err);
        eprintln!("msh: cannot block SIGINT/SIGTSTP: {}", err);
    }

    let mut sh = Interpreter::new(args.history_policy);
    log::debug!("history policy: {}", sh.history().policy());
    match sh.repl(&args.prompt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("msh: {}", err);
            ExitCode::FAILURE
        }
    }
}
