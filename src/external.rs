use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::command::ExitCode;
use crate::env::Environment;

/// Command that is not a builtin, resolved to a program on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    name: String,
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    /// Look up `argv[0]` and keep the rest as arguments.
    ///
    /// Returns `None` for an empty argument list or a name that does not
    /// resolve to an executable file.
    pub fn resolve(env: &Environment, argv: &[String]) -> Option<Self> {
        let (name, args) = argv.split_first()?;
        let program = resolve(env, name)?;
        Some(Self {
            name: name.clone(),
            program,
            args: args.to_vec(),
        })
    }

    /// The name the user typed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Build a process description that runs in the shell's environment.
    ///
    /// Standard streams are left at their defaults; callers wire them up. The
    /// child drops the shell's SIGINT/SIGTSTP block before `exec`.
    pub fn to_command(&self, env: &Environment) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.name);
            // SAFETY: the hook only calls async-signal-safe functions and
            // touches no state shared with the parent.
            unsafe {
                cmd.pre_exec(crate::signals::unblock_interactive_signals);
            }
        }
        cmd.args(&self.args)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir);
        cmd
    }
}

/// Resolve `name` to an executable path using the shell's `PATH` and
/// working directory.
///
/// Relative paths with a directory component are resolved against
/// `env.current_dir`, so they follow `cd` even though child processes are
/// started from the parent's view of the filesystem.
pub fn resolve(env: &Environment, name: &str) -> Option<PathBuf> {
    let search_paths = env.get_var("PATH").unwrap_or_default();
    let path = Path::new(name);
    let anchored;
    let path = if path.is_relative() && path.components().nth(1).is_some() {
        anchored = env.current_dir.join(path);
        anchored.as_path()
    } else {
        path
    };
    find_command_path(OsStr::new(&search_paths), path).map(Cow::into_owned)
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(search_paths) {
        let path = dir.join(cmd);
        if let Some(path) = find_by_path(&path) {
            return Some(path.to_owned());
        }
    }
    None
}

#[cfg(unix)]
fn find_by_path(path: &Path) -> Option<&Path> {
    use std::os::unix::fs::PermissionsExt;
    let meta = std::fs::metadata(path).ok()?;
    if meta.is_file() && meta.permissions().mode() & 0o111 != 0 {
        Some(path)
    } else {
        None
    }
}

#[cfg(not(unix))]
fn find_by_path(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}

/// Convert a child's exit status into a shell exit code.
pub fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    fn env_with_path(path: &str, current_dir: &Path) -> Environment {
        let mut env = Environment::new();
        env.set_var("PATH", path);
        env.current_dir = current_dir.to_path_buf();
        env
    }

    #[test]
    fn absolute_existing_sh() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr("/bin"), path).expect("Expected to find /bin/sh");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    fn absolute_nonexisting() {
        let path = Path::new("/bin/nonexisting");
        assert!(find_command_path(osstr("/bin"), path).is_none());
    }

    #[test]
    fn single_component_found_in_path() {
        let found = find_command_path(osstr("/nonexistent/dir:/bin"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    fn single_component_not_found_in_path() {
        assert!(find_command_path(osstr("/bin"), Path::new("nonexisting")).is_none());
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(osstr("/bin"), Path::new("")).is_none());
    }

    #[test]
    fn non_executable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes");
        fs::write(&file, "not a program").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        let search = dir.path().as_os_str().to_owned();
        assert!(find_command_path(&search, Path::new("notes")).is_none());
    }

    #[test]
    fn relative_path_follows_shell_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        let script = dir.path().join("bin").join("tool");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let env = env_with_path("/bin", dir.path());
        assert_eq!(resolve(&env, "bin/tool"), Some(script));
        assert_eq!(resolve(&env, "bin/missing"), None);
    }

    #[test]
    fn resolve_uses_environment_path() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_with_path("/bin", dir.path());
        assert_eq!(resolve(&env, "sh"), Some(PathBuf::from("/bin/sh")));

        let env = env_with_path(dir.path().to_str().unwrap(), dir.path());
        assert_eq!(resolve(&env, "sh"), None);
    }

    #[test]
    fn external_command_keeps_typed_name() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_with_path("/bin", dir.path());
        let argv = vec!["sh".to_string(), "-c".to_string(), "true".to_string()];
        let cmd = ExternalCommand::resolve(&env, &argv).expect("sh should resolve");
        assert_eq!(cmd.name(), "sh");
        assert_eq!(cmd.program(), Path::new("/bin/sh"));

        let status = cmd.to_command(&env).status().unwrap();
        assert_eq!(exit_code(status), 0);
    }

    #[test]
    fn external_command_rejects_unknown_or_empty() {
        let env = Environment::new();
        assert!(ExternalCommand::resolve(&env, &[]).is_none());
        assert!(ExternalCommand::resolve(&env, &["msh-no-such-program".to_string()]).is_none());
    }

    #[test]
    fn signal_exit_maps_to_128_plus_signal() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 128 + 9);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
    }
}
