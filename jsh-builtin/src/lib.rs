use anyhow::Result;
use jsh_types::{Context, ExitStatus};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

mod bg;
mod cd;
mod exit;
mod export;
mod fg;
mod help;
mod jobs;
mod kill;

/// Interface built-in commands use to reach back into the shell.
///
/// Keeps the builtin crate decoupled from the shell's internals: job
/// control and directory changes are dispatched through this trait rather
/// than through concrete shell types.
pub trait ShellProxy {
    /// Request shell termination with the given exit code.
    fn exit_shell(&mut self, code: i32);

    /// Hand a command that needs the job table (`fg`, `bg`, `jobs`) to the
    /// shell's own dispatcher.
    fn dispatch(&mut self, ctx: &Context, cmd: &str, argv: Vec<String>) -> Result<()>;

    /// Change the current working directory.
    fn changepwd(&mut self, path: &str) -> Result<()>;

    /// Set an environment variable exported to child processes.
    fn set_env_var(&mut self, key: String, value: String);

    /// Exit status of the most recently completed command.
    fn last_exit_status(&self) -> i32;
}

/// Signature every built-in command conforms to.
pub type BuiltinCommand =
    fn(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus;

static BUILTIN_COMMAND: Lazy<Mutex<HashMap<&'static str, BuiltinCommand>>> = Lazy::new(|| {
    let mut builtin = HashMap::new();

    builtin.insert("bg", bg::command as BuiltinCommand);
    builtin.insert("cd", cd::command as BuiltinCommand);
    builtin.insert("exit", exit::command as BuiltinCommand);
    builtin.insert("export", export::command as BuiltinCommand);
    builtin.insert("fg", fg::command as BuiltinCommand);
    builtin.insert("help", help::command as BuiltinCommand);
    builtin.insert("jobs", jobs::command as BuiltinCommand);
    builtin.insert("kill", kill::command as BuiltinCommand);

    Mutex::new(builtin)
});

/// Look up a built-in command function by name.
pub fn get_command(name: &str) -> Option<BuiltinCommand> {
    match BUILTIN_COMMAND.lock() {
        Ok(builtin) => builtin.get(name).copied(),
        Err(_) => None,
    }
}

/// All built-in names with their one-line descriptions, in display order.
pub fn get_all_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("bg", bg::description()),
        ("cd", cd::description()),
        ("exit", exit::description()),
        ("export", export::description()),
        ("fg", fg::description()),
        ("help", help::description()),
        ("jobs", jobs::description()),
        ("kill", kill::description()),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ShellProxy;
    use anyhow::{bail, Result};
    use jsh_types::Context;

    /// Records proxy calls so builtin tests can assert on them.
    #[derive(Default)]
    pub struct RecordingProxy {
        pub exited: Option<i32>,
        pub dispatched: Vec<(String, Vec<String>)>,
        pub pwd: Option<String>,
        pub env: Vec<(String, String)>,
        pub last_status: i32,
        pub fail_dispatch: bool,
    }

    impl ShellProxy for RecordingProxy {
        fn exit_shell(&mut self, code: i32) {
            self.exited = Some(code);
        }

        fn dispatch(&mut self, _ctx: &Context, cmd: &str, argv: Vec<String>) -> Result<()> {
            if self.fail_dispatch {
                bail!("no such job: 42");
            }
            self.dispatched.push((cmd.to_string(), argv));
            Ok(())
        }

        fn changepwd(&mut self, path: &str) -> Result<()> {
            self.pwd = Some(path.to_string());
            Ok(())
        }

        fn set_env_var(&mut self, key: String, value: String) {
            self.env.push((key, value));
        }

        fn last_exit_status(&self) -> i32 {
            self.last_status
        }
    }

    pub fn test_context() -> Context {
        let pid = nix::unistd::getpid();
        Context::new(pid, pid, None, false)
    }
}
