use anyhow::Result;
use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::sys::termios::Termios;
use nix::unistd::Pid;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::mem;
use std::os::unix::io::{FromRawFd, RawFd};
use thiserror::Error;

/// Error categories surfaced to the user by the REPL.
///
/// The `Display` strings are the exact lines the shell prints, so callers
/// format an error with `{}` and nothing else.
#[derive(Error, Debug)]
pub enum JshError {
    #[error("Invalid command syntax")]
    Parse,

    #[error("{0}: No such file or directory")]
    NoSuchFile(String),

    #[error("'{0}' cannot be opened")]
    RedirectOpen(String),

    #[error("no such job: {0}")]
    NoSuchJob(i32),
}

/// Result of one built-in invocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
    Running(Pid),
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::ExitedWith(code) => *code,
            ExitStatus::Running(_) => 0,
        }
    }
}

/// Per-evaluation execution context.
///
/// `infile`/`outfile`/`errfile` are the descriptors the current command
/// should use; redirections swap them before a launch and `reset` restores
/// the defaults afterwards. Built-ins write through these so a redirected
/// built-in never touches the shell's own stdio.
#[derive(Clone)]
pub struct Context {
    pub shell_pid: Pid,
    pub shell_pgid: Pid,
    pub shell_tmode: Option<Termios>,
    pub foreground: bool,
    pub interactive: bool,
    pub infile: RawFd,
    pub outfile: RawFd,
    pub errfile: RawFd,
}

impl Context {
    pub fn new(
        shell_pid: Pid,
        shell_pgid: Pid,
        shell_tmode: Option<Termios>,
        interactive: bool,
    ) -> Self {
        Context {
            shell_pid,
            shell_pgid,
            shell_tmode,
            foreground: true,
            interactive,
            infile: STDIN_FILENO,
            outfile: STDOUT_FILENO,
            errfile: STDERR_FILENO,
        }
    }

    pub fn write_stdout(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.outfile) };
        writeln!(&mut file, "{msg}")?;
        mem::forget(file);
        Ok(())
    }

    pub fn write_stderr(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.errfile) };
        writeln!(&mut file, "{msg}")?;
        mem::forget(file);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.foreground = true;
        self.infile = STDIN_FILENO;
        self.outfile = STDOUT_FILENO;
        self.errfile = STDERR_FILENO;
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("shell_pid", &self.shell_pid)
            .field("shell_pgid", &self.shell_pgid)
            .field("foreground", &self.foreground)
            .field("interactive", &self.interactive)
            .field("infile", &self.infile)
            .field("outfile", &self.outfile)
            .field("errfile", &self.errfile)
            .finish()
    }
}
