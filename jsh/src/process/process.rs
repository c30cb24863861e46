//! A single pipeline stage and its child-side launch path.

use anyhow::{Context as _, Result};
use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::{close, dup2, execvp, getpid, setpgid, tcsetpgrp, Pid};
use std::ffi::CString;
use std::os::unix::io::RawFd;

use super::state::ProcessState;
use crate::shell::SHELL_TERMINAL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub cmd: String,
    pub argv: Vec<String>,
    pub pid: Option<Pid>,
    pub state: ProcessState,
    pub has_pipe: bool,
}

fn copy_fd(src: RawFd, dst: RawFd) -> Result<()> {
    if src != dst {
        dup2(src, dst).context("failed dup2")?;
        close(src).context("failed close")?;
    }
    Ok(())
}

impl Process {
    pub fn new(argv: Vec<String>) -> Self {
        let cmd = argv.first().cloned().unwrap_or_default();
        Process {
            cmd,
            argv,
            pid: None,
            state: ProcessState::Running,
            has_pipe: false,
        }
    }

    /// Restore default dispositions for the signals the shell ignores
    /// (plus SIGCHLD), per the GNU libc job-control recipe.
    fn set_signals(&self) -> Result<()> {
        let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        unsafe {
            sigaction(Signal::SIGINT, &action).context("failed sigaction SIGINT")?;
            sigaction(Signal::SIGQUIT, &action).context("failed sigaction SIGQUIT")?;
            sigaction(Signal::SIGTSTP, &action).context("failed sigaction SIGTSTP")?;
            sigaction(Signal::SIGTTIN, &action).context("failed sigaction SIGTTIN")?;
            sigaction(Signal::SIGTTOU, &action).context("failed sigaction SIGTTOU")?;
            sigaction(Signal::SIGCHLD, &action).context("failed sigaction SIGCHLD")?;
            sigaction(Signal::SIGPIPE, &action).context("failed sigaction SIGPIPE")?;
        }
        Ok(())
    }

    /// Child side, between `fork` and `exec`. Joins the job's process
    /// group (the parent repeats the call to close the race), takes the
    /// terminal for foreground jobs, resets signal dispositions, wires the
    /// descriptors, and execs. Never returns.
    pub fn launch(
        &mut self,
        job_pgid: Option<Pid>,
        foreground: bool,
        interactive: bool,
        stdin: RawFd,
        stdout: RawFd,
        stderr: RawFd,
        inherited_fds: &[RawFd],
    ) -> Result<()> {
        let pid = getpid();
        let pgid = job_pgid.unwrap_or(pid);

        // Whichever of child and parent runs setpgid first wins; the
        // loser's error is benign.
        let _ = setpgid(pid, pgid);

        // Must happen while SIGTTOU is still ignored (inherited from the
        // shell), or this call would stop us.
        if interactive && foreground {
            let _ = tcsetpgrp(SHELL_TERMINAL, pgid);
        }

        self.set_signals()?;

        for fd in inherited_fds {
            if *fd != stdin && *fd != stdout && *fd != stderr {
                let _ = close(*fd);
            }
        }
        copy_fd(stdin, STDIN_FILENO)?;
        copy_fd(stdout, STDOUT_FILENO)?;
        copy_fd(stderr, STDERR_FILENO)?;

        let cmd = CString::new(self.cmd.clone()).context("failed new CString")?;
        let argv: Vec<CString> = self
            .argv
            .iter()
            .map(|a| CString::new(a.as_str()))
            .collect::<std::result::Result<_, _>>()
            .context("failed new CString")?;

        match execvp(&cmd, &argv) {
            Err(_) => {
                println!("{}: command not found", self.cmd);
                std::process::exit(1);
            }
            Ok(_) => unreachable!(),
        }
    }
}
