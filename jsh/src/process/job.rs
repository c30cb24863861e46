//! A job: one entered command line, launched as one process group.

use anyhow::{Context as _, Result};
use jsh_types::Context;
use libc::STDERR_FILENO;
use nix::sys::signal::Signal;
use nix::unistd::{close, isatty, pipe, setpgid, tcsetpgrp, Pid};
use std::os::unix::io::RawFd;
use tracing::debug;

use super::fork::fork_process;
use super::process::Process;
use super::redirect::{RedirectSpec, StdioSet};
use super::signal::send_signal_to_group;
use super::state::{JobStatus, ProcessState};
use super::wait::{is_job_completed, is_job_stopped, wait_group, WaitEvent};
use crate::shell::SHELL_TERMINAL;

#[derive(Debug)]
pub struct Job {
    /// The original trimmed line, shown verbatim by `jobs` and in status
    /// lines.
    pub cmd: String,
    /// Process-group id; equals the first stage's pid once launched, and
    /// doubles as the job id.
    pub pgid: Option<Pid>,
    pub processes: Vec<Process>,
    pub foreground: bool,
    pub redirect: RedirectSpec,
    shell_pgid: Pid,
}

impl Job {
    pub fn new(cmd: String, shell_pgid: Pid) -> Self {
        Job {
            cmd,
            pgid: None,
            processes: Vec::new(),
            foreground: true,
            redirect: RedirectSpec::default(),
            shell_pgid,
        }
    }

    /// Append a stage; every stage but the last feeds a pipe.
    pub fn push_process(&mut self, process: Process) {
        if let Some(last) = self.processes.last_mut() {
            last.has_pipe = true;
        }
        self.processes.push(process);
    }

    /// The job id handed to `fg`/`bg`/`kill`: the group id's raw value.
    pub fn jid(&self) -> i32 {
        self.pgid.map(|pgid| pgid.as_raw()).unwrap_or(0)
    }

    pub fn status(&self) -> JobStatus {
        if is_job_completed(self) {
            JobStatus::Done
        } else if is_job_stopped(self) {
            JobStatus::Stopped
        } else {
            JobStatus::Running
        }
    }

    /// Exit code of the pipeline: the last stage's code, or its signal
    /// number when it was killed by one.
    pub fn last_exit_code(&self) -> i32 {
        match self.processes.last().map(|p| p.state) {
            Some(ProcessState::Completed(_, Some(signal))) => signal as i32,
            Some(ProcessState::Completed(code, None)) => code as i32,
            _ => 0,
        }
    }

    /// The signal that killed the last stage, if any.
    pub fn termination_signal(&self) -> Option<Signal> {
        match self.processes.last().map(|p| p.state) {
            Some(ProcessState::Completed(_, signal)) => signal,
            _ => None,
        }
    }

    /// Fork every stage. Pipes are allocated up front; each stage joins
    /// the group of the first (the child makes the same `setpgid` call so
    /// neither ordering of the race loses); the parent closes each pipe
    /// once both of its users have been forked. The resolved redirection
    /// descriptors stay open in the parent until the caller drops `stdio`.
    pub fn launch(&mut self, ctx: &Context, stdio: &StdioSet) -> Result<()> {
        let stage_count = self.processes.len();
        debug!("launch job '{}' with {} stage(s)", self.cmd, stage_count);

        let mut pipes: Vec<(RawFd, RawFd)> = Vec::with_capacity(stage_count.saturating_sub(1));
        for _ in 1..stage_count {
            pipes.push(pipe().context("failed pipe")?);
        }

        let mut inherited_fds: Vec<RawFd> = pipes.iter().flat_map(|&(r, w)| [r, w]).collect();
        inherited_fds.extend(stdio.raw_fds());

        for i in 0..stage_count {
            let stdin = if i == 0 { stdio.infile() } else { pipes[i - 1].0 };
            let stdout = if i + 1 == stage_count {
                stdio.outfile()
            } else {
                pipes[i].1
            };
            let stderr = if i + 1 == stage_count {
                stdio.errfile()
            } else {
                STDERR_FILENO
            };

            let child = fork_process(
                ctx,
                self.pgid,
                &mut self.processes[i],
                stdin,
                stdout,
                stderr,
                &inherited_fds,
            )?;
            if self.pgid.is_none() {
                self.pgid = Some(child);
                debug!("job '{}' pgid {}", self.cmd, child);
            }
            // Parent side of the setpgid race; failure after the child has
            // already exec'd is benign.
            let _ = setpgid(child, self.pgid.unwrap_or(child));

            if i > 0 {
                let (read_end, write_end) = pipes[i - 1];
                close(read_end).context("failed close")?;
                close(write_end).context("failed close")?;
            }
        }
        Ok(())
    }

    /// Hand the terminal to the job, optionally continue it, wait until it
    /// finishes or stops, and take the terminal back. The terminal is
    /// restored on every path; losing it would leave the shell unable to
    /// read further input.
    pub fn put_in_foreground(&mut self, send_cont: bool) -> Result<()> {
        debug!("put_in_foreground: jid {} cont {}", self.jid(), send_cont);
        let interactive = isatty(SHELL_TERMINAL).unwrap_or(false);

        if interactive {
            if let Some(pgid) = self.pgid {
                if let Err(err) = tcsetpgrp(SHELL_TERMINAL, pgid) {
                    debug!("tcsetpgrp to job failed: {}", err);
                }
            }
        }

        let result = if send_cont {
            self.send_cont()
        } else {
            Ok(())
        };
        if result.is_ok() {
            self.wait_job();
        }

        if interactive {
            if let Err(err) = tcsetpgrp(SHELL_TERMINAL, self.shell_pgid) {
                debug!("tcsetpgrp to shell failed: {}", err);
            }
        }
        result
    }

    pub fn put_in_background(&mut self, send_cont: bool) -> Result<()> {
        debug!("put_in_background: jid {} cont {}", self.jid(), send_cont);
        if send_cont {
            self.send_cont()?;
        }
        Ok(())
    }

    fn send_cont(&self) -> Result<()> {
        if let Some(pgid) = self.pgid {
            send_signal_to_group(pgid, Signal::SIGCONT).context("failed send SIGCONT")?;
        }
        Ok(())
    }

    /// Blocking wait on the whole group until the job is done or stopped.
    fn wait_job(&mut self) {
        let pgid = match self.pgid {
            Some(pgid) => pgid,
            None => return,
        };
        loop {
            match wait_group(pgid, false) {
                WaitEvent::Changed(pid, state) => self.set_process_state(pid, state),
                WaitEvent::Continued(pid) => self.set_process_state(pid, ProcessState::Running),
                WaitEvent::NoChildren => {
                    self.mark_remaining_completed();
                    break;
                }
                WaitEvent::StillAlive => break,
            }
            if is_job_completed(self) || is_job_stopped(self) {
                break;
            }
        }
    }

    /// Drain all pending state changes without blocking. Called by the
    /// reaper at the top of each REPL iteration.
    pub fn poll(&mut self) {
        let pgid = match self.pgid {
            Some(pgid) => pgid,
            None => return,
        };
        loop {
            match wait_group(pgid, true) {
                WaitEvent::Changed(pid, state) => self.set_process_state(pid, state),
                WaitEvent::Continued(pid) => self.set_process_state(pid, ProcessState::Running),
                WaitEvent::StillAlive => break,
                WaitEvent::NoChildren => {
                    self.mark_remaining_completed();
                    break;
                }
            }
        }
    }

    fn set_process_state(&mut self, pid: Pid, state: ProcessState) {
        for process in self.processes.iter_mut() {
            if process.pid == Some(pid) {
                debug!("{} ({}) -> {:?}", process.cmd, pid, state);
                process.state = state;
                return;
            }
        }
    }

    /// The group has no waitable members left; whatever we never observed
    /// exiting is gone too.
    fn mark_remaining_completed(&mut self) {
        for process in self.processes.iter_mut() {
            if !process.state.is_completed() {
                process.state = ProcessState::Completed(1, None);
            }
        }
    }
}
