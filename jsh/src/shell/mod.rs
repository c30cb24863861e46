pub mod job;

use anyhow::{Context as _, Result};
use jsh_builtin::{BuiltinCommand, ShellProxy};
use jsh_types::{Context, JshError};
use libc::{c_int, STDIN_FILENO};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::{getpgrp, getpid, isatty, setpgid, tcsetpgrp, Pid};
use tracing::{debug, warn};

use crate::parser::{self, Pipeline};
use crate::process::signal::signal_name;
use crate::process::wait::is_job_completed;
use crate::process::{Job, Process};

pub const APP_NAME: &str = "jsh";
pub const SHELL_TERMINAL: c_int = STDIN_FILENO;

pub struct Shell {
    pub pid: Pid,
    pub pgid: Pid,
    /// Live jobs, keyed by their group id. Slots disappear as the reaper
    /// retires jobs.
    pub wait_jobs: Vec<Job>,
    pub last_exit_status: i32,
    /// Set by the `exit` builtin; the REPL leaves its loop when this is
    /// populated.
    pub exited: Option<i32>,
}

impl Shell {
    pub fn new() -> Self {
        let pid = getpid();
        Shell {
            pid,
            pgid: pid,
            wait_jobs: Vec::new(),
            last_exit_status: 0,
            exited: None,
        }
    }

    /// Ignore the signals that would otherwise kill or stop the shell
    /// itself; they must only reach the foreground job.
    pub fn set_signals(&mut self) {
        let action = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
        unsafe {
            for signal in [
                Signal::SIGINT,
                Signal::SIGQUIT,
                Signal::SIGTSTP,
                Signal::SIGTTIN,
                Signal::SIGTTOU,
                Signal::SIGPIPE,
            ] {
                if let Err(err) = sigaction(signal, &action) {
                    warn!("failed to ignore {:?}: {}", signal, err);
                }
            }
        }
    }

    /// Take ownership of the controlling terminal: put the shell in its
    /// own process group and make that group the foreground group.
    pub fn prepare_terminal(&mut self) -> Result<()> {
        if !isatty(SHELL_TERMINAL).unwrap_or(false) {
            return Ok(());
        }
        if let Err(err) = setpgid(self.pid, self.pid) {
            // Already a session or group leader.
            debug!("setpgid on shell: {}", err);
        }
        self.pgid = getpgrp();
        tcsetpgrp(SHELL_TERMINAL, self.pgid).context("failed tcsetpgrp")?;
        Ok(())
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{msg}");
    }

    /// Evaluate one complete logical line.
    ///
    /// Parse and redirection failures are reported and absorbed here (the
    /// REPL continues); an `Err` from this function means the launch
    /// itself failed mid-flight and the shell must exit.
    pub fn eval_str(
        &mut self,
        ctx: &mut Context,
        input: &str,
        force_background: bool,
    ) -> Result<i32> {
        let input = input.trim();
        debug!("eval: '{}'", input);

        let pipeline = match parser::parse_line(input) {
            Ok(Some(pipeline)) => pipeline,
            Ok(None) => return Ok(self.last_exit_status),
            Err(err) => {
                self.print_error(&err.to_string());
                self.last_exit_status = 1;
                return Ok(1);
            }
        };

        // Single-stage builtins run in-process, no fork.
        if pipeline.stages.len() == 1 {
            if let Some(cmd_fn) = jsh_builtin::get_command(&pipeline.stages[0][0]) {
                return self.run_builtin(ctx, cmd_fn, pipeline);
            }
        }

        let mut job = Job::new(input.to_string(), self.pgid);
        job.foreground = pipeline.foreground && !force_background;
        job.redirect = pipeline.redirect;
        for argv in pipeline.stages {
            job.push_process(Process::new(argv));
        }

        // All three streams resolve before any fork; a failure here
        // abandons the job with no children created.
        let stdio = match job.redirect.resolve() {
            Ok(stdio) => stdio,
            Err(err) => {
                self.print_error(&err.to_string());
                self.last_exit_status = 1;
                return Ok(1);
            }
        };

        ctx.foreground = job.foreground;
        job.launch(ctx, &stdio)?;
        // The children hold their own copies now.
        drop(stdio);
        ctx.foreground = true;

        if job.foreground {
            job.put_in_foreground(false)?;
            self.finish_foreground(job);
        } else {
            self.wait_jobs.push(job);
        }
        Ok(self.last_exit_status)
    }

    /// Run a builtin with the resolved redirections carried in the
    /// context, leaving the shell's own stdio untouched.
    fn run_builtin(
        &mut self,
        ctx: &mut Context,
        cmd_fn: BuiltinCommand,
        pipeline: Pipeline,
    ) -> Result<i32> {
        let stdio = match pipeline.redirect.resolve() {
            Ok(stdio) => stdio,
            Err(err) => {
                self.print_error(&err.to_string());
                self.last_exit_status = 1;
                return Ok(1);
            }
        };
        ctx.infile = stdio.infile();
        ctx.outfile = stdio.outfile();
        ctx.errfile = stdio.errfile();

        let argv = pipeline.stages.into_iter().next().unwrap_or_default();
        debug!("run builtin: {:?}", argv);
        let status = cmd_fn(ctx, argv, self);

        ctx.reset();
        drop(stdio);

        self.last_exit_status = status.code();
        Ok(self.last_exit_status)
    }

    /// Post-foreground bookkeeping: a stopped job goes (back) into the
    /// table with a notice; a finished one records its exit status, with a
    /// status line only when a signal killed it.
    fn finish_foreground(&mut self, job: Job) {
        if is_job_completed(&job) {
            if let Some(signal) = job.termination_signal() {
                println!("{} Exited ({}) {}", job.jid(), signal_name(signal), job.cmd);
            }
            self.last_exit_status = job.last_exit_code();
        } else {
            println!("{} Stopped {}", job.jid(), job.cmd);
            self.wait_jobs.push(job);
        }
    }

    pub fn check_job_state(&mut self) {
        job::check_job_state(self);
    }

    fn find_job(&self, jid: i32) -> Option<usize> {
        self.wait_jobs.iter().position(|job| job.jid() == jid)
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellProxy for Shell {
    fn exit_shell(&mut self, code: i32) {
        // Reap anything already dead, then drop the table.
        for job in self.wait_jobs.iter_mut() {
            job.poll();
        }
        self.wait_jobs.clear();
        self.exited = Some(code);
    }

    fn dispatch(&mut self, ctx: &Context, cmd: &str, argv: Vec<String>) -> Result<()> {
        match cmd {
            "fg" => {
                let jid = argv
                    .get(1)
                    .and_then(|arg| arg.parse::<i32>().ok())
                    .context("job id required")?;
                let index = self.find_job(jid).ok_or(JshError::NoSuchJob(jid))?;
                let mut job = self.wait_jobs.remove(index);
                job.put_in_foreground(true)?;
                self.finish_foreground(job);
                Ok(())
            }
            "bg" => {
                let jid = argv
                    .get(1)
                    .and_then(|arg| arg.parse::<i32>().ok())
                    .context("job id required")?;
                let index = self.find_job(jid).ok_or(JshError::NoSuchJob(jid))?;
                self.wait_jobs[index].put_in_background(true)?;
                // The `Continued` notice is printed when the next poll
                // observes the WCONTINUED event.
                Ok(())
            }
            "jobs" => {
                ctx.write_stdout(&format!("{:<8}{:<13}{}", "JID", "STATUS", "COMMAND"))?;
                for job in &self.wait_jobs {
                    ctx.write_stdout(&format!(
                        "{:<8}{:<13}{}",
                        job.jid(),
                        job.status(),
                        job.cmd
                    ))?;
                }
                Ok(())
            }
            _ => {
                warn!("unknown dispatch: {}", cmd);
                Ok(())
            }
        }
    }

    fn changepwd(&mut self, path: &str) -> Result<()> {
        std::env::set_current_dir(path)?;
        Ok(())
    }

    fn set_env_var(&mut self, key: String, value: String) {
        std::env::set_var(key, value);
    }

    fn last_exit_status(&self) -> i32 {
        self.last_exit_status
    }
}
