//! Non-destructive wrappers around `waitpid` and the job-status
//! predicates.

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, error};

use super::job::Job;
use super::state::ProcessState;

/// One observation from the group-wide wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaitEvent {
    /// A member changed state (exited, was signaled, or stopped).
    Changed(Pid, ProcessState),
    /// A stopped member resumed.
    Continued(Pid),
    /// No pending state change.
    StillAlive,
    /// The group has no waitable members left.
    NoChildren,
}

/// Wait on the whole process group `-pgid`. With `no_hang` the call never
/// blocks; without it, it blocks until some member changes state.
pub fn wait_group(pgid: Pid, no_hang: bool) -> WaitEvent {
    let mut options = WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
    if no_hang {
        options |= WaitPidFlag::WNOHANG;
    }
    let target = Pid::from_raw(-pgid.as_raw());

    loop {
        return match waitpid(target, Some(options)) {
            Ok(WaitStatus::Exited(pid, status)) => {
                debug!("waitpid: {} exited with {}", pid, status);
                WaitEvent::Changed(pid, ProcessState::Completed(status as u8, None))
            }
            Ok(WaitStatus::Signaled(pid, signal, _core)) => {
                debug!("waitpid: {} killed by {:?}", pid, signal);
                WaitEvent::Changed(pid, ProcessState::Completed(1, Some(signal)))
            }
            Ok(WaitStatus::Stopped(pid, signal)) => {
                debug!("waitpid: {} stopped by {:?}", pid, signal);
                WaitEvent::Changed(pid, ProcessState::Stopped(pid, signal))
            }
            Ok(WaitStatus::Continued(pid)) => {
                debug!("waitpid: {} continued", pid);
                WaitEvent::Continued(pid)
            }
            Ok(WaitStatus::StillAlive) => WaitEvent::StillAlive,
            Err(Errno::ECHILD) => WaitEvent::NoChildren,
            Err(Errno::EINTR) => continue,
            status => {
                error!("unexpected waitpid event: {:?}", status);
                WaitEvent::StillAlive
            }
        };
    }
}

pub fn is_job_completed(job: &Job) -> bool {
    job.processes.iter().all(|p| p.state.is_completed())
}

/// Every stage is either completed or stopped. Checked after
/// `is_job_completed`, so a true result means at least one stage is
/// actually stopped.
pub fn is_job_stopped(job: &Job) -> bool {
    job.processes
        .iter()
        .all(|p| p.state.is_completed() || p.state.is_stopped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::process::Process;
    use crate::process::state::JobStatus;
    use nix::sys::signal::Signal;
    use nix::unistd::getpgrp;

    fn init() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    fn job_with_states(states: &[ProcessState]) -> Job {
        let mut job = Job::new("test".to_string(), getpgrp());
        for (i, state) in states.iter().enumerate() {
            let mut process = Process::new(vec![format!("cmd{i}")]);
            process.state = *state;
            job.push_process(process);
        }
        job
    }

    #[test]
    fn running_stage_keeps_job_unstopped() {
        init();
        let job = job_with_states(&[
            ProcessState::Completed(0, None),
            ProcessState::Completed(0, None),
            ProcessState::Running,
        ]);
        assert!(!is_job_stopped(&job));
        assert!(!is_job_completed(&job));
        assert_eq!(job.status(), JobStatus::Running);
    }

    #[test]
    fn stopped_tail_stage_stops_the_job() {
        init();
        let job = job_with_states(&[
            ProcessState::Completed(0, None),
            ProcessState::Completed(0, None),
            ProcessState::Stopped(Pid::from_raw(10), Signal::SIGTSTP),
        ]);
        assert!(is_job_stopped(&job));
        assert!(!is_job_completed(&job));
        assert_eq!(job.status(), JobStatus::Stopped);
    }

    #[test]
    fn all_completed_means_done() {
        init();
        let job = job_with_states(&[
            ProcessState::Completed(0, None),
            ProcessState::Completed(0, None),
            ProcessState::Completed(0, None),
        ]);
        assert!(is_job_completed(&job));
        assert_eq!(job.status(), JobStatus::Done);
    }

    #[test]
    fn stopped_middle_stage_is_not_done() {
        init();
        let job = job_with_states(&[
            ProcessState::Completed(0, None),
            ProcessState::Stopped(Pid::from_raw(0), Signal::SIGSTOP),
            ProcessState::Completed(0, None),
        ]);
        assert!(!is_job_completed(&job));
        assert_eq!(job.status(), JobStatus::Stopped);
    }
}
