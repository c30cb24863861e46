use nix::sys::signal::Signal;
use nix::unistd::Pid;

/// Per-stage lifecycle state, maintained by the reaper.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProcessState {
    Running,
    /// Exit code plus the terminating signal, if any.
    Completed(u8, Option<Signal>),
    Stopped(Pid, Signal),
}

impl ProcessState {
    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessState::Completed(_, _))
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessState::Stopped(_, _))
    }
}

/// Job-level status derived from the stage states; the label shown in the
/// jobs table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum JobStatus {
    Running,
    Stopped,
    Done,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            JobStatus::Running => formatter.write_str("Running"),
            JobStatus::Stopped => formatter.write_str("Stopped"),
            JobStatus::Done => formatter.write_str("Done"),
        }
    }
}
