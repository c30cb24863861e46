use anyhow::Result;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tracing::debug;

pub(crate) fn send_signal_to_group(pgid: Pid, signal: Signal) -> Result<()> {
    debug!("sending {:?} to pgid {}", signal, pgid);
    killpg(pgid, signal)?;
    Ok(())
}

/// Conventional name for a terminating signal, used in the
/// `Exited (<signal-name>)` status lines.
pub fn signal_name(signal: Signal) -> &'static str {
    match signal {
        Signal::SIGHUP => "Hangup",
        Signal::SIGINT => "Interrupt",
        Signal::SIGQUIT => "Quit",
        Signal::SIGILL => "Illegal instruction",
        Signal::SIGABRT => "Aborted",
        Signal::SIGFPE => "Floating point exception",
        Signal::SIGKILL => "Killed",
        Signal::SIGSEGV => "Segmentation fault",
        Signal::SIGPIPE => "Broken pipe",
        Signal::SIGALRM => "Alarm clock",
        Signal::SIGTERM => "Terminated",
        other => other.as_str(),
    }
}
