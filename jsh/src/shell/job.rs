//! Job-table polling: the reaper entry point run at the top of each REPL
//! iteration.

use tracing::debug;

use super::Shell;
use crate::process::signal::signal_name;
use crate::process::state::JobStatus;

/// Drain pending child state changes for every live job, print the status
/// transitions, and retire finished jobs. Removal happens in place, so the
/// loop re-checks the current index after taking a job out.
pub fn check_job_state(shell: &mut Shell) {
    let mut i = 0;
    while i < shell.wait_jobs.len() {
        let job = &mut shell.wait_jobs[i];
        let old_status = job.status();
        job.poll();
        let new_status = job.status();

        if new_status == JobStatus::Done {
            let job = shell.wait_jobs.remove(i);
            debug!("retire job {} ('{}')", job.jid(), job.cmd);
            match job.termination_signal() {
                Some(signal) => println!(
                    "{} Exited ({}) {}",
                    job.jid(),
                    signal_name(signal),
                    job.cmd
                ),
                None => println!("{} Exited ({}) {}", job.jid(), job.last_exit_code(), job.cmd),
            }
            shell.last_exit_status = job.last_exit_code();
            continue;
        }

        match (old_status, new_status) {
            (JobStatus::Running, JobStatus::Stopped) => {
                println!("{} Stopped {}", job.jid(), job.cmd);
            }
            (JobStatus::Stopped, JobStatus::Running) => {
                println!("{} Continued {}", job.jid(), job.cmd);
            }
            _ => {}
        }
        i += 1;
    }
}
