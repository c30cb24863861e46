use anyhow::{Context as _, Result};
use jsh_types::Context;
use nix::unistd::{fork, ForkResult, Pid};
use std::os::unix::io::RawFd;
use tracing::debug;

use super::process::Process;

/// Fork one pipeline stage. The parent records and returns the child pid;
/// the child wires its descriptors and execs, exiting on any failure.
pub(crate) fn fork_process(
    ctx: &Context,
    job_pgid: Option<Pid>,
    process: &mut Process,
    stdin: RawFd,
    stdout: RawFd,
    stderr: RawFd,
    inherited_fds: &[RawFd],
) -> Result<Pid> {
    debug!(
        "fork {} (pgid: {:?}, foreground: {}, fds: {}/{}/{})",
        process.cmd, job_pgid, ctx.foreground, stdin, stdout, stderr
    );

    let fork_result = unsafe { fork().context("failed fork")? };
    match fork_result {
        ForkResult::Parent { child } => {
            process.pid = Some(child);
            Ok(child)
        }
        ForkResult::Child => {
            // No logging or allocation-heavy work here; we are between
            // fork and exec.
            if process
                .launch(
                    job_pgid,
                    ctx.foreground,
                    ctx.interactive,
                    stdin,
                    stdout,
                    stderr,
                    inherited_fds,
                )
                .is_err()
            {
                std::process::exit(1);
            }
            // launch execs or exits; this is unreachable in practice.
            std::process::exit(1);
        }
    }
}
