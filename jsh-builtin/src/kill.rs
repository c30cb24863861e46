use super::ShellProxy;
use getopts::Options;
use jsh_types::{Context, ExitStatus};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

pub fn description() -> &'static str {
    "Send a signal to a process or process group"
}

/// Parse a signal given as a decimal number or a name from the portable
/// set, with or without the `SIG` prefix.
fn parse_signal(spec: &str) -> Option<Signal> {
    if let Ok(num) = spec.parse::<i32>() {
        return Signal::try_from(num).ok();
    }
    let upper = spec.to_uppercase();
    let name = upper.strip_prefix("SIG").unwrap_or(&upper);
    match name {
        "HUP" => Some(Signal::SIGHUP),
        "INT" => Some(Signal::SIGINT),
        "TERM" => Some(Signal::SIGTERM),
        "KILL" => Some(Signal::SIGKILL),
        "STOP" => Some(Signal::SIGSTOP),
        "CONT" => Some(Signal::SIGCONT),
        "QUIT" => Some(Signal::SIGQUIT),
        "ALRM" => Some(Signal::SIGALRM),
        "TSTP" => Some(Signal::SIGTSTP),
        _ => None,
    }
}

/// `kill [-s SIG] PID` — default signal is SIGTERM. PID semantics are those
/// of kill(2): 0 signals the caller's group, negative values signal the
/// process group |PID|.
pub fn command(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    let mut opts = Options::new();
    opts.optopt("s", "signal", "signal to send (name or number)", "SIG");

    let matches = match opts.parse(&argv[1..]) {
        Ok(matches) => matches,
        Err(err) => {
            ctx.write_stderr(&format!("kill: {}", err)).ok();
            return ExitStatus::ExitedWith(1);
        }
    };

    let sig = match matches.opt_str("s") {
        Some(spec) => match parse_signal(&spec) {
            Some(sig) => sig,
            None => {
                ctx.write_stderr(&format!("kill: invalid signal: {}", spec))
                    .ok();
                return ExitStatus::ExitedWith(1);
            }
        },
        None => Signal::SIGTERM,
    };

    if matches.free.is_empty() {
        ctx.write_stderr("usage: kill [-s SIG] PID").ok();
        return ExitStatus::ExitedWith(1);
    }

    let mut exit_code = 0;
    for pid_str in &matches.free {
        match pid_str.parse::<i32>() {
            Ok(pid_num) => {
                if let Err(err) = signal::kill(Pid::from_raw(pid_num), sig) {
                    ctx.write_stderr(&format!("kill: ({}) - {}", pid_num, err))
                        .ok();
                    exit_code = 1;
                }
            }
            Err(_) => {
                ctx.write_stderr(&format!("kill: invalid pid: {}", pid_str))
                    .ok();
                exit_code = 1;
            }
        }
    }

    ExitStatus::ExitedWith(exit_code)
}
