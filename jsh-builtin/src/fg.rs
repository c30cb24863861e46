use super::ShellProxy;
use jsh_types::{Context, ExitStatus};

pub fn description() -> &'static str {
    "Bring a job to the foreground"
}

/// `fg JID` — continue the job with that id in the foreground.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    if argv.len() != 2 || argv[1].parse::<i32>().is_err() {
        ctx.write_stderr("usage: fg JID").ok();
        return ExitStatus::ExitedWith(1);
    }

    match proxy.dispatch(ctx, "fg", argv) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => {
            ctx.write_stderr(&format!("fg: {err}")).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}
