use super::ShellProxy;
use jsh_types::{Context, ExitStatus};

pub fn description() -> &'static str {
    "Resume a stopped job in the background"
}

/// `bg JID` — continue the job with that id in the background.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    if argv.len() != 2 || argv[1].parse::<i32>().is_err() {
        ctx.write_stderr("usage: bg JID").ok();
        return ExitStatus::ExitedWith(1);
    }

    match proxy.dispatch(ctx, "bg", argv) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => {
            ctx.write_stderr(&format!("bg: {err}")).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}
