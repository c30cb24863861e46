use super::ShellProxy;
use jsh_types::{Context, ExitStatus};

pub fn description() -> &'static str {
    "List active jobs"
}

/// `jobs` — print the job table.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    match proxy.dispatch(ctx, "jobs", argv) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => {
            ctx.write_stderr(&format!("jobs: {err}")).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}
