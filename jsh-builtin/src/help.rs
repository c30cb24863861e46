use super::{get_all_commands, ShellProxy};
use jsh_types::{Context, ExitStatus};

pub fn description() -> &'static str {
    "Show this help"
}

/// `help` — print the built-in command summary.
pub fn command(ctx: &Context, _argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    let mut help_text = String::from("Built-in commands:\n\n");
    for (cmd, description) in get_all_commands() {
        help_text.push_str(&format!("{:<12} {}\n", cmd, description));
    }
    help_text.push_str("\nAnything else is run as an external command.");

    match ctx.write_stdout(&help_text) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => {
            ctx.write_stderr(&format!("help: {err}")).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}
