use super::ShellProxy;
use jsh_types::{Context, ExitStatus};

pub fn description() -> &'static str {
    "Change the current working directory"
}

/// `cd [PATH]` — PATH defaults to the user's home directory; a leading `~`
/// is expanded to home.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let dir = match argv.get(1).map(|s| s.as_str()) {
        Some(dir) if dir.starts_with('~') => shellexpand::tilde(dir).to_string(),
        Some(dir) => dir.to_string(),
        None => match dirs::home_dir() {
            Some(home_dir) => home_dir.to_string_lossy().into_owned(),
            None => String::from("/"),
        },
    };

    match proxy.changepwd(&dir) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => {
            ctx.write_stderr(&format!("cd: {}: {}", err, dir)).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}
