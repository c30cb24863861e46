use anyhow::Result;
use clap::Parser;
use jsh::repl::Repl;
use jsh::shell::{Shell, APP_NAME, SHELL_TERMINAL};
use jsh_types::Context;
use nix::sys::termios::tcgetattr;
use nix::unistd::isatty;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Evaluate a single command line and exit
    #[arg(short, long)]
    command: Option<String>,
}

fn main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("failed to initialize tracing: {err}");
        return ExitCode::FAILURE;
    }
    let cli = Cli::parse();

    let mut shell = Shell::new();
    shell.set_signals();

    let interactive = cli.command.is_none() && isatty(SHELL_TERMINAL).unwrap_or(false);
    let shell_tmode = tcgetattr(SHELL_TERMINAL).ok();
    let mut ctx = Context::new(shell.pid, shell.pgid, shell_tmode, interactive);

    let result = match cli.command.as_deref() {
        Some(command) => run_command(&mut shell, &mut ctx, command),
        None => run_interactive(&mut shell, &mut ctx),
    };

    match result {
        Ok(code) => ExitCode::from((code & 0xff) as u8),
        Err(err) => {
            eprintln!("{}: {:#}", APP_NAME, err);
            ExitCode::FAILURE
        }
    }
}

/// Debug logging goes to the file named by `JSH_LOG`; without it the
/// subscriber is never installed and the session stays clean.
fn init_tracing() -> Result<()> {
    if let Ok(path) = std::env::var("JSH_LOG") {
        let log_file = std::sync::Arc::new(std::fs::File::create(path)?);
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(log_file)
            .init();
    }
    Ok(())
}

fn run_command(shell: &mut Shell, ctx: &mut Context, command: &str) -> Result<i32> {
    debug!("command mode: {}", command);
    let code = shell.eval_str(ctx, command, false)?;
    Ok(shell.exited.unwrap_or(code))
}

fn run_interactive(shell: &mut Shell, ctx: &mut Context) -> Result<i32> {
    debug!("interactive mode");
    shell.prepare_terminal()?;
    ctx.shell_pgid = shell.pgid;
    let mut repl = Repl::new(shell);
    repl.run_interactive(ctx)
}
