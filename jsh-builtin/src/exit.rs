use super::ShellProxy;
use jsh_types::{Context, ExitStatus};

pub fn description() -> &'static str {
    "Exit the shell"
}

/// `exit [N]` — N defaults to the last command's exit status.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let code = match argv.get(1) {
        Some(arg) => match arg.parse::<i32>() {
            Ok(code) => code,
            Err(_) => {
                ctx.write_stderr(&format!("exit: {}: numeric argument required", arg))
                    .ok();
                return ExitStatus::ExitedWith(2);
            }
        },
        None => proxy.last_exit_status(),
    };

    proxy.exit_shell(code);
    ExitStatus::ExitedWith(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, RecordingProxy};

    #[test]
    fn explicit_code_is_propagated() {
        let ctx = test_context();
        let mut proxy = RecordingProxy::default();

        let status = command(&ctx, vec!["exit".to_string(), "3".to_string()], &mut proxy);

        assert_eq!(status, ExitStatus::ExitedWith(3));
        assert_eq!(proxy.exited, Some(3));
    }

    #[test]
    fn default_code_is_last_exit_status() {
        let ctx = test_context();
        let mut proxy = RecordingProxy {
            last_status: 7,
            ..Default::default()
        };

        let status = command(&ctx, vec!["exit".to_string()], &mut proxy);

        assert_eq!(status, ExitStatus::ExitedWith(7));
        assert_eq!(proxy.exited, Some(7));
    }

    #[test]
    fn non_numeric_argument_is_a_usage_error() {
        let ctx = test_context();
        let mut proxy = RecordingProxy::default();

        let status = command(
            &ctx,
            vec!["exit".to_string(), "soon".to_string()],
            &mut proxy,
        );

        assert_eq!(status, ExitStatus::ExitedWith(2));
        assert_eq!(proxy.exited, None);
    }
}
