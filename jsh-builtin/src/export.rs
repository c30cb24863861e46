use super::ShellProxy;
use jsh_types::{Context, ExitStatus};

pub fn description() -> &'static str {
    "Set an environment variable for child processes"
}

/// `export NAME[=VALUE]` — VALUE defaults to the empty string; a leading
/// `=` is invalid.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    if argv.len() < 2 {
        ctx.write_stderr("usage: export NAME[=VALUE]").ok();
        return ExitStatus::ExitedWith(1);
    }

    for arg in &argv[1..] {
        if arg.starts_with('=') {
            ctx.write_stderr(&format!("export: {}: invalid variable name", arg))
                .ok();
            return ExitStatus::ExitedWith(1);
        }
        match arg.split_once('=') {
            Some((name, value)) => proxy.set_env_var(name.to_string(), value.to_string()),
            None => proxy.set_env_var(arg.to_string(), String::new()),
        }
    }

    ExitStatus::ExitedWith(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, RecordingProxy};

    #[test]
    fn name_value_pair_is_exported() {
        let ctx = test_context();
        let mut proxy = RecordingProxy::default();

        let status = command(
            &ctx,
            vec!["export".to_string(), "FOO=bar".to_string()],
            &mut proxy,
        );

        assert_eq!(status, ExitStatus::ExitedWith(0));
        assert_eq!(proxy.env, vec![("FOO".to_string(), "bar".to_string())]);
    }

    #[test]
    fn missing_value_defaults_to_empty() {
        let ctx = test_context();
        let mut proxy = RecordingProxy::default();

        command(&ctx, vec!["export".to_string(), "FOO".to_string()], &mut proxy);

        assert_eq!(proxy.env, vec![("FOO".to_string(), String::new())]);
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let ctx = test_context();
        let mut proxy = RecordingProxy::default();

        command(
            &ctx,
            vec!["export".to_string(), "FOO=a=b".to_string()],
            &mut proxy,
        );

        assert_eq!(proxy.env, vec![("FOO".to_string(), "a=b".to_string())]);
    }

    #[test]
    fn leading_equals_is_rejected() {
        let ctx = test_context();
        let mut proxy = RecordingProxy::default();

        let status = command(
            &ctx,
            vec!["export".to_string(), "=bar".to_string()],
            &mut proxy,
        );

        assert_eq!(status, ExitStatus::ExitedWith(1));
        assert!(proxy.env.is_empty());
    }

    #[test]
    fn no_arguments_is_a_usage_error() {
        let ctx = test_context();
        let mut proxy = RecordingProxy::default();

        let status = command(&ctx, vec!["export".to_string()], &mut proxy);

        assert_eq!(status, ExitStatus::ExitedWith(1));
    }
}
