//! Prompt rendering: `jsh:<cwd>$ ` with the home directory shown as `~`.

use crate::shell::APP_NAME;
use std::path::Path;

pub fn render() -> String {
    let cwd = std::env::current_dir()
        .map(|path| display_path(&path))
        .unwrap_or_else(|_| String::from("?"));
    format!("{}:{}$ ", APP_NAME, cwd)
}

fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return String::from("~");
            }
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_collapses_to_tilde() {
        let home = match dirs::home_dir() {
            Some(home) => home,
            None => return,
        };
        assert_eq!(display_path(&home), "~");
        assert_eq!(display_path(&home.join("src")), "~/src");
    }

    #[test]
    fn paths_outside_home_are_unchanged() {
        assert_eq!(display_path(Path::new("/usr/local")), "/usr/local");
        assert_eq!(display_path(Path::new("/")), "/");
    }

    #[test]
    fn prompt_carries_program_name_and_dollar() {
        let prompt = render();
        assert!(prompt.starts_with("jsh:"));
        assert!(prompt.ends_with("$ "));
    }
}
