//! Pipeline-wide redirection spec and descriptor resolution.
//!
//! All three streams are resolved before any fork so an open failure
//! aborts the launch with no children created.

use jsh_types::JshError;
use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Truncate,
    Append,
}

/// At most one redirection per stream per pipeline. `stdin` applies to the
/// first stage, `stdout`/`stderr` to the last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectSpec {
    pub stdin: Option<String>,
    pub stdout: Option<(String, OutputMode)>,
    pub stderr: Option<(String, OutputMode)>,
}

/// The resolved descriptors. Files stay open while the launcher forks;
/// dropping this closes the parent's copies.
#[derive(Debug, Default)]
pub struct StdioSet {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
    pub stderr: Option<File>,
}

impl StdioSet {
    pub fn infile(&self) -> RawFd {
        self.stdin
            .as_ref()
            .map(|f| f.as_raw_fd())
            .unwrap_or(STDIN_FILENO)
    }

    pub fn outfile(&self) -> RawFd {
        self.stdout
            .as_ref()
            .map(|f| f.as_raw_fd())
            .unwrap_or(STDOUT_FILENO)
    }

    pub fn errfile(&self) -> RawFd {
        self.stderr
            .as_ref()
            .map(|f| f.as_raw_fd())
            .unwrap_or(STDERR_FILENO)
    }

    /// Every resolved descriptor that is not a standard stream.
    pub fn raw_fds(&self) -> Vec<RawFd> {
        [&self.stdin, &self.stdout, &self.stderr]
            .into_iter()
            .flatten()
            .map(|f| f.as_raw_fd())
            .collect()
    }
}

fn open_sink(path: &str, mode: OutputMode) -> Result<File, JshError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    match mode {
        OutputMode::Truncate => {
            options.truncate(true).mode(0o644);
        }
        OutputMode::Append => {
            options.append(true).mode(0o666);
        }
    }
    options
        .open(path)
        .map_err(|_| JshError::RedirectOpen(path.to_string()))
}

impl RedirectSpec {
    pub fn resolve(&self) -> Result<StdioSet, JshError> {
        let stdin = match &self.stdin {
            Some(path) => {
                let file =
                    File::open(path).map_err(|_| JshError::NoSuchFile(path.to_string()))?;
                Some(file)
            }
            None => None,
        };
        let stdout = match &self.stdout {
            Some((path, mode)) => Some(open_sink(path, *mode)?),
            None => None,
        };
        let stderr = match &self.stderr {
            Some((path, mode)) => Some(open_sink(path, *mode)?),
            None => None,
        };

        let set = StdioSet {
            stdin,
            stdout,
            stderr,
        };
        debug!(
            "resolved redirections: in={} out={} err={}",
            set.infile(),
            set.outfile(),
            set.errfile()
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn default_spec_resolves_to_standard_streams() {
        let set = RedirectSpec::default().resolve().unwrap();
        assert_eq!(set.infile(), STDIN_FILENO);
        assert_eq!(set.outfile(), STDOUT_FILENO);
        assert_eq!(set.errfile(), STDERR_FILENO);
        assert!(set.raw_fds().is_empty());
    }

    #[test]
    fn missing_input_file_reports_no_such_file() {
        let spec = RedirectSpec {
            stdin: Some("/definitely/not/here".to_string()),
            ..Default::default()
        };
        let err = spec.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "/definitely/not/here: No such file or directory"
        );
    }

    #[test]
    fn truncate_mode_discards_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents").unwrap();

        let spec = RedirectSpec {
            stdout: Some((path.to_string_lossy().into_owned(), OutputMode::Truncate)),
            ..Default::default()
        };
        {
            let mut set = spec.resolve().unwrap();
            set.stdout.as_mut().unwrap().write_all(b"new").unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn append_mode_preserves_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "first\n").unwrap();

        let spec = RedirectSpec {
            stdout: Some((path.to_string_lossy().into_owned(), OutputMode::Append)),
            ..Default::default()
        };
        {
            let mut set = spec.resolve().unwrap();
            set.stdout.as_mut().unwrap().write_all(b"second\n").unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn input_redirection_opens_readable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "data").unwrap();

        let spec = RedirectSpec {
            stdin: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let mut set = spec.resolve().unwrap();
        let mut contents = String::new();
        set.stdin.as_mut().unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "data");
    }
}
