//! Folding a token sequence into a pipeline description.

use jsh_types::JshError;
use tracing::debug;

use super::check::is_operator;
use crate::process::redirect::{OutputMode, RedirectSpec};

/// One parsed command line: stage argument vectors, the pipeline-wide
/// redirection spec, and the background flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<Vec<String>>,
    pub redirect: RedirectSpec,
    pub foreground: bool,
}

/// Linear scan over the tokens: `|` starts a new stage, redirection
/// operators consume the following token into the redirect spec, and a
/// trailing `&` clears the foreground flag. Redirection operands never
/// reach an argv.
pub fn build(tokens: &[String]) -> Result<Pipeline, JshError> {
    let mut stages: Vec<Vec<String>> = vec![Vec::new()];
    let mut redirect = RedirectSpec::default();
    let mut foreground = true;

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].as_str() {
            "|" => {
                if stages.last().map(|s| s.is_empty()).unwrap_or(true) {
                    return Err(JshError::Parse);
                }
                stages.push(Vec::new());
            }
            op @ ("<" | ">" | ">>" | "e>" | "e>>") => {
                let operand = match tokens.get(i + 1) {
                    Some(tok) if !is_operator(tok) => tok.clone(),
                    _ => return Err(JshError::Parse),
                };
                match op {
                    "<" => {
                        if redirect.stdin.is_some() {
                            return Err(JshError::Parse);
                        }
                        redirect.stdin = Some(operand);
                    }
                    ">" | ">>" => {
                        if redirect.stdout.is_some() {
                            return Err(JshError::Parse);
                        }
                        let mode = if op == ">" {
                            OutputMode::Truncate
                        } else {
                            OutputMode::Append
                        };
                        redirect.stdout = Some((operand, mode));
                    }
                    _ => {
                        if redirect.stderr.is_some() {
                            return Err(JshError::Parse);
                        }
                        let mode = if op == "e>" {
                            OutputMode::Truncate
                        } else {
                            OutputMode::Append
                        };
                        redirect.stderr = Some((operand, mode));
                    }
                }
                i += 1; // operand consumed
            }
            "&" => {
                if i + 1 == tokens.len() {
                    foreground = false;
                }
                // A non-final `&` is dropped from the argv.
            }
            _ => {
                if let Some(stage) = stages.last_mut() {
                    stage.push(tokens[i].clone());
                }
            }
        }
        i += 1;
    }

    if stages.iter().any(|s| s.is_empty()) {
        return Err(JshError::Parse);
    }

    debug!(
        "built pipeline: {} stage(s), foreground: {}",
        stages.len(),
        foreground
    );
    Ok(Pipeline {
        stages,
        redirect,
        foreground,
    })
}
