pub mod check;
pub mod lexer;
pub mod pipeline;

pub use check::{needs_continuation, Continuation};
pub use pipeline::Pipeline;

use jsh_types::JshError;

/// Parse one complete logical line. Returns `None` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<Pipeline>, JshError> {
    let tokens = lexer::tokenize(line);
    if tokens.is_empty() {
        return Ok(None);
    }
    pipeline::build(&tokens).map(Some)
}
