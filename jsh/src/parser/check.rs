//! Line-completeness checks driving the REPL's continuation prompt.

use super::lexer::unescaped_quote_count;

/// Why a line cannot be evaluated yet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Continuation {
    /// The line is complete.
    Complete,
    /// An odd number of unescaped `"` — the next line is appended with no
    /// separator.
    OpenQuote,
    /// The line ends in a `|` operator — the next line is appended after a
    /// single space.
    TrailingPipe,
}

/// Decide whether `line` needs another input line before evaluation.
pub fn needs_continuation(line: &str) -> Continuation {
    if unescaped_quote_count(line) % 2 == 1 {
        return Continuation::OpenQuote;
    }
    if line.split_whitespace().last() == Some("|") {
        return Continuation::TrailingPipe;
    }
    Continuation::Complete
}

/// Operator lexemes, recognized only as whitespace-delimited words.
pub fn is_operator(token: &str) -> bool {
    matches!(token, "|" | "<" | ">" | ">>" | "e>" | "e>>" | "&")
}
