//! Word splitting and quote processing.
//!
//! A line is split on unquoted runs of spaces and tabs. An unescaped `"`
//! opens a quoted region in which whitespace is literal; a backslash
//! immediately before a `"` makes the quote literal. Backslashes never
//! survive into a token's payload. Operators are not special here: they
//! come out as ordinary words and are recognized by the pipeline builder
//! only when whitespace-delimited, so `ls>f` stays a single word.

use std::mem;

/// Split one logical line into processed word tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut prev_backslash = false;

    for ch in line.chars() {
        match ch {
            '\\' => {
                in_token = true;
                prev_backslash = true;
            }
            '"' => {
                in_token = true;
                if prev_backslash {
                    current.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
                prev_backslash = false;
            }
            ' ' | '\t' if !in_quotes => {
                if in_token {
                    tokens.push(mem::take(&mut current));
                    in_token = false;
                }
                prev_backslash = false;
            }
            _ => {
                in_token = true;
                current.push(ch);
                prev_backslash = false;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Number of `"` characters not escaped by an immediately preceding
/// backslash. The REPL requests a continuation line while this is odd.
pub fn unescaped_quote_count(line: &str) -> usize {
    let mut count = 0;
    let mut prev_backslash = false;
    for ch in line.chars() {
        if ch == '"' && !prev_backslash {
            count += 1;
        }
        prev_backslash = ch == '\\';
    }
    count
}
