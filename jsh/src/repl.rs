//! The interactive read-eval loop.

use anyhow::Result;
use jsh_types::Context;
use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::parser::{needs_continuation, Continuation};
use crate::prompt;
use crate::shell::Shell;

const BANNER: &str = r#"   _     _
  (_)___| |__
  | / __| '_ \
  | \__ \ | | |
 _/ |___/_| |_|
|__/
Type 'help' to list built-in commands."#;

pub struct Repl<'a> {
    pub shell: &'a mut Shell,
}

impl<'a> Repl<'a> {
    pub fn new(shell: &'a mut Shell) -> Self {
        Repl { shell }
    }

    /// Run until `exit` or end-of-input. Each iteration polls the job
    /// table first so background status changes are reported before the
    /// next prompt.
    pub fn run_interactive(&mut self, ctx: &mut Context) -> Result<i32> {
        println!("{BANNER}");
        let stdin = io::stdin();
        let mut input_lines = stdin.lock();

        loop {
            self.shell.check_job_state();
            if let Some(code) = self.shell.exited {
                return Ok(code);
            }

            print!("{}", prompt::render());
            io::stdout().flush().ok();

            let mut line = String::new();
            if input_lines.read_line(&mut line)? == 0 {
                debug!("EOF on stdin");
                break;
            }
            let mut input = line.trim().to_string();

            // Accumulate continuation lines until the input is complete.
            let mut eof = false;
            loop {
                match needs_continuation(&input) {
                    Continuation::Complete => break,
                    cont => {
                        print!("> ");
                        io::stdout().flush().ok();
                        let mut next = String::new();
                        if input_lines.read_line(&mut next)? == 0 {
                            eof = true;
                            break;
                        }
                        if cont == Continuation::TrailingPipe {
                            input.push(' ');
                        }
                        input.push_str(next.trim());
                    }
                }
            }
            if eof {
                // Unfinished line at EOF is discarded.
                break;
            }

            self.shell.eval_str(ctx, &input, false)?;
            if let Some(code) = self.shell.exited {
                return Ok(code);
            }
        }
        Ok(self.shell.last_exit_status)
    }
}
