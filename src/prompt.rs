//! Questions asked on the terminal.

use retag_library::{Choice, Prompt};
use std::io::{self, BufRead, Stdout, Write};

/// Reads one answer per line. End of input counts as "Cancel" (or "no").
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}
impl TerminalPrompt<io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}
impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and reads a trimmed, lowercased answer.
    fn ask(&mut self, question: &str) -> Option<String> {
        if let Err(err) = write!(self.output, "{question} ").and_then(|()| self.output.flush()) {
            tracing::warn!(error = %err, "Could not write prompt");
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
            Err(err) => {
                tracing::warn!(error = %err, "Could not read answer");
                None
            },
        }
    }

    fn hint(&mut self, hint: &str) {
        // A broken terminal shows up again on the next read.
        let _ = writeln!(self.output, "{hint}");
    }
}
impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn choose(&mut self, message: &str) -> Choice {
        let question = format!("{message}\n[n]o, [y]es, yes to [a]ll, [c]ancel:");
        loop {
            let Some(answer) = self.ask(&question) else {
                return Choice::Cancel;
            };
            match parse_choice(&answer) {
                Some(choice) => return choice,
                None => self.hint("Please answer n, y, a or c."),
            }
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        let question = format!("{message} [y/N]");
        loop {
            let Some(answer) = self.ask(&question) else {
                return false;
            };
            match parse_confirm(&answer) {
                Some(confirmed) => return confirmed,
                None => self.hint("Please answer y or n."),
            }
        }
    }
}

fn parse_choice(answer: &str) -> Option<Choice> {
    match answer {
        "n" | "no" => Some(Choice::No),
        "y" | "yes" => Some(Choice::Yes),
        "a" | "all" | "yes to all" => Some(Choice::YesToAll),
        "c" | "cancel" | "q" | "quit" => Some(Choice::Cancel),
        _ => None,
    }
}

fn parse_confirm(answer: &str) -> Option<bool> {
    match answer {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}
