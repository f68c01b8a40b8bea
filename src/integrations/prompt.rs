use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use anyhow::{Context, Result};

/// Destructive-action confirmation supplied by the host.
pub trait Prompt {
    /// Returns `true` only on an explicit affirmative answer.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// One line reader shared by the shell loop and the prompts it triggers.
///
/// Answers are read from the same stream as commands, so piped input like
/// `/rename-group A B\ny\n` works.
#[derive(Clone)]
pub struct LineInput(Rc<RefCell<Box<dyn BufRead>>>);

impl LineInput {
    pub fn new(reader: impl BufRead + 'static) -> Self {
        Self(Rc::new(RefCell::new(Box::new(reader))))
    }

    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }

    /// Next line without its terminator, `None` at end of input.
    pub fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .0
            .borrow_mut()
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\n', '\r'][..]).to_string()))
    }
}

/// Asks on stderr and takes the answer from the next input line. End of
/// input counts as "no".
pub struct InputPrompt {
    input: LineInput,
}

impl InputPrompt {
    pub fn new(input: LineInput) -> Self {
        Self { input }
    }
}

impl Prompt for InputPrompt {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        let mut stderr = io::stderr();
        write!(stderr, "{message} [y/N] ").context("failed to write prompt")?;
        stderr.flush().context("failed to flush prompt")?;

        let answer = self.input.read_line().context("failed to read confirmation")?;
        Ok(answer.as_deref().is_some_and(is_affirmative))
    }
}

/// Answers every prompt with a fixed response (`--yes`, scripted runs).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&mut self, _message: &str) -> Result<bool> {
        Ok(self.0)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    )
}
