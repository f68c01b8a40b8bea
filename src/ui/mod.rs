pub mod tree;

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::app::App;
use crate::integrations::prompt::LineInput;

/// Line-oriented command loop: one `/command` per line until `/quit` or EOF.
///
/// Reads from the same [`LineInput`] the app's prompt answers from.
#[derive(Debug, Default)]
pub struct Shell;

impl Shell {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&mut self, app: &mut App, input: &LineInput) -> Result<()> {
        let mut stdout = io::stdout();
        self.run_with(app, input, &mut stdout)
    }

    pub fn run_with<W: Write>(
        &mut self,
        app: &mut App,
        input: &LineInput,
        out: &mut W,
    ) -> Result<()> {
        writeln!(out, "favmarks: {} (/help for commands)", app.statistics().summary())
            .context("failed to write to output")?;

        while let Some(line) = input.read_line().context("failed to read command")? {
            self.handle_line(app, line.trim(), out)?;
            if !app.running {
                break;
            }
        }

        Ok(())
    }

    fn handle_line<W: Write>(&mut self, app: &mut App, line: &str, out: &mut W) -> Result<()> {
        if line.is_empty() {
            return Ok(());
        }

        // Bare words are accepted as a convenience.
        let input = if line.starts_with('/') {
            line.to_string()
        } else {
            format!("/{line}")
        };

        debug!(input = %input, "shell command");
        match app.execute_line(&input) {
            Ok(()) => {
                if let Some(output) = &app.output {
                    write!(out, "{output}").context("failed to write to output")?;
                }
                writeln!(out, "{}", app.status_message).context("failed to write to output")?;
            }
            Err(err) => {
                app.status_message = format!("Error: {err:#}");
                writeln!(out, "{}", app.status_message).context("failed to write to output")?;
            }
        }
        Ok(())
    }
}
