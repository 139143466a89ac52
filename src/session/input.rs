//! Line-oriented input sources for the session host
//!
//! The host only needs "give me the next line, or tell me input is over".
//! A `rustyline` editor provides that on a terminal; a buffered reader
//! covers piped stdin and tests.

use crate::error::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::BufRead;

/// Source of user input lines
pub trait LineReader {
    /// Read the next line, showing `prompt` where the source supports it
    ///
    /// Returns `Ok(None)` when input has ended (EOF, Ctrl-D, Ctrl-C).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Remember an accepted question, for sources with history
    fn add_history(&mut self, _line: &str) {}
}

/// Interactive terminal input backed by `rustyline`
pub struct ReadlineInput {
    editor: DefaultEditor,
}

impl ReadlineInput {
    /// Create a new line editor
    ///
    /// # Errors
    ///
    /// Returns error if the terminal cannot be initialized
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for ReadlineInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => {
                tracing::debug!("CTRL-C received, ending session");
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                tracing::debug!("CTRL-D received, ending session");
                Ok(None)
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                Err(err.into())
            }
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::warn!("Failed to record history entry: {}", e);
        }
    }
}

/// Non-interactive input from any buffered reader (piped stdin, tests)
///
/// The prompt is not echoed.
pub struct BufReadInput<R> {
    reader: R,
}

impl<R: BufRead> BufReadInput<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineReader for BufReadInput<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}
