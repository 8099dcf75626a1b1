//! Indentation-aware text output shared by the declaration emitters.

use std::fmt::{Arguments, Result, Write as FmtWrite};

/// Writes declaration text with a configurable indentation unit
pub(crate) struct DeclarationWriter<'a, W: FmtWrite> {
    writer: &'a mut W,
    indent_str: &'a str,
    indent_level: usize,
}

impl<'a, W: FmtWrite> DeclarationWriter<'a, W> {
    pub(crate) fn new(writer: &'a mut W, indent_str: &'a str) -> Self {
        Self {
            writer,
            indent_str,
            indent_level: 0,
        }
    }

    pub(crate) fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub(crate) fn write_indent(&mut self) -> Result {
        for _ in 0..self.indent_level {
            self.writer.write_str(self.indent_str)?;
        }
        Ok(())
    }

    /// Writes an indented line terminated by a newline
    pub(crate) fn line(&mut self, args: Arguments<'_>) -> Result {
        self.write_indent()?;
        self.writer.write_fmt(args)?;
        self.writer.write_char('\n')
    }

    /// Writes an indented fragment without a trailing newline
    pub(crate) fn start(&mut self, args: Arguments<'_>) -> Result {
        self.write_indent()?;
        self.writer.write_fmt(args)
    }

    /// Appends to the current line
    pub(crate) fn append(&mut self, s: &str) -> Result {
        self.writer.write_str(s)
    }
}
