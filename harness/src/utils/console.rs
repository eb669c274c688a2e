use std::io::Write;

use colored::Colorize;

use super::reader::Reader;
use super::writer::Writer;
use crate::errors::Result;

/// Terminal front end for every interactive action. Owns the output and
/// input buffers so tests can drive prompts from a cursor and inspect what
/// was printed.
pub struct Console {
    pub writer: Writer,
    reader: Reader,
}

impl Console {
    pub fn new(writer: Writer, reader: Reader) -> Self {
        Self { writer, reader }
    }

    pub fn header(&mut self, text: &str) -> Result<()> {
        let bar = "=".repeat(60);
        writeln!(self.writer, "\n{}", bar.cyan().bold())?;
        writeln!(self.writer, "{}", format!("{text:^60}").cyan().bold())?;
        writeln!(self.writer, "{}\n", bar.cyan().bold())?;
        Ok(())
    }

    pub fn rule(&mut self, width: usize) -> Result<()> {
        writeln!(self.writer, "{}", "\u{2500}".repeat(width).cyan())?;
        Ok(())
    }

    pub fn info(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}")?;
        Ok(())
    }

    pub fn success(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{} {text}", "\u{2713}".green())?;
        Ok(())
    }

    pub fn warn(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{} {text}", "\u{26a0}".yellow())?;
        Ok(())
    }

    pub fn error(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_err(format!("{} {text}", "\u{2717}".red()))?;
        Ok(())
    }

    /// Prints a prompt and reads one trimmed line of input.
    pub fn prompt(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}", prompt.yellow())?;
        self.writer.flush()?;
        Ok(self.reader.read_line()?.trim().to_string())
    }

    /// Yes/no question; anything other than `y`/`Y` is a no.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} (y/n): "))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    pub fn pause(&mut self) -> Result<()> {
        self.prompt("\nPress Enter to continue...")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod console_tests;
