use boiler_library::{Prompter, is_yes};
use std::io::{self, BufRead, Write};

/// Asks questions on one stream and reads trimmed answers from another.
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Questions go to stderr so that stdout stays clean for piping.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.writer, "{question}")?;
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn input(&mut self, message: &str, default: Option<&str>) -> io::Result<String> {
        let answer = match default {
            Some(default) if !default.is_empty() => self.ask(&format!("{message} [{default}]: "))?,
            _ => self.ask(&format!("{message}: "))?,
        };
        match (answer.is_empty(), default) {
            (true, Some(default)) => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        self.ask(&format!("{message} (y/N): ")).map(|answer| is_yes(&answer))
    }

    fn choose(&mut self, message: &str, options: &[String]) -> io::Result<String> {
        writeln!(self.writer, "{message}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}. {option}", i + 1)?;
        }
        self.ask("Enter choice: ")
    }
}
