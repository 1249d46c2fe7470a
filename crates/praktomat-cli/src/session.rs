//! The shell session: reads commands, runs them against a gradebook, and
//! prints the replies.

use std::io::{BufRead, Write};

use anyhow::Result;
use serde::Serialize;

use praktomat_core::report::{render_lines, ReportLines};
use praktomat_core::Gradebook;

use crate::config::{OutputFormat, ShellConfig};
use crate::interpreter::{Command, CommandError};

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A shell session owning one gradebook and one output sink.
pub struct Session<W: Write> {
    book: Gradebook,
    config: ShellConfig,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(config: ShellConfig, out: W) -> Self {
        Self {
            book: Gradebook::new(),
            config,
            out,
        }
    }

    pub fn gradebook(&self) -> &Gradebook {
        &self.book
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Reads lines until `quit` or end of input. Prints the prompt before
    /// each line when `interactive`.
    pub fn run<R: BufRead>(&mut self, mut input: R, interactive: bool) -> Result<()> {
        let mut line = String::new();
        loop {
            if interactive {
                write!(self.out, "{}", self.config.prompt)?;
                self.out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                tracing::debug!("end of input");
                break;
            }
            if self.config.echo {
                writeln!(self.out, "{}{}", self.config.prompt, line.trim_end())?;
            }
            if self.execute_line(&line)? == Flow::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Runs one input line, printing its output or an `Error! ...` message.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let reply = Command::parse(line).and_then(|command| match command {
            Some(command) => self.dispatch(command),
            None => Ok(Reply::Lines(Vec::new())),
        });

        match reply {
            Ok(Reply::Lines(lines)) => {
                for line in lines {
                    writeln!(self.out, "{line}")?;
                }
                Ok(Flow::Continue)
            }
            Ok(Reply::Quit) => Ok(Flow::Quit),
            Err(e) => {
                tracing::debug!(error = %e, "command rejected");
                writeln!(self.out, "Error! {e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Reply, CommandError> {
        tracing::debug!(command = command.name(), "dispatching");

        let lines = match command {
            Command::Tutor { name } => {
                if self.book.add_tutor(&name)? {
                    tracing::debug!(tutor = %name, "tutor created");
                }
                Vec::new()
            }
            Command::Student { name, mat_number } => {
                self.book.add_student(mat_number, &name)?;
                Vec::new()
            }
            Command::Task { description } => {
                let id = self.book.add_task(&description)?;
                vec![format!("task id({id})")]
            }
            Command::Submit {
                task,
                mat_number,
                text,
            } => {
                self.book.submit(task, mat_number, &text)?;
                Vec::new()
            }
            Command::Review {
                task,
                mat_number,
                grade,
                comment,
            } => {
                let receipt = self.book.review(task, mat_number, grade, &comment)?;
                self.render(std::slice::from_ref(&receipt))?
            }
            Command::ListStudents => self.render(&self.book.list_students())?,
            Command::ListSolutions { task } => self.render(&self.book.list_solutions(task)?)?,
            Command::Results => self.render(&self.book.results())?,
            Command::SummaryTask => self.render(&self.book.summary_task())?,
            Command::SummaryStudent => self.render(&self.book.summary_student())?,
            Command::SummaryTutor => self.render(&self.book.summary_tutor())?,
            Command::Reset => {
                self.book.reset();
                tracing::info!("gradebook reset");
                Vec::new()
            }
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Lines(lines))
    }

    fn render<T: ReportLines + Serialize>(&self, rows: &[T]) -> Result<Vec<String>, CommandError> {
        match self.config.format {
            OutputFormat::Text => Ok(render_lines(rows)),
            OutputFormat::Json => Ok(vec![serde_json::to_string_pretty(rows)?]),
        }
    }
}

enum Reply {
    Lines(Vec<String>),
    Quit,
}
