//! Line-oriented command parsing.
//!
//! Turns one input line into a typed [`Command`]. Only syntax is checked
//! here (argument count, number formats); the gradebook validates the values
//! again on its own.

use praktomat_core::model::TaskId;
use praktomat_core::GradebookError;
use thiserror::Error;

/// Errors surfaced to the user as `Error! <message>`.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("wrong number of parameters for '{command}': expected {expected}, got {found}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("task number must be a number > 0: '{0}'")]
    InvalidTaskNumber(String),

    #[error("matriculation number must be a five digit number: '{0}'")]
    InvalidMatNumber(String),

    #[error("grade must be a one digit number between 1 and 5: '{0}'")]
    InvalidGrade(String),

    #[error(transparent)]
    Gradebook(#[from] GradebookError),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tutor {
        name: String,
    },
    Student {
        name: String,
        mat_number: u32,
    },
    Task {
        description: String,
    },
    Submit {
        task: TaskId,
        mat_number: u32,
        text: String,
    },
    Review {
        task: TaskId,
        mat_number: u32,
        grade: u8,
        comment: String,
    },
    ListStudents,
    ListSolutions {
        task: TaskId,
    },
    Results,
    SummaryTask,
    SummaryStudent,
    SummaryTutor,
    Reset,
    Quit,
}

impl Command {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let word = tokens[0].to_lowercase();
        let args = &tokens[1..];

        let command = match word.as_str() {
            "tut" => {
                let [name] = arity::<1>("tut", args)?;
                Command::Tutor {
                    name: name.to_string(),
                }
            }
            "stud" => {
                let [name, mat] = arity::<2>("stud", args)?;
                Command::Student {
                    name: name.to_string(),
                    mat_number: parse_mat_number(mat)?,
                }
            }
            "task" => {
                let [description] = arity::<1>("task", args)?;
                Command::Task {
                    description: description.to_string(),
                }
            }
            "submit" => {
                let [task, mat, text] = arity::<3>("submit", args)?;
                Command::Submit {
                    task: parse_task_id(task)?,
                    mat_number: parse_mat_number(mat)?,
                    text: text.to_string(),
                }
            }
            "review" => {
                let [task, mat, grade, comment] = arity::<4>("review", args)?;
                Command::Review {
                    task: parse_task_id(task)?,
                    mat_number: parse_mat_number(mat)?,
                    grade: parse_grade(grade)?,
                    comment: comment.to_string(),
                }
            }
            "list-solutions" => {
                let [task] = arity::<1>("list-solutions", args)?;
                Command::ListSolutions {
                    task: parse_task_id(task)?,
                }
            }
            "list-students" => nullary("list-students", args, Command::ListStudents)?,
            "results" => nullary("results", args, Command::Results)?,
            "summary-task" => nullary("summary-task", args, Command::SummaryTask)?,
            "summary-student" => nullary("summary-student", args, Command::SummaryStudent)?,
            "summary-tutor" => nullary("summary-tutor", args, Command::SummaryTutor)?,
            "reset" => nullary("reset", args, Command::Reset)?,
            "quit" => nullary("quit", args, Command::Quit)?,
            _ => return Err(CommandError::UnknownCommand(word)),
        };

        Ok(Some(command))
    }

    /// The command word, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Tutor { .. } => "tut",
            Command::Student { .. } => "stud",
            Command::Task { .. } => "task",
            Command::Submit { .. } => "submit",
            Command::Review { .. } => "review",
            Command::ListStudents => "list-students",
            Command::ListSolutions { .. } => "list-solutions",
            Command::Results => "results",
            Command::SummaryTask => "summary-task",
            Command::SummaryStudent => "summary-student",
            Command::SummaryTutor => "summary-tutor",
            Command::Reset => "reset",
            Command::Quit => "quit",
        }
    }
}

fn arity<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(args).map_err(|_| CommandError::WrongArity {
        command,
        expected: N,
        found: args.len(),
    })
}

fn nullary(command: &'static str, args: &[&str], parsed: Command) -> Result<Command, CommandError> {
    arity::<0>(command, args)?;
    Ok(parsed)
}

fn parse_task_id(token: &str) -> Result<TaskId, CommandError> {
    token
        .parse::<TaskId>()
        .ok()
        .filter(|&id| id > 0 && token.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| CommandError::InvalidTaskNumber(token.to_string()))
}

fn parse_mat_number(token: &str) -> Result<u32, CommandError> {
    if token.len() == 5 && token.bytes().all(|b| b.is_ascii_digit()) {
        token
            .parse()
            .map_err(|_| CommandError::InvalidMatNumber(token.to_string()))
    } else {
        Err(CommandError::InvalidMatNumber(token.to_string()))
    }
}

fn parse_grade(token: &str) -> Result<u8, CommandError> {
    match token.as_bytes() {
        [digit @ b'1'..=b'5'] => Ok(digit - b'0'),
        _ => Err(CommandError::InvalidGrade(token.to_string())),
    }
}
