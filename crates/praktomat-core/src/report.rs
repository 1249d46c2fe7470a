//! Report rows produced by the gradebook queries.
//!
//! Each row is plain data (serializable for JSON output) and knows how to
//! render itself as the text lines the shell prints.

use std::fmt;

use serde::Serialize;

use crate::model::{Grade, MatNumber, StudentName, TaskId, TutorName};
use crate::statistics::{format_average, Average, GRADE_SLOTS};

/// Rendering of a report row as output lines.
pub trait ReportLines {
    fn lines(&self) -> Vec<String>;
}

/// Flattens a slice of rows into output lines, in order.
pub fn render_lines<T: ReportLines>(rows: &[T]) -> Vec<String> {
    rows.iter().flat_map(|row| row.lines()).collect()
}

macro_rules! single_line {
    ($($row:ty),* $(,)?) => {
        $(
            impl ReportLines for $row {
                fn lines(&self) -> Vec<String> {
                    vec![self.to_string()]
                }
            }
        )*
    };
}

single_line!(
    StudentListing,
    SolutionListing,
    StudentSummary,
    TutorSummary,
    ReviewReceipt,
);

fn task_header(task: TaskId, description: &str) -> String {
    format!("task id({task}): {description}")
}

/// A student and the tutor supervising them.
#[derive(Debug, Clone, Serialize)]
pub struct StudentListing {
    pub mat_number: MatNumber,
    pub name: StudentName,
    pub tutor: TutorName,
}

impl fmt::Display for StudentListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}): {}", self.mat_number, self.name, self.tutor)
    }
}

/// A student's submitted text for one task.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionListing {
    pub mat_number: MatNumber,
    pub name: StudentName,
    pub text: String,
}

impl fmt::Display for SolutionListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}): {}", self.mat_number, self.name, self.text)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeEntry {
    pub mat_number: MatNumber,
    pub grade: Grade,
}

/// The corrected grades of one task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResults {
    pub task: TaskId,
    pub description: String,
    /// Corrected solutions only, ascending by matriculation number.
    pub grades: Vec<GradeEntry>,
}

impl ReportLines for TaskResults {
    fn lines(&self) -> Vec<String> {
        std::iter::once(task_header(self.task, &self.description))
            .chain(
                self.grades
                    .iter()
                    .map(|entry| format!("{}: {}", entry.mat_number, entry.grade)),
            )
            .collect()
    }
}

/// Submission and grading statistics for one task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub task: TaskId,
    pub description: String,
    pub submitted: usize,
    pub reviewed: u32,
    pub average: Option<Average>,
    pub distribution: [u32; GRADE_SLOTS],
}

impl ReportLines for TaskSummary {
    fn lines(&self) -> Vec<String> {
        let distribution = self
            .distribution
            .iter()
            .enumerate()
            .map(|(slot, count)| format!("{count}x{}", slot + 1))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            task_header(self.task, &self.description),
            format!("submitted: {}", self.submitted),
            format!("reviewed: {}", self.reviewed),
            format!("average grade: {}", format_average(self.average)),
            format!("distribution: {distribution}"),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub mat_number: MatNumber,
    pub name: StudentName,
    pub average: Option<Average>,
}

impl fmt::Display for StudentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}): {}",
            self.mat_number,
            self.name,
            format_average(self.average)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TutorSummary {
    pub name: TutorName,
    pub students: usize,
    /// Submitted but uncorrected solutions by this tutor's students.
    pub missing_reviews: usize,
    pub average: Option<Average>,
}

impl fmt::Display for TutorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} students, {} missing review(s), average grade {}",
            self.name,
            self.students,
            self.missing_reviews,
            format_average(self.average)
        )
    }
}

/// Acknowledgement returned by a successful review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReceipt {
    pub tutor: TutorName,
    pub mat_number: MatNumber,
    pub name: StudentName,
    pub grade: Grade,
}

impl fmt::Display for ReviewReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} reviewed ({},{}) with grade {}",
            self.tutor, self.mat_number, self.name, self.grade
        )
    }
}
