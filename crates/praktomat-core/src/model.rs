//! Core data model types for praktomat.
//!
//! Identifiers validate themselves on construction, so a `MatNumber` or a
//! `Grade` that exists is always in range. The entity records are owned
//! exclusively by the [`Gradebook`](crate::gradebook::Gradebook); callers only
//! ever see shared references.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{GradebookError, Result};
use crate::statistics::{GradeHistogram, Graded};

/// Task numbers are 1-based and assigned in creation order.
pub type TaskId = u32;

/// Largest matriculation number that fits in five digits.
pub const MAX_MAT_NUMBER: u32 = 99_999;

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase())
}

/// A tutor's name, which doubles as the tutor's identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TutorName(String);

impl TutorName {
    pub fn new(name: &str) -> Result<Self> {
        if is_valid_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(GradebookError::InvalidName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TutorName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TutorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A student's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StudentName(String);

impl StudentName {
    pub fn new(name: &str) -> Result<Self> {
        if is_valid_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(GradebookError::InvalidName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Matriculation number: a positive integer of at most five digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MatNumber(u32);

impl MatNumber {
    pub fn new(value: u32) -> Result<Self> {
        if (1..=MAX_MAT_NUMBER).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GradebookError::InvalidMatNumber(value))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A grade from 1 (best) to 5 (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GradebookError::InvalidGrade(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Histogram slot for this grade.
    pub(crate) fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The grade and comment a tutor attached to a solution.
///
/// Never mutated; a re-review replaces the whole correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    grade: Grade,
    comment: String,
}

impl Correction {
    pub fn new(grade: Grade, comment: &str) -> Result<Self> {
        if comment.trim().is_empty() {
            return Err(GradebookError::InvalidComment);
        }
        Ok(Self {
            grade,
            comment: comment.to_string(),
        })
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// One student's submission to one task.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    text: String,
    correction: Option<Correction>,
}

impl Solution {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            correction: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn correction(&self) -> Option<&Correction> {
        self.correction.as_ref()
    }

    pub fn is_corrected(&self) -> bool {
        self.correction.is_some()
    }

    /// Attaches `correction`, returning the one it replaces.
    pub(crate) fn replace_correction(&mut self, correction: Correction) -> Option<Correction> {
        self.correction.replace(correction)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    mat_number: MatNumber,
    name: StudentName,
    histogram: GradeHistogram,
}

impl Student {
    pub(crate) fn new(mat_number: MatNumber, name: StudentName) -> Self {
        Self {
            mat_number,
            name,
            histogram: GradeHistogram::new(),
        }
    }

    pub fn mat_number(&self) -> MatNumber {
        self.mat_number
    }

    pub fn name(&self) -> &StudentName {
        &self.name
    }
}

impl Graded for Student {
    fn histogram(&self) -> &GradeHistogram {
        &self.histogram
    }

    fn histogram_mut(&mut self) -> &mut GradeHistogram {
        &mut self.histogram
    }
}

/// Students are identified by matriculation number alone.
impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.mat_number == other.mat_number
    }
}

impl Eq for Student {}

#[derive(Debug, Clone, Serialize)]
pub struct Tutor {
    name: TutorName,
    students: Vec<MatNumber>,
    histogram: GradeHistogram,
}

impl Tutor {
    pub(crate) fn new(name: TutorName) -> Self {
        Self {
            name,
            students: Vec::new(),
            histogram: GradeHistogram::new(),
        }
    }

    pub fn name(&self) -> &TutorName {
        &self.name
    }

    /// The tutor's roster in the order students were added.
    pub fn students(&self) -> &[MatNumber] {
        &self.students
    }

    pub fn supervises(&self, mat_number: MatNumber) -> bool {
        self.students.contains(&mat_number)
    }

    pub(crate) fn enroll(&mut self, mat_number: MatNumber) {
        self.students.push(mat_number);
    }
}

impl Graded for Tutor {
    fn histogram(&self) -> &GradeHistogram {
        &self.histogram
    }

    fn histogram_mut(&mut self) -> &mut GradeHistogram {
        &mut self.histogram
    }
}

impl PartialEq for Tutor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tutor {}

impl PartialOrd for Tutor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tutor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// A grading assignment and every solution submitted to it.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    number: TaskId,
    description: String,
    histogram: GradeHistogram,
    solutions: BTreeMap<MatNumber, Solution>,
}

impl Task {
    pub(crate) fn new(number: TaskId, description: &str) -> Self {
        Self {
            number,
            description: description.to_string(),
            histogram: GradeHistogram::new(),
            solutions: BTreeMap::new(),
        }
    }

    pub fn number(&self) -> TaskId {
        self.number
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_solution(&self, mat_number: MatNumber) -> bool {
        self.solutions.contains_key(&mat_number)
    }

    pub fn solution(&self, mat_number: MatNumber) -> Option<&Solution> {
        self.solutions.get(&mat_number)
    }

    /// Attaches `correction` to the student's solution, returning the
    /// correction it replaces. Does nothing if there is no such solution.
    pub(crate) fn replace_correction(
        &mut self,
        mat_number: MatNumber,
        correction: Correction,
    ) -> Option<Correction> {
        self.solutions
            .get_mut(&mat_number)
            .and_then(|solution| solution.replace_correction(correction))
    }

    /// Solutions in ascending matriculation-number order.
    pub fn solutions(&self) -> impl Iterator<Item = (MatNumber, &Solution)> {
        self.solutions.iter().map(|(&mat, solution)| (mat, solution))
    }

    /// Number of submitted solutions, corrected or not.
    pub fn submitted(&self) -> usize {
        self.solutions.len()
    }

    pub(crate) fn add_solution(&mut self, mat_number: MatNumber, text: &str) -> Result<()> {
        if self.has_solution(mat_number) {
            return Err(GradebookError::DuplicateSolution {
                task: self.number,
                mat_number,
            });
        }
        self.solutions.insert(mat_number, Solution::new(text));
        Ok(())
    }
}

impl Graded for Task {
    fn histogram(&self) -> &GradeHistogram {
        &self.histogram
    }

    fn histogram_mut(&mut self) -> &mut GradeHistogram {
        &mut self.histogram
    }
}
