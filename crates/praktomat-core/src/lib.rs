//! praktomat-core — Gradebook domain model, review engine, and reports.
//!
//! Tutors supervise students, students submit solutions to tasks, and tutors
//! correct those solutions with a grade and a comment. The [`Gradebook`]
//! owns every entity and keeps the per-student, per-tutor, and per-task grade
//! histograms consistent across reviews and re-reviews.

pub mod error;
pub mod gradebook;
pub mod model;
pub mod report;
pub mod statistics;

pub use error::{GradebookError, Result};
pub use gradebook::Gradebook;
