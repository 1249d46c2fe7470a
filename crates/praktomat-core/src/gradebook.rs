//! The gradebook: entity registry and review engine.
//!
//! Owns every tutor, student, task, and solution. All operations validate
//! their arguments and perform every lookup before mutating anything, so a
//! rejected call leaves the gradebook exactly as it was.

use std::collections::{BTreeMap, HashMap};

use crate::error::{GradebookError, Result};
use crate::model::{
    Correction, Grade, MatNumber, Student, StudentName, Task, TaskId, Tutor, TutorName,
};
use crate::report::{
    GradeEntry, ReviewReceipt, SolutionListing, StudentListing, StudentSummary, TaskResults,
    TaskSummary, TutorSummary,
};
use crate::statistics::{apply_grade_delta, Graded};

/// In-memory gradebook.
///
/// Single-owner and synchronous. Sharing one between threads requires
/// wrapping the whole gradebook in one lock, since a review moves three
/// histograms together.
#[derive(Debug, Default)]
pub struct Gradebook {
    tutors: BTreeMap<TutorName, Tutor>,
    students: BTreeMap<MatNumber, Student>,
    /// Which tutor supervises each student; kept in step with the rosters.
    tutor_of: HashMap<MatNumber, TutorName>,
    tasks: Vec<Task>,
    current_tutor: Option<TutorName>,
}

impl Gradebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every entity and the tutor selection.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Creates the tutor `name` if needed and makes it the current tutor.
    ///
    /// Selecting an existing tutor leaves its roster and histogram untouched.
    /// Returns `true` if a new tutor was created.
    pub fn add_tutor(&mut self, name: &str) -> Result<bool> {
        let name = TutorName::new(name)?;
        let created = !self.tutors.contains_key(&name);
        if created {
            self.tutors.insert(name.clone(), Tutor::new(name.clone()));
        }
        self.current_tutor = Some(name);
        Ok(created)
    }

    /// Registers a student under the current tutor.
    pub fn add_student(&mut self, mat_number: u32, name: &str) -> Result<()> {
        let name = StudentName::new(name)?;
        let mat_number = MatNumber::new(mat_number)?;
        let tutor_name = self
            .current_tutor
            .as_ref()
            .ok_or(GradebookError::NoTutorSelected)?;
        if self.students.contains_key(&mat_number) {
            return Err(GradebookError::DuplicateStudent(mat_number));
        }
        let tutor = self
            .tutors
            .get_mut(tutor_name)
            .ok_or_else(|| GradebookError::NoSuchTutor(tutor_name.to_string()))?;

        tutor.enroll(mat_number);
        self.tutor_of.insert(mat_number, tutor_name.clone());
        self.students.insert(mat_number, Student::new(mat_number, name));
        Ok(())
    }

    /// Appends a task and returns its number.
    pub fn add_task(&mut self, description: &str) -> Result<TaskId> {
        if description.trim().is_empty() {
            return Err(GradebookError::InvalidInput("task description"));
        }
        let number = self.tasks.len() as TaskId + 1;
        self.tasks.push(Task::new(number, description));
        Ok(number)
    }

    /// Records a student's solution to a task. Each student may submit once
    /// per task.
    pub fn submit(&mut self, task: TaskId, mat_number: u32, text: &str) -> Result<()> {
        let mat = MatNumber::new(mat_number)?;
        let index = self.task_index(task)?;
        if !self.students.contains_key(&mat) {
            return Err(GradebookError::NoSuchStudent(mat_number));
        }
        if text.trim().is_empty() {
            return Err(GradebookError::InvalidInput("solution"));
        }
        self.tasks[index].add_solution(mat, text)
    }

    // -----------------------------------------------------------------------
    // Review
    // -----------------------------------------------------------------------

    /// Grades (or re-grades) a submitted solution.
    ///
    /// The student's, their tutor's, and the task's histograms all lose the
    /// previous grade (if any) and gain the new one, and the solution's
    /// correction is replaced. Nothing changes unless every lookup succeeds.
    pub fn review(
        &mut self,
        task: TaskId,
        mat_number: u32,
        grade: u8,
        comment: &str,
    ) -> Result<ReviewReceipt> {
        let mat = MatNumber::new(mat_number)?;
        let grade = Grade::new(grade)?;
        let correction = Correction::new(grade, comment)?;

        let index = self.task_index(task)?;
        let task = &mut self.tasks[index];
        let student = self
            .students
            .get_mut(&mat)
            .ok_or(GradebookError::NoSuchStudent(mat_number))?;
        let old_grade = task
            .solution(mat)
            .ok_or(GradebookError::NoSuchSolution {
                task: task.number(),
                mat_number: mat,
            })?
            .correction()
            .map(Correction::grade);
        let tutor_name = self
            .tutor_of
            .get(&mat)
            .ok_or_else(|| GradebookError::NoSuchTutor(format!("supervisor of {mat}")))?;
        let tutor = self
            .tutors
            .get_mut(tutor_name)
            .ok_or_else(|| GradebookError::NoSuchTutor(tutor_name.to_string()))?;
        debug_assert!(tutor.supervises(mat), "tutor index out of step with roster");

        apply_grade_delta(student, old_grade, grade);
        apply_grade_delta(tutor, old_grade, grade);
        apply_grade_delta(task, old_grade, grade);
        task.replace_correction(mat, correction);

        Ok(ReviewReceipt {
            tutor: tutor.name().clone(),
            mat_number: mat,
            name: student.name().clone(),
            grade,
        })
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn contains_tutor(&self, name: &str) -> bool {
        self.tutors.contains_key(name)
    }

    pub fn contains_student(&self, mat_number: u32) -> bool {
        MatNumber::new(mat_number).is_ok_and(|mat| self.students.contains_key(&mat))
    }

    pub fn contains_task(&self, task: TaskId) -> bool {
        self.task_index(task).is_ok()
    }

    pub fn contains_solution(&self, task: TaskId, mat_number: u32) -> bool {
        match (self.task(task), MatNumber::new(mat_number)) {
            (Ok(task), Ok(mat)) => task.has_solution(mat),
            _ => false,
        }
    }

    /// Whether a tutor has been created or selected yet.
    pub fn has_tutor(&self) -> bool {
        self.current_tutor.is_some()
    }

    pub fn current_tutor(&self) -> Option<&Tutor> {
        self.current_tutor
            .as_ref()
            .and_then(|name| self.tutors.get(name))
    }

    pub fn tutor(&self, name: &str) -> Result<&Tutor> {
        self.tutors
            .get(name)
            .ok_or_else(|| GradebookError::NoSuchTutor(name.to_string()))
    }

    pub fn student(&self, mat_number: u32) -> Result<&Student> {
        MatNumber::new(mat_number)
            .ok()
            .and_then(|mat| self.students.get(&mat))
            .ok_or(GradebookError::NoSuchStudent(mat_number))
    }

    pub fn task(&self, task: TaskId) -> Result<&Task> {
        let index = self.task_index(task)?;
        Ok(&self.tasks[index])
    }

    /// The tutor supervising the given student.
    pub fn tutor_of(&self, mat_number: u32) -> Result<&Tutor> {
        let student = self.student(mat_number)?;
        let name = self
            .tutor_of
            .get(&student.mat_number())
            .ok_or_else(|| GradebookError::NoSuchTutor(format!("supervisor of {mat_number}")))?;
        self.tutor(name.as_str())
    }

    /// Tutors ordered by name.
    pub fn tutors(&self) -> impl Iterator<Item = &Tutor> {
        self.tutors.values()
    }

    /// Students ordered by matriculation number.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Tasks in creation order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn task_index(&self, task: TaskId) -> Result<usize> {
        let index = task
            .checked_sub(1)
            .map(|i| i as usize)
            .filter(|&i| i < self.tasks.len());
        index.ok_or(GradebookError::NoSuchTask(task))
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    /// Every student with their tutor, ascending by matriculation number.
    pub fn list_students(&self) -> Vec<StudentListing> {
        self.students
            .values()
            .filter_map(|student| {
                let tutor = self.tutor_of.get(&student.mat_number())?;
                Some(StudentListing {
                    mat_number: student.mat_number(),
                    name: student.name().clone(),
                    tutor: tutor.clone(),
                })
            })
            .collect()
    }

    /// Every solution submitted to `task`, ascending by matriculation number.
    pub fn list_solutions(&self, task: TaskId) -> Result<Vec<SolutionListing>> {
        let task = self.task(task)?;
        Ok(task
            .solutions()
            .filter_map(|(mat, solution)| {
                let student = self.students.get(&mat)?;
                Some(SolutionListing {
                    mat_number: mat,
                    name: student.name().clone(),
                    text: solution.text().to_string(),
                })
            })
            .collect())
    }

    /// Corrected grades per task, tasks in creation order.
    pub fn results(&self) -> Vec<TaskResults> {
        self.tasks
            .iter()
            .map(|task| TaskResults {
                task: task.number(),
                description: task.description().to_string(),
                grades: task
                    .solutions()
                    .filter_map(|(mat, solution)| {
                        solution.correction().map(|c| GradeEntry {
                            mat_number: mat,
                            grade: c.grade(),
                        })
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn summary_task(&self) -> Vec<TaskSummary> {
        self.tasks
            .iter()
            .map(|task| TaskSummary {
                task: task.number(),
                description: task.description().to_string(),
                submitted: task.submitted(),
                reviewed: task.histogram().total(),
                average: task.average_grade(),
                distribution: task.histogram().counts(),
            })
            .collect()
    }

    /// Students with an average, best first (ties by matriculation number),
    /// followed by students without one, by matriculation number.
    pub fn summary_student(&self) -> Vec<StudentSummary> {
        let (mut graded, ungraded): (Vec<_>, Vec<_>) = self
            .students
            .values()
            .map(|student| StudentSummary {
                mat_number: student.mat_number(),
                name: student.name().clone(),
                average: student.average_grade(),
            })
            .partition(|row| row.average.is_some());
        graded.sort_by(|a, b| {
            a.average
                .cmp(&b.average)
                .then_with(|| a.mat_number.cmp(&b.mat_number))
        });
        graded.extend(ungraded);
        graded
    }

    /// Tutors by name with roster size, outstanding reviews, and the average
    /// of the grades they gave.
    pub fn summary_tutor(&self) -> Vec<TutorSummary> {
        self.tutors
            .values()
            .map(|tutor| TutorSummary {
                name: tutor.name().clone(),
                students: tutor.students().len(),
                missing_reviews: self.missing_reviews(tutor),
                average: tutor.average_grade(),
            })
            .collect()
    }

    /// Submitted but uncorrected solutions across all tasks by students in
    /// `tutor`'s roster.
    fn missing_reviews(&self, tutor: &Tutor) -> usize {
        self.tasks
            .iter()
            .map(|task| {
                tutor
                    .students()
                    .iter()
                    .filter(|&&mat| task.solution(mat).is_some_and(|s| !s.is_corrected()))
                    .count()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{render_lines, ReportLines};

    /// ann supervises bob (11111); task 1 "essay"; bob submitted "hi".
    fn setup() -> Gradebook {
        let mut book = Gradebook::new();
        book.add_tutor("ann").unwrap();
        book.add_student(11111, "bob").unwrap();
        assert_eq!(book.add_task("essay").unwrap(), 1);
        book.submit(1, 11111, "hi").unwrap();
        book
    }

    fn counts<G: Graded>(entity: &G) -> [u32; 5] {
        entity.histogram().counts()
    }

    #[test]
    fn add_tutor_selects_existing_without_resetting() {
        let mut book = setup();
        book.review(1, 11111, 2, "fine").unwrap();

        assert!(book.add_tutor("cat").unwrap());
        assert_eq!(book.current_tutor().unwrap().name().as_str(), "cat");
        assert!(!book.add_tutor("ann").unwrap());
        assert_eq!(book.current_tutor().unwrap().name().as_str(), "ann");

        assert_eq!(book.tutors().count(), 2);
        let ann = book.tutor("ann").unwrap();
        assert_eq!(ann.students().len(), 1);
        assert_eq!(counts(ann), [0, 1, 0, 0, 0]);
    }

    #[test]
    fn add_tutor_rejects_bad_names() {
        let mut book = Gradebook::new();
        assert_eq!(
            book.add_tutor("Ann"),
            Err(GradebookError::InvalidName("Ann".into()))
        );
        assert!(book.add_tutor("").is_err());
        assert!(!book.has_tutor());
    }

    #[test]
    fn add_student_requires_tutor() {
        let mut book = Gradebook::new();
        assert_eq!(
            book.add_student(11111, "bob"),
            Err(GradebookError::NoTutorSelected)
        );
        assert!(!book.contains_student(11111));
    }

    #[test]
    fn add_student_rejects_duplicates_across_tutors() {
        let mut book = setup();
        book.add_tutor("cat").unwrap();
        assert_eq!(
            book.add_student(11111, "dan"),
            Err(GradebookError::DuplicateStudent(MatNumber::new(11111).unwrap()))
        );
        assert!(book.tutor("cat").unwrap().students().is_empty());
        assert_eq!(book.student(11111).unwrap().name().as_str(), "bob");
    }

    #[test]
    fn add_student_validates_format() {
        let mut book = setup();
        assert_eq!(
            book.add_student(0, "dan"),
            Err(GradebookError::InvalidMatNumber(0))
        );
        assert_eq!(
            book.add_student(123_456, "dan"),
            Err(GradebookError::InvalidMatNumber(123_456))
        );
        assert_eq!(
            book.add_student(22222, "Dan"),
            Err(GradebookError::InvalidName("Dan".into()))
        );
    }

    #[test]
    fn tasks_are_numbered_sequentially() {
        let mut book = Gradebook::new();
        assert_eq!(book.add_task("a").unwrap(), 1);
        assert_eq!(book.add_task("b").unwrap(), 2);
        assert_eq!(
            book.add_task("  "),
            Err(GradebookError::InvalidInput("task description"))
        );
        assert_eq!(book.add_task("c").unwrap(), 3);
        assert!(book.contains_task(3));
        assert!(!book.contains_task(0));
        assert!(!book.contains_task(4));
    }

    #[test]
    fn submit_checks_references_and_duplicates() {
        let mut book = setup();
        assert_eq!(book.submit(2, 11111, "x"), Err(GradebookError::NoSuchTask(2)));
        assert_eq!(
            book.submit(1, 22222, "x"),
            Err(GradebookError::NoSuchStudent(22222))
        );
        assert!(matches!(
            book.submit(1, 11111, "again"),
            Err(GradebookError::DuplicateSolution { task: 1, .. })
        ));
        assert!(book.contains_solution(1, 11111));
        assert!(!book.contains_solution(1, 22222));
        assert!(!book.contains_solution(9, 11111));
    }

    #[test]
    fn review_requires_submission() {
        let mut book = setup();
        book.add_student(22222, "eve").unwrap();
        assert!(matches!(
            book.review(1, 22222, 1, "x"),
            Err(GradebookError::NoSuchSolution { task: 1, .. })
        ));
        assert_eq!(counts(book.student(22222).unwrap()), [0; 5]);
        assert_eq!(counts(book.tutor("ann").unwrap()), [0; 5]);
        assert_eq!(counts(book.task(1).unwrap()), [0; 5]);
    }

    #[test]
    fn review_rejects_bad_grade_and_comment_without_side_effects() {
        let mut book = setup();
        assert_eq!(
            book.review(1, 11111, 6, "x").unwrap_err(),
            GradebookError::InvalidGrade(6)
        );
        assert_eq!(
            book.review(1, 11111, 3, " ").unwrap_err(),
            GradebookError::InvalidComment
        );
        assert_eq!(
            book.review(3, 11111, 3, "ok").unwrap_err(),
            GradebookError::NoSuchTask(3)
        );
        let task = book.task(1).unwrap();
        let solution = task.solution(MatNumber::new(11111).unwrap()).unwrap();
        assert!(solution.correction().is_none());
        assert_eq!(task.histogram().total(), 0);
    }

    #[test]
    fn review_updates_all_three_histograms() {
        let mut book = setup();
        let receipt = book.review(1, 11111, 3, "ok").unwrap();
        assert_eq!(receipt.to_string(), "ann reviewed (11111,bob) with grade 3");

        assert_eq!(counts(book.student(11111).unwrap()), [0, 0, 1, 0, 0]);
        assert_eq!(counts(book.tutor("ann").unwrap()), [0, 0, 1, 0, 0]);
        assert_eq!(counts(book.task(1).unwrap()), [0, 0, 1, 0, 0]);
    }

    #[test]
    fn re_review_moves_counts_to_last_grade() {
        let mut book = setup();
        for grade in [3, 1, 5, 5, 2] {
            book.review(1, 11111, grade, "again").unwrap();
        }
        for histogram in [
            counts(book.student(11111).unwrap()),
            counts(book.tutor("ann").unwrap()),
            counts(book.task(1).unwrap()),
        ] {
            assert_eq!(histogram, [0, 1, 0, 0, 0]);
        }
        let task = book.task(1).unwrap();
        let solution = task.solution(MatNumber::new(11111).unwrap()).unwrap();
        assert_eq!(solution.correction().unwrap().grade().get(), 2);
        assert_eq!(solution.correction().unwrap().comment(), "again");
    }

    #[test]
    fn tutor_histogram_spans_all_supervised_students() {
        let mut book = setup();
        book.add_student(22222, "eve").unwrap();
        book.add_tutor("cat").unwrap();
        book.add_student(33333, "fay").unwrap();
        book.submit(1, 22222, "b").unwrap();
        book.submit(1, 33333, "c").unwrap();

        book.review(1, 11111, 1, "a").unwrap();
        book.review(1, 22222, 3, "b").unwrap();
        let receipt = book.review(1, 33333, 4, "c").unwrap();
        assert_eq!(receipt.tutor.as_str(), "cat");

        assert_eq!(counts(book.tutor("ann").unwrap()), [1, 0, 1, 0, 0]);
        assert_eq!(counts(book.tutor("cat").unwrap()), [0, 0, 0, 1, 0]);
        assert_eq!(counts(book.task(1).unwrap()), [1, 0, 1, 1, 0]);
        assert_eq!(book.tutor_of(33333).unwrap().name().as_str(), "cat");
    }

    #[test]
    fn lookups_report_missing_entities() {
        let book = setup();
        assert_eq!(
            book.tutor("zed").unwrap_err(),
            GradebookError::NoSuchTutor("zed".into())
        );
        assert_eq!(
            book.student(99999).unwrap_err(),
            GradebookError::NoSuchStudent(99999)
        );
        assert!(book.task(0).unwrap_err().is_not_found());
        assert!(book.contains_tutor("ann"));
        assert!(!book.contains_tutor("zed"));
    }

    #[test]
    fn list_students_names_tutors() {
        let mut book = setup();
        book.add_tutor("cat").unwrap();
        book.add_student(10000, "dan").unwrap();
        assert_eq!(
            render_lines(&book.list_students()),
            vec!["(10000,dan): cat", "(11111,bob): ann"]
        );
    }

    #[test]
    fn list_solutions_returns_text_unchanged() {
        let mut book = setup();
        book.add_student(10000, "dan").unwrap();
        book.submit(1, 10000, "x+y=z").unwrap();
        assert_eq!(
            render_lines(&book.list_solutions(1).unwrap()),
            vec!["(10000,dan): x+y=z", "(11111,bob): hi"]
        );
        assert_eq!(
            book.list_solutions(2).unwrap_err(),
            GradebookError::NoSuchTask(2)
        );
    }

    #[test]
    fn results_skip_uncorrected_solutions() {
        let mut book = setup();
        book.add_student(10000, "dan").unwrap();
        book.submit(1, 10000, "x").unwrap();
        book.add_task("proof").unwrap();
        book.review(1, 11111, 3, "ok").unwrap();
        assert_eq!(
            render_lines(&book.results()),
            vec!["task id(1): essay", "11111: 3", "task id(2): proof"]
        );
        book.review(1, 11111, 4, "worse").unwrap();
        assert_eq!(render_lines(&book.results())[1], "11111: 4");
    }

    #[test]
    fn summary_task_counts_submissions_and_reviews() {
        let mut book = setup();
        book.add_student(22222, "eve").unwrap();
        book.submit(1, 22222, "x").unwrap();
        book.review(1, 22222, 2, "ok").unwrap();
        let summary = book.summary_task();
        assert_eq!(
            summary[0].lines(),
            vec![
                "task id(1): essay",
                "submitted: 2",
                "reviewed: 1",
                "average grade: 2.00",
                "distribution: 0x1, 1x2, 0x3, 0x4, 0x5",
            ]
        );
    }

    #[test]
    fn summary_student_orders_by_average_then_mat_number() {
        let mut book = Gradebook::new();
        book.add_tutor("ann").unwrap();
        for (mat, name) in [
            (50000, "eve"),
            (40000, "dan"),
            (30000, "cy"),
            (20000, "bo"),
            (10000, "al"),
        ] {
            book.add_student(mat, name).unwrap();
        }
        book.add_task("t").unwrap();
        for (mat, grade) in [(50000, 2), (40000, 2), (30000, 1)] {
            book.submit(1, mat, "s").unwrap();
            book.review(1, mat, grade, "c").unwrap();
        }
        assert_eq!(
            render_lines(&book.summary_student()),
            vec![
                "(30000,cy): 1.00",
                "(40000,dan): 2.00",
                "(50000,eve): 2.00",
                "(10000,al): -",
                "(20000,bo): -",
            ]
        );
    }

    #[test]
    fn summary_tutor_counts_missing_reviews() {
        let mut book = setup();
        assert_eq!(
            render_lines(&book.summary_tutor()),
            vec!["ann: 1 students, 1 missing review(s), average grade -"]
        );
        book.review(1, 11111, 3, "ok").unwrap();
        assert_eq!(
            render_lines(&book.summary_tutor()),
            vec!["ann: 1 students, 0 missing review(s), average grade 3.00"]
        );
    }

    #[test]
    fn summary_tutor_sorted_by_name() {
        let mut book = Gradebook::new();
        book.add_tutor("zoe").unwrap();
        book.add_tutor("ann").unwrap();
        let names: Vec<String> = book
            .summary_tutor()
            .iter()
            .map(|row| row.name.to_string())
            .collect();
        assert_eq!(names, vec!["ann", "zoe"]);
    }

    #[test]
    fn reset_discards_everything() {
        let mut book = setup();
        book.reset();
        assert!(!book.has_tutor());
        assert!(book.tasks().is_empty());
        assert_eq!(book.students().count(), 0);
        assert_eq!(book.add_task("fresh").unwrap(), 1);
    }
}
