//! Grade histograms and average-grade arithmetic.
//!
//! Students, tutors, and tasks each accumulate a five-slot histogram of the
//! grades their corrected solutions received. The [`Graded`] trait gives all
//! three the same increment/decrement/average behaviour, and
//! [`apply_grade_delta`] is the one place where a re-review moves a count from
//! the old grade's slot to the new one.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::Grade;

/// Number of distinct grades (1 through 5).
pub const GRADE_SLOTS: usize = 5;

/// Count of corrected solutions per grade. Slot `g - 1` holds grade `g`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeHistogram {
    counts: [u32; GRADE_SLOTS],
}

impl GradeHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, grade: Grade) {
        self.counts[grade.slot()] += 1;
    }

    /// Removes one occurrence of `grade`.
    ///
    /// Decrementing an empty slot means a correction was counted twice or
    /// never counted at all; debug builds panic, release builds stay at zero.
    pub fn decrement(&mut self, grade: Grade) {
        let slot = &mut self.counts[grade.slot()];
        debug_assert!(*slot > 0, "decrementing empty histogram slot for grade {grade}");
        *slot = slot.saturating_sub(1);
    }

    /// Total number of corrected solutions.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Raw counts, grade 1 first.
    pub fn counts(&self) -> [u32; GRADE_SLOTS] {
        self.counts
    }

    /// Weighted mean of the histogram, or `None` when nothing was corrected.
    pub fn average(&self) -> Option<Average> {
        let weighted_sum = self
            .counts
            .iter()
            .enumerate()
            .map(|(slot, &count)| (slot as u64 + 1) * count as u64)
            .sum();
        Average::new(weighted_sum, self.total() as u64)
    }
}

/// An exact average grade, kept as a fraction so that ordering and rounding
/// never depend on floating point.
#[derive(Debug, Clone, Copy)]
pub struct Average {
    weighted_sum: u64,
    count: u64,
}

impl Average {
    /// Returns `None` when `count` is zero; there is no average of nothing.
    pub fn new(weighted_sum: u64, count: u64) -> Option<Self> {
        (count > 0).then_some(Self {
            weighted_sum,
            count,
        })
    }

    /// The average in hundredths, rounded half up.
    pub fn hundredths(&self) -> u64 {
        (self.weighted_sum * 200 + self.count) / (self.count * 2)
    }
}

impl PartialEq for Average {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Average {}

impl PartialOrd for Average {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Average {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weighted_sum * other.count).cmp(&(other.weighted_sum * self.count))
    }
}

/// Two decimals, round half up, always `.` as the decimal point.
impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = self.hundredths();
        write!(f, "{}.{:02}", hundredths / 100, hundredths % 100)
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.hundredths() as f64 / 100.0)
    }
}

/// Renders an optional average the way every report does: `X.XX` or `-`.
pub fn format_average(average: Option<Average>) -> String {
    match average {
        Some(avg) => avg.to_string(),
        None => "-".to_string(),
    }
}

/// Anything that accumulates a grade histogram.
pub trait Graded {
    fn histogram(&self) -> &GradeHistogram;

    fn histogram_mut(&mut self) -> &mut GradeHistogram;

    fn inc_grade(&mut self, grade: Grade) {
        self.histogram_mut().increment(grade);
    }

    fn dec_grade(&mut self, grade: Grade) {
        self.histogram_mut().decrement(grade);
    }

    fn average_grade(&self) -> Option<Average> {
        self.histogram().average()
    }
}

/// Moves one correction from `old` to `new` in `entity`'s histogram.
///
/// With no previous grade this is a plain increment. The decrement always
/// happens before the increment.
pub fn apply_grade_delta<G: Graded + ?Sized>(entity: &mut G, old: Option<Grade>, new: Grade) {
    if let Some(old) = old {
        entity.dec_grade(old);
    }
    entity.inc_grade(new);
}
