use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Relative slack allowed between a stored average and its recomputed value.
const AVERAGE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub total_score: f64,
    pub average_grade: f64,
    pub rank: u32,
    pub previous_rank: u32,
    pub assignments: u32,
    pub last_submission: Option<DateTime<Utc>>,
}

impl Student {
    /// A student with no graded work yet. Rank is filled in by the roster.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            total_score: 0.0,
            average_grade: 0.0,
            rank: 0,
            previous_rank: 0,
            assignments: 0,
            last_submission: None,
        }
    }

    /// Positive when the student moved up in the last recompute.
    pub fn rank_change(&self) -> i64 {
        i64::from(self.previous_rank) - i64::from(self.rank)
    }
}

/// Average for a running total; zero until the first graded assignment.
pub fn average_of(total_score: f64, assignments: u32) -> f64 {
    if assignments == 0 {
        0.0
    } else {
        total_score / f64::from(assignments)
    }
}

/// The whole class, kept in rank order. Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    /// Builds a fresh roster in the given order: rank i+1, no movement.
    pub fn enroll(students: Vec<Student>) -> Self {
        let students = students
            .into_iter()
            .enumerate()
            .map(|(index, mut student)| {
                student.rank = index as u32 + 1;
                student.previous_rank = student.rank;
                student
            })
            .collect();
        Self { students }
    }

    /// Wraps students whose ranks were already assigned.
    pub(crate) fn from_ranked(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn find(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == student_id)
    }

    /// Checks the invariants a persisted roster must hold before it is trusted:
    /// unique ids, averages that match the totals, and students stored in
    /// rank order 1..N with averages never rising down the list.
    pub fn check_consistency(&self) -> Result<(), RosterError> {
        let mut ids = HashSet::new();
        let mut previous_average: Option<f64> = None;

        for (position, student) in self.students.iter().enumerate() {
            if !ids.insert(student.id.as_str()) {
                return Err(RosterError::DuplicateId(student.id.clone()));
            }
            if !student.total_score.is_finite() || !student.average_grade.is_finite() {
                return Err(RosterError::NonFiniteScore(student.id.clone()));
            }
            if student.total_score < 0.0 {
                return Err(RosterError::NegativeTotal(student.id.clone()));
            }
            if student.assignments == 0 && student.total_score != 0.0 {
                return Err(RosterError::TotalWithoutAssignments(student.id.clone()));
            }

            let expected = average_of(student.total_score, student.assignments);
            let tolerance = AVERAGE_TOLERANCE * expected.abs().max(1.0);
            if (student.average_grade - expected).abs() > tolerance {
                return Err(RosterError::AverageMismatch {
                    id: student.id.clone(),
                    stored: student.average_grade,
                    expected,
                });
            }

            if student.rank as usize != position + 1 {
                return Err(RosterError::RankOutOfOrder {
                    id: student.id.clone(),
                    rank: student.rank,
                    position: position + 1,
                });
            }
            if previous_average.is_some_and(|above| student.average_grade > above) {
                return Err(RosterError::AverageAboveRankAbove(student.id.clone()));
            }
            previous_average = Some(student.average_grade);
        }

        Ok(())
    }
}

/// One graded assignment for one student, already parsed from form input.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub student_id: String,
    pub assignment_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Excellent,
    Good,
    Fair,
    Passing,
    Failing,
}

impl GradeBand {
    pub const ALL: [GradeBand; 5] = [
        GradeBand::Excellent,
        GradeBand::Good,
        GradeBand::Fair,
        GradeBand::Passing,
        GradeBand::Failing,
    ];

    pub fn for_average(average: f64) -> Self {
        if average >= 90.0 {
            GradeBand::Excellent
        } else if average >= 80.0 {
            GradeBand::Good
        } else if average >= 70.0 {
            GradeBand::Fair
        } else if average >= 60.0 {
            GradeBand::Passing
        } else {
            GradeBand::Failing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeBand::Excellent => "90-100",
            GradeBand::Good => "80-89",
            GradeBand::Fair => "70-79",
            GradeBand::Passing => "60-69",
            GradeBand::Failing => "0-59",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Podium,
    TopTen,
    Field,
}

impl RankTier {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            0..=3 => RankTier::Podium,
            4..=10 => RankTier::TopTen,
            _ => RankTier::Field,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandCount {
    pub band: GradeBand,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub student_count: usize,
    pub class_average: f64,
    pub top_average: f64,
    pub distribution: Vec<BandCount>,
}
