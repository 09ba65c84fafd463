use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::ValidationError;
use crate::models::{average_of, Roster, Submission};
use crate::ranking;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

impl Submission {
    /// Parses raw form input the way the grade entry form receives it.
    pub fn parse(
        student_id: &str,
        assignment_name: &str,
        score: &str,
    ) -> Result<Self, ValidationError> {
        let student_id = require("student", student_id)?;
        let assignment_name = require("assignment", assignment_name)?;
        let score_text = require("score", score)?;

        let score: f64 = score_text
            .parse()
            .map_err(|_| ValidationError::ScoreNotNumeric(score_text.clone()))?;

        let submission = Self {
            student_id,
            assignment_name,
            score,
        };
        submission.validate()?;
        Ok(submission)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_id.trim().is_empty() {
            return Err(ValidationError::MissingField("student"));
        }
        if self.assignment_name.trim().is_empty() {
            return Err(ValidationError::MissingField("assignment"));
        }
        if !self.score.is_finite() {
            return Err(ValidationError::ScoreNotFinite);
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(ValidationError::ScoreOutOfRange(self.score));
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Records one graded assignment and re-ranks the whole class.
///
/// The input roster is never modified; on error nothing has changed.
pub fn submit_grade(
    roster: &Roster,
    submission: &Submission,
    now: DateTime<Utc>,
) -> Result<Roster, ValidationError> {
    submission.validate()?;

    let mut students = roster.students().to_vec();
    let student = students
        .iter_mut()
        .find(|student| student.id == submission.student_id)
        .ok_or_else(|| ValidationError::UnknownStudent(submission.student_id.clone()))?;

    let assignments = student
        .assignments
        .checked_add(1)
        .ok_or_else(|| ValidationError::AssignmentLimit(student.id.clone()))?;

    student.total_score += submission.score;
    student.assignments = assignments;
    student.average_grade = average_of(student.total_score, student.assignments);
    student.last_submission = Some(now);
    debug!(
        student = %student.id,
        assignment = %submission.assignment_name,
        average = student.average_grade,
        "recorded grade"
    );

    Ok(Roster::from_ranked(ranking::rank_students(students)))
}
