use std::io::Read;
use std::path::Path;

use anyhow::Context;
use uuid::Uuid;

use crate::error::GradebookError;
use crate::models::{Roster, Student, Submission};

#[derive(serde::Deserialize)]
struct RosterRow {
    name: String,
    email: String,
}

#[derive(serde::Deserialize)]
struct SubmissionRow {
    student_id: String,
    assignment_name: String,
    score: String,
}

/// Builds a fresh roster from a `name,email` CSV. Students get new ids and
/// start ranked in file order.
pub fn read_roster(csv_path: &Path) -> anyhow::Result<Roster> {
    let reader = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    roster_from_reader(reader)
}

fn roster_from_reader<R: Read>(reader: R) -> anyhow::Result<Roster> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut students = Vec::new();

    for result in reader.deserialize::<RosterRow>() {
        let row = result?;
        students.push(Student::new(
            Uuid::new_v4().to_string(),
            row.name.trim(),
            row.email.trim(),
        ));
    }

    Ok(Roster::enroll(students))
}

/// Reads `student_id,assignment_name,score` rows with the same validation as
/// a single submission. Row numbers in errors count data rows from 1.
pub fn read_submissions(csv_path: &Path) -> anyhow::Result<Vec<Submission>> {
    let reader = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    submissions_from_reader(reader)
}

fn submissions_from_reader<R: Read>(reader: R) -> anyhow::Result<Vec<Submission>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut submissions = Vec::new();

    for (index, result) in reader.deserialize::<SubmissionRow>().enumerate() {
        let row = result?;
        let submission = Submission::parse(&row.student_id, &row.assignment_name, &row.score)
            .map_err(|source| GradebookError::InvalidRow {
                row: index + 1,
                source,
            })?;
        submissions.push(submission);
    }

    Ok(submissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn roster_rows_become_fresh_students() {
        let csv = "name,email\nAvery Lee,avery@school.edu\nJules Moreno, jules@school.edu\n";
        let roster = roster_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(roster.len(), 2);
        let jules = &roster.students()[1];
        assert_eq!(jules.email, "jules@school.edu");
        assert_eq!((jules.rank, jules.previous_rank, jules.assignments), (2, 2, 0));
        assert_ne!(roster.students()[0].id, jules.id);
        assert!(roster.check_consistency().is_ok());
    }

    #[test]
    fn submission_rows_are_validated() {
        let csv = "student_id,assignment_name,score\n1,Quiz 1,88\n2,Quiz 1,91.5\n";
        let submissions = submissions_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[1].score, 91.5);
    }

    #[test]
    fn invalid_submission_row_reports_its_position() {
        let csv = "student_id,assignment_name,score\n1,Quiz 1,88\n2,Quiz 1,150\n";
        let err = submissions_from_reader(csv.as_bytes()).unwrap_err();
        match err.downcast_ref::<GradebookError>() {
            Some(GradebookError::InvalidRow { row, source }) => {
                assert_eq!(*row, 2);
                assert_eq!(*source, ValidationError::ScoreOutOfRange(150.0));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
