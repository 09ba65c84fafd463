use chrono::{DateTime, Duration, Utc};

use crate::models::{average_of, Roster, Student};

/// The demo class a fresh install starts with.
pub fn default_roster() -> Roster {
    default_roster_at(Utc::now())
}

pub fn default_roster_at(now: DateTime<Utc>) -> Roster {
    // (id, name, email, total, previous rank, hours since last submission)
    let rows = [
        ("1", "Emma Johnson", "emma.johnson@school.edu", 475.0, 2, 2),
        ("2", "Liam Chen", "liam.chen@school.edu", 460.0, 1, 24),
        ("3", "Sophia Rodriguez", "sophia.rodriguez@school.edu", 445.0, 4, 3),
        ("4", "Noah Williams", "noah.williams@school.edu", 430.0, 3, 5),
        ("5", "Isabella Brown", "isabella.brown@school.edu", 415.0, 5, 24),
        ("6", "James Davis", "james.davis@school.edu", 400.0, 7, 48),
        ("7", "Olivia Miller", "olivia.miller@school.edu", 385.0, 6, 24),
        ("8", "Benjamin Wilson", "benjamin.wilson@school.edu", 370.0, 8, 72),
    ];

    let students = rows
        .into_iter()
        .enumerate()
        .map(|(index, (id, name, email, total, previous_rank, hours))| {
            let mut student = Student::new(id, name, email);
            student.total_score = total;
            student.assignments = 5;
            student.average_grade = average_of(total, 5);
            student.rank = index as u32 + 1;
            student.previous_rank = previous_rank;
            student.last_submission = Some(now - Duration::hours(hours));
            student
        })
        .collect();

    Roster::from_ranked(students)
}
