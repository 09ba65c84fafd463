use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in the {0} field")]
    MissingField(&'static str),

    #[error("Score must be a number between 0 and 100, got {0:?}")]
    ScoreNotNumeric(String),

    #[error("Score must be a finite number")]
    ScoreNotFinite,

    #[error("Score must be between 0 and 100, got {0}")]
    ScoreOutOfRange(f64),

    #[error("No student with id {0} in the roster")]
    UnknownStudent(String),

    #[error("Student {0} cannot record any more assignments")]
    AssignmentLimit(String),
}

/// Ways a roster can break its own invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("duplicate student id {0}")]
    DuplicateId(String),

    #[error("non-finite score for student {0}")]
    NonFiniteScore(String),

    #[error("negative total score for student {0}")]
    NegativeTotal(String),

    #[error("student {0} has a total score but no assignments")]
    TotalWithoutAssignments(String),

    #[error("student {id} stores average {stored} but totals give {expected}")]
    AverageMismatch {
        id: String,
        stored: f64,
        expected: f64,
    },

    #[error("student {id} at position {position} has rank {rank}")]
    RankOutOfOrder { id: String, rank: u32, position: usize },

    #[error("student {0} averages higher than the student ranked above")]
    AverageAboveRankAbove(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode roster: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Persisted roster is corrupt: {0}")]
    Corrupt(String),

    #[error("Persisted roster is inconsistent: {0}")]
    Inconsistent(#[from] RosterError),
}

#[derive(Error, Debug)]
pub enum GradebookError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
