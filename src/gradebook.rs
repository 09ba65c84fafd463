use chrono::Utc;
use tracing::info;

use crate::aggregate::submit_grade;
use crate::error::GradebookError;
use crate::models::{Roster, Submission};
use crate::store::{KeyValueBackend, RosterStore};

/// The current roster plus the store it is mirrored to. All mutations go
/// through here and are persisted before the in-memory roster is replaced.
pub struct Gradebook<B> {
    store: RosterStore<B>,
    roster: Roster,
}

impl<B: KeyValueBackend> Gradebook<B> {
    pub async fn open(store: RosterStore<B>) -> Result<Self, GradebookError> {
        let roster = store.load().await?;
        Ok(Self { store, roster })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub async fn submit(&mut self, submission: &Submission) -> Result<&Roster, GradebookError> {
        let updated = submit_grade(&self.roster, submission, Utc::now())?;
        self.commit(updated).await?;
        info!(
            student = %submission.student_id,
            assignment = %submission.assignment_name,
            score = submission.score,
            "grade submitted"
        );
        Ok(&self.roster)
    }

    /// Applies every submission or none of them.
    pub async fn submit_batch(
        &mut self,
        submissions: &[Submission],
    ) -> Result<&Roster, GradebookError> {
        let mut working = self.roster.clone();
        for (index, submission) in submissions.iter().enumerate() {
            working = submit_grade(&working, submission, Utc::now()).map_err(|source| {
                GradebookError::InvalidRow {
                    row: index + 1,
                    source,
                }
            })?;
        }
        self.commit(working).await?;
        info!(count = submissions.len(), "batch of grades submitted");
        Ok(&self.roster)
    }

    /// Replaces the class wholesale, e.g. when re-seeding.
    pub async fn reset(&mut self, roster: Roster) -> Result<&Roster, GradebookError> {
        self.commit(roster).await?;
        info!(students = self.roster.len(), "roster reset");
        Ok(&self.roster)
    }

    async fn commit(&mut self, roster: Roster) -> Result<(), GradebookError> {
        self.store.save(&roster).await?;
        self.roster = roster;
        Ok(())
    }
}
