use chrono::{DateTime, Utc};

pub use crate::config::*;

/// A builder for election snapshots.
///
/// This is mostly useful when the data does not come from the backend, for
/// example in tests or when replaying a past election.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use election_tally::builder::Builder;
/// use election_tally::{resolve_winner, WinnerOutcome};
/// # use election_tally::ElectionErrors;
///
/// let start: DateTime<Utc> = "2025-06-15T00:00:00Z".parse().unwrap();
/// let end: DateTime<Utc> = "2025-06-20T00:00:00Z".parse().unwrap();
///
/// let election = Builder::new("e1", "Student council")
///     .schedule(start, end)
///     .candidate("c1", "Anna", "anna@example.org", 12)?
///     .candidate("c2", "Bob", "bob@example.org", 7)?
///     .build()?;
///
/// assert!(matches!(resolve_winner(&election.candidates), WinnerOutcome::SingleWinner(c) if c.id == "c1"));
///
/// # Ok::<(), ElectionErrors>(())
/// ```
pub struct Builder {
    pub(crate) _id: String,
    pub(crate) _title: String,
    pub(crate) _description: String,
    pub(crate) _schedule: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub(crate) _candidates: Vec<Candidate>,
}

impl Builder {
    pub fn new(id: &str, title: &str) -> Builder {
        Builder {
            _id: id.to_string(),
            _title: title.to_string(),
            _description: String::new(),
            _schedule: None,
            _candidates: Vec::new(),
        }
    }

    pub fn description(self, description: &str) -> Builder {
        Builder {
            _description: description.to_string(),
            ..self
        }
    }

    pub fn schedule(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Builder {
        Builder {
            _schedule: Some((start, end)),
            ..self
        }
    }

    /// Adds an approved candidate with its current count.
    pub fn candidate(
        self,
        id: &str,
        name: &str,
        email: &str,
        vote_count: u64,
    ) -> Result<Builder, ElectionErrors> {
        self.add_candidate(Candidate {
            id: id.to_string(),
            member: Member {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            },
            status: CandidacyStatus::Approved,
            vote_count,
        })
    }

    /// Adds a candidacy that is not on the ballot yet.
    pub fn pending_candidate(
        self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<Builder, ElectionErrors> {
        self.add_candidate(Candidate {
            id: id.to_string(),
            member: Member {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            },
            status: CandidacyStatus::Pending,
            vote_count: 0,
        })
    }

    /// Adds a candidate. Candidate ids must be unique within the election.
    pub fn add_candidate(mut self, candidate: Candidate) -> Result<Builder, ElectionErrors> {
        if self._candidates.iter().any(|c| c.id == candidate.id) {
            return Err(ElectionErrors::DuplicateCandidate(candidate.id));
        }
        self._candidates.push(candidate);
        Ok(self)
    }

    pub fn build(self) -> Result<Election, ElectionErrors> {
        if self._title.trim().is_empty() {
            return Err(ElectionErrors::EmptyTitle);
        }
        let (start, end) = self._schedule.ok_or(ElectionErrors::MissingSchedule)?;
        Ok(Election {
            id: self._id,
            title: self._title,
            description: self._description,
            start,
            end,
            candidates: self._candidates,
        })
    }
}
