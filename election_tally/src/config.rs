// ********* Input data structures ***********

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::Display;

/// A registered member of the platform, as shown next to a candidacy.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Whether a candidacy has been accepted on the ballot by an administrator.
/// Only approved candidacies appear on a ballot.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CandidacyStatus {
    Pending,
    Approved,
    Denied,
}

/// A candidate in one election.
///
/// The vote count is maintained by the backend. It is already aggregated:
/// individual ballots never reach this library.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub id: String,
    pub member: Member,
    pub status: CandidacyStatus,
    pub vote_count: u64,
}

/// A read-only snapshot of an election as returned by the backend.
///
/// The end instant is expected to come after the start instant. This is not
/// checked here, see [`crate::classify_status`] for the behaviour on inverted
/// schedules.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub candidates: Vec<Candidate>,
}

// ******** Output data structures *********

/// The lifecycle state of an election. It is always derived from the
/// schedule and the current instant, never stored.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum ElectionStatus {
    Scheduled,
    Active,
    Completed,
}

/// The visual style of a status badge.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BadgeVariant {
    Default,
    Outline,
    Secondary,
}

impl ElectionStatus {
    pub const ALL: [ElectionStatus; 3] = [
        ElectionStatus::Scheduled,
        ElectionStatus::Active,
        ElectionStatus::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ElectionStatus::Scheduled => "Scheduled",
            ElectionStatus::Active => "Active",
            ElectionStatus::Completed => "Completed",
        }
    }

    /// One badge per status, no two statuses share a badge.
    pub fn badge(&self) -> BadgeVariant {
        match self {
            ElectionStatus::Active => BadgeVariant::Default,
            ElectionStatus::Scheduled => BadgeVariant::Outline,
            ElectionStatus::Completed => BadgeVariant::Secondary,
        }
    }
}

impl Display for ElectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl BadgeVariant {
    pub fn name(&self) -> &'static str {
        match self {
            BadgeVariant::Default => "default",
            BadgeVariant::Outline => "outline",
            BadgeVariant::Secondary => "secondary",
        }
    }
}

/// Tally line for one candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateTally {
    pub candidate_id: String,
    pub name: String,
    pub email: String,
    pub vote_count: u64,
    /// Share of the total, rounded half up. Always within [0, 100].
    pub vote_percentage: u32,
    /// Length of the progress bar relative to the leading candidate, in [0, 100].
    pub bar_width: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyResult {
    pub total_votes: u64,
    /// Highest count, never below 1. Only used to scale the bars.
    pub max_votes: u64,
    pub candidates: Vec<CandidateTally>,
}

/// The outcome of an election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum WinnerOutcome<'a> {
    /// No vote was cast.
    NoWinner,
    SingleWinner(&'a Candidate),
    /// All the candidates sharing the highest count.
    Tie(Vec<&'a Candidate>),
}

/// The condensed form of an election used by the listings and the dashboard.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionSummary {
    pub id: String,
    pub title: String,
    /// The date displayed for this election.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ElectionStatus,
    pub organiser: Option<String>,
    pub candidate_count: usize,
}

/// Errors raised while assembling an election snapshot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ElectionErrors {
    DuplicateCandidate(String),
    EmptyTitle,
    MissingSchedule,
}

impl Error for ElectionErrors {}

impl Display for ElectionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionErrors::DuplicateCandidate(id) => {
                write!(f, "candidate {} appears more than once", id)
            }
            ElectionErrors::EmptyTitle => write!(f, "an election needs a title"),
            ElectionErrors::MissingSchedule => write!(f, "an election needs a start and an end"),
        }
    }
}
