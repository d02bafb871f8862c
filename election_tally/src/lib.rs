mod config;
pub mod builder;
pub mod dashboard;
pub mod manual;

use chrono::{DateTime, Utc};
use log::{debug, info};

pub use crate::config::*;

// **** Private structures ****

/// A number of votes. Sums are held in 128 bits so that adding up counts read
/// from the backend cannot overflow.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u128);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);

    fn of(count: u64) -> VoteCount {
        VoteCount(count as u128)
    }

    /// The count as reported in the outputs, capped to the `u64` range.
    fn reported(self) -> u64 {
        u64::try_from(self.0).unwrap_or(u64::MAX)
    }

    /// Rounds `self / total * 100` half up, without going through floats.
    /// Returns 0 when there is no vote at all.
    fn percentage_of(self, total: VoteCount) -> u32 {
        if total == VoteCount::EMPTY {
            return 0;
        }
        let num = self.0.saturating_mul(200).saturating_add(total.0);
        let den = total.0.saturating_mul(2);
        (num / den).min(100) as u32
    }
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.fold(0u128, |acc, vc| acc.saturating_add(vc.0)))
    }
}

// **** Status ****

/// Classifies an election from its schedule.
///
/// Both ends of the schedule are inclusive: an election is active at its exact
/// start instant and at its exact end instant.
///
/// If the schedule is inverted (`end < start`), no instant can be active: the
/// election is scheduled before `start` and completed from `start` onward.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use election_tally::{classify_status, ElectionStatus};
///
/// let start: DateTime<Utc> = "2025-06-15T00:00:00Z".parse().unwrap();
/// let end: DateTime<Utc> = "2025-06-20T00:00:00Z".parse().unwrap();
/// let now: DateTime<Utc> = "2025-06-16T00:00:00Z".parse().unwrap();
/// assert_eq!(classify_status(now, start, end), ElectionStatus::Active);
/// ```
pub fn classify_status(
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ElectionStatus {
    if now < start {
        ElectionStatus::Scheduled
    } else if now <= end {
        ElectionStatus::Active
    } else {
        ElectionStatus::Completed
    }
}

impl Election {
    pub fn status(&self, now: DateTime<Utc>) -> ElectionStatus {
        classify_status(now, self.start, self.end)
    }
}

impl ElectionSummary {
    pub fn from_election(election: &Election, now: DateTime<Utc>) -> ElectionSummary {
        ElectionSummary {
            candidate_count: election.candidates.len(),
            ..ElectionSummary::from_schedule(
                &election.id,
                &election.title,
                election.start,
                election.end,
                now,
            )
        }
    }

    /// A summary for listings that only carry the schedule of the election.
    pub fn from_schedule(
        id: &str,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ElectionSummary {
        ElectionSummary {
            id: id.to_string(),
            title: title.to_string(),
            start,
            end,
            status: classify_status(now, start, end),
            organiser: None,
            candidate_count: 0,
        }
    }
}

// **** Tally ****

/// Aggregates the vote counts of the candidates into totals and percentages.
///
/// Percentages are rounded independently, so they do not necessarily add up
/// to 100. Candidates are returned in input order.
pub fn aggregate(candidates: &[Candidate]) -> TallyResult {
    let total: VoteCount = candidates.iter().map(|c| VoteCount::of(c.vote_count)).sum();
    let max_votes = candidates
        .iter()
        .map(|c| VoteCount::of(c.vote_count))
        .max()
        .unwrap_or(VoteCount::EMPTY)
        .max(VoteCount(1));
    debug!(
        "aggregate: {} candidates, total: {:?}, max: {:?}",
        candidates.len(),
        total,
        max_votes
    );

    let tallies: Vec<CandidateTally> = candidates
        .iter()
        .map(|c| {
            let count = VoteCount::of(c.vote_count);
            CandidateTally {
                candidate_id: c.id.clone(),
                name: c.member.name.clone(),
                email: c.member.email.clone(),
                vote_count: c.vote_count,
                vote_percentage: count.percentage_of(total),
                bar_width: count.percentage_of(max_votes),
            }
        })
        .collect();

    TallyResult {
        total_votes: total.reported(),
        max_votes: max_votes.reported(),
        candidates: tallies,
    }
}

/// Finds the winner of an election, or the candidates tied at the top.
///
/// This does not look at the schedule. Use [`resolve_completed_winner`] to only
/// get an outcome once the election is over.
pub fn resolve_winner(candidates: &[Candidate]) -> WinnerOutcome<'_> {
    if candidates.iter().all(|c| c.vote_count == 0) {
        debug!("resolve_winner: no vote cast among {} candidates", candidates.len());
        return WinnerOutcome::NoWinner;
    }

    // Stable: among equal counts, the input order is kept.
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));

    let top = sorted[0].vote_count;
    let leaders: Vec<&Candidate> = sorted
        .into_iter()
        .take_while(|c| c.vote_count == top)
        .collect();
    debug!(
        "resolve_winner: top count {} shared by {} candidate(s)",
        top,
        leaders.len()
    );

    if leaders.len() == 1 {
        WinnerOutcome::SingleWinner(leaders[0])
    } else {
        WinnerOutcome::Tie(leaders)
    }
}

/// The outcome of a completed election. Returns `None` while the election is
/// still scheduled or running.
pub fn resolve_completed_winner(
    election: &Election,
    now: DateTime<Utc>,
) -> Option<WinnerOutcome<'_>> {
    match election.status(now) {
        ElectionStatus::Completed => Some(resolve_winner(&election.candidates)),
        _ => None,
    }
}

pub fn vote_label(count: u64) -> String {
    if count == 1 {
        "1 vote".to_string()
    } else {
        format!("{} votes", count)
    }
}

// **** Recency ****

/// Orders the elections by how close their start is to `now`, in the past or
/// in the future, and keeps at most `limit` of them.
///
/// Arguments:
/// * `elections` the elections to rank
/// * `now` the reference instant
/// * `limit` the maximum number of elections returned
///
/// Elections at the same distance keep their relative input order.
pub fn rank_by_recency(
    elections: &[ElectionSummary],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<ElectionSummary> {
    info!(
        "Ranking {} elections by recency, keeping {}",
        elections.len(),
        limit
    );
    let mut ranked: Vec<ElectionSummary> = elections.to_vec();
    ranked.sort_by_key(|e| distance_millis(e.start, now));
    ranked.truncate(limit);
    debug!(
        "rank_by_recency: {:?}",
        ranked.iter().map(|e| e.id.as_str()).collect::<Vec<&str>>()
    );
    ranked
}

fn distance_millis(instant: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    instant
        .signed_duration_since(now)
        .num_milliseconds()
        .unsigned_abs()
}
