//! Aggregate figures for the administration dashboard and the voter listings.

use chrono::{DateTime, Datelike, Utc};
use log::debug;

use crate::config::*;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_elections: usize,
    pub active_elections: usize,
    pub scheduled_elections: usize,
    pub completed_elections: usize,
    /// Candidacies still waiting for an administrator.
    pub pending_candidacies: usize,
    /// Capped at `u64::MAX`.
    pub total_votes: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MonthCount {
    /// 1 for January.
    pub month: u32,
    pub name: &'static str,
    pub count: usize,
}

/// What a voter can take part in: running elections and the ones to come.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoterView {
    pub current: Vec<ElectionSummary>,
    pub upcoming: Vec<ElectionSummary>,
}

pub fn dashboard_stats(elections: &[Election], now: DateTime<Utc>) -> DashboardStats {
    let mut stats = DashboardStats {
        total_elections: elections.len(),
        ..DashboardStats::default()
    };
    for e in elections.iter() {
        match e.status(now) {
            ElectionStatus::Scheduled => stats.scheduled_elections += 1,
            ElectionStatus::Active => stats.active_elections += 1,
            ElectionStatus::Completed => stats.completed_elections += 1,
        }
        stats.pending_candidacies += e
            .candidates
            .iter()
            .filter(|c| c.status == CandidacyStatus::Pending)
            .count();
        stats.total_votes = e
            .candidates
            .iter()
            .fold(stats.total_votes, |acc, c| acc.saturating_add(c.vote_count));
    }
    debug!("dashboard_stats: {:?}", stats);
    stats
}

/// Number of elections starting in each month of `year`.
pub fn monthly_elections(elections: &[ElectionSummary], year: i32) -> Vec<MonthCount> {
    let mut counts: Vec<MonthCount> = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| MonthCount {
            month: (idx + 1) as u32,
            name: *name,
            count: 0,
        })
        .collect();
    for e in elections.iter().filter(|e| e.start.year() == year) {
        counts[e.start.month0() as usize].count += 1;
    }
    counts
}

pub fn voter_view(elections: &[ElectionSummary]) -> VoterView {
    let mut view = VoterView::default();
    for e in elections.iter() {
        match e.status {
            ElectionStatus::Active => view.current.push(e.clone()),
            ElectionStatus::Scheduled => view.upcoming.push(e.clone()),
            ElectionStatus::Completed => {}
        }
    }
    view.current.sort_by_key(|e| e.start);
    view.upcoming.sort_by_key(|e| e.start);
    view
}

/// The candidates a voter may choose from.
pub fn ballot_candidates(election: &Election) -> Vec<&Candidate> {
    election
        .candidates
        .iter()
        .filter(|c| c.status == CandidacyStatus::Approved)
        .collect()
}
