use log::{debug, info, warn};

use election_tally::dashboard::*;
use election_tally::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
pub mod io_admin;
pub mod io_common;
pub mod io_members;
pub mod io_results;
pub mod session;

use crate::console::config_reader::*;
use crate::console::io_common::*;
use crate::console::io_members::MemberRow;
use crate::console::session::*;

#[derive(Debug, Snafu)]
pub enum ConsoleError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Field {field} is not a valid timestamp: {value:?}"))]
    ParsingInstant { field: String, value: String },
    #[snafu(display("Election {id} is not valid"))]
    InvalidElection { source: ElectionErrors, id: String },
    #[snafu(display("The backend response in {path} was not successful"))]
    UnsuccessfulResponse { path: String },
    #[snafu(display("The {view} view requires a logged in session"))]
    NotAuthenticated { view: String },
    #[snafu(display("No input file was provided"))]
    MissingInput {},
    #[snafu(display("Unknown input type {input_type:?}"))]
    UnsupportedInputType { input_type: String },
    #[snafu(display("Unknown view {view:?}"))]
    UnsupportedView { view: String },
    #[snafu(display("The {view} view cannot be built from {input_type} data"))]
    ViewInputMismatch { view: String, input_type: String },
    #[snafu(display("Difference detected between the output and the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("Error writing the output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// The data read from one input file.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Results(Vec<Election>),
    AdminElections(Vec<ElectionSummary>),
    Members(Vec<MemberRow>),
}

impl Snapshot {
    fn input_type(&self) -> &'static str {
        match self {
            Snapshot::Results(_) => "results",
            Snapshot::AdminElections(_) => "admin_elections",
            Snapshot::Members(_) => "members",
        }
    }

    /// The summaries of the elections, if this snapshot has elections.
    fn summaries(&self, now: DateTime<Utc>) -> Option<Vec<ElectionSummary>> {
        match self {
            Snapshot::Results(elections) => Some(
                elections
                    .iter()
                    .map(|e| ElectionSummary::from_election(e, now))
                    .collect(),
            ),
            Snapshot::AdminElections(summaries) => Some(summaries.clone()),
            Snapshot::Members(_) => None,
        }
    }
}

fn read_snapshot(settings: &Settings) -> ConsoleResult<Snapshot> {
    let path = settings.input.clone().context(MissingInputSnafu {})?;
    info!(
        "Attempting to read {} data from {:?}",
        settings.input_type, path
    );
    let snapshot = match settings.input_type.as_str() {
        "results" => Snapshot::Results(io_results::read_results(&path)?),
        "admin_elections" => {
            Snapshot::AdminElections(io_admin::read_admin_elections(&path, settings.now)?)
        }
        "members" => Snapshot::Members(io_members::read_members(&path)?),
        x => {
            return UnsupportedInputTypeSnafu { input_type: x }.fail();
        }
    };
    Ok(snapshot)
}

fn require_session(view: &str, session: &Session) -> ConsoleResult<()> {
    if session.is_authenticated() {
        if let Some(user) = session.user() {
            debug!("require_session: {} view opened by {}", view, user.email);
        }
        Ok(())
    } else {
        NotAuthenticatedSnafu { view }.fail()
    }
}

fn view_input_mismatch<T>(view: &str, snapshot: &Snapshot) -> ConsoleResult<T> {
    ViewInputMismatchSnafu {
        view,
        input_type: snapshot.input_type(),
    }
    .fail()
}

// ******** Views *********

fn outcome_to_json(outcome: &WinnerOutcome) -> JSValue {
    match outcome {
        WinnerOutcome::NoWinner => json!({ "result": "noWinner" }),
        WinnerOutcome::SingleWinner(c) => json!({
            "result": "winner",
            "winner": c.member.name,
            "votes": c.vote_count,
        }),
        WinnerOutcome::Tie(cs) => {
            // The order among tied candidates carries no meaning.
            let mut names: Vec<&str> = cs.iter().map(|c| c.member.name.as_str()).collect();
            names.sort_unstable();
            json!({
                "result": "tie",
                "candidates": names,
                "votes": cs.first().map(|c| c.vote_count).unwrap_or(0),
            })
        }
    }
}

fn election_result_to_json(election: &Election, now: DateTime<Utc>) -> JSValue {
    let status = election.status(now);
    let tally = aggregate(&election.candidates);
    let candidates: Vec<JSValue> = tally
        .candidates
        .iter()
        .map(|c| {
            json!({
                "id": c.candidate_id,
                "name": c.name,
                "email": c.email,
                "voteCount": c.vote_count,
                "votes": vote_label(c.vote_count),
                "percentage": c.vote_percentage,
                "barWidth": c.bar_width,
            })
        })
        .collect();
    let outcome = resolve_completed_winner(election, now)
        .map(|o| outcome_to_json(&o))
        .unwrap_or(JSValue::Null);
    json!({
        "id": election.id,
        "title": election.title,
        "description": election.description,
        "startTime": format_instant(&election.start),
        "endTime": format_instant(&election.end),
        "status": status.label(),
        "badge": status.badge().name(),
        "totalVotes": tally.total_votes,
        "candidates": candidates,
        "outcome": outcome,
    })
}

fn summary_to_json(summary: &ElectionSummary) -> JSValue {
    json!({
        "id": summary.id,
        "title": summary.title,
        "date": format_date(&summary.start),
        "startTime": format_instant(&summary.start),
        "endTime": format_instant(&summary.end),
        "status": summary.status.label(),
        "badge": summary.status.badge().name(),
        "organiser": summary.organiser,
        "candidates": summary.candidate_count,
    })
}

fn results_view(snapshot: &Snapshot, now: DateTime<Utc>) -> ConsoleResult<JSValue> {
    match snapshot {
        Snapshot::Results(elections) => {
            let results: Vec<JSValue> = elections
                .iter()
                .map(|e| election_result_to_json(e, now))
                .collect();
            Ok(json!({ "results": results }))
        }
        _ => view_input_mismatch("results", snapshot),
    }
}

fn recent_view(snapshot: &Snapshot, settings: &Settings) -> ConsoleResult<JSValue> {
    let summaries = match snapshot.summaries(settings.now) {
        Some(s) => s,
        None => return view_input_mismatch("recent", snapshot),
    };
    let recent: Vec<JSValue> = rank_by_recency(&summaries, settings.now, settings.limit)
        .iter()
        .map(summary_to_json)
        .collect();
    Ok(json!({ "recent": recent }))
}

fn dashboard_view(snapshot: &Snapshot, settings: &Settings) -> ConsoleResult<JSValue> {
    let elections = match snapshot {
        Snapshot::Results(elections) => elections,
        _ => return view_input_mismatch("dashboard", snapshot),
    };
    let stats = dashboard_stats(elections, settings.now);
    let summaries: Vec<ElectionSummary> = elections
        .iter()
        .map(|e| ElectionSummary::from_election(e, settings.now))
        .collect();
    let months: Vec<JSValue> = monthly_elections(&summaries, settings.year)
        .iter()
        .map(|m| json!({ "month": m.month, "name": m.name, "total": m.count }))
        .collect();
    let recent: Vec<JSValue> = rank_by_recency(&summaries, settings.now, settings.limit)
        .iter()
        .map(summary_to_json)
        .collect();
    Ok(json!({
        "stats": {
            "totalElections": stats.total_elections,
            "activeElections": stats.active_elections,
            "scheduledElections": stats.scheduled_elections,
            "completedElections": stats.completed_elections,
            "pendingRequests": stats.pending_candidacies,
            "totalVotes": stats.total_votes,
        },
        "monthlyElections": { "year": settings.year, "months": months },
        "recent": recent,
    }))
}

fn voter_view_json(snapshot: &Snapshot, now: DateTime<Utc>) -> ConsoleResult<JSValue> {
    let summaries = match snapshot.summaries(now) {
        Some(s) => s,
        None => return view_input_mismatch("voter", snapshot),
    };
    // Only the results carry the candidates, the admin listing does not.
    let ballots: HashMap<&str, Vec<&str>> = match snapshot {
        Snapshot::Results(elections) => elections
            .iter()
            .map(|e| {
                let names: Vec<&str> = ballot_candidates(e)
                    .iter()
                    .map(|c| c.member.name.as_str())
                    .collect();
                (e.id.as_str(), names)
            })
            .collect(),
        _ => HashMap::new(),
    };
    let with_ballot = |s: &ElectionSummary| -> JSValue {
        let mut js = summary_to_json(s);
        if let Some(names) = ballots.get(s.id.as_str()) {
            js["ballot"] = json!(names);
        }
        js
    };
    let view = voter_view(&summaries);
    Ok(json!({
        "current": view.current.iter().map(with_ballot).collect::<Vec<JSValue>>(),
        "upcoming": view.upcoming.iter().map(with_ballot).collect::<Vec<JSValue>>(),
    }))
}

fn members_view(snapshot: &Snapshot) -> ConsoleResult<JSValue> {
    match snapshot {
        Snapshot::Members(members) => {
            let rows: Vec<JSValue> = members
                .iter()
                .map(|m| {
                    json!({
                        "id": m.id,
                        "name": m.name,
                        "email": m.email,
                        "role": m.role.label(),
                        "status": m.status.label(),
                        "lastLogin": m.last_login,
                    })
                })
                .collect();
            Ok(json!({ "members": rows }))
        }
        _ => view_input_mismatch("members", snapshot),
    }
}

/// Assembles the requested view. The session is checked here, the engine never sees it.
pub fn build_view(
    settings: &Settings,
    snapshot: &Snapshot,
    session: &Session,
) -> ConsoleResult<JSValue> {
    let content = match settings.view.as_str() {
        "results" => results_view(snapshot, settings.now)?,
        "recent" => recent_view(snapshot, settings)?,
        "voter" => voter_view_json(snapshot, settings.now)?,
        "dashboard" => {
            require_session("dashboard", session)?;
            dashboard_view(snapshot, settings)?
        }
        "members" => {
            require_session("members", session)?;
            members_view(snapshot)?
        }
        x => {
            return UnsupportedViewSnafu { view: x }.fail();
        }
    };
    Ok(json!({
        "view": settings.view,
        "generatedAt": format_instant(&settings.now),
        "content": content,
    }))
}

fn write_output(out: &Option<String>, contents: &str) -> ConsoleResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some(path) => {
            info!("Writing the view to {:?}", path);
            fs::write(path, contents).context(WritingOutputSnafu { path })
        }
    }
}

pub fn run_console(args: &Args) -> ConsoleResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let session = match settings.session.as_deref() {
        Some(path) => read_session(path)?,
        None => Session::anonymous(),
    };

    let snapshot = read_snapshot(&settings)?;
    debug!("snapshot: {:?}", snapshot);

    let result_js = build_view(&settings, &snapshot, &session)?;
    let pretty_js = serde_json::to_string_pretty(&result_js)
        .whatever_context("Failed to serialize the view")?;
    write_output(&settings.out, &pretty_js)?;

    // The reference view, if provided for comparison
    if let Some(reference_p) = settings.reference.clone() {
        let reference = read_summary(&reference_p)?;
        let pretty_js_reference = serde_json::to_string_pretty(&reference)
            .whatever_context("Failed to serialize the reference")?;
        if pretty_js_reference != pretty_js {
            warn!("Found differences with the reference {:?}", reference_p);
            print_diff(pretty_js_reference.as_str(), pretty_js.as_str(), "\n");
            return ReferenceMismatchSnafu { path: reference_p }.fail();
        }
        info!("Output matches the reference {:?}", reference_p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    const RESULTS: &str = r#"{
      "success": true,
      "data": [
        {
          "id": "e-past",
          "title": "Treasurer",
          "description": "Club treasurer",
          "startTime": "2025-06-01T00:00:00Z",
          "endTime": "2025-06-05T00:00:00Z",
          "candidates": [
            { "id": "c1", "member": { "id": "m1", "name": "Anna", "email": "anna@example.org" },
              "status": "APPROVED", "voteCount": 10 },
            { "id": "c2", "member": { "id": "m2", "name": "Bob", "email": "bob@example.org" },
              "status": "APPROVED", "voteCount": 10 },
            { "id": "c3", "member": { "id": "m3", "name": "Chloe", "email": "chloe@example.org" },
              "status": "APPROVED", "voteCount": 5 }
          ]
        },
        {
          "id": "e-now",
          "title": "President",
          "description": "Club president",
          "startTime": "2025-06-15",
          "endTime": "2025-06-20",
          "candidates": [
            { "id": "c4", "member": { "id": "m4", "name": "Dan", "email": "dan@example.org" },
              "status": "APPROVED", "voteCount": 3 },
            { "id": "c5", "member": { "id": "m5", "name": "Eve", "email": "eve@example.org" },
              "status": "PENDING", "voteCount": 0 }
          ]
        },
        {
          "id": "e-soon",
          "title": "Secretary",
          "startTime": "2025-06-19T00:00:00Z",
          "endTime": "2025-06-25T00:00:00Z",
          "candidates": []
        }
      ]
    }"#;

    const LOGIN: &str = r#"{
      "user": { "id": "u1", "name": "Jo", "email": "jo@example.org", "role": "ADMIN",
                "createdAt": "2025-01-01T00:00:00Z", "isBlocked": false },
      "token": "abc.def.ghi"
    }"#;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("elcon_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> String {
        let p = dir.join(name);
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    fn settings(input: &str, input_type: &str, view: &str) -> Settings {
        Settings {
            input: Some(input.to_string()),
            input_type: input_type.to_string(),
            view: view.to_string(),
            now: "2025-06-16T00:00:00Z".parse().unwrap(),
            limit: 2,
            year: 2025,
            session: None,
            out: None,
            reference: None,
        }
    }

    fn logged_in() -> Session {
        let user: SessionUser = serde_json::from_str(
            r#"{ "id": "u1", "name": "Jo", "email": "jo@example.org", "role": "ADMIN" }"#,
        )
        .unwrap();
        Session::anonymous().login(user, "token")
    }

    #[test]
    fn results_view_shows_outcome_of_completed_elections() {
        let _ = env_logger::try_init();
        let dir = test_dir("results");
        let input = write_file(&dir, "results.json", RESULTS);
        let s = settings(&input, "results", "results");
        let snapshot = read_snapshot(&s).unwrap();
        let js = build_view(&s, &snapshot, &Session::anonymous()).unwrap();
        let results = js["content"]["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);

        assert_eq!(results[0]["status"], "Completed");
        assert_eq!(results[0]["totalVotes"], 25);
        assert_eq!(results[0]["candidates"][0]["percentage"], 40);
        assert_eq!(results[0]["candidates"][2]["percentage"], 20);
        assert_eq!(results[0]["candidates"][2]["barWidth"], 50);
        assert_eq!(results[0]["outcome"]["result"], "tie");
        assert_eq!(results[0]["outcome"]["candidates"], json!(["Anna", "Bob"]));

        assert_eq!(results[1]["status"], "Active");
        assert_eq!(results[1]["badge"], "default");
        assert_eq!(results[1]["outcome"], JSValue::Null);
        assert_eq!(results[1]["candidates"][0]["votes"], "3 votes");

        assert_eq!(results[2]["status"], "Scheduled");
        assert_eq!(results[2]["totalVotes"], 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn recent_view_by_distance() {
        let dir = test_dir("recent");
        let input = write_file(&dir, "results.json", RESULTS);
        let s = settings(&input, "results", "recent");
        let snapshot = read_snapshot(&s).unwrap();
        let js = build_view(&s, &snapshot, &Session::anonymous()).unwrap();
        let ids: Vec<&str> = js["content"]["recent"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["e-now", "e-soon"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dashboard_requires_session() {
        let dir = test_dir("dashboard_anon");
        let input = write_file(&dir, "results.json", RESULTS);
        let s = settings(&input, "results", "dashboard");
        let snapshot = read_snapshot(&s).unwrap();
        let err = build_view(&s, &snapshot, &Session::anonymous()).unwrap_err();
        assert!(matches!(err, ConsoleError::NotAuthenticated { .. }));
        let err = build_view(&s, &snapshot, &logged_in().logout()).unwrap_err();
        assert!(matches!(err, ConsoleError::NotAuthenticated { .. }));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dashboard_view() {
        let dir = test_dir("dashboard");
        let input = write_file(&dir, "results.json", RESULTS);
        let s = settings(&input, "results", "dashboard");
        let snapshot = read_snapshot(&s).unwrap();
        let js = build_view(&s, &snapshot, &logged_in()).unwrap();
        let stats = &js["content"]["stats"];
        assert_eq!(stats["totalElections"], 3);
        assert_eq!(stats["activeElections"], 1);
        assert_eq!(stats["scheduledElections"], 1);
        assert_eq!(stats["completedElections"], 1);
        assert_eq!(stats["pendingRequests"], 1);
        assert_eq!(stats["totalVotes"], 28);
        let months = js["content"]["monthlyElections"]["months"].as_array().unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[5]["name"], "Jun");
        assert_eq!(months[5]["total"], 3);
        assert_eq!(js["content"]["recent"].as_array().unwrap().len(), 2);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn voter_view_lists_approved_ballot() {
        let dir = test_dir("voter");
        let input = write_file(&dir, "results.json", RESULTS);
        let s = settings(&input, "results", "voter");
        let snapshot = read_snapshot(&s).unwrap();
        let js = build_view(&s, &snapshot, &Session::anonymous()).unwrap();
        let current = js["content"]["current"].as_array().unwrap();
        let upcoming = js["content"]["upcoming"].as_array().unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0]["ballot"], json!(["Dan"]));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0]["id"], "e-soon");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mismatched_view() {
        let dir = test_dir("mismatch");
        let input = write_file(
            &dir,
            "members.json",
            r#"{ "members": [ { "id": "u1", "name": "Jo", "email": "jo@example.org", "role": "ADMIN", "isBlocked": false } ] }"#,
        );
        let s = settings(&input, "members", "results");
        let snapshot = read_snapshot(&s).unwrap();
        let err = build_view(&s, &snapshot, &Session::anonymous()).unwrap_err();
        assert!(matches!(err, ConsoleError::ViewInputMismatch { .. }));
        let s = settings(&input, "members", "calendar");
        let err = build_view(&s, &snapshot, &Session::anonymous()).unwrap_err();
        assert!(matches!(err, ConsoleError::UnsupportedView { .. }));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_input_type() {
        let s = settings("whatever.json", "xml", "results");
        assert!(matches!(
            read_snapshot(&s),
            Err(ConsoleError::UnsupportedInputType { .. })
        ));
    }

    #[test]
    fn run_with_reference() {
        let dir = test_dir("run");
        write_file(&dir, "results.json", RESULTS);
        write_file(&dir, "login.json", LOGIN);
        let out = dir.join("out.json").display().to_string();
        let config = write_file(
            &dir,
            "config.json",
            &format!(
                r#"{{ "input": "results.json", "view": "dashboard", "now": "2025-06-16T00:00:00Z",
                     "recentLimit": 3, "session": "login.json", "out": {:?} }}"#,
                out
            ),
        );
        let args = Args::parse_from(["elcon", "--config", config.as_str()]);
        run_console(&args).unwrap();
        let written: JSValue = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["view"], "dashboard");
        assert_eq!(written["content"]["recent"].as_array().unwrap().len(), 3);

        // The same run, checked against its own output.
        let args = Args::parse_from([
            "elcon",
            "--config",
            config.as_str(),
            "--reference",
            out.as_str(),
            "--out",
            dir.join("out2.json").display().to_string().as_str(),
        ]);
        run_console(&args).unwrap();

        // Command line options take precedence over the file.
        let args = Args::parse_from([
            "elcon",
            "--config",
            config.as_str(),
            "--limit",
            "1",
            "--reference",
            out.as_str(),
            "--out",
            dir.join("out3.json").display().to_string().as_str(),
        ]);
        assert!(matches!(
            run_console(&args),
            Err(ConsoleError::ReferenceMismatch { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
