use crate::console::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AdminRef {
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRef {
    pub id: String,
}

/// One row of the administration listing of elections.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AdminElection {
    pub id: String,
    pub title: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub admin: Option<AdminRef>,
    #[serde(default)]
    pub candidates: Vec<CandidateRef>,
}

pub fn read_admin_elections(path: &str, now: DateTime<Utc>) -> ConsoleResult<Vec<ElectionSummary>> {
    let rows: Vec<AdminElection> = read_json(path)?;
    info!("Read {} elections from {:?}", rows.len(), path);
    rows.iter().map(|r| summarize(r, now)).collect()
}

fn summarize(row: &AdminElection, now: DateTime<Utc>) -> ConsoleResult<ElectionSummary> {
    let start = parse_instant("startTime", &row.start_time)?;
    let end = parse_instant("endTime", &row.end_time)?;
    if end < start {
        warn!(
            "election {}: ends ({}) before it starts ({})",
            row.id, row.end_time, row.start_time
        );
    }
    Ok(ElectionSummary {
        organiser: row.admin.as_ref().map(|a| a.name.clone()),
        candidate_count: row.candidates.len(),
        ..ElectionSummary::from_schedule(&row.id, &row.title, start, end, now)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_listing() {
        let dir = std::env::temp_dir().join(format!("elcon_admin_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join("elections.json");
        fs::write(
            &p,
            r#"[
              { "id": "e1", "title": "Board", "startTime": "2025-06-15", "endTime": "2025-06-20",
                "admin": { "name": "Jo" }, "candidates": [ { "id": "c1" }, { "id": "c2" } ] },
              { "id": "e2", "title": "Budget", "startTime": "2025-07-01T08:00:00Z",
                "endTime": "2025-07-02T08:00:00Z" }
            ]"#,
        )
        .unwrap();
        let now: DateTime<Utc> = "2025-06-16T00:00:00Z".parse().unwrap();
        let summaries = read_admin_elections(p.to_str().unwrap(), now).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].organiser, Some("Jo".to_string()));
        assert_eq!(summaries[0].candidate_count, 2);
        assert_eq!(summaries[0].status, ElectionStatus::Active);
        assert_eq!(summaries[1].organiser, None);
        assert_eq!(summaries[1].candidate_count, 0);
        assert_eq!(summaries[1].status, ElectionStatus::Scheduled);
        fs::remove_dir_all(&dir).unwrap();
    }
}
