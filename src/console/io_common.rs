use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::DeserializeOwned;

use crate::console::*;

pub fn read_json<T: DeserializeOwned>(path: &str) -> ConsoleResult<T> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// Reads an RFC 3339 timestamp. A date and time without offset is taken as
/// UTC, and a plain date as midnight UTC.
pub fn parse_instant(field: &str, value: &str) -> ConsoleResult<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .context(ParsingInstantSnafu { field, value })?;
    Ok(Utc.from_utc_datetime(&naive))
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn format_date(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Vote counts are owned by the backend. Anything that is not a count is read as 0.
pub fn normalize_vote_count(election_id: &str, candidate_id: &str, count: Option<i64>) -> u64 {
    match count {
        Some(c) if c >= 0 => c as u64,
        Some(c) => {
            warn!(
                "election {}: candidate {} has a negative vote count ({}), using 0",
                election_id, candidate_id, c
            );
            0
        }
        None => {
            warn!(
                "election {}: candidate {} has no vote count, using 0",
                election_id, candidate_id
            );
            0
        }
    }
}

/// Resolves a path given in a configuration file against the directory of that file.
pub fn resolve_path(root: Option<&Path>, path: &str) -> String {
    match root {
        Some(r) if Path::new(path).is_relative() => {
            let p: PathBuf = [r, Path::new(path)].iter().collect();
            p.as_path().display().to_string()
        }
        _ => path.to_string(),
    }
}
