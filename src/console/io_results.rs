use crate::console::*;

use election_tally::builder::Builder;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ApiMember {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ApiCandidate {
    pub id: String,
    pub member: ApiMember,
    pub status: Option<String>,
    #[serde(rename = "voteCount")]
    pub vote_count: Option<i64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ApiElection {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(default)]
    pub candidates: Vec<ApiCandidate>,
}

/// The envelope of the results endpoint.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<ApiElection>,
}

impl ApiCandidate {
    /// A missing status means the candidate is on the ballot. An unknown one is
    /// read as pending: it keeps the candidate off the ballot until an
    /// administrator looks at it.
    pub fn candidacy_status(&self, election_id: &str) -> CandidacyStatus {
        match self.status.as_deref() {
            Some("APPROVED") | None => CandidacyStatus::Approved,
            Some("PENDING") => CandidacyStatus::Pending,
            Some("DENIED") => CandidacyStatus::Denied,
            Some(x) => {
                warn!(
                    "election {}: candidate {} has an unknown status {:?}, using PENDING",
                    election_id, self.id, x
                );
                CandidacyStatus::Pending
            }
        }
    }
}

pub fn read_results(path: &str) -> ConsoleResult<Vec<Election>> {
    let response: ResultsResponse = read_json(path)?;
    if !response.success {
        return UnsuccessfulResponseSnafu { path }.fail();
    }
    info!("Read {} elections from {:?}", response.data.len(), path);
    response.data.iter().map(validate_election).collect()
}

/// Turns the wire form of an election into a checked snapshot.
pub fn validate_election(api: &ApiElection) -> ConsoleResult<Election> {
    let start = parse_instant("startTime", &api.start_time)?;
    let end = parse_instant("endTime", &api.end_time)?;
    if end < start {
        warn!(
            "election {}: ends ({}) before it starts ({})",
            api.id, api.end_time, api.start_time
        );
    }

    let mut builder = Builder::new(&api.id, &api.title)
        .description(api.description.as_deref().unwrap_or(""))
        .schedule(start, end);
    for c in api.candidates.iter() {
        let candidate = Candidate {
            id: c.id.clone(),
            member: Member {
                id: c.member.id.clone(),
                name: c.member.name.clone(),
                email: c.member.email.clone(),
            },
            status: c.candidacy_status(&api.id),
            vote_count: normalize_vote_count(&api.id, &c.id, c.vote_count),
        };
        builder = builder
            .add_candidate(candidate)
            .context(InvalidElectionSnafu { id: api.id.as_str() })?;
    }
    let election = builder
        .build()
        .context(InvalidElectionSnafu { id: api.id.as_str() })?;
    debug!("validate_election: {:?}", election);
    Ok(election)
}
