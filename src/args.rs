use clap::Parser;

/// This is the command line console of the election platform. It reads the JSON
/// returned by the backend and prints the status, tally and dashboard views.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. Options given on the command line
    /// take precedence over the ones of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The JSON data returned by the backend.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default results) The type of the input: results, admin_elections or members.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default results) The view to build: results, recent, voter, dashboard or members.
    /// The dashboard and members views require a session.
    #[clap(long, value_parser)]
    pub view: Option<String>,

    /// (timestamp, default the current time) The instant against which the status of the
    /// elections is computed, for example 2025-06-16T00:00:00Z or 2025-06-16.
    #[clap(long, value_parser)]
    pub now: Option<String>,

    /// (default 5) The number of recent elections to list.
    #[clap(short, long, value_parser)]
    pub limit: Option<usize>,

    /// (default the year of --now) The year of the monthly elections chart.
    #[clap(long, value_parser)]
    pub year: Option<i32>,

    /// (file path) The response of the login endpoint, with the user and the token.
    #[clap(short, long, value_parser)]
    pub session: Option<String>,

    /// (file path, 'stdout' or empty) Where the view is written in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference view in JSON format. If provided, elcon will check that
    /// the generated view matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
