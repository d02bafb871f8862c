use crate::console::*;

use chrono::Datelike;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// The optional configuration file of the console.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub input: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    pub view: Option<String>,
    pub now: Option<String>,
    #[serde(rename = "recentLimit")]
    pub recent_limit: Option<usize>,
    pub year: Option<i32>,
    pub session: Option<String>,
    pub out: Option<String>,
}

/// The options of one run, once the configuration file and the command line are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub input: Option<String>,
    pub input_type: String,
    pub view: String,
    pub now: DateTime<Utc>,
    pub limit: usize,
    pub year: i32,
    pub session: Option<String>,
    pub out: Option<String>,
    pub reference: Option<String>,
}

pub fn read_config(path: &str) -> ConsoleResult<ConsoleConfig> {
    let config: ConsoleConfig = read_json(path)?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Merges the command line with the configuration file, if any. Options passed
/// on the command line override the ones of the file. Relative paths in the
/// file are relative to the file itself.
pub fn resolve_settings(args: &Args) -> ConsoleResult<Settings> {
    let (config, root) = match args.config.as_deref() {
        Some(path) => {
            let root: Option<PathBuf> = Path::new(path).parent().map(|p| p.to_path_buf());
            (read_config(path)?, root)
        }
        None => (ConsoleConfig::default(), None),
    };
    let from_file = |p: &Option<String>| -> Option<String> {
        p.as_deref().map(|x| resolve_path(root.as_deref(), x))
    };

    let now = match args.now.as_deref().or(config.now.as_deref()) {
        Some(s) => parse_instant("now", s)?,
        None => Utc::now(),
    };

    let out = match (&args.out, &config.out) {
        (Some(o), _) => Some(o.clone()),
        (None, Some(o)) if o == "stdout" => Some(o.clone()),
        (None, o) => from_file(o),
    };

    Ok(Settings {
        input: args.input.clone().or_else(|| from_file(&config.input)),
        input_type: args
            .input_type
            .clone()
            .or(config.input_type)
            .unwrap_or_else(|| "results".to_string()),
        view: args
            .view
            .clone()
            .or(config.view)
            .unwrap_or_else(|| "results".to_string()),
        now,
        limit: args
            .limit
            .or(config.recent_limit)
            .unwrap_or(DEFAULT_RECENT_LIMIT),
        year: args.year.or(config.year).unwrap_or_else(|| now.year()),
        session: args.session.clone().or_else(|| from_file(&config.session)),
        out,
        reference: args.reference.clone(),
    })
}

/// Reads a previously generated view, used as a reference for comparison.
pub fn read_summary(path: &str) -> ConsoleResult<JSValue> {
    let js: JSValue = read_json(path)?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["elcon", "--input", "r.json", "--now", "2024-03-01"]);
        let s = resolve_settings(&args).unwrap();
        assert_eq!(s.input, Some("r.json".to_string()));
        assert_eq!(s.input_type, "results");
        assert_eq!(s.view, "results");
        assert_eq!(s.limit, DEFAULT_RECENT_LIMIT);
        assert_eq!(s.year, 2024);
        assert_eq!(s.out, None);
        assert_eq!(s.session, None);
    }

    #[test]
    fn file_then_command_line() {
        let dir = std::env::temp_dir().join(format!("elcon_config_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let config_p = dir.join("console.json");
        fs::write(
            &config_p,
            r#"{ "input": "data/results.json", "inputType": "admin_elections", "view": "recent",
                 "now": "2025-06-16T00:00:00Z", "recentLimit": 3, "year": 2023,
                 "session": "/secure/login.json", "out": "stdout" }"#,
        )
        .unwrap();
        let config_s = config_p.display().to_string();

        let s = resolve_settings(&Args::parse_from(["elcon", "-c", config_s.as_str()])).unwrap();
        assert_eq!(
            s.input,
            Some(dir.join("data/results.json").display().to_string())
        );
        assert_eq!(s.input_type, "admin_elections");
        assert_eq!(s.view, "recent");
        assert_eq!(s.limit, 3);
        assert_eq!(s.year, 2023);
        assert_eq!(s.session, Some("/secure/login.json".to_string()));
        assert_eq!(s.out, Some("stdout".to_string()));

        let s = resolve_settings(&Args::parse_from([
            "elcon",
            "-c",
            config_s.as_str(),
            "--view",
            "voter",
            "--limit",
            "8",
            "--now",
            "2026-01-01T00:00:00Z",
        ]))
        .unwrap();
        assert_eq!(s.view, "voter");
        assert_eq!(s.limit, 8);
        assert_eq!(s.year, 2023);
        assert_eq!(s.now, "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_config_file() {
        let args = Args::parse_from(["elcon", "-c", "/nonexistent/elcon/console.json"]);
        assert!(matches!(
            resolve_settings(&args),
            Err(ConsoleError::OpeningJson { .. })
        ));
    }
}
