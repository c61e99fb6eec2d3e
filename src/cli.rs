use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://magnusitj.acessocloud.com/ws/index.php";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http {
        endpoint: String,
        token: Option<String>,
        connect_timeout: Duration,
        timeout: Duration,
    },
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// `ligacoes_YYYYMMDD.csv` in the working directory.
    DefaultName,
    Path(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub date: String,
    pub source: Source,
    pub export: Option<ExportTarget>,
    pub show_chart: bool,
}

#[derive(Parser, Debug)]
#[command(name = "call_hours")]
#[command(version)]
#[command(about = "Count inbound calls per hour for one day", long_about = None)]
pub struct Cli {
    /// Day to query, DD/MM/YYYY (defaults to today)
    date: Option<String>,

    /// API credential
    #[arg(long, env = "ACESSO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API endpoint
    #[arg(long, env = "ACESSO_API_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Connect timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    connect_timeout: u64,

    /// Total request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Read a saved raw response instead of calling the API
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,

    /// Save the hourly counts as ligacoes_YYYYMMDD.csv
    #[arg(long)]
    export: bool,

    /// Save the hourly counts to this CSV file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Do not print the bar chart
    #[arg(long)]
    no_chart: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        let source = match self.from_file {
            Some(path) => Source::File(path),
            None => Source::Http {
                endpoint: self.endpoint,
                token: self.token.filter(|t| !t.trim().is_empty()),
                connect_timeout: Duration::from_secs(self.connect_timeout),
                timeout: Duration::from_secs(self.timeout),
            },
        };

        let export = match self.output {
            Some(path) => Some(ExportTarget::Path(path)),
            None if self.export => Some(ExportTarget::DefaultName),
            None => None,
        };

        Config {
            date: self
                .date
                .unwrap_or_else(|| chrono::Local::now().format("%d/%m/%Y").to_string()),
            source,
            export,
            show_chart: !self.no_chart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["call_hours"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into_config()
    }

    #[test]
    fn test_http_defaults() {
        let config = parse(&["05/03/2024", "--token", "abc"]);

        assert_eq!(config.date, "05/03/2024");
        assert_eq!(config.export, None);
        assert!(config.show_chart);
        match config.source {
            Source::Http {
                endpoint,
                token,
                connect_timeout,
                timeout,
            } => {
                assert_eq!(endpoint, DEFAULT_ENDPOINT);
                assert_eq!(token.as_deref(), Some("abc"));
                assert_eq!(connect_timeout, Duration::from_secs(5));
                assert_eq!(timeout, Duration::from_secs(30));
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let config = parse(&["05/03/2024", "--token", "  "]);
        assert!(matches!(config.source, Source::Http { token: None, .. }));
    }

    #[test]
    fn test_replay_and_export_options() {
        let config = parse(&["05/03/2024", "--from-file", "dump.txt", "--export", "--no-chart"]);
        assert_eq!(config.source, Source::File(PathBuf::from("dump.txt")));
        assert_eq!(config.export, Some(ExportTarget::DefaultName));
        assert!(!config.show_chart);

        let config = parse(&["05/03/2024", "-o", "out.csv"]);
        assert_eq!(
            config.export,
            Some(ExportTarget::Path(PathBuf::from("out.csv")))
        );
    }

    #[test]
    fn test_date_defaults_to_today() {
        let config = parse(&["--from-file", "dump.txt"]);
        assert_eq!(config.date, chrono::Local::now().format("%d/%m/%Y").to_string());
    }
}
