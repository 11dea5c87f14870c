//! Process Configuration
//!
//! Every setting is a command-line flag with an environment-variable fallback.

use crate::search::engine::DEFAULT_MAX_SUGGESTIONS;
use crate::sync::DEFAULT_TOPIC;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Autocomplete node with a replicated prefix index", long_about = None)]
pub struct Settings {
    /// UDP address used for index synchronization.
    #[arg(long, env = "AUTOCOMPLETE_BIND")]
    pub bind: SocketAddr,

    /// Sync address of an already running node. Repeatable.
    #[arg(long = "seed", env = "AUTOCOMPLETE_SEEDS", value_delimiter = ',')]
    pub seeds: Vec<SocketAddr>,

    /// HTTP listen address. Defaults to the bind IP with the bind port + 1000.
    #[arg(long, env = "AUTOCOMPLETE_HTTP")]
    pub http: Option<SocketAddr>,

    /// Upper bound on suggestions per query, whatever the caller asks for.
    #[arg(
        long,
        env = "AUTOCOMPLETE_MAX_SUGGESTIONS",
        default_value_t = DEFAULT_MAX_SUGGESTIONS,
        value_parser = parse_max_suggestions
    )]
    pub max_suggestions: usize,

    #[arg(long, env = "AUTOCOMPLETE_TOPIC", default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// JSON snapshot holding the durable terms. Without it terms live in memory only.
    #[arg(long, env = "AUTOCOMPLETE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Seed the store with sample terms when it is empty.
    #[arg(long, env = "AUTOCOMPLETE_SAMPLE_DATA")]
    pub sample_data: bool,

    #[arg(long, env = "AUTOCOMPLETE_LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}

impl Settings {
    pub fn http_addr(&self) -> SocketAddr {
        self.http.unwrap_or_else(|| {
            SocketAddr::new(self.bind.ip(), self.bind.port().saturating_add(1000))
        })
    }
}

fn parse_max_suggestions(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|e| format!("invalid number '{}': {}", raw, e))?;
    if value == 0 {
        return Err("max suggestions must be at least 1".to_string());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["autocomplete-node", "--bind", "127.0.0.1:5000"])
            .expect("minimal arguments should parse");

        assert_eq!(settings.max_suggestions, 10);
        assert_eq!(settings.topic, DEFAULT_TOPIC);
        assert!(settings.seeds.is_empty());
        assert!(settings.data_file.is_none());
        assert!(!settings.sample_data);
        assert_eq!(settings.log_level, tracing::Level::INFO);
        assert_eq!(settings.http_addr(), "127.0.0.1:6000".parse().unwrap());
    }

    #[test]
    fn test_full_arguments() {
        let settings = Settings::try_parse_from([
            "autocomplete-node",
            "--bind",
            "127.0.0.1:5001",
            "--seed",
            "127.0.0.1:5000",
            "--seed",
            "127.0.0.1:5002",
            "--http",
            "0.0.0.0:8080",
            "--max-suggestions",
            "25",
            "--data-file",
            "/tmp/terms.json",
            "--sample-data",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(settings.seeds.len(), 2);
        assert_eq!(settings.max_suggestions, 25);
        assert_eq!(settings.http_addr(), "0.0.0.0:8080".parse().unwrap());
        assert!(settings.sample_data);
        assert_eq!(settings.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_zero_max_suggestions_rejected() {
        let result = Settings::try_parse_from([
            "autocomplete-node",
            "--bind",
            "127.0.0.1:5000",
            "--max-suggestions",
            "0",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_bind_is_required() {
        assert!(Settings::try_parse_from(["autocomplete-node"]).is_err());
    }
}
