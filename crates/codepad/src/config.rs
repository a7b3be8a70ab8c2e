//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use codepad_core::LanguageId;

/// Judge0 CE on RapidAPI.
pub const DEFAULT_ENDPOINT: &str = "https://judge0-ce.p.rapidapi.com";

#[derive(Debug, Parser)]
#[command(name = "codepad", version)]
#[command(about = "Edit and run Python, C and C++ in the terminal", long_about = None)]
pub struct Cli {
    /// Base URL of the Judge0 service.
    #[arg(long, env = "CODEPAD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// RapidAPI key, sent as X-RapidAPI-Key.
    #[arg(long, env = "CODEPAD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// RapidAPI host, sent as X-RapidAPI-Host [default: endpoint host when a key is set].
    #[arg(long, env = "CODEPAD_API_HOST")]
    pub api_host: Option<String>,

    /// Language selected at startup.
    #[arg(short, long, default_value_t = LanguageId::Python)]
    pub language: LanguageId,

    /// Load this file into the editor instead of the language template.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Where logs are written; the terminal belongs to the UI.
    #[arg(long, env = "CODEPAD_LOG_FILE", default_value = "codepad.log")]
    pub log_file: PathBuf,

    /// Render rate in frames per second.
    #[arg(long, default_value_t = 30)]
    pub fps: u32,
}

/// Errors turning [`Cli`] into a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint {
        /// Value as given.
        endpoint: String,
        /// What is wrong with it.
        reason: String,
    },

    /// `--file` could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadSource {
        /// Path as given.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Validated startup settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
    pub language: LanguageId,
    /// Contents of `--file` with CRLF line endings turned into LF.
    pub initial_source: Option<String>,
    pub log_file: PathBuf,
    pub fps: u32,
}

impl Cli {
    /// Validate the endpoint, fill in the API host, and read `--file`.
    pub fn resolve(self) -> Result<Config, ConfigLoadError> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| ConfigLoadError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigLoadError::InvalidEndpoint {
                endpoint: self.endpoint,
                reason: format!("unsupported scheme `{}`", url.scheme()),
            });
        }

        let api_host = match (&self.api_key, self.api_host) {
            (_, Some(host)) => Some(host),
            (Some(_), None) => url.host_str().map(str::to_string),
            (None, None) => None,
        };

        let initial_source = match self.file {
            Some(path) => match std::fs::read_to_string(&path) {
                // The editor keeps `\n` line endings only.
                Ok(text) => Some(text.replace("\r\n", "\n")),
                Err(source) => return Err(ConfigLoadError::ReadSource { path, source }),
            },
            None => None,
        };

        Ok(Config {
            endpoint: self.endpoint,
            api_key: self.api_key,
            api_host,
            language: self.language,
            initial_source,
            log_file: self.log_file,
            fps: self.fps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("codepad").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["--language", "cpp", "--fps", "10", "--endpoint", "http://localhost:2358"]);
        assert_eq!(cli.language, LanguageId::Cpp);
        assert_eq!(cli.fps, 10);
        assert_eq!(cli.endpoint, "http://localhost:2358");
    }

    #[test]
    fn unknown_language_is_a_parse_error() {
        let result = Cli::try_parse_from(["codepad", "--language", "rust"]);
        assert!(result.is_err());
    }

    #[test]
    fn api_host_defaults_to_endpoint_host_with_key() {
        let config = parse(&["--endpoint", DEFAULT_ENDPOINT, "--api-key", "k"])
            .resolve()
            .unwrap();
        assert_eq!(config.api_host.as_deref(), Some("judge0-ce.p.rapidapi.com"));
    }

    #[test]
    fn explicit_api_host_wins() {
        let config = parse(&["--endpoint", DEFAULT_ENDPOINT, "--api-key", "k", "--api-host", "h.example"])
            .resolve()
            .unwrap();
        assert_eq!(config.api_host.as_deref(), Some("h.example"));
    }

    #[test]
    fn no_key_means_no_host() {
        let config = parse(&["--endpoint", "http://localhost:2358"]).resolve().unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_host, None);
    }

    #[test]
    fn endpoint_must_be_http() {
        let err = parse(&["--endpoint", "ftp://judge0.example"]).resolve().unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidEndpoint { .. }));
        let err = parse(&["--endpoint", "judge0"]).resolve().unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidEndpoint { .. }));
    }

    #[test]
    fn missing_source_file_is_reported() {
        let err = parse(&["--endpoint", "http://localhost:2358", "--file", "/nonexistent/prog.py"])
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::ReadSource { .. }));
    }

    #[test]
    fn source_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("codepad-config-{}.py", std::process::id()));
        std::fs::write(&path, "name = input()\n").unwrap();
        let config = parse(&["--endpoint", "http://localhost:2358", "--file", path.to_str().unwrap()])
            .resolve()
            .unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.initial_source.as_deref(), Some("name = input()\n"));
    }

    #[test]
    fn crlf_source_is_normalised() {
        let path = std::env::temp_dir().join(format!("codepad-crlf-{}.c", std::process::id()));
        std::fs::write(&path, "int main() {\r\n  return 0;\r\n}\r\n").unwrap();
        let config = parse(&["--endpoint", "http://localhost:2358", "--file", path.to_str().unwrap()])
            .resolve()
            .unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            config.initial_source.as_deref(),
            Some("int main() {\n  return 0;\n}\n")
        );
    }
}
