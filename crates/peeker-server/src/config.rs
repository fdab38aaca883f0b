//! Server configuration from flags, environment variables and `config.json`.
//!
//! Each setting is taken from the first source that provides it: command-line
//! flag, environment variable, config file, built-in default. Clap resolves the
//! first two; [`FileConfig`] supplies the third.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use peeker_upstream::config::{DEFAULT_SERVER, DEFAULT_RETRY_BACKOFF};
use peeker_upstream::{UpstreamConfig, UpstreamError};
use serde::Deserialize;

/// Default listen host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default directory holding the browser front-end.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default log level when neither `--verbose` nor `LOG_LEVEL` is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "joplin-peeker", version, about = "Read-only web gateway for Joplin notes")]
pub struct Args {
    /// Joplin data API address
    #[arg(long = "joplin", env = "JOPLIN_SERVER")]
    pub joplin_server: Option<String>,

    /// Joplin data API access token
    #[arg(long, env = "JOPLIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Host to listen on
    #[arg(long, env = "PEEKER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PEEKER_PORT")]
    pub port: Option<u16>,

    /// Directory with index.html, img/ and js/
    #[arg(long, env = "PEEKER_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// JSON config file consulted for settings not given otherwise
    #[arg(long, env = "PEEKER_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Timeout for each upstream call, in seconds
    #[arg(long, env = "PEEKER_UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Retries after a transient upstream failure
    #[arg(long, env = "PEEKER_UPSTREAM_RETRIES", default_value_t = 2)]
    pub retries: u32,

    /// Maximum pages fetched for one upstream listing
    #[arg(long, env = "PEEKER_MAX_PAGES", default_value_t = 1000)]
    pub max_pages: u32,

    /// Allowed CORS origins (comma-separated, or "*")
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", default_value = "*")]
    pub cors_allowed_origins: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Settings read from the JSON config file.
///
/// Every key is optional and empty strings count as absent. The port may be
/// written as a number or as a string.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub joplin_server: Option<String>,
    pub joplin_token: Option<String>,
    pub peeker_host: Option<String>,
    pub peeker_port: Option<PortSetting>,
    pub static_dir: Option<PathBuf>,
}

/// Port as found in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortSetting {
    Number(u16),
    Text(String),
}

impl PortSetting {
    fn resolve(&self) -> Result<Option<u16>, ConfigError> {
        match self {
            Self::Number(port) => Ok(Some(*port)),
            Self::Text(text) if text.trim().is_empty() => Ok(None),
            Self::Text(text) => {
                text.trim()
                    .parse()
                    .map(Some)
                    .map_err(|e| ConfigError::InvalidValue {
                        name: "peeker_port".to_string(),
                        reason: format!("{text:?}: {e}"),
                    })
            }
        }
    }
}

impl FileConfig {
    /// Read the config file; a missing file yields an empty configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::MalformedFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// Upstream connection settings.
    pub upstream: UpstreamConfig,
}

impl ServerConfig {
    /// Load configuration from parsed arguments and the config file they name.
    pub fn load(args: Args) -> Result<Self, ConfigError> {
        let file = FileConfig::load(&args.config)?;
        Self::resolve(args, file)
    }

    /// Merge arguments over file settings over defaults.
    pub fn resolve(args: Args, file: FileConfig) -> Result<Self, ConfigError> {
        let token = first_set(args.token, file.joplin_token)
            .ok_or(ConfigError::MissingToken)?;
        let server =
            first_set(args.joplin_server, file.joplin_server).unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let host = first_set(args.host, file.peeker_host).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let file_port = match &file.peeker_port {
            Some(setting) => setting.resolve()?,
            None => None,
        };
        let port = args.port.or(file_port).unwrap_or(DEFAULT_PORT);

        let static_dir = args
            .static_dir
            .or(file.static_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let log_level = if args.verbose {
            "debug".to_string()
        } else {
            args.log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
        };

        let upstream = UpstreamConfig {
            server,
            token,
            timeout: Duration::from_secs(args.timeout_secs),
            retries: args.retries,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_pages: args.max_pages,
        };
        upstream.validate()?;

        Ok(Self {
            host,
            port,
            static_dir,
            log_level,
            cors_allowed_origins: args.cors_allowed_origins,
            upstream,
        })
    }

    /// Address to bind, in `host:port` form.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn first_set(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|s| !s.trim().is_empty())
        .or_else(|| fallback.filter(|s| !s.trim().is_empty()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No access token from any source.
    #[error(
        "the Joplin access token is required: pass --token, set JOPLIN_TOKEN \
or add joplin_token to the config file"
    )]
    MissingToken,

    /// Config file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid JSON of the expected shape.
    #[error("malformed config file {}: {source}", path.display())]
    MalformedFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A setting has an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    /// Upstream settings rejected by the client.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let argv = ["joplin-peeker", "--config", "/nonexistent/peeker/config.json"]
            .into_iter()
            .chain(extra.iter().copied());
        Args::try_parse_from(argv).unwrap()
    }

    fn file(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_default_values() {
        let config = ServerConfig::resolve(args(&["--token", "t"]), FileConfig::default()).unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.upstream.server, "http://localhost:41184");
        assert_eq!(config.upstream.timeout, Duration::from_secs(10));
        assert_eq!(config.upstream.retries, 2);
        assert_eq!(config.upstream.max_pages, 1000);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let result = ServerConfig::resolve(args(&[]), FileConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingToken)));

        let result = ServerConfig::resolve(args(&["--token", " "]), file(r#"{"joplin_token": ""}"#));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_file_fills_unset_values() {
        let file = file(
            r#"{
                "joplin_server": "http://joplin.lan:41184",
                "joplin_token": "from-file",
                "peeker_host": "0.0.0.0",
                "peeker_port": "9090"
            }"#,
        );
        let config = ServerConfig::resolve(args(&[]), file).unwrap();

        assert_eq!(config.upstream.server, "http://joplin.lan:41184");
        assert_eq!(config.upstream.token, "from-file");
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
    }

    #[test]
    fn test_flags_override_file() {
        let file = file(r#"{"joplin_token": "from-file", "peeker_port": 7000, "peeker_host": "0.0.0.0"}"#);
        let config =
            ServerConfig::resolve(args(&["--token", "from-flag", "--port", "9000"]), file).unwrap();

        assert_eq!(config.upstream.token, "from-flag");
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_bad_port_in_file() {
        let result = ServerConfig::resolve(
            args(&["--token", "t"]),
            file(r#"{"peeker_port": "eighty"}"#),
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_verbose_selects_debug() {
        let config = ServerConfig::resolve(args(&["--token", "t", "-v"]), FileConfig::default()).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ServerConfig::resolve(
            args(&["--token", "t", "--timeout-secs", "0"]),
            FileConfig::default(),
        );
        assert!(matches!(result, Err(ConfigError::Upstream(_))));
    }

    #[test]
    fn test_ipv6_bind_address() {
        let config =
            ServerConfig::resolve(args(&["--token", "t", "--host", "::1"]), FileConfig::default()).unwrap();
        assert_eq!(config.bind_address(), "[::1]:8080");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = FileConfig::load(&dir.path().join("config.json")).unwrap();
        assert!(loaded.joplin_token.is_none());
    }

    #[test]
    fn test_load_reads_file() {
        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        write!(config_file, r#"{{"joplin_token": "abc", "static_dir": "/srv/peeker"}}"#).unwrap();

        let path = config_file.path().to_str().unwrap();
        let args = Args::try_parse_from(["joplin-peeker", "--config", path]).unwrap();
        let config = ServerConfig::load(args).unwrap();

        assert_eq!(config.upstream.token, "abc");
        assert_eq!(config.static_dir, PathBuf::from("/srv/peeker"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        write!(config_file, "{{ not json").unwrap();

        let result = FileConfig::load(config_file.path());
        assert!(matches!(result, Err(ConfigError::MalformedFile { .. })));
    }

    #[test]
    fn test_debug_hides_token() {
        let config =
            ServerConfig::resolve(args(&["--token", "very-secret"]), FileConfig::default()).unwrap();
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
