use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use validator::{Validate, ValidationError};

pub const ENV_URI: &str = "NEO4J_URI";
pub const ENV_USERNAME: &str = "NEO4J_USERNAME";
pub const ENV_PASSWORD: &str = "NEO4J_PASSWORD";
pub const ENV_OUTPUT_DIR: &str = "EXPORT_OUTPUT_DIR";
pub const ENV_FETCH_SIZE: &str = "EXPORT_FETCH_SIZE";

pub const DEFAULT_OUTPUT_DIR: &str = "memgraph_csv_export";

const BOLT_SCHEMES: &[&str] = &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    Missing(String),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Export configuration with validation
#[derive(Clone, Validate, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Bolt connection URI, e.g. `bolt://localhost:7687`
    #[validate(custom(function = "validate_bolt_uri"))]
    pub uri: String,

    /// Username for the graph database (may be empty for unauthenticated Memgraph)
    pub username: String,

    /// Password for the graph database
    #[serde(skip_serializing)]
    pub password: String,

    /// Directory the CSV files and the schema file are written to
    pub output_dir: PathBuf,

    /// Number of records the driver pulls per round trip
    #[validate(range(
        min = 1,
        max = 100000,
        message = "Fetch size must be between 1 and 100000"
    ))]
    pub fetch_size: usize,
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"***")
            .field("output_dir", &self.output_dir)
            .field("fetch_size", &self.fetch_size)
            .finish()
    }
}

impl ExportConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_cli(CliConfig::default())
    }

    /// Create configuration from CLI overrides layered over the environment.
    ///
    /// Connection settings are required: a flag wins over the environment
    /// variable, and a setting missing from both is an error.
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            uri: required(cli.uri, ENV_URI)?,
            username: required(cli.username, ENV_USERNAME)?,
            password: required(cli.password, ENV_PASSWORD)?,
            output_dir: match cli.output_dir {
                Some(dir) => dir,
                None => PathBuf::from(
                    env::var(ENV_OUTPUT_DIR).unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string()),
                ),
            },
            fetch_size: parse_env_var(ENV_FETCH_SIZE, "500")?,
        };

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub output_dir: Option<PathBuf>,
}

fn required(flag: Option<String>, key: &str) -> Result<String, ConfigError> {
    match flag {
        Some(value) => Ok(value),
        None => env::var(key).map_err(|_| ConfigError::Missing(key.to_string())),
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

fn validate_bolt_uri(uri: &str) -> Result<(), ValidationError> {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return Err(ValidationError::new("uri_scheme")
            .with_message("URI must look like bolt://host:port".into()));
    };
    if !BOLT_SCHEMES.contains(&scheme) {
        return Err(ValidationError::new("uri_scheme")
            .with_message(format!("Unsupported URI scheme `{}`", scheme).into()));
    }
    if rest.is_empty() {
        return Err(ValidationError::new("uri_host").with_message("URI has no host".into()));
    }
    Ok(())
}
