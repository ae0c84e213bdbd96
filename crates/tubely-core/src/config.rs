//! Configuration module
//!
//! Configuration is read once at startup from the environment (and an optional `.env`
//! file), validated, and then shared read-only for the lifetime of the process.

use std::env;
use std::path::{Component, PathBuf};

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Server, database and auth settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_host: String,
    pub server_port: u16,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Upload pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Object store for videos
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // MinIO, LocalStack, ...
    // Public thumbnail assets
    pub assets_root: PathBuf,
    pub assets_base_url: String,
    // Local staging and external tools
    pub upload_temp_dir: Option<PathBuf>,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
}

/// Immutable application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PipelineConfig>);

impl Config {
    pub fn new(config: PipelineConfig) -> Self {
        Config(Box::new(config))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = PipelineConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config::new(config))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.0.validate()
    }

    pub fn as_pipeline(&self) -> &PipelineConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.0.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_host(&self) -> &str {
        &self.0.base.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.0.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.0.base.jwt_secret
    }

    pub fn log_format(&self) -> LogFormat {
        self.0.base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.0.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.0.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.0.base.db_timeout_seconds
    }

    pub fn s3_bucket(&self) -> &str {
        &self.0.s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.0.s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.0.s3_endpoint.as_deref()
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.0.assets_root
    }

    pub fn assets_base_url(&self) -> &str {
        &self.0.assets_base_url
    }

    /// Directory for staged uploads; `None` means the system temp dir.
    pub fn upload_temp_dir(&self) -> Option<&PathBuf> {
        self.0.upload_temp_dir.as_ref()
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.0.ffprobe_path
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.0.ffmpeg_path
    }
}

impl PipelineConfig {
    /// Build the configuration from a key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port: u16 = match non_empty("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let log_format = match non_empty("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let base = BaseConfig {
            server_host: non_empty("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            db_max_connections: non_empty("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: non_empty("DB_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: non_empty("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment: non_empty("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_format,
        };

        Ok(PipelineConfig {
            database_url: non_empty("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            s3_bucket: non_empty("S3_BUCKET")
                .ok_or_else(|| anyhow::anyhow!("S3_BUCKET must be set"))?,
            s3_region: non_empty("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            assets_root: non_empty("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            assets_base_url: non_empty("ASSETS_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/assets", server_port)),
            upload_temp_dir: non_empty("UPLOAD_TEMP_DIR").map(PathBuf::from),
            ffprobe_path: non_empty("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            ffmpeg_path: non_empty("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            base,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }

        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        if self.s3_bucket.trim().is_empty() {
            anyhow::bail!("S3_BUCKET must not be empty");
        }
        // The bucket is persisted as the first half of "<bucket>,<key>"
        if self.s3_bucket.contains(',') {
            anyhow::bail!("S3_BUCKET must not contain a comma");
        }
        if self.s3_region.trim().is_empty() {
            anyhow::bail!("S3_REGION must not be empty");
        }

        if !self.assets_base_url.starts_with("http://")
            && !self.assets_base_url.starts_with("https://")
        {
            anyhow::bail!("ASSETS_BASE_URL must start with http:// or https://");
        }

        // Staged upload paths are handed to ffprobe and ffmpeg, which refuse `..`
        if let Some(dir) = &self.upload_temp_dir {
            if dir.components().any(|c| c == Component::ParentDir) {
                anyhow::bail!(
                    "UPLOAD_TEMP_DIR must not contain '..' components: {}",
                    dir.display()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgres://localhost/tubely"),
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("S3_BUCKET", "tubely-videos"),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = PipelineConfig::from_lookup(lookup_from(&minimal())).unwrap();
        assert_eq!(config.base.server_port, 8091);
        assert_eq!(config.s3_region, "us-east-1");
        assert_eq!(config.assets_base_url, "http://localhost:8091/assets");
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.base.log_format, LogFormat::Compact);
        assert!(config.upload_temp_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        let pairs: Vec<_> = minimal()
            .into_iter()
            .filter(|(k, _)| *k != "JWT_SECRET")
            .collect();
        let err = PipelineConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut pairs = minimal();
        pairs[1] = ("JWT_SECRET", "short");
        let config = PipelineConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_with_comma_rejected() {
        let mut pairs = minimal();
        pairs[2] = ("S3_BUCKET", "a,b");
        let config = PipelineConfig::from_lookup(lookup_from(&pairs)).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("comma"));
    }

    #[test]
    fn test_upload_temp_dir_with_parent_component_rejected() {
        let mut pairs = minimal();
        pairs.push(("UPLOAD_TEMP_DIR", "./data/../tmp"));
        let config = PipelineConfig::from_lookup(lookup_from(&pairs)).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("UPLOAD_TEMP_DIR"));

        let mut pairs = minimal();
        pairs.push(("UPLOAD_TEMP_DIR", "/var/tmp/tubely..staging"));
        let config = PipelineConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = minimal();
        pairs.push(("PORT", "eighty"));
        assert!(PipelineConfig::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_production_and_json_logs() {
        let mut pairs = minimal();
        pairs.push(("ENVIRONMENT", "Production"));
        pairs.push(("LOG_FORMAT", "json"));
        let config = Config::new(PipelineConfig::from_lookup(lookup_from(&pairs)).unwrap());
        assert!(config.is_production());
        assert_eq!(config.log_format(), LogFormat::Json);
    }
}
