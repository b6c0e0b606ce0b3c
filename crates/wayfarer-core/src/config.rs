//! Configuration module
//!
//! Configuration is read once from the environment (and an optional `.env` file) at
//! startup. Every setting except the database URL has a default.

use std::env;
use std::path::PathBuf;

const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: usize = 10;
const MAX_FILES_PER_REQUEST: usize = 10;
const DEFAULT_MEDIA_ROOT: &str = "./uploads";
const DEFAULT_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp,image/avif";
const DEFAULT_TRENDING_STATES: &str = "Rajasthan,Andaman";

/// Which document store backs the record repositories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentStoreKind {
    Postgres,
    Memory,
}

impl std::str::FromStr for DocumentStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DocumentStoreKind::Postgres),
            "memory" => Ok(DocumentStoreKind::Memory),
            other => Err(anyhow::anyhow!(
                "DOCUMENT_STORE must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Console log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub document_store: DocumentStoreKind,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub media_root: PathBuf,
    pub upload_temp_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub max_files_per_request: usize,
    pub allowed_content_types: Vec<String>,
    pub trending_states: Vec<String>,
    pub log_format: LogFormat,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = split_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let document_store = env::var("DOCUMENT_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<DocumentStoreKind>()?;

        let database_url = match document_store {
            DocumentStoreKind::Postgres => env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            DocumentStoreKind::Memory => env::var("DATABASE_URL").unwrap_or_default(),
        };

        let media_root =
            PathBuf::from(env::var("MEDIA_ROOT").unwrap_or_else(|_| DEFAULT_MEDIA_ROOT.to_string()));
        let upload_temp_dir = env::var("UPLOAD_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| media_root.join(".incoming"));

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_content_types = split_list(
            &env::var("ALLOWED_CONTENT_TYPES").unwrap_or_else(|_| DEFAULT_CONTENT_TYPES.to_string()),
        )
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect();

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            document_store,
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            media_root,
            upload_temp_dir,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_files_per_request: env::var("MAX_FILES_PER_REQUEST")
                .unwrap_or_else(|_| MAX_FILES_PER_REQUEST.to_string())
                .parse()
                .unwrap_or(MAX_FILES_PER_REQUEST),
            allowed_content_types,
            trending_states: split_list(
                &env::var("TRENDING_STATES").unwrap_or_else(|_| DEFAULT_TRENDING_STATES.to_string()),
            ),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.document_store == DocumentStoreKind::Postgres
            && !(self.database_url.starts_with("postgresql://")
                || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.max_files_per_request == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILES_PER_REQUEST must be greater than zero"
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES must not be empty"));
        }

        if self.upload_temp_dir.as_os_str().is_empty() || self.media_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!(
                "MEDIA_ROOT and UPLOAD_TEMP_DIR must not be empty"
            ));
        }

        Ok(())
    }

    /// Upper bound for a whole multipart request body
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_file_size_bytes
            .saturating_mul(self.max_files_per_request)
            .saturating_add(1024 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        let media_root = PathBuf::from(DEFAULT_MEDIA_ROOT);
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            document_store: DocumentStoreKind::Memory,
            database_url: String::new(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            upload_temp_dir: media_root.join(".incoming"),
            media_root,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_files_per_request: MAX_FILES_PER_REQUEST,
            allowed_content_types: split_list(DEFAULT_CONTENT_TYPES),
            trending_states: split_list(DEFAULT_TRENDING_STATES),
            log_format: LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trending_states, vec!["Rajasthan", "Andaman"]);
        assert!(config.allowed_content_types.contains(&"image/png".to_string()));
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let config = Config {
            environment: "production".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_postgres_requires_connection_string() {
        let config = Config {
            document_store: DocumentStoreKind::Postgres,
            database_url: "mysql://localhost".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            document_store: DocumentStoreKind::Postgres,
            database_url: "postgresql://localhost/wayfarer".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_document_store_kind_parse() {
        assert_eq!(
            "Postgres".parse::<DocumentStoreKind>().unwrap(),
            DocumentStoreKind::Postgres
        );
        assert_eq!(
            "memory".parse::<DocumentStoreKind>().unwrap(),
            DocumentStoreKind::Memory
        );
        assert!("mongo".parse::<DocumentStoreKind>().is_err());
    }

    #[test]
    fn test_split_list_skips_blanks() {
        assert_eq!(split_list(" a, ,b ,"), vec!["a", "b"]);
    }
}
