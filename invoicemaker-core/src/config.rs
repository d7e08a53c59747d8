use std::path::PathBuf;

use config::{Config as ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

/// Placeholder secret used when `SECRET_KEY` is unset. Only acceptable in
/// debug mode; `validate` rejects it otherwise.
pub const INSECURE_DEFAULT_SECRET_KEY: &str = "insecure-change-this-key-in-production";

const DEFAULT_SQLITE_URL: &str = "sqlite://invoicemaker.db";

/// Application configuration.
///
/// Built once at process start from environment variables and passed by
/// reference to every collaborator. All derivations (CSRF origins, security
/// flags, storage backend selection) happen here so the rest of the code
/// never touches process-wide environment state.
#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: String,
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    pub csrf_trusted_origins: Vec<String>,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub pdf: PdfConfig,
    pub superuser: SuperuserConfig,
    pub logging: LoggingConfig,
}

/// Transport security flags, derived from the debug flag: all off for local
/// development, all on in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityConfig {
    pub ssl_redirect: bool,
    pub session_cookie_secure: bool,
    pub csrf_cookie_secure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub backend: DatabaseBackend,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

/// Media storage backend selection.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Filesystem { media_root: PathBuf },
    S3(S3Config),
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfBackend {
    /// Pure-Rust rendering, no external binary required.
    #[default]
    Builtin,
    /// Shell out to a `wkhtmltopdf` binary named by `WKHTMLTOPDF_CMD`.
    Wkhtmltopdf,
}

impl PdfBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "builtin" => Some(Self::Builtin),
            "wkhtmltopdf" => Some(Self::Wkhtmltopdf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub backend: PdfBackend,
    pub wkhtmltopdf_cmd: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SuperuserConfig {
    pub username: String,
    pub email: String,
    /// Explicit password override. When absent, provisioning falls back to a
    /// development-only default (debug mode) or fails (production).
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Raw environment surface before derivation. Every field is optional; the
/// contract is the set of variable names, not their well-formedness.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEnv {
    secret_key: Option<String>,
    debug: Option<String>,
    allowed_hosts: Option<String>,
    csrf_trusted_origins: Option<String>,
    database_url: Option<String>,
    use_s3: Option<String>,
    aws_access_key_id: Option<String>,
    aws_secret_access_key: Option<String>,
    aws_storage_bucket_name: Option<String>,
    aws_s3_region_name: Option<String>,
    aws_s3_endpoint_url: Option<String>,
    media_root: Option<String>,
    pdf_backend: Option<String>,
    wkhtmltopdf_cmd: Option<String>,
    superuser_username: Option<String>,
    superuser_email: Option<String>,
    superuser_password: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
    log_file: Option<String>,
}

/// Truthy markers accepted for boolean environment variables.
fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "True" | "true" | "1")
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Derive CSRF trusted origins from the allowed-host list.
///
/// A leading dot means "any subdomain" (`.example.com` ->
/// `https://*.example.com`); hosts already carrying a wildcard are used
/// verbatim; bare `*` and empty entries are skipped.
fn derive_csrf_origins(hosts: &[String]) -> Vec<String> {
    let mut origins = Vec::new();
    for host in hosts {
        if host == "*" || host.is_empty() {
            continue;
        }
        if let Some(domain) = host.strip_prefix('.') {
            origins.push(format!("https://*.{domain}"));
        } else {
            origins.push(format!("https://{host}"));
        }
    }
    origins
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawEnv = ConfigBuilder::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()?;
        Ok(Self::from_raw(raw))
    }

    /// Pure derivation from the raw environment surface. Infallible by
    /// design; anything that can be wrong is reported by [`Config::validate`]
    /// so startup fails with the full list of problems at once.
    fn from_raw(raw: RawEnv) -> Self {
        let debug = raw.debug.as_deref().map(is_truthy).unwrap_or(false);

        let secret_key = non_empty(raw.secret_key)
            .unwrap_or_else(|| INSECURE_DEFAULT_SECRET_KEY.to_string());

        let allowed_hosts = match non_empty(raw.allowed_hosts) {
            Some(hosts) => split_csv(&hosts),
            None => vec!["localhost".to_string(), "127.0.0.1".to_string()],
        };

        let csrf_trusted_origins = match non_empty(raw.csrf_trusted_origins) {
            Some(origins) => split_csv(&origins),
            None => derive_csrf_origins(&allowed_hosts),
        };

        let security = SecurityConfig {
            ssl_redirect: !debug,
            session_cookie_secure: !debug,
            csrf_cookie_secure: !debug,
        };

        let database = match non_empty(raw.database_url) {
            Some(url) => {
                let backend = if url.starts_with("sqlite:") {
                    DatabaseBackend::Sqlite
                } else {
                    DatabaseBackend::Postgres
                };
                let url = if backend == DatabaseBackend::Postgres
                    && !debug
                    && !url.contains("sslmode=")
                {
                    let joiner = if url.contains('?') { '&' } else { '?' };
                    format!("{url}{joiner}sslmode=require")
                } else {
                    url
                };
                DatabaseConfig {
                    url,
                    backend,
                    ..DatabaseConfig::default()
                }
            }
            None => DatabaseConfig::default(),
        };

        let bucket = non_empty(raw.aws_storage_bucket_name);
        let use_s3 = raw.use_s3.as_deref().map(is_truthy).unwrap_or(false) || bucket.is_some();
        let storage = if use_s3 {
            StorageConfig::S3(S3Config {
                bucket: bucket.unwrap_or_default(),
                access_key_id: non_empty(raw.aws_access_key_id),
                secret_access_key: non_empty(raw.aws_secret_access_key),
                region: non_empty(raw.aws_s3_region_name),
                endpoint: non_empty(raw.aws_s3_endpoint_url),
            })
        } else {
            StorageConfig::Filesystem {
                media_root: PathBuf::from(
                    non_empty(raw.media_root).unwrap_or_else(|| "./media".to_string()),
                ),
            }
        };

        let pdf = PdfConfig {
            backend: raw
                .pdf_backend
                .as_deref()
                .and_then(PdfBackend::parse)
                .unwrap_or_default(),
            wkhtmltopdf_cmd: non_empty(raw.wkhtmltopdf_cmd),
        };

        let superuser = SuperuserConfig {
            username: non_empty(raw.superuser_username).unwrap_or_else(|| "admin".to_string()),
            email: non_empty(raw.superuser_email)
                .unwrap_or_else(|| "admin@example.com".to_string()),
            password: non_empty(raw.superuser_password),
        };

        let logging = LoggingConfig {
            level: non_empty(raw.log_level).unwrap_or_else(|| "info".to_string()),
            format: non_empty(raw.log_format).unwrap_or_else(|| "pretty".to_string()),
            file_path: non_empty(raw.log_file),
        };

        Self {
            secret_key,
            debug,
            allowed_hosts,
            csrf_trusted_origins,
            security,
            database,
            storage,
            pdf,
            superuser,
            logging,
        }
    }

    /// Check the configuration for fatal misconfigurations.
    ///
    /// Returns the full list of problems so an operator can fix everything in
    /// one pass.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.debug && self.secret_key == INSECURE_DEFAULT_SECRET_KEY {
            errors.push("SECRET_KEY must be set when debug mode is off".to_string());
        }

        let url = &self.database.url;
        if !(url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("sqlite:"))
        {
            errors.push(format!("Unsupported DATABASE_URL scheme: {url}"));
        }

        if let StorageConfig::S3(s3) = &self.storage {
            if s3.bucket.is_empty() {
                errors.push(
                    "AWS_STORAGE_BUCKET_NAME must be set when S3 storage is enabled".to_string(),
                );
            }
        }

        if self.pdf.backend == PdfBackend::Wkhtmltopdf && self.pdf.wkhtmltopdf_cmd.is_none() {
            errors.push(
                "WKHTMLTOPDF_CMD must be set when PDF_BACKEND is wkhtmltopdf".to_string(),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_raw(RawEnv::default())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SQLITE_URL.to_string(),
            backend: DatabaseBackend::Sqlite,
            max_connections: 10,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 600,
        }
    }
}
