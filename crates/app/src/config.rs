use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use services::DEFAULT_SESSION_TTL_SECS;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DB_URL: &str = "sqlite://rccm.sqlite3";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPort { raw: String },
    InvalidSessionTtl { raw: String },
    InvalidDbUrl { raw: String },
    InvalidAddr { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPort { raw } => write!(f, "invalid --port value: {raw}"),
            ArgsError::InvalidSessionTtl { raw } => {
                write!(f, "invalid --session-ttl value: {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAddr { raw } => write!(f, "invalid listen address: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_port(raw: &str) -> Result<u16, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidPort {
        raw: raw.to_string(),
    })
}

fn parse_ttl(raw: &str) -> Result<i64, ArgsError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ArgsError::InvalidSessionTtl {
            raw: raw.to_string(),
        })
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  rccm-server [--data-dir <dir>] [--db <sqlite_url>] [--host <addr>] [--port <port>]");
    eprintln!("              [--session-ttl <secs>] [--secure-cookies]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data-dir {DEFAULT_DATA_DIR}");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --host {DEFAULT_HOST} --port {DEFAULT_PORT}");
    eprintln!("  --session-ttl {DEFAULT_SESSION_TTL_SECS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RCCM_DATA_DIR, RCCM_DB_URL, RCCM_HOST, PORT / RCCM_PORT,");
    eprintln!("  RCCM_SESSION_TTL_SECS, RCCM_SECURE_COOKIES, RUST_LOG");
}

/// Server settings from flags, falling back to the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_url: String,
    pub host: String,
    pub port: u16,
    pub session_ttl_secs: i64,
    pub secure_cookies: bool,
}

impl Config {
    /// Parse flags in `args`; `env` looks up environment variables.
    ///
    /// Returns `Ok(None)` when help was requested.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or malformed values.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut config = Self {
            data_dir: env("RCCM_DATA_DIR").map_or_else(|| DEFAULT_DATA_DIR.into(), PathBuf::from),
            db_url: normalize_sqlite_url(
                env("RCCM_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string()),
            ),
            host: env("RCCM_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match env("PORT").or_else(|| env("RCCM_PORT")) {
                Some(raw) => parse_port(&raw)?,
                None => DEFAULT_PORT,
            },
            session_ttl_secs: match env("RCCM_SESSION_TTL_SECS") {
                Some(raw) => parse_ttl(&raw)?,
                None => DEFAULT_SESSION_TTL_SECS,
            },
            secure_cookies: env("RCCM_SECURE_COOKIES").is_some_and(|v| parse_flag(&v)),
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => config.data_dir = require_value(&mut args, "--data-dir")?.into(),
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.db_url = normalize_sqlite_url(value);
                }
                "--host" => config.host = require_value(&mut args, "--host")?,
                "--port" => config.port = parse_port(&require_value(&mut args, "--port")?)?,
                "--session-ttl" => {
                    config.session_ttl_secs =
                        parse_ttl(&require_value(&mut args, "--session-ttl")?)?;
                }
                "--secure-cookies" => config.secure_cookies = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(config))
    }

    /// # Errors
    ///
    /// Returns `ArgsError::InvalidAddr` if host and port do not form a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ArgsError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ArgsError::InvalidAddr { raw })
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories if missing.
///
/// # Errors
///
/// Returns an error for a malformed URL or if the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
