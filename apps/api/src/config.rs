use anyhow::{bail, Context, Result};

use crate::resume::experience::{current_month_index, month_index, MonthIndex};

pub const DEFAULT_BUCKET: &str = "candidate-resumes";
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.1;
pub const DEFAULT_MATCH_COUNT: i64 = 10;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base of public resume URLs. Defaults to the S3 endpoint.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub match_threshold: f64,
    pub match_count: i64,
    /// Month that "Present" resolves to. `None` means the current month.
    pub experience_reference_month: Option<MonthIndex>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: optional_env("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            s3_public_url: optional_env("S3_PUBLIC_URL")
                .unwrap_or_else(|| s3_endpoint.clone())
                .trim_end_matches('/')
                .to_string(),
            s3_endpoint,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_threshold: match optional_env("MATCH_THRESHOLD") {
                Some(v) => v.parse().context("MATCH_THRESHOLD must be a number")?,
                None => DEFAULT_MATCH_THRESHOLD,
            },
            match_count: match optional_env("MATCH_COUNT") {
                Some(v) => v.parse().context("MATCH_COUNT must be an integer")?,
                None => DEFAULT_MATCH_COUNT,
            },
            experience_reference_month: optional_env("EXPERIENCE_REFERENCE_MONTH")
                .map(|v| parse_year_month(&v))
                .transpose()?,
        })
    }

    /// Month index that "Present" resolves to for this request.
    pub fn present_month(&self) -> MonthIndex {
        self.experience_reference_month
            .unwrap_or_else(current_month_index)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Set and non-blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses `YYYY-MM`.
fn parse_year_month(raw: &str) -> Result<MonthIndex> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .with_context(|| format!("EXPERIENCE_REFERENCE_MONTH '{raw}' is not YYYY-MM"))?;
    let year: i32 = year.parse().context("EXPERIENCE_REFERENCE_MONTH year")?;
    let month: u32 = month.parse().context("EXPERIENCE_REFERENCE_MONTH month")?;
    if !(1..=12).contains(&month) {
        bail!("EXPERIENCE_REFERENCE_MONTH month must be 1-12, got {month}");
    }
    Ok(month_index(year, month))
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for handler tests. "Present" is May 2025.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            s3_bucket: DEFAULT_BUCKET.to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_public_url: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            gemini_api_key: None,
            port: 3001,
            rust_log: "info".to_string(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            match_count: DEFAULT_MATCH_COUNT,
            experience_reference_month: Some(month_index(2025, 5)),
        }
    }
}
