//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` placeholders

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::{Captures, Regex};
use serde_json::json;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([a-z_0-9]+)").unwrap_or_else(|e| unreachable!("variable pattern is valid: {e}"))
});

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current time; the rest is filled in after the response
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Substitute `$variable` placeholders
    ///
    /// Supported: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`, `$request_time` (seconds, 3 decimals).
    /// Unknown variables are left as written.
    fn format_custom(&self, pattern: &str) -> String {
        VARIABLE
            .replace_all(pattern, |caps: &Captures<'_>| {
                self.variable(&caps[1])
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn variable(&self, name: &str) -> Option<String> {
        let value = match name {
            "remote_addr" => self.remote_addr.clone(),
            "time_local" => self.time.format(CLF_TIME).to_string(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request" => self.request_line(),
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_referer" => self.referer.clone().unwrap_or_else(|| "-".to_string()),
            "http_user_agent" => self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.request_time_us as f64 / 1_000_000.0;
                format!("{seconds:.3}")
            }
            _ => return None,
        };
        Some(value)
    }
}
