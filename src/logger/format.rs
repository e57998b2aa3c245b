//! Access log line formats.
//!
//! `tiny` is the default: one compact line per request with method, path,
//! status, body size, and timing. `common` (CLF) and `json` are also
//! recognized; any other string is treated as a custom pattern with
//! `$variable` substitution.

use chrono::{DateTime, Local};

/// Everything one request contributes to its access log line.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new entry stamped with the current time.
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
            request_time_us: 0,
        }
    }

    /// Render the entry in the named format.
    pub fn format(&self, format: &str) -> String {
        match format {
            "tiny" => self.format_tiny(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// `$method $path $status $bytes - $time ms`
    fn format_tiny(&self) -> String {
        format!(
            "{} {} {} {} - {:.3} ms",
            self.method,
            self.request_uri(),
            self.status,
            self.body_bytes,
            self.request_time_ms(),
        )
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client IP address
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$request` - Full request line ("METHOD /path HTTP/version")
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Request URI with query string
    /// - `$status` - Response status code
    /// - `$body_bytes_sent` - Response body size
    /// - `$request_time` - Request processing time in seconds
    fn format_custom(&self, pattern: &str) -> String {
        let request_uri = self.request_uri();
        let request_line = format!(
            "{} {} HTTP/{}",
            self.method, request_uri, self.http_version
        );

        let mut line = pattern.to_string();
        line = line.replace("$remote_addr", &self.remote_addr);
        line = line.replace(
            "$time_local",
            &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
        );
        line = line.replace("$time_iso8601", &self.time.to_rfc3339());
        // $request_time, $request_method, and $request_uri must be replaced
        // before the shorter $request
        line = line.replace(
            "$request_time",
            &format!("{:.3}", self.request_time_ms() / 1000.0),
        );
        line = line.replace("$request_method", &self.method);
        line = line.replace("$request_uri", &request_uri);
        line = line.replace("$request", &request_line);
        line = line.replace("$status", &self.status.to_string());
        line = line.replace("$body_bytes_sent", &self.body_bytes.to_string());
        line
    }

    fn request_uri(&self) -> String {
        self.query
            .as_ref()
            .map_or_else(|| self.path.clone(), |q| format!("{}?{}", self.path, q))
    }

    #[allow(clippy::cast_precision_loss)]
    fn request_time_ms(&self) -> f64 {
        self.request_time_us as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1".to_string(),
            "GET".to_string(),
            "/assets/app.js".to_string(),
        );
        entry.query = Some("v=3".to_string());
        entry.status = 200;
        entry.body_bytes = 512;
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn tiny_is_one_compact_line() {
        let line = sample_entry().format("tiny");
        assert_eq!(line, "GET /assets/app.js?v=3 200 512 - 1.500 ms");
    }

    #[test]
    fn common_includes_the_request_line() {
        let line = sample_entry().format("common");
        assert!(line.starts_with("127.0.0.1 - - ["));
        assert!(line.contains("\"GET /assets/app.js?v=3 HTTP/1.1\" 200 512"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let line = sample_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["path"], "/assets/app.js");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 512);
    }

    #[test]
    fn custom_pattern_substitutes_variables() {
        let line = sample_entry().format("$request_method $status $request_time");
        assert!(line.starts_with("GET 200 0.00"), "got: {line}");
    }
}
