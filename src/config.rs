//! Configuration constants and utilities for codepad
//!
//! The analysis service address is the only externally supplied setting.
//! Everything else about the transport is a fixed policy.

use std::time::Duration;

/// Default analysis service address
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Environment variable name for overriding the service address
pub const SERVER_URL_ENV_VAR: &str = "CODEPAD_SERVER_URL";

/// Environment variable holding the tracing filter directives
pub const LOG_LEVEL_ENV_VAR: &str = "CODEPAD_LOG_LEVEL";

/// Every analysis call is bounded by this budget
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Get the service address, checking environment variable first, then falling back to default
pub fn get_server_url() -> String {
    std::env::var_os(SERVER_URL_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

/// Resolve the service address, letting an explicit override win over the environment
pub fn resolve_server_url(explicit: Option<&str>) -> String {
    match explicit {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => get_server_url(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both env tests touch the same variable, so they run as one test.
    #[test]
    fn get_server_url_should_honour_env_override() {
        let original = std::env::var_os(SERVER_URL_ENV_VAR);

        std::env::remove_var(SERVER_URL_ENV_VAR);
        assert_eq!(get_server_url(), DEFAULT_SERVER_URL);

        std::env::set_var(SERVER_URL_ENV_VAR, "http://analysis.internal:9000");
        assert_eq!(get_server_url(), "http://analysis.internal:9000");
        assert_eq!(
            resolve_server_url(Some("http://cli.example")),
            "http://cli.example"
        );
        assert_eq!(resolve_server_url(None), "http://analysis.internal:9000");

        std::env::set_var(SERVER_URL_ENV_VAR, "   ");
        assert_eq!(get_server_url(), DEFAULT_SERVER_URL);

        match original {
            Some(val) => std::env::set_var(SERVER_URL_ENV_VAR, val),
            None => std::env::remove_var(SERVER_URL_ENV_VAR),
        }
    }

    #[test]
    fn request_timeout_should_be_ten_seconds() {
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(10));
    }
}
