//! Application configuration.
//!
//! Fixed values of the bulk upload format live here as constants. Server
//! settings come from the environment (a `.env` file is loaded by the binary).

use crate::api::logs::log_warning;

/// Product column value for every generated record.
pub const PRODUCT: &str = "Sponsored Products";

/// Operation column value for every generated record.
pub const OPERATION: &str = "create";

/// State column value for every entity that carries one.
pub const STATE_ENABLED: &str = "enabled";

/// Targeting type of generated campaigns.
pub const TARGETING_MANUAL: &str = "manual";

/// Bidding strategy used when a row leaves it blank.
pub const DEFAULT_BIDDING_STRATEGY: &str = "Dynamic bids - down only";

/// Match type written on cross-negation keywords.
pub const NEGATIVE_EXACT: &str = "Negative Exact";

/// Worksheet name of the bulk upload file.
pub const WORKSHEET_NAME: &str = "Sponsored Products Campaigns";

/// Download name of the generated spreadsheet.
pub const CAMPAIGN_FILE_NAME: &str = "campaign.xlsx";

/// Download name of the validation report.
pub const ERROR_REPORT_FILE_NAME: &str = "error_report.csv";

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const CSV_MIME: &str = "text/csv";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upload limit (10 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read `CAMPGEN_PORT` and `CAMPGEN_MAX_UPLOAD_BYTES` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("CAMPGEN_PORT") {
            match raw.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => log_warning(format!("Ignoring invalid CAMPGEN_PORT '{}'", raw)),
            }
        }

        if let Some(raw) = lookup("CAMPGEN_MAX_UPLOAD_BYTES") {
            match raw.trim().parse() {
                Ok(bytes) => config.max_upload_bytes = bytes,
                Err(_) => log_warning(format!(
                    "Ignoring invalid CAMPGEN_MAX_UPLOAD_BYTES '{}'",
                    raw
                )),
            }
        }

        config
    }
}

/// Parse the "Broad and Phrase Campaign Cross Negation" answer.
///
/// Accepts yes/no, true/false, 1/0 in any case.
pub fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_without_env() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CAMPGEN_PORT", "8080"),
            ("CAMPGEN_MAX_UPLOAD_BYTES", "2048"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 2048);
    }

    #[test]
    fn test_invalid_port_keeps_default() {
        let config = ServerConfig::from_lookup(|k| {
            (k == "CAMPGEN_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("Yes"), Some(true));
        assert_eq!(parse_yes_no(" no "), Some(false));
        assert_eq!(parse_yes_no("TRUE"), Some(true));
        assert_eq!(parse_yes_no("0"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }
}
