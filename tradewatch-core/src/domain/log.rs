//! Log domain types

use serde::{Deserialize, Serialize};

/// A log entry from pipeline execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Log severity as emitted by the pipeline API (upper-case on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_wire_format() {
        assert_eq!(serde_json::to_string(&LogLevel::Success).unwrap(), "\"SUCCESS\"");
        assert_eq!(serde_json::to_string(&LogLevel::Warning).unwrap(), "\"WARNING\"");

        let level: LogLevel = serde_json::from_str("\"INFO\"").unwrap();
        assert_eq!(level, LogLevel::Info);
    }

    #[test]
    fn test_log_entry_roundtrip_from_api_payload() {
        let json = r#"{
            "timestamp": "2025-08-20T12:00:00+00:00",
            "level": "ERROR",
            "message": "流水線執行失敗: boom"
        }"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.message.contains("boom"));
    }
}
