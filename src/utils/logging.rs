// Logging utilities
// Structured logging with JSON and human-readable formats

use log::Level;
use serde_json::json;

/// Parse phase and step from log message
/// Extracts [PHASE: ...] and [STEP: ...] patterns
pub fn parse_log_metadata(message: &str) -> (Option<String>, Option<String>, String) {
    let (phase, rest) = extract_tag(message, "[PHASE:");
    let (step, cleaned) = extract_tag(&rest, "[STEP:");
    (phase, step, cleaned)
}

fn extract_tag(message: &str, open: &str) -> (Option<String>, String) {
    let Some(start) = message.find(open) else {
        return (None, message.to_string());
    };
    let Some(end) = message[start..].find(']') else {
        return (None, message.to_string());
    };
    let value = message[start + open.len()..start + end].trim().to_string();
    let cleaned = format!("{} {}", &message[..start], &message[start + end + 1..])
        .trim()
        .to_string();
    (Some(value), cleaned)
}

/// Format log entry as JSON for structured logging
pub fn format_json_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_entry = json!({
        "timestamp": timestamp,
        "level": level.as_str(),
        "target": target,
        "message": message,
    });

    if let Some(phase) = phase {
        log_entry["phase"] = json!(phase);
    }

    if let Some(step) = step {
        log_entry["step"] = json!(step);
    }

    serde_json::to_string(&log_entry).unwrap_or_else(|_| "{}".to_string())
}

/// Format log entry as human-readable text
pub fn format_human_readable_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_line = format!("[{}] [{}]", timestamp, level.as_str());

    if let Some(phase) = phase {
        log_line.push_str(&format!(" [PHASE: {}]", phase));
    }

    if let Some(step) = step {
        log_line.push_str(&format!(" [STEP: {}]", step));
    }

    log_line.push_str(&format!(" [{}] {}", target, message));
    log_line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_metadata_extracts_phase_and_step() {
        let (phase, step, msg) =
            parse_log_metadata("[PHASE: wizard] [STEP: finish] final params: {}");
        assert_eq!(phase.as_deref(), Some("wizard"));
        assert_eq!(step.as_deref(), Some("finish"));
        assert_eq!(msg, "final params: {}");
    }

    #[test]
    fn parse_log_metadata_phase_only() {
        let (phase, step, msg) = parse_log_metadata("[PHASE: tui] Starting");
        assert_eq!(phase.as_deref(), Some("tui"));
        assert!(step.is_none());
        assert_eq!(msg, "Starting");
    }

    #[test]
    fn parse_log_metadata_untagged_message_unchanged() {
        let (phase, step, msg) = parse_log_metadata("plain message [not a tag]");
        assert!(phase.is_none());
        assert!(step.is_none());
        assert_eq!(msg, "plain message [not a tag]");
    }

    #[test]
    fn parse_log_metadata_unterminated_tag_is_left_alone() {
        let (phase, _, msg) = parse_log_metadata("[PHASE: oops no bracket");
        assert!(phase.is_none());
        assert_eq!(msg, "[PHASE: oops no bracket");
    }

    #[test]
    fn json_log_includes_optional_fields_only_when_present() {
        let line = format_json_log(
            "2026-01-01T00:00:00Z",
            Level::Info,
            "blueprint_wizard",
            "mounted",
            Some("wizard"),
            None,
        );
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["level"], "INFO");
        assert_eq!(v["phase"], "wizard");
        assert!(v.get("step").is_none());
        assert_eq!(v["message"], "mounted");
    }

    #[test]
    fn human_readable_log_layout() {
        let line = format_human_readable_log(
            "2026-01-01 00:00:00.000",
            Level::Debug,
            "blueprint_wizard::wizard",
            "Loading flag cleared",
            Some("wizard"),
            Some("handoff"),
        );
        assert_eq!(
            line,
            "[2026-01-01 00:00:00.000] [DEBUG] [PHASE: wizard] [STEP: handoff] [blueprint_wizard::wizard] Loading flag cleared"
        );
    }
}
