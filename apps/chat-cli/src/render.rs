//! Output rendering and time helpers for chat-cli.

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::SystemTime;

use crate::session::{Outcome, SessionError};

// ============================================================================
// Time Utilities
// ============================================================================

/// Convert SystemTime to RFC3339 string (millisecond precision, UTC).
pub fn system_time_to_rfc3339(t: SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC3339 string to SystemTime.
pub fn parse_rfc3339(s: &str) -> Result<SystemTime, chrono::ParseError> {
    let dt = DateTime::parse_from_rfc3339(s)?;
    Ok(dt.with_timezone(&Utc).into())
}

// ============================================================================
// JSON Output
// ============================================================================

/// Structured error JSON: `{"error": {"code": "<code>", "message": "<message>"}}`
pub fn json_error_with_message(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({"error": {"code": code, "message": message}})
}

pub fn outcome_json(outcome: &Outcome) -> serde_json::Value {
    serde_json::to_value(outcome)
        .unwrap_or_else(|e| json_error_with_message("internal", &e.to_string()))
}

pub fn error_json(err: &SessionError) -> serde_json::Value {
    json_error_with_message(err.code(), &err.to_string())
}

// ============================================================================
// Text Output
// ============================================================================

pub fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::UserCreated { user } => {
            format!("created user {} ({})", user.name, user.contact_id)
        }
        Outcome::GroupCreated { group } => format!(
            "created group {} \"{}\" with {} members, admin {}",
            group.id,
            group.name,
            group.members.len(),
            group.admin.contact_id
        ),
        Outcome::MessageSent {
            message,
            group,
            count,
            created_at,
        } => format!(
            "sent message {} to group {} at {} ({} in group)",
            message, group, created_at, count
        ),
        Outcome::AdminChanged { group, admin } => {
            format!("group {} admin is now {}", group, admin)
        }
        Outcome::UserRemoved { summary, total } => format!(
            "removed from group {}: {} members, {} messages, {} overall ({})",
            summary.group,
            summary.members_remaining,
            summary.messages_remaining,
            summary.total_messages_remaining,
            total
        ),
        Outcome::MessageFound { content } => content.clone(),
        Outcome::Groups { groups } => groups
            .iter()
            .map(|g| {
                let members: Vec<&str> = g.members.iter().map(|m| m.as_str()).collect();
                format!(
                    "{}\t{}\t{}\tadmin={}\tmembers={}\tmessages={}",
                    g.id,
                    g.name,
                    g.kind.as_str(),
                    g.admin,
                    members.join(","),
                    g.messages
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn error_text(err: &SessionError) -> String {
    format!("error[{}]: {}", err.code(), err)
}
