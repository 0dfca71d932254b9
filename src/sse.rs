//! Wire framing of outbound events.
//!
//! Transports stream events to clients as `text/event-stream` frames; this
//! module renders an [`OutboundEvent`] into that framing. Adapters only
//! need to write the returned string and flush.

use crate::watch::OutboundEvent;

/// Event name on the wire for configuration changes.
pub const CONFIG_CHANGED_EVENT: &str = "config-changed";

/// Event name on the wire for heartbeats.
pub const HEARTBEAT_EVENT: &str = "heartbeat";

/// Render an event as a complete frame: an `event:` line, a `data:` line
/// with the JSON body, and the blank-line terminator.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use config_vault::sse::format_frame;
/// use config_vault::watch::OutboundEvent;
///
/// let event = OutboundEvent::Heartbeat {
///     timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
/// };
/// let frame = format_frame(&event);
/// assert!(frame.starts_with("event: heartbeat\n"));
/// assert!(frame.ends_with("\n\n"));
/// ```
pub fn format_frame(event: &OutboundEvent) -> String {
    let (name, data) = match event {
        OutboundEvent::ConfigChanged { keys, timestamp } => (
            CONFIG_CHANGED_EVENT,
            serde_json::json!({ "keys": keys, "timestamp": timestamp }),
        ),
        OutboundEvent::Heartbeat { timestamp } => {
            (HEARTBEAT_EVENT, serde_json::json!({ "timestamp": timestamp }))
        }
    };

    format!("event: {name}\ndata: {data}\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_config_changed_frame() {
        let event = OutboundEvent::ConfigChanged {
            keys: vec!["prod/db/host".to_string(), "prod/db/port".to_string()],
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };

        let frame = format_frame(&event);
        assert_eq!(
            frame,
            "event: config-changed\n\
             data: {\"keys\":[\"prod/db/host\",\"prod/db/port\"],\"timestamp\":\"2024-03-01T12:00:00Z\"}\n\n"
        );
    }

    #[test]
    fn test_heartbeat_frame() {
        let event = OutboundEvent::Heartbeat {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };

        let frame = format_frame(&event);
        assert_eq!(
            frame,
            "event: heartbeat\ndata: {\"timestamp\":\"2024-03-01T12:00:00Z\"}\n\n"
        );
    }
}
