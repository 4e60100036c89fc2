use super::shipper::{LogRecord, LogShipper};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Targets whose events must not be shipped: the shipper's own HTTP stack
/// and this module would otherwise feed back into the queue.
const SKIPPED_TARGET_PREFIXES: [&str; 4] = ["crates::observability", "reqwest", "hyper", "h2"];

#[derive(Clone)]
pub(crate) struct LogShipLayer {
    shipper: LogShipper,
    min_level: Level,
}

impl LogShipLayer {
    pub(crate) fn new(shipper: LogShipper, min_level: Level) -> Self {
        Self { shipper, min_level }
    }
}

#[derive(Default)]
struct FieldMapVisitor {
    values: BTreeMap<String, String>,
}

impl FieldMapVisitor {
    fn insert(&mut self, field: &Field, value: String) {
        self.values
            .insert(field.name().to_string(), redact(field.name(), value));
    }
}

impl Visit for FieldMapVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.to_string());
    }
}

impl<S> Layer<S> for LogShipLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Level ordering is inverted: ERROR is the smallest.
        if *metadata.level() > self.min_level {
            return;
        }
        if SKIPPED_TARGET_PREFIXES
            .iter()
            .any(|prefix| metadata.target().starts_with(prefix))
        {
            return;
        }

        let mut visitor = FieldMapVisitor::default();
        event.record(&mut visitor);
        let message = visitor.values.remove("message").map(|raw| unquote(&raw));

        self.shipper.try_ship(LogRecord {
            level: *metadata.level(),
            timestamp: Utc::now(),
            target: metadata.target().to_string(),
            message,
            fields: visitor.values,
        });
    }
}

fn unquote(input: &str) -> String {
    let trimmed = input.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}

pub(crate) fn redact(field_name: &str, value: String) -> String {
    if is_sensitive_key(field_name) {
        return "[REDACTED]".to_string();
    }
    value
}

fn is_sensitive_key(field_name: &str) -> bool {
    let field = field_name.to_ascii_lowercase();
    field.contains("password")
        || field.contains("secret")
        || field.contains("token")
        || field.contains("authorization")
        || field.contains("api_key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_credential_like_fields() {
        assert_eq!(redact("newPassword", "hunter2".into()), "[REDACTED]");
        assert_eq!(redact("jwt_token", "abc".into()), "[REDACTED]");
        assert_eq!(redact("mayar_api_key", "k".into()), "[REDACTED]");
        assert_eq!(redact("booking_id", "7".into()), "7");
    }

    #[test]
    fn unquotes_debug_rendered_messages() {
        assert_eq!(unquote("\"booking created\""), "booking created");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\""), "\"");
    }
}
