//! Template rendering
//!
//! `{{key}}` placeholder substitution over a context map, plus the
//! built-in fallback texts used when neither a tenant override nor a
//! platform default template exists.

use std::collections::HashMap;

use shared::{NotificationChannel, NotificationEvent};

/// Render a template body, replacing `{{key}}` with context values.
/// Unknown placeholders render as empty strings.
pub fn render(template: &str, context: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let key = after[..close].trim();
                if let Some(value) = context.get(key) {
                    out.push_str(value);
                }
                rest = &after[close + 2..];
            }
            None => {
                // Unterminated placeholder; emit the remainder verbatim
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Built-in (subject, body) for an event/channel pair
pub fn builtin_template(
    event: NotificationEvent,
    channel: NotificationChannel,
) -> (&'static str, &'static str) {
    use NotificationEvent::*;

    let (subject, long_body, short_body) = match event {
        BookingCreated => (
            "Booking request received - {{reference}}",
            "Hi {{recipient_name}}, your booking for {{listing_name}} on {{date}} at {{start}} was received and is awaiting confirmation. Reference: {{reference}}. Total: {{total_amount}} {{currency}}.",
            "Booking {{reference}} for {{listing_name}} on {{date}} {{start}} received.",
        ),
        BookingConfirmed => (
            "Booking confirmed - {{reference}}",
            "Hi {{recipient_name}}, your booking for {{listing_name}} on {{date}} at {{start}} is confirmed. Reference: {{reference}}.",
            "Booking {{reference}} confirmed: {{listing_name}}, {{date}} {{start}}.",
        ),
        BookingCancelled => (
            "Booking cancelled - {{reference}}",
            "Hi {{recipient_name}}, the booking {{reference}} for {{listing_name}} on {{date}} at {{start}} has been cancelled.",
            "Booking {{reference}} cancelled.",
        ),
        TenantApproved => (
            "Your business has been approved",
            "Hi {{recipient_name}}, {{tenant_name}} has been approved. Your listings can now be published and booked.",
            "{{tenant_name}} approved - you can start publishing listings.",
        ),
        TenantSuspended => (
            "Your business has been suspended",
            "Hi {{recipient_name}}, {{tenant_name}} has been suspended. Listings are no longer bookable; contact platform support for details.",
            "{{tenant_name}} suspended - contact support.",
        ),
    };

    // SMS and push get the short form
    match channel {
        NotificationChannel::Email => (subject, long_body),
        NotificationChannel::Sms | NotificationChannel::Push => (subject, short_body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let out = render(
            "Hi {{name}}, see you on {{date}}.",
            &ctx(&[("name", "Ana"), ("date", "2026-08-10")]),
        );
        assert_eq!(out, "Hi Ana, see you on 2026-08-10.");
    }

    #[test]
    fn test_render_unknown_placeholder_is_empty() {
        let out = render("Hello {{missing}}!", &ctx(&[]));
        assert_eq!(out, "Hello !");
    }

    #[test]
    fn test_render_tolerates_whitespace_in_keys() {
        let out = render("{{ name }}", &ctx(&[("name", "Ana")]));
        assert_eq!(out, "Ana");
    }

    #[test]
    fn test_render_unterminated_placeholder_kept_verbatim() {
        let out = render("value: {{open", &ctx(&[("open", "x")]));
        assert_eq!(out, "value: {{open");
    }

    #[test]
    fn test_builtin_templates_exist_for_all_events() {
        for event in [
            NotificationEvent::BookingCreated,
            NotificationEvent::BookingConfirmed,
            NotificationEvent::BookingCancelled,
            NotificationEvent::TenantApproved,
            NotificationEvent::TenantSuspended,
        ] {
            for channel in [
                NotificationChannel::Email,
                NotificationChannel::Sms,
                NotificationChannel::Push,
            ] {
                let (subject, body) = builtin_template(event, channel);
                assert!(!subject.is_empty());
                assert!(!body.is_empty());
            }
        }
    }
}
