//! Notification templates
//!
//! Minimal `{{placeholder}}` substitution. Placeholders without a bound
//! value are left in the text untouched so a typo is visible in the
//! output instead of silently vanishing.

use std::collections::HashMap;

use serde::Serialize;

/// Replace every `{{key}}` occurrence that has a value in `vars`.
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match vars.get(key.trim()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// A ready-made message the admin UI offers as a starting point
#[derive(Debug, Clone, Serialize)]
pub struct CannedTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
}

/// Built-in templates. Supported placeholders: `{{name}}`, `{{email}}`,
/// `{{role}}`, `{{company}}`, `{{order_count}}`, `{{total_spend}}`.
pub fn canned_templates() -> &'static [CannedTemplate] {
    const TEMPLATES: &[CannedTemplate] = &[
        CannedTemplate {
            id: "welcome",
            name: "Welcome",
            subject: "Welcome to {{company}}",
            body: "Hi {{name}},\n\nyour account ({{email}}) is ready. \
                   You have been registered as {{role}}.\n\nThe {{company}} team",
        },
        CannedTemplate {
            id: "order_followup",
            name: "Order follow-up",
            subject: "Thank you for your orders",
            body: "Hi {{name}},\n\nyou have placed {{order_count}} orders with us \
                   for a total of {{total_spend}}. Thank you for your business.\n\n\
                   The {{company}} team",
        },
        CannedTemplate {
            id: "reactivation",
            name: "Reactivation",
            subject: "We miss you at {{company}}",
            body: "Hi {{name}},\n\nit has been a while since your last order. \
                   Browse our latest catalogue and get in touch.\n\nThe {{company}} team",
        },
    ];
    TEMPLATES
}
