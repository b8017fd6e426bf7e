//! Validation helpers
//!
//! Converts `validator` errors into the flat per-field message map the API
//! surfaces in error responses. Nested struct fields come out dotted
//! ("customer.email"), list entries indexed ("items[0].sku").

use std::collections::HashMap;

use validator::{ValidationErrors, ValidationErrorsKind};

/// Flatten a [`ValidationErrors`] tree into `field path -> message`.
pub fn validation_error_map(errors: &ValidationErrors) -> HashMap<String, String> {
    let mut map = HashMap::new();
    collect(errors, "", &mut map);
    map
}

fn collect(errors: &ValidationErrors, prefix: &str, map: &mut HashMap<String, String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(err) = field_errors.first() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", err.code));
                    map.insert(path, message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect(nested, &path, map);
            }
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    collect(nested, &format!("{path}[{idx}]"), map);
                }
            }
        }
    }
}
