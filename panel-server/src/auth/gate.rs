//! Permission gate
//!
//! Role → resource → action grants, consulted before every mutating or
//! sensitive-read operation. The table is an explicit value injected at
//! construction so tests can swap it out; there is no module-level
//! mutable state.
//!
//! Matching is literal action-list membership only. Wildcard-style strings
//! ("users:*") are NOT interpreted; a grant must name each action.

use std::collections::HashMap;

use shared::models::Role;

/// Actions a role may perform on one resource.
#[derive(Debug, Clone)]
pub struct ResourceGrant {
    pub resource: &'static str,
    pub actions: &'static [&'static str],
}

/// The permission lookup table.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    grants: HashMap<Role, Vec<ResourceGrant>>,
}

const ALL_ACTIONS: &[&str] = &["read", "create", "update", "delete"];

impl PermissionGate {
    pub fn new(grants: HashMap<Role, Vec<ResourceGrant>>) -> Self {
        Self { grants }
    }

    /// Literal membership check. Unknown roles and resources simply yield
    /// false; denials are the caller's job to turn into a 403.
    pub fn has_permission(&self, role: Role, resource: &str, action: &str) -> bool {
        self.grants
            .get(&role)
            .map(|grants| {
                grants
                    .iter()
                    .any(|g| g.resource == resource && g.actions.contains(&action))
            })
            .unwrap_or(false)
    }
}

impl Default for PermissionGate {
    /// The production grant table.
    fn default() -> Self {
        let mut grants = HashMap::new();

        grants.insert(
            Role::Admin,
            vec![
                ResourceGrant { resource: "users", actions: ALL_ACTIONS },
                ResourceGrant { resource: "products", actions: ALL_ACTIONS },
                ResourceGrant { resource: "orders", actions: ALL_ACTIONS },
                ResourceGrant {
                    resource: "notifications",
                    actions: &["read", "create", "update", "delete", "dispatch"],
                },
                ResourceGrant { resource: "reports", actions: &["read"] },
            ],
        );

        grants.insert(
            Role::Manager,
            vec![
                ResourceGrant { resource: "users", actions: &["read"] },
                ResourceGrant {
                    resource: "products",
                    actions: &["read", "create", "update"],
                },
                ResourceGrant {
                    resource: "orders",
                    actions: &["read", "create", "update"],
                },
                ResourceGrant {
                    resource: "notifications",
                    actions: &["read", "create", "dispatch"],
                },
                ResourceGrant { resource: "reports", actions: &["read"] },
            ],
        );

        grants.insert(
            Role::Employee,
            vec![
                ResourceGrant { resource: "products", actions: &["read"] },
                ResourceGrant { resource: "orders", actions: &["read", "create"] },
                ResourceGrant { resource: "notifications", actions: &["read"] },
            ],
        );

        Self::new(grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_delete_users() {
        let gate = PermissionGate::default();
        assert!(gate.has_permission(Role::Admin, "users", "delete"));
    }

    #[test]
    fn test_employee_cannot_delete_users() {
        let gate = PermissionGate::default();
        assert!(!gate.has_permission(Role::Employee, "users", "delete"));
    }

    #[test]
    fn test_unknown_resource_denied() {
        let gate = PermissionGate::default();
        assert!(!gate.has_permission(Role::Admin, "invoices", "read"));
    }

    #[test]
    fn test_wildcard_grants_are_not_interpreted() {
        // A table entry carrying a literal "*" action must not satisfy a
        // concrete action check.
        let mut grants = HashMap::new();
        grants.insert(
            Role::Manager,
            vec![ResourceGrant { resource: "users", actions: &["*"] }],
        );
        let gate = PermissionGate::new(grants);
        assert!(!gate.has_permission(Role::Manager, "users", "delete"));
    }

    #[test]
    fn test_injected_table_overrides_default() {
        let mut grants = HashMap::new();
        grants.insert(
            Role::Employee,
            vec![ResourceGrant { resource: "users", actions: &["delete"] }],
        );
        let gate = PermissionGate::new(grants);
        assert!(gate.has_permission(Role::Employee, "users", "delete"));
    }
}
