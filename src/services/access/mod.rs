//! Product mutation gate.
//!
//! `ProductAccessPolicy` bundles the protected-action rule with the single
//! administrator identifier. Both are fixed at start-up and shared through
//! `AppState`; evaluation is a pure function of (path, method, principal).

mod decision;
mod rule;

use axum::http::Method;

pub use decision::{AccessDecision, decide};
pub use rule::ProtectedActionRule;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct ProductAccessPolicy {
    rule: ProtectedActionRule,
    admin_identifier: String,
}

impl ProductAccessPolicy {
    pub fn new(rule: ProtectedActionRule, admin_identifier: impl Into<String>) -> Self {
        Self {
            rule,
            admin_identifier: admin_identifier.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ProtectedActionRule::new(
                config.products_path_prefix.clone(),
                config.protected_methods.clone(),
            ),
            config.admin_identifier.clone(),
        )
    }

    pub fn admin_identifier(&self) -> &str {
        &self.admin_identifier
    }

    pub fn is_protected(&self, path: &str, method: &Method) -> bool {
        self.rule.applies_to(path, method)
    }

    pub fn decide(&self, principal: Option<&str>) -> AccessDecision {
        decide(principal, &self.admin_identifier)
    }

    /// Returns `None` when the request is not a protected action and the
    /// decision function was not consulted.
    pub fn evaluate(
        &self,
        path: &str,
        method: &Method,
        principal: Option<&str>,
    ) -> Option<AccessDecision> {
        self.is_protected(path, method)
            .then(|| self.decide(principal))
    }

    pub fn denial_message(&self) -> String {
        format!(
            "Only {} can create, update or delete products.",
            self.admin_identifier
        )
    }
}

impl Default for ProductAccessPolicy {
    fn default() -> Self {
        Self::new(ProtectedActionRule::default(), "admin@admin.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unprotected_requests_skip_the_decision() {
        let policy = ProductAccessPolicy::default();
        assert_eq!(policy.evaluate("/api/products", &Method::GET, None), None);
        assert_eq!(policy.evaluate("/api/users", &Method::POST, None), None);
    }

    #[test]
    fn protected_requests_are_decided_by_identifier() {
        let policy = ProductAccessPolicy::default();
        assert_eq!(
            policy.evaluate("/api/products", &Method::POST, None),
            Some(AccessDecision::Deny)
        );
        assert_eq!(
            policy.evaluate("/api/products", &Method::POST, Some("user@gmail.com")),
            Some(AccessDecision::Deny)
        );
        assert_eq!(
            policy.evaluate("/api/products/42", &Method::DELETE, Some("admin@admin.com")),
            Some(AccessDecision::Allow)
        );
    }

    #[test]
    fn custom_admin_and_prefix() {
        let policy = ProductAccessPolicy::new(
            ProtectedActionRule::new("/api/catalog", vec![Method::DELETE]),
            "ops@shop.test",
        );
        assert_eq!(
            policy.evaluate("/api/catalog/1", &Method::DELETE, Some("admin@admin.com")),
            Some(AccessDecision::Deny)
        );
        assert_eq!(
            policy.evaluate("/api/catalog/1", &Method::DELETE, Some("ops@shop.test")),
            Some(AccessDecision::Allow)
        );
        assert_eq!(policy.evaluate("/api/catalog/1", &Method::POST, None), None);
        assert_eq!(
            policy.denial_message(),
            "Only ops@shop.test can create, update or delete products."
        );
    }
}
