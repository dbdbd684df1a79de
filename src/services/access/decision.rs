/// Outcome of evaluating the product access policy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

/// Allow only when a principal is present and its identifier is exactly
/// `admin_identifier`.
///
/// This is a single-entry allow-list, not a role check.
pub fn decide(principal: Option<&str>, admin_identifier: &str) -> AccessDecision {
    match principal {
        Some(identifier) if identifier == admin_identifier => AccessDecision::Allow,
        _ => AccessDecision::Deny,
    }
}
