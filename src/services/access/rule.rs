use axum::http::Method;

/// Which requests count as a protected action.
///
/// A request is covered when its path starts with `path_prefix` and its
/// method is one of `methods`. Matching is prefix-based on the path and
/// exact (case-sensitive) on the method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedActionRule {
    path_prefix: String,
    methods: Vec<Method>,
}

impl ProtectedActionRule {
    pub fn new(path_prefix: impl Into<String>, methods: Vec<Method>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            methods,
        }
    }

    pub fn applies_to(&self, path: &str, method: &Method) -> bool {
        path.starts_with(&self.path_prefix) && self.methods.contains(method)
    }
}

impl Default for ProtectedActionRule {
    fn default() -> Self {
        Self::new(
            "/api/products",
            vec![Method::POST, Method::PUT, Method::PATCH, Method::DELETE],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_sub_paths() {
        let rule = ProtectedActionRule::default();
        assert!(rule.applies_to("/api/products", &Method::POST));
        assert!(rule.applies_to("/api/products/42", &Method::DELETE));
        assert!(rule.applies_to("/api/products/42", &Method::PATCH));
    }

    #[test]
    fn read_methods_are_not_covered() {
        let rule = ProtectedActionRule::default();
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            assert!(!rule.applies_to("/api/products", &method));
        }
    }

    #[test]
    fn other_paths_are_not_covered() {
        let rule = ProtectedActionRule::default();
        assert!(!rule.applies_to("/api/users", &Method::POST));
        assert!(!rule.applies_to("/api/login", &Method::POST));
        assert!(!rule.applies_to("/products", &Method::POST));
    }

    #[test]
    fn lower_case_verbs_do_not_match() {
        let rule = ProtectedActionRule::default();
        let lower = Method::from_bytes(b"post").unwrap();
        assert!(!rule.applies_to("/api/products", &lower));
    }
}
