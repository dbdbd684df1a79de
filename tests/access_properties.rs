//! Property tests for the product mutation gate.

use axum::http::Method;
use proptest::prelude::*;

use shop_api::services::access::{AccessDecision, ProductAccessPolicy, ProtectedActionRule, decide};

const ADMIN: &str = "admin@admin.com";

fn arb_method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::GET),
        Just(Method::HEAD),
        Just(Method::OPTIONS),
        Just(Method::POST),
        Just(Method::PUT),
        Just(Method::PATCH),
        Just(Method::DELETE),
        Just(Method::TRACE),
    ]
}

fn arb_mutating_method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::POST),
        Just(Method::PUT),
        Just(Method::PATCH),
        Just(Method::DELETE),
    ]
}

fn arb_principal() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just(ADMIN.to_string()),
        prop::string::string_regex("[a-z]{1,8}@[a-z]{1,8}\\.(com|test)").unwrap(),
    ])
}

fn arb_product_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("(/[a-z0-9]{0,6}){0,3}")
        .unwrap()
        .prop_map(|suffix| format!("/api/products{suffix}"))
}

proptest! {
    /// Paths outside the prefix are never decided, whatever the method or caller.
    #[test]
    fn paths_outside_prefix_pass(
        path in prop::string::string_regex("/(api/(users|login|me)|health|[a-z]{1,10})(/[a-z0-9]{1,5})?").unwrap(),
        method in arb_method(),
        principal in arb_principal(),
    ) {
        let policy = ProductAccessPolicy::default();
        prop_assert_eq!(policy.evaluate(&path, &method, principal.as_deref()), None);
    }

    /// Read-only methods under the prefix always pass.
    #[test]
    fn read_methods_pass(
        path in arb_product_path(),
        method in prop_oneof![Just(Method::GET), Just(Method::HEAD), Just(Method::OPTIONS)],
        principal in arb_principal(),
    ) {
        let policy = ProductAccessPolicy::default();
        prop_assert_eq!(policy.evaluate(&path, &method, principal.as_deref()), None);
    }

    /// Mutations under the prefix are allowed exactly for the admin.
    #[test]
    fn mutations_allowed_only_for_admin(
        path in arb_product_path(),
        method in arb_mutating_method(),
        principal in arb_principal(),
    ) {
        let policy = ProductAccessPolicy::default();
        let expected = if principal.as_deref() == Some(ADMIN) {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        };
        prop_assert_eq!(policy.evaluate(&path, &method, principal.as_deref()), Some(expected));
    }

    /// Deciding twice gives the same answer.
    #[test]
    fn decision_is_idempotent(principal in arb_principal()) {
        let first = decide(principal.as_deref(), ADMIN);
        let second = decide(principal.as_deref(), ADMIN);
        prop_assert_eq!(first, second);
    }

    /// Any identifier other than the admin's is denied, including near misses.
    #[test]
    fn near_misses_are_denied(prefix in "[ A-Z]{0,2}", suffix in "[ .a-z]{0,2}") {
        let candidate = format!("{prefix}{ADMIN}{suffix}");
        prop_assume!(candidate != ADMIN);
        prop_assert_eq!(decide(Some(candidate.as_str()), ADMIN), AccessDecision::Deny);
    }

    /// A custom rule protects exactly its own prefix and methods.
    #[test]
    fn custom_rule_is_respected(method in arb_method(), principal in arb_principal()) {
        let policy = ProductAccessPolicy::new(
            ProtectedActionRule::new("/api/catalog", vec![Method::DELETE]),
            ADMIN,
        );
        let decision = policy.evaluate("/api/catalog/7", &method, principal.as_deref());
        if method == Method::DELETE {
            prop_assert!(decision.is_some());
        } else {
            prop_assert_eq!(decision, None);
        }
    }
}
