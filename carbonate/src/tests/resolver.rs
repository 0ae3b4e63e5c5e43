use crate::catalog::Catalog;
use crate::method::{Compliance, Inputs, Method, Node, Standard};
use crate::registry::GraphRegistry;
use crate::trace::{Outcome, SkipReason, Source};
use crate::{CarbonateError, FactStore, Resolver, ResourceLimits, TimeRange, Value, ValueKind};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};

fn one(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    Some(Value::number(1))
}

fn two(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    Some(Value::number(2))
}

fn decline(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    None
}

fn double_x(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    Some(Value::number(inputs.number("x")? * Decimal::from(2)))
}

fn sum_b_c(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    Some(Value::number(inputs.number("b")? + inputs.number("c")?))
}

fn days(_: &Inputs<'_>, timeframe: &TimeRange) -> Option<Value> {
    Some(Value::number(timeframe.days()))
}

fn build(nodes: Vec<Node>, inputs: &[(&str, ValueKind)]) -> GraphRegistry {
    let mut builder = GraphRegistry::builder();
    for (name, kind) in inputs {
        builder.input(*name, *kind);
    }
    for node in nodes {
        builder.register(node).unwrap();
    }
    builder.build().unwrap()
}

fn year_2010() -> Option<TimeRange> {
    Some(TimeRange::year(2010).unwrap())
}

#[test]
fn test_fact_overrides_every_method() {
    let registry = build(
        vec![
            Node::new("a").method(Method::new("from b", one).needs(["b"])),
            Node::new("b").method(Method::new("default", two)),
        ],
        &[("a", ValueKind::Number)],
    );
    let catalog = Catalog::new();
    let facts = FactStore::new().with("a", Decimal::from(5));

    let resolution = Resolver::new(&registry, &catalog)
        .resolve("a", &facts, year_2010(), &Compliance::none())
        .unwrap();

    assert_eq!(resolution.value, Some(Value::number(5)));
    assert!(resolution.is_fact());
    assert_eq!(resolution.method, None);
    assert!(resolution.trace.get("b").is_none(), "b should never be visited");
}

#[test]
fn test_first_applicable_method_wins() {
    let registry = build(
        vec![Node::new("a")
            .method(Method::new("from x", double_x).needs(["x"]))
            .method(Method::new("default", one))],
        &[("x", ValueKind::Number)],
    );
    let catalog = Catalog::new();
    let resolver = Resolver::new(&registry, &catalog);

    let without = resolver
        .resolve("a", &FactStore::new(), year_2010(), &Compliance::none())
        .unwrap();
    assert_eq!(without.value, Some(Value::number(1)));
    assert_eq!(without.method.as_deref(), Some("default"));
    let entry = without.trace.get("a").unwrap();
    assert!(entry.used_fallback());
    assert_eq!(entry.skipped.len(), 1);
    assert_eq!(
        entry.skipped[0].reason,
        SkipReason::MissingRequirement {
            name: "x".to_string()
        }
    );

    let facts = FactStore::new().with("x", Decimal::from(21));
    let with = resolver
        .resolve("a", &facts, year_2010(), &Compliance::none())
        .unwrap();
    assert_eq!(with.value, Some(Value::number(42)));
    assert_eq!(with.method.as_deref(), Some("from x"));
    assert_eq!(
        with.trace.get("a").unwrap().requirements[0].source,
        Source::Supplied
    );
}

#[test]
fn test_declined_method_falls_through() {
    let registry = build(
        vec![Node::new("a")
            .method(Method::new("picky", decline))
            .method(Method::new("default", two))],
        &[],
    );
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve("a", &FactStore::new(), year_2010(), &Compliance::none())
        .unwrap();

    assert_eq!(resolution.value, Some(Value::number(2)));
    let entry = resolution.trace.get("a").unwrap();
    assert_eq!(entry.skipped[0].method, "picky");
    assert_eq!(entry.skipped[0].reason, SkipReason::Declined);
}

#[test]
fn test_compliance_filter_gates_methods() {
    let registry = build(
        vec![
            Node::new("a")
                .method(
                    Method::new("from b", one)
                        .needs(["b"])
                        .complies([Standard::Iso]),
                )
                .method(Method::new("default", two)),
            Node::new("b").method(Method::new("default", one).complies([Standard::Iso])),
        ],
        &[],
    );
    let catalog = Catalog::new();
    let resolver = Resolver::new(&registry, &catalog);

    let iso = resolver
        .resolve(
            "a",
            &FactStore::new(),
            year_2010(),
            &Compliance::require([Standard::Iso]),
        )
        .unwrap();
    assert_eq!(iso.method.as_deref(), Some("from b"));

    let ghg = resolver
        .resolve(
            "a",
            &FactStore::new(),
            year_2010(),
            &Compliance::require([Standard::GhgProtocolScope1]),
        )
        .unwrap();
    assert_eq!(ghg.value, None);
    assert!(
        ghg.trace.get("b").is_none(),
        "a non-compliant method must not resolve its requirements"
    );
    let skipped = &ghg.trace.get("a").unwrap().skipped;
    assert_eq!(skipped.len(), 2);
    assert_eq!(
        skipped[0].reason,
        SkipReason::NonCompliant {
            missing: vec![Standard::GhgProtocolScope1]
        }
    );
    assert_eq!(
        skipped[1].reason.to_string(),
        "does not comply with ghg_protocol_scope_1"
    );
}

#[test]
fn test_compliant_method_missing_data_and_untagged_fallback() {
    let registry = build(
        vec![Node::new("a")
            .method(
                Method::new("from x", double_x)
                    .needs(["x"])
                    .complies([Standard::Iso]),
            )
            .method(Method::new("default", one))],
        &[("x", ValueKind::Number)],
    );
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve(
            "a",
            &FactStore::new(),
            year_2010(),
            &Compliance::require([Standard::Iso]),
        )
        .unwrap();

    assert_eq!(resolution.value, None);
    assert_eq!(resolution.method, None);
    let entry = resolution.trace.get("a").unwrap();
    assert_eq!(entry.outcome, Outcome::Unresolved);
    assert_eq!(entry.skipped.len(), 2);
    assert_eq!(entry.skipped[0].method, "from x");
    assert_eq!(
        entry.skipped[0].reason,
        SkipReason::MissingRequirement {
            name: "x".to_string()
        }
    );
    assert_eq!(entry.skipped[1].method, "default");
    assert_eq!(
        entry.skipped[1].reason,
        SkipReason::NonCompliant {
            missing: vec![Standard::Iso]
        }
    );
}

#[test]
fn test_compliance_applies_to_dependencies() {
    let registry = build(
        vec![
            Node::new("a").method(
                Method::new("from b", one)
                    .needs(["b"])
                    .complies([Standard::Iso]),
            ),
            Node::new("b").method(Method::new("default", one)),
        ],
        &[],
    );
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve(
            "a",
            &FactStore::new(),
            year_2010(),
            &Compliance::require([Standard::Iso]),
        )
        .unwrap();

    assert_eq!(resolution.value, None);
    assert_eq!(
        resolution.trace.get("b").unwrap().outcome,
        Outcome::Unresolved
    );
}

static SHARED_CALLS: AtomicUsize = AtomicUsize::new(0);

fn counted(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    SHARED_CALLS.fetch_add(1, Ordering::SeqCst);
    Some(Value::number(3))
}

#[test]
fn test_shared_dependency_evaluated_once() {
    let registry = build(
        vec![
            Node::new("a").method(Method::new("from b and c", sum_b_c).needs(["b", "c"])),
            Node::new("b").method(Method::new("from d", one).needs(["d"])),
            Node::new("c").method(Method::new("from d", two).needs(["d"])),
            Node::new("d").method(Method::new("counted", counted)),
        ],
        &[],
    );
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve("a", &FactStore::new(), year_2010(), &Compliance::none())
        .unwrap();

    assert_eq!(resolution.value, Some(Value::number(3)));
    assert_eq!(SHARED_CALLS.load(Ordering::SeqCst), 1);
    let order: Vec<&str> = resolution
        .trace
        .entries()
        .iter()
        .map(|e| e.quantity.as_str())
        .collect();
    assert_eq!(order, vec!["d", "b", "c", "a"]);
}

#[test]
fn test_unknown_quantity_is_undefined() {
    let registry = build(vec![], &[]);
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve("nothing", &FactStore::new(), year_2010(), &Compliance::none())
        .unwrap();

    assert!(!resolution.is_defined());
}

#[test]
fn test_guaranteed_node_without_result_fails() {
    let registry = build(
        vec![Node::new("total")
            .method(Method::new("from x", double_x).needs(["x"]))
            .guaranteed()],
        &[("x", ValueKind::Number)],
    );
    let catalog = Catalog::new();

    let err = Resolver::new(&registry, &catalog)
        .resolve("total", &FactStore::new(), year_2010(), &Compliance::none())
        .unwrap_err();

    assert_eq!(
        err,
        CarbonateError::UnreachableFallback {
            quantity: "total".to_string(),
            skipped: vec!["'from x' x is unknown".to_string()],
        }
    );
}

#[test]
fn test_guaranteed_node_under_compliance_filter_is_undefined() {
    let registry = build(
        vec![Node::new("total")
            .method(Method::new("default", one).complies([Standard::Iso]))
            .guaranteed()],
        &[],
    );
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve(
            "total",
            &FactStore::new(),
            year_2010(),
            &Compliance::require([Standard::GhgProtocolScope1]),
        )
        .unwrap();

    assert!(!resolution.is_defined());
}

#[test]
fn test_guaranteed_only_applies_at_top_level() {
    let registry = build(
        vec![
            Node::new("a")
                .method(Method::new("from b", one).needs(["b"]))
                .method(Method::new("default", two)),
            Node::new("b").method(Method::new("never", decline)).guaranteed(),
        ],
        &[],
    );
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve("a", &FactStore::new(), year_2010(), &Compliance::none())
        .unwrap();

    assert_eq!(resolution.value, Some(Value::number(2)));
}

#[test]
fn test_timeframe_reaches_compute() {
    let registry = build(vec![Node::new("days").method(Method::new("count", days))], &[]);
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve(
            "days",
            &FactStore::new(),
            Some("2012".parse().unwrap()),
            &Compliance::none(),
        )
        .unwrap();

    assert_eq!(resolution.value, Some(Value::number(366)));
}

#[test]
fn test_wrong_fact_kind_rejected() {
    let registry = build(
        vec![Node::new("a").method(Method::new("from x", double_x).needs(["x"]))],
        &[("x", ValueKind::Number)],
    );
    let catalog = Catalog::new();
    let facts = FactStore::new().with("x", true);

    let err = Resolver::new(&registry, &catalog)
        .resolve("a", &facts, year_2010(), &Compliance::none())
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"Invalid fact 'x': expected number, got boolean");
}

#[test]
fn test_depth_limit() {
    let registry = build(
        vec![
            Node::new("a").method(Method::new("from b", one).needs(["b"])),
            Node::new("b").method(Method::new("from c", one).needs(["c"])),
            Node::new("c").method(Method::new("default", one)),
        ],
        &[],
    );
    let catalog = Catalog::new();
    let limits = ResourceLimits {
        max_depth: 1,
        ..ResourceLimits::default()
    };

    let result = Resolver::new(&registry, &catalog)
        .with_limits(limits)
        .resolve("a", &FactStore::new(), year_2010(), &Compliance::none());

    match result {
        Err(CarbonateError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_depth");
        }
        other => panic!("Expected ResourceLimitExceeded, got {:?}", other),
    }
}

#[test]
fn test_soft_cycle_resolves() {
    let registry = crate::automobile::registry().unwrap();
    let catalog = Catalog::new();

    let resolution = Resolver::new(&registry, &catalog)
        .resolve(
            "active_subtimeframe",
            &FactStore::new(),
            year_2010(),
            &Compliance::none(),
        )
        .unwrap();

    assert_eq!(
        resolution.value,
        Some(Value::Range(TimeRange::year(2010).unwrap()))
    );
    let trace = &resolution.trace;
    assert_eq!(trace.selected_method("acquisition"), Some("from retirement"));
    assert_eq!(trace.selected_method("retirement"), Some("from acquisition"));
}
