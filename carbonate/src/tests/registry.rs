use crate::method::{Inputs, Method, Node, Standard};
use crate::registry::GraphRegistry;
use crate::{CarbonateError, TimeRange, Value, ValueKind};

fn one(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    Some(Value::number(1))
}

#[test]
fn test_duplicate_node_rejected() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("default", one)))
        .unwrap();

    let result = builder.register(Node::new("a").method(Method::new("other", one)));

    assert_eq!(result, Err(CarbonateError::DuplicateNode("a".to_string())));
}

#[test]
fn test_dangling_hard_requirement() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("from b", one).needs(["b"])))
        .unwrap();

    match builder.validate() {
        Err(CarbonateError::DanglingRequirement {
            node,
            method,
            requirement,
        }) => {
            assert_eq!(node, "a");
            assert_eq!(method, "from b");
            assert_eq!(requirement, "b");
        }
        other => panic!("Expected DanglingRequirement, got {:?}", other),
    }
}

#[test]
fn test_dangling_soft_requirement() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("default", one).appreciates(["hint"])))
        .unwrap();

    assert!(matches!(
        builder.validate(),
        Err(CarbonateError::DanglingRequirement { .. })
    ));
}

#[test]
fn test_declared_input_satisfies_requirement() {
    let mut builder = GraphRegistry::builder();
    builder.input("b", ValueKind::Number);
    builder
        .register(Node::new("a").method(Method::new("from b", one).needs(["b"])))
        .unwrap();

    let registry = builder.build().unwrap();

    assert!(registry.is_known("b"));
    assert_eq!(registry.input_kind("b"), Some(ValueKind::Number));
    assert!(registry.node("b").is_none());
}

#[test]
fn test_multiple_dangling_requirements_collected() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("from b and c", one).needs(["b", "c"])))
        .unwrap();

    match builder.validate() {
        Err(CarbonateError::MultipleErrors(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("Expected MultipleErrors, got {:?}", other),
    }
}

#[test]
fn test_cycle_reports_path() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("from b", one).needs(["b"])))
        .unwrap();
    builder
        .register(Node::new("b").method(Method::new("from a", one).needs(["a"])))
        .unwrap();

    let err = builder.build().unwrap_err();

    assert_eq!(
        err,
        CarbonateError::CyclicDependency(vec!["a".into(), "b".into(), "a".into()])
    );
    assert!(err.is_configuration_error());
    insta::assert_snapshot!(err.to_string(), @"Circular dependency: a -> b -> a");
}

#[test]
fn test_self_loop_is_a_cycle() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("from a", one).needs(["a"])))
        .unwrap();

    assert_eq!(
        builder.validate_acyclic(),
        Err(CarbonateError::CyclicDependency(vec![
            "a".into(),
            "a".into()
        ]))
    );
}

#[test]
fn test_soft_cycle_is_allowed() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("default", one).appreciates(["b"])))
        .unwrap();
    builder
        .register(Node::new("b").method(Method::new("default", one).appreciates(["a"])))
        .unwrap();

    assert!(builder.build().is_ok());
}

#[test]
fn test_automobile_registry_builds() {
    let registry = crate::automobile::registry().unwrap();

    let emission = registry.node("emission").unwrap();
    assert!(emission.is_guaranteed());
    assert!(registry.node("urbanity").unwrap().has_fallback());
    assert_eq!(registry.input_kind("make"), Some(ValueKind::Make));
    assert_eq!(registry.topological_order().count(), registry.len());
}

#[test]
fn test_automobile_methods_comply_by_scope() {
    let registry = crate::automobile::registry().unwrap();

    for node in registry.nodes() {
        for method in node.methods() {
            let tags = method.compliance_tags();
            if node.name() == "energy" {
                assert!(tags.is_empty(), "energy methods carry no standard");
                continue;
            }
            assert!(
                tags.contains(&Standard::GhgProtocolScope3) && tags.contains(&Standard::Iso),
                "{} / {} should comply with scope 3 and ISO",
                node.name(),
                method.name()
            );
        }
    }

    let scope_1 = |node: &str, method: &str| {
        registry
            .node(node)
            .unwrap()
            .methods()
            .iter()
            .find(|m| m.name() == method)
            .unwrap()
            .compliance_tags()
            .contains(&Standard::GhgProtocolScope1)
    };
    assert!(scope_1("emission", "from fuel"));
    assert!(scope_1("fuel_efficiency", "from make model year and urbanity"));
    assert!(!scope_1("distance", "from annual distance"));
    assert!(!scope_1("annual_distance", "default"));
    assert!(!scope_1("emission_factor", "default"));
    assert!(!scope_1("retirement", "from acquisition"));
}

#[test]
fn test_build_reports_dangling_before_cycle() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("from b", one).needs(["b"])))
        .unwrap();
    builder
        .register(Node::new("b").method(Method::new("from a and z", one).needs(["a", "z"])))
        .unwrap();

    assert!(matches!(
        builder.build(),
        Err(CarbonateError::DanglingRequirement { requirement, .. }) if requirement == "z"
    ));
}

#[test]
fn test_build_orders_every_node_once() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("a").method(Method::new("from b", one).needs(["b"])))
        .unwrap();
    builder
        .register(Node::new("b").method(Method::new("default", one)))
        .unwrap();
    builder
        .register(Node::new("c").method(Method::new("from b", one).needs(["b"])))
        .unwrap();

    let registry = builder.build().unwrap();
    let order: Vec<&str> = registry.topological_order().map(Node::name).collect();

    assert_eq!(order, vec!["b", "a", "c"]);
}
