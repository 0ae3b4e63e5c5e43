use crate::method::{Inputs, Method, Node};
use crate::registry::GraphRegistry;
use crate::{TimeRange, Value, ValueKind};

fn one(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    Some(Value::number(1))
}

fn position(order: &[&str], name: &str) -> usize {
    order.iter().position(|n| *n == name).unwrap()
}

#[test]
fn test_topological_sort_simple() {
    let mut builder = GraphRegistry::builder();
    // A depends on B, B depends on nothing
    builder
        .register(Node::new("A").method(Method::new("from B", one).needs(["B"])))
        .unwrap();
    builder
        .register(Node::new("B").method(Method::new("default", one)))
        .unwrap();
    let registry = builder.build().unwrap();

    let order: Vec<&str> = registry.topological_order().map(Node::name).collect();

    assert!(position(&order, "B") < position(&order, "A"), "B should come before A");
}

#[test]
fn test_topological_sort_chain() {
    let mut builder = GraphRegistry::builder();
    // C depends on B, B depends on A
    builder
        .register(Node::new("C").method(Method::new("from B", one).needs(["B"])))
        .unwrap();
    builder
        .register(Node::new("B").method(Method::new("from A", one).needs(["A"])))
        .unwrap();
    builder
        .register(Node::new("A").method(Method::new("default", one)))
        .unwrap();
    let registry = builder.build().unwrap();

    let order: Vec<&str> = registry.topological_order().map(Node::name).collect();

    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn test_topological_sort_follows_every_method() {
    let mut builder = GraphRegistry::builder();
    builder.input("x", ValueKind::Number);
    // A's second method depends on B
    builder
        .register(
            Node::new("A")
                .method(Method::new("from x", one).needs(["x"]))
                .method(Method::new("from B", one).needs(["B"])),
        )
        .unwrap();
    builder
        .register(Node::new("B").method(Method::new("default", one)))
        .unwrap();
    let registry = builder.build().unwrap();

    let order: Vec<&str> = registry.topological_order().map(Node::name).collect();

    assert_eq!(order, vec!["B", "A"]);
}

#[test]
fn test_topological_sort_ignores_soft_requirements() {
    let mut builder = GraphRegistry::builder();
    builder
        .register(Node::new("A").method(Method::new("default", one).appreciates(["B"])))
        .unwrap();
    builder
        .register(Node::new("B").method(Method::new("default", one)))
        .unwrap();
    let registry = builder.build().unwrap();

    let order: Vec<&str> = registry.topological_order().map(Node::name).collect();

    assert_eq!(order, vec!["A", "B"]);
}
