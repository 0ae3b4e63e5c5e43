//! The graph of nodes, built once and frozen
//!
//! Validation happens in phases before a registry is handed out:
//! 1. Duplicate node names (on every `register`)
//! 2. Dangling requirements (every hard or soft requirement names a node or a
//!    declared input)
//! 3. Cycles among hard requirements
//!
//! Soft requirements take no part in cycle detection since resolving them
//! never blocks a method.

use crate::method::Node;
use crate::{CarbonateError, CarbonateResult, ValueKind};
use std::collections::{BTreeMap, HashMap};

/// Accumulates nodes and input declarations until `build`
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    inputs: BTreeMap<String, ValueKind>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node definition
    pub fn register(&mut self, node: Node) -> CarbonateResult<()> {
        if self.index.contains_key(node.name()) {
            return Err(CarbonateError::DuplicateNode(node.name().to_string()));
        }
        self.index.insert(node.name().to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Declare a quantity that only ever arrives as a fact
    ///
    /// A name may be both an input and a node: the fact overrides the node.
    pub fn input(&mut self, name: impl Into<String>, kind: ValueKind) -> &mut Self {
        self.inputs.insert(name.into(), kind);
        self
    }

    /// Run the dangling-requirement check followed by the cycle check
    pub fn validate(&self) -> CarbonateResult<()> {
        self.validate_requirements()?;
        self.validate_acyclic()
    }

    /// Every requirement names a node or a declared input
    fn validate_requirements(&self) -> CarbonateResult<()> {
        let mut errors = Vec::new();

        for node in &self.nodes {
            for method in node.methods() {
                let requirements = method
                    .hard_requirements()
                    .iter()
                    .chain(method.soft_requirements());
                for requirement in requirements {
                    if !self.index.contains_key(requirement)
                        && !self.inputs.contains_key(requirement)
                    {
                        errors.push(CarbonateError::DanglingRequirement {
                            node: node.name().to_string(),
                            method: method.name().to_string(),
                            requirement: requirement.clone(),
                        });
                    }
                }
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(CarbonateError::MultipleErrors(errors)),
        }
    }

    /// Fail with the first cycle found among hard requirements
    pub fn validate_acyclic(&self) -> CarbonateResult<()> {
        topological_sort(&self.nodes, &self.index).map(|_| ())
    }

    /// Validate and freeze
    pub fn build(self) -> CarbonateResult<GraphRegistry> {
        self.validate_requirements()?;
        let order = topological_sort(&self.nodes, &self.index)?;
        Ok(GraphRegistry {
            nodes: self.nodes,
            index: self.index,
            inputs: self.inputs,
            order,
        })
    }
}

/// Validated, immutable set of nodes indexed by name
///
/// Read-only after `build`, so one registry can serve concurrent requests.
#[derive(Debug)]
pub struct GraphRegistry {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    inputs: BTreeMap<String, ValueKind>,
    order: Vec<usize>,
}

impl GraphRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    /// Nodes in registration order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Nodes ordered so that hard requirements come before their dependents
    pub fn topological_order(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().map(move |&i| &self.nodes[i])
    }

    pub fn inputs(&self) -> impl Iterator<Item = (&str, ValueKind)> {
        self.inputs.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn input_kind(&self, name: &str) -> Option<ValueKind> {
        self.inputs.get(name).copied()
    }

    /// True when `name` is a node or a declared input
    pub fn is_known(&self, name: &str) -> bool {
        self.index.contains_key(name) || self.inputs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visiting,
    Visited,
}

/// Depth-first topological sort over hard requirements between nodes.
///
/// Returns node indices with every hard requirement before its dependent.
/// Visits nodes and requirements in declaration order so the reported cycle
/// is deterministic.
pub(crate) fn topological_sort(
    nodes: &[Node],
    index: &HashMap<String, usize>,
) -> CarbonateResult<Vec<usize>> {
    let mut state = vec![VisitState::Unvisited; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = Vec::new();

    for i in 0..nodes.len() {
        if state[i] == VisitState::Unvisited {
            visit(i, nodes, index, &mut state, &mut stack, &mut order)?;
        }
    }

    Ok(order)
}

fn visit(
    i: usize,
    nodes: &[Node],
    index: &HashMap<String, usize>,
    state: &mut [VisitState],
    stack: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> CarbonateResult<()> {
    match state[i] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => {
            let start = stack.iter().position(|&s| s == i).unwrap_or(0);
            let mut path: Vec<String> = stack[start..]
                .iter()
                .map(|&s| nodes[s].name().to_string())
                .collect();
            path.push(nodes[i].name().to_string());
            return Err(CarbonateError::CyclicDependency(path));
        }
        VisitState::Unvisited => state[i] = VisitState::Visiting,
    }

    stack.push(i);
    for method in nodes[i].methods() {
        for requirement in method.hard_requirements() {
            // Inputs that are not nodes are leaves
            if let Some(&dep) = index.get(requirement) {
                visit(dep, nodes, index, state, stack, order)?;
            }
        }
    }
    stack.pop();

    state[i] = VisitState::Visited;
    order.push(i);
    Ok(())
}
