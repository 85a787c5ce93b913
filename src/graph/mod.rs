//! Graph view of a machine definition, for diagnostics.
//!
//! [`Graph`] is a sorted snapshot of states and edges. It serializes to JSON
//! and renders to Graphviz DOT; output is byte-stable for a given topology,
//! whatever order the machine was built in.

mod dot;

use crate::core::{EventKey, Fallback, StateId};
use crate::machine::StateMachine;
use serde::Serialize;
use std::collections::HashSet;

/// Pseudo-node standing for targets computed at runtime by fallback handlers.
pub const DYNAMIC_TARGET: &str = "?";

/// Edge label of state-scope fallbacks.
pub const STATE_FALLBACK_LABEL: &str = "state fallback";

/// Edge label of machine-scope fallbacks.
pub const MACHINE_FALLBACK_LABEL: &str = "machine fallback";

/// A state as drawn in the graph.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GraphNode {
    pub name: String,
    /// No incoming edge from another state
    pub start: bool,
    /// No outgoing edge to another state, fallbacks included
    pub end: bool,
}

/// How an edge came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Keyed,
    StateFallback,
    MachineFallback,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub kind: EdgeKind,
    /// Target chosen at runtime; `to` is [`DYNAMIC_TARGET`]
    pub dynamic: bool,
}

/// Sorted nodes and edges of one machine definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Graph {
    pub name: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    /// Walk a machine definition. Neither hooks nor resolvers are invoked.
    pub fn of<K: EventKey, D>(machine: &StateMachine<K, D>) -> Self {
        let mut edges = Vec::new();

        for (id, state) in machine.states() {
            for (key, to) in state.transitions() {
                edges.push(edge(
                    state.name(),
                    Some(machine.state(to).name()),
                    key.to_string(),
                    EdgeKind::Keyed,
                ));
            }

            match state.fallback() {
                Fallback::Unset => {
                    if let Some(edge) = machine_fallback_edge(machine, id) {
                        edges.push(edge);
                    }
                }
                Fallback::Static(to) => edges.push(edge(
                    state.name(),
                    Some(machine.state(*to).name()),
                    STATE_FALLBACK_LABEL.to_string(),
                    EdgeKind::StateFallback,
                )),
                Fallback::Dynamic(_) => edges.push(edge(
                    state.name(),
                    None,
                    STATE_FALLBACK_LABEL.to_string(),
                    EdgeKind::StateFallback,
                )),
            }
        }
        edges.sort();

        let entered: HashSet<&str> = edges
            .iter()
            .filter(|e| !e.dynamic && e.from != e.to)
            .map(|e| e.to.as_str())
            .collect();
        let left: HashSet<&str> = edges
            .iter()
            .filter(|e| e.from != e.to)
            .map(|e| e.from.as_str())
            .collect();

        let mut nodes: Vec<GraphNode> = machine
            .states()
            .map(|(_, state)| GraphNode {
                name: state.name().to_string(),
                start: !entered.contains(state.name()),
                end: !left.contains(state.name()),
            })
            .collect();
        nodes.sort();

        Self {
            name: machine.name().to_string(),
            nodes,
            edges,
        }
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Names of states drawn double-bordered: start or end states.
    pub fn boundary_states(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.start || node.end)
            .map(|node| node.name.as_str())
            .collect()
    }
}

fn edge(from: &str, to: Option<&str>, label: String, kind: EdgeKind) -> GraphEdge {
    GraphEdge {
        from: from.to_string(),
        to: to.unwrap_or(DYNAMIC_TARGET).to_string(),
        label,
        kind,
        dynamic: to.is_none(),
    }
}

fn machine_fallback_edge<K, D>(machine: &StateMachine<K, D>, from: StateId) -> Option<GraphEdge> {
    let name = machine.state(from).name();
    match machine.fallback() {
        Fallback::Unset => None,
        Fallback::Static(to) if *to == from => None,
        Fallback::Static(to) => Some(edge(
            name,
            Some(machine.state(*to).name()),
            MACHINE_FALLBACK_LABEL.to_string(),
            EdgeKind::MachineFallback,
        )),
        Fallback::Dynamic(_) => Some(edge(
            name,
            None,
            MACHINE_FALLBACK_LABEL.to_string(),
            EdgeKind::MachineFallback,
        )),
    }
}

impl<K: EventKey, D> StateMachine<K, D> {
    pub fn graph(&self) -> Graph {
        Graph::of(self)
    }

    /// Graphviz DOT description of the machine.
    pub fn render(&self) -> String {
        self.graph().to_dot(None)
    }

    /// Graphviz DOT description with `current` highlighted.
    pub fn render_with_current(&self, current: StateId) -> String {
        self.graph().to_dot(Some(self.state(current).name()))
    }
}
