//! Graphviz DOT rendering.

use super::{EdgeKind, Graph, GraphEdge, GraphNode, DYNAMIC_TARGET};

impl Graph {
    /// Render as a Graphviz `digraph`.
    ///
    /// Start and end states are drawn double-circled, fallbacks as dashed
    /// edges, and the node named `current`, if any, filled. Node and edge
    /// lines are sorted, so equal graphs render to identical bytes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewise::{State, StateMachine};
    ///
    /// let mut machine: StateMachine<&str> = StateMachine::new("door");
    /// let closed = machine.add_state(State::new("CLOSED"));
    /// let open = machine.add_state(State::new("OPEN"));
    /// machine.state_mut(closed).add_transition("push", open);
    ///
    /// let dot = machine.render();
    /// assert!(dot.starts_with("digraph finite_state_machine {"));
    /// assert!(dot.contains("\t\"CLOSED\" -> \"OPEN\" [label = \"push\"];\n"));
    /// ```
    pub fn to_dot(&self, current: Option<&str>) -> String {
        let mut nodes: Vec<String> = self
            .nodes
            .iter()
            .map(|node| node_line(node, current))
            .collect();
        if self.edges.iter().any(|edge| edge.dynamic) {
            nodes.push(format!("\t{} [shape = plaintext];", quote(DYNAMIC_TARGET)));
        }
        nodes.sort();

        let mut edges: Vec<String> = self.edges.iter().map(edge_line).collect();
        edges.sort();

        let mut out = String::from("digraph finite_state_machine {\n\trankdir=LR;\n");
        for line in nodes.iter().chain(edges.iter()) {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("\tlabelloc=\"t\";\n\tlabel={};\n}}", quote(&self.name)));
        out
    }
}

fn node_line(node: &GraphNode, current: Option<&str>) -> String {
    let shape = if node.start || node.end {
        "doublecircle"
    } else {
        "circle"
    };
    let mut line = format!("\t{} [shape = {shape}", quote(&node.name));
    if current == Some(node.name.as_str()) {
        line.push_str(", style = filled, fillcolor = yellow");
    }
    line.push_str("];");
    line
}

fn edge_line(edge: &GraphEdge) -> String {
    let style = match edge.kind {
        EdgeKind::Keyed => "",
        EdgeKind::StateFallback => ", style = dashed",
        EdgeKind::MachineFallback => ", style = dashed, color = grey50",
    };
    format!(
        "\t{} -> {} [label = {}{style}];",
        quote(&edge.from),
        quote(&edge.to),
        quote(&edge.label)
    )
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
