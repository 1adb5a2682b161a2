//! # machina-draw
//! Graph emission for the automata of `machina`. This crate turns a DFA,
//! NFA or PDA into a [Graph] of shaped nodes and labelled directed edges
//! (one edge per pair of connected states, with all its letters joined
//! into a single label), which can then be handed to any [GraphSink] or
//! written as Graphviz DOT text with [render_dot]. The actual rendering
//! is outside this crate.

use machina::dfa::Dfa;
use machina::label::Label;
use machina::nfa::Nfa;
use machina::pda::{EmptyStackPda, FinalStatePda, Pda};

/// The shape a node is drawn with: accepting states get a double circle,
/// and the `start` marker node is shapeless
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Circle,
    DoubleCircle,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// A directed graph with labelled edges. Adding an edge between an
/// already-connected pair of nodes appends to the existing label instead
/// of adding a parallel edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, label: &str, shape: NodeShape) {
        self.nodes.push(Node {
            id: id.to_string(),
            label: label.to_string(),
            shape,
        });
    }

    /// Adds an edge, merging with an existing edge between the same
    /// nodes by joining the labels with `separator`
    pub fn add_edge(&mut self, from: &str, to: &str, label: &str, separator: &str) {
        if let Some(edge) = self
            .edges
            .iter_mut()
            .find(|e| e.from == from && e.to == to)
        {
            edge.label.push_str(separator);
            edge.label.push_str(label);
        } else {
            self.edges.push(Edge {
                from: from.to_string(),
                to: to.to_string(),
                label: label.to_string(),
            });
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Feeds every node and edge of this graph to a sink
    pub fn emit(&self, sink: &mut impl GraphSink) {
        for node in &self.nodes {
            sink.node(node);
        }
        for edge in &self.edges {
            sink.edge(edge);
        }
    }
}

/// A consumer of graph elements. Renderers implement this to receive the
/// nodes and edges of [Graph::emit].
pub trait GraphSink {
    fn node(&mut self, node: &Node);
    fn edge(&mut self, edge: &Edge);
}

/// Builds the graph of a DFA: a circle per state (double for accepting
/// ones), a shapeless `start` marker pointing at the initial state, and
/// one comma-labelled edge per pair of connected states
pub fn dfa_graph(dfa: &Dfa) -> Graph {
    let mut graph = Graph::new();
    for state in dfa.states() {
        let shape = if state.is_accepting() {
            NodeShape::DoubleCircle
        } else {
            NodeShape::Circle
        };
        graph.add_node(state.name(), state.name(), shape);
    }
    if let Some(initial) = dfa.initial_state() {
        graph.add_node("start", "start", NodeShape::None);
        graph.add_edge("start", initial.name(), "", "");
    }
    for state in dfa.states() {
        for (letter_idx, target) in state.transitions().iter().enumerate() {
            if let Some(target) = target {
                graph.add_edge(
                    state.name(),
                    dfa.states()[*target].name(),
                    &dfa.alphabet()[letter_idx].to_string(),
                    ",",
                );
            }
        }
    }
    graph
}

/// Builds the graph of an NFA, with ε-edges labelled `ε`
pub fn nfa_graph(nfa: &Nfa) -> Graph {
    let mut graph = Graph::new();
    for state in nfa.states() {
        let shape = if state.is_accepting() {
            NodeShape::DoubleCircle
        } else {
            NodeShape::Circle
        };
        graph.add_node(state.name(), state.name(), shape);
    }
    if let Some(initial) = nfa.initial_state() {
        graph.add_node("start", "start", NodeShape::None);
        graph.add_edge("start", initial.name(), "", "");
    }
    for state in nfa.states() {
        for &target in state.epsilon_transitions() {
            graph.add_edge(
                state.name(),
                nfa.states()[target].name(),
                &Label::Epsilon.to_string(),
                ",",
            );
        }
        for (letter_idx, targets) in state.transitions().iter().enumerate() {
            for &target in targets {
                graph.add_edge(
                    state.name(),
                    nfa.states()[target].name(),
                    &nfa.alphabet()[letter_idx].to_string(),
                    ",",
                );
            }
        }
    }
    graph
}

/// Builds the graph of a final-state PDA: moves are labelled
/// `input,top/pushed`, newline-joined per pair of states
pub fn final_state_pda_graph(pda: &FinalStatePda) -> Graph {
    let mut graph = Graph::new();
    for state in pda.pda().states() {
        let shape = if pda.is_accepting(state) {
            NodeShape::DoubleCircle
        } else {
            NodeShape::Circle
        };
        graph.add_node(state, state, shape);
    }
    add_pda_edges(&mut graph, pda.pda());
    graph
}

/// Builds the graph of an empty-stack PDA; with no accepting states,
/// every node is a plain circle
pub fn empty_stack_pda_graph(pda: &EmptyStackPda) -> Graph {
    let mut graph = Graph::new();
    for state in pda.pda().states() {
        graph.add_node(state, state, NodeShape::Circle);
    }
    add_pda_edges(&mut graph, pda.pda());
    graph
}

fn add_pda_edges(graph: &mut Graph, pda: &Pda) {
    if let Some(initial) = pda.initial_state() {
        graph.add_node("start", "start", NodeShape::None);
        graph.add_edge("start", initial, "", "");
    }
    for transition in pda.moves() {
        let pushed: String = if transition.push.is_empty() {
            Label::Epsilon.to_string()
        } else {
            transition.push.iter().collect()
        };
        let label = format!("{},{}/{}", transition.input, transition.top, pushed);
        graph.add_edge(transition.from, transition.to, &label, "\n");
    }
}

/// Writes a graph as Graphviz DOT text, laid out left to right
pub fn render_dot(graph: &Graph) -> String {
    let mut out = String::from("digraph {\n    rankdir=LR;\n");
    for node in graph.nodes() {
        let shape = match node.shape {
            NodeShape::Circle => "circle",
            NodeShape::DoubleCircle => "doublecircle",
            NodeShape::None => "none",
        };
        out.push_str(&format!(
            "    {:?} [label={:?}, shape={shape}];\n",
            node.id, node.label
        ));
    }
    for edge in graph.edges() {
        out.push_str(&format!(
            "    {:?} -> {:?} [label={:?}];\n",
            edge.from, edge.to, edge.label
        ));
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dfa() -> Dfa {
        let mut dfa = Dfa::new();
        dfa.set_alphabet(['a', 'b']);
        dfa.add_states(["q0", "q1"]).unwrap();
        dfa.set_initial("q0").unwrap();
        dfa.set_accepting(["q1"]).unwrap();
        dfa.set_transitions([("q0", 'a', "q1"), ("q0", 'b', "q1"), ("q1", 'a', "q1")])
            .unwrap();
        dfa
    }

    #[test]
    fn dfa_edges_aggregate_letters() {
        let graph = dfa_graph(&sample_dfa());
        let edge = graph
            .edges()
            .iter()
            .find(|e| e.from == "q0" && e.to == "q1")
            .unwrap();
        assert_eq!(edge.label, "a,b");
        let marker = graph.nodes().iter().find(|n| n.id == "start").unwrap();
        assert_eq!(marker.shape, NodeShape::None);
        let accepting = graph.nodes().iter().find(|n| n.id == "q1").unwrap();
        assert_eq!(accepting.shape, NodeShape::DoubleCircle);
    }

    #[test]
    fn dot_output_contains_all_elements() {
        let dot = render_dot(&dfa_graph(&sample_dfa()));
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("\"q1\" [label=\"q1\", shape=doublecircle];"));
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"a,b\"];"));
    }

    #[test]
    fn pda_moves_are_labelled() {
        let mut pda = machina::pda::Pda::new();
        pda.set_input_symbols(['0']);
        pda.set_stack_symbols(['Z']);
        pda.add_states(["p", "q"]).unwrap();
        pda.set_initial_state("p").unwrap();
        pda.set_initial_symbol('Z').unwrap();
        pda.add_transition("p", '0', 'Z', "q", "").unwrap();
        pda.add_transition("p", Label::Epsilon, 'Z', "q", "ZZ").unwrap();

        let graph = empty_stack_pda_graph(&EmptyStackPda::new(pda));
        let edge = graph
            .edges()
            .iter()
            .find(|e| e.from == "p" && e.to == "q")
            .unwrap();
        assert!(edge.label.contains("0,Z/ε"));
        assert!(edge.label.contains("ε,Z/ZZ"));
        assert_eq!(edge.label.lines().count(), 2);
    }
}
