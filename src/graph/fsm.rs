//! FSM construction with set-keyed node deduplication

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::oracle::FactSet;

/// How a node was first reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    Initial,
    Valid,
    Invalid,
}

/// A distinct world state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsmNode {
    pub id: usize,
    pub label: String,
    pub state: FactSet,
    /// Step at which this state was first seen (0 = reset)
    pub step: usize,
    pub class: NodeClass,
}

/// A transition caused by one processed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsmEdge {
    pub from: usize,
    pub to: usize,
    pub action: String,
    pub step: usize,
    pub valid: bool,
    pub precondition: String,
}

/// The finished graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateGraph {
    pub nodes: Vec<FsmNode>,
    pub edges: Vec<FsmEdge>,
}

/// Builds a [`StateGraph`], mapping each canonical fact set to one node id
#[derive(Debug, Default)]
pub struct StateGraphBuilder {
    index: AHashMap<Vec<String>, usize>,
    graph: StateGraph,
}

impl StateGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the node for `facts`, creating it on first sight
    ///
    /// `step` and `class` only matter when a node is created; revisiting a
    /// state keeps its original origin.
    pub fn get_or_create(&mut self, facts: &FactSet, step: usize, class: NodeClass) -> usize {
        let key = facts.canonical_key();
        if let Some(&id) = self.index.get(&key) {
            return id;
        }

        let id = self.graph.nodes.len();
        let label = if key.is_empty() {
            "Initial".to_string()
        } else {
            key.join(", ")
        };

        self.graph.nodes.push(FsmNode {
            id,
            label,
            state: facts.clone(),
            step,
            class,
        });
        self.index.insert(key, id);
        id
    }

    /// Record a transition between two existing nodes
    pub fn add_edge(&mut self, edge: FsmEdge) {
        debug_assert!(
            edge.from < self.graph.nodes.len() && edge.to < self.graph.nodes.len(),
            "edge {} -> {} references an unknown node",
            edge.from,
            edge.to
        );
        self.graph.edges.push(edge);
    }

    pub fn node(&self, id: usize) -> Option<&FsmNode> {
        self.graph.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn finish(self) -> StateGraph {
        self.graph
    }
}
