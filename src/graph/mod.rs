//! World-state graph
//!
//! Every distinct fact set visited during a run becomes one node; every
//! processed action becomes one edge, valid or not.

pub mod fsm;

pub use fsm::{FsmEdge, FsmNode, NodeClass, StateGraph, StateGraphBuilder};
