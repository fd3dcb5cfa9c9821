//! Sequence expansion
//!
//! Inserts movement actions in front of pickup actions so a dead-reckoned
//! agent arrives within reach of its target:
//! raw actions -> SequenceExpander -> expanded actions

pub mod expander;

pub use expander::SequenceExpander;
