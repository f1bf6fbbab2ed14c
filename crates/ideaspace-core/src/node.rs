//! Exploration data model.

use ideaspace_layout::Vec3;
use serde::Serialize;

/// A positioned idea. Never mutated; a moved idea is a new node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaNode {
    label: String,
    position: Vec3,
}

impl IdeaNode {
    /// Build a node. Returns `None` for a blank label.
    #[must_use]
    pub fn new(label: impl Into<String>, position: Vec3) -> Option<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return None;
        }
        Some(Self { label, position })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }
}

/// Focus, visit history, and the neighbor set of the current focus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorationState {
    pub(crate) focus: Option<String>,
    pub(crate) history: Vec<String>,
    pub(crate) neighbors: Vec<IdeaNode>,
}

impl ExplorationState {
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Every sentence ever requested as focus, in request order, duplicates kept.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub fn neighbors(&self) -> &[IdeaNode] {
        &self.neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_labels_are_rejected() {
        assert!(IdeaNode::new("", Vec3::ORIGIN).is_none());
        assert!(IdeaNode::new("  \t", Vec3::ORIGIN).is_none());
    }

    #[test]
    fn node_keeps_label_verbatim() {
        let node = IdeaNode::new(" tides and moons ", Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(node.label(), " tides and moons ");
        assert_eq!(node.position(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn fresh_state_is_empty() {
        let state = ExplorationState::default();
        assert!(state.focus().is_none());
        assert!(state.history().is_empty());
        assert!(state.neighbors().is_empty());
    }
}
