//! Semantics nodes collected from a rendered widget tree.

use spa_core::{AccessibleRole, Rect, RecordingCanvas, Widget};

/// One queryable element of a rendered frame.
///
/// Widgets contribute a node carrying their test ID, accessible name and
/// role. Every painted text run contributes a separate text node so tests
/// can find what is actually on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Painted text (text nodes only)
    pub text: Option<String>,
    /// Test ID of the owning widget
    pub test_id: Option<String>,
    /// Accessible name of the owning widget
    pub accessible_name: Option<String>,
    /// Accessible role
    pub role: AccessibleRole,
    /// On-screen bounds
    pub bounds: Rect,
}

impl Node {
    /// Whether any part of the node lies inside the viewport.
    #[must_use]
    pub fn is_displayed_in(&self, viewport: &Rect) -> bool {
        !self.bounds.size().is_empty() && self.bounds.intersects(viewport)
    }
}

/// Collect widget nodes depth-first, then the text runs of `frame`.
pub(crate) fn collect(root: &dyn Widget, frame: &RecordingCanvas) -> Vec<Node> {
    let mut nodes = Vec::new();
    collect_widgets(root, &mut nodes);
    nodes.extend(frame.texts().map(|run| Node {
        text: Some(run.content.to_string()),
        test_id: None,
        accessible_name: None,
        role: AccessibleRole::Text,
        bounds: run.bounds,
    }));
    nodes
}

fn collect_widgets(widget: &dyn Widget, nodes: &mut Vec<Node>) {
    nodes.push(Node {
        text: None,
        test_id: widget.test_id().map(str::to_string),
        accessible_name: widget.accessible_name().map(str::to_string),
        role: widget.accessible_role(),
        bounds: widget.bounds(),
    });
    for child in widget.children() {
        collect_widgets(child.as_ref(), nodes);
    }
}
