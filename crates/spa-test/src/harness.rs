//! Test harness for Spa widgets.
//!
//! The harness plays the host: it owns a [`Store`] holding the host state,
//! builds the root widget from that state, and after every message the root
//! emits it dispatches the message and builds the root again.

use std::collections::VecDeque;
use std::error::Error as StdError;

use spa_core::{
    Constraints, Event, Key, Message, MouseButton, Rect, RecordingCanvas, State, Store, Widget,
};
use thiserror::Error;
use tracing::trace;

use crate::node::{self, Node};
use crate::selector::{Selector, SelectorError};

type View<S> = Box<dyn Fn(&S) -> Result<Box<dyn Widget>, HarnessError>>;
type MessageMapper<M> = Box<dyn Fn(Message) -> Option<M>>;

/// Errors surfaced by harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The view function refused to build a widget for the current state
    #[error("failed to render content: {0}")]
    Render(#[source] Box<dyn StdError + Send + Sync>),
    /// No node matched the selector
    #[error("no node matches {0}")]
    NodeNotFound(String),
    /// More than one node matched where exactly one was required
    #[error("expected exactly 1 node matching {selector} but found {count}")]
    AmbiguousNode {
        /// Selector that was queried
        selector: String,
        /// Number of matches
        count: usize,
    },
    /// The selector string could not be parsed
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// Test harness driving a host state and the widget built from it.
pub struct Harness<S: State> {
    store: Store<S>,
    view: View<S>,
    mapper: MessageMapper<S::Message>,
    root: Box<dyn Widget>,
    frame: RecordingCanvas,
    nodes: Vec<Node>,
    event_queue: VecDeque<Event>,
    viewport: Rect,
    renders: usize,
}

impl<S: State> Harness<S> {
    /// Build content from `state` with `view` and render the first frame.
    pub fn set_content<W, E, F>(state: S, view: F) -> Result<Self, HarnessError>
    where
        W: Widget + 'static,
        E: StdError + Send + Sync + 'static,
        F: Fn(&S) -> Result<W, E> + 'static,
    {
        let view: View<S> = Box::new(move |state: &S| {
            view(state)
                .map(|w| Box::new(w) as Box<dyn Widget>)
                .map_err(|e| HarnessError::Render(Box::new(e)))
        });
        let store = Store::new(state);
        let root = view(store.state())?;

        let mut harness = Self {
            store,
            view,
            mapper: Box::new(|msg| msg.downcast::<S::Message>().ok().map(|m| *m)),
            root,
            frame: RecordingCanvas::new(),
            nodes: Vec::new(),
            event_queue: VecDeque::new(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            renders: 0,
        };
        harness.render();
        Ok(harness)
    }

    /// Translate widget messages into host messages.
    ///
    /// By default a widget message is routed only if it already is an
    /// `S::Message`.
    #[must_use]
    pub fn with_message_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(Message) -> Option<S::Message> + 'static,
    {
        self.mapper = Box::new(mapper);
        self
    }

    /// Set the viewport size and lay the content out again.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> &mut Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.render();
        self
    }

    // === Host State ===

    /// Current host state.
    #[must_use]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Number of host state updates applied.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Root widget of the current frame.
    #[must_use]
    pub fn root(&self) -> &dyn Widget {
        &*self.root
    }

    /// Number of frames painted so far.
    #[must_use]
    pub const fn render_count(&self) -> usize {
        self.renders
    }

    /// Commands recorded for the current frame.
    #[must_use]
    pub fn frame(&self) -> &RecordingCanvas {
        &self.frame
    }

    // === Queries ===

    /// All nodes of the current frame.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every node matching `selector`.
    #[must_use]
    pub fn find_all(&self, selector: &Selector) -> Vec<&Node> {
        self.nodes.iter().filter(|n| selector.matches(n)).collect()
    }

    /// Every text node with exactly this content.
    #[must_use]
    pub fn on_all_nodes_with_text(&self, text: &str) -> Vec<&Node> {
        self.find_all(&Selector::text(text))
    }

    /// The single node matching `selector`.
    pub fn find_one(&self, selector: &Selector) -> Result<&Node, HarnessError> {
        let matches = self.find_all(selector);
        match matches.as_slice() {
            [node] => Ok(*node),
            [] => Err(HarnessError::NodeNotFound(selector.to_string())),
            _ => Err(HarnessError::AmbiguousNode {
                selector: selector.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Interact with the text node showing `text`.
    pub fn on_node_with_text(&mut self, text: &str) -> NodeInteraction<'_, S> {
        self.on_node(Selector::text(text))
    }

    /// Interact with the widget carrying this test ID.
    pub fn on_node_with_tag(&mut self, test_id: &str) -> NodeInteraction<'_, S> {
        self.on_node(Selector::test_id(test_id))
    }

    /// Interact with the node matching `selector`.
    pub fn on_node(&mut self, selector: Selector) -> NodeInteraction<'_, S> {
        NodeInteraction {
            harness: self,
            selector,
        }
    }

    /// Check if a node matching the selector string exists.
    pub fn exists(&self, selector: &str) -> Result<bool, HarnessError> {
        let selector = Selector::parse(selector)?;
        Ok(!self.find_all(&selector).is_empty())
    }

    // === Assertions ===

    /// Assert that a node matching the selector string exists.
    ///
    /// # Panics
    ///
    /// Panics if the selector is invalid or nothing matches.
    pub fn assert_exists(&self, selector: &str) -> &Self {
        assert!(
            self.exists(selector).unwrap_or(false),
            "Expected node matching '{selector}' to exist"
        );
        self
    }

    /// Assert that no node matches the selector string.
    ///
    /// # Panics
    ///
    /// Panics if the selector is invalid or something matches.
    pub fn assert_not_exists(&self, selector: &str) -> &Self {
        assert!(
            !self.exists(selector).unwrap_or(true),
            "Expected node matching '{selector}' to not exist"
        );
        self
    }

    /// Assert the count of matching nodes.
    ///
    /// # Panics
    ///
    /// Panics if the selector is invalid or the count does not match.
    pub fn assert_count(&self, selector: &str, expected: usize) -> &Self {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(e) => panic!("Invalid selector '{selector}': {e}"),
        };
        let actual = self.find_all(&parsed).len();
        assert_eq!(
            actual, expected,
            "Expected {expected} nodes matching '{selector}' but found {actual}"
        );
        self
    }

    // === Event Simulation ===

    /// Click the center of the single node matching `selector`.
    pub fn click(&mut self, selector: &Selector) -> Result<&mut Self, HarnessError> {
        let center = self.find_one(selector)?.bounds.center();
        trace!(%selector, x = center.x, y = center.y, "click");
        self.event_queue
            .push_back(Event::MouseMove { position: center });
        self.event_queue.push_back(Event::MouseDown {
            position: center,
            button: MouseButton::Left,
        });
        self.event_queue.push_back(Event::MouseUp {
            position: center,
            button: MouseButton::Left,
        });
        self.process_events()?;
        Ok(self)
    }

    /// Simulate a key press on the root widget.
    pub fn press_key(&mut self, key: Key) -> Result<&mut Self, HarnessError> {
        self.event_queue.push_back(Event::KeyDown { key });
        self.event_queue.push_back(Event::KeyUp { key });
        self.process_events()?;
        Ok(self)
    }

    /// Move focus away from the root widget.
    pub fn focus_out(&mut self) -> Result<&mut Self, HarnessError> {
        self.event_queue.push_back(Event::FocusOut);
        self.process_events()?;
        Ok(self)
    }

    /// Send an arbitrary event to the root widget.
    pub fn send(&mut self, event: Event) -> Result<&mut Self, HarnessError> {
        self.event_queue.push_back(event);
        self.process_events()?;
        Ok(self)
    }

    // === Internal ===

    /// A failed rebuild drops the remaining queued events and the stale frame.
    fn process_events(&mut self) -> Result<(), HarnessError> {
        while let Some(event) = self.event_queue.pop_front() {
            trace!(?event, "dispatch event");
            let Some(msg) = self.root.event(&event) else {
                self.render();
                continue;
            };

            match (self.mapper)(msg) {
                Some(host_msg) => {
                    let applied = self.store.dispatch(host_msg);
                    trace!(applied, revision = self.store.revision(), "message routed");
                    match (self.view)(self.store.state()) {
                        Ok(root) => self.root = root,
                        Err(e) => {
                            self.event_queue.clear();
                            self.frame.clear();
                            self.nodes.clear();
                            return Err(e);
                        }
                    }
                }
                None => trace!("widget message dropped: no host mapping"),
            }
            self.render();
        }
        Ok(())
    }

    fn render(&mut self) {
        let size = self
            .root
            .measure(Constraints::loose(self.viewport.size()));
        self.root
            .layout(Rect::from_origin_size(self.viewport.origin(), size));

        self.frame.clear();
        self.root.paint(&mut self.frame);
        self.nodes = node::collect(&*self.root, &self.frame);
        self.renders += 1;
        trace!(frame = self.renders, nodes = self.nodes.len(), "rendered");
    }
}

/// Pending interaction with the node a selector resolves to.
///
/// Assertions and actions resolve the selector against the frame current at
/// the time they run, so a chain keeps working across re-renders.
pub struct NodeInteraction<'h, S: State> {
    harness: &'h mut Harness<S>,
    selector: Selector,
}

impl<S: State> NodeInteraction<'_, S> {
    /// Selector this interaction resolves.
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Number of nodes the selector currently matches.
    #[must_use]
    pub fn count(&self) -> usize {
        self.harness.find_all(&self.selector).len()
    }

    /// Assert exactly one match exists and lies inside the viewport.
    ///
    /// # Panics
    ///
    /// Panics if the node is missing, ambiguous or off-screen.
    pub fn assert_is_displayed(self) -> Self {
        let viewport = self.harness.viewport;
        match self.harness.find_one(&self.selector) {
            Ok(node) => assert!(
                node.is_displayed_in(&viewport),
                "Expected node matching {} to be displayed, bounds {:?}",
                self.selector,
                node.bounds
            ),
            Err(e) => panic!("Assertion failed: {e}"),
        }
        self
    }

    /// Assert nothing matches.
    ///
    /// # Panics
    ///
    /// Panics if any node matches.
    pub fn assert_does_not_exist(self) -> Self {
        let count = self.count();
        assert!(
            count == 0,
            "Expected no node matching {} but found {count}",
            self.selector
        );
        self
    }

    /// Assert exactly one match exists.
    ///
    /// # Panics
    ///
    /// Panics if the node is missing or ambiguous.
    pub fn assert_exists(self) -> Self {
        if let Err(e) = self.harness.find_one(&self.selector) {
            panic!("Assertion failed: {e}");
        }
        self
    }

    /// Click the node.
    ///
    /// # Panics
    ///
    /// Panics if the node cannot be resolved or re-rendering fails.
    pub fn perform_click(self) -> Self {
        if let Err(e) = self.harness.click(&self.selector) {
            panic!("Failed to click {}: {e}", self.selector);
        }
        self
    }

    /// Click the node, returning failures instead of panicking.
    pub fn try_perform_click(&mut self) -> Result<(), HarnessError> {
        self.harness.click(&self.selector).map(|_| ())
    }
}
