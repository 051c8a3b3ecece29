//! Host-owned state for controlled widgets.
//!
//! Widgets never mutate host state. They return messages from
//! [`Widget::event`](crate::Widget::event); the host folds those messages
//! into its state with [`State::update`] and renders again from the result:
//! `State + Message → (State, Command)`.
//!
//! # Examples
//!
//! ```
//! use spa_core::{Command, State, Store};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct Page {
//!     selected: usize,
//! }
//!
//! enum PageMessage {
//!     Select(usize),
//! }
//!
//! impl State for Page {
//!     type Message = PageMessage;
//!
//!     fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
//!         match msg {
//!             PageMessage::Select(index) => self.selected = index,
//!         }
//!         Command::None
//!     }
//! }
//!
//! let mut store = Store::new(Page::default());
//! store.dispatch(PageMessage::Select(2));
//! assert_eq!(store.state().selected, 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::trace;

/// Application state trait.
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Message type for state updates
    type Message: Send + 'static;

    /// Update state in response to a message.
    ///
    /// Returns a command for follow-up work.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}

/// Follow-up work requested by a state update.
#[derive(Debug, Default)]
pub enum Command<M> {
    /// No command
    #[default]
    None,
    /// Dispatch another message after this update
    Message(M),
    /// Execute multiple commands
    Batch(Vec<Command<M>>),
}

impl<M> Command<M> {
    /// Create a batch of commands.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        Self::Batch(commands.into_iter().collect())
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    fn flatten_into(self, out: &mut VecDeque<M>) {
        match self {
            Self::None => {}
            Self::Message(msg) => out.push_back(msg),
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.flatten_into(out);
                }
            }
        }
    }
}

/// Type alias for state change subscribers.
type Subscriber<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Store owns host state and notifies subscribers after every update.
pub struct Store<S: State> {
    state: S,
    subscribers: Vec<Subscriber<S>>,
    revision: u64,
}

impl<S: State> Store<S> {
    /// Create a new store with initial state.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
            revision: 0,
        }
    }

    /// Get current state.
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Number of updates applied since creation.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Dispatch a message, then any follow-up messages its command requests.
    ///
    /// Returns the number of updates applied.
    pub fn dispatch(&mut self, msg: S::Message) -> usize {
        let mut queue = VecDeque::from([msg]);
        let mut applied = 0;

        while let Some(msg) = queue.pop_front() {
            self.state.update(msg).flatten_into(&mut queue);
            self.revision += 1;
            applied += 1;
            trace!(revision = self.revision, "state updated");
            self.notify_subscribers();
        }

        applied
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    fn notify_subscribers(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct IndexState {
        index: usize,
        writes: usize,
    }

    #[derive(Debug)]
    enum IndexMessage {
        Set(usize),
        SetThenReset(usize),
        Reset,
    }

    impl State for IndexState {
        type Message = IndexMessage;

        fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
            self.writes += 1;
            match msg {
                IndexMessage::Set(i) => {
                    self.index = i;
                    Command::None
                }
                IndexMessage::SetThenReset(i) => {
                    self.index = i;
                    Command::batch([Command::None, Command::Message(IndexMessage::Reset)])
                }
                IndexMessage::Reset => {
                    self.index = 0;
                    Command::None
                }
            }
        }
    }

    #[test]
    fn test_command_default_is_none() {
        let cmd: Command<()> = Command::default();
        assert!(cmd.is_none());
        assert!(!Command::Message(()).is_none());
    }

    #[test]
    fn test_store_dispatch() {
        let mut store = Store::new(IndexState::default());
        assert_eq!(store.dispatch(IndexMessage::Set(2)), 1);
        assert_eq!(store.state().index, 2);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_store_runs_follow_up_messages() {
        let mut store = Store::new(IndexState::default());
        assert_eq!(store.dispatch(IndexMessage::SetThenReset(5)), 2);
        assert_eq!(store.state().index, 0);
        assert_eq!(store.state().writes, 2);
    }

    #[test]
    fn test_store_notifies_subscribers_per_update() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);

        let mut store = Store::new(IndexState::default());
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.dispatch(IndexMessage::Set(1));
        store.dispatch(IndexMessage::SetThenReset(1));

        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
