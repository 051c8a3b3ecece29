#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]
#![allow(clippy::manual_assert)]
#![allow(clippy::type_complexity)]
//! Testing harness for Spa widgets.
//!
//! The harness hosts a [`State`](spa_core::State), renders the widget built
//! from it into a [`RecordingCanvas`](spa_core::RecordingCanvas) and lets
//! tests find nodes by painted text, test ID, accessible name or role.
//!
//! # Example
//!
//! ```ignore
//! let mut harness = Harness::set_content(page, |page| Spinner::from_strings(..))?;
//! harness.on_node_with_text("Option 1").assert_is_displayed().perform_click();
//! ```

mod harness;
mod node;
mod selector;

pub use harness::{Harness, HarnessError, NodeInteraction};
pub use node::Node;
pub use selector::{Selector, SelectorError, SelectorParser};

use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test writer.
///
/// Filtering follows `RUST_LOG` and defaults to `warn`. Calling this more
/// than once is harmless.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
