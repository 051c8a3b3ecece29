//! Widget implementations for the Spa settings UI toolkit.

pub mod spinner;

pub use spinner::{Spinner, SpinnerError, SpinnerIndexChanged, SpinnerStyle};
