//! Core types and traits for the Spa settings UI toolkit.
//!
//! This crate provides foundational types used by every Spa widget:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color and theming: [`Color`], [`Theme`]
//! - Layout constraints: [`Constraints`]
//! - Events and messages: [`Event`], [`Message`]
//! - Rendering: [`Widget`], [`Canvas`], [`RecordingCanvas`]
//! - Host state: [`State`], [`Store`], [`Command`]

mod canvas;
mod color;
mod constraints;
pub mod draw;
mod event;
mod geometry;
mod state;
mod theme;
pub mod widget;

pub use canvas::{RecordingCanvas, TextRun};
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use draw::DrawCommand;
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use state::{Command, State, Store};
pub use theme::{ColorPalette, Spacing, Theme, ThemeError, Typography};
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, Message, TextStyle, TypeId, Widget,
};
