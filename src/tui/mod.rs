//! Terminal dashboard.
//!
//! State management and key handling live in [`app`]; widget construction
//! lives in [`render`]. Terminal I/O (raw mode, the event loop) is handled by
//! the binary, which keeps everything here testable.

pub mod app;
pub mod render;

pub use app::{App, Focus, InputMode};
pub use render::ui;
