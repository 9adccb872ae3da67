//! Viewer constants organized by domain.
//!
//! These are the built-in defaults; `config::Settings` can override the
//! tunable ones at startup.

mod grid;
mod input;
mod ui;
mod view;

pub use grid::*;
pub use input::*;
pub use ui::*;
pub use view::*;
