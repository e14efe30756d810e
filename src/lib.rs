//! Rusty Lens: load tabular files, filter them, and chart them.
//!
//! The library is UI-agnostic; the `rusty-lens` binary puts an egui front-end
//! on top of [`state::AppState`].

pub mod color;
pub mod data;
pub mod error;
pub mod settings;
pub mod state;
pub mod viz;

pub use error::{Error, Result};
