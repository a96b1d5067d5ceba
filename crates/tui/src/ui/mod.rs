//! UI rendering module for the registration TUI.
//!
//! The runtime owns the terminal; the main view routes keys to the active
//! step or modal and draws the frame.

pub mod components;
pub mod main_view;
pub mod runtime;
pub mod utils;
