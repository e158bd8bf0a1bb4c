//! UI Module
//!
//! This module exports the UI components for the vinetop explorer:
//!
//! - `app`: Application state and event loop
//! - `views`: Rendering functions for the dashboard surfaces
//!
//! The UI renders exclusively from the lists the `view_model` functions
//! derive; it never filters, sorts, or searches on its own.

mod app;
mod views;

pub use app::{run_app, App};
